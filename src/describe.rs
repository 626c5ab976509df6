//! Human-readable rule documentation.

use serde_json::Value;

use crate::fixer::Fixer;
use crate::runner;
use tidyphp_syntax::TokenStream;

/// Render `value` the way rule configurations are shown to users: `'text'`, `true`, `~` for null, `[ a, b ]` for
/// lists and `[ 'key' => value ]` for maps.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Array(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            let inner: Vec<String> = items.iter().map(value_to_string).collect();
            format!("[ {} ]", inner.join(", "))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "[]".to_string();
            }
            let inner: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("'{key}' => {}", value_to_string(value)))
                .collect();
            format!("[ {} ]", inner.join(", "))
        }
    }
}

/// Full documentation block for one fixer, including the effect of each sample configuration on the sample code.
pub fn describe(fixer: &dyn Fixer) -> String {
    let definition = fixer.definition();
    let mut out = String::new();

    out.push_str(&format!("Rule {}\n", fixer.name()));
    out.push_str(&format!("  {}\n", definition.summary));
    out.push_str(&format!("  Priority: {}\n", fixer.priority()));

    let peers: Vec<&str> = fixer.runs_before().iter().map(|peer| peer.name()).collect();
    if !peers.is_empty() {
        out.push_str(&format!("  Runs before: {}\n", peers.join(", ")));
    }

    for (index, configuration) in definition.sample_configurations.iter().enumerate() {
        let label = match configuration {
            Value::Null => "default configuration".to_string(),
            other => value_to_string(other),
        };
        out.push_str(&format!("\nExample #{} ({label}):\n", index + 1));
        out.push_str(&sample_diff(fixer, definition.sample_code));
    }
    out
}

/// Diff of the sample code before and after `fixer`, or a note when the sample does not change.
fn sample_diff(fixer: &dyn Fixer, sample: &str) -> String {
    let Ok(mut stream) = TokenStream::from_code(sample) else {
        return "  (sample does not tokenize)\n".to_string();
    };
    fixer.fix(&mut stream);
    match runner::line_diff(sample, &stream.generate_code()) {
        Some(diff) => diff,
        None => "  (no changes)\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::DoctrineMigrationsFixer;
    use serde_json::json;

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(null)), "~");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(false)), "false");
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!("a")), "'a'");
        assert_eq!(value_to_string(&json!(["a", "b"])), "[ 'a', 'b' ]");
        assert_eq!(value_to_string(&json!([])), "[]");
        assert_eq!(
            value_to_string(&json!({"instanceof": ["Doctrine\\Migrations\\AbstractMigration"]})),
            "[ 'instanceof' => [ 'Doctrine\\Migrations\\AbstractMigration' ] ]"
        );
    }

    #[test]
    fn test_describe_doctrine_migrations() {
        let text = describe(&DoctrineMigrationsFixer::default());
        assert!(text.starts_with("Rule doctrine_migrations\n"));
        assert!(text.contains("  Priority: 56\n"));
        assert!(text.contains("  Runs before: class_attributes_separation, no_empty_phpdoc, no_extra_blank_lines\n"));
        assert!(text.contains("Example #1 (default configuration):\n"));
        assert!(text.contains("Example #2 ([ 'instanceof' => [ 'Doctrine\\Migrations\\AbstractMigration' ] ]):\n"));
        assert!(
            text.lines()
                .any(|line| line.starts_with('-') && line.ends_with("public function getDescription()"))
        );
    }
}
