//! Comment filtering: drop blacklisted lines from comment tokens.

use super::{remove_trailing_whitespace, replace_token};
use crate::lexer::Token;
use crate::stream::TokenStream;

/// Characters that carry no content in a comment: delimiters, doc-block asterisks and whitespace.
fn is_comment_decoration(c: char) -> bool {
    c == '/' || c == '*' || c.is_whitespace()
}

fn is_blacklisted<S: AsRef<str>>(line: &str, blacklist: &[S]) -> bool {
    let content = line.trim_matches(is_comment_decoration);
    blacklist.iter().any(|entry| entry.as_ref() == content)
}

/// The delimiters a dropped line of a block comment carried, if any.
///
/// The opener only ever sits on the first line and the closer on the last one; both survive so the comment stays
/// well-formed.
fn leftover_delimiters(line: &str, opener: Option<&str>, closes: bool) -> Option<String> {
    match (opener, closes) {
        (None, false) => None,
        (Some(open), false) => Some(open.to_string()),
        (Some(open), true) => Some(format!("{open} */")),
        (None, true) => {
            let indent = &line[..line.len() - line.trim_start().len()];
            Some(format!("{indent}*/"))
        }
    }
}

/// Remove blacklisted lines from every comment in the stream.
///
/// Each comment is split on `\n`; a line is dropped when, stripped of `/`, `*` and whitespace on both ends, it
/// equals a blacklist entry. A dropped line that opens or closes a block comment leaves its delimiter behind. A
/// comment left with nothing but decoration is cleared together with its trailing whitespace. Otherwise the
/// comment is replaced by one of the same kind holding the remaining lines.
///
/// Returns the number of comments that were modified or removed.
#[tracing::instrument(skip_all, fields(blacklist_len = blacklist.len()))]
pub fn filter_comments<S: AsRef<str>>(stream: &mut TokenStream, blacklist: &[S]) -> usize {
    let positions: Vec<usize> = stream
        .iter()
        .filter(|(_, token)| token.is_comment())
        .map(|(index, _)| index)
        .collect();

    let mut touched = 0;
    for position in positions {
        let Some(comment) = stream.get(position) else {
            continue;
        };

        let block = comment.text.starts_with("/*");
        let opener = if comment.text.starts_with("/**") { "/**" } else { "/*" };
        let lines: Vec<&str> = comment.text.split('\n').collect();
        let last = lines.len() - 1;

        let mut removed = 0;
        let mut kept: Vec<String> = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            if !is_blacklisted(line, blacklist) {
                kept.push((*line).to_string());
                continue;
            }
            removed += 1;
            let opens = (block && index == 0).then_some(opener);
            let closes = block && index == last && line.trim_end().ends_with("*/");
            kept.extend(leftover_delimiters(line, opens, closes));
        }
        if removed == 0 {
            continue;
        }

        let remaining = kept.join("\n");
        touched += 1;

        if remaining.trim_matches(is_comment_decoration).is_empty() {
            tracing::debug!(position, "removing boilerplate comment");
            stream.clear_at(position);
            remove_trailing_whitespace(stream, position);
            continue;
        }

        tracing::debug!(position, removed, "stripping boilerplate comment lines");
        let replacement = Token::new(comment.kind, remaining, comment.span);
        replace_token(stream, position, replacement);
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACKLIST: [&str; 2] = ["generated line", "another generated line"];

    fn filtered(source: &str) -> String {
        let mut stream = TokenStream::from_code(source).unwrap();
        filter_comments(&mut stream, &BLACKLIST);
        stream.generate_code()
    }

    #[test]
    fn test_single_line_comment_removed_with_its_line() {
        let source = "<?php\nfunction f()\n{\n    // generated line\n    return 1;\n}\n";
        assert_eq!(filtered(source), "<?php\nfunction f()\n{\n    return 1;\n}\n");
    }

    #[test]
    fn test_doc_comment_keeps_custom_line() {
        let source = "<?php\n/**\n * generated line\n * Custom text\n */\nclass A {}\n";
        assert_eq!(filtered(source), "<?php\n/**\n * Custom text\n */\nclass A {}\n");
    }

    #[test]
    fn test_doc_comment_with_only_blacklisted_lines_is_deleted() {
        let source = "<?php\n\n/**\n * generated line\n * another generated line\n */\nclass A {}\n";
        assert_eq!(filtered(source), "<?php\n\nclass A {}\n");
    }

    #[test]
    fn test_opening_line_keeps_its_delimiter() {
        let source = "<?php\n/** generated line\n * Custom\n */\nclass A {}\n";
        assert_eq!(filtered(source), "<?php\n/**\n * Custom\n */\nclass A {}\n");
    }

    #[test]
    fn test_closing_line_keeps_its_delimiter() {
        let source = "<?php\n/* Custom\n generated line */\n$a = 1;\n";
        assert_eq!(filtered(source), "<?php\n/* Custom\n */\n$a = 1;\n");
    }

    #[test]
    fn test_doc_comment_with_blacklisted_opener_and_closer_is_deleted() {
        let source = "<?php\n/** generated line\n * another generated line */\nclass A {}\n";
        assert_eq!(filtered(source), "<?php\nclass A {}\n");
    }

    #[test]
    fn test_rewritten_comment_keeps_kind_and_is_stable() {
        let mut stream = TokenStream::from_code("<?php\n/** generated line\n * Custom\n */\nclass A {}\n").unwrap();
        assert_eq!(filter_comments(&mut stream, &BLACKLIST), 1);
        let comment = stream.iter().find(|(_, t)| t.is_comment()).map(|(_, t)| t.clone()).unwrap();
        assert_eq!(comment.kind, crate::lexer::TokenKind::DocComment);
        assert_eq!(filter_comments(&mut stream, &BLACKLIST), 0);
    }

    #[test]
    fn test_partial_match_is_kept() {
        let source = "<?php\n// generated line, edited\n$a = 1;\n";
        assert_eq!(filtered(source), source);
    }

    #[test]
    fn test_strings_are_not_comments() {
        let source = "<?php\n$a = '// generated line';\n";
        assert_eq!(filtered(source), source);
    }

    #[test]
    fn test_block_comment_removed_hash_comment_kept() {
        // `#` is not decoration, so the hash comment's content never equals a blacklist entry.
        let source = "<?php\n# generated line\n/* generated line */\n$a = 1;\n";
        assert_eq!(filtered(source), "<?php\n# generated line\n$a = 1;\n");
    }

    #[test]
    fn test_returns_number_of_touched_comments() {
        let mut stream = TokenStream::from_code("<?php\n// generated line\n// other\n").unwrap();
        assert_eq!(filter_comments(&mut stream, &BLACKLIST), 1);
        assert_eq!(filter_comments(&mut stream, &BLACKLIST), 0);
    }

    #[test]
    fn test_empty_blacklist_is_noop() {
        let mut stream = TokenStream::from_code("<?php\n// generated line\n").unwrap();
        let empty: [&str; 0] = [];
        assert_eq!(filter_comments(&mut stream, &empty), 0);
        assert!(!stream.is_changed());
    }
}
