//! String literal scanning: quoted strings, backticks and heredoc/nowdoc.
//!
//! Interpolation is not split out; the whole literal is one token.

use super::{Lexer, TokenKind, is_ident_continue, is_ident_start};
use crate::diagnostics::LexErrorKind;

impl<'a> Lexer<'a> {
    /// Scan a `'...'`, `"..."` or `` `...` `` literal starting at the opening quote.
    pub(super) fn scan_quoted(&mut self, start: usize, quote: char) {
        self.advance();
        while let Some(c) = self.advance() {
            if c == '\\' {
                self.advance();
                continue;
            }
            if c == quote {
                self.add_token(TokenKind::StringLiteral, start);
                return;
            }
        }
        self.error(LexErrorKind::UnterminatedString, start);
        self.add_token(TokenKind::StringLiteral, start);
    }

    /// Scan a heredoc (`<<<EOT`, `<<<"EOT"`) or nowdoc (`<<<'EOT'`) starting at `<<<`.
    ///
    /// Returns `false` without consuming anything when the header is not a valid heredoc opener, so the caller can
    /// fall back to operators. The closing label may be indented (PHP 7.3 flexible heredoc); the token ends right
    /// after it.
    pub(super) fn scan_heredoc(&mut self, start: usize) -> bool {
        let rest = self.rest();
        let mut cursor = 3;

        cursor += rest[cursor..].len() - rest[cursor..].trim_start_matches([' ', '\t']).len();

        let quote = rest[cursor..].chars().next().filter(|c| *c == '\'' || *c == '"');
        if quote.is_some() {
            cursor += 1;
        }

        if !rest[cursor..].starts_with(is_ident_start) {
            return false;
        }
        let label_len = rest[cursor..]
            .find(|c: char| !is_ident_continue(c))
            .unwrap_or(rest.len() - cursor);
        let label = &rest[cursor..cursor + label_len];
        cursor += label_len;

        if let Some(q) = quote {
            if !rest[cursor..].starts_with(q) {
                return false;
            }
            cursor += 1;
        }

        if rest[cursor..].starts_with("\r\n") {
            cursor += 2;
        } else if rest[cursor..].starts_with('\n') {
            cursor += 1;
        } else {
            return false;
        }

        let mut line_start = cursor;
        loop {
            let line = &rest[line_start..];
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            let body = &line[indent..];
            if body.starts_with(label) && !body[label.len()..].starts_with(is_ident_continue) {
                self.pos += line_start + indent + label.len();
                self.add_token(TokenKind::Heredoc, start);
                return true;
            }
            match line.find('\n') {
                Some(nl) => line_start += nl + 1,
                None => break,
            }
        }

        self.pos = self.source.len();
        self.error(LexErrorKind::UnterminatedHeredoc, start);
        self.add_token(TokenKind::Heredoc, start);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::LexErrorKind;
    use crate::lexer::{TokenKind, lex};

    fn single(source: &str, kind: TokenKind) -> String {
        lex(source)
            .unwrap()
            .into_iter()
            .find(|t| t.kind == kind)
            .map(|t| t.text)
            .unwrap()
    }

    #[test]
    fn test_single_quoted_escapes() {
        assert_eq!(single(r"<?php 'it\'s';", TokenKind::StringLiteral), r"'it\'s'");
    }

    #[test]
    fn test_double_quoted_keeps_interpolation() {
        assert_eq!(single(r#"<?php "a {$b->c} \" d";"#, TokenKind::StringLiteral), r#""a {$b->c} \" d""#);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(single("<?php return '';", TokenKind::StringLiteral), "''");
        assert_eq!(single("<?php return \"\";", TokenKind::StringLiteral), "\"\"");
    }

    #[test]
    fn test_heredoc() {
        let source = "<?php $sql = <<<SQL\nSELECT '{';\nSQL;\n";
        assert_eq!(single(source, TokenKind::Heredoc), "<<<SQL\nSELECT '{';\nSQL");
    }

    #[test]
    fn test_nowdoc_with_indented_terminator() {
        let source = "<?php\n    $a = <<<'EOT'\n        body EOT_NOT_END\n        EOT;\n";
        assert_eq!(
            single(source, TokenKind::Heredoc),
            "<<<'EOT'\n        body EOT_NOT_END\n        EOT"
        );
    }

    #[test]
    fn test_unterminated_heredoc() {
        let errors = lex("<?php <<<EOT\nnever ends\n").unwrap_err();
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedHeredoc);
    }

    #[test]
    fn test_shift_operator_is_not_heredoc() {
        let tokens = lex("<?php $a <<= 1;").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Operator && t.text == "<<="));
    }
}
