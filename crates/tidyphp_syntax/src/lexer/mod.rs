//! Lexer for PHP source files.
//!
//! Produces a **lossless** token list: concatenating every token's text gives back the input byte for byte.
//!
//! Handles:
//! - Inline HTML and open/close tags (`<?php`, `<?=`, `?>`)
//! - Whitespace and comments as first-class tokens
//! - Keywords (case-insensitive), names (including `Foo\Bar` qualified names) and variables
//! - String literals, heredoc/nowdoc, numbers
//! - Structural punctuation (registry-backed) and operators
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - Quoted string and heredoc/nowdoc scanning

mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::diagnostics::{LexError, LexErrorKind};
use crate::span::Span;
use tidyphp_core::lang::punctuation::{self, PunctuationId};

/// Operators the lexer recognises, longest spellings first.
const OPERATORS: &[&str] = &[
    "**=", "<=>", "===", "!==", "<<=", ">>=", "??=", "++", "--", "==", "!=", "<>", "<=", ">=", "&&", "||", "??",
    "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=", "^=", "<<", ">>", "**", "=", "+", "-", "*", "/", "%", ".", "<",
    ">", "!", "&", "|", "^", "~", "?", "@", "$", "\\",
];

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// [Inline HTML] → see `<?php` / `<?=` → [PHP code] → see `?>` → [Inline HTML]
// ============================================================================

/// Lexer for PHP source code.
///
/// Converts source text into a token list, handling:
/// - Switching between inline HTML and PHP mode
/// - Keywords vs. names (a word right after `->`, `?->` or `::` is always a name)
/// - Strings, heredocs and comments as single tokens, so their braces never affect structure
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    in_php: bool,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            in_php: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns the token list on success, or every error found on failure. Lexing never stops at the first
    /// error; the offending construct is consumed up to the end of input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<LexError>> {
        while !self.is_at_end() {
            if self.in_php {
                self.scan_token();
            } else {
                self.scan_inline_html();
            }
        }

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let text = &self.source[start..self.pos];
        self.tokens.push(Token::new(kind, text, Span::new(start, self.pos)));
    }

    fn error(&mut self, kind: LexErrorKind, start: usize) {
        self.errors.push(LexError::new(kind, Span::new(start, self.pos)));
    }

    /// Kind of the last token that is neither whitespace nor a comment.
    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|t| t.kind)
            .find(|k| !matches!(k, TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment))
    }

    // ========================================================================
    // Inline HTML
    // ========================================================================

    fn scan_inline_html(&mut self) {
        let start = self.pos;
        let rest = self.rest();

        let Some((offset, tag_len)) = find_open_tag(rest) else {
            self.pos = self.source.len();
            self.add_token(TokenKind::InlineHtml, start);
            return;
        };

        if offset > 0 {
            self.pos += offset;
            self.add_token(TokenKind::InlineHtml, start);
        }

        let tag_start = self.pos;
        self.pos += tag_len;
        self.add_token(TokenKind::OpenTag, tag_start);
        self.in_php = true;
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.pos;
        let rest = self.rest();

        if rest.starts_with("?>") {
            self.pos += 2;
            self.add_token(TokenKind::CloseTag, start);
            self.in_php = false;
            return;
        }
        if rest.starts_with("#[") {
            self.pos += 2;
            self.add_token(TokenKind::Punctuation(PunctuationId::AttributeStart), start);
            return;
        }
        if rest.starts_with('#') || rest.starts_with("//") {
            self.scan_line_comment(start);
            return;
        }
        if rest.starts_with("/*") {
            self.scan_block_comment(start);
            return;
        }
        if rest.starts_with("<<<") && self.scan_heredoc(start) {
            return;
        }

        let Some(c) = self.peek() else {
            return;
        };

        match c {
            c if is_php_whitespace(c) => {
                self.advance_while(is_php_whitespace);
                self.add_token(TokenKind::Whitespace, start);
            }
            '$' if self.peek_nth(1).is_some_and(is_ident_start) => {
                self.advance();
                self.advance_while(is_ident_continue);
                self.add_token(TokenKind::Variable, start);
            }
            '\'' | '"' | '`' => self.scan_quoted(start, c),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start),
            c if is_ident_start(c) => self.scan_name(start),
            '\\' if self.peek_nth(1).is_some_and(is_ident_start) => self.scan_name(start),
            _ => self.scan_symbol(start),
        }
    }

    fn scan_line_comment(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' || self.rest().starts_with("?>") {
                break;
            }
            self.advance();
        }
        self.add_token(TokenKind::Comment, start);
    }

    fn scan_block_comment(&mut self, start: usize) {
        let rest = self.rest();
        let kind = if rest.starts_with("/**") && rest[3..].starts_with(is_php_whitespace) {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };

        match rest[2..].find("*/") {
            Some(end) => self.pos += 2 + end + 2,
            None => {
                self.pos = self.source.len();
                self.error(LexErrorKind::UnterminatedComment, start);
            }
        }
        self.add_token(kind, start);
    }

    fn scan_name(&mut self, start: usize) {
        // Qualified names (`Foo\Bar`, `\Foo`, `namespace\Foo`) are a single token.
        loop {
            if self.peek() == Some('\\') {
                if !self.peek_nth(1).is_some_and(is_ident_start) {
                    break;
                }
                self.advance();
            }
            self.advance_while(is_ident_continue);
            if self.peek() != Some('\\') {
                break;
            }
        }

        let spelling = &self.source[start..self.pos];
        let after_member_access = matches!(
            self.last_significant(),
            Some(TokenKind::Punctuation(
                PunctuationId::Arrow | PunctuationId::NullsafeArrow | PunctuationId::ColonColon
            ))
        );

        match keyword_id(spelling) {
            Some(id) if !after_member_access => self.add_token(TokenKind::Keyword(id), start),
            _ => self.add_token(TokenKind::Name, start),
        }
    }

    fn scan_number(&mut self, start: usize) {
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.add_token(TokenKind::Number, start);
            return;
        }
        if rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            self.advance_while(|c| c == '0' || c == '1' || c == '_');
            self.add_token(TokenKind::Number, start);
            return;
        }

        self.advance_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }
        self.add_token(TokenKind::Number, start);
    }

    fn scan_symbol(&mut self, start: usize) {
        let rest = self.rest();

        if let Some((id, len)) = punctuation::longest_prefix(rest) {
            self.pos += len;
            self.add_token(TokenKind::Punctuation(id), start);
            return;
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.pos += op.len();
        } else {
            // Unknown character: keep it so output stays lossless.
            self.advance();
        }
        self.add_token(TokenKind::Operator, start);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Locate the next open tag in inline HTML.
///
/// Returns the byte offset of the tag and its length. Only `<?php` (followed by whitespace or end of input) and
/// `<?=` open PHP mode.
fn find_open_tag(html: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;
    while let Some(found) = html[search_from..].find("<?") {
        let offset = search_from + found;
        let candidate = &html[offset..];
        if candidate.starts_with("<?=") {
            return Some((offset, 3));
        }
        if candidate.get(..5).is_some_and(|tag| tag.eq_ignore_ascii_case("<?php")) {
            let terminated = candidate[5..].chars().next().is_none_or(is_php_whitespace);
            if terminated {
                return Some((offset, 5));
            }
        }
        search_from = offset + 2;
    }
    None
}

fn is_php_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Check if a character can start a PHP label (letters, `_`, and any non-ASCII byte).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue a PHP label.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tidyphp_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_lossless_round_trip() {
        let source = "<html>\n<?php\nnamespace App;\n\nfinal class A extends \\Base {\n    public function x(): string { return \"{$y}\"; }\n}\n?>\n</html>\n";
        let joined: String = texts(source).concat();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_inline_html_and_tags() {
        let tokens = lex("<p><?= $x ?></p>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert_eq!(tokens[1].text, "<?=");
        assert_eq!(tokens.last().unwrap().text, "</p>");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::CloseTag));
    }

    #[test]
    fn test_xml_declaration_stays_html() {
        let tokens = lex("<?xml version=\"1.0\"?>").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("<?php FINAL Class"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Keyword(KeywordId::Final),
                TokenKind::Keyword(KeywordId::Class),
            ]
        );
    }

    #[test]
    fn test_member_access_words_are_names() {
        assert_eq!(
            kinds("<?php Foo::class; $a->list;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Name,
                TokenKind::Punctuation(PunctuationId::ColonColon),
                TokenKind::Name,
                TokenKind::Punctuation(PunctuationId::Semicolon),
                TokenKind::Variable,
                TokenKind::Punctuation(PunctuationId::Arrow),
                TokenKind::Name,
                TokenKind::Punctuation(PunctuationId::Semicolon),
            ]
        );
    }

    #[test]
    fn test_qualified_names_are_single_tokens() {
        let tokens = lex("<?php use Doctrine\\Migrations\\AbstractMigration;").unwrap();
        let name = tokens.iter().find(|t| t.kind == TokenKind::Name).unwrap();
        assert_eq!(name.text, "Doctrine\\Migrations\\AbstractMigration");

        let tokens = lex("<?php new \\DateTime();").unwrap();
        let name = tokens.iter().find(|t| t.kind == TokenKind::Name).unwrap();
        assert_eq!(name.text, "\\DateTime");
    }

    #[test]
    fn test_comments() {
        let tokens = lex("<?php // one\n# two\n/* three */ /** four */ /**/").unwrap();
        let comments: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Comment | TokenKind::DocComment))
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            comments,
            vec![
                (TokenKind::Comment, "// one"),
                (TokenKind::Comment, "# two"),
                (TokenKind::Comment, "/* three */"),
                (TokenKind::DocComment, "/** four */"),
                (TokenKind::Comment, "/**/"),
            ]
        );
    }

    #[test]
    fn test_line_comment_stops_before_close_tag() {
        let tokens = lex("<?php // note ?>html").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment && t.text == "// note "));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::InlineHtml);
    }

    #[test]
    fn test_attribute_is_not_a_comment() {
        assert_eq!(
            kinds("<?php #[Attr]"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Punctuation(PunctuationId::AttributeStart),
                TokenKind::Name,
                TokenKind::Punctuation(PunctuationId::RBracket),
            ]
        );
    }

    #[test]
    fn test_strings_hide_braces() {
        let tokens = lex("<?php $a = \"{$b} }\"; $c = '{';").unwrap();
        let braces = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::RBrace)))
            .count();
        assert_eq!(braces, 0);
    }

    #[test]
    fn test_numbers() {
        for (src, text) in [("<?php 42;", "42"), ("<?php 1.5e-3;", "1.5e-3"), ("<?php 0xFF;", "0xFF"), ("<?php .5;", ".5")] {
            let tokens = lex(src).unwrap();
            let number = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
            assert_eq!(number.text, text);
        }
    }

    #[test]
    fn test_operators_longest_match() {
        let tokens = lex("<?php $a ??= $b <=> $c;").unwrap();
        let ops: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["??=", "<=>"]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let errors = lex("<?php $a = 'oops;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn test_unterminated_comment_is_an_error() {
        let errors = lex("<?php /* never closed").unwrap_err();
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_token_kind_snapshot() {
        let dump = lex("<?php return '';")
            .unwrap()
            .iter()
            .map(|t| format!("{:?}", t.kind))
            .collect::<Vec<_>>()
            .join(" ");
        insta::assert_snapshot!(
            dump,
            @"OpenTag Whitespace Keyword(Return) Whitespace StringLiteral Punctuation(Semicolon)"
        );
    }
}
