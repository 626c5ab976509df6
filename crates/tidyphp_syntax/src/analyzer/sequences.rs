//! Sequence matching over a token range.
//!
//! A [`PatternSequence`] is a list of [`TokenPredicate`]s matched against consecutive tokens. Whitespace and
//! tombstoned slots between two matched tokens are skipped; comments are not, so `{ /* note */ return ''; }` does
//! not match `{ return ''; }`.

use crate::lexer::{Token, TokenKind};
use crate::stream::TokenStream;
use tidyphp_core::lang::keywords::KeywordId;
use tidyphp_core::lang::punctuation::PunctuationId;

/// Matches a single token: any token of a kind, or a token of a kind with exact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPredicate {
    kind: TokenKind,
    text: Option<String>,
}

impl TokenPredicate {
    /// Any token of `kind`.
    pub fn kind(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    /// A token of `kind` whose text is exactly `text`.
    pub fn exact(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
        }
    }

    /// The keyword `id`, in any spelling case.
    pub fn keyword(id: KeywordId) -> Self {
        Self::kind(TokenKind::Keyword(id))
    }

    pub fn punctuation(id: PunctuationId) -> Self {
        Self::kind(TokenKind::Punctuation(id))
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.kind == self.kind && self.text.as_deref().is_none_or(|text| text == token.text)
    }
}

/// Ordered list of token predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSequence {
    predicates: Vec<TokenPredicate>,
}

impl PatternSequence {
    pub fn new(predicates: Vec<TokenPredicate>) -> Self {
        Self { predicates }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Try to match the whole pattern with its first predicate on the token at `index`.
    ///
    /// ## Returns
    /// - The index of the token matched by the last predicate, if every predicate matched without going past
    ///   `range_end`.
    pub fn match_at(&self, stream: &TokenStream, index: usize, range_end: usize) -> Option<usize> {
        let (first, rest) = self.predicates.split_first()?;
        if index > range_end || !first.matches(stream.get(index)?) {
            return None;
        }

        let mut cursor = index;
        for predicate in rest {
            cursor = next_non_whitespace(stream, cursor).filter(|&i| i <= range_end)?;
            if !predicate.matches(stream.get(cursor)?) {
                return None;
            }
        }
        Some(cursor)
    }
}

impl FromIterator<TokenPredicate> for PatternSequence {
    fn from_iter<I: IntoIterator<Item = TokenPredicate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn next_non_whitespace(stream: &TokenStream, index: usize) -> Option<usize> {
    let mut cursor = index;
    loop {
        cursor = stream.next_live(cursor)?;
        if !stream.get(cursor)?.is_whitespace() {
            return Some(cursor);
        }
    }
}

/// Find every non-overlapping match of each pattern inside `[range_start, range_end]`.
///
/// Patterns are scanned independently, greedily left to right; after a match, scanning resumes right after its
/// last token. The start indices of all matches are returned in ascending order without duplicates.
pub fn find_all_sequences(
    stream: &TokenStream,
    patterns: &[PatternSequence],
    range_start: usize,
    range_end: usize,
) -> Vec<usize> {
    if stream.is_empty() || range_start > range_end {
        return Vec::new();
    }
    let range_end = range_end.min(stream.len() - 1);

    let mut starts = Vec::new();
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        let mut index = range_start;
        while index <= range_end {
            match pattern.match_at(stream, index, range_end) {
                Some(end) => {
                    starts.push(index);
                    index = end + 1;
                }
                None => index += 1,
            }
        }
    }

    starts.sort_unstable();
    starts.dedup();
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_return(literal: &str) -> PatternSequence {
        PatternSequence::new(vec![
            TokenPredicate::punctuation(PunctuationId::LBrace),
            TokenPredicate::keyword(KeywordId::Return),
            TokenPredicate::exact(TokenKind::StringLiteral, literal),
            TokenPredicate::punctuation(PunctuationId::Semicolon),
            TokenPredicate::punctuation(PunctuationId::RBrace),
        ])
    }

    fn all(source: &str, patterns: &[PatternSequence]) -> Vec<usize> {
        let stream = TokenStream::from_code(source).unwrap();
        find_all_sequences(&stream, patterns, 0, stream.len() - 1)
    }

    #[test]
    fn test_matches_across_whitespace() {
        let source = "<?php function a()\n{\n    return '';\n}";
        let stream = TokenStream::from_code(source).unwrap();
        let brace = stream.iter().find(|(_, t)| t.text == "{").map(|(i, _)| i).unwrap();
        assert_eq!(find_all_sequences(&stream, &[empty_return("''")], 0, stream.len() - 1), vec![brace]);
    }

    #[test]
    fn test_exact_text_must_match() {
        assert!(all("<?php { return 'x'; }", &[empty_return("''")]).is_empty());
        assert!(all("<?php { return \"\"; }", &[empty_return("''")]).is_empty());
        assert_eq!(all("<?php { return \"\"; }", &[empty_return("''"), empty_return("\"\"")]).len(), 1);
    }

    #[test]
    fn test_comments_break_a_match() {
        assert!(all("<?php { /* why */ return ''; }", &[empty_return("''")]).is_empty());
    }

    #[test]
    fn test_keyword_matches_any_case() {
        assert_eq!(all("<?php { RETURN ''; }", &[empty_return("''")]).len(), 1);
    }

    #[test]
    fn test_multiple_matches_are_sorted_and_non_overlapping() {
        let source = "<?php { return \"\"; } { return ''; } { return ''; }";
        let starts = all(source, &[empty_return("''"), empty_return("\"\"")]);
        assert_eq!(starts.len(), 3);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_match_must_fit_in_range() {
        let source = "<?php { return ''; }";
        let stream = TokenStream::from_code(source).unwrap();
        let close = stream.len() - 1;
        assert!(find_all_sequences(&stream, &[empty_return("''")], 0, close - 1).is_empty());
        assert_eq!(find_all_sequences(&stream, &[empty_return("''")], 0, close).len(), 1);
    }

    #[test]
    fn test_empty_pattern_and_inverted_range() {
        let stream = TokenStream::from_code("<?php {}").unwrap();
        assert!(find_all_sequences(&stream, &[PatternSequence::default()], 0, stream.len() - 1).is_empty());
        assert!(find_all_sequences(&stream, &[empty_return("''")], 3, 1).is_empty());
    }

    #[test]
    fn test_cleared_tokens_are_skipped() {
        let mut stream = TokenStream::from_code("<?php { /* x */ return ''; }").unwrap();
        let comment = stream.iter().find(|(_, t)| t.is_comment()).map(|(i, _)| i).unwrap();
        stream.clear_at(comment);
        assert_eq!(find_all_sequences(&stream, &[empty_return("''")], 0, stream.len() - 1).len(), 1);
    }
}
