//! Rewrite engine: in-place mutations on a [`TokenStream`].
//!
//! All operations are logical. Clearing tombstones slots, so index ranges discovered by the analyzer before a
//! rewrite stay valid for the rest of the pass.
//!
//! ## Module Structure
//!
//! - `comments` - Blacklist-driven comment line filtering

mod comments;

pub use comments::filter_comments;

use crate::lexer::{Token, TokenKind};
use crate::stream::TokenStream;

/// Clear every token in `[start, end]` (inclusive) and the whitespace trailing `end`.
///
/// Trimming the trailing whitespace keeps the removed region from leaving an empty line behind.
pub fn clear_range(stream: &mut TokenStream, start: usize, end: usize) {
    if start > end {
        return;
    }
    for index in start..=end {
        stream.clear_at(index);
    }
    remove_trailing_whitespace(stream, end);
    tracing::trace!(start, end, "cleared token range");
}

/// Substitute the token at `index`.
pub fn replace_token(stream: &mut TokenStream, index: usize, token: Token) {
    stream.set(index, token);
    tracing::trace!(index, "replaced token");
}

/// Remove the first live whitespace token after `index`, if there is one.
///
/// When that whitespace directly follows a live `//` or `#` comment, its first line break is kept: the comment
/// runs to the end of its line, and gluing the next token onto it would comment that token out.
pub fn remove_trailing_whitespace(stream: &mut TokenStream, index: usize) {
    let Some(ws_index) = stream.next_live(index) else {
        return;
    };
    let Some(ws) = stream.get(ws_index) else {
        return;
    };
    if ws.kind != TokenKind::Whitespace {
        return;
    }

    let after_line_comment = ws_index
        .checked_sub(1)
        .and_then(|prev| stream.get(prev))
        .is_some_and(Token::is_single_line_comment);

    if after_line_comment {
        let newline = leading_line_break(&ws.text);
        if newline.is_empty() || newline.len() == ws.text.len() {
            return;
        }
        let kept = Token::new(TokenKind::Whitespace, newline, ws.span);
        replace_token(stream, ws_index, kept);
        return;
    }

    stream.clear_at(ws_index);
}

/// The leading `\r\n`, `\n` or `\r` of `text`, or `""`.
fn leading_line_break(text: &str) -> &str {
    if text.starts_with("\r\n") {
        &text[..2]
    } else if text.starts_with('\n') || text.starts_with('\r') {
        &text[..1]
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_code(source).unwrap()
    }

    fn index_of(stream: &TokenStream, text: &str) -> usize {
        stream.iter().find(|(_, t)| t.text == text).map(|(i, _)| i).unwrap()
    }

    #[test]
    fn test_clear_range_trims_trailing_whitespace() {
        let mut s = stream("<?php\n$a = 1;\n\n$b = 2;\n");
        let start = index_of(&s, "$a");
        let end = start + 5; // `;`
        clear_range(&mut s, start, end);
        assert_eq!(s.generate_code(), "<?php\n$b = 2;\n");
    }

    #[test]
    fn test_clear_range_without_trailing_whitespace() {
        let mut s = stream("<?php $a;$b;");
        let a = index_of(&s, "$a");
        clear_range(&mut s, a, a + 1);
        assert_eq!(s.generate_code(), "<?php $b;");
    }

    #[test]
    fn test_clear_range_ignores_inverted_bounds() {
        let mut s = stream("<?php $a;");
        clear_range(&mut s, 3, 2);
        assert!(!s.is_changed());
    }

    #[test]
    fn test_remove_trailing_whitespace_after_line_comment_keeps_newline() {
        let mut s = stream("<?php // keep\n    $a;");
        let comment = index_of(&s, "// keep");
        remove_trailing_whitespace(&mut s, comment);
        assert_eq!(s.generate_code(), "<?php // keep\n$a;");
    }

    #[test]
    fn test_remove_trailing_whitespace_after_cleared_line_comment() {
        let mut s = stream("<?php\n    // gone\n    $a;");
        let comment = index_of(&s, "// gone");
        s.clear_at(comment);
        remove_trailing_whitespace(&mut s, comment);
        assert_eq!(s.generate_code(), "<?php\n    $a;");
    }

    #[test]
    fn test_remove_trailing_whitespace_noop_before_token() {
        let mut s = stream("<?php $a;");
        let a = index_of(&s, "$a");
        remove_trailing_whitespace(&mut s, a);
        assert!(!s.is_changed());
    }

    #[test]
    fn test_replace_token() {
        let mut s = stream("<?php /* old */");
        let comment = index_of(&s, "/* old */");
        replace_token(&mut s, comment, Token::synthetic(TokenKind::Comment, "/* new */"));
        assert_eq!(s.generate_code(), "<?php /* new */");
    }
}
