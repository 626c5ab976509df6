//! Structural element discovery: classy declarations and the methods inside them.
//!
//! Elements are found from the token stream alone. Anything that does not look like a well-formed declaration
//! (missing name, unbalanced braces) is skipped rather than reported.

use crate::lexer::TokenKind;
use crate::stream::TokenStream;
use tidyphp_core::lang::keywords::KeywordId;
use tidyphp_core::lang::punctuation::{self, PunctuationId};

/// Name given to `new class { ... }` declarations.
pub const ANONYMOUS_CLASS_NAME: &str = "class@anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Interface,
    Trait,
    Enum,
    Method,
}

impl ElementKind {
    /// Return `true` for declarations that own a member body (everything but methods).
    pub fn is_classy(self) -> bool {
        !matches!(self, ElementKind::Method)
    }

    fn from_keyword(id: KeywordId) -> Option<Self> {
        match id {
            KeywordId::Class => Some(ElementKind::Class),
            KeywordId::Interface => Some(ElementKind::Interface),
            KeywordId::Trait => Some(ElementKind::Trait),
            KeywordId::Enum => Some(ElementKind::Enum),
            _ => None,
        }
    }
}

/// A declaration located in the stream.
///
/// `start` is the first token of the declaration (its earliest modifier, or the keyword itself) and `end` its last
/// token: the closing brace, or the `;` of a bodiless method. `body` holds the braces when there are any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralElement {
    pub kind: ElementKind,
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub body: Option<(usize, usize)>,
}

impl StructuralElement {
    pub fn is_method(&self) -> bool {
        self.kind == ElementKind::Method
    }
}

/// Index of the bracket closing the one at `open`.
///
/// Only brackets of the same pair are counted; strings and comments are single tokens so their contents never
/// interfere.
pub fn find_block_end(stream: &TokenStream, open: usize) -> Option<usize> {
    let open_id = stream.get(open)?.punctuation_id()?;
    let close_id = punctuation::closing_pair(open_id)?;

    let mut depth = 0usize;
    for (index, token) in stream.iter().skip_while(|(i, _)| *i < open) {
        if token.is_punctuation(open_id) {
            depth += 1;
        } else if token.is_punctuation(close_id) {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Walk back from the first token of a declaration over the attribute groups and the doc comment attached to it.
///
/// Only whitespace may separate them from the declaration; a plain comment or any other token ends the walk.
pub fn find_decorated_start(stream: &TokenStream, start: usize) -> usize {
    let mut start = start;
    let mut doc_seen = false;
    while let Some(prev) = prev_non_whitespace(stream, start) {
        let Some(token) = stream.get(prev) else {
            break;
        };
        if token.is_punctuation(PunctuationId::RBracket) {
            match attribute_open(stream, prev) {
                Some(open) => start = open,
                None => break,
            }
        } else if token.kind == TokenKind::DocComment && !doc_seen {
            doc_seen = true;
            start = prev;
        } else {
            break;
        }
    }
    start
}

fn prev_non_whitespace(stream: &TokenStream, index: usize) -> Option<usize> {
    let mut cursor = stream.prev_live(index)?;
    while stream.get(cursor)?.kind == TokenKind::Whitespace {
        cursor = stream.prev_live(cursor)?;
    }
    Some(cursor)
}

/// The `#[` opening the group that `close` ends. `None` when the `]` belongs to a plain array.
fn attribute_open(stream: &TokenStream, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut cursor = close;
    loop {
        match stream.get(cursor)?.punctuation_id() {
            Some(PunctuationId::RBracket) => depth += 1,
            Some(opener @ (PunctuationId::LBracket | PunctuationId::AttributeStart)) => {
                depth -= 1;
                if depth == 0 {
                    return (opener == PunctuationId::AttributeStart).then_some(cursor);
                }
            }
            _ => {}
        }
        cursor = stream.prev_live(cursor)?;
    }
}

/// Every classy declaration and method in the stream, ordered by start index.
#[tracing::instrument(skip_all, fields(tokens = stream.len()))]
pub fn find_elements(stream: &TokenStream) -> Vec<StructuralElement> {
    let mut elements = Vec::new();
    for (index, token) in stream.iter() {
        let Some(kind) = token.keyword_id().and_then(ElementKind::from_keyword) else {
            continue;
        };
        let Some(classy) = classy_at(stream, index, kind) else {
            continue;
        };
        if let Some(body) = classy.body {
            elements.extend(methods_in_body(stream, body));
        }
        elements.push(classy);
    }
    elements.sort_by_key(|e| e.start);
    tracing::debug!(count = elements.len(), "found structural elements");
    elements
}

/// Methods only, ordered by start index.
pub fn find_methods(stream: &TokenStream) -> Vec<StructuralElement> {
    find_elements(stream).into_iter().filter(StructuralElement::is_method).collect()
}

fn classy_at(stream: &TokenStream, keyword: usize, kind: ElementKind) -> Option<StructuralElement> {
    let anonymous = kind == ElementKind::Class
        && stream
            .prev_meaningful(keyword)
            .and_then(|i| stream.get(i))
            .is_some_and(|t| t.is_keyword(KeywordId::New));

    let name = if anonymous {
        ANONYMOUS_CLASS_NAME.to_string()
    } else {
        let name_token = stream.get(stream.next_meaningful(keyword)?)?;
        if name_token.kind != TokenKind::Name {
            return None;
        }
        name_token.text.clone()
    };

    let open = find_body_open(stream, keyword)?;
    let close = find_block_end(stream, open)?;

    Some(StructuralElement {
        kind,
        name,
        start: declaration_start(stream, keyword),
        end: close,
        body: Some((open, close)),
    })
}

/// The `{` opening a classy body, skipping constructor arguments of anonymous classes. A `;` first means the
/// declaration is malformed.
fn find_body_open(stream: &TokenStream, keyword: usize) -> Option<usize> {
    let mut cursor = keyword;
    loop {
        cursor = stream.next_meaningful(cursor)?;
        let token = stream.get(cursor)?;
        match token.punctuation_id() {
            Some(PunctuationId::LBrace) => return Some(cursor),
            Some(PunctuationId::Semicolon | PunctuationId::RBrace) => return None,
            Some(PunctuationId::LParen) => cursor = find_block_end(stream, cursor)?,
            _ => {}
        }
    }
}

/// Walk back from a declaring keyword over its modifiers.
fn declaration_start(stream: &TokenStream, keyword: usize) -> usize {
    let mut start = keyword;
    while let Some(prev) = stream.prev_meaningful(start) {
        if !stream.get(prev).is_some_and(|t| t.kind.is_modifier()) {
            break;
        }
        start = prev;
    }
    start
}

/// Methods declared directly in a classy body. Nested bracket groups (method bodies, property defaults, trait
/// adaptation blocks) are stepped over.
fn methods_in_body(stream: &TokenStream, (open, close): (usize, usize)) -> Vec<StructuralElement> {
    let mut methods = Vec::new();
    let mut cursor = open + 1;
    while cursor < close {
        let Some(token) = stream.get(cursor) else {
            cursor += 1;
            continue;
        };

        if token.is_keyword(KeywordId::Function) {
            match method_at(stream, cursor, close) {
                Some(method) => {
                    cursor = method.end + 1;
                    methods.push(method);
                }
                None => cursor += 1,
            }
            continue;
        }

        match token.punctuation_id() {
            Some(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => {
                cursor = find_block_end(stream, cursor).map_or(close, |end| end + 1);
            }
            _ => cursor += 1,
        }
    }
    methods
}

fn method_at(stream: &TokenStream, keyword: usize, limit: usize) -> Option<StructuralElement> {
    let mut name_index = stream.next_meaningful(keyword)?;
    if stream.get(name_index)?.kind == TokenKind::Operator && stream.get(name_index)?.text == "&" {
        name_index = stream.next_meaningful(name_index)?;
    }
    let name_token = stream.get(name_index)?;
    if !name_token.is_name_like() {
        return None;
    }

    let params_open = stream.next_meaningful(name_index)?;
    if !stream.get(params_open)?.is_punctuation(PunctuationId::LParen) {
        return None;
    }
    let params_close = find_block_end(stream, params_open)?;

    // Return types may contain parenthesized DNF groups, so brackets are skipped until `{` or `;`.
    let mut cursor = params_close;
    let (end, body) = loop {
        cursor = stream.next_meaningful(cursor).filter(|&i| i < limit)?;
        match stream.get(cursor)?.punctuation_id() {
            Some(PunctuationId::Semicolon) => break (cursor, None),
            Some(PunctuationId::LBrace) => {
                let close = find_block_end(stream, cursor).filter(|&i| i < limit)?;
                break (close, Some((cursor, close)));
            }
            Some(PunctuationId::LParen) => cursor = find_block_end(stream, cursor)?,
            _ => {}
        }
    };

    Some(StructuralElement {
        kind: ElementKind::Method,
        name: name_token.text.clone(),
        start: declaration_start(stream, keyword),
        end,
        body,
    })
}
