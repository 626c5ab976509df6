//! Index-stable token storage.
//!
//! A [`TokenStream`] is an arena of token slots. Removing a token tombstones its slot instead of splicing the
//! vector, so every index computed before a rewrite still points at the same token afterwards. Serialization
//! skips tombstoned slots.

use crate::diagnostics::LexError;
use crate::lexer::{self, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    token: Token,
    cleared: bool,
}

/// Ordered, mutable, index-addressed token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    slots: Vec<Slot>,
    revision: u64,
}

impl TokenStream {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            slots: tokens.into_iter().map(|token| Slot { token, cleared: false }).collect(),
            revision: 0,
        }
    }

    /// Lex `source` into a fresh stream.
    pub fn from_code(source: &str) -> Result<Self, Vec<LexError>> {
        lexer::lex(source).map(Self::from_tokens)
    }

    /// Number of slots, tombstoned ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Token at `index`, or `None` if the slot is cleared or out of range.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.slots.get(index).filter(|s| !s.cleared).map(|s| &s.token)
    }

    pub fn is_cleared(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.cleared)
    }

    /// Overwrite the slot at `index` (reviving it if it was cleared).
    ///
    /// Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, token: Token) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.cleared || slot.token != token {
            slot.token = token;
            slot.cleared = false;
            self.revision += 1;
        }
        true
    }

    /// Tombstone the slot at `index`. Out-of-range or already cleared slots are left alone.
    pub fn clear_at(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if !slot.cleared {
                slot.cleared = true;
                self.revision += 1;
            }
        }
    }

    /// Whether any slot was modified since the stream was built.
    pub fn is_changed(&self) -> bool {
        self.revision > 0
    }

    /// Number of effective mutations so far. Compare two readings to tell whether a pass changed anything.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Live tokens with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Token)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.cleared)
            .map(|(i, s)| (i, &s.token))
    }

    /// Index of the first live slot after `index`.
    pub fn next_live(&self, index: usize) -> Option<usize> {
        (index + 1..self.slots.len()).find(|&i| !self.slots[i].cleared)
    }

    /// Index of the last live slot before `index`.
    pub fn prev_live(&self, index: usize) -> Option<usize> {
        (0..index.min(self.slots.len())).rev().find(|&i| !self.slots[i].cleared)
    }

    /// Index of the next live token after `index` that is not whitespace or a comment.
    pub fn next_meaningful(&self, index: usize) -> Option<usize> {
        (index + 1..self.slots.len()).find(|&i| self.get(i).is_some_and(|t| !t.is_trivia()))
    }

    /// Index of the previous live token before `index` that is not whitespace or a comment.
    pub fn prev_meaningful(&self, index: usize) -> Option<usize> {
        (0..index.min(self.slots.len()))
            .rev()
            .find(|&i| self.get(i).is_some_and(|t| !t.is_trivia()))
    }

    /// Serialize the live tokens back to source text.
    pub fn generate_code(&self) -> String {
        self.iter().map(|(_, t)| t.text.as_str()).collect()
    }
}
