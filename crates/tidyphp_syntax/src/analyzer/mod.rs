//! Read-only structural queries over a [`TokenStream`].
//!
//! ## Module Structure
//!
//! - `elements` - Classy declarations and methods, bracket matching
//! - `sequences` - Token pattern matching over a range
//! - `classes` - `extends`/`implements` clauses and name resolution

mod classes;
mod elements;
mod sequences;

pub use classes::{ClassDeclaration, ImportMap, find_class_declarations, is_class_derived_from};
pub use elements::{
    ANONYMOUS_CLASS_NAME, ElementKind, StructuralElement, find_block_end, find_decorated_start, find_elements,
    find_methods,
};
pub use sequences::{PatternSequence, TokenPredicate, find_all_sequences};

use crate::stream::TokenStream;

/// Borrowing facade over the analysis functions, for callers that run several queries on one stream.
#[derive(Debug, Clone, Copy)]
pub struct TokensAnalyzer<'a> {
    stream: &'a TokenStream,
}

impl<'a> TokensAnalyzer<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self { stream }
    }

    pub fn elements(&self) -> Vec<StructuralElement> {
        find_elements(self.stream)
    }

    pub fn methods(&self) -> Vec<StructuralElement> {
        find_methods(self.stream)
    }

    /// First token of the declaration starting at `start`, including its attributes and doc comment.
    pub fn find_decorated_start(&self, start: usize) -> usize {
        find_decorated_start(self.stream, start)
    }

    pub fn class_declarations(&self) -> Vec<ClassDeclaration> {
        find_class_declarations(self.stream)
    }

    pub fn find_block_end(&self, open: usize) -> Option<usize> {
        find_block_end(self.stream, open)
    }

    pub fn find_all_sequences(&self, patterns: &[PatternSequence], start: usize, end: usize) -> Vec<usize> {
        find_all_sequences(self.stream, patterns, start, end)
    }

    pub fn is_class_derived_from<S: AsRef<str>>(&self, names: &[S]) -> bool {
        is_class_derived_from(self.stream, names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorated_start_through_facade() {
        let stream =
            TokenStream::from_code("<?php class A {\n    #[\\Override]\n    public function x() {}\n}").unwrap();
        let analyzer = TokensAnalyzer::new(&stream);
        let method = &analyzer.methods()[0];
        let start = analyzer.find_decorated_start(method.start);
        assert_eq!(stream.get(start).map(|t| t.text.as_str()), Some("#["));
        assert_eq!(stream.get(method.start).map(|t| t.text.as_str()), Some("public"));
    }
}
