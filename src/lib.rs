#![allow(clippy::module_inception)]

use std::ops::Range;

pub mod ast;
pub mod binding;
pub mod diagnostics;
pub mod driver;
pub mod errors;
pub mod flow;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;
pub mod types;
pub mod visitor;

extern crate regex;

pub use driver::{check_source, CheckedProgram, Compilation, CompilerOptions, ErrorPolicy};

/// Identifies a source file registered with a
/// [`SourceMap`](diagnostics::SourceMap).
pub type FileId = usize;

/// A byte range in one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub file: FileId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(file: FileId, start: usize, end: usize) -> Self {
        Span { file, start, end }
    }

    /// Zero-width span, used for insertion fix-its.
    pub fn point(file: FileId, position: usize) -> Self {
        Span::new(file, position, position)
    }

    /// Span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.file, self.start.min(other.start), self.end.max(other.end))
    }

    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}
