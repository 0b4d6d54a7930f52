//! Lexical analysis.
//!
//! Converts source text into a token stream for the parser:
//!
//! - Tokenization with an ordered table of anchored regex patterns
//! - Keywords, identifiers, integer and float literals, operators
//! - Byte spans on every token for diagnostics
//! - `//` comments and whitespace are skipped

pub mod lexer;
pub mod tokens;
