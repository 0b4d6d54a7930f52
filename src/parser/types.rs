//! Type annotation parsing.
//!
//! Supports:
//!
//! - Builtin type names (`i32`, `f64`, `bool`, `void`, ...)
//! - Function types, `fn(T, U) -> R`
//! - Any other name, kept as an unresolved type for the checker to reject
//!
//! Every type is interned as it is read; handlers return the handle and the
//! span the annotation covers.

use std::collections::HashMap;

use crate::{
    errors::errors::Error,
    lexer::tokens::TokenKind,
    types::TypeId,
    Span,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<(TypeId, Span), Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Fn, parse_fn_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<(TypeId, Span), Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    let ty = match parser.types().primitive(&token.value) {
        Some(ty) => ty,
        None => parser.types().unresolved(&token.value),
    };

    Ok((ty, token.span))
}

pub fn parse_fn_type(parser: &mut Parser) -> Result<(TypeId, Span), Error> {
    let start = parser.expect(TokenKind::Fn)?.span;
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parse_type(parser)?.0);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let ret = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parse_type(parser)?.0
    } else {
        parser.types().void()
    };

    let span = start.to(parser.previous_span());
    Ok((parser.types().function(ret, params), span))
}

pub fn parse_type(parser: &mut Parser) -> Result<(TypeId, Span), Error> {
    let handler = parser
        .type_nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected())?;

    handler(parser)
}
