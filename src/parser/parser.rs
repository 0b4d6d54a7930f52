//! Parser state and entry point.
//!
//! The parser is a Pratt parser with NUD/LED handlers for expressions and
//! dedicated functions for statements. It keeps lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix positions
//! - LED (left denotation) handlers for infix and postfix positions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{statements::CompilationUnit, Ast, NodeId, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    types::TypeInterner,
    FileId, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_top_level_item,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Parsing state: the token stream, the arena being filled and the
/// interner that receives every type annotation.
pub struct Parser<'t> {
    tokens: Vec<Token>,
    pos: usize,
    file: FileId,
    ast: Ast,
    types: &'t mut TypeInterner,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl<'t> Parser<'t> {
    pub fn new(mut tokens: Vec<Token>, types: &'t mut TypeInterner) -> Self {
        let file = tokens.first().map(|token| token.span.file).unwrap_or_default();

        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|token| token.span.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::point(file, end),
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            ast: Ast::new(),
            types,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous one. Never moves
    /// past the trailing EOF.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// Span of the last consumed token.
    pub fn previous_span(&self) -> Span {
        match self.pos {
            0 => Span::point(self.file, 0),
            pos => self.tokens[pos - 1].span,
        }
    }

    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            Err(error.unwrap_or_else(|| self.unexpected()))
        } else {
            Ok(self.advance())
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// `UnexpectedToken` at the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span,
        )
    }

    /// `UnexpectedTokenDetailed` at the current token.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token.span,
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn types(&mut self) -> &mut TypeInterner {
        &mut *self.types
    }

    pub fn push_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.ast.push(kind, span)
    }

    pub fn node_span(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    /// Takes back a just-parsed identifier node, returning its name and span.
    ///
    /// Used where the grammar wants a name rather than an expression: the
    /// target of an assignment and the callee of a call.
    pub fn take_identifier(&mut self, id: NodeId) -> Option<(String, Span)> {
        if !matches!(self.ast.kind(id), NodeKind::Identifier(_)) {
            return None;
        }

        let node = self.ast.pop(id)?;
        match node.kind {
            NodeKind::Identifier(identifier) => Some((identifier.name, node.span)),
            _ => None,
        }
    }

    pub fn stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn nud_handler(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn led_handler(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn type_nud_handler(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix or primary) handler for a token.
    ///
    /// Leaves the binding power alone: a token such as `-` is both a prefix
    /// operator and an infix one, and only the infix use has a precedence.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }
}

/// Parses a token stream into an [`Ast`] rooted at a `CompilationUnit`.
///
/// Type annotations are interned into `types` as they are read. Parsing
/// stops at the first syntax error.
pub fn parse(tokens: Vec<Token>, types: &mut TypeInterner) -> Result<Ast, Error> {
    let mut parser = Parser::new(tokens, types);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut items = vec![];

    while parser.has_tokens() {
        items.push(parse_top_level_item(&mut parser)?);
    }

    let end = parser.current_token().span.end;
    let span = Span::new(parser.file, 0, end);
    let root = parser.push_node(NodeKind::CompilationUnit(CompilationUnit { items }), span);

    let mut ast = parser.ast;
    ast.set_root(root);
    debug!(nodes = ast.len(), "parsed compilation unit");

    Ok(ast)
}
