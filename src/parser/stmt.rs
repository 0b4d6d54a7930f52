use crate::{
    ast::{
        statements::{
            BlockStmt, Constness, ExpressionStmt, ForInit, ForStmt, FunctionDef, IfStmt, Param,
            ReturnStmt, VarDecl, VariableScope, Visibility, WhileStmt,
        },
        NodeId, NodeKind,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    types::InferKind,
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    if let Some(handler) = parser.stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span;
    let span = parser.node_span(expression).to(end);

    Ok(parser.push_node(
        NodeKind::ExpressionStmt(ExpressionStmt { expression }),
        span,
    ))
}

/// One item at file level: a function or a global variable, optionally `pub`.
pub fn parse_top_level_item(parser: &mut Parser) -> Result<NodeId, Error> {
    let pub_span = if parser.current_token_kind() == TokenKind::Pub {
        Some(parser.advance().span)
    } else {
        None
    };
    let visibility = match pub_span {
        Some(_) => Visibility::Public,
        None => Visibility::Private,
    };

    match parser.current_token_kind() {
        TokenKind::Fn => parse_fn_decl(parser, visibility, pub_span),
        TokenKind::Const | TokenKind::Var => {
            parse_var_decl(parser, visibility, VariableScope::Global, pub_span)
        }
        _ => Err(parser.unexpected_detailed("expected a function or variable declaration")),
    }
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    parse_var_decl(parser, Visibility::Private, VariableScope::Local, None)
}

pub fn parse_var_decl(
    parser: &mut Parser,
    visibility: Visibility,
    scope: VariableScope,
    start: Option<Span>,
) -> Result<NodeId, Error> {
    let keyword = parser.advance();
    let constness = if keyword.kind == TokenKind::Const {
        Constness::Const
    } else {
        Constness::Var
    };

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let (declared_type, type_span) = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        let (ty, span) = parse_type(parser)?;
        (ty, Some(span))
    } else {
        let placeholder = parser
            .types()
            .not_yet_inferred(InferKind::VariableDeclaration);
        (placeholder, None)
    };

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Comma)?)
    } else {
        None
    };

    if constness == Constness::Const && initializer.is_none() {
        return Err(parser.unexpected_detailed("expected rhs in constant definition"));
    }

    let end = parser.expect(TokenKind::Semicolon)?.span;

    Ok(parser.push_node(
        NodeKind::VarDecl(VarDecl {
            visibility,
            constness,
            scope,
            declared_type,
            type_span,
            name: name.value,
            name_span: name.span,
            keyword_span: keyword.span,
            initializer,
        }),
        start.unwrap_or(keyword.span).to(end),
    ))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_block = parse_block_stmt(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(parse_if_stmt(parser)?)
        } else {
            Some(parse_block_stmt(parser)?)
        }
    } else {
        None
    };

    Ok(parser.push_node(
        NodeKind::If(IfStmt {
            condition,
            then_block,
            else_branch,
        }),
        start.to(parser.previous_span()),
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block_stmt(parser)?;

    Ok(parser.push_node(
        NodeKind::While(WhileStmt { condition, body }),
        start.to(parser.previous_span()),
    ))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span;
    parser.expect(TokenKind::OpenParen)?;

    let init = match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            None
        }
        TokenKind::Const | TokenKind::Var => Some(ForInit::Declaration(parse_var_decl(
            parser,
            Visibility::Private,
            VariableScope::Local,
            None,
        )?)),
        _ => {
            let expression = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;
            Some(ForInit::Expression(expression))
        }
    };

    let condition = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    let update = if parser.current_token_kind() != TokenKind::CloseParen {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block_stmt(parser)?;

    Ok(parser.push_node(
        NodeKind::For(ForStmt {
            init,
            condition,
            update,
            body,
        }),
        start.to(parser.previous_span()),
    ))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        // stray semicolons are empty statements
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        statements.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span;

    Ok(parser.push_node(NodeKind::Block(BlockStmt { statements }), start.to(end)))
}

pub fn parse_fn_decl(
    parser: &mut Parser,
    visibility: Visibility,
    start: Option<Span>,
) -> Result<NodeId, Error> {
    let fn_span = parser.expect(TokenKind::Fn)?.span;
    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let constness = if parser.current_token_kind() == TokenKind::Var {
            parser.advance();
            Constness::Var
        } else {
            Constness::Const
        };

        let param_name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let (ty, type_span) = parse_type(parser)?;

        params.push(Param {
            name: param_name.value,
            name_span: param_name.span,
            ty,
            type_span,
            constness,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let (return_type, return_type_span) = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        let (ty, span) = parse_type(parser)?;
        (ty, Some(span))
    } else {
        (parser.types().void(), None)
    };

    let body = parse_block_stmt(parser)?;
    let span = start.unwrap_or(fn_span).to(parser.node_span(body));

    Ok(parser.push_node(
        NodeKind::FunctionDef(FunctionDef {
            visibility,
            name: name.value,
            name_span: name.span,
            params,
            return_type,
            return_type_span,
            body,
        }),
        span,
    ))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?.span;

    Ok(parser.push_node(NodeKind::Return(ReturnStmt { value }), start.to(end)))
}
