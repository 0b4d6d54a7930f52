use crate::{
    ast::{
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOp, BoolLiteral, CallExpr, CastExpr, CommaExpr,
            FloatLiteral, IdentifierExpr, IntBase, IntLiteral, PostfixExpr, PostfixOp, PrefixExpr,
            PrefixOp,
        },
        NodeId, NodeKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    types::{FloatKind, IntKind},
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let nud = parser
        .nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected())?;
    let mut left = nud(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    while parser.binding_power(parser.current_token_kind()) > bp {
        let kind = parser.current_token_kind();
        let led = parser.led_handler(kind).ok_or_else(|| parser.unexpected())?;
        let led_bp = parser.binding_power(kind);

        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(parser.push_node(
                NodeKind::Identifier(IdentifierExpr { name: token.value }),
                token.span,
            ))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Ok(parser.push_node(
                NodeKind::BoolLiteral(BoolLiteral {
                    value: token.kind == TokenKind::True,
                }),
                token.span,
            ))
        }
        _ => Err(parser.unexpected()),
    }
}

fn number_error(token: &Token) -> Error {
    Error::new(
        ErrorImpl::NumberParseError {
            token: token.value.clone(),
        },
        token.span,
    )
}

enum NumberSuffix {
    Int(IntKind),
    Float(FloatKind),
}

/// Splits a width suffix off the digits. Hex digits may end in `f`, so hex
/// literals only take integer suffixes.
fn split_suffix(digits: &str, base: IntBase) -> (&str, Option<NumberSuffix>) {
    if base == IntBase::Dec {
        for kind in FloatKind::ALL {
            if let Some(rest) = digits.strip_suffix(kind.name()) {
                return (rest, Some(NumberSuffix::Float(kind)));
            }
        }
    }

    for kind in IntKind::ALL {
        if let Some(rest) = digits.strip_suffix(kind.name()) {
            return (rest, Some(NumberSuffix::Int(kind)));
        }
    }

    (digits, None)
}

fn split_base(value: &str) -> (IntBase, &str) {
    if let Some(rest) = value.strip_prefix("0x") {
        (IntBase::Hex, rest)
    } else if let Some(rest) = value.strip_prefix("0o") {
        (IntBase::Oct, rest)
    } else if let Some(rest) = value.strip_prefix("0b") {
        (IntBase::Bin, rest)
    } else {
        (IntBase::Dec, value)
    }
}

pub fn parse_integer_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();

    let (base, rest) = split_base(&token.value);
    let (digits, suffix) = split_suffix(rest, base);
    let text: String = digits.chars().filter(|c| *c != '_').collect();

    if text.is_empty() {
        return Err(number_error(&token));
    }

    let kind = match suffix {
        // `1f32` is a float spelled without a fraction
        Some(NumberSuffix::Float(kind)) => NodeKind::FloatLiteral(FloatLiteral {
            suffix: Some(kind),
            text,
        }),
        Some(NumberSuffix::Int(kind)) => NodeKind::IntLiteral(IntLiteral {
            base,
            suffix: Some(kind),
            text,
        }),
        None => NodeKind::IntLiteral(IntLiteral {
            base,
            suffix: None,
            text,
        }),
    };

    Ok(parser.push_node(kind, token.span))
}

pub fn parse_float_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();

    let (digits, suffix) = FloatKind::ALL
        .into_iter()
        .find_map(|kind| {
            token
                .value
                .strip_suffix(kind.name())
                .map(|rest| (rest, Some(kind)))
        })
        .unwrap_or((token.value.as_str(), None));
    let text: String = digits.chars().filter(|c| *c != '_').collect();

    if text.parse::<f64>().is_err() {
        return Err(number_error(&token));
    }

    Ok(parser.push_node(
        NodeKind::FloatLiteral(FloatLiteral { suffix, text }),
        token.span,
    ))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::And => BinaryOp::LogicalAnd,
        TokenKind::Or => BinaryOp::LogicalOr,
        _ => return None,
    };

    Some(op)
}

/// The operator fused into a compound assignment, `None` for plain `=`.
fn compound_operator(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusEquals => Some(BinaryOp::Add),
        TokenKind::MinusEquals => Some(BinaryOp::Sub),
        TokenKind::StarEquals => Some(BinaryOp::Mul),
        TokenKind::SlashEquals => Some(BinaryOp::Div),
        TokenKind::PercentEquals => Some(BinaryOp::Mod),
        TokenKind::ShiftLeftEquals => Some(BinaryOp::ShiftLeft),
        TokenKind::ShiftRightEquals => Some(BinaryOp::ShiftRight),
        TokenKind::AmpersandEquals => Some(BinaryOp::BitAnd),
        TokenKind::PipeEquals => Some(BinaryOp::BitOr),
        TokenKind::CaretEquals => Some(BinaryOp::BitXor),
        _ => None,
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let op = binary_operator(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span,
        )
    })?;

    let right = parse_expr(parser, bp)?;
    let span = parser.node_span(left).to(parser.node_span(right));

    Ok(parser.push_node(
        NodeKind::Binary(BinaryExpr {
            op,
            op_span: operator_token.span,
            left,
            right,
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let op = match operator_token.kind {
        TokenKind::PlusPlus => PrefixOp::Increment,
        TokenKind::MinusMinus => PrefixOp::Decrement,
        TokenKind::Plus => PrefixOp::Plus,
        TokenKind::Dash => PrefixOp::Minus,
        TokenKind::Not => PrefixOp::Not,
        TokenKind::Tilde => PrefixOp::BitNot,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.span,
            ))
        }
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = operator_token.span.to(parser.node_span(operand));

    Ok(parser.push_node(NodeKind::Prefix(PrefixExpr { op, operand }), span))
}

pub fn parse_postfix_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let op = if operator_token.kind == TokenKind::PlusPlus {
        PostfixOp::Increment
    } else {
        PostfixOp::Decrement
    };

    let span = parser.node_span(left).to(operator_token.span);

    Ok(parser.push_node(
        NodeKind::Postfix(PostfixExpr { op, operand: left }),
        span,
    ))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let left_span = parser.node_span(left);
    let operator_token = parser.advance();

    let (target, target_span) = parser.take_identifier(left).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: operator_token.value.clone(),
                message: String::from("left side of an assignment must be a variable name"),
            },
            left_span,
        )
    })?;

    // Right associative: `a = b = c` assigns `c` to `b` first.
    let value = parse_expr(parser, BindingPower::Comma)?;
    let span = target_span.to(parser.node_span(value));

    Ok(parser.push_node(
        NodeKind::Assignment(AssignmentExpr {
            target,
            target_span,
            op: compound_operator(operator_token.kind),
            value,
        }),
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let left_span = parser.node_span(left);
    let (callee, callee_span) = parser.take_identifier(left).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: String::from("("),
                message: String::from("only named functions can be called"),
            },
            left_span,
        )
    })?;

    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(parser.push_node(
        NodeKind::Call(CallExpr {
            callee,
            callee_span,
            arguments,
        }),
        callee_span.to(close.span),
    ))
}

pub fn parse_comma_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let mut expressions = vec![left];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        expressions.push(parse_expr(parser, BindingPower::Comma)?);
    }

    let last = expressions[expressions.len() - 1];
    let span = parser.node_span(left).to(parser.node_span(last));

    Ok(parser.push_node(NodeKind::Comma(CommaExpr { expressions }), span))
}

pub fn parse_cast_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::As)?;
    let (target, target_span) = parse_type(parser)?;
    let span = parser.node_span(left).to(target_span);

    Ok(parser.push_node(
        NodeKind::Cast(CastExpr {
            operand: left,
            target,
            target_span,
        }),
        span,
    ))
}
