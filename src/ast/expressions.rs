use crate::{
    types::{FloatKind, IntKind, TypeId},
    Span,
};

use super::ast::NodeId;

/// Binary operators, including those that can be fused into an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    ShiftLeft,
    ShiftRight,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    BitAnd,
    BitOr,
    BitXor,
    Equals,
    NotEquals,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Add | BinaryOp::Sub
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::ShiftLeft | BinaryOp::ShiftRight)
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equals | BinaryOp::NotEquals)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Increment,
    Decrement,
    Plus,
    Minus,
    Not,
    BitNot,
}

impl PrefixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
            PrefixOp::Plus => "+",
            PrefixOp::Minus => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
        }
    }

    /// Whether the operator writes back to its operand.
    pub fn mutates(self) -> bool {
        matches!(self, PrefixOp::Increment | PrefixOp::Decrement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

/// The base an integer literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntBase {
    Dec,
    Hex,
    Oct,
    Bin,
}

impl IntBase {
    pub fn radix(self) -> u32 {
        match self {
            IntBase::Dec => 10,
            IntBase::Hex => 16,
            IntBase::Oct => 8,
            IntBase::Bin => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntBase::Dec => "dec",
            IntBase::Hex => "hex",
            IntBase::Oct => "oct",
            IntBase::Bin => "bin",
        }
    }
}

/// Reference to a named variable, parameter or function.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
}

/// Integer literal.
///
/// `text` holds the digits only: no base prefix, no suffix, no `_`
/// separators. Read the value through [`IntLiteral::value`], which honours
/// the base.
#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub base: IntBase,
    pub suffix: Option<IntKind>,
    pub text: String,
}

impl IntLiteral {
    /// The literal's magnitude, or `None` if it does not fit in 128 bits.
    pub fn value(&self) -> Option<u128> {
        u128::from_str_radix(&self.text, self.base.radix()).ok()
    }
}

/// Float literal. Integers with an `f32`/`f64` suffix also end up here.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub suffix: Option<FloatKind>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLiteral {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub op_span: Span,
    pub left: NodeId,
    pub right: NodeId,
}

/// `target = value` or a fused form such as `target += value`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub target: String,
    pub target_span: Span,
    pub op: Option<BinaryOp>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub operand: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub op: PostfixOp,
    pub operand: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub callee_span: Span,
    pub arguments: Vec<NodeId>,
}

/// `a, b, c`. Evaluates left to right and yields the last value.
#[derive(Debug, Clone, PartialEq)]
pub struct CommaExpr {
    pub expressions: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub operand: NodeId,
    pub target: TypeId,
    pub target_span: Span,
}
