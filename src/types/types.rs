use std::fmt::Display;

/// Handle to an interned [`Type`].
///
/// Two handles compare equal exactly when they name the same interned type,
/// so type equality anywhere in the compiler is a plain integer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Width and signedness of a primitive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntKind {
    pub const ALL: [IntKind; 8] = [
        IntKind::I8,
        IntKind::I16,
        IntKind::I32,
        IntKind::I64,
        IntKind::U8,
        IntKind::U16,
        IntKind::U32,
        IntKind::U64,
    ];

    pub fn from_name(name: &str) -> Option<IntKind> {
        match name {
            "i8" => Some(IntKind::I8),
            "i16" => Some(IntKind::I16),
            "i32" => Some(IntKind::I32),
            "i64" => Some(IntKind::I64),
            "u8" => Some(IntKind::U8),
            "u16" => Some(IntKind::U16),
            "u32" => Some(IntKind::U32),
            "u64" => Some(IntKind::U64),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            IntKind::I8 | IntKind::U8 => 8,
            IntKind::I16 | IntKind::U16 => 16,
            IntKind::I32 | IntKind::U32 => 32,
            IntKind::I64 | IntKind::U64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }

    /// Largest magnitude a literal of this kind may spell out.
    ///
    /// Literals carry no sign of their own, so a signed kind accepts values
    /// up to its positive maximum.
    pub fn max_literal(self) -> u128 {
        let value_bits = if self.is_signed() { self.bits() - 1 } else { self.bits() };
        (1u128 << value_bits) - 1
    }

    pub fn fits(self, value: u128) -> bool {
        value <= self.max_literal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub const ALL: [FloatKind; 2] = [FloatKind::F32, FloatKind::F64];

    pub fn from_name(name: &str) -> Option<FloatKind> {
        match name {
            "f32" => Some(FloatKind::F32),
            "f64" => Some(FloatKind::F64),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// The syntactic context that left a type undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferKind {
    /// Integer literal without a suffix.
    IntegerLiteral,
    /// Float literal without a suffix.
    FloatLiteral,
    /// Variable declared without a type annotation.
    VariableDeclaration,
    /// Any other expression before the type checker reaches it.
    Expression,
}

impl InferKind {
    pub const ALL: [InferKind; 4] = [
        InferKind::IntegerLiteral,
        InferKind::FloatLiteral,
        InferKind::VariableDeclaration,
        InferKind::Expression,
    ];

    pub fn is_literal(self) -> bool {
        matches!(self, InferKind::IntegerLiteral | InferKind::FloatLiteral)
    }
}

impl Display for InferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferKind::IntegerLiteral => write!(f, "integer literal"),
            InferKind::FloatLiteral => write!(f, "float literal"),
            InferKind::VariableDeclaration => write!(f, "<uninferred variable>"),
            InferKind::Expression => write!(f, "<unchecked expression>"),
        }
    }
}

/// The closed set of types known to the compiler.
///
/// Values of this enum only exist inside a
/// [`TypeInterner`](super::interner::TypeInterner); everything else passes
/// [`TypeId`] handles around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    Function { ret: TypeId, params: Vec<TypeId> },
    /// A user-written type name that names no known type yet.
    Unresolved(String),
    NotYetInferred(InferKind),
    /// Stands in for the type of anything that already failed to check.
    Error,
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Integer types together with the unsuffixed integer literal placeholder.
    pub fn is_integer_like(&self) -> bool {
        matches!(self, Type::Int(_) | Type::NotYetInferred(InferKind::IntegerLiteral))
    }

    /// Float types together with the unsuffixed float literal placeholder.
    pub fn is_float_like(&self) -> bool {
        matches!(self, Type::Float(_) | Type::NotYetInferred(InferKind::FloatLiteral))
    }

    pub fn literal_kind(&self) -> Option<InferKind> {
        match self {
            Type::NotYetInferred(kind) if kind.is_literal() => Some(*kind),
            _ => None,
        }
    }
}
