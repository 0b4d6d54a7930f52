use std::{collections::HashMap, fmt::Display};

use tracing::trace;

use super::types::{FloatKind, InferKind, IntKind, Type, TypeId};

/// Handles for the types every compilation needs, interned up front so they
/// can be fetched through a shared reference.
#[derive(Debug, Clone)]
struct CommonTypes {
    void: TypeId,
    bool: TypeId,
    error: TypeId,
    ints: [TypeId; 8],
    floats: [TypeId; 2],
    inferred: [TypeId; 4],
}

/// Owns every type of one compilation.
///
/// Each distinct [`Type`] is stored once and addressed by its [`TypeId`].
/// Asking for the same type twice yields the same handle, so comparing
/// handles is comparing types. Nothing is ever evicted.
#[derive(Debug, Clone)]
pub struct TypeInterner {
    types: Vec<Type>,
    lookup: HashMap<Type, TypeId>,
    common: CommonTypes,
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut types = Vec::new();
        let mut lookup = HashMap::new();

        let mut add = |ty: Type| -> TypeId {
            let id = TypeId(types.len() as u32);
            types.push(ty.clone());
            lookup.insert(ty, id);
            id
        };

        let void = add(Type::Void);
        let bool = add(Type::Bool);
        let error = add(Type::Error);
        let ints = IntKind::ALL.map(|kind| add(Type::Int(kind)));
        let floats = FloatKind::ALL.map(|kind| add(Type::Float(kind)));
        let inferred = InferKind::ALL.map(|kind| add(Type::NotYetInferred(kind)));

        TypeInterner {
            types,
            lookup,
            common: CommonTypes {
                void,
                bool,
                error,
                ints,
                floats,
                inferred,
            },
        }
    }

    /// Returns the handle for `ty`, interning it on first sight.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(id) = self.lookup.get(&ty) {
            return *id;
        }

        let id = TypeId(self.types.len() as u32);
        trace!(id = id.0, ty = ?ty, "interned type");
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn void(&self) -> TypeId {
        self.common.void
    }

    pub fn bool(&self) -> TypeId {
        self.common.bool
    }

    pub fn error(&self) -> TypeId {
        self.common.error
    }

    pub fn int(&self, kind: IntKind) -> TypeId {
        let index = match kind {
            IntKind::I8 => 0,
            IntKind::I16 => 1,
            IntKind::I32 => 2,
            IntKind::I64 => 3,
            IntKind::U8 => 4,
            IntKind::U16 => 5,
            IntKind::U32 => 6,
            IntKind::U64 => 7,
        };
        self.common.ints[index]
    }

    pub fn float(&self, kind: FloatKind) -> TypeId {
        match kind {
            FloatKind::F32 => self.common.floats[0],
            FloatKind::F64 => self.common.floats[1],
        }
    }

    pub fn not_yet_inferred(&self, kind: InferKind) -> TypeId {
        match kind {
            InferKind::IntegerLiteral => self.common.inferred[0],
            InferKind::FloatLiteral => self.common.inferred[1],
            InferKind::VariableDeclaration => self.common.inferred[2],
            InferKind::Expression => self.common.inferred[3],
        }
    }

    pub fn function(&mut self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        self.intern(Type::Function { ret, params })
    }

    pub fn unresolved(&mut self, name: &str) -> TypeId {
        self.intern(Type::Unresolved(name.to_string()))
    }

    /// Looks up a builtin type by its source spelling.
    pub fn primitive(&self, name: &str) -> Option<TypeId> {
        if let Some(kind) = IntKind::from_name(name) {
            return Some(self.int(kind));
        }
        if let Some(kind) = FloatKind::from_name(name) {
            return Some(self.float(kind));
        }

        match name {
            "bool" => Some(self.bool()),
            "void" => Some(self.void()),
            _ => None,
        }
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        id == self.common.error
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        id == self.common.void
    }

    pub fn is_bool(&self, id: TypeId) -> bool {
        id == self.common.bool
    }

    /// The unsuffixed literal kind `id` stands for, if it is a literal placeholder.
    pub fn literal_kind(&self, id: TypeId) -> Option<InferKind> {
        self.get(id).literal_kind()
    }

    /// The type an unconstrained literal placeholder settles on.
    pub fn default_type(&self, id: TypeId) -> Option<TypeId> {
        match self.literal_kind(id)? {
            InferKind::IntegerLiteral => Some(self.int(IntKind::I32)),
            InferKind::FloatLiteral => Some(self.float(FloatKind::F32)),
            InferKind::VariableDeclaration | InferKind::Expression => None,
        }
    }

    /// The type two operands agree on without an explicit cast.
    ///
    /// Identical types agree trivially. Otherwise only a literal placeholder
    /// may give way, to a primitive of its own category. Integer and float
    /// primitives never convert into one another or change width.
    pub fn coerce(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }

        match (self.get(a), self.get(b)) {
            (Type::NotYetInferred(InferKind::IntegerLiteral), Type::Int(_)) => Some(b),
            (Type::Int(_), Type::NotYetInferred(InferKind::IntegerLiteral)) => Some(a),
            (Type::NotYetInferred(InferKind::FloatLiteral), Type::Float(_)) => Some(b),
            (Type::Float(_), Type::NotYetInferred(InferKind::FloatLiteral)) => Some(a),
            _ => None,
        }
    }

    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { interner: self, id }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a type the way it is spelled in source.
pub struct TypeDisplay<'a> {
    interner: &'a TypeInterner,
    id: TypeId,
}

impl Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.interner.get(self.id) {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int(kind) => write!(f, "{}", kind.name()),
            Type::Float(kind) => write!(f, "{}", kind.name()),
            Type::Function { ret, params } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.interner.display(*param))?;
                }
                write!(f, ") -> {}", self.interner.display(*ret))
            }
            Type::Unresolved(name) => write!(f, "{}", name),
            Type::NotYetInferred(kind) => write!(f, "{}", kind),
            Type::Error => write!(f, "<error>"),
        }
    }
}
