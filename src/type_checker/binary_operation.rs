use crate::{
    ast::expressions::BinaryOp,
    types::{Type, TypeId, TypeInterner},
};

/// The type `left op right` evaluates to once both operands agree on
/// `operand`, or `None` when the operator does not apply to that type.
///
/// | operand         | arithmetic | bitwise, shift | ordering, equality | logical |
/// |-----------------|------------|----------------|--------------------|---------|
/// | integer         | operand    | operand        | bool               | -       |
/// | float           | operand    | -              | bool               | -       |
/// | bool            | -          | -              | bool (equality)    | bool    |
///
/// Integer and float literal placeholders count as integer and float.
pub fn binary_result_type(types: &TypeInterner, op: BinaryOp, operand: TypeId) -> Option<TypeId> {
    let ty = types.get(operand);

    if ty.is_integer_like() {
        if op.is_arithmetic() || op.is_bitwise() || op.is_shift() {
            Some(operand)
        } else if op.is_ordering() || op.is_equality() {
            Some(types.bool())
        } else {
            None
        }
    } else if ty.is_float_like() {
        if op.is_arithmetic() {
            Some(operand)
        } else if op.is_ordering() || op.is_equality() {
            Some(types.bool())
        } else {
            None
        }
    } else if *ty == Type::Bool {
        if op.is_equality() || op.is_logical() {
            Some(types.bool())
        } else {
            None
        }
    } else {
        None
    }
}

/// Whether `from as to` is a valid cast.
///
/// Numbers convert freely between each other, `bool` converts to any
/// integer, and any type may be cast to itself.
pub fn is_valid_cast(types: &TypeInterner, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }

    let (from, to) = (types.get(from), types.get(to));
    let numeric_source = from.is_integer_like() || from.is_float_like();

    (numeric_source && to.is_numeric()) || (*from == Type::Bool && to.is_integer())
}
