use std::fmt::Display;

use codespan_reporting::diagnostic::Severity;
use thiserror::Error;

use crate::Span;

/// Source edit offered alongside a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixIt {
    pub span: Span,
    pub replacement: String,
}

/// Which stage of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntax,
    Binding,
    Type,
    Flow,
    Lint,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
    extra_spans: Vec<(Span, String)>,
    fixits: Vec<FixIt>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
            extra_spans: vec![],
            fixits: vec![],
        }
    }

    /// Points at a second location, e.g. an earlier declaration.
    pub fn with_extra_span(mut self, span: Span, message: impl Into<String>) -> Self {
        self.extra_spans.push((span, message.into()));
        self
    }

    pub fn with_fixit(mut self, span: Span, replacement: impl Into<String>) -> Self {
        self.fixits.push(FixIt {
            span,
            replacement: replacement.into(),
        });
        self
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_extra_spans(&self) -> &[(Span, String)] {
        &self.extra_spans
    }

    pub fn get_fixits(&self) -> &[FixIt] {
        &self.fixits
    }

    pub fn get_severity(&self) -> Severity {
        self.internal_error.severity()
    }

    pub fn get_category(&self) -> ErrorCategory {
        self.internal_error.category()
    }

    pub fn is_error(&self) -> bool {
        self.get_severity() >= Severity::Error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SymbolAlreadyDeclared { .. } => "SymbolAlreadyDeclared",
            ErrorImpl::SymbolNotDeclared { .. } => "SymbolNotDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::CannotInferType { .. } => "CannotInferType",
            ErrorImpl::VariableTypeMismatch { .. } => "VariableTypeMismatch",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::UnresolvableOperator { .. } => "UnresolvableOperator",
            ErrorImpl::UnaryOperandMismatch { .. } => "UnaryOperandMismatch",
            ErrorImpl::AssignToConstant { .. } => "AssignToConstant",
            ErrorImpl::NotAssignable => "NotAssignable",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::EmptyReturn { .. } => "EmptyReturn",
            ErrorImpl::ValueReturnInVoid { .. } => "ValueReturnInVoid",
            ErrorImpl::NonBoolCondition { .. } => "NonBoolCondition",
            ErrorImpl::InvalidCast { .. } => "InvalidCast",
            ErrorImpl::LiteralOutOfRange { .. } => "LiteralOutOfRange",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::UnreachableCode => "UnreachableCode",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, check the digits against its base",
                token
            )),
            ErrorImpl::SymbolAlreadyDeclared { name } => ErrorTip::Suggestion(format!(
                "Rename one of the declarations of `{}` or move it into a nested block",
                name
            )),
            ErrorImpl::SymbolNotDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` must be declared before it is used",
                name
            )),
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "`{}` is not a builtin type; expected one of i8..i64, u8..u64, f32, f64, bool, void",
                type_
            )),
            ErrorImpl::CannotInferType { variable } => ErrorTip::Suggestion(format!(
                "Add a type annotation or an initializer to `{}`",
                variable
            )),
            ErrorImpl::OperandTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "Operands are never converted implicitly, use `as` to cast one of them",
            )),
            ErrorImpl::AssignToConstant { name } => ErrorTip::Suggestion(format!(
                "Declare `{}` with `var` to make it mutable",
                name
            )),
            ErrorImpl::MissingArguments { expected, received }
            | ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Add a `return` on every path through `{}`",
                function
            )),
            ErrorImpl::LiteralOutOfRange { type_, .. } => ErrorTip::Suggestion(format!(
                "Use a wider type than `{}` or a smaller literal",
                type_
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Syntax
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Binding
    #[error("symbol `{name}` is already declared in this scope")]
    SymbolAlreadyDeclared { name: String },
    #[error("undefined symbol `{name}`")]
    SymbolNotDeclared { name: String },

    // Typing
    #[error("unknown type `{type_}`")]
    UnknownType { type_: String },
    #[error("cannot infer the type of `{variable}`")]
    CannotInferType { variable: String },
    #[error("mismatched types in declaration: expected `{expected}`, found `{received}`")]
    VariableTypeMismatch { expected: String, received: String },
    #[error("mismatched types in assignment: expected `{expected}`, found `{received}`")]
    AssignmentTypeMismatch { expected: String, received: String },
    #[error("mismatched operand types: `{left}` and `{right}`")]
    OperandTypeMismatch { left: String, right: String },
    #[error("cannot apply operator `{operator}` to `{left}` and `{right}`")]
    UnresolvableOperator {
        operator: String,
        left: String,
        right: String,
    },
    #[error("operator `{operator}` expects {expected} operand, found `{received}`")]
    UnaryOperandMismatch {
        operator: String,
        expected: String,
        received: String,
    },
    #[error("cannot assign to constant `{name}`")]
    AssignToConstant { name: String },
    #[error("operand of increment or decrement must be a variable")]
    NotAssignable,
    #[error("`{name}` is not a function")]
    NotCallable { name: String },
    #[error("missing arguments: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("unexpected arguments: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected `{expected}`, found `{received}`")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("mismatched return type: expected `{expected}`, found `{received}`")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("empty return in function returning `{expected}`")]
    EmptyReturn { expected: String },
    #[error("function `{function}` returns void but a value is returned")]
    ValueReturnInVoid { function: String },
    #[error("condition of {construct} must be `bool`, found `{received}`")]
    NonBoolCondition { construct: String, received: String },
    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast { from: String, to: String },
    #[error("literal `{literal}` does not fit in `{type_}`")]
    LiteralOutOfRange { literal: String, type_: String },

    // Flow
    #[error("function `{function}` does not return a value on all code paths")]
    MissingReturn { function: String },

    // Lints
    #[error("unreachable statement after return")]
    UnreachableCode,
}

impl ErrorImpl {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorCategory::Syntax,
            ErrorImpl::SymbolAlreadyDeclared { .. } | ErrorImpl::SymbolNotDeclared { .. } => {
                ErrorCategory::Binding
            }
            ErrorImpl::MissingReturn { .. } => ErrorCategory::Flow,
            ErrorImpl::UnreachableCode => ErrorCategory::Lint,
            _ => ErrorCategory::Type,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.category() {
            ErrorCategory::Lint => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
