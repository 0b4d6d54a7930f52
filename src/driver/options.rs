/// What to do once a pass has reported errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Run every pass and report everything found.
    #[default]
    Accumulate,
    /// Stop after the first binding or type pass that fails, keeping only
    /// its first error.
    FailFast,
}

#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    pub error_policy: ErrorPolicy,
    /// Warn about statements that follow a return on every path.
    pub warn_unreachable: bool,
}

impl CompilerOptions {
    pub fn fail_fast() -> Self {
        CompilerOptions {
            error_policy: ErrorPolicy::FailFast,
            ..Default::default()
        }
    }
}
