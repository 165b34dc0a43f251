use thiserror::Error;

/// Errors raised by a single calculator command. None of them end the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Input Error: '{0}'")]
    InvalidInput(String),

    #[error("{action} needs {needed} elements on the stack, found {found}")]
    StackUnderflow {
        action: &'static str,
        needed: usize,
        found: usize,
    },
}
