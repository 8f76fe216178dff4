use thiserror::Error;

/// Faults raised while walking the syntax tree.
///
/// None of these are recovered by the interpreter itself: they unwind to whoever drove the
/// evaluation, which for the binary means abnormal termination.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("`{form}` applied to an empty list")]
    ListEmpty { form: &'static str },

    #[error("`{form}` expected {expected}, found {found}")]
    TypeMismatch {
        form: String,
        expected: &'static str,
        found: String,
    },

    #[error("expected an integer on input, got {input:?}")]
    Format { input: String },

    #[error("`{name}` is not a defined function")]
    UnboundCallable { name: String },

    #[error("nesting exceeded the maximum depth of {depth}")]
    StackExhaustion { depth: usize },

    #[error("`{form}` divided by zero")]
    DivisionByZero { form: &'static str },

    #[error("malformed `{form}`: {reason}")]
    MalformedForm {
        form: String,
        reason: &'static str,
    },

    #[error("`{name}` is not bound")]
    UnboundName { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EvalError {
    /// Stable name of the fault kind, used in diagnostics and test fixtures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ListEmpty { .. } => "ListEmptyError",
            Self::TypeMismatch { .. } => "TypeMismatchError",
            Self::Format { .. } => "FormatError",
            Self::UnboundCallable { .. } => "UnboundCallableError",
            Self::StackExhaustion { .. } => "StackExhaustionError",
            Self::DivisionByZero { .. } => "DivisionByZeroError",
            Self::MalformedForm { .. } => "MalformedFormError",
            Self::UnboundName { .. } => "UnboundNameError",
            Self::Io(_) => "IoError",
        }
    }

    pub(crate) fn malformed(form: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedForm {
            form: form.into(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemeError {
    /// Lexing or parsing gave up. Only the byte offset of the failure is known.
    #[error("syntax error at byte {offset}")]
    Syntax { offset: usize },

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl SchemeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "SyntaxError",
            Self::Eval(error) => error.kind(),
        }
    }
}
