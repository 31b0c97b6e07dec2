use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Every way an expression can fail, from lexing through evaluation.
///
/// Syntax-shaped failures carry a span into the offending input; attach
/// the source text with `miette::Report::with_source_code` when rendering.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CalcError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(calcbot::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown function '{name}'")]
    #[diagnostic(
        code(calcbot::unknown_function),
        help("known functions include sqrt, root, ln, log, exp, fact and the trig family")
    )]
    UnknownFunction {
        name: String,
        #[label("not a known function")]
        span: SourceSpan,
    },

    #[error("{name} expects {expected} argument(s), got {got}")]
    #[diagnostic(code(calcbot::arity_mismatch))]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        #[label("called here")]
        span: SourceSpan,
    },

    #[error("domain error: {message}")]
    #[diagnostic(code(calcbot::domain))]
    Domain { message: String },

    #[error("division by zero")]
    #[diagnostic(code(calcbot::division_by_zero))]
    DivisionByZero,

    #[error("overflow: result is outside the representable range")]
    #[diagnostic(code(calcbot::overflow))]
    Overflow,
}

impl CalcError {
    pub fn syntax(message: impl Into<String>, offset: usize, len: usize) -> Self {
        CalcError::Syntax {
            message: message.into(),
            span: (offset, len).into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        CalcError::Domain {
            message: message.into(),
        }
    }
}
