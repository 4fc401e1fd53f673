use oxiri::IriParseError;
use oxrdf::BlankNodeIdParseError;
use oxsdatatypes::{
    DateTimeOverflowError, ParseDateTimeError, ParseDecimalError, ParseDurationError,
    TooLargeForDecimalError, TooLargeForIntegerError,
};
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use std::str::ParseBoolError;

/// The result of a per-solution computation, e.g., a SPARQL function call.
pub type ThinResult<T> = Result<T, ThinError>;

/// An expected failure of a per-solution computation.
///
/// Type errors, overflows or unbound arguments are part of regular SPARQL evaluation. The
/// evaluator treats every such failure the same way: the value becomes unbound, or the filter
/// rejects the solution. Therefore, the error carries no reason.
#[derive(Clone, Copy, Debug, Default, thiserror::Error, PartialEq, Eq, Hash)]
#[error("The expression could not be evaluated for this solution")]
pub struct ThinError;

impl ThinError {
    /// Returns an [Err] with a [ThinError].
    pub fn expected<T>() -> ThinResult<T> {
        Err(ThinError)
    }
}

/// Any parsing or range error of a value becomes a [ThinError].
macro_rules! thin_error_from {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ThinError {
                fn from(_: $error) -> Self {
                    ThinError
                }
            }
        )*
    };
}

thin_error_from!(
    BlankNodeIdParseError,
    DateTimeOverflowError,
    IriParseError,
    ParseBoolError,
    ParseDateTimeError,
    ParseDecimalError,
    ParseDurationError,
    ParseFloatError,
    ParseIntError,
    TooLargeForDecimalError,
    TooLargeForIntegerError,
    TryFromIntError,
);
