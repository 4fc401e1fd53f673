mod args;
pub mod comparison;
pub mod conversion;
pub mod dates_and_times;
pub mod hash;
pub mod logical;
pub mod numeric;
mod result;
pub mod strings;
pub mod terms;

pub use args::{SimpleLiteral, SparqlArg, StringLiteral};
pub use result::IntoTerm;

use rdf_weave_model::{ThinError, ThinResult};
use std::fmt::Debug;

/// Common behavior of all SPARQL operations.
pub trait SparqlOp: Debug + Send + Sync {
    /// Returns the name of the operation.
    fn name(&self) -> &str;
}

pub trait NullarySparqlOp: SparqlOp {
    type Result: IntoTerm;

    fn evaluate(&self) -> ThinResult<Self::Result>;
}

pub trait UnarySparqlOp: SparqlOp {
    type Arg: SparqlArg;
    type Result: IntoTerm;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result>;
}

pub trait BinarySparqlOp: SparqlOp {
    type ArgLhs: SparqlArg;
    type ArgRhs: SparqlArg;
    type Result: IntoTerm;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result>;
}

pub trait TernarySparqlOp: SparqlOp {
    type Arg0: SparqlArg;
    type Arg1: SparqlArg;
    type Arg2: SparqlArg;
    type Result: IntoTerm;

    fn evaluate(
        &self,
        arg0: Self::Arg0,
        arg1: Self::Arg1,
        arg2: Self::Arg2,
    ) -> ThinResult<Self::Result>;
}

pub trait QuaternarySparqlOp: SparqlOp {
    type Arg0: SparqlArg;
    type Arg1: SparqlArg;
    type Arg2: SparqlArg;
    type Arg3: SparqlArg;
    type Result: IntoTerm;

    fn evaluate(
        &self,
        arg0: Self::Arg0,
        arg1: Self::Arg1,
        arg2: Self::Arg2,
        arg3: Self::Arg3,
    ) -> ThinResult<Self::Result>;
}

pub trait NArySparqlOp: SparqlOp {
    type Args: SparqlArg;
    type Result: IntoTerm;

    fn evaluate(&self, args: &[Self::Args]) -> ThinResult<Self::Result>;
}

/// Creates the unit struct of a stateless operation together with its [SparqlOp] implementation.
macro_rules! stateless_sparql_op {
    ($(#[$meta:meta])* $STRUCT: ident, $NAME: expr) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $STRUCT;

        impl $STRUCT {
            pub fn new() -> Self {
                Self
            }
        }

        impl $crate::scalar::SparqlOp for $STRUCT {
            fn name(&self) -> &str {
                $NAME
            }
        }
    };
}

pub(crate) use stateless_sparql_op;

/// Converts an [Option] produced by a checked operation into a [ThinResult].
pub(crate) fn checked<T>(value: Option<T>) -> ThinResult<T> {
    value.ok_or(ThinError::default())
}
