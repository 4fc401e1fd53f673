//! The logical layer of RDF Weave: the SPARQL algebra, property paths and the optimizer that
//! rewrites the algebra before it is evaluated.
//!
//! Every [Algebra] renders as a canonical string (e.g., `Join(Bgp(..), Filter(..))`). This
//! rendering is used in query explanations and in tests to check which rewrites have fired.

mod algebra;
mod expression;
pub mod optimizer;
mod path;
mod translator;

pub use algebra::{pattern_variables, term_variable, Algebra, Transformed};
pub use expression::{AggregateExpression, Expression, OrderExpression};
pub use path::PathExpression;
pub use translator::PathTranslator;
