//! The physical layer of RDF Weave: evaluates an [Algebra](rdf_weave_logical::Algebra) tree
//! against a [QuadDataset](rdf_weave_common::QuadDataset) and produces a [Multiset] of
//! solutions.
//!
//! Evaluation is synchronous and bottom-up. Independent branches of joins, unions and minus
//! operations may run on the rayon thread pool if [EvaluationOptions::parallel] is set.

mod context;
mod error;
mod eval;
mod multiset;
mod options;
mod service;

pub use context::{ActiveGraph, EvaluationContext};
pub use error::EvaluationError;
pub use eval::evaluate;
pub use multiset::{join_variables, BindingSet, Bindings, Multiset, Row, RowId};
pub use options::EvaluationOptions;
pub use service::ServiceHandler;
