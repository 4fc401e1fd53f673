//! The query engine of RDF Weave: translates SPARQL queries into algebra, optimizes the algebra
//! and evaluates it against a snapshot of a [QuadStorage](rdf_weave_common::QuadStorage).

mod engine;
pub mod results;
pub mod sparql;

pub use engine::WeaveContext;
pub use rdf_weave_common::error;
