//! Vocabularies used by the SPARQL engine.

pub use oxrdf::vocab::{rdf, rdfs, xsd};
