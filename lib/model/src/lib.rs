mod error;
mod numeric;
mod typed_value;
pub mod vocab;

pub use error::*;
pub use numeric::*;
pub use typed_value::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxrdf::{
    BlankNode, BlankNodeRef, Graph, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermParseError, TermRef, Triple, TripleRef, Variable,
    VariableNameParseError, VariableRef,
};

// Re-export the XSD value types.
pub use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, Integer, Time,
    YearMonthDuration,
};

// Re-export the parts of the SPARQL algebra that are shared between the crates.
pub use spargebra::algebra::{AggregateFunction, Function, QueryDataset};
pub use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};
pub use spargebra::{Query, SparqlSyntaxError};
