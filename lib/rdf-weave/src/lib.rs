#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
pub mod store;

pub mod io {
    //! Parsing of RDF files for [`Store::load_from_reader`](crate::store::Store::load_from_reader).
    pub use oxrdfio::{RdfFormat, RdfParseError, RdfParser};
}

pub mod model {
    pub use rdf_weave_model::*;
}

pub mod sparql {
    pub use rdf_weave_engine::sparql::*;
}

pub mod storage {
    pub use rdf_weave_common::{QuadDataset, QuadStorage};
    pub use rdf_weave_storage::*;
}
