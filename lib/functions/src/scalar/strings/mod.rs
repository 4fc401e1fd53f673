mod case;
mod concat;
mod encode_for_uri;
mod lang_matches;
mod regex;
mod search;
mod substr;

pub use case::{LCaseSparqlOp, UCaseSparqlOp};
pub use concat::ConcatSparqlOp;
pub use encode_for_uri::EncodeForUriSparqlOp;
pub use lang_matches::LangMatchesSparqlOp;
pub use self::regex::{compile_pattern, RegexSparqlOp, ReplaceSparqlOp};
pub use search::{
    ContainsSparqlOp, StrAfterSparqlOp, StrBeforeSparqlOp, StrEndsSparqlOp, StrStartsSparqlOp,
};
pub use substr::{StrLenSparqlOp, SubStrSparqlOp};
