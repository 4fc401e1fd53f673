use crate::scalar::{stateless_sparql_op, SimpleLiteral, StringLiteral, UnarySparqlOp};
use md5::{Digest, Md5};
use rdf_weave_model::ThinResult;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

macro_rules! hash_sparql_op {
    ($STRUCT: ident, $NAME: expr, $HASHER: ty) => {
        stateless_sparql_op!($STRUCT, $NAME);

        impl UnarySparqlOp for $STRUCT {
            type Arg = SimpleLiteral;
            type Result = StringLiteral;

            fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
                let hash = hex::encode(<$HASHER>::new().chain_update(value.0).finalize());
                Ok(StringLiteral::new(hash, None))
            }
        }
    };
}

hash_sparql_op!(Md5SparqlOp, "MD5", Md5);
hash_sparql_op!(Sha1SparqlOp, "SHA1", Sha1);
hash_sparql_op!(Sha256SparqlOp, "SHA256", Sha256);
hash_sparql_op!(Sha384SparqlOp, "SHA384", Sha384);
hash_sparql_op!(Sha512SparqlOp, "SHA512", Sha512);

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> SimpleLiteral {
        SimpleLiteral("abc".to_owned())
    }

    #[test]
    fn md5_of_abc() {
        let result = Md5SparqlOp::new().evaluate(abc()).unwrap();
        assert_eq!(result.value, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn sha1_of_abc() {
        let result = Sha1SparqlOp::new().evaluate(abc()).unwrap();
        assert_eq!(result.value, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn sha256_of_abc() {
        let result = Sha256SparqlOp::new().evaluate(abc()).unwrap();
        assert_eq!(
            result.value,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
