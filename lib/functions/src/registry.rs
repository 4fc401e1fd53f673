use crate::scalar::comparison::{
    EqualSparqlOp, GreaterOrEqualSparqlOp, GreaterThanSparqlOp, LessOrEqualSparqlOp,
    LessThanSparqlOp, SameTermSparqlOp,
};
use crate::scalar::conversion::{
    CastBooleanSparqlOp, CastDateTimeSparqlOp, CastDecimalSparqlOp, CastDoubleSparqlOp,
    CastFloatSparqlOp, CastIntegerSparqlOp, CastStringSparqlOp,
};
use crate::scalar::dates_and_times::{
    DaySparqlOp, HoursSparqlOp, MinutesSparqlOp, MonthSparqlOp, NowSparqlOp, SecondsSparqlOp,
    TimezoneSparqlOp, TzSparqlOp, YearSparqlOp,
};
use crate::scalar::hash::{
    Md5SparqlOp, Sha1SparqlOp, Sha256SparqlOp, Sha384SparqlOp, Sha512SparqlOp,
};
use crate::scalar::logical::NotSparqlOp;
use crate::scalar::numeric::{
    AbsSparqlOp, AddSparqlOp, CeilSparqlOp, DivSparqlOp, FloorSparqlOp, MulSparqlOp,
    RandSparqlOp, RoundSparqlOp, SubSparqlOp, UnaryMinusSparqlOp, UnaryPlusSparqlOp,
};
use crate::scalar::strings::{
    ConcatSparqlOp, ContainsSparqlOp, EncodeForUriSparqlOp, LCaseSparqlOp, LangMatchesSparqlOp,
    RegexSparqlOp, ReplaceSparqlOp, StrAfterSparqlOp, StrBeforeSparqlOp, StrEndsSparqlOp,
    StrLenSparqlOp, StrStartsSparqlOp, SubStrSparqlOp, UCaseSparqlOp,
};
use crate::scalar::terms::{
    BNodeSparqlOp, DatatypeSparqlOp, IriSparqlOp, IsBlankSparqlOp, IsIriSparqlOp,
    IsLiteralSparqlOp, IsNumericSparqlOp, LangSparqlOp, StrDtSparqlOp, StrLangSparqlOp,
    StrSparqlOp, StrUuidSparqlOp, UuidSparqlOp,
};
use crate::scalar::{
    BinarySparqlOp, IntoTerm, NArySparqlOp, NullarySparqlOp, QuaternarySparqlOp, SparqlArg,
    TernarySparqlOp, UnarySparqlOp,
};
use crate::{BuiltinName, FunctionContext, FunctionName};
use rdf_weave_model::{Term, ThinError, ThinResult};
use std::fmt::Debug;
use std::sync::Arc;

/// A reference-counted pointer to an implementation of the [FunctionRegistry] trait.
///
/// This type alias is used throughout the codebase to pass around references to the registry
/// that is used while evaluating a query.
pub type FunctionRegistryRef = Arc<dyn FunctionRegistry>;

/// Evaluates SPARQL functions on already evaluated arguments.
///
/// Special forms that control the evaluation of their arguments (e.g., `IF`, `COALESCE`, `&&`)
/// are not part of the registry. They are handled by the expression evaluator.
pub trait FunctionRegistry: Debug + Send + Sync {
    /// Calls `function` with `args`.
    ///
    /// Returns a [ThinError] if the function fails for these arguments, if the number of
    /// arguments does not match, or if the function is unknown.
    fn call(
        &self,
        function: &FunctionName,
        args: &[Term],
        context: &FunctionContext,
    ) -> ThinResult<Term>;
}

/// The registry that knows all builtin SPARQL functions and no custom functions.
#[derive(Debug, Default)]
pub struct DefaultFunctionRegistry;

impl FunctionRegistry for DefaultFunctionRegistry {
    fn call(
        &self,
        function: &FunctionName,
        args: &[Term],
        context: &FunctionContext,
    ) -> ThinResult<Term> {
        match function {
            FunctionName::Builtin(builtin) => call_builtin(*builtin, args, context),
            FunctionName::Custom(_) => ThinError::expected(),
        }
    }
}

#[allow(clippy::too_many_lines, reason = "One arm per builtin")]
fn call_builtin(name: BuiltinName, args: &[Term], context: &FunctionContext) -> ThinResult<Term> {
    match (name, args.len()) {
        (BuiltinName::Add, _) => binary(&AddSparqlOp::new(context.strict_operators), args),
        (BuiltinName::Sub, _) => binary(&SubSparqlOp::new(context.strict_operators), args),
        (BuiltinName::Mul, _) => binary(&MulSparqlOp::new(), args),
        (BuiltinName::Div, _) => binary(&DivSparqlOp::new(), args),
        (BuiltinName::UnaryPlus, _) => unary(&UnaryPlusSparqlOp::new(), args),
        (BuiltinName::UnaryMinus, _) => unary(&UnaryMinusSparqlOp::new(), args),
        (BuiltinName::Not, _) => unary(&NotSparqlOp::new(), args),
        (BuiltinName::Equal, _) => binary(&EqualSparqlOp::new(), args),
        (BuiltinName::SameTerm, _) => binary(&SameTermSparqlOp::new(), args),
        (BuiltinName::GreaterThan, _) => binary(&GreaterThanSparqlOp::new(), args),
        (BuiltinName::GreaterOrEqual, _) => binary(&GreaterOrEqualSparqlOp::new(), args),
        (BuiltinName::LessThan, _) => binary(&LessThanSparqlOp::new(), args),
        (BuiltinName::LessOrEqual, _) => binary(&LessOrEqualSparqlOp::new(), args),

        (BuiltinName::IsIri, _) => unary(&IsIriSparqlOp::new(), args),
        (BuiltinName::IsBlank, _) => unary(&IsBlankSparqlOp::new(), args),
        (BuiltinName::IsLiteral, _) => unary(&IsLiteralSparqlOp::new(), args),
        (BuiltinName::IsNumeric, _) => unary(&IsNumericSparqlOp::new(), args),
        (BuiltinName::Str, _) => unary(&StrSparqlOp::new(), args),
        (BuiltinName::Lang, _) => unary(&LangSparqlOp::new(), args),
        (BuiltinName::Datatype, _) => unary(&DatatypeSparqlOp::new(), args),
        (BuiltinName::Iri, _) => unary(&IriSparqlOp::new(context.base_iri.clone()), args),
        (BuiltinName::BNode, 0) => nullary(&BNodeSparqlOp::new(), args),
        (BuiltinName::BNode, _) => unary(&BNodeSparqlOp::new(), args),
        (BuiltinName::StrDt, _) => binary(&StrDtSparqlOp::new(), args),
        (BuiltinName::StrLang, _) => binary(&StrLangSparqlOp::new(), args),
        (BuiltinName::Uuid, _) => nullary(&UuidSparqlOp::new(), args),
        (BuiltinName::StrUuid, _) => nullary(&StrUuidSparqlOp::new(), args),

        (BuiltinName::StrLen, _) => unary(&StrLenSparqlOp::new(), args),
        (BuiltinName::SubStr, 2) => binary(&SubStrSparqlOp::new(), args),
        (BuiltinName::SubStr, _) => ternary(&SubStrSparqlOp::new(), args),
        (BuiltinName::UCase, _) => unary(&UCaseSparqlOp::new(), args),
        (BuiltinName::LCase, _) => unary(&LCaseSparqlOp::new(), args),
        (BuiltinName::StrStarts, _) => binary(&StrStartsSparqlOp::new(), args),
        (BuiltinName::StrEnds, _) => binary(&StrEndsSparqlOp::new(), args),
        (BuiltinName::Contains, _) => binary(&ContainsSparqlOp::new(), args),
        (BuiltinName::StrBefore, _) => binary(&StrBeforeSparqlOp::new(), args),
        (BuiltinName::StrAfter, _) => binary(&StrAfterSparqlOp::new(), args),
        (BuiltinName::EncodeForUri, _) => unary(&EncodeForUriSparqlOp::new(), args),
        (BuiltinName::Concat, _) => n_ary(&ConcatSparqlOp::new(), args),
        (BuiltinName::LangMatches, _) => binary(&LangMatchesSparqlOp::new(), args),
        (BuiltinName::Regex, 2) => binary(&RegexSparqlOp::new(), args),
        (BuiltinName::Regex, _) => ternary(&RegexSparqlOp::new(), args),
        (BuiltinName::Replace, 3) => ternary(&ReplaceSparqlOp::new(), args),
        (BuiltinName::Replace, _) => quaternary(&ReplaceSparqlOp::new(), args),

        (BuiltinName::Abs, _) => unary(&AbsSparqlOp::new(), args),
        (BuiltinName::Round, _) => unary(&RoundSparqlOp::new(), args),
        (BuiltinName::Ceil, _) => unary(&CeilSparqlOp::new(), args),
        (BuiltinName::Floor, _) => unary(&FloorSparqlOp::new(), args),
        (BuiltinName::Rand, _) => nullary(&RandSparqlOp::new(), args),

        (BuiltinName::Now, _) => nullary(&NowSparqlOp::new(context.now), args),
        (BuiltinName::Year, _) => unary(&YearSparqlOp::new(), args),
        (BuiltinName::Month, _) => unary(&MonthSparqlOp::new(), args),
        (BuiltinName::Day, _) => unary(&DaySparqlOp::new(), args),
        (BuiltinName::Hours, _) => unary(&HoursSparqlOp::new(), args),
        (BuiltinName::Minutes, _) => unary(&MinutesSparqlOp::new(), args),
        (BuiltinName::Seconds, _) => unary(&SecondsSparqlOp::new(), args),
        (BuiltinName::Timezone, _) => unary(&TimezoneSparqlOp::new(), args),
        (BuiltinName::Tz, _) => unary(&TzSparqlOp::new(), args),

        (BuiltinName::Md5, _) => unary(&Md5SparqlOp::new(), args),
        (BuiltinName::Sha1, _) => unary(&Sha1SparqlOp::new(), args),
        (BuiltinName::Sha256, _) => unary(&Sha256SparqlOp::new(), args),
        (BuiltinName::Sha384, _) => unary(&Sha384SparqlOp::new(), args),
        (BuiltinName::Sha512, _) => unary(&Sha512SparqlOp::new(), args),

        (BuiltinName::CastString, _) => unary(&CastStringSparqlOp::new(), args),
        (BuiltinName::CastBoolean, _) => unary(&CastBooleanSparqlOp::new(), args),
        (BuiltinName::CastInteger, _) => unary(&CastIntegerSparqlOp::new(), args),
        (BuiltinName::CastDecimal, _) => unary(&CastDecimalSparqlOp::new(), args),
        (BuiltinName::CastFloat, _) => unary(&CastFloatSparqlOp::new(), args),
        (BuiltinName::CastDouble, _) => unary(&CastDoubleSparqlOp::new(), args),
        (BuiltinName::CastDateTime, _) => unary(&CastDateTimeSparqlOp::new(), args),
    }
}

fn nullary<TOp: NullarySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    match args {
        [] => op.evaluate().map(IntoTerm::into_term),
        _ => ThinError::expected(),
    }
}

fn unary<TOp: UnarySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    match args {
        [arg] => op.evaluate(TOp::Arg::from_term(arg)?).map(IntoTerm::into_term),
        _ => ThinError::expected(),
    }
}

fn binary<TOp: BinarySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    match args {
        [lhs, rhs] => op
            .evaluate(TOp::ArgLhs::from_term(lhs)?, TOp::ArgRhs::from_term(rhs)?)
            .map(IntoTerm::into_term),
        _ => ThinError::expected(),
    }
}

fn ternary<TOp: TernarySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    match args {
        [arg0, arg1, arg2] => op
            .evaluate(
                TOp::Arg0::from_term(arg0)?,
                TOp::Arg1::from_term(arg1)?,
                TOp::Arg2::from_term(arg2)?,
            )
            .map(IntoTerm::into_term),
        _ => ThinError::expected(),
    }
}

fn quaternary<TOp: QuaternarySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    match args {
        [arg0, arg1, arg2, arg3] => op
            .evaluate(
                TOp::Arg0::from_term(arg0)?,
                TOp::Arg1::from_term(arg1)?,
                TOp::Arg2::from_term(arg2)?,
                TOp::Arg3::from_term(arg3)?,
            )
            .map(IntoTerm::into_term),
        _ => ThinError::expected(),
    }
}

fn n_ary<TOp: NArySparqlOp>(op: &TOp, args: &[Term]) -> ThinResult<Term> {
    let args = args
        .iter()
        .map(TOp::Args::from_term)
        .collect::<ThinResult<Vec<_>>>()?;
    op.evaluate(&args).map(IntoTerm::into_term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::vocab::xsd;
    use rdf_weave_model::{Literal, NamedNode};

    fn call(name: BuiltinName, args: &[Term]) -> ThinResult<Term> {
        DefaultFunctionRegistry.call(&name.into(), args, &FunctionContext::default())
    }

    fn integer(value: i64) -> Term {
        Literal::from(value).into()
    }

    fn simple(value: &str) -> Term {
        Literal::new_simple_literal(value).into()
    }

    #[test]
    fn add_integers() {
        let result = call(BuiltinName::Add, &[integer(1), integer(2)]).unwrap();
        assert_eq!(result, integer(3));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        assert!(call(BuiltinName::Add, &[integer(1)]).is_err());
        assert!(call(BuiltinName::Str, &[]).is_err());
        assert!(call(BuiltinName::Uuid, &[integer(1)]).is_err());
    }

    #[test]
    fn substr_with_optional_length() {
        let two = call(BuiltinName::SubStr, &[simple("foobar"), integer(4)]).unwrap();
        assert_eq!(two, simple("bar"));
        let three = call(BuiltinName::SubStr, &[simple("foobar"), integer(4), integer(1)]).unwrap();
        assert_eq!(three, simple("b"));
    }

    #[test]
    fn regex_with_flags() {
        let result = call(BuiltinName::Regex, &[simple("ABC"), simple("^a"), simple("i")]).unwrap();
        assert_eq!(result, Literal::from(true).into());
    }

    #[test]
    fn concat_of_no_arguments() {
        let result = call(BuiltinName::Concat, &[]).unwrap();
        assert_eq!(result, simple(""));
    }

    #[test]
    fn cast_through_xsd_function_name() {
        let name = FunctionName::from(&rdf_weave_model::Function::Custom(xsd::INTEGER.into()));
        let result = DefaultFunctionRegistry
            .call(&name, &[simple("42")], &FunctionContext::default())
            .unwrap();
        assert_eq!(result, integer(42));
    }

    #[test]
    fn unknown_custom_function_is_an_error() {
        let name = FunctionName::Custom(NamedNode::new_unchecked("http://example.com/f"));
        let result = DefaultFunctionRegistry.call(&name, &[], &FunctionContext::default());
        assert!(result.is_err());
    }

    #[test]
    fn now_is_stable_within_a_context() {
        let context = FunctionContext::default();
        let name = FunctionName::from(BuiltinName::Now);
        let first = DefaultFunctionRegistry.call(&name, &[], &context).unwrap();
        let second = DefaultFunctionRegistry.call(&name, &[], &context).unwrap();
        assert_eq!(first, second);
    }
}
