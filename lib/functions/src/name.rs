use rdf_weave_model::vocab::xsd;
use rdf_weave_model::{Function, NamedNode};
use std::fmt::{Display, Formatter};

/// Identifier for a function. Either it is an RDF Weave builtin (e.g., a SPARQL operation) or a
/// custom function.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum FunctionName {
    /// An RDF Weave builtin function.
    Builtin(BuiltinName),
    /// A custom function.
    Custom(NamedNode),
}

impl From<BuiltinName> for FunctionName {
    fn from(value: BuiltinName) -> Self {
        FunctionName::Builtin(value)
    }
}

impl From<&Function> for FunctionName {
    fn from(function: &Function) -> Self {
        let builtin = match function {
            Function::Str => BuiltinName::Str,
            Function::Lang => BuiltinName::Lang,
            Function::LangMatches => BuiltinName::LangMatches,
            Function::Datatype => BuiltinName::Datatype,
            Function::Iri => BuiltinName::Iri,
            Function::BNode => BuiltinName::BNode,
            Function::Rand => BuiltinName::Rand,
            Function::Abs => BuiltinName::Abs,
            Function::Ceil => BuiltinName::Ceil,
            Function::Floor => BuiltinName::Floor,
            Function::Round => BuiltinName::Round,
            Function::Concat => BuiltinName::Concat,
            Function::SubStr => BuiltinName::SubStr,
            Function::StrLen => BuiltinName::StrLen,
            Function::Replace => BuiltinName::Replace,
            Function::UCase => BuiltinName::UCase,
            Function::LCase => BuiltinName::LCase,
            Function::EncodeForUri => BuiltinName::EncodeForUri,
            Function::Contains => BuiltinName::Contains,
            Function::StrStarts => BuiltinName::StrStarts,
            Function::StrEnds => BuiltinName::StrEnds,
            Function::StrBefore => BuiltinName::StrBefore,
            Function::StrAfter => BuiltinName::StrAfter,
            Function::Year => BuiltinName::Year,
            Function::Month => BuiltinName::Month,
            Function::Day => BuiltinName::Day,
            Function::Hours => BuiltinName::Hours,
            Function::Minutes => BuiltinName::Minutes,
            Function::Seconds => BuiltinName::Seconds,
            Function::Timezone => BuiltinName::Timezone,
            Function::Tz => BuiltinName::Tz,
            Function::Now => BuiltinName::Now,
            Function::Uuid => BuiltinName::Uuid,
            Function::StrUuid => BuiltinName::StrUuid,
            Function::Md5 => BuiltinName::Md5,
            Function::Sha1 => BuiltinName::Sha1,
            Function::Sha256 => BuiltinName::Sha256,
            Function::Sha384 => BuiltinName::Sha384,
            Function::Sha512 => BuiltinName::Sha512,
            Function::StrLang => BuiltinName::StrLang,
            Function::StrDt => BuiltinName::StrDt,
            Function::IsIri => BuiltinName::IsIri,
            Function::IsBlank => BuiltinName::IsBlank,
            Function::IsLiteral => BuiltinName::IsLiteral,
            Function::IsNumeric => BuiltinName::IsNumeric,
            Function::Regex => BuiltinName::Regex,
            Function::Custom(name) => return custom_function_name(name),
        };
        FunctionName::Builtin(builtin)
    }
}

/// XSD constructor functions are builtins. Every other IRI is a custom function.
fn custom_function_name(name: &NamedNode) -> FunctionName {
    let builtin = match name.as_ref() {
        xsd::STRING => BuiltinName::CastString,
        xsd::BOOLEAN => BuiltinName::CastBoolean,
        xsd::INTEGER => BuiltinName::CastInteger,
        xsd::DECIMAL => BuiltinName::CastDecimal,
        xsd::FLOAT => BuiltinName::CastFloat,
        xsd::DOUBLE => BuiltinName::CastDouble,
        xsd::DATE_TIME => BuiltinName::CastDateTime,
        _ => return FunctionName::Custom(name.clone()),
    };
    FunctionName::Builtin(builtin)
}

impl Display for FunctionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionName::Builtin(builtin) => builtin.fmt(f),
            FunctionName::Custom(name) => name.fmt(f),
        }
    }
}

/// The builtin SPARQL operators and functions.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BuiltinName {
    // Operators
    Add,
    Sub,
    Mul,
    Div,
    UnaryPlus,
    UnaryMinus,
    Not,
    Equal,
    SameTerm,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,

    // Functions on RDF terms
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Str,
    Lang,
    Datatype,
    Iri,
    BNode,
    StrDt,
    StrLang,
    Uuid,
    StrUuid,

    // Strings
    StrLen,
    SubStr,
    UCase,
    LCase,
    StrStarts,
    StrEnds,
    Contains,
    StrBefore,
    StrAfter,
    EncodeForUri,
    Concat,
    LangMatches,
    Regex,
    Replace,

    // Numerics
    Abs,
    Round,
    Ceil,
    Floor,
    Rand,

    // Dates and times
    Now,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,

    // Hashes
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,

    // Casts
    CastString,
    CastBoolean,
    CastInteger,
    CastDecimal,
    CastFloat,
    CastDouble,
    CastDateTime,
}

impl BuiltinName {
    /// Returns true if the function may return different results for the same arguments.
    pub fn is_volatile(self) -> bool {
        matches!(
            self,
            BuiltinName::BNode | BuiltinName::Rand | BuiltinName::Uuid | BuiltinName::StrUuid
        )
    }
}

impl Display for BuiltinName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuiltinName::Add => "ADD",
            BuiltinName::Sub => "SUB",
            BuiltinName::Mul => "MUL",
            BuiltinName::Div => "DIV",
            BuiltinName::UnaryPlus => "UNARY_PLUS",
            BuiltinName::UnaryMinus => "UNARY_MINUS",
            BuiltinName::Not => "NOT",
            BuiltinName::Equal => "EQ",
            BuiltinName::SameTerm => "SAMETERM",
            BuiltinName::GreaterThan => "GT",
            BuiltinName::GreaterOrEqual => "GEQ",
            BuiltinName::LessThan => "LT",
            BuiltinName::LessOrEqual => "LEQ",
            BuiltinName::IsIri => "ISIRI",
            BuiltinName::IsBlank => "ISBLANK",
            BuiltinName::IsLiteral => "ISLITERAL",
            BuiltinName::IsNumeric => "ISNUMERIC",
            BuiltinName::Str => "STR",
            BuiltinName::Lang => "LANG",
            BuiltinName::Datatype => "DATATYPE",
            BuiltinName::Iri => "IRI",
            BuiltinName::BNode => "BNODE",
            BuiltinName::StrDt => "STRDT",
            BuiltinName::StrLang => "STRLANG",
            BuiltinName::Uuid => "UUID",
            BuiltinName::StrUuid => "STRUUID",
            BuiltinName::StrLen => "STRLEN",
            BuiltinName::SubStr => "SUBSTR",
            BuiltinName::UCase => "UCASE",
            BuiltinName::LCase => "LCASE",
            BuiltinName::StrStarts => "STRSTARTS",
            BuiltinName::StrEnds => "STRENDS",
            BuiltinName::Contains => "CONTAINS",
            BuiltinName::StrBefore => "STRBEFORE",
            BuiltinName::StrAfter => "STRAFTER",
            BuiltinName::EncodeForUri => "ENCODE_FOR_URI",
            BuiltinName::Concat => "CONCAT",
            BuiltinName::LangMatches => "LANGMATCHES",
            BuiltinName::Regex => "REGEX",
            BuiltinName::Replace => "REPLACE",
            BuiltinName::Abs => "ABS",
            BuiltinName::Round => "ROUND",
            BuiltinName::Ceil => "CEIL",
            BuiltinName::Floor => "FLOOR",
            BuiltinName::Rand => "RAND",
            BuiltinName::Now => "NOW",
            BuiltinName::Year => "YEAR",
            BuiltinName::Month => "MONTH",
            BuiltinName::Day => "DAY",
            BuiltinName::Hours => "HOURS",
            BuiltinName::Minutes => "MINUTES",
            BuiltinName::Seconds => "SECONDS",
            BuiltinName::Timezone => "TIMEZONE",
            BuiltinName::Tz => "TZ",
            BuiltinName::Md5 => "MD5",
            BuiltinName::Sha1 => "SHA1",
            BuiltinName::Sha256 => "SHA256",
            BuiltinName::Sha384 => "SHA384",
            BuiltinName::Sha512 => "SHA512",
            BuiltinName::CastString => "xsd:string",
            BuiltinName::CastBoolean => "xsd:boolean",
            BuiltinName::CastInteger => "xsd:integer",
            BuiltinName::CastDecimal => "xsd:decimal",
            BuiltinName::CastFloat => "xsd:float",
            BuiltinName::CastDouble => "xsd:double",
            BuiltinName::CastDateTime => "xsd:dateTime",
        };
        f.write_str(name)
    }
}
