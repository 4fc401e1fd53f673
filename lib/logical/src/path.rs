use rdf_weave_model::NamedNode;
use std::fmt::{Display, Formatter};

/// A property path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathExpression {
    /// A single predicate.
    Property(NamedNode),
    /// `^path`
    Inverse(Box<PathExpression>),
    /// `lhs / rhs`
    Sequence(Box<PathExpression>, Box<PathExpression>),
    /// `lhs | rhs`
    Alternative(Box<PathExpression>, Box<PathExpression>),
    /// `path*`
    ZeroOrMore(Box<PathExpression>),
    /// `path+`
    OneOrMore(Box<PathExpression>),
    /// `path?`
    ZeroOrOne(Box<PathExpression>),
    /// `path{n}`. `path{0}` only matches the zero-length path.
    FixedCardinality(Box<PathExpression>, usize),
    /// `!(p1 | ^p2)`. Matches every edge whose predicate is not listed for its direction.
    NegatedPropertySet {
        forward: Vec<NamedNode>,
        inverse: Vec<NamedNode>,
    },
}

impl PathExpression {
    pub fn inverse(inner: PathExpression) -> Self {
        PathExpression::Inverse(Box::new(inner))
    }

    pub fn sequence(lhs: PathExpression, rhs: PathExpression) -> Self {
        PathExpression::Sequence(Box::new(lhs), Box::new(rhs))
    }

    pub fn alternative(lhs: PathExpression, rhs: PathExpression) -> Self {
        PathExpression::Alternative(Box::new(lhs), Box::new(rhs))
    }

    pub fn zero_or_more(inner: PathExpression) -> Self {
        PathExpression::ZeroOrMore(Box::new(inner))
    }

    pub fn one_or_more(inner: PathExpression) -> Self {
        PathExpression::OneOrMore(Box::new(inner))
    }

    pub fn zero_or_one(inner: PathExpression) -> Self {
        PathExpression::ZeroOrOne(Box::new(inner))
    }

    /// Returns `true` if the path matches the zero-length path, i.e., connects every node with
    /// itself.
    pub fn matches_zero_length(&self) -> bool {
        match self {
            PathExpression::Property(_) | PathExpression::NegatedPropertySet { .. } => false,
            PathExpression::ZeroOrMore(_) | PathExpression::ZeroOrOne(_) => true,
            PathExpression::Inverse(inner) | PathExpression::OneOrMore(inner) => {
                inner.matches_zero_length()
            }
            PathExpression::Sequence(lhs, rhs) => {
                lhs.matches_zero_length() && rhs.matches_zero_length()
            }
            PathExpression::Alternative(lhs, rhs) => {
                lhs.matches_zero_length() || rhs.matches_zero_length()
            }
            PathExpression::FixedCardinality(inner, count) => {
                *count == 0 || inner.matches_zero_length()
            }
        }
    }
}

impl From<NamedNode> for PathExpression {
    fn from(value: NamedNode) -> Self {
        PathExpression::Property(value)
    }
}

impl Display for PathExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathExpression::Property(predicate) => predicate.fmt(f),
            PathExpression::Inverse(inner) => write!(f, "^({inner})"),
            PathExpression::Sequence(lhs, rhs) => write!(f, "({lhs} / {rhs})"),
            PathExpression::Alternative(lhs, rhs) => write!(f, "({lhs} | {rhs})"),
            PathExpression::ZeroOrMore(inner) => write!(f, "({inner})*"),
            PathExpression::OneOrMore(inner) => write!(f, "({inner})+"),
            PathExpression::ZeroOrOne(inner) => write!(f, "({inner})?"),
            PathExpression::FixedCardinality(inner, n) => write!(f, "({inner}){{{n}}}"),
            PathExpression::NegatedPropertySet { forward, inverse } => {
                f.write_str("!(")?;
                let predicates = forward
                    .iter()
                    .map(ToString::to_string)
                    .chain(inverse.iter().map(|p| format!("^{p}")));
                for (i, predicate) in predicates.enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    f.write_str(&predicate)?;
                }
                f.write_str(")")
            }
        }
    }
}
