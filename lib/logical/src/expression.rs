use crate::Algebra;
use rdf_weave_functions::{BuiltinName, FunctionName};
use rdf_weave_model::{AggregateFunction, Literal, NamedNode, Variable};
use std::fmt::{Display, Formatter};

/// A SPARQL expression.
///
/// Operators (e.g., `=`, `+`, `!`) are represented as calls to builtin functions. Only the forms
/// that control the evaluation of their arguments have their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    NamedNode(NamedNode),
    Literal(Literal),
    Variable(Variable),
    /// `lhs || rhs` with SPARQL error semantics.
    Or(Box<Expression>, Box<Expression>),
    /// `lhs && rhs` with SPARQL error semantics.
    And(Box<Expression>, Box<Expression>),
    /// `value IN (list)`.
    In(Box<Expression>, Vec<Expression>),
    Bound(Variable),
    If(Box<Expression>, Box<Expression>, Box<Expression>),
    Coalesce(Vec<Expression>),
    /// `EXISTS { inner }`. `NOT EXISTS` is `Not(Exists(..))`.
    Exists(Box<Algebra>),
    /// A call to a builtin or custom function.
    Call(FunctionName, Vec<Expression>),
}

impl Expression {
    /// Creates a call to a builtin function.
    pub fn builtin(name: BuiltinName, args: Vec<Expression>) -> Self {
        Expression::Call(FunctionName::Builtin(name), args)
    }

    pub fn not(inner: Expression) -> Self {
        Self::builtin(BuiltinName::Not, vec![inner])
    }

    pub fn equal(lhs: Expression, rhs: Expression) -> Self {
        Self::builtin(BuiltinName::Equal, vec![lhs, rhs])
    }

    pub fn same_term(lhs: Expression, rhs: Expression) -> Self {
        Self::builtin(BuiltinName::SameTerm, vec![lhs, rhs])
    }

    /// Returns the variables that this expression references, in order of their first
    /// occurrence. Variables that only occur within `EXISTS` are included.
    pub fn variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        self.collect_variables(&mut result);
        result
    }

    fn collect_variables(&self, result: &mut Vec<Variable>) {
        match self {
            Expression::NamedNode(_) | Expression::Literal(_) => {}
            Expression::Variable(variable) | Expression::Bound(variable) => {
                push_unique(result, variable);
            }
            Expression::Or(lhs, rhs) | Expression::And(lhs, rhs) => {
                lhs.collect_variables(result);
                rhs.collect_variables(result);
            }
            Expression::In(value, list) => {
                value.collect_variables(result);
                for item in list {
                    item.collect_variables(result);
                }
            }
            Expression::If(condition, then, otherwise) => {
                condition.collect_variables(result);
                then.collect_variables(result);
                otherwise.collect_variables(result);
            }
            Expression::Coalesce(args) | Expression::Call(_, args) => {
                for arg in args {
                    arg.collect_variables(result);
                }
            }
            Expression::Exists(inner) => {
                for variable in inner.in_scope_variables() {
                    push_unique(result, &variable);
                }
            }
        }
    }

    /// Returns true if the expression contains an `EXISTS`.
    pub fn contains_exists(&self) -> bool {
        match self {
            Expression::Exists(_) => true,
            Expression::NamedNode(_)
            | Expression::Literal(_)
            | Expression::Variable(_)
            | Expression::Bound(_) => false,
            Expression::Or(lhs, rhs) | Expression::And(lhs, rhs) => {
                lhs.contains_exists() || rhs.contains_exists()
            }
            Expression::In(value, list) => {
                value.contains_exists() || list.iter().any(Expression::contains_exists)
            }
            Expression::If(condition, then, otherwise) => {
                condition.contains_exists() || then.contains_exists() || otherwise.contains_exists()
            }
            Expression::Coalesce(args) | Expression::Call(_, args) => {
                args.iter().any(Expression::contains_exists)
            }
        }
    }
}

pub(crate) fn push_unique(variables: &mut Vec<Variable>, variable: &Variable) {
    if !variables.contains(variable) {
        variables.push(variable.clone());
    }
}

impl From<Variable> for Expression {
    fn from(value: Variable) -> Self {
        Expression::Variable(value)
    }
}

impl From<NamedNode> for Expression {
    fn from(value: NamedNode) -> Self {
        Expression::NamedNode(value)
    }
}

impl From<Literal> for Expression {
    fn from(value: Literal) -> Self {
        Expression::Literal(value)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::NamedNode(node) => node.fmt(f),
            Expression::Literal(literal) => literal.fmt(f),
            Expression::Variable(variable) => variable.fmt(f),
            Expression::Or(lhs, rhs) => write!(f, "OR({lhs}, {rhs})"),
            Expression::And(lhs, rhs) => write!(f, "AND({lhs}, {rhs})"),
            Expression::In(value, list) => {
                write!(f, "IN({value}, [")?;
                write_separated(f, list, ", ")?;
                f.write_str("])")
            }
            Expression::Bound(variable) => write!(f, "BOUND({variable})"),
            Expression::If(condition, then, otherwise) => {
                write!(f, "IF({condition}, {then}, {otherwise})")
            }
            Expression::Coalesce(args) => {
                f.write_str("COALESCE(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
            Expression::Exists(inner) => write!(f, "EXISTS({inner})"),
            Expression::Call(name, args) => {
                write!(f, "{name}(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
        }
    }
}

pub(crate) fn write_separated<T: Display>(
    f: &mut Formatter<'_>,
    items: &[T],
    separator: &str,
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

/// A sort key of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderExpression {
    Asc(Expression),
    Desc(Expression),
}

impl OrderExpression {
    pub fn expression(&self) -> &Expression {
        match self {
            OrderExpression::Asc(inner) | OrderExpression::Desc(inner) => inner,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, OrderExpression::Asc(_))
    }
}

impl Display for OrderExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderExpression::Asc(inner) => write!(f, "ASC({inner})"),
            OrderExpression::Desc(inner) => write!(f, "DESC({inner})"),
        }
    }
}

/// An aggregate of a `GROUP BY`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateExpression {
    /// `COUNT(*)`.
    CountSolutions { distinct: bool },
    /// An aggregate function applied to an expression.
    FunctionCall {
        name: AggregateFunction,
        expression: Expression,
        distinct: bool,
    },
}

impl Display for AggregateExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateExpression::CountSolutions { distinct } => {
                if *distinct {
                    f.write_str("COUNT(DISTINCT *)")
                } else {
                    f.write_str("COUNT(*)")
                }
            }
            AggregateExpression::FunctionCall {
                name,
                expression,
                distinct,
            } => {
                let name = match name {
                    AggregateFunction::Count => "COUNT",
                    AggregateFunction::Sum => "SUM",
                    AggregateFunction::Avg => "AVG",
                    AggregateFunction::Min => "MIN",
                    AggregateFunction::Max => "MAX",
                    AggregateFunction::GroupConcat { .. } => "GROUP_CONCAT",
                    AggregateFunction::Sample => "SAMPLE",
                    AggregateFunction::Custom(name) => name.as_str(),
                };
                f.write_str(name)?;
                f.write_str("(")?;
                if *distinct {
                    f.write_str("DISTINCT ")?;
                }
                expression.fmt(f)?;
                if let AggregateFunction::GroupConcat {
                    separator: Some(separator),
                } = name_of(self)
                {
                    write!(f, "; SEPARATOR={separator:?}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn name_of(aggregate: &AggregateExpression) -> &AggregateFunction {
    match aggregate {
        AggregateExpression::CountSolutions { .. } => &AggregateFunction::Count,
        AggregateExpression::FunctionCall { name, .. } => name,
    }
}
