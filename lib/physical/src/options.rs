use std::time::Duration;

/// Options that change how an algebra tree is evaluated.
///
/// The options are an immutable value that is handed to every evaluation through the
/// [EvaluationContext](crate::EvaluationContext). There is no global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// If set, `+` and `-` only accept numeric operands. Otherwise, they also add durations to
    /// dates and times.
    pub strict_operators: bool,
    /// If set, BGPs are evaluated pattern by pattern and hash joined afterward, and path closures
    /// with two bound ends are computed from every start node. This is slower but does not rely
    /// on passing bindings between patterns.
    pub rigorous_evaluation: bool,
    /// If set, independent children of joins, unions and products are evaluated in parallel.
    pub parallel: bool,
    /// The maximum duration of the evaluation.
    pub timeout: Option<Duration>,
}
