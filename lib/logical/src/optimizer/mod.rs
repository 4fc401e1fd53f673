//! Rewrite rules that run between translating a query and evaluating it.
//!
//! Every rule is a pure function from one [Algebra] to another. The order of the rules matters:
//! filters must have reached their final position before the implicit-join and filtered-product
//! rules inspect them.

mod ask_lazy;
mod bgp_reordering;
mod filter_placement;
mod filtered_product;
mod implicit_join;
mod order_by_distinct;

pub use ask_lazy::AskLazySpecializationRule;
pub use bgp_reordering::BgpReorderingRule;
pub use filter_placement::FilterPlacementRule;
pub use filtered_product::FilteredProductRule;
pub use implicit_join::ImplicitJoinRule;
pub use order_by_distinct::OrderByDistinctFusionRule;

use crate::{Algebra, Transformed};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;

/// The maximum number of pipeline runs for [OptimizationLevel::Full].
const MAX_ITERATIONS: usize = 8;

/// Information about the query that is being optimized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizerContext {
    /// Whether only the existence of a solution matters (ASK).
    pub ask_query: bool,
}

/// A rewrite of the algebra tree.
pub trait AlgebraRule: Debug + Send + Sync {
    /// A unique name of the rule.
    fn name(&self) -> &str;

    /// Rewrites `algebra`. Must return [Transformed::no] if nothing has changed.
    fn rewrite(&self, algebra: Algebra, context: &OptimizerContext) -> Transformed<Algebra>;
}

/// Defines how many optimizations the query optimizer should apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    /// The algebra is evaluated as translated.
    None,
    /// Runs each enabled rule once.
    #[default]
    Default,
    /// Re-runs the enabled rules until the tree no longer changes.
    Full,
}

/// Toggles for the individual rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "Each rule is toggled independently"
)]
pub struct OptimizerConfig {
    pub bgp_reordering: bool,
    pub filter_placement: bool,
    pub ask_lazy_specialization: bool,
    pub implicit_join: bool,
    pub filtered_product: bool,
    pub order_by_distinct_fusion: bool,
}

impl OptimizerConfig {
    /// A configuration with every rule disabled.
    pub fn none() -> Self {
        Self {
            bgp_reordering: false,
            filter_placement: false,
            ask_lazy_specialization: false,
            implicit_join: false,
            filtered_product: false,
            order_by_distinct_fusion: false,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bgp_reordering: true,
            filter_placement: true,
            ask_lazy_specialization: true,
            implicit_join: true,
            filtered_product: true,
            order_by_distinct_fusion: true,
        }
    }
}

/// Creates the enabled rules in their pipeline order.
pub fn create_optimizer_rules(config: &OptimizerConfig) -> Vec<Arc<dyn AlgebraRule>> {
    let mut rules: Vec<Arc<dyn AlgebraRule>> = Vec::new();
    if config.bgp_reordering {
        rules.push(Arc::new(BgpReorderingRule::new()));
    }
    if config.filter_placement {
        rules.push(Arc::new(FilterPlacementRule::new()));
    }
    if config.ask_lazy_specialization {
        rules.push(Arc::new(AskLazySpecializationRule::new()));
    }
    if config.implicit_join {
        rules.push(Arc::new(ImplicitJoinRule::new()));
    }
    if config.filtered_product {
        rules.push(Arc::new(FilteredProductRule::new()));
    }
    if config.order_by_distinct_fusion {
        rules.push(Arc::new(OrderByDistinctFusionRule::new()));
    }
    rules
}

/// Runs a pipeline of [AlgebraRule]s.
#[derive(Debug, Clone)]
pub struct AlgebraOptimizer {
    level: OptimizationLevel,
    rules: Vec<Arc<dyn AlgebraRule>>,
}

impl AlgebraOptimizer {
    /// Creates an optimizer with the rules enabled in `config`.
    pub fn new(level: OptimizationLevel, config: &OptimizerConfig) -> Self {
        Self::with_rules(level, create_optimizer_rules(config))
    }

    /// Creates an optimizer with a custom pipeline.
    pub fn with_rules(level: OptimizationLevel, rules: Vec<Arc<dyn AlgebraRule>>) -> Self {
        Self { level, rules }
    }

    pub fn rules(&self) -> &[Arc<dyn AlgebraRule>] {
        &self.rules
    }

    /// Optimizes `algebra` according to the optimization level.
    pub fn optimize(&self, algebra: Algebra, context: &OptimizerContext) -> Algebra {
        let iterations = match self.level {
            OptimizationLevel::None => return algebra,
            OptimizationLevel::Default => 1,
            OptimizationLevel::Full => MAX_ITERATIONS,
        };

        let mut algebra = algebra;
        for iteration in 0..iterations {
            let result = self.run_pipeline(algebra, context);
            algebra = result.data;
            if !result.transformed {
                trace!(iteration, "Optimizer reached a fixed point");
                break;
            }
        }
        algebra
    }

    fn run_pipeline(&self, algebra: Algebra, context: &OptimizerContext) -> Transformed<Algebra> {
        let mut transformed = false;
        let mut algebra = algebra;
        for rule in &self.rules {
            let result = rule.rewrite(algebra, context);
            if result.transformed {
                trace!(rule = rule.name(), algebra = %result.data, "Rule rewrote the algebra");
            }
            transformed |= result.transformed;
            algebra = result.data;
        }
        Transformed::new(algebra, transformed)
    }
}

impl Default for AlgebraOptimizer {
    fn default() -> Self {
        Self::new(OptimizationLevel::default(), &OptimizerConfig::default())
    }
}
