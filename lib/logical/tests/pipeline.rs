use insta::assert_snapshot;
use rdf_weave_functions::BuiltinName;
use rdf_weave_logical::optimizer::{
    AlgebraOptimizer, OptimizationLevel, OptimizerConfig, OptimizerContext,
};
use rdf_weave_logical::{Algebra, Expression};
use rdf_weave_model::{Literal, NamedNode, TermPattern, TriplePattern, Variable};

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn term(value: &str) -> TermPattern {
    match value.strip_prefix('?') {
        Some(name) => var(name).into(),
        None => NamedNode::new_unchecked(format!("http://ex/{value}")).into(),
    }
}

fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
    TriplePattern {
        subject: term(subject),
        predicate: NamedNode::new_unchecked(format!("http://ex/{predicate}")).into(),
        object: term(object),
    }
}

fn optimize(algebra: Algebra, level: OptimizationLevel, config: &OptimizerConfig) -> Algebra {
    AlgebraOptimizer::new(level, config).optimize(algebra, &OptimizerContext::default())
}

#[test]
fn optimization_level_none_keeps_algebra() {
    let algebra = Algebra::filter(
        Algebra::bgp(vec![pattern("?x", "p", "?a"), pattern("?y", "p", "?b")]),
        Expression::builtin(
            BuiltinName::LessThan,
            vec![var("a").into(), var("b").into()],
        ),
    );
    let optimized = optimize(
        algebra.clone(),
        OptimizationLevel::None,
        &OptimizerConfig::default(),
    );
    assert_eq!(optimized, algebra);
}

#[test]
fn disabled_rules_do_not_fire() {
    let algebra = Algebra::slice(
        Algebra::bgp(vec![pattern("?s", "p", "?o"), pattern("?s", "type", "Car")]),
        0,
        Some(10),
    );
    let config = OptimizerConfig {
        ask_lazy_specialization: false,
        ..OptimizerConfig::default()
    };
    let optimized = optimize(algebra, OptimizationLevel::Default, &config);
    assert_snapshot!(
        optimized,
        @"Slice(Bgp(?s <http://ex/type> <http://ex/Car> . ?s <http://ex/p> ?o), 0, 10)"
    );

    let nothing = optimize(
        optimized.clone(),
        OptimizationLevel::Full,
        &OptimizerConfig::none(),
    );
    assert_eq!(nothing, optimized);
}

#[test]
fn filter_is_placed_then_bgp_is_lazy() {
    let algebra = Algebra::slice(
        Algebra::filter(
            Algebra::bgp(vec![
                pattern("?s", "age", "?age"),
                pattern("?s", "name", "?name"),
            ]),
            Expression::builtin(
                BuiltinName::GreaterThan,
                vec![var("age").into(), Literal::from(18).into()],
            ),
        ),
        0,
        Some(5),
    );
    let optimized = optimize(
        algebra,
        OptimizationLevel::Full,
        &OptimizerConfig::default(),
    );
    assert_snapshot!(
        optimized,
        @r#"Slice(Join(Filter(Bgp(?s <http://ex/age> ?age), GT(?age, "18"^^<http://www.w3.org/2001/XMLSchema#integer>)), Bgp(?s <http://ex/name> ?name)), 0, 5)"#
    );
}

#[test]
fn full_optimization_reaches_fixed_point() {
    let algebra = Algebra::distinct(Algebra::select(
        Algebra::order_by(
            Algebra::filter(
                Algebra::bgp(vec![pattern("?x", "p", "?a"), pattern("?y", "p", "?b")]),
                Expression::builtin(
                    BuiltinName::LessThan,
                    vec![var("a").into(), var("b").into()],
                ),
            ),
            vec![rdf_weave_logical::OrderExpression::Asc(var("a").into())],
        ),
        vec![var("a")],
    ));
    let config = OptimizerConfig::default();
    let once = optimize(algebra, OptimizationLevel::Full, &config);
    let twice = optimize(once.clone(), OptimizationLevel::Full, &config);
    assert_eq!(once, twice);
    assert_snapshot!(
        once,
        @"OrderBy(Distinct(Select(FilteredProduct(Bgp(?x <http://ex/p> ?a), Bgp(?y <http://ex/p> ?b), LT(?a, ?b)), ?a)), ASC(?a))"
    );
}

#[test]
fn service_body_is_not_rewritten() {
    let body = Algebra::filter(
        Algebra::bgp(vec![pattern("?s", "p", "?o"), pattern("?s", "type", "Car")]),
        Expression::builtin(
            BuiltinName::LessThan,
            vec![var("o").into(), Literal::from(3).into()],
        ),
    );
    let algebra = Algebra::slice(
        Algebra::Service {
            name: NamedNode::new_unchecked("http://remote/sparql").into(),
            inner: Box::new(body),
            silent: false,
        },
        0,
        Some(10),
    );
    let optimized = optimize(
        algebra.clone(),
        OptimizationLevel::Full,
        &OptimizerConfig::default(),
    );
    assert_eq!(optimized, algebra);
}
