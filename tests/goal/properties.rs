use arbiter::{
    goal::{
        ArgMaxSelector, EvaluationIssue, GoalSelector, GoalSpec, SoftmaxSelector, Trait, ValueTerm,
        VisitPath,
    },
    valuation::{
        ConstantUtility, LinearDecay, LinearRamp, StrategyError, UrgencyFn, UtilityFn, WorldState,
    },
};

use super::{assert_close, constant_goal, engine, graph_of, id};

#[test]
fn given_leaf_goal_without_traits_when_evaluated_then_value_is_exact_product() {
    let graph = graph_of(vec![constant_goal("Leaf", 0.7, 0.3).with_weight(2.5)]);
    let engine = engine();
    let mut visiting = VisitPath::new();
    let mut issues = Vec::new();

    let value = engine.effective_value(
        &graph,
        id(&graph, "Leaf"),
        3.0,
        &WorldState::new(),
        &mut visiting,
        &mut issues,
    );

    assert_eq!(value, 0.7 * 0.3 * 2.5);
    assert!(issues.is_empty());
}

#[test]
fn given_adversarial_strategies_when_evaluated_then_every_value_is_finite() {
    let graph = graph_of(vec![
        GoalSpec::new(
            "NanUrgency",
            UrgencyFn::new("nan", |_| Ok(f64::NAN)),
            ConstantUtility(1.0),
        ),
        GoalSpec::new(
            "InfiniteUrgency",
            UrgencyFn::new("inf", |_| Ok(f64::INFINITY)),
            ConstantUtility(1.0),
        ),
        GoalSpec::new(
            "InfiniteUtility",
            LinearRamp::new(1.0),
            UtilityFn::new("inf", |_| Ok(f64::NEG_INFINITY)),
        ),
        GoalSpec::new(
            "FailingUtility",
            LinearRamp::new(1.0),
            UtilityFn::new("err", |_| Err(StrategyError::failed("sensor offline"))),
        ),
        GoalSpec::new(
            "PanickingUrgency",
            UrgencyFn::new("panic", |_| panic!("urgency exploded")),
            ConstantUtility(1.0),
        )
        .depends_on("NanUrgency")
        .depends_on("InfiniteUtility"),
    ]);

    let evaluation = engine().evaluate(&graph, 2.0, &WorldState::new().with("risk", f64::NAN));

    for trace in &evaluation.traces {
        assert!(
            trace.effective_value.is_finite(),
            "{} produced {}",
            trace.name,
            trace.effective_value
        );
    }
    let infinite_urgency = evaluation
        .trace("InfiniteUrgency")
        .expect("trace should exist");
    assert_eq!(infinite_urgency.urgency, 1.0);
    assert!(evaluation.issues().count() >= 4);
}

#[test]
fn given_finite_strategy_output_that_overflows_when_combined_then_terms_are_zeroed() {
    let graph = graph_of(vec![
        GoalSpec::new("Big", LinearRamp::new(1.0), ConstantUtility(f64::MAX)).with_weight(2.0),
        GoalSpec::new("BigRisky", LinearRamp::new(1.0), ConstantUtility(f64::MAX))
            .with_weight(2.0)
            .with_traits([Trait::RiskAverse]),
        constant_goal("Huge", 1.0, f64::MAX),
        constant_goal("Summit", 0.0, 0.0)
            .depends_on("Huge")
            .depends_on("Huge"),
        constant_goal("Tilted", 1.0, f64::MAX).with_traits([Trait::UrgencySensitive]),
    ]);
    let state = WorldState::new().with("risk", 1.0);

    let evaluation = engine().evaluate(&graph, 5.0, &state);

    for trace in &evaluation.traces {
        assert!(
            trace.effective_value.is_finite(),
            "{} produced {}",
            trace.name,
            trace.effective_value
        );
    }
    let zeroed = |name: &str| -> Vec<EvaluationIssue> {
        evaluation.trace(name).expect("trace should exist").issues.clone()
    };
    let overflow = |goal: &str, term: ValueTerm| EvaluationIssue::NonFiniteValue {
        goal: goal.to_string(),
        term,
    };
    assert_eq!(zeroed("Big"), vec![overflow("Big", ValueTerm::Base)]);
    assert_eq!(zeroed("BigRisky"), vec![overflow("BigRisky", ValueTerm::Base)]);
    assert!(zeroed("Huge").is_empty());
    assert_eq!(
        zeroed("Summit"),
        vec![overflow("Summit", ValueTerm::DependencyBonus)]
    );
    assert_eq!(
        zeroed("Tilted"),
        vec![overflow("Tilted", ValueTerm::EffectiveValue)]
    );
    assert!(evaluation.issues().all(|issue| issue.goal() != "Huge"));

    let top = ArgMaxSelector
        .select(&evaluation.traces)
        .expect("selection should exist");
    assert_eq!(top.goal, "Huge");
    let sampled = SoftmaxSelector::new(1.0)
        .expect("selector should build")
        .select(&evaluation.traces)
        .expect("selection should exist");
    assert_eq!(sampled.goal, "Huge");
    assert_eq!(sampled.probability, Some(1.0));
}

#[test]
fn given_mutual_dependency_when_evaluated_then_cyclic_edge_contributes_zero() {
    let graph = graph_of(vec![
        constant_goal("A", 1.0, 1.0).depends_on("B"),
        constant_goal("B", 1.0, 0.5).depends_on("A"),
    ]);
    let engine = engine();
    let mut visiting = VisitPath::new();
    let mut issues = Vec::new();

    let value = engine.effective_value(
        &graph,
        id(&graph, "A"),
        0.0,
        &WorldState::new(),
        &mut visiting,
        &mut issues,
    );

    assert_eq!(value, 1.5);
    assert!(visiting.is_empty());
    assert_eq!(
        issues,
        vec![EvaluationIssue::CycleDetected {
            goal: "A".to_string(),
            path: vec!["A".to_string(), "B".to_string()],
        }]
    );
}

#[test]
fn given_urgency_sensitive_and_exploratory_when_evaluated_then_terms_add_without_risk() {
    let graph = graph_of(vec![
        constant_goal("Scout", 0.5, 0.8)
            .with_traits([Trait::UrgencySensitive, Trait::Exploratory])
            .depends_on("Map"),
        constant_goal("Map", 1.0, 0.2),
    ]);
    let state = WorldState::new().with("novelty", 0.9).with("risk", 0.7);

    let trace = engine()
        .describe(&graph, id(&graph, "Scout"), 0.0, &state)
        .expect("trace should exist");

    let base = 0.5 * 0.8;
    let dep_sum = 0.2;
    assert_close(trace.base, base);
    assert_close(trace.dependency_bonus, dep_sum);
    assert_close(
        trace.effective_value,
        base + dep_sum + 0.1 * base + 0.1 * 0.9 * base,
    );
}

#[test]
fn given_two_dependencies_when_evaluated_then_their_values_are_summed() {
    let graph = graph_of(vec![
        constant_goal("G", 0.6, 0.5).depends_on("D1").depends_on("D2"),
        constant_goal("D1", 0.9, 0.4),
        constant_goal("D2", 0.3, 1.5).with_weight(2.0),
    ]);
    let engine = engine();
    let state = WorldState::new();
    let value_of = |name: &str| {
        engine.effective_value(
            &graph,
            id(&graph, name),
            1.0,
            &state,
            &mut VisitPath::new(),
            &mut Vec::new(),
        )
    };

    assert_close(value_of("G"), 0.6 * 0.5 + value_of("D1") + value_of("D2"));
}

#[test]
fn given_identical_values_when_select_top_then_earlier_goal_wins_every_time() {
    let graph = graph_of(vec![
        constant_goal("First", 0.5, 0.5),
        constant_goal("Second", 0.5, 0.5),
    ]);
    let engine = engine();

    for _ in 0..5 {
        let selection = engine
            .select_top(&graph, 1.0, &WorldState::new())
            .expect("selection should exist");
        assert_eq!(selection.goal, "First");
    }

    let reversed = graph_of(vec![
        constant_goal("Second", 0.5, 0.5),
        constant_goal("First", 0.5, 0.5),
    ]);
    let selection = engine
        .select_top(&reversed, 1.0, &WorldState::new())
        .expect("selection should exist");
    assert_eq!(selection.goal, "Second");
}

#[test]
fn given_decaying_urgency_when_t_is_half_then_value_matches_worked_example() {
    let graph = graph_of(vec![GoalSpec::new(
        "Rest",
        LinearDecay::new(1.0),
        ConstantUtility(0.8),
    )]);

    let trace = engine()
        .describe(&graph, id(&graph, "Rest"), 0.5, &WorldState::new())
        .expect("trace should exist");

    assert_eq!(trace.urgency, 0.5);
    assert_eq!(trace.effective_value, 0.4);
}

#[test]
fn given_saturated_urgency_when_time_advances_then_ranking_follows_weighted_utility() {
    let graph = graph_of(vec![
        GoalSpec::new("Forage", LinearRamp::new(5.0), ConstantUtility(0.9)).with_weight(0.5),
        GoalSpec::new("Shelter", LinearRamp::new(5.0), ConstantUtility(0.6)),
    ]);
    let engine = engine();
    let state = WorldState::new();

    for t in [5.0, 6.0, 10.0, 100.0, 1.0e6] {
        let evaluation = engine.evaluate(&graph, t, &state);
        let forage = evaluation.trace("Forage").expect("trace should exist");
        let shelter = evaluation.trace("Shelter").expect("trace should exist");
        assert_eq!(forage.urgency, 1.0);
        assert_eq!(shelter.urgency, 1.0);
        assert_eq!(forage.effective_value, 0.9 * 0.5);
        assert_eq!(shelter.effective_value, 0.6);

        let selection = engine
            .select_top(&graph, t, &state)
            .expect("selection should exist");
        assert_eq!(selection.goal, "Shelter");
    }
}
