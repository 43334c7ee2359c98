use credal_core::{
    Aggregation, CredalNetwork, CredalTable, Interval, PropagationConfig, RecordingObserver,
};
use credal_tests::{assert_close, label, medical_network, medical_nodes, point_chain};

fn total_probability() -> PropagationConfig {
    PropagationConfig::default().with_aggregation(Aggregation::TotalProbability)
}

#[test]
fn roots_keep_their_own_bounds() {
    let network = medical_network().unwrap();
    let marginals = network.propagate().unwrap();
    assert_eq!(
        marginals[&label("Flu")][&label("Present")],
        Interval::new(0.05, 0.1).unwrap()
    );
    assert_eq!(
        marginals[&label("Cold")][&label("Absent")],
        Interval::new(0.8, 0.9).unwrap()
    );
}

#[test]
fn medical_scenario_pointwise() {
    let marginals = medical_network().unwrap().propagate().unwrap();

    let fever = &marginals[&label("Fever")];
    assert_close(fever[&label("Present")].low(), 0.0);
    assert_close(fever[&label("Present")].high(), 0.95 * 0.2 * 0.85);
    assert_close(fever[&label("Absent")].high(), 0.95 * 0.9 * 1.0);

    let cough = &marginals[&label("Cough")];
    assert_close(cough[&label("Present")].low(), 0.0);
    assert_close(cough[&label("Present")].high(), 0.95 * 0.2 * 0.7);
    assert_close(cough[&label("Absent")].high(), 0.95 * 0.9 * 1.0);
    assert!(cough[&label("Absent")].low() > 0.0);
}

#[test]
fn medical_scenario_total_probability() {
    let marginals = medical_network()
        .unwrap()
        .propagate_with_config(total_probability())
        .unwrap();
    let present = marginals[&label("Fever")][&label("Present")];
    assert!(present.low() > 0.0 && present.high() < 1.0);
    assert_close(present.low(), 0.107);
    assert_close(present.high(), 0.321);

    let absent = marginals[&label("Fever")][&label("Absent")];
    assert_close(absent.low(), 0.679);
    assert_close(absent.high(), 0.893);
}

#[test]
fn point_chain_reduces_to_forward_propagation() {
    let marginals = point_chain()
        .unwrap()
        .propagate_with_config(total_probability())
        .unwrap();

    let expected = [
        ("B", "b0", 0.48),
        ("B", "b1", 0.52),
        ("C", "c0", 0.292),
        ("C", "c1", 0.708),
    ];
    for (node, state, p) in expected {
        let interval = marginals[&label(node)][&label(state)];
        assert_close(interval.low(), p);
        assert_close(interval.high(), p);
    }
}

#[test]
fn point_chain_stays_interval_valued_under_pointwise() {
    let marginals = point_chain().unwrap().propagate().unwrap();
    let b0 = marginals[&label("B")][&label("b0")];
    assert_close(b0.low(), 0.3 * 0.2);
    assert_close(b0.high(), 0.7 * 0.6);
}

#[test]
fn registration_order_does_not_change_results() {
    let forward = medical_network().unwrap();
    let mut reversed = CredalNetwork::new();
    for node in medical_nodes().unwrap().into_iter().rev() {
        reversed.add_node(node);
    }
    for config in [PropagationConfig::default(), total_probability()] {
        assert_eq!(
            forward.propagate_with_config(config).unwrap(),
            reversed.propagate_with_config(config).unwrap()
        );
    }
}

#[test]
fn layered_propagation_matches_sequential() {
    let network = medical_network().unwrap();
    for config in [PropagationConfig::default(), total_probability()] {
        let (layered, diagnostics) = network.propagate_parallel(config).unwrap();
        assert_eq!(layered, network.propagate_with_config(config).unwrap());
        assert_eq!(diagnostics.nodes_computed, 4);
    }
}

#[test]
fn observer_sees_every_node_once() {
    let network = medical_network().unwrap();
    let mut observer = RecordingObserver::new();
    let (_, diagnostics) = network
        .propagate_observed(PropagationConfig::default(), &mut observer)
        .unwrap();
    let mut completed = observer.completed();
    completed.sort_unstable();
    assert_eq!(completed, ["Cold", "Cough", "Fever", "Flu"]);
    assert_eq!(diagnostics.nodes_computed, 4);
    assert_eq!(diagnostics.assignments_evaluated, 2 * 64);
}

#[test]
fn compute_marginal_only_touches_ancestors() {
    let network = medical_network().unwrap();
    let fever = network.compute_marginal("Fever").unwrap();
    assert_eq!(fever.len(), 2);
    assert!(network.compute_marginal("Sneeze").is_err());
}

#[test]
fn replaced_table_is_seen_by_the_next_pass() {
    let mut network = medical_network().unwrap();
    let before = network.propagate().unwrap();
    assert_close(before[&label("Fever")][&label("Present")].high(), 0.95 * 0.2 * 0.85);

    network
        .set_credal_table(
            "Flu",
            CredalTable::root([("Present", (0.4, 0.5)), ("Absent", (0.5, 0.6))]).unwrap(),
        )
        .unwrap();
    assert!(network.validate().is_ok());

    let after = network.propagate().unwrap();
    assert_eq!(
        after[&label("Flu")][&label("Present")],
        Interval::new(0.4, 0.5).unwrap()
    );
    // (Present, Absent) now dominates: Flu.Present reaches 0.5 and Cold.Absent 0.9.
    assert_close(after[&label("Fever")][&label("Present")].high(), 0.5 * 0.9 * 0.95);
    assert_ne!(before[&label("Cough")], after[&label("Cough")]);
    assert_eq!(before[&label("Cold")], after[&label("Cold")]);
}
