use credal_core::{CredalNetwork, CredalNode, CredalTable, ExecError};
use credal_tests::{binary_root, medical_network, medical_nodes};

#[test]
fn medical_network_validates() {
    let network = medical_network().unwrap();
    assert_eq!(network.len(), 4);
    assert!(network.validate().is_ok());

    let flu = network.node("Flu").unwrap();
    let mut children: Vec<&str> = flu.children().iter().map(|c| c.as_ref()).collect();
    children.sort_unstable();
    assert_eq!(children, ["Cough", "Fever"]);
}

#[test]
fn children_are_wired_regardless_of_registration_order() {
    let mut network = CredalNetwork::new();
    for node in medical_nodes().unwrap().into_iter().rev() {
        network.add_node(node);
    }
    assert!(network.validate().is_ok());
    assert_eq!(network.node("Cold").unwrap().children().len(), 2);
}

#[test]
fn layers_follow_dependencies() {
    let network = medical_network().unwrap();
    let layers = network.topological_layers().unwrap();
    assert_eq!(layers.len(), 2);
    let first: Vec<&str> = layers[0].iter().map(|n| n.as_ref()).collect();
    assert_eq!(first, ["Cold", "Flu"]);
}

#[test]
fn replacing_a_node_drops_stale_children() {
    let mut network = medical_network().unwrap();
    let fever_only_flu = CredalNode::new("Fever", ["Flu"])
        .with_credal_table(
            CredalTable::new()
                .with_row(["Present"], [("Present", (0.8, 0.9)), ("Absent", (0.1, 0.2))])
                .unwrap()
                .with_row(["Absent"], [("Present", (0.0, 0.1)), ("Absent", (0.9, 1.0))])
                .unwrap(),
        )
        .unwrap();
    let replaced = network.add_node(fever_only_flu);
    assert!(replaced.is_some());

    let cold_children: Vec<&str> = network
        .node("Cold")
        .unwrap()
        .children()
        .iter()
        .map(|c| c.as_ref())
        .collect();
    assert_eq!(cold_children, ["Cough"]);
    assert!(network.validate().is_ok());
}

#[test]
fn validate_reports_missing_combination() {
    let mut network = CredalNetwork::new();
    network.add_node(binary_root("Flu", (0.05, 0.1), (0.9, 0.95)).unwrap());
    network.add_node(
        CredalNode::new("Fever", ["Flu"])
            .with_credal_table(
                CredalTable::new()
                    .with_row(["Present"], [("Present", (0.8, 0.9)), ("Absent", (0.1, 0.2))])
                    .unwrap(),
            )
            .unwrap(),
    );
    let err = network.validate().unwrap_err();
    assert_eq!(
        err,
        ExecError::MissingEntry {
            node: "Fever".into(),
            assignment: "(Absent)".into(),
        }
    );
}

#[test]
fn validate_rejects_rows_naming_unknown_parent_states() {
    let mut network = CredalNetwork::new();
    network.add_node(binary_root("Flu", (0.05, 0.1), (0.9, 0.95)).unwrap());
    let table = CredalTable::new()
        .with_row(["Present"], [("yes", (0.5, 0.6))])
        .unwrap()
        .with_row(["Absent"], [("yes", (0.1, 0.2))])
        .unwrap()
        .with_row(["Maybe"], [("yes", (0.3, 0.4))])
        .unwrap();
    network.add_node(CredalNode::new("Sneeze", ["Flu"]).with_credal_table(table).unwrap());
    assert!(matches!(
        network.validate(),
        Err(ExecError::ValidationError(msg)) if msg.contains("Maybe")
    ));
}

#[test]
fn node_rejects_table_with_wrong_arity() {
    let table = CredalTable::new()
        .with_row(["a", "b"], [("s", (0.1, 0.2))])
        .unwrap();
    let err = CredalNode::new("X", ["P"]).with_credal_table(table).unwrap_err();
    assert!(matches!(err, ExecError::ValidationError(_)));
}
