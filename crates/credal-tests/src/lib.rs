//! Shared fixtures for the credal integration and property tests.

use credal_core::{CredalNetwork, CredalNode, CredalTable, ExecError, StateLabel};
use credal_evidence::{FocalSet, MassFunction};

/// The medical diagnosis demo shipped with the CLI.
pub const MEDICAL_DIAGNOSIS_JSON: &str = include_str!("../../../demos/medical_diagnosis.json");

/// Row bounds for a binary `Present`/`Absent` node.
pub type BinaryRow = ((f64, f64), (f64, f64));

pub fn binary_root(name: &str, present: (f64, f64), absent: (f64, f64)) -> Result<CredalNode, ExecError> {
    CredalNode::root(name)
        .with_credal_table(CredalTable::root([("Present", present), ("Absent", absent)])?)
}

/// A binary child of two binary parents; `rows` are in (PP, PA, AP, AA) order.
pub fn binary_child(
    name: &str,
    parents: [&str; 2],
    rows: [BinaryRow; 4],
) -> Result<CredalNode, ExecError> {
    let givens = [
        ["Present", "Present"],
        ["Present", "Absent"],
        ["Absent", "Present"],
        ["Absent", "Absent"],
    ];
    let mut table = CredalTable::new();
    for (given, (present, absent)) in givens.into_iter().zip(rows) {
        table = table.with_row(given, [("Present", present), ("Absent", absent)])?;
    }
    CredalNode::new(name, parents).with_credal_table(table)
}

/// Flu, Cold, Fever and Cough nodes in dependency order.
pub fn medical_nodes() -> Result<Vec<CredalNode>, ExecError> {
    Ok(vec![
        binary_root("Flu", (0.05, 0.1), (0.9, 0.95))?,
        binary_root("Cold", (0.1, 0.2), (0.8, 0.9))?,
        binary_child(
            "Fever",
            ["Flu", "Cold"],
            [
                ((0.9, 1.0), (0.0, 0.1)),
                ((0.8, 0.95), (0.05, 0.2)),
                ((0.7, 0.85), (0.15, 0.3)),
                ((0.0, 0.1), (0.9, 1.0)),
            ],
        )?,
        binary_child(
            "Cough",
            ["Flu", "Cold"],
            [
                ((0.8, 0.95), (0.05, 0.2)),
                ((0.6, 0.8), (0.2, 0.4)),
                ((0.5, 0.7), (0.3, 0.5)),
                ((0.0, 0.1), (0.9, 1.0)),
            ],
        )?,
    ])
}

pub fn medical_network() -> Result<CredalNetwork, ExecError> {
    let mut network = CredalNetwork::new();
    for node in medical_nodes()? {
        network.add_node(node);
    }
    Ok(network)
}

/// A -> B -> C with point-valued tables.
///
/// A = (a0 0.3, a1 0.7); B|a0 = (0.2, 0.8), B|a1 = (0.6, 0.4);
/// C|b0 = (0.5, 0.5), C|b1 = (0.1, 0.9).
pub fn point_chain() -> Result<CredalNetwork, ExecError> {
    let a = CredalNode::root("A")
        .with_credal_table(CredalTable::root([("a0", (0.3, 0.3)), ("a1", (0.7, 0.7))])?)?;
    let b = CredalNode::new("B", ["A"]).with_credal_table(
        CredalTable::new()
            .with_row(["a0"], [("b0", (0.2, 0.2)), ("b1", (0.8, 0.8))])?
            .with_row(["a1"], [("b0", (0.6, 0.6)), ("b1", (0.4, 0.4))])?,
    )?;
    let c = CredalNode::new("C", ["B"]).with_credal_table(
        CredalTable::new()
            .with_row(["b0"], [("c0", (0.5, 0.5)), ("c1", (0.5, 0.5))])?
            .with_row(["b1"], [("c0", (0.1, 0.1)), ("c1", (0.9, 0.9))])?,
    )?;

    let mut network = CredalNetwork::new();
    network.add_node(a);
    network.add_node(b);
    network.add_node(c);
    Ok(network)
}

pub fn label(s: &str) -> StateLabel {
    StateLabel::from(s)
}

/// Mass function over `{Flu, No Flu}`: 0.1 / 0.8 / 0.1 on the frame.
pub fn flu_evidence() -> MassFunction {
    MassFunction::new([
        (FocalSet::of(["Flu"]), 0.1),
        (FocalSet::of(["No Flu"]), 0.8),
        (FocalSet::of(["Flu", "No Flu"]), 0.1),
    ])
    .expect("flu evidence is normalized")
}

/// Mass function over `{Fever, No Fever}`: 0.7 / 0.2 / 0.1 on the frame.
pub fn fever_evidence() -> MassFunction {
    MassFunction::new([
        (FocalSet::of(["Fever"]), 0.7),
        (FocalSet::of(["No Fever"]), 0.2),
        (FocalSet::of(["Fever", "No Fever"]), 0.1),
    ])
    .expect("fever evidence is normalized")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
