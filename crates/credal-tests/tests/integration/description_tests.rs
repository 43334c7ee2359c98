use credal_core::{load_network, ExecError, NetworkDescription};
use credal_tests::{label, medical_network, MEDICAL_DIAGNOSIS_JSON};

#[test]
fn demo_description_matches_builder_network() {
    let loaded = load_network(MEDICAL_DIAGNOSIS_JSON).unwrap();
    let built = medical_network().unwrap();
    assert_eq!(loaded.len(), built.len());
    assert_eq!(loaded.propagate().unwrap(), built.propagate().unwrap());
}

#[test]
fn description_survives_a_trip_through_json() {
    let built = medical_network().unwrap();
    let json = NetworkDescription::from_network(&built).to_json_pretty().unwrap();
    let reloaded = load_network(&json).unwrap();
    assert_eq!(reloaded.propagate().unwrap(), built.propagate().unwrap());
}

#[test]
fn marginals_serialize_as_pairs() {
    let marginals = load_network(MEDICAL_DIAGNOSIS_JSON)
        .unwrap()
        .propagate()
        .unwrap();
    let value = serde_json::to_value(&marginals).unwrap();
    let flu_present = &value["Flu"]["Present"];
    assert_eq!(flu_present[0].as_f64(), Some(0.05));
    assert_eq!(flu_present[1].as_f64(), Some(0.1));
    assert!(marginals.contains_key(&label("Cough")));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        load_network("{ \"nodes\": [ }"),
        Err(ExecError::ParseError(_))
    ));
}

#[test]
fn inverted_bounds_are_rejected_on_load() {
    let source = r#"{ "nodes": [ { "name": "X", "table": [ { "bounds": { "a": [0.6, 0.4] } } ] } ] }"#;
    assert!(matches!(load_network(source), Err(ExecError::ParseError(_))));
}

#[test]
fn incomplete_table_fails_validation_on_load() {
    let source = r#"{
        "nodes": [
            { "name": "Rain", "table": [ { "bounds": { "yes": [0.2, 0.3], "no": [0.7, 0.8] } } ] },
            { "name": "Wet", "parents": ["Rain"], "table": [
                { "given": ["yes"], "bounds": { "yes": [0.8, 0.9], "no": [0.1, 0.2] } }
            ] }
        ]
    }"#;
    assert!(matches!(
        load_network(source),
        Err(ExecError::MissingEntry { .. })
    ));
}
