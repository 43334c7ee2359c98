use credal_evidence::{
    belief, combine, marginalize, plausibility, scale_by_belief, EvidenceError, FocalSet,
    MassFunction,
};
use credal_tests::{assert_close, fever_evidence, flu_evidence};

#[test]
fn diagnosis_example() {
    let flu = flu_evidence();
    let fever = fever_evidence();

    let flu_set = FocalSet::of(["Flu"]);
    assert_close(belief(&flu, &flu_set), 0.1);
    assert_close(plausibility(&flu, &flu_set), 0.2);

    let fever_given_flu = scale_by_belief(&flu, &fever, "Flu");
    let fever_set = FocalSet::of(["Fever"]);
    assert_close(belief(&fever_given_flu, &fever_set), 0.07);
    assert_close(plausibility(&fever_given_flu, &fever_set), 0.08);
}

#[test]
fn independent_sources_reinforce() {
    let flu = flu_evidence();
    let combined = combine(&flu, &flu).unwrap();
    let no_flu = FocalSet::of(["No Flu"]);
    assert!(belief(&combined, &no_flu) > belief(&flu, &no_flu));
    assert!(belief(&combined, &no_flu) <= plausibility(&combined, &no_flu));
    assert_close(combined.total(), 1.0);
}

#[test]
fn disjoint_frames_are_in_total_conflict() {
    let err = combine(&flu_evidence(), &fever_evidence()).unwrap_err();
    match err {
        EvidenceError::TotalConflict { conflict } => assert_close(conflict, 1.0),
        other => panic!("expected total conflict, got {other:?}"),
    }
}

#[test]
fn marginalize_onto_frame_is_identity() {
    let flu = flu_evidence();
    let marginal = marginalize(&flu, &flu.frame());
    assert_eq!(marginal, flu);
}

#[test]
fn invalid_masses_are_rejected() {
    let err = MassFunction::new([(FocalSet::of(["Flu"]), 0.4)]).unwrap_err();
    assert!(matches!(err, EvidenceError::InvalidMass(_)));
}
