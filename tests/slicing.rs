//! Cross-module slicing scenarios: loose bounds, coercion between kinds,
//! step anchoring, and the parser round trips the collections rely on.

use tslice::{
    parse_castable, parse_duration, parse_duration_with, parse_timestamp, MonthsDelta, Ts,
    TsDelta, TsDict, TsError, TsList, TsRecord, TsSlice, Value,
};

fn floats(values: &[f64]) -> TsList {
    values.iter().copied().collect()
}

/// Scenario 1: half-open membership over a float-keyed sequence.
#[test]
fn test_float_sequence_scenario() {
    let list = floats(&[1.0, 1.1, 1.2, 1.3, 1.4]);

    let ranged = list
        .slice(&TsSlice::between(1.0, 1.3))
        .expect("range filter");
    assert_eq!(ranged, floats(&[1.0, 1.1, 1.2]));

    let hits = list.select(&Value::from(1.1)).expect("equality filter");
    assert_eq!(hits, floats(&[1.1]));
}

/// Every element `v` with `a <= cast(v) < b` is kept, and nothing else.
#[test]
fn test_half_open_membership_property() {
    let list = floats(&[1.0, 1.1, 1.2, 1.3, 1.4, 1.5]);
    for (a, b) in [(1.0, 1.3), (1.1, 1.2), (1.25, 1.45), (1.5, 1.0)] {
        let out = list.slice(&TsSlice::between(a, b)).expect("range filter");
        let expected: TsList = [1.0, 1.1, 1.2, 1.3, 1.4, 1.5]
            .into_iter()
            .filter(|v| a <= *v && *v < b)
            .collect();
        assert_eq!(out, expected, "bounds {a}..{b}");
    }
}

/// Step re-slices the already-filtered result: positive steps anchor at its
/// first element, negative steps at its last.
#[test]
fn test_step_property() {
    let list = floats(&[1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9]);
    let ranged = list.slice(&TsSlice::between(1.1, 1.8)).expect("range");

    let stepped = list
        .slice(&TsSlice::between(1.1, 1.8).by(3))
        .expect("stepped");
    let re_sliced = ranged.slice(&TsSlice::all().by(3)).expect("re-slice");
    assert_eq!(stepped, re_sliced);

    let reversed = list
        .slice(&TsSlice::between(1.1, 1.8).by(-3))
        .expect("reverse stepped");
    assert_eq!(reversed, floats(&[1.7, 1.4, 1.1]));
}

/// Mixed element kinds against timestamp bounds of two different kinds.
#[test]
fn test_mixed_kind_bounds() {
    let list: TsList = [
        Value::from("2024-12-24"),
        Value::from(20241226),
        Value::from(20241230.1200),
        Value::from("2025-01-02"),
    ]
    .into_iter()
    .collect();

    // start is a Ts, stop is a string-parsed Ts: each bound gets its own
    // coercion, both compare as timestamps
    let start = Value::from(Ts::new(2024, 12, 25).expect("date"));
    let stop = Value::from(Ts::parse("2025-01-01").expect("parse"));
    let out = list
        .slice(&TsSlice {
            start: Some(start),
            stop: Some(stop),
            step: None,
        })
        .expect("range filter");
    assert_eq!(out.len(), 2);
}

/// Integer bounds bypass coercion entirely.
#[test]
fn test_integer_escape_hatch() {
    let list = floats(&[1.0, 1.1, 1.2, 1.3, 1.4]);
    let out = list
        .slice(&TsSlice {
            start: Some(Value::Int(-3)),
            stop: None,
            step: None,
        })
        .expect("positional");
    assert_eq!(out, floats(&[1.2, 1.3, 1.4]));
}

/// Coercion failures inside the predicate surface as errors, not as
/// silently dropped elements.
#[test]
fn test_coercion_failure_propagates() {
    let list: TsList = [Value::from(1.5), Value::from("not a number")]
        .into_iter()
        .collect();
    assert!(list.slice(&TsSlice::between(1.0, 2.0)).is_err());
}

/// A non-integer step is a configuration error naming the offending kind.
#[test]
fn test_step_kind_error() {
    let list = floats(&[1.0, 1.1]);
    match list.slice(&TsSlice::between(1.0, 1.1).with_step("daily")) {
        Err(TsError::Step(kind)) => assert_eq!(kind, "str"),
        other => panic!("expected step error, got {other:?}"),
    }
}

/// Scenario: mapping with date-string keys, sliced whole, then after a
/// deletion.
#[test]
fn test_dict_scenario() {
    let mut dict = TsDict::new();
    dict.insert("2024-12-24", Value::from("Christmas Eve"));
    dict.insert("2024-12-31", Value::from("New Years Eve"));

    let all = dict.slice(&TsSlice::all()).expect("slice");
    assert_eq!(
        all.keys(),
        ["2024-12-24", "2024-12-31"].into_iter().collect()
    );

    dict.remove(&Value::from("2024-12-24"));
    let rest = dict.slice(&TsSlice::all()).expect("slice");
    assert_eq!(rest.keys(), ["2024-12-31"].into_iter().collect());
    assert_eq!(rest.values(), vec![&Value::from("New Years Eve")]);
}

/// Timestamp-typed bounds against string keys on the mapping variant.
#[test]
fn test_dict_timestamp_bounds_over_string_keys() {
    let dict: TsDict = [
        ("2024-12-24", "eve"),
        ("2024-12-26", "boxing"),
        ("2024-12-31", "nye"),
    ]
    .into_iter()
    .collect();

    let out = dict
        .slice(&TsSlice::between(
            Value::from(Ts::new(2024, 12, 25).expect("date")),
            Value::from(Ts::new(2024, 12, 31).expect("date")),
        ))
        .expect("slice");
    assert_eq!(out.keys(), ["2024-12-26"].into_iter().collect());
}

/// Locale-ambiguous text goes through the sniffing path: it warns (visible
/// with logging enabled) but still parses.
#[test]
fn test_free_form_parse_warns_not_fails() {
    let _ = env_logger::builder().is_test(true).try_init();
    let t = parse_timestamp(Some(&Value::from("13.10.2020")), None).expect("sniffed");
    assert_eq!(t.date(), Ts::new(2020, 10, 13).expect("date").date());
}

/// The three equivalent encodings of one moment.
#[test]
fn test_timestamp_encodings_agree() {
    let from_str = parse_timestamp(Some(&Value::from("2020-10-13")), None).expect("str");
    let from_int = parse_timestamp(Some(&Value::from(20201013)), None).expect("int");
    let from_float = parse_timestamp(Some(&Value::from(20201013.012345)), None).expect("float");

    assert_eq!(from_str, from_int);
    assert_eq!(from_float.date(), from_str.date());
    assert_eq!(
        (from_float.hour(), from_float.minute(), from_float.second()),
        (1, 23, 45)
    );
}

/// Duration text scenarios from loose human input to exact components.
#[test]
fn test_duration_scenarios() {
    let d = parse_duration("2 hours 4 Minutes 8 Sec").expect("compound");
    assert_eq!((d.days(), d.seconds()), (0, 7448));

    let m: MonthsDelta = parse_duration_with("1y 3quarters 1m").expect("months");
    assert_eq!(
        (m.days(), m.seconds(), m.microseconds(), m.months()),
        (0, 0, 0, 22)
    );
}

/// Formatting then parsing reconstructs the same duration.
#[test]
fn test_duration_round_trip_property() {
    let samples = [
        TsDelta::new(9, 0, 0),
        TsDelta::new(0, 7448, 0),
        TsDelta::new(2, 3600, 250_000),
        TsDelta::new(-3, 0, 0),
        TsDelta::new(0, -90, 0),
    ];
    for delta in samples {
        let text = delta.to_string();
        let back = parse_duration(&text).expect("parse back");
        assert_eq!(
            (back.days(), back.seconds(), back.microseconds()),
            (delta.days(), delta.seconds(), delta.microseconds()),
            "round trip of {text:?}"
        );
    }
}

/// A record with a configured timestamp capability slots into filtering.
#[test]
fn test_record_as_slice_bound() {
    let record = TsRecord::new()
        .with_field("filed", "2024-12-25")
        .with_cast("ts", "filed");
    let bound = parse_castable(&record, None).expect("capability");

    let dict: TsDict = [("2024-12-24", "eve"), ("2024-12-26", "boxing")]
        .into_iter()
        .collect();
    let out = dict
        .slice(&TsSlice::since(Value::from(bound)))
        .expect("slice");
    assert_eq!(out.keys(), ["2024-12-26"].into_iter().collect());
}

/// Timestamp differences feed distributive arithmetic.
#[test]
fn test_delta_distribution() {
    let origin = Ts::new(2021, 12, 12).expect("date");
    let list: TsList = [
        Value::from(Ts::new(2021, 12, 13).expect("date")),
        Value::from(Ts::new(2021, 12, 21).expect("date")),
    ]
    .into_iter()
    .collect();

    let diffs = list.sub(&Value::from(origin)).expect("distribute");
    assert_eq!(
        diffs,
        [
            Value::from(TsDelta::new(1, 0, 0)),
            Value::from(TsDelta::new(9, 0, 0)),
        ]
        .into_iter()
        .collect()
    );

    let doubled = diffs.mul(&Value::Int(2)).expect("distribute");
    assert_eq!(
        doubled,
        [
            Value::from(TsDelta::new(2, 0, 0)),
            Value::from(TsDelta::new(18, 0, 0)),
        ]
        .into_iter()
        .collect()
    );
}
