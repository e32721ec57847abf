use super::*;
use serde_json::json;

fn valid() -> Value {
    json!({
        "schemaVersion": "1.0",
        "meta": { "backend": "mininet-wifi", "name": "two-ap-roam", "duration_s": 30 },
        "topo": {
            "nets": {
                "noise_th": -91,
                "propagation_model": { "model": "logDistance", "exp": 3.5 }
            },
            "aps": [
                { "id": "ap1", "mode": "g", "channel": 1, "ssid": "lab", "position": "0,0,0" },
                { "id": "ap2", "mode": "a", "channel": 36, "ssid": "lab", "position": "50,0,0" }
            ],
            "stations": [ { "id": "sta1", "position": "10,0,0" } ]
        },
        "tests": [
            { "type": "node movements", "name": "walk", "node": "sta1", "position": "40,0,0", "timeframe": 5 },
            { "type": "iw", "name": "link", "cmd": "iw dev {interface} link" }
        ]
    })
}

fn codes_at(errors: &[Finding]) -> Vec<(String, FindingCode)> {
    errors.iter().map(|f| (f.loc.clone(), f.code)).collect()
}

#[test]
fn accepts_well_formed_spec() {
    let spec = validate_schema(&valid()).unwrap();
    assert_eq!(spec.meta.backend, Backend::MininetWifi);
    assert_eq!(spec.meta.duration_s, 30);
    assert_eq!(spec.topo.nets.noise_th, -91.0);
    assert_eq!(spec.topo.aps[1].mode, RadioMode::A);
    assert_eq!(spec.tests.len(), 2);
    match &spec.tests[1] {
        TestAction::Command(c) => assert_eq!(c.timeframe, None),
        other => panic!("unexpected action: {other:?}"),
    }
}

#[test]
fn node_lists_default_to_empty() {
    let mut v = valid();
    let topo = v["topo"].as_object_mut().unwrap();
    topo.remove("aps");
    topo.remove("stations");
    let spec = validate_schema(&v).unwrap();
    assert!(spec.topo.aps.is_empty());
    assert!(spec.topo.stations.is_empty());
}

#[test]
fn tests_list_is_required() {
    let mut v = valid();
    v.as_object_mut().unwrap().remove("tests");
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![("tests".to_owned(), FindingCode::MissingField)]
    );
}

#[test]
fn non_object_root_is_reported_at_root() {
    let errors = validate_schema(&json!([1, 2])).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].loc, "root");
    assert_eq!(errors[0].code, FindingCode::InvalidType);
}

#[test]
fn collects_every_violation_in_one_pass() {
    let mut v = valid();
    v["meta"]["name"] = json!("");
    v["meta"]["duration_s"] = json!(0);
    v["topo"]["aps"][0]["channel"] = json!(-3);
    v["topo"]["aps"][1]["mode"] = json!("z");
    v["topo"]["stations"][0]["position"] = json!("1,2");
    v["tests"][0]["timeframe"] = json!(-1);

    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![
            ("meta.name".to_owned(), FindingCode::InvalidLength),
            ("meta.duration_s".to_owned(), FindingCode::OutOfRange),
            ("topo.aps[0].channel".to_owned(), FindingCode::OutOfRange),
            ("topo.aps[1].mode".to_owned(), FindingCode::InvalidLiteral),
            (
                "topo.stations[0].position".to_owned(),
                FindingCode::MalformedPosition
            ),
            ("tests[0].timeframe".to_owned(), FindingCode::OutOfRange),
        ]
    );
    assert_eq!(errors[1].msg, "value should be greater than 0, got 0");
}

#[test]
fn missing_fields_are_each_reported() {
    let v = json!({
        "schemaVersion": "1.0",
        "meta": { "backend": "mininet" },
        "topo": { "nets": { "noise_th": -90, "propagation_model": { "model": "logDistance", "exp": 2 } } },
        "tests": []
    });
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![
            ("meta.name".to_owned(), FindingCode::MissingField),
            ("meta.duration_s".to_owned(), FindingCode::MissingField),
        ]
    );
    assert_eq!(errors[0].msg, "field required");
}

#[test]
fn ssid_length_is_bounded() {
    let mut v = valid();
    v["topo"]["aps"][0]["ssid"] = json!("x".repeat(33));
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(errors[0].loc, "topo.aps[0].ssid");
    assert_eq!(errors[0].code, FindingCode::InvalidLength);
    assert!(errors[0].msg.contains("between 1 and 32"));
}

#[test]
fn integers_reject_fractions_and_strings() {
    let mut v = valid();
    v["meta"]["duration_s"] = json!(1.5);
    v["topo"]["aps"][0]["channel"] = json!("6");
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![
            ("meta.duration_s".to_owned(), FindingCode::InvalidType),
            ("topo.aps[0].channel".to_owned(), FindingCode::InvalidType),
        ]
    );
}

#[test]
fn noise_threshold_must_not_be_positive() {
    let mut v = valid();
    v["topo"]["nets"]["noise_th"] = json!(3.5);
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(errors[0].loc, "topo.nets.noise_th");
    assert_eq!(errors[0].code, FindingCode::OutOfRange);
}

#[test]
fn shadowing_requires_positive_std_dev() {
    let mut v = valid();
    v["topo"]["nets"]["propagation_model"] = json!({ "model": "logNormalShadowing", "exp": 3 });
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![(
            "topo.nets.propagation_model.std_dev".to_owned(),
            FindingCode::MissingField
        )]
    );

    v["topo"]["nets"]["propagation_model"]["std_dev"] = json!(-1);
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(errors[0].code, FindingCode::OutOfRange);

    v["topo"]["nets"]["propagation_model"]["std_dev"] = json!(2.5);
    let spec = validate_schema(&v).unwrap();
    assert_eq!(
        spec.topo.nets.propagation_model,
        PropagationModel::LogNormalShadowing {
            exp: 3.0,
            std_dev: 2.5
        }
    );
}

#[test]
fn log_distance_ignores_std_dev() {
    let mut v = valid();
    v["topo"]["nets"]["propagation_model"]["std_dev"] = json!(-4);
    let spec = validate_schema(&v).unwrap();
    assert_eq!(
        spec.topo.nets.propagation_model,
        PropagationModel::LogDistance { exp: 3.5 }
    );
}

#[test]
fn unknown_model_is_an_invalid_literal() {
    let mut v = valid();
    v["topo"]["nets"]["propagation_model"]["model"] = json!("friis");
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![(
            "topo.nets.propagation_model.model".to_owned(),
            FindingCode::InvalidLiteral
        )]
    );
    assert!(errors[0].msg.contains("\"logDistance\""));
}

#[test]
fn unknown_test_type_is_an_unknown_variant() {
    let mut v = valid();
    v["tests"][1] = json!({ "type": "ping", "name": "p" });
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![("tests[1].type".to_owned(), FindingCode::UnknownVariant)]
    );
}

#[test]
fn command_timeframe_is_optional_but_checked() {
    let mut v = valid();
    v["tests"][1]["timeframe"] = json!(null);
    assert!(validate_schema(&v).is_ok());

    v["tests"][1]["timeframe"] = json!(7);
    let spec = validate_schema(&v).unwrap();
    match &spec.tests[1] {
        TestAction::Command(c) => assert_eq!(c.timeframe, Some(7)),
        other => panic!("unexpected action: {other:?}"),
    }

    v["tests"][1]["timeframe"] = json!(-2);
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(errors[0].loc, "tests[1].timeframe");
    assert_eq!(errors[0].code, FindingCode::OutOfRange);
}

#[test]
fn broken_sub_object_is_reported_once() {
    let mut v = valid();
    v["topo"]["nets"] = json!("loud");
    let errors = validate_schema(&v).unwrap_err();
    assert_eq!(
        codes_at(&errors),
        vec![("topo.nets".to_owned(), FindingCode::InvalidType)]
    );
    assert_eq!(errors[0].msg, "expected an object, got a string");
}

#[test]
fn unknown_keys_are_ignored() {
    let mut v = valid();
    v["meta"]["owner"] = json!("lab-3");
    v["topo"]["aps"][0]["txpower"] = json!(20);
    assert!(validate_schema(&v).is_ok());
}
