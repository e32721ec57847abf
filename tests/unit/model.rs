use super::*;
use serde_json::json;

#[test]
fn literals_round_trip_through_from_literal() {
    for b in Backend::ALL {
        assert_eq!(Backend::from_literal(b.as_str()), Some(b));
    }
    for k in PropagationKind::ALL {
        assert_eq!(PropagationKind::from_literal(k.as_str()), Some(k));
    }
    for m in RadioMode::ALL {
        assert_eq!(RadioMode::from_literal(m.as_str()), Some(m));
    }
    assert_eq!(RadioMode::from_literal("AC"), None);
    assert_eq!(Backend::from_literal("mininet_wifi"), None);
}

#[test]
fn serialized_literals_match_as_str() {
    assert_eq!(
        serde_json::to_value(Backend::MininetWifi).unwrap(),
        json!("mininet-wifi")
    );
    assert_eq!(serde_json::to_value(RadioMode::Ax).unwrap(), json!("ax"));
}

#[test]
fn propagation_model_is_tagged_by_model() {
    let m = PropagationModel::LogNormalShadowing {
        exp: 3.0,
        std_dev: 2.0,
    };
    assert_eq!(
        serde_json::to_value(&m).unwrap(),
        json!({ "model": "logNormalShadowing", "exp": 3.0, "std_dev": 2.0 })
    );
    assert_eq!(m.kind(), PropagationKind::LogNormalShadowing);
    assert_eq!(m.exp(), 3.0);
}

#[test]
fn build_requires_std_dev_only_for_shadowing() {
    assert_eq!(
        PropagationKind::LogDistance.build(2.0, Some(9.0)),
        Some(PropagationModel::LogDistance { exp: 2.0 })
    );
    assert_eq!(PropagationKind::LogNormalShadowing.build(2.0, None), None);
    assert!(PropagationKind::LogNormalShadowing.requires_std_dev());
    assert!(!PropagationKind::LogDistance.requires_std_dev());
}

#[test]
fn test_actions_are_tagged_by_type() {
    let mv = TestAction::Move(MoveAction {
        name: "walk".to_owned(),
        node: "sta1".to_owned(),
        position: "1,2,0".to_owned(),
        timeframe: 4,
    });
    assert_eq!(
        serde_json::to_value(&mv).unwrap(),
        json!({
            "type": "node movements",
            "name": "walk",
            "node": "sta1",
            "position": "1,2,0",
            "timeframe": 4
        })
    );
    assert_eq!(mv.tag(), TestAction::MOVE_TAG);
    assert_eq!(mv.name(), "walk");
}

#[test]
fn absent_command_timeframe_is_omitted() {
    let cmd = TestAction::Command(CommandAction {
        name: "scan".to_owned(),
        cmd: "iw dev {interface} scan".to_owned(),
        timeframe: None,
    });
    let v = serde_json::to_value(&cmd).unwrap();
    assert_eq!(
        v,
        json!({ "type": "iw", "name": "scan", "cmd": "iw dev {interface} scan" })
    );
    assert_eq!(cmd.tag(), "iw");
}

#[test]
fn specification_uses_camel_case_version_key() {
    let spec = Specification {
        schema_version: "1.0".to_owned(),
        meta: Meta {
            backend: Backend::Mininet,
            name: "x".to_owned(),
            duration_s: 1,
        },
        topo: Topology {
            nets: Nets {
                noise_th: -91.0,
                propagation_model: PropagationModel::LogDistance { exp: 3.0 },
            },
            aps: vec![],
            stations: vec![],
        },
        tests: vec![],
    };
    let v = serde_json::to_value(&spec).unwrap();
    assert_eq!(v["schemaVersion"], json!("1.0"));
    assert!(v.get("schema_version").is_none());
    assert!(!spec.meta.backend.is_wireless());
}
