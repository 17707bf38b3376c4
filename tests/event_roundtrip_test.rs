//! Event decoding laws.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use conductor::services::{classify_line, decode_line, LineAssembler, StreamLine};

fn extra_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _.-]{0,24}".prop_map(Value::from),
        Just(Value::Null),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(Value::from),
    ]
}

fn event_object() -> impl Strategy<Value = Map<String, Value>> {
    (
        "[a-z_]{1,12}",
        "[a-z]{1,12}",
        prop::collection::btree_map("x_[a-z]{1,8}", extra_value(), 0..5),
    )
        .prop_map(|(kind, agent, extras)| {
            let mut object = Map::new();
            object.insert("type".to_string(), Value::from(kind));
            object.insert("agent".to_string(), Value::from(agent));
            object.extend(extras);
            object
        })
}

proptest! {
    #[test]
    fn prop_valid_events_round_trip(object in event_object()) {
        let line = serde_json::to_string(&Value::Object(object.clone())).unwrap();
        let event = decode_line(&line).expect("valid event decodes");

        prop_assert_eq!(event.fields(), &object);
        let reencoded: Value = serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        prop_assert_eq!(reencoded, Value::Object(object));
    }

    #[test]
    fn prop_chunking_does_not_change_events(object in event_object(), split in 0usize..200) {
        let line = format!("{}\n", serde_json::to_string(&Value::Object(object.clone())).unwrap());
        let split = split.min(line.len());

        let mut assembler = LineAssembler::new();
        let mut lines = assembler.push(&line.as_bytes()[..split]);
        lines.extend(assembler.push(&line.as_bytes()[split..]));

        prop_assert_eq!(lines.len(), 1);
        prop_assert!(assembler.finish().is_none());
        prop_assert!(matches!(classify_line(lines.remove(0)), StreamLine::Event(_)));
    }

    #[test]
    fn prop_arbitrary_text_never_panics(line in ".{0,80}") {
        let _ = decode_line(&line);
    }
}

#[test]
fn test_invalid_lines_are_not_events() {
    let cases = [
        String::new(),
        "   ".to_string(),
        r#"{"type":"status","agent":"co"#.to_string(),
        "[1,2,3]".to_string(),
        "42".to_string(),
        r#""status""#.to_string(),
        json!({ "agent": "coder" }).to_string(),
        json!({ "type": "status" }).to_string(),
        "compiling conductor v0.1.0".to_string(),
    ];
    for line in cases {
        assert!(decode_line(&line).is_none(), "{line:?}");
        assert!(matches!(classify_line(line), StreamLine::Passthrough(_)));
    }
}
