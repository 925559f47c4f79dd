#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint_core::{ConfigOverride, parse_steps_json, validate_config_json, validate_steps, validate_steps_json};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 16 * 1024 {
        return;
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };

    // Validation must never panic, whatever the payload shape.
    let report = validate_steps_json(&value);

    // A payload that validates must parse, and the typed check must agree.
    if report.is_valid() {
        let steps = parse_steps_json(&value).expect("valid payload must parse");
        assert!(validate_steps(&steps).is_valid(), "typed validation disagrees");
    } else {
        assert!(parse_steps_json(&value).is_err(), "invalid payload parsed");
    }

    // Config parsing is lenient: only a non-object is rejected.
    let _ = validate_config_json(&value);
    assert_eq!(ConfigOverride::from_json(&value).is_ok(), value.is_object());
});
