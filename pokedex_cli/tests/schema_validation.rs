use pokedex_lib::{transform, Envelope};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root()
        .join("pokedex_api/tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn display_json(fixture: &str) -> Value {
    let record = transform(&load_fixture(fixture)).expect("fixture transforms");
    serde_json::to_value(record).expect("record serializes")
}

// ---------------------------------------------------------------------------
// Positive validation: serialized output conforms to the schemas
// ---------------------------------------------------------------------------

#[test]
fn test_display_records_conform_to_schema() {
    let schema = load_schema("display_record.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("display schema compiles");

    for fixture in ["pikachu.json", "bulbasaur.json"] {
        let data = display_json(fixture);
        if let Err(e) = validator.validate(&data) {
            panic!("{fixture} display record failed validation: {e}");
        }
    }
}

#[test]
fn test_envelopes_conform_to_schema() {
    let schema = load_schema("envelope.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("envelope schema compiles");

    let record = transform(&load_fixture("pikachu.json")).unwrap();
    let ok = serde_json::to_value(Envelope::ok(record)).unwrap();
    if let Err(e) = validator.validate(&ok) {
        panic!("success envelope failed validation: {e}");
    }

    let failure = serde_json::to_value(Envelope::failure("Search term is required")).unwrap();
    if let Err(e) = validator.validate(&failure) {
        panic!("failure envelope failed validation: {e}");
    }
}

// ---------------------------------------------------------------------------
// Negative validation: the schemas reject malformed output
// ---------------------------------------------------------------------------

#[test]
fn test_display_schema_rejects_missing_total() {
    let schema = load_schema("display_record.schema.json");
    let mut data = display_json("pikachu.json");

    data.as_object_mut()
        .expect("record is an object")
        .remove("totalMetrics");

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject record missing totalMetrics"
    );
}

#[test]
fn test_display_schema_rejects_snake_case_metrics() {
    let schema = load_schema("display_record.schema.json");
    let mut data = display_json("pikachu.json");

    let metrics = data["metrics"].as_object_mut().expect("metrics is an object");
    let value = metrics.remove("specialPower").unwrap();
    metrics.insert("special_power".to_string(), value);

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject snake_case metric keys"
    );
}

#[test]
fn test_display_schema_rejects_fixed_decimals() {
    let schema = load_schema("display_record.schema.json");
    let mut data = display_json("bulbasaur.json");
    data["height"] = Value::String("0.70m".to_string());

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject heights with two decimals"
    );
}

#[test]
fn test_envelope_schema_rejects_mixed_shapes() {
    let schema = load_schema("envelope.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");

    let mixed = serde_json::json!({"error": "boom", "success": true});
    assert!(validator.validate(&mixed).is_err());

    let empty_error = serde_json::json!({"error": "", "success": false});
    assert!(validator.validate(&empty_error).is_err());
}
