use super::*;
use shared::protocol::ExperimentTemplate;

fn parameter(name: &str, type_tag: TypeTag, value: &str) -> Parameter {
    Parameter {
        name: name.to_owned(),
        type_tag,
        units: None,
        value: value.to_owned(),
    }
}

fn version(inputs: Vec<Parameter>) -> ModelVersion {
    ModelVersion {
        id: "version-1".to_owned(),
        version: 3,
        experiment_template: ExperimentTemplate {
            inputs,
            outputs: vec![OutputDescriptor {
                name: "Adoption Percent".to_owned(),
                type_tag: TypeTag::Double,
                units: None,
            }],
        },
    }
}

#[test]
fn template_inputs_gain_an_implicit_random_seed() {
    let inputs = Inputs::from_template(&version(vec![parameter(
        "Contact Rate",
        TypeTag::Double,
        "5",
    )]))
    .expect("inputs");

    let seed = inputs.get("{random_seed}").expect("seed present");
    assert_eq!(seed, TypedValue::Int(1));
}

#[test]
fn experiment_inputs_keep_their_own_seed() {
    let experiment = Experiment {
        id: None,
        name: "Experiment".to_owned(),
        inputs: vec![parameter("Contact Rate", TypeTag::Double, "5")],
    };
    let inputs = Inputs::from_experiment(&version(Vec::new()), &experiment).expect("inputs");
    assert!(inputs.get("{RANDOM_SEED}").is_err());
    assert_eq!(inputs.parameters().len(), 1);
}

#[test]
fn parameters_are_sorted_by_name_ordinal_ascending() {
    let inputs = Inputs::from_template(&version(vec![
        parameter("beta", TypeTag::Double, "1"),
        parameter("Alpha", TypeTag::Double, "2"),
    ]))
    .expect("inputs");

    let names: Vec<&str> = inputs
        .parameters()
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect();
    // Ordinal compare puts uppercase before lowercase and "{...}" names last.
    assert_eq!(names, vec!["Alpha", "beta", "{RANDOM_SEED}"]);

    let request = inputs.to_request(RunKind::Simulation);
    assert_eq!(request.inputs[0].name, "Alpha");
    assert_eq!(request.experiment_type, RunKind::Simulation);
}

#[test]
fn duplicate_names_are_rejected_at_construction() {
    let err = Inputs::from_template(&version(vec![
        parameter("Contact Rate", TypeTag::Double, "5"),
        parameter(" contact rate ", TypeTag::Double, "6"),
    ]))
    .expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidOperation(_)));
}

#[test]
fn lookup_is_case_and_whitespace_insensitive() {
    let mut inputs = Inputs::from_template(&version(vec![parameter(
        "Contact Rate",
        TypeTag::Double,
        "5",
    )]))
    .expect("inputs");

    inputs.set(" CONTACT RATE ", 40.0).expect("set");
    assert_eq!(
        inputs.get("contact rate").expect("get"),
        TypedValue::Double(40.0)
    );
}

#[test]
fn missing_parameters_fail_lookup_and_mutation() {
    let mut inputs = Inputs::from_template(&version(Vec::new())).expect("inputs");
    assert!(matches!(
        inputs.get("Contact Rate"),
        Err(ClientError::NotFound(_))
    ));
    assert!(matches!(
        inputs.set("Contact Rate", 1.0),
        Err(ClientError::NotFound(_))
    ));
    assert!(matches!(
        inputs.set_range("Contact Rate", 0.0, 1.0, 0.1),
        Err(ClientError::NotFound(_))
    ));
}

#[test]
fn set_range_on_integer_truncates_toward_zero_and_promotes() {
    let mut inputs = Inputs::from_template(&version(vec![parameter(
        "Contact Rate",
        TypeTag::Integer,
        "5",
    )]))
    .expect("inputs");

    inputs
        .set_range("Contact Rate", 20.9, 40.2, 19.6)
        .expect("set range");

    let parameter = inputs
        .parameters()
        .iter()
        .find(|parameter| parameter.name == "Contact Rate")
        .expect("parameter");
    assert_eq!(parameter.type_tag, TypeTag::FixedRangeInteger);
    assert_eq!(parameter.value, r#"{"min":20,"max":40,"step":19}"#);
}

#[test]
fn set_range_on_double_keeps_fractional_bounds() {
    let mut inputs = Inputs::from_template(&version(vec![parameter(
        "Adoption Fraction",
        TypeTag::Double,
        "0.01",
    )]))
    .expect("inputs");

    inputs
        .set_range("Adoption Fraction", 0.02, 0.04, 0.01)
        .expect("set range");

    let parameter = inputs
        .parameters()
        .iter()
        .find(|parameter| parameter.name == "Adoption Fraction")
        .expect("parameter");
    assert_eq!(parameter.type_tag, TypeTag::FixedRangeDouble);
    assert_eq!(parameter.value, r#"{"min":0.02,"max":0.04,"step":0.01}"#);
}

#[test]
fn set_range_on_non_numeric_fails_and_leaves_the_parameter_unchanged() {
    let mut inputs = Inputs::from_template(&version(vec![parameter(
        "{stop_mode}",
        TypeTag::String,
        "STOP_MODE_AT_TIME",
    )]))
    .expect("inputs");

    let err = inputs
        .set_range("{stop_mode}", 0.0, 1.0, 0.1)
        .expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidOperation(_)));

    let parameter = inputs
        .parameters()
        .iter()
        .find(|parameter| parameter.name == "{stop_mode}")
        .expect("parameter");
    assert_eq!(parameter.type_tag, TypeTag::String);
    assert_eq!(parameter.value, "STOP_MODE_AT_TIME");
}

#[test]
fn sweep_parameters_are_the_promoted_ones() {
    let mut inputs = Inputs::from_template(&version(vec![
        parameter("Contact Rate", TypeTag::Integer, "5"),
        parameter("Adoption Fraction", TypeTag::Double, "0.01"),
    ]))
    .expect("inputs");
    inputs
        .set_range("Contact Rate", 21.0, 41.0, 20.0)
        .expect("set range");

    let sweep = inputs.sweep_parameters();
    assert_eq!(sweep.len(), 1);
    assert_eq!(sweep[0].name, "Contact Rate");
}

#[test]
fn clones_do_not_share_mutation() {
    let original = Inputs::from_template(&version(vec![parameter(
        "Contact Rate",
        TypeTag::Double,
        "5",
    )]))
    .expect("inputs");

    let mut cloned = original.clone();
    cloned.set("Contact Rate", 99.0).expect("set");

    assert_eq!(
        original.get("Contact Rate").expect("get"),
        TypedValue::Double(5.0)
    );
    assert_eq!(
        cloned.get("Contact Rate").expect("get"),
        TypedValue::Double(99.0)
    );
}

#[test]
fn dates_are_stored_in_the_wire_format() {
    use chrono::TimeZone;

    let mut inputs = Inputs::from_template(&version(vec![parameter(
        "{start_date}",
        TypeTag::DateTime,
        "2020-01-01T00:00:00",
    )]))
    .expect("inputs");

    let instant = chrono::Utc
        .timestamp_millis_opt(100_000_000)
        .single()
        .expect("timestamp");
    inputs.set("{START_DATE}", instant).expect("set");

    let parameter = inputs
        .parameters()
        .iter()
        .find(|parameter| parameter.name == "{start_date}")
        .expect("parameter");
    assert_eq!(parameter.value, "1970-01-02T03:46:40");
}
