use super::*;
use shared::{
    domain::TypeTag,
    protocol::{ExperimentTemplate, ModelVersion, Parameter},
};

fn version() -> ModelVersion {
    ModelVersion {
        id: "version-1".to_owned(),
        version: 1,
        experiment_template: ExperimentTemplate {
            inputs: vec![
                Parameter {
                    name: "Contact Rate".to_owned(),
                    type_tag: TypeTag::Integer,
                    units: None,
                    value: "5".to_owned(),
                },
                Parameter {
                    name: "Adoption Fraction".to_owned(),
                    type_tag: TypeTag::Double,
                    units: None,
                    value: "0.01".to_owned(),
                },
            ],
            outputs: vec![
                OutputDescriptor {
                    name: "Adoption Percent".to_owned(),
                    type_tag: TypeTag::Double,
                    units: None,
                },
                OutputDescriptor {
                    name: "Adoption Plot".to_owned(),
                    type_tag: TypeTag::Other("DATA_SET".to_owned()),
                    units: None,
                },
            ],
        },
    }
}

#[test]
fn explicit_names_resolve_case_insensitively() {
    let inputs = Inputs::from_template(&version()).expect("inputs");
    let outputs = resolve_outputs(
        &inputs,
        RunKind::Simulation,
        Some(&[" adoption percent "]),
    )
    .expect("resolve");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name, "Adoption Percent");
}

#[test]
fn unknown_explicit_name_fails_with_not_found() {
    let inputs = Inputs::from_template(&version()).expect("inputs");
    let err = resolve_outputs(&inputs, RunKind::Simulation, Some(&["Adoption Rate"]))
        .expect_err("must fail");
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[test]
fn simulation_defaults_to_every_declared_output() {
    let inputs = Inputs::from_template(&version()).expect("inputs");
    let outputs = resolve_outputs(&inputs, RunKind::Simulation, None).expect("resolve");
    assert_eq!(outputs.len(), 2);
}

#[test]
fn parameter_variation_defaults_to_scalar_outputs_only() {
    let inputs = Inputs::from_template(&version()).expect("inputs");
    let outputs = resolve_outputs(&inputs, RunKind::ParameterVariation, None).expect("resolve");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name, "Adoption Percent");
}

#[test]
fn simulation_aggregations_are_identity_passthrough() {
    let inputs = Inputs::from_template(&version()).expect("inputs");
    let outputs = resolve_outputs(&inputs, RunKind::Simulation, None).expect("resolve");
    let aggregations = build(RunKind::Simulation, &outputs, &inputs);

    assert_eq!(aggregations.len(), 2);
    for (aggregation, output) in aggregations.iter().zip(&outputs) {
        assert_eq!(aggregation.aggregation_type, AggregationType::Identity);
        assert!(aggregation.inputs.is_empty());
        assert_eq!(aggregation.outputs, vec![output.clone()]);
    }
}

#[test]
fn parameter_variation_aggregations_collect_arrays_plus_the_sweep_entry() {
    let mut inputs = Inputs::from_template(&version()).expect("inputs");
    inputs
        .set_range("Contact Rate", 21.0, 41.0, 20.0)
        .expect("set range");
    inputs
        .set_range("Adoption Fraction", 0.02, 0.04, 0.01)
        .expect("set range");

    let outputs =
        resolve_outputs(&inputs, RunKind::ParameterVariation, None).expect("resolve");
    let aggregations = build(RunKind::ParameterVariation, &outputs, &inputs);

    assert_eq!(aggregations.len(), 2);
    assert_eq!(aggregations[0].aggregation_type, AggregationType::Array);
    assert_eq!(aggregations[0].outputs[0].name, "Adoption Percent");

    let sweep_entry = aggregations.last().expect("sweep entry");
    assert_eq!(sweep_entry.aggregation_type, AggregationType::Array);
    assert!(sweep_entry.outputs.is_empty());
    let sweep_names: Vec<&str> = sweep_entry
        .inputs
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect();
    assert_eq!(sweep_names, vec!["Adoption Fraction", "Contact Rate"]);
}
