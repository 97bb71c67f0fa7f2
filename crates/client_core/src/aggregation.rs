use shared::{
    domain::{AggregationType, RunKind},
    protocol::{Aggregation, OutputDescriptor},
};

use crate::{
    error::{ClientError, Result},
    inputs::{names_match, Inputs},
};

/// Resolves the outputs a results request should cover, before any network
/// call is made.
///
/// Explicit names must each match a declared output (case-insensitively).
/// Without explicit names, a simulation requests every declared output while a
/// parameter variation requests only the scalar-typed ones: structured outputs
/// cannot be tabulated per sweep point.
pub(crate) fn resolve_outputs(
    inputs: &Inputs,
    kind: RunKind,
    names: Option<&[&str]>,
) -> Result<Vec<OutputDescriptor>> {
    match names {
        Some(names) => names
            .iter()
            .map(|name| {
                inputs
                    .outputs()
                    .iter()
                    .find(|output| names_match(&output.name, name))
                    .cloned()
                    .ok_or_else(|| ClientError::NotFound(format!("output \"{name}\"")))
            })
            .collect(),
        None => match kind {
            RunKind::Simulation => Ok(inputs.outputs().to_vec()),
            RunKind::ParameterVariation => Ok(inputs
                .outputs()
                .iter()
                .filter(|output| output.type_tag.is_scalar())
                .cloned()
                .collect()),
        },
    }
}

/// Builds the aggregation spec for one results request.
///
/// A simulation asks for each output's final scalar as-is. A parameter
/// variation collects one value per run instance for each output, plus one
/// extra entry listing every sweep-range input with no outputs — that entry
/// makes the server emit the matrix of input combinations it explored.
pub(crate) fn build(
    kind: RunKind,
    outputs: &[OutputDescriptor],
    inputs: &Inputs,
) -> Vec<Aggregation> {
    match kind {
        RunKind::Simulation => outputs
            .iter()
            .map(|output| Aggregation {
                aggregation_type: AggregationType::Identity,
                inputs: Vec::new(),
                outputs: vec![output.clone()],
            })
            .collect(),
        RunKind::ParameterVariation => {
            let mut aggregations: Vec<Aggregation> = outputs
                .iter()
                .map(|output| Aggregation {
                    aggregation_type: AggregationType::Array,
                    inputs: Vec::new(),
                    outputs: vec![output.clone()],
                })
                .collect();
            aggregations.push(Aggregation {
                aggregation_type: AggregationType::Array,
                inputs: inputs.sweep_parameters(),
                outputs: Vec::new(),
            });
            aggregations
        }
    }
}

#[cfg(test)]
#[path = "tests/aggregation_tests.rs"]
mod tests;
