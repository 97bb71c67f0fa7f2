use std::collections::HashSet;

use serde::Serialize;
use shared::{
    domain::{RunKind, TypeTag},
    protocol::{Experiment, ModelVersion, OutputDescriptor, Parameter, RunRequest},
};

use crate::{
    error::{ClientError, Result},
    value::TypedValue,
};

/// Every template-derived input set carries a seed so identical submissions
/// map to the same server-side run.
const RANDOM_SEED_NAME: &str = "{RANDOM_SEED}";

/// Parameter names compare case-insensitively with surrounding whitespace
/// ignored.
pub(crate) fn names_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

#[derive(Serialize)]
struct RangeValue<T: Serialize> {
    min: T,
    max: T,
    step: T,
}

/// An ordered, name-keyed collection of typed input values for one model
/// version, plus the version's declared outputs for later validation.
///
/// Parameters are kept sorted by name (ordinal ascending) so request payloads
/// are deterministic; the server keys run identity on the exact payload.
#[derive(Debug, Clone)]
pub struct Inputs {
    version_id: String,
    parameters: Vec<Parameter>,
    outputs: Vec<OutputDescriptor>,
}

impl Inputs {
    /// Builds the default input set from a model version's experiment
    /// template, with the implicit random seed injected.
    pub fn from_template(version: &ModelVersion) -> Result<Self> {
        let mut parameters = version.experiment_template.inputs.clone();
        parameters.push(Parameter {
            name: RANDOM_SEED_NAME.to_owned(),
            type_tag: TypeTag::Long,
            units: None,
            value: "1".to_owned(),
        });
        Self::build(version, parameters)
    }

    /// Builds an input set from a named experiment preset. Presets already
    /// carry their own seed, so nothing is injected.
    pub fn from_experiment(version: &ModelVersion, experiment: &Experiment) -> Result<Self> {
        Self::build(version, experiment.inputs.clone())
    }

    fn build(version: &ModelVersion, mut parameters: Vec<Parameter>) -> Result<Self> {
        parameters.sort_by(|a, b| a.name.cmp(&b.name));

        let mut seen = HashSet::new();
        for parameter in &parameters {
            if !seen.insert(parameter.name.trim().to_lowercase()) {
                return Err(ClientError::InvalidOperation(format!(
                    "duplicate input parameter \"{}\" in model version {}",
                    parameter.name, version.version
                )));
            }
        }

        Ok(Self {
            version_id: version.id.clone(),
            parameters,
            outputs: version.experiment_template.outputs.clone(),
        })
    }

    pub(crate) fn version_id(&self) -> &str {
        &self.version_id
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The model version's declared outputs.
    pub fn outputs(&self) -> &[OutputDescriptor] {
        &self.outputs
    }

    /// Inputs converted to sweep axes via [`Inputs::set_range`].
    pub(crate) fn sweep_parameters(&self) -> Vec<Parameter> {
        self.parameters
            .iter()
            .filter(|parameter| parameter.type_tag.is_sweep())
            .cloned()
            .collect()
    }

    fn find(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .iter()
            .find(|parameter| names_match(&parameter.name, name))
            .ok_or_else(|| ClientError::NotFound(format!("input parameter \"{name}\"")))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|parameter| names_match(&parameter.name, name))
            .ok_or_else(|| ClientError::NotFound(format!("input parameter \"{name}\"")))
    }

    /// Decoded value of the named parameter.
    pub fn get(&self, name: &str) -> Result<TypedValue> {
        let parameter = self.find(name)?;
        TypedValue::decode(&parameter.value, &parameter.type_tag)
    }

    /// Replaces the named parameter's point value. The value is stored in its
    /// encoded form as-is; the server coerces out-of-domain values itself.
    pub fn set(&mut self, name: &str, value: impl Into<TypedValue>) -> Result<()> {
        let encoded = value.into().encode();
        let parameter = self.find_mut(name)?;
        parameter.value = encoded;
        Ok(())
    }

    /// Converts the named numeric parameter into a sweep axis covering
    /// `[min, max]` in increments of `step`. Integer parameters truncate the
    /// bounds toward zero. Non-numeric parameters are left unchanged and the
    /// call fails.
    pub fn set_range(&mut self, name: &str, min: f64, max: f64, step: f64) -> Result<()> {
        let parameter = self.find_mut(name)?;
        let (type_tag, value) = match parameter.type_tag {
            TypeTag::Integer => (
                TypeTag::FixedRangeInteger,
                serde_json::to_string(&RangeValue {
                    min: min.trunc() as i64,
                    max: max.trunc() as i64,
                    step: step.trunc() as i64,
                })?,
            ),
            TypeTag::Double => (
                TypeTag::FixedRangeDouble,
                serde_json::to_string(&RangeValue { min, max, step })?,
            ),
            _ => {
                return Err(ClientError::InvalidOperation(format!(
                    "input parameter \"{name}\" is not numeric, so a range value is not available for it"
                )))
            }
        };
        parameter.type_tag = type_tag;
        parameter.value = value;
        Ok(())
    }

    pub fn to_request(&self, kind: RunKind) -> RunRequest {
        RunRequest {
            inputs: self.parameters.clone(),
            experiment_type: kind,
        }
    }
}

#[cfg(test)]
#[path = "tests/inputs_tests.rs"]
mod tests;
