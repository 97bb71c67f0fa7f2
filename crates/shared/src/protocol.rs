use serde::{Deserialize, Serialize};

use crate::domain::{AggregationType, RunKind, RunStatus, TypeTag};

/// One named, typed value. `value` is always the string-encoded form; the
/// type tag decides how it decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub units: Option<String>,
    pub value: String,
}

/// A declared model output: like a [`Parameter`] but without a value until the
/// run produces one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    /// Version ids, oldest first.
    #[serde(default)]
    pub model_versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentTemplate {
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<OutputDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    pub id: String,
    pub version: u32,
    pub experiment_template: ExperimentTemplate,
}

/// A named experiment preset stored with a model version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
}

/// Body POSTed to the run-creation and run-status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub inputs: Vec<Parameter>,
    pub experiment_type: RunKind,
}

/// Server-side state of a submitted run. `message`, when non-empty, is a
/// JSON-encoded progress payload whose shape is run-kind-specific and opaque
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub status: RunStatus,
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// One entry of the aggregation spec sent to the results endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub aggregation_type: AggregationType,
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<OutputDescriptor>,
}

/// Combined run+aggregate body for fetching results without a known run id.
/// The server expects the aggregation list JSON-encoded into `outputs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsRequest {
    pub inputs: Vec<Parameter>,
    pub experiment_type: RunKind,
    pub outputs: String,
}

/// One row of an aggregated results response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub value: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<OutputDescriptor>,
}
