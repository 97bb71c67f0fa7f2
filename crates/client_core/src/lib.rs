use std::sync::Arc;

use shared::{
    domain::RunKind,
    protocol::{Experiment, ModelSummary, ModelVersion},
};
use tracing::info;
use url::Url;

mod aggregation;
pub mod error;
pub mod inputs;
pub mod outputs;
pub mod run;
pub mod transport;
pub mod value;

pub use error::{ClientError, Result};
pub use inputs::Inputs;
pub use outputs::{MultiRunOutputs, OutputValue, RunOutputs, SingleRunOutputs};
pub use run::{outputs_for_all, ModelRun, DEFAULT_POLL_INTERVAL};
pub use transport::{HttpTransport, Transport};
pub use value::TypedValue;

/// Version segment of the open-API path prefix. The server keeps old prefixes
/// alive, so this moves only when the SDK adopts a newer wire contract.
const OPEN_API_VERSION: &str = "8.5.0";

/// Entry point of the SDK: model catalog lookups, input-set construction, and
/// run handles.
///
/// The client itself is stateless beyond its transport; every run lives in the
/// [`ModelRun`] handle returned to the caller.
pub struct CloudClient {
    transport: Arc<dyn Transport>,
}

impl CloudClient {
    /// Connects to the platform at `host` (scheme + authority, e.g.
    /// `https://cloud.example.com`) authenticating with `api_key`.
    pub fn new(api_key: impl Into<String>, host: &str) -> Result<Self> {
        let parsed = Url::parse(host).map_err(|err| {
            ClientError::InvalidOperation(format!("invalid host url {host:?}: {err}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidOperation(format!(
                "host url {host:?} must use http or https"
            )));
        }
        let base_url = format!(
            "{}/api/open/{OPEN_API_VERSION}",
            host.trim_end_matches('/')
        );
        Ok(Self {
            transport: Arc::new(HttpTransport::new(base_url, api_key)),
        })
    }

    /// Builds a client over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn models(&self) -> Result<Vec<ModelSummary>> {
        let value = self.transport.get_json("/models").await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn model_by_id(&self, id: &str) -> Result<ModelSummary> {
        let value = self.transport.get_json(&format!("/models/{id}")).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn model_by_name(&self, name: &str) -> Result<ModelSummary> {
        let value = self
            .transport
            .get_json(&format!("/models/name/{name}"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn model_version(
        &self,
        model: &ModelSummary,
        version_id: &str,
    ) -> Result<ModelVersion> {
        let value = self
            .transport
            .get_json(&format!("/models/{}/versions/{version_id}", model.id))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn model_version_by_number(
        &self,
        model: &ModelSummary,
        number: u32,
    ) -> Result<ModelVersion> {
        let value = self
            .transport
            .get_json(&format!("/models/{}/versions/number/{number}", model.id))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The newest uploaded version of `model`.
    pub async fn latest_model_version(&self, model: &ModelSummary) -> Result<ModelVersion> {
        let version_id = model.model_versions.last().ok_or_else(|| {
            ClientError::NotFound(format!("uploaded version of model \"{}\"", model.name))
        })?;
        self.model_version(model, version_id).await
    }

    /// Convenience: looks the model up by name, then resolves its newest
    /// version.
    pub async fn latest_model_version_by_name(&self, name: &str) -> Result<ModelVersion> {
        let model = self.model_by_name(name).await?;
        self.latest_model_version(&model).await
    }

    /// Default inputs from the version's experiment template, with the
    /// implicit random seed.
    pub fn default_inputs(&self, version: &ModelVersion) -> Result<Inputs> {
        Inputs::from_template(version)
    }

    /// Inputs preset by the named experiment stored with the version.
    pub async fn inputs_from_experiment(
        &self,
        version: &ModelVersion,
        experiment_name: &str,
    ) -> Result<Inputs> {
        let value = self
            .transport
            .get_json(&format!("/versions/{}/experiments", version.id))
            .await?;
        let experiments: Vec<Experiment> = serde_json::from_value(value)?;
        let experiment = experiments
            .iter()
            .find(|experiment| experiment.name == experiment_name)
            .ok_or_else(|| {
                ClientError::NotFound(format!(
                    "experiment \"{experiment_name}\" in version {}",
                    version.version
                ))
            })?;
        Inputs::from_experiment(version, experiment)
    }

    /// A single-execution run handle over a snapshot of `inputs`.
    pub fn simulation(&self, inputs: &Inputs) -> ModelRun {
        info!(version_id = inputs.version_id(), "creating simulation run");
        ModelRun::new(Arc::clone(&self.transport), inputs, RunKind::Simulation)
    }

    /// A parameter-sweep run handle over a snapshot of `inputs`. Convert the
    /// swept inputs with [`Inputs::set_range`] first.
    pub fn parameter_variation(&self, inputs: &Inputs) -> ModelRun {
        info!(
            version_id = inputs.version_id(),
            "creating parameter variation run"
        );
        ModelRun::new(
            Arc::clone(&self.transport),
            inputs,
            RunKind::ParameterVariation,
        )
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
