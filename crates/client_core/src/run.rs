use std::{sync::Arc, time::Duration};

use futures::future::try_join_all;
use serde_json::Value;
use shared::{
    domain::{RunKind, RunStatus},
    protocol::{Aggregation, ResultRow, ResultsRequest, RunState},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    aggregation,
    error::{ClientError, Result},
    inputs::Inputs,
    outputs::{MultiRunOutputs, RunOutputs, SingleRunOutputs},
    transport::Transport,
};

/// Interval between status polls unless the caller picks their own.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One submitted (or about-to-be-submitted) execution request.
///
/// Owns a snapshot of the inputs taken at construction time — later mutation
/// of the original [`Inputs`] does not affect the run — plus the run state
/// last reported by the server. A `ModelRun` is a plain handle held by its
/// creator; nothing is shared across concurrently submitted runs.
pub struct ModelRun {
    transport: Arc<dyn Transport>,
    inputs: Inputs,
    kind: RunKind,
    state: Option<RunState>,
}

impl ModelRun {
    pub(crate) fn new(transport: Arc<dyn Transport>, inputs: &Inputs, kind: RunKind) -> Self {
        Self {
            transport,
            inputs: inputs.clone(),
            kind,
            state: None,
        }
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Status from the last poll, if any poll happened yet.
    pub fn status(&self) -> Option<RunStatus> {
        self.state.as_ref().map(|state| state.status)
    }

    pub fn state(&self) -> Option<&RunState> {
        self.state.as_ref()
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    fn request_body(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.inputs.to_request(self.kind))?)
    }

    /// Asks the server to start executing this input combination.
    pub async fn submit(&mut self) -> Result<()> {
        let path = format!("/versions/{}/runs", self.inputs.version_id());
        self.transport.post_json(&path, Some(self.request_body()?)).await?;
        info!(version_id = self.inputs.version_id(), kind = ?self.kind, "run submitted");
        Ok(())
    }

    /// Fetches and stores the server's current state for this input
    /// combination. Idempotent; each call reflects the state at call time.
    pub async fn poll(&mut self) -> Result<&RunState> {
        let path = format!("/versions/{}/run", self.inputs.version_id());
        let value = self.transport.post_json(&path, Some(self.request_body()?)).await?;
        let state: RunState = serde_json::from_value(value)?;
        debug!(run_id = %state.id, status = state.status.as_str(), "run polled");
        Ok(self.state.insert(state))
    }

    /// Polls until the run reaches a terminal status, sleeping `poll_interval`
    /// between polls. Resolves on COMPLETED and fails with
    /// [`ClientError::RunFailed`] on ERROR or STOPPED. There is no built-in
    /// retry cap or timeout; use [`ModelRun::wait_for_completion_cancellable`]
    /// to bound the wait.
    pub async fn wait_for_completion(&mut self, poll_interval: Duration) -> Result<()> {
        loop {
            let status = self.poll().await?.status;
            match status {
                RunStatus::Fresh | RunStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
                RunStatus::Completed => return Ok(()),
                RunStatus::Error | RunStatus::Stopped => {
                    warn!(status = status.as_str(), "run reached a failed terminal status");
                    return Err(ClientError::RunFailed(status));
                }
            }
        }
    }

    /// Like [`ModelRun::wait_for_completion`], but stops scheduling polls and
    /// fails with [`ClientError::Cancelled`] once `cancel` fires. The remote
    /// run keeps executing; stopping it is a separate, explicit
    /// [`ModelRun::stop`] call.
    pub async fn wait_for_completion_cancellable(
        &mut self,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            let status = self.poll().await?.status;
            match status {
                RunStatus::Fresh | RunStatus::Running => {
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                        _ = tokio::time::sleep(poll_interval) => {}
                    }
                }
                RunStatus::Completed => return Ok(()),
                RunStatus::Error | RunStatus::Stopped => {
                    warn!(status = status.as_str(), "run reached a failed terminal status");
                    return Err(ClientError::RunFailed(status));
                }
            }
        }
    }

    /// Decoded progress payload from the last known state, polling once first
    /// if no state is known yet. An empty progress message means the server
    /// has nothing to report yet, not an error.
    pub async fn progress(&mut self) -> Result<Option<Value>> {
        let message = match &self.state {
            Some(state) => state.message.clone(),
            None => self.poll().await?.message.clone(),
        };
        if message.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&message)?))
    }

    /// Sends a stop command. Local state is left untouched; poll afterwards to
    /// observe the STOPPED status.
    pub async fn stop(&mut self) -> Result<()> {
        let path = format!("/versions/{}/runs/stop", self.inputs.version_id());
        self.transport.post_json(&path, Some(self.request_body()?)).await?;
        info!(version_id = self.inputs.version_id(), "stop requested");
        Ok(())
    }

    /// Fetches aggregated results for this input combination and reshapes them
    /// per run kind. `names` restricts the fetched outputs; with `None` the
    /// defaults per run kind apply. Unknown names fail before any request is
    /// sent.
    pub async fn outputs(&mut self, names: Option<&[&str]>) -> Result<RunOutputs> {
        let outputs = aggregation::resolve_outputs(&self.inputs, self.kind, names)?;
        let aggregations = aggregation::build(self.kind, &outputs, &self.inputs);
        let rows = self.fetch_results(&aggregations).await?;
        match self.kind {
            RunKind::Simulation => Ok(RunOutputs::Single(SingleRunOutputs::from_rows(rows)?)),
            RunKind::ParameterVariation => {
                Ok(RunOutputs::Multi(MultiRunOutputs::from_rows(rows)?))
            }
        }
    }

    /// Fetches results, transparently running first when the server knows no
    /// run for this exact input combination (it answers 404). Any other error
    /// propagates unchanged. The server is the source of truth for whether a
    /// matching run already exists.
    pub async fn outputs_or_run_if_absent(
        &mut self,
        names: Option<&[&str]>,
        poll_interval: Duration,
    ) -> Result<RunOutputs> {
        match self.outputs(names).await {
            Err(err) if err.is_not_found_status() => {
                info!(
                    version_id = self.inputs.version_id(),
                    "no prior run for this input combination; submitting"
                );
                self.submit().await?;
                self.wait_for_completion(poll_interval).await?;
                self.outputs(names).await
            }
            other => other,
        }
    }

    async fn fetch_results(&self, aggregations: &[Aggregation]) -> Result<Vec<ResultRow>> {
        let value = match &self.state {
            // A known run id pins the request to that run.
            Some(state) => {
                let path = format!(
                    "/versions/{}/results/{}",
                    self.inputs.version_id(),
                    state.id
                );
                self.transport
                    .post_json(&path, Some(serde_json::to_value(aggregations)?))
                    .await?
            }
            // Otherwise the full input payload selects the matching run.
            None => {
                let request = ResultsRequest {
                    inputs: self.inputs.parameters().to_vec(),
                    experiment_type: self.kind,
                    outputs: serde_json::to_string(aggregations)?,
                };
                let path = format!("/versions/{}/results", self.inputs.version_id());
                self.transport
                    .post_json(&path, Some(serde_json::to_value(request)?))
                    .await?
            }
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Drives every run to its outputs concurrently, preserving submission order
/// in the returned list. All-or-nothing: if any run fails the whole join
/// fails, and outcomes of runs that already completed are not surfaced.
pub async fn outputs_for_all(
    runs: impl IntoIterator<Item = ModelRun>,
    names: Option<&[&str]>,
    poll_interval: Duration,
) -> Result<Vec<RunOutputs>> {
    try_join_all(runs.into_iter().map(|mut run| {
        let names: Option<Vec<&str>> = names.map(|names| names.to_vec());
        async move {
            run.outputs_or_run_if_absent(names.as_deref(), poll_interval)
                .await
        }
    }))
    .await
}

#[cfg(test)]
#[path = "tests/run_tests.rs"]
mod tests;
