use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CloudClient, Inputs, TypedValue};
use serde_json::Value;

mod config;

#[derive(Parser, Debug)]
struct Cli {
    /// Platform host, e.g. https://cloud.example.com
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    /// Seconds between status polls while waiting for a run.
    #[arg(long, default_value_t = 5)]
    poll_seconds: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the models visible to this API key.
    Models,
    /// Run one simulation (reusing a finished identical run when the server
    /// has one) and print its outputs.
    Outputs {
        model: String,
        /// Point-value overrides, NAME=VALUE.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
        /// Output names to fetch; every declared output when omitted.
        #[arg(long = "output", value_name = "NAME")]
        outputs: Vec<String>,
    },
    /// Run a parameter sweep and print the raw result table.
    Sweep {
        model: String,
        /// Sweep axes, NAME=MIN:MAX:STEP.
        #[arg(long = "range", value_name = "NAME=MIN:MAX:STEP")]
        ranges: Vec<String>,
        /// Point-value overrides, NAME=VALUE.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
        /// Output names to fetch; every scalar output when omitted.
        #[arg(long = "output", value_name = "NAME")]
        outputs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings();
    let host = cli
        .host
        .or(settings.host)
        .context("no host configured; pass --host or set SIMCLOUD_HOST")?;
    let api_key = cli
        .api_key
        .or(settings.api_key)
        .context("no api key configured; pass --api-key or set SIMCLOUD_API_KEY")?;
    let client = CloudClient::new(api_key, &host)?;
    let poll_interval = Duration::from_secs(cli.poll_seconds.max(1));

    match cli.command {
        Command::Models => {
            for model in client.models().await? {
                println!(
                    "{} (id {}, {} versions)",
                    model.name,
                    model.id,
                    model.model_versions.len()
                );
            }
        }
        Command::Outputs {
            model,
            sets,
            outputs,
        } => {
            let inputs = build_inputs(&client, &model, &sets, &[]).await?;
            let mut run = client.simulation(&inputs);
            let names: Vec<&str> = outputs.iter().map(String::as_str).collect();
            let selected = (!names.is_empty()).then_some(names.as_slice());
            let view = run
                .outputs_or_run_if_absent(selected, poll_interval)
                .await?
                .into_single()?;
            for output in view.raw() {
                println!("{} = {}", output.name, output.value.encode());
            }
        }
        Command::Sweep {
            model,
            ranges,
            sets,
            outputs,
        } => {
            if ranges.is_empty() {
                bail!("a sweep needs at least one --range axis");
            }
            let inputs = build_inputs(&client, &model, &sets, &ranges).await?;
            let mut run = client.parameter_variation(&inputs);
            run.submit().await?;
            run.wait_for_completion(poll_interval).await?;
            let names: Vec<&str> = outputs.iter().map(String::as_str).collect();
            let selected = (!names.is_empty()).then_some(names.as_slice());
            let view = run.outputs(selected).await?.into_multi()?;
            for row in view.raw_table() {
                let cells: Vec<String> = row.iter().map(render_cell).collect();
                println!("{}", cells.join("\t"));
            }
        }
    }

    Ok(())
}

async fn build_inputs(
    client: &CloudClient,
    model: &str,
    sets: &[String],
    ranges: &[String],
) -> Result<Inputs> {
    let version = client.latest_model_version_by_name(model).await?;
    let mut inputs = client.default_inputs(&version)?;
    for assignment in sets {
        let (name, value) = split_assignment(assignment)?;
        inputs.set(name, parse_value(value))?;
    }
    for range in ranges {
        let (name, min, max, step) = split_range(range)?;
        inputs.set_range(name, min, max, step)?;
    }
    Ok(inputs)
}

fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .with_context(|| format!("expected NAME=VALUE, got {raw:?}"))
}

fn split_range(raw: &str) -> Result<(&str, f64, f64, f64)> {
    let (name, spec) = raw
        .split_once('=')
        .with_context(|| format!("expected NAME=MIN:MAX:STEP, got {raw:?}"))?;
    let parts: Vec<&str> = spec.split(':').collect();
    let [min, max, step] = parts.as_slice() else {
        bail!("expected NAME=MIN:MAX:STEP, got {raw:?}");
    };
    Ok((
        name,
        min.parse().with_context(|| format!("bad range min {min:?}"))?,
        max.parse().with_context(|| format!("bad range max {max:?}"))?,
        step.parse()
            .with_context(|| format!("bad range step {step:?}"))?,
    ))
}

/// Best-effort typing of a command-line value: bool, then integer, then
/// float, falling back to text.
fn parse_value(text: &str) -> TypedValue {
    if let Ok(value) = text.parse::<bool>() {
        return value.into();
    }
    if let Ok(value) = text.parse::<i64>() {
        return value.into();
    }
    if let Ok(value) = text.parse::<f64>() {
        return value.into();
    }
    TypedValue::from(text)
}

fn render_cell(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
