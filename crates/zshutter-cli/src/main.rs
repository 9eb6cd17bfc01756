//! Command-line interface for the zshutter translation layer.
//!
//! Runs one capability operation against the loopback transport and prints
//! what reached the transport and what was published, as JSON on stdout.
//! Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use zshutter_core::config::{defaults, env_vars};
use zshutter_core::{CapabilityValue, EventBus, EventBusReceiver};
use zshutter_devices::{
    profile_table, CommandRouter, DirectAction, DirectChannelActions, DirectTarget,
    LoopbackConfig, LoopbackTransport, ParameterProfile, Report, SharedTable,
};

/// zshutter - Drive a multi-channel shutter node by capability name.
#[derive(Parser, Debug)]
#[command(name = "zshutter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Device id used in published events.
    #[arg(long, global = true)]
    device_id: Option<String>,

    /// Device type of the built-in profile.
    #[arg(long, global = true, default_value = "ZMNHOD1")]
    device_type: String,

    /// JSON configuration-parameter profile replacing the built-in one.
    #[arg(long, global = true)]
    parameters: Option<PathBuf>,

    /// Make every transport call fail.
    #[arg(long, global = true)]
    offline: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the descriptor table.
    Describe,
    /// Set a capability value.
    Set {
        /// Capability name (e.g. `dim.shutter`).
        capability: String,
        /// Number in [0, 1] or a covering state (`up`, `down`, `idle`).
        value: String,
    },
    /// Poll a capability.
    Get {
        /// Capability name.
        capability: String,
    },
    /// Decode an inbound report and publish the result.
    Report {
        /// Capability name.
        capability: String,
        /// Report as JSON, e.g. `{"kind":"switch_binary","value":255}`.
        report: String,
    },
    /// Run a direct-channel action.
    Action {
        /// `shutter_position` or `slats_tilt`.
        target: String,
        /// Percentage, 0-100.
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Frame a configuration parameter value.
    Parameter {
        /// Parameter name.
        name: String,
        /// Parameter value.
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let session = Session::open(&args)?;
    session.run(args.command).await
}

fn init_logging(verbose: bool) {
    // `zshutter` also matches the `zshutter_core` and `zshutter_devices` targets.
    let default_filter = if verbose {
        "zshutter=debug"
    } else {
        defaults::LOG_FILTER
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if env_vars::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

/// One node wired to a loopback transport.
struct Session {
    table: SharedTable,
    router: CommandRouter,
    direct: DirectChannelActions,
    transport: Arc<LoopbackTransport>,
    events: EventBusReceiver,
}

impl Session {
    fn open(args: &Args) -> Result<Self> {
        let device_id = args.device_id.clone().unwrap_or_else(env_vars::device_id);

        let parameters = match args.parameters.clone().or_else(env_vars::parameters_file) {
            Some(path) => Some(
                ParameterProfile::from_path(&path)
                    .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            ),
            None => None,
        };
        let table = profile_table(&args.device_type, parameters)?.into_shared();

        let transport = Arc::new(LoopbackTransport::with_config(LoopbackConfig {
            offline: args.offline,
            ..LoopbackConfig::default()
        }));
        let bus = EventBus::with_capacity(env_vars::event_capacity());
        let events = bus.subscribe();

        tracing::debug!(%device_id, device_type = table.device_type(), "session ready");

        Ok(Self {
            router: CommandRouter::new(&device_id, table.clone(), transport.clone(), bus.clone()),
            direct: DirectChannelActions::new(&device_id, transport.clone(), bus),
            table,
            transport,
            events,
        })
    }

    async fn run(mut self, command: Command) -> Result<()> {
        let outcome = self.execute(command).await;

        let calls = self.transport.take_calls().await;
        let events: Vec<Value> = self
            .events
            .drain()
            .into_iter()
            .map(|(event, metadata)| json!({ "source": metadata.source, "event": event }))
            .collect();

        let (mut output, result) = match outcome {
            Ok(result) => (json!({ "result": result }), Ok(())),
            Err(e) => (json!({ "error": format!("{:#}", e) }), Err(e)),
        };
        output["calls"] = serde_json::to_value(calls)?;
        output["events"] = Value::Array(events);

        println!("{}", serde_json::to_string_pretty(&output)?);
        result
    }

    async fn execute(&self, command: Command) -> Result<Value> {
        match command {
            Command::Describe => Ok(serde_json::to_value(&*self.table)?),
            Command::Set { capability, value } => {
                let value: CapabilityValue = value.parse().map_err(anyhow::Error::msg)?;
                let plan = self.router.set(&capability, value).await?;
                Ok(serde_json::to_value(plan)?)
            }
            Command::Get { capability } => {
                let request = self.router.poll(&capability).await?;
                Ok(serde_json::to_value(request)?)
            }
            Command::Report { capability, report } => {
                let report: Report =
                    serde_json::from_str(&report).context("Invalid report JSON")?;
                let value = self.router.ingest_report(&capability, &report).await?;
                Ok(json!({ "value": value }))
            }
            Command::Action { target, value } => {
                let target: DirectTarget = target.parse().map_err(anyhow::Error::msg)?;
                let command = self.direct.run(DirectAction::new(target, value)).await?;
                Ok(serde_json::to_value(command)?)
            }
            Command::Parameter { name, value } => {
                let set = self.table.parameters().configuration_set(&name, value)?;
                Ok(json!({
                    "index": set.index,
                    "size": set.size,
                    "value": set.value,
                    "bytes": set.value_bytes(),
                }))
            }
        }
    }
}
