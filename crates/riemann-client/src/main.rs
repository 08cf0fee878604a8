//! Riemann command-line client.
//!
//! Sends a single event to a Riemann server, or queries its index and prints
//! the matching events as JSON.
//!
//! # Usage
//!
//! ```text
//! riemann-client [OPTIONS] [HOST] [PORT] <COMMAND>
//!
//! Commands:
//!   send   Send an event to Riemann
//!   query  Query the Riemann index
//!
//! Options:
//!   -t, --transport <tcp|udp>  Transport to use [default: tcp]
//!       --config <FILE>        TOML file with host/port/transport defaults
//!       --timeout <MS>         Connect and round-trip deadline
//! ```
//!
//! # Host and port resolution
//!
//! | Source                       | Host        | Port   |
//! |------------------------------|-------------|--------|
//! | positional argument          | `HOST`      | `PORT` |
//! | environment                  | `RIEMANN_HOST` | `RIEMANN_PORT` |
//! | `--config` file              | `host`      | `port` |
//! | built-in default             | `localhost` | `5555` |
//!
//! The first source that provides a value wins.
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! every request.  Stdout carries only command output.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use riemann_client::{
    load_config, ClientConfigFile, Client, Event, Metric, Transport, TransportConfig,
    TransportKind,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Riemann command-line client.
///
/// Uses the RIEMANN_HOST and RIEMANN_PORT environment variables if no host
/// and port are given. If they are not set, a default host and port of
/// localhost:5555 are used.
#[derive(Debug, Parser)]
#[command(name = "riemann-client", version, subcommand_precedence_over_arg = true)]
struct Cli {
    /// The hostname of a Riemann server (default: localhost).
    #[arg(env = "RIEMANN_HOST")]
    host: Option<String>,

    /// The port to connect to the Riemann server on (default: 5555).
    #[arg(env = "RIEMANN_PORT")]
    port: Option<u16>,

    /// The transport to use (default: tcp).
    #[arg(short = 't', long, value_enum)]
    transport: Option<TransportArg>,

    /// TOML configuration file supplying defaults for host, port, and transport.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Connect and request deadline in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportArg {
    Tcp,
    Udp,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Tcp => TransportKind::Tcp,
            TransportArg::Udp => TransportKind::Udp,
        }
    }
}

/// The commands the tool can run.
#[derive(Debug, Subcommand)]
enum Command {
    /// Send an event to Riemann.
    Send(SendArgs),
    /// Query the Riemann index.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
struct SendArgs {
    /// Print the event that is sent to Riemann.
    #[arg(short = 'p', long = "print")]
    print_message: bool,

    /// Unix timestamp.
    #[arg(short = 'u', long)]
    time: Option<i64>,

    /// State.
    #[arg(short = 'S', long)]
    state: Option<String>,

    /// Host the event describes.
    #[arg(short = 'e', long = "event-host")]
    event_host: Option<String>,

    /// Description.
    #[arg(short = 'D', long)]
    description: Option<String>,

    /// Service.
    #[arg(short = 's', long)]
    service: Option<String>,

    /// Tags (repeatable, or several values after one flag).
    #[arg(short = 'T', long, num_args = 1..)]
    tags: Vec<String>,

    /// Time to live in seconds.
    #[arg(short = 'l', long)]
    ttl: Option<f32>,

    /// Floating-point metric value.
    #[arg(short = 'm', long, conflicts_with = "metric_int", allow_negative_numbers = true)]
    metric: Option<f64>,

    /// Integer metric value.
    #[arg(short = 'i', long, allow_negative_numbers = true)]
    metric_int: Option<i64>,

    /// Custom attribute as KEY=VALUE (repeatable).
    #[arg(short = 'a', long = "attribute", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// The query to send.
    query: String,

    /// Pretty print output.
    #[arg(long)]
    pretty_print: bool,
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

// ── Configuration resolution ──────────────────────────────────────────────────

impl Cli {
    /// Merges arguments, environment, the config file, and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that cannot be loaded.
    fn transport_config(&self) -> anyhow::Result<TransportConfig> {
        let file = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ClientConfigFile::default(),
        };

        let mut config = file.into_transport_config();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(kind) = self.transport {
            config.kind = kind.into();
        }
        if let Some(ms) = self.timeout {
            config.timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Builds the event described by the `send` arguments.  No I/O.
fn build_event(args: &SendArgs) -> Event {
    let metric = match (args.metric_int, args.metric) {
        (Some(i), _) => Some(Metric::Int(i)),
        (None, Some(d)) => Some(Metric::Double(d)),
        (None, None) => None,
    };

    Event {
        time: args.time,
        state: args.state.clone(),
        service: args.service.clone(),
        host: args.event_host.clone(),
        description: args.description.clone(),
        tags: args.tags.clone(),
        ttl: args.ttl,
        attributes: args.attributes.iter().cloned().collect(),
        metric,
    }
}

async fn run_send<T: Transport>(client: &mut Client<T>, args: &SendArgs) -> anyhow::Result<()> {
    let event = build_event(args);
    client
        .send_event(event.clone())
        .await
        .context("sending event")?;

    if args.print_message {
        println!("{}", render_json(&event, false)?);
    }
    Ok(())
}

async fn run_query<T: Transport>(client: &mut Client<T>, args: &QueryArgs) -> anyhow::Result<()> {
    let events = client.query(&args.query).await.context("querying index")?;
    println!("{}", render_json(&events, args.pretty_print)?);
    Ok(())
}

/// Renders `value` as JSON with object keys in sorted order.
///
/// [`serde_json::Value`] stores objects in a `BTreeMap`, so the detour
/// through it orders every object's keys.
fn render_json<S: Serialize>(value: &S, pretty: bool) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

async fn run<T: Transport>(mut client: Client<T>, command: &Command) -> anyhow::Result<()> {
    let result = match command {
        Command::Send(args) => run_send(&mut client, args).await,
        Command::Query(args) => run_query(&mut client, args).await,
    };
    client.close().await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.transport_config()?;
    debug!(endpoint = %config.endpoint(), kind = ?config.kind, "resolved configuration");

    run(Client::from_config(config), &cli.command).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
