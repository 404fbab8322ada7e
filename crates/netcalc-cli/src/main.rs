use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use netcalc_abstract::{
    BackoffParams, ByteStuffingParams, Calculation, EstRttParams, MultiplexingParams,
    PrefixRouteParams, Problem, QueuingDelayParams, ReportConfig, ReportConfigOverride,
    SlowStartParams, UtilizationParams, Worksheet,
};
use netcalc_core::samples::sample_worksheet;
use netcalc_core::units::mbps_to_bps;
use netcalc_core::{WorksheetReport, run_worksheet};

#[derive(Parser, Debug)]
#[command(author, version, about = "Textbook networking calculators")]
struct Args {
    /// Digits after the decimal point in logged summaries.
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// List multiplexing completions in turn order; `--by-turn=false`
    /// restores completion order over a worksheet's setting.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    by_turn: Option<bool>,

    /// Write the JSON report to a file instead of stdout.
    #[arg(long, global = true)]
    report_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rounds of TCP slow start.
    SlowStart {
        #[arg(long)]
        mss: u64,
        #[arg(long)]
        window_limit: u64,
        #[arg(long)]
        packets: u64,
        /// Defaults to the MSS.
        #[arg(long)]
        packet_size: Option<u64>,
    },
    /// Finish times of senders sharing one link round-robin.
    Multiplex {
        #[arg(long)]
        link_rate_mbps: f64,
        /// One file size per sender, comma separated, in turn order.
        #[arg(long, value_delimiter = ',', required = true)]
        file_sizes: Vec<f64>,
        /// Checked against the number of file sizes when given.
        #[arg(long)]
        sender_count: Option<usize>,
        #[arg(long, default_value_t = 0.0)]
        start_time: f64,
        #[arg(long)]
        payload: f64,
        #[arg(long)]
        header: f64,
    },
    QueuingDelay {
        #[arg(long)]
        packet_size: f64,
        #[arg(long)]
        rate_mbps: f64,
        #[arg(long)]
        packet_number: u64,
        #[arg(long)]
        average_over: Option<u64>,
    },
    /// Sender utilization, stop-and-wait or pipelined with --window.
    Utilization {
        #[arg(long)]
        packet_size: f64,
        #[arg(long)]
        rate_mbps: f64,
        #[arg(long)]
        rtt_ms: f64,
        #[arg(long)]
        window: Option<f64>,
    },
    EstRtt {
        #[arg(long)]
        initial: f64,
        /// Oldest first, comma separated.
        #[arg(long, value_delimiter = ',')]
        samples: Vec<f64>,
        #[arg(long, default_value_t = 0.125)]
        weight: f64,
    },
    Backoff {
        #[arg(long)]
        collisions: u32,
        #[arg(long)]
        rate_mbps: f64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Byte-stuff a frame of `XXh` tokens.
    Stuff {
        #[arg(long)]
        input: String,
        /// `name=seq1,seq2`, e.g. `esc=esc,z`. Repeatable.
        #[arg(long = "escape")]
        escapes: Vec<String>,
        /// `name=XXh`, e.g. `esc=1Bh`. Repeatable.
        #[arg(long = "symbol")]
        symbols: Vec<String>,
        #[arg(long, default_value_t = false)]
        framing: bool,
    },
    /// Longest-prefix match of an IPv4 address.
    Route {
        #[arg(long)]
        address: String,
        /// Binary prefix, spaces allowed. Repeatable.
        #[arg(long = "prefix", required = true)]
        prefixes: Vec<String>,
        #[arg(long)]
        default_port: u32,
        /// Output port per prefix. Repeatable.
        #[arg(long = "port")]
        ports: Vec<u32>,
    },
    /// Run a TOML worksheet, or the built-in sample sheet.
    Worksheet { path: Option<PathBuf> },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    info!("netcalc starting…");

    let mut config = ReportConfig::default();
    let cli_override = ReportConfigOverride {
        precision: args.precision,
        sort_completions_by_turn: args.by_turn,
    };

    let (mut sheet, single) = match &args.command {
        Command::Worksheet { path } => {
            let sheet = match path {
                Some(path) => load_worksheet(path)?,
                None => sample_worksheet(),
            };
            (sheet, false)
        }
        other => (single_problem(other)?, true),
    };

    // Flags win over the worksheet's own [config].
    let sheet_override = std::mem::take(&mut sheet.config);
    sheet_override.apply_to(&mut config);
    cli_override.apply_to(&mut config);

    let report = run_worksheet(&sheet, config);

    match &args.report_out {
        Some(path) => write_report(path, &report)?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    if single && report.failed > 0 {
        let reason = report
            .outcomes
            .iter()
            .find_map(|o| o.error.clone())
            .unwrap_or_default();
        anyhow::bail!("{reason}");
    }
    if report.failed > 0 {
        warn!("{} of {} problems failed", report.failed, report.outcomes.len());
    }
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn single_problem(command: &Command) -> Result<Worksheet> {
    let (label, calculation) = match command {
        Command::SlowStart {
            mss,
            window_limit,
            packets,
            packet_size,
        } => (
            "slow start",
            Calculation::SlowStart(SlowStartParams {
                mss_bytes: *mss,
                window_limit_bytes: *window_limit,
                packet_count: *packets,
                packet_size_bytes: *packet_size,
            }),
        ),
        Command::Multiplex {
            link_rate_mbps,
            file_sizes,
            sender_count,
            start_time,
            payload,
            header,
        } => (
            "statistical multiplexing",
            Calculation::Multiplexing(MultiplexingParams {
                link_rate_bps: mbps_to_bps(*link_rate_mbps),
                sender_count: sender_count.unwrap_or(file_sizes.len()),
                start_time_seconds: *start_time,
                file_sizes_bytes: file_sizes.clone(),
                payload_bytes: *payload,
                header_bytes: *header,
            }),
        ),
        Command::QueuingDelay {
            packet_size,
            rate_mbps,
            packet_number,
            average_over,
        } => (
            "queuing delay",
            Calculation::QueuingDelay(QueuingDelayParams {
                packet_size_bytes: *packet_size,
                rate_bps: mbps_to_bps(*rate_mbps),
                packet_number: *packet_number,
                average_over: *average_over,
            }),
        ),
        Command::Utilization {
            packet_size,
            rate_mbps,
            rtt_ms,
            window,
        } => (
            "utilization",
            Calculation::Utilization(UtilizationParams {
                packet_size_bytes: *packet_size,
                rate_bps: mbps_to_bps(*rate_mbps),
                rtt_ms: *rtt_ms,
                window_bytes: *window,
            }),
        ),
        Command::EstRtt {
            initial,
            samples,
            weight,
        } => (
            "estimated RTT",
            Calculation::EstRtt(EstRttParams {
                initial_est_rtt_ms: *initial,
                samples_ms: samples.clone(),
                weight: *weight,
            }),
        ),
        Command::Backoff {
            collisions,
            rate_mbps,
            seed,
        } => (
            "backoff",
            Calculation::Backoff(BackoffParams {
                collision_count: *collisions,
                rate_bps: mbps_to_bps(*rate_mbps),
                seed: *seed,
            }),
        ),
        Command::Stuff {
            input,
            escapes,
            symbols,
            framing,
        } => (
            "byte stuffing",
            Calculation::ByteStuffing(stuffing_params(input, escapes, symbols, *framing)?),
        ),
        Command::Route {
            address,
            prefixes,
            default_port,
            ports,
        } => (
            "prefix route",
            Calculation::PrefixRoute(PrefixRouteParams {
                address: address.clone(),
                routing_table: prefixes.clone(),
                default_port: *default_port,
                ports: ports.clone(),
            }),
        ),
        Command::Worksheet { .. } => anyhow::bail!("worksheet is not a single problem"),
    };

    Ok(Worksheet {
        name: label.to_string(),
        description: String::new(),
        config: ReportConfigOverride::default(),
        problems: vec![Problem::new(label, calculation)],
    })
}

/// Without explicit tables, fall back to the SOH/EOT/ESC table of the sample sheet.
fn stuffing_params(
    input: &str,
    escapes: &[String],
    symbols: &[String],
    include_framing: bool,
) -> Result<ByteStuffingParams> {
    if escapes.is_empty() && symbols.is_empty() {
        let sample = sample_worksheet();
        let table = sample
            .problems
            .into_iter()
            .find_map(|p| match p.calculation {
                Calculation::ByteStuffing(params) => Some(params),
                _ => None,
            })
            .context("Sample worksheet has no byte-stuffing table")?;
        return Ok(ByteStuffingParams {
            input_hex: input.to_string(),
            include_framing,
            ..table
        });
    }

    let mut escape_table = BTreeMap::new();
    for entry in escapes {
        let (name, sequence) = split_assignment(entry)?;
        escape_table.insert(
            name,
            sequence.split(',').map(|s| s.trim().to_string()).collect(),
        );
    }
    let mut symbol_table = BTreeMap::new();
    for entry in symbols {
        let (name, hex) = split_assignment(entry)?;
        symbol_table.insert(name, hex);
    }

    Ok(ByteStuffingParams {
        input_hex: input.to_string(),
        escapes: escape_table,
        symbols: symbol_table,
        include_framing,
    })
}

fn split_assignment(entry: &str) -> Result<(String, String)> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .with_context(|| format!("Expected name=value, got '{entry}'"))
}

fn load_worksheet(path: &Path) -> Result<Worksheet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read worksheet file {}", path.display()))?;
    let sheet: Worksheet = toml::from_str(&content).context("Failed to parse worksheet file")?;
    Ok(sheet)
}

fn write_report(path: &Path, report: &WorksheetReport) -> Result<()> {
    let data = serde_json::to_vec_pretty(report).context("Failed to serialize report")?;
    fs::write(path, &data)
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
