mod config;
mod load;
mod records;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, MergedConfig};
use kbase_report_requests::{MethodKind, RequestError};
use records::RecordKind;
use serde_json::Value;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "kbase-report",
    version,
    about = "Check, canonicalize and envelope KBaseReport service payloads."
)]
struct Cli {
    /// Config file (default: ./kbase-report.toml when present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode and validate method parameters, printing their canonical form.
    Check(CheckArgs),
    /// Decode any record and print it in canonical field order.
    Canonicalize(CanonicalizeArgs),
    /// Wrap method parameters in a JSON-RPC 1.1 request.
    Envelope(EnvelopeArgs),
    /// List the service methods and their parameter and result types.
    ListMethods(ListMethodsArgs),
}

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Print compact single-line JSON.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Method whose parameters the inputs hold (e.g. "create_extended_report").
    #[arg(long)]
    method: MethodKind,

    /// Payload files, or directories of *.json payloads.
    #[arg(required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Skip the parameter rules and only check types.
    #[arg(long, default_value_t = false)]
    no_validate: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Parser)]
struct CanonicalizeArgs {
    /// Record type of the inputs (e.g. "SimpleReport", "legacy.CreateParams").
    #[arg(long)]
    record: RecordKind,

    /// Record files, or directories of *.json records.
    #[arg(required = true)]
    inputs: Vec<Utf8PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Parser)]
struct EnvelopeArgs {
    #[arg(long)]
    method: MethodKind,

    /// Request id (default: envelope.default_id from config, else "1").
    #[arg(long)]
    id: Option<String>,

    /// Parameter payload file.
    input: Utf8PathBuf,

    /// Skip the parameter rules and only check types.
    #[arg(long, default_value_t = false)]
    no_validate: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Parser)]
struct ListMethodsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    match cli.cmd {
        Command::Check(args) => cmd_check(args, config_path),
        Command::Canonicalize(args) => cmd_canonicalize(args, config_path),
        Command::Envelope(args) => cmd_envelope(args, config_path),
        Command::ListMethods(args) => cmd_list_methods(args),
    }
}

/// Rejected requests exit with 2, everything else with 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<RequestError>()
        .map_or(1, RequestError::exit_code)
}

fn merged_config(
    config_path: Option<&Utf8Path>,
    compact: bool,
    no_validate: bool,
    id: Option<&str>,
) -> anyhow::Result<MergedConfig> {
    let file_config = config::load_or_default(config_path, Utf8Path::new("."))
        .context("load kbase-report.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_args(compact, no_validate, id);
    debug!(
        "merged config: pretty={}, validate={}, request_id={}",
        merged.pretty, merged.validate, merged.request_id
    );
    Ok(merged)
}

fn cmd_check(args: CheckArgs, config_path: Option<&Utf8Path>) -> anyhow::Result<ExitCode> {
    let merged = merged_config(config_path, args.output.compact, args.no_validate, None)?;
    let method = args.method;
    run_batch(&args.inputs, merged.pretty, |payload| {
        let params = method.canonical_params(payload, merged.validate)?;
        Ok(single_or_list(params))
    })
}

fn cmd_canonicalize(
    args: CanonicalizeArgs,
    config_path: Option<&Utf8Path>,
) -> anyhow::Result<ExitCode> {
    let merged = merged_config(config_path, args.output.compact, false, None)?;
    let record = args.record;
    run_batch(&args.inputs, merged.pretty, |value| {
        Ok(record.canonicalize(value)?)
    })
}

fn cmd_envelope(args: EnvelopeArgs, config_path: Option<&Utf8Path>) -> anyhow::Result<ExitCode> {
    let merged = merged_config(
        config_path,
        args.output.compact,
        args.no_validate,
        args.id.as_deref(),
    )?;
    let payload =
        load::read_payload(&args.input).with_context(|| format!("load {}", args.input))?;
    let request = args
        .method
        .envelope(payload, merged.request_id, merged.validate)
        .with_context(|| format!("envelope {}", args.input))?;
    print_json(&serde_json::to_value(&request)?, merged.pretty)?;
    info!(method = %request.method, id = %request.id, "wrote request envelope");
    Ok(ExitCode::SUCCESS)
}

/// Process every input, printing each success and logging each failure.
///
/// Exits 1 if any input failed to load or decode, else 2 if any was
/// rejected, else 0.
fn run_batch(
    inputs: &[Utf8PathBuf],
    pretty: bool,
    process: impl Fn(Value) -> anyhow::Result<Value>,
) -> anyhow::Result<ExitCode> {
    let loaded = load::load_payloads(inputs).context("load inputs")?;
    let mut failed = false;
    let mut rejected = false;

    for item in loaded {
        let outcome = match item.payload {
            Ok(payload) => process(payload),
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(value) => print_json(&value, pretty)?,
            Err(e) => {
                error!("{}: {:#}", item.path, e);
                match exit_code_for(&e) {
                    2 => rejected = true,
                    _ => failed = true,
                }
            }
        }
    }

    Ok(if failed {
        ExitCode::from(1)
    } else if rejected {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

/// Methods take one parameter object; `status` takes none.
fn single_or_list(params: Vec<Value>) -> Value {
    match <[Value; 1]>::try_from(params) {
        Ok([single]) => single,
        Err(all) => Value::Array(all),
    }
}

fn print_json(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value).context("serialize json")?
    } else {
        value.to_string()
    };
    println!("{s}");
    Ok(())
}

fn cmd_list_methods(args: ListMethodsArgs) -> anyhow::Result<ExitCode> {
    match args.format {
        OutputFormat::Text => {
            println!("Available methods:\n");
            println!("  {:<24} {:<36} PARAMS -> RESULT", "NAME", "RPC METHOD");
            println!("  {:<24} {:<36} ----------------", "----", "----------");
            for kind in MethodKind::ALL {
                println!(
                    "  {:<24} {:<36} {} -> {}",
                    kind.name(),
                    kind.rpc_name(),
                    kind.params_type().unwrap_or("(none)"),
                    kind.output_type()
                );
            }
            println!();
            println!("Use 'kbase-report check --method <name> <file>' to validate parameters.");
        }
        OutputFormat::Json => {
            let methods: Vec<_> = MethodKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.name(),
                        "rpc_method": kind.rpc_name(),
                        "params": kind.params_type(),
                        "result": kind.output_type(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&methods)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
