use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use omenspec::{Report, ValidationReport, ValidatorOpts, render_stderr_summary};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "omenspec", version)]
#[command(about = "Validate and normalize wireless test scenario specs")]
struct Cli {
    /// Log more on stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one or more spec files and print the report JSON.
    Validate(ValidateArgs),
    /// Print the schema hash of a valid spec.
    Fingerprint(FingerprintArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Input spec JSON file(s).
    #[arg(required = true)]
    configs: Vec<PathBuf>,

    /// Write the canonical spec here when validation succeeds (single input only).
    #[arg(long)]
    emit_spec: Option<PathBuf>,

    /// Leave the canonical spec out of the stdout report.
    #[arg(long)]
    omit_spec: bool,

    /// Pretty-print the stdout report.
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args, Debug)]
struct FingerprintArgs {
    /// Input spec JSON file.
    config: PathBuf,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Warn when noise_th is above this many dBm.
    #[arg(long, allow_negative_numbers = true, default_value_t = ValidatorOpts::DEFAULT_NOISE_CEILING_DBM)]
    noise_ceiling: f64,

    /// Placeholder every `iw` command template should contain.
    #[arg(long, default_value = ValidatorOpts::DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Length of the schema hash in hex characters.
    #[arg(long, default_value_t = ValidatorOpts::DEFAULT_HASH_LEN as u8, value_parser = clap::value_parser!(u8).range(1..=64))]
    hash_len: u8,
}

impl PolicyArgs {
    fn to_opts(&self) -> ValidatorOpts {
        ValidatorOpts {
            noise_ceiling_dbm: self.noise_ceiling,
            placeholder: self.placeholder.clone(),
            hash_len: usize::from(self.hash_len),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    if args.emit_spec.is_some() && args.configs.len() > 1 {
        anyhow::bail!(
            "--emit-spec takes a single CONFIG, got {}",
            args.configs.len()
        );
    }

    let opts = args.policy.to_opts();
    let reports = omenspec::validate_many(&args.configs, &opts);

    let multi = reports.len() > 1;
    for (path, report) in args.configs.iter().zip(&reports) {
        tracing::info!(
            path = %path.display(),
            ok = report.ok,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated"
        );
        if !report.ok {
            if multi {
                eprintln!("{}:", path.display());
            }
            eprint!("{}", render_stderr_summary(&report.errors));
        }
    }

    if let (Some(out), Some(report)) = (&args.emit_spec, reports.first()) {
        if let Some(canonical) = &report.canonical {
            write_canonical(out, canonical.bytes())?;
            eprintln!("wrote {}", out.display());
        }
    }

    let wire: Vec<Report<'_>> = reports
        .iter()
        .map(|r| {
            let rep = Report::new(r);
            if args.omit_spec {
                rep.without_spec()
            } else {
                rep
            }
        })
        .collect();
    let json = match (multi, args.pretty) {
        (false, false) => serde_json::to_string(&wire[0]),
        (false, true) => serde_json::to_string_pretty(&wire[0]),
        (true, false) => serde_json::to_string(&wire),
        (true, true) => serde_json::to_string_pretty(&wire),
    }
    .context("encode report JSON")?;
    println!("{json}");

    Ok(exit_code(reports.iter().all(|r| r.ok)))
}

fn cmd_fingerprint(args: FingerprintArgs) -> anyhow::Result<ExitCode> {
    let opts = args.policy.to_opts();
    let report: ValidationReport = omenspec::validate_path(&args.config, &opts);

    match report.schema_hash() {
        Some(hash) => {
            println!("{hash}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprint!("{}", render_stderr_summary(&report.errors));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn write_canonical(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("write canonical spec '{}'", path.display()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
