use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use stamp_renamer_core::{
    app_paths, load_config, run, save_config, AppConfig, ExifTimestampResolver, RenameOutcome,
    RunOptions, RunReport, SkipReason,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "stamp-renamer")]
#[command(about = "Renames JPG/PNG images to their capture time (YYYY-MM-DD_HH-MM-SS)")]
struct Cli {
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Init,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(default_value = ".")]
    dir: PathBuf,
    #[arg(long, overrides_with = "no_recursive")]
    recursive: bool,
    #[arg(long, overrides_with = "recursive")]
    no_recursive: bool,
    #[arg(long, overrides_with = "apply")]
    dry_run: bool,
    /// Rename even when the config defaults to a dry run.
    #[arg(long, overrides_with = "dry_run")]
    apply: bool,
    #[arg(long)]
    max_suffix: Option<u32>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;
    let options = run_options(&args, &config);

    let report = run(&options, &ExifTimestampResolver)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_table(&report);
        }
    }

    if report.dry_run {
        if args.dry_run {
            eprintln!("Dry run: no files were changed. Drop --dry-run to apply.");
        } else {
            eprintln!(
                "Dry run: no files were changed. dry_run_default is set in the config; pass --apply to rename."
            );
        }
    }

    Ok(())
}

/// Command-line flags win over config defaults in both directions.
fn run_options(args: &RenameArgs, config: &AppConfig) -> RunOptions {
    let recursive = if args.no_recursive {
        false
    } else {
        args.recursive || config.recursive_default
    };
    let dry_run = if args.apply {
        false
    } else {
        args.dry_run || config.dry_run_default
    };

    RunOptions {
        root: args.dir.clone(),
        recursive,
        dry_run,
        max_suffix: args.max_suffix.unwrap_or(config.max_suffix),
    }
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("Config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() {
        println!("Config file already exists: {}", paths.config_path.display());
        return Ok(());
    }
    save_config(&AppConfig::default())?;
    println!("Wrote default config: {}", paths.config_path.display());
    Ok(())
}

fn print_table(report: &RunReport) {
    for outcome in &report.outcomes {
        println!("{}", describe(outcome));
    }

    println!(
        "\nSummary: scanned={} images={} renamed={} skipped={} errors={}",
        report.summary.scanned_files,
        report.summary.image_files,
        report.summary.renamed,
        report.summary.skipped,
        report.summary.failed
    );
}

fn describe(outcome: &RenameOutcome) -> String {
    match outcome {
        RenameOutcome::Renamed { from, to } => {
            format!("Renamed '{}' to '{}'", display_name(from), display_name(to))
        }
        RenameOutcome::Skipped { path, reason } => match reason {
            SkipReason::AlreadyCanonical => format!(
                "Skipped '{}': Already has the correct filename based on its EXIF/creation date.",
                display_name(path)
            ),
            SkipReason::UnsupportedExtension => {
                format!("Skipped '{}': Not a supported image.", display_name(path))
            }
            SkipReason::WouldRename { to } => format!(
                "Would rename '{}' to '{}'",
                display_name(path),
                display_name(to)
            ),
        },
        RenameOutcome::Failed { path, error } => {
            format!("Error processing '{}': {}", display_name(path), error)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
