use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

use deadsweep::report::TerminalReporter;
use deadsweep::{run_tools, Config, ReportFormat, SweepOptions, Tool};

/// deadsweep - Find and remove unused classes, functions, layouts and strings
/// in Android projects (Kotlin & Java)
#[derive(Parser, Debug)]
#[command(name = "deadsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to sweep
    #[arg(short, long, default_value = ".", global = true)]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Actually delete unused items (dry run otherwise)
    #[arg(long, global = true, env = "DEADSWEEP_DELETE")]
    delete: bool,

    /// Ask for confirmation before deleting
    #[arg(long, global = true)]
    confirm: bool,

    /// Report file format
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Directory for report files
    #[arg(long, value_name = "DIR", global = true)]
    report_dir: Option<PathBuf>,

    /// Write a shell script that restores every deleted or rewritten file
    #[arg(long, value_name = "FILE", global = true)]
    undo_script: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Unused Activity/Fragment/Adapter classes
    Classes,
    /// Unused functions
    Functions,
    /// Unused layouts, repeated until nothing more is removed
    Layouts,
    /// Unused strings, then placeholder and translation checks
    Strings,
    /// Every sweep, in order
    All,
}

impl Command {
    fn tools(self) -> Vec<Tool> {
        match self {
            Command::Classes => vec![Tool::Classes],
            Command::Functions => vec![Tool::Functions],
            Command::Layouts => vec![Tool::Layouts],
            Command::Strings => vec![Tool::Strings],
            Command::All => Tool::ALL.to_vec(),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadsweep v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let options = sweep_options(&cli, &config)?;

    if !cli.quiet {
        let mode = if options.dry_run {
            "Dry run: nothing will be deleted".yellow()
        } else {
            "Deletion mode: unused items will be removed".red().bold()
        };
        println!("{}", mode);
    }

    let outcomes = run_tools(&cli.command.tools(), &config, &options)
        .into_diagnostic()
        .wrap_err("Sweep failed")?;

    let terminal = if cli.verbose {
        TerminalReporter::new().with_max_entries(usize::MAX)
    } else {
        TerminalReporter::new()
    };

    for outcome in &outcomes {
        if !cli.quiet {
            terminal.print(&outcome.report, &outcome.report_path);
        }
    }

    let removed: usize = outcomes.iter().map(|o| o.removed).sum();
    if !cli.quiet {
        println!();
        let verb = if options.dry_run { "found" } else { "removed" };
        println!(
            "{}",
            format!("Scan complete! {} unused items {}.", removed, verb).green().bold()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // CLI overrides
    if let Some(dir) = &cli.report_dir {
        config.report.directory = Some(dir.clone());
    }

    Ok(config)
}

fn sweep_options(cli: &Cli, config: &Config) -> Result<SweepOptions> {
    let format = match cli.format {
        Some(format) => format.into(),
        None => config
            .report
            .format
            .parse::<ReportFormat>()
            .into_diagnostic()
            .wrap_err("Invalid report format in config")?,
    };

    Ok(SweepOptions {
        root: cli.path.clone(),
        dry_run: !cli.delete,
        confirm: cli.confirm,
        quiet: cli.quiet,
        format,
        report_dir: config.report.directory.clone(),
        undo_script: cli.undo_script.clone(),
    })
}
