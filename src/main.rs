#![forbid(unsafe_code)]
//! modinit Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

use modinit::commands::{
    execute_activate, execute_init, execute_manifest, execute_scan, ActivateOptions, InitOptions,
    ManifestOptions, ScanOptions,
};
use modinit::config::CONFIG_FILE;
use modinit::{Config, KeyStyle};

#[derive(Parser)]
#[command(name = "modinit")]
#[command(about = "Declarative module activation - check which behavior modules a page wires up")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a modinit config
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Annotation attribute name
        #[arg(long)]
        attribute: Option<String>,

        /// Modules directory
        #[arg(long)]
        modules: Option<PathBuf>,

        /// Module key style
        #[arg(long, value_enum)]
        key_style: Option<KeyStyleArg>,

        /// Skip interactive prompts (use defaults + CLI args)
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List annotated elements in a rendered page
    Scan {
        /// Page to scan
        page: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discover module files and their keys
    Manifest {
        /// Modules directory (default: from config)
        root: Option<PathBuf>,

        /// Write manifest JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module key style
        #[arg(long, value_enum)]
        key_style: Option<KeyStyleArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an activation pass over a page with probe modules
    Activate {
        /// Page to activate
        page: PathBuf,

        /// Modules directory (default: from config)
        #[arg(short, long)]
        modules: Option<PathBuf>,

        /// Stop at the first module that fails to initialize
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyStyleArg {
    Qualified,
    Basename,
}

impl From<KeyStyleArg> for KeyStyle {
    fn from(arg: KeyStyleArg) -> Self {
        match arg {
            KeyStyleArg::Qualified => KeyStyle::Qualified,
            KeyStyleArg::Basename => KeyStyle::Basename,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "modinit=debug" } else { "modinit=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Init { force, attribute, modules, key_style, yes } => {
            let options = InitOptions {
                config_path: cli.config,
                force,
                attribute,
                modules_root: modules,
                key_style: key_style.map(Into::into),
                yes,
            };
            execute_init(options)?;
        }

        Commands::Scan { page, json } => {
            let options = ScanOptions { page, json };
            execute_scan(options, config)?;
        }

        Commands::Manifest { root, output, key_style, json } => {
            let options = ManifestOptions {
                root,
                output,
                key_style: key_style.map(Into::into),
                json,
            };
            execute_manifest(options, config)?;
        }

        Commands::Activate { page, modules, strict, json } => {
            let options = ActivateOptions { page, modules, strict, json };
            let report = execute_activate(options, config)?;
            if !report.is_clean() {
                if !json {
                    eprintln!(
                        "{} {} module(s) could not be activated",
                        style("✗").red(),
                        report.diagnostics.len()
                    );
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
