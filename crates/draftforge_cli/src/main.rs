//! Draftforge - command-line entry point
//!
//! Handles:
//! - Configuration loading
//! - Application-level logging initialization
//! - Dispatch to the generate / import / scan / locate commands

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};

use draftforge_core::config::{ConfigManager, Settings, DEFAULT_CONFIG_PATH};
use draftforge_core::install::DraftStoreLocator;
use draftforge_core::logging::{init_tracing_with_file, LogLevel};
use draftforge_core::orchestrator::{GenerateOutcome, GenerateRequest, Generator, InstallTarget};
use draftforge_core::scan::{list_assets, scan_directory};
use draftforge_core::timing::{micros_to_secs, secs_to_micros};

/// Assemble CapCut / JianYing drafts from narration, stills and captions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (created with defaults if missing)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a draft folder under an output directory
    Generate {
        /// Folder with one audio file, images and an optional .srt
        input: PathBuf,
        /// Output root (defaults to [paths] output_folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Project folder name (defaults to a fresh ID)
        #[arg(short, long)]
        name: Option<String>,
        /// Narration length in seconds, used if it cannot be measured
        #[arg(long, value_name = "SECS")]
        duration: Option<f64>,
    },

    /// Build a draft directly in the editor's draft store
    Import {
        input: PathBuf,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long, value_name = "SECS")]
        duration: Option<f64>,
    },

    /// Show how the files in a folder would be used
    Scan { input: PathBuf },

    /// Show draft-store candidates and the one that would be used
    Locate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first; it names the logs directory.
    let mut config_manager = ConfigManager::new(&cli.config);
    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }
    if cli.debug {
        config_manager.settings_mut().logging.level = "debug".to_string();
    }

    if let Err(e) = config_manager.ensure_dirs_exist() {
        eprintln!("Warning: Failed to create directories: {}", e);
    }

    let level = if cli.debug {
        LogLevel::Debug
    } else {
        config_manager.settings().logging.log_level()
    };
    let _log_guard = init_tracing_with_file(level, &config_manager.logs_folder());

    tracing::debug!("Config: {}", config_manager.path().display());
    tracing::debug!("Core version: {}", draftforge_core::version());

    let settings = config_manager.settings().clone();
    match cli.command {
        Commands::Generate {
            input,
            output,
            name,
            duration,
        } => {
            let root = output.unwrap_or_else(|| config_manager.output_folder());
            let request = request_for(input, InstallTarget::OutputDir(root), name, duration)?;
            run(request, settings)
        }
        Commands::Import {
            input,
            name,
            duration,
        } => {
            let locator = DraftStoreLocator::from_env(&settings.install.draft_roots());
            let request = request_for(input, InstallTarget::DraftStore(locator), name, duration)?;
            run(request, settings)
        }
        Commands::Scan { input } => scan(&input),
        Commands::Locate => locate(&settings),
    }
}

fn request_for(
    input: PathBuf,
    target: InstallTarget,
    name: Option<String>,
    duration: Option<f64>,
) -> Result<GenerateRequest> {
    let mut request = GenerateRequest::new(input, target);
    request.name = name;
    if let Some(secs) = duration {
        if !secs.is_finite() || secs <= 0.0 {
            bail!("--duration must be a positive number of seconds, got {}", secs);
        }
        request = request.with_duration_estimate(secs_to_micros(secs));
    }
    Ok(request)
}

fn run(request: GenerateRequest, settings: Settings) -> Result<()> {
    let input = request.input_dir.clone();
    let outcome = Generator::new(settings)
        .run(request)
        .with_context(|| format!("No draft was written for {}", input.display()))?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &GenerateOutcome) {
    println!("Draft:     {}", outcome.project_dir.display());
    println!("Document:  {}", outcome.document_path.display());
    println!(
        "Timeline:  {} scene(s), {} caption(s), {:.3}s",
        outcome.scene_count,
        outcome.caption_count,
        micros_to_secs(outcome.document.duration)
    );
    println!("Log:       {}", outcome.log_path.display());

    if !outcome.is_clean() {
        eprintln!();
        eprintln!("The draft was written but may need attention:");
        for warning in &outcome.warnings {
            eprintln!("  warning: {}", warning);
        }
    }
}

fn scan(input: &Path) -> Result<()> {
    let listing = list_assets(input)?;
    let print_group = |label: &str, files: &[PathBuf]| {
        println!("{} ({}):", label, files.len());
        for file in files {
            println!("  {}", file.display());
        }
    };
    print_group("Audio", &listing.audio_files);
    print_group("Images", &listing.image_files);
    print_group("Captions", &listing.caption_files);

    let scanned = scan_directory(input).context("Folder cannot be used as input")?;
    println!();
    println!("Narration: {}", scanned.audio_file.display());
    match &scanned.caption_file {
        Some(path) => println!("Captions:  {}", path.display()),
        None => println!("Captions:  none"),
    }
    for path in &scanned.ignored {
        println!("Ignored:   {}", path.display());
    }
    Ok(())
}

fn locate(settings: &Settings) -> Result<()> {
    let locator = DraftStoreLocator::from_env(&settings.install.draft_roots());
    for candidate in locator.candidates() {
        let mark = if candidate.is_dir() { "found" } else { "missing" };
        println!("{:>8}  {}", mark, candidate.display());
    }
    let root = locator.locate()?;
    println!();
    println!("Using {}", root.display());
    Ok(())
}
