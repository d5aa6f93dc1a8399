mod logging;
mod prompt;
mod utils;
mod wizard;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use inkcal_core::ConfigStore;
use inkcal_provider_google::GoogleCalendarLister;
use owo_colors::OwoColorize;
use prompt::LinePrompter;

#[derive(Parser)]
#[command(name = "inkcal")]
#[command(about = "Set up the e-ink calendar display, or load an existing configuration")]
struct Cli {
    /// Path for the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path for generating debug images
    #[arg(short, long)]
    debug: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let lister = GoogleCalendarLister::new().context("Failed to start the Google API client")?;
    let mut prompter = LinePrompter::console();

    let context = failure_context(cli.config.as_deref());

    let store = wizard::load_or_create(
        cli.config.as_deref(),
        cli.debug.as_deref(),
        &mut prompter,
        &lister,
    )
    .context(context)?;

    print_summary(&store);

    Ok(())
}

/// Computed before the wizard runs: the create branch may write `config_path`.
fn failure_context(config_path: Option<&Path>) -> String {
    match config_path {
        Some(path) if path.is_file() => format!("Failed to load config from {}", path.display()),
        _ => "Configuration setup did not complete".to_string(),
    }
}

fn print_summary(store: &ConfigStore) {
    println!();
    println!("{}", "Configuration ready".green().bold());
    match store.parsed_units() {
        Some(units) => println!("  {} {}", "Units:".dimmed(), units),
        None => println!(
            "  {} {} {}",
            "Units:".dimmed(),
            store.units(),
            "(expected \"fahrenheit\" or \"celsius\")".yellow()
        ),
    }
    println!("  {} {}", "City id:".dimmed(), store.city_id());
    println!(
        "  {} {}",
        "Calendars:".dimmed(),
        store.selected_calendars().len()
    );
    if store.is_debug() {
        println!("  {} {}", "Debug output:".dimmed(), store.debug_save_path());
    }
}
