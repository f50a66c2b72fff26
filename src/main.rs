// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comment_dashboard::{init_logging, Dashboard, DashboardConfig};
use std::path::PathBuf;

/// Bank comment statistics in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./dashboard.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Comments CSV to load
    #[arg(long, value_name = "FILE", env = "DASHBOARD_CSV", global = true)]
    csv: Option<PathBuf>,

    /// Increase log verbosity (summary mode only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the statistics snapshot and exit
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Interactive terminal dashboard (default)
    Tui,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(csv) = args.csv {
        config.data.csv_path = csv;
    }

    match args.command.unwrap_or(Command::Tui) {
        Command::Summary { json } => {
            init_logging(args.verbose);
            run_summary(&config, json)
        }
        Command::Tui => run_ui_mode(&config),
    }
}

fn load(config: &DashboardConfig) -> Result<Dashboard> {
    Dashboard::load(config).with_context(|| {
        format!(
            "Cannot start without data from {}",
            config.data.csv_path.display()
        )
    })
}

fn run_summary(config: &DashboardConfig, json: bool) -> Result<()> {
    let dashboard = load(config)?;
    let stats = dashboard.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("📊 Comment Statistics");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total de Commentaires: {}", stats.total_comments);

    println!("\n🏦 By bank");
    for bank in &stats.comments_by_bank {
        println!("   {:<30} {:>6}", bank.bank, bank.count);
    }

    println!("\n📅 By year");
    for (year, count) in &stats.comments_by_year {
        println!("   {:<30} {:>6}", year, count);
    }

    if stats.sentiment_by_bank.is_empty() {
        println!("\n💬 No sentiment column in source data");
    } else {
        println!("\n💬 Sentiment by bank");
        for (bank, sentiments) in &stats.sentiment_by_bank {
            let cells: Vec<String> = sentiments
                .iter()
                .map(|(sentiment, count)| format!("{}={}", sentiment, count))
                .collect();
            println!("   {:<30} {}", bank, cells.join("  "));
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &DashboardConfig) -> Result<()> {
    // No tracing subscriber here: log lines would corrupt the alternate screen
    println!("🖥️  Loading Comment Dashboard UI...\n");

    let dashboard = load(config)?;
    println!(
        "✓ Loaded {} comments\n",
        dashboard.stats().total_comments
    );
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin dashboard-server --features server");
    std::process::exit(1);
}
