// Comment Dashboard - Web Server
// Serves the three-tab dashboard and its JSON API with Axum

use anyhow::{Context, Result};
use clap::Parser;
use comment_dashboard::{init_logging, web, Dashboard, DashboardConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// Web dashboard for bank comment statistics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./dashboard.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comments CSV to load
    #[arg(long, value_name = "FILE", env = "DASHBOARD_CSV")]
    csv: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, value_name = "ADDR", env = "DASHBOARD_ADDR")]
    addr: Option<String>,

    /// Directory served under /static
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::resolve(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(csv) = self.csv {
            config.data.csv_path = csv;
        }
        if let Some(addr) = self.addr {
            config.server.addr = addr;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = dir;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        error!("Server failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("🌐 Comment Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = args.into_config()?;

    let dashboard = Dashboard::load(&config).with_context(|| {
        format!(
            "Cannot start without data from {}",
            config.data.csv_path.display()
        )
    })?;
    println!(
        "✓ Loaded {} comments from {:?}",
        dashboard.stats().total_comments,
        config.data.csv_path
    );

    let state = web::AppState::new(dashboard, config.session_ttl());
    let app = web::router(state, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;

    info!("Listening on {}", config.server.addr);
    println!("\n🚀 Server running on http://{}", config.server.addr);
    println!("   API: http://{}/api/stats", config.server.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
