// Comment Dashboard - Core Library
// Shared by the terminal UI, the web server, and tests

pub mod cards;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod navigation;
pub mod sessions;
pub mod stats;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use cards::{build_cards, max_page, page, Card, CardStyle, DEFAULT_PAGE_SIZE};
pub use charts::{
    comments_by_year, sentiment_by_bank, Bar, ChartKind, ChartOutcome, ChartSpec, EmptyReason,
    QUALITATIVE_PALETTE,
};
pub use config::DashboardConfig;
pub use dashboard::{CardPage, Dashboard, Layout, Tab};
pub use data::{load_csv, BankFilter, CommentRecord, CommentTable, ALL_SENTINEL};
pub use error::DashboardError;
pub use navigation::{Direction, PageCursor};
pub use sessions::SessionStore;
pub use stats::{compute_statistics, BankCount, StatisticsSnapshot};

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber.
/// `RUST_LOG` wins when set; otherwise 0 = info, 1 = debug, 2+ = trace.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}
