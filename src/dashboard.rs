// Dashboard - everything both UI shells need, built once at startup
// Holds the table, the snapshot and the card list; each interaction is one call on this struct

use crate::cards::{self, Card};
use crate::charts::{ChartKind, ChartOutcome};
use crate::config::DashboardConfig;
use crate::data::{load_csv, BankFilter, CommentTable, ALL_SENTINEL};
use crate::error::Result;
use crate::navigation::PageCursor;
use crate::stats::{compute_statistics, StatisticsSnapshot};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Comments,
    Sentiments,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Comments, Tab::Sentiments];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Accueil",
            Tab::Comments => "Commentaires",
            Tab::Sentiments => "Sentiments",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Home => Tab::Comments,
            Tab::Comments => Tab::Sentiments,
            Tab::Sentiments => Tab::Home,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Tab::Home => Tab::Sentiments,
            Tab::Comments => Tab::Home,
            Tab::Sentiments => Tab::Comments,
        }
    }

    /// Chart shown on this tab, if any
    pub fn chart(&self) -> Option<ChartKind> {
        match self {
            Tab::Home => None,
            Tab::Comments => Some(ChartKind::CommentsByYear),
            Tab::Sentiments => Some(ChartKind::SentimentByBank),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// One interactive or display element of a tab
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    CardGrid {
        id: &'static str,
    },
    Button {
        id: &'static str,
        label: &'static str,
    },
    Dropdown {
        id: &'static str,
        label: &'static str,
        options: Vec<DropdownOption>,
        default: &'static str,
    },
    Chart {
        id: &'static str,
        endpoint: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TabLayout {
    pub tab: Tab,
    pub label: &'static str,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub tabs: Vec<TabLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub label: String,
    pub css_class: &'static str,
}

/// One rendered page of the card grid
#[derive(Debug, Clone, Serialize)]
pub struct CardPage {
    pub page: usize,
    pub max_page: usize,
    pub cards: Vec<CardView>,
}

pub struct Dashboard {
    table: CommentTable,
    stats: StatisticsSnapshot,
    cards: Vec<Card>,
    page_size: usize,
}

impl Dashboard {
    pub fn new(table: CommentTable, page_size: usize) -> Self {
        let stats = compute_statistics(&table);
        let cards = cards::build_cards(&stats);

        Dashboard {
            table,
            stats,
            cards,
            page_size,
        }
    }

    /// Load the configured CSV and build the snapshot. Any failure here is fatal to startup.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;

        let table = load_csv(&config.data.csv_path)?;
        info!(
            "Loaded {} comments from {} (sentiment column: {})",
            table.len(),
            config.data.csv_path.display(),
            if table.has_sentiment() { "yes" } else { "no" }
        );

        let dashboard = Dashboard::new(table, config.cards.page_size);
        info!(
            "Statistics ready: {} banks, {} years, {} cards over {} pages",
            dashboard.stats.comments_by_bank.len(),
            dashboard.stats.comments_by_year.len(),
            dashboard.cards.len(),
            dashboard.max_page() + 1
        );

        Ok(dashboard)
    }

    pub fn table(&self) -> &CommentTable {
        &self.table
    }

    pub fn stats(&self) -> &StatisticsSnapshot {
        &self.stats
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_page(&self) -> usize {
        cards::max_page(self.cards.len(), self.page_size)
    }

    pub fn new_cursor(&self) -> PageCursor {
        PageCursor::new(self.max_page())
    }

    pub fn cards_on(&self, cursor: &PageCursor) -> &[Card] {
        cards::page(&self.cards, cursor.page(), self.page_size)
    }

    pub fn card_page(&self, cursor: &PageCursor) -> CardPage {
        CardPage {
            page: cursor.page(),
            max_page: cursor.max_page(),
            cards: self
                .cards_on(cursor)
                .iter()
                .map(|card| CardView {
                    label: card.label.clone(),
                    css_class: card.style.css_class(),
                })
                .collect(),
        }
    }

    /// "Tout" first, then every bank in first-seen order
    pub fn bank_options(&self) -> Vec<DropdownOption> {
        std::iter::once(ALL_SENTINEL.to_string())
            .chain(self.table.banks())
            .map(|bank| DropdownOption {
                label: bank.clone(),
                value: bank,
            })
            .collect()
    }

    pub fn chart(&self, kind: ChartKind, filter: &BankFilter) -> ChartOutcome {
        kind.build(&self.table, filter)
    }

    pub fn layout(&self) -> Layout {
        let options = self.bank_options();

        let tabs = Tab::ALL
            .iter()
            .map(|&tab| {
                let controls = match tab {
                    Tab::Home => vec![
                        Control::CardGrid {
                            id: "card-container",
                        },
                        Control::Button {
                            id: "prev-button",
                            label: "Précédent",
                        },
                        Control::Button {
                            id: "next-button",
                            label: "Suivant",
                        },
                    ],
                    Tab::Comments => vec![
                        Control::Dropdown {
                            id: "bank-dropdown",
                            label: "Choisir une Banque:",
                            options: options.clone(),
                            default: ALL_SENTINEL,
                        },
                        Control::Chart {
                            id: "comments-by-bank-year",
                            endpoint: "/api/charts/comments-by-year",
                        },
                    ],
                    Tab::Sentiments => vec![
                        Control::Dropdown {
                            id: "sentiment-bank-dropdown",
                            label: "Choisir une Banque:",
                            options: options.clone(),
                            default: ALL_SENTINEL,
                        },
                        Control::Chart {
                            id: "sentiment-by-bank",
                            endpoint: "/api/charts/sentiment-by-bank",
                        },
                    ],
                };
                TabLayout {
                    tab,
                    label: tab.label(),
                    controls,
                }
            })
            .collect();

        Layout { tabs }
    }
}
