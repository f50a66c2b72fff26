use anyhow::Result;
use comment_dashboard::{
    BankFilter, CardStyle, ChartKind, ChartOutcome, Dashboard, PageCursor, Tab,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;

const CARD_COLUMNS: usize = 4;
const CARD_HEIGHT: u16 = 5;

/// Dropdown state for one chart tab; a selection change rebuilds that tab's chart once
struct ChartPanel {
    kind: ChartKind,
    selected: usize,
    outcome: ChartOutcome,
}

pub struct App {
    dashboard: Dashboard,
    pub current_tab: Tab,
    pub cursor: PageCursor,
    bank_options: Vec<String>,
    comments: ChartPanel,
    sentiments: ChartPanel,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let bank_options: Vec<String> = dashboard
            .bank_options()
            .into_iter()
            .map(|o| o.value)
            .collect();

        let panel = |kind: ChartKind| ChartPanel {
            kind,
            selected: 0,
            outcome: dashboard.chart(kind, &BankFilter::All),
        };
        let comments = panel(ChartKind::CommentsByYear);
        let sentiments = panel(ChartKind::SentimentByBank);
        let cursor = dashboard.new_cursor();

        Self {
            dashboard,
            current_tab: Tab::Home,
            cursor,
            bank_options,
            comments,
            sentiments,
        }
    }

    fn panel(&self, tab: Tab) -> Option<&ChartPanel> {
        match tab {
            Tab::Home => None,
            Tab::Comments => Some(&self.comments),
            Tab::Sentiments => Some(&self.sentiments),
        }
    }

    fn panel_mut(&mut self, tab: Tab) -> Option<&mut ChartPanel> {
        match tab {
            Tab::Home => None,
            Tab::Comments => Some(&mut self.comments),
            Tab::Sentiments => Some(&mut self.sentiments),
        }
    }

    /// Current dropdown value on a chart tab
    pub fn selection(&self, tab: Tab) -> Option<&str> {
        self.panel(tab)
            .and_then(|p| self.bank_options.get(p.selected))
            .map(String::as_str)
    }

    pub fn chart(&self, tab: Tab) -> Option<&ChartOutcome> {
        self.panel(tab).map(|p| &p.outcome)
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = self.current_tab.previous();
    }

    pub fn next_page(&mut self) {
        self.cursor.next();
    }

    pub fn previous_page(&mut self) {
        self.cursor.previous();
    }

    /// Step the current tab's bank selection, wrapping around
    pub fn cycle_selection(&mut self, forward: bool) {
        let len = self.bank_options.len();
        if len == 0 {
            return;
        }
        let tab = self.current_tab;
        let Some(selected) = self.panel(tab).map(|p| p.selected) else {
            return;
        };

        let selected = if forward {
            (selected + 1) % len
        } else {
            (selected + len - 1) % len
        };
        let filter = BankFilter::from_selection(&self.bank_options[selected]);

        let outcome = match self.panel(tab) {
            Some(panel) => self.dashboard.chart(panel.kind, &filter),
            None => return,
        };
        if let Some(panel) = self.panel_mut(tab) {
            panel.selected = selected;
            panel.outcome = outcome;
        }
    }

    /// Apply one key press; returns true when the app should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::BackTab => self.previous_tab(),
            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_tab();
                } else {
                    self.next_tab();
                }
            }
            KeyCode::Left | KeyCode::Char('h') if self.current_tab == Tab::Home => {
                self.previous_page()
            }
            KeyCode::Right | KeyCode::Char('l') if self.current_tab == Tab::Home => {
                self.next_page()
            }
            KeyCode::Down | KeyCode::Char('j') => self.cycle_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.cycle_selection(false),
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_tabs(f, chunks[0], app);

    match app.current_tab {
        Tab::Home => render_cards(f, chunks[1], app),
        tab => render_chart_tab(f, chunks[1], app, tab),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.label())).collect();
    let selected = Tab::ALL
        .iter()
        .position(|t| *t == app.current_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tableau de bord des commentaires "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );

    f.render_widget(tabs, area);
}

fn render_cards(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let cards = app.dashboard.cards_on(&app.cursor);
    let rows = cards.chunks(CARD_COLUMNS).collect::<Vec<_>>();

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            rows.iter()
                .map(|_| Constraint::Length(CARD_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(chunks[0]);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS])
            .split(*row_area);

        for (card, cell) in row.iter().zip(cells.iter()) {
            let bg = match card.style {
                CardStyle::Primary => Color::Blue,
                CardStyle::Secondary => Color::DarkGray,
            };
            let paragraph = Paragraph::new(card.label.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White).bg(bg))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, *cell);
        }
    }

    let pager = Line::from(vec![
        Span::styled("◀ Précédent", Style::default().fg(Color::Yellow)),
        Span::raw(format!(
            "   page {} / {}   ",
            app.cursor.page() + 1,
            app.cursor.max_page() + 1
        )),
        Span::styled("Suivant ▶", Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(
        Paragraph::new(pager).alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_chart_tab(f: &mut Frame, area: Rect, app: &App, tab: Tab) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let selection = app.selection(tab).unwrap_or_default();
    let dropdown = Paragraph::new(Line::from(vec![
        Span::raw("Choisir une Banque: "),
        Span::styled(
            format!("◀ {} ▶", selection),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(dropdown, chunks[0]);

    let Some(outcome) = app.chart(tab) else {
        return;
    };
    let chart = outcome.chart();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", chart.title));

    if let Some(reason) = outcome.empty_reason() {
        let empty = Paragraph::new(format!("Aucune donnée ({})", reason))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|bar| {
            Bar::default()
                .value(bar.value as u64)
                .text_value(bar.text.clone())
                .label(Line::from(bar.category.clone()))
                .style(Style::default().fg(hex_color(bar.color)))
        })
        .collect();

    let barchart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2);

    f.render_widget(barchart, chunks[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let help = match app.current_tab {
        Tab::Home => "←/→ page · Tab onglet · q quitter",
        _ => "↑/↓ banque · Tab onglet · q quitter",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} commentaires ", app.dashboard.stats().total_comments),
            Style::default().fg(Color::Green),
        ),
        Span::raw("│ "),
        Span::raw(help),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

/// "#RRGGBB" palette entry to a terminal color
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Gray;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}
