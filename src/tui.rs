use crate::error::parse_amount;
use crate::format::{
    format_amount, format_compact, format_currency, format_price, format_signed_currency,
    format_signed_percent,
};
use crate::market::Market;
use crate::news;
use crate::portfolio::Portfolio;
use crate::store::PortfolioStore;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tui_big_text::{BigText, PixelSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Dashboard,
    Portfolio,
    Analytics,
    News,
}

impl Tab {
    fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Portfolio => "Portfolio",
            Tab::Analytics => "Analytics",
            Tab::News => "News",
        }
    }

    fn all() -> &'static [Tab] {
        &[Tab::Dashboard, Tab::Portfolio, Tab::Analytics, Tab::News]
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Some(Tab::Dashboard),
            "portfolio" => Some(Tab::Portfolio),
            "analytics" => Some(Tab::Analytics),
            "news" => Some(Tab::News),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Normal,
    Add,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    Dark,
    Light,
}

struct Palette {
    fg: Color,
    muted: Color,
    accent: Color,
    highlight_bg: Color,
    popup_bg: Color,
    up: Color,
    down: Color,
}

impl Theme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                fg: Color::White,
                muted: Color::Gray,
                accent: Color::Yellow,
                highlight_bg: Color::DarkGray,
                popup_bg: Color::Black,
                up: Color::Green,
                down: Color::Red,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                highlight_bg: Color::Gray,
                popup_bg: Color::White,
                up: Color::Green,
                down: Color::Red,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

pub struct App {
    pub current_tab: Tab,
    pub market: Market,
    pub portfolio: Portfolio,
    pub store: PortfolioStore,
    pub should_quit: bool,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub currency: String,
    pub previous_prices: HashMap<String, f64>,
    pub trends: HashMap<String, Trend>,
    pub flash_state: bool,
    pub mode: AppMode,
    pub selected_asset: usize,
    pub selected_holding: usize,
    pub input: String,
    pub market_receiver: Option<mpsc::UnboundedReceiver<Market>>,
    pub theme: Theme,
}

impl App {
    pub fn new(
        market: Market,
        portfolio: Portfolio,
        store: PortfolioStore,
        currency: String,
        theme: Theme,
    ) -> App {
        let previous_prices = market
            .assets
            .iter()
            .map(|a| (a.id.clone(), a.price))
            .collect();
        App {
            current_tab: Tab::Dashboard,
            market,
            portfolio,
            store,
            should_quit: false,
            error_message: None,
            status_message: None,
            currency,
            previous_prices,
            trends: HashMap::new(),
            flash_state: false,
            mode: AppMode::Normal,
            selected_asset: 0,
            selected_holding: 0,
            input: String::new(),
            market_receiver: None,
            theme,
        }
    }

    pub fn set_market_receiver(&mut self, receiver: mpsc::UnboundedReceiver<Market>) {
        self.market_receiver = Some(receiver);
    }

    pub fn try_receive_market_update(&mut self) -> bool {
        if let Some(receiver) = &mut self.market_receiver {
            if let Ok(market) = receiver.try_recv() {
                self.apply_market(market);
                return true;
            }
        }
        false
    }

    /// Take a new market snapshot, reprice every holding and persist the result.
    pub fn apply_market(&mut self, market: Market) {
        self.update_trends(&market);
        self.market = market;
        self.portfolio.apply_prices(&self.market);
        if let Err(e) = self.persist() {
            self.error_message = Some(e);
        }
        self.mark_refreshed();
    }

    fn persist(&self) -> Result<(), String> {
        self.store.save(&self.portfolio).map_err(|e| {
            tracing::error!(error = %e, "failed to save portfolio");
            e.to_string()
        })
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|&t| t == self.current_tab)
            .unwrap_or(0);
        self.current_tab = tabs[(current_index + 1) % tabs.len()];
    }

    pub fn previous_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|&t| t == self.current_tab)
            .unwrap_or(0);
        self.current_tab = tabs[(current_index + tabs.len() - 1) % tabs.len()];
    }

    pub fn update_trends(&mut self, market: &Market) {
        for asset in &market.assets {
            if let Some(&previous_price) = self.previous_prices.get(&asset.id) {
                let threshold = previous_price.abs() * 1e-6;
                let trend = if asset.price > previous_price + threshold {
                    Trend::Up
                } else if asset.price < previous_price - threshold {
                    Trend::Down
                } else {
                    // Keep the previous trend if the move is too small
                    self.trends.get(&asset.id).copied().unwrap_or(Trend::Neutral)
                };
                self.trends.insert(asset.id.clone(), trend);
            } else {
                self.trends.insert(asset.id.clone(), Trend::Neutral);
            }

            self.previous_prices.insert(asset.id.clone(), asset.price);
        }
    }

    pub fn mark_refreshed(&mut self) {
        self.flash_state = !self.flash_state;
    }

    fn get_trend_color(&self, asset_id: &str, base_color: Color) -> Color {
        match self.trends.get(asset_id) {
            Some(Trend::Up) => {
                if self.flash_state {
                    Color::LightGreen
                } else {
                    Color::Green
                }
            }
            Some(Trend::Down) => {
                if self.flash_state {
                    Color::LightRed
                } else {
                    Color::Red
                }
            }
            _ => base_color,
        }
    }

    pub fn select_next(&mut self) {
        match self.current_tab {
            Tab::Dashboard => {
                if self.selected_asset < self.market.assets.len().saturating_sub(1) {
                    self.selected_asset += 1;
                }
            }
            Tab::Portfolio => {
                if self.selected_holding < self.portfolio.len().saturating_sub(1) {
                    self.selected_holding += 1;
                }
            }
            _ => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.current_tab {
            Tab::Dashboard => self.selected_asset = self.selected_asset.saturating_sub(1),
            Tab::Portfolio => self.selected_holding = self.selected_holding.saturating_sub(1),
            _ => {}
        }
    }

    pub fn enter_add_mode(&mut self) {
        if self.selected_asset < self.market.assets.len() {
            self.mode = AppMode::Add;
            self.input.clear();
        }
    }

    pub fn enter_edit_mode(&mut self) {
        if let Some(holding) = self.portfolio.holdings.get(self.selected_holding) {
            self.mode = AppMode::Edit;
            self.input = format!("{}", holding.get_amount());
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
    }

    pub fn push_input(&mut self, c: char) {
        if c.is_ascii_digit() || (c == '.' && !self.input.contains('.')) {
            self.input.push(c);
        }
    }

    /// Apply the amount typed into the add or edit dialog.
    pub fn confirm_input(&mut self) -> Result<(), String> {
        let amount = parse_amount(&self.input).map_err(|e| e.to_string())?;

        match self.mode {
            AppMode::Add => {
                let asset = self
                    .market
                    .assets
                    .get(self.selected_asset)
                    .cloned()
                    .ok_or_else(|| "Invalid asset selected".to_string())?;
                self.portfolio
                    .add(&asset, amount)
                    .map_err(|e| e.to_string())?;
                self.persist()?;
                self.status_message = Some(format!(
                    "{} {} added to your portfolio",
                    format_amount(amount),
                    asset.symbol
                ));
            }
            AppMode::Edit => {
                let asset_id = self
                    .portfolio
                    .holdings
                    .get(self.selected_holding)
                    .map(|h| h.get_id().to_string())
                    .ok_or_else(|| "Invalid holding selected".to_string())?;
                self.portfolio
                    .update_amount(&asset_id, amount)
                    .map_err(|e| e.to_string())?;
                self.persist()?;
                self.status_message = Some("Asset amount has been updated".to_string());
            }
            AppMode::Normal => return Ok(()),
        }

        self.exit_input_mode();
        Ok(())
    }

    pub fn remove_selected(&mut self) -> Result<(), String> {
        let Some(holding) = self.portfolio.holdings.get(self.selected_holding) else {
            return Ok(());
        };
        let asset_id = holding.get_id().to_string();
        let name = holding.get_name().to_string();

        self.portfolio.remove(&asset_id);
        self.selected_holding = self
            .selected_holding
            .min(self.portfolio.len().saturating_sub(1));
        self.persist()?;
        self.status_message = Some(format!("{name} has been removed from your portfolio"));
        Ok(())
    }

    /// Restamp the market and re-point every holding at it.
    pub fn refresh_prices(&mut self) {
        self.market.refresh();
        self.portfolio.apply_prices(&self.market);
        if let Err(e) = self.persist() {
            self.error_message = Some(e);
            return;
        }
        self.mark_refreshed();
        self.status_message = Some("Prices refreshed".to_string());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            AppMode::Normal => {
                if self.error_message.take().is_some() {
                    return;
                }
                self.status_message = None;

                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    // Vim navigation - hjkl
                    KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                        self.previous_tab();
                    }
                    KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                        self.next_tab();
                    }
                    KeyCode::Char('j') | KeyCode::Down => self.select_next(),
                    KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
                    KeyCode::Char('a') | KeyCode::Enter => {
                        if self.current_tab == Tab::Dashboard {
                            self.enter_add_mode();
                        }
                    }
                    KeyCode::Char('e') => {
                        if self.current_tab == Tab::Portfolio {
                            self.enter_edit_mode();
                        }
                    }
                    KeyCode::Char('d') | KeyCode::Delete => {
                        if self.current_tab == Tab::Portfolio {
                            if let Err(e) = self.remove_selected() {
                                self.error_message = Some(e);
                            }
                        }
                    }
                    KeyCode::Char('r') => self.refresh_prices(),
                    KeyCode::Char('t') => self.toggle_theme(),
                    KeyCode::Char('1') => self.current_tab = Tab::Dashboard,
                    KeyCode::Char('2') => self.current_tab = Tab::Portfolio,
                    KeyCode::Char('3') => self.current_tab = Tab::Analytics,
                    KeyCode::Char('4') => self.current_tab = Tab::News,
                    _ => {}
                }
            }
            AppMode::Add | AppMode::Edit => match code {
                KeyCode::Esc => self.exit_input_mode(),
                KeyCode::Enter => {
                    if let Err(e) = self.confirm_input() {
                        self.error_message = Some(e);
                        self.exit_input_mode();
                    }
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => self.push_input(c),
                _ => {}
            },
        }
    }
}

pub struct TuiOptions {
    pub currency: String,
    pub theme: Theme,
    pub tab: Option<Tab>,
    pub refresh_interval: Duration,
    pub volatility: f64,
}

pub async fn run_tui(
    market: Market,
    portfolio: Portfolio,
    store: PortfolioStore,
    options: TuiOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(market, portfolio, store, options.currency, options.theme);
    if let Some(tab) = options.tab {
        app.current_tab = tab;
    }

    let (market_receiver, _ticker) = spawn_market_ticker(
        app.market.clone(),
        options.refresh_interval,
        options.volatility,
    );
    app.set_market_receiver(market_receiver);

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "dashboard terminated with an error");
        println!("{err:?}");
    }

    Ok(())
}

/// Simulate the market in the background, sending a snapshot every `refresh_interval`.
///
/// The task stops once the receiver is dropped.
pub fn spawn_market_ticker(
    mut market: Market,
    refresh_interval: Duration,
    volatility: f64,
) -> (mpsc::UnboundedReceiver<Market>, JoinHandle<()>) {
    let (market_sender, market_receiver) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(refresh_interval);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            market.tick(&mut rng, volatility);
            if market_sender.send(market.clone()).is_err() {
                break;
            }
        }
        tracing::debug!("market simulation stopped");
    });
    (market_receiver, handle)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        app.try_receive_market_update();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let tab_titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };
            Line::from(Span::styled(t.title(), style))
        })
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Coinfolio ─ {}",
            format_currency(app.portfolio.get_total_value(), &app.currency)
        )))
        .style(Style::default().fg(palette.fg))
        .highlight_style(Style::default().fg(palette.accent))
        .select(
            Tab::all()
                .iter()
                .position(|&t| t == app.current_tab)
                .unwrap_or(0),
        );

    f.render_widget(tabs, chunks[0]);

    match app.current_tab {
        Tab::Dashboard => render_dashboard(f, chunks[1], app),
        Tab::Portfolio => render_portfolio(f, chunks[1], app),
        Tab::Analytics => render_analytics(f, chunks[1], app),
        Tab::News => render_news(f, chunks[1], app),
    }

    render_status_line(f, chunks[2], app);

    match app.mode {
        AppMode::Add => render_add_dialog(f, app),
        AppMode::Edit => render_edit_dialog(f, app),
        AppMode::Normal => {}
    }

    if let Some(error) = &app.error_message {
        render_error_popup(f, error);
    }
}

fn render_status_line(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let help = match (app.mode, app.current_tab) {
        (AppMode::Add, _) | (AppMode::Edit, _) => "Enter (save) | Esc (cancel)",
        (_, Tab::Dashboard) => "h/l (tabs) | j/k (select) | a (add) | r (refresh) | t (theme) | q (quit)",
        (_, Tab::Portfolio) => "h/l (tabs) | j/k (select) | e (edit) | d (remove) | t (theme) | q (quit)",
        _ => "h/l (tabs) | 1-4 (direct) | r (refresh) | t (theme) | q (quit)",
    };
    let line = match &app.status_message {
        Some(status) => Line::from(vec![
            Span::styled(status.clone(), Style::default().fg(palette.up)),
            Span::styled(format!("  {help}"), Style::default().fg(palette.muted)),
        ]),
        None => Line::from(Span::styled(help, Style::default().fg(palette.muted))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn total_value_text(app: &App) -> String {
    format_currency(app.portfolio.get_total_value(), &app.currency)
}

fn render_total_value(f: &mut Frame, area: Rect, app: &App) {
    let big_text_value = total_value_text(app);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .lines(vec![big_text_value.clone().into()])
        .build();

    let refresh_indicator = if app.flash_state { "↻" } else { "•" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "Total Portfolio Value ({}) {}",
            app.currency, refresh_indicator
        ))
        .title_alignment(Alignment::Center);
    f.render_widget(block, area);

    // Center the big text within the widget
    let inner = area.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let big_text_width = big_text_value.chars().count() as u16 * 4;
    let centered_area = if big_text_width < inner.width {
        let margin = (inner.width - big_text_width) / 2;
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(margin),
                Constraint::Min(0),
                Constraint::Length(margin),
            ])
            .split(inner)[1]
    } else {
        inner
    };

    f.render_widget(big_text, centered_area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let portfolio = &app.portfolio;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let change = portfolio.get_total_change();
    let change_color = if change >= 0.0 { palette.up } else { palette.down };

    let card = |title: &'static str, headline: String, detail: String, color: Color| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(detail, Style::default().fg(palette.muted))),
        ])
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Center)
    };

    f.render_widget(
        card(
            "Total Portfolio Value",
            format_currency(portfolio.get_total_value(), &app.currency),
            format!("Across {} assets", portfolio.len()),
            palette.fg,
        ),
        cards[0],
    );
    f.render_widget(
        card(
            "24h Change",
            format_signed_currency(change, &app.currency),
            format_signed_percent(portfolio.get_total_change_percent()),
            change_color,
        ),
        cards[1],
    );
    let best = match portfolio.best_performer() {
        Some(h) => card(
            "Best Performer",
            h.get_symbol().to_string(),
            format_signed_percent(h.change_percent_24h()),
            palette.up,
        ),
        None => card("Best Performer", "--".to_string(), "No assets".to_string(), palette.fg),
    };
    f.render_widget(best, cards[2]);
    f.render_widget(
        card(
            "Portfolio Assets",
            portfolio.len().to_string(),
            "Active holdings".to_string(),
            palette.fg,
        ),
        cards[3],
    );
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_total_value(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app);

    let header_cells = ["", "Name", "Symbol", "Price", "%24h", "24h Change", "Market Cap", "Volume"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = app.market.assets.iter().enumerate().map(|(i, asset)| {
        let price_color = app.get_trend_color(&asset.id, palette.fg);
        let change_color = if asset.is_up() { palette.up } else { palette.down };
        let row_style = if i == app.selected_asset {
            Style::default().bg(palette.highlight_bg)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(asset.image.clone()),
            Cell::from(asset.name.clone()),
            Cell::from(asset.symbol.clone()).style(Style::default().fg(palette.muted)),
            Cell::from(format_price(asset.price, &app.currency)).style(Style::default().fg(price_color)),
            Cell::from(format_signed_percent(asset.change_percent_24h)).style(Style::default().fg(change_color)),
            Cell::from(format_signed_currency(asset.change_24h, &app.currency)).style(Style::default().fg(change_color)),
            Cell::from(format_compact(asset.market_cap, &app.currency)),
            Cell::from(format_compact(asset.volume_24h, &app.currency)),
        ])
        .height(1)
        .style(row_style)
    });

    let last_updated = app
        .market
        .last_updated()
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(16),
            Constraint::Percentage(8),
            Constraint::Percentage(16),
            Constraint::Percentage(10),
            Constraint::Percentage(16),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Market Overview ─ Last updated: {last_updated}")),
    )
    .style(Style::default().fg(palette.fg));

    f.render_widget(table, chunks[2]);
}

fn render_empty_state(f: &mut Frame, area: Rect, app: &App, title: &str, headline: &str, detail: &str) {
    let palette = app.theme.palette();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline.to_string(),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(detail.to_string(), Style::default().fg(palette.muted))),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_portfolio(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    if app.portfolio.is_empty() {
        render_empty_state(
            f,
            chunks[1],
            app,
            "Your Holdings",
            "Your portfolio is empty",
            "Start by adding some cryptocurrencies from the dashboard",
        );
        return;
    }

    let header_cells = ["Name", "Amount", "Price", "Value", "%24h", "Daily P&L"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = app.portfolio.holdings.iter().enumerate().map(|(i, holding)| {
        let value_color = app.get_trend_color(holding.get_id(), palette.fg);
        let pct = holding.change_percent_24h();
        let pnl = holding.daily_change();
        let row_style = if i == app.selected_holding {
            Style::default().bg(palette.highlight_bg)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(format!("{} {}", holding.asset().image, holding.get_name())),
            Cell::from(format!(
                "{} {}",
                format_amount(holding.get_amount()),
                holding.get_symbol()
            )),
            Cell::from(format_price(holding.get_price(), &app.currency)),
            Cell::from(format_currency(holding.get_value(), &app.currency))
                .style(Style::default().fg(value_color)),
            Cell::from(format_signed_percent(pct))
                .style(Style::default().fg(if pct >= 0.0 { palette.up } else { palette.down })),
            Cell::from(format_signed_currency(pnl, &app.currency))
                .style(Style::default().fg(if pnl >= 0.0 { palette.up } else { palette.down })),
        ])
        .height(1)
        .style(row_style)
    });

    let total_row = Row::new(vec![
        Cell::from("TOTAL").style(Style::default().fg(palette.up).add_modifier(Modifier::BOLD)),
        Cell::from(""),
        Cell::from(""),
        Cell::from(format_currency(app.portfolio.get_total_value(), &app.currency))
            .style(Style::default().fg(palette.up).add_modifier(Modifier::BOLD)),
        Cell::from(format_signed_percent(app.portfolio.get_total_change_percent())),
        Cell::from(format_signed_currency(app.portfolio.get_total_change(), &app.currency)),
    ])
    .height(1);

    let table = Table::new(
        rows.chain(std::iter::once(total_row)),
        [
            Constraint::Percentage(22),
            Constraint::Percentage(18),
            Constraint::Percentage(15),
            Constraint::Percentage(17),
            Constraint::Percentage(10),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Your Holdings"))
    .style(Style::default().fg(palette.fg));

    f.render_widget(table, chunks[1]);
}

fn render_allocation_chart(f: &mut Frame, area: Rect, portfolio: &Portfolio, app: &App) {
    let palette = app.theme.palette();
    let mut allocation = portfolio.get_allocation();
    allocation.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let data: Vec<(&str, u64)> = allocation
        .iter()
        .map(|slice| (slice.symbol.as_str(), slice.percentage.round() as u64))
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Portfolio Distribution (%)"),
        )
        .data(&data)
        .bar_width(7)
        .bar_style(Style::default().fg(palette.accent))
        .value_style(Style::default().fg(Color::Black).bg(palette.accent));

    f.render_widget(barchart, area);
}

fn render_market_caps(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let data: Vec<(&str, u64)> = app
        .market
        .assets
        .iter()
        .map(|asset| (asset.symbol.as_str(), (asset.market_cap / 1e9).round() as u64))
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Market Cap (B)"),
        )
        .data(&data)
        .bar_width(5)
        .bar_style(Style::default().fg(palette.highlight_bg))
        .value_style(Style::default().fg(palette.fg).bg(palette.highlight_bg));

    f.render_widget(barchart, area);
}

fn render_performance(f: &mut Frame, area: Rect, portfolio: &Portfolio, app: &App) {
    let palette = app.theme.palette();
    let max_move = portfolio
        .holdings
        .iter()
        .map(|h| h.change_percent_24h().abs())
        .fold(0.0_f64, f64::max);
    let bar_room = (area.width as usize).saturating_sub(26).max(1);

    let items: Vec<ListItem> = portfolio
        .holdings
        .iter()
        .map(|h| {
            let pct = h.change_percent_24h();
            let color = if pct >= 0.0 { palette.up } else { palette.down };
            let len = if max_move > 0.0 {
                ((pct.abs() / max_move) * bar_room as f64).round() as usize
            } else {
                0
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<6}", h.get_symbol()), Style::default().fg(palette.fg)),
                Span::styled(format!("{:>9} ", format_signed_percent(pct)), Style::default().fg(color)),
                Span::styled("█".repeat(len), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("24h Performance"))
        .style(Style::default().fg(palette.fg));

    f.render_widget(list, area);
}

fn render_analytics(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let portfolio = &app.portfolio;

    if portfolio.is_empty() {
        render_empty_state(
            f,
            area,
            app,
            "Analytics",
            "No data to analyze",
            "Add some cryptocurrencies to your portfolio to see analytics",
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);

    render_allocation_chart(f, top[0], portfolio, app);
    render_performance(f, top[1], portfolio, app);
    render_market_caps(f, top[2], app);

    let header_cells = ["Asset", "Amount", "Price", "Value", "24h Change", "Allocation"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let allocation = portfolio.get_allocation();
    let rows = portfolio.holdings.iter().zip(&allocation).map(|(h, slice)| {
        let pct = h.change_percent_24h();
        Row::new(vec![
            Cell::from(format!("{} {} ({})", h.asset().image, h.get_name(), h.get_symbol())),
            Cell::from(format!("{:.6}", h.get_amount())),
            Cell::from(format_price(h.get_price(), &app.currency)),
            Cell::from(format_currency(h.get_value(), &app.currency)),
            Cell::from(format_signed_percent(pct))
                .style(Style::default().fg(if pct >= 0.0 { palette.up } else { palette.down })),
            Cell::from(format!("{:.1}%", slice.percentage)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(26),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(13),
            Constraint::Percentage(13),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Portfolio Summary"))
    .style(Style::default().fg(palette.fg));

    f.render_widget(table, chunks[1]);
}

fn render_news(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let items: Vec<ListItem> = news::articles()
        .iter()
        .map(|article| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    article.title,
                    Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} • {}", article.published_at, article.source),
                    Style::default().fg(palette.muted),
                )),
                Line::from(Span::styled(article.description, Style::default().fg(palette.fg))),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Crypto News"));
    f.render_widget(list, area);
}

fn render_add_dialog(f: &mut Frame, app: &App) {
    let Some(asset) = app.market.assets.get(app.selected_asset) else {
        return;
    };
    let palette = app.theme.palette();
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(4), // Preview
            Constraint::Min(0),    // Instructions
        ])
        .margin(1)
        .split(popup_area);

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Add {} to Portfolio ", asset.name))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(palette.popup_bg));
    f.render_widget(main_block, popup_area);

    render_amount_input(f, popup_layout[0], app, &format!(" Amount ({}) ", asset.symbol));

    let preview = match parse_amount(&app.input) {
        Ok(amount) => vec![
            Line::from(format!(
                "Price per {}: {}",
                asset.symbol,
                format_price(asset.price, &app.currency)
            )),
            Line::from(Span::styled(
                format!("Total Value: {}", format_currency(asset.price * amount, &app.currency)),
                Style::default().fg(palette.up).add_modifier(Modifier::BOLD),
            )),
        ],
        Err(e) => vec![
            Line::from(format!(
                "Price per {}: {}",
                asset.symbol,
                format_price(asset.price, &app.currency)
            )),
            Line::from(Span::styled(e.to_string(), Style::default().fg(palette.muted))),
        ],
    };
    f.render_widget(
        Paragraph::new(preview)
            .style(Style::default().fg(palette.fg))
            .alignment(Alignment::Center),
        popup_layout[1],
    );

    render_dialog_instructions(f, popup_layout[2]);
}

fn render_edit_dialog(f: &mut Frame, app: &App) {
    let Some(holding) = app.portfolio.holdings.get(app.selected_holding) else {
        return;
    };
    let palette = app.theme.palette();
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Current value
            Constraint::Length(3), // Input
            Constraint::Length(2), // Preview
            Constraint::Min(0),    // Instructions
        ])
        .margin(1)
        .split(popup_area);

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Edit Amount ─ {} ", holding.get_name()))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(palette.popup_bg));
    f.render_widget(main_block, popup_area);

    let current_text = format!(
        "Current Amount: {} {}\nCurrent Value: {}",
        format_amount(holding.get_amount()),
        holding.get_symbol(),
        format_currency(holding.get_value(), &app.currency)
    );
    let current_paragraph = Paragraph::new(current_text)
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted))
                .title(" Current "),
        );
    f.render_widget(current_paragraph, popup_layout[0]);

    render_amount_input(f, popup_layout[1], app, " New Amount ");

    let (preview_text, preview_style) = match parse_amount(&app.input) {
        Ok(amount) => (
            format!(
                "New Value: {}",
                format_currency(holding.get_price() * amount, &app.currency)
            ),
            Style::default().fg(palette.up),
        ),
        Err(e) => (e.to_string(), Style::default().fg(palette.down)),
    };
    f.render_widget(
        Paragraph::new(preview_text)
            .style(preview_style)
            .alignment(Alignment::Center),
        popup_layout[2],
    );

    render_dialog_instructions(f, popup_layout[3]);
}

fn render_amount_input(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let palette = app.theme.palette();
    let cursor = if app.flash_state { "█" } else { "▌" };
    let input_field = Paragraph::new(format!("{}{cursor}", app.input))
        .style(
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(title.to_string()),
        );
    f.render_widget(input_field, area);
}

fn render_dialog_instructions(f: &mut Frame, area: Rect) {
    let instructions = "Enter: Save | Esc: Cancel | Type numbers and decimal point";
    let paragraph = Paragraph::new(instructions)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_error_popup(f: &mut Frame, error: &str) {
    let popup_area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, popup_area);

    let error_paragraph = Paragraph::new(error)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app_with(portfolio: Portfolio) -> App {
        let store = PortfolioStore::temporary().unwrap();
        App::new(Market::mock(), portfolio, store, "USD".to_string(), Theme::Dark)
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = app_with(Portfolio::new());
        assert_eq!(app.current_tab, Tab::Dashboard);
        app.next_tab();
        assert_eq!(app.current_tab, Tab::Portfolio);
        app.previous_tab();
        app.previous_tab();
        assert_eq!(app.current_tab, Tab::News);
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Analytics);
        assert_eq!(Tab::from_str(" News "), Some(Tab::News));
        assert_eq!(Tab::from_str("balances"), None);
    }

    #[test]
    fn test_add_from_dashboard() {
        let mut app = app_with(Portfolio::new());
        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Add);

        type_keys(&mut app, "1.5x.5");
        assert_eq!(app.input, "1.55");
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        let holding = app.portfolio.get("ethereum").unwrap();
        assert!((holding.get_amount() - 1.5).abs() < 1e-12);
        assert_eq!(app.status_message.as_deref(), Some("1.50 ETH added to your portfolio"));
        // persisted on mutation
        assert_eq!(app.store.load(), app.portfolio);
    }

    #[test]
    fn test_add_rejects_empty_amount() {
        let mut app = app_with(Portfolio::new());
        app.enter_add_mode();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.error_message.as_deref(), Some("Amount is required"));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.portfolio.is_empty());

        // the next key only dismisses the error
        app.handle_key(KeyCode::Char('q'));
        assert!(app.error_message.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_edit_and_remove_holding() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("bitcoin").unwrap(), 1.0).unwrap();
        portfolio.add(market.get("cardano").unwrap(), 100.0).unwrap();
        let mut app = app_with(portfolio);

        app.handle_key(KeyCode::Char('2'));
        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::Edit);
        assert_eq!(app.input, "100");

        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Enter);
        assert!((app.portfolio.get("cardano").unwrap().get_amount() - 10.0).abs() < 1e-12);

        app.handle_key(KeyCode::Char('d'));
        assert!(app.portfolio.get("cardano").is_none());
        assert_eq!(app.selected_holding, 0);
        assert_eq!(app.store.load().len(), 1);
    }

    #[test]
    fn test_edit_cancel_keeps_amount() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("polkadot").unwrap(), 4.0).unwrap();
        let mut app = app_with(portfolio);

        app.current_tab = Tab::Portfolio;
        app.enter_edit_mode();
        type_keys(&mut app, "9");
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.portfolio.get("polkadot").unwrap().get_amount(), 4.0);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_market_update_reprices_and_persists() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("bitcoin").unwrap(), 2.0).unwrap();
        let mut app = app_with(portfolio);

        let (sender, receiver) = mpsc::unbounded_channel();
        app.set_market_receiver(receiver);
        assert!(!app.try_receive_market_update());

        let mut next = market.clone();
        next.assets[0].price = 50000.0;
        next.assets[1].price = 2000.0;
        sender.send(next).unwrap();
        assert!(app.try_receive_market_update());

        assert_eq!(app.portfolio.get_total_value(), 100000.0);
        assert_eq!(app.trends.get("bitcoin"), Some(&Trend::Up));
        assert_eq!(app.trends.get("ethereum"), Some(&Trend::Down));
        assert_eq!(app.trends.get("cardano"), Some(&Trend::Neutral));
        assert_eq!(app.store.load().get_total_value(), 100000.0);
    }

    #[test]
    fn test_refresh_repoints_holdings_and_persists() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("bitcoin").unwrap(), 1.0).unwrap();
        let mut app = app_with(portfolio);
        assert!(app.store.load().is_empty());

        std::thread::sleep(std::time::Duration::from_millis(2));
        app.handle_key(KeyCode::Char('r'));

        let refreshed = app.market.get("bitcoin").unwrap().last_updated;
        let holding = app.portfolio.get("bitcoin").unwrap();
        assert_eq!(holding.asset().last_updated, refreshed);
        assert_ne!(market.get("bitcoin").unwrap().last_updated, refreshed);
        assert_eq!(app.store.load(), app.portfolio);
        assert_eq!(app.status_message.as_deref(), Some("Prices refreshed"));
    }

    #[test]
    fn test_edit_prefills_large_amount() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("cardano").unwrap(), 1e20).unwrap();
        let mut app = app_with(portfolio);

        app.current_tab = Tab::Portfolio;
        app.enter_edit_mode();
        assert_eq!(app.input, "100000000000000000000");
        assert_eq!(app.input.parse::<f64>().unwrap(), 1e20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_market_ticker() {
        let market = Market::mock();
        let volatility = 0.02;
        let (mut receiver, ticker) =
            spawn_market_ticker(market.clone(), Duration::from_secs(5), volatility);

        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(receiver.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(1)).await;
        let snapshot = receiver.recv().await.unwrap();
        assert_eq!(snapshot.assets.len(), market.assets.len());
        for (before, after) in market.assets.iter().zip(&snapshot.assets) {
            let moved = (after.price - before.price) / before.price;
            assert!(moved.abs() <= volatility / 2.0 + 1e-12);
        }

        // the ticker gives up once nobody listens
        drop(receiver);
        tokio::time::timeout(Duration::from_secs(60), ticker)
            .await
            .expect("ticker kept running after the receiver was dropped")
            .unwrap();
    }

    #[test]
    fn test_total_value_uses_currency_symbol() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("cardano").unwrap(), 100.0).unwrap();
        let mut app = app_with(portfolio);
        assert_eq!(total_value_text(&app), "$45.67");
        app.currency = "EUR".to_string();
        assert_eq!(total_value_text(&app), "45.67 €");
        app.currency = "GBP".to_string();
        assert_eq!(total_value_text(&app), "£45.67");
        assert!(render(&app).contains("Total Portfolio Value (GBP)"));
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = app_with(Portfolio::new());
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.theme, Theme::Light);
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
    }

    #[test]
    fn test_render_tabs() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("bitcoin").unwrap(), 0.5).unwrap();
        portfolio.add(market.get("chainlink").unwrap(), 10.0).unwrap();
        let mut app = app_with(portfolio);

        let screen = render(&app);
        assert!(screen.contains("Market Overview"));
        assert!(screen.contains("Best Performer"));

        app.current_tab = Tab::Portfolio;
        assert!(render(&app).contains("Your Holdings"));

        app.current_tab = Tab::Analytics;
        let screen = render(&app);
        assert!(screen.contains("24h Performance"));
        assert!(screen.contains("Portfolio Summary"));
        assert!(screen.contains("Market Cap (B)"));

        app.current_tab = Tab::News;
        assert!(render(&app).contains("Crypto News"));
    }

    #[test]
    fn test_render_empty_states() {
        let mut app = app_with(Portfolio::new());
        app.current_tab = Tab::Portfolio;
        assert!(render(&app).contains("Your portfolio is empty"));
        app.current_tab = Tab::Analytics;
        assert!(render(&app).contains("No data to analyze"));
    }

    #[test]
    fn test_render_add_dialog() {
        let mut app = app_with(Portfolio::new());
        app.enter_add_mode();
        type_keys(&mut app, "2");
        let screen = render(&app);
        assert!(screen.contains("Add Bitcoin to Portfolio"));
        assert!(screen.contains("Total Value: $87,135.78"));
    }
}
