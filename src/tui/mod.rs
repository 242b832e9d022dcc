//! Ratatui-based terminal UI.
//!
//! Three pages share one viewport source: the dashboard (stat cards or
//! bar + pie overview), the user pie, and the deposits area chart. Every page
//! switch mounts a fresh view with its own fetch controller; `r` refetches the
//! mounted page.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cli::TuiArgs;
use crate::data::{FetchController, FetchState, HttpFetcher};
use crate::domain::{ChartPoint, StatEntry, format_number};
use crate::error::{AppError, EXIT_IO};
use crate::stats::{DASHBOARD_PALETTE, PIE_PALETTE, color_of, share_percent};
use crate::view::viewport::width_px_from_columns;
use crate::view::{
    AreaView, DashboardView, PieDataset, PieView, SizeClass, Theme, ViewMode, ViewOutput,
    ViewportSource,
};

mod plotters_chart;

use plotters_chart::{AreaChart, PieChart};

/// Rows taken by one stat card, borders included.
const CARD_HEIGHT: u16 = 4;

/// Start the TUI.
pub fn run(runtime: &Runtime, args: &TuiArgs) -> Result<(), AppError> {
    let fetcher = Arc::new(HttpFetcher::new(&args.source.request_options())?);
    let (columns, _) = crossterm::terminal::size()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read terminal size: {e}")))?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(runtime, fetcher, args, columns);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_IO, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_IO, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Pie,
    Area,
}

impl Page {
    const ALL: [Page; 3] = [Page::Dashboard, Page::Pie, Page::Area];

    fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Pie => "Users",
            Page::Area => "Deposits",
        }
    }

    fn next(self) -> Self {
        match self {
            Page::Dashboard => Page::Pie,
            Page::Pie => Page::Area,
            Page::Area => Page::Dashboard,
        }
    }
}

enum PageView {
    Dashboard(DashboardView),
    Pie(PieView),
    Area(AreaView),
}

impl PageView {
    fn output(&self, state: &FetchState) -> ViewOutput {
        match self {
            PageView::Dashboard(v) => v.output(state),
            PageView::Pie(v) => v.output(state),
            PageView::Area(v) => v.output(state),
        }
    }

    fn size_class(&self) -> SizeClass {
        match self {
            PageView::Dashboard(v) => v.size_class(),
            PageView::Pie(v) => v.size_class(),
            PageView::Area(v) => v.size_class(),
        }
    }

    fn resized(&mut self) -> Option<SizeClass> {
        match self {
            PageView::Dashboard(v) => v.resized(),
            PageView::Pie(v) => v.resized(),
            PageView::Area(v) => v.resized(),
        }
    }
}

/// A page that is on screen: its view, its fetch lifecycle, and the state feed.
struct Mounted {
    page: Page,
    view: PageView,
    fetch: FetchController<HttpFetcher>,
    rx: watch::Receiver<FetchState>,
}

struct App {
    runtime: tokio::runtime::Handle,
    fetcher: Arc<HttpFetcher>,
    url: Option<String>,
    theme: Theme,
    viewport: ViewportSource,
    mounted: Mounted,
    card_scroll: usize,
    status: String,
    /// Set by `r`; cleared once the refetch settles.
    refreshing: bool,
}

impl App {
    fn new(runtime: &Runtime, fetcher: Arc<HttpFetcher>, args: &TuiArgs, columns: u16) -> Self {
        let url = args
            .source
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let status = endpoint_status(url.as_deref());
        let viewport = ViewportSource::new(width_px_from_columns(columns));
        let handle = runtime.handle().clone();
        let mounted = mount(Page::Dashboard, &viewport, &fetcher, &handle, url.clone());

        Self {
            runtime: handle,
            fetcher,
            url,
            theme: args.theme(),
            viewport,
            mounted,
            card_scroll: 0,
            status,
            refreshing: false,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_changes() {
                needs_redraw = true;
            }

            if needs_redraw {
                let state = self.mounted.rx.borrow_and_update().clone();
                terminal
                    .draw(|f| self.draw(f, &state))
                    .map_err(|e| AppError::new(EXIT_IO, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_IO, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_IO, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(columns, _) => {
                    self.viewport.set_width(width_px_from_columns(columns));
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("dashboard closed");
        Ok(())
    }

    /// Pick up fetch and resize changes; `true` when the screen is stale.
    fn poll_changes(&mut self) -> bool {
        let fetch_changed = self.mounted.rx.has_changed().unwrap_or(false);
        let resized = self.mounted.view.resized().is_some();
        if self.refreshing && !self.mounted.rx.borrow().loading {
            self.refreshing = false;
            self.status = endpoint_status(self.mounted.fetch.url());
            return true;
        }
        fetch_changed || resized
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.switch_to(Page::Dashboard),
            KeyCode::Char('2') => self.switch_to(Page::Pie),
            KeyCode::Char('3') => self.switch_to(Page::Area),
            KeyCode::Tab => self.switch_to(self.mounted.page.next()),
            KeyCode::Char('r') => {
                if self.url.is_some() {
                    self.mounted.fetch.refresh();
                    self.status = "Refreshing...".to_string();
                    self.refreshing = true;
                }
            }
            KeyCode::Char('a') | KeyCode::Char(' ') => {
                if let PageView::Dashboard(view) = &mut self.mounted.view {
                    view.toggle_mode();
                    self.card_scroll = 0;
                }
            }
            KeyCode::Char('n') => self.select_pie(PieDataset::NewUsers),
            KeyCode::Char('u') => self.select_pie(PieDataset::ActiveUsers),
            KeyCode::Up => self.card_scroll = self.card_scroll.saturating_sub(1),
            KeyCode::Down => self.card_scroll = self.card_scroll.saturating_add(1),
            _ => {}
        }
        false
    }

    fn switch_to(&mut self, page: Page) {
        if page == self.mounted.page {
            return;
        }
        debug!(page = page.title(), "mounting page");
        // The old page's lifecycle and resize listener go away with it.
        self.mounted = mount(page, &self.viewport, &self.fetcher, &self.runtime, self.url.clone());
        self.card_scroll = 0;
        self.refreshing = false;
        self.status = endpoint_status(self.mounted.fetch.url());
    }

    fn select_pie(&mut self, dataset: PieDataset) {
        if let PageView::Pie(view) = &mut self.mounted.view {
            view.select(dataset);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>, state: &FetchState) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let out = self.mounted.view.output(state);
        self.draw_header(frame, chunks[0], state);
        self.draw_body(frame, chunks[1], &out);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, state: &FetchState) {
        let mut tabs: Vec<Span> = vec![Span::styled("statdash ", Style::default().fg(self.theme.accent))];
        for (i, page) in Page::ALL.iter().enumerate() {
            let style = if *page == self.mounted.page {
                Style::default().fg(Color::Black).bg(self.theme.active()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };
            tabs.push(Span::styled(format!(" {} {} ", i + 1, page.title()), style));
            tabs.push(Span::raw(" "));
        }

        let fetched = state
            .data
            .as_ref()
            .map(|d| d.received_at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let size_class = match self.mounted.view.size_class() {
            SizeClass::Compact => "compact",
            SizeClass::Wide => "wide",
        };
        let info = Line::from(Span::styled(
            format!("fetched: {fetched} | layout: {size_class} ({} px)", self.viewport.width_px()),
            Style::default().fg(self.theme.muted()),
        ));

        let p = Paragraph::new(Text::from(vec![Line::from(tabs), info]))
            .style(Style::default().bg(self.theme.background()))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, out: &ViewOutput) {
        let title = match &self.mounted.view {
            PageView::Dashboard(v) => match v.mode() {
                ViewMode::Cards => "Stats".to_string(),
                ViewMode::Charts => "Stats Overview".to_string(),
            },
            PageView::Pie(v) => v.dataset().title().to_string(),
            PageView::Area(_) => "Deposits and Bonuses Comparison".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().bg(self.theme.background()));
        let mut inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let toggles = match &self.mounted.view {
            PageView::Dashboard(v) => Some(toggle_bar(
                &[("a Cards", v.mode() == ViewMode::Cards), ("a Charts", v.mode() == ViewMode::Charts)],
                &self.theme,
            )),
            PageView::Pie(v) => Some(toggle_bar(
                &[
                    ("n New Users", v.dataset() == PieDataset::NewUsers),
                    ("u All Users", v.dataset() == PieDataset::ActiveUsers),
                ],
                &self.theme,
            )),
            PageView::Area(_) => None,
        };
        if let Some(toggles) = toggles {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(inner);
            frame.render_widget(Paragraph::new(toggles), rows[0]);
            inner = rows[1];
        }

        if out.loading {
            let msg = Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }
        if let Some(error) = &out.error {
            let msg = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }
        if out.entries.is_empty() && out.series.is_empty() {
            let msg = Paragraph::new("No data.").style(Style::default().fg(self.theme.muted()));
            frame.render_widget(msg, inner);
            return;
        }

        let size_class = self.mounted.view.size_class();
        match &self.mounted.view {
            PageView::Dashboard(v) if v.mode() == ViewMode::Cards => {
                self.card_scroll = clamp_scroll(self.card_scroll, out.entries.len(), size_class, inner.height);
                draw_cards(frame, inner, &out.entries, size_class, self.card_scroll, &self.theme);
            }
            PageView::Dashboard(_) => {
                let direction = match size_class {
                    SizeClass::Wide => Direction::Horizontal,
                    SizeClass::Compact => Direction::Vertical,
                };
                let halves = Layout::default()
                    .direction(direction)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(inner);
                draw_bars(frame, halves[0], &out.series, &self.theme);
                draw_pie_with_legend(frame, halves[1], &out.series, &DASHBOARD_PALETTE, size_class, &self.theme);
            }
            PageView::Pie(_) => {
                draw_pie_with_legend(frame, inner, &out.series, &PIE_PALETTE, size_class, &self.theme);
            }
            PageView::Area(_) => {
                let chart = AreaChart {
                    points: &out.series,
                    color: self.theme.accent,
                    axis_color: self.theme.muted(),
                };
                frame.render_widget(chart, inner);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.mounted.page {
            Page::Dashboard => "1/2/3 page  Tab next  a toggle cards/charts  ↑/↓ scroll  r refresh  q quit",
            Page::Pie => "1/2/3 page  Tab next  n new users  u active users  r refresh  q quit",
            Page::Area => "1/2/3 page  Tab next  r refresh  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(self.theme.muted())),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn endpoint_status(url: Option<&str>) -> String {
    match url {
        Some(url) => format!("endpoint: {url}"),
        None => "No endpoint configured (pass --url or set STATS_API_URL).".to_string(),
    }
}

/// One legend line per slice plus the border, capped at half the area.
fn legend_height(slices: usize, area_height: u16) -> u16 {
    u16::try_from(slices).unwrap_or(u16::MAX).saturating_add(2).min(area_height / 2)
}

/// Button row; the selected option uses the accent, the rest the inactive color.
fn toggle_bar(options: &[(&str, bool)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(options.len() * 2);
    for (label, selected) in options {
        let bg = if *selected { theme.active() } else { theme.inactive() };
        let mut style = Style::default().fg(Color::Black).bg(bg);
        if *selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn mount(
    page: Page,
    viewport: &ViewportSource,
    fetcher: &Arc<HttpFetcher>,
    runtime: &tokio::runtime::Handle,
    url: Option<String>,
) -> Mounted {
    let view = match page {
        Page::Dashboard => PageView::Dashboard(DashboardView::mount(viewport)),
        Page::Pie => PageView::Pie(PieView::mount(viewport)),
        Page::Area => PageView::Area(AreaView::mount(viewport)),
    };
    let mut fetch = FetchController::new(Arc::clone(fetcher), runtime.clone());
    let rx = fetch.subscribe();
    fetch.set_url(url);
    Mounted { page, view, fetch, rx }
}

/// Keep the first visible card row within range of the grid.
fn clamp_scroll(scroll: usize, cards: usize, size_class: SizeClass, height: u16) -> usize {
    let per_row = size_class.cards_per_row();
    let rows = cards.div_ceil(per_row);
    let visible = usize::from((height / CARD_HEIGHT).max(1));
    scroll.min(rows.saturating_sub(visible))
}

fn draw_cards(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    entries: &[StatEntry],
    size_class: SizeClass,
    scroll: usize,
    theme: &Theme,
) {
    let per_row = size_class.cards_per_row();
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let rows: Vec<&[StatEntry]> = entries.chunks(per_row).skip(scroll).take(visible_rows).collect();

    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows.len()])
        .split(area);

    for (row, row_rect) in rows.iter().zip(row_rects.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(*row_rect);
        for (entry, rect) in row.iter().zip(cols.iter()) {
            let card = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    entry.label.clone(),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(entry.value.to_string(), Style::default().fg(theme.text()))),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.muted())));
            frame.render_widget(card, *rect);
        }
    }
}

fn draw_bars(frame: &mut ratatui::Frame<'_>, area: Rect, series: &[ChartPoint], theme: &Theme) {
    let bars: Vec<Bar> = series
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.value.max(0.0).round() as u64)
                .text_value(format_number(p.value))
                .label(Line::from(p.name.clone()))
                .style(Style::default().fg(theme.accent))
                .value_style(Style::default().fg(Color::Black).bg(theme.accent))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title("Stats Bar Chart").borders(Borders::ALL))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_pie_with_legend(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    series: &[ChartPoint],
    palette: &[Color],
    size_class: SizeClass,
    theme: &Theme,
) {
    let legend_rows = legend_height(series.len(), area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(legend_rows)])
        .split(area);

    let pie = PieChart {
        points: series,
        palette,
        radius_ratio: size_class.pie_radius_ratio(),
    };
    frame.render_widget(pie, chunks[0]);

    let shares = share_percent(series);
    let lines: Vec<Line> = series
        .iter()
        .zip(shares)
        .enumerate()
        .map(|(i, (p, share))| {
            let color = color_of(i, palette).unwrap_or(theme.text());
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(p.name.clone(), Style::default().fg(theme.text())),
                Span::styled(
                    format!("  {} ({share}%)", format_number(p.value)),
                    Style::default().fg(theme.muted()),
                ),
            ])
        })
        .collect();
    let legend = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(legend, chunks[1]);
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn pages_cycle_in_order() {
        assert_eq!(Page::Dashboard.next(), Page::Pie);
        assert_eq!(Page::Pie.next(), Page::Area);
        assert_eq!(Page::Area.next(), Page::Dashboard);
    }

    #[test]
    fn card_scroll_stops_at_last_page() {
        // 10 cards, 4 per row -> 3 rows; 8 lines of height shows 2 rows.
        assert_eq!(clamp_scroll(5, 10, SizeClass::Wide, 8), 1);
        assert_eq!(clamp_scroll(0, 10, SizeClass::Wide, 8), 0);
        // Everything fits: no scrolling.
        assert_eq!(clamp_scroll(3, 3, SizeClass::Compact, 40), 0);
    }

    #[test]
    fn legend_height_saturates() {
        assert_eq!(legend_height(3, 40), 5);
        assert_eq!(legend_height(30, 40), 20);
        assert_eq!(legend_height(usize::from(u16::MAX) + 5, u16::MAX), u16::MAX / 2);
    }

    #[test]
    fn toggle_bar_marks_selected_option() {
        let theme = Theme::default();
        let line = toggle_bar(&[("a Cards", false), ("a Charts", true)], &theme);
        assert_eq!(line.spans[0].content, " a Cards ");
        assert_eq!(line.spans[0].style.bg, Some(theme.inactive()));
        assert_eq!(line.spans[2].style.bg, Some(theme.active()));
    }

    #[test]
    fn refresh_status_resets_once_settled() {
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
        let cli = crate::cli::Cli::parse_from([
            "statdash",
            "tui",
            "--url",
            "http://127.0.0.1:9/stats",
            "--timeout-secs",
            "2",
        ]);
        let crate::cli::Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        let fetcher = Arc::new(HttpFetcher::new(&args.source.request_options()).unwrap());
        let mut app = App::new(&runtime, fetcher, &args, 120);
        runtime.block_on(app.mounted.fetch.settled());

        assert!(!app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.status, "Refreshing...");
        assert!(app.mounted.rx.borrow().loading);

        runtime.block_on(app.mounted.fetch.settled());
        assert!(app.poll_changes());
        assert_eq!(app.status, "endpoint: http://127.0.0.1:9/stats");
        assert!(!app.refreshing);
    }
}
