use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Sparkline};

use spotstats_terminal::config::{self, AppConfig};
use spotstats_terminal::presentation::{display_or_na, format_confidence};
use spotstats_terminal::state::{
    self, AppState, ProviderCommand, ScoredPlayer, Screen, Selection, StatKind, Tier,
    apply_delta, screen_label, stat_label, tier_filter_label, tier_label,
};
use spotstats_terminal::{feed, http_client, logging, trend};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    refresh_interval: Duration,
    last_refresh: Instant,
}

impl App {
    fn new(config: &AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(config.schedule_date),
            should_quit: false,
            cmd_tx,
            refresh_interval: config.refresh_interval,
            last_refresh: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Games,
            KeyCode::Char('2') => self.state.screen = Screen::Teams,
            KeyCode::Enter => match self.state.screen {
                Screen::Games => self.state.select_current_game(),
                Screen::Teams => self.state.select_current_team(),
                Screen::Players => self.state.open_player_detail(),
                Screen::PlayerDetail => {}
            },
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('[') if self.state.screen == Screen::Games => self.state.shift_date(-1),
            KeyCode::Char(']') if self.state.screen == Screen::Games => self.state.shift_date(1),
            KeyCode::Char('f') if self.state.screen == Screen::Players => {
                self.state.cycle_tier_filter();
            }
            KeyCode::Char('/') if self.state.screen == Screen::Players => {
                self.state.search_active = true;
            }
            KeyCode::Char('r') => self.request_refresh(true),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.search_active = false,
            KeyCode::Esc => {
                self.state.search.clear();
                self.state.search_active = false;
            }
            KeyCode::Backspace => {
                self.state.search.pop();
            }
            KeyCode::Char(c) => self.state.search.push(c),
            _ => {}
        }
        self.state.players_selected = 0;
    }

    fn request_refresh(&mut self, announce: bool) {
        self.last_refresh = Instant::now();
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log("[INFO] Refresh unavailable");
            }
            return;
        };
        let generation = self.state.begin_refresh();
        if tx.send(ProviderCommand::Refresh { generation }).is_err() {
            self.state.pending_generation = None;
            self.state.push_log("[WARN] Refresh request failed: provider stopped");
        } else if announce {
            self.state
                .push_log(format!("[INFO] Refresh #{generation} requested"));
        }
    }

    fn maybe_refresh(&mut self) {
        if self.last_refresh.elapsed() >= self.refresh_interval {
            self.request_refresh(false);
        }
    }
}

fn main() -> io::Result<()> {
    config::load_dotenv();
    let config = AppConfig::from_env();
    let _log_guard = logging::init_file(&config.log_dir);
    http_client::configure_timeout(config.http_timeout);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(config.source.clone(), tx, cmd_rx);

    let mut app = App::new(&config, Some(cmd_tx));
    app.state.push_log(format!(
        "[INFO] Source {} | refresh every {}s",
        config.source.describe(),
        config.refresh_interval.as_secs()
    ));
    app.request_refresh(false);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Games => render_games(frame, chunks[1], &app.state),
        Screen::Teams => render_teams(frame, chunks[1], &app.state),
        Screen::Players => render_players(frame, chunks[1], &app.state),
        Screen::PlayerDetail => render_player_detail(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Games => format!("SPOTSTATS | GAMES | {}", state.schedule_date),
        Screen::Teams => "SPOTSTATS | TEAMS".to_string(),
        Screen::Players | Screen::PlayerDetail => {
            let label = state
                .selection
                .as_ref()
                .map(Selection::label)
                .unwrap_or_else(|| "no selection".to_string());
            format!(
                "SPOTSTATS | {} | {label} | Tier: {}",
                screen_label(state.screen),
                tier_filter_label(state.tier_filter)
            )
        }
    };
    let data = match &state.dataset {
        Some(dataset) => format!(
            "Data #{} loaded {}",
            dataset.generation,
            dataset.loaded_at.format("%H:%M:%S UTC")
        ),
        None => "No data yet".to_string(),
    };
    let mut status = data;
    if state.is_loading() {
        status.push_str(" | loading…");
    }
    if let Some(err) = &state.last_error {
        status.push_str(&format!(" | last refresh failed: {err}"));
    }
    let line1 = format!("  .-.  {title}");
    let line2 = format!(" ( + ) {status}");
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return format!("Search: {}▏ | Enter Keep | Esc Clear", state.search);
    }
    match state.screen {
        Screen::Games => {
            "1 Games | 2 Teams | Enter Players | j/k Move | [/] Date | r Refresh | ? Help | q Quit"
                .to_string()
        }
        Screen::Teams => {
            "1 Games | 2 Teams | Enter Players | j/k Move | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Players => {
            "Enter Detail | b/Esc Back | j/k Move | f Tier | / Search | r Refresh | ? Help | q Quit"
                .to_string()
        }
        Screen::PlayerDetail => "b/Esc Back | r Refresh | ? Help | q Quit".to_string(),
    }
}

fn render_games(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = games_columns();
    render_header_row(
        frame,
        sections[0],
        &widths,
        &["Time", "Matchup", "Status", "Score", "Records"],
    );

    let games = state.games_for_date();
    if games.is_empty() {
        let msg = if state.dataset.is_some() {
            format!("No games on {}", state.schedule_date)
        } else {
            "Waiting for first load".to_string()
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    }

    let list_area = sections[1];
    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.games_selected, games.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let game = &games[idx];
        let row_area = row_rect(list_area, i);
        let row_style = row_style(idx == state.games_selected);
        if idx == state.games_selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let matchup = format!("{} @ {}", game.away_team, game.home_team);
        let score = match (game.away_score, game.home_score) {
            (Some(away), Some(home)) => format!("{away}-{home}"),
            _ => "-".to_string(),
        };
        let records = state
            .dataset
            .as_ref()
            .map(|ds| {
                format!(
                    "{} / {}",
                    ds.team_record(&game.away_team).unwrap_or("N/A"),
                    ds.team_record(&game.home_team).unwrap_or("N/A")
                )
            })
            .unwrap_or_default();

        render_cell_text(frame, cols[0], &game.time, row_style);
        render_cell_text(frame, cols[1], &matchup, row_style);
        render_cell_text(
            frame,
            cols[2],
            game.status.as_deref().unwrap_or("Scheduled"),
            row_style,
        );
        render_cell_text(frame, cols[3], &score, row_style);
        render_cell_text(frame, cols[4], &records, row_style);
    }
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = teams_columns();
    render_header_row(
        frame,
        sections[0],
        &widths,
        &["Team", "Record", "Roster", "Next game"],
    );

    let Some(dataset) = state.dataset.as_ref() else {
        let empty = Paragraph::new("Waiting for first load")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    };
    let teams = dataset.team_codes();
    let list_area = sections[1];
    let (start, end) = visible_range(state.teams_selected, teams.len(), list_area.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let team = teams[idx];
        let row_area = row_rect(list_area, i);
        let row_style = row_style(idx == state.teams_selected);
        if idx == state.teams_selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let next_game = dataset
            .schedule
            .range(state.schedule_date..)
            .find_map(|(date, games)| {
                games.iter().find(|g| g.involves(team)).map(|g| {
                    let opp = if g.home_team == team {
                        format!("vs {}", g.away_team)
                    } else {
                        format!("@ {}", g.home_team)
                    };
                    format!("{date} {opp}")
                })
            })
            .unwrap_or_else(|| "-".to_string());

        render_cell_text(frame, cols[0], team, row_style);
        render_cell_text(
            frame,
            cols[1],
            dataset.team_record(team).unwrap_or("N/A"),
            row_style,
        );
        render_cell_text(
            frame,
            cols[2],
            &dataset.roster(team).len().to_string(),
            row_style,
        );
        render_cell_text(frame, cols[3], &next_game, row_style);
    }
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = players_columns();
    render_header_row(
        frame,
        sections[0],
        &widths,
        &["Player", "Team", "Opp", "Conf", "Tier", "PTS", "REB", "AST"],
    );

    let players = state.visible_players();
    if players.is_empty() {
        let msg = if state.selection.is_none() {
            "Pick a game or team first"
        } else {
            "No players match the current filter"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    }

    let list_area = sections[1];
    let (start, end) =
        visible_range(state.players_selected, players.len(), list_area.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let player = players[idx];
        let record = &player.record;
        let row_area = row_rect(list_area, i);
        let selected = idx == state.players_selected;
        let row_style = row_style(selected);
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        render_cell_text(frame, cols[0], &record.name, row_style);
        render_cell_text(frame, cols[1], record.team.as_deref().unwrap_or("-"), row_style);
        render_cell_text(frame, cols[2], record.opponent.as_deref().unwrap_or("-"), row_style);
        render_cell_text(frame, cols[3], &format_confidence(player.confidence), row_style);
        render_cell_text(
            frame,
            cols[4],
            tier_label(player.tier),
            row_style.fg(tier_color(player.tier)),
        );
        for (col, stat) in cols[5..8].iter().zip(StatKind::ALL) {
            render_cell_text(frame, *col, &trend_cell(player, stat), row_style);
        }
    }
}

fn trend_cell(player: &ScoredPlayer, stat: StatKind) -> String {
    let bundle = trend::aggregate_trend(&player.record, stat);
    format!(
        "{} {:>4.1} {}",
        trend::fill_bar(bundle.fill_ratio, 6),
        bundle.recent_value,
        trend::direction_symbol(bundle.direction)
    )
}

fn render_player_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(player) = state.detail_scored() else {
        let empty = Paragraph::new("Player no longer in the current selection")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(7)])
        .split(columns[0]);

    let profile = Paragraph::new(profile_text(player))
        .block(Block::default().title(player.record.name.as_str()).borders(Borders::ALL));
    frame.render_widget(profile, left[0]);

    let factors = Paragraph::new(factors_text(player))
        .block(Block::default().title("Confidence").borders(Borders::ALL));
    frame.render_widget(factors, left[1]);

    let stat_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(columns[1]);
    for (row, stat) in stat_rows.iter().zip(StatKind::ALL) {
        render_stat_panel(frame, *row, player, stat);
    }
}

fn render_stat_panel(frame: &mut Frame, area: Rect, player: &ScoredPlayer, stat: StatKind) {
    let block = Block::default()
        .title(stat_label(stat))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(14)])
        .split(inner);

    let bundle = trend::aggregate_trend(&player.record, stat);
    let rollup = trend::rollup(&player.record, stat);
    let bar_width = cols[0].width.saturating_sub(12).max(4) as usize;
    let text = format!(
        "{} {:.0}%\nL5  {:>5.1} {}\nL10 {:>5.1} {}\nSzn {:>5.1}",
        trend::fill_bar(bundle.fill_ratio, bar_width),
        bundle.fill_ratio * 100.0,
        rollup.last5,
        trend::direction_symbol(rollup.last5_direction),
        rollup.last10,
        trend::direction_symbol(rollup.last10_direction),
        rollup.season,
    );
    frame.render_widget(Paragraph::new(text), cols[0]);

    let points = trend::sparkline_points(&rollup);
    let spark = Sparkline::default()
        .block(Block::default().title("Szn→L5"))
        .data(&points)
        .max(100)
        .style(Style::default().fg(direction_color(bundle.direction)));
    frame.render_widget(spark, cols[1]);
}

fn profile_text(player: &ScoredPlayer) -> String {
    let r = &player.record;
    let pct = |v: Option<f64>| v.map(|p| format!("{:.1}%", p * 100.0));
    [
        format!("Team      {}", display_or_na(r.team.as_deref())),
        format!("Record    {}", display_or_na(r.team_record.as_deref())),
        format!("Opponent  {}", display_or_na(r.opponent.as_deref())),
        format!("Opp rec   {}", display_or_na(r.opp_record.as_deref())),
        format!("Opp strk  {}", display_or_na(r.opp_streak.as_deref())),
        format!("Opp DEF   {}", display_or_na(r.def_rank.map(|d| format!("#{d}")))),
        format!("Pace      {}", display_or_na(r.pace.map(|p| format!("{p:.1}")))),
        format!("Usage     {:.1}%", r.usage_pct),
        format!("Minutes   {:.1} ({} gp)", r.minutes, r.games_played),
        format!(
            "STL/BLK/TO {:.1}/{:.1}/{:.1}",
            r.secondary.stl, r.secondary.blk, r.secondary.tov
        ),
        format!(
            "FG/3P/FT  {}/{}/{}",
            display_or_na(pct(r.secondary.fg_pct)),
            display_or_na(pct(r.secondary.fg3_pct)),
            display_or_na(pct(r.secondary.ft_pct))
        ),
        format!(
            "Consist.  {}",
            StatKind::ALL
                .iter()
                .map(|stat| format!(
                    "{} {}",
                    stat_label(*stat),
                    display_or_na(r.consistency.get(*stat).map(|c| format!("{:.0}%", c * 100.0)))
                ))
                .collect::<Vec<_>>()
                .join(" ")
        ),
    ]
    .join("\n")
}

fn factors_text(player: &ScoredPlayer) -> String {
    let mut lines = vec![format!(
        "{} {}",
        format_confidence(player.confidence),
        tier_label(player.tier)
    )];
    if player.factors.is_empty() {
        lines.push("No adjustments (base 50%)".to_string());
    }
    for factor in &player.factors {
        lines.push(format!("{:+.0} {}", factor.delta * 100.0, factor.label));
    }
    lines.join("\n")
}

fn games_columns() -> [Constraint; 5] {
    [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Min(10),
    ]
}

fn teams_columns() -> [Constraint; 4] {
    [
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Min(10),
    ]
}

fn players_columns() -> [Constraint; 8] {
    [
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(15),
        Constraint::Length(15),
        Constraint::Length(15),
    ]
}

fn render_header_row(frame: &mut Frame, area: Rect, widths: &[Constraint], labels: &[&str]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.to_vec())
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (col, label) in cols.iter().zip(labels) {
        render_cell_text(frame, *col, label, style);
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn row_rect(list_area: Rect, offset: usize) -> Rect {
    Rect {
        x: list_area.x,
        y: list_area.y + offset as u16,
        width: list_area.width,
        height: 1,
    }
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Green => Color::Green,
        Tier::Yellow => Color::Yellow,
        Tier::Red => Color::Red,
    }
}

fn direction_color(direction: state::TrendDirection) -> Color {
    match direction {
        state::TrendDirection::Up => Color::Green,
        state::TrendDirection::Down => Color::Red,
        state::TrendDirection::Flat => Color::Gray,
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SpotStats - Help",
        "",
        "Global:",
        "  1            Games",
        "  2            Teams",
        "  Enter        Select / open",
        "  b / Esc      Back",
        "  r            Refresh now",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  [ / ]        Previous / next day (Games)",
        "",
        "Players:",
        "  f            Cycle tier filter",
        "  /            Search by name",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
