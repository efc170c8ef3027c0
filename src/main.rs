//! GrabTUI - terminal client for a media indexer / download manager
//!
//! Search for movies and TV shows, review ranked torrent resources, and
//! queue downloads on the backend. Run without arguments for the TUI;
//! every action is also available as a CLI subcommand.

// Some list/state helpers are only exercised through the library tests
#![allow(dead_code)]

mod api;
mod app;
mod cli;
mod commands;
mod config;
mod models;
mod rank;
mod ui;

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use api::{ApiClient, ApiError};
use app::{App, AppAction, AppState, DownloadsPanel, InputMode, LoadingState, LoginField};
use cli::{Cli, Command, ExitCode, Output};
use config::Config;
use ui::Theme;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        let code = run_cli(cli).await;
        std::process::exit(code.into());
    }

    run_tui(cli).await
}

// =============================================================================
// CLI Mode
// =============================================================================

async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let server = cli.server.as_deref();

    match cli.command {
        Some(Command::Login(cmd)) => commands::login_cmd(cmd, server, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, server, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, server, &output).await,
        Some(Command::Resources(cmd)) => commands::resources_cmd(cmd, server, &output).await,
        Some(Command::Recommend(cmd)) => commands::recommend_cmd(cmd, server, &output).await,
        Some(Command::Download(cmd)) => commands::download_cmd(cmd, server, &output).await,
        Some(Command::Downloads(cmd)) => commands::downloads_cmd(cmd, server, &output).await,
        Some(Command::History(cmd)) => commands::history_cmd(cmd, server, &output).await,
        Some(Command::Resume(cmd)) => commands::resume_cmd(cmd, server, &output).await,
        Some(Command::Pause(cmd)) => commands::pause_cmd(cmd, server, &output).await,
        Some(Command::Remove(cmd)) => commands::remove_cmd(cmd, server, &output).await,
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

async fn run_tui(cli: Cli) -> Result<()> {
    let mut config = Config::load();
    if let Some(url) = &cli.server {
        config.set_server_url(url);
    }
    let mut client = ApiClient::new(&config);
    let mut app = App::new(config);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &mut client).await;
    restore_terminal(&mut terminal)?;

    result
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// =============================================================================
// Event Loop
// =============================================================================

const TICK_RATE: Duration = Duration::from_millis(100);

async fn run_event_loop(terminal: &mut Tui, app: &mut App, client: &mut ApiClient) -> Result<()> {
    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if let Some(action) = app.take_action() {
            run_action(app, client, action).await;
        }

        // Poll the active queue while the Downloads view has live tasks
        let now = Instant::now();
        let interval = Duration::from_secs(app.config.poll_interval_secs);
        if app.downloads.should_poll(now, interval) {
            app.downloads.mark_polled(now);
            match client.active_downloads().await {
                Ok(tasks) => app.downloads.set_active(tasks),
                Err(e) => fail(app, client, &e),
            }
        }
    }

    Ok(())
}

/// Route a backend failure: expired sessions force the login view,
/// everything else surfaces in the error popup
fn fail(app: &mut App, client: &mut ApiClient, err: &ApiError) {
    if err.is_auth_error() {
        client.set_token(None);
        app.handle_auth_expired();
    } else {
        app.set_error(err.to_string());
    }
}

/// Execute a deferred action queued by key handling
async fn run_action(app: &mut App, client: &mut ApiClient, action: AppAction) {
    match action {
        AppAction::Login { username, password } => {
            match client.login(&username, &password).await {
                Ok(token) => {
                    client.set_token(Some(token.clone()));
                    app.handle_login_success(token);
                }
                Err(e) => {
                    app.login.loading = LoadingState::Error(format!("Login failed: {}", e));
                }
            }
        }

        AppAction::Search(keyword) => match client.search(&keyword).await {
            Ok(results) => {
                app.navigate(AppState::Search);
                app.input_mode = InputMode::Normal;
                app.search.set_results(results);
            }
            Err(e) => {
                app.search.loading = LoadingState::Idle;
                fail(app, client, &e);
            }
        },

        AppAction::LoadDetail { tmdbid, media_type } => {
            match client.media_detail(tmdbid, &media_type).await {
                Ok(detail) => app.detail.set_detail(detail),
                Err(e) => {
                    app.detail.loading = LoadingState::Error(format!("Detail fetch failed: {}", e));
                    if e.is_auth_error() {
                        fail(app, client, &e);
                    }
                }
            }
        }

        AppAction::LoadResources(keyword) => {
            let result = async {
                client.search_torrents(&keyword).await?;
                client.torrent_results().await
            }
            .await;
            match result {
                Ok(payload) => app.resources.set_resources(rank::process_resources(&payload)),
                Err(e) => {
                    app.resources.loading =
                        LoadingState::Error(format!("Resource search failed: {}", e));
                    if e.is_auth_error() {
                        fail(app, client, &e);
                    }
                }
            }
        }

        AppAction::QueueDownload(id) => match client.download_torrent(id).await {
            Ok(()) => {
                app.downloads.opened = true;
                app.downloads.loading = LoadingState::Loading(Some("Fetching downloads...".into()));
                app.navigate(AppState::Downloads);
                run_refresh(app, client).await;
            }
            Err(e) => fail(app, client, &e),
        },

        AppAction::PauseDownload(id) => match client.stop_download(&id).await {
            Ok(()) => app.downloads.commit_optimistic(),
            Err(e) => {
                app.downloads.revert_optimistic();
                fail(app, client, &e);
            }
        },

        AppAction::ResumeDownload(id) => match client.start_download(&id).await {
            Ok(()) => app.downloads.commit_optimistic(),
            Err(e) => {
                app.downloads.revert_optimistic();
                fail(app, client, &e);
            }
        },

        AppAction::RemoveDownload(id) => match client.remove_download(&id).await {
            Ok(()) => run_refresh(app, client).await,
            Err(e) => fail(app, client, &e),
        },

        AppAction::RefreshDownloads => run_refresh(app, client).await,

        AppAction::LoadHistory(page) => match client.download_history(page).await {
            Ok(items) => app.downloads.set_history(items),
            Err(e) => fail(app, client, &e),
        },
    }
}

/// Refresh both Downloads panels with fresh snapshots
async fn run_refresh(app: &mut App, client: &mut ApiClient) {
    match client.active_downloads().await {
        Ok(tasks) => {
            app.downloads.set_active(tasks);
            app.downloads.mark_polled(Instant::now());
        }
        Err(e) => {
            app.downloads.loading = LoadingState::Idle;
            fail(app, client, &e);
            return;
        }
    }
    match client.download_history(1).await {
        Ok(items) => app.downloads.set_history(items),
        Err(e) => fail(app, client, &e),
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill background
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with search box
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    match app.state {
        AppState::Home => render_home(frame, chunks[1]),
        AppState::Login => render_login(frame, app, chunks[1]),
        AppState::Search => render_search_results(frame, app, chunks[1]),
        AppState::Detail => render_detail(frame, app, chunks[1]),
        AppState::Resources => render_resources(frame, app, chunks[1]),
        AppState::Downloads => render_downloads(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if let Some(error) = &app.error {
        render_error_popup(frame, error, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(20)])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("GRAB", Theme::title()),
        Span::styled("TUI", Theme::accent()),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
    .alignment(Alignment::Center);
    frame.render_widget(logo, chunks[0]);

    let editing = app.input_mode == InputMode::Editing && app.state != AppState::Login;
    let border = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let query = if editing {
        // Block cursor at the insert position
        let (before, after) = app.search.query.split_at(app.search.cursor);
        let cursor_char = after.chars().next().unwrap_or(' ');
        let rest: String = after.chars().skip(1).collect();
        Line::from(vec![
            Span::styled(before.to_string(), Theme::input()),
            Span::styled(
                cursor_char.to_string(),
                Theme::input().add_modifier(ratatui::style::Modifier::REVERSED),
            ),
            Span::styled(rest, Theme::input()),
        ])
    } else if app.search.query.is_empty() {
        Line::from(Span::styled("Press / to search...", Theme::dimmed()))
    } else {
        Line::from(Span::styled(app.search.query.clone(), Theme::text()))
    };

    let search_box = Paragraph::new(query).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Search ", Theme::title())),
    );
    frame.render_widget(search_box, chunks[1]);
}

fn render_home(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Search for movies and TV shows, pick a release, download it.",
            Theme::text(),
        )),
        Line::from(""),
        keybind_line("/", "search"),
        keybind_line("d", "downloads"),
        keybind_line("q", "quit"),
    ];

    let home = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Home ", Theme::title())),
        )
        .alignment(Alignment::Center);
    frame.render_widget(home, area);
}

fn keybind_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{}] ", key), Theme::keybind()),
        Span::styled(desc.to_string(), Theme::keybind_desc()),
    ])
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = centered_rect(50, 40, area);

    let field = |label: &str, value: String, focused: bool| -> Line<'static> {
        let marker = if focused { "> " } else { "  " };
        let style = if focused { Theme::input() } else { Theme::text() };
        Line::from(vec![
            Span::styled(format!("{}{:<10}", marker, label), Theme::dimmed()),
            Span::styled(value, style),
        ])
    };

    let masked = "*".repeat(app.login.password.chars().count());
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Server: {}", app.config.server_url),
            Theme::dimmed(),
        )),
        Line::from(""),
        field(
            "Username",
            app.login.username.clone(),
            app.login.focus == LoginField::Username,
        ),
        field("Password", masked, app.login.focus == LoginField::Password),
        Line::from(""),
    ];

    match &app.login.loading {
        LoadingState::Loading(msg) => {
            lines.push(Line::from(Span::styled(
                msg.clone().unwrap_or_else(|| "Logging in...".into()),
                Theme::loading(),
            )));
        }
        LoadingState::Error(msg) => {
            lines.push(Line::from(Span::styled(msg.clone(), Theme::error())));
        }
        LoadingState::Idle => {
            lines.push(Line::from(vec![
                Span::styled("[Tab] ", Theme::keybind()),
                Span::styled("switch field  ", Theme::keybind_desc()),
                Span::styled("[Enter] ", Theme::keybind()),
                Span::styled("submit  ", Theme::keybind_desc()),
                Span::styled("[Esc] ", Theme::keybind()),
                Span::styled("quit", Theme::keybind_desc()),
            ]));
        }
    }

    let login = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(" Login ", Theme::title())),
    );
    frame.render_widget(login, form);
}

fn render_search_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" Results ({}) ", app.search.results.len()),
            Theme::title(),
        ));

    if app.search.loading.is_loading() {
        let msg = app.search.loading.message().unwrap_or("Searching...");
        frame.render_widget(
            Paragraph::new(Span::styled(msg.to_string(), Theme::loading()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    if app.search.results.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No results", Theme::dimmed()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(app.search.list.selected, app.search.list.offset, visible);

    let lines: Vec<Line> = app
        .search
        .results
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, item)| {
            let selected = i == app.search.list.selected;
            let style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", item), style),
                Span::styled(format!("★ {:.1}", item.vote), Theme::dimmed()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let detail = &app.detail.detail;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(" Details ", Theme::title()));

    if app.detail.loading.is_loading() {
        let msg = app.detail.loading.message().unwrap_or("Loading...");
        frame.render_widget(
            Paragraph::new(Span::styled(msg.to_string(), Theme::loading()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(detail.to_string(), Theme::title())),
        Line::from(""),
    ];
    if let LoadingState::Error(msg) = &app.detail.loading {
        lines.push(Line::from(Span::styled(msg.clone(), Theme::error())));
        lines.push(Line::from(""));
    }
    if !detail.genres.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Genres:  ", Theme::dimmed()),
            Span::styled(detail.genres.clone(), Theme::text()),
        ]));
    }
    if !detail.runtime.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Runtime: ", Theme::dimmed()),
            Span::styled(detail.runtime.clone(), Theme::text()),
        ]));
    }
    if !detail.overview.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(detail.overview.clone(), Theme::text())));
    }
    lines.push(Line::from(""));
    lines.push(keybind_line("Enter/r", "torrent resources"));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_resources(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.resources;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" Resources: {} ({}) ", state.keyword, state.items.len()),
            Theme::title(),
        ));

    if state.loading.is_loading() {
        let msg = state.loading.message().unwrap_or("Searching resources...");
        frame.render_widget(
            Paragraph::new(Span::styled(msg.to_string(), Theme::loading()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    if let LoadingState::Error(msg) = &state.loading {
        frame.render_widget(
            Paragraph::new(Span::styled(msg.clone(), Theme::error()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    if !state.has_resources {
        frame.render_widget(
            Paragraph::new(Span::styled("No resources found", Theme::dimmed()))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if !state.has_seeders {
        lines.push(Line::from(Span::styled(
            " No seeded releases, listing dead torrents ",
            Theme::warning(),
        )));
    }

    let visible = (area.height.saturating_sub(2) as usize).saturating_sub(lines.len());
    let offset = scroll_offset(state.list.selected, state.list.offset, visible);

    for (i, resource) in state.items.iter().enumerate().skip(offset).take(visible) {
        let selected = i == state.list.selected;
        let recommended = state.is_recommended(i);

        let marker = if recommended { "★ " } else { "  " };
        let name_style = if selected {
            Theme::list_item_selected()
        } else if recommended {
            Theme::recommended()
        } else {
            Theme::list_item()
        };

        let mut spans = vec![
            Span::styled(marker.to_string(), Theme::recommended()),
            Span::styled(
                format!("[{:>5}] ", resource.resolution().to_string()),
                Theme::resolution(resource.resolution()),
            ),
            Span::styled(format!("{} ", resource.torrent_name), name_style),
            Span::styled(format!("{} ", resource.size), Theme::file_size()),
            Span::styled(format!("⇡{} ", resource.seeders), Theme::seeders(resource.seeders)),
        ];
        if resource.has_release_group() {
            spans.push(Span::styled(
                format!("{} ", resource.releasegroup),
                Theme::release_group(),
            ));
        }
        spans.push(Span::styled(format!("@{}", resource.site), Theme::dimmed()));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_downloads(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.downloads;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    // Active queue panel
    let queue_focused = state.panel == DownloadsPanel::Queue;
    let queue_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if queue_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(
            format!(" Queue ({}) ", state.tasks.len()),
            Theme::title(),
        ));

    if state.loading.is_loading() {
        let msg = state.loading.message().unwrap_or("Fetching downloads...");
        frame.render_widget(
            Paragraph::new(Span::styled(msg.to_string(), Theme::loading()))
                .block(queue_block)
                .alignment(Alignment::Center),
            chunks[0],
        );
    } else if state.tasks.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("Download queue is empty", Theme::dimmed()))
                .block(queue_block)
                .alignment(Alignment::Center),
            chunks[0],
        );
    } else {
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let offset = scroll_offset(state.queue_list.selected, state.queue_list.offset, visible);

        let lines: Vec<Line> = state
            .tasks
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, task)| {
                let selected = queue_focused && i == state.queue_list.selected;
                let name_style = if selected {
                    Theme::list_item_selected()
                } else {
                    Theme::list_item()
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {:<12}", task.status.to_string()),
                        Theme::download_status(task.status),
                    ),
                    Span::styled(format!("{} ", task.name), name_style),
                    Span::styled(progress_gauge(task.progress), Theme::progress_bar()),
                    Span::styled(format!(" {:>5.1}% ", task.progress), Theme::text()),
                    Span::styled(task.speed.clone(), Theme::dimmed()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(queue_block), chunks[0]);
    }

    // History panel
    let history_focused = state.panel == DownloadsPanel::History;
    let history_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if history_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(
            format!(" History ({}) ", state.history.len()),
            Theme::title(),
        ));

    if state.history.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No download history", Theme::dimmed()))
                .block(history_block)
                .alignment(Alignment::Center),
            chunks[1],
        );
    } else {
        let visible = chunks[1].height.saturating_sub(2) as usize;
        let offset = scroll_offset(state.history_list.selected, state.history_list.offset, visible);

        let lines: Vec<Line> = state
            .history
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, item)| {
                let selected = history_focused && i == state.history_list.selected;
                let style = if selected {
                    Theme::list_item_selected()
                } else {
                    Theme::list_item()
                };
                Line::from(Span::styled(format!(" {}", item), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(history_block), chunks[1]);
    }
}

/// Tiny inline progress gauge, ten cells wide
fn progress_gauge(progress: f64) -> String {
    let filled = ((progress / 10.0).round() as usize).min(10);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(10 - filled))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match (&app.state, &app.input_mode) {
        (AppState::Login, _) => "Tab switch field | Enter submit | Esc quit",
        (_, InputMode::Editing) => "Enter search | Esc cancel",
        (AppState::Home, _) => "/ search | d downloads | q quit",
        (AppState::Search, _) => "j/k move | Enter details | r resources | D downloads | q quit",
        (AppState::Detail, _) => "Enter resources | Esc back | q quit",
        (AppState::Resources, _) => "j/k move | Enter download | Esc back | q quit",
        (AppState::Downloads, _) => {
            "Tab panel | p pause | r resume | x remove | R refresh | Esc back"
        }
    };

    let status = Line::from(vec![
        Span::styled(format!(" {} ", state_label(&app.state)), Theme::accent()),
        Span::styled(format!("| {} ", hints), Theme::status_bar()),
        Span::styled(format!("| {}", app.config.server_url), Theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(status).style(Theme::status_bar()), area);
}

fn state_label(state: &AppState) -> &'static str {
    match state {
        AppState::Home => "HOME",
        AppState::Login => "LOGIN",
        AppState::Search => "SEARCH",
        AppState::Detail => "DETAIL",
        AppState::Resources => "RESOURCES",
        AppState::Downloads => "DOWNLOADS",
    }
}

fn render_error_popup(frame: &mut Frame, error: &str, area: Rect) {
    let popup = centered_rect(60, 20, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::error())
        .title(Span::styled(" Error ", Theme::error()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(error.to_string(), Theme::text())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss", Theme::dimmed())),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(text, popup);
}

/// Clamp the viewport so the selected row stays visible
fn scroll_offset(selected: usize, offset: usize, visible: usize) -> usize {
    if visible == 0 {
        return offset;
    }
    if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected - visible + 1
    } else {
        offset
    }
}

/// Centered rect helper for popups (percent of the parent area)
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
