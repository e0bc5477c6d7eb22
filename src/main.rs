use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod app;
mod cli;
mod config;
mod events;
mod session_store;
mod settings;
mod text_layout;
mod theme;
mod todo;
mod todo_panel;
mod tools;
mod ui;

use app::{App, Pane};
use cli::{Cli, Command};
use config::{Config, ConfigError};
use events::AppEvent;
use session_store::SessionStore;
use settings::ApiSettings;
use theme::Theme;
use todo::TodoProgress;
use ui::HitTarget;

const INPUT_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Disabled,
    Stderr,
    File(PathBuf),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = Config::load(&cli.config);
    let mut config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => Config::default(),
    };
    cli.apply_overrides(&mut config);

    let command = cli.command();
    init_logging(cli.verbose, log_target(command, &config))?;
    let config_warning = config_warning(&loaded);
    if let Some(warning) = &config_warning {
        tracing::warn!("{warning}");
    }

    match command {
        Command::Watch => run_watch(&config, config_warning),
        Command::Tools { all } => {
            println!("{}", tools_json(&config, all)?);
            Ok(())
        }
        Command::Progress => {
            println!("{}", progress_json(&config)?);
            Ok(())
        }
    }
}

fn config_warning(loaded: &Result<Option<Config>, ConfigError>) -> Option<String> {
    loaded
        .as_ref()
        .err()
        .map(|err| format!("{err}; using defaults"))
}

// The interactive view owns the terminal, so it only logs when a file is set.
fn log_target(command: Command, config: &Config) -> LogTarget {
    match (command, &config.log_file) {
        (_, Some(path)) => LogTarget::File(path.clone()),
        (Command::Watch, None) => LogTarget::Disabled,
        (_, None) => LogTarget::Stderr,
    }
}

fn init_logging(verbose: u8, target: LogTarget) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match target {
        LogTarget::Disabled => {}
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .with(filter)
            .init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}

fn tools_json(config: &Config, all: bool) -> anyhow::Result<String> {
    let tools: Vec<&tools::ToolDefinition> = if all {
        tools::all_tools().iter().collect()
    } else {
        let settings = ApiSettings::load(&config.settings_file);
        tools::active_tools(settings.as_ref())
    };
    serde_json::to_string_pretty(&tools).context("failed to serialize tool definitions")
}

fn progress_json(config: &Config) -> anyhow::Result<String> {
    let todos = session_store::read_todos_file(&config.todos_file)?;
    let report = TodoProgress::from_items(&todos).report();
    serde_json::to_string_pretty(&report).context("failed to serialize plan progress")
}

/// Builds the initial view state. Config and theme problems are shown in the
/// activity feed and on the status bar.
fn startup_app(config: &Config, config_warning: Option<String>) -> (App, Theme) {
    let mut app = App::new(config.panel);
    if let Some(warning) = config_warning {
        app.set_startup_warning(warning);
    }
    let theme = match Theme::load(&config.theme_file) {
        Ok(theme) => theme.unwrap_or_default(),
        Err(err) => {
            let warning = format!("{err}; using default colours");
            tracing::warn!("{warning}");
            app.set_startup_warning(warning);
            Theme::default()
        }
    };
    (app, theme)
}

fn run_watch(config: &Config, config_warning: Option<String>) -> anyhow::Result<()> {
    let (app, theme) = startup_app(config, config_warning);
    let mut store = SessionStore::new(&config.todos_file, &config.settings_file);
    tracing::info!(
        todos = %store.todos_file().display(),
        settings = %store.settings_file().display(),
        "starting plan view"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    let result = run_app(
        &mut terminal,
        app,
        &theme,
        &mut store,
        config.poll_interval(),
    );

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result.context("plan view failed")
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    theme: &Theme,
    store: &mut SessionStore,
    poll_interval: Duration,
) -> io::Result<()> {
    let mut last_poll: Option<Instant> = None;

    while app.running {
        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);

        if last_poll.is_none_or(|at| at.elapsed() >= poll_interval) {
            poll_store(&mut app, store);
            last_poll = Some(Instant::now());
        }
        app.clamp_plan_list_scroll(ui::plan_list_max_scroll(screen, &app));

        terminal.draw(|frame| ui::render(frame, &app, theme))?;

        let event = events::next_event(INPUT_POLL)?;
        handle_event(&mut app, store, screen, event);
    }

    Ok(())
}

fn poll_store(app: &mut App, store: &mut SessionStore) {
    if let Some(settings) = store.poll_settings() {
        app.set_settings(settings);
    }
    match store.poll_todos() {
        Some(Ok(todos)) => {
            tracing::info!(count = todos.len(), "todo list reloaded");
            app.set_todos(todos);
        }
        Some(Err(err)) => {
            tracing::warn!("{err}");
            app.set_load_error(err.to_string());
        }
        None => {}
    }
}

fn reload(app: &mut App, store: &SessionStore) {
    app.set_settings(store.read_settings());
    match store.read_todos() {
        Ok(todos) => app.set_todos(todos),
        Err(err) => {
            tracing::warn!("{err}");
            app.set_load_error(err.to_string());
        }
    }
}

fn handle_event(app: &mut App, store: &SessionStore, screen: Rect, event: AppEvent) {
    match event {
        AppEvent::Tick => app.on_tick(),
        AppEvent::Quit => app.quit(),
        AppEvent::NextPane => app.next_pane(),
        AppEvent::TogglePlan => app.toggle_plan(),
        AppEvent::Reload => reload(app, store),
        AppEvent::MoveUp => match app.active_pane {
            Pane::Session => app.scroll_plan_list_up(),
            Pane::Tools => app.scroll_tools_up(),
        },
        AppEvent::MoveDown => match app.active_pane {
            Pane::Session => {
                let max_scroll = ui::plan_list_max_scroll(screen, app);
                app.scroll_plan_list_down(max_scroll);
            }
            Pane::Tools => {
                let max_scroll = ui::tools_max_scroll(screen, app);
                app.scroll_tools_down(max_scroll);
            }
        },
        AppEvent::PageUp => app.scroll_activity_up(),
        AppEvent::PageDown => {
            let max_scroll = ui::activity_max_scroll(screen, app);
            app.scroll_activity_down(max_scroll);
        }
        AppEvent::MouseScrollUp(column, row) => {
            handle_mouse_scroll(app, screen, column, row, ScrollDirection::Up)
        }
        AppEvent::MouseScrollDown(column, row) => {
            handle_mouse_scroll(app, screen, column, row, ScrollDirection::Down)
        }
        AppEvent::MouseLeftClick(column, row) => handle_click(app, screen, column, row),
    }
}

/// Wheel input goes to the innermost scrollable region under the cursor only.
fn handle_mouse_scroll(
    app: &mut App,
    screen: Rect,
    column: u16,
    row: u16,
    direction: ScrollDirection,
) {
    match ui::hit_test(screen, app, column, row) {
        Some(HitTarget::PlanList) => match direction {
            ScrollDirection::Up => app.scroll_plan_list_up(),
            ScrollDirection::Down => {
                let max_scroll = ui::plan_list_max_scroll(screen, app);
                app.scroll_plan_list_down(max_scroll);
            }
        },
        Some(HitTarget::PlanHeader | HitTarget::PlanBody | HitTarget::Activity) => {
            match direction {
                ScrollDirection::Up => app.scroll_activity_up(),
                ScrollDirection::Down => {
                    let max_scroll = ui::activity_max_scroll(screen, app);
                    app.scroll_activity_down(max_scroll);
                }
            }
        }
        Some(HitTarget::Tools) => match direction {
            ScrollDirection::Up => app.scroll_tools_up(),
            ScrollDirection::Down => {
                let max_scroll = ui::tools_max_scroll(screen, app);
                app.scroll_tools_down(max_scroll);
            }
        },
        None => {}
    }
}

fn handle_click(app: &mut App, screen: Rect, column: u16, row: u16) {
    match ui::hit_test(screen, app, column, row) {
        Some(HitTarget::PlanHeader) => {
            app.active_pane = Pane::Session;
            app.toggle_plan();
        }
        Some(HitTarget::PlanList | HitTarget::PlanBody | HitTarget::Activity) => {
            app.active_pane = Pane::Session;
        }
        Some(HitTarget::Tools) => app.active_pane = Pane::Tools,
        None => {}
    }
}

#[cfg(test)]
#[path = "../tests/unit/main_tests.rs"]
mod main_tests;
