use super::*;
use crate::settings::ApiSettings;
use crate::todo::{TodoItem, TodoStatus};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 30;

fn screen() -> Rect {
    Rect::new(0, 0, WIDTH, HEIGHT)
}

fn render_text(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
    let theme = Theme::default();
    terminal
        .draw(|frame| render(frame, app, &theme))
        .expect("render should succeed");
    buffer_to_string(terminal.backend().buffer())
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn seeded_app(items: usize) -> App {
    let mut app = App::default();
    let mut todos = vec![
        TodoItem::new("1", "Survey the module layout", TodoStatus::Completed),
        TodoItem::new("2", "Port the resolver", TodoStatus::InProgress),
    ];
    for idx in 2..items {
        todos.push(TodoItem::new(
            idx.to_string(),
            format!("Follow-up {idx}"),
            TodoStatus::Pending,
        ));
    }
    app.set_todos(todos);
    app
}

#[test]
fn render_shows_both_panes_and_help_text() {
    let app = App::default();
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(text.contains("Agent Session"));
    assert!(text.contains("Active Tools"));
    assert!(text.contains("Wheel scrolls pane under cursor"));
}

#[test]
fn empty_plan_draws_no_panel() {
    let app = App::default();
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(!text.contains("Task Plan"));
    assert!(text.contains("Waiting for the agent to publish a plan."));
    assert!(plan_layout(screen(), &app).is_none());
}

#[test]
fn render_shows_plan_panel_above_activity() {
    let app = seeded_app(3);
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(text.contains("Task Plan 1/3"));
    assert!(text.contains("Port the resolver"));
    let panel_row = text
        .lines()
        .position(|line| line.contains("Task Plan"))
        .expect("panel header row");
    let activity_row = text
        .lines()
        .position(|line| line.contains("Plan updated"))
        .expect("activity row");
    assert!(panel_row < activity_row);
}

#[test]
fn tools_pane_follows_settings() {
    let mut app = App::default();
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(text.contains("• run_command"));
    assert!(!text.contains("• manage_memory"));
    assert!(text.contains("Memory: off"));

    app.set_settings(Some(ApiSettings {
        enable_memory: true,
        enable_zai_reader: true,
    }));
    let text = render_text(&app, WIDTH, 60);
    assert!(text.contains("Memory: on"));
    assert!(text.contains("Page reader: on"));
    assert!(text.contains("• manage_memory"));
    assert!(text.contains("• read_page"));
}

#[test]
fn status_help_names_the_next_toggle() {
    let mut app = seeded_app(3);
    assert!(render_text(&app, WIDTH, HEIGHT).contains("Enter/click header collapse plan"));
    app.toggle_plan();
    assert!(render_text(&app, WIDTH, HEIGHT).contains("Enter/click header expand plan"));
    assert!(!render_text(&App::default(), WIDTH, HEIGHT).contains("Enter/click header"));
}

#[test]
fn status_bar_shows_load_error() {
    let mut app = seeded_app(3);
    app.set_load_error("failed to parse todos.json");
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(text.contains("Error: failed to parse todos.json"));
    assert!(text.contains("Port the resolver"));
}

#[test]
fn status_bar_shows_startup_warning_until_a_load_error() {
    let status_row = |text: &str| {
        text.lines()
            .nth(usize::from(HEIGHT - 2))
            .expect("status row")
            .to_string()
    };
    let mut app = seeded_app(3);
    app.set_startup_warning("failed to parse config file planboard.toml");
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(status_row(&text).contains("Warning: failed to parse config file planboard.toml"));

    app.set_load_error("failed to parse todos.json");
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(status_row(&text).contains("Error: failed to parse todos.json"));
    assert!(!status_row(&text).contains("Warning:"));
}

#[test]
fn hit_test_finds_header_list_activity_and_tools() {
    let app = seeded_app(3);
    let layout = plan_layout(screen(), &app).expect("panel layout");
    let list = layout.list.expect("list area");

    assert_eq!(
        hit_test(screen(), &app, layout.header.x, layout.header.y),
        Some(HitTarget::PlanHeader)
    );
    assert_eq!(
        hit_test(screen(), &app, list.x + 1, list.y),
        Some(HitTarget::PlanList)
    );
    let bar = layout.progress_bar.expect("progress bar");
    assert_eq!(
        hit_test(screen(), &app, bar.x, bar.y),
        Some(HitTarget::PlanBody)
    );
    assert_eq!(
        hit_test(screen(), &app, 2, HEIGHT - STATUS_HEIGHT - 2),
        Some(HitTarget::Activity)
    );
    assert_eq!(
        hit_test(screen(), &app, WIDTH - 2, 10),
        Some(HitTarget::Tools)
    );
    assert_eq!(hit_test(screen(), &app, 2, HEIGHT - 1), None);
}

#[test]
fn collapsed_plan_shrinks_to_header() {
    let mut app = seeded_app(3);
    app.toggle_plan();
    let layout = plan_layout(screen(), &app).expect("panel layout");
    assert_eq!(layout.area.height, 3);
    assert!(layout.list.is_none());
    let text = render_text(&app, WIDTH, HEIGHT);
    assert!(text.contains("→ Port the resolver"));
}

#[test]
fn plan_list_scroll_limit_tracks_capped_list() {
    let app = seeded_app(12);
    let list = plan_layout(screen(), &app)
        .and_then(|layout| layout.list)
        .expect("list area");
    assert_eq!(list.height, app.panel_config().list_max_rows);
    assert_eq!(
        plan_list_max_scroll(screen(), &app),
        12 - app.panel_config().list_max_rows
    );
}

#[test]
fn activity_scroll_limit_grows_with_feed() {
    let mut app = App::default();
    assert_eq!(activity_max_scroll(screen(), &app), 0);
    for idx in 0..100 {
        app.push_activity(format!("entry {idx}"));
    }
    assert!(activity_max_scroll(screen(), &app) > 0);
}
