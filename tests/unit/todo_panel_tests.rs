use super::*;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

fn todo(id: &str, content: &str, status: TodoStatus) -> TodoItem {
    TodoItem::new(id, content, status)
}

fn working_plan() -> Vec<TodoItem> {
    vec![
        todo("1", "Read the config loader", TodoStatus::Completed),
        todo("2", "Write the parser", TodoStatus::InProgress),
        todo("3", "Drop the legacy flag", TodoStatus::Cancelled),
        todo("4", "Add tests", TodoStatus::Pending),
    ]
}

fn finished_plan() -> Vec<TodoItem> {
    vec![
        todo("1", "Read the config loader", TodoStatus::Completed),
        todo("2", "Write the parser", TodoStatus::Completed),
    ]
}

fn render_panel(
    todos: &[TodoItem],
    state: &TodoPanelState,
    config: &PanelConfig,
    width: u16,
    height: u16,
) -> (String, Buffer, Option<PanelLayout>) {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
    let theme = Theme::default();
    let mut layout = None;
    terminal
        .draw(|frame| {
            layout = render_todo_panel(frame, frame.area(), todos, state, config, &theme);
        })
        .expect("render should succeed");
    let buffer = terminal.backend().buffer().clone();
    (buffer_to_string(&buffer), buffer, layout)
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

fn find_cell(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
    for y in 0..buffer.area.height {
        let row: Vec<String> = (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect();
        let joined = row.concat();
        if let Some(byte_idx) = joined.find(needle) {
            let x = joined[..byte_idx].chars().count() as u16;
            return Some((x, y));
        }
    }
    None
}

#[test]
fn empty_plan_renders_nothing() {
    let config = PanelConfig::default();
    let state = TodoPanelState::default();
    let (text, _, layout) = render_panel(&[], &state, &config, 60, 12);
    assert!(layout.is_none());
    assert!(text.chars().all(|c| c == ' ' || c == '\n'));
    assert_eq!(panel_height(&[], &state, 60, &config), 0);
}

#[test]
fn starts_expanded() {
    assert!(TodoPanelState::default().is_expanded());
}

#[test]
fn expanded_panel_shows_header_current_task_and_every_item() {
    let todos = working_plan();
    let (text, _, layout) = render_panel(
        &todos,
        &TodoPanelState::default(),
        &PanelConfig::default(),
        60,
        14,
    );
    let layout = layout.expect("panel should render");
    assert!(text.contains("▼ ☰ Task Plan 1/4"));
    assert!(text.contains("25%"));
    assert!(text.contains("━"));
    for item in &todos {
        assert!(text.contains(&item.content), "missing {}", item.content);
    }
    assert!(text.contains("◐ Write the parser"));
    assert!(layout.current_task.is_some());
    assert!(layout.banner.is_none());
    assert!(!text.contains("→"));
}

#[test]
fn list_entries_show_status_glyphs() {
    let todos = working_plan();
    let (text, _, _) = render_panel(
        &todos,
        &TodoPanelState::default(),
        &PanelConfig::default(),
        60,
        14,
    );
    assert!(text.contains("✔ Read the config loader"));
    assert!(text.contains("✘ Drop the legacy flag"));
    assert!(text.contains("○ Add tests"));
}

#[test]
fn closed_items_are_crossed_out_and_in_progress_is_highlighted() {
    let todos = working_plan();
    let theme = Theme::default();
    let (_, buffer, layout) = render_panel(
        &todos,
        &TodoPanelState::default(),
        &PanelConfig::default(),
        60,
        14,
    );
    let list = layout.and_then(|layout| layout.list).expect("list should render");

    let (x, y) = find_cell(&buffer, "Read the config").expect("completed item visible");
    assert!(y >= list.y);
    assert!(buffer[(x, y)].modifier.contains(Modifier::CROSSED_OUT));

    let (x, y) = find_cell(&buffer, "Drop the legacy").expect("cancelled item visible");
    assert!(buffer[(x, y)].modifier.contains(Modifier::CROSSED_OUT));

    let (x, y) = find_cell(&buffer, "Add tests").expect("pending item visible");
    assert!(!buffer[(x, y)].modifier.contains(Modifier::CROSSED_OUT));

    // The current-task block also shows the in-progress item; the list row is the last match.
    let list_row = (list.y..list.bottom())
        .find(|row| {
            (list.x..list.right())
                .map(|col| buffer[(col, *row)].symbol().to_string())
                .collect::<String>()
                .contains("Write the parser")
        })
        .expect("in-progress row in list");
    assert_eq!(buffer[(list.x + 2, list_row)].bg, theme.accent_bg);
}

#[test]
fn collapsed_panel_shows_preview_and_mini_bar_only() {
    let todos = working_plan();
    let mut state = TodoPanelState::default();
    state.toggle();
    let (text, _, layout) = render_panel(&todos, &state, &PanelConfig::default(), 70, 10);
    let layout = layout.expect("panel should render");
    assert!(text.contains("▶ ☰ Task Plan 1/4"));
    assert!(text.contains("→ Write the parser"));
    assert!(text.contains("25%"));
    assert!(!text.contains("Add tests"));
    assert!(layout.list.is_none());
    assert!(layout.progress_bar.is_none());
    assert_eq!(layout.area.height, 3);
}

#[test]
fn collapsed_preview_is_truncated_to_fit() {
    let todos = vec![todo(
        "1",
        "Refactor the whole configuration subsystem into layered providers",
        TodoStatus::InProgress,
    )];
    let mut state = TodoPanelState::default();
    state.toggle();
    let (text, _, _) = render_panel(&todos, &state, &PanelConfig::default(), 50, 3);
    assert!(text.contains("→ Refactor"));
    assert!(text.contains('…'));
    assert!(text.contains("0%"));
}

#[test]
fn finished_plan_shows_completion_title_and_banner() {
    let todos = finished_plan();
    let (text, _, layout) = render_panel(
        &todos,
        &TodoPanelState::default(),
        &PanelConfig::default(),
        60,
        10,
    );
    let layout = layout.expect("panel should render");
    assert!(text.contains("▼ ✔ Plan Complete 2/2"));
    assert!(text.contains("All 2 tasks completed!"));
    assert!(text.contains("100%"));
    assert!(layout.banner.is_some());
    assert!(layout.current_task.is_none());
}

#[test]
fn finished_plan_percentage_is_emphasised() {
    let todos = finished_plan();
    let (_, buffer, _) = render_panel(
        &todos,
        &TodoPanelState::default(),
        &PanelConfig::default(),
        60,
        10,
    );
    let (x, y) = find_cell(&buffer, "100%").expect("percentage visible");
    assert!(buffer[(x, y)].modifier.contains(Modifier::BOLD));
    assert_eq!(buffer[(x, y)].fg, Theme::default().success_fg);
}

#[test]
fn collapsed_finished_plan_shows_completion_message() {
    let todos = finished_plan();
    let mut state = TodoPanelState::default();
    state.toggle();
    let (text, _, _) = render_panel(&todos, &state, &PanelConfig::default(), 70, 5);
    assert!(text.contains("All tasks completed!"));
    assert!(!text.contains("All 2 tasks completed!"));
}

#[test]
fn toggling_twice_restores_state_and_keeps_data() {
    let todos = working_plan();
    let before = todos.clone();
    let progress_before = TodoProgress::from_items(&todos).percent;
    let mut state = TodoPanelState::default();
    state.toggle();
    assert!(!state.is_expanded());
    state.toggle();
    assert!(state.is_expanded());
    assert_eq!(todos, before);
    assert_eq!(TodoProgress::from_items(&todos).percent, progress_before);
}

#[test]
fn list_is_capped_and_scrolls_within_its_own_bounds() {
    let todos: Vec<TodoItem> = (0..10)
        .map(|idx| todo(&idx.to_string(), &format!("Step {idx}"), TodoStatus::Pending))
        .collect();
    let config = PanelConfig {
        list_max_rows: 3,
        wheel_step: 1,
    };
    let mut state = TodoPanelState::default();
    let (text, _, layout) = render_panel(&todos, &state, &config, 40, 20);
    let list = layout.and_then(|layout| layout.list).expect("list should render");
    assert_eq!(list.height, 3);
    assert!(text.contains("Step 0"));
    assert!(!text.contains("Step 3"));

    let max = list_max_scroll(&todos, list);
    assert_eq!(max, 7);
    for _ in 0..20 {
        state.scroll_list_down(config.wheel_step, max);
    }
    assert_eq!(state.list_scroll(), 7);
    let (text, _, _) = render_panel(&todos, &state, &config, 40, 20);
    assert!(text.contains("Step 9"));
    assert!(!text.contains("Step 6"));

    state.scroll_list_up(10);
    assert_eq!(state.list_scroll(), 0);
}

#[test]
fn long_items_wrap_with_indented_continuation() {
    let todos = vec![todo(
        "1",
        "Implement the streaming decoder for chunked responses",
        TodoStatus::Pending,
    )];
    let config = PanelConfig::default();
    let state = TodoPanelState::default();
    let (text, _, layout) = render_panel(&todos, &state, &config, 24, 12);
    let list = layout.and_then(|layout| layout.list).expect("list should render");
    assert!(list.height > 1);
    assert!(text.contains("○ Implement the"));
    assert!(text.contains("  streaming"));
}

#[test]
fn wide_glyph_items_wrap_by_display_columns() {
    let todos = vec![todo("1", "一二三四五六七八九十", TodoStatus::Pending)];
    let config = PanelConfig::default();
    let state = TodoPanelState::default();
    let (text, _, layout) = render_panel(&todos, &state, &config, 18, 12);
    let list = layout.and_then(|layout| layout.list).expect("list should render");
    assert_eq!(list.height, 2);
    assert_eq!(list_max_scroll(&todos, list), 0);
    for glyph in "一二三四五六七八九十".chars() {
        assert!(text.contains(glyph), "missing {glyph}");
    }
    assert!(text.contains("  八"));
}

#[test]
fn wide_glyph_collapsed_preview_ends_with_ellipsis() {
    let content: String = "一二三四五六七八九十".repeat(2);
    let todos = vec![todo("1", &content, TodoStatus::InProgress)];
    let mut state = TodoPanelState::default();
    state.toggle();
    let (text, _, _) = render_panel(&todos, &state, &PanelConfig::default(), 50, 3);
    assert!(text.contains("→ 一"));
    assert!(text.contains('…'));
    assert!(text.contains("0%"));
}

#[test]
fn panel_height_matches_rendered_layout() {
    let todos = working_plan();
    let config = PanelConfig::default();
    let state = TodoPanelState::default();
    let height = panel_height(&todos, &state, 60, &config);
    // border + header + bar + current task + four items
    assert_eq!(height, 2 + 1 + 1 + 1 + 4);
    let layout = layout_panel(Rect::new(0, 0, 60, 30), &todos, &state, &config)
        .expect("layout should exist");
    assert_eq!(layout.area.height, height);
}
