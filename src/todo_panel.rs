use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::config::PanelConfig;
use crate::text_layout::{truncate_with_ellipsis, wrap_words};
use crate::theme::Theme;
use crate::todo::{TodoItem, TodoProgress, TodoStatus};

const MINI_BAR_WIDTH: u16 = 8;
const BORDER_ROWS: u16 = 2;
const GLYPH_COLUMNS: u16 = 2;
const COMPLETE_TITLE: &str = "✔ Plan Complete";
const PLAN_TITLE: &str = "☰ Task Plan";
const ALL_DONE_PREVIEW: &str = "All tasks completed!";

/// View state of one task plan panel. The todo list itself is never stored
/// here; it is passed in on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPanelState {
    expanded: bool,
    list_scroll: u16,
}

impl Default for TodoPanelState {
    fn default() -> Self {
        Self {
            expanded: true,
            list_scroll: 0,
        }
    }
}

impl TodoPanelState {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn list_scroll(&self) -> u16 {
        self.list_scroll
    }

    pub fn scroll_list_up(&mut self, step: u16) {
        self.list_scroll = self.list_scroll.saturating_sub(step);
    }

    pub fn scroll_list_down(&mut self, step: u16, max_scroll: u16) {
        self.list_scroll = self.list_scroll.saturating_add(step).min(max_scroll);
    }

    pub fn clamp_list_scroll(&mut self, max_scroll: u16) {
        self.list_scroll = self.list_scroll.min(max_scroll);
    }
}

/// Screen regions of a rendered panel, used for drawing and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub area: Rect,
    pub header: Rect,
    pub progress_bar: Option<Rect>,
    pub banner: Option<Rect>,
    pub current_task: Option<Rect>,
    pub list: Option<Rect>,
}

/// Rows the panel wants at `width`, borders included. Zero for an empty plan.
pub fn panel_height(
    todos: &[TodoItem],
    state: &TodoPanelState,
    width: u16,
    config: &PanelConfig,
) -> u16 {
    if todos.is_empty() {
        return 0;
    }
    let progress = TodoProgress::from_items(todos);
    let inner_width = width.saturating_sub(BORDER_ROWS).max(1);
    let mut rows = 1u16;
    if state.expanded {
        rows = rows.saturating_add(1);
        if progress.all_done || progress.in_progress.is_some() {
            rows = rows.saturating_add(1);
        }
        rows = rows.saturating_add(list_row_count(todos, inner_width).min(config.list_max_rows));
    }
    rows.saturating_add(BORDER_ROWS)
}

pub fn layout_panel(
    area: Rect,
    todos: &[TodoItem],
    state: &TodoPanelState,
    config: &PanelConfig,
) -> Option<PanelLayout> {
    if todos.is_empty() || area.height <= BORDER_ROWS || area.width <= BORDER_ROWS {
        return None;
    }
    let progress = TodoProgress::from_items(todos);
    let height = panel_height(todos, state, area.width, config).min(area.height);
    let outer = Rect { height, ..area };
    let inner = panel_block().inner(outer);
    let mut rows = RowCursor {
        area: inner,
        next_y: inner.y,
    };

    let header = rows.take(1)?;
    let mut layout = PanelLayout {
        area: outer,
        header,
        progress_bar: None,
        banner: None,
        current_task: None,
        list: None,
    };
    if state.expanded {
        layout.progress_bar = rows.take(1);
        if progress.all_done {
            layout.banner = rows.take(1);
        } else if progress.in_progress.is_some() {
            layout.current_task = rows.take(1);
        }
        let list_rows = list_row_count(todos, inner.width).min(config.list_max_rows);
        layout.list = rows.take(list_rows);
    }
    Some(layout)
}

struct RowCursor {
    area: Rect,
    next_y: u16,
}

impl RowCursor {
    fn take(&mut self, rows: u16) -> Option<Rect> {
        let bottom = self.area.bottom();
        if rows == 0 || self.next_y >= bottom {
            return None;
        }
        let height = rows.min(bottom - self.next_y);
        let rect = Rect::new(self.area.x, self.next_y, self.area.width, height);
        self.next_y += height;
        Some(rect)
    }
}

/// How far the task list can scroll inside `list_area`.
pub fn list_max_scroll(todos: &[TodoItem], list_area: Rect) -> u16 {
    list_row_count(todos, list_area.width).saturating_sub(list_area.height)
}

fn list_row_count(todos: &[TodoItem], width: u16) -> u16 {
    let rows: usize = todos.iter().map(|todo| item_rows(todo, width).len()).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn item_rows(todo: &TodoItem, width: u16) -> Vec<String> {
    wrap_words(&todo.content, width.saturating_sub(GLYPH_COLUMNS).max(1))
}

fn panel_block() -> Block<'static> {
    Block::bordered().border_type(BorderType::Rounded)
}

/// Draws the panel into `area` and returns where its parts landed. Draws
/// nothing and returns `None` for an empty plan.
pub fn render_todo_panel(
    frame: &mut Frame,
    area: Rect,
    todos: &[TodoItem],
    state: &TodoPanelState,
    config: &PanelConfig,
    theme: &Theme,
) -> Option<PanelLayout> {
    let layout = layout_panel(area, todos, state, config)?;
    let progress = TodoProgress::from_items(todos);

    let (bg, border_fg) = if progress.all_done {
        (theme.panel_done_bg, theme.success_fg)
    } else {
        (theme.panel_bg, theme.muted_fg)
    };
    frame.render_widget(
        panel_block()
            .style(Style::default().bg(bg).fg(theme.text_fg))
            .border_style(Style::default().fg(border_fg)),
        layout.area,
    );

    render_header(frame, layout.header, &progress, state, theme);

    if let Some(bar) = layout.progress_bar {
        frame.render_widget(
            Paragraph::new(Line::from(progress_bar_spans(
                progress.percent,
                bar.width,
                theme,
            ))),
            bar,
        );
    }

    if let Some(banner) = layout.banner {
        frame.render_widget(
            Paragraph::new(format!("All {} tasks completed!", progress.completed))
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(theme.success_fg)
                        .add_modifier(Modifier::BOLD),
                ),
            banner,
        );
    }

    if let (Some(current), Some(item)) = (layout.current_task, progress.in_progress) {
        let content_width = usize::from(current.width.saturating_sub(GLYPH_COLUMNS));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(format!("{} ", TodoStatus::InProgress.glyph())),
                Span::raw(truncate_with_ellipsis(&item.content, content_width)),
            ]))
            .style(
                Style::default()
                    .bg(theme.accent_bg)
                    .fg(theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            current,
        );
    }

    if let Some(list) = layout.list {
        let scroll = state.list_scroll.min(list_max_scroll(todos, list));
        frame.render_widget(
            Paragraph::new(list_lines(todos, list.width, theme)).scroll((scroll, 0)),
            list,
        );
    }

    Some(layout)
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    progress: &TodoProgress<'_>,
    state: &TodoPanelState,
    theme: &Theme,
) {
    let percent_style = if progress.all_done {
        Style::default()
            .fg(theme.success_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted_fg)
    };
    let mut right = Vec::new();
    if !state.expanded {
        right.extend(progress_bar_spans(progress.percent, MINI_BAR_WIDTH, theme));
        right.push(Span::raw(" "));
    }
    right.push(Span::styled(format!("{}%", progress.percent), percent_style));
    let right = Line::from(right);
    let right_width = (right.width() as u16).min(area.width);
    let [left_area, _gap, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(right_width),
    ])
    .areas(area);

    let arrow = if state.expanded { "▼ " } else { "▶ " };
    let title = if progress.all_done {
        COMPLETE_TITLE
    } else {
        PLAN_TITLE
    };
    let mut left = vec![
        Span::styled(arrow, Style::default().fg(theme.muted_fg)),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {}/{}", progress.completed, progress.total),
            Style::default().fg(theme.muted_fg),
        ),
    ];
    if !state.expanded {
        let used: usize = left.iter().map(Span::width).sum();
        let room = usize::from(left_area.width).saturating_sub(used);
        if let Some(item) = progress.in_progress {
            // "  → " takes four columns.
            let preview = truncate_with_ellipsis(&item.content, room.saturating_sub(4));
            left.push(Span::styled(
                format!("  → {preview}"),
                Style::default().fg(theme.accent_fg),
            ));
        } else if progress.all_done {
            left.push(Span::styled(
                format!("  {}", truncate_with_ellipsis(ALL_DONE_PREVIEW, room.saturating_sub(2))),
                Style::default().fg(theme.success_fg),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(left)), left_area);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        right_area,
    );
}

fn progress_bar_spans(percent: u8, width: u16, theme: &Theme) -> Vec<Span<'static>> {
    let width = usize::from(width);
    let filled = (width * usize::from(percent.min(100)) + 50) / 100;
    vec![
        Span::styled("━".repeat(filled), Style::default().fg(theme.success_fg)),
        Span::styled(
            "─".repeat(width - filled),
            Style::default().fg(theme.track_bg),
        ),
    ]
}

fn list_lines(todos: &[TodoItem], width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for todo in todos {
        let glyph_style = match todo.status {
            TodoStatus::Pending | TodoStatus::Cancelled => Style::default().fg(theme.muted_fg),
            TodoStatus::InProgress => Style::default().fg(theme.accent_fg),
            TodoStatus::Completed => Style::default().fg(theme.success_fg),
        };
        let content_style = if todo.status.is_closed() {
            Style::default()
                .fg(theme.muted_fg)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(theme.text_fg)
        };
        let line_style = if todo.status == TodoStatus::InProgress {
            Style::default().bg(theme.accent_bg)
        } else {
            Style::default()
        };

        for (idx, row) in item_rows(todo, width).into_iter().enumerate() {
            let prefix = if idx == 0 {
                Span::styled(format!("{} ", todo.status.glyph()), glyph_style)
            } else {
                Span::raw("  ")
            };
            lines.push(Line::from(vec![prefix, Span::styled(row, content_style)]).style(line_style));
        }
    }
    lines
}

#[cfg(test)]
#[path = "../tests/unit/todo_panel_tests.rs"]
mod tests;
