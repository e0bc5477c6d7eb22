use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::app::{App, Pane};
use crate::text_layout::wrap_words;
use crate::theme::Theme;
use crate::todo_panel::{self, PanelLayout};

const TEXT_PADDING: u16 = 1;
const STATUS_HEIGHT: u16 = 3;
const TITLE_BAR_HEIGHT: u16 = 3;
const ACTIVE_TITLE_BG: Color = Color::Rgb(90, 145, 200);
const ACTIVE_TITLE_FG: Color = Color::Black;
const ERROR_FG: Color = Color::Rgb(235, 110, 110);
const WARNING_FG: Color = Color::Rgb(230, 190, 90);
const STATUS_HELP_TEXT: &str =
    "Tab focus | Wheel scrolls pane under cursor | r reload | q quit";

/// What sits under a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    PlanHeader,
    PlanList,
    /// The plan panel outside its header and list.
    PlanBody,
    Activity,
    Tools,
}

#[derive(Debug, Clone, Copy)]
struct SessionAreas {
    pane: Rect,
    panel: Rect,
    activity: Rect,
}

#[derive(Debug, Clone, Copy)]
struct ScreenAreas {
    session_title: Rect,
    session: SessionAreas,
    tools_title: Rect,
    tools_content: Rect,
    status: Rect,
}

fn screen_areas(screen: Rect, app: &App) -> ScreenAreas {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(screen);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);
    let [session_title, session_content] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(left);
    let [tools_title, tools_content] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(right);

    let inner = padded(session_content);
    let panel_rows = todo_panel::panel_height(
        app.todos(),
        app.plan_state(),
        inner.width,
        app.panel_config(),
    )
    .min(inner.height);
    let [panel, activity] =
        Layout::vertical([Constraint::Length(panel_rows), Constraint::Min(0)]).areas(inner);

    ScreenAreas {
        session_title,
        session: SessionAreas {
            pane: left,
            panel,
            activity,
        },
        tools_title,
        tools_content,
        status,
    }
}

fn padded(area: Rect) -> Rect {
    Block::default()
        .padding(Padding::uniform(TEXT_PADDING))
        .inner(area)
}

pub fn plan_layout(screen: Rect, app: &App) -> Option<PanelLayout> {
    let areas = screen_areas(screen, app);
    todo_panel::layout_panel(
        areas.session.panel,
        app.todos(),
        app.plan_state(),
        app.panel_config(),
    )
}

pub fn plan_list_max_scroll(screen: Rect, app: &App) -> u16 {
    plan_layout(screen, app)
        .and_then(|layout| layout.list)
        .map(|list| todo_panel::list_max_scroll(app.todos(), list))
        .unwrap_or(0)
}

pub fn activity_max_scroll(screen: Rect, app: &App) -> u16 {
    let area = screen_areas(screen, app).session.activity;
    let total = activity_display_lines(app, area.width).len() as u16;
    total.saturating_sub(area.height)
}

pub fn tools_max_scroll(screen: Rect, app: &App) -> u16 {
    let area = padded(screen_areas(screen, app).tools_content);
    let total = tools_lines(app, &Theme::default(), area.width).len() as u16;
    total.saturating_sub(area.height)
}

pub fn hit_test(screen: Rect, app: &App, x: u16, y: u16) -> Option<HitTarget> {
    let areas = screen_areas(screen, app);
    if let Some(layout) = todo_panel::layout_panel(
        areas.session.panel,
        app.todos(),
        app.plan_state(),
        app.panel_config(),
    ) && point_in_rect(layout.area, x, y)
    {
        if point_in_rect(layout.header, x, y) {
            return Some(HitTarget::PlanHeader);
        }
        if layout.list.is_some_and(|list| point_in_rect(list, x, y)) {
            return Some(HitTarget::PlanList);
        }
        return Some(HitTarget::PlanBody);
    }
    if point_in_rect(areas.session.pane, x, y) {
        return Some(HitTarget::Activity);
    }
    if point_in_rect(areas.tools_title, x, y) || point_in_rect(areas.tools_content, x, y) {
        return Some(HitTarget::Tools);
    }
    None
}

fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let areas = screen_areas(frame.area(), app);

    render_title_bar(
        frame,
        areas.session_title,
        "Agent Session",
        app.active_pane == Pane::Session,
        theme,
    );
    render_session_pane(frame, areas.session, app, theme);

    render_title_bar(
        frame,
        areas.tools_title,
        "Active Tools",
        app.active_pane == Pane::Tools,
        theme,
    );
    render_tools_pane(frame, areas.tools_content, app, theme);

    frame.render_widget(
        Paragraph::new(status_line(app, theme))
            .style(Style::default().bg(theme.status_bg).fg(theme.muted_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.status_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        areas.status,
    );
}

fn render_title_bar(frame: &mut Frame, area: Rect, title: &str, active: bool, theme: &Theme) {
    let (bg, fg) = if active {
        (ACTIVE_TITLE_BG, ACTIVE_TITLE_FG)
    } else {
        (theme.pane_bg, theme.muted_fg)
    };
    frame.render_widget(
        Paragraph::new(title).style(Style::default().bg(bg).fg(fg)).block(
            Block::default()
                .style(Style::default().bg(bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        area,
    );
}

fn render_session_pane(frame: &mut Frame, areas: SessionAreas, app: &App, theme: &Theme) {
    let [_title, content] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)])
            .areas(areas.pane);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.pane_bg)),
        content,
    );

    todo_panel::render_todo_panel(
        frame,
        areas.panel,
        app.todos(),
        app.plan_state(),
        app.panel_config(),
        theme,
    );

    if areas.activity.height == 0 {
        return;
    }
    let lines = activity_display_lines(app, areas.activity.width);
    let max_scroll = (lines.len() as u16).saturating_sub(areas.activity.height);
    frame.render_widget(
        Paragraph::new(lines.join("\n"))
            .style(Style::default().bg(theme.pane_bg).fg(theme.text_fg))
            .scroll((app.activity_scroll().min(max_scroll), 0)),
        areas.activity,
    );
}

fn activity_display_lines(app: &App, width: u16) -> Vec<String> {
    let mut lines = Vec::new();
    if !app.todos().is_empty() {
        // Gap between the plan panel and the feed.
        lines.push(String::new());
    }
    for entry in app.activity() {
        lines.extend(wrap_words(entry, width));
    }
    lines
}

fn render_tools_pane(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let inner = padded(area);
    let lines = tools_lines(app, theme, inner.width);
    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme.pane_bg).fg(theme.text_fg))
            .scroll((app.tools_scroll().min(max_scroll), 0))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.pane_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn tools_lines(app: &App, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let toggles = app.feature_toggles();
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Memory: "),
            toggle_span(toggles.memory, theme),
            Span::raw("  Page reader: "),
            toggle_span(toggles.page_reader, theme),
        ]),
        Line::from(Span::styled(
            format!(
                "{} of {} tools active",
                app.active_tools().len(),
                crate::tools::all_tools().len()
            ),
            Style::default().fg(theme.muted_fg),
        )),
        Line::default(),
    ];
    for tool in app.active_tools() {
        lines.push(Line::from(Span::styled(
            format!("• {}", tool.name()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for row in wrap_words(&tool.function.description, width.saturating_sub(2).max(1)) {
            lines.push(Line::from(Span::styled(
                format!("  {row}"),
                Style::default().fg(theme.muted_fg),
            )));
        }
    }
    lines
}

fn toggle_span(enabled: bool, theme: &Theme) -> Span<'static> {
    if enabled {
        Span::styled("on", Style::default().fg(theme.success_fg))
    } else {
        Span::styled("off", Style::default().fg(theme.muted_fg))
    }
}

fn status_help(app: &App) -> String {
    if app.todos().is_empty() {
        return STATUS_HELP_TEXT.to_string();
    }
    let toggle = if app.plan_state().is_expanded() {
        "collapse"
    } else {
        "expand"
    };
    format!("Enter/click header {toggle} plan | {STATUS_HELP_TEXT}")
}

fn status_line(app: &App, theme: &Theme) -> Line<'static> {
    let help = status_help(app);
    let notice = match (app.load_error(), app.startup_warning()) {
        (Some(error), _) => Some((format!("Error: {error}"), ERROR_FG)),
        (None, Some(warning)) => Some((format!("Warning: {warning}"), WARNING_FG)),
        (None, None) => None,
    };
    match notice {
        Some((text, fg)) => Line::from(vec![
            Span::styled(text, Style::default().fg(fg)),
            Span::raw(" | "),
            Span::raw(help),
        ]),
        None => Line::from(Span::styled(help, Style::default().fg(theme.muted_fg))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
