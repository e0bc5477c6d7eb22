use crate::config::PanelConfig;
use crate::settings::{ApiSettings, FeatureToggles};
use crate::todo::{TodoItem, TodoProgress};
use crate::todo_panel::TodoPanelState;
use crate::tools::{self, ToolDefinition};

const MAX_ACTIVITY_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Session,
    Tools,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    pub active_pane: Pane,
    panel_config: PanelConfig,
    todos: Vec<TodoItem>,
    plan: TodoPanelState,
    settings: Option<ApiSettings>,
    active_tools: Vec<&'static ToolDefinition>,
    activity: Vec<String>,
    activity_scroll: u16,
    tools_scroll: u16,
    load_error: Option<String>,
    startup_warning: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}

impl App {
    pub fn new(panel_config: PanelConfig) -> Self {
        Self {
            running: true,
            ticks: 0,
            active_pane: Pane::Session,
            panel_config,
            todos: Vec::new(),
            plan: TodoPanelState::default(),
            settings: None,
            active_tools: tools::active_tools(None),
            activity: vec!["Waiting for the agent to publish a plan.".to_string()],
            activity_scroll: 0,
            tools_scroll: 0,
            load_error: None,
            startup_warning: None,
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn next_pane(&mut self) {
        self.active_pane = match self.active_pane {
            Pane::Session => Pane::Tools,
            Pane::Tools => Pane::Session,
        };
    }

    pub fn panel_config(&self) -> &PanelConfig {
        &self.panel_config
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn progress(&self) -> TodoProgress<'_> {
        TodoProgress::from_items(&self.todos)
    }

    pub fn plan_state(&self) -> &TodoPanelState {
        &self.plan
    }

    pub fn toggle_plan(&mut self) {
        if self.todos.is_empty() {
            return;
        }
        self.plan.toggle();
    }

    pub fn scroll_plan_list_up(&mut self) {
        self.plan.scroll_list_up(self.panel_config.wheel_step);
    }

    pub fn scroll_plan_list_down(&mut self, max_scroll: u16) {
        self.plan
            .scroll_list_down(self.panel_config.wheel_step, max_scroll);
    }

    pub fn clamp_plan_list_scroll(&mut self, max_scroll: u16) {
        self.plan.clamp_list_scroll(max_scroll);
    }

    /// Replaces the plan with a fresh snapshot from the agent.
    pub fn set_todos(&mut self, todos: Vec<TodoItem>) {
        self.load_error = None;
        if todos == self.todos {
            return;
        }
        self.todos = todos;
        let progress = self.progress();
        let message = if progress.total == 0 {
            "Plan cleared.".to_string()
        } else if progress.all_done {
            format!("Plan complete: all {} tasks finished.", progress.total)
        } else if let Some(item) = progress.in_progress {
            format!(
                "Plan updated ({}/{}): working on \"{}\".",
                progress.completed, progress.total, item.content
            )
        } else {
            format!("Plan updated ({}/{}).", progress.completed, progress.total)
        };
        self.push_activity(message);
    }

    /// Records a failed reload. The last good plan stays on screen.
    pub fn set_load_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        if self.load_error.as_deref() != Some(error.as_str()) {
            self.push_activity(format!("Reload failed: {error}"));
        }
        self.load_error = Some(error);
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Records a config or theme problem found before the view opened. It
    /// stays on the status bar for the whole session.
    pub fn set_startup_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        self.push_activity(format!("Warning: {warning}"));
        self.startup_warning = Some(warning);
    }

    pub fn startup_warning(&self) -> Option<&str> {
        self.startup_warning.as_deref()
    }

    pub fn set_settings(&mut self, settings: Option<ApiSettings>) {
        self.settings = settings;
        self.active_tools = tools::active_tools(self.settings.as_ref());
        let toggles = self.feature_toggles();
        self.push_activity(format!(
            "Settings loaded: memory {}, page reader {} ({} tools active).",
            on_off(toggles.memory),
            on_off(toggles.page_reader),
            self.active_tools.len()
        ));
    }

    pub fn feature_toggles(&self) -> FeatureToggles {
        FeatureToggles::from_settings(self.settings.as_ref())
    }

    pub fn active_tools(&self) -> &[&'static ToolDefinition] {
        &self.active_tools
    }

    pub fn push_activity(&mut self, line: impl Into<String>) {
        self.activity.push(line.into());
        if self.activity.len() > MAX_ACTIVITY_LINES {
            let overflow = self.activity.len() - MAX_ACTIVITY_LINES;
            self.activity.drain(0..overflow);
        }
    }

    pub fn activity(&self) -> &[String] {
        &self.activity
    }

    pub fn activity_scroll(&self) -> u16 {
        self.activity_scroll
    }

    pub fn scroll_activity_up(&mut self) {
        self.activity_scroll = self
            .activity_scroll
            .saturating_sub(self.panel_config.wheel_step);
    }

    pub fn scroll_activity_down(&mut self, max_scroll: u16) {
        self.activity_scroll = self
            .activity_scroll
            .saturating_add(self.panel_config.wheel_step)
            .min(max_scroll);
    }

    pub fn tools_scroll(&self) -> u16 {
        self.tools_scroll
    }

    pub fn scroll_tools_up(&mut self) {
        self.tools_scroll = self
            .tools_scroll
            .saturating_sub(self.panel_config.wheel_step);
    }

    pub fn scroll_tools_down(&mut self, max_scroll: u16) {
        self.tools_scroll = self
            .tools_scroll
            .saturating_add(self.panel_config.wheel_step)
            .min(max_scroll);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
