use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TodoStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            TodoStatus::Pending => "○",
            TodoStatus::InProgress => "◐",
            TodoStatus::Completed => "✔",
            TodoStatus::Cancelled => "✘",
        }
    }

    /// Completed and cancelled items are finished and render struck through.
    pub fn is_closed(self) -> bool {
        matches!(self, TodoStatus::Completed | TodoStatus::Cancelled)
    }
}

/// One step of the agent's plan, as written to the todo file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(deserialize_with = "deserialize_id_to_string")]
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
}

impl TodoItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>, status: TodoStatus) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Str(String),
    Num(serde_json::Number),
}

fn deserialize_id_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdInput::deserialize(deserializer)? {
        IdInput::Str(s) => s,
        IdInput::Num(n) => n.to_string(),
    })
}

/// Aggregates derived from a todo list. Recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoProgress<'a> {
    pub completed: usize,
    pub cancelled: usize,
    pub open: usize,
    pub total: usize,
    pub percent: u8,
    /// First in-progress item in list order.
    pub in_progress: Option<&'a TodoItem>,
    pub all_done: bool,
}

impl<'a> TodoProgress<'a> {
    pub fn from_items(items: &'a [TodoItem]) -> Self {
        let completed = count_status(items, TodoStatus::Completed);
        let cancelled = count_status(items, TodoStatus::Cancelled);
        let total = items.len();
        Self {
            completed,
            cancelled,
            open: total - completed - cancelled,
            total,
            percent: completion_percent(completed, total),
            in_progress: items
                .iter()
                .find(|item| item.status == TodoStatus::InProgress),
            all_done: completed + cancelled == total,
        }
    }
}

/// Serializable summary of a plan, as printed by `planboard progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub open: usize,
    pub percent: u8,
    pub all_done: bool,
    pub in_progress: Option<CurrentTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentTask {
    pub id: String,
    pub content: String,
}

impl TodoProgress<'_> {
    pub fn report(&self) -> ProgressReport {
        ProgressReport {
            total: self.total,
            completed: self.completed,
            cancelled: self.cancelled,
            open: self.open,
            percent: self.percent,
            all_done: self.all_done,
            in_progress: self.in_progress.map(|item| CurrentTask {
                id: item.id.clone(),
                content: item.content.clone(),
            }),
        }
    }
}

fn count_status(items: &[TodoItem], status: TodoStatus) -> usize {
    items.iter().filter(|item| item.status == status).count()
}

/// `round(completed / total * 100)` with halves rounded up; 0 for an empty list.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((completed * 200 + total) / (total * 2)) as u8
}
