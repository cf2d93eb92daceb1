use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

impl TodoItem {
    pub fn new(text: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            date,
            completed: false,
        }
    }
}

// Progress over a checklist: (completed, total, rounded percent).
pub fn todo_progress(todos: &[TodoItem]) -> (usize, usize, u32) {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    let percent = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };
    (completed, total, percent)
}
