use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::event::CalendarEvent;
use crate::models::message::ChatMessage;
use crate::models::todo::TodoItem;

// Per-session state. The client holds the transcript and posts it in full
// each turn; events and todos accumulate server-side. Nothing survives a
// restart.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub events: Vec<CalendarEvent>,
    pub todos: Vec<TodoItem>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn replace_transcript(&mut self, messages: Vec<ChatMessage>, reply: &str) {
        self.messages = messages;
        self.messages.push(ChatMessage::assistant(reply));
    }

    pub fn add_events(&mut self, events: &[CalendarEvent]) {
        self.events.extend_from_slice(events);
    }

    pub fn add_todos(&mut self, todos: &[TodoItem]) {
        self.todos.extend_from_slice(todos);
    }

    pub fn toggle_todo(&mut self, todo_id: &str) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == todo_id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    pub fn clear_todos(&mut self) -> usize {
        let cleared = self.todos.len();
        self.todos.clear();
        cleared
    }
}

pub type SessionStore = Arc<Mutex<HashMap<String, ChatSession>>>;

pub fn new_store() -> SessionStore {
    Arc::new(Mutex::new(HashMap::new()))
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_transcript_appends_the_reply() {
        let mut chat_session = ChatSession::new("s1");
        chat_session.replace_transcript(vec![ChatMessage::user("hi")], "hello!");
        assert_eq!(chat_session.messages.len(), 2);
        assert_eq!(chat_session.messages[1].role, "assistant");
        assert_eq!(chat_session.messages[1].content, "hello!");
    }

    #[test]
    fn toggle_flips_and_reports_unknown_ids() {
        let mut chat_session = ChatSession::new("s1");
        chat_session.add_todos(&[crate::models::todo::TodoItem::new("buy milk", None)]);
        let id = chat_session.todos[0].id.clone();

        assert_eq!(chat_session.toggle_todo(&id), Some(true));
        assert_eq!(chat_session.toggle_todo(&id), Some(false));
        assert_eq!(chat_session.toggle_todo("missing"), None);
    }

    #[test]
    fn clear_reports_how_many_were_dropped() {
        let mut chat_session = ChatSession::new("s1");
        chat_session.add_todos(&[
            crate::models::todo::TodoItem::new("one", None),
            crate::models::todo::TodoItem::new("two", None),
        ]);
        assert_eq!(chat_session.clear_todos(), 2);
        assert!(chat_session.todos.is_empty());
    }
}
