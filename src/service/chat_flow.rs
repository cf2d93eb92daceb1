use chrono::NaiveDate;
use serde::Serialize;

use crate::models::event::CalendarEvent;
use crate::models::message::ChatMessage;
use crate::models::todo::TodoItem;
use crate::service::attachment_service::AttachmentService;
use crate::service::extraction_service::EventExtractor;
use crate::service::openai_service::{ChatClient, ClientError};

#[derive(Debug, Serialize)]
pub struct ChatTurn {
    pub reply: String,
    pub events: Vec<CalendarEvent>,
    pub todos: Vec<TodoItem>,
}

// One user turn: fold attachments into the outgoing text, relay the full
// history to the model, then scrape the reply for structured records.
// Extraction cannot fail; the worst case is empty lists.
pub async fn run_chat_turn(
    client: &dyn ChatClient,
    attachments: &AttachmentService,
    extractor: &EventExtractor,
    system_prompt: &str,
    messages: &[ChatMessage],
    today: NaiveDate,
) -> Result<ChatTurn, ClientError> {
    let processed = attachments.preprocess(messages).await;
    let reply = client.complete(system_prompt, &processed).await?;
    let extraction = extractor.extract(&reply, today);
    tracing::info!(
        events = extraction.events.len(),
        todos = extraction.todos.len(),
        "chat turn extracted records"
    );
    Ok(ChatTurn {
        reply,
        events: extraction.events,
        todos: extraction.todos,
    })
}
