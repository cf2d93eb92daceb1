use async_trait::async_trait;
use calendarAssistant::models::message::{ChatMessage, FileItem};
use calendarAssistant::service::attachment_service::{AttachmentMode, AttachmentService};
use calendarAssistant::service::chat_flow::run_chat_turn;
use calendarAssistant::service::extraction_service::EventExtractor;
use calendarAssistant::service::openai_service::{ChatClient, ClientError};
use chrono::NaiveDate;
use tokio::sync::Mutex;

struct FakeChatClient {
    response: Result<String, String>,
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _history: &[ChatMessage],
    ) -> Result<String, ClientError> {
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(err) => Err(err.clone().into()),
        }
    }
}

struct CapturingChatClient {
    seen: Mutex<Vec<String>>,
    response: String,
}

#[async_trait]
impl ChatClient for CapturingChatClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ClientError> {
        let mut seen = self.seen.lock().await;
        if let Some(last) = history.last() {
            seen.push(last.content.clone());
        }
        Ok(self.response.clone())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

#[tokio::test]
async fn turn_extracts_events_and_todos_from_reply() {
    let client = FakeChatClient {
        response: Ok(
            "I've added 'Team sync' to your calendar on March 4th at 2pm.\n\n\
             Todo: Prepare agenda for March 4th meeting"
                .to_string(),
        ),
    };
    let attachments = AttachmentService::new(AttachmentMode::Note);
    let extractor = EventExtractor::new().unwrap();
    let messages = vec![ChatMessage::user("book a team sync on March 4th at 2pm")];

    let turn = run_chat_turn(&client, &attachments, &extractor, "system", &messages, today())
        .await
        .unwrap();

    assert!(turn.reply.contains("Team sync"));
    // One event from the confirmation sentence, one from the dated todo line.
    assert_eq!(turn.events.len(), 2);
    assert_eq!(turn.events[0].title, "Busy at 2:00 pm");
    assert_eq!(
        turn.events[0].date(),
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    );
    assert_eq!(turn.todos.len(), 1);
    assert_eq!(turn.todos[0].date, Some(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()));
}

#[tokio::test]
async fn relay_errors_propagate() {
    let client = FakeChatClient {
        response: Err("boom".to_string()),
    };
    let attachments = AttachmentService::new(AttachmentMode::Note);
    let extractor = EventExtractor::new().unwrap();
    let messages = vec![ChatMessage::user("hello")];

    let err = run_chat_turn(&client, &attachments, &extractor, "system", &messages, today())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn pdf_note_reaches_the_model() {
    let client = CapturingChatClient {
        seen: Mutex::new(Vec::new()),
        response: "Okay.".to_string(),
    };
    let attachments = AttachmentService::new(AttachmentMode::Note);
    let extractor = EventExtractor::new().unwrap();
    let messages = vec![ChatMessage {
        role: "user".to_string(),
        content: "Here is my agenda.".to_string(),
        file_items: Some(vec![FileItem {
            name: "agenda.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: "data:application/pdf;base64,aGVsbG8=".to_string(),
        }]),
    }];

    let turn = run_chat_turn(&client, &attachments, &extractor, "system", &messages, today())
        .await
        .unwrap();
    assert_eq!(turn.reply, "Okay.");
    assert!(turn.events.is_empty());

    let seen = client.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("Here is my agenda."));
    assert!(seen[0].contains("Note: I've uploaded a PDF file named \"agenda.pdf\""));
}
