use std::sync::Arc;

use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use inquire::Text;

use crate::clients::openai_client;
use crate::models::calendar::{MonthView, WEEKDAY_LABELS};
use crate::models::message::ChatMessage;
use crate::models::todo::todo_progress;
use crate::service::attachment_service::AttachmentService;
use crate::service::chat_flow::run_chat_turn;
use crate::service::extraction_service::EventExtractor;
use crate::service::openai_service::ChatClient;
use crate::session::{self, ChatSession};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Chat {},
    Extract { text: String },
}

pub async fn cli(
    client: Arc<dyn ChatClient>,
    attachments: AttachmentService,
    extractor: EventExtractor,
    timezone: Tz,
) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Chat {} => {
            chat_loop(client.as_ref(), &attachments, &extractor, timezone).await;
        }
        Commands::Extract { text } => {
            let today = Utc::now().with_timezone(&timezone).date_naive();
            let extraction = extractor.extract(text, today);
            match serde_json::to_string_pretty(&extraction) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Failed to serialize extraction: {}", e),
            }
        }
    }
}

async fn chat_loop(
    client: &dyn ChatClient,
    attachments: &AttachmentService,
    extractor: &EventExtractor,
    timezone: Tz,
) {
    let mut chat_session = ChatSession::new(session::new_session_id());
    println!("Chat with your calendar assistant. Type \"exit\" to quit.");

    loop {
        let input = match Text::new("You:").prompt() {
            Ok(text) => text,
            Err(_) => break,
        };
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "exit" || trimmed == "quit" {
            break;
        }
        chat_session.messages.push(ChatMessage::user(trimmed));

        let now = Utc::now().with_timezone(&timezone);
        let today = now.date_naive();
        let system = openai_client::system_prompt(now, timezone.name());
        match run_chat_turn(
            client,
            attachments,
            extractor,
            &system,
            &chat_session.messages,
            today,
        )
        .await
        {
            Ok(turn) => {
                println!("\nAssistant: {}\n", turn.reply);
                chat_session.messages.push(ChatMessage::assistant(&turn.reply));
                chat_session.add_events(&turn.events);
                chat_session.add_todos(&turn.todos);
                render_month(&chat_session, today.year(), today.month());
                render_todos(&chat_session);
            }
            Err(err) => println!("Chat error: {}", err),
        }
    }
}

// Text rendering of the month grid; days with events get a star.
fn render_month(chat_session: &ChatSession, year: i32, month: u32) {
    let Some(view) = MonthView::build(year, month, &chat_session.events) else {
        return;
    };
    println!("{}", view.label);
    let header: String = WEEKDAY_LABELS
        .iter()
        .map(|day| format!("{:>4}", day))
        .collect();
    println!("{}", header);
    for week in &view.weeks {
        let mut line = String::new();
        for cell in week {
            match cell {
                Some(day) if !day.events.is_empty() => line.push_str(&format!("{:>3}*", day.day)),
                Some(day) => line.push_str(&format!("{:>3} ", day.day)),
                None => line.push_str("    "),
            }
        }
        println!("{}", line);
    }
    for week in &view.weeks {
        for cell in week.iter().flatten() {
            for event in &cell.events {
                println!("  {}: {} ({})", cell.date, event.title, event.kind.label());
            }
        }
    }
}

fn render_todos(chat_session: &ChatSession) {
    if chat_session.todos.is_empty() {
        return;
    }
    let (completed, total, percent) = todo_progress(&chat_session.todos);
    println!("\nTo-Do List ({}/{} completed, {}%)", completed, total, percent);
    for todo in &chat_session.todos {
        let mark = if todo.completed { "x" } else { " " };
        match todo.date {
            Some(date) => println!("  [{}] {} ({})", mark, todo.text, date),
            None => println!("  [{}] {}", mark, todo.text),
        }
    }
}
