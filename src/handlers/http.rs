use std::sync::Arc;

use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use warp::Filter;
use warp::http::StatusCode;

use crate::clients::openai_client;
use crate::models::calendar::MonthView;
use crate::models::event::CalendarEvent;
use crate::models::message::ChatMessage;
use crate::models::todo::{TodoItem, todo_progress};
use crate::service::attachment_service::AttachmentService;
use crate::service::chat_flow::run_chat_turn;
use crate::service::extraction_service::EventExtractor;
use crate::service::openai_service::ChatClient;
use crate::session::{self, ChatSession, SessionStore};

// Base64-encoded PDFs ride inside the JSON body.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub client: Arc<dyn ChatClient>,
    pub attachments: Arc<AttachmentService>,
    pub extractor: Arc<EventExtractor>,
    pub timezone: Tz,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub events: Vec<CalendarEvent>,
    pub todos: Vec<TodoItem>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoItem>,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let chat = warp::post()
        .and(warp::path!("api" / "chat"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_chat);

    let calendar = warp::get()
        .and(warp::path!("api" / "calendar" / String))
        .and(warp::query::<CalendarQuery>())
        .and(with_state(state.clone()))
        .and_then(handle_calendar);

    let todo_toggle = warp::post()
        .and(warp::path!("api" / "todos" / String / String / "toggle"))
        .and(with_state(state.clone()))
        .and_then(handle_todo_toggle);

    let todo_list = warp::get()
        .and(warp::path!("api" / "todos" / String))
        .and(with_state(state.clone()))
        .and_then(handle_todo_list);

    let todo_clear = warp::delete()
        .and(warp::path!("api" / "todos" / String))
        .and(with_state(state))
        .and_then(handle_todo_clear);

    let health = warp::get()
        .and(warp::path!("health"))
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    health
        .or(chat)
        .or(calendar)
        .or(todo_toggle)
        .or(todo_list)
        .or(todo_clear)
}

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_chat(
    request: ChatRequest,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let now = Utc::now().with_timezone(&state.timezone);
    let system = openai_client::system_prompt(now, state.timezone.name());

    let turn = match run_chat_turn(
        state.client.as_ref(),
        &state.attachments,
        &state.extractor,
        &system,
        &request.messages,
        now.date_naive(),
    )
    .await
    {
        Ok(turn) => turn,
        Err(err) => {
            tracing::error!(error = %err, "chat relay failed");
            return Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: err.to_string(),
                }),
                StatusCode::BAD_GATEWAY,
            ));
        }
    };

    let session_id = request.session_id.unwrap_or_else(session::new_session_id);
    let response = {
        let mut store = state.store.lock().await;
        let chat_session = store
            .entry(session_id.clone())
            .or_insert_with(|| ChatSession::new(session_id.clone()));
        chat_session.replace_transcript(request.messages, &turn.reply);
        chat_session.add_events(&turn.events);
        chat_session.add_todos(&turn.todos);
        ChatResponse {
            session_id,
            reply: turn.reply,
            events: turn.events,
            todos: turn.todos,
        }
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::OK,
    ))
}

async fn handle_calendar(
    session_id: String,
    query: CalendarQuery,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let today = Utc::now().with_timezone(&state.timezone).date_naive();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    let store = state.store.lock().await;
    let Some(chat_session) = store.get(&session_id) else {
        return Ok(not_found("unknown session"));
    };
    match MonthView::build(year, month, &chat_session.events) {
        Some(view) => Ok(warp::reply::with_status(
            warp::reply::json(&view),
            StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody {
                error: format!("invalid month {}-{}", year, month),
            }),
            StatusCode::BAD_REQUEST,
        )),
    }
}

async fn handle_todo_list(
    session_id: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let store = state.store.lock().await;
    let Some(chat_session) = store.get(&session_id) else {
        return Ok(not_found("unknown session"));
    };
    let (completed, total, percent) = todo_progress(&chat_session.todos);
    Ok(warp::reply::with_status(
        warp::reply::json(&TodoListResponse {
            todos: chat_session.todos.clone(),
            completed,
            total,
            percent,
        }),
        StatusCode::OK,
    ))
}

async fn handle_todo_toggle(
    session_id: String,
    todo_id: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let mut store = state.store.lock().await;
    let Some(chat_session) = store.get_mut(&session_id) else {
        return Ok(not_found("unknown session"));
    };
    match chat_session.toggle_todo(&todo_id) {
        Some(completed) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "id": todo_id, "completed": completed })),
            StatusCode::OK,
        )),
        None => Ok(not_found("unknown todo")),
    }
}

async fn handle_todo_clear(
    session_id: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let mut store = state.store.lock().await;
    let Some(chat_session) = store.get_mut(&session_id) else {
        return Ok(not_found("unknown session"));
    };
    let cleared = chat_session.clear_todos();
    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "cleared": cleared })),
        StatusCode::OK,
    ))
}

fn not_found(message: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: message.to_string(),
        }),
        StatusCode::NOT_FOUND,
    )
}
