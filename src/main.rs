#![allow(non_snake_case)]

use std::env;
use std::sync::Arc;

use calendarAssistant::cli;
use calendarAssistant::config::AppConfig;
use calendarAssistant::handlers::http::AppState;
use calendarAssistant::runtime;
use calendarAssistant::service::attachment_service::{AttachmentMode, AttachmentService};
use calendarAssistant::service::extraction_service::EventExtractor;
use calendarAssistant::service::openai_service::{ChatClient, OpenAIService};
use calendarAssistant::session;

const DEFAULT_RUN_MODE: &str = "cli";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEZONE: &str = "America/New_York";
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let openai_api_key = get_prop("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY environment variable not set");
    let model = get_prop("OPENAI_MODEL").unwrap_or(DEFAULT_MODEL.to_string());
    let timezone = get_prop("TIMEZONE")
        .unwrap_or(DEFAULT_TIMEZONE.to_string())
        .parse::<chrono_tz::Tz>()
        .expect("TIMEZONE must be a valid IANA timezone name");
    let attachment_mode = AttachmentMode::parse(get_prop("ATTACHMENT_MODE").as_deref());

    let client: Arc<dyn ChatClient> = Arc::new(OpenAIService::new(openai_api_key, model));
    let extractor = EventExtractor::new().expect("extraction patterns must compile");

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let port = get_prop("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let state = AppState {
            store: session::new_store(),
            client,
            attachments: Arc::new(AttachmentService::new(attachment_mode)),
            extractor: Arc::new(extractor),
            timezone,
        };
        runtime::run_api(state, port).await;
    } else if run_mode == "cli" {
        cli::cli(
            client,
            AttachmentService::new(attachment_mode),
            extractor,
            timezone,
        )
        .await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
