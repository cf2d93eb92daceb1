use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::message::ChatMessage;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

// The assistant prompt steers replies toward phrasing the extractor can scrape:
// explicit month/day dates, am/pm times, and "Todo:" lines with inline dates.
pub fn system_prompt(now: DateTime<Tz>, timezone: &str) -> String {
    format!(
        "You are a calendar assistant that helps users manage their schedule and tasks.\n\
         Current date and time: {now}\n\
         User timezone: {timezone}\n\
         \n\
         When users mention dates or request events to be added to the calendar:\n\
         1. Be specific about the activity rather than just saying \"busy\"\n\
         2. Use natural language to confirm the event was added\n\
         3. Don't use phrases like \"events for [date]\" in your response\n\
         \n\
         For example, good responses:\n\
         - \"I've added 'Meeting with colleagues' to your calendar on March 4th\"\n\
         - \"Your coffee date with Sam is now on your calendar for tomorrow at 3pm\"\n\
         \n\
         IMPORTANT: For any task or action item mentioned, ALWAYS include a separate formatted todo item WITH THE DATE.\n\
         For example, if adding a meeting to the calendar, also create a todo for preparation:\n\
         \n\
         Todo: Prepare for meeting with colleagues on March 4th\n\
         \n\
         Always include the date information directly in the todo text so users know when each task is needed.",
        now = now.to_rfc3339(),
        timezone = timezone,
    )
}

pub async fn chat_completion(
    system_prompt: &str,
    history: &[ChatMessage],
    model: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut messages = vec![OpenAIMessage {
        role: "system".to_string(),
        content: system_prompt.to_string(),
    }];
    // Only role/content go over the wire; attachments were already folded
    // into content by the pre-processor.
    messages.extend(history.iter().map(|message| OpenAIMessage {
        role: message.role.clone(),
        content: message.content.clone(),
    }));

    let request = OpenAIRequest {
        model: model.to_string(),
        messages,
        max_tokens: 1500,
        temperature: 0.7,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(COMPLETIONS_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        tracing::error!(%status, body = %text, "chat completion request failed");
        return Err(format!("Request failed with status {}", status).into());
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse completion JSON: {}\nRaw body: {}", e, text))?;

    match parsed.choices.first() {
        Some(choice) => Ok(choice.message.content.clone()),
        None => {
            tracing::error!(body = %text, "no choices in completion response");
            Err("No response from the model".to_string().into())
        }
    }
}
