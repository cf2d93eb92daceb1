use base64::Engine;

use crate::models::message::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentMode {
    // Ask the model to analyze the PDF by name.
    Note,
    // Pull the text out of the PDF and inline it into the message.
    Extract,
}

impl AttachmentMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("extract") => AttachmentMode::Extract,
            _ => AttachmentMode::Note,
        }
    }
}

pub struct AttachmentService {
    mode: AttachmentMode,
}

impl AttachmentService {
    pub fn new(mode: AttachmentMode) -> Self {
        Self { mode }
    }

    // Fold PDF attachments into message text before the relay call. Failures
    // never drop a message: the worst case is the original content plus an
    // analysis note.
    pub async fn preprocess(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut processed = Vec::with_capacity(messages.len());
        for message in messages {
            processed.push(self.expand(message).await);
        }
        processed
    }

    async fn expand(&self, message: &ChatMessage) -> ChatMessage {
        let Some(pdf) = message.pdf_attachment() else {
            return message.clone();
        };

        let addition = match self.mode {
            AttachmentMode::Note => analysis_note(&pdf.name),
            AttachmentMode::Extract => match pdf_text(&pdf.data).await {
                Ok(text) => format!("\n\nExtracted text from \"{}\":\n{}", pdf.name, text),
                Err(err) => {
                    tracing::warn!(
                        name = %pdf.name,
                        error = %err,
                        "pdf extraction failed, falling back to analysis note"
                    );
                    analysis_note(&pdf.name)
                }
            },
        };

        let mut expanded = message.clone();
        expanded.content.push_str(&addition);
        expanded
    }
}

fn analysis_note(name: &str) -> String {
    format!(
        "\n\nNote: I've uploaded a PDF file named \"{}\". Please analyze it for any events, meetings, appointments, or deadlines.",
        name
    )
}

async fn pdf_text(data: &str) -> Result<String, String> {
    let bytes = pdf_bytes(data).await?;
    extract_pdf_text(&bytes)
}

// Attachment data is either a base64 data URL, raw base64, or a URL to fetch.
async fn pdf_bytes(data: &str) -> Result<Vec<u8>, String> {
    if data.starts_with("data:") {
        let payload = data
            .split(',')
            .nth(1)
            .ok_or_else(|| "malformed data URL".to_string())?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| format!("failed to decode base64 payload: {}", e))
    } else if data.starts_with("http://") || data.starts_with("https://") {
        let response = reqwest::get(data)
            .await
            .map_err(|e| format!("failed to fetch attachment: {}", e))?;
        if !response.status().is_success() {
            return Err(format!(
                "attachment fetch returned status {}",
                response.status()
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read attachment body: {}", e))?;
        Ok(bytes.to_vec())
    } else {
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| format!("failed to decode base64 payload: {}", e))
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| format!("failed to parse PDF: {}", e))?;
    let mut text = String::new();
    for (page_num, _) in doc.get_pages() {
        let Ok(page_text) = doc.extract_text(&[page_num]) else {
            continue;
        };
        if !text.is_empty() {
            text.push_str(&format!("\n\n--- Page {} ---\n", page_num));
        }
        text.push_str(&page_text);
    }
    if text.trim().is_empty() {
        return Err("no extractable text in PDF".to_string());
    }
    Ok(text)
}
