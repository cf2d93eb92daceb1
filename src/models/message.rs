use serde::{Deserialize, Serialize};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// File attachments arrive as either a base64 data URL or a plain URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub data: String,
}

impl FileItem {
    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(rename = "fileItems", default, skip_serializing_if = "Option::is_none")]
    pub file_items: Option<Vec<FileItem>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            file_items: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            file_items: None,
        }
    }

    pub fn pdf_attachment(&self) -> Option<&FileItem> {
        self.file_items.as_ref()?.iter().find(|item| item.is_pdf())
    }
}
