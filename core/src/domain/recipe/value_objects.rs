use serde_json::Value;

/// One part of the user turn sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    InlineData { mime_type: String, data: String },
    Text(String),
}

/// Provider-neutral description of a single structured-output generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<ContentPart>,
    pub system_instruction: String,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl GenerationRequest {
    /// Text of the instruction part, if any.
    pub fn prompt_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            ContentPart::InlineData { .. } => None,
        })
    }

    pub fn inline_data_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, ContentPart::InlineData { .. }))
            .count()
    }
}
