//! Gemini REST wire format.
//!
//! Request bodies are built as `serde_json::Value`; responses are decoded
//! into the typed structs below. Everything here is pure so it can be tested
//! without a network.

use serde::Deserialize;
use serde_json::{json, Value};

use lens_core::ports::{GenerationEvent, GenerationRequest, Tool};
use lens_types::{LensError, Result, message::GroundingSource};

// ─── Request bodies ──────────────────────────────────────────

/// Body for `generateContent` / `streamGenerateContent` chat turns.
///
/// History turns with no text are skipped; the API rejects empty parts.
pub fn chat_body(req: &GenerationRequest) -> Value {
    let mut contents: Vec<Value> = req
        .history
        .iter()
        .filter(|turn| !turn.text.is_empty())
        .map(|turn| {
            json!({
                "role": turn.sender.api_role(),
                "parts": [{ "text": turn.text }],
            })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": req.message }],
    }));

    let mut body = json!({
        "contents": contents,
        "systemInstruction": { "parts": [{ "text": req.system_instruction }] },
    });

    if let Some(budget) = req.config.thinking_budget {
        body["generationConfig"] = json!({
            "thinkingConfig": { "thinkingBudget": budget }
        });
    }

    if !req.tools.is_empty() {
        let tools: Vec<Value> = req
            .tools
            .iter()
            .map(|tool| match tool {
                Tool::GoogleSearch => json!({ "googleSearch": {} }),
            })
            .collect();
        body["tools"] = json!(tools);
    }

    body
}

/// Body asking for a transcription of an inline audio clip.
pub fn transcription_body(base64_audio: &str, mime_type: &str, prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": mime_type, "data": base64_audio } },
                { "text": prompt },
            ]
        }]
    })
}

/// Body asking the TTS model to speak `text`.
pub fn speech_body(text: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": text }] }],
        "generationConfig": { "responseModalities": ["AUDIO"] },
    })
}

// ─── Response types ──────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    /// Thought summaries are never shown to the user
    #[serde(default)]
    pub thought: bool,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

impl ApiError {
    pub fn describe(&self) -> String {
        match (self.code, &self.status) {
            (Some(code), Some(status)) => format!("{} {}: {}", code, status, self.message),
            (Some(code), None) => format!("{}: {}", code, self.message),
            (None, Some(status)) => format!("{}: {}", status, self.message),
            (None, None) => self.message.clone(),
        }
    }
}

impl GenerateResponse {
    /// Visible text of the first candidate, thought parts excluded.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Web sources cited by the first candidate, in response order.
    pub fn sources(&self) -> Vec<GroundingSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        let uri = web.uri.clone()?;
                        let title = web.title.clone().unwrap_or_default();
                        Some(GroundingSource::new(uri, title))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First inline audio payload, base64 encoded.
    pub fn inline_audio(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .map(|inline| inline.data.clone())
    }
}

// ─── Decoding ────────────────────────────────────────────────

pub fn parse_response(body: &str) -> Result<GenerateResponse> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LensError::Llm(format!("Malformed response: {}", e)))?;
    if let Some(err) = &response.error {
        return Err(LensError::Llm(err.describe()));
    }
    Ok(response)
}

/// Turn one SSE `data:` payload into generation events.
pub fn parse_stream_chunk(data: &str) -> Vec<GenerationEvent> {
    let response = match parse_response(data) {
        Ok(r) => r,
        Err(e) => return vec![GenerationEvent::Error(e.to_string())],
    };

    let mut events = Vec::new();
    let text = response.text();
    if !text.is_empty() {
        events.push(GenerationEvent::Delta(text));
    }
    let sources = response.sources();
    if !sources.is_empty() {
        events.push(GenerationEvent::Sources(sources));
    }
    events
}

/// Human-readable message for a non-2xx response body.
pub fn http_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("HTTP {}: {}", status, envelope.error.describe()),
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}
