//! Gemini adapter.
//!
//! Implements the generation, transcription and speech ports against the
//! Gemini REST API using browser `fetch()` via gloo-net.
//!
//! Chat turns use `streamGenerateContent?alt=sse`. The response body is read
//! chunk by chunk from its `ReadableStream` on a spawned task, decoded with
//! [`SseDecoder`], and forwarded over an unbounded channel. Dropping the
//! returned stream closes the channel, which ends the read loop.

use async_trait::async_trait;
use futures::channel::mpsc;
use gloo_net::http::{Request, Response};
use js_sys::{Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use lens_core::ports::*;
use lens_core::sse::SseDecoder;
use lens_types::{
    LensError, Result,
    config::{LlmConfig, ModelPresets},
};

use super::wire;

pub struct GeminiClient {
    config: LlmConfig,
    presets: ModelPresets,
}

impl GeminiClient {
    pub fn new(config: LlmConfig, presets: ModelPresets) -> Self {
        Self { config, presets }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url(), model, method)
    }

    /// One non-streaming `generateContent` call.
    async fn generate(&self, model: &str, body: &Value) -> Result<wire::GenerateResponse> {
        let url = self.endpoint(model, "generateContent");
        let response = post_json(&url, &self.config.api_key, body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| LensError::Network(e.to_string()))?;
        wire::parse_response(&text)
    }
}

impl GenerationPort for GeminiClient {
    fn stream_generate(&self, req: GenerationRequest) -> GenerationStream {
        let (tx, rx) = mpsc::unbounded();
        let url = self.endpoint(&req.model, "streamGenerateContent?alt=sse");
        let body = wire::chat_body(&req);
        let api_key = self.config.api_key.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match post_json(&url, &api_key, &body).await {
                Ok(response) => pump_sse(response, &tx).await,
                Err(e) => Err(e),
            };
            let last = match outcome {
                Ok(()) => GenerationEvent::Done,
                Err(e) => {
                    log::error!("Gemini stream failed: {}", e);
                    GenerationEvent::Error(e.to_string())
                }
            };
            let _ = tx.unbounded_send(last);
        });

        Box::pin(rx)
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}

#[async_trait(?Send)]
impl TranscriptionPort for GeminiClient {
    async fn transcribe(&self, base64_audio: &str, mime_type: &str, prompt: &str) -> Result<String> {
        let body = wire::transcription_body(base64_audio, mime_type, prompt);
        let response = self.generate(&self.presets.transcription, &body).await?;
        Ok(response.text().trim().to_string())
    }
}

#[async_trait(?Send)]
impl SpeechPort for GeminiClient {
    async fn synthesize(&self, text: &str) -> Result<Option<String>> {
        let body = wire::speech_body(text);
        let response = self.generate(&self.presets.speech, &body).await?;
        Ok(response.inline_audio())
    }
}

async fn post_json(url: &str, api_key: &str, body: &Value) -> Result<Response> {
    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(body)
        .map_err(|e| LensError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| LensError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(LensError::Llm(wire::http_error_message(status, &text)));
    }
    Ok(response)
}

/// Read the response body to the end, forwarding each decoded frame.
/// Returns early (successfully) once the receiving side has gone away.
async fn pump_sse(response: Response, tx: &mpsc::UnboundedSender<GenerationEvent>) -> Result<()> {
    let body = response
        .body()
        .ok_or_else(|| LensError::Network("Response has no body".to_string()))?;
    let reader: ReadableStreamDefaultReader = body
        .get_reader()
        .dyn_into()
        .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;

    let mut decoder = SseDecoder::new();
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| LensError::Network(format!("{:?}", e)))?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map(|v| v.is_truthy())
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value"))
            .map_err(|e| LensError::JsInterop(format!("{:?}", e)))?;
        let bytes = Uint8Array::new(&value).to_vec();

        for payload in decoder.push(&bytes) {
            if !forward(&payload, tx) {
                let _ = reader.cancel();
                return Ok(());
            }
        }
    }

    if let Some(payload) = decoder.finish() {
        forward(&payload, tx);
    }
    Ok(())
}

/// Send the events of one payload; false once the receiver is dropped.
fn forward(payload: &str, tx: &mpsc::UnboundedSender<GenerationEvent>) -> bool {
    wire::parse_stream_chunk(payload)
        .into_iter()
        .all(|event| tx.unbounded_send(event).is_ok())
}
