//! WASM-target tests for lens-platform (Node.js runtime).
//!
//! Tests MemoryStorage and the Gemini wire format under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage, MediaRecorder and Web Audio need a browser and are not
//! covered here.

use wasm_bindgen_test::*;

use lens_core::ports::*;
use lens_platform::llm::wire::*;
use lens_platform::storage::MemoryStorage;
use lens_types::message::{GroundingSource, Sender};

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("chatHistory", b"[]").await.unwrap();
    let result = storage.get("chatHistory").await.unwrap();
    assert_eq!(result, Some(b"[]".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap(), Some(b"v2".to_vec()));
    assert_eq!(storage.len(), 1);
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
    assert!(storage.is_empty());
}

#[wasm_bindgen_test]
async fn memory_storage_delete_nonexistent() {
    let storage = MemoryStorage::new();
    storage.delete("nonexistent").await.unwrap();
}

#[wasm_bindgen_test]
async fn memory_storage_exists() {
    let storage = MemoryStorage::new();
    assert!(!storage.exists("key").await.unwrap());
    storage.set("key", b"x").await.unwrap();
    assert!(storage.exists("key").await.unwrap());
}

// ─── Request Body Tests ──────────────────────────────────

fn request(tools: Vec<Tool>, thinking_budget: Option<u32>) -> GenerationRequest {
    GenerationRequest {
        model: "gemini-2.5-flash".to_string(),
        config: GenerationConfig { thinking_budget },
        tools,
        system_instruction: "You ARE the future".to_string(),
        history: vec![
            HistoryTurn { sender: Sender::Ai, text: "Welcome".to_string() },
            HistoryTurn { sender: Sender::User, text: "hi".to_string() },
            HistoryTurn { sender: Sender::Ai, text: String::new() },
        ],
        message: "what now".to_string(),
    }
}

#[wasm_bindgen_test]
fn chat_body_maps_roles_and_skips_empty_turns() {
    let body = chat_body(&request(Vec::new(), None));
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "model");
    assert_eq!(contents[1]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "what now");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You ARE the future");
    assert!(body.get("tools").is_none());
    assert!(body.get("generationConfig").is_none());
}

#[wasm_bindgen_test]
fn chat_body_carries_search_and_thinking() {
    let body = chat_body(&request(vec![Tool::GoogleSearch], Some(32768)));
    assert_eq!(body["tools"][0], serde_json::json!({ "googleSearch": {} }));
    assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 32768);
}

#[wasm_bindgen_test]
fn transcription_body_inlines_audio() {
    let body = transcription_body("AAAA", "audio/webm", "Transcribe this audio clip.");
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/webm");
    assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
    assert_eq!(parts[1]["text"], "Transcribe this audio clip.");
}

#[wasm_bindgen_test]
fn speech_body_requests_audio() {
    let body = speech_body("hello");
    assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
}

// ─── Response Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn stream_chunk_yields_text_delta() {
    let events = parse_stream_chunk(
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#,
    );
    assert_eq!(events, vec![GenerationEvent::Delta("Hello".to_string())]);
}

#[wasm_bindgen_test]
fn stream_chunk_skips_thought_parts() {
    let events = parse_stream_chunk(
        r#"{"candidates":[{"content":{"parts":[{"text":"musing","thought":true},{"text":"answer"}]}}]}"#,
    );
    assert_eq!(events, vec![GenerationEvent::Delta("answer".to_string())]);
}

#[wasm_bindgen_test]
fn stream_chunk_extracts_grounding() {
    let events = parse_stream_chunk(
        r#"{"candidates":[{"groundingMetadata":{"groundingChunks":[
            {"web":{"uri":"https://a.example","title":"A"}},
            {"web":{"uri":"https://b.example"}},
            {"retrievedContext":{}}
        ]}}]}"#,
    );
    assert_eq!(
        events,
        vec![GenerationEvent::Sources(vec![
            GroundingSource::new("https://a.example", "A"),
            GroundingSource::new("https://b.example", ""),
        ])]
    );
}

#[wasm_bindgen_test]
fn stream_chunk_reports_api_error() {
    let events = parse_stream_chunk(
        r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
    );
    match &events[..] {
        [GenerationEvent::Error(message)] => assert!(message.contains("429")),
        other => panic!("unexpected events {:?}", other),
    }
}

#[wasm_bindgen_test]
fn stream_chunk_rejects_malformed_json() {
    let events = parse_stream_chunk("{not json");
    assert!(matches!(events[..], [GenerationEvent::Error(_)]));
}

#[wasm_bindgen_test]
fn response_inline_audio() {
    let response = parse_response(
        r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"audio/L16;rate=24000","data":"AAEC"}}]}}]}"#,
    )
    .unwrap();
    assert_eq!(response.inline_audio(), Some("AAEC".to_string()));
    assert_eq!(response.text(), "");
}

#[wasm_bindgen_test]
fn http_error_message_formats() {
    assert_eq!(
        http_error_message(400, r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#),
        "HTTP 400: 400 INVALID_ARGUMENT: API key not valid"
    );
    assert_eq!(http_error_message(503, ""), "HTTP 503");
    assert_eq!(http_error_message(502, "bad gateway"), "HTTP 502: bad gateway");
}
