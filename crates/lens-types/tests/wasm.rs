//! WASM-target tests for lens-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use lens_types::config::*;
use lens_types::error::*;
use lens_types::event::*;
use lens_types::message::*;
use lens_types::profile::*;
use lens_types::thread::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_user() {
    let msg = ChatMessage::user("Hello");
    assert_eq!(msg.sender, Sender::User);
    assert_eq!(msg.text, "Hello");
    assert!(msg.sources.is_empty());
    assert!(msg.feedback.is_none());
    assert!(!msg.is_ai());
}

#[wasm_bindgen_test]
fn message_serialization_roundtrip() {
    let mut msg = ChatMessage::ai("Look ahead");
    msg.sources.push(GroundingSource::new("https://a.example", "A"));
    let json = serde_json::to_string(&msg).unwrap();
    let back: ChatMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

#[wasm_bindgen_test]
fn sender_roles() {
    assert_eq!(Sender::User.api_role(), "user");
    assert_eq!(Sender::Ai.api_role(), "model");
    assert_eq!(Sender::Ai.transcript_label(), "AI");
}

// ─── Profile Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn profile_from_login_validates() {
    let profile = UserProfile::from_login(" Ada ", "ada@example.com");
    assert_eq!(profile.name, "Ada");
    assert!(profile.validate_login().is_ok());
}

#[wasm_bindgen_test]
fn age_input_bounds() {
    assert!(accept_age_input("42"));
    assert!(!accept_age_input("0"));
    assert!(!accept_age_input("151"));
    assert_eq!(step_age("150", 1), "150");
    assert_eq!(step_age("", 1), "1");
}

// ─── Thread Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn thread_title_truncates() {
    assert_eq!(title_from_message(&"x".repeat(50)).len(), TITLE_MAX_CHARS);
    let thread = ConversationThread::new("t1".to_string());
    assert_eq!(thread.title, DEFAULT_THREAD_TITLE);
}

// ─── Event Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn chat_event_roundtrip() {
    let event = ChatEvent::SpeakingStarted { key: "t1:3".to_string() };
    let json = serde_json::to_string(&event).unwrap();
    let back: ChatEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn default_config() {
    let config = AppConfig::default();
    assert_eq!(config.llm.base_url(), DEFAULT_API_BASE);
    assert_eq!(config.models.speech, "gemini-2.5-flash-preview-tts");
    assert_eq!(config.storage.backend, StorageBackendType::Auto);
    assert_eq!(config.theme, Theme::NeonBlue);
}

// ─── Error Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn error_display() {
    let err = LensError::Permission("microphone".to_string());
    assert_eq!(err.to_string(), "Permission denied: microphone");
}
