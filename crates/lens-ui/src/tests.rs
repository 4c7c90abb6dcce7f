#[cfg(test)]
mod tests {
    use crate::panels::chat::source_label;
    use crate::panels::settings::storage_label;
    use crate::state::*;
    use crate::theme::palette;
    use lens_core::voice::TRANSCRIBING_PLACEHOLDER;
    use lens_types::{
        LensError,
        config::{StorageBackendType, Theme},
        event::ChatEvent,
        message::GroundingSource,
        profile::Personality,
    };

    fn logged_in() -> UiState {
        let mut state = UiState::new();
        state.login_name = "  Ada ".to_string();
        state.login_email = "ada@example.com".to_string();
        state.submit_login().unwrap();
        state
    }

    /// Logged in with every profile field filled
    fn filled_in() -> UiState {
        let mut state = logged_in();
        let draft = &mut state.profile_draft;
        draft.age = "34".to_string();
        draft.gender = "Female".to_string();
        draft.goals = "Write a novel".to_string();
        draft.fears = "Running out of time".to_string();
        draft.philosophy = "Stoicism".to_string();
        draft.hobbies = "Climbing".to_string();
        draft.role_models = "Ursula K. Le Guin".to_string();
        draft.past_experiences = "Moved abroad".to_string();
        draft.upcoming_events = "Book launch".to_string();
        state
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert_eq!(state.screen, Screen::Login);
        assert!(state.profile.is_none());
        assert!(state.input_text.is_empty());
        assert!(!state.busy);
        assert!(!state.recording);
        assert!(!state.show_settings);
        assert!(state.sidebar_open);
        assert_eq!(state.status_text, "Ready");
        assert!(!state.can_send());
    }

    #[test]
    fn test_ui_state_turn_lifecycle() {
        let mut state = UiState::new();
        state.process_events(vec![
            ChatEvent::TurnStart { thread_id: "t".to_string(), turn_id: 1 },
            ChatEvent::ModelSelected { model: "gemini-2.5-flash".to_string(), web_search: true },
        ]);
        assert!(state.busy);
        assert_eq!(state.status_text, "Consulting your future self...");
        assert_eq!(state.model_badge, Some(("gemini-2.5-flash".to_string(), true)));

        state.process_events(vec![
            ChatEvent::Delta { thread_id: "t".to_string(), text: "Hi".to_string() },
            ChatEvent::SourcesAttached { thread_id: "t".to_string(), count: 2 },
        ]);
        assert!(state.busy);
        assert_eq!(state.status_text, "2 sources attached");

        state.process_events(vec![ChatEvent::TurnEnd { thread_id: "t".to_string(), turn_id: 1 }]);
        assert!(!state.busy);
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_turn_failed() {
        let mut state = UiState::new();
        state.busy = true;
        state.process_events(vec![ChatEvent::TurnFailed {
            thread_id: "t".to_string(),
            message: "quota".to_string(),
        }]);
        assert!(!state.busy);
        assert_eq!(state.status_text, "Error: quota");
    }

    #[test]
    fn test_ui_state_superseded_keeps_busy() {
        let mut state = UiState::new();
        state.busy = true;
        state.process_events(vec![ChatEvent::TurnSuperseded { thread_id: "t".to_string(), turn_id: 1 }]);
        assert!(state.busy);
    }

    #[test]
    fn test_ui_state_transcription() {
        let mut state = UiState::new();
        state.recording = true;
        state.process_events(vec![ChatEvent::TranscriptionStart]);
        assert!(state.transcribing);
        assert!(state.busy);
        assert_eq!(state.input_text, TRANSCRIBING_PLACEHOLDER);
        assert!(!state.can_send());

        state.recording = false;
        state.process_events(vec![ChatEvent::TranscriptionDone { text: "hello there".to_string() }]);
        assert!(!state.transcribing);
        assert!(!state.busy);
        assert_eq!(state.input_text, "hello there");
        assert!(state.can_send());
    }

    #[test]
    fn test_ui_state_speaking() {
        let mut state = UiState::new();
        let key = message_key("t1", 3);
        state.process_events(vec![ChatEvent::SpeakingStarted { key: key.clone() }]);
        assert!(state.is_speaking(&key));
        assert!(!state.is_speaking("t1:4"));

        state.process_events(vec![ChatEvent::SpeakingStopped]);
        assert!(!state.is_speaking(&key));
    }

    #[test]
    fn test_ui_state_alert_stops_recording() {
        let mut state = UiState::new();
        state.recording = true;
        state.process_events(vec![ChatEvent::Alert { message: "Microphone access denied".to_string() }]);
        assert!(!state.recording);
        assert_eq!(state.alert.as_deref(), Some("Microphone access denied"));

        state.dismiss_alert();
        assert!(state.alert.is_none());
    }

    // ─── Onboarding Tests ────────────────────────────────────

    #[test]
    fn test_submit_login_valid() {
        let state = logged_in();
        assert_eq!(state.screen, Screen::Profile);
        assert_eq!(state.profile_draft.name, "Ada");
        assert_eq!(state.profile_draft.email, "ada@example.com");
        assert!(state.form_error.is_none());
    }

    #[test]
    fn test_submit_login_invalid() {
        let mut state = UiState::new();
        state.login_name = "Ada".to_string();
        state.login_email = "not-an-email".to_string();
        let err = state.submit_login().unwrap_err();
        assert!(matches!(err, LensError::Validation(_)));
        assert_eq!(state.screen, Screen::Login);
        assert!(state.form_error.is_some());

        state.login_email = "ada@example.com".to_string();
        state.login_name = "   ".to_string();
        assert!(state.submit_login().is_err());
        assert_eq!(state.screen, Screen::Login);
    }

    #[test]
    fn test_submit_profile() {
        let mut state = filled_in();
        state.profile_draft.personality = Personality::Calm;

        let profile = state.submit_profile().unwrap();
        assert_eq!(state.screen, Screen::Chat);
        assert_eq!(profile.goals, "Write a novel");
        assert_eq!(state.profile.as_ref(), Some(&profile));
    }

    #[test]
    fn test_submit_profile_rejects_bad_age() {
        let mut state = filled_in();
        state.profile_draft.age = "200".to_string();
        assert!(state.submit_profile().is_err());
        assert_eq!(state.screen, Screen::Profile);
        assert!(state.profile.is_none());
        assert!(state.form_error.as_deref().unwrap_or("").contains("age"));
    }

    #[test]
    fn test_submit_profile_requires_every_field() {
        let mut state = logged_in();
        state.profile_draft.age = "34".to_string();
        assert!(state.submit_profile().is_err());
        assert_eq!(state.form_error.as_deref(), Some("Invalid input: gender is required"));
        assert_eq!(state.screen, Screen::Profile);

        let mut state = filled_in();
        state.profile_draft.hobbies = "   ".to_string();
        assert!(state.submit_profile().is_err());
        assert_eq!(state.form_error.as_deref(), Some("Invalid input: hobbies is required"));

        state.profile_draft.hobbies = "Climbing".to_string();
        assert!(state.submit_profile().is_ok());
        assert!(state.form_error.is_none());
    }

    #[test]
    fn test_start_over_resets_flow() {
        let mut state = filled_in();
        state.submit_profile().unwrap();
        state.open_about();
        state.input_text = "draft".to_string();
        state.sidebar_open = false;
        state.busy = true;

        state.start_over();
        assert_eq!(state.screen, Screen::Login);
        assert!(state.profile.is_none());
        assert!(state.input_text.is_empty());
        assert!(!state.busy);
        assert!(!state.show_about);
        assert!(!state.sidebar_open);
    }

    #[test]
    fn test_about_open_and_close() {
        let mut state = UiState::new();
        assert!(!state.show_about);
        state.open_about();
        assert!(state.show_about);
        state.close_about();
        assert!(!state.show_about);
    }

    // ─── Input Tests ─────────────────────────────────────────

    #[test]
    fn test_take_input_keeps_raw_text_and_clears() {
        let mut state = UiState::new();
        state.input_text = "tell me about dogs ".to_string();
        assert_eq!(state.take_input().as_deref(), Some("tell me about dogs "));
        assert!(state.input_text.is_empty());
        assert!(state.take_input().is_none());
    }

    #[test]
    fn test_take_input_blocked_while_busy() {
        let mut state = UiState::new();
        state.input_text = "hello".to_string();
        state.busy = true;
        assert!(state.take_input().is_none());
        assert_eq!(state.input_text, "hello");

        state.busy = false;
        state.recording = true;
        assert!(state.take_input().is_none());
    }

    #[test]
    fn test_take_input_whitespace_only() {
        let mut state = UiState::new();
        state.input_text = "   \n ".to_string();
        assert!(!state.can_send());
        assert!(state.take_input().is_none());
    }

    // ─── Delete Confirmation Tests ───────────────────────────

    #[test]
    fn test_delete_confirm() {
        let mut state = UiState::new();
        state.request_delete("t1");
        assert_eq!(state.pending_delete.as_deref(), Some("t1"));
        assert_eq!(state.confirm_delete().as_deref(), Some("t1"));
        assert!(state.pending_delete.is_none());
        assert!(state.confirm_delete().is_none());
    }

    #[test]
    fn test_delete_cancel() {
        let mut state = UiState::new();
        state.request_delete("t1");
        state.cancel_delete();
        assert!(state.confirm_delete().is_none());
    }

    // ─── Helper Tests ────────────────────────────────────────

    #[test]
    fn test_message_key() {
        assert_eq!(message_key("abc", 0), "abc:0");
        assert_ne!(message_key("abc", 1), message_key("abd", 1));
    }

    #[test]
    fn test_source_label() {
        let titled = GroundingSource::new("https://example.com/a", "Example");
        assert_eq!(source_label(&titled), "Example");

        let untitled = GroundingSource::new("https://news.example.org/path?q=1", "");
        assert_eq!(source_label(&untitled), "news.example.org");

        let bare = GroundingSource::new("example.net", " ");
        assert_eq!(source_label(&bare), "example.net");
    }

    #[test]
    fn test_storage_labels() {
        assert_eq!(storage_label(StorageBackendType::Auto), "Auto-detect");
        assert_eq!(storage_label(StorageBackendType::LocalStorage), "Local Storage");
    }

    #[test]
    fn test_palettes_distinct() {
        let themes = Theme::all();
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(palette(*a).accent, palette(*b).accent);
            }
        }
    }
}
