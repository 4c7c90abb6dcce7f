use serde::{Deserialize, Serialize};
use crate::{LensError, Result};

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 150;

/// Tone the future-self persona speaks in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Motivational,
    Calm,
    Funny,
    Friendly,
    Realistic,
}

impl Personality {
    pub fn all() -> &'static [Personality] {
        &[
            Personality::Motivational,
            Personality::Calm,
            Personality::Funny,
            Personality::Friendly,
            Personality::Realistic,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Personality::Motivational => "motivational",
            Personality::Calm => "calm",
            Personality::Funny => "funny",
            Personality::Friendly => "friendly",
            Personality::Realistic => "realistic",
        }
    }
}

/// Biographical details captured at onboarding.
/// Immutable once the chat page opens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub goals: String,
    pub fears: String,
    pub personality: Personality,
    pub philosophy: String,
    pub hobbies: String,
    pub role_models: String,
    pub past_experiences: String,
    pub upcoming_events: String,
}

impl UserProfile {
    /// Profile stub produced by the login step
    pub fn from_login(name: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            ..Self::default()
        }
    }

    /// Name and email, the only fields the login step collects.
    pub fn validate_login(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LensError::Validation("name is required".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LensError::Validation("a valid email is required".to_string()));
        }
        Ok(())
    }

    /// The full onboarding form: every field is required and age must be
    /// a whole number in range.
    pub fn validate(&self) -> Result<()> {
        self.validate_login()?;
        if self.age.trim().is_empty() {
            return Err(LensError::Validation("age is required".to_string()));
        }
        if parse_age(&self.age).is_none() {
            return Err(LensError::Validation(format!(
                "age must be between {} and {}",
                MIN_AGE, MAX_AGE
            )));
        }
        for (label, value) in self.required_text_fields() {
            if value.trim().is_empty() {
                return Err(LensError::Validation(format!("{} is required", label)));
            }
        }
        Ok(())
    }

    fn required_text_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("gender", &self.gender),
            ("goals", &self.goals),
            ("fears", &self.fears),
            ("philosophy", &self.philosophy),
            ("hobbies", &self.hobbies),
            ("role models", &self.role_models),
            ("past experiences", &self.past_experiences),
            ("upcoming events", &self.upcoming_events),
        ]
    }
}

fn parse_age(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value
        .parse::<u32>()
        .ok()
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
}

/// Whether a typed age value may replace the current field content.
/// Empty clears the field; anything else must be digits within range.
pub fn accept_age_input(candidate: &str) -> bool {
    candidate.is_empty() || parse_age(candidate).is_some()
}

/// Step the age field up or down, clamped to the valid range.
pub fn step_age(current: &str, delta: i64) -> String {
    let base = current.parse::<i64>().unwrap_or(0);
    let stepped = (base + delta).clamp(MIN_AGE as i64, MAX_AGE as i64);
    stepped.to_string()
}
