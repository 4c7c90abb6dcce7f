//! Model/tool selection.
//!
//! An ordered table of tagged rules evaluated top to bottom against the
//! lower-cased utterance. The first rule whose predicate matches decides the
//! model, generation config and tools. The last rule always matches.

use lens_types::config::ModelPresets;
use crate::ports::{GenerationConfig, Tool};

const CREATIVE_KEYWORDS: &[&str] = &[
    "imagine",
    "what if",
    "write a",
    "create a",
    "poem",
    "story",
    "code",
    "script",
    "plan",
    "analyze",
    "explain in detail",
    "philosophy",
];

const SEARCH_KEYWORDS: &[&str] = &[
    "who is",
    "what is",
    "latest",
    "news",
    "current",
    "how to",
    "what happened",
    "in 202",
];

/// Which rule produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTag {
    Creative,
    Informational,
    Short,
    Balanced,
}

/// Result of running the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub rule: RuleTag,
    pub model: String,
    pub config: GenerationConfig,
    pub tools: Vec<Tool>,
}

impl ModelSelection {
    pub fn uses_web_search(&self) -> bool {
        self.tools.contains(&Tool::GoogleSearch)
    }
}

/// The utterance as the predicates see it
pub struct Utterance<'a> {
    pub raw: &'a str,
    pub lower: String,
}

impl<'a> Utterance<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    /// Number of pieces when split on single spaces; "" counts as one.
    pub fn word_count(&self) -> usize {
        self.raw.split(' ').count()
    }

    fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.lower.contains(kw))
    }
}

/// A predicate/outcome pair
pub struct Rule {
    pub tag: RuleTag,
    pub matches: fn(&Utterance) -> bool,
    pub outcome: fn(&ModelPresets) -> (String, GenerationConfig, Vec<Tool>),
}

fn is_creative(u: &Utterance) -> bool {
    u.contains_any(CREATIVE_KEYWORDS)
}

fn is_informational(u: &Utterance) -> bool {
    u.contains_any(SEARCH_KEYWORDS) || (u.lower.contains('?') && u.word_count() > 4)
}

fn is_short(u: &Utterance) -> bool {
    u.word_count() < 5
}

fn always(_: &Utterance) -> bool {
    true
}

fn reasoning_outcome(m: &ModelPresets) -> (String, GenerationConfig, Vec<Tool>) {
    let config = GenerationConfig {
        thinking_budget: Some(m.reasoning_budget),
    };
    (m.reasoning.clone(), config, Vec::new())
}

fn search_outcome(m: &ModelPresets) -> (String, GenerationConfig, Vec<Tool>) {
    (m.search.clone(), GenerationConfig::default(), vec![Tool::GoogleSearch])
}

fn fast_outcome(m: &ModelPresets) -> (String, GenerationConfig, Vec<Tool>) {
    (m.fast.clone(), GenerationConfig::default(), Vec::new())
}

fn balanced_outcome(m: &ModelPresets) -> (String, GenerationConfig, Vec<Tool>) {
    (m.balanced.clone(), GenerationConfig::default(), Vec::new())
}

/// Rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule { tag: RuleTag::Creative, matches: is_creative, outcome: reasoning_outcome },
    Rule { tag: RuleTag::Informational, matches: is_informational, outcome: search_outcome },
    Rule { tag: RuleTag::Short, matches: is_short, outcome: fast_outcome },
    Rule { tag: RuleTag::Balanced, matches: always, outcome: balanced_outcome },
];

/// Pick the model, config and tools for the latest user utterance.
pub fn select_model(query: &str, presets: &ModelPresets) -> ModelSelection {
    let utterance = Utterance::new(query);
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(&utterance))
        .unwrap_or(&RULES[RULES.len() - 1]);

    let (model, config, tools) = (rule.outcome)(presets);
    log::debug!("selector: rule {:?} -> {}", rule.tag, model);

    ModelSelection {
        rule: rule.tag,
        model,
        config,
        tools,
    }
}
