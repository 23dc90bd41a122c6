use regex::Regex;

/// Persona triggers in priority order; group 1 is the candidate name
const PERSONA_PATTERNS: [&str; 6] = [
    r"act like (?:my |an? )?(\w+)",
    r"be (?:my |an? )?(\w+)",
    r"switch to (?:my |the )?(\w+)",
    r"(\w+) persona",
    r"(\w+) thread",
    r"back to (?:my |the )?(\w+)",
];

/// Captures that are filler words, never persona names
const STOP_WORDS: [&str; 7] = ["the", "a", "an", "my", "your", "this", "that"];

const SWITCH_INTENT_PATTERN: &str = r"back to|switch to|return to|go back to|resume|continue with";

/// Infers persona requests from free text
///
/// Implementations must be pure: the same text always yields the same answer.
pub trait PersonaExtractor: Send + Sync {
    /// Persona name requested by the text, if any
    fn extract(&self, text: &str) -> Option<String>;

    /// Whether the text asks to go back to an existing context.
    ///
    /// Informational: routing is decided by [`extract`](Self::extract) alone.
    fn is_switch_intent(&self, text: &str) -> bool;
}

/// Regex-backed extractor
///
/// The first pattern whose capture is not a stop word wins. A stop-word
/// capture moves on to the next pattern rather than ending the search.
pub struct PatternExtractor {
    patterns: Vec<Regex>,
    switch_intent: Option<Regex>,
}

impl PatternExtractor {
    pub fn new() -> Self {
        let patterns = PERSONA_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        Self {
            patterns,
            switch_intent: Regex::new(SWITCH_INTENT_PATTERN).ok(),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaExtractor for PatternExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();

        self.patterns.iter().find_map(|pattern| {
            let candidate = pattern.captures(&lowered)?.get(1)?.as_str();
            if STOP_WORDS.contains(&candidate) {
                None
            } else {
                Some(candidate.to_string())
            }
        })
    }

    fn is_switch_intent(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.switch_intent
            .as_ref()
            .is_some_and(|re| re.is_match(&lowered))
    }
}

/// Canonical thread-name key for a persona name
///
/// Lowercases, trims, turns spaces into underscores and drops anything
/// outside `[a-z0-9_]`. Idempotent.
pub fn normalize_thread_name(name: &str) -> String {
    name.to_lowercase()
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}
