//! Intent classification — fast pattern matching, no lookups.
//!
//! Rules are evaluated in order over lower-cased, trimmed text; the first
//! match wins:
//! 1. `go` / `go!` → `GoCommand`
//! 2. short text with a thanks marker → `ThankYou`
//! 3. anything that is not a bare greeting → `Question`
//! 4. otherwise → `Greeting`
//!
//! Punctuation is not normalized: `go please` is a question, not a command.

use std::sync::LazyLock;

use regex::Regex;

/// Thank-you messages are only recognized below this many characters.
pub const THANKS_MAX_CHARS: usize = 20;

const THANKS_MARKERS: &[&str] = &["merci", "thank"];

static BARE_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(salut|bonjour|bonsoir|hi|hello|bonne soirée|bonne journée)$")
        .expect("greeting pattern is valid")
});

/// Response category for an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    GoCommand,
    ThankYou,
    Question,
    Greeting,
}

impl Classification {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoCommand => "go_command",
            Self::ThankYou => "thank_you",
            Self::Question => "question",
            Self::Greeting => "greeting",
        }
    }
}

/// A single classification rule.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub class: Classification,
}

/// Ordered rule list, first match wins.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        name: "go command",
        matches: is_go_command,
        class: Classification::GoCommand,
    },
    IntentRule {
        name: "short thanks",
        matches: is_short_thanks,
        class: Classification::ThankYou,
    },
    IntentRule {
        name: "real question",
        matches: is_question,
        class: Classification::Question,
    },
];

/// Lower-case and trim.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn is_go_command(text: &str) -> bool {
    text == "go" || text == "go!"
}

fn is_short_thanks(text: &str) -> bool {
    text.chars().count() < THANKS_MAX_CHARS && THANKS_MARKERS.iter().any(|m| text.contains(m))
}

fn is_bare_greeting(text: &str) -> bool {
    BARE_GREETING.is_match(text)
}

fn is_question(text: &str) -> bool {
    !is_go_command(text) && !is_bare_greeting(text)
}

/// Classify raw message text.
pub fn classify(raw: &str) -> Classification {
    let text = normalize(raw);
    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| rule.class)
        .unwrap_or(Classification::Greeting)
}

/// Name of the rule that fired, for tracing.
pub fn matched_rule(raw: &str) -> &'static str {
    let text = normalize(raw);
    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map_or("fallback greeting", |rule| rule.name)
}

// ── Salutation ──────────────────────────────────────────────────────

/// Opening line of greeting and question replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Salutation {
    Bonjour,
    Salut,
    Bonsoir,
    BonApresMidi,
}

impl Salutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bonjour => "Bonjour",
            Self::Salut => "Salut!",
            Self::Bonsoir => "Bonsoir!",
            Self::BonApresMidi => "Bon après midi!",
        }
    }
}

/// Markers in priority order; first match wins.
const SALUTATION_MARKERS: &[(&str, Salutation)] = &[
    ("midi", Salutation::BonApresMidi),
    ("bonsoir", Salutation::Bonsoir),
    ("salut", Salutation::Salut),
];

/// Pick a salutation from greeting markers in the text.
pub fn salutation_for(raw: &str) -> Salutation {
    let text = raw.to_lowercase();
    SALUTATION_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map_or(Salutation::Bonjour, |(_, salutation)| *salutation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_command_variants() {
        assert_eq!(classify("go"), Classification::GoCommand);
        assert_eq!(classify("Go!"), Classification::GoCommand);
        assert_eq!(classify(" go "), Classification::GoCommand);
        assert_eq!(classify("GO"), Classification::GoCommand);
    }

    #[test]
    fn go_with_extra_words_is_not_a_command() {
        assert_ne!(classify("go please"), Classification::GoCommand);
        assert_eq!(classify("go please"), Classification::Question);
        assert_ne!(classify("go!!"), Classification::GoCommand);
    }

    #[test]
    fn short_thanks() {
        assert_eq!(classify("Merci"), Classification::ThankYou);
        assert_eq!(classify("Merci beaucoup!"), Classification::ThankYou);
        assert_eq!(classify("thanks"), Classification::ThankYou);
    }

    #[test]
    fn thanks_length_threshold() {
        let short = "merci pour tout !!";
        assert!(short.chars().count() < THANKS_MAX_CHARS);
        assert_eq!(classify(short), Classification::ThankYou);

        let long = "merci pour tout, vraiment";
        assert_eq!(long.chars().count(), 25);
        assert_eq!(classify(long), Classification::Question);
    }

    #[test]
    fn thanks_threshold_counts_characters_not_bytes() {
        // 18 characters, 20 bytes.
        let text = "merci, c'est réglé";
        assert!(text.len() >= THANKS_MAX_CHARS);
        assert_eq!(classify(text), Classification::ThankYou);
    }

    #[test]
    fn bare_greetings() {
        for text in ["Bonjour", "salut", " Hello ", "bonne journée", "BONSOIR"] {
            assert_eq!(classify(text), Classification::Greeting, "{text}");
        }
    }

    #[test]
    fn greeting_with_question_is_a_question() {
        assert_eq!(
            classify("Bonjour, comment ça marche?"),
            Classification::Question
        );
        assert_eq!(classify("Tarifs"), Classification::Question);
    }

    #[test]
    fn empty_text_is_a_question() {
        // Not a bare greeting and not the go command.
        assert_eq!(classify(""), Classification::Question);
    }

    #[test]
    fn rule_names_for_tracing() {
        assert_eq!(matched_rule("go"), "go command");
        assert_eq!(matched_rule("merci"), "short thanks");
        assert_eq!(matched_rule("Combien ça coûte?"), "real question");
        assert_eq!(matched_rule("hello"), "fallback greeting");
    }

    #[test]
    fn salutation_defaults_to_bonjour() {
        assert_eq!(salutation_for("Bonjour, comment ça marche?"), Salutation::Bonjour);
        assert_eq!(salutation_for("hello").as_str(), "Bonjour");
    }

    #[test]
    fn salutation_markers() {
        assert_eq!(salutation_for("Salut"), Salutation::Salut);
        assert_eq!(salutation_for("Bonsoir à vous"), Salutation::Bonsoir);
        assert_eq!(salutation_for("bon après-midi"), Salutation::BonApresMidi);
    }

    #[test]
    fn salutation_priority() {
        assert_eq!(salutation_for("salut, bonsoir"), Salutation::Bonsoir);
        assert_eq!(salutation_for("salut, bonsoir, midi"), Salutation::BonApresMidi);
    }

    #[test]
    fn classification_labels() {
        assert_eq!(Classification::GoCommand.label(), "go_command");
        assert_eq!(Classification::Greeting.label(), "greeting");
    }
}
