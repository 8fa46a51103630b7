//! Oqool Classify: routing categories for incoming chat messages
//!
//! This crate decides, for each user message, which handling path it takes:
//! religious-source lookup, search-augmented answer, or a plain assistant
//! reply. Classification is deterministic and total: every input, including
//! the empty string, maps to exactly one [`QuestionType`].
//!
//! # Example
//!
//! ```
//! use oqool_classify::{classify, route, QuestionType, Route};
//!
//! let msg = "ما حكم شرب الخمر؟";
//! let result = classify(msg);
//! assert_eq!(result.kind, QuestionType::Religious);
//! assert_eq!(route(msg, &result), Route::ReligiousLookup);
//! ```

pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod router;

pub use matcher::{check_general_search, check_religious, check_technical};
pub use router::{route, Route};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum confidence for the helper predicates and for non-direct routes.
pub const CONFIDENCE_FLOOR: f64 = 0.7;

/// Routing category of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Request for a ruling or worship guidance
    #[serde(rename = "religious")]
    Religious,
    /// Needs a search-augmented answer
    #[serde(rename = "general")]
    GeneralInfo,
    /// Programming or tooling question
    #[serde(rename = "technical")]
    TechnicalCode,
    /// Plain conversational reply
    #[serde(rename = "ai_response")]
    AiResponse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Religious => "religious",
            QuestionType::GeneralInfo => "general",
            QuestionType::TechnicalCode => "technical",
            QuestionType::AiResponse => "ai_response",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Heuristic strength of the match, 0.0 to 1.0
    pub confidence: f64,
    /// Diagnostic justification
    pub reason: String,
    /// Matched trigger terms; empty when nothing domain-specific matched
    pub keywords: Vec<String>,
}

impl ClassificationResult {
    pub fn new(
        kind: QuestionType,
        confidence: f64,
        reason: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            kind,
            confidence,
            reason: reason.into(),
            keywords,
        }
    }

    /// What a detector answers when it does not fire.
    pub(crate) fn not_matched(reason: &str) -> Self {
        Self::new(QuestionType::AiResponse, 0.1, reason, Vec::new())
    }

    fn is_confident(&self, kind: QuestionType) -> bool {
        self.kind == kind && self.confidence >= CONFIDENCE_FLOOR
    }
}

/// How non-religious, non-trivial messages are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// Everything that is not a greeting or a religious question goes to search.
    #[default]
    SearchFirst,
    /// Run the technical and general-search detectors before falling back
    /// to a plain assistant reply.
    Layered,
}

impl FromStr for ClassifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search_first" | "search-first" => Ok(ClassifierMode::SearchFirst),
            "layered" => Ok(ClassifierMode::Layered),
            other => Err(format!("unknown classifier mode: {}", other)),
        }
    }
}

/// Priority-ordered classifier; the first branch that fires wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    mode: ClassifierMode,
}

impl Classifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ClassifierMode {
        self.mode
    }

    pub fn classify(&self, message: &str) -> ClassificationResult {
        let normalized = normalizer::normalize(message);

        if normalizer::is_trivial(&normalized) {
            return ClassificationResult::new(
                QuestionType::AiResponse,
                0.9,
                "greeting or trivial text",
                Vec::new(),
            );
        }

        // The exception branch of the religious detector answers GeneralInfo
        // and must short-circuit too.
        let religious = check_religious(message);
        if religious.kind != QuestionType::AiResponse {
            return religious;
        }

        match self.mode {
            ClassifierMode::SearchFirst => ClassificationResult::new(
                QuestionType::GeneralInfo,
                0.95,
                "direct search request",
                vec![lexicon::SEARCH_SENTINEL.to_string()],
            ),
            ClassifierMode::Layered => {
                let technical = check_technical(message);
                if technical.kind == QuestionType::TechnicalCode {
                    return technical;
                }
                check_general_search(message)
            }
        }
    }

    /// Classify and emit the result as a structured log event.
    pub fn log_classification(&self, message: &str) -> ClassificationResult {
        let result = self.classify(message);
        let preview: String = message.chars().take(50).collect();
        tracing::info!(
            question = %preview,
            kind = %result.kind,
            confidence = result.confidence,
            reason = %result.reason,
            keywords = ?result.keywords,
            "question classified"
        );
        result
    }

    pub fn is_religious_question(&self, message: &str) -> bool {
        self.classify(message).is_confident(QuestionType::Religious)
    }

    pub fn needs_general_search(&self, message: &str) -> bool {
        self.classify(message).is_confident(QuestionType::GeneralInfo)
    }

    pub fn is_technical_question(&self, message: &str) -> bool {
        self.classify(message).is_confident(QuestionType::TechnicalCode)
    }
}

/// Classify with the default search-first classifier.
pub fn classify(message: &str) -> ClassificationResult {
    Classifier::default().classify(message)
}

pub fn is_religious_question(message: &str) -> bool {
    Classifier::default().is_religious_question(message)
}

pub fn needs_general_search(message: &str) -> bool {
    Classifier::default().needs_general_search(message)
}

/// Always false under search-first; technical detection only runs in
/// [`ClassifierMode::Layered`].
pub fn is_technical_question(message: &str) -> bool {
    Classifier::default().is_technical_question(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_short_inputs() {
        for input in ["", "   ", "a", "ok", "هل", " x "] {
            let r = classify(input);
            assert_eq!(r.kind, QuestionType::AiResponse, "input {:?}", input);
            assert!(r.confidence >= 0.9);
            assert!(r.keywords.is_empty());
        }
    }

    #[test]
    fn test_greetings() {
        for input in ["السلام عليكم", "مرحباً بك", "Hello there", "سلام", "شكرا جزيلا"] {
            assert_eq!(classify(input).kind, QuestionType::AiResponse, "input {:?}", input);
        }
    }

    #[test]
    fn test_peace_inside_word_is_not_greeting() {
        let r = classify("الإسلام دين");
        assert_ne!(r.reason, "greeting or trivial text");
    }

    #[test]
    fn test_search_first_default() {
        let r = classify("اكتب دالة بايثون لحساب المضروب");
        assert_eq!(r.kind, QuestionType::GeneralInfo);
        assert_eq!(r.confidence, 0.95);
        assert_eq!(r.keywords, vec!["ابحث".to_string()]);
        assert!(!is_technical_question("اكتب دالة بايثون لحساب المضروب"));
    }

    #[test]
    fn test_layered_mode_reaches_technical() {
        let classifier = Classifier::new(ClassifierMode::Layered);
        let r = classifier.classify("اكتب دالة بايثون لحساب المضروب");
        assert_eq!(r.kind, QuestionType::TechnicalCode);
        assert!(classifier.is_technical_question("اكتب دالة بايثون لحساب المضروب"));
    }

    #[test]
    fn test_layered_mode_falls_back_to_assistant() {
        let classifier = Classifier::new(ClassifierMode::Layered);
        let r = classifier.classify("احكيلي نكتة");
        assert_eq!(r.kind, QuestionType::AiResponse);
        assert!(!classifier.needs_general_search("احكيلي نكتة"));
    }

    #[test]
    fn test_helpers() {
        assert!(is_religious_question("ما حكم شرب الخمر؟"));
        assert!(!needs_general_search("ما حكم شرب الخمر؟"));
        assert!(needs_general_search("ما هو الإسلام"));
        assert!(needs_general_search("أسعار الذهب اليوم"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("layered".parse::<ClassifierMode>(), Ok(ClassifierMode::Layered));
        assert_eq!("Search-First".parse::<ClassifierMode>(), Ok(ClassifierMode::SearchFirst));
        assert!("scored".parse::<ClassifierMode>().is_err());
    }

    #[test]
    fn test_result_serializes_with_type_field() {
        let json = serde_json::to_value(classify("مرحبا")).unwrap();
        assert_eq!(json["type"], "ai_response");
        assert_eq!(json["reason"], "greeting or trivial text");
    }
}
