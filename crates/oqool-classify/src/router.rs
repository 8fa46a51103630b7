//! Chat routing: which downstream path handles a classified message.
//!
//! The router only names the path; formatting and provider calls live
//! outside this crate.

use crate::{lexicon, ClassificationResult, QuestionType, CONFIDENCE_FLOOR};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// Religious-source lookup and fatwa formatting
    ReligiousLookup,
    /// Search-augmented answer; `advanced` selects multi-source search
    SearchAugmented { advanced: bool },
    /// Plain passthrough to the conversational model
    DirectLlm,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Route::ReligiousLookup => write!(f, "religious_lookup"),
            Route::SearchAugmented { advanced: true } => write!(f, "search_augmented(advanced)"),
            Route::SearchAugmented { advanced: false } => write!(f, "search_augmented"),
            Route::DirectLlm => write!(f, "direct_llm"),
        }
    }
}

/// Pick the route for `message` given its classification.
pub fn route(message: &str, result: &ClassificationResult) -> Route {
    if result.confidence < CONFIDENCE_FLOOR {
        return Route::DirectLlm;
    }

    match result.kind {
        QuestionType::Religious => Route::ReligiousLookup,
        QuestionType::GeneralInfo => Route::SearchAugmented {
            advanced: is_advanced_search(message),
        },
        QuestionType::TechnicalCode | QuestionType::AiResponse => Route::DirectLlm,
    }
}

pub fn is_advanced_search(message: &str) -> bool {
    let lower = message.to_lowercase();
    lexicon::ADVANCED_SEARCH_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}
