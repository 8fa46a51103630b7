//! Category detectors.
//!
//! Each detector is a pure function over the raw message. A detector that
//! does not fire answers with a low-confidence `AiResponse`, so callers
//! compare on `kind` rather than on `Option`.

use crate::lexicon::{self, GENERAL_SEARCH_FAMILIES, RELIGIOUS_FAMILIES};
use crate::normalizer::normalize;
use crate::{ClassificationResult, QuestionType};

/// Religious detector: exception override, then keyword families, then
/// strong fatwa patterns to grade confidence.
pub fn check_religious(question: &str) -> ClassificationResult {
    if lexicon::is_strong_exception(question) {
        tracing::debug!("religious exception matched, routing as general information");
        return ClassificationResult::new(
            QuestionType::GeneralInfo,
            0.9,
            "general question about religion, not a ruling",
            vec![lexicon::EXCEPTION_KEYWORD.to_string()],
        );
    }

    let normalized = normalize(question);
    let found = lexicon::find_terms(&normalized, RELIGIOUS_FAMILIES);
    if found.is_empty() {
        return ClassificationResult::not_matched("no religious indicators");
    }

    let strong = lexicon::has_fatwa_pattern(question);
    ClassificationResult::new(
        QuestionType::Religious,
        if strong { 0.95 } else { 0.8 },
        if strong {
            "specific fatwa pattern"
        } else {
            "religious keywords present"
        },
        found,
    )
}

/// Programming-language, framework and tooling detector.
pub fn check_technical(question: &str) -> ClassificationResult {
    let normalized = normalize(question);
    let found = lexicon::find_terms(&normalized, &[lexicon::TECH_TERMS]);
    if found.is_empty() {
        return ClassificationResult::not_matched("not a technical question");
    }

    ClassificationResult::new(
        QuestionType::TechnicalCode,
        0.9,
        "technical or programming question",
        found,
    )
}

/// Search-verb, news, interrogative and comparison detector.
pub fn check_general_search(question: &str) -> ClassificationResult {
    let normalized = normalize(question);
    let found = lexicon::find_terms(&normalized, GENERAL_SEARCH_FAMILIES);
    if found.is_empty() {
        return ClassificationResult::not_matched("no external search needed");
    }

    let direct = lexicon::contains_any(&normalized, lexicon::DIRECT_SEARCH_TERMS);
    let news = lexicon::contains_any(&normalized, lexicon::NEWS_TERMS);
    let (confidence, reason) = if direct {
        (0.95, "direct search request")
    } else if news {
        (0.9, "request for recent information")
    } else {
        (0.8, "question needs information")
    };

    ClassificationResult::new(QuestionType::GeneralInfo, confidence, reason, found)
}
