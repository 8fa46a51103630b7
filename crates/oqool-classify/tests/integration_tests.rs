//! End-to-end classification and routing of realistic chat messages.

use oqool_classify::{
    classify, route, ClassificationResult, Classifier, ClassifierMode, QuestionType, Route,
};

fn classify_all(inputs: &[&str]) -> Vec<(String, ClassificationResult)> {
    inputs
        .iter()
        .map(|input| (input.to_string(), classify(input)))
        .collect()
}

// =============================================================================
// Trivial input
// =============================================================================

#[test]
fn test_inputs_under_three_chars_are_assistant_replies() {
    let inputs = ["", " ", "\t\n", "a", "ab", "  ab  ", "يا", "؟؟", "👍"];
    for (input, result) in classify_all(&inputs) {
        assert_eq!(result.kind, QuestionType::AiResponse, "Failed for: {:?}", input);
        assert!(result.confidence >= 0.9, "Low confidence for: {:?}", input);
    }
}

#[test]
fn test_classification_is_total_on_odd_input() {
    let inputs = [
        "\u{0}\u{1}\u{2}",
        "🙂🙂🙂🙂",
        "؟؟؟؟؟؟؟؟",
        "((((((((",
        "ـــــــــ",
    ];
    for (_, result) in classify_all(&inputs) {
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}

// =============================================================================
// Religious questions
// =============================================================================

#[test]
fn test_fatwa_question() {
    let result = classify("ما حكم شرب الخمر؟");
    assert_eq!(result.kind, QuestionType::Religious);
    assert_eq!(result.confidence, 0.95);
    assert!(result.keywords.iter().any(|k| k == "حكم"));
}

#[test]
fn test_religious_variations() {
    let variations = [
        "هل يجوز الجمع بين الصلاتين",
        "كيف أصلي صلاة الاستخارة",
        "ما رأي السيستاني في صلاة الجمعة",
        "أحكام الزكاة على الذهب",
        "الطلاق في المحكمة",
    ];
    for text in variations {
        let result = classify(text);
        assert_eq!(result.kind, QuestionType::Religious, "Failed for: {}", text);
        assert!(!result.keywords.is_empty(), "No keywords for: {}", text);
    }
}

#[test]
fn test_exceptions_override_religious_keywords() {
    let inputs = [
        "ما هو الإسلام",
        "من هو النبي محمد",
        "تاريخ انتشار الإسلام في أفريقيا",
        "كم عدد المسلمين في إندونيسيا",
        "ما الفرق بين المذاهب في الصلاة",
    ];
    for text in inputs {
        let result = classify(text);
        assert_eq!(result.kind, QuestionType::GeneralInfo, "Failed for: {}", text);
        assert_eq!(result.confidence, 0.9, "Wrong confidence for: {}", text);
    }
}

// =============================================================================
// Default search-first behaviour
// =============================================================================

#[test]
fn test_programming_request_goes_to_search_by_default() {
    let result = classify("اكتب دالة بايثون لحساب المضروب");
    assert_eq!(result.kind, QuestionType::GeneralInfo);
    assert_eq!(result.reason, "direct search request");
}

#[test]
fn test_layered_mode_restores_detectors() {
    let classifier = Classifier::new(ClassifierMode::Layered);

    let result = classifier.classify("how do I configure docker compose");
    assert_eq!(result.kind, QuestionType::TechnicalCode);

    let result = classifier.classify("ابحث عن أخبار الاقتصاد");
    assert_eq!(result.kind, QuestionType::GeneralInfo);
    assert_eq!(result.confidence, 0.95);

    // religious still outranks both
    let result = classifier.classify("هل يجوز العمل في شركة برمجة بنكية فيها ربا");
    assert_eq!(result.kind, QuestionType::Religious);
}

#[test]
fn test_classification_is_deterministic() {
    let message = "ما حكم الربا في البنوك";
    assert_eq!(classify(message), classify(message));
}

// =============================================================================
// Routing
// =============================================================================

#[test]
fn test_routes_for_each_path() {
    let cases = [
        ("السلام عليكم", Route::DirectLlm),
        ("ما حكم شرب الخمر؟", Route::ReligiousLookup),
        ("ما هو الإسلام", Route::SearchAugmented { advanced: false }),
        ("أفضل مطاعم بغداد #advanced-search", Route::SearchAugmented { advanced: true }),
    ];
    for (message, expected) in cases {
        assert_eq!(route(message, &classify(message)), expected, "Failed for: {}", message);
    }
}
