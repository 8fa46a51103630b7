//! Keyword families and regex sets used by the detectors.
//!
//! Terms are matched as lower-cased substrings; order within each family is
//! the order matched keywords are reported in.

use lazy_static::lazy_static;
use regex::Regex;

/// Rulings and fatwa vocabulary.
pub const FATWA_TERMS: &[&str] = &[
    "حكم", "حلال", "حرام", "جائز", "يجوز", "لا يجوز", "مكروه", "مباح",
    "واجب", "فرض", "سنة", "مستحب", "محرم", "فتوى", "حكم الشرع",
];

/// Acts of worship and their times.
pub const WORSHIP_TERMS: &[&str] = &[
    "صلاة", "صيام", "زكاة", "حج", "عمرة", "وضوء", "غسل", "تيمم",
    "طهارة", "قبلة", "أذان", "فجر", "ظهر", "عصر", "مغرب", "عشاء",
];

/// Family law and financial jurisprudence.
pub const FAMILY_FINANCE_TERMS: &[&str] = &[
    "نكاح", "زواج", "طلاق", "ميراث", "وراثة", "معاملات إسلامية",
    "ربا", "بنوك إسلامية", "تجارة إسلامية", "خمس",
];

/// Religious authorities whose rulings users ask about.
pub const SCHOLAR_TERMS: &[&str] = &[
    "السيستاني", "الخامنئي", "الخوئي", "فضل الله", "الصدر", "النجفي",
    "ابن باز", "ابن عثيمين", "الألباني", "القرضاوي", "الشيرازي",
];

pub const RELIGIOUS_FAMILIES: &[&[&str]] = &[
    FATWA_TERMS,
    WORSHIP_TERMS,
    FAMILY_FINANCE_TERMS,
    SCHOLAR_TERMS,
];

pub const TECH_TERMS: &[&str] = &[
    // languages
    "javascript", "python", "java", "c++", "react", "vue", "angular", "node.js",
    "html", "css", "php", "sql", "mongodb", "mysql", "postgresql",
    "جافاسكريبت", "بايثون", "ريأكت", "نود جي اس",
    // concepts
    "كود", "برمجة", "algorithm", "function", "دالة", "متغير", "variable",
    "array", "object", "class", "مصفوفة", "كائن", "صف", "فئة",
    // web development
    "api", "rest", "graphql", "frontend", "backend", "fullstack",
    "تطوير ويب", "موقع إلكتروني", "تطبيق ويب",
    // tooling
    "git", "github", "docker", "kubernetes", "aws", "azure", "deployment",
    "database", "قاعدة بيانات", "خادم", "server",
];

pub const DIRECT_SEARCH_TERMS: &[&str] = &[
    "ابحث", "دور", "شوف", "لقي", "جيب", "تتبع", "اعثر على",
    "ابحثلي", "دورلي", "شوفلي", "جيبلي", "لقيلي",
    "search", "find", "look", "google", "show me",
];

pub const INFO_TERMS: &[&str] = &[
    "معلومات", "تفاصيل", "شرح", "توضيح", "بيانات",
    "أخبار", "آخر", "جديد", "أحدث", "حديث", "مستجدات",
    "information", "details", "news", "latest", "recent",
];

pub const QUESTION_TERMS: &[&str] = &[
    "ما هو", "من هو", "ما هي", "من هي", "كيف", "متى", "أين", "لماذا",
    "what is", "who is", "how", "when", "where", "why",
];

pub const COMPARISON_TERMS: &[&str] = &[
    "أفضل", "أحسن", "الأفضل", "الأحسن", "مقارنة", "فرق", "مراجعة",
    "best", "better", "compare", "review", "vs", "versus",
];

pub const GENERAL_SEARCH_FAMILIES: &[&[&str]] = &[
    DIRECT_SEARCH_TERMS,
    INFO_TERMS,
    QUESTION_TERMS,
    COMPARISON_TERMS,
];

/// Subset of info terms that signal a request for recent news.
pub const NEWS_TERMS: &[&str] = &["أخبار", "آخر", "جديد", "news", "latest"];

/// Markers that upgrade a search route to multi-source search.
pub const ADVANCED_SEARCH_MARKERS: &[&str] = &["بحث متقدم", "#advanced-search"];

/// Keyword reported when a religious exception fires.
pub const EXCEPTION_KEYWORD: &str = "معلومات عامة";

/// Keyword reported by the search-first default.
pub const SEARCH_SENTINEL: &str = "ابحث";

lazy_static! {
    /// Meta-questions about religion (history, statistics, comparison) that
    /// must not be treated as requests for a ruling.
    pub static ref STRONG_EXCEPTIONS: Vec<Regex> = [
        r"(?i)(تاريخ|متى|كيف|أين).*(الإسلام|المسلمين|انتشر)",
        r"(?i)(عدد|كم|نسبة|إحصائيات).*(المسلمين|الدول الإسلامية)",
        r"(?i)(معلومات|بحث|ابحث|دور|شرح).*(عن|حول).*(الإسلام|المسلمين)",
        r"(?i)(أخبار|آخر|جديد).*(مسلم|إسلام)",
        r"(?i)(مقارنة|فرق|الفرق).*(بين|الأديان|المذاهب)",
        r"(?i)ما هو الإسلام",
        r"(?i)من هو (محمد|النبي)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// Explicit fatwa question forms.
    pub static ref FATWA_PATTERNS: Vec<Regex> = [
        r"(?i)\b(ما حكم|هل يجوز|هل يحل|هل يحرم)\b",
        r"(?i)\b(كيف أصلي|كيف أصوم|متى يجب|أين القبلة)\b",
        r"(?i)\b(حلال أم حرام|حسب الشريعة|حسب المذهب)\b",
        r"(?i)\b(فتوى في|حكم الشرع|يا شيخ|سؤال ديني)\b",
        r"(?i)\b(عند|حسب|رأي|فتوى)\s+(السيستاني|الخامنئي|ابن باز)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Every term from `families` contained in `normalized`, in declaration order.
pub fn find_terms(normalized: &str, families: &[&[&'static str]]) -> Vec<String> {
    families
        .iter()
        .flat_map(|family| family.iter())
        .filter(|term| normalized.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

pub fn contains_any(normalized: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| normalized.contains(t))
}

pub fn is_strong_exception(text: &str) -> bool {
    STRONG_EXCEPTIONS.iter().any(|re| re.is_match(text))
}

pub fn has_fatwa_pattern(text: &str) -> bool {
    FATWA_PATTERNS.iter().any(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_sets_compile() {
        assert_eq!(STRONG_EXCEPTIONS.len(), 7);
        assert_eq!(FATWA_PATTERNS.len(), 5);
    }

    #[test]
    fn test_find_terms_keeps_declaration_order() {
        let found = find_terms("هل الزواج بدون ولي حلال", RELIGIOUS_FAMILIES);
        assert_eq!(found, vec!["حلال".to_string(), "زواج".to_string()]);
    }

    #[test]
    fn test_fatwa_pattern_on_arabic_word_boundary() {
        assert!(has_fatwa_pattern("ما حكم شرب الخمر؟"));
        assert!(has_fatwa_pattern("ما رأي السيستاني في ذلك"));
        assert!(has_fatwa_pattern("هل يجوز الصيام في السفر"));
        assert!(!has_fatwa_pattern("الصلاة في المسجد"));
    }

    #[test]
    fn test_strong_exceptions() {
        assert!(is_strong_exception("ما هو الإسلام"));
        assert!(is_strong_exception("كم عدد المسلمين في العالم"));
        assert!(is_strong_exception("ما الفرق بين المذاهب"));
        assert!(!is_strong_exception("ما حكم صلاة الجماعة"));
    }
}
