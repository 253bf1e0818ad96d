//! Multi-factor confidence scoring for suggestion-backed opportunities.
//!
//! The final score is `base * type * category * seasonal`, clamped to
//! [0.30, 0.95]. The clamp keeps a perfect model score from reading as
//! certainty and keeps weak scores visible instead of disappearing.

use crate::domain::calendar::SpecialDay;
use crate::domain::opportunity::StoreCategory;

/// Base score (0-100 scale) used when the model did not report one.
const DEFAULT_BASE_SCORE: f64 = 85.0;

const MIN_CONFIDENCE: f64 = 0.30;
const MAX_CONFIDENCE: f64 = 0.95;

/// Food-promotion day names. Checked before the broader type labels
/// because a food day can also carry a seasonal type string.
const FOOD_DAY_KEYWORDS: &[&str] = &[
    "치킨", "chicken", "피자", "pizza", "커피", "coffee", "삼겹살", "삼계탕", "빼빼로", "막걸리",
    "와인",
];

const SUMMER_KEYWORDS: &[&str] = &["여름", "복날", "초복", "중복", "말복", "summer"];
const WINTER_KEYWORDS: &[&str] = &["겨울", "동지", "winter"];
const CHRISTMAS_KEYWORDS: &[&str] = &["크리스마스", "성탄", "christmas"];

/// One row of a keyword rule table. Rows are evaluated top to bottom and
/// the first match wins, so more specific rows must come first.
struct NameRule {
    keywords: &'static [&'static str],
    weight: f64,
}

const KOREAN_NAME_RULES: &[NameRule] = &[
    NameRule {
        keywords: &["한식", "삼계탕", "삼겹살", "막걸리"],
        weight: 1.0,
    },
    NameRule {
        keywords: &["김치", "떡"],
        weight: 0.95,
    },
];

const CHICKEN_NAME_RULES: &[NameRule] = &[
    NameRule {
        keywords: &["치킨", "chicken"],
        weight: 1.0,
    },
    NameRule {
        keywords: &["맥주", "beer"],
        weight: 0.95,
    },
];

const PIZZA_NAME_RULES: &[NameRule] = &[
    NameRule {
        keywords: &["피자", "pizza"],
        weight: 1.0,
    },
    NameRule {
        keywords: &["치즈", "cheese"],
        weight: 0.9,
    },
];

const CAFE_NAME_RULES: &[NameRule] = &[
    NameRule {
        keywords: &["커피", "coffee", "카페"],
        weight: 1.0,
    },
    NameRule {
        keywords: &["빼빼로", "초콜릿", "디저트", "케이크"],
        weight: 0.95,
    },
];

/// Computes the final confidence for a special day scored against the
/// store's category. `ml_confidence` is on the upstream 0-100 scale.
pub fn score(day: &SpecialDay, store_category: StoreCategory, ml_confidence: Option<f64>) -> f64 {
    let base = ml_confidence.unwrap_or(DEFAULT_BASE_SCORE) / 100.0;
    let raw = base
        * type_weight(day)
        * category_weight(&day.name, store_category)
        * seasonal_weight(&day.name, store_category);
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

fn type_weight(day: &SpecialDay) -> f64 {
    let name = day.name.to_lowercase();
    let kind = day.kind.to_lowercase();
    if contains_any(&name, FOOD_DAY_KEYWORDS) {
        1.0
    } else if kind.contains("절기") || kind.contains("계절") || kind.contains("season") {
        0.9
    } else if kind.contains("공휴일") || kind.contains("명절") || kind.contains("holiday") {
        0.95
    } else if kind.contains("기념일") || kind.contains("특별") {
        0.8
    } else {
        0.7
    }
}

fn category_weight(name: &str, store_category: StoreCategory) -> f64 {
    let name = name.to_lowercase();
    let (rules, baseline): (&[NameRule], f64) = match store_category {
        StoreCategory::Korean => (KOREAN_NAME_RULES, 0.8),
        StoreCategory::Chicken => (CHICKEN_NAME_RULES, 0.75),
        StoreCategory::Pizza => (PIZZA_NAME_RULES, 0.75),
        StoreCategory::Cafe => (CAFE_NAME_RULES, 0.8),
        StoreCategory::Other => (&[], 0.7),
    };
    rules
        .iter()
        .find(|r| contains_any(&name, r.keywords))
        .map(|r| r.weight)
        .unwrap_or(baseline)
}

fn seasonal_weight(name: &str, store_category: StoreCategory) -> f64 {
    let name = name.to_lowercase();
    if contains_any(&name, CHRISTMAS_KEYWORDS) && store_category == StoreCategory::Cafe {
        1.15
    } else if contains_any(&name, SUMMER_KEYWORDS)
        && matches!(store_category, StoreCategory::Cafe | StoreCategory::Chicken)
    {
        1.1
    } else if contains_any(&name, WINTER_KEYWORDS) && store_category == StoreCategory::Korean {
        1.1
    } else {
        1.0
    }
}
