use super::{confidence, OpportunityTemplate};
use crate::domain::calendar::{DaySuggestion, SpecialDay};
use crate::domain::opportunity::{DataSource, OpportunityCategory, Priority, StoreCategory};

/// Fixed confidence and priority for special days nobody wrote a
/// suggestion for. Kept visible but de-emphasized.
const NO_SUGGESTION_CONFIDENCE: f64 = 0.60;

/// Ordered keyword rules against the special day's type label. First
/// match wins.
const KIND_CATEGORY_RULES: &[(&[&str], OpportunityCategory)] = &[
    (&["공휴일", "holiday"], OpportunityCategory::Holiday),
    (&["절기", "season", "계절"], OpportunityCategory::Season),
    (&["기념일", "특별"], OpportunityCategory::SpecialDay),
    (&["이벤트", "event"], OpportunityCategory::Event),
];

/// Fallback rules against the free-form category field, consulted only
/// when no type rule matched.
const FIELD_CATEGORY_RULES: &[(&[&str], OpportunityCategory)] = &[
    (&["날씨"], OpportunityCategory::Weather),
    (&["대학"], OpportunityCategory::University),
];

const TARGET_CUSTOMER_RULES: &[(&[&str], &str)] = &[
    (&["공휴일"], "가족 단위 고객"),
    (&["절기", "계절"], "건강 관심층"),
    (&["기념일"], "커플, 가족"),
    (&["이벤트"], "젊은층, 이벤트 참여층"),
];

const DEFAULT_TARGET_CUSTOMER: &str = "일반 고객";

/// Maps a special day (with or without an attached suggestion) to its
/// opportunity template.
pub fn map_suggestion(record: &DaySuggestion, store_category: StoreCategory) -> OpportunityTemplate {
    let day = &record.special_day;
    match &record.suggestion {
        Some(suggestion) => OpportunityTemplate {
            title: suggestion.title.clone(),
            description: suggestion.content.clone(),
            target_customer: non_empty(suggestion.target_customer.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| target_customer_for(day).to_string()),
            suggested_action: non_empty(suggestion.suggested_action.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "• {} 활용한 마케팅\n• 특별 메뉴 출시\n• 테마 이벤트 진행",
                        day.name
                    )
                }),
            expected_effect: non_empty(suggestion.expected_effect.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} 관련 매출 증대", day.name)),
            category: category_for(day),
            confidence: confidence::score(day, store_category, suggestion.ml_confidence),
            priority: Priority::Medium,
            data_source: DataSource::SpecialCalendar,
        },
        None => OpportunityTemplate {
            title: day.name.clone(),
            description: non_empty(day.content.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("{}입니다. 이 날을 활용한 마케팅을 고려해보세요.", day.name)
                }),
            target_customer: DEFAULT_TARGET_CUSTOMER.to_string(),
            suggested_action: "• 특별한 날 홍보\n• 관련 테마 활용\n• 고객 관심 유도".to_string(),
            expected_effect: "브랜드 인지도 향상".to_string(),
            category: category_for(day),
            confidence: NO_SUGGESTION_CONFIDENCE,
            priority: Priority::Low,
            data_source: DataSource::SpecialCalendar,
        },
    }
}

/// Identity prefix for the record, before the per-date suffix the
/// aggregator appends.
pub fn base_id(record: &DaySuggestion) -> String {
    match &record.suggestion {
        Some(suggestion) => format!("suggestion_{}", suggestion.id),
        None => format!("special_day_{}", record.special_day.id),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn category_for(day: &SpecialDay) -> OpportunityCategory {
    let kind = day.kind.to_lowercase();
    if let Some((_, category)) = KIND_CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| kind.contains(k)))
    {
        return *category;
    }
    if let Some(field) = day.category.as_deref() {
        if let Some((_, category)) = FIELD_CATEGORY_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| field.contains(k)))
        {
            return *category;
        }
    }
    OpportunityCategory::SpecialDay
}

fn target_customer_for(day: &SpecialDay) -> &'static str {
    TARGET_CUSTOMER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| day.kind.contains(k)))
        .map(|(_, target)| *target)
        .unwrap_or(DEFAULT_TARGET_CUSTOMER)
}
