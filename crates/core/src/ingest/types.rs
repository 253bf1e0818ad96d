//! Wire DTOs for the calendar backend, plus validation into domain types.
//! Field names mirror the backend's camelCase JSON.

use crate::domain::calendar::{DaySuggestion, Reminder, SpecialDay, SpecialDaySuggestion};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDto {
    pub marketing_idx: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDayDto {
    pub sd_idx: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDaySuggestDto {
    pub ssu_idx: i64,
    pub title: String,
    pub content: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Model confidence on the backend's 0-100 scale.
    pub confidence: Option<f64>,
    pub target_customer: Option<String>,
    pub suggested_action: Option<String>,
    pub expected_effect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySuggestionDto {
    pub special_day: SpecialDayDto,
    pub special_day_suggest: Option<SpecialDaySuggestDto>,
    #[serde(default)]
    pub has_suggest: bool,
}

pub fn validate_and_into_reminder(dto: ReminderDto) -> Result<Reminder> {
    anyhow::ensure!(!dto.title.trim().is_empty(), "reminder title must be non-empty");
    Ok(Reminder {
        id: dto.marketing_idx,
        title: dto.title,
        kind: dto.kind,
        content: dto.content,
        start_date: dto.start_date,
        end_date: dto.end_date,
    })
}

/// The backend sends both a `hasSuggest` flag and a nullable payload, and
/// they can disagree. A suggestion counts as present only when the flag is
/// set and the payload exists; any mismatch is logged and treated as
/// absent so the special day itself still surfaces.
pub fn validate_and_into_day_suggestion(dto: DaySuggestionDto) -> Result<DaySuggestion> {
    anyhow::ensure!(
        !dto.special_day.name.trim().is_empty(),
        "special day name must be non-empty"
    );

    let sd_idx = dto.special_day.sd_idx;
    let suggestion = match (dto.has_suggest, dto.special_day_suggest) {
        (true, Some(s)) => {
            anyhow::ensure!(!s.title.trim().is_empty(), "suggestion title must be non-empty");
            if let Some(c) = s.confidence {
                anyhow::ensure!(
                    (0.0..=100.0).contains(&c),
                    "ml confidence out of range: {c}"
                );
            }
            Some(SpecialDaySuggestion {
                id: s.ssu_idx,
                title: s.title,
                content: s.content,
                start_date: s.start_date,
                end_date: s.end_date,
                ml_confidence: s.confidence,
                target_customer: s.target_customer,
                suggested_action: s.suggested_action,
                expected_effect: s.expected_effect,
            })
        }
        (true, None) => {
            tracing::warn!(sd_idx, "hasSuggest set but payload missing; treating as no suggestion");
            None
        }
        (false, Some(_)) => {
            tracing::warn!(sd_idx, "suggestion payload present but hasSuggest unset; ignoring");
            None
        }
        (false, None) => None,
    };

    Ok(DaySuggestion {
        special_day: SpecialDay {
            id: sd_idx,
            name: dto.special_day.name,
            kind: dto.special_day.kind,
            category: dto.special_day.category,
            start_date: dto.special_day.start_date,
            end_date: dto.special_day.end_date,
            content: dto.special_day.content,
        },
        suggestion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_reminder_wire_shape() {
        let v = json!({
            "marketingIdx": 3,
            "title": "시식 행사",
            "type": "marketing",
            "content": "단골 초대",
            "startDate": "2025-08-10",
            "endDate": "2025-08-11",
            "status": "ACTIVE",
            "reminderIdx": 12
        });
        let dto: ReminderDto = serde_json::from_value(v).unwrap();
        let reminder = validate_and_into_reminder(dto).unwrap();
        assert_eq!(reminder.id, 3);
        assert_eq!(reminder.kind, "marketing");
        assert_eq!(
            reminder.start_date,
            NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
        );
    }

    #[test]
    fn rejects_blank_reminder_title() {
        let v = json!({
            "marketingIdx": 3,
            "title": "  ",
            "type": "marketing",
            "content": "",
            "startDate": "2025-08-10",
            "endDate": "2025-08-11"
        });
        let dto: ReminderDto = serde_json::from_value(v).unwrap();
        assert!(validate_and_into_reminder(dto).is_err());
    }

    #[test]
    fn parses_day_suggestion_with_payload() {
        let v = json!({
            "specialDay": {
                "sdIdx": 5,
                "name": "치킨데이",
                "type": "기념일",
                "category": null,
                "startDate": "2025-09-09",
                "endDate": "2025-09-09",
                "isHoliday": 0
            },
            "specialDaySuggest": {
                "ssuIdx": 9,
                "title": "치킨데이 프로모션",
                "content": "세트 할인",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09",
                "confidence": 90.0
            },
            "hasSuggest": true
        });
        let dto: DaySuggestionDto = serde_json::from_value(v).unwrap();
        let record = validate_and_into_day_suggestion(dto).unwrap();
        assert_eq!(record.special_day.id, 5);
        let s = record.suggestion.unwrap();
        assert_eq!(s.id, 9);
        assert_eq!(s.ml_confidence, Some(90.0));
        assert_eq!(s.target_customer, None);
    }

    #[test]
    fn flag_without_payload_degrades_to_no_suggestion() {
        let v = json!({
            "specialDay": {
                "sdIdx": 5,
                "name": "치킨데이",
                "type": "기념일",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09"
            },
            "specialDaySuggest": null,
            "hasSuggest": true
        });
        let dto: DaySuggestionDto = serde_json::from_value(v).unwrap();
        let record = validate_and_into_day_suggestion(dto).unwrap();
        assert!(record.suggestion.is_none());
    }

    #[test]
    fn payload_without_flag_is_ignored() {
        let v = json!({
            "specialDay": {
                "sdIdx": 5,
                "name": "치킨데이",
                "type": "기념일",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09"
            },
            "specialDaySuggest": {
                "ssuIdx": 9,
                "title": "치킨데이 프로모션",
                "content": "세트 할인",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09"
            },
            "hasSuggest": false
        });
        let dto: DaySuggestionDto = serde_json::from_value(v).unwrap();
        let record = validate_and_into_day_suggestion(dto).unwrap();
        assert!(record.suggestion.is_none());
    }

    #[test]
    fn rejects_out_of_range_ml_confidence() {
        let v = json!({
            "specialDay": {
                "sdIdx": 5,
                "name": "치킨데이",
                "type": "기념일",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09"
            },
            "specialDaySuggest": {
                "ssuIdx": 9,
                "title": "치킨데이 프로모션",
                "content": "세트 할인",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09",
                "confidence": 120.0
            },
            "hasSuggest": true
        });
        let dto: DaySuggestionDto = serde_json::from_value(v).unwrap();
        assert!(validate_and_into_day_suggestion(dto).is_err());
    }

    #[test]
    fn missing_has_suggest_defaults_to_false() {
        let v = json!({
            "specialDay": {
                "sdIdx": 5,
                "name": "치킨데이",
                "type": "기념일",
                "startDate": "2025-09-09",
                "endDate": "2025-09-09"
            },
            "specialDaySuggest": null
        });
        let dto: DaySuggestionDto = serde_json::from_value(v).unwrap();
        assert!(!dto.has_suggest);
    }
}
