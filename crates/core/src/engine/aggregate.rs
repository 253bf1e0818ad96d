use super::{reminder, suggestion};
use crate::domain::calendar::{DaySuggestion, Reminder};
use crate::domain::opportunity::{DailyOpportunities, MarketingOpportunity, StoreCategory};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Merges reminders and special-day suggestions into one per-day timeline,
/// sorted ascending by date. Reminders come first within a day, then
/// suggestion-derived entries, each source in input order.
///
/// Identity rules differ by source: a reminder keeps one shared id across
/// every day it covers (it is one logical event), while suggestion-derived
/// entries get a per-date suffixed id.
pub fn aggregate(
    reminders: &[Reminder],
    suggestions: &[DaySuggestion],
    store_category: StoreCategory,
) -> Vec<DailyOpportunities> {
    let mut by_date: BTreeMap<NaiveDate, Vec<MarketingOpportunity>> = BTreeMap::new();

    for record in reminders {
        let template = reminder::map_reminder(record);
        let id = format!("reminder_{}", record.id);
        for date in expand_days(record.start_date, record.end_date) {
            by_date
                .entry(date)
                .or_default()
                .push(template.materialize(id.clone(), date));
        }
    }

    for record in suggestions {
        let template = suggestion::map_suggestion(record, store_category);
        let base_id = suggestion::base_id(record);
        let day = &record.special_day;
        for date in expand_days(day.start_date, day.end_date) {
            by_date
                .entry(date)
                .or_default()
                .push(template.materialize(format!("{base_id}_{date}"), date));
        }
    }

    by_date
        .into_iter()
        .map(|(date, opportunities)| DailyOpportunities { date, opportunities })
        .collect()
}

/// Inclusive day range. An inverted range covers zero days; one bad record
/// must not abort aggregation of the rest.
fn expand_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        tracing::warn!(%start, %end, "inverted date range, expanding to zero days");
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::{SpecialDay, SpecialDaySuggestion};
    use crate::domain::opportunity::Priority;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(id: i64, kind: &str, start: NaiveDate, end: NaiveDate) -> Reminder {
        Reminder {
            id,
            title: "Tasting event".to_string(),
            kind: kind.to_string(),
            content: "Invite regulars".to_string(),
            start_date: start,
            end_date: end,
        }
    }

    fn special_day(id: i64, name: &str, kind: &str, start: NaiveDate, end: NaiveDate) -> SpecialDay {
        SpecialDay {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            category: None,
            start_date: start,
            end_date: end,
            content: None,
        }
    }

    #[test]
    fn reminder_range_expands_with_one_shared_id() {
        let r = reminder(3, "marketing", date(2025, 7, 1), date(2025, 7, 3));
        let days = aggregate(&[r], &[], StoreCategory::Other);
        assert_eq!(days.len(), 3);
        for day in &days {
            assert_eq!(day.opportunities.len(), 1);
            assert_eq!(day.opportunities[0].id, "reminder_3");
        }
    }

    #[test]
    fn suggestion_range_expands_with_per_date_ids() {
        let sd = special_day(1, "연휴", "공휴일", date(2025, 7, 1), date(2025, 7, 2));
        let record = DaySuggestion {
            special_day: sd,
            suggestion: Some(SpecialDaySuggestion {
                id: 7,
                title: "연휴 프로모션".to_string(),
                content: "연휴 한정 세트".to_string(),
                start_date: date(2025, 7, 1),
                end_date: date(2025, 7, 2),
                ml_confidence: None,
                target_customer: None,
                suggested_action: None,
                expected_effect: None,
            }),
        };
        let days = aggregate(&[], &[record], StoreCategory::Other);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].opportunities[0].id, "suggestion_7_2025-07-01");
        assert_eq!(days[1].opportunities[0].id, "suggestion_7_2025-07-02");
    }

    #[test]
    fn output_is_sorted_by_date_without_duplicates() {
        let rs = vec![
            reminder(2, "schedule", date(2025, 7, 5), date(2025, 7, 6)),
            reminder(1, "marketing", date(2025, 7, 1), date(2025, 7, 5)),
        ];
        let days = aggregate(&rs, &[], StoreCategory::Other);
        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(dates, sorted);
        assert_eq!(days.len(), 6);
    }

    #[test]
    fn reminders_precede_suggestions_within_a_day() {
        let d = date(2025, 7, 1);
        let r = reminder(1, "marketing", d, d);
        let record = DaySuggestion {
            special_day: special_day(4, "행사", "이벤트", d, d),
            suggestion: None,
        };
        let days = aggregate(&[r], &[record], StoreCategory::Other);
        assert_eq!(days.len(), 1);
        let ids: Vec<_> = days[0].opportunities.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["reminder_1", "special_day_4_2025-07-01"]);
    }

    #[test]
    fn inverted_range_yields_no_days_and_spares_the_rest() {
        let bad = reminder(1, "marketing", date(2025, 7, 10), date(2025, 7, 1));
        let good = reminder(2, "marketing", date(2025, 7, 1), date(2025, 7, 1));
        let days = aggregate(&[bad, good], &[], StoreCategory::Other);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].opportunities[0].id, "reminder_2");
    }

    #[test]
    fn two_special_days_on_one_date_both_appear() {
        let d = date(2025, 7, 1);
        let a = DaySuggestion {
            special_day: special_day(1, "행사 A", "이벤트", d, d),
            suggestion: None,
        };
        let b = DaySuggestion {
            special_day: special_day(2, "행사 B", "이벤트", d, d),
            suggestion: None,
        };
        let days = aggregate(&[], &[a, b], StoreCategory::Other);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].opportunities.len(), 2);
    }

    #[test]
    fn aggregate_is_deterministic() {
        let rs = vec![reminder(1, "marketing", date(2025, 8, 10), date(2025, 8, 11))];
        let ss = vec![DaySuggestion {
            special_day: special_day(5, "Chicken Day", "기념일", date(2025, 9, 9), date(2025, 9, 9)),
            suggestion: None,
        }];
        let first = aggregate(&rs, &ss, StoreCategory::Chicken);
        let second = aggregate(&rs, &ss, StoreCategory::Chicken);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(aggregate(&[], &[], StoreCategory::Other).is_empty());
    }

    #[test]
    fn multi_day_reminder_without_suggestions() {
        let r = reminder(1, "marketing", date(2025, 8, 10), date(2025, 8, 11));
        let days = aggregate(&[r], &[], StoreCategory::Other);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2025, 8, 10));
        assert_eq!(days[1].date, date(2025, 8, 11));
        for day in &days {
            let o = &day.opportunities[0];
            assert_eq!(o.id, "reminder_1");
            assert_eq!(o.priority, Priority::High);
            assert_eq!(o.confidence, 1.0);
        }
    }

    #[test]
    fn bare_special_day_scores_low_and_fixed() {
        let record = DaySuggestion {
            special_day: special_day(5, "Chicken Day", "기념일", date(2025, 9, 9), date(2025, 9, 9)),
            suggestion: None,
        };
        let days = aggregate(&[], &[record], StoreCategory::Chicken);
        assert_eq!(days.len(), 1);
        let o = &days[0].opportunities[0];
        assert_eq!(o.id, "special_day_5_2025-09-09");
        assert_eq!(o.priority, Priority::Low);
        assert_eq!(o.confidence, 0.60);
    }

    #[test]
    fn suggested_special_day_scores_through_the_weight_model() {
        let record = DaySuggestion {
            special_day: special_day(5, "Chicken Day", "기념일", date(2025, 9, 9), date(2025, 9, 9)),
            suggestion: Some(SpecialDaySuggestion {
                id: 9,
                title: "치킨데이 프로모션".to_string(),
                content: "세트 할인".to_string(),
                start_date: date(2025, 9, 9),
                end_date: date(2025, 9, 9),
                ml_confidence: Some(90.0),
                target_customer: None,
                suggested_action: None,
                expected_effect: None,
            }),
        };
        let days = aggregate(&[], &[record], StoreCategory::Chicken);
        let o = &days[0].opportunities[0];
        assert_eq!(o.id, "suggestion_9_2025-09-09");
        assert_eq!(o.priority, Priority::Medium);
        assert!((o.confidence - 0.90).abs() < 1e-9);
    }
}
