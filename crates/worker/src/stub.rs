use chrono::Duration;
use moa_core::domain::calendar::{DaySuggestion, Reminder, SpecialDay, SpecialDaySuggestion};
use moa_core::time::MonthWindow;

#[derive(Debug, Clone)]
pub struct StubOptions {
    /// Number of synthetic reminders spread across the window.
    pub reminder_count: usize,

    /// Number of synthetic special days; every other one carries a
    /// suggestion.
    pub special_day_count: usize,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            reminder_count: 3,
            special_day_count: 4,
        }
    }
}

impl StubOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("STUB_REMINDER_COUNT") {
            if let Ok(n) = s.parse::<usize>() {
                out.reminder_count = n;
            }
        }

        if let Ok(s) = std::env::var("STUB_SPECIAL_DAY_COUNT") {
            if let Ok(n) = s.parse::<usize>() {
                out.special_day_count = n;
            }
        }

        out
    }
}

/// Deterministic placeholder inputs for running the pipeline without the
/// calendar backend. Dates are spread across the window so the output
/// timeline has some shape to look at.
pub fn build_stub_inputs(
    window: &MonthWindow,
    opts: StubOptions,
) -> (Vec<Reminder>, Vec<DaySuggestion>) {
    let mut reminders = Vec::with_capacity(opts.reminder_count);
    for i in 0..opts.reminder_count {
        let start = window.start + Duration::days((i as i64) * 7);
        let end = (start + Duration::days(1)).min(window.end);
        reminders.push(Reminder {
            id: (i + 1) as i64,
            title: format!("시식 행사 {}", i + 1),
            kind: if i % 2 == 0 { "marketing" } else { "schedule" }.to_string(),
            content: "준비물 점검".to_string(),
            start_date: start.min(window.end),
            end_date: end,
        });
    }

    let names = ["치킨데이", "입춘", "설날", "화이트데이"];
    let kinds = ["기념일", "절기", "공휴일", "기념일"];
    let mut suggestions = Vec::with_capacity(opts.special_day_count);
    for i in 0..opts.special_day_count {
        let date = (window.start + Duration::days(10 + (i as i64) * 9)).min(window.end);
        let special_day = SpecialDay {
            id: (i + 1) as i64,
            name: names[i % names.len()].to_string(),
            kind: kinds[i % kinds.len()].to_string(),
            category: None,
            start_date: date,
            end_date: date,
            content: None,
        };
        let suggestion = (i % 2 == 0).then(|| SpecialDaySuggestion {
            id: (100 + i) as i64,
            title: format!("{} 프로모션", special_day.name),
            content: "한정 세트 할인".to_string(),
            start_date: date,
            end_date: date,
            ml_confidence: Some(70.0 + (i as f64) * 5.0),
            target_customer: None,
            suggested_action: None,
            expected_effect: None,
        });
        suggestions.push(DaySuggestion {
            special_day,
            suggestion,
        });
    }

    (reminders, suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_inputs_stay_inside_the_window() {
        let window = MonthWindow::surrounding(2025, 8).unwrap();
        let (reminders, suggestions) = build_stub_inputs(&window, StubOptions::default());
        assert_eq!(reminders.len(), 3);
        assert_eq!(suggestions.len(), 4);
        for r in &reminders {
            assert!(window.contains(r.start_date));
            assert!(window.contains(r.end_date));
        }
        for s in &suggestions {
            assert!(window.contains(s.special_day.start_date));
            assert!(window.contains(s.special_day.end_date));
        }
    }

    #[test]
    fn stub_inputs_are_deterministic() {
        let window = MonthWindow::surrounding(2025, 8).unwrap();
        let a = build_stub_inputs(&window, StubOptions::default());
        let b = build_stub_inputs(&window, StubOptions::default());
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn every_other_special_day_carries_a_suggestion() {
        let window = MonthWindow::surrounding(2025, 8).unwrap();
        let (_, suggestions) = build_stub_inputs(&window, StubOptions::default());
        for (i, s) in suggestions.iter().enumerate() {
            assert_eq!(s.suggestion.is_some(), i % 2 == 0);
        }
    }
}
