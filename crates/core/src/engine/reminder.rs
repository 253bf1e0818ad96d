use super::OpportunityTemplate;
use crate::domain::calendar::Reminder;
use crate::domain::opportunity::{DataSource, OpportunityCategory, Priority};

/// Maps a user-authored reminder to its opportunity template. The title
/// carries a literal "[Reminder] " prefix so downstream layers can tell
/// reminders from AI suggestions without inspecting `data_source`.
pub fn map_reminder(reminder: &Reminder) -> OpportunityTemplate {
    OpportunityTemplate {
        title: format!("[Reminder] {}", reminder.title),
        description: reminder.content.clone(),
        target_customer: "나의 일정".to_string(),
        suggested_action: "• 일정 확인\n• 필요한 준비 사항 체크\n• 관련 자료 준비".to_string(),
        expected_effect: "개인 일정 관리 향상".to_string(),
        category: OpportunityCategory::SpecialDay,
        // User-authored schedule entries are taken at face value.
        confidence: 1.0,
        priority: priority_for_type(&reminder.kind),
        data_source: DataSource::GovernmentData,
    }
}

fn priority_for_type(kind: &str) -> Priority {
    match kind.to_lowercase().as_str() {
        "1" | "marketing" | "마케팅" => Priority::High,
        "2" | "schedule" | "일정" => Priority::Medium,
        _ => Priority::Medium,
    }
}
