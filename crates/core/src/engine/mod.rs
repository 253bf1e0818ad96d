//! Pure aggregation engine. Takes already-fetched reminders and special-day
//! suggestions and produces the per-day opportunity timeline. No I/O here;
//! fetching and persistence live in `ingest` and `storage`.

pub mod aggregate;
pub mod confidence;
pub mod reminder;
pub mod suggestion;

pub use aggregate::aggregate;

use crate::domain::opportunity::{DataSource, MarketingOpportunity, OpportunityCategory, Priority};
use chrono::NaiveDate;

/// A date-independent opportunity. Mappers build one per input record and
/// the aggregator stamps it onto each covered day with the right id.
#[derive(Debug, Clone)]
pub struct OpportunityTemplate {
    pub title: String,
    pub description: String,
    pub target_customer: String,
    pub suggested_action: String,
    pub expected_effect: String,
    pub category: OpportunityCategory,
    pub confidence: f64,
    pub priority: Priority,
    pub data_source: DataSource,
}

impl OpportunityTemplate {
    pub fn materialize(&self, id: String, date: NaiveDate) -> MarketingOpportunity {
        MarketingOpportunity {
            id,
            date,
            title: self.title.clone(),
            description: self.description.clone(),
            target_customer: self.target_customer.clone(),
            suggested_action: self.suggested_action.clone(),
            expected_effect: self.expected_effect.clone(),
            category: self.category,
            confidence: self.confidence,
            priority: self.priority,
            data_source: self.data_source,
        }
    }
}
