use crate::time::MonthWindow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One actionable marketing opportunity on a single calendar day.
/// Multi-day events are expanded into one record per covered day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingOpportunity {
    pub id: String,
    pub date: NaiveDate,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityCategory {
    Weather,
    University,
    SpecialDay,
    Season,
    Event,
    Holiday,
}

impl OpportunityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "WEATHER",
            Self::University => "UNIVERSITY",
            Self::SpecialDay => "SPECIAL_DAY",
            Self::Season => "SEASON",
            Self::Event => "EVENT",
            Self::Holiday => "HOLIDAY",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "WEATHER" => Ok(Self::Weather),
            "UNIVERSITY" => Ok(Self::University),
            "SPECIAL_DAY" => Ok(Self::SpecialDay),
            "SEASON" => Ok(Self::Season),
            "EVENT" => Ok(Self::Event),
            "HOLIDAY" => Ok(Self::Holiday),
            other => anyhow::bail!("unknown opportunity category: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            other => anyhow::bail!("unknown priority: {other}"),
        }
    }
}

/// Provenance tag. Informational only; no behavior depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    WeatherApi,
    UniversitySchedule,
    SpecialCalendar,
    GovernmentData,
    SocialTrend,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeatherApi => "WEATHER_API",
            Self::UniversitySchedule => "UNIVERSITY_SCHEDULE",
            Self::SpecialCalendar => "SPECIAL_CALENDAR",
            Self::GovernmentData => "GOVERNMENT_DATA",
            Self::SocialTrend => "SOCIAL_TREND",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "WEATHER_API" => Ok(Self::WeatherApi),
            "UNIVERSITY_SCHEDULE" => Ok(Self::UniversitySchedule),
            "SPECIAL_CALENDAR" => Ok(Self::SpecialCalendar),
            "GOVERNMENT_DATA" => Ok(Self::GovernmentData),
            "SOCIAL_TREND" => Ok(Self::SocialTrend),
            other => anyhow::bail!("unknown data source: {other}"),
        }
    }
}

/// Store category of the restaurant running the calendar. Only the
/// confidence scorer consults this; callers thread it through explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreCategory {
    Korean,
    Chicken,
    Pizza,
    Cafe,
    Other,
}

impl StoreCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Korean => "KOREAN",
            Self::Chicken => "CHICKEN",
            Self::Pizza => "PIZZA",
            Self::Cafe => "CAFE",
            Self::Other => "OTHER",
        }
    }

    /// Lenient parse of the configured store-category string. Accepts the
    /// Korean labels used by the signup flow as well as English names.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        if s.contains("한식") || s.contains("korean") {
            Self::Korean
        } else if s.contains("치킨") || s.contains("chicken") {
            Self::Chicken
        } else if s.contains("피자") || s.contains("pizza") {
            Self::Pizza
        } else if s.contains("카페") || s.contains("커피") || s.contains("cafe") || s.contains("café")
        {
            Self::Cafe
        } else {
            Self::Other
        }
    }
}

/// All opportunities landing on one calendar day, in emission order
/// (reminders first, then suggestion-derived entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOpportunities {
    pub date: NaiveDate,
    pub opportunities: Vec<MarketingOpportunity>,
}

impl DailyOpportunities {
    pub fn has_high_priority(&self) -> bool {
        self.opportunities
            .iter()
            .any(|o| o.priority == Priority::High)
    }

    pub fn total_count(&self) -> usize {
        self.opportunities.len()
    }
}

/// Output of one aggregation run, as persisted and served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunitySnapshot {
    pub user_id: String,
    pub window: MonthWindow,
    pub store_category: StoreCategory,
    pub generated_at: DateTime<Utc>,
    pub days: Vec<DailyOpportunities>,
}
