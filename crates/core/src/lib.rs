pub mod domain;
pub mod engine;
pub mod ingest;
pub mod storage;
pub mod time;

pub mod config {
    use crate::domain::opportunity::StoreCategory;
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub calendar_api_base_url: Option<String>,
        pub calendar_api_key: Option<String>,
        pub store_category: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                calendar_api_base_url: std::env::var("CALENDAR_API_BASE_URL").ok(),
                calendar_api_key: std::env::var("CALENDAR_API_KEY").ok(),
                store_category: std::env::var("STORE_CATEGORY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_calendar_api_base_url(&self) -> anyhow::Result<&str> {
            self.calendar_api_base_url
                .as_deref()
                .context("CALENDAR_API_BASE_URL is required")
        }

        /// Store category used by the confidence scorer. Unset or
        /// unrecognized values fall back to the generic category.
        pub fn store_category(&self) -> StoreCategory {
            self.store_category
                .as_deref()
                .map(StoreCategory::parse)
                .unwrap_or(StoreCategory::Other)
        }
    }
}
