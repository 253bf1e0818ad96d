use crate::config::Settings;
use crate::domain::calendar::{DaySuggestion, Reminder};
use crate::ingest::types::{
    validate_and_into_day_suggestion, validate_and_into_reminder, DaySuggestionDto, ReminderDto,
};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;
const REMINDER_PATH: &str = "/calendars/reminder";
const DAY_SUGGESTION_PATH: &str = "/calendars/day-sug";

#[async_trait::async_trait]
pub trait CalendarDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_reminders(&self, user_id: &str, year: i32, month: u32)
        -> Result<Vec<Reminder>>;

    async fn fetch_day_suggestions(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DaySuggestion>>;
}

#[derive(Debug, Clone)]
pub struct HttpCalendarClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retries: u32,
}

impl HttpCalendarClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_calendar_api_base_url()?.to_string();
        let api_key = settings.calendar_api_key.clone();

        let timeout_secs = std::env::var("CALENDAR_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("CALENDAR_API_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build calendar http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<T> {
        let res = self
            .http
            .get(self.url(path))
            .headers(self.headers()?)
            .query(&[
                ("user_id", user_id.to_string()),
                ("year", year.to_string()),
                ("month", month.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("calendar request to {path} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read calendar response from {path}"))?;

        if !status.is_success() {
            anyhow::bail!("calendar API HTTP {status} from {path}: {text}");
        }

        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse calendar response from {path}"))
    }

    async fn with_retries<T, F, Fut>(&self, what: &str, mut fetch: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "{what} fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl CalendarDataClient for HttpCalendarClient {
    fn provider_name(&self) -> &'static str {
        "calendar_http_json"
    }

    async fn fetch_reminders(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Reminder>> {
        let dtos: Vec<ReminderDto> = self
            .with_retries("reminders", || {
                self.get_json(REMINDER_PATH, user_id, year, month)
            })
            .await?;
        dtos.into_iter().map(validate_and_into_reminder).collect()
    }

    async fn fetch_day_suggestions(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DaySuggestion>> {
        let dtos: Vec<DaySuggestionDto> = self
            .with_retries("day suggestions", || {
                self.get_json(DAY_SUGGESTION_PATH, user_id, year, month)
            })
            .await?;
        dtos.into_iter()
            .map(validate_and_into_day_suggestion)
            .collect()
    }
}
