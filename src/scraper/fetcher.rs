//! Weekly schedule retrieval.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::{boxscores_url, ScheduleParser};
use crate::config::ScheduleConfig;
use crate::storage::ScheduleStore;
use crate::types::Matchup;

/// Source of a week's matchups
#[async_trait]
pub trait ScheduleSource {
    /// Matchups for the week containing `date`, in discovery order.
    async fn week_matchups(&self, date: NaiveDate) -> Result<Vec<Matchup>>;
}

/// Scrapes the box score index and persists the dated schedule
pub struct ScheduleFetcher {
    client: Client,
    base_url: String,
    store: ScheduleStore,
}

impl ScheduleFetcher {
    pub fn new(config: &ScheduleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            store: ScheduleStore::new(&config.output_dir),
        })
    }

    /// Fetch the raw box score index page for a date.
    pub async fn fetch_page(&self, date: NaiveDate) -> Result<String> {
        let url = boxscores_url(&self.base_url, date);
        info!("Fetching schedule from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP request failed with status: {}", response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        info!("Fetched schedule page ({} bytes)", html.len());

        Ok(html)
    }
}

#[async_trait]
impl ScheduleSource for ScheduleFetcher {
    async fn week_matchups(&self, date: NaiveDate) -> Result<Vec<Matchup>> {
        let html = self.fetch_page(date).await?;
        let matchups = ScheduleParser::parse(&html)?;
        info!("Found {} games for week of {}", matchups.len(), date);

        self.store.save(date, &matchups)?;

        Ok(matchups)
    }
}

/// Previously saved schedule file used in place of scraping
pub struct StoredSchedule {
    path: PathBuf,
}

impl StoredSchedule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScheduleSource for StoredSchedule {
    async fn week_matchups(&self, _date: NaiveDate) -> Result<Vec<Matchup>> {
        let matchups = ScheduleStore::load(&self.path)?;
        info!("Loaded {} games from {}", matchups.len(), self.path.display());
        Ok(matchups)
    }
}
