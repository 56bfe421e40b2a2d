//! Configuration for the weekly prediction job.

use anyhow::Context;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Schedule source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_schedule_dir")]
    pub output_dir: String,
}

fn default_schedule_url() -> String {
    crate::scraper::BOXSCORES_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

fn default_schedule_dir() -> String {
    "schedules".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            base_url: default_schedule_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            output_dir: default_schedule_dir(),
        }
    }
}

/// Team profile table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default = "default_offense_path")]
    pub offense_path: String,
    #[serde(default = "default_defense_path")]
    pub defense_path: String,
    /// Column holding the team identifier
    #[serde(default = "default_team_column")]
    pub team_column: String,
    /// Columns whose name contains this marker are dropped
    #[serde(default = "default_exclude_marker")]
    pub exclude_marker: String,
}

fn default_offense_path() -> String {
    "data/offense.csv".to_string()
}

fn default_defense_path() -> String {
    "data/defense.csv".to_string()
}

fn default_team_column() -> String {
    "team".to_string()
}

fn default_exclude_marker() -> String {
    "remove".to_string()
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            offense_path: default_offense_path(),
            defense_path: default_defense_path(),
            team_column: default_team_column(),
            exclude_marker: default_exclude_marker(),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Index of the probability tensor among the model outputs
    #[serde(default = "default_probability_output")]
    pub probability_output: usize,
    /// Column of the positive (home win) class in the probability tensor
    #[serde(default = "default_positive_class")]
    pub positive_class: usize,
}

fn default_model_path() -> String {
    "models/cfb_lr_model.onnx".to_string()
}

fn default_probability_output() -> usize {
    1
}

fn default_positive_class() -> usize {
    1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            probability_output: default_probability_output(),
            positive_class: default_positive_class(),
        }
    }
}

/// Prediction output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionsConfig {
    #[serde(default = "default_predictions_dir")]
    pub output_dir: String,
}

fn default_predictions_dir() -> String {
    "predictions".to_string()
}

impl Default for PredictionsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_predictions_dir(),
        }
    }
}

/// Weekly gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Day of week the job runs on ("Sat", "saturday", ...)
    #[serde(default = "default_run_weekday")]
    pub run_weekday: String,
}

fn default_run_weekday() -> String {
    "Sat".to_string()
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            run_weekday: default_run_weekday(),
        }
    }
}

impl JobConfig {
    pub fn weekday(&self) -> anyhow::Result<Weekday> {
        self.run_weekday
            .parse::<Weekday>()
            .map_err(|_| anyhow::anyhow!("Invalid run_weekday: {:?}", self.run_weekday))
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub predictions: PredictionsConfig,
    #[serde(default)]
    pub job: JobConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (CFB_MODEL__PATH, CFB_JOB__RUN_WEEKDAY, etc.)
            .add_source(
                config::Environment::with_prefix("CFB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app: AppConfig = config.try_deserialize()?;
        app.job.weekday()?;
        Ok(app)
    }
}
