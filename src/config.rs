use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::model::employee::DEFAULT_ANNUAL_VACATION_DAYS;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,

    /// Allowance given to newly added employees.
    pub annual_vacation_days: u32,
    pub color: bool,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            data_file: var_or("HRM_DATA_FILE", "rh_data.txt").into(),
            export_dir: var_or("HRM_EXPORT_DIR", ".").into(),
            log_dir: var_or("HRM_LOG_DIR", "logs").into(),
            log_level: var_or("HRM_LOG_LEVEL", "info"),

            annual_vacation_days: parse_var("HRM_ANNUAL_VACATION_DAYS", DEFAULT_ANNUAL_VACATION_DAYS)?,
            color: parse_var("HRM_COLOR", true)?,
        })
    }

    /// Daily rolling `hrm.log` inside `log_dir`, created on demand.
    pub fn log_appender(&self) -> Result<RollingFileAppender> {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("hrm.log")
            .build(&self.log_dir)
            .with_context(|| format!("cannot open log directory {}", self.log_dir.display()))
    }
}
