use crate::{error::ClientError, wire::WireVersion};
use log::debug;
use std::{env, time::Duration};

/// Base URL used when `TIMETABLE_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// Request timeout used when `TIMETABLE_REQUEST_TIMEOUT_SECS` is not set
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_URL_VAR: &str = "TIMETABLE_API_URL";
const TIMEOUT_VAR: &str = "TIMETABLE_REQUEST_TIMEOUT_SECS";
const WIRE_VERSION_VAR: &str = "TIMETABLE_WIRE_VERSION";

/// Where and how to reach the schedule backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    /// Teacher list encoding used in save requests
    pub wire_version: WireVersion,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            wire_version: WireVersion::default(),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the environment, loading `.env` first
    /// when one exists
    pub fn from_env() -> Result<Self, ClientError> {
        if let Err(err) = dotenvy::dotenv() {
            debug!("No .env file loaded: {err}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_url = lookup(API_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(secs) => secs
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|e| ClientError::Config {
                    message: format!("{TIMEOUT_VAR}={secs:?}: {e}"),
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let wire_version = match lookup(WIRE_VERSION_VAR) {
            Some(version) => version
                .parse()
                .map_err(|message| ClientError::Config { message })?,
            None => WireVersion::default(),
        };

        Ok(Self {
            api_url,
            request_timeout,
            wire_version,
        })
    }

    /// Joins an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
