//! Iowa Environmental Mesonet ASOS download client
//!
//! Fetches raw ASOS/AWOS observations from the IEM
//! [`asos.py`](https://mesonet.agron.iastate.edu/cgi-bin/request/asos.py?help)
//! service as comma-separated text.

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::WeatherError;

/// IEM service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsosConfig {
    /// Mesonet base URL (default: <https://mesonet.agron.iastate.edu>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; large windows take a while (default: 300)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://mesonet.agron.iastate.edu".to_string()
}

const fn default_timeout() -> u64 {
    300
}

impl Default for AsosConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// One download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsosRequest {
    /// Station identifiers (e.g. `AUS`, `DFW`)
    pub stations: Vec<String>,
    /// Data variables (e.g. `tmpf`, `mslp`, `sknt`)
    pub variables: Vec<String>,
    /// Window start, in `timezone`
    pub start: NaiveDateTime,
    /// Window end, in `timezone`
    pub end: NaiveDateTime,
    /// IANA timezone the window is expressed in
    pub timezone: String,
}

impl AsosRequest {
    /// Validate the request
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when no station or variable is given, or when the
    /// window ends before it starts.
    pub fn validate(&self) -> Result<(), WeatherError> {
        if self.stations.is_empty() {
            return Err(WeatherError::InvalidRequest("at least one station is required".into()));
        }
        if self.variables.is_empty() {
            return Err(WeatherError::InvalidRequest("at least one data variable is required".into()));
        }
        if self.end < self.start {
            return Err(WeatherError::InvalidRequest(format!(
                "window ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// File name derived from the variables and the window dates
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_to_{}.csv",
            self.variables.join(","),
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = self
            .stations
            .iter()
            .map(|station| ("station", station.clone()))
            .collect();
        params.extend([
            ("data", self.variables.join(",")),
            ("year1", self.start.format("%Y").to_string()),
            ("month1", self.start.format("%-m").to_string()),
            ("day1", self.start.format("%-d").to_string()),
            ("hour1", self.start.format("%-H").to_string()),
            ("year2", self.end.format("%Y").to_string()),
            ("month2", self.end.format("%-m").to_string()),
            ("day2", self.end.format("%-d").to_string()),
            ("hour2", self.end.format("%-H").to_string()),
            ("tz", self.timezone.clone()),
            ("format", "onlycomma".to_string()),
            ("latlon", "yes".to_string()),
            ("elev", "yes".to_string()),
            ("missing", "M".to_string()),
            ("trace", "T".to_string()),
            ("direct", "yes".to_string()),
            ("report_type", "3".to_string()),
            ("report_type", "4".to_string()),
        ]);
        params
    }
}

/// IEM ASOS HTTP client
#[derive(Debug)]
pub struct AsosClient {
    client: Client,
    config: AsosConfig,
}

impl AsosClient {
    /// Create a new ASOS client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: AsosConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Download observations as comma-separated text
    ///
    /// # Errors
    ///
    /// Returns an error for invalid requests, transport failures and
    /// non-success HTTP statuses.
    #[instrument(skip(self, request), fields(stations = request.stations.len(), start = %request.start, end = %request.end))]
    pub async fn download(&self, request: &AsosRequest) -> Result<String, WeatherError> {
        request.validate()?;

        let url = format!("{}/cgi-bin/request/asos.py", self.config.base_url);
        debug!(url = %url, "Requesting ASOS observations");

        let response = self
            .client
            .get(&url)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| WeatherError::from_send(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::from_status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;
        debug!(bytes = body.len(), "Received ASOS observations");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn request() -> AsosRequest {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        AsosRequest {
            stations: vec!["AUS".into(), "DFW".into()],
            variables: vec!["tmpf".into(), "mslp".into()],
            start: day.and_hms_opt(0, 0, 0).unwrap(),
            end: day.and_hms_opt(1, 0, 0).unwrap(),
            timezone: "America/Chicago".into(),
        }
    }

    #[test]
    fn file_name_from_variables_and_dates() {
        assert_eq!(request().file_name(), "tmpf,mslp_2024-01-01_to_2024-01-01.csv");
    }

    #[test]
    fn query_repeats_stations_and_report_types() {
        let query = request().query();
        let stations: Vec<_> = query.iter().filter(|(k, _)| *k == "station").collect();
        let report_types: Vec<_> = query.iter().filter(|(k, _)| *k == "report_type").collect();
        assert_eq!(stations.len(), 2);
        assert_eq!(report_types.len(), 2);
        assert!(query.contains(&("month1", "1".to_string())));
        assert!(query.contains(&("hour2", "1".to_string())));
        assert!(query.contains(&("format", "onlycomma".to_string())));
    }

    #[test]
    fn validate_rejects_empty_and_inverted() {
        let mut r = request();
        r.stations.clear();
        assert!(matches!(r.validate(), Err(WeatherError::InvalidRequest(_))));

        let mut r = request();
        r.variables.clear();
        assert!(r.validate().is_err());

        let mut r = request();
        std::mem::swap(&mut r.start, &mut r.end);
        assert!(r.validate().is_err());

        assert!(request().validate().is_ok());
    }

    #[test]
    fn config_defaults() {
        let config = AsosConfig::default();
        assert_eq!(config.base_url, "https://mesonet.agron.iastate.edu");
        assert_eq!(config.timeout_secs, 300);
    }
}
