//! HTTP client for the `/metric` endpoint.
//!
//! Wraps a named server-side metric expression into a time-range query:
//! a `(start, stop, step)` window becomes a URL query, and the returned
//! `{"values": [...]}` payload becomes a [`MetricSeries`].

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::FetchError;

use super::expr::{display_name, station_exprs};
use super::series::{MetricSeries, SamplePoint};
use super::window::TimeWindow;

/// Client for metric time-range queries.
#[derive(Debug, Clone)]
pub struct MetricClient {
    client: Client,
    endpoint: String,
}

impl MetricClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> MetricClientBuilder {
        MetricClientBuilder::default()
    }

    /// The configured server base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The underlying HTTP client, shared with the non-metric poll targets.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetch the series for `expr` over `window`, stamped with the current
    /// wall clock.
    pub async fn fetch(
        &self,
        expr: &str,
        window: &TimeWindow,
    ) -> Result<MetricSeries, FetchError> {
        self.fetch_at(expr, window, Utc::now()).await
    }

    /// Fetch with an explicit `now` timestamp.
    pub async fn fetch_at(
        &self,
        expr: &str,
        window: &TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<MetricSeries, FetchError> {
        let url = format!("{}/metric", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&query_params(expr, window, now))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "metric endpoint returned status {}",
                response.status()
            )));
        }

        let payload: MetricPayload = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let values = payload.values.unwrap_or_default();
        if values.is_empty() {
            return Err(FetchError::NoData(expr.to_string()));
        }

        let points = values
            .into_iter()
            .map(|(timestamp, value)| SamplePoint { timestamp, value })
            .collect();

        Ok(MetricSeries::new(expr, display_name(expr), points))
    }

    /// Fetch a group of expressions over the same window.
    ///
    /// An expression with no samples drops its row rather than failing the
    /// whole group; a group with no rows at all is an error.
    pub async fn fetch_group(
        &self,
        exprs: &[String],
        window: &TimeWindow,
    ) -> Result<Vec<MetricSeries>, FetchError> {
        let mut series = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match self.fetch(expr, window).await {
                Ok(s) => series.push(s),
                Err(FetchError::NoData(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        if series.is_empty() {
            return Err(FetchError::NoData(exprs.join(", ")));
        }
        Ok(series)
    }

    /// Fetch the network monitor rows for one remote station: heartbeat,
    /// packets sent, packets lost, and the derived loss ratio.
    ///
    /// A station with no data contributes no rows.
    pub async fn fetch_station(
        &self,
        station: &str,
        window: &TimeWindow,
    ) -> Result<Vec<MetricSeries>, FetchError> {
        let [heartbeat, sent_expr, lost_expr] = station_exprs(station);

        let mut rows = Vec::with_capacity(4);
        let mut sent = None;
        let mut lost = None;

        for expr in [&heartbeat, &sent_expr, &lost_expr] {
            match self.fetch(expr, window).await {
                Ok(series) => {
                    if *expr == sent_expr {
                        sent = Some(series.clone());
                    } else if *expr == lost_expr {
                        lost = Some(series.clone());
                    }
                    rows.push(series);
                }
                Err(FetchError::NoData(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        if let (Some(sent), Some(lost)) = (sent, lost) {
            rows.push(lost.divide(&sent, format!("{station} loss ratio")));
        }

        Ok(rows)
    }

    /// Build the `/graph` navigation URL for an expression over a window,
    /// mirroring the query the detail page expects.
    pub fn graph_url(&self, expr: &str, window: &TimeWindow) -> String {
        let params = [
            ("name", expr.to_string()),
            ("start", window.start_rfc3339()),
            ("stop", window.stop_rfc3339()),
            ("step", window.step_seconds().to_string()),
        ];
        match Url::parse_with_params(&format!("{}/graph", self.endpoint), &params) {
            Ok(url) => url.into(),
            Err(_) => format!("{}/graph", self.endpoint),
        }
    }
}

/// Query parameters for a `/metric` fetch. The step goes out floored to
/// whole seconds.
fn query_params(
    expr: &str,
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> [(&'static str, String); 5] {
    [
        ("expr", expr.to_string()),
        ("start", window.start_rfc3339()),
        ("stop", window.stop_rfc3339()),
        ("now", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ("step", window.step_seconds().to_string()),
    ]
}

/// Builder for [`MetricClient`].
#[derive(Debug, Default)]
pub struct MetricClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl MetricClientBuilder {
    /// Set the server base URL (e.g. "http://daq.local:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> MetricClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());

        MetricClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

/// Raw `/metric` response payload.
#[derive(Debug, Deserialize)]
struct MetricPayload {
    #[serde(default)]
    values: Option<Vec<(f64, Option<f64>)>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> TimeWindow {
        let stop = Utc.timestamp_opt(7200, 0).unwrap();
        TimeWindow::trailing(stop, 3600, Duration::from_millis(60_500))
    }

    #[test]
    fn test_builder_defaults() {
        let client = MetricClient::builder().build();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let client = MetricClient::builder().endpoint("http://daq.local:5000/").build();
        assert_eq!(client.endpoint(), "http://daq.local:5000");
    }

    #[test]
    fn test_query_params_floor_step_and_stamp_now() {
        let now = Utc.timestamp_opt(7260, 0).unwrap();
        let params = query_params("temp-12", &window(), now);

        assert_eq!(params[0], ("expr", "temp-12".to_string()));
        assert_eq!(params[1].1, "1970-01-01T01:00:00.000Z");
        assert_eq!(params[2].1, "1970-01-01T02:00:00.000Z");
        assert_eq!(params[3].1, "1970-01-01T02:01:00.000Z");
        // 60.5s step goes out as 60
        assert_eq!(params[4], ("step", "60".to_string()));
    }

    #[test]
    fn test_graph_url_encodes_window() {
        let client = MetricClient::builder().endpoint("http://daq.local:5000").build();
        let url = client.graph_url("temp-12", &window());

        assert!(url.starts_with("http://daq.local:5000/graph?"));
        assert!(url.contains("name=temp-12"));
        assert!(url.contains("step=60"));
        // RFC3339 colons are percent-encoded by the URL builder
        assert!(!url.contains("01:00:00"));
    }

    #[test]
    fn test_payload_parses_sparse_values() {
        let payload: MetricPayload =
            serde_json::from_str(r#"{"values": [[0.0, 1.5], [60.0, null]]}"#).unwrap();
        let values = payload.values.unwrap();
        assert_eq!(values, vec![(0.0, Some(1.5)), (60.0, None)]);
    }

    #[test]
    fn test_payload_tolerates_missing_values_key() {
        let payload: MetricPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.values.is_none());
    }
}
