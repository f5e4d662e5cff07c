//! Typed payloads for the generic JSON poll targets.
//!
//! These are the two non-metric resources the dashboard polls: per-stream
//! file listings and the trigger settings readout.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// File listing for one processing stream, from `/get_l3?name={stream}`.
///
/// `files` and `times` are parallel arrays; `times` holds unix timestamps
/// in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub times: Vec<f64>,
}

impl FileListing {
    /// The (name, unix-time) entries, zipped pairwise.
    ///
    /// A length mismatch between the arrays truncates to the shorter one.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.files
            .iter()
            .map(String::as_str)
            .zip(self.times.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.files.len().min(self.times.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trigger settings readout, from `/get_SH`.
///
/// The server returns a positional array; the accessors below name the
/// slots the dashboard displays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerSettings {
    #[serde(default)]
    pub settings: Vec<serde_json::Value>,
}

impl TriggerSettings {
    /// Display labels and their slot indices, in readout order.
    pub const FIELDS: [(&'static str, usize); 11] = [
        ("NHIT 3 events", 0),
        ("NHIT 5 events", 1),
        ("NHIT 7 events", 2),
        ("NHIT 10 events", 3),
        ("Window", 4),
        ("Pre window", 5),
        ("Post window", 6),
        ("External", 7),
        ("High threshold", 8),
        ("High events", 9),
        ("High survival", 10),
    ];

    /// The value at a slot, rendered for display. Missing slots show "-".
    pub fn display(&self, slot: usize) -> String {
        match self.settings.get(slot) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => "-".to_string(),
        }
    }
}

/// Fetch the file listing for one stream.
pub async fn fetch_listing(
    client: &Client,
    endpoint: &str,
    name: &str,
) -> Result<FileListing, FetchError> {
    let url = format!("{endpoint}/get_l3");
    let response = client.get(&url).query(&[("name", name)]).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Http(format!(
            "listing endpoint returned status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

/// Fetch the current trigger settings.
pub async fn fetch_settings(client: &Client, endpoint: &str) -> Result<TriggerSettings, FetchError> {
    let url = format!("{endpoint}/get_SH");
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Http(format!(
            "settings endpoint returned status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing() {
        let json = r#"{"files": ["run_0001.zdab", "run_0002.zdab"], "times": [1000.0, 2000.0]}"#;
        let listing: FileListing = serde_json::from_str(json).unwrap();

        assert_eq!(listing.len(), 2);
        let entries: Vec<_> = listing.entries().collect();
        assert_eq!(entries[0], ("run_0001.zdab", 1000.0));
        assert_eq!(entries[1], ("run_0002.zdab", 2000.0));
    }

    #[test]
    fn test_listing_length_mismatch_truncates() {
        let json = r#"{"files": ["a", "b", "c"], "times": [1.0]}"#;
        let listing: FileListing = serde_json::from_str(json).unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.entries().count(), 1);
    }

    #[test]
    fn test_listing_tolerates_missing_keys() {
        let listing: FileListing = serde_json::from_str("{}").unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_settings_display_by_slot() {
        let json = r#"{"settings": [3, 5, 7, 10, 220, 80, 120, 1, "15.5", 4, 0.9]}"#;
        let settings: TriggerSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.display(0), "3");
        assert_eq!(settings.display(4), "220");
        // String values are shown without quotes
        assert_eq!(settings.display(8), "15.5");
        assert_eq!(settings.display(10), "0.9");
    }

    #[test]
    fn test_settings_missing_slot_shows_dash() {
        let settings: TriggerSettings = serde_json::from_str(r#"{"settings": [1]}"#).unwrap();
        assert_eq!(settings.display(10), "-");
    }
}
