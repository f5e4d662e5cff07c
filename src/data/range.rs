//! Search range form state and validation.
//!
//! The module-history search form accepts a range by run number, GTID or
//! date. Validation rejects empty fields and out-of-order ranges before a
//! query is built; errors surface in the status bar.

use thiserror::Error;

/// Which key the range searches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Run,
    Gtid,
    Date,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Run => "run",
            SearchField::Gtid => "gtid",
            SearchField::Date => "date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Run => "Run",
            SearchField::Gtid => "GTID",
            SearchField::Date => "Date",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "run" => Some(SearchField::Run),
            "gtid" => Some(SearchField::Gtid),
            "date" => Some(SearchField::Date),
            _ => None,
        }
    }

    /// Cycle to the next field choice.
    pub fn next(self) -> Self {
        match self {
            SearchField::Run => SearchField::Gtid,
            SearchField::Gtid => SearchField::Date,
            SearchField::Date => SearchField::Run,
        }
    }
}

/// Validation failures for a range query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Both start and end fields are required")]
    MissingField,

    #[error("End value must not come before start value")]
    OutOfOrder,

    #[error("Start and end must be numbers for {0} searches")]
    NotNumeric(&'static str),
}

/// A search range as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeQuery {
    pub field: SearchField,
    pub start: String,
    pub end: String,
}

impl RangeQuery {
    /// Validate the form.
    ///
    /// Accepts any range with `end >= start`; dates compare
    /// lexicographically (ISO order), runs and GTIDs numerically.
    pub fn validate(&self) -> Result<(), RangeError> {
        let start = self.start.trim();
        let end = self.end.trim();

        if start.is_empty() || end.is_empty() {
            return Err(RangeError::MissingField);
        }

        match self.field {
            SearchField::Date => {
                if end < start {
                    return Err(RangeError::OutOfOrder);
                }
            }
            SearchField::Run | SearchField::Gtid => {
                let start: i64 = start
                    .parse()
                    .map_err(|_| RangeError::NotNumeric(self.field.as_str()))?;
                let end: i64 = end
                    .parse()
                    .map_err(|_| RangeError::NotNumeric(self.field.as_str()))?;
                if end < start {
                    return Err(RangeError::OutOfOrder);
                }
            }
        }

        Ok(())
    }

    /// Build the search query string for navigation.
    pub fn to_query(&self) -> String {
        query_string(&[
            ("search", self.field.as_str()),
            ("start", self.start.trim()),
            ("end", self.end.trim()),
        ])
    }

    /// Restore a form from a query string, the inverse of [`to_query`].
    /// Unknown keys are ignored; a missing or unknown `search` key keeps
    /// the default field.
    ///
    /// [`to_query`]: RangeQuery::to_query
    pub fn from_query(query: &str) -> Self {
        let mut form = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = decode(value);
            match key {
                "search" => {
                    if let Some(field) = SearchField::parse(&value) {
                        form.field = field;
                    }
                }
                "start" => form.start = value,
                "end" => form.end = value,
                _ => {}
            }
        }

        form
    }
}

/// Build a query string from key/value pairs, percent-encoding values.
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 3 <= bytes.len() => {
                match s.get(i + 1..i + 3).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(field: SearchField, start: &str, end: &str) -> RangeQuery {
        RangeQuery {
            field,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn test_empty_fields_reject() {
        assert_eq!(
            form(SearchField::Run, "", "100").validate(),
            Err(RangeError::MissingField)
        );
        assert_eq!(
            form(SearchField::Run, "100", "").validate(),
            Err(RangeError::MissingField)
        );
        assert_eq!(
            form(SearchField::Date, "", "").validate(),
            Err(RangeError::MissingField)
        );
    }

    #[test]
    fn test_ordered_ranges_accept() {
        assert!(form(SearchField::Run, "100", "200").validate().is_ok());
        assert!(form(SearchField::Gtid, "5", "5").validate().is_ok());
        assert!(form(SearchField::Date, "2026-01-01", "2026-02-01")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_out_of_order_rejects() {
        assert_eq!(
            form(SearchField::Run, "200", "100").validate(),
            Err(RangeError::OutOfOrder)
        );
        assert_eq!(
            form(SearchField::Date, "2026-02-01", "2026-01-01").validate(),
            Err(RangeError::OutOfOrder)
        );
    }

    #[test]
    fn test_numeric_comparison_is_not_lexicographic() {
        // "9" > "10" as strings; run search must compare numerically
        assert!(form(SearchField::Run, "9", "10").validate().is_ok());
    }

    #[test]
    fn test_non_numeric_run_rejects() {
        assert_eq!(
            form(SearchField::Run, "abc", "200").validate(),
            Err(RangeError::NotNumeric("run"))
        );
    }

    #[test]
    fn test_query_round_trip() {
        let original = form(SearchField::Date, "2026-01-01", "2026-02-01");
        let query = original.to_query();
        assert_eq!(query, "search=date&start=2026-01-01&end=2026-02-01");
        assert_eq!(RangeQuery::from_query(&query), original);
    }

    #[test]
    fn test_from_query_ignores_unknown_keys() {
        let form = RangeQuery::from_query("?search=gtid&start=1&end=2&page=4");
        assert_eq!(form.field, SearchField::Gtid);
        assert_eq!(form.start, "1");
        assert_eq!(form.end, "2");
    }

    #[test]
    fn test_encoding_reserved_characters() {
        assert_eq!(query_string(&[("q", "a b&c")]), "q=a%20b%26c");
        assert_eq!(RangeQuery::from_query("start=a%20b&end=c").start, "a b");
    }
}
