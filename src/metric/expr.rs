//! Metric expression naming.
//!
//! Expressions are queried under their server-side names but shown under
//! display aliases; the fixed orderings here match the physical layout of
//! the detector, not anything sortable.

use crate::data::mask::CRATE_SLOTS;

/// Cavity temperature sensor numbers in display order (top of the cavity
/// down to the bottom).
pub const TEMP_SENSOR_ORDER: [u8; 30] = [
    20, 16, 7, 22, 24, 21, 0, 23, 12, 3, 13, 26, 1, 9, 4, 14, 29, 8, 5, 2, 27, 18, 11, 19, 25, 17,
    15, 28, 6, 10,
];

/// Remote control room stations with a network monitor feed.
pub const REMOTE_STATIONS: [&str; 9] = [
    "crug", "crag", "cruc", "crlu", "crox", "crup", "crab", "crlip", "crum",
];

/// The display alias for a metric expression.
///
/// The 20LB trigger reads better as 20L, and EXT6 is wired to the missing
/// clock alarm.
pub fn display_name(expr: &str) -> &str {
    match expr {
        "20LB" => "20L",
        "20LB-Baseline" => "20L-Baseline",
        "EXT6" => "NO CLOCK",
        _ => expr,
    }
}

/// Expressions for the cavity temperature sensors, in display order.
pub fn temperature_exprs() -> Vec<String> {
    TEMP_SENSOR_ORDER
        .iter()
        .map(|sensor| format!("temp-{sensor}"))
        .collect()
}

/// The heartbeat / packets-sent / packets-lost expression triple for a
/// remote station.
pub fn station_exprs(station: &str) -> [String; 3] {
    [
        format!("{station}-heartbeat"),
        format!("{station}-packets-sent"),
        format!("{station}-packets-lost"),
    ]
}

/// Expressions for the per-crate series: slot 0 is the detector-wide
/// average, slot `i` is crate `i - 1`.
pub fn crate_exprs(prefix: &str) -> Vec<String> {
    (0..CRATE_SLOTS)
        .map(|slot| {
            if slot == 0 {
                format!("{prefix}-average")
            } else {
                format!("{prefix}-{}", slot - 1)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_aliases() {
        assert_eq!(display_name("20LB"), "20L");
        assert_eq!(display_name("20LB-Baseline"), "20L-Baseline");
        assert_eq!(display_name("EXT6"), "NO CLOCK");
        assert_eq!(display_name("temp-12"), "temp-12");
    }

    #[test]
    fn test_temperature_exprs_keep_sensor_order() {
        let exprs = temperature_exprs();
        assert_eq!(exprs.len(), 30);
        assert_eq!(exprs[0], "temp-20");
        assert_eq!(exprs[29], "temp-10");
    }

    #[test]
    fn test_station_exprs() {
        let [hb, sent, lost] = station_exprs("crug");
        assert_eq!(hb, "crug-heartbeat");
        assert_eq!(sent, "crug-packets-sent");
        assert_eq!(lost, "crug-packets-lost");
    }

    #[test]
    fn test_crate_exprs() {
        let exprs = crate_exprs("crate-rate");
        assert_eq!(exprs.len(), CRATE_SLOTS);
        assert_eq!(exprs[0], "crate-rate-average");
        assert_eq!(exprs[1], "crate-rate-0");
        assert_eq!(exprs[19], "crate-rate-18");
    }
}
