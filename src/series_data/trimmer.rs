//! Drops the part of a station series recorded before the station was installed.

use crate::series_data::error::NoValidStart;
use crate::types::reading::RawReading;

/// Index of the first reading stamped at or after `install`.
///
/// The series is expected in the order the station emitted it; it is not
/// re-sorted. Ties resolve to the first matching reading.
pub fn trim_start(readings: &[RawReading], install: i64) -> Option<usize> {
    readings.iter().position(|r| r.timestamp >= install)
}

/// Keeps the suffix of `readings` starting at [`trim_start`].
pub fn trim_series(
    mut readings: Vec<RawReading>,
    install: i64,
) -> Result<Vec<RawReading>, NoValidStart> {
    let start = trim_start(&readings, install).ok_or(NoValidStart)?;
    Ok(readings.split_off(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(timestamps: &[i64]) -> Vec<RawReading> {
        timestamps
            .iter()
            .enumerate()
            .map(|(i, &timestamp)| RawReading {
                timestamp,
                channels: vec![Some(i as f64)],
            })
            .collect()
    }

    fn timestamps(readings: &[RawReading]) -> Vec<i64> {
        readings.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn test_trim_drops_readings_before_install() {
        let trimmed = trim_series(series(&[500, 999, 1000, 1500]), 1000).unwrap();
        assert_eq!(timestamps(&trimmed), [1000, 1500]);
    }

    #[test]
    fn test_trim_keeps_everything_when_install_predates_series() {
        let trimmed = trim_series(series(&[500, 999]), 1).unwrap();
        assert_eq!(trimmed.len(), 2);
    }

    #[test]
    fn test_tie_resolves_to_first_match() {
        let readings = series(&[10, 20, 20, 20, 30]);
        assert_eq!(trim_start(&readings, 20), Some(1));

        let trimmed = trim_series(readings, 20).unwrap();
        let markers: Vec<_> = trimmed.iter().map(|r| r.channels[0]).collect();
        assert_eq!(markers, [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_no_valid_start() {
        assert_eq!(trim_series(Vec::new(), 1000), Err(NoValidStart));
        assert_eq!(trim_series(series(&[1000, 2000, 4000]), 5000), Err(NoValidStart));
    }

    #[test]
    fn test_unsorted_tail_is_not_reordered() {
        // A late reading stamped before install still survives once the start is found.
        let trimmed = trim_series(series(&[100, 1200, 900, 1300]), 1000).unwrap();
        assert_eq!(timestamps(&trimmed), [1200, 900, 1300]);
    }

    #[test]
    fn test_trim_point_invariant_holds_for_every_threshold() {
        let readings = series(&[3, 3, 8, 15, 15, 42]);
        for install in 0..50 {
            match trim_start(&readings, install) {
                Some(i) => {
                    assert!(readings[i].timestamp >= install);
                    assert!(readings[..i].iter().all(|r| r.timestamp < install));
                    let trimmed = trim_series(readings.clone(), install).unwrap();
                    assert_eq!(trimmed.as_slice(), &readings[i..]);
                }
                None => assert!(readings.iter().all(|r| r.timestamp < install)),
            }
        }
    }
}
