//! FVCOM model time decoding
//!
//! FVCOM writes `time` as Modified Julian Day: floating point days since
//! 1858-11-17 00:00:00 UTC.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use ndarray::ArrayView1;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Start of the Modified Julian Day count
pub fn mjd_epoch() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1858, 11, 17)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Converts one MJD value to UTC, rounded to the nearest millisecond.
pub fn mjd_to_datetime(days: f64) -> Option<DateTime<Utc>> {
    if !days.is_finite() {
        return None;
    }
    let millis = (days * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_milliseconds(millis as i64)?;
    mjd_epoch().checked_add_signed(offset)
}

/// Decodes an extracted `time` variable.
pub fn decode_fvcom_time(days: ArrayView1<f64>) -> Vec<Option<DateTime<Utc>>> {
    days.iter().map(|&d| mjd_to_datetime(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use ndarray::array;

    #[test]
    fn test_epoch() {
        let epoch = mjd_to_datetime(0.0).unwrap();
        assert_eq!((epoch.year(), epoch.month(), epoch.day()), (1858, 11, 17));
        assert_eq!(epoch.hour(), 0);
    }

    #[test]
    fn test_known_dates() {
        // MJD 51544.5 is 2000-01-01 12:00 UTC
        let j2000 = mjd_to_datetime(51544.5).unwrap();
        assert_eq!(j2000.to_rfc3339(), "2000-01-01T12:00:00+00:00");

        let quarter = mjd_to_datetime(58849.25).unwrap();
        assert_eq!(quarter.to_rfc3339(), "2020-01-01T06:00:00+00:00");
    }

    #[test]
    fn test_decode_skips_invalid_values() {
        let decoded = decode_fvcom_time(array![51544.0, f64::NAN, f64::INFINITY, 1e300].view());
        assert_eq!(decoded.len(), 4);
        assert!(decoded[0].is_some());
        assert!(decoded[1..].iter().all(Option::is_none));
    }
}
