// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation epochs.
//!
//! A [`Time`] is kept as a whole Modified Julian Day plus seconds into that day
//! (UTC, which is treated as UT1). Splitting the epoch this way means that
//! differences between epochs and the Earth rotation angle never subtract two
//! large, nearly-equal numbers of seconds.

use crate::constants::{DAYSEC, MJD_J2000};

/// An epoch of observation.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Time {
    /// Whole MJD days.
    mjd_day: i64,
    /// Seconds since the start of `mjd_day`; always in `[0, 86400)`.
    sec_of_day: f64,
}

impl Time {
    /// Create a [`Time`] from a whole MJD day and an offset in seconds. The
    /// offset may be negative or larger than a day; the result is normalised.
    pub fn from_parts(mjd_day: i64, seconds: f64) -> Time {
        let extra_days = (seconds / DAYSEC).floor();
        let mut sec_of_day = seconds - extra_days * DAYSEC;
        let mut mjd_day = mjd_day + extra_days as i64;
        // Rounding can leave us sitting exactly on the end of the day.
        if sec_of_day >= DAYSEC {
            sec_of_day -= DAYSEC;
            mjd_day += 1;
        }
        Time {
            mjd_day,
            sec_of_day,
        }
    }

    /// Create a [`Time`] from MJD seconds (the measurement-set convention).
    pub fn from_mjd_seconds(mjd_seconds: f64) -> Time {
        Time::from_parts(0, mjd_seconds)
    }

    /// Create a [`Time`] from a (fractional) MJD.
    pub fn from_mjd(mjd: f64) -> Time {
        let day = mjd.floor();
        Time::from_parts(day as i64, (mjd - day) * DAYSEC)
    }

    /// Create a [`Time`] from seconds elapsed since J2000.0 (2000-01-01 12:00).
    pub fn from_j2000_seconds(seconds: f64) -> Time {
        Time::from_parts(MJD_J2000, DAYSEC / 2.0 + seconds)
    }

    /// The J2000.0 epoch.
    pub fn j2000() -> Time {
        Time::from_j2000_seconds(0.0)
    }

    /// A series of epochs starting at `begin` and separated by `step_s`
    /// seconds, covering `duration_s` seconds. `begin` is always included; the
    /// end of the range is exclusive.
    pub fn range(begin: Time, duration_s: f64, step_s: f64) -> Vec<Time> {
        if step_s.is_nan() || duration_s.is_nan() || step_s <= 0.0 || duration_s <= 0.0 {
            return vec![begin];
        }
        let n = (duration_s / step_s).ceil() as usize;
        (0..n)
            .map(|i| begin.add_seconds(i as f64 * step_s))
            .collect()
    }

    /// The whole MJD day of this epoch.
    pub fn mjd_day(&self) -> i64 {
        self.mjd_day
    }

    /// Seconds since the start of the MJD day.
    pub fn sec_of_day(&self) -> f64 {
        self.sec_of_day
    }

    /// This epoch as MJD seconds. Precision is lost for sub-microsecond detail.
    pub fn as_mjd_seconds(&self) -> f64 {
        self.mjd_day as f64 * DAYSEC + self.sec_of_day
    }

    /// Shift this epoch by some number of seconds.
    pub fn add_seconds(&self, seconds: f64) -> Time {
        Time::from_parts(self.mjd_day, self.sec_of_day + seconds)
    }

    /// The number of seconds from `other` to `self`.
    pub fn seconds_since(&self, other: &Time) -> f64 {
        (self.mjd_day - other.mjd_day) as f64 * DAYSEC + (self.sec_of_day - other.sec_of_day)
    }

    /// Days since J2000.0, split into a whole-day part and a fraction of a
    /// day. The sum is `JD(UT1) - 2451545.0`.
    pub(crate) fn j2000_days_split(&self) -> (f64, f64) {
        (
            (self.mjd_day - MJD_J2000) as f64,
            self.sec_of_day / DAYSEC - 0.5,
        )
    }

    /// Julian centuries since J2000.0.
    pub fn julian_centuries(&self) -> f64 {
        let (days, frac) = self.j2000_days_split();
        (days + frac) / 36525.0
    }

    /// Snap this epoch to the nearest multiple of `tolerance_s` seconds
    /// (counted from MJD 0), returning the snapped epoch and the multiple. A
    /// tolerance of zero (or less) returns the epoch unchanged and keys on its
    /// exact bits.
    pub(crate) fn quantise(&self, tolerance_s: f64) -> (Time, (i64, u64)) {
        if tolerance_s.is_nan() || tolerance_s <= 0.0 {
            return (*self, (self.mjd_day, self.sec_of_day.to_bits()));
        }
        let steps_per_day = DAYSEC / tolerance_s;
        let multiple =
            (self.mjd_day as f64 * steps_per_day + self.sec_of_day / tolerance_s).round();
        let snapped_day = (multiple / steps_per_day).floor();
        let snapped_secs = (multiple - snapped_day * steps_per_day) * tolerance_s;
        (
            Time::from_parts(snapped_day as i64, snapped_secs),
            (multiple as i64, 0),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::*;

    use super::*;

    #[test]
    fn test_normalisation() {
        let t = Time::from_parts(60000, -1.0);
        assert_eq!(t.mjd_day(), 59999);
        assert_abs_diff_eq!(t.sec_of_day(), DAYSEC - 1.0);

        let t = Time::from_parts(60000, 2.5 * DAYSEC);
        assert_eq!(t.mjd_day(), 60002);
        assert_abs_diff_eq!(t.sec_of_day(), DAYSEC / 2.0);
    }

    #[test]
    fn test_j2000() {
        let t = Time::j2000();
        assert_eq!(t.mjd_day(), 51544);
        assert_abs_diff_eq!(t.sec_of_day(), 43200.0);
        let (days, frac) = t.j2000_days_split();
        assert_abs_diff_eq!(days + frac, 0.0);
        assert_abs_diff_eq!(t.julian_centuries(), 0.0);
    }

    #[test]
    fn test_mjd_seconds_round_trip() {
        // 2012-04-01T01:02:03, the epoch used by the LOFAR examples.
        let mjd_seconds = 56018.0 * DAYSEC + 3723.0;
        let t = Time::from_mjd_seconds(mjd_seconds);
        assert_eq!(t.mjd_day(), 56018);
        assert_abs_diff_eq!(t.sec_of_day(), 3723.0, epsilon = 1e-6);
        assert_abs_diff_eq!(t.as_mjd_seconds(), mjd_seconds, epsilon = 1e-6);
    }

    #[test]
    fn test_small_differences_survive_large_epochs() {
        // Two epochs decades from the reference, a millisecond apart.
        let t1 = Time::from_parts(70000, 12345.678);
        let t2 = t1.add_seconds(1e-3);
        assert_abs_diff_eq!(t2.seconds_since(&t1), 1e-3, epsilon = 1e-9);
        assert_abs_diff_eq!(t1.seconds_since(&t2), -1e-3, epsilon = 1e-9);
    }

    #[test]
    fn test_range() {
        let begin = Time::from_mjd(56018.5);
        let times = Time::range(begin, 60.0, 1.0);
        assert_eq!(times.len(), 60);
        assert_abs_diff_eq!(times[59].seconds_since(&begin), 59.0, epsilon = 1e-9);

        let times = Time::range(begin, 10.0, 4.0);
        assert_eq!(times.len(), 3);

        // Degenerate inputs give only the beginning.
        assert_eq!(Time::range(begin, 0.0, 1.0), vec![begin]);
        assert_eq!(Time::range(begin, 10.0, 0.0), vec![begin]);
    }

    #[test]
    fn test_quantise() {
        let t = Time::from_parts(56018, 100.4);
        let (snapped, key) = t.quantise(1.0);
        assert_eq!(snapped.mjd_day(), 56018);
        assert_abs_diff_eq!(snapped.sec_of_day(), 100.0, epsilon = 1e-6);

        let (_, key2) = Time::from_parts(56018, 99.6).quantise(1.0);
        assert_eq!(key, key2);
        let (_, key3) = Time::from_parts(56018, 101.0).quantise(1.0);
        assert_ne!(key, key3);

        // Exact keys.
        let (same, key4) = t.quantise(0.0);
        assert_eq!(same, t);
        let (_, key5) = t.add_seconds(1e-9).quantise(0.0);
        assert_ne!(key4, key5);
    }
}
