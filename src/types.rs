// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

use crate::direction::DirectionKey;

/// The two linear polarisations of a dual-polarised antenna element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pol {
    /// The dipole along the station's x axis.
    X,
    /// The dipole along the station's y axis.
    Y,
}

impl std::fmt::Display for Pol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Pol::X => "X",
                Pol::Y => "Y",
            }
        )
    }
}

/// A key into an [`EvaluationCache`](crate::EvaluationCache). Keys are made by
/// [`EvaluationCache::quantise`](crate::EvaluationCache::quantise), which
/// snaps the query to the cache's tolerances.
#[derive(Hash, Debug, Clone, Copy, Eq, PartialEq)]
pub struct CacheKey {
    term: u64,
    station: u64,
    direction: DirectionKey,
    time: (i64, u64),
    freq: u64,
}

impl CacheKey {
    pub(crate) fn new(
        term: u64,
        station: u64,
        direction: DirectionKey,
        time: (i64, u64),
        freq: u64,
    ) -> CacheKey {
        CacheKey {
            term,
            station,
            direction,
            time,
            freq,
        }
    }
}

/// Snap a frequency to the nearest multiple of `tolerance_hz`, returning the
/// snapped frequency and its key. A tolerance of zero (or less) keys on the
/// exact bits of the frequency.
pub(crate) fn quantise_freq(freq_hz: f64, tolerance_hz: f64) -> (f64, u64) {
    if tolerance_hz.is_nan() || tolerance_hz <= 0.0 {
        return (freq_hz, freq_hz.to_bits());
    }
    let multiple = (freq_hz / tolerance_hz).round();
    (multiple * tolerance_hz, multiple as i64 as u64)
}
