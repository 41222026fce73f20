// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A frequency-only, diagonal gain term.

use log::debug;
use num_complex::Complex64 as c64;

use super::{BandpassError, Term, TermError};
use crate::{direction::Direction, jones::JonesMatrix, station::Station, time::Time};

/// Complex gains of the two polarisations, tabulated against frequency and
/// linearly interpolated between entries. Frequencies outside the table are
/// rejected rather than extrapolated.
#[derive(Debug, Clone, PartialEq)]
pub struct BandpassTerm {
    freqs_hz: Vec<f64>,
    /// X then Y.
    gains: Vec<[c64; 2]>,
}

impl BandpassTerm {
    pub fn new(freqs_hz: Vec<f64>, gains: Vec<[c64; 2]>) -> Result<BandpassTerm, BandpassError> {
        if freqs_hz.is_empty() {
            return Err(BandpassError::Empty);
        }
        if freqs_hz.len() != gains.len() {
            return Err(BandpassError::LengthMismatch {
                freqs: freqs_hz.len(),
                gains: gains.len(),
            });
        }
        for (i, (f, g)) in freqs_hz.iter().zip(gains.iter()).enumerate() {
            if !f.is_finite() || g.iter().any(|g| !g.is_finite()) {
                return Err(BandpassError::NonFinite(i));
            }
        }
        if let Some(i) = freqs_hz.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BandpassError::NotIncreasing(i + 1));
        }

        debug!(
            "Created a bandpass with {} entries ({} Hz to {} Hz)",
            freqs_hz.len(),
            freqs_hz[0],
            freqs_hz[freqs_hz.len() - 1]
        );
        Ok(BandpassTerm { freqs_hz, gains })
    }

    /// A bandpass with the same gain on both polarisations.
    pub fn unpolarised(freqs_hz: Vec<f64>, gains: Vec<c64>) -> Result<BandpassTerm, BandpassError> {
        BandpassTerm::new(freqs_hz, gains.into_iter().map(|g| [g, g]).collect())
    }

    /// The interpolated X and Y gains at `freq_hz`.
    pub fn gains_at(&self, freq_hz: f64) -> Result<[c64; 2], TermError> {
        let min_hz = self.freqs_hz[0];
        let max_hz = self.freqs_hz[self.freqs_hz.len() - 1];
        if freq_hz.is_nan() || freq_hz < min_hz || freq_hz > max_hz {
            return Err(TermError::FreqOutOfBand {
                freq_hz,
                min_hz,
                max_hz,
            });
        }

        // The first entry above `freq_hz`; the one before it is at or below.
        let upper = self.freqs_hz.partition_point(|&f| f <= freq_hz);
        if upper == self.freqs_hz.len() {
            return Ok(self.gains[upper - 1]);
        }
        let lower = upper - 1;
        let (f0, f1) = (self.freqs_hz[lower], self.freqs_hz[upper]);
        let w = (freq_hz - f0) / (f1 - f0);
        let [x0, y0] = self.gains[lower];
        let [x1, y1] = self.gains[upper];
        Ok([x0 + (x1 - x0) * w, y0 + (y1 - y0) * w])
    }
}

impl Term for BandpassTerm {
    fn evaluate(
        &self,
        _direction: &Direction,
        _time: &Time,
        freq_hz: f64,
        _station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        let [x, y] = self.gains_at(freq_hz)?;
        Ok(JonesMatrix::diag(x, y))
    }

    fn name(&self) -> &str {
        "bandpass"
    }
}
