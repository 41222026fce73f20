// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with evaluating and constructing terms.

use thiserror::Error;

use crate::jones::JonesError;

/// Failures of a single evaluation. These never outlive the query point that
/// produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TermError {
    #[error("Direction is below the horizon (elevation {el_rad} radians)")]
    BelowHorizon { el_rad: f64 },

    #[error("Frequency {freq_hz} Hz is outside of the valid band ({min_hz} Hz to {max_hz} Hz)")]
    FreqOutOfBand { freq_hz: f64, min_hz: f64, max_hz: f64 },

    #[error(transparent)]
    Singular(#[from] JonesError),

    #[error("This term belongs to station '{expected}', but was asked about station '{got}'")]
    StationMismatch { expected: String, got: String },

    #[error("{0}")]
    Custom(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandpassError {
    #[error("A bandpass needs at least one tabulated frequency")]
    Empty,

    #[error("Got {freqs} bandpass frequencies but {gains} gains")]
    LengthMismatch { freqs: usize, gains: usize },

    #[error("Bandpass entry {0} is not finite")]
    NonFinite(usize),

    #[error("Bandpass frequencies must be strictly increasing; entry {0} isn't")]
    NotIncreasing(usize),
}
