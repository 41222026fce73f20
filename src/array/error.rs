// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with constructing array beams.

use thiserror::Error;

use crate::types::Pol;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayBeamError {
    #[error("The frequency band {min_hz} Hz to {max_hz} Hz is empty or not finite")]
    BadBand { min_hz: f64, max_hz: f64 },

    #[error("The reference frequency {ref_hz} Hz is outside of the band {min_hz} Hz to {max_hz} Hz")]
    RefFreqOutOfBand { ref_hz: f64, min_hz: f64, max_hz: f64 },

    #[error("The dipole height {0} m must be positive and must not put the reference frequency on a null of the ground plane")]
    BadDipoleHeight(f64),

    #[error("The number of element weights must be {expected1} or {expected2}; got {got}")]
    IncorrectWeightsLength {
        got: usize,
        expected1: usize,
        expected2: usize,
    },

    #[error("Element weight {0} is not finite")]
    NonFiniteWeight(usize),

    #[error("The {0} element weights sum to zero; the beam can't be normalised")]
    NoResponse(Pol),
}
