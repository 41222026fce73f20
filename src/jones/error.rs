// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with Jones matrix algebra.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum JonesError {
    #[error("Cannot invert a singular Jones matrix (|det| = {det:e}, tolerance {tolerance:e})")]
    Singular { det: f64, tolerance: f64 },
}
