// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with constructing stations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationError {
    #[error("A station must have a name")]
    EmptyName,

    #[error("Station '{0}' has no antenna elements")]
    NoElements(String),

    #[error("Antenna element {index} has {got} coordinates; expected 2 (east, north) or 3 (east, north, height)")]
    BadDimension { index: usize, got: usize },

    #[error("Antenna element {index} has a non-finite position")]
    NonFiniteOffset { index: usize },

    #[error("The station latitude ({0} radians) is not within [-pi/2, pi/2]")]
    BadLatitude(f64),

    #[error("The station longitude ({0} radians) is not finite")]
    BadLongitude(f64),

    #[error("The station height ({0} m) is not finite")]
    BadHeight(f64),

    #[error("The station rotation matrix is not a proper rotation (orthonormal, determinant +1)")]
    NotARotation,
}
