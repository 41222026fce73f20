// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The analytic pattern of a single dual-polarised element: a pair of crossed,
//! short dipoles above an infinite ground plane.

use std::f64::consts::TAU;

use crate::{
    array::ArrayBeamError, constants::VEL_C, coord::LocalDirection, jones::JonesMatrix,
};

/// Ground-plane gains smaller than this at the reference frequency are
/// considered nulls.
const NULL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ElementPattern {
    dipole_height_metres: f64,
    /// The ground-plane gain at zenith and the reference frequency.
    zenith_gain: f64,
}

impl ElementPattern {
    /// Without a height, the dipoles sit a quarter wavelength (at the
    /// reference frequency) above the ground plane.
    pub(crate) fn new(
        reference_freq_hz: f64,
        dipole_height_metres: Option<f64>,
    ) -> Result<ElementPattern, ArrayBeamError> {
        let h = dipole_height_metres.unwrap_or(VEL_C / (4.0 * reference_freq_hz));
        if !h.is_finite() || h <= 0.0 {
            return Err(ArrayBeamError::BadDipoleHeight(h));
        }
        let zenith_gain = (TAU * h * reference_freq_hz / VEL_C).sin();
        if zenith_gain.abs() < NULL_TOLERANCE {
            return Err(ArrayBeamError::BadDipoleHeight(h));
        }
        Ok(ElementPattern {
            dipole_height_metres: h,
            zenith_gain,
        })
    }

    pub(crate) fn dipole_height_metres(&self) -> f64 {
        self.dipole_height_metres
    }

    /// The gain of a horizontal dipole and its image in the ground plane,
    /// relative to zenith at the reference frequency.
    fn ground_gain(&self, freq_hz: f64, cos_za: f64) -> f64 {
        (TAU * self.dipole_height_metres * freq_hz / VEL_C * cos_za).sin() / self.zenith_gain
    }

    /// The response of the x (first row) and y (second row) dipoles to the
    /// two components of the station's Ludwig-3 basis (columns).
    pub(crate) fn jones(&self, local: &LocalDirection, freq_hz: f64) -> JonesMatrix {
        let [e1, e2] = local.station_basis();
        let g = self.ground_gain(freq_hz, local.station[2]);
        JonesMatrix::from([e1[0], e2[0], e1[1], e2[1]]) * g
    }
}
