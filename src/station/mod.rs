// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Station geometry.
//!
//! A [`Station`] is a reference position on the Earth, an ordered set of
//! antenna-element offsets, and an orientation. Element offsets are given in
//! the station's own frame (x and y along the two dipole arms, z normal to
//! the ground plane), which is related to local East, North, Up by an
//! orthonormal rotation. Stations are immutable once built.

mod error;

pub use error::StationError;

use std::{
    collections::hash_map::DefaultHasher,
    f64::consts::FRAC_PI_2,
    hash::{Hash, Hasher},
};

use log::debug;
use marlu::LatLngHeight;

/// A 3x3 rotation matrix, row-major.
pub type Rotation = [[f64; 3]; 3];

const IDENTITY_ROTATION: Rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// How far from orthonormal a user-supplied rotation may be.
const ROTATION_TOLERANCE: f64 = 1e-6;

/// A telescope station.
#[derive(Clone, Debug)]
pub struct Station {
    name: String,
    position: LatLngHeight,
    /// Converts station-frame vectors into East, North, Up; the columns are the
    /// station axes expressed in ENU.
    rotation: Rotation,
    /// Element offsets in the station frame \[metres\].
    elements: Vec<[f64; 3]>,
    /// The same offsets in East, North, Up \[metres\].
    elements_enu: Vec<[f64; 3]>,
    /// A hash of everything above.
    id: u64,
}

impl Station {
    /// Create a new [`Station`] whose frame is aligned with East, North, Up.
    /// `elements` are (east, north, height) offsets from the reference position
    /// in metres.
    pub fn new<S: Into<String>>(
        name: S,
        position: LatLngHeight,
        elements: Vec<[f64; 3]>,
    ) -> Result<Station, StationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StationError::EmptyName);
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&position.latitude_rad) {
            return Err(StationError::BadLatitude(position.latitude_rad));
        }
        if !position.longitude_rad.is_finite() {
            return Err(StationError::BadLongitude(position.longitude_rad));
        }
        if !position.height_metres.is_finite() {
            return Err(StationError::BadHeight(position.height_metres));
        }
        if elements.is_empty() {
            return Err(StationError::NoElements(name));
        }
        if let Some(index) = elements
            .iter()
            .position(|e| e.iter().any(|c| !c.is_finite()))
        {
            return Err(StationError::NonFiniteOffset { index });
        }

        debug!(
            "Created station '{name}' with {} elements at lat {:.6} rad, long {:.6} rad",
            elements.len(),
            position.latitude_rad,
            position.longitude_rad
        );
        let mut station = Station {
            name,
            position,
            rotation: IDENTITY_ROTATION,
            elements_enu: elements.clone(),
            elements,
            id: 0,
        };
        station.id = station.hash_geometry();
        Ok(station)
    }

    /// Create a new [`Station`] from loosely-typed offsets, as they might come
    /// out of an antenna-configuration loader. Each offset must have 2 (east,
    /// north) or 3 (east, north, height) coordinates.
    pub fn from_offsets<S: Into<String>, V: AsRef<[f64]>>(
        name: S,
        position: LatLngHeight,
        offsets: &[V],
    ) -> Result<Station, StationError> {
        let elements = offsets
            .iter()
            .enumerate()
            .map(|(index, offset)| match *offset.as_ref() {
                [e, n] => Ok([e, n, 0.0]),
                [e, n, h] => Ok([e, n, h]),
                ref other => Err(StationError::BadDimension {
                    index,
                    got: other.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Station::new(name, position, elements)
    }

    /// Orient this station. `rotation` converts station-frame vectors into
    /// East, North, Up (its columns are the station axes in ENU). The element
    /// offsets given at construction are re-interpreted as being in the
    /// station frame.
    pub fn with_rotation(mut self, rotation: Rotation) -> Result<Station, StationError> {
        if !is_proper_rotation(&rotation) {
            return Err(StationError::NotARotation);
        }
        self.rotation = rotation;
        self.elements_enu = self
            .elements
            .iter()
            .map(|e| mat_vec(&rotation, e))
            .collect();
        self.id = self.hash_geometry();
        Ok(self)
    }

    /// Rotate the station frame about the local vertical by `angle_rad`
    /// (positive from east towards north).
    pub fn with_rotation_angle(self, angle_rad: f64) -> Result<Station, StationError> {
        let (s, c) = angle_rad.sin_cos();
        self.with_rotation([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> LatLngHeight {
        self.position
    }

    pub fn latitude_rad(&self) -> f64 {
        self.position.latitude_rad
    }

    pub fn longitude_rad(&self) -> f64 {
        self.position.longitude_rad
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    /// Element offsets in the station frame \[metres\].
    pub fn elements(&self) -> &[[f64; 3]] {
        &self.elements
    }

    /// Element offsets in East, North, Up \[metres\].
    pub fn elements_enu(&self) -> &[[f64; 3]] {
        &self.elements_enu
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Express an ENU vector in the station frame.
    pub fn enu_to_station(&self, v: &[f64; 3]) -> [f64; 3] {
        let r = &self.rotation;
        [
            r[0][0] * v[0] + r[1][0] * v[1] + r[2][0] * v[2],
            r[0][1] * v[0] + r[1][1] * v[1] + r[2][1] * v[2],
            r[0][2] * v[0] + r[1][2] * v[1] + r[2][2] * v[2],
        ]
    }

    /// Express a station-frame vector in ENU.
    pub fn station_to_enu(&self, v: &[f64; 3]) -> [f64; 3] {
        mat_vec(&self.rotation, v)
    }

    /// A hash identifying this station's name and geometry.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    fn hash_geometry(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let hasher = &mut hasher;
        self.name.hash(hasher);
        // We can't hash f64 values, but we can hash their bits.
        for v in [
            self.position.longitude_rad,
            self.position.latitude_rad,
            self.position.height_metres,
        ] {
            v.to_bits().hash(hasher);
        }
        for row in &self.rotation {
            for v in row {
                v.to_bits().hash(hasher);
            }
        }
        for e in &self.elements {
            for v in e {
                v.to_bits().hash(hasher);
            }
        }
        hasher.finish()
    }
}

fn mat_vec(m: &Rotation, v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn is_proper_rotation(m: &Rotation) -> bool {
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return false;
    }
    // R^T R = I
    for i in 0..3 {
        for j in 0..3 {
            let dot: f64 = (0..3).map(|k| m[k][i] * m[k][j]).sum();
            let expected = if i == j { 1.0 } else { 0.0 };
            if (dot - expected).abs() > ROTATION_TOLERANCE {
                return false;
            }
        }
    }
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    (det - 1.0).abs() < ROTATION_TOLERANCE
}
