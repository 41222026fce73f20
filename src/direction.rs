// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Directions on the sky.

use std::f64::consts::{FRAC_PI_2, TAU};

use marlu::{AzEl, RADec};

/// A trait that describes a coordinate pair in a horizonal coordinate system.
/// Beam codes historically specified (azimuth, zenith angle) rather than the
/// perhaps-more-familiar "alt az" (altitude, azimuth), so we conform with
/// history here.
pub trait HorizCoord: Copy {
    /// Get the azimuth of this coordinate.
    fn get_az(&self) -> f64;
    /// Get the elevation of this coordinate.
    fn get_el(&self) -> f64;
    /// Get the zenith angle of this coordinate.
    fn get_za(&self) -> f64 {
        FRAC_PI_2 - self.get_el()
    }
}

impl<C: HorizCoord> HorizCoord for &C {
    fn get_az(&self) -> f64 {
        (*self).get_az()
    }

    fn get_el(&self) -> f64 {
        (*self).get_el()
    }
}

impl HorizCoord for AzEl {
    fn get_az(&self) -> f64 {
        self.az
    }

    fn get_el(&self) -> f64 {
        self.el
    }
}

/// We assume that a tuple of floats is (azimuth, zenith angle), both in
/// radians.
impl HorizCoord for (f64, f64) {
    fn get_az(&self) -> f64 {
        self.0
    }

    fn get_el(&self) -> f64 {
        FRAC_PI_2 - self.1
    }

    fn get_za(&self) -> f64 {
        self.1
    }
}

/// A direction to be fed to a measurement equation.
///
/// Celestial directions are (J2000) equatorial coordinates; they are
/// converted to a station's local frame for every epoch. Local directions are
/// fixed in the station's horizontal frame (azimuth is measured from north
/// through east) and don't move with time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Right ascension and declination \[radians\].
    RaDec { ra_rad: f64, dec_rad: f64 },

    /// Azimuth and elevation in a station's local horizontal frame \[radians\].
    AzEl { az_rad: f64, el_rad: f64 },
}

impl Direction {
    /// A celestial direction from radians.
    pub fn from_radec(ra_rad: f64, dec_rad: f64) -> Direction {
        Direction::RaDec { ra_rad, dec_rad }
    }

    /// A celestial direction from degrees.
    pub fn from_radec_degrees(ra_deg: f64, dec_deg: f64) -> Direction {
        Direction::from_radec(ra_deg.to_radians(), dec_deg.to_radians())
    }

    /// A direction fixed in the local horizontal frame.
    pub fn from_horiz<C: HorizCoord>(coord: C) -> Direction {
        Direction::AzEl {
            az_rad: coord.get_az(),
            el_rad: coord.get_el(),
        }
    }

    /// The local zenith.
    pub fn zenith() -> Direction {
        Direction::AzEl {
            az_rad: 0.0,
            el_rad: FRAC_PI_2,
        }
    }

    /// A celestial direction from an equatorial cartesian vector (x towards
    /// RA = 0, z towards the north celestial pole). The vector is normalised;
    /// `None` is returned if it has no length or isn't finite.
    pub fn from_vector(v: [f64; 3]) -> Option<Direction> {
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return None;
        }
        let [x, y, z] = v.map(|c| c / norm);
        Some(Direction::RaDec {
            ra_rad: y.atan2(x).rem_euclid(TAU),
            dec_rad: z.clamp(-1.0, 1.0).asin(),
        })
    }

    /// The unit vector of this direction in its own frame. For celestial
    /// directions this is equatorial (x towards RA = 0, z towards the pole);
    /// for local directions this is East, North, Up.
    pub fn to_vector(&self) -> [f64; 3] {
        match *self {
            Direction::RaDec { ra_rad, dec_rad } => {
                let (s_ra, c_ra) = ra_rad.sin_cos();
                let (s_dec, c_dec) = dec_rad.sin_cos();
                [c_dec * c_ra, c_dec * s_ra, s_dec]
            }
            Direction::AzEl { az_rad, el_rad } => {
                let (s_az, c_az) = az_rad.sin_cos();
                let (s_el, c_el) = el_rad.sin_cos();
                [c_el * s_az, c_el * c_az, s_el]
            }
        }
    }

    /// Is this direction fixed in the local frame?
    pub fn is_local(&self) -> bool {
        matches!(self, Direction::AzEl { .. })
    }

    /// Get this direction as a [`RADec`], if it's celestial.
    pub fn to_radec(&self) -> Option<RADec> {
        match *self {
            Direction::RaDec { ra_rad, dec_rad } => Some(RADec::from_radians(ra_rad, dec_rad)),
            Direction::AzEl { .. } => None,
        }
    }

    /// Get this direction as an [`AzEl`], if it's local.
    pub fn to_azel(&self) -> Option<AzEl> {
        match *self {
            Direction::RaDec { .. } => None,
            Direction::AzEl { az_rad, el_rad } => Some(AzEl::from_radians(az_rad, el_rad)),
        }
    }

    /// Snap both coordinates to multiples of `tolerance_rad`, returning the
    /// snapped direction and the key identifying its bucket. A tolerance of
    /// zero (or less) keys on the exact bits of the coordinates.
    pub(crate) fn quantise(&self, tolerance_rad: f64) -> (Direction, DirectionKey) {
        let (local, a, b) = match *self {
            Direction::RaDec { ra_rad, dec_rad } => (false, ra_rad, dec_rad),
            Direction::AzEl { az_rad, el_rad } => (true, az_rad, el_rad),
        };
        if tolerance_rad.is_nan() || tolerance_rad <= 0.0 {
            return (
                *self,
                DirectionKey {
                    local,
                    a: a.to_bits() as i64,
                    b: b.to_bits() as i64,
                },
            );
        }

        let qa = (a / tolerance_rad).round();
        let qb = (b / tolerance_rad).round();
        let (sa, sb) = (qa * tolerance_rad, qb * tolerance_rad);
        let snapped = if local {
            Direction::AzEl {
                az_rad: sa,
                el_rad: sb,
            }
        } else {
            Direction::RaDec {
                ra_rad: sa,
                dec_rad: sb,
            }
        };
        (
            snapped,
            DirectionKey {
                local,
                a: qa as i64,
                b: qb as i64,
            },
        )
    }
}

impl From<RADec> for Direction {
    fn from(radec: RADec) -> Self {
        Direction::from_radec(radec.ra, radec.dec)
    }
}

impl From<AzEl> for Direction {
    fn from(azel: AzEl) -> Self {
        Direction::from_horiz(azel)
    }
}

/// The part of a cache key that identifies a (quantised) direction.
#[derive(Hash, Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct DirectionKey {
    local: bool,
    a: i64,
    b: i64,
}
