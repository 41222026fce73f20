// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversions between celestial directions and a station's local frame.
//!
//! Earth orientation is modelled with the Earth Rotation Angle and the IAU
//! 2006 GMST polynomial, and J2000 directions are precessed to the mean
//! equator of date with the IAU 1976 angles. Nutation, polar motion and
//! refraction are ignored; they are far below the scale on which a station
//! beam changes.

#[cfg(test)]
mod tests;

use std::f64::consts::TAU;

use marlu::{AzEl, HADec, RADec};

use crate::{
    constants::DAS2R,
    direction::Direction,
    jones::JonesMatrix,
    station::Station,
    time::Time,
};

/// The Earth Rotation Angle (IERS 2003) \[radians\].
pub fn earth_rotation_angle(time: &Time) -> f64 {
    let (days, frac) = time.j2000_days_split();
    // Whole days only add (nearly) whole turns, so keep them apart from the
    // fraction of the day.
    let turns = frac + 0.779_057_273_264_0 + 0.002_737_811_911_354_48 * (days + frac);
    TAU * turns.rem_euclid(1.0)
}

/// Greenwich mean sidereal time (IAU 2006) \[radians\]. UT1 stands in for TT
/// in the polynomial; the difference is far below a milliarcsecond.
pub fn gmst(time: &Time) -> f64 {
    let t = time.julian_centuries();
    let poly = 0.014506
        + (4612.156534
            + (1.3915817 + (-0.00000044 + (-0.000029956 + -0.0000000368 * t) * t) * t) * t)
            * t;
    (earth_rotation_angle(time) + poly * DAS2R).rem_euclid(TAU)
}

/// Local mean sidereal time at `longitude_rad` (east positive) \[radians\].
pub fn lmst(time: &Time, longitude_rad: f64) -> f64 {
    (gmst(time) + longitude_rad).rem_euclid(TAU)
}

/// Precess a J2000 direction to the mean equator and equinox of `time`.
pub fn precess_j2000(radec: RADec, time: &Time) -> RADec {
    let t = time.julian_centuries();
    let zeta = (2306.2181 + (0.30188 + 0.017998 * t) * t) * t * DAS2R;
    let z = (2306.2181 + (1.09468 + 0.018203 * t) * t) * t * DAS2R;
    let theta = (2004.3109 + (-0.42665 - 0.041833 * t) * t) * t * DAS2R;

    let (s_th, c_th) = theta.sin_cos();
    let (s_d0, c_d0) = radec.dec.sin_cos();
    let (s_a, c_a) = (radec.ra + zeta).sin_cos();
    let a = c_d0 * s_a;
    let b = c_th * c_d0 * c_a - s_th * s_d0;
    let c = s_th * c_d0 * c_a + c_th * s_d0;

    RADec::from_radians(
        (a.atan2(b) + z).rem_euclid(TAU),
        c.clamp(-1.0, 1.0).asin(),
    )
}

/// The parallactic angle of a source at `hadec` seen from `latitude_rad`
/// \[radians\]. It is zero on the meridian south of the pole and positive to
/// the west.
pub fn parallactic_angle(hadec: HADec, latitude_rad: f64) -> f64 {
    let (s_ha, c_ha) = hadec.ha.sin_cos();
    let (s_dec, c_dec) = hadec.dec.sin_cos();
    let (s_lat, c_lat) = latitude_rad.sin_cos();
    (c_lat * s_ha).atan2(s_lat * c_dec - c_lat * s_dec * c_ha)
}

/// Express an equatorial vector of date in East, North, Up.
fn equatorial_to_enu(v: [f64; 3], lst_rad: f64, latitude_rad: f64) -> [f64; 3] {
    let (s_lst, c_lst) = lst_rad.sin_cos();
    let (s_lat, c_lat) = latitude_rad.sin_cos();
    // Into the hour-angle frame; x points at the meridian, y to the east.
    let x = c_lst * v[0] + s_lst * v[1];
    let y = -s_lst * v[0] + c_lst * v[1];
    let z = v[2];
    [y, -s_lat * x + c_lat * z, c_lat * x + s_lat * z]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// The sky's polarisation reference directions (increasing right ascension
/// and increasing declination) at some direction, in East, North, Up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyBasis {
    pub east: [f64; 3],
    pub north: [f64; 3],
}

/// A direction as seen by a station at some instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalDirection {
    /// Azimuth (north through east) and elevation.
    pub azel: AzEl,
    /// The unit vector in East, North, Up.
    pub enu: [f64; 3],
    /// The unit vector in the station's frame.
    pub station: [f64; 3],
    /// Only celestial directions have a sky polarisation basis.
    pub sky_basis: Option<SkyBasis>,
    /// Only celestial directions have a parallactic angle.
    pub parallactic_angle_rad: Option<f64>,
}

impl LocalDirection {
    pub fn is_below_horizon(&self) -> bool {
        self.azel.el < 0.0
    }

    /// The Ludwig-3 polarisation basis about the station's x (first) and y
    /// (second) dipole axes, in the station frame. Undefined at the nadir.
    pub fn station_basis(&self) -> [[f64; 3]; 2] {
        let [sx, sy, sz] = self.station;
        let kx = sx / (1.0 + sz);
        let ky = sy / (1.0 + sz);
        [
            [1.0 - kx * sx, -kx * sy, -kx * (sz + 1.0)],
            [-ky * sx, 1.0 - ky * sy, -ky * (sz + 1.0)],
        ]
    }

    /// The rotation from the sky polarisation basis into the station's
    /// Ludwig-3 basis. Directions without a sky basis (local ones) give the
    /// identity.
    pub fn basis_rotation(&self, station: &Station) -> JonesMatrix {
        match self.sky_basis {
            None => JonesMatrix::identity(),
            Some(SkyBasis { east, north }) => {
                let [e1, e2] = self.station_basis();
                let e1 = station.station_to_enu(&e1);
                let e2 = station.station_to_enu(&e2);
                JonesMatrix::from([
                    dot(&e1, &east),
                    dot(&e1, &north),
                    dot(&e2, &east),
                    dot(&e2, &north),
                ])
            }
        }
    }
}

/// Convert `direction` into `station`'s local frame at `time`.
pub fn to_local(direction: &Direction, time: &Time, station: &Station) -> LocalDirection {
    let (enu, sky_basis, parallactic_angle_rad) = match *direction {
        Direction::AzEl { .. } => (direction.to_vector(), None, None),

        Direction::RaDec { ra_rad, dec_rad } => {
            let lat = station.latitude_rad();
            let lst = lmst(time, station.longitude_rad());
            let of_date = precess_j2000(RADec::from_radians(ra_rad, dec_rad), time);

            let (s_ra, c_ra) = of_date.ra.sin_cos();
            let (s_dec, c_dec) = of_date.dec.sin_cos();
            let s = [c_dec * c_ra, c_dec * s_ra, s_dec];
            let east = [-s_ra, c_ra, 0.0];
            let north = [-s_dec * c_ra, -s_dec * s_ra, c_dec];

            let hadec = of_date.to_hadec(lst);
            (
                equatorial_to_enu(s, lst, lat),
                Some(SkyBasis {
                    east: equatorial_to_enu(east, lst, lat),
                    north: equatorial_to_enu(north, lst, lat),
                }),
                Some(parallactic_angle(hadec, lat)),
            )
        }
    };

    let el = enu[2].clamp(-1.0, 1.0).asin();
    let az = enu[0].atan2(enu[1]).rem_euclid(TAU);
    LocalDirection {
        azel: AzEl::from_radians(az, el),
        enu,
        station: station.enu_to_station(&enu),
        sky_basis,
        parallactic_angle_rad,
    }
}
