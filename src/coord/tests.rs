// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use approx::*;
use marlu::LatLngHeight;

use super::*;

fn lofar_station() -> Station {
    Station::new(
        "CS302",
        LatLngHeight {
            longitude_rad: 6.869837540_f64.to_radians(),
            latitude_rad: 52.915122495_f64.to_radians(),
            height_metres: 50.0,
        },
        vec![[0.0; 3]],
    )
    .unwrap()
}

fn norm(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[test]
fn test_era() {
    // Reference value from ERFA's eraEra00 test.
    let era = earth_rotation_angle(&Time::from_mjd(54388.0));
    assert_abs_diff_eq!(era, 0.402_283_724_002_815_8, epsilon = 1e-10);
}

#[test]
fn test_gmst() {
    // Reference value from ERFA's eraGmst06 test.
    let g = gmst(&Time::from_mjd(53736.0));
    assert_abs_diff_eq!(g, 1.754_174_971_870_091, epsilon = 1e-8);

    // GMST at J2000.0 is 18h 41m 50.54841s.
    let g = gmst(&Time::j2000());
    assert_abs_diff_eq!(g, 280.460_618_37_f64.to_radians(), epsilon = 1e-6);
}

#[test]
fn test_lmst_adds_longitude() {
    let t = Time::from_mjd(56018.043);
    let diff = (lmst(&t, 0.5) - gmst(&t)).rem_euclid(TAU);
    assert_abs_diff_eq!(diff, 0.5, epsilon = 1e-12);
}

#[test]
fn test_sidereal_day() {
    // After one sidereal day the sky is where it started.
    let t = Time::from_mjd(56018.5);
    let t2 = t.add_seconds(86164.0905);
    let diff = (gmst(&t2) - gmst(&t) + 1.0).rem_euclid(TAU) - 1.0;
    assert_abs_diff_eq!(diff, 0.0, epsilon = 1e-6);
}

#[test]
fn test_precession() {
    // Meeus, Astronomical Algorithms, example 21.b (theta Persei).
    let radec = RADec::from_radians(41.054063_f64.to_radians(), 49.227750_f64.to_radians());
    let t = Time::from_mjd(62088.19);
    let p = precess_j2000(radec, &t);
    assert_abs_diff_eq!(p.ra.to_degrees(), 41.547214, epsilon = 1e-4);
    assert_abs_diff_eq!(p.dec.to_degrees(), 49.348483, epsilon = 1e-4);

    // No precession at the reference epoch.
    let p = precess_j2000(radec, &Time::j2000());
    assert_abs_diff_eq!(p.ra, radec.ra, epsilon = 1e-15);
    assert_abs_diff_eq!(p.dec, radec.dec, epsilon = 1e-15);
}

#[test]
fn test_precession_is_a_rotation() {
    let t = Time::from_mjd(60000.0);
    let a = RADec::from_radians(0.3, 0.2);
    let b = RADec::from_radians(2.1, -0.9);
    let separation = |a: RADec, b: RADec| {
        let va = Direction::from(a).to_vector();
        let vb = Direction::from(b).to_vector();
        dot(&va, &vb).acos()
    };
    assert_abs_diff_eq!(
        separation(a, b),
        separation(precess_j2000(a, &t), precess_j2000(b, &t)),
        epsilon = 1e-12
    );
}

#[test]
fn test_parallactic_angle() {
    let lat = 52_f64.to_radians();
    // On the meridian, south of the zenith.
    assert_abs_diff_eq!(parallactic_angle(HADec::from_radians(0.0, 0.3), lat), 0.0);
    // On the meridian, between the zenith and the pole.
    assert_abs_diff_eq!(
        parallactic_angle(HADec::from_radians(0.0, 1.2), lat).abs(),
        std::f64::consts::PI
    );
    // West of the meridian is positive, east is negative.
    assert!(parallactic_angle(HADec::from_radians(0.5, 0.3), lat) > 0.0);
    assert!(parallactic_angle(HADec::from_radians(-0.5, 0.3), lat) < 0.0);
}

#[test]
fn test_local_direction_is_unchanged() {
    let station = lofar_station();
    let d = Direction::from_horiz(AzEl::from_radians(FRAC_PI_4, 0.6));
    let local = to_local(&d, &Time::from_mjd(56018.0), &station);
    assert_abs_diff_eq!(local.azel.az, FRAC_PI_4, epsilon = 1e-12);
    assert_abs_diff_eq!(local.azel.el, 0.6, epsilon = 1e-12);
    assert!(local.sky_basis.is_none());
    assert!(local.parallactic_angle_rad.is_none());
    assert!(!local.is_below_horizon());
    let p = local.basis_rotation(&station);
    assert!(p.approx_eq(&JonesMatrix::identity(), 1e-15));
}

#[test]
fn test_celestial_to_local() {
    let station = lofar_station();
    let t = Time::from_mjd(56018.043);
    let d = Direction::from_radec_degrees(123.4, 30.0);
    let local = to_local(&d, &t, &station);

    assert_abs_diff_eq!(norm(&local.enu), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(local.enu[2], local.azel.el.sin(), epsilon = 1e-12);

    // Agrees with marlu's hour angle to horizontal conversion.
    let of_date = precess_j2000(d.to_radec().unwrap(), &t);
    let hadec = of_date.to_hadec(lmst(&t, station.longitude_rad()));
    let azel = hadec.to_azel(station.latitude_rad());
    assert_abs_diff_eq!(local.azel.el, azel.el, epsilon = 1e-9);
    let expected = Direction::from(azel).to_vector();
    for (a, b) in local.enu.iter().zip(expected) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_sky_basis() {
    let station = lofar_station();
    let t = Time::from_mjd(56018.043);
    let local = to_local(&Direction::from_radec(2.0, 0.9), &t, &station);
    let SkyBasis { east, north } = local.sky_basis.unwrap();

    // Orthonormal, transverse and right-handed.
    assert_abs_diff_eq!(norm(&east), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(norm(&north), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(dot(&east, &north), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(dot(&east, &local.enu), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(dot(&north, &local.enu), 0.0, epsilon = 1e-12);
    let cross = [
        east[1] * north[2] - east[2] * north[1],
        east[2] * north[0] - east[0] * north[2],
        east[0] * north[1] - east[1] * north[0],
    ];
    for (a, b) in cross.iter().zip(local.enu) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
    }

    // The angle between celestial north and the local vertical is the
    // parallactic angle.
    let s = local.enu;
    let up = [-s[2] * s[0], -s[2] * s[1], 1.0 - s[2] * s[2]];
    let up_norm = norm(&up);
    let cos_q = dot(&north, &up) / up_norm;
    let q = local.parallactic_angle_rad.unwrap();
    assert_abs_diff_eq!(cos_q, q.cos(), epsilon = 1e-6);
}

#[test]
fn test_basis_rotation_is_a_rotation() {
    let station = lofar_station().with_rotation_angle(0.3).unwrap();
    let t = Time::from_mjd(56018.2);
    let local = to_local(&Direction::from_radec(1.0, 0.7), &t, &station);
    assert!(!local.is_below_horizon());
    let p = local.basis_rotation(&station);
    let pph = p * p.h();
    assert!(pph.approx_eq(&JonesMatrix::identity(), 1e-12));
    assert_abs_diff_eq!(p.det().re, 1.0, epsilon = 1e-12);
}

#[test]
fn test_station_basis_at_zenith() {
    let station = lofar_station();
    let local = to_local(&Direction::zenith(), &Time::j2000(), &station);
    let [e1, e2] = local.station_basis();
    assert_abs_diff_eq!(e1[0], 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(e1[1], 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(e2[0], 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(e2[1], 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(local.azel.el, FRAC_PI_2, epsilon = 1e-15);
}

#[test]
fn test_below_horizon() {
    let station = lofar_station();
    let t = Time::from_mjd(56018.043);
    // A southern source that never rises at +53 degrees latitude.
    let local = to_local(&Direction::from_radec_degrees(10.0, -60.0), &t, &station);
    assert!(local.is_below_horizon());
    // And a circumpolar one that never sets.
    let local = to_local(&Direction::from_radec_degrees(10.0, 80.0), &t, &station);
    assert!(!local.is_below_horizon());
}
