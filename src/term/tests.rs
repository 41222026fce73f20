// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::*;
use marlu::LatLngHeight;
use num_complex::Complex64 as c64;

use super::*;

fn station(name: &str) -> Station {
    Station::new(
        name,
        LatLngHeight {
            longitude_rad: 6.87_f64.to_radians(),
            latitude_rad: 52.91_f64.to_radians(),
            height_metres: 0.0,
        },
        vec![[0.0; 3]],
    )
    .unwrap()
}

fn query() -> (Direction, Time, f64) {
    (Direction::from_radec(1.5, 0.8), Time::from_mjd(56018.1), 60e6)
}

#[test]
fn test_identity_term() {
    let (d, t, f) = query();
    let j = IdentityTerm.evaluate(&d, &t, f, &station("CS001")).unwrap();
    assert_eq!(j, JonesMatrix::identity());
    assert_eq!(IdentityTerm.name(), "identity");
}

#[test]
fn test_constant_term_and_inverse() {
    let (d, t, f) = query();
    let s = station("CS001");
    let m = JonesMatrix::from([1.0, 2.0, 3.0, 4.0]);
    let term = ConstantTerm::new(m);
    assert_eq!(term.evaluate(&d, &t, f, &s).unwrap(), m);

    let inverse = term.inverse().unwrap();
    let product = inverse.evaluate(&d, &t, f, &s).unwrap() * m;
    assert!(product.approx_eq(&JonesMatrix::identity(), 1e-10));

    assert!(ConstantTerm::new(JonesMatrix::zeros()).inverse().is_err());
}

#[test]
fn test_fn_term() {
    let (d, t, _) = query();
    let s = station("CS001");
    let term = FnTerm::new("faraday", |_: &Direction, _: &Time, freq_hz: f64, _: &Station| {
        if freq_hz <= 0.0 {
            return Err(TermError::Custom("frequency must be positive".to_string()));
        }
        Ok(JonesMatrix::rotation(1e8 / freq_hz))
    });
    assert_eq!(term.name(), "faraday");
    let j = term.evaluate(&d, &t, 1e8, &s).unwrap();
    assert_eq!(j, JonesMatrix::rotation(1.0));
    assert_eq!(
        term.evaluate(&d, &t, 0.0, &s),
        Err(TermError::Custom("frequency must be positive".to_string()))
    );
}

#[test]
fn test_parallactic_term() {
    let (d, t, f) = query();
    let s = station("CS001");
    let p = ParallacticTerm.evaluate(&d, &t, f, &s).unwrap();
    // A rotation, but not a trivial one.
    assert!((p * p.h()).approx_eq(&JonesMatrix::identity(), 1e-12));
    assert!(!p.approx_eq(&JonesMatrix::identity(), 1e-3));

    // Nothing to do for directions fixed to the station.
    let p = ParallacticTerm
        .evaluate(&Direction::zenith(), &t, f, &s)
        .unwrap();
    assert_eq!(p, JonesMatrix::identity());
}

#[test]
fn test_check_station() {
    let a = station("CS001");
    let b = station("CS002");
    assert!(check_station(&a, &a.clone()).is_ok());
    assert_eq!(
        check_station(&a, &b),
        Err(TermError::StationMismatch {
            expected: "CS001".to_string(),
            got: "CS002".to_string()
        })
    );
}

#[test]
fn test_bandpass_interpolation() {
    let bp = BandpassTerm::new(
        vec![100e6, 200e6],
        vec![
            [c64::new(1.0, 0.0), c64::new(2.0, 0.0)],
            [c64::new(3.0, 1.0), c64::new(0.0, 2.0)],
        ],
    )
    .unwrap();
    let [x, y] = bp.gains_at(150e6).unwrap();
    assert_abs_diff_eq!(x, c64::new(2.0, 0.5), epsilon = 1e-12);
    assert_abs_diff_eq!(y, c64::new(1.0, 1.0), epsilon = 1e-12);

    // The edges are inclusive.
    assert_eq!(bp.gains_at(100e6).unwrap()[0], c64::new(1.0, 0.0));
    assert_eq!(bp.gains_at(200e6).unwrap()[1], c64::new(0.0, 2.0));

    let (d, t, _) = query();
    let j = bp.evaluate(&d, &t, 150e6, &station("CS001")).unwrap();
    assert_abs_diff_eq!(j[1], c64::new(0.0, 0.0));
    assert_abs_diff_eq!(j[3], c64::new(1.0, 1.0), epsilon = 1e-12);
}

#[test]
fn test_bandpass_out_of_range() {
    let bp = BandpassTerm::unpolarised(vec![100e6, 200e6], vec![c64::new(1.0, 0.0); 2]).unwrap();
    assert_eq!(
        bp.gains_at(99e6),
        Err(TermError::FreqOutOfBand {
            freq_hz: 99e6,
            min_hz: 100e6,
            max_hz: 200e6
        })
    );
    assert!(bp.gains_at(201e6).is_err());
    assert!(bp.gains_at(f64::NAN).is_err());

    // A single entry only answers for its own frequency.
    let bp = BandpassTerm::unpolarised(vec![150e6], vec![c64::new(0.5, 0.0)]).unwrap();
    assert_eq!(bp.gains_at(150e6).unwrap(), [c64::new(0.5, 0.0); 2]);
    assert!(bp.gains_at(150.1e6).is_err());
}

#[test]
fn test_bandpass_validation() {
    let one = c64::new(1.0, 0.0);
    assert_eq!(
        BandpassTerm::unpolarised(vec![], vec![]).unwrap_err(),
        BandpassError::Empty
    );
    assert_eq!(
        BandpassTerm::unpolarised(vec![1.0, 2.0], vec![one]).unwrap_err(),
        BandpassError::LengthMismatch { freqs: 2, gains: 1 }
    );
    assert_eq!(
        BandpassTerm::unpolarised(vec![1.0, 3.0, 2.0], vec![one; 3]).unwrap_err(),
        BandpassError::NotIncreasing(2)
    );
    assert_eq!(
        BandpassTerm::unpolarised(vec![1.0, 2.0], vec![one, c64::new(f64::NAN, 0.0)])
            .unwrap_err(),
        BandpassError::NonFinite(1)
    );
}
