// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Benchmarks.
 */

use std::sync::Arc;

use criterion::*;

use dreambeam::*;

/// A 48-element station on a regular grid, about the size of a LOFAR HBA
/// core station.
fn station() -> Arc<Station> {
    let offsets = (0..48)
        .map(|i| [(i % 8) as f64 * 5.0 - 17.5, (i / 8) as f64 * 5.0 - 12.5, 0.0])
        .collect();
    let position = LatLngHeight {
        longitude_rad: 6.869837540_f64.to_radians(),
        latitude_rad: 52.915122495_f64.to_radians(),
        height_metres: 50.0,
    };
    Arc::new(Station::new("CS002HBA0", position, offsets).unwrap())
}

/// Circumpolar directions only, so nothing sets.
fn directions() -> Vec<Direction> {
    let mut directions = vec![];
    for ra in 0..20 {
        for dec in 0..10 {
            directions.push(Direction::from_radec_degrees(
                ra as f64 * 18.0,
                40.0 + dec as f64 * 5.0,
            ));
        }
    }
    directions
}

fn array_beam(c: &mut Criterion) {
    let time = Time::from_mjd(56018.5);
    let freq = 150e6;

    c.bench_function("evaluate uncached", |b| {
        let config = ArrayBeamConfig {
            cache: CacheConfig::default().disabled(),
            ..ArrayBeamConfig::lofar_hba()
        };
        let beam = ArrayBeam::new(station(), config).unwrap();
        let dir = Direction::from_radec_degrees(60.0, 55.0);
        b.iter(|| {
            beam.evaluate(&dir, &time, freq).unwrap();
        })
    });

    c.bench_function("evaluate cached", |b| {
        let beam = ArrayBeam::new(station(), ArrayBeamConfig::lofar_hba()).unwrap();
        let dir = Direction::from_radec_degrees(60.0, 55.0);
        // Prime the cache.
        beam.evaluate(&dir, &time, freq).unwrap();
        b.iter(|| {
            beam.evaluate(&dir, &time, freq).unwrap();
        })
    });

    c.bench_function("evaluate_array", |b| {
        let config = ArrayBeamConfig {
            cache: CacheConfig::default().disabled(),
            ..ArrayBeamConfig::lofar_hba()
        };
        let beam = ArrayBeam::new(station(), config).unwrap();
        let dirs = directions();
        b.iter(|| {
            beam.evaluate_array(&dirs, &time, freq).unwrap();
        })
    });
}

fn meq(c: &mut Criterion) {
    let station = station();
    let beam = Arc::new(
        ArrayBeam::new(
            Arc::clone(&station),
            ArrayBeamConfig {
                cache: CacheConfig::default().disabled(),
                ..ArrayBeamConfig::lofar_hba()
            },
        )
        .unwrap(),
    );
    let bandpass =
        BandpassTerm::unpolarised(vec![110e6, 250e6], vec![c64::new(1.0, 0.0); 2]).unwrap();
    let mut meq = MeasurementEquation::new();
    meq.append_shared(beam).append(bandpass);
    let grid = Grid::new(
        directions(),
        Time::range(Time::from_mjd(56018.5), 600.0, 60.0),
        vec![120e6, 140e6, 160e6, 180e6],
    );

    c.bench_function("evaluate_grid", |b| {
        b.iter(|| {
            meq.evaluate_grid(&grid, &station, EvalMode::FailFast)
                .try_to_vec()
                .unwrap();
        })
    });

    c.bench_function("evaluate_grid_par", |b| {
        b.iter(|| {
            meq.evaluate_grid_par(&grid, &station, EvalMode::FailFast)
                .unwrap();
        })
    });
}

criterion_group!(benches, array_beam, meq);
criterion_main!(benches);
