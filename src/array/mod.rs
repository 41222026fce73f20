// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to synthesise the beam of a phased-array station.
//!
//! The response of a station to a direction is the product of three parts:
//!
//! - the array factor of each polarisation, the weighted sum of the element
//!   phasors relative to the pointing direction, normalised by the sum of the
//!   weights;
//! - the element pattern, a pair of crossed dipoles above a ground plane; and
//! - the rotation from the sky's polarisation basis into the dipoles' basis.
//!
//! i.e. `J = diag(AFx, AFy) · E · P`. At zenith, at the reference frequency,
//! with the array pointed at zenith, `J` is the identity.

mod element;
mod error;

pub use error::ArrayBeamError;

use std::{
    collections::hash_map::DefaultHasher,
    f64::consts::TAU,
    hash::{Hash, Hasher},
    sync::Arc,
};

use log::debug;
use num_complex::Complex64 as c64;
use rayon::prelude::*;

use crate::{
    cache::{CacheConfig, EvaluationCache, Query},
    constants::*,
    coord::{to_local, LocalDirection},
    direction::Direction,
    jones::JonesMatrix,
    station::Station,
    term::{check_station, BeamModel, Term, TermError},
    time::Time,
    types::Pol,
};
use element::ElementPattern;

/// The frequencies a beam is valid for \[Hz\]. Both edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyBand {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyBand {
    pub fn contains(&self, freq_hz: f64) -> bool {
        (self.min_hz..=self.max_hz).contains(&freq_hz)
    }
}

/// Everything about an [`ArrayBeam`] other than its station and weights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayBeamConfig {
    /// Evaluating outside of this band fails.
    pub band: FrequencyBand,

    /// The frequency at which the beam is unity at zenith \[Hz\].
    pub reference_freq_hz: f64,

    /// The height of the dipoles above the ground plane \[metres\]. If this
    /// is `None`, a quarter wavelength at the reference frequency is used.
    pub dipole_height_metres: Option<f64>,

    /// Rotate responses into the sky's polarisation basis? If not, responses
    /// are in the station's own basis.
    pub parallactic_rotation: bool,

    /// Where the array is steered. Celestial directions are tracked.
    pub pointing: Direction,

    /// Quantisation and bounds of this beam's own cache.
    pub cache: CacheConfig,
}

impl ArrayBeamConfig {
    /// The LOFAR low-band antennas.
    pub fn lofar_lba() -> ArrayBeamConfig {
        ArrayBeamConfig {
            band: FrequencyBand {
                min_hz: LBA_MIN_FREQ_HZ,
                max_hz: LBA_MAX_FREQ_HZ,
            },
            reference_freq_hz: LBA_REF_FREQ_HZ,
            dipole_height_metres: None,
            parallactic_rotation: true,
            pointing: Direction::zenith(),
            cache: CacheConfig::default(),
        }
    }

    /// The LOFAR high-band antennas.
    pub fn lofar_hba() -> ArrayBeamConfig {
        ArrayBeamConfig {
            band: FrequencyBand {
                min_hz: HBA_MIN_FREQ_HZ,
                max_hz: HBA_MAX_FREQ_HZ,
            },
            reference_freq_hz: HBA_REF_FREQ_HZ,
            ..ArrayBeamConfig::lofar_lba()
        }
    }
}

/// The beam of a phased-array station.
#[derive(Debug)]
pub struct ArrayBeam {
    station: Arc<Station>,
    config: ArrayBeamConfig,
    element: ElementPattern,
    /// Per-element weights of the X and Y dipoles.
    weights: [Vec<f64>; 2],
    weight_sums: [f64; 2],
    /// A hash of everything that affects responses.
    id: u64,
    cache: Arc<EvaluationCache>,
}

impl ArrayBeam {
    /// Create a new [`ArrayBeam`] with all elements equally weighted.
    pub fn new(
        station: Arc<Station>,
        config: ArrayBeamConfig,
    ) -> Result<ArrayBeam, ArrayBeamError> {
        let FrequencyBand { min_hz, max_hz } = config.band;
        if !min_hz.is_finite() || !max_hz.is_finite() || min_hz <= 0.0 || max_hz < min_hz {
            return Err(ArrayBeamError::BadBand { min_hz, max_hz });
        }
        if !config.band.contains(config.reference_freq_hz) {
            return Err(ArrayBeamError::RefFreqOutOfBand {
                ref_hz: config.reference_freq_hz,
                min_hz,
                max_hz,
            });
        }
        let element = ElementPattern::new(config.reference_freq_hz, config.dipole_height_metres)?;

        let n = station.num_elements();
        let mut beam = ArrayBeam {
            cache: Arc::new(EvaluationCache::new(config.cache)),
            station,
            config,
            element,
            weights: [vec![1.0; n], vec![1.0; n]],
            weight_sums: [n as f64; 2],
            id: 0,
        };
        beam.id = beam.hash_config();
        debug!(
            "Created an array beam for station '{}' ({} elements, {} Hz to {} Hz, dipole height {} m)",
            beam.station.name(),
            n,
            min_hz,
            max_hz,
            beam.element.dipole_height_metres()
        );
        Ok(beam)
    }

    /// Weight the elements. `weights` must have one entry per element, used
    /// for both polarisations, or two, with all X weights before all Y
    /// weights. A weight of zero switches a dipole off.
    pub fn with_weights(mut self, weights: &[f64]) -> Result<ArrayBeam, ArrayBeamError> {
        let n = self.station.num_elements();
        if weights.len() != n && weights.len() != 2 * n {
            return Err(ArrayBeamError::IncorrectWeightsLength {
                got: weights.len(),
                expected1: n,
                expected2: 2 * n,
            });
        }
        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(ArrayBeamError::NonFiniteWeight(i));
        }

        let (x, y) = if weights.len() == n {
            (weights, weights)
        } else {
            weights.split_at(n)
        };
        let weight_sums: [f64; 2] = [x.iter().sum(), y.iter().sum()];
        for (pol, sum) in [Pol::X, Pol::Y].into_iter().zip(weight_sums) {
            if sum == 0.0 {
                return Err(ArrayBeamError::NoResponse(pol));
            }
        }

        self.weights = [x.to_vec(), y.to_vec()];
        self.weight_sums = weight_sums;
        self.id = self.hash_config();
        Ok(self)
    }

    /// Use a cache shared with other beams instead of this beam's own. The
    /// shared cache's configuration then decides how queries are quantised.
    pub fn with_cache(mut self, cache: Arc<EvaluationCache>) -> ArrayBeam {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &ArrayBeamConfig {
        &self.config
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    pub fn weights(&self, pol: Pol) -> &[f64] {
        match pol {
            Pol::X => &self.weights[0],
            Pol::Y => &self.weights[1],
        }
    }

    /// The Jones matrix of this beam in `direction`. This is the same as
    /// [`BeamModel::response`].
    pub fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
    ) -> Result<JonesMatrix, TermError> {
        self.check_freq(freq_hz)?;
        let (query, key) = self
            .cache
            .quantise(self.id, &self.station, direction, time, freq_hz);
        // Snapping can push a frequency near an edge out of the band.
        self.check_freq(query.freq_hz)?;
        self.cache.get_or_compute(key, || self.compute(&query))
    }

    /// Evaluate the beam for many directions in parallel. The number of
    /// parallel threads used can be controlled by setting `RAYON_NUM_THREADS`.
    pub fn evaluate_array(
        &self,
        directions: &[Direction],
        time: &Time,
        freq_hz: f64,
    ) -> Result<Vec<JonesMatrix>, TermError> {
        let mut results = vec![JonesMatrix::default(); directions.len()];
        directions
            .par_iter()
            .zip(results.par_iter_mut())
            .try_for_each(|(direction, result)| {
                *result = self.evaluate(direction, time, freq_hz)?;
                Ok::<(), TermError>(())
            })?;
        Ok(results)
    }

    /// The un-normalised array factors of the X and Y dipoles. With unit
    /// weights, the magnitude at the pointing direction is the number of
    /// elements.
    pub fn array_factor(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
    ) -> Result<[c64; 2], TermError> {
        self.check_freq(freq_hz)?;
        let local = to_local(direction, time, &self.station);
        if local.is_below_horizon() {
            return Err(TermError::BelowHorizon {
                el_rad: local.azel.el,
            });
        }
        Ok(self.array_factor_inner(&local, time, freq_hz))
    }

    fn check_freq(&self, freq_hz: f64) -> Result<(), TermError> {
        if self.config.band.contains(freq_hz) {
            Ok(())
        } else {
            Err(TermError::FreqOutOfBand {
                freq_hz,
                min_hz: self.config.band.min_hz,
                max_hz: self.config.band.max_hz,
            })
        }
    }

    fn array_factor_inner(&self, local: &LocalDirection, time: &Time, freq_hz: f64) -> [c64; 2] {
        let s0 = to_local(&self.config.pointing, time, &self.station).enu;
        let s = local.enu;
        let delta = [s[0] - s0[0], s[1] - s0[1], s[2] - s0[2]];
        let k = TAU * freq_hz / VEL_C;

        let mut af = [c64::new(0.0, 0.0); 2];
        for ((r, &wx), &wy) in self
            .station
            .elements_enu()
            .iter()
            .zip(self.weights[0].iter())
            .zip(self.weights[1].iter())
        {
            let phasor = c64::cis(k * (r[0] * delta[0] + r[1] * delta[1] + r[2] * delta[2]));
            af[0] += phasor * wx;
            af[1] += phasor * wy;
        }
        af
    }

    fn compute(&self, query: &Query) -> Result<JonesMatrix, TermError> {
        let local = to_local(&query.direction, &query.time, &self.station);
        if local.is_below_horizon() {
            return Err(TermError::BelowHorizon {
                el_rad: local.azel.el,
            });
        }

        let [afx, afy] = self.array_factor_inner(&local, &query.time, query.freq_hz);
        let af = JonesMatrix::diag(afx / self.weight_sums[0], afy / self.weight_sums[1]);
        let element = self.element.jones(&local, query.freq_hz);
        let jones = if self.config.parallactic_rotation {
            af * element * local.basis_rotation(&self.station)
        } else {
            af * element
        };
        Ok(jones)
    }

    fn hash_config(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.station.id().hash(&mut hasher);
        // We can't hash f64 values, but we can hash their bits.
        for v in [
            self.config.band.min_hz,
            self.config.band.max_hz,
            self.config.reference_freq_hz,
            self.element.dipole_height_metres(),
        ] {
            v.to_bits().hash(&mut hasher);
        }
        self.config.parallactic_rotation.hash(&mut hasher);
        match self.config.pointing {
            Direction::RaDec { ra_rad, dec_rad } => {
                0_u8.hash(&mut hasher);
                ra_rad.to_bits().hash(&mut hasher);
                dec_rad.to_bits().hash(&mut hasher);
            }
            Direction::AzEl { az_rad, el_rad } => {
                1_u8.hash(&mut hasher);
                az_rad.to_bits().hash(&mut hasher);
                el_rad.to_bits().hash(&mut hasher);
            }
        }
        for w in self.weights.iter().flatten() {
            w.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl BeamModel for ArrayBeam {
    fn station(&self) -> &Station {
        &self.station
    }

    fn response(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
    ) -> Result<JonesMatrix, TermError> {
        ArrayBeam::evaluate(self, direction, time, freq_hz)
    }
}

impl Term for ArrayBeam {
    fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
        station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        check_station(&self.station, station)?;
        ArrayBeam::evaluate(self, direction, time, freq_hz)
    }

    fn name(&self) -> &str {
        self.station.name()
    }
}
