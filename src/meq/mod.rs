// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Measurement equations: ordered chains of Jones-producing terms.
//!
//! Terms are listed in the order the signal meets them, sky side first. The
//! equation `[T1, T2, ..., Tn]` evaluates to
//!
//! ```text
//! J = Jn · ... · J2 · J1
//! ```
//!
//! i.e. every term acts from the left on the product of the terms before it.

mod error;
mod grid;

pub use error::GridError;
pub use grid::{EvalMode, Grid, GridOrder, GridPoint};

use std::sync::Arc;

use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;

use crate::{
    direction::Direction,
    jones::JonesMatrix,
    station::Station,
    term::{Term, TermError},
    time::Time,
};

/// The result of evaluating one grid point.
pub type PointResult = (GridPoint, Result<JonesMatrix, TermError>);

/// An ordered chain of terms. Terms are shared, not copied, so building and
/// rearranging equations is cheap.
#[derive(Clone, Default)]
pub struct MeasurementEquation {
    terms: Vec<Arc<dyn Term>>,
}

impl MeasurementEquation {
    /// An equation without any terms; it evaluates to the identity.
    pub fn new() -> MeasurementEquation {
        MeasurementEquation::default()
    }

    /// Add a term to the far (receiver) end of the chain.
    pub fn append<T: Term + 'static>(&mut self, term: T) -> &mut Self {
        self.append_shared(Arc::new(term))
    }

    /// Add a term that may also be used elsewhere to the far end of the chain.
    pub fn append_shared(&mut self, term: Arc<dyn Term>) -> &mut Self {
        debug!(
            "Appending term '{}' to a measurement equation ({} terms)",
            term.name(),
            self.terms.len() + 1
        );
        self.terms.push(term);
        self
    }

    /// Builder-style [`MeasurementEquation::append`].
    pub fn with_term<T: Term + 'static>(mut self, term: T) -> MeasurementEquation {
        self.append(term);
        self
    }

    /// Append all of `other`'s terms, in order. `other` is untouched.
    pub fn compose(&mut self, other: &MeasurementEquation) -> &mut Self {
        for term in &other.terms {
            self.append_shared(Arc::clone(term));
        }
        self
    }

    pub fn terms(&self) -> &[Arc<dyn Term>] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the chain at a single point. The first failing term stops the
    /// evaluation.
    pub fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
        station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        self.terms
            .iter()
            .try_fold(JonesMatrix::identity(), |acc, term| {
                Ok(term.evaluate(direction, time, freq_hz, station)? * acc)
            })
    }

    /// Lazily evaluate the chain over `grid`, in the grid's order. Nothing is
    /// computed until the result is iterated, and it can be iterated any number
    /// of times.
    pub fn evaluate_grid<'a>(
        &'a self,
        grid: &'a Grid,
        station: &'a Station,
        mode: EvalMode,
    ) -> GridEvaluation<'a> {
        GridEvaluation {
            meq: self,
            grid,
            station,
            mode,
        }
    }

    /// Evaluate the chain over `grid` in parallel. The results are in the
    /// grid's order. In [`EvalMode::FailFast`], the first failure in the
    /// grid's order is returned instead. The number of parallel threads used
    /// can be controlled by setting `RAYON_NUM_THREADS`.
    pub fn evaluate_grid_par(
        &self,
        grid: &Grid,
        station: &Station,
        mode: EvalMode,
    ) -> Result<Vec<PointResult>, GridError> {
        let results: Vec<PointResult> = (0..grid.len())
            .into_par_iter()
            .map(|i| {
                let point = grid.nth_point(i);
                let result =
                    self.evaluate(&point.direction, &point.time, point.freq_hz, station);
                (point, result)
            })
            .collect();

        if mode == EvalMode::FailFast {
            if let Some((point, Err(e))) = results.iter().find(|(_, r)| r.is_err()) {
                return Err(GridError {
                    point: *point,
                    source: e.clone(),
                });
            }
        }
        Ok(results)
    }

    /// Evaluate the chain over `grid` in parallel into an array with
    /// dimensions (direction, time, frequency), whatever the grid's order.
    /// Any failure stops the evaluation.
    pub fn evaluate_grid_array(
        &self,
        grid: &Grid,
        station: &Station,
    ) -> Result<Array3<JonesMatrix>, GridError> {
        let (num_dirs, num_times, num_freqs) = grid.shape();
        let values = (0..grid.len())
            .into_par_iter()
            .map(|i| {
                let point = grid.point_at(
                    i / (num_times * num_freqs),
                    (i / num_freqs) % num_times,
                    i % num_freqs,
                );
                self.evaluate(&point.direction, &point.time, point.freq_hz, station)
                    .map_err(|source| GridError { point, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Array3::from_shape_fn(
            (num_dirs, num_times, num_freqs),
            |(d, t, f)| values[(d * num_times + t) * num_freqs + f],
        ))
    }
}

impl std::fmt::Debug for MeasurementEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementEquation")
            .field(
                "terms",
                &self.terms.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A lazy evaluation of a [`MeasurementEquation`] over a [`Grid`].
#[derive(Debug, Clone, Copy)]
pub struct GridEvaluation<'a> {
    meq: &'a MeasurementEquation,
    grid: &'a Grid,
    station: &'a Station,
    mode: EvalMode,
}

impl<'a> GridEvaluation<'a> {
    /// Start a new pass over the grid.
    pub fn iter(&self) -> GridIter<'a> {
        GridIter {
            eval: *self,
            next: 0,
            stopped: false,
        }
    }

    /// Evaluate every point, returning the Jones matrices in the grid's order
    /// or the first failure.
    pub fn try_to_vec(&self) -> Result<Vec<JonesMatrix>, GridError> {
        self.iter()
            .map(|(point, result)| result.map_err(|source| GridError { point, source }))
            .collect()
    }
}

impl<'a> IntoIterator for GridEvaluation<'a> {
    type Item = PointResult;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> GridIter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &GridEvaluation<'a> {
    type Item = PointResult;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> GridIter<'a> {
        self.iter()
    }
}

/// An iterator over the points of a [`GridEvaluation`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    eval: GridEvaluation<'a>,
    next: usize,
    /// Set after a failure in [`EvalMode::FailFast`].
    stopped: bool,
}

impl Iterator for GridIter<'_> {
    type Item = PointResult;

    fn next(&mut self) -> Option<PointResult> {
        if self.stopped {
            return None;
        }
        let point = self.eval.grid.point(self.next)?;
        self.next += 1;

        let result = self.eval.meq.evaluate(
            &point.direction,
            &point.time,
            point.freq_hz,
            self.eval.station,
        );
        if let Err(e) = &result {
            trace!("Measurement equation failed at {point}: {e}");
            if self.eval.mode == EvalMode::FailFast {
                self.stopped = true;
            }
        }
        Some((point, result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stopped {
            return (0, Some(0));
        }
        let remaining = self.eval.grid.len().saturating_sub(self.next);
        match self.eval.mode {
            EvalMode::Collect => (remaining, Some(remaining)),
            EvalMode::FailFast => (remaining.min(1), Some(remaining)),
        }
    }
}
