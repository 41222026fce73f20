// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Measurement equations and array beam models for radio telescope stations.

A [`MeasurementEquation`] is an ordered chain of [`Term`]s, each producing a
2x2 [`JonesMatrix`] for a sky direction, a time, a frequency and a
[`Station`]. [`ArrayBeam`] is a LOFAR-like station beam; its results are
memoised in an [`EvaluationCache`] that may be shared between beams.
 */

pub mod array;
pub mod cache;
pub mod constants;
pub mod coord;
mod direction;
pub mod jones;
pub mod meq;
pub mod station;
pub mod term;
mod time;
pub(crate) mod types;

pub use array::{ArrayBeam, ArrayBeamConfig, ArrayBeamError, FrequencyBand};
pub use cache::{CacheConfig, CacheStats, EvaluationCache, Query};
pub use direction::{Direction, HorizCoord};
pub use jones::{JonesError, JonesMatrix, SINGULAR_TOLERANCE};
pub use meq::{
    EvalMode, Grid, GridError, GridEvaluation, GridIter, GridOrder, GridPoint,
    MeasurementEquation, PointResult,
};
pub use station::{Rotation, Station, StationError};
pub use term::{
    BandpassError, BandpassTerm, BeamModel, ConstantTerm, FnTerm, IdentityTerm, ParallacticTerm,
    Term, TermError,
};
pub use time::Time;
pub use types::{CacheKey, Pol};

// Re-exports.
pub use marlu::{AzEl, LatLngHeight, RADec};
pub use num_complex::Complex64 as c64;
