// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Jones-producing terms of a measurement equation.
//!
//! Anything that can produce a Jones matrix for a (direction, time, frequency,
//! station) query is a [`Term`]. Terms hold no per-equation state, so the same
//! term can sit in any number of equations at once.

mod bandpass;
mod error;
#[cfg(test)]
mod tests;

pub use bandpass::BandpassTerm;
pub use error::{BandpassError, TermError};

use crate::{
    coord::to_local,
    direction::Direction,
    jones::{JonesError, JonesMatrix},
    station::Station,
    time::Time,
};

/// The capability shared by everything in a measurement equation.
pub trait Term: Send + Sync {
    /// The Jones matrix of this term for a single query point.
    fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
        station: &Station,
    ) -> Result<JonesMatrix, TermError>;

    /// A short description used in diagnostics.
    fn name(&self) -> &str {
        "term"
    }
}

/// A beam model belongs to one station and is evaluated without naming it.
///
/// As a [`Term`], a beam model refuses to answer for any station other than
/// its own.
pub trait BeamModel: Term {
    /// The station whose geometry this beam is built from.
    fn station(&self) -> &Station;

    /// The Jones matrix of this beam.
    fn response(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
    ) -> Result<JonesMatrix, TermError>;
}

/// Fail unless `got` is the same station as `expected` (name and geometry).
pub(crate) fn check_station(expected: &Station, got: &Station) -> Result<(), TermError> {
    if expected.id() == got.id() {
        Ok(())
    } else {
        Err(TermError::StationMismatch {
            expected: expected.name().to_string(),
            got: got.name().to_string(),
        })
    }
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTerm;

impl Term for IdentityTerm {
    fn evaluate(
        &self,
        _direction: &Direction,
        _time: &Time,
        _freq_hz: f64,
        _station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        Ok(JonesMatrix::identity())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// The same Jones matrix everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantTerm(pub JonesMatrix);

impl ConstantTerm {
    pub fn new(jones: JonesMatrix) -> ConstantTerm {
        ConstantTerm(jones)
    }

    /// A term that undoes this one.
    pub fn inverse(&self) -> Result<ConstantTerm, JonesError> {
        Ok(ConstantTerm(self.0.inv()?))
    }
}

impl Term for ConstantTerm {
    fn evaluate(
        &self,
        _direction: &Direction,
        _time: &Time,
        _freq_hz: f64,
        _station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// A user-supplied term backed by a closure.
pub struct FnTerm<F> {
    name: String,
    f: F,
}

impl<F> FnTerm<F>
where
    F: Fn(&Direction, &Time, f64, &Station) -> Result<JonesMatrix, TermError> + Send + Sync,
{
    pub fn new<S: Into<String>>(name: S, f: F) -> FnTerm<F> {
        FnTerm {
            name: name.into(),
            f,
        }
    }
}

impl<F> Term for FnTerm<F>
where
    F: Fn(&Direction, &Time, f64, &Station) -> Result<JonesMatrix, TermError> + Send + Sync,
{
    fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
        station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        (self.f)(direction, time, freq_hz, station)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnTerm<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTerm").field("name", &self.name).finish()
    }
}

/// The rotation from the sky's polarisation basis (increasing right
/// ascension, increasing declination) into a station's dipole-aligned basis.
///
/// This is the identity for directions fixed in the station's frame. Unlike a
/// beam, it is defined below the horizon too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallacticTerm;

impl Term for ParallacticTerm {
    fn evaluate(
        &self,
        direction: &Direction,
        time: &Time,
        _freq_hz: f64,
        station: &Station,
    ) -> Result<JonesMatrix, TermError> {
        Ok(to_local(direction, time, station).basis_rotation(station))
    }

    fn name(&self) -> &str {
        "parallactic"
    }
}
