// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Query grids.

use crate::{direction::Direction, time::Time};

/// The order in which a [`Grid`]'s points are visited. The first-named axis
/// varies slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridOrder {
    #[default]
    DirectionTimeFrequency,
    DirectionFrequencyTime,
    TimeDirectionFrequency,
    TimeFrequencyDirection,
    FrequencyDirectionTime,
    FrequencyTimeDirection,
}

// Axis indices.
const DIR: usize = 0;
const TIME: usize = 1;
const FREQ: usize = 2;

impl GridOrder {
    /// Axis indices from slowest- to fastest-varying.
    fn axes(self) -> [usize; 3] {
        match self {
            GridOrder::DirectionTimeFrequency => [DIR, TIME, FREQ],
            GridOrder::DirectionFrequencyTime => [DIR, FREQ, TIME],
            GridOrder::TimeDirectionFrequency => [TIME, DIR, FREQ],
            GridOrder::TimeFrequencyDirection => [TIME, FREQ, DIR],
            GridOrder::FrequencyDirectionTime => [FREQ, DIR, TIME],
            GridOrder::FrequencyTimeDirection => [FREQ, TIME, DIR],
        }
    }
}

/// What to do when a grid point fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalMode {
    /// Report the failure against its point and carry on.
    #[default]
    Collect,
    /// Stop at the first failure.
    FailFast,
}

/// Every combination of some directions, times and frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    directions: Vec<Direction>,
    times: Vec<Time>,
    freqs_hz: Vec<f64>,
    order: GridOrder,
}

/// A single point of a [`Grid`], with the indices of its coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub direction_index: usize,
    pub time_index: usize,
    pub freq_index: usize,
    pub direction: Direction,
    pub time: Time,
    pub freq_hz: f64,
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "direction {}, time {}, frequency {} ({} Hz)",
            self.direction_index, self.time_index, self.freq_index, self.freq_hz
        )
    }
}

impl Grid {
    pub fn new(directions: Vec<Direction>, times: Vec<Time>, freqs_hz: Vec<f64>) -> Grid {
        Grid {
            directions,
            times,
            freqs_hz,
            order: GridOrder::default(),
        }
    }

    pub fn with_order(self, order: GridOrder) -> Grid {
        Grid { order, ..self }
    }

    pub fn order(&self) -> GridOrder {
        self.order
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn freqs_hz(&self) -> &[f64] {
        &self.freqs_hz
    }

    /// The number of directions, times and frequencies.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.directions.len(), self.times.len(), self.freqs_hz.len())
    }

    pub fn len(&self) -> usize {
        self.directions.len() * self.times.len() * self.freqs_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The point with these coordinate indices. Panics if any is out of
    /// range.
    pub(crate) fn point_at(
        &self,
        direction_index: usize,
        time_index: usize,
        freq_index: usize,
    ) -> GridPoint {
        GridPoint {
            direction_index,
            time_index,
            freq_index,
            direction: self.directions[direction_index],
            time: self.times[time_index],
            freq_hz: self.freqs_hz[freq_index],
        }
    }

    /// The `index`th point in this grid's order.
    pub fn point(&self, index: usize) -> Option<GridPoint> {
        if index >= self.len() {
            return None;
        }
        Some(self.nth_point(index))
    }

    /// The `index`th point in this grid's order. Panics if `index` is out of
    /// range.
    pub(crate) fn nth_point(&self, index: usize) -> GridPoint {
        let lens = [self.directions.len(), self.times.len(), self.freqs_hz.len()];
        let [outer, middle, inner] = self.order.axes();
        let mut indices = [0; 3];
        indices[inner] = index % lens[inner];
        let rest = index / lens[inner];
        indices[middle] = rest % lens[middle];
        indices[outer] = rest / lens[middle];
        self.point_at(indices[DIR], indices[TIME], indices[FREQ])
    }

    /// All points, in this grid's order. This can be called any number of
    /// times.
    pub fn points(&self) -> impl ExactSizeIterator<Item = GridPoint> + '_ {
        (0..self.len()).map(move |i| self.nth_point(i))
    }
}
