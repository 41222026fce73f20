// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with evaluating measurement equations over grids.

use thiserror::Error;

use super::GridPoint;
use crate::term::TermError;

/// A grid evaluation that stopped at a failed point.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Evaluation failed at {point}: {source}")]
pub struct GridError {
    pub point: GridPoint,
    #[source]
    pub source: TermError,
}
