// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

pub use marlu::constants::VEL_C;

/// Seconds per day.
pub const DAYSEC: f64 = 86400.0;

/// The MJD day containing the J2000.0 epoch (2000-01-01T12:00:00).
pub(crate) const MJD_J2000: i64 = 51544;

/// Arcseconds to radians.
pub(crate) const DAS2R: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Lower edge of the LOFAR low-band antenna (LBA) band \[Hz\].
pub const LBA_MIN_FREQ_HZ: f64 = 10e6;
/// Upper edge of the LOFAR LBA band \[Hz\].
pub const LBA_MAX_FREQ_HZ: f64 = 90e6;
/// The LBA reference frequency \[Hz\].
pub const LBA_REF_FREQ_HZ: f64 = 60e6;

/// Lower edge of the LOFAR high-band antenna (HBA) band \[Hz\].
pub const HBA_MIN_FREQ_HZ: f64 = 110e6;
/// Upper edge of the LOFAR HBA band \[Hz\].
pub const HBA_MAX_FREQ_HZ: f64 = 250e6;
/// The HBA reference frequency \[Hz\].
pub const HBA_REF_FREQ_HZ: f64 = 150e6;

/// The default maximum number of entries in an
/// [`EvaluationCache`](crate::EvaluationCache).
pub const DEFAULT_CACHE_ENTRIES: usize = 65536;

/// The number of independently-locked shards in an
/// [`EvaluationCache`](crate::EvaluationCache).
pub(crate) const CACHE_SHARDS: usize = 16;
