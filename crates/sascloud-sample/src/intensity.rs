//! The boundary to the downstream scattering-intensity calculator.
//!
//! The intensity mathematics lives outside this repository; the sampler
//! only promises a pure-function interface fed by a [`SampleCloud`].

use crate::cloud::SampleCloud;

/// A scattering-intensity calculator consuming a sample cloud.
///
/// Implementations may run serially or with their own parallel strategy;
/// callers treat `intensity` as a pure function of its arguments.
pub trait IntensityModel {
    /// Compute the intensity curve `I(q)` for the given momentum-transfer
    /// values, sample cloud (with its SLD annotation), and angular
    /// expansion order `lmax`.
    fn intensity(&self, q: &[f64], cloud: &SampleCloud, lmax: u32) -> Vec<f64>;
}
