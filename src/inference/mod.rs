//! Statistical inference for fitted coefficients.

mod coefficient;

pub use coefficient::CoefficientInference;
