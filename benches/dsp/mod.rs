//! Benchmarks for DSP primitives.

mod convolution;
mod distortion;
mod impulse;
mod pan;

pub use convolution::bench_convolution;
pub use distortion::bench_distortion;
pub use impulse::bench_impulse;
pub use pan::bench_pan;
