//! Buffer-level DSP primitives used by the offline renderer.
//!
//! Each stage here is a plain function or small struct that reads one buffer
//! and produces (or rewrites) another. None of them keep state between
//! renders, so the renderer can wire them into a fixed pipeline without a
//! general node graph.

/// FFT overlap-add convolution and impulse normalization.
pub mod convolution;
/// Waveshaping transfer curves and the table-lookup shaper.
pub mod distortion;
/// Synthetic reverb and pseudo-binaural impulse responses.
pub mod impulse;
/// Dry/wet gain mixing.
pub mod mix;
/// Point-source panning law (azimuth + inverse distance).
pub mod pan;

pub use convolution::Convolver;
pub use distortion::{build_curve, Oversample, WaveShaper};
pub use impulse::{Ear, ImpulseKind, ImpulseResponse};
pub use mix::DryWetGains;
pub use pan::{PanGains, PointSourcePanner};
