pub mod dsp; // Buffer-level signal processing primitives
pub mod error;
pub mod io; // Sample buffers and PCM container encoding
pub mod render; // Settings and the offline render pipeline
pub mod spatial; // Source positions and orbit trajectories

pub use error::{Result, SpatialError};
pub use io::{pcm::PcmEncoder, SampleBuffer};
pub use render::{
    render, CancelToken, EffectSettings, RenderOptions, RenderResult, RenderStage,
    SpatialRenderer,
};
pub use spatial::{Position3D, Trajectory};

/// Default partition size for FFT overlap-add convolution.
pub const MAX_BLOCK_SIZE: usize = 2048;
