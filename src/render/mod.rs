//! The offline spatialization pipeline.
//!
//! ```text
//! input ─→ [pan along trajectory] ─┬─────────────────────────────┐
//!                                  │ binaural?                   │
//!                                  └→ [split → ear IRs → merge] ─┤ feed
//!                                                                │
//!                 ┌──────────────── dry ─────────────────────────┤
//!                 │                                              │
//!                 │        [reverb IR convolution] ←─────────────┘
//!                 │                 │ wet
//!                 └──→ (dry × g_d + wet × g_w) ──→ [waveshaper]? ──→ output
//! ```
//!
//! The topology never changes, so it is written as an ordered list of
//! buffer-to-buffer stages rather than a node graph.

/// Stage reporting and cooperative cancellation.
pub mod progress;
/// The pipeline itself.
pub mod renderer;
/// User-facing effect settings and renderer options.
pub mod settings;

pub use progress::{CancelToken, ProgressSink, RenderStage};
pub use renderer::{RenderResult, SpatialRenderer};
pub use settings::{EffectSettings, RenderOptions};

use crate::error::Result;
use crate::io::SampleBuffer;

/// Render once with default options and an entropy-seeded random source.
pub fn render(input: &SampleBuffer, settings: &EffectSettings) -> Result<RenderResult> {
    SpatialRenderer::new().render(input, settings)
}
