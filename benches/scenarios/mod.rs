//! Real-world scenario benchmarks.
//!
//! These run the complete pipeline with the settings combinations a user
//! would actually pick.

mod render;

pub use render::bench_render;
