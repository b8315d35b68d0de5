//! Real-time signal processing building blocks.

pub mod audio_buffer;
pub mod band_splitter;
pub mod iir;

pub use audio_buffer::AudioBuffer;
pub use band_splitter::BandSplitter;
pub use iir::{Iir, IirFilterer, flush_denormal};
