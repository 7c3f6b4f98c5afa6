//! NES 2A03 APU emulation.
//!
//! Two pulse channels, a triangle, a noise channel, and the frame
//! sequencer, mixed through the standard nonlinear lookup tables and
//! resampled to 44.1 kHz float samples in a bounded FIFO. The console
//! clocks [`Apu::clock`] once per CPU cycle and drains samples per frame.

pub mod apu;
pub mod envelope;
pub mod frame_counter;
pub mod length_counter;
pub mod mixer;
pub mod noise;
pub mod pulse;
pub mod sweep;
pub mod timer;
pub mod triangle;

pub use apu::{Apu, CPU_FREQ, SAMPLE_RATE};
pub use frame_counter::{FrameCounter, FrameEvents, FrameMode};
pub use sweep::PulseChannel;
