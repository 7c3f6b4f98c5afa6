//! NES emulation core: the console integration layer.
//!
//! Wires the CPU, PPU, APU, controller ports, and cartridge mapper
//! together behind the [`Console`] facade:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      Console                          │
//! │   ┌───────────────────────────────────────────────┐   │
//! │   │                   NesBus                      │   │
//! │   │  ┌─────┐ ┌─────┐ ┌─────┐ ┌────────┐ ┌──────┐  │   │
//! │   │  │ RAM │ │ PPU │ │ APU │ │ Mapper │ │ Pads │  │   │
//! │   │  └─────┘ └─────┘ └─────┘ └────────┘ └──────┘  │   │
//! │   └───────────────────▲───────────────────────────┘   │
//! │                       │ read/write/on_cpu_cycle       │
//! │                  ┌────┴────┐                          │
//! │                  │ CPU 6502│                          │
//! │                  └─────────┘                          │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Every CPU cycle the bus advances the PPU three dots and the APU one
//! cycle, which is what keeps sprite-zero hits, NMI edges, and mapper IRQ
//! counters aligned to sub-instruction timing.
//!
//! # Usage
//!
//! ```no_run
//! use oxnes_core::{Button, Console};
//!
//! let rom = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::new();
//! console.insert_cartridge(&rom).expect("failed to load ROM");
//!
//! let mut audio = vec![0.0f32; 1024];
//! loop {
//!     console.press_button(Button::Start);
//!     console.next_frame();
//!     let _frame = console.frame_buffer(); // 256x240 0x00RRGGBB
//!     let _samples = console.drain_apu_samples(&mut audio);
//! }
//! ```

pub mod bus;
pub mod console;
pub mod controller;

pub use bus::NesBus;
pub use console::{timing, Console};
pub use controller::{Button, ControllerPort};

pub use oxnes_mappers::LoadError;
