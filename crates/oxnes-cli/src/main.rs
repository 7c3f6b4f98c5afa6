//! Reference command-line front-end.
//!
//! Runs the built-in self-tests against the public console API and can
//! smoke-run an iNES ROM headlessly. Host video/audio/input integration
//! lives outside this binary. Exit code 0 means every requested check
//! passed; 1 means at least one failed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use oxnes_core::{Console, LoadError};
use oxnes_cpu::Bus;


/// oxnes reference front-end.
#[derive(Debug, Parser)]
#[command(name = "oxnes", version, about)]
struct Args {
    /// Run the CPU arithmetic/addressing self-test.
    #[arg(long)]
    cpu_self_test: bool,

    /// Run the PPU register and timing self-test.
    #[arg(long)]
    ppu_self_test: bool,

    /// Run the nametable mirroring self-test.
    #[arg(long)]
    ppu_mirror_test: bool,

    /// Run the mapper banking self-test.
    #[arg(long)]
    mapper_self_test: bool,

    /// Load an iNES ROM and run a short headless smoke test.
    #[arg(long, value_name = "PATH")]
    load_rom: Option<PathBuf>,

    /// CPU cycles emulated per frame.
    #[arg(long, value_name = "N", default_value_t = 29_780)]
    cpu_cycles_per_frame: u32,

    /// Frames to emulate with --load-rom.
    #[arg(long, value_name = "N", default_value_t = 60)]
    frames: u32,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut ran_anything = false;
    let mut failed = false;

    let suites: [(&str, bool, fn() -> Result<()>); 4] = [
        ("cpu-self-test", args.cpu_self_test, self_tests::cpu),
        ("ppu-self-test", args.ppu_self_test, self_tests::ppu),
        ("ppu-mirror-test", args.ppu_mirror_test, self_tests::mirroring),
        ("mapper-self-test", args.mapper_self_test, self_tests::mappers),
    ];

    for (name, requested, run) in suites {
        if !requested {
            continue;
        }
        ran_anything = true;
        match run() {
            Ok(()) => println!("{name}: PASS"),
            Err(err) => {
                println!("{name}: FAIL ({err})");
                failed = true;
            }
        }
    }

    if let Some(path) = &args.load_rom {
        ran_anything = true;
        match smoke_run(path, args.cpu_cycles_per_frame, args.frames) {
            Ok(()) => println!("load-rom: PASS"),
            Err(err) => {
                println!("load-rom: FAIL ({err:#})");
                failed = true;
            }
        }
    }

    if !ran_anything {
        eprintln!("nothing to do; pass a self-test flag or --load-rom (see --help)");
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Load a ROM and emulate a few frames, reporting basic statistics.
fn smoke_run(path: &PathBuf, cycles_per_frame: u32, frames: u32) -> Result<()> {
    let rom = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let mut console = Console::new();
    match console.insert_cartridge(&rom) {
        Ok(()) => {}
        Err(LoadError::UnsupportedMapper(id)) => bail!("unsupported mapper {id}"),
        Err(err) => bail!("bad ROM image: {err}"),
    }
    console.set_cpu_cycles_per_frame(cycles_per_frame);

    let mut audio = vec![0.0f32; 4096];
    let mut total_samples = 0usize;
    for _ in 0..frames {
        console.next_frame();
        total_samples += console.drain_apu_samples(&mut audio);
    }

    // A cheap visibility check: any non-black pixel in the final frame.
    let lit_pixels = console
        .frame_buffer()
        .iter()
        .filter(|&&pixel| pixel != 0)
        .count();

    log::info!(
        "ran {frames} frames ({} CPU cycles), {total_samples} audio samples, {lit_pixels} lit pixels",
        console.cycles(),
    );

    // Sanity: reading the reset vector must hit cartridge space.
    let _ = console.bus_mut().read(0xFFFC);
    Ok(())
}
