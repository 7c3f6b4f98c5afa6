//! Emulation throughput benchmarks.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oxnes_core::Console;
use oxnes_cpu::Bus;
use std::time::Duration;

/// Minimal NROM image: a JMP-to-self loop at $8000.
fn minimal_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 32768 + 8192];
    rom[0] = 0x4E;
    rom[1] = 0x45;
    rom[2] = 0x53;
    rom[3] = 0x1A;
    rom[4] = 2; // 32K PRG
    rom[5] = 1; // 8K CHR
    rom[6] = 0x01;

    rom[16] = 0x4C; // JMP $8000
    rom[17] = 0x00;
    rom[18] = 0x80;
    rom[16 + 0x7FFC] = 0x00;
    rom[16 + 0x7FFD] = 0x80;
    rom
}

fn bench_instruction_step(c: &mut Criterion) {
    let mut console = Console::new();
    console.insert_cartridge(&minimal_rom()).unwrap();

    let mut group = c.benchmark_group("cpu");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_instruction", |b| {
        b.iter(|| black_box(console.step_instruction()));
    });
    group.finish();
}

fn bench_frame_step(c: &mut Criterion) {
    let mut console = Console::new();
    console.insert_cartridge(&minimal_rom()).unwrap();
    // Exercise the full rendering path.
    console.bus_mut().write(0x2001, 0x18);

    let mut group = c.benchmark_group("console");
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(1));
    group.bench_function("frame", |b| {
        b.iter(|| {
            console.next_frame();
            black_box(console.frame_buffer()[0]);
        });
    });
    group.finish();
}

fn bench_rom_load(c: &mut Criterion) {
    let rom = minimal_rom();
    c.bench_function("insert_cartridge", |b| {
        b.iter(|| {
            let mut console = Console::new();
            console.insert_cartridge(black_box(&rom)).unwrap();
            black_box(console.cycles())
        });
    });
}

criterion_group!(benches, bench_instruction_step, bench_frame_step, bench_rom_load);
criterion_main!(benches);
