//! System bus: address decoding and clock fan-out.
//!
//! The bus routes CPU accesses to work RAM, the PPU registers, the APU and
//! I/O registers, the controller ports, and the cartridge mapper. It also
//! implements the per-cycle clock discipline: the CPU invokes
//! [`Bus::on_cpu_cycle`] once per cycle, and the bus advances the PPU by
//! three dots and the APU by one cycle in response, so sub-instruction
//! timing (NMI edges, mapper IRQs, DMC-free sample pacing) falls out
//! naturally.
//!
//! CPU memory map:
//!
//! | Range | Target |
//! |---|---|
//! | $0000-$1FFF | 2 KiB work RAM, mirrored |
//! | $2000-$3FFF | PPU registers, mirrored every 8 bytes |
//! | $4014 | OAM DMA trigger |
//! | $4015 | APU status |
//! | $4016/$4017 | Controller serial ports (writes $4017 reach the APU) |
//! | $4000-$4013 | APU channel registers |
//! | $4018-$401F | Open (reads 0) |
//! | $4020-$FFFF | Cartridge mapper |

use oxnes_apu::Apu;
use oxnes_cpu::Bus;
use oxnes_mappers::Mapper;
use oxnes_ppu::Ppu;

use crate::controller::ControllerPort;

/// CPU cycles an OAM DMA transfer stalls the CPU.
pub const OAM_DMA_STALL_CYCLES: u32 = 513;

/// The NES system bus.
pub struct NesBus {
    /// 2 KiB work RAM, wrap-mirrored across $0000-$1FFF.
    pub ram: [u8; 2048],
    /// Picture processing unit.
    pub ppu: Ppu,
    /// Audio processing unit.
    pub apu: Apu,
    /// Cartridge mapper, absent until a cartridge is inserted.
    mapper: Option<Box<dyn Mapper>>,
    /// Controller port 1 ($4016).
    pub controller1: ControllerPort,
    /// Controller port 2 ($4017).
    pub controller2: ControllerPort,

    /// CPU cycle counter mirrored from `on_cpu_cycle`, used to timestamp
    /// mapper writes (MMC1 serial spacing).
    cpu_cycle: u64,
    /// Stall cycles owed to the CPU after an OAM DMA.
    pending_stall: u32,
    /// NMI edge latched from the PPU, consumed by the console loop.
    nmi_pending: bool,
}

impl NesBus {
    /// Create a bus with no cartridge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; 2048],
            ppu: Ppu::new(),
            apu: Apu::new(),
            mapper: None,
            controller1: ControllerPort::new(),
            controller2: ControllerPort::new(),
            cpu_cycle: 0,
            pending_stall: 0,
            nmi_pending: false,
        }
    }

    /// Install a mapper (cartridge insertion), resetting it.
    pub fn insert_mapper(&mut self, mut mapper: Box<dyn Mapper>) {
        mapper.reset();
        self.mapper = Some(mapper);
    }

    /// Whether a cartridge is present.
    #[must_use]
    pub fn has_cartridge(&self) -> bool {
        self.mapper.is_some()
    }

    /// The installed mapper, if any.
    #[must_use]
    pub fn mapper(&self) -> Option<&dyn Mapper> {
        self.mapper.as_deref()
    }

    /// Reset everything except the inserted cartridge's ROM contents.
    pub fn reset(&mut self) {
        self.ram = [0; 2048];
        self.ppu.reset();
        self.apu.reset();
        if let Some(mapper) = self.mapper.as_mut() {
            mapper.reset();
        }
        self.controller1.reset();
        self.controller2.reset();
        self.cpu_cycle = 0;
        self.pending_stall = 0;
        self.nmi_pending = false;
    }

    /// Take the latched NMI edge.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// Take stall cycles owed to the CPU (OAM DMA).
    pub fn take_dma_stall(&mut self) -> u32 {
        std::mem::take(&mut self.pending_stall)
    }

    /// Level of the CPU IRQ line: mapper IRQ or APU frame IRQ.
    #[must_use]
    pub fn irq_asserted(&self) -> bool {
        self.apu.irq_pending()
            || self
                .mapper
                .as_deref()
                .is_some_and(|mapper| mapper.irq_pending())
    }

    /// CPU cycles observed via `on_cpu_cycle`.
    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycle
    }

    /// Side-effect-free read for debugging.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x4015 => self.apu.peek_status(),
            0x4020..=0xFFFF => self
                .mapper
                .as_deref()
                .map_or(0, |mapper| mapper.cpu_peek(addr)),
            _ => 0,
        }
    }

    /// OAM DMA: copy a 256-byte page into OAM and owe the CPU a stall.
    ///
    /// The source bytes are fetched without clock side effects; the timing
    /// cost is modelled entirely by the stall, during which the PPU/APU
    /// advance the equivalent 513 cycles.
    fn oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        for i in 0..256 {
            let byte = self.dma_read(base | i);
            self.ppu.oam_dma_write(byte);
        }
        self.pending_stall += OAM_DMA_STALL_CYCLES;
    }

    /// DMA source fetch: work RAM or cartridge space.
    fn dma_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x4020..=0xFFFF => self
                .mapper
                .as_mut()
                .map_or(0, |mapper| mapper.cpu_read(addr)),
            _ => 0,
        }
    }
}

impl Default for NesBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => match self.mapper.as_deref_mut() {
                Some(mapper) => self.ppu.read_register(addr, mapper),
                None => 0,
            },
            0x4015 => self.apu.read_status(),
            0x4016 => self.controller1.read(),
            0x4017 => self.controller2.read(),
            0x4000..=0x401F => 0,
            0x4020..=0xFFFF => self
                .mapper
                .as_mut()
                .map_or(0, |mapper| mapper.cpu_read(addr)),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            0x2000..=0x3FFF => {
                if let Some(mapper) = self.mapper.as_deref_mut() {
                    self.ppu.write_register(addr, value, mapper);
                }
            }
            0x4014 => self.oam_dma(value),
            0x4016 => {
                let level = value & 1 != 0;
                self.controller1.set_strobe(level);
                self.controller2.set_strobe(level);
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => {
                if let Some(mapper) = self.mapper.as_mut() {
                    mapper.cpu_write(addr, value, self.cpu_cycle);
                }
            }
        }
    }

    fn on_cpu_cycle(&mut self) {
        self.cpu_cycle += 1;
        if let Some(mapper) = self.mapper.as_deref_mut() {
            self.ppu.tick(mapper);
            self.ppu.tick(mapper);
            self.ppu.tick(mapper);
        }
        self.apu.clock();
        if self.ppu.take_nmi() {
            self.nmi_pending = true;
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        NesBus::peek(self, addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxnes_mappers::{create_mapper, Cartridge, Mirroring};

    fn nrom_bus() -> NesBus {
        let cart = Cartridge {
            prg_rom: vec![0xEA; 32768],
            chr_rom: Vec::new(),
            chr_is_ram: true,
            mapper_id: 0,
            mirroring: Mirroring::Vertical,
        };
        let mut bus = NesBus::new();
        bus.insert_mapper(create_mapper(&cart).unwrap());
        bus
    }

    #[test]
    fn test_ram_mirroring() {
        let mut bus = nrom_bus();
        Bus::write(&mut bus, 0x0000, 0x42);
        assert_eq!(Bus::read(&mut bus, 0x0800), 0x42);
        assert_eq!(Bus::read(&mut bus, 0x1000), 0x42);
        assert_eq!(Bus::read(&mut bus, 0x1800), 0x42);

        Bus::write(&mut bus, 0x1234, 0xAB);
        assert_eq!(Bus::read(&mut bus, 0x0234), 0xAB);
    }

    #[test]
    fn test_open_register_space_reads_zero() {
        let mut bus = nrom_bus();
        assert_eq!(Bus::read(&mut bus, 0x4000), 0);
        assert_eq!(Bus::read(&mut bus, 0x4014), 0);
        assert_eq!(Bus::read(&mut bus, 0x4018), 0);
        assert_eq!(Bus::read(&mut bus, 0x401F), 0);
    }

    #[test]
    fn test_cartridge_reads_route_to_mapper() {
        let mut bus = nrom_bus();
        assert_eq!(Bus::read(&mut bus, 0x8000), 0xEA);
        assert_eq!(Bus::read(&mut bus, 0xFFFF), 0xEA);
    }

    #[test]
    fn test_cycle_fan_out_is_three_dots_and_one_apu_cycle() {
        let mut bus = nrom_bus();
        let dots_before = (bus.ppu.scanline(), bus.ppu.dot());
        assert_eq!(dots_before, (-1, 0));
        for _ in 0..100 {
            bus.on_cpu_cycle();
        }
        assert_eq!(bus.apu.cycles(), 100);
        assert_eq!(bus.ppu.dot(), 300);
    }

    #[test]
    fn test_oam_dma_copies_page_and_stalls() {
        let mut bus = nrom_bus();
        for i in 0..256u16 {
            Bus::write(&mut bus, 0x0200 + i, i as u8);
        }
        Bus::write(&mut bus, 0x2003, 0x00); // OAMADDR = 0
        Bus::write(&mut bus, 0x4014, 0x02);

        assert_eq!(bus.take_dma_stall(), OAM_DMA_STALL_CYCLES);
        assert_eq!(bus.take_dma_stall(), 0);

        Bus::write(&mut bus, 0x2003, 0x05);
        assert_eq!(Bus::read(&mut bus, 0x2004), 0x05);
    }

    #[test]
    fn test_controller_strobe_via_bus() {
        let mut bus = nrom_bus();
        bus.controller1.set_button(crate::controller::Button::A, true);

        Bus::write(&mut bus, 0x4016, 1);
        Bus::write(&mut bus, 0x4016, 0);
        assert_eq!(Bus::read(&mut bus, 0x4016) & 1, 1); // A
        assert_eq!(Bus::read(&mut bus, 0x4016) & 1, 0); // B
    }

    #[test]
    fn test_no_cartridge_reads_zero() {
        let mut bus = NesBus::new();
        assert_eq!(Bus::read(&mut bus, 0x8000), 0);
        assert_eq!(Bus::read(&mut bus, 0x2002), 0);
    }

    #[test]
    fn test_peek_has_no_side_effects() {
        let mut bus = nrom_bus();
        Bus::write(&mut bus, 0x0100, 0x55);
        assert_eq!(bus.peek(0x0100), 0x55);
        assert_eq!(bus.peek(0x0900), 0x55);
        assert_eq!(bus.peek(0x8000), 0xEA);
        assert_eq!(bus.peek(0x2002), 0);
    }
}
