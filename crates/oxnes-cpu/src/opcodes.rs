//! Opcode decode table.
//!
//! Maps each of the 256 opcode bytes to a mnemonic and addressing mode. The
//! table covers the 56 official mnemonics plus the commonly required
//! undocumented ones (LAX, SAX, DCP, ISB, SLO, RLA, SRE, RRA, the NOP
//! matrix, and the JAM/KIL halt bytes). Every remaining byte decodes as an
//! implied NOP of minimal cost.

use crate::addressing::AddressingMode;

/// Instruction mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // Names mirror the 6502 reference mnemonics.
pub enum Mnemonic {
    // Official
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    // Undocumented
    Lax, Sax, Dcp, Isb, Slo, Rla, Sre, Rra,
    /// Halt opcode; the CPU jams until reset.
    Jam,
}

/// Decoded opcode: mnemonic plus addressing mode.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,
    /// Addressing mode.
    pub mode: AddressingMode,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode) -> Opcode {
    Opcode { mnemonic, mode }
}

/// Full 256-entry decode table, indexed by opcode byte.
pub static OPCODE_TABLE: [Opcode; 256] = {
    use AddressingMode::{
        Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, IndexedIndirect,
        Indirect, IndirectIndexed, Relative, ZeroPage, ZeroPageX, ZeroPageY,
    };
    use Mnemonic::{
        Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv,
        Cmp, Cpx, Cpy, Dcp, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Isb, Jam, Jmp, Jsr, Lax, Lda,
        Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rla, Rol, Ror, Rra, Rti, Rts, Sax, Sbc,
        Sec, Sed, Sei, Slo, Sre, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    };

    // Unlisted undocumented bytes fall through as minimal-cost NOPs.
    let mut t = [op(Nop, Implied); 256];

    // Row $0x
    t[0x00] = op(Brk, Implied);
    t[0x01] = op(Ora, IndexedIndirect);
    t[0x02] = op(Jam, Implied);
    t[0x03] = op(Slo, IndexedIndirect);
    t[0x04] = op(Nop, ZeroPage);
    t[0x05] = op(Ora, ZeroPage);
    t[0x06] = op(Asl, ZeroPage);
    t[0x07] = op(Slo, ZeroPage);
    t[0x08] = op(Php, Implied);
    t[0x09] = op(Ora, Immediate);
    t[0x0A] = op(Asl, Accumulator);
    t[0x0C] = op(Nop, Absolute);
    t[0x0D] = op(Ora, Absolute);
    t[0x0E] = op(Asl, Absolute);
    t[0x0F] = op(Slo, Absolute);

    // Row $1x
    t[0x10] = op(Bpl, Relative);
    t[0x11] = op(Ora, IndirectIndexed);
    t[0x12] = op(Jam, Implied);
    t[0x13] = op(Slo, IndirectIndexed);
    t[0x14] = op(Nop, ZeroPageX);
    t[0x15] = op(Ora, ZeroPageX);
    t[0x16] = op(Asl, ZeroPageX);
    t[0x17] = op(Slo, ZeroPageX);
    t[0x18] = op(Clc, Implied);
    t[0x19] = op(Ora, AbsoluteY);
    t[0x1A] = op(Nop, Implied);
    t[0x1B] = op(Slo, AbsoluteY);
    t[0x1C] = op(Nop, AbsoluteX);
    t[0x1D] = op(Ora, AbsoluteX);
    t[0x1E] = op(Asl, AbsoluteX);
    t[0x1F] = op(Slo, AbsoluteX);

    // Row $2x
    t[0x20] = op(Jsr, Absolute);
    t[0x21] = op(And, IndexedIndirect);
    t[0x22] = op(Jam, Implied);
    t[0x23] = op(Rla, IndexedIndirect);
    t[0x24] = op(Bit, ZeroPage);
    t[0x25] = op(And, ZeroPage);
    t[0x26] = op(Rol, ZeroPage);
    t[0x27] = op(Rla, ZeroPage);
    t[0x28] = op(Plp, Implied);
    t[0x29] = op(And, Immediate);
    t[0x2A] = op(Rol, Accumulator);
    t[0x2C] = op(Bit, Absolute);
    t[0x2D] = op(And, Absolute);
    t[0x2E] = op(Rol, Absolute);
    t[0x2F] = op(Rla, Absolute);

    // Row $3x
    t[0x30] = op(Bmi, Relative);
    t[0x31] = op(And, IndirectIndexed);
    t[0x32] = op(Jam, Implied);
    t[0x33] = op(Rla, IndirectIndexed);
    t[0x34] = op(Nop, ZeroPageX);
    t[0x35] = op(And, ZeroPageX);
    t[0x36] = op(Rol, ZeroPageX);
    t[0x37] = op(Rla, ZeroPageX);
    t[0x38] = op(Sec, Implied);
    t[0x39] = op(And, AbsoluteY);
    t[0x3A] = op(Nop, Implied);
    t[0x3B] = op(Rla, AbsoluteY);
    t[0x3C] = op(Nop, AbsoluteX);
    t[0x3D] = op(And, AbsoluteX);
    t[0x3E] = op(Rol, AbsoluteX);
    t[0x3F] = op(Rla, AbsoluteX);

    // Row $4x
    t[0x40] = op(Rti, Implied);
    t[0x41] = op(Eor, IndexedIndirect);
    t[0x42] = op(Jam, Implied);
    t[0x43] = op(Sre, IndexedIndirect);
    t[0x44] = op(Nop, ZeroPage);
    t[0x45] = op(Eor, ZeroPage);
    t[0x46] = op(Lsr, ZeroPage);
    t[0x47] = op(Sre, ZeroPage);
    t[0x48] = op(Pha, Implied);
    t[0x49] = op(Eor, Immediate);
    t[0x4A] = op(Lsr, Accumulator);
    t[0x4C] = op(Jmp, Absolute);
    t[0x4D] = op(Eor, Absolute);
    t[0x4E] = op(Lsr, Absolute);
    t[0x4F] = op(Sre, Absolute);

    // Row $5x
    t[0x50] = op(Bvc, Relative);
    t[0x51] = op(Eor, IndirectIndexed);
    t[0x52] = op(Jam, Implied);
    t[0x53] = op(Sre, IndirectIndexed);
    t[0x54] = op(Nop, ZeroPageX);
    t[0x55] = op(Eor, ZeroPageX);
    t[0x56] = op(Lsr, ZeroPageX);
    t[0x57] = op(Sre, ZeroPageX);
    t[0x58] = op(Cli, Implied);
    t[0x59] = op(Eor, AbsoluteY);
    t[0x5A] = op(Nop, Implied);
    t[0x5B] = op(Sre, AbsoluteY);
    t[0x5C] = op(Nop, AbsoluteX);
    t[0x5D] = op(Eor, AbsoluteX);
    t[0x5E] = op(Lsr, AbsoluteX);
    t[0x5F] = op(Sre, AbsoluteX);

    // Row $6x
    t[0x60] = op(Rts, Implied);
    t[0x61] = op(Adc, IndexedIndirect);
    t[0x62] = op(Jam, Implied);
    t[0x63] = op(Rra, IndexedIndirect);
    t[0x64] = op(Nop, ZeroPage);
    t[0x65] = op(Adc, ZeroPage);
    t[0x66] = op(Ror, ZeroPage);
    t[0x67] = op(Rra, ZeroPage);
    t[0x68] = op(Pla, Implied);
    t[0x69] = op(Adc, Immediate);
    t[0x6A] = op(Ror, Accumulator);
    t[0x6C] = op(Jmp, Indirect);
    t[0x6D] = op(Adc, Absolute);
    t[0x6E] = op(Ror, Absolute);
    t[0x6F] = op(Rra, Absolute);

    // Row $7x
    t[0x70] = op(Bvs, Relative);
    t[0x71] = op(Adc, IndirectIndexed);
    t[0x72] = op(Jam, Implied);
    t[0x73] = op(Rra, IndirectIndexed);
    t[0x74] = op(Nop, ZeroPageX);
    t[0x75] = op(Adc, ZeroPageX);
    t[0x76] = op(Ror, ZeroPageX);
    t[0x77] = op(Rra, ZeroPageX);
    t[0x78] = op(Sei, Implied);
    t[0x79] = op(Adc, AbsoluteY);
    t[0x7A] = op(Nop, Implied);
    t[0x7B] = op(Rra, AbsoluteY);
    t[0x7C] = op(Nop, AbsoluteX);
    t[0x7D] = op(Adc, AbsoluteX);
    t[0x7E] = op(Ror, AbsoluteX);
    t[0x7F] = op(Rra, AbsoluteX);

    // Row $8x
    t[0x80] = op(Nop, Immediate);
    t[0x81] = op(Sta, IndexedIndirect);
    t[0x82] = op(Nop, Immediate);
    t[0x83] = op(Sax, IndexedIndirect);
    t[0x84] = op(Sty, ZeroPage);
    t[0x85] = op(Sta, ZeroPage);
    t[0x86] = op(Stx, ZeroPage);
    t[0x87] = op(Sax, ZeroPage);
    t[0x88] = op(Dey, Implied);
    t[0x89] = op(Nop, Immediate);
    t[0x8A] = op(Txa, Implied);
    t[0x8C] = op(Sty, Absolute);
    t[0x8D] = op(Sta, Absolute);
    t[0x8E] = op(Stx, Absolute);
    t[0x8F] = op(Sax, Absolute);

    // Row $9x
    t[0x90] = op(Bcc, Relative);
    t[0x91] = op(Sta, IndirectIndexed);
    t[0x92] = op(Jam, Implied);
    t[0x94] = op(Sty, ZeroPageX);
    t[0x95] = op(Sta, ZeroPageX);
    t[0x96] = op(Stx, ZeroPageY);
    t[0x97] = op(Sax, ZeroPageY);
    t[0x98] = op(Tya, Implied);
    t[0x99] = op(Sta, AbsoluteY);
    t[0x9A] = op(Txs, Implied);
    t[0x9D] = op(Sta, AbsoluteX);

    // Row $Ax
    t[0xA0] = op(Ldy, Immediate);
    t[0xA1] = op(Lda, IndexedIndirect);
    t[0xA2] = op(Ldx, Immediate);
    t[0xA3] = op(Lax, IndexedIndirect);
    t[0xA4] = op(Ldy, ZeroPage);
    t[0xA5] = op(Lda, ZeroPage);
    t[0xA6] = op(Ldx, ZeroPage);
    t[0xA7] = op(Lax, ZeroPage);
    t[0xA8] = op(Tay, Implied);
    t[0xA9] = op(Lda, Immediate);
    t[0xAA] = op(Tax, Implied);
    t[0xAC] = op(Ldy, Absolute);
    t[0xAD] = op(Lda, Absolute);
    t[0xAE] = op(Ldx, Absolute);
    t[0xAF] = op(Lax, Absolute);

    // Row $Bx
    t[0xB0] = op(Bcs, Relative);
    t[0xB1] = op(Lda, IndirectIndexed);
    t[0xB2] = op(Jam, Implied);
    t[0xB3] = op(Lax, IndirectIndexed);
    t[0xB4] = op(Ldy, ZeroPageX);
    t[0xB5] = op(Lda, ZeroPageX);
    t[0xB6] = op(Ldx, ZeroPageY);
    t[0xB7] = op(Lax, ZeroPageY);
    t[0xB8] = op(Clv, Implied);
    t[0xB9] = op(Lda, AbsoluteY);
    t[0xBA] = op(Tsx, Implied);
    t[0xBC] = op(Ldy, AbsoluteX);
    t[0xBD] = op(Lda, AbsoluteX);
    t[0xBE] = op(Ldx, AbsoluteY);
    t[0xBF] = op(Lax, AbsoluteY);

    // Row $Cx
    t[0xC0] = op(Cpy, Immediate);
    t[0xC1] = op(Cmp, IndexedIndirect);
    t[0xC2] = op(Nop, Immediate);
    t[0xC3] = op(Dcp, IndexedIndirect);
    t[0xC4] = op(Cpy, ZeroPage);
    t[0xC5] = op(Cmp, ZeroPage);
    t[0xC6] = op(Dec, ZeroPage);
    t[0xC7] = op(Dcp, ZeroPage);
    t[0xC8] = op(Iny, Implied);
    t[0xC9] = op(Cmp, Immediate);
    t[0xCA] = op(Dex, Implied);
    t[0xCC] = op(Cpy, Absolute);
    t[0xCD] = op(Cmp, Absolute);
    t[0xCE] = op(Dec, Absolute);
    t[0xCF] = op(Dcp, Absolute);

    // Row $Dx
    t[0xD0] = op(Bne, Relative);
    t[0xD1] = op(Cmp, IndirectIndexed);
    t[0xD2] = op(Jam, Implied);
    t[0xD3] = op(Dcp, IndirectIndexed);
    t[0xD4] = op(Nop, ZeroPageX);
    t[0xD5] = op(Cmp, ZeroPageX);
    t[0xD6] = op(Dec, ZeroPageX);
    t[0xD7] = op(Dcp, ZeroPageX);
    t[0xD8] = op(Cld, Implied);
    t[0xD9] = op(Cmp, AbsoluteY);
    t[0xDA] = op(Nop, Implied);
    t[0xDB] = op(Dcp, AbsoluteY);
    t[0xDC] = op(Nop, AbsoluteX);
    t[0xDD] = op(Cmp, AbsoluteX);
    t[0xDE] = op(Dec, AbsoluteX);
    t[0xDF] = op(Dcp, AbsoluteX);

    // Row $Ex
    t[0xE0] = op(Cpx, Immediate);
    t[0xE1] = op(Sbc, IndexedIndirect);
    t[0xE2] = op(Nop, Immediate);
    t[0xE3] = op(Isb, IndexedIndirect);
    t[0xE4] = op(Cpx, ZeroPage);
    t[0xE5] = op(Sbc, ZeroPage);
    t[0xE6] = op(Inc, ZeroPage);
    t[0xE7] = op(Isb, ZeroPage);
    t[0xE8] = op(Inx, Implied);
    t[0xE9] = op(Sbc, Immediate);
    t[0xEA] = op(Nop, Implied);
    t[0xEB] = op(Sbc, Immediate);
    t[0xEC] = op(Cpx, Absolute);
    t[0xED] = op(Sbc, Absolute);
    t[0xEE] = op(Inc, Absolute);
    t[0xEF] = op(Isb, Absolute);

    // Row $Fx
    t[0xF0] = op(Beq, Relative);
    t[0xF1] = op(Sbc, IndirectIndexed);
    t[0xF2] = op(Jam, Implied);
    t[0xF3] = op(Isb, IndirectIndexed);
    t[0xF4] = op(Nop, ZeroPageX);
    t[0xF5] = op(Sbc, ZeroPageX);
    t[0xF6] = op(Inc, ZeroPageX);
    t[0xF7] = op(Isb, ZeroPageX);
    t[0xF8] = op(Sed, Implied);
    t[0xF9] = op(Sbc, AbsoluteY);
    t[0xFA] = op(Nop, Implied);
    t[0xFB] = op(Isb, AbsoluteY);
    t[0xFC] = op(Nop, AbsoluteX);
    t[0xFD] = op(Sbc, AbsoluteX);
    t[0xFE] = op(Inc, AbsoluteX);
    t[0xFF] = op(Isb, AbsoluteX);

    t
};
