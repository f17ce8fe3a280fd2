/// Stack pointer value loaded at power-on.
pub const POWER_ON_SP: u16 = 0xFFFE;
/// `F` bit for zero result.
pub const FLAG_Z: u8 = 1 << 7;
/// `F` bit for subtract (`N`).
pub const FLAG_N: u8 = 1 << 6;
/// `F` bit for half-carry (`H`).
pub const FLAG_H: u8 = 1 << 5;
/// `F` bit for carry (`CY`).
pub const FLAG_C: u8 = 1 << 4;
/// Mask of architecturally active `F` bits. The low nibble always reads zero.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_Z | FLAG_N | FLAG_H | FLAG_C;

/// 8-bit register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    /// All addressable 8-bit registers.
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::H,
        Self::L,
    ];

    /// Assembly name of the register.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::H => "H",
            Self::L => "L",
        }
    }
}

/// 16-bit register selected by `LD rr,d16`, `INC rr`, `DEC rr`, `ADD HL,rr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    /// Decodes a 2-bit pair selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::BC,
            1 => Self::DE,
            2 => Self::HL,
            _ => Self::SP,
        }
    }

    /// Assembly name of the pair.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BC => "BC",
            Self::DE => "DE",
            Self::HL => "HL",
            Self::SP => "SP",
        }
    }
}

/// 16-bit register moved by `PUSH`/`POP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum StackPair {
    BC,
    DE,
    HL,
    AF,
}

impl StackPair {
    /// Decodes a 2-bit stack pair selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::BC,
            1 => Self::DE,
            2 => Self::HL,
            _ => Self::AF,
        }
    }

    /// Assembly name of the pair.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BC => "BC",
            Self::DE => "DE",
            Self::HL => "HL",
            Self::AF => "AF",
        }
    }
}

/// Status flags `Z`, `N`, `H`, `CY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags {
    /// `Z`: result was zero.
    pub zero: bool,
    /// `N`: last operation was a subtraction.
    pub subtract: bool,
    /// `H`: carry/borrow across bit 3 (bit 11 for 16-bit adds).
    pub half_carry: bool,
    /// `CY`: carry/borrow out of the top bit.
    pub carry: bool,
}

impl Flags {
    /// Packs the flags into the `F` register layout.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.zero {
            byte |= FLAG_Z;
        }
        if self.subtract {
            byte |= FLAG_N;
        }
        if self.half_carry {
            byte |= FLAG_H;
        }
        if self.carry {
            byte |= FLAG_C;
        }
        byte
    }

    /// Unpacks an `F` register byte. Inactive low bits are discarded.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            zero: byte & FLAG_Z != 0,
            subtract: byte & FLAG_N != 0,
            half_carry: byte & FLAG_H != 0,
            carry: byte & FLAG_C != 0,
        }
    }
}

/// Composes a 16-bit pair value from its high and low bytes.
#[must_use]
pub const fn compose_pair(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

/// Splits a 16-bit pair value into `(high, low)`.
#[must_use]
pub const fn split_pair(value: u16) -> (u8, u8) {
    let [high, low] = value.to_be_bytes();
    (high, low)
}

/// Register file of the LR35902 core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registers {
    a: u8,
    b: u8,
    c: u8,
    d: u8,
    e: u8,
    h: u8,
    l: u8,
    flags: Flags,
    pc: u16,
    sp: u16,
    ime: bool,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            flags: Flags::default(),
            pc: 0,
            sp: POWER_ON_SP,
            ime: false,
        }
    }
}

impl Registers {
    /// Reads an 8-bit register.
    #[must_use]
    pub const fn reg(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    /// Writes an 8-bit register.
    pub const fn set_reg(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
        }
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Writes the accumulator.
    pub const fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Reads a 16-bit register pair (or `SP`).
    #[must_use]
    pub const fn pair(&self, pair: Reg16) -> u16 {
        match pair {
            Reg16::BC => compose_pair(self.b, self.c),
            Reg16::DE => compose_pair(self.d, self.e),
            Reg16::HL => compose_pair(self.h, self.l),
            Reg16::SP => self.sp,
        }
    }

    /// Writes a 16-bit register pair (or `SP`), decomposing it into its bytes.
    pub const fn set_pair(&mut self, pair: Reg16, value: u16) {
        let (high, low) = split_pair(value);
        match pair {
            Reg16::BC => {
                self.b = high;
                self.c = low;
            }
            Reg16::DE => {
                self.d = high;
                self.e = low;
            }
            Reg16::HL => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = value,
        }
    }

    /// Wrapping 16-bit increment of a pair.
    pub const fn inc_pair(&mut self, pair: Reg16) {
        self.set_pair(pair, self.pair(pair).wrapping_add(1));
    }

    /// Wrapping 16-bit decrement of a pair.
    pub const fn dec_pair(&mut self, pair: Reg16) {
        self.set_pair(pair, self.pair(pair).wrapping_sub(1));
    }

    /// Reads `HL`.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        compose_pair(self.h, self.l)
    }

    /// Reads `AF` with the `F` low nibble as zero.
    #[must_use]
    pub const fn af(&self) -> u16 {
        compose_pair(self.a, self.flags.to_byte())
    }

    /// Writes `AF`; the `F` low nibble is discarded.
    pub const fn set_af(&mut self, value: u16) {
        let (high, low) = split_pair(value);
        self.a = high;
        self.flags = Flags::from_byte(low);
    }

    /// Reads a `PUSH`/`POP` pair.
    #[must_use]
    pub const fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.pair(Reg16::BC),
            StackPair::DE => self.pair(Reg16::DE),
            StackPair::HL => self.pair(Reg16::HL),
            StackPair::AF => self.af(),
        }
    }

    /// Writes a `PUSH`/`POP` pair.
    pub const fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.set_pair(Reg16::BC, value),
            StackPair::DE => self.set_pair(Reg16::DE, value),
            StackPair::HL => self.set_pair(Reg16::HL, value),
            StackPair::AF => self.set_af(value),
        }
    }

    /// Reads the status flags.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Replaces the status flags.
    pub const fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Mutable access to individual status flags.
    pub const fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// Reads `PC`.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes `PC`.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads `SP`.
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.sp
    }

    /// Writes `SP`.
    pub const fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    /// Reads the interrupt master enable latch.
    #[must_use]
    pub const fn ime(&self) -> bool {
        self.ime
    }

    /// Writes the interrupt master enable latch.
    pub const fn set_ime(&mut self, enabled: bool) {
        self.ime = enabled;
    }
}
