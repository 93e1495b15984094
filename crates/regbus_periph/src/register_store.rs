use anyhow::{bail, Result};
use regbus_common::{MAX_ADDR_WIDTH, MAX_REGISTERS, MIN_ADDR_WIDTH};

/// Register file behind the bus interface.
///
/// Storage is always `MAX_REGISTERS` cells; only the low `1 << addr_width`
/// of them are addressable. Every address is masked to `addr_width` bits
/// before use, so an out-of-range index aliases onto a valid cell instead of
/// being rejected.
pub struct RegisterStore {
    cells: [u8; MAX_REGISTERS],
    addr_width: u8,
}

impl RegisterStore {
    pub fn new(addr_width: u8) -> Result<Self> {
        if !(MIN_ADDR_WIDTH..=MAX_ADDR_WIDTH).contains(&addr_width) {
            bail!(
                "register address width {addr_width} outside {MIN_ADDR_WIDTH}..={MAX_ADDR_WIDTH}"
            );
        }
        Ok(Self {
            cells: [0; MAX_REGISTERS],
            addr_width,
        })
    }

    /// Number of addressable registers.
    #[inline]
    pub fn len(&self) -> usize {
        1 << self.addr_width
    }

    /// Keep the low `addr_width` bits of `addr`.
    #[inline]
    pub fn mask(&self, addr: u8) -> u8 {
        addr & (self.len() - 1) as u8
    }

    pub fn read(&self, addr: u8) -> u8 {
        self.cells[self.mask(addr) as usize]
    }

    pub fn write(&mut self, addr: u8, value: u8) {
        let index = self.mask(addr) as usize;
        self.cells[index] = value;
    }

    /// Power-on / reset contents: every cell reads back as zero.
    pub fn reset(&mut self) {
        self.cells = [0; MAX_REGISTERS];
    }

    /// The addressable cells, lowest address first.
    pub fn cells(&self) -> &[u8] {
        &self.cells[..self.len()]
    }
}
