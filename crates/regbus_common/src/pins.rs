use std::collections::HashMap;

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use typed_builder::TypedBuilder;

use crate::flags::{Status, Strobe};
use crate::{MAX_ADDR_WIDTH, MIN_ADDR_WIDTH};

/// Preset used when no pin map is named.
pub const DEFAULT_PRESET: &str = "tt-axi4lite";

/// Pin levels presented to a device for one rising edge.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PinInputs {
    /// Active-low reset.
    pub rst_n: bool,
    /// Chip enable.
    pub ena: bool,
    /// Dedicated inputs: strobes and address fields, packed per `PinMap`.
    pub ui_in: u8,
    /// Bidirectional pins, sampled as write data.
    pub uio_in: u8,
}

/// Registered pin levels a device drives after an edge.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PinOutputs {
    /// Status lines, packed per `PinMap`.
    pub uo_out: u8,
    /// Read data.
    pub uio_out: u8,
    /// Output enable for the bidirectional pins (`0xFF` = driving).
    pub uio_oe: u8,
}

/// Logical fields carried by one `ui_in` byte.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiFields {
    pub strobes: Strobe,
    pub write_addr: u8,
    pub read_addr: u8,
}

/// Bit layout of the logical signals on the packed pins.
///
/// The default layout (preset `tt-axi4lite`) puts `start_write` on bit 0,
/// `write_addr` on bits 2:1, `read_addr` on bits 4:3, `start_read` on bit 5,
/// and `done` on `uo_out[0]`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct PinMap {
    #[builder(default = 0)]
    pub start_write_bit: u8,
    #[builder(default = 5)]
    pub start_read_bit: u8,
    /// Lowest bit of the write address field in `ui_in`.
    #[builder(default = 1)]
    pub write_addr_lsb: u8,
    /// Lowest bit of the read address field in `ui_in`.
    #[builder(default = 3)]
    pub read_addr_lsb: u8,
    /// Width of both address fields.
    #[builder(default = 2)]
    pub addr_field_width: u8,
    #[builder(default = 0)]
    pub done_bit: u8,
    /// Optional `uo_out` bit mirroring "transaction pending".
    #[builder(default, setter(strip_option))]
    pub busy_bit: Option<u8>,
}

impl Default for PinMap {
    fn default() -> Self {
        Self::builder().build()
    }
}

lazy_static! {
    static ref PRESETS: HashMap<&'static str, PinMap> = {
        let mut presets = HashMap::new();
        presets.insert(DEFAULT_PRESET, PinMap::default());
        presets.insert(
            "shift2",
            PinMap::builder()
                .start_read_bit(1)
                .write_addr_lsb(2)
                .read_addr_lsb(4)
                .build(),
        );
        presets.insert(
            "wide3",
            PinMap::builder()
                .start_read_bit(7)
                .write_addr_lsb(1)
                .read_addr_lsb(4)
                .addr_field_width(3)
                .busy_bit(1)
                .build(),
        );
        presets
    };
}

#[inline]
fn bit(pos: u8) -> u8 {
    1u8.checked_shl(pos as u32).unwrap_or(0)
}

#[inline]
fn ones(width: u8) -> u8 {
    ((1u16 << width.min(8)) - 1) as u8
}

impl PinMap {
    /// Look up a named preset.
    pub fn preset(name: &str) -> Option<PinMap> {
        PRESETS.get(name).copied()
    }

    /// All preset names, sorted.
    pub fn preset_names() -> Vec<&'static str> {
        let mut names: Vec<_> = PRESETS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Mask covering one address field (before shifting into place).
    pub fn addr_mask(&self) -> u8 {
        ones(self.addr_field_width)
    }

    /// Check that every field fits in its byte and that no two fields
    /// share a bit.
    pub fn validate(&self) -> Result<()> {
        let width = self.addr_field_width;
        if !(MIN_ADDR_WIDTH..=MAX_ADDR_WIDTH).contains(&width) {
            bail!(
                "pin map: address field width {width} outside {MIN_ADDR_WIDTH}..={MAX_ADDR_WIDTH}"
            );
        }

        let ui_fields = [
            ("start_write", self.start_write_bit, 1),
            ("start_read", self.start_read_bit, 1),
            ("write_addr", self.write_addr_lsb, width),
            ("read_addr", self.read_addr_lsb, width),
        ];
        check_fields("ui_in", &ui_fields)?;

        let mut uo_fields = vec![("done", self.done_bit, 1)];
        if let Some(busy) = self.busy_bit {
            uo_fields.push(("busy", busy, 1));
        }
        check_fields("uo_out", &uo_fields)
    }

    pub fn decode(&self, ui_in: u8) -> UiFields {
        let mut strobes = Strobe::empty();
        strobes.set(Strobe::START_WRITE, ui_in & bit(self.start_write_bit) != 0);
        strobes.set(Strobe::START_READ, ui_in & bit(self.start_read_bit) != 0);
        UiFields {
            strobes,
            write_addr: ui_in.checked_shr(self.write_addr_lsb as u32).unwrap_or(0)
                & self.addr_mask(),
            read_addr: ui_in.checked_shr(self.read_addr_lsb as u32).unwrap_or(0)
                & self.addr_mask(),
        }
    }

    /// Pack `fields` into a `ui_in` byte. Addresses wider than the field are
    /// truncated to it.
    pub fn encode(&self, fields: &UiFields) -> u8 {
        let mask = self.addr_mask();
        let write_addr = (fields.write_addr & mask)
            .checked_shl(self.write_addr_lsb as u32)
            .unwrap_or(0);
        let read_addr = (fields.read_addr & mask)
            .checked_shl(self.read_addr_lsb as u32)
            .unwrap_or(0);
        self.strobe_bits(fields.strobes) | write_addr | read_addr
    }

    /// `ui_in` bits occupied by the given strobes.
    pub fn strobe_bits(&self, strobes: Strobe) -> u8 {
        let mut bits = 0;
        if strobes.contains(Strobe::START_WRITE) {
            bits |= bit(self.start_write_bit);
        }
        if strobes.contains(Strobe::START_READ) {
            bits |= bit(self.start_read_bit);
        }
        bits
    }

    pub fn encode_status(&self, status: Status) -> u8 {
        let mut uo_out = 0;
        if status.contains(Status::DONE) {
            uo_out |= bit(self.done_bit);
        }
        if let Some(busy) = self.busy_bit {
            if status.contains(Status::BUSY) {
                uo_out |= bit(busy);
            }
        }
        uo_out
    }

    pub fn decode_status(&self, uo_out: u8) -> Status {
        let mut status = Status::empty();
        status.set(Status::DONE, uo_out & bit(self.done_bit) != 0);
        if let Some(busy) = self.busy_bit {
            status.set(Status::BUSY, uo_out & bit(busy) != 0);
        }
        status
    }
}

fn check_fields(port: &str, fields: &[(&str, u8, u8)]) -> Result<()> {
    for (i, &(name, lsb, width)) in fields.iter().enumerate() {
        if lsb as u16 + width as u16 > 8 {
            bail!("pin map: `{name}` (bit {lsb}, width {width}) does not fit in {port}");
        }
        let mask = ones(width) << lsb;
        for &(other, other_lsb, other_width) in &fields[i + 1..] {
            if other_lsb as u16 + other_width as u16 > 8 {
                continue;
            }
            if mask & (ones(other_width) << other_lsb) != 0 {
                bail!("pin map: `{name}` overlaps `{other}` in {port}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_packs_strobes_and_addresses() {
        let map = PinMap::default();
        assert_eq!(PinMap::preset(DEFAULT_PRESET), Some(map));

        // write_addr = 1 on bits 2:1 plus start_write on bit 0.
        let write = UiFields {
            strobes: Strobe::START_WRITE,
            write_addr: 1,
            read_addr: 0,
        };
        assert_eq!(map.encode(&write), 0b0000_0011);

        // read_addr = 1 on bits 4:3 plus start_read on bit 5.
        let read = UiFields {
            strobes: Strobe::START_READ,
            write_addr: 0,
            read_addr: 1,
        };
        assert_eq!(map.encode(&read), 0x28);
        assert_eq!(map.decode(0x28), read);
    }

    #[test]
    fn every_preset_is_valid() {
        for name in PinMap::preset_names() {
            let map = PinMap::preset(name).unwrap();
            map.validate()
                .unwrap_or_else(|e| panic!("preset {name} invalid: {e}"));
        }
        assert_eq!(PinMap::preset("nope"), None);
    }

    #[test]
    fn overlapping_fields_are_rejected() {
        let map = PinMap::builder().start_read_bit(2).build();
        let err = map.validate().unwrap_err().to_string();
        assert!(err.contains("start_read"), "{err}");
        assert!(err.contains("write_addr"), "{err}");

        let map = PinMap::builder().busy_bit(0).build();
        let err = map.validate().unwrap_err().to_string();
        assert!(err.contains("uo_out"), "{err}");
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let map = PinMap::builder().read_addr_lsb(7).build();
        assert!(map.validate().is_err());

        let map = PinMap::builder().addr_field_width(1).build();
        assert!(map.validate().is_err());

        let map = PinMap::builder().addr_field_width(5).build();
        assert!(map.validate().is_err());
    }

    #[test]
    fn encode_truncates_wide_addresses() {
        let map = PinMap::default();
        let fields = UiFields {
            strobes: Strobe::empty(),
            write_addr: 0b101,
            read_addr: 0,
        };
        assert_eq!(map.decode(map.encode(&fields)).write_addr, 0b01);
    }

    #[test]
    fn status_round_trips_through_busy_bit() {
        let map = PinMap::preset("wide3").unwrap();
        let uo_out = map.encode_status(Status::BUSY);
        assert_eq!(uo_out, 0b10);
        assert_eq!(map.decode_status(uo_out), Status::BUSY);

        // Without a busy bit the flag is simply not carried.
        let map = PinMap::default();
        assert_eq!(map.encode_status(Status::BUSY | Status::DONE), 0b01);
        assert_eq!(map.decode_status(0xFF), Status::DONE);
    }
}
