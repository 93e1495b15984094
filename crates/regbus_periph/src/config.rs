use anyhow::{bail, Context, Result};
use regbus_common::{PinMap, MAX_ADDR_WIDTH, MIN_ADDR_WIDTH};
use typed_builder::TypedBuilder;

/// How the controller turns raw start lines into strobes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TriggerMode {
    /// A start line sampled high on an edge is a strobe. A driver that holds
    /// the line across `DONE` launches a second transaction.
    #[default]
    Level,
    /// Only a low-to-high change between two consecutive edges is a strobe,
    /// so holding the line launches exactly one transaction.
    Edge,
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct PeripheralConfig {
    /// Register address width in bits; the store holds `1 << addr_width`
    /// registers.
    #[builder(default = MIN_ADDR_WIDTH)]
    pub addr_width: u8,
    #[builder(default)]
    pub pin_map: PinMap,
    #[builder(default)]
    pub trigger: TriggerMode,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PeripheralConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ADDR_WIDTH..=MAX_ADDR_WIDTH).contains(&self.addr_width) {
            bail!(
                "addr_width {} outside {MIN_ADDR_WIDTH}..={MAX_ADDR_WIDTH}",
                self.addr_width
            );
        }
        self.pin_map.validate().context("invalid pin map")?;
        if self.pin_map.addr_field_width < self.addr_width {
            log::warn!(
                "pin address fields are {} bits wide but the store has {} address bits; \
                 registers above {} are unreachable from the pins",
                self.pin_map.addr_field_width,
                self.addr_width,
                self.pin_map.addr_mask()
            );
        }
        Ok(())
    }
}
