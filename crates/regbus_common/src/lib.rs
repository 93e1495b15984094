pub mod device;
pub mod flags;
pub mod pins;

pub use device::PinDevice;
pub use flags::{Status, Strobe};
pub use pins::{PinInputs, PinMap, PinOutputs, UiFields, DEFAULT_PRESET};

/// Narrowest register address supported by the peripheral.
pub const MIN_ADDR_WIDTH: u8 = 2;
/// Widest register address supported by the peripheral.
pub const MAX_ADDR_WIDTH: u8 = 4;
/// Register count at `MAX_ADDR_WIDTH`.
pub const MAX_REGISTERS: usize = 1 << MAX_ADDR_WIDTH;
