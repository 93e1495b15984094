use crate::pins::{PinInputs, PinMap, PinOutputs};

/// A clocked device seen only through its packed pins.
///
/// The host side (`regbus_sim`) drives anything implementing this trait, in
/// the same way a frontend drives any emulator core: one call to `tick` is
/// one rising clock edge.
pub trait PinDevice {
    /// Sample `pins` on a rising edge and return the registered outputs
    /// that are visible until the next edge.
    fn tick(&mut self, pins: &PinInputs) -> PinOutputs;

    /// Layout the device decodes `ui_in` and encodes `uo_out` with.
    fn pin_map(&self) -> PinMap;

    fn name(&self) -> String;
}
