use anyhow::Result;
use regbus_common::{PinDevice, PinInputs, PinMap, PinOutputs, Status};

use super::config::PeripheralConfig;
use super::controller::{BusInputs, Controller};

/// The peripheral as seen from its package pins.
///
/// `ui_in` carries strobes and address fields laid out by a `PinMap`,
/// `uio_in` carries write data, `uio_out` carries the read-data latch and
/// `uo_out` carries `done` (plus `busy` when the map assigns it a bit). The
/// bidirectional pins are only driven (`uio_oe = 0xFF`) while the result of
/// a completed read is on them.
pub struct PeripheralTop {
    controller: Controller,
    pin_map: PinMap,
}

impl PeripheralTop {
    pub fn new(config: &PeripheralConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            controller: Controller::new(config.addr_width, config.trigger)?,
            pin_map: config.pin_map,
        })
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}

impl PinDevice for PeripheralTop {
    fn tick(&mut self, pins: &PinInputs) -> PinOutputs {
        let fields = self.pin_map.decode(pins.ui_in);
        let inputs = BusInputs {
            strobes: fields.strobes,
            write_addr: fields.write_addr,
            read_addr: fields.read_addr,
            write_data: pins.uio_in,
        };
        let bus = self.controller.tick(pins.rst_n, pins.ena, &inputs);

        let mut status = Status::empty();
        status.set(Status::DONE, bus.done);
        status.set(Status::BUSY, bus.busy);
        let outputs = PinOutputs {
            uo_out: self.pin_map.encode_status(status),
            uio_out: bus.read_data,
            uio_oe: if bus.read_valid { 0xFF } else { 0x00 },
        };
        log::trace!(
            "edge {:?} -> {:?} [{:?}]",
            pins,
            outputs,
            self.controller.state()
        );
        outputs
    }

    fn pin_map(&self) -> PinMap {
        self.pin_map
    }

    fn name(&self) -> String {
        format!(
            "regbus peripheral ({} x 8-bit registers)",
            self.controller.store().len()
        )
    }
}
