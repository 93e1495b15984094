use regbus_common::{PinDevice, PinMap, PinOutputs, Status, Strobe, UiFields};

use crate::error::{Result, SimError};
use crate::simulator::Simulator;
use crate::{SimInitInfo, StartStyle};

/// Host side of the start/done handshake.
///
/// Every transaction follows the same sequence: drive the strobe, address
/// and data pins, clock the sampling edge, release the strobe (or keep it,
/// see `StartStyle`), then poll `done` once per edge for at most
/// `timeout_cycles` edges. Pins are packed with the device's own `PinMap`.
pub struct Driver<D: PinDevice> {
    sim: Simulator<D>,
    info: SimInitInfo,
    pin_map: PinMap,
}

impl<D: PinDevice> Driver<D> {
    pub fn new(device: D, info: SimInitInfo) -> Self {
        let pin_map = device.pin_map();
        log::info!("driving {} ({:?})", device.name(), info);
        Self {
            sim: Simulator::new(device),
            info,
            pin_map,
        }
    }

    pub fn pin_map(&self) -> PinMap {
        self.pin_map
    }

    pub fn device(&self) -> &D {
        self.sim.device()
    }

    #[inline]
    pub fn cycle(&self) -> u64 {
        self.sim.cycle()
    }

    #[inline]
    pub fn outputs(&self) -> PinOutputs {
        self.sim.outputs()
    }

    pub fn status(&self) -> Status {
        self.pin_map.decode_status(self.sim.outputs().uo_out)
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.status().contains(Status::DONE)
    }

    /// Reset for the configured number of edges.
    pub fn reset(&mut self) {
        self.reset_for(self.info.reset_cycles);
    }

    /// Hold `rst_n` low with every other input cleared for `cycles` edges,
    /// release it, then let the device settle.
    pub fn reset_for(&mut self, cycles: u32) {
        self.sim.set_rst_n(false);
        self.sim.set_ena(true);
        self.sim.set_ui_in(0);
        self.sim.set_uio_in(0);
        self.sim.run(cycles as u64);
        self.sim.set_rst_n(true);
        self.settle();
        log::debug!("reset held for {cycles} cycles, released at cycle {}", self.cycle());
    }

    pub fn idle(&mut self, cycles: u32) {
        self.sim.run(cycles as u64);
    }

    /// Write `data` to register `addr`. Returns the edges spent waiting for
    /// `done` after the sampling edge.
    pub fn write(&mut self, addr: u8, data: u8) -> Result<u64> {
        self.sim.set_uio_in(data);
        let waited = self.launch(
            UiFields {
                strobes: Strobe::START_WRITE,
                write_addr: addr,
                read_addr: 0,
            },
            "write",
        )?;
        log::info!("WRITE: addr={addr:#X} data={data:#04X}");
        self.settle();
        Ok(waited)
    }

    pub fn read(&mut self, addr: u8) -> Result<u8> {
        self.launch(
            UiFields {
                strobes: Strobe::START_READ,
                write_addr: 0,
                read_addr: addr,
            },
            "read",
        )?;
        let data = self.sim.outputs().uio_out;
        log::info!("READ: addr={addr:#X} data={data:#04X}");
        self.settle();
        Ok(data)
    }

    /// Read `addr` and fail with `SimError::Mismatch` unless it holds
    /// `expected`.
    pub fn expect_read(&mut self, addr: u8, expected: u8) -> Result<u8> {
        let actual = self.read(addr)?;
        if actual != expected {
            log::error!("read of {addr:#X}: expected {expected:#04X}, got {actual:#04X}");
            return Err(SimError::Mismatch {
                addr,
                expected,
                actual,
            });
        }
        Ok(actual)
    }

    /// Raise both start lines on the same edge.
    pub fn write_and_read(&mut self, write_addr: u8, data: u8, read_addr: u8) -> Result<u64> {
        self.sim.set_uio_in(data);
        let waited = self.launch(
            UiFields {
                strobes: Strobe::START_WRITE | Strobe::START_READ,
                write_addr,
                read_addr,
            },
            "write+read",
        )?;
        log::info!(
            "WRITE+READ: write addr={write_addr:#X} data={data:#04X}, read addr={read_addr:#X}"
        );
        self.settle();
        Ok(waited)
    }

    /// Poll `done` before each edge, for at most `timeout_cycles` edges.
    pub fn wait_done(&mut self, op: &'static str) -> Result<u64> {
        let timeout = self.info.timeout_cycles;
        for cycle in 0..timeout {
            if self.done() {
                log::debug!("{op}: done detected after {cycle} cycle(s)");
                return Ok(cycle);
            }
            self.sim.clock();
        }
        log::error!("{op}: timeout waiting for done after {timeout} cycles");
        Err(SimError::Timeout {
            op,
            cycles: timeout,
        })
    }

    fn launch(&mut self, fields: UiFields, op: &'static str) -> Result<u64> {
        let ui_in = self.pin_map.encode(&fields);
        let released = ui_in & !self.pin_map.strobe_bits(fields.strobes);

        self.sim.set_ui_in(ui_in);
        self.sim.clock();
        match self.info.start_style {
            StartStyle::Pulse => {
                self.sim.set_ui_in(released);
                self.wait_done(op)
            }
            StartStyle::Hold => {
                let waited = self.wait_done(op);
                self.sim.set_ui_in(released);
                waited
            }
        }
    }

    fn settle(&mut self) {
        self.sim.run(self.info.settle_cycles as u64);
    }
}
