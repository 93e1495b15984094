use regbus_common::{PinDevice, PinInputs, PinOutputs};

/// Clock loop around a `PinDevice`.
///
/// Holds the pin levels the host is currently driving and the outputs the
/// device registered on the last edge. Inputs changed between two calls to
/// `clock` are all sampled together on the next edge.
pub struct Simulator<D: PinDevice> {
    device: D,
    inputs: PinInputs,
    outputs: PinOutputs,
    cycle: u64,
}

impl<D: PinDevice> Simulator<D> {
    /// Power-on levels: reset asserted, enabled, all data pins low.
    pub fn new(device: D) -> Self {
        Self {
            device,
            inputs: PinInputs {
                rst_n: false,
                ena: true,
                ui_in: 0,
                uio_in: 0,
            },
            outputs: PinOutputs::default(),
            cycle: 0,
        }
    }

    /// One rising edge.
    pub fn clock(&mut self) -> PinOutputs {
        self.outputs = self.device.tick(&self.inputs);
        self.cycle += 1;
        self.outputs
    }

    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.clock();
        }
    }

    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn outputs(&self) -> PinOutputs {
        self.outputs
    }

    pub fn set_rst_n(&mut self, rst_n: bool) {
        self.inputs.rst_n = rst_n;
    }

    pub fn set_ena(&mut self, ena: bool) {
        self.inputs.ena = ena;
    }

    pub fn set_ui_in(&mut self, ui_in: u8) {
        self.inputs.ui_in = ui_in;
    }

    pub fn set_uio_in(&mut self, uio_in: u8) {
        self.inputs.uio_in = uio_in;
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}
