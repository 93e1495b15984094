mod driver;
mod error;
mod script;
mod simulator;

pub use driver::Driver;
pub use error::{Result, SimError};
pub use script::{parse_script, run_script, Command, ScriptReport};
pub use simulator::Simulator;

use typed_builder::TypedBuilder;

/// Cycles `Driver::wait_done` polls before giving up.
pub const DEFAULT_TIMEOUT_CYCLES: u64 = 2000;

/// How long the driver keeps a start line asserted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum StartStyle {
    /// Assert for the sampling edge only, then release.
    #[default]
    Pulse,
    /// Keep asserted until `done` is observed. Pair with an edge-triggered
    /// device; a level-triggered one sees the held line as repeated starts.
    Hold,
}

/// Driver timing parameters.
#[derive(Clone, Debug, TypedBuilder)]
pub struct SimInitInfo {
    #[builder(default = DEFAULT_TIMEOUT_CYCLES)]
    pub timeout_cycles: u64,
    /// Edges `rst_n` is held low by `Driver::reset`.
    #[builder(default = 5)]
    pub reset_cycles: u32,
    /// Quiet edges after reset release and after each transaction.
    #[builder(default = 2)]
    pub settle_cycles: u32,
    #[builder(default)]
    pub start_style: StartStyle,
}

impl Default for SimInitInfo {
    fn default() -> Self {
        Self::builder().build()
    }
}
