mod config;
mod controller;
mod register_store;
mod top;

pub use config::{PeripheralConfig, TriggerMode};
pub use controller::{
    BusInputs, BusOutputs, Controller, Counters, State, Transaction, TxKind, MIN_RESET_CYCLES,
};
pub use register_store::RegisterStore;
pub use top::PeripheralTop;
