//! Bus interface controller.
//!
//! Runs the start/done handshake against the register store. Time advances
//! only through `tick`, one call per rising clock edge; every output is
//! registered, i.e. what `tick` returns is what an observer sees until the
//! following edge.
//!
//! Timing of one isolated write (one read is the same with `ReadPending`):
//!
//! ```text
//! edge      0        1              2        3
//! strobe    high     low            low      low
//! state     Idle  -> WritePending -> Done  -> Idle
//! done      0        0              1        0
//! ```

mod state;

use anyhow::Result;
use regbus_common::Strobe;

use super::config::TriggerMode;
use super::register_store::RegisterStore;

pub use state::{State, Transaction, TxKind};

/// Shortest reset assertion, in edges, the controller is guaranteed to honor.
pub const MIN_RESET_CYCLES: u32 = 2;

/// Logical inputs for one edge, already unpacked from the pins.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BusInputs {
    pub strobes: Strobe,
    pub write_addr: u8,
    pub read_addr: u8,
    pub write_data: u8,
}

/// Registered outputs after an edge.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BusOutputs {
    pub done: bool,
    /// A latched transaction has not reached `DONE` yet.
    pub busy: bool,
    pub read_data: u8,
    /// `read_data` belongs to the latest transaction, which was a read.
    pub read_valid: bool,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Counters {
    pub writes: u64,
    pub reads: u64,
    /// Reset assertions (a run of consecutive reset edges counts once).
    pub resets: u64,
}

pub struct Controller {
    state: State,
    store: RegisterStore,
    trigger: TriggerMode,
    /// Output data latch driven onto `read_data`.
    read_data: u8,
    last: Option<Transaction>,
    /// Raw start lines seen on the previous edge, for `TriggerMode::Edge`.
    prev_lines: Strobe,
    /// Consecutive edges spent in reset so far.
    reset_run: u32,
    counters: Counters,
}

impl Controller {
    pub fn new(addr_width: u8, trigger: TriggerMode) -> Result<Self> {
        Ok(Self {
            state: State::Idle,
            store: RegisterStore::new(addr_width)?,
            trigger,
            read_data: 0,
            last: None,
            prev_lines: Strobe::empty(),
            reset_run: 0,
            counters: Counters::default(),
        })
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.state == State::Done
    }

    #[inline]
    pub fn read_data(&self) -> u8 {
        self.read_data
    }

    pub fn store(&self) -> &RegisterStore {
        &self.store
    }

    pub fn last_transaction(&self) -> Option<Transaction> {
        self.last
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Advance one rising edge.
    ///
    /// `rst_n` low wins over everything else. `ena` acts as a chip select:
    /// while it is low start lines are ignored and the controller settles in
    /// `Idle`. A transaction latched before `ena` fell still completes, since
    /// nothing cancels a pending transaction short of reset.
    pub fn tick(&mut self, rst_n: bool, ena: bool, inputs: &BusInputs) -> BusOutputs {
        if !rst_n {
            self.hold_reset();
            return self.outputs();
        }
        if self.reset_run > 0 {
            if self.reset_run < MIN_RESET_CYCLES {
                log::warn!(
                    "reset released after {} cycle(s); at least {} are required",
                    self.reset_run,
                    MIN_RESET_CYCLES
                );
            } else {
                log::debug!("reset released after {} cycles", self.reset_run);
            }
            self.reset_run = 0;
        }

        let strobes = self.sample_strobes(inputs.strobes);
        let next = match self.state {
            State::Idle | State::Done if !ena => {
                if !strobes.is_empty() {
                    log::debug!("ignoring {strobes:?} while disabled");
                }
                State::Idle
            }
            State::Idle | State::Done => self.accept(strobes, inputs),
            State::WritePending { .. } | State::ReadPending { .. } => {
                if ena {
                    self.drop_strobes(strobes);
                }
                self.commit()
            }
        };

        if next != self.state {
            log::debug!("{:?} -> {:?}", self.state, next);
        }
        self.state = next;
        self.outputs()
    }

    fn sample_strobes(&mut self, lines: Strobe) -> Strobe {
        let prev = std::mem::replace(&mut self.prev_lines, lines);
        match self.trigger {
            TriggerMode::Level => lines,
            TriggerMode::Edge => lines & !prev,
        }
    }

    /// Launch a transaction from `Idle` or `Done`. Write has priority when
    /// both strobes arrive together; the read strobe is then lost.
    fn accept(&mut self, strobes: Strobe, inputs: &BusInputs) -> State {
        if strobes.contains(Strobe::START_WRITE) {
            if strobes.contains(Strobe::START_READ) {
                log::debug!(
                    "start_write and start_read on the same edge; dropping read of {:#x}",
                    inputs.read_addr
                );
            }
            let addr = self.store.mask(inputs.write_addr);
            let data = inputs.write_data;
            self.last = Some(Transaction::write(addr, data));
            State::WritePending { addr, data }
        } else if strobes.contains(Strobe::START_READ) {
            let addr = self.store.mask(inputs.read_addr);
            self.last = Some(Transaction::read(addr));
            State::ReadPending { addr }
        } else {
            State::Idle
        }
    }

    /// Finish the pending transaction against the store.
    fn commit(&mut self) -> State {
        match self.state {
            State::WritePending { addr, data } => {
                self.store.write(addr, data);
                self.counters.writes += 1;
                self.complete(data);
            }
            State::ReadPending { addr } => {
                self.read_data = self.store.read(addr);
                self.counters.reads += 1;
                self.complete(self.read_data);
            }
            State::Idle | State::Done => return self.state,
        }
        State::Done
    }

    fn drop_strobes(&self, strobes: Strobe) {
        if !strobes.is_empty() {
            log::warn!(
                "{strobes:?} asserted while {:?}; strobe dropped (wait for done before the next start)",
                self.state
            );
        }
    }

    fn complete(&mut self, data: u8) {
        if let Some(tx) = self.last.as_mut() {
            tx.data = data;
            tx.completed = true;
        }
    }

    fn hold_reset(&mut self) {
        if self.reset_run == 0 {
            self.counters.resets += 1;
            if self.state.is_pending() {
                log::debug!("reset abandons {:?}", self.state);
            }
        }
        self.reset_run = self.reset_run.saturating_add(1);
        self.state = State::Idle;
        self.read_data = 0;
        self.last = None;
        self.prev_lines = Strobe::empty();
        self.store.reset();
    }

    fn outputs(&self) -> BusOutputs {
        BusOutputs {
            done: self.done(),
            busy: self.state.is_pending(),
            read_data: self.read_data,
            read_valid: self
                .last
                .is_some_and(|tx| tx.kind == TxKind::Read && tx.completed),
        }
    }
}
