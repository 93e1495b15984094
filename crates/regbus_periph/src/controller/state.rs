/// Handshake state. Latched address and data live in the pending variants,
/// so nothing outside a pending state can carry a stale latch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum State {
    #[default]
    Idle,
    WritePending {
        addr: u8,
        data: u8,
    },
    ReadPending {
        addr: u8,
    },
    /// `done` is asserted for every edge spent here.
    Done,
}

impl State {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, State::WritePending { .. } | State::ReadPending { .. })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxKind {
    Write,
    Read,
}

/// Record of the most recently accepted transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub kind: TxKind,
    /// Target address after masking.
    pub addr: u8,
    /// Write payload, or for reads the fetched value once `completed`.
    pub data: u8,
    pub completed: bool,
}

impl Transaction {
    pub(super) fn write(addr: u8, data: u8) -> Self {
        Self {
            kind: TxKind::Write,
            addr,
            data,
            completed: false,
        }
    }

    pub(super) fn read(addr: u8) -> Self {
        Self {
            kind: TxKind::Read,
            addr,
            data: 0,
            completed: false,
        }
    }
}
