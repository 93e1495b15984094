use bitflags::bitflags;

bitflags! {
    /// Logical start lines, independent of where a `PinMap` packs them.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Strobe: u8 {
        const START_WRITE = 0b0000_0001;
        const START_READ = 0b0000_0010;
    }
}

bitflags! {
    /// Logical status lines driven back onto `uo_out`.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Status: u8 {
        /// High for the cycle(s) the controller sits in `DONE`.
        const DONE = 0b0000_0001;
        /// High while a latched transaction is pending.
        const BUSY = 0b0000_0010;
    }
}
