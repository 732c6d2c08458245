bitflags! {
    /// The processor status register.
    ///
    /// Packing order is fixed by the silicon: C is bit 0 and N is bit 7.
    /// UNUSED is hard-wired high on the real part, which here means it is
    /// forced back on at every instruction boundary.
    pub struct Status: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        const BREAK = 0x10;
        const UNUSED = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}
