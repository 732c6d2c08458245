#[macro_use]
extern crate bitflags;

pub mod devices;

/// Assemble a 16-bit address from its little-endian halves.
#[macro_export]
macro_rules! bytes_to_addr {
    ($lo: expr, $hi: expr) => {{
        (u16::from($hi) << 8) | u16::from($lo)
    }};
}
