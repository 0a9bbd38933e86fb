//! Console link transports

pub mod slip_serial;

pub use slip_serial::SlipSerial;
