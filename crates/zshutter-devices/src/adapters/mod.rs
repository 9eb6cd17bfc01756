//! Transport implementations.
//!
//! Real bus transports live with the host application; this crate only
//! ships the loopback transport.

pub mod loopback;

pub use loopback::{LoopbackConfig, LoopbackTransport, TransportCall};
