//! A rust implementation of the AUX bus protocol. Used to drive the altitude and azimuth motor
//! controllers of Celestron-style telescope mounts, either through the hand controller's serial
//! port or directly on the bus.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true
)]
#![deny(
// missing_debug_implementations,
missing_docs,
trivial_casts,
trivial_numeric_casts,
unused_extern_crates,
unused_import_braces,
unused_qualifications,
// unused_results
)]
#![warn(clippy::unwrap_used)]

mod bus;
mod controller;
mod error;
pub mod protocol;
pub mod rate;
pub mod transport;

pub use bus::{Link, Session, SessionConfig, SessionState};
pub use controller::{HandController, Status, Version};
pub use error::*;
pub use protocol::codec::Dms;
pub use protocol::{Command, Descriptor, Frame, Target};
pub use transport::{MockTransport, Transport};
#[cfg(feature = "serial2")]
pub use transport::SerialTransport;
#[cfg(feature = "serial2")]
pub use serial2;
