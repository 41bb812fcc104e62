//! Application core — pure logic, no direct I/O.
//!
//! Network bring-up sequencing, the echo client session, session
//! statistics, and the supervisor that reports them.  All interaction with
//! the stack, sockets, and logs happens through **port traits** defined in
//! [`ports`], so this layer runs under host tests with mock adapters.

pub mod echo;
pub mod events;
pub mod ports;
pub mod startup;
pub mod stats;
pub mod supervisor;
