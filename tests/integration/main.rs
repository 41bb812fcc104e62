//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! through the real host adapters.  All tests run on the host (x86_64) with
//! no board required; echo tests talk to a loopback `TcpListener`.

#![cfg(not(target_os = "espidf"))]

mod echo_tests;
mod mock_sink;
mod startup_tests;
