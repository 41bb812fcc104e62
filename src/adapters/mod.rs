//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements              | Connects to                    |
//! |------------|-------------------------|--------------------------------|
//! | `eth`      | NetworkPort             | ESP32 EMAC + DP83848, esp-netif |
//! | `tcp`      | Connector / EchoStream  | lwIP sockets via `std::net`    |
//! | `time`     | DelayNs                 | FreeRTOS tick delay            |
//! | `log_sink` | EventSink               | Serial log output              |

pub mod eth;
pub mod log_sink;
pub mod tcp;
pub mod time;
