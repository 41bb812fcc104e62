//! Board drivers: heartbeat LED and RTOS task creation.

pub mod status_led;
pub mod task_pin;
