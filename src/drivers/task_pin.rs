//! RTOS task creation for the LED and user tasks.
//!
//! `std::thread` on ESP-IDF sits on pthreads, and each pthread is a FreeRTOS
//! task.  `esp_pthread_set_cfg()` stores per-thread settings (core, priority,
//! stack, name) that the next `pthread_create()` from the same thread picks
//! up, so configuring and spawning must happen back to back.  Host builds
//! spawn a plain named thread.

use crate::config::TaskSpec;
use crate::error::{Error, Result};

/// CPU core identifiers for the ESP32 Xtensa LX6 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — protocol stacks (EMAC, lwIP).
    Pro = 0,
    /// Core 1 (APP_CPU) — application tasks.
    App = 1,
}

/// Spawn a task pinned to `core` with the stack and priority from `spec`.
///
/// `name` must be null-terminated (e.g. `"LED\0"`).  A failed spawn maps to
/// [`Error::Task`], the RTOS "out of resources" case.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    core: Core,
    spec: TaskSpec,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');

    // SAFETY: the config struct is fully initialised by the IDF helper and
    // `name` is a 'static null-terminated string that outlives the task.
    let ret = unsafe {
        let mut cfg = esp_idf_svc::sys::esp_pthread_get_default_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as _;
        cfg.thread_name = name.as_ptr().cast();
        esp_idf_svc::sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        log::error!("Task '{}': esp_pthread_set_cfg failed ({})", display_name, ret);
        return Err(Error::Task(display_name));
    }

    log::info!(
        "Task '{}': core {:?}, priority {}, stack {}KB",
        display_name,
        core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Task(display_name))
}

/// Host variant: core and priority have no meaning here.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    _core: Core,
    spec: TaskSpec,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Task '{}': host thread, stack {}KB",
        display_name,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        // Host threads need more headroom than the RTOS budget.
        .stack_size((spec.stack_kb * 1024).max(64 * 1024))
        .spawn(f)
        .map_err(|_| Error::Task(display_name))
}
