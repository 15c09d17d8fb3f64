// src/recipe/services.rs

//! Service lifecycle checks (start, status, stop)
//!
//! Systems older than the systemd release use SysV `service` for start and
//! status; newer ones use `systemctl` with a `{delay}` wait. The stop phase
//! uses the other family: `systemctl stop` on old systems, `service stop`
//! with a `{delay}` wait on new ones.

use super::format::{SYSTEMD_VERSION, action, command};
use crate::classifier::AggregateInfo;

/// Lifecycle phases in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Status,
    Stop,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[Self::Start, Self::Status, Self::Stop]
    }
}

/// True if the service passes the (possibly empty) filter
pub fn is_selected(service: &str, filter: &[String]) -> bool {
    filter.is_empty() || filter.iter().any(|s| s == service)
}

/// All lifecycle blocks, grouped by phase
pub fn services_check(info: &AggregateInfo, filter: &[String], os_version: Option<u32>) -> String {
    if info.services.is_empty() {
        return String::new();
    }

    let mut data = String::new();

    for phase in Phase::all() {
        for service in info.services.iter().filter(|s| is_selected(s, filter)) {
            data.push_str(&phase_check(*phase, service, os_version));
            data.push('\n');
        }
    }

    data
}

/// A single lifecycle block for one service
pub fn phase_check(phase: Phase, service: &str, os_version: Option<u32>) -> String {
    let systemd = os_version.is_some_and(|v| v >= SYSTEMD_VERSION);

    match (phase, systemd) {
        (Phase::Start, false) => [
            command(&format!("service {} start", service), &format!("Start {} daemon", service)),
            action("exit 0"),
            action(format!("service-works {}", service)),
        ]
        .concat(),
        (Phase::Start, true) => [
            command(&format!("systemctl start {}", service), &format!("Start {} daemon", service)),
            action("wait {delay}"),
            action(format!("service-works {}", service)),
        ]
        .concat(),
        (Phase::Status, false) => [
            command(
                &format!("service {} status", service),
                &format!("Check status of {} daemon", service),
            ),
            action("exit 0"),
        ]
        .concat(),
        (Phase::Status, true) => [
            command(
                &format!("systemctl status {}", service),
                &format!("Check status of {} daemon", service),
            ),
            action("expect \"active (running)\""),
        ]
        .concat(),
        (Phase::Stop, false) => [
            command(&format!("systemctl stop {}", service), &format!("Stop {} daemon", service)),
            action("exit 0"),
            action(format!("!service-works {}", service)),
        ]
        .concat(),
        (Phase::Stop, true) => [
            command(&format!("service {} stop", service), &format!("Stop {} daemon", service)),
            action("wait {delay}"),
            action(format!("!service-works {}", service)),
        ]
        .concat(),
    }
}
