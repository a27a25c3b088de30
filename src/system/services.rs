use std::fmt;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::process::ProcessSpec;

/// Services worth showing in the "common" list, when installed.
pub const KNOWN_SERVICES: &[&str] = &[
    "docker",
    "ssh",
    "sshd",
    "bluetooth",
    "cups",
    "NetworkManager",
    "avahi-daemon",
    "cron",
    "crond",
    "ufw",
    "firewalld",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    /// active / inactive / failed / unknown
    pub active: String,
    /// enabled / disabled / static / unknown
    pub enabled: String,
}

impl ServiceStatus {
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: "unknown".to_string(),
            enabled: "unknown".to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active == "active"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl ServiceAction {
    pub const ALL: [ServiceAction; 5] = [
        ServiceAction::Start,
        ServiceAction::Stop,
        ServiceAction::Restart,
        ServiceAction::Enable,
        ServiceAction::Disable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Enable => "enable",
            ServiceAction::Disable => "disable",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stdout of a systemctl query, regardless of exit status. `is-active` and
/// `is-enabled` print their answer even when they exit non-zero.
fn systemctl_stdout(args: &[&str]) -> Option<String> {
    let out = Command::new("systemctl")
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

pub fn service_exists(name: &str) -> bool {
    let unit = format!("{}.service", name);
    systemctl_stdout(&["list-unit-files", &unit, "--no-legend"]).is_some()
}

/// Blocking.
pub fn status_of(name: &str) -> ServiceStatus {
    let mut status = ServiceStatus::unknown(name);
    if !service_exists(name) {
        return status;
    }
    if let Some(active) = systemctl_stdout(&["is-active", name]) {
        status.active = active;
    }
    if let Some(enabled) = systemctl_stdout(&["is-enabled", name]) {
        status.enabled = enabled;
    }
    status
}

/// Blocking: status of every known service present on this machine.
pub fn known_services() -> Vec<ServiceStatus> {
    KNOWN_SERVICES
        .iter()
        .filter(|name| service_exists(name))
        .map(|name| status_of(name))
        .collect()
}

/// Blocking: every installed service unit. Statuses are filled lazily by the
/// detail view.
pub fn all_services() -> Result<Vec<ServiceStatus>> {
    let out = Command::new("systemctl")
        .args([
            "list-unit-files",
            "--type=service",
            "--no-pager",
            "--no-legend",
        ])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .context("Failed to run systemctl")?;
    if !out.status.success() {
        bail!("systemctl list-unit-files failed");
    }
    Ok(parse_unit_files(&String::from_utf8_lossy(&out.stdout))
        .into_iter()
        .map(|name| ServiceStatus::unknown(&name))
        .collect())
}

fn parse_unit_files(listing: &str) -> Vec<String> {
    let mut names: Vec<String> = listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(|unit| unit.strip_suffix(".service"))
        // template units (foo@.service) can't be started by name
        .filter(|name| !name.ends_with('@'))
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

pub fn action_spec(name: &str, action: ServiceAction) -> ProcessSpec {
    ProcessSpec::new("sudo").args(["systemctl", action.as_str(), name])
}

pub fn status_spec(name: &str) -> ProcessSpec {
    ProcessSpec::new("systemctl").args(["status", name, "--no-pager"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_file_listing_is_parsed_and_sorted() {
        let listing = "sshd.service enabled enabled\n\
                       getty@.service enabled enabled\n\
                       bluetooth.service disabled enabled\n\
                       tmp.mount static -\n";
        assert_eq!(parse_unit_files(listing), vec!["bluetooth", "sshd"]);
    }

    #[test]
    fn action_goes_through_sudo() {
        let spec = action_spec("docker", ServiceAction::Restart);
        assert_eq!(spec.to_string(), "sudo systemctl restart docker");
    }
}
