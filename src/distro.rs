use std::collections::HashMap;
use std::fmt;
use std::fs;

use crate::process::command_exists;

/// Linux distribution family; decides which package manager commands we build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistroFamily {
    Arch,
    Debian,
    Fedora,
    Unknown,
}

impl DistroFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            DistroFamily::Arch => "arch",
            DistroFamily::Debian => "debian",
            DistroFamily::Fedora => "fedora",
            DistroFamily::Unknown => "unknown",
        }
    }

    pub fn package_manager(self) -> Option<&'static str> {
        match self {
            DistroFamily::Arch => Some("pacman"),
            DistroFamily::Debian => Some("apt"),
            DistroFamily::Fedora => Some("dnf"),
            DistroFamily::Unknown => None,
        }
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroInfo {
    pub family: DistroFamily,
    pub name: String,
}

impl DistroInfo {
    #[cfg(test)]
    pub fn unknown() -> Self {
        Self {
            family: DistroFamily::Unknown,
            name: "Unknown".to_string(),
        }
    }
}

const KNOWN_IDS: &[(&str, DistroFamily)] = &[
    ("arch", DistroFamily::Arch),
    ("manjaro", DistroFamily::Arch),
    ("endeavouros", DistroFamily::Arch),
    ("garuda", DistroFamily::Arch),
    ("artix", DistroFamily::Arch),
    ("cachyos", DistroFamily::Arch),
    ("ubuntu", DistroFamily::Debian),
    ("pop", DistroFamily::Debian),
    ("debian", DistroFamily::Debian),
    ("linuxmint", DistroFamily::Debian),
    ("elementary", DistroFamily::Debian),
    ("zorin", DistroFamily::Debian),
    ("fedora", DistroFamily::Fedora),
    ("rhel", DistroFamily::Fedora),
    ("centos", DistroFamily::Fedora),
    ("rocky", DistroFamily::Fedora),
    ("alma", DistroFamily::Fedora),
];

/// Detect the running distribution from `/etc/os-release`, falling back to
/// probing for package managers on `PATH`.
pub fn detect() -> DistroInfo {
    let content = fs::read_to_string("/etc/os-release").unwrap_or_default();
    let fields = parse_os_release(&content);
    let mut info = from_os_release(&fields);
    if info.family == DistroFamily::Unknown {
        info.family = detect_by_command();
    }
    tracing::debug!(family = %info.family, name = %info.name, "detected distro");
    info
}

pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().trim_matches('"').to_string()))
        .collect()
}

/// Classify from parsed os-release fields only (no PATH probing).
pub fn from_os_release(fields: &HashMap<String, String>) -> DistroInfo {
    let id = fields.get("ID").map(|s| s.to_lowercase()).unwrap_or_default();
    let id_like = fields
        .get("ID_LIKE")
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let name = fields
        .get("NAME")
        .filter(|n| !n.is_empty())
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    let family = KNOWN_IDS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, family)| *family)
        .unwrap_or_else(|| family_from_id_like(&id_like));

    DistroInfo { family, name }
}

fn family_from_id_like(id_like: &str) -> DistroFamily {
    if id_like.contains("arch") {
        DistroFamily::Arch
    } else if id_like.contains("debian") || id_like.contains("ubuntu") {
        DistroFamily::Debian
    } else if id_like.contains("fedora") || id_like.contains("rhel") {
        DistroFamily::Fedora
    } else {
        DistroFamily::Unknown
    }
}

fn detect_by_command() -> DistroFamily {
    if command_exists("pacman") {
        DistroFamily::Arch
    } else if command_exists("apt") {
        DistroFamily::Debian
    } else if command_exists("dnf") {
        DistroFamily::Fedora
    } else {
        DistroFamily::Unknown
    }
}
