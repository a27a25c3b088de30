use std::fs;
use std::path::Path;

use crate::distro::{DistroFamily, DistroInfo};
use crate::process::output_of;

/// Snapshot of the machine shown on the System Info screen. Empty strings
/// mean "could not determine".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub user: String,
    pub os: String,
    pub host: String,
    pub kernel: String,
    pub uptime: String,
    pub packages: String,
    pub shell: String,
    pub desktop: String,
    pub terminal: String,
    pub cpu: String,
    pub gpu: String,
    pub memory: String,
    pub disk: String,
}

impl SystemInfo {
    /// Label/value rows in display order, skipping unknown values.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("User", self.user.as_str()),
            ("OS", self.os.as_str()),
            ("Host", self.host.as_str()),
            ("Kernel", self.kernel.as_str()),
            ("Uptime", self.uptime.as_str()),
            ("Packages", self.packages.as_str()),
            ("Shell", self.shell.as_str()),
            ("Desktop", self.desktop.as_str()),
            ("Terminal", self.terminal.as_str()),
            ("CPU", self.cpu.as_str()),
            ("GPU", self.gpu.as_str()),
            ("Memory", self.memory.as_str()),
            ("Disk", self.disk.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .collect()
    }
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

/// Blocking: shells out to several tools. Run from a background task.
pub fn gather(distro: &DistroInfo) -> SystemInfo {
    let user = env_or_empty("USER");
    let hostname = fs::read_to_string("/proc/sys/kernel/hostname")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    SystemInfo {
        user: match (user.is_empty(), hostname.is_empty()) {
            (false, false) => format!("{}@{}", user, hostname),
            (false, true) => user,
            _ => String::new(),
        },
        os: distro.name.clone(),
        host: fs::read_to_string("/sys/devices/virtual/dmi/id/product_name")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        kernel: output_of("uname", &["-r"]).unwrap_or_default(),
        uptime: output_of("uptime", &["-p"])
            .map(|s| s.trim_start_matches("up ").to_string())
            .unwrap_or_default(),
        packages: count_packages(distro.family),
        shell: std::env::var("SHELL")
            .ok()
            .and_then(|s| {
                Path::new(&s)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_default(),
        desktop: env_or_empty("XDG_CURRENT_DESKTOP"),
        terminal: env_or_empty("TERM"),
        cpu: fs::read_to_string("/proc/cpuinfo")
            .map(|c| cpu_model(&c))
            .unwrap_or_default(),
        gpu: output_of(
            "bash",
            &["-c", "lspci 2>/dev/null | grep -i 'vga\\|3d\\|display' | head -1 | sed 's/.*: //'"],
        )
        .unwrap_or_default(),
        memory: fs::read_to_string("/proc/meminfo")
            .map(|m| memory_usage(&m))
            .unwrap_or_default(),
        disk: output_of(
            "bash",
            &["-c", "df -h / 2>/dev/null | awk 'NR==2 {print $3 \" / \" $2 \" (\" $5 \" used)\"}'"],
        )
        .unwrap_or_default(),
    }
}

fn count_packages(family: DistroFamily) -> String {
    let native = match family {
        DistroFamily::Debian => Some(("dpkg --get-selections 2>/dev/null | wc -l", "dpkg")),
        DistroFamily::Arch => Some(("pacman -Q 2>/dev/null | wc -l", "pacman")),
        DistroFamily::Fedora => Some(("rpm -qa 2>/dev/null | wc -l", "rpm")),
        DistroFamily::Unknown => None,
    };

    let mut parts = Vec::new();
    let sources = native
        .into_iter()
        .chain(std::iter::once(("flatpak list --app 2>/dev/null | wc -l", "flatpak")));
    for (script, label) in sources {
        if let Some(count) = output_of("bash", &["-c", script]) {
            if !count.is_empty() && count != "0" {
                parts.push(format!("{} ({})", count, label));
            }
        }
    }
    parts.join(" + ")
}

fn cpu_model(cpuinfo: &str) -> String {
    cpuinfo
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split_once(':'))
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

fn memory_usage(meminfo: &str) -> String {
    let field = |key: &str| -> u64 {
        meminfo
            .lines()
            .find(|l| l.starts_with(key))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    let total_kb = field("MemTotal:");
    if total_kb == 0 {
        return String::new();
    }
    let avail_kb = field("MemAvailable:");
    let gb = |kb: u64| kb as f64 / 1024.0 / 1024.0;
    format!(
        "{:.1}GB / {:.1}GB",
        gb(total_kb.saturating_sub(avail_kb)),
        gb(total_kb)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cpu_model() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: AuthenticAMD\nmodel name\t: AMD Ryzen 7 5800X 8-Core Processor\n";
        assert_eq!(cpu_model(cpuinfo), "AMD Ryzen 7 5800X 8-Core Processor");
    }

    #[test]
    fn memory_usage_uses_available() {
        let meminfo = "MemTotal:       16777216 kB\nMemFree:         1000 kB\nMemAvailable:    8388608 kB\n";
        assert_eq!(memory_usage(meminfo), "8.0GB / 16.0GB");
        assert_eq!(memory_usage(""), "");
    }

    #[test]
    fn rows_skip_unknown_values() {
        let info = SystemInfo {
            os: "Arch Linux".into(),
            kernel: "6.9.1".into(),
            ..Default::default()
        };
        assert_eq!(info.rows(), vec![("OS", "Arch Linux"), ("Kernel", "6.9.1")]);
    }
}
