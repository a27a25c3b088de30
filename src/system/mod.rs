//! System maintenance operations: full update, package cleanup, user cache
//! clearing and desktop notifications.

pub mod info;
pub mod services;

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result};

use crate::distro::DistroFamily;
use crate::process::{command_exists, ProcessSpec};

const ARCH_CLEANUP: &str = r#"
orphans=$(pacman -Qtdq 2>/dev/null)
if [ -n "$orphans" ]; then
    echo "$orphans" | sudo pacman -Rns --noconfirm -
fi
if command -v paccache >/dev/null 2>&1; then
    sudo paccache -rk2
else
    sudo pacman -Sc --noconfirm
fi
"#;

pub fn update_spec(family: DistroFamily) -> Option<ProcessSpec> {
    match family {
        DistroFamily::Debian => Some(
            ProcessSpec::shell("sudo -E apt update && sudo -E apt upgrade -y")
                .env("DEBIAN_FRONTEND", "noninteractive"),
        ),
        DistroFamily::Arch => Some(ProcessSpec::new("sudo").args(["pacman", "-Syu", "--noconfirm"])),
        DistroFamily::Fedora => Some(ProcessSpec::new("sudo").args(["dnf", "upgrade", "-y"])),
        DistroFamily::Unknown => None,
    }
}

pub fn cleanup_spec(family: DistroFamily) -> Option<ProcessSpec> {
    match family {
        DistroFamily::Debian => Some(ProcessSpec::shell(
            "sudo apt autoremove -y && sudo apt autoclean && sudo apt clean",
        )),
        DistroFamily::Arch => Some(ProcessSpec::shell(ARCH_CLEANUP)),
        DistroFamily::Fedora => Some(ProcessSpec::shell("sudo dnf autoremove -y && sudo dnf clean all")),
        DistroFamily::Unknown => None,
    }
}

/// Remove thumbnails and the Trash under the user's home directory.
pub fn clear_user_caches() -> Result<()> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    clear_caches_under(&home)
}

pub fn clear_caches_under(home: &Path) -> Result<()> {
    let targets = [
        home.join(".cache").join("thumbnails"),
        home.join(".local").join("share").join("Trash"),
    ];

    let mut first_err = None;
    for dir in &targets {
        match fs::remove_dir_all(dir) {
            Ok(()) => tracing::debug!(path = %dir.display(), "removed cache dir"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "failed to remove cache dir");
                if first_err.is_none() {
                    first_err = Some((dir.clone(), e));
                }
            }
        }
    }

    match first_err {
        Some((dir, e)) => Err(e).with_context(|| format!("Failed to remove {}", dir.display())),
        None => Ok(()),
    }
}

/// Fire-and-forget desktop notification. Skipped without a graphical session.
pub fn notify(title: &str, body: &str) {
    let graphical = std::env::var_os("DISPLAY").is_some()
        || std::env::var_os("WAYLAND_DISPLAY").is_some();
    if !graphical || !command_exists("notify-send") {
        return;
    }

    let title = title.to_string();
    let body = body.to_string();
    thread::spawn(move || {
        let _ = Command::new("notify-send")
            .args([&title, &body])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_distro_has_no_commands() {
        assert!(update_spec(DistroFamily::Unknown).is_none());
        assert!(cleanup_spec(DistroFamily::Unknown).is_none());
    }

    #[test]
    fn arch_update_runs_pacman_directly() {
        let spec = update_spec(DistroFamily::Arch).unwrap();
        assert_eq!(spec.to_string(), "sudo pacman -Syu --noconfirm");
    }

    #[test]
    fn clearing_missing_caches_is_ok() {
        let home = std::env::temp_dir().join(format!("mypctools-caches-{}", std::process::id()));
        let thumbs = home.join(".cache").join("thumbnails");
        fs::create_dir_all(&thumbs).unwrap();
        fs::write(thumbs.join("a.png"), b"x").unwrap();

        clear_caches_under(&home).unwrap();
        assert!(!thumbs.exists());
        // Second pass: both targets are gone now.
        clear_caches_under(&home).unwrap();

        fs::remove_dir_all(&home).unwrap();
    }
}
