//! Static catalog of installable applications and how to install them per
//! distro family.

use std::collections::HashSet;

use crate::distro::DistroFamily;
use crate::process::{command_exists, output_of, succeeds, ProcessSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ai,
    Browsers,
    Gaming,
    Media,
    DevTools,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ai,
        Category::Browsers,
        Category::Gaming,
        Category::Media,
        Category::DevTools,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Ai => "AI Tools",
            Category::Browsers => "Browsers",
            Category::Gaming => "Gaming",
            Category::Media => "Media",
            Category::DevTools => "Dev Tools",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub apt: Option<&'static str>,
    pub pacman: Option<&'static str>,
    pub dnf: Option<&'static str>,
    pub flatpak: Option<&'static str>,
    /// Binary whose presence on PATH means "installed".
    pub binary: Option<&'static str>,
    /// Shell snippet used when no package source fits.
    pub fallback: Option<&'static str>,
}

impl App {
    pub const fn new(id: &'static str, name: &'static str, category: Category) -> Self {
        Self {
            id,
            name,
            category,
            apt: None,
            pacman: None,
            dnf: None,
            flatpak: None,
            binary: None,
            fallback: None,
        }
    }

    pub const fn apt(mut self, pkg: &'static str) -> Self {
        self.apt = Some(pkg);
        self
    }

    pub const fn pacman(mut self, pkg: &'static str) -> Self {
        self.pacman = Some(pkg);
        self
    }

    pub const fn dnf(mut self, pkg: &'static str) -> Self {
        self.dnf = Some(pkg);
        self
    }

    /// Same package name on apt, pacman and dnf.
    pub const fn native(self, pkg: &'static str) -> Self {
        self.apt(pkg).pacman(pkg).dnf(pkg)
    }

    pub const fn flatpak(mut self, id: &'static str) -> Self {
        self.flatpak = Some(id);
        self
    }

    pub const fn binary(mut self, bin: &'static str) -> Self {
        self.binary = Some(bin);
        self
    }

    pub const fn fallback(mut self, script: &'static str) -> Self {
        self.fallback = Some(script);
        self
    }
}

static APPS: &[App] = &[
    App::new("opencode", "OpenCode", Category::Ai)
        .binary("opencode")
        .fallback("curl -fsSL https://opencode.ai/install | bash"),
    App::new("claude-code", "Claude Code", Category::Ai)
        .binary("claude")
        .fallback("curl -fsSL https://claude.ai/install.sh | bash"),
    App::new("ollama", "Ollama", Category::Ai)
        .binary("ollama")
        .fallback("curl -fsSL https://ollama.com/install.sh | sh"),
    App::new("brave", "Brave", Category::Browsers)
        .pacman("brave-bin")
        .flatpak("com.brave.Browser")
        .binary("brave")
        .fallback("curl -fsS https://dl.brave.com/install.sh | bash"),
    App::new("firefox", "Firefox", Category::Browsers)
        .native("firefox")
        .flatpak("org.mozilla.firefox")
        .binary("firefox"),
    App::new("chromium", "Chromium", Category::Browsers)
        .native("chromium")
        .flatpak("org.chromium.Chromium")
        .binary("chromium"),
    App::new("steam", "Steam", Category::Gaming)
        .native("steam")
        .flatpak("com.valvesoftware.Steam")
        .binary("steam"),
    App::new("lutris", "Lutris", Category::Gaming)
        .native("lutris")
        .flatpak("net.lutris.Lutris")
        .binary("lutris"),
    App::new("protonup-qt", "ProtonUp-Qt", Category::Gaming)
        .flatpak("net.davidotek.pupgui2")
        .binary("protonup-qt"),
    App::new("discord", "Discord", Category::Media)
        .pacman("discord")
        .flatpak("com.discordapp.Discord")
        .binary("discord"),
    App::new("vlc", "VLC", Category::Media)
        .native("vlc")
        .flatpak("org.videolan.VLC")
        .binary("vlc"),
    App::new("mpv", "MPV", Category::Media)
        .native("mpv")
        .flatpak("io.mpv.Mpv")
        .binary("mpv"),
    App::new("docker", "Docker", Category::DevTools)
        .apt("docker.io")
        .pacman("docker")
        .dnf("docker")
        .binary("docker"),
    App::new("lazygit", "Lazygit", Category::DevTools)
        .pacman("lazygit")
        .binary("lazygit")
        .fallback(
            "VERSION=$(curl -s https://api.github.com/repos/jesseduffield/lazygit/releases/latest | grep -Po '\"tag_name\": \"v\\K[^\"]*') \
             && ARCH=$(uname -m | sed 's/aarch64/arm64/') && mkdir -p ~/.local/bin && TMP=$(mktemp -d) \
             && curl -fsSL -o \"$TMP/lazygit.tar.gz\" \"https://github.com/jesseduffield/lazygit/releases/download/v${VERSION}/lazygit_${VERSION}_Linux_${ARCH}.tar.gz\" \
             && tar -xzf \"$TMP/lazygit.tar.gz\" -C \"$TMP\" && mv \"$TMP/lazygit\" ~/.local/bin/ && rm -rf \"$TMP\"",
        ),
    App::new("vscode", "VS Code", Category::DevTools)
        .pacman("code")
        .flatpak("com.visualstudio.code")
        .binary("code"),
    App::new("python", "Python", Category::DevTools)
        .apt("python3")
        .pacman("python")
        .dnf("python3")
        .binary("python3"),
];

#[cfg(test)]
pub fn all() -> &'static [App] {
    APPS
}

pub fn by_category(category: Category) -> Vec<App> {
    APPS.iter()
        .filter(|a| a.category == category)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Pacman,
    Apt,
    Dnf,
    Flatpak,
    Fallback,
}

impl InstallMethod {
    pub fn describe(method: Option<InstallMethod>) -> &'static str {
        match method {
            Some(InstallMethod::Pacman) => "via pacman",
            Some(InstallMethod::Apt) => "via apt",
            Some(InstallMethod::Dnf) => "via dnf",
            Some(InstallMethod::Flatpak) => "via Flatpak",
            Some(InstallMethod::Fallback) => "via custom installer",
            None => "no method available",
        }
    }
}

/// Pick the install command: native package manager, then Flatpak, then the
/// app's fallback script.
pub fn install_command_with(
    app: &App,
    family: DistroFamily,
    flatpak_available: bool,
) -> Option<(String, InstallMethod)> {
    let native = match family {
        DistroFamily::Arch => app
            .pacman
            .map(|p| (format!("sudo pacman -S --noconfirm --needed {}", p), InstallMethod::Pacman)),
        DistroFamily::Debian => app
            .apt
            .map(|p| (format!("sudo apt install -y {}", p), InstallMethod::Apt)),
        DistroFamily::Fedora => app
            .dnf
            .or(app.apt)
            .map(|p| (format!("sudo dnf install -y {}", p), InstallMethod::Dnf)),
        DistroFamily::Unknown => None,
    };
    if native.is_some() {
        return native;
    }

    if flatpak_available {
        if let Some(id) = app.flatpak {
            return Some((format!("flatpak install -y flathub {}", id), InstallMethod::Flatpak));
        }
    }

    app.fallback
        .map(|script| (script.to_string(), InstallMethod::Fallback))
}

pub fn install_method(app: &App, family: DistroFamily) -> Option<InstallMethod> {
    install_command_with(app, family, has_flatpak()).map(|(_, m)| m)
}

/// The process to hand the terminal to, or `None` when nothing can install
/// this app here.
pub fn install_spec(app: &App, family: DistroFamily) -> Option<ProcessSpec> {
    install_command_with(app, family, has_flatpak()).map(|(cmd, _)| ProcessSpec::shell(cmd))
}

pub fn has_flatpak() -> bool {
    command_exists("flatpak")
}

/// Blocking: runs package queries. Call from a background task.
pub fn installed_ids(apps: &[App], family: DistroFamily) -> HashSet<&'static str> {
    let flatpaks = installed_flatpaks();
    apps.iter()
        .filter(|a| is_installed(a, family, &flatpaks))
        .map(|a| a.id)
        .collect()
}

fn is_installed(app: &App, family: DistroFamily, flatpaks: &HashSet<String>) -> bool {
    if app.binary.is_some_and(command_exists) {
        return true;
    }

    let native = match family {
        DistroFamily::Arch => app.pacman.is_some_and(|p| succeeds("pacman", &["-Q", p])),
        DistroFamily::Debian => app.apt.is_some_and(|p| succeeds("dpkg", &["-s", p])),
        DistroFamily::Fedora => app.dnf.is_some_and(|p| succeeds("rpm", &["-q", p])),
        DistroFamily::Unknown => false,
    };
    if native {
        return true;
    }

    app.flatpak.is_some_and(|id| flatpaks.contains(id))
}

fn installed_flatpaks() -> HashSet<String> {
    if !has_flatpak() {
        return HashSet::new();
    }
    output_of("flatpak", &["list", "--app", "--columns=application"])
        .map(|out| {
            out.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_package_manager_comes_first() {
        let firefox = APPS.iter().find(|a| a.id == "firefox").unwrap();
        let (cmd, method) = install_command_with(firefox, DistroFamily::Arch, true).unwrap();
        assert_eq!(method, InstallMethod::Pacman);
        assert_eq!(cmd, "sudo pacman -S --noconfirm --needed firefox");
    }

    #[test]
    fn flatpak_then_fallback() {
        let brave = APPS.iter().find(|a| a.id == "brave").unwrap();
        let (_, method) = install_command_with(brave, DistroFamily::Debian, true).unwrap();
        assert_eq!(method, InstallMethod::Flatpak);

        let (cmd, method) = install_command_with(brave, DistroFamily::Debian, false).unwrap();
        assert_eq!(method, InstallMethod::Fallback);
        assert!(cmd.contains("dl.brave.com"));
    }

    #[test]
    fn fedora_falls_back_to_apt_name() {
        let app = App::new("x", "X", Category::DevTools).apt("xtool");
        let (cmd, method) = install_command_with(&app, DistroFamily::Fedora, false).unwrap();
        assert_eq!(method, InstallMethod::Dnf);
        assert_eq!(cmd, "sudo dnf install -y xtool");
    }

    #[test]
    fn nothing_available_is_none() {
        let protonup = APPS.iter().find(|a| a.id == "protonup-qt").unwrap();
        assert!(install_command_with(protonup, DistroFamily::Arch, false).is_none());
        assert_eq!(InstallMethod::describe(None), "no method available");
    }

    #[test]
    fn every_category_has_apps() {
        for category in Category::ALL {
            assert!(!by_category(category).is_empty(), "{:?} is empty", category);
        }
    }
}
