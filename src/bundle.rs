use std::path::{Path, PathBuf};

use crate::process::ProcessSpec;

/// A script bundle shipped under `scripts/<id>/` in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Relative to `$HOME`; its existence means the bundle is installed.
    pub marker: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleAction {
    Install,
    Uninstall,
}

impl BundleAction {
    pub fn script_name(self) -> &'static str {
        match self {
            BundleAction::Install => "install.sh",
            BundleAction::Uninstall => "uninstall.sh",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            BundleAction::Install => "Install",
            BundleAction::Uninstall => "Uninstall",
        }
    }
}

static BUNDLES: &[Bundle] = &[
    Bundle {
        id: "litebash",
        name: "litebash",
        description: "Speed-focused bash with modern CLI tools",
        marker: ".local/share/litebash/litebash.sh",
    },
    Bundle {
        id: "litezsh",
        name: "litezsh",
        description: "Zsh with syntax highlighting and autosuggestions",
        marker: ".local/share/litezsh/litezsh.zsh",
    },
    Bundle {
        id: "alacritty",
        name: "alacritty",
        description: "Alacritty terminal config",
        marker: ".config/alacritty/alacritty.toml",
    },
    Bundle {
        id: "kitty",
        name: "kitty",
        description: "Kitty terminal config",
        marker: ".config/kitty/kitty.conf",
    },
    Bundle {
        id: "fastfetch",
        name: "fastfetch",
        description: "Custom fastfetch with tree-style layout",
        marker: ".config/fastfetch/config.jsonc",
    },
    Bundle {
        id: "spicetify",
        name: "spicetify",
        description: "Spotify theming with StarryNight",
        marker: ".spicetify/spicetify",
    },
];

pub fn all() -> &'static [Bundle] {
    BUNDLES
}

impl Bundle {
    pub fn is_installed(&self) -> bool {
        dirs::home_dir()
            .map(|home| self.is_installed_under(&home))
            .unwrap_or(false)
    }

    pub fn is_installed_under(&self, home: &Path) -> bool {
        home.join(self.marker).exists()
    }

    pub fn script_path(&self, root: &Path, action: BundleAction) -> PathBuf {
        root.join("scripts").join(self.id).join(action.script_name())
    }

    /// `bash scripts/<id>/<action>.sh`, run from the repository root.
    pub fn script_spec(&self, root: &Path, action: BundleAction) -> ProcessSpec {
        ProcessSpec::new("bash")
            .arg(self.script_path(root, action).to_string_lossy())
            .current_dir(root)
    }
}
