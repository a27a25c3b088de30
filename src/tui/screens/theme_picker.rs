use std::path::{Path, PathBuf};

use anyhow::Result;
use ratatui::{layout::Rect, Frame};

use super::{Menu, MenuKey};
use crate::config::Config;
use crate::logging;
use crate::tui::command::Command;
use crate::tui::message::Msg;
use crate::tui::screen::{Context, Hint, Screen};
use crate::tui::theme::{Palette, Theme, PRESETS};
use crate::tui::view::{render_menu, MenuItem};

pub struct ThemePicker {
    menu: Menu,
    /// Overrides the user config location.
    config_path: Option<PathBuf>,
}

impl ThemePicker {
    pub fn new(current: Palette) -> Self {
        let items = PRESETS
            .iter()
            .map(|p| {
                let item = MenuItem::new(p.title());
                if p.name == current.name {
                    item.with_detail("(current)")
                } else {
                    item
                }
            })
            .collect();
        let mut menu = Menu::new(items);
        menu.cursor = PRESETS.iter().position(|p| p.name == current.name).unwrap_or(0);
        Self {
            menu,
            config_path: None,
        }
    }

    #[cfg(test)]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    fn save(&self, palette: Palette) -> Result<()> {
        let path = match &self.config_path {
            Some(p) => p.clone(),
            None => Config::get_path()?,
        };
        save_theme(&path, palette)
    }

    fn apply(&self, palette: Palette) -> Command {
        logging::action(&format!("THEME: {}", palette.name));
        let toast = match self.save(palette) {
            Ok(()) => Command::toast(format!("Theme set to {}", palette.title()), false),
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "failed to save theme");
                Command::toast(format!("Theme applied but not saved: {}", e), true)
            }
        };
        Command::batch([Command::message(Msg::ThemeChanged(palette)), toast])
    }
}

/// Store `palette` in the config at `path`, keeping other settings.
fn save_theme(path: &Path, palette: Palette) -> Result<()> {
    let mut config = Config::load_from(path).ok().flatten().unwrap_or_default();
    config.theme = Some(palette.name.to_string());
    config.save_to(path)
}

impl Screen for ThemePicker {
    fn update(&mut self, msg: Msg, _ctx: &Context) -> Command {
        let Msg::Key(key) = msg else {
            return Command::none();
        };
        match self.menu.handle_key(&key) {
            MenuKey::Selected(i) => match PRESETS.get(i) {
                Some(p) => self.apply(*p),
                None => Command::none(),
            },
            _ => Command::none(),
        }
    }

    fn render(&self, f: &mut Frame<'_>, area: Rect, _ctx: &Context, theme: &Theme) {
        render_menu(f, area, "Choose a colour theme", &self.menu.items, self.menu.cursor, theme);
    }

    fn title(&self) -> String {
        "Theme".to_string()
    }

    fn short_help(&self) -> Vec<Hint> {
        vec![Hint::new("j/k", "navigate"), Hint::new("enter", "apply")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::press;
    use crate::tui::screens::testing::ctx;
    use crate::tui::theme::{CATPPUCCIN_MOCHA, TOKYO_NIGHT};
    use crossterm::event::KeyCode;
    use std::fs;

    #[test]
    fn cursor_starts_on_current_palette() {
        let picker = ThemePicker::new(TOKYO_NIGHT);
        assert_eq!(picker.menu.cursor, 2);
        assert_eq!(picker.menu.items[2].detail.as_deref(), Some("(current)"));
    }

    #[test]
    fn enter_changes_theme_saves_and_toasts() {
        let dir = std::env::temp_dir().join(format!("mypctools-theme-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let ctx = ctx();
        let mut picker = ThemePicker::new(Palette::default()).with_config_path(&path);
        let _ = picker.update(Msg::Key(press(KeyCode::Down)), &ctx);
        match picker.update(Msg::Key(press(KeyCode::Enter)), &ctx) {
            Command::Batch(cmds) => {
                assert!(matches!(cmds[0], Command::Message(Msg::ThemeChanged(p)) if p == CATPPUCCIN_MOCHA));
                assert!(matches!(
                    cmds[1],
                    Command::Message(Msg::Toast { ref text, is_error: false }) if text == "Theme set to Catppuccin Mocha"
                ));
            }
            other => panic!("expected batch, got {:?}", other),
        }

        let saved = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(saved.theme.as_deref(), Some("catppuccin"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unwritable_config_is_an_error_toast() {
        let path = std::env::temp_dir()
            .join(format!("mypctools-missing-{}", std::process::id()))
            .join("nested")
            .join("config.json");
        let picker = ThemePicker::new(Palette::default()).with_config_path(&path);
        match picker.apply(TOKYO_NIGHT) {
            Command::Batch(cmds) => {
                assert!(matches!(cmds[0], Command::Message(Msg::ThemeChanged(_))));
                assert!(matches!(cmds[1], Command::Message(Msg::Toast { is_error: true, .. })));
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }
}
