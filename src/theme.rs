use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse theme file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub pane_bg: Color,
    pub panel_bg: Color,
    pub panel_done_bg: Color,
    pub status_bg: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub accent_fg: Color,
    pub accent_bg: Color,
    pub success_fg: Color,
    pub track_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pane_bg: Color::Rgb(44, 44, 44),
            panel_bg: Color::Rgb(54, 54, 54),
            panel_done_bg: Color::Rgb(38, 62, 44),
            status_bg: Color::Rgb(36, 36, 36),
            text_fg: Color::Rgb(225, 225, 225),
            muted_fg: Color::Rgb(150, 150, 150),
            accent_fg: Color::Rgb(110, 170, 240),
            accent_bg: Color::Rgb(36, 52, 78),
            success_fg: Color::Rgb(90, 200, 120),
            track_bg: Color::Rgb(70, 70, 70),
        }
    }
}

impl Theme {
    /// Reads the theme file; `Ok(None)` when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ThemeError> {
        let path_ref = path.as_ref();
        let contents = match fs::read_to_string(path_ref) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ThemeError::Io {
                    path: path_ref.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&contents)
            .map(Some)
            .map_err(|source| ThemeError::Parse {
                path: path_ref.to_path_buf(),
                source,
            })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeToml = toml::from_str(s)?;
        let colors = cfg.colors;
        Ok(Self {
            pane_bg: colors.pane_bg.to_color(),
            panel_bg: colors.panel_bg.to_color(),
            panel_done_bg: colors.panel_done_bg.to_color(),
            status_bg: colors.status_bg.to_color(),
            text_fg: colors.text_fg.to_color(),
            muted_fg: colors.muted_fg.to_color(),
            accent_fg: colors.accent_fg.to_color(),
            accent_bg: colors.accent_bg.to_color(),
            success_fg: colors.success_fg.to_color(),
            track_bg: colors.track_bg.to_color(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToml {
    colors: ThemeColorsToml,
}

#[derive(Debug, Deserialize)]
struct ThemeColorsToml {
    pane_bg: RgbToml,
    panel_bg: RgbToml,
    panel_done_bg: RgbToml,
    status_bg: RgbToml,
    text_fg: RgbToml,
    muted_fg: RgbToml,
    accent_fg: RgbToml,
    accent_bg: RgbToml,
    success_fg: RgbToml,
    track_bg: RgbToml,
}

#[derive(Debug, Deserialize)]
struct RgbToml {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbToml {
    fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}
