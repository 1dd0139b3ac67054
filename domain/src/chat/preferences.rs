//! User preferences for the chat widget

use serde::{Deserialize, Serialize};

/// Display theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// Process-wide user preferences, defaults `{light, autoScroll: true}`.
///
/// Both fields carry serde defaults so preference keys introduced in a later
/// release deserialize from older stored snapshots without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub auto_scroll: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            auto_scroll: true,
        }
    }
}

impl UserPreferences {
    /// Merge a partial update over the current values.
    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(auto_scroll) = patch.auto_scroll {
            self.auto_scroll = auto_scroll;
        }
    }
}

/// A partial preferences update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub auto_scroll: Option<bool>,
}

impl PreferencesPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Default::default()
        }
    }

    pub fn auto_scroll(auto_scroll: bool) -> Self {
        Self {
            auto_scroll: Some(auto_scroll),
            ..Default::default()
        }
    }
}
