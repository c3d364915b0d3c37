use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patchable_struct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme '{0}', expected 'light' or 'dark'")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// Free-form key/value data shown by the showcase.
pub type ShowcaseData = BTreeMap<String, String>;

patchable_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct ShowcaseState / ShowcaseStatePatch {
        pub theme: Theme,
        pub data: Option<ShowcaseData>,
    }
}

/// Initial showcase state.
pub fn create_state() -> ShowcaseState {
    ShowcaseState::default()
}
