/// Page view types
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CadenceError;

/// Which page the user is looking at
///
/// The view decides the active playlist: `Home` navigates the whole catalog,
/// `Liked` only liked tracks, `Search` leaves the active playlist alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// All songs
    #[default]
    Home,
    /// Liked songs only
    Liked,
    /// Search results
    Search,
}

impl View {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Liked => "liked",
            Self::Search => "search",
        }
    }
}

impl FromStr for View {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "liked" => Ok(Self::Liked),
            "search" => Ok(Self::Search),
            _ => Err(CadenceError::UnknownView(s.to_string())),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        for view in [View::Home, View::Liked, View::Search] {
            assert_eq!(view.as_str().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "library".parse::<View>().unwrap_err();
        assert!(matches!(err, CadenceError::UnknownView(ref name) if name == "library"));
        assert_eq!(err.to_string(), "Unknown view 'library' (home, liked, search)");
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&View::Liked).unwrap(), "\"liked\"");
    }
}
