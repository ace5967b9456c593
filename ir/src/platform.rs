//! Platform classes
//!
//! A test's `supported_platforms` list is collapsed into a single class that
//! selects the translation table entry to use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of platform classes the refined output can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformClass {
    Windows,
    Linux,
}

impl PlatformClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlatformClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            other => Err(format!("Unknown platform class: {}", other)),
        }
    }
}

/// Strategy deciding a test's platform class from its platform list
pub type PlatformClassifier = fn(&[String]) -> PlatformClass;

/// Windows if listed, otherwise Linux.
///
/// macOS-only tests land in Linux.
pub fn windows_or_linux(platforms: &[String]) -> PlatformClass {
    if platforms.iter().any(|p| p == "windows") {
        PlatformClass::Windows
    } else {
        PlatformClass::Linux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platforms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_windows_preferred() {
        assert_eq!(windows_or_linux(&platforms(&["windows", "linux"])), PlatformClass::Windows);
        assert_eq!(windows_or_linux(&platforms(&["linux", "windows"])), PlatformClass::Windows);
    }

    #[test]
    fn test_linux() {
        assert_eq!(windows_or_linux(&platforms(&["linux"])), PlatformClass::Linux);
    }

    #[test]
    fn test_macos_collapses_to_linux() {
        assert_eq!(windows_or_linux(&platforms(&["macos"])), PlatformClass::Linux);
        assert_eq!(windows_or_linux(&[]), PlatformClass::Linux);
    }

    #[test]
    fn test_round_trip_names() {
        assert_eq!("Windows".parse::<PlatformClass>(), Ok(PlatformClass::Windows));
        assert_eq!(PlatformClass::Linux.to_string(), "linux");
        assert!("macos".parse::<PlatformClass>().is_err());
    }
}
