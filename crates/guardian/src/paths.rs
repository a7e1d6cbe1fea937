//! Default snapshot location per platform.
//!
//! | Platform | Path under the home directory |
//! |----------|-------------------------------|
//! | Linux    | `geth/guardian/bloom_filter.gob` |
//! | macOS    | `Library/Story/geth/guardian/bloom_filter.gob` |
//!
//! Any other OS is an error; there is no fallback location.

use std::path::{Path, PathBuf};

use crate::error::GuardianError;

/// Snapshot file name inside the platform directory
pub const FILTER_FILE_NAME: &str = "bloom_filter.gob";

/// Platforms with a default snapshot location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
}

impl Platform {
    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Self, GuardianError> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            other => Err(GuardianError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn current() -> Result<Self, GuardianError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Directory holding the snapshot, relative to the home directory.
    pub fn relative_dir(self) -> &'static str {
        match self {
            Self::Linux => "geth/guardian",
            Self::MacOs => "Library/Story/geth/guardian",
        }
    }

    pub fn filter_path_in(self, home: &Path) -> PathBuf {
        home.join(self.relative_dir()).join(FILTER_FILE_NAME)
    }
}

/// `<home>/<platform dir>/bloom_filter.gob` for the running platform.
pub fn default_filter_path() -> Result<PathBuf, GuardianError> {
    let platform = Platform::current()?;
    let home = dirs::home_dir().ok_or(GuardianError::HomeDirectoryNotFound)?;
    Ok(platform.filter_path_in(&home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_table() {
        let home = Path::new("/home/op");
        assert_eq!(
            Platform::Linux.filter_path_in(home),
            PathBuf::from("/home/op/geth/guardian/bloom_filter.gob")
        );
        assert_eq!(
            Platform::MacOs.filter_path_in(home),
            PathBuf::from("/home/op/Library/Story/geth/guardian/bloom_filter.gob")
        );
    }

    #[test]
    fn test_unsupported_platform() {
        for os in ["windows", "freebsd", ""] {
            assert!(matches!(
                Platform::from_os(os),
                Err(GuardianError::UnsupportedPlatform(_))
            ));
        }
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_default_path_on_linux() {
        let path = default_filter_path().unwrap();
        assert!(path.ends_with("geth/guardian/bloom_filter.gob"));
        assert!(path.is_absolute());
    }
}
