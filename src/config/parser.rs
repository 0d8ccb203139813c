//! Generic TOML configuration parsing.
//!
//! Works with any `DeserializeOwned` type and attaches the file path to both
//! read and parse failures:
//!
//! ```text
//! Failed to parse config file: /path/to/resolver.toml
//! Caused by:
//!     invalid type: string "five", expected usize
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into `T`.
///
/// # Examples
///
/// ```rust,no_run
/// use content_resolution::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Limits {
///     max_depth: usize,
/// }
///
/// # fn example() -> anyhow::Result<()> {
/// let limits: Limits = parse_config(Path::new("limits.toml"))?;
/// println!("max depth: {}", limits.max_depth);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does
/// not match the shape of `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
