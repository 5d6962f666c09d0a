use std::collections::HashMap;
use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

use crate::tape::{CellWidth, TapeConfig, DEFAULT_MEMORY_SIZE};

pub const CELL_BITS_ENV: &str = "BF_CELL_BITS";
pub const MEMORY_SIZE_ENV: &str = "BF_MEMORY_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported cell width {0} (only 8, 16 and 32 bits available)")]
    UnsupportedCellBits(u32),

    #[error("memory size must be a positive integer")]
    ZeroMemorySize,

    #[error("invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// One source of tape settings. Unset fields fall through to the next layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub cell_bits: Option<u32>,
    pub memory_size: Option<usize>,
}

impl ConfigLayer {
    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            cell_bits: self.cell_bits.or(fallback.cell_bits),
            memory_size: self.memory_size.or(fallback.memory_size),
        }
    }

    /// Validate the merged layer, applying defaults for anything still unset.
    pub fn resolve(self) -> Result<TapeConfig, ConfigError> {
        let cell_width = match self.cell_bits {
            Some(bits) => cell_width(bits)?,
            None => CellWidth::default(),
        };
        let memory_size = memory_size(self.memory_size.unwrap_or(DEFAULT_MEMORY_SIZE))?;
        Ok(TapeConfig { cell_width, memory_size })
    }
}

fn cell_width(bits: u32) -> Result<CellWidth, ConfigError> {
    CellWidth::from_bits(bits).ok_or(ConfigError::UnsupportedCellBits(bits))
}

fn memory_size(cells: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(cells).ok_or(ConfigError::ZeroMemorySize)
}

/// Resolve settings: flags -> environment -> config file -> defaults.
pub fn load(flags: ConfigLayer) -> Result<TapeConfig, ConfigError> {
    let env_layer = env_under(flags, |key| env::var(key).ok())?;
    let file_layer = load_file().unwrap_or_default();
    flags.or(env_layer).or(file_layer).resolve()
}

/// The environment layer beneath `flags`. Variables for settings the flags
/// already provide are not read, so a stale bad value cannot fail the run.
pub fn env_under<F>(flags: ConfigLayer, lookup: F) -> Result<ConfigLayer, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    from_vars(|key| {
        let overridden = match key {
            CELL_BITS_ENV => flags.cell_bits.is_some(),
            MEMORY_SIZE_ENV => flags.memory_size.is_some(),
            _ => false,
        };
        if overridden { None } else { lookup(key) }
    })
}

/// Read `BF_CELL_BITS` / `BF_MEMORY_SIZE` through `lookup`.
pub fn from_vars<F>(lookup: F) -> Result<ConfigLayer, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(ConfigLayer {
        cell_bits: lookup(CELL_BITS_ENV)
            .map(|v| parse_number(CELL_BITS_ENV, &v))
            .transpose()?,
        memory_size: lookup(MEMORY_SIZE_ENV)
            .map(|v| parse_number(MEMORY_SIZE_ENV, &v))
            .transpose()?,
    })
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Load the `[tape]` section of `bf.toml` from the XDG config home.
/// A missing file yields `None`; a malformed value is logged and skipped.
pub fn load_file() -> Option<ConfigLayer> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!(path = %path.display(), "loaded config file");
    Some(parse(&content, |key, err| {
        warn!(path = %path.display(), key, "ignoring config value: {err}");
    }))
}

/// Parse the small TOML subset `bf.toml` uses:
///
/// ```toml
/// [tape]
/// cell_bits = 16
/// memory_size = 65536
/// ```
///
/// Other sections and unknown keys are ignored. Values that are not numbers,
/// or that no tape could use, are passed to `on_error` and left unset.
pub fn parse<E>(content: &str, mut on_error: E) -> ConfigLayer
where
    E: FnMut(&str, ConfigError),
{
    // Very small hand-rolled parser: look for [tape] section and key = value pairs
    let mut in_tape = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_tape = line[1..line.len() - 1].trim() == "tape";
            continue;
        }
        if !in_tape { continue; }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].split('#').next().unwrap_or_default().trim();
            // Accept quoted or unquoted
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len() - 1].to_string()
            } else { val_raw.to_string() };
            map.insert(key, val);
        }
    }

    let mut layer = ConfigLayer::default();

    macro_rules! set {
        ($field:ident, $key:literal, $check:expr) => {
            if let Some(v) = map.get($key) {
                match parse_number($key, v).and_then(|n| $check(n).map(|_| n)) {
                    Ok(n) => layer.$field = Some(n),
                    Err(e) => on_error($key, e),
                }
            }
        };
    }

    set!(cell_bits, "cell_bits", cell_width);
    set!(memory_size, "memory_size", memory_size);

    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_errors(key: &str, err: ConfigError) {
        panic!("unexpected error for {key}: {err}");
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ConfigLayer::default().resolve().unwrap();
        assert_eq!(config, TapeConfig::default());
    }

    #[test]
    fn earlier_layers_win() {
        let flags = ConfigLayer { cell_bits: Some(16), memory_size: None };
        let env = ConfigLayer { cell_bits: Some(32), memory_size: Some(100) };
        let file = ConfigLayer { cell_bits: Some(8), memory_size: Some(5) };

        let config = flags.or(env).or(file).resolve().unwrap();
        assert_eq!(config.cell_width, CellWidth::Bits16);
        assert_eq!(config.memory_size.get(), 100);
    }

    #[test]
    fn rejects_unsupported_widths_and_zero_size() {
        let bad_bits = ConfigLayer { cell_bits: Some(12), memory_size: None };
        assert_eq!(bad_bits.resolve(), Err(ConfigError::UnsupportedCellBits(12)));

        let zero = ConfigLayer { cell_bits: None, memory_size: Some(0) };
        assert_eq!(zero.resolve(), Err(ConfigError::ZeroMemorySize));
    }

    #[test]
    fn reads_environment_through_lookup() {
        let layer = from_vars(|key| match key {
            CELL_BITS_ENV => Some("32".to_string()),
            MEMORY_SIZE_ENV => Some(" 64 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(layer, ConfigLayer { cell_bits: Some(32), memory_size: Some(64) });

        let err = from_vars(|key| (key == MEMORY_SIZE_ENV).then(|| "lots".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber { key: MEMORY_SIZE_ENV, value: "lots".to_string() }
        );
    }

    #[test]
    fn parses_tape_section_only() {
        let content = r#"
# bf settings
[colors]
cell_bits = 32

[tape]
cell_bits = 16          # wide cells
memory_size = "1024"
unknown = 1
"#;
        let layer = parse(content, no_errors);
        assert_eq!(layer, ConfigLayer { cell_bits: Some(16), memory_size: Some(1024) });
    }

    #[test]
    fn malformed_values_are_reported_and_skipped() {
        let mut seen = Vec::new();
        let layer = parse("[tape]\ncell_bits = wide\nmemory_size = 10\n", |key, _| {
            seen.push(key.to_string())
        });
        assert_eq!(layer, ConfigLayer { cell_bits: None, memory_size: Some(10) });
        assert_eq!(seen, ["cell_bits"]);
    }

    #[test]
    fn unusable_numbers_are_reported_and_skipped() {
        let mut seen = Vec::new();
        let layer = parse("[tape]\ncell_bits = 12\nmemory_size = 0\n", |key, err| {
            seen.push((key.to_string(), err))
        });
        assert_eq!(layer, ConfigLayer::default());
        assert_eq!(
            seen,
            [
                ("cell_bits".to_string(), ConfigError::UnsupportedCellBits(12)),
                ("memory_size".to_string(), ConfigError::ZeroMemorySize),
            ]
        );
    }

    #[test]
    fn flags_shadow_bad_environment_values() {
        let env = |key: &str| match key {
            CELL_BITS_ENV => Some("lots".to_string()),
            MEMORY_SIZE_ENV => Some("64".to_string()),
            _ => None,
        };
        let flags = ConfigLayer { cell_bits: Some(8), memory_size: None };
        let layer = env_under(flags, env).unwrap();
        assert_eq!(layer, ConfigLayer { cell_bits: None, memory_size: Some(64) });

        let err = env_under(ConfigLayer::default(), env).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber { key: CELL_BITS_ENV, value: "lots".to_string() }
        );
    }
}
