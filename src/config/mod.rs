//! Device configuration
//!
//! Parses the lock's configuration file: an INI-style `[Device]` section
//! carrying the shared secret and optional tuning values.
//!
//! ```text
//! [Device]
//! SecretKey = c2VjcmV0IGtleSBieXRlcw==
//! StaleAfter = 60
//! ```

use std::path::Path;

use crate::codec;
use crate::error::ConfigError;
use crate::radio::STALE_AFTER_SECS;

/// The device's shared signing secret
///
/// Opaque byte sequence, process-wide, loaded at startup and replaceable
/// only through the external provisioning channel. Never derived from
/// token contents.
#[derive(Clone)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// key material stays out of logs
impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey({} bytes)", self.0.len())
    }
}

/// Complete lock configuration
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Shared signing secret
    pub secret_key: SecretKey,
    /// Seconds without an accepted radio frame before the time estimate
    /// is reported as degraded
    pub stale_after: u64,
}

impl LockConfig {
    /// Parse a configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// Parse a configuration from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut secret_key: Option<SecretKey> = None;
        let mut stale_after = STALE_AFTER_SECS;
        let mut in_device_section = false;

        for (line_num, line) in content.lines().enumerate() {
            let line_num = line_num + 1; // 1-indexed
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.eq_ignore_ascii_case("[device]") {
                in_device_section = true;
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::ParseError {
                    line: line_num,
                    message: format!("Expected 'key = value', got: {}", line),
                });
            };

            if !in_device_section {
                return Err(ConfigError::ParseError {
                    line: line_num,
                    message: "Configuration value outside of any section".to_string(),
                });
            }

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "secretkey" => {
                    let bytes = codec::decode(value).map_err(|_| ConfigError::InvalidKey {
                        field: "SecretKey".to_string(),
                    })?;
                    if bytes.is_empty() {
                        return Err(ConfigError::InvalidKey {
                            field: "SecretKey".to_string(),
                        });
                    }
                    secret_key = Some(SecretKey::new(bytes));
                }
                "staleafter" => {
                    stale_after = value.parse().map_err(|_| ConfigError::ParseError {
                        line: line_num,
                        message: format!("Invalid StaleAfter: {}", value),
                    })?;
                }
                _ => {
                    // Unknown key, ignore (forward compatibility)
                    tracing::debug!("Unknown device key: {}", key);
                }
            }
        }

        let secret_key = secret_key.ok_or(ConfigError::MissingField {
            field: "SecretKey".to_string(),
        })?;

        Ok(LockConfig {
            secret_key,
            stale_after,
        })
    }
}
