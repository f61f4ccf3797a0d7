//! Constants used throughout vaulttool.
//!
//! Centralizes magic strings and default option values.

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = ".vaulttool.toml";

/// Per-user configuration, relative to HOME.
pub const USER_CONFIG_FILE: &str = ".vaulttool/.vaulttool.toml";

/// System-wide configuration.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/vaulttool/config.toml";

/// Optional table wrapping the configuration (`[vaulttool]`).
pub const CONFIG_TABLE: &str = "vaulttool";

/// Default vault file suffix.
pub const DEFAULT_SUFFIX: &str = ".vault";

/// Default OpenSSL cipher name.
pub const DEFAULT_ALGORITHM: &str = "aes-256-cbc";

/// Default OpenSSL executable.
pub const DEFAULT_OPENSSL: &str = "openssl";

/// Ignore-list file maintained in the working root.
pub const IGNORE_FILE: &str = ".gitignore";

/// Version-control marker directory.
pub const VCS_DIR: &str = ".git";

/// Environment variable marking a pre-commit hook or CI run.
pub const PRECOMMIT_ENV: &str = "VAULTTOOL_PRECOMMIT";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VAULTTOOL_LOG";

/// Read size used when hashing files.
pub const CHECKSUM_CHUNK: usize = 8192;
