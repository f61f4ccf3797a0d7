//! vaulttool - keep plaintext secret files and encrypted vault copies in sync.
//!
//! Plaintext files are the working form used by developers; each one has a
//! `<name><suffix>` vault copy that is safe to commit. The engine decides per
//! file whether the vault is missing, stale or current and runs the matching
//! one-way transformation.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── encrypt       # Encrypt changed sources
//! │   ├── refresh       # Restore sources from vaults
//! │   ├── remove        # Delete vault files
//! │   ├── check         # check-ignore and status
//! │   ├── sync          # encrypt + refresh in one go
//! │   ├── keygen        # age key generation
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # .vaulttool.toml loading and validation
//!     ├── checksum      # SHA-256 of plaintext files
//!     ├── codec         # Two-line vault file format
//!     ├── cipher/       # Encryption backends
//!     │   ├── mod       # Cipher trait
//!     │   ├── openssl   # `openssl enc` subprocess
//!     │   └── age       # Native age encryption
//!     ├── discovery     # Include/exclude file walking
//!     ├── ignore        # .gitignore maintenance and checks
//!     ├── domain        # Reports and per-file state
//!     └── engine/       # Synchronization engine
//! ```
//!
//! # Vault format
//!
//! ```text
//! <SHA-256 hex of the plaintext>
//! <base64 ciphertext>
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::{Backend, Config, Options};
pub use crate::core::engine::Engine;
pub use crate::core::ignore::{GitCheckIgnore, IgnoreCheck, IgnoreList};
pub use crate::error::{Error, Result};
