//! Domain types.

mod report;
mod state;

pub use report::{
    EncryptAction, EncryptReport, FileError, IgnoreReport, RefreshReport, RemoveReport,
    VaultChange,
};
pub use state::FileState;
