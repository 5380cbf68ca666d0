//! File synchronisation between the working tree and profile storage.
//!
//! - **[`patterns`]**: parse `.sync` rules and resolve them to concrete files
//! - **[`rules_file`]**: persist the rule file
//! - **[`engine`]**: save, restore and clear batches
pub mod engine;
pub mod path;
pub mod patterns;
pub mod report;
pub mod rules_file;

pub use engine::{SyncEngine, stash_timestamp};
pub use path::{is_valid_path, to_local_path};
pub use patterns::{
    DEFAULT_TEMPLATE, InvalidPattern, MatchResult, SyncPattern, UnreadablePath, match_files,
};
pub use report::{FileOutcome, FileResult, SyncReport};
pub use rules_file::SyncFileStore;
