//! Anchored text patching for a single source file.
//!
//! A run loads the whole target into a [`SourceBuffer`], writes a verified
//! backup next to it, folds an ordered list of [`PatchOperation`]s over the
//! buffer and writes the result back. Each operation replaces every exact
//! occurrence of its anchor; an operation whose anchor is missing is skipped
//! without affecting the others. The outcome of every step is returned in a
//! [`PatchReport`].
//!
//! ```no_run
//! use anchorpatch_core::{EngineOptions, PatchEngine, PatchOperation};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), anchorpatch_core::PatchError> {
//! let operations = vec![PatchOperation::insert_after(
//!     "register plugin",
//!     "plugins: [",
//!     "\n    myPlugin(),",
//! )];
//! let report = PatchEngine::new(EngineOptions::default())
//!     .run(Path::new("vite.config.js"), &operations)
//!     .await?;
//! println!("{} applied, {} skipped", report.applied(), report.skipped());
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod diff;
pub mod engine;
pub mod error;
pub mod operation;
pub mod outcome;
pub mod recipes;

pub use buffer::SourceBuffer;
pub use diff::{DiffBundle, DiffOptions, compute_diff};
pub use engine::{DEFAULT_BACKUP_SUFFIX, EngineOptions, PatchEngine, backup_path_for};
pub use error::PatchError;
pub use operation::{OperationKind, PatchOperation, RerunPolicy, Step, apply_all};
pub use outcome::{OperationRecord, PatchOutcome, PatchReport, SkipReason};
pub use recipes::Recipe;
