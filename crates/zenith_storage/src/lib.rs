//! Filesystem record storage for the Zenith NPC generator.
//!
//! Records are written as pretty-printed JSON files in a single directory that
//! this crate owns. Files are written once and never modified.
//!
//! ```text
//! citizens/
//! ├── 20250101_120000_Ilsa_Varn.json          (individual record)
//! ├── 20250101_120000_Ilsa_Varn_1.json        (same name, same second)
//! └── collection_20250101_120005_batch.json   (batch of records)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod naming;

pub use filesystem::FileSystemRecordStorage;
pub use naming::{FileClass, safe_component};
