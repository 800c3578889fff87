//! Storage engine.
//!
//! - **codec**: blob framing and the plaintext decoding chain
//! - **entries** / **index**: the two kinds of blob in a journal directory
//! - **recovery**: deadline-bounded index rebuild
//! - **driver**: `FileJournal`, the lock-holding façade over all of the above
//! - **memory**: in-memory `JournalStore` for tests

pub mod codec;
pub mod driver;
pub mod entries;
pub mod index;
pub mod memory;
pub mod recovery;
pub mod traits;
pub mod types;

pub use driver::FileJournal;
pub use entries::{validate_id, EntryStore, BLOB_EXTENSION};
pub use index::{IndexStore, INDEX_FILE, LEGACY_INDEX_MARKER};
pub use memory::InMemoryJournal;
pub use recovery::{RecoveryFailure, RecoveryOutcome, DEFAULT_RECOVERY_DEADLINE};
pub use traits::JournalStore;
pub use types::{Entry, Index};
