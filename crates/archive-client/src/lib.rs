//! Game archive access.
//!
//! [`HttpArchiveFetcher`] reads the archive API's JSON documents; [`TimedSearch`] walks an
//! archive index newest page first looking for one game, bounded by a wall-clock budget.

pub mod error;
pub mod fetch;
pub mod model;
pub mod search;

pub use error::{FetchCause, FetchError};
pub use fetch::{ArchiveFetcher, ArchiveFetcherExt, HttpArchiveFetcher};
pub use model::{ArchiveEntry, ArchiveIndex, ArchivePage};
pub use search::{index_url, SearchBudget, SearchOutcome, TimedSearch};
