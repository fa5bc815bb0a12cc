//! Remote-context command channel.
//!
//! Every read or mutation of a browser tab's document goes through a [`Snippet`]: a typed
//! description of one operation with a declared result shape. The channel turns snippets
//! into DevTools `Runtime.evaluate` calls, encoding every caller-supplied string as a JSON
//! literal so page content never becomes executable source.

pub mod channel;
pub mod chromium;
pub mod commands;
pub mod error;
pub mod metrics;
pub mod registry;

pub use channel::{ChannelExt, CommandChannel, TabInfo};
pub use chromium::ChromiumChannel;
pub use commands::{ResultShape, Snippet, SnippetResult};
pub use error::ChannelError;
pub use registry::TabRegistry;
pub use relay_core_types::{ContextStatus, TabId};
