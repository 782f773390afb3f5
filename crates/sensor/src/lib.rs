//! Sensor side: serial line protocol, reading providers and the event feed.

pub mod feed;
pub mod provider;
pub mod readouts;

pub use feed::{spawn_event_reader, spawn_feed, spawn_polling};
pub use provider::{MockProvider, ReadoutProvider, SerialProvider};
pub use readouts::{parse_line, LineError};
