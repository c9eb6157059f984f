//! Event stream dispatch.
//!
//! A [`StreamKind`] names a live NDJSON endpoint. Subscribing to it spawns a
//! task that reads the body line by line, skips keep-alives, decodes each line
//! into a [`Record`] according to the stream's [`DecodePolicy`] and
//! [`Shape`], and passes it to the subscriber's handler.

mod decoder;
mod kind;
mod subscription;

pub use decoder::{DecodePolicy, MoveFeedGate, Record, Shape, StreamDecoder};
pub use kind::StreamKind;
pub use subscription::{StreamOutcome, StreamState, Subscription};
