//! Durable session storage for Redoubt.
//!
//! This crate owns the on-disk layout of session data:
//!
//! - [`ClientSessionStore`] — one file per roster slot
//!   (`session/client<NN>.json`)
//! - [`WorldMetaStore`] — the single global epoch marker
//!   (`session/meta.json`), plus [`is_valid`] to check a stored game
//!   mode against the configured one
//! - [`StoreError`] — write failures (reads never fail; see below)
//!
//! # Read discipline
//!
//! Every read degrades to "nothing stored" rather than erroring: a
//! missing file, an empty file, an unreadable file, and an unparseable
//! file all come back as `None`. Only the unparseable case is logged at
//! `warn` — data was present and got discarded, which operators should
//! be able to see. Callers respond to `None` by rebuilding defaults,
//! never by aborting.
//!
//! ```text
//! Record (bytes ↔ state) → Store (files) → Session (lifecycle)
//! ```

mod client;
mod error;
mod meta;

/// Directory under the storage base that holds every session file.
pub const SESSION_DIR: &str = "session";

pub use client::ClientSessionStore;
pub use error::StoreError;
pub use meta::{is_valid, WorldMetaStore};
