//! Session records for Redoubt.
//!
//! This crate defines the durable per-slot state and how it moves
//! to/from its on-disk document form:
//!
//! - **Types** ([`SessionRecord`], [`Team`], [`SpectatorState`],
//!   [`ClassId`], [`SlotId`], [`GameType`]) — the state itself.
//! - **Update + merge** ([`SessionUpdate`], [`merge`]) — a decoded
//!   document is a *sparse* set of fields; merging it over a baseline
//!   record leaves unmentioned fields alone.
//! - **Codec** ([`encode`], [`decode`], [`encode_meta`],
//!   [`decode_meta`]) — JSON in, JSON out.
//! - **Errors** ([`RecordError`]) — what can go wrong, which is only
//!   malformed documents.
//!
//! # Architecture
//!
//! The record layer knows nothing about files or slots-on-disk; it maps
//! between owned Rust state and document bytes. Storage and lifecycle
//! decisions live above it.
//!
//! ```text
//! Record (bytes ↔ state) → Store (files) → Session (lifecycle)
//! ```

mod codec;
mod error;
mod types;
mod update;

pub use codec::{decode, decode_meta, encode, encode_meta};
pub use error::RecordError;
pub use types::{
    ClassId, GameType, SessionRecord, SlotId, SpectatorState, Team,
    FOLLOW_NONE, MAX_GUID_LEN,
};
pub use update::{merge, SessionUpdate};
