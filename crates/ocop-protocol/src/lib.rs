//! Wire protocol for the OCOP client.
//!
//! This crate defines what the client and the backend say to each other
//! about identity:
//!
//! - **Types** ([`Principal`], [`Role`], [`Credential`], [`LoginRequest`]) —
//!   the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those structures are
//!   converted to/from bytes.
//! - **Interpretation** ([`interpret`]) — the one place where the backend's
//!   loosely shaped `{ success, message, data }` envelope is turned into a
//!   tagged result: [`LoginGrant`] or [`AuthFailure`].
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about HTTP or storage. It sits between
//! the transport (bytes on the wire) and the session layer (who is logged
//! in):
//!
//! ```text
//! Transport (bytes) → Protocol (LoginGrant | AuthFailure) → Session (state)
//! ```

mod codec;
mod error;
pub mod interpret;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use interpret::{AuthFailure, FailureKind, GENERIC_LOGIN_FAILURE, LoginGrant};
pub use types::{Credential, LoginRequest, Principal, Role};
