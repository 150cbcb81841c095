//! # OCOP
//!
//! Client core shared by the OCOP web admin, mobile admin and storefront.
//!
//! Two concerns live here: knowing who the current user is (and whether
//! that is still true), and turning the catalog's image references into
//! URLs a screen can render. A surface builds one [`Client`], calls
//! [`Client::start`] once, and then reads its session and resolver.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocop::prelude::*;
//!
//! # async fn run() -> Result<(), OcopError> {
//! let client = Client::builder()
//!     .config(ClientConfig::from_env()?)
//!     .build()?;
//!
//! client.start().await;
//! if client.access() == Access::Denied {
//!     let principal = client.session().login("admin@ocop.vn", "secret").await?;
//!     println!("hello {}", principal.display_name());
//! }
//!
//! let cover = client.cover_image_url(&[ImageRef::primary("/uploads/a.png")]);
//! # let _ = cover;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod logging;

pub use client::{Client, ClientBuilder, ConfiguredStore};
pub use config::{ClientConfig, DEFAULT_CREDENTIAL_FILE, Surface};
pub use error::OcopError;
pub use logging::init_tracing;

pub use ocop_media as media;
pub use ocop_protocol as protocol;
pub use ocop_session as session;
pub use ocop_transport as transport;

pub mod prelude {
    //! Everything a surface usually needs, in one import.

    pub use crate::{
        Client, ClientBuilder, ClientConfig, OcopError, Surface, init_tracing,
    };
    pub use ocop_media::{ImageRef, Resolver, ResolverConfig};
    pub use ocop_protocol::{Credential, FailureKind, Principal, Role};
    pub use ocop_session::{
        Access, AuthGateway, CredentialStore, FileCredentialStore,
        MemoryCredentialStore, Session, SessionError, SessionManager,
        SessionState,
    };
    pub use ocop_transport::HttpGateway;
}
