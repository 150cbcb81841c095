//! Image reference resolution for OCOP clients.
//!
//! Catalog data stores image locations in whatever shape the uploader
//! produced: `/uploads/a.png`, `a.png`, `https://cdn…/a.png`,
//! `data:image/png;base64,…`. Every surface needs exactly one renderable
//! absolute URL out of that.
//!
//! Resolution is split in two so the priority order can be read and tested
//! on its own:
//!
//! 1. [`classify`] — look at the string, return a [`ReferenceKind`]
//! 2. [`Resolver::resolve`] — turn each kind into a URL
//!
//! Both are total: every input, malformed or not, yields a URL.

mod image;
mod reference;
mod resolver;

pub use image::ImageRef;
pub use reference::{ReferenceKind, classify};
pub use resolver::{
    DEFAULT_BASE_URL, DEFAULT_PLACEHOLDER_URL, Resolver, ResolverConfig,
    resolve, resolve_primary, strip_api_suffix,
};
