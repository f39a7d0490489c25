//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`NewLink`] - Input for inserting a link
//! - [`Caller`] / [`UserId`] - Explicit caller identity

pub mod identity;
pub mod link;

pub use identity::{Caller, UserId};
pub use link::{Link, NewLink};
