//! `freightdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod dates;
pub mod entity;
pub mod error;
pub mod numeric;
pub mod reducer;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldError, FieldErrors};
pub use reducer::Reducer;
