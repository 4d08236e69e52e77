//! Core types for the cafe API.

pub mod cafe;
pub mod id;

pub use cafe::{Cafe, MissingFieldError, NewCafe};
pub use id::*;
