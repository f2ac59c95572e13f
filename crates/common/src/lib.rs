//! Shared types used across the camscene crates.

mod types;

pub use types::{Color, ObjectId, Transform};
