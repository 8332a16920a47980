//! Wire models shared by the backend handlers and the API client.
//!
//! Request types keep every field optional so that missing input reaches the
//! handler and is rejected with a domain message instead of a serde error.

pub mod auth;
pub mod comment;
pub mod event;
pub mod group;
pub mod poll;
pub mod post;
pub mod resource;
pub mod user;

pub use auth::*;
pub use comment::*;
pub use event::*;
pub use group::*;
pub use poll::*;
pub use post::*;
pub use resource::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null` in partial updates.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>` field.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
