//! Common serde helpers for partial-update payloads

use serde::{Deserialize, Deserializer};

/// Deserialize a present field into `Some(value)`, keeping `null` as `Some(None)`.
///
/// Use with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
