// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles image refs, release names, non-empty lists and body-less variant keys.

use nonempty::NonEmpty;
use serde::Deserialize;
use serde::de::value::MapDeserializer;

use crate::types::{ImageRef, ReleaseName};

pub fn deserialize_image_ref<'de, D>(deserializer: D) -> Result<ImageRef, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageRef::parse(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_release_name<'de, D>(deserializer: D) -> Result<ReleaseName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ReleaseName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_non_empty<'de, D, T>(deserializer: D) -> Result<NonEmpty<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let values: Vec<T> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values).ok_or_else(|| serde::de::Error::custom("list cannot be empty"))
}

/// A variant key written with no body (`local:`) reads as an empty mapping, so
/// defaults apply and a missing required field is reported by name.
pub fn deserialize_variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => {
            let empty = MapDeserializer::<_, D::Error>::new(std::iter::empty::<(String, String)>());
            T::deserialize(empty).map(Some)
        }
    }
}
