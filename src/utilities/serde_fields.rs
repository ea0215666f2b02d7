//! Field codecs for the persisted table.
//!
//! Missing numbers are an empty field, flags are `0`/`1`, and an empty field
//! decodes to the type's default. Legacy exports wrote `nan` and `True`; both
//! are still accepted on read.

use serde::de::{self, Deserialize, Deserializer};
use serde::Serializer;

#[inline]
pub fn missing() -> f64 {
    f64::NAN
}

pub mod missing_f64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            s.serialize_none()
        } else {
            s.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

pub mod flag {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(*value as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("0.0") => Ok(false),
            Some("1") | Some("1.0") => Ok(true),
            Some(other) if other.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) if other.eq_ignore_ascii_case("true") => Ok(true),
            Some(other) => Err(de::Error::custom(format!("invalid flag value {other:?}"))),
        }
    }
}

pub fn empty_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
