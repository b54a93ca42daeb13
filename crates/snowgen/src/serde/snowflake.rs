use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SnowflakeId;

/// Serializes as the native `i64`.
impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        as_native_snow::deserialize(d)
    }
}

pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value is negative (generated IDs never set the sign bit)
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = i64::deserialize(d)?;
        if n < 0 {
            return Err(serde::de::Error::custom(format_args!(
                "snowflake id must not be negative, got {n}"
            )));
        }
        Ok(SnowflakeId::from_raw(n))
    }
}

/// Decimal-string representation, for JSON consumers whose numbers lose
/// precision past 2^53 (e.g., JavaScript).
///
/// ```
/// use serde::Serialize;
/// use snowgen::SnowflakeId;
///
/// #[derive(Serialize)]
/// struct Output {
///     #[serde(with = "snowgen::as_decimal_snow")]
///     id: SnowflakeId,
/// }
///
/// let json = serde_json::to_string(&Output { id: SnowflakeId::from_raw(16_150_528) }).unwrap();
/// assert_eq!(json, r#"{"id":"16150528"}"#);
/// ```
pub mod as_decimal_snow {
    use super::{Deserializer, Serializer};
    use crate::SnowflakeId;

    /// Serialize a snowflake ID as a base-10 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a snowflake ID from a base-10 string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a valid `i64`
    /// - The value is negative
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let id = v.parse::<SnowflakeId>().map_err(E::custom)?;
                if id.to_raw() < 0 {
                    return Err(E::custom(format_args!(
                        "snowflake id must not be negative, got {id}"
                    )));
                }
                Ok(id)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}
