//! Record structures matching the two storage tables.
//!
//! - [`files`]: [`FileRecord`](files::FileRecord), metadata with optional content
//! - [`file_contents`]: [`FileContentRecord`](file_contents::FileContentRecord), created by upload, every field required
//!
//! Both kinds implement [`Record`], which lets a single repository
//! implementation serve either table. Identity is store-assigned: a record is
//! built with `id = None` and receives its id from
//! [`Repository::save`](crate::db::handlers::Repository::save).
//!
//! Equality is identity-based. Two records are equal when both carry an id and
//! the ids match; a record without an id is only equal to itself (same
//! reference). Field values never take part in the comparison.

use sqlx::{FromRow, postgres::PgRow};

use crate::types::RecordId;

pub mod file_contents;
pub mod files;

/// Shape shared by every persisted record kind.
pub trait Record: std::fmt::Debug + Clone + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static {
    /// Table holding this record kind
    const TABLE: &'static str;

    fn id(&self) -> Option<RecordId>;

    /// Same record carrying the given identity
    fn with_id(self, id: RecordId) -> Self;

    fn name(&self) -> &str;

    fn content(&self) -> Option<&[u8]>;

    fn content_content_type(&self) -> Option<&str>;
}

/// Binary content travels as standard padded base64 in JSON.
pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match bytes {
                Some(bytes) => super::serialize(bytes, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let encoded = Option::<String>::deserialize(deserializer)?;
            encoded
                .map(|encoded| STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super::base64_bytes")]
        required: Vec<u8>,
        #[serde(default, with = "super::base64_bytes::option")]
        optional: Option<Vec<u8>>,
    }

    #[test]
    fn test_content_is_base64_on_the_wire() {
        let json = serde_json::to_value(Wrapper {
            required: vec![0x00],
            optional: Some(b"hi".to_vec()),
        })
        .unwrap();
        assert_eq!(json["required"], "AA==");
        assert_eq!(json["optional"], "aGk=");
    }

    #[test]
    fn test_missing_optional_content_decodes_to_none() {
        let wrapper: Wrapper = serde_json::from_str(r#"{"required":"AQ=="}"#).unwrap();
        assert_eq!(wrapper.required, vec![0x01]);
        assert_eq!(wrapper.optional, None);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"required":"not base64!"}"#).is_err());
    }
}
