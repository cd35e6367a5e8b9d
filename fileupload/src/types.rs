//! Common type definitions shared by the storage and API layers.
//!
//! - [`RecordId`]: store-assigned identity of a persisted record
//! - [`Sort`]: optional ordering for list operations, parsed from `?sort=field,direction`

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Identity assigned by the store when a record is first persisted.
pub type RecordId = i64;

/// Fields a list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    ContentContentType,
}

impl SortField {
    /// Column name in the relational store. Only these fixed strings ever reach SQL.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::ContentContentType => "content_content_type",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "contentContentType" => Ok(SortField::ContentContentType),
            other => Err(format!(
                "Unsupported sort field '{other}'. Expected one of: id, name, contentContentType"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Sort direction must be 'asc' or 'desc', got '{other}'")),
        }
    }
}

/// Ordering requested by a caller, e.g. `id,desc` or `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim().parse::<SortField>()?;
        let direction = match parts.next() {
            Some(direction) => direction.trim().parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        Ok(Sort { field, direction })
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::ContentContentType => "contentContentType",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{field},{direction}")
    }
}

impl<'de> Deserialize<'de> for Sort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
