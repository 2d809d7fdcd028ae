//! Dataset Schema
//! Column names and value types of the top-100 K-drama table.

use polars::prelude::DataType;

pub const NAME: &str = "Name";
pub const RATING: &str = "Rating";
pub const GENRE: &str = "Genre";
pub const YEAR: &str = "Year of release";
pub const NETWORK: &str = "Network";
pub const EPISODES: &str = "Number of Episode";
pub const AIRED_ON: &str = "Aired On";
pub const CONTENT_RATING: &str = "Content Rating";
pub const TAGS: &str = "Tags";

/// Name of the count column in every aggregated table.
pub const COUNT: &str = "Count";

/// Value type a column is conformed to at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
}

impl ColumnKind {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
        }
    }

    /// Whether a column inferred as `dtype` can be conformed to this kind
    /// without reinterpreting text as numbers.
    pub fn accepts(self, dtype: &DataType) -> bool {
        match self {
            ColumnKind::Text => true,
            ColumnKind::Integer => dtype.is_integer() || dtype == &DataType::Null,
            ColumnKind::Float => {
                dtype.is_integer() || dtype.is_float() || dtype == &DataType::Null
            }
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
        };
        f.write_str(name)
    }
}

/// Columns the report reads, in the order the loaded table keeps them.
pub const REQUIRED_COLUMNS: [(&str, ColumnKind); 9] = [
    (NAME, ColumnKind::Text),
    (YEAR, ColumnKind::Integer),
    (NETWORK, ColumnKind::Text),
    (EPISODES, ColumnKind::Integer),
    (RATING, ColumnKind::Float),
    (GENRE, ColumnKind::Text),
    (AIRED_ON, ColumnKind::Text),
    (CONTENT_RATING, ColumnKind::Text),
    (TAGS, ColumnKind::Text),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_columns_reject_text() {
        assert!(!ColumnKind::Integer.accepts(&DataType::String));
        assert!(ColumnKind::Integer.accepts(&DataType::Int64));
        assert!(ColumnKind::Float.accepts(&DataType::Int64));
        assert!(ColumnKind::Text.accepts(&DataType::Float64));
    }
}
