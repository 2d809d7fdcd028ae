//! CSV Data Loader Module
//! Loads the K-drama CSV with Polars, conforms it to the report schema and
//! fills missing networks.

use crate::data::aggregate::{AggregateError, ViewAggregator};
use crate::data::schema::{self, ColumnKind, REQUIRED_COLUMNS};
use polars::prelude::*;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' should hold {expected} values but was read as {found}")]
    ColumnType {
        column: String,
        expected: ColumnKind,
        found: String,
    },
    #[error("Failed to fill missing networks: {0}")]
    NetworkFill(#[from] AggregateError),
}

/// The loaded source table. Immutable once built.
#[derive(Debug, Clone)]
pub struct DramaTable {
    df: DataFrame,
    fingerprint: String,
    source: PathBuf,
    network_fill: Option<String>,
}

impl DramaTable {
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// SHA-256 of the raw CSV bytes, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Value used to fill missing `Network` entries, if any were missing.
    pub fn network_fill(&self) -> Option<&str> {
        self.network_fill.as_deref()
    }
}

/// Handles CSV file loading with Polars.
pub struct DramaLoader {
    table: Option<DramaTable>,
    file_path: Option<PathBuf>,
}

impl Default for DramaLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DramaLoader {
    pub fn new() -> Self {
        Self {
            table: None,
            file_path: None,
        }
    }

    /// Load a CSV file and keep the resulting table.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DramaTable, LoaderError> {
        self.file_path = Some(file_path.to_path_buf());
        let table = Self::read(file_path)?;
        Ok(self.table.insert(table))
    }

    /// Read and prepare a CSV file without touching loader state
    /// (used from the background loading thread).
    pub fn read(file_path: &Path) -> Result<DramaTable, LoaderError> {
        let bytes = std::fs::read(file_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoaderError::FileNotFound(file_path.to_path_buf()),
            _ => LoaderError::Io(e),
        })?;
        info!("Read {} bytes from {}", bytes.len(), file_path.display());
        Self::parse(&bytes, file_path)
    }

    /// Parse CSV bytes into a validated table. `source` is only recorded.
    pub fn parse(bytes: &[u8], source: &Path) -> Result<DramaTable, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        let df = Self::conform_schema(&df)?;
        let (df, network_fill) = Self::fill_missing_networks(df)?;

        info!(
            "Loaded {} dramas from {}",
            df.height(),
            source.display()
        );

        Ok(DramaTable {
            df,
            fingerprint: Self::fingerprint(bytes),
            source: source.to_path_buf(),
            network_fill,
        })
    }

    /// Keep only the report columns, cast to their schema types.
    /// Absent columns and text in numeric columns fail here, once.
    fn conform_schema(df: &DataFrame) -> Result<DataFrame, LoaderError> {
        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());

        for (name, kind) in REQUIRED_COLUMNS {
            let column = df
                .column(name)
                .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;

            if !kind.accepts(column.dtype()) {
                return Err(LoaderError::ColumnType {
                    column: name.to_string(),
                    expected: kind,
                    found: column.dtype().to_string(),
                });
            }

            columns.push(column.cast(&kind.dtype())?);
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Fill nulls in `Network` with the column's most frequent value.
    fn fill_missing_networks(df: DataFrame) -> Result<(DataFrame, Option<String>), LoaderError> {
        let missing = df.column(schema::NETWORK)?.null_count();
        if missing == 0 {
            return Ok((df, None));
        }

        let Some(mode) = ViewAggregator::most_frequent(&df, schema::NETWORK)? else {
            warn!("Network column has no values; {} entries stay missing", missing);
            return Ok((df, None));
        };

        debug!("Filling {} missing networks with '{}'", missing, mode);

        let filled = df
            .lazy()
            .with_column(col(schema::NETWORK).fill_null(lit(mode.as_str())))
            .collect()?;

        Ok((filled, Some(mode)))
    }

    fn fingerprint(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Get a reference to the loaded table.
    pub fn get_table(&self) -> Option<&DramaTable> {
        self.table.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set table directly (used for async loading)
    pub fn set_table(&mut self, table: DramaTable) {
        self.file_path = Some(table.source().to_path_buf());
        self.table = Some(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Name,Year of release,Aired Date,Aired On,Number of Episode,Network,Duration,Content Rating,Synopsis,Cast,Genre,Tags,Rank,Rating";

    fn parse(rows: &[&str]) -> Result<DramaTable, LoaderError> {
        let csv = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        DramaLoader::parse(csv.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn fills_missing_network_with_most_frequent() {
        let table = parse(&[
            r#"A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,9.1"#,
            r#"B,2021,x,Friday,16,,1h,15+,s,c,Drama,Tag,#2,9.0"#,
            r#"C,2019,x,Friday,12,tvN,1h,15+,s,c,Drama,Tag,#3,8.9"#,
        ])
        .unwrap();

        assert_eq!(table.network_fill(), Some("tvN"));
        let networks = table.frame().column(schema::NETWORK).unwrap();
        assert_eq!(networks.null_count(), 0);
        let values: Vec<_> = networks.str().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec!["tvN", "tvN", "tvN"]);
    }

    #[test]
    fn network_fill_ties_go_to_first_seen_value() {
        let table = parse(&[
            r#"A,2020,x,Friday,16,JTBC,1h,15+,s,c,Drama,Tag,#1,9.1"#,
            r#"B,2021,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#2,9.0"#,
            r#"C,2019,x,Friday,12,,1h,15+,s,c,Drama,Tag,#3,8.9"#,
        ])
        .unwrap();

        assert_eq!(table.network_fill(), Some("JTBC"));
    }

    #[test]
    fn keeps_only_schema_columns_with_schema_types() {
        let table = parse(&[r#"A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,9"#]).unwrap();
        let df = table.frame();

        assert_eq!(df.width(), REQUIRED_COLUMNS.len());
        assert_eq!(df.column(schema::YEAR).unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column(schema::RATING).unwrap().dtype(), &DataType::Float64);
        assert_eq!(table.network_fill(), None);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "Name,Rating\nA,9.0\n";
        let err = DramaLoader::parse(csv.as_bytes(), Path::new("inline.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == schema::YEAR));
    }

    #[test]
    fn text_in_numeric_column_is_a_type_error() {
        let err = parse(&[r#"A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,great"#])
            .unwrap_err();
        assert!(matches!(err, LoaderError::ColumnType { ref column, .. } if column == schema::RATING));
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        // Polars rejects rows wider than the header unless told to truncate them.
        let result = parse(&[
            r#"A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,9.1"#,
            r#"B,2021,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#2,9.0,extra,fields"#,
        ]);
        assert!(matches!(result, Err(LoaderError::CsvError(_))));
    }

    #[test]
    fn network_fill_error_keeps_its_source() {
        let err = LoaderError::from(AggregateError::PolarsError(PolarsError::ComputeError(
            "no mode".into(),
        )));
        assert!(matches!(err, LoaderError::NetworkFill(_)));
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert!(source.is_some_and(|s| s.contains("no mode")));
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DramaLoader::read(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn fingerprint_follows_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,9.1").unwrap();

        let first = DramaLoader::read(file.path()).unwrap();
        let again = DramaLoader::read(file.path()).unwrap();
        assert_eq!(first.fingerprint(), again.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);

        writeln!(file, "B,2021,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#2,9.0").unwrap();
        let changed = DramaLoader::read(file.path()).unwrap();
        assert_ne!(first.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn loader_keeps_last_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "A,2020,x,Friday,16,tvN,1h,15+,s,c,Drama,Tag,#1,9.1").unwrap();

        let mut loader = DramaLoader::new();
        assert!(loader.get_table().is_none());
        loader.load_csv(file.path()).unwrap();
        assert_eq!(loader.get_table().map(|t| t.height()), Some(1));
        assert_eq!(loader.get_file_path().map(|p| p.as_path()), Some(file.path()));
    }
}
