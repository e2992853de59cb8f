// Source table loading (CSV)

use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

pub const REGION_NAME: &str = "RegionName";
pub const REGION_ID: &str = "RegionID";
pub const SIZE_RANK: &str = "SizeRank";

/// Fixed column set of one input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSchema {
    /// Short table name used in logs and errors ("zhvi", "zori").
    pub name: String,
    /// Administrative (non-period) columns. Must include the three typed
    /// columns; any extra entries (e.g. `RegionType`) are required too.
    pub admin_columns: Vec<String>,
    /// Trailing characters stripped from period labels (3 for `YYYY-MM-DD`).
    pub period_suffix_len: usize,
}

impl SourceSchema {
    /// Home value index layout: `RegionID,SizeRank,RegionName,RegionType,StateName,YYYY-MM-DD...`
    pub fn zhvi() -> Self {
        Self {
            name: "zhvi".into(),
            admin_columns: [REGION_NAME, REGION_ID, "RegionType", "StateName", SIZE_RANK]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            period_suffix_len: 3,
        }
    }

    /// Rental index layout: `RegionID,RegionName,SizeRank,YYYY-MM...`
    pub fn zori() -> Self {
        Self {
            name: "zori".into(),
            admin_columns: [REGION_NAME, REGION_ID, SIZE_RANK]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            period_suffix_len: 0,
        }
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![REGION_NAME, REGION_ID, SIZE_RANK];
        for c in &self.admin_columns {
            if !cols.contains(&c.as_str()) {
                cols.push(c);
            }
        }
        cols
    }
}

/// One source record. `cells` is aligned with [`RawTable::headers`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 0-based data row index (header excluded).
    pub index: usize,
    pub region_name: String,
    pub region_id: u64,
    pub size_rank: u32,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a source table from disk.
pub fn load_table(path: &Path, schema: &SourceSchema) -> Result<RawTable, LoadError> {
    let content = read_file_as_utf8(path).map_err(|reason| LoadError::SourceUnavailable {
        table: schema.name.clone(),
        path: path.display().to_string(),
        reason,
    })?;
    let table = parse_table(&content, schema)?;
    log::debug!(
        "{}: loaded {} rows x {} columns from {}",
        table.name,
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV text (with header row) into a [`RawTable`].
pub fn parse_table(csv_data: &str, schema: &SourceSchema) -> Result<RawTable, LoadError> {
    let table = schema.name.as_str();
    let csv_err = |e: csv::Error| LoadError::Csv {
        table: table.into(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::SchemaMismatch {
                table: table.into(),
                column: name.into(),
            })
    };

    for column in schema.required_columns() {
        idx(column)?;
    }
    let name_idx = idx(REGION_NAME)?;
    let id_idx = idx(REGION_ID)?;
    let rank_idx = idx(SIZE_RANK)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();

        let malformed = |column: &str, value: &str| LoadError::MalformedValue {
            table: table.into(),
            row: index,
            column: column.into(),
            value: value.into(),
        };

        let region_id = cells[id_idx]
            .trim()
            .parse::<u64>()
            .map_err(|_| malformed(REGION_ID, &cells[id_idx]))?;
        let size_rank = parse_rank(&cells[rank_idx]).ok_or_else(|| malformed(SIZE_RANK, &cells[rank_idx]))?;

        rows.push(RawRow {
            index,
            region_name: cells[name_idx].trim().to_string(),
            region_id,
            size_rank,
            cells,
        });
    }

    Ok(RawTable {
        name: table.to_string(),
        headers,
        rows,
    })
}

/// Read a whole source from any reader (stdin, in-memory fixtures).
pub fn read_table<R: Read>(mut reader: R, schema: &SourceSchema) -> Result<RawTable, LoadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| LoadError::SourceUnavailable {
            table: schema.name.clone(),
            path: "<reader>".into(),
            reason: e.to_string(),
        })?;
    parse_table(&decode_utf8_lossy_1252(bytes), schema)
}

/// Size ranks are integers, but spreadsheet round-trips sometimes write `3.0`.
fn parse_rank(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(rank) = value.parse::<u32>() {
        return Some(rank);
    }
    let f = value.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64).then_some(f as u32)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
    Ok(decode_utf8_lossy_1252(bytes))
}

fn decode_utf8_lossy_1252(bytes: Vec<u8>) -> String {
    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
