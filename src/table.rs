#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// An in-memory CSV feed with canonicalized column names.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Read a whole feed, normalizing every header with [`crate::normalize_column()`].
    pub fn from_reader(read: impl std::io::Read) -> Result<Table, Error> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(read);
        let headers = csv
            .headers()?
            .iter()
            .map(crate::normalize_column)
            .collect();
        let mut records = Vec::new();
        for record in csv.into_records() {
            records.push(record?);
        }
        Ok(Table { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The position of the column named `name` (normalized form), or `None`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// The cell at (`row`, `column`), with absent cells read as the empty string.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .unwrap_or("")
    }

    /// All values of the column at `index`, one per row and in row order.
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.get(index).unwrap_or(""))
            .collect()
    }
}
