use crate::pipeline::row::Row;
use crate::store::{SeriesStore, StoreError};
use crate::utilities::data_loader::{read_header, read_rows_from_csv, write_rows, write_rows_to_csv};
use std::cell::Cell;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Row table kept in a single CSV file.
///
/// Appends go to the end of the file when its header is the current column
/// layout. A table with any other header (an older export, say) is rewritten
/// in full on its first append.
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    len: Cell<Option<usize>>,
}

impl CsvStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            len: Cell::new(None),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_existing(&self) -> Result<Option<File>, StoreError> {
        match File::open(&self.path) {
            Ok(f) => Ok(Some(f)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn has_current_layout(&self) -> Result<Option<bool>, StoreError> {
        let Some(file) = self.open_existing()? else {
            return Ok(None);
        };
        Ok(read_header(file)?.map(|h| h.iter().map(String::as_str).eq(Row::COLUMNS.iter().copied())))
    }

    fn stored_len(&self) -> Result<usize, StoreError> {
        match self.len.get() {
            Some(n) => Ok(n),
            None => Ok(self.load()?.len()),
        }
    }
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound)
}

impl SeriesStore for CsvStore {
    fn load(&self) -> Result<Vec<Row>, StoreError> {
        let rows = match read_rows_from_csv(&self.path) {
            Ok(rows) => rows,
            Err(e) if is_not_found(&e) => {
                info!(path = %self.path.display(), "store: no table yet, starting empty");
                self.len.set(Some(0));
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        info!(path = %self.path.display(), rows = rows.len(), "store: loaded");
        self.len.set(Some(rows.len()));
        Ok(rows)
    }

    fn append(&mut self, rows: &[Row]) -> Result<usize, StoreError> {
        match self.has_current_layout()? {
            Some(true) => {
                let before = self.stored_len()?;
                let file = OpenOptions::new().append(true).open(&self.path)?;
                write_rows(file, rows, false)?;
                let after = before + rows.len();
                self.len.set(Some(after));
                debug!(path = %self.path.display(), appended = rows.len(), rows = after, "store: appended");
                Ok(after)
            }
            Some(false) => {
                let mut all = self.load()?;
                all.extend_from_slice(rows);
                info!(path = %self.path.display(), "store: rewriting table with current columns");
                self.save(&all)?;
                Ok(all.len())
            }
            None => {
                self.save(rows)?;
                Ok(rows.len())
            }
        }
    }

    fn save(&mut self, rows: &[Row]) -> Result<(), StoreError> {
        write_rows_to_csv(&self.path, rows)?;
        self.len.set(Some(rows.len()));
        info!(path = %self.path.display(), rows = rows.len(), "store: saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.len.set(Some(0));
        info!(path = %self.path.display(), "store: cleared");
        Ok(())
    }
}
