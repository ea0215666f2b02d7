//! CSV codec for the persisted row table.
//!
//! Reading matches columns by header name, so reordered, missing or legacy
//! columns load; ragged records load their absent cells as missing. Writing
//! always emits [`Row::COLUMNS`] in order.

use crate::pipeline::row::Row;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: Row = result?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_rows_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Row>, csv::Error> {
    let file = File::open(path)?;
    read_rows(file)
}

/// Reads only the header record, `None` for an empty source.
pub fn read_header<R: Read>(reader: R) -> Result<Option<Vec<String>>, csv::Error> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Ok(None);
    }
    Ok(Some(headers.iter().map(str::to_owned).collect()))
}

pub fn write_rows<W: Write>(writer: W, rows: &[Row], with_header: bool) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    if with_header {
        wtr.write_record(Row::COLUMNS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rows_to_csv<P: AsRef<Path>>(path: P, rows: &[Row]) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_rows(file, rows, true)
}
