//! CSV rendering of trade history
//!
//! The engine's export operation returns an owner's records verbatim; this
//! module serializes them for delivery as a file attachment.

use anyhow::Result;
use std::io::Write;

use crate::types::TradeRecord;

/// Write the records as CSV, header row included, in the order given.
pub fn write_csv<W: Write>(records: &[TradeRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the records to an in-memory CSV string.
pub fn to_csv_string(records: &[TradeRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
