use std::io;

use super::Sheet;

/// Write the sheet as CSV: one header record, then the rows.
pub fn write_sheet<W: io::Write>(writer: W, sheet: &Sheet) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
