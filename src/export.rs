//! Canonical CSV output.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::MatchRecord;

/// Serialize records to any writer. Null fields are written as empty cells.
pub fn write_records<W: io::Write>(writer: W, records: &[MatchRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the unified table to `path`, creating parent directories.
/// Returns the number of rows written.
pub fn write_canonical_csv(path: &Path, records: &[MatchRecord]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_records(io::BufWriter::new(file), records)?;

    info!(
        event = "export_written",
        path = %path.display(),
        rows = records.len(),
        "Wrote {} records to {}",
        records.len(),
        path.display()
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Era;
    use tempfile::TempDir;

    fn unplayed() -> MatchRecord {
        MatchRecord::new(
            Era::Historical,
            None,
            "final".to_string(),
            "unknown".to_string(),
            "brazil".to_string(),
            "uruguay".to_string(),
            None,
            Some(2),
            true,
        )
    }

    #[test]
    fn test_nulls_written_as_empty_cells() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[unplayed()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some(",final,unknown,brazil,,2,uruguay,,,true"));
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/matches.csv");
        let written = write_canonical_csv(&path, &[unplayed(), unplayed()]).unwrap();
        assert_eq!(written, 2);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("Datetime,Stage,City"));
    }
}
