use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::grid::source::RawSource;

/// Reads a csv file, or every csv file in a directory, into raw sources for
/// the grid parser. The file stem becomes the source name; `sheet_year`
/// covers stems in the bare `M.W` style, which don't carry a year.
///
/// Only I/O problems fail here. Whether a file's contents make sense is the
/// parser's call, so one misshapen grid can't block the rest of the batch.
pub fn load_path(path: &Path, sheet_year: Option<i32>) -> Result<Vec<RawSource>> {
    if path.is_dir() {
        load_directory(path, sheet_year)
    } else {
        Ok(vec![load_csv(path, sheet_year)?])
    }
}

fn load_directory(dir: &Path, sheet_year: Option<i32>) -> Result<Vec<RawSource>> {
    let mut files: Vec<_> = dir
        .read_dir()
        .with_context(|| format!("Can't read directory {}", dir.display()))?
        .collect::<Result<_, _>>()?;
    files.retain(|entry| {
        entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    });
    files.sort_by_key(|entry| entry.file_name());

    if files.is_empty() {
        bail!("No csv files found in {}", dir.display());
    }

    files
        .iter()
        .map(|entry| load_csv(&entry.path(), sheet_year))
        .collect()
}

fn load_csv(path: &Path, sheet_year: Option<i32>) -> Result<RawSource> {
    let name = path
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Can't open {}", path.display()))?;

    let mut rows: Vec<Vec<String>> = vec![];
    for record in reader.records() {
        let record = record.with_context(|| format!("Can't read {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!("read {} rows from {}", rows.len(), path.display());
    Ok(RawSource::new(name, rows).with_sheet_year(sheet_year))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::load_path;

    const WEEK: &str = "\
Time,Sunday,Monday,Tuesday,Wednesday,Thursday,Friday,Saturday
08:00,R: Sleep,,,,,,W: Work
08:30,,W: Work,,,,,
";

    #[test]
    fn reads_a_single_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("2024_01_01.csv");
        fs::write(&path, WEEK)?;

        let sources = load_path(&path, None)?;
        assert_eq!(sources.len(), 1);
        assert_eq!(&*sources[0].name, "2024_01_01");
        assert_eq!(sources[0].rows.len(), 3);
        assert_eq!(sources[0].rows[1][1], "R: Sleep");
        Ok(())
    }

    #[test]
    fn reads_a_directory_in_name_order_skipping_non_csv() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("2024_01_02.csv"), WEEK)?;
        fs::write(dir.path().join("2024_01_01.csv"), WEEK)?;
        fs::write(dir.path().join("notes.txt"), "not a grid")?;

        let sources = load_path(dir.path(), None)?;
        let names: Vec<_> = sources.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names, vec!["2024_01_01", "2024_01_02"]);
        Ok(())
    }

    #[test]
    fn sheet_year_rides_along() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("1.1.csv");
        fs::write(&path, WEEK)?;

        let sources = load_path(&path, Some(2024))?;
        // file_stem of "1.1.csv" drops only the final extension.
        assert_eq!(&*sources[0].name, "1.1");
        assert_eq!(sources[0].sheet_year, Some(2024));
        Ok(())
    }

    #[test]
    fn empty_directory_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert!(load_path(dir.path(), None).is_err());
        Ok(())
    }
}
