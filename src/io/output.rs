use crate::order::OrderTable;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Formats a value with 6 decimal places, spelling out the non-finite values.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::from("nan")
    } else if value.is_infinite() {
        if value > 0. {
            String::from("inf")
        } else {
            String::from("-inf")
        }
    } else {
        format!("{:.6}", value)
    }
}

/// Writes the table for outputting order parameters.
///
/// Every value is followed by a single space and every row, one per
/// particle, by a newline. There is no header.
pub fn table_file(table: &OrderTable) -> String {
    let mut contents = String::with_capacity(table.rows() * table.columns() * 10);
    for row in table.iter_rows() {
        for value in row {
            contents.push_str(&format_value(*value));
            contents.push(' ');
        }
        contents.push('\n');
    }
    contents
}

/// Write the file
///
/// * `contents`: The contents, as a String, of the file.
/// * `path`: Where to write it, any existing file is overwritten.
pub fn write(contents: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// The hidden name a file is written under before it is moved into place.
fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name()
                   .map(|n| n.to_string_lossy().into_owned())
                   .unwrap_or_default();
    path.with_file_name(format!(".{}.part", name))
}

/// Writes a set of files so that either all of them appear or none do.
///
/// Every file is written to a staging path next to its target first, and the
/// staged files are only renamed once all of them are written. On any failure
/// the staged files and the files already moved into place are removed.
pub fn write_all(files: &[(String, PathBuf)]) -> std::io::Result<()> {
    let staged = files.iter()
                      .map(|(_, path)| staging_path(path))
                      .collect::<Vec<PathBuf>>();
    for (i, ((contents, _), stage)) in files.iter().zip(staged.iter()).enumerate() {
        if let Err(e) = write(contents, stage) {
            for stage in &staged[..i] {
                let _ = fs::remove_file(stage);
            }
            return Err(e);
        }
    }
    for (i, ((_, path), stage)) in files.iter().zip(staged.iter()).enumerate() {
        if let Err(e) = fs::rename(stage, path) {
            for (_, path) in &files[..i] {
                let _ = fs::remove_file(path);
            }
            for stage in &staged[i..] {
                let _ = fs::remove_file(stage);
            }
            return Err(e);
        }
    }
    Ok(())
}
