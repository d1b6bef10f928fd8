//! Output file naming and lifetime for the file-level commands.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{HuffError, Result};

/// Suffix given to compressed files.
pub const SUFFIX: &str = "huf";

/// `notes.txt` -> `notes.txt.huf`
pub fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(SUFFIX);
    PathBuf::from(name)
}

/// `notes.txt.huf` -> `notes.txt`; anything without the suffix gets `.out` appended instead.
pub fn decompressed_name(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == SUFFIX && input.file_stem().is_some() => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    }
}

/// Create `path`, hand a buffered writer to `work`, and flush it. If anything fails the partial
/// file is removed again. Refuses to replace an existing file unless `force` is set.
pub fn write_output<T, F>(path: &Path, force: bool, work: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    if path.exists() && !force {
        return Err(HuffError::OutputExists(path.display().to_string()));
    }
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);

    let result = work(&mut writer).and_then(|value| {
        writer.flush()?;
        Ok(value)
    });

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::{compressed_name, decompressed_name, write_output};
    use crate::error::HuffError;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    #[test]
    fn names() {
        assert_eq!(
            compressed_name(Path::new("dir/notes.txt")),
            PathBuf::from("dir/notes.txt.huf")
        );
        assert_eq!(
            decompressed_name(Path::new("dir/notes.txt.huf")),
            PathBuf::from("dir/notes.txt")
        );
        assert_eq!(
            decompressed_name(Path::new("dir/notes.bin")),
            PathBuf::from("dir/notes.bin.out")
        );
        assert_eq!(
            decompressed_name(Path::new(".huf")),
            PathBuf::from(".huf.out")
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exists");
        std::fs::write(&path, b"old").unwrap();

        let result = write_output(&path, false, |w| Ok(w.write_all(b"new")?));
        assert!(matches!(result, Err(HuffError::OutputExists(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"old");

        write_output(&path, true, |w| Ok(w.write_all(b"new")?)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn removes_partial_output_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial");
        let result: Result<(), HuffError> = write_output(&path, false, |w| {
            w.write_all(b"half")?;
            Err(HuffError::Truncated("payload"))
        });
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
