//! Random access over a downloaded data set archive
//!
//! Entries are read one at a time straight from the zip file; nothing is
//! extracted to disk or buffered whole in memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;

/// An open data set archive
pub struct FilingArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
}

/// One file entry of an archive with a buffered reader over its contents
pub struct ArchiveEntry<'a> {
    pub name: String,
    pub reader: Box<dyn BufRead + 'a>,
}

impl FilingArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let zip = ZipArchive::new(BufReader::new(file))?;
        debug!(path = %path.display(), entries = zip.len(), "Opened archive");
        Ok(Self { path, zip })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries, directories included
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }

    /// Entry names in archive order
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.zip.len())
            .filter_map(|i| self.zip.name_for_index(i))
            .map(str::to_string)
            .collect()
    }

    /// Open the entry at `index`; directory entries yield `None`
    pub fn entry(&mut self, index: usize) -> Result<Option<ArchiveEntry<'_>>> {
        let file = self.zip.by_index(index)?;
        if file.is_dir() {
            return Ok(None);
        }
        let name = file.name().to_string();
        Ok(Some(ArchiveEntry {
            name,
            reader: Box::new(BufReader::new(file)),
        }))
    }

    /// Open the first file entry whose final path component is `name`
    pub fn entry_by_name(&mut self, name: &str) -> Result<Option<ArchiveEntry<'_>>> {
        let index = (0..self.zip.len()).find(|&i| {
            self.zip
                .name_for_index(i)
                .map(|entry| entry.rsplit('/').next() == Some(name))
                .unwrap_or(false)
        });
        match index {
            Some(index) => self.entry(index),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_archive(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("2021q1.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("sub.tsv", options).unwrap();
        writer.write_all(b"adsh\tcik\n").unwrap();
        writer.add_directory("nested/", options).unwrap();
        writer.start_file("nested/dim.tsv", options).unwrap();
        writer.write_all(b"dimh\tsegments\tsegt\nabc\tX=Y;\t0\n").unwrap();
        writer.start_file("readme.htm", options).unwrap();
        writer.write_all(b"<html></html>").unwrap();
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_entry_names_in_archive_order() {
        let dir = TempDir::new().unwrap();
        let archive = FilingArchive::open(build_archive(&dir)).unwrap();
        assert_eq!(archive.len(), 4);
        assert_eq!(
            archive.entry_names(),
            vec!["sub.tsv", "nested/", "nested/dim.tsv", "readme.htm"]
        );
    }

    #[test]
    fn test_directory_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut archive = FilingArchive::open(build_archive(&dir)).unwrap();
        assert!(archive.entry(1).unwrap().is_none());
        let entry = archive.entry(0).unwrap().unwrap();
        assert_eq!(entry.name, "sub.tsv");
    }

    #[test]
    fn test_entry_by_final_component() {
        let dir = TempDir::new().unwrap();
        let mut archive = FilingArchive::open(build_archive(&dir)).unwrap();
        let mut entry = archive.entry_by_name("dim.tsv").unwrap().unwrap();
        assert_eq!(entry.name, "nested/dim.tsv");
        let mut contents = String::new();
        entry.reader.read_to_string(&mut contents).unwrap();
        assert!(contents.ends_with("X=Y;\t0\n"));
        drop(entry);
        assert!(archive.entry_by_name("num.tsv").unwrap().is_none());
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"not a zip archive").unwrap();
        assert!(matches!(
            FilingArchive::open(&path),
            Err(crate::error::IngestError::Archive(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            FilingArchive::open(dir.path().join("absent.zip")),
            Err(crate::error::IngestError::Io(_))
        ));
    }
}
