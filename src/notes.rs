use crate::progress::TimeUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// A grid cell: the granularity plus the cell's 0-based index within it
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct NoteKey {
    pub(crate) unit: TimeUnit,
    pub(crate) index: u16,
}

/// A journal entry: free text, plus an optional title and a list of items
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Note {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) items: Vec<String>,
    pub(crate) text: String,
}

impl Note {
    pub(crate) fn new<S: Into<String>>(text: S) -> Note {
        Note {
            text: text.into(),
            ..Note::default()
        }
    }

    /// One line describing the note: its title if it has one, otherwise the
    /// first line of its text, otherwise its first item
    pub(crate) fn summary(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        match self.text.lines().next() {
            Some(first) if !first.is_empty() => first,
            _ => self.items.first().map_or("", String::as_str),
        }
    }
}

/// Journal notes attached to grid cells.
///
/// Notes are keyed by granularity and index together, so that a note on
/// month 3 is not also shown on day 3 or week 3.  An empty note is still a
/// note.  Notes can be overwritten but never removed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct NoteStore(BTreeMap<NoteKey, Note>);

impl NoteStore {
    pub(crate) fn new() -> NoteStore {
        NoteStore::default()
    }

    pub(crate) fn get(&self, unit: TimeUnit, index: u16) -> Option<&Note> {
        self.0.get(&NoteKey { unit, index })
    }

    pub(crate) fn set(&mut self, unit: TimeUnit, index: u16, note: Note) {
        self.0.insert(NoteKey { unit, index }, note);
    }

    pub(crate) fn contains(&self, unit: TimeUnit, index: u16) -> bool {
        self.0.contains_key(&NoteKey { unit, index })
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the notes in order of unit and then index
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NoteKey, &Note)> + '_ {
        self.0.iter().map(|(&k, v)| (k, v))
    }

    /// Read a note file.  A nonexistent file yields an empty store.
    pub(crate) fn load(path: &Path) -> Result<NoteStore, NoteFileError> {
        let fp = match File::open(path) {
            Ok(fp) => fp,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "note file does not exist yet; starting empty");
                return Ok(NoteStore::new());
            }
            Err(source) => {
                return Err(NoteFileError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let records: Vec<NoteRecord> =
            serde_json::from_reader(BufReader::new(fp)).map_err(|source| NoteFileError::Parse {
                path: path.to_owned(),
                source,
            })?;
        let mut store = NoteStore::new();
        for NoteRecord { unit, index, note } in records {
            if index >= unit.total() {
                return Err(NoteFileError::InvalidEntry {
                    path: path.to_owned(),
                    unit,
                    index,
                });
            }
            store.set(unit, index, note);
        }
        tracing::info!(path = %path.display(), notes = store.len(), "loaded notes");
        Ok(store)
    }

    /// Write every note to `path`, replacing its previous contents.
    ///
    /// The notes are written to a temporary file beside `path` which is then
    /// renamed over it, so a failed save leaves the old file as it was.
    pub(crate) fn save(&self, path: &Path) -> Result<(), NoteFileError> {
        self.save_with(path, |fp, buf| fp.write_all(buf))
    }

    fn save_with<F>(&self, path: &Path, write: F) -> Result<(), NoteFileError>
    where
        F: FnOnce(&mut NamedTempFile, &[u8]) -> io::Result<()>,
    {
        let records = self
            .iter()
            .map(|(NoteKey { unit, index }, note)| NoteRecord {
                unit,
                index,
                note: note.clone(),
            })
            .collect::<Vec<_>>();
        let mut buf = serde_json::to_vec_pretty(&records).map_err(|source| {
            NoteFileError::Serialize {
                path: path.to_owned(),
                source,
            }
        })?;
        buf.push(b'\n');
        let write_err = |source| NoteFileError::Write {
            path: path.to_owned(),
            source,
        };
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        write(&mut tmp, &buf).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        tracing::debug!(path = %path.display(), notes = records.len(), "saved notes");
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct NoteRecord {
    unit: TimeUnit,
    index: u16,
    #[serde(flatten)]
    note: Note,
}

#[derive(Debug, Error)]
pub(crate) enum NoteFileError {
    #[error("failed to read notes from {}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse notes in {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("note file {} contains {unit} {index}, which is outside the year", .path.display())]
    InvalidEntry {
        path: PathBuf,
        unit: TimeUnit,
        index: u16,
    },
    #[error("failed to write notes to {}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to serialize notes for {}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}
