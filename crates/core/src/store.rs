//! File-backed division data.
//!
//! Each division lives in three JSON files inside one directory:
//! `teams_<division>.json` (competitor list), `bracket_<division>.json`
//! (bracket graph) and `odds_<division>.json` (written result records).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::bracket::BracketGraph;
use crate::competitor::{validate_competitors, Competitor};
use crate::error::DataError;
use crate::result::ResultRecord;

/// Competitors and bracket topology of one division.
#[derive(Debug, Clone)]
pub struct Division {
    pub name: String,
    pub competitors: Vec<Competitor>,
    pub bracket: BracketGraph,
}

/// Reads and writes division files in a data directory.
#[derive(Debug, Clone)]
pub struct DivisionStore {
    dir: PathBuf,
}

impl DivisionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn teams_path(&self, division: &str) -> PathBuf {
        self.dir.join(format!("teams_{division}.json"))
    }

    #[must_use]
    pub fn bracket_path(&self, division: &str) -> PathBuf {
        self.dir.join(format!("bracket_{division}.json"))
    }

    #[must_use]
    pub fn odds_path(&self, division: &str) -> PathBuf {
        self.dir.join(format!("odds_{division}.json"))
    }

    /// Loads and validates the competitor list of a division.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Missing`] if the file does not exist, and a
    /// parse or invariant error if its content is malformed.
    pub fn load_competitors(&self, division: &str) -> Result<Vec<Competitor>, DataError> {
        let competitors: Vec<Competitor> = read_json(&self.teams_path(division))?;
        validate_competitors(&competitors)?;
        Ok(competitors)
    }

    /// Loads the bracket graph of a division.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Missing`] if the file does not exist, and
    /// [`DataError::Json`] if it cannot be parsed.
    pub fn load_bracket(&self, division: &str) -> Result<BracketGraph, DataError> {
        read_json(&self.bracket_path(division))
    }

    /// Loads competitors and bracket of a division.
    ///
    /// # Errors
    ///
    /// See [`Self::load_competitors`] and [`Self::load_bracket`].
    pub fn load_division(&self, division: &str) -> Result<Division, DataError> {
        let competitors = self.load_competitors(division)?;
        let bracket = self.load_bracket(division)?;
        debug!(
            division,
            competitors = competitors.len(),
            qualifiers = bracket.qualifier_count(),
            "Loaded division"
        );
        Ok(Division {
            name: division.to_string(),
            competitors,
            bracket,
        })
    }

    /// Writes the result records of a division as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_odds(&self, division: &str, records: &[ResultRecord]) -> Result<PathBuf, DataError> {
        let path = self.odds_path(division);
        write_json(&path, records)?;
        debug!(path = %path.display(), records = records.len(), "Saved odds");
        Ok(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    if !path.exists() {
        return Err(DataError::Missing(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let file = File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}
