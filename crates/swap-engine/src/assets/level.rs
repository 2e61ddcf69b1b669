//! Level sources: the character grid plus the enemy patrol list.
//!
//! Malformed content never fails a load. Unknown grid symbols are ignored by
//! the world builder and malformed patrol lines are skipped with a warning.
//! Only a missing or unreadable layout is an error.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::enemy::PatrolExtents;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid level manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("level {0} does not exist")]
    NotFound(usize),
}

/// One malformed patrol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: expected `left,right` numbers, got {text:?}")]
pub struct PatrolParseError {
    pub line: usize,
    pub text: String,
}

/// A level grid: one string per row, top to bottom, one character per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelLayout {
    rows: Vec<String>,
}

impl LevelLayout {
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// Split a layout file into grid rows.
    pub fn parse(text: &str) -> Self {
        Self {
            rows: text.lines().map(|line| line.trim_end_matches('\r').to_string()).collect(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Cells as (column, row, symbol), row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.chars().enumerate().map(move |(col, ch)| (col, row, ch)))
    }
}

impl<S: Into<String>> FromIterator<S> for LevelLayout {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Everything the world builder needs for one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSource {
    pub layout: LevelLayout,
    /// Patrol extents, consumed one per `V` cell in scan order.
    #[serde(default)]
    pub enemies: Vec<PatrolExtents>,
}

impl LevelSource {
    pub fn new(layout: LevelLayout, enemies: Vec<PatrolExtents>) -> Self {
        Self { layout, enemies }
    }

    /// Build from layout and patrol file contents.
    pub fn parse(layout: &str, enemies: Option<&str>) -> Self {
        Self {
            layout: LevelLayout::parse(layout),
            enemies: enemies.map(parse_enemy_params).unwrap_or_default(),
        }
    }
}

/// Parse one `left,right` line.
pub fn parse_patrol_line(line: &str) -> Option<PatrolExtents> {
    let mut parts = line.split(',');
    let left = parts.next()?.trim().parse::<f32>().ok()?;
    let right = parts.next()?.trim().parse::<f32>().ok()?;
    if !left.is_finite() || !right.is_finite() {
        return None;
    }
    Some(PatrolExtents::new(left, right))
}

/// Parse every patrol line, reporting the malformed ones. Blank lines are skipped.
pub fn try_parse_enemy_params(text: &str) -> (Vec<PatrolExtents>, Vec<PatrolParseError>) {
    let mut extents = Vec::new();
    let mut errors = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_patrol_line(line) {
            Some(e) => extents.push(e),
            None => errors.push(PatrolParseError {
                line: idx + 1,
                text: line.to_string(),
            }),
        }
    }
    (extents, errors)
}

/// Parse patrol lines, logging and dropping malformed ones.
pub fn parse_enemy_params(text: &str) -> Vec<PatrolExtents> {
    let (extents, errors) = try_parse_enemy_params(text);
    for err in &errors {
        log::warn!("skipping enemy parameters: {err}");
    }
    extents
}

/// A numbered set of levels, counted from 1.
pub trait LevelProvider {
    fn count(&self) -> usize;

    fn load(&self, level: usize) -> Result<LevelSource, LevelError>;
}

/// Levels laid out on disk as `<root>/<n>.txt` with patrols in
/// `<root>/enemies/<n>.txt`. Levels are numbered from 1.
#[derive(Debug, Clone)]
pub struct LevelSet {
    root: PathBuf,
    count: usize,
}

impl LevelSet {
    pub fn new(root: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            root: root.into(),
            count,
        }
    }

    pub fn layout_path(&self, level: usize) -> PathBuf {
        self.root.join(format!("{level}.txt"))
    }

    pub fn enemies_path(&self, level: usize) -> PathBuf {
        self.root.join("enemies").join(format!("{level}.txt"))
    }
}

impl LevelProvider for LevelSet {
    fn count(&self) -> usize {
        self.count
    }

    /// Read one level. A missing patrol file means no patrols.
    fn load(&self, level: usize) -> Result<LevelSource, LevelError> {
        if level == 0 || level > self.count {
            return Err(LevelError::NotFound(level));
        }
        let path = self.layout_path(level);
        let layout = fs::read_to_string(&path).map_err(|source| LevelError::Io { path, source })?;

        let enemies = match fs::read_to_string(self.enemies_path(level)) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("level {level}: no enemy parameters ({err})");
                None
            }
        };

        Ok(LevelSource::parse(&layout, enemies.as_deref()))
    }
}

/// All levels bundled as one JSON document, for hosts without a filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelManifest {
    pub levels: Vec<LevelSource>,
}

impl LevelManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Level `n`, numbered from 1.
    pub fn get(&self, level: usize) -> Result<&LevelSource, LevelError> {
        level
            .checked_sub(1)
            .and_then(|idx| self.levels.get(idx))
            .ok_or(LevelError::NotFound(level))
    }
}

impl LevelProvider for LevelManifest {
    fn count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, level: usize) -> Result<LevelSource, LevelError> {
        self.get(level).cloned()
    }
}
