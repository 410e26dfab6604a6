use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of support a grid cell offers to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// No floor; stepping here means falling.
    Empty,
    Normal,
    Goal,
}

impl TileKind {
    pub fn is_supported(self) -> bool {
        self != TileKind::Empty
    }
}

/// Total tile query shared by every level geometry the block can roll on.
///
/// Out-of-range coordinates resolve to [`TileKind::Empty`]; the query never
/// fails, which keeps the move validation in `block` branch-free.
pub trait TileSupport {
    fn tile_kind(&self, x: i32, z: i32) -> TileKind;
}

/// Errors produced while parsing a level source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level source is empty")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile code {code} at ({x}, {z})")]
    UnknownTile { code: i64, x: usize, z: usize },
    #[error("unrecognized token {token:?} at ({x}, {z})")]
    InvalidToken { token: String, x: usize, z: usize },
    #[error("level has no start marker (code 2)")]
    MissingStart,
    #[error("level has more than one start marker, second at ({x}, {z})")]
    MultipleStarts { x: usize, z: usize },
}

/// Static tile map loaded from a whitespace-separated grid of integer codes.
///
/// Codes: `0` empty, `1` normal floor, `2` start (rewritten to normal after
/// the start position is recorded), `3` goal. Rows map top-to-bottom onto
/// increasing `z`, columns onto increasing `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    tiles: Vec<TileKind>,
    width: i32,
    height: i32,
    start: (i32, i32),
}

impl Level {
    /// Reads and parses a level file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("unable to read level file {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("malformed level file {}", path.display()))
    }

    /// Parses a level from its textual source.
    pub fn parse(source: &str) -> Result<Self, LevelError> {
        let mut tiles = Vec::new();
        let mut width = None;
        let mut start = None;
        let mut rows = 0usize;

        for line in source.lines() {
            let codes: Vec<&str> = line.split_whitespace().collect();
            if codes.is_empty() {
                continue;
            }
            let expected = *width.get_or_insert(codes.len());
            if codes.len() != expected {
                return Err(LevelError::RaggedRow {
                    row: rows,
                    expected,
                    found: codes.len(),
                });
            }
            for (x, code) in codes.iter().enumerate() {
                let value = code.parse::<i64>().map_err(|_| LevelError::InvalidToken {
                    token: code.to_string(),
                    x,
                    z: rows,
                })?;
                let kind = match value {
                    0 => TileKind::Empty,
                    1 => TileKind::Normal,
                    2 => {
                        if start.is_some() {
                            return Err(LevelError::MultipleStarts { x, z: rows });
                        }
                        start = Some((x as i32, rows as i32));
                        TileKind::Normal
                    }
                    3 => TileKind::Goal,
                    code => return Err(LevelError::UnknownTile { code, x, z: rows }),
                };
                tiles.push(kind);
            }
            rows += 1;
        }

        let width = width.ok_or(LevelError::Empty)?;
        let start = start.ok_or(LevelError::MissingStart)?;

        Ok(Self {
            tiles,
            width: width as i32,
            height: rows as i32,
            start,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Grid coordinates of the consumed start marker.
    pub fn start_position(&self) -> (i32, i32) {
        self.start
    }

    /// Iterates over every non-empty tile with its coordinates.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, TileKind)> + '_ {
        self.tiles.iter().enumerate().filter_map(move |(i, kind)| {
            if kind.is_supported() {
                let x = i as i32 % self.width;
                let z = i as i32 / self.width;
                Some((x, z, *kind))
            } else {
                None
            }
        })
    }
}

impl TileSupport for Level {
    fn tile_kind(&self, x: i32, z: i32) -> TileKind {
        if x < 0 || x >= self.width || z < 0 || z >= self.height {
            return TileKind::Empty;
        }
        self.tiles[(z * self.width + x) as usize]
    }
}
