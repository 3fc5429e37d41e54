use crate::game_logic::errors::{LedgeError, LedgeResult, describe_validation_errors};
use crate::grid::{GridCell, GridMapper, WorldBounds};
use crate::pathfinding::AgentKind;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::{Validate, ValidationError};

/// Tile-based platformer level: solid blocks plus spawn points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Resource)]
#[validate(schema(function = "validate_level_contents"))]
pub struct LevelDefinition {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(range(min = 1.0, max = 512.0))]
    pub tile_size: f32,
    #[validate(range(min = 0.1, max = 16.0))]
    pub scale: f32,
    #[validate(range(min = 1, max = 1024))]
    pub width: u32,
    #[validate(range(min = 1, max = 1024))]
    pub height: u32,
    pub blocks: Vec<BlockPlacement>,
    pub target_spawn: Option<GridCell>,
    pub agent_spawns: Vec<AgentSpawn>,
}

/// What occupies a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Solid,
    Crate,
    /// Background scenery the agents pass through
    Decoration,
}

impl BlockKind {
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Decoration)
    }

    fn glyph(self) -> char {
        match self {
            BlockKind::Solid => '#',
            BlockKind::Crate => '=',
            BlockKind::Decoration => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub cell: GridCell,
    pub kind: BlockKind,
}

impl BlockPlacement {
    pub fn new(cell: GridCell, kind: BlockKind) -> Self {
        Self { cell, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSpawn {
    pub cell: GridCell,
    pub kind: AgentKind,
}

fn validate_level_contents(level: &LevelDefinition) -> Result<(), ValidationError> {
    let bounds = level.bounds();
    let spawn_cells = level
        .agent_spawns
        .iter()
        .map(|spawn| spawn.cell)
        .chain(level.target_spawn);
    let placed_cells = level.blocks.iter().map(|block| block.cell);

    if spawn_cells.chain(placed_cells).all(|cell| bounds.contains(cell)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("cell_out_of_bounds");
        error.message = Some("a block or spawn lies outside the level".into());
        Err(error)
    }
}

impl LevelDefinition {
    /// Create an empty level with validation
    pub fn new(name: String, width: u32, height: u32) -> LedgeResult<Self> {
        let level = Self {
            name,
            tile_size: 16.0,
            scale: 3.0,
            width,
            height,
            blocks: Vec::new(),
            target_spawn: None,
            agent_spawns: Vec::new(),
        };
        level.check()?;
        Ok(level)
    }

    /// Parse the ASCII level format.
    ///
    /// Each row of text is one grid row. `#` is a solid block, `=` a crate,
    /// `~` decoration, `P` the chase target, `G`/`F` ground and flying agents,
    /// and `.` or a space is empty. Lines starting with `//` are comments.
    pub fn parse_ascii(name: &str, text: &str) -> LedgeResult<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect();
        let rows = trim_blank_edges(&rows);

        if rows.is_empty() {
            return Err(LedgeError::InvalidLevelData {
                reason: format!("Level '{name}' has no rows"),
            });
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut level = Self::new(name.to_string(), width as u32, rows.len() as u32)?;

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let cell = GridCell::new(x as i32, y as i32);
                match glyph {
                    '.' | ' ' => {}
                    '#' => level.blocks.push(BlockPlacement::new(cell, BlockKind::Solid)),
                    '=' => level.blocks.push(BlockPlacement::new(cell, BlockKind::Crate)),
                    '~' => level.blocks.push(BlockPlacement::new(cell, BlockKind::Decoration)),
                    'G' => level.agent_spawns.push(AgentSpawn {
                        cell,
                        kind: AgentKind::Ground,
                    }),
                    'F' => level.agent_spawns.push(AgentSpawn {
                        cell,
                        kind: AgentKind::Flying,
                    }),
                    'P' => {
                        if let Some(previous) = level.target_spawn.replace(cell) {
                            return Err(LedgeError::InvalidLevelData {
                                reason: format!(
                                    "Level '{name}' has two target spawns: {previous} and {cell}"
                                ),
                            });
                        }
                    }
                    other => {
                        return Err(LedgeError::InvalidLevelData {
                            reason: format!("Unknown level glyph '{other}' at {cell}"),
                        });
                    }
                }
            }
        }

        level.check()?;
        Ok(level)
    }

    /// Render back to the ASCII format (spawns drawn over blocks)
    pub fn to_ascii(&self) -> String {
        let mut grid = vec![vec!['.'; self.width as usize]; self.height as usize];
        let mut put = |cell: GridCell, glyph: char| {
            if let Some(slot) = grid
                .get_mut(cell.y as usize)
                .and_then(|row| row.get_mut(cell.x as usize))
            {
                *slot = glyph;
            }
        };

        for block in &self.blocks {
            put(block.cell, block.kind.glyph());
        }
        for spawn in &self.agent_spawns {
            let glyph = match spawn.kind {
                AgentKind::Ground => 'G',
                AgentKind::Flying => 'F',
            };
            put(spawn.cell, glyph);
        }
        if let Some(cell) = self.target_spawn {
            put(cell, 'P');
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn mapper(&self) -> GridMapper {
        GridMapper::new(self.tile_size, self.scale)
    }

    /// The whole level is navigable space
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(
            GridCell::new(0, 0),
            GridCell::new(self.width as i32 - 1, self.height as i32 - 1),
        )
    }

    /// Load a level, choosing bincode for `.bin` files and ASCII otherwise
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> LedgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LedgeError::LevelFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let level = if path.extension().is_some_and(|ext| ext == "bin") {
            let data = std::fs::read(path)?;
            let (level, _): (LevelDefinition, usize) =
                bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(
                    |e| LedgeError::CorruptedLevelFile {
                        reason: format!("Failed to deserialize level data: {e}"),
                    },
                )?;
            level
        } else {
            let text = std::fs::read_to_string(path)?;
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("level");
            Self::parse_ascii(name, &text)?
        };

        level.check()?;

        info!(
            "Loaded level '{}' ({}x{}, {} blocks, {} agents) from {}",
            level.name,
            level.width,
            level.height,
            level.blocks.len(),
            level.agent_spawns.len(),
            path.display()
        );

        Ok(level)
    }

    /// Save the level in the binary format
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> LedgeResult<()> {
        self.check()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(
            |e| LedgeError::InvalidLevelData {
                reason: format!("Failed to serialize level: {e}"),
            },
        )?;

        std::fs::write(path, data)?;
        Ok(())
    }

    fn check(&self) -> LedgeResult<()> {
        self.validate()
            .map_err(|errors| LedgeError::LevelValidationFailed {
                reason: describe_validation_errors(&errors),
            })
    }
}

fn trim_blank_edges<'a>(rows: &[&'a str]) -> Vec<&'a str> {
    let first = rows.iter().position(|row| !row.trim().is_empty());
    let last = rows.iter().rposition(|row| !row.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => rows[first..=last].to_vec(),
        _ => Vec::new(),
    }
}
