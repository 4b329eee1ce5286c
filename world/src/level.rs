//! Level descriptions and their translation into laid-out rooms.

use std::collections::BTreeSet;

use jungle_ruins_core::{CatalogEntry, TileCatalog};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::rooms::{Room, TileWorld};

const DEMO_LEVEL: &str = include_str!("../levels/demo.toml");

/// Failures raised while reading or laying out a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level does not declare a single room.
    #[error("level declares no rooms")]
    NoRooms,
    /// A room has no rows or no columns.
    #[error("room {room} has no tiles")]
    EmptyRoom {
        /// Index of the offending room.
        room: usize,
    },
    /// A row's length differs from the room's first row.
    #[error("room {room} row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Index of the offending room.
        room: usize,
        /// Index of the offending row, counted from the top.
        row: usize,
        /// Number of tiles found in the row.
        found: usize,
        /// Number of tiles in the room's first row.
        expected: usize,
    },
    /// The spawn tile lies outside the first room.
    #[error("spawn tile ({column}, {row}) lies outside the first room")]
    SpawnOutOfBounds {
        /// Requested spawn column.
        column: u32,
        /// Requested spawn row.
        row: u32,
    },
    /// The level text is not valid TOML or does not match the schema.
    #[error("failed to parse level: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tile matrix of a single room, row zero at the top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RoomData {
    /// Numeric tile ids, one inner vector per row.
    pub tiles: Vec<Vec<u16>>,
}

/// Serialized level: rooms, optional catalog overrides, and an optional spawn tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LevelDescription {
    /// Rooms in registration order.
    #[serde(rename = "room")]
    pub rooms: Vec<RoomData>,
    /// Catalog entries replacing the classic id table.
    #[serde(default, rename = "tile")]
    pub catalog: Vec<CatalogEntry>,
    /// Local `[column, row]` of the mover's start tile inside the first room.
    #[serde(default)]
    pub spawn: Option<[u32; 2]>,
}

impl LevelDescription {
    /// Creates a level from raw room matrices using the classic catalog.
    #[must_use]
    pub fn new(rooms: Vec<Vec<Vec<u16>>>) -> Self {
        Self {
            rooms: rooms.into_iter().map(|tiles| RoomData { tiles }).collect(),
            ..Self::default()
        }
    }

    /// Sets the spawn tile inside the first room.
    #[must_use]
    pub fn with_spawn(mut self, column: u32, row: u32) -> Self {
        self.spawn = Some([column, row]);
        self
    }

    /// Parses a level from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, LevelError> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in three-room demonstration level.
    pub fn demo() -> Result<Self, LevelError> {
        Self::from_toml(DEMO_LEVEL)
    }

    /// Classic catalog with this level's overrides applied.
    #[must_use]
    pub fn catalog(&self) -> TileCatalog {
        TileCatalog::classic().with_overrides(self.catalog.iter().copied())
    }

    /// Validates the matrices and places the rooms in world space.
    ///
    /// The first room sits at the origin; every later room is stacked in a
    /// column to its right, each separated from its neighbours by `gap` tiles.
    pub(crate) fn layout(&self, gap: u32) -> Result<TileWorld, LevelError> {
        let first = self.rooms.first().ok_or(LevelError::NoRooms)?;
        let catalog = self.catalog();
        let gap = i32::try_from(gap).unwrap_or(i32::MAX);
        let column_x = dimension(first.tiles.first().map_or(0, Vec::len)).saturating_add(gap);

        let mut unknown = BTreeSet::new();
        let mut rooms = Vec::with_capacity(self.rooms.len());
        let mut next_y = 0_i32;
        for (index, data) in self.rooms.iter().enumerate() {
            let (columns, rows) = validate(index, data)?;
            let (offset_x, offset_y) = if index == 0 {
                (0, 0)
            } else {
                let offset = (column_x, next_y);
                next_y = next_y.saturating_add(dimension(rows as usize)).saturating_add(gap);
                offset
            };

            let kinds = data
                .tiles
                .iter()
                .flatten()
                .map(|id| {
                    if !catalog.contains(*id) {
                        let _ = unknown.insert(*id);
                    }
                    catalog.kind_of(*id)
                })
                .collect();
            rooms.push(Room::new(columns, rows, offset_x, offset_y, kinds));
        }

        if !unknown.is_empty() {
            warn!("unknown tile ids treated as floor: {unknown:?}");
        }

        if let (Some([column, row]), Some(room)) = (self.spawn, rooms.first()) {
            if column >= room.columns() || row >= room.rows() {
                return Err(LevelError::SpawnOutOfBounds { column, row });
            }
        }

        Ok(TileWorld::new(rooms))
    }
}

fn validate(index: usize, data: &RoomData) -> Result<(u32, u32), LevelError> {
    let expected = data.tiles.first().map_or(0, Vec::len);
    if expected == 0 {
        return Err(LevelError::EmptyRoom { room: index });
    }

    if let Some((row, found)) = data
        .tiles
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, length)| *length != expected)
    {
        return Err(LevelError::RaggedRow {
            room: index,
            row,
            found,
            expected,
        });
    }

    let columns = u32::try_from(expected).map_err(|_| LevelError::EmptyRoom { room: index })?;
    let rows = u32::try_from(data.tiles.len()).map_err(|_| LevelError::EmptyRoom { room: index })?;
    Ok((columns, rows))
}

fn dimension(length: usize) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jungle_ruins_core::TileKind;

    #[test]
    fn rooms_are_stacked_right_of_the_first() {
        let level = LevelDescription::new(vec![
            vec![vec![1; 5]; 4],
            vec![vec![1; 3]; 2],
            vec![vec![1; 3]; 3],
        ]);
        let tiles = level.layout(2).expect("valid level");
        let offsets: Vec<(i32, i32)> = tiles
            .rooms()
            .iter()
            .map(|room| (room.offset_x(), room.offset_y()))
            .collect();
        assert_eq!(offsets, vec![(0, 0), (7, 0), (7, 4)]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let level = LevelDescription::new(vec![vec![vec![1, 1], vec![1]]]);
        match level.layout(2) {
            Err(LevelError::RaggedRow {
                room: 0,
                row: 1,
                found: 1,
                expected: 2,
            }) => {}
            other => panic!("unexpected layout result: {other:?}"),
        }
    }

    #[test]
    fn empty_levels_and_rooms_are_rejected() {
        assert!(matches!(
            LevelDescription::default().layout(2),
            Err(LevelError::NoRooms)
        ));
        assert!(matches!(
            LevelDescription::new(vec![vec![vec![1]], vec![]]).layout(2),
            Err(LevelError::EmptyRoom { room: 1 })
        ));
    }

    #[test]
    fn spawn_must_lie_in_the_first_room() {
        let level = LevelDescription::new(vec![vec![vec![1; 2]; 2]]).with_spawn(2, 0);
        assert!(matches!(
            level.layout(2),
            Err(LevelError::SpawnOutOfBounds { column: 2, row: 0 })
        ));
    }

    #[test]
    fn toml_levels_parse_with_overrides() {
        let level = LevelDescription::from_toml(
            r#"
spawn = [1, 0]

[[room]]
tiles = [[2, 99], [1, 29]]

[[tile]]
id = 99
kind = "door_button"
"#,
        )
        .expect("level parses");
        assert_eq!(level.spawn, Some([1, 0]));
        let tiles = level.layout(2).expect("valid level");
        assert_eq!(tiles.rooms()[0].kinds(), &[
            TileKind::Wall,
            TileKind::DoorButton,
            TileKind::Floor,
            TileKind::Door,
        ]);
    }

    #[test]
    fn unknown_ids_become_floor() {
        let level = LevelDescription::new(vec![vec![vec![250, 2]]]);
        let tiles = level.layout(2).expect("valid level");
        assert_eq!(tiles.rooms()[0].kinds(), &[TileKind::Floor, TileKind::Wall]);
    }

    #[test]
    fn demo_level_parses() {
        let level = LevelDescription::demo().expect("demo level parses");
        assert_eq!(level.rooms.len(), 3);
        assert!(level.layout(2).is_ok());
    }
}
