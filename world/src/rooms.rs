//! Room grids and the tile-to-world coordinate system.

use jungle_ruins_core::{
    LocalTile, RoomId, TileKind, TilePosition, WorldPoint, WorldRect, TILE_SIZE,
};

/// Rectangular tile matrix placed in world space by an offset in tile units.
///
/// Row zero is the top row of the matrix and sits at the highest world y
/// inside the room.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    columns: u32,
    rows: u32,
    offset_x: i32,
    offset_y: i32,
    tiles: Vec<TileKind>,
}

impl Room {
    /// Creates a room from row-major kinds. `tiles.len()` must equal `columns * rows`.
    pub(crate) fn new(
        columns: u32,
        rows: u32,
        offset_x: i32,
        offset_y: i32,
        tiles: Vec<TileKind>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), columns as usize * rows as usize);
        Self {
            columns,
            rows,
            offset_x,
            offset_y,
            tiles,
        }
    }

    /// Number of columns in the room.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the room.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Horizontal offset of the room in tile units.
    #[must_use]
    pub const fn offset_x(&self) -> i32 {
        self.offset_x
    }

    /// Vertical offset of the room in tile units.
    #[must_use]
    pub const fn offset_y(&self) -> i32 {
        self.offset_y
    }

    /// World-space rectangle covered by the room.
    #[must_use]
    pub fn bounds(&self) -> WorldRect {
        WorldRect::new(
            self.offset_x as f32 * TILE_SIZE,
            self.offset_y as f32 * TILE_SIZE,
            self.columns as f32 * TILE_SIZE,
            self.rows as f32 * TILE_SIZE,
        )
    }

    /// Kind stored at `tile`, or `None` outside the matrix.
    #[must_use]
    pub fn kind(&self, tile: LocalTile) -> Option<TileKind> {
        self.index(tile).and_then(|index| self.tiles.get(index).copied())
    }

    /// Tile kinds in row-major order.
    #[must_use]
    pub fn kinds(&self) -> &[TileKind] {
        &self.tiles
    }

    pub(crate) fn set_kind(&mut self, tile: LocalTile, kind: TileKind) -> bool {
        let Some(slot) = self.index(tile).and_then(|index| self.tiles.get_mut(index)) else {
            return false;
        };
        *slot = kind;
        true
    }

    /// Lower-left corner of the cell at signed local coordinates.
    ///
    /// Coordinates outside the matrix are extrapolated, which lets callers
    /// address landing spots next to the room edge.
    #[must_use]
    pub fn origin_of(&self, column: i64, row: i64) -> WorldPoint {
        let x = (column + i64::from(self.offset_x)) as f32 * TILE_SIZE;
        let y = (i64::from(self.rows) - row - 1 + i64::from(self.offset_y)) as f32 * TILE_SIZE;
        WorldPoint::new(x, y)
    }

    /// Lower-left corner of `tile` in world space.
    #[must_use]
    pub fn tile_origin(&self, tile: LocalTile) -> WorldPoint {
        self.origin_of(i64::from(tile.column()), i64::from(tile.row()))
    }

    /// Resolves the cell containing `point`, if the room covers it.
    #[must_use]
    pub fn locate(&self, point: WorldPoint) -> Option<LocalTile> {
        let local_x = point.x() / TILE_SIZE - self.offset_x as f32;
        let local_y = point.y() / TILE_SIZE - self.offset_y as f32;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }

        let column = local_x.floor() as u32;
        let from_bottom = local_y.floor() as u32;
        if column >= self.columns || from_bottom >= self.rows {
            return None;
        }
        Some(LocalTile::new(column, self.rows - from_bottom - 1))
    }

    fn index(&self, tile: LocalTile) -> Option<usize> {
        if tile.column() >= self.columns || tile.row() >= self.rows {
            return None;
        }
        Some(tile.row() as usize * self.columns as usize + tile.column() as usize)
    }

    fn cells(&self) -> impl Iterator<Item = LocalTile> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| LocalTile::new(column, row))
        })
    }
}

/// Every room of a level, addressed by registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileWorld {
    rooms: Vec<Room>,
}

impl TileWorld {
    pub(crate) fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Rooms in registration order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Looks up a room by identifier.
    #[must_use]
    pub fn room(&self, room: RoomId) -> Option<&Room> {
        self.rooms.get(room.get())
    }

    /// Kind at `position`, or [`TileKind::Empty`] when it addresses no cell.
    #[must_use]
    pub fn kind_at(&self, position: TilePosition) -> TileKind {
        self.room(position.room())
            .and_then(|room| room.kind(position.tile()))
            .unwrap_or(TileKind::Empty)
    }

    /// Overwrites the kind at `position`. Returns `false` when no such cell exists.
    pub(crate) fn set_kind(&mut self, position: TilePosition, kind: TileKind) -> bool {
        self.rooms
            .get_mut(position.room().get())
            .map_or(false, |room| room.set_kind(position.tile(), kind))
    }

    /// Lower-left corner of the cell at `position`.
    #[must_use]
    pub fn tile_origin(&self, position: TilePosition) -> Option<WorldPoint> {
        self.room(position.room())
            .filter(|room| room.index(position.tile()).is_some())
            .map(|room| room.tile_origin(position.tile()))
    }

    /// World rectangle of the cell at `position`.
    #[must_use]
    pub fn tile_rect(&self, position: TilePosition) -> Option<WorldRect> {
        self.tile_origin(position).map(WorldRect::tile)
    }

    /// Resolves `point` against each room in registration order.
    #[must_use]
    pub fn locate(&self, point: WorldPoint) -> Option<TilePosition> {
        self.rooms.iter().enumerate().find_map(|(index, room)| {
            room.locate(point)
                .map(|tile| TilePosition::new(RoomId::new(index), tile))
        })
    }

    /// Kind of the cell containing `point`, or [`TileKind::Empty`] outside every room.
    #[must_use]
    pub fn tile_at(&self, point: WorldPoint) -> TileKind {
        self.locate(point)
            .map_or(TileKind::Empty, |position| self.kind_at(position))
    }

    /// Collects every cell whose rectangle overlaps `rect`, room by room in row-major order.
    pub fn overlapping(&self, rect: &WorldRect, out: &mut Vec<TilePosition>) {
        for (index, room) in self.rooms.iter().enumerate() {
            let bounds = room.bounds();
            if room.columns == 0 || room.rows == 0 || !bounds.overlaps(rect) {
                continue;
            }

            let columns = i64::from(room.columns);
            let rows = i64::from(room.rows);
            let cell = |offset: f32| (offset / TILE_SIZE).floor() as i64;
            let first_column = (cell(rect.x() - bounds.x()) - 1).clamp(0, columns - 1);
            let last_column = (cell(rect.right() - bounds.x()) + 1).clamp(0, columns - 1);
            let lowest = (cell(rect.y() - bounds.y()) - 1).clamp(0, rows - 1);
            let highest = (cell(rect.top() - bounds.y()) + 1).clamp(0, rows - 1);
            let first_row = rows - 1 - highest;
            let last_row = rows - 1 - lowest;

            for row in first_row..=last_row {
                for column in first_column..=last_column {
                    let tile = LocalTile::new(column as u32, row as u32);
                    if WorldRect::tile(room.tile_origin(tile)).overlaps(rect) {
                        out.push(TilePosition::new(RoomId::new(index), tile));
                    }
                }
            }
        }
    }

    /// First cell of `kind` inside `room`, scanning row-major from the top.
    #[must_use]
    pub fn find_first(&self, room: RoomId, kind: TileKind) -> Option<TilePosition> {
        let target = self.room(room)?;
        target
            .cells()
            .find(|tile| target.kind(*tile) == Some(kind))
            .map(|tile| TilePosition::new(room, tile))
    }

    /// Every cell of `kind` across all rooms, room by room in row-major order.
    #[must_use]
    pub fn positions_of(&self, kind: TileKind) -> Vec<TilePosition> {
        self.positions()
            .filter(|position| self.kind_at(*position) == kind)
            .collect()
    }

    /// Every cell of every room, room by room in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = TilePosition> + '_ {
        self.rooms.iter().enumerate().flat_map(|(index, room)| {
            room.cells()
                .map(move |tile| TilePosition::new(RoomId::new(index), tile))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> TileWorld {
        let mut kinds = vec![TileKind::Floor; 4 * 3];
        kinds[0] = TileKind::Wall;
        kinds[11] = TileKind::Door;
        TileWorld::new(vec![
            Room::new(4, 3, 0, 0, kinds),
            Room::new(2, 2, 6, 0, vec![TileKind::Wall; 4]),
        ])
    }

    fn position(room: usize, column: u32, row: u32) -> TilePosition {
        TilePosition::new(RoomId::new(room), LocalTile::new(column, row))
    }

    #[test]
    fn top_row_maps_to_highest_world_y() {
        let world = world();
        assert_eq!(
            world.tile_origin(position(0, 0, 0)),
            Some(WorldPoint::new(0.0, 64.0))
        );
        assert_eq!(
            world.tile_origin(position(0, 3, 2)),
            Some(WorldPoint::new(96.0, 0.0))
        );
        assert_eq!(
            world.tile_origin(position(1, 1, 0)),
            Some(WorldPoint::new(224.0, 32.0))
        );
    }

    #[test]
    fn locate_inverts_tile_origin() {
        let world = world();
        for candidate in world.positions().collect::<Vec<_>>() {
            let origin = world.tile_origin(candidate).expect("cell exists");
            let inside = WorldPoint::new(origin.x() + 5.0, origin.y() + 5.0);
            assert_eq!(world.locate(inside), Some(candidate));
        }
    }

    #[test]
    fn points_outside_rooms_are_empty() {
        let world = world();
        assert_eq!(world.tile_at(WorldPoint::new(150.0, 10.0)), TileKind::Empty);
        assert_eq!(world.tile_at(WorldPoint::new(-1.0, 10.0)), TileKind::Empty);
        assert_eq!(world.tile_at(WorldPoint::new(5.0, 70.0)), TileKind::Wall);
        assert_eq!(world.kind_at(position(3, 0, 0)), TileKind::Empty);
        assert_eq!(world.kind_at(position(0, 9, 0)), TileKind::Empty);
    }

    #[test]
    fn overlapping_excludes_edge_neighbours() {
        let world = world();
        let mut hits = Vec::new();
        world.overlapping(&WorldRect::new(32.0, 32.0, 32.0, 32.0), &mut hits);
        assert_eq!(hits, vec![position(0, 1, 1)]);

        hits.clear();
        world.overlapping(&WorldRect::new(40.0, 20.0, 32.0, 24.0), &mut hits);
        assert_eq!(
            hits,
            vec![
                position(0, 1, 1),
                position(0, 2, 1),
                position(0, 1, 2),
                position(0, 2, 2),
            ]
        );
    }

    #[test]
    fn find_first_scans_row_major() {
        let mut world = world();
        assert!(world.set_kind(position(0, 2, 0), TileKind::Door));
        assert_eq!(
            world.find_first(RoomId::new(0), TileKind::Door),
            Some(position(0, 2, 0))
        );
        assert_eq!(
            world.positions_of(TileKind::Door),
            vec![position(0, 2, 0), position(0, 3, 2)]
        );
        assert!(!world.set_kind(position(0, 4, 0), TileKind::Door));
    }
}
