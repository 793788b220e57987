use crate::chunk_map::{ChunkMap, ChunkRange};
use crate::region::{Region, RegionError, RegionSet, RegionType};
use grovekeep_core::constants::*;
use grovekeep_core::math::{tile_to_world, world_to_tile};
use grovekeep_core::rect::{TileRect, WorldRect};
use grovekeep_core::types::{BlockType, ChunkCoord, ItemType, TileCoord};
use glam::{IVec2, Vec2};

pub type TileLayer = ChunkMap<u32>;
pub type BlockLayer = ChunkMap<BlockType>;
pub type ItemLayer = ChunkMap<ItemType>;

/// Which of the two item layers. Low renders below blocks, High above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemLayerKind {
    Low = 0,
    High = 1,
}

/// Selects one layer of any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRef {
    Tile(usize),
    Block(usize),
    Item(ItemLayerKind),
}

/// An item placed by the editor at a specific tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub id: String,
    pub item: ItemType,
    pub tile: TileCoord,
    pub amount: u32,
    pub respawns: bool,
    pub respawn_interval_secs: f32,
}

/// Persistent tile/block/item world. Durable source of truth for terrain and
/// obstacles; simulation entities only mirror parts of it.
#[derive(Debug, Clone)]
pub struct WorldMap {
    width: i32,
    height: i32,
    chunk_size: i32,
    tile_size: i32,
    pub tile_layers: Vec<TileLayer>,
    pub block_layers: Vec<BlockLayer>,
    pub item_layers: [ItemLayer; ITEM_LAYER_COUNT],
    regions: RegionSet,
    placed_items: Vec<PlacedItem>,
    dirty: bool,
}

impl Default for WorldMap {
    fn default() -> Self {
        Self::with_default_layers(
            DEFAULT_MAP_WIDTH,
            DEFAULT_MAP_HEIGHT,
            DEFAULT_CHUNK_SIZE,
            DEFAULT_TILE_SIZE,
        )
    }
}

impl WorldMap {
    /// Empty map with no tile or block layers and the two item layers.
    /// Non-positive chunk or tile sizes are raised to 1.
    pub fn new(width: i32, height: i32, chunk_size: i32, tile_size: i32) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            width: width.max(0),
            height: height.max(0),
            chunk_size,
            tile_size: tile_size.max(1),
            tile_layers: Vec::new(),
            block_layers: Vec::new(),
            item_layers: [
                ItemLayer::new("items_low", chunk_size, false),
                ItemLayer::new("items_high", chunk_size, false),
            ],
            regions: RegionSet::new(),
            placed_items: Vec::new(),
            dirty: false,
        }
    }

    /// Map with one "ground" tile layer and one colliding "blocks" layer.
    pub fn with_default_layers(width: i32, height: i32, chunk_size: i32, tile_size: i32) -> Self {
        let mut map = Self::new(width, height, chunk_size, tile_size);
        map.add_tile_layer("ground");
        map.add_block_layer("blocks", true);
        map.dirty = false;
        map
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Whole map in tile units.
    pub fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.width, self.height)
    }

    /// Whole map in world units.
    pub fn world_bounds(&self) -> WorldRect {
        self.bounds().to_world(self.tile_size)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Index of the new layer.
    pub fn add_tile_layer(&mut self, name: impl Into<String>) -> usize {
        self.tile_layers
            .push(TileLayer::new(name, self.chunk_size, false));
        self.dirty = true;
        self.tile_layers.len() - 1
    }

    /// Index of the new layer.
    pub fn add_block_layer(&mut self, name: impl Into<String>, is_collision: bool) -> usize {
        self.block_layers
            .push(BlockLayer::new(name, self.chunk_size, is_collision));
        self.dirty = true;
        self.block_layers.len() - 1
    }

    /// Indices of block layers that participate in collision.
    pub fn collision_layers(&self) -> Vec<usize> {
        self.block_layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_collision)
            .map(|(i, _)| i)
            .collect()
    }

    // -- cell access ------------------------------------------------------

    pub fn get_tile(&self, x: i32, y: i32, layer: usize) -> u32 {
        if !self.in_bounds(x, y) {
            return EMPTY_TILE;
        }
        self.tile_layers
            .get(layer)
            .map(|l| l.get(IVec2::new(x, y)))
            .unwrap_or(EMPTY_TILE)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile_id: u32, layer: usize) {
        if !self.in_bounds(x, y) {
            return;
        }
        if let Some(l) = self.tile_layers.get_mut(layer) {
            l.set(IVec2::new(x, y), tile_id);
            self.dirty = true;
        }
    }

    pub fn get_block(&self, x: i32, y: i32, layer: usize) -> BlockType {
        if !self.in_bounds(x, y) {
            return BlockType::Empty;
        }
        self.block_layers
            .get(layer)
            .map(|l| l.get(IVec2::new(x, y)))
            .unwrap_or_default()
    }

    pub fn set_block(&mut self, x: i32, y: i32, block: BlockType, layer: usize) {
        if !self.in_bounds(x, y) {
            return;
        }
        if let Some(l) = self.block_layers.get_mut(layer) {
            l.set(IVec2::new(x, y), block);
            self.dirty = true;
        }
    }

    pub fn get_item(&self, x: i32, y: i32, layer: ItemLayerKind) -> ItemType {
        if !self.in_bounds(x, y) {
            return ItemType::Empty;
        }
        self.item_layers[layer as usize].get(IVec2::new(x, y))
    }

    pub fn set_item(&mut self, x: i32, y: i32, item: ItemType, layer: ItemLayerKind) {
        if !self.in_bounds(x, y) {
            return;
        }
        self.item_layers[layer as usize].set(IVec2::new(x, y), item);
        self.dirty = true;
    }

    /// Whether any collision layer has a block at this tile.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.block_layers
            .iter()
            .enumerate()
            .any(|(i, l)| l.is_collision && !self.get_block(x, y, i).is_empty())
    }

    /// Set every in-bounds tile of a rectangle to one block.
    pub fn fill_blocks(&mut self, rect: TileRect, block: BlockType, layer: usize) {
        let rect = rect.intersection(&self.bounds());
        if let Some(l) = self.block_layers.get_mut(layer) {
            for tile in rect.tiles() {
                l.set(tile, block);
            }
            self.dirty = true;
        }
    }

    /// Drop one chunk of a layer. Returns true if it existed.
    pub fn clear_chunk(&mut self, layer: LayerRef, coord: ChunkCoord) -> bool {
        let removed = match layer {
            LayerRef::Tile(i) => self.tile_layers.get_mut(i).is_some_and(|l| l.remove_chunk(coord)),
            LayerRef::Block(i) => self.block_layers.get_mut(i).is_some_and(|l| l.remove_chunk(coord)),
            LayerRef::Item(k) => self.item_layers[k as usize].remove_chunk(coord),
        };
        self.dirty |= removed;
        removed
    }

    /// Allocated chunk count for one layer (0 for an unknown layer).
    pub fn chunk_count(&self, layer: LayerRef) -> usize {
        match layer {
            LayerRef::Tile(i) => self.tile_layers.get(i).map_or(0, |l| l.chunk_count()),
            LayerRef::Block(i) => self.block_layers.get(i).map_or(0, |l| l.chunk_count()),
            LayerRef::Item(k) => self.item_layers[k as usize].chunk_count(),
        }
    }

    /// Total allocated chunks across every layer.
    pub fn allocated_chunks(&self) -> usize {
        self.tile_layers.iter().map(|l| l.chunk_count()).sum::<usize>()
            + self.block_layers.iter().map(|l| l.chunk_count()).sum::<usize>()
            + self.item_layers.iter().map(|l| l.chunk_count()).sum::<usize>()
    }

    // -- range queries ----------------------------------------------------

    /// Non-empty blocks of one layer inside a tile rectangle (clamped to the map).
    /// Never allocates.
    pub fn blocks_in_tile_rect(&self, rect: TileRect, layer: usize) -> Vec<(TileCoord, BlockType)> {
        let Some(l) = self.block_layers.get(layer) else {
            return Vec::new();
        };
        l.filled_in(&rect.intersection(&self.bounds()))
    }

    /// Chunk range covering a world-space rectangle, clamped to the map.
    pub fn chunk_range(&self, world_rect: WorldRect) -> ChunkRange {
        let tiles = world_rect
            .to_tile_rect(self.tile_size)
            .intersection(&self.bounds());
        ChunkRange::covering(&tiles, self.chunk_size)
    }

    /// Coordinates of allocated chunks of a layer that intersect a world
    /// rectangle, sorted by (y, x). Never allocates.
    pub fn visible_chunks(&self, world_rect: WorldRect, layer: LayerRef) -> Vec<ChunkCoord> {
        let range = self.chunk_range(world_rect);
        if range.is_empty() {
            return Vec::new();
        }
        match layer {
            LayerRef::Tile(i) => self
                .tile_layers
                .get(i)
                .map(|l| l.chunks_in(range).iter().map(|c| c.coord).collect())
                .unwrap_or_default(),
            LayerRef::Block(i) => self
                .block_layers
                .get(i)
                .map(|l| l.chunks_in(range).iter().map(|c| c.coord).collect())
                .unwrap_or_default(),
            LayerRef::Item(k) => self.item_layers[k as usize]
                .chunks_in(range)
                .iter()
                .map(|c| c.coord)
                .collect(),
        }
    }

    // -- coordinates ------------------------------------------------------

    /// Top-left corner of a tile in world units.
    pub fn tile_to_world(&self, tx: i32, ty: i32) -> Vec2 {
        tile_to_world(IVec2::new(tx, ty), self.tile_size)
    }

    pub fn world_to_tile(&self, wx: f32, wy: f32) -> TileCoord {
        world_to_tile(Vec2::new(wx, wy), self.tile_size)
    }

    // -- regions ----------------------------------------------------------

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    pub fn regions_of_type(&self, kind: RegionType) -> Vec<&Region> {
        self.regions.of_type(kind).collect()
    }

    pub fn region_by_id(&self, id: &str) -> Option<&Region> {
        self.regions.by_id(id)
    }

    pub fn all_regions(&self) -> &[Region] {
        self.regions.all()
    }

    /// Add a region. Enforces a single PlayerSpawn and unique ids; marks the map dirty.
    pub fn add_region(&mut self, region: Region) -> Result<(), RegionError> {
        if self.bounds().intersection(&region.area).area() != region.area.area() {
            log::warn!("region '{}' extends past the map bounds", region.id);
        }
        self.regions.add(region)?;
        self.dirty = true;
        Ok(())
    }

    pub fn delete_region(&mut self, id: &str) -> Option<Region> {
        let removed = self.regions.remove(id);
        self.dirty |= removed.is_some();
        removed
    }

    // -- placed items -----------------------------------------------------

    pub fn placed_items(&self) -> &[PlacedItem] {
        &self.placed_items
    }

    /// Add a placed item, replacing any with the same id.
    pub fn add_placed_item(&mut self, item: PlacedItem) {
        match self.placed_items.iter_mut().find(|p| p.id == item.id) {
            Some(existing) => *existing = item,
            None => self.placed_items.push(item),
        }
        self.dirty = true;
    }

    pub fn remove_placed_item(&mut self, id: &str) -> Option<PlacedItem> {
        let idx = self.placed_items.iter().position(|p| p.id == id)?;
        self.dirty = true;
        Some(self.placed_items.remove(idx))
    }

    // -- persistence bookkeeping -----------------------------------------

    /// Whether the map changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map64() -> WorldMap {
        WorldMap::with_default_layers(64, 64, 32, 32)
    }

    #[test]
    fn test_unwritten_cells_read_empty_without_allocating() {
        let map = map64();
        for &(x, y) in &[(0, 0), (10, 10), (63, 63), (-1, 5), (64, 0), (1000, 1000)] {
            assert_eq!(map.get_tile(x, y, 0), EMPTY_TILE);
            assert_eq!(map.get_block(x, y, 0), BlockType::Empty);
            assert_eq!(map.get_item(x, y, ItemLayerKind::Low), ItemType::Empty);
            assert_eq!(map.get_item(x, y, ItemLayerKind::High), ItemType::Empty);
        }
        assert_eq!(map.allocated_chunks(), 0);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut map = map64();
        map.set_tile(5, 6, 17, 0);
        map.set_block(10, 10, BlockType::Wall, 0);
        map.set_item(63, 0, ItemType::Apple, ItemLayerKind::High);
        assert_eq!(map.get_tile(5, 6, 0), 17);
        assert_eq!(map.get_block(10, 10, 0), BlockType::Wall);
        assert_eq!(map.get_item(63, 0, ItemLayerKind::High), ItemType::Apple);
        assert_eq!(map.get_item(63, 0, ItemLayerKind::Low), ItemType::Empty);
        assert!(map.is_dirty());
    }

    #[test]
    fn test_out_of_bounds_writes_are_noops() {
        let mut map = map64();
        map.set_tile(-1, 0, 3, 0);
        map.set_block(64, 10, BlockType::Wall, 0);
        map.set_block(10, 10, BlockType::Wall, 5);
        map.set_item(0, 64, ItemType::Gold, ItemLayerKind::Low);
        assert_eq!(map.allocated_chunks(), 0);
        assert!(!map.is_dirty());
        assert_eq!(map.get_block(10, 10, 5), BlockType::Empty);
    }

    #[test]
    fn test_blocks_in_tile_rect() {
        let mut map = map64();
        map.set_block(10, 10, BlockType::Wall, 0);
        map.set_block(40, 40, BlockType::Rock, 0);
        let near = map.blocks_in_tile_rect(TileRect::new(0, 0, 21, 21), 0);
        assert_eq!(near, vec![(IVec2::new(10, 10), BlockType::Wall)]);

        let everything = map.blocks_in_tile_rect(TileRect::new(-100, -100, 500, 500), 0);
        assert_eq!(everything.len(), 2);
        assert!(map.blocks_in_tile_rect(TileRect::new(0, 0, 64, 64), 3).is_empty());
    }

    #[test]
    fn test_visible_chunks_only_lists_allocated() {
        let mut map = map64();
        map.set_tile(1, 1, 2, 0);
        map.set_tile(50, 50, 2, 0);
        let chunks_before = map.allocated_chunks();

        let view = WorldRect::new(Vec2::ZERO, Vec2::splat(64.0 * 32.0));
        assert_eq!(
            map.visible_chunks(view, LayerRef::Tile(0)),
            vec![IVec2::new(0, 0), IVec2::new(1, 1)]
        );

        let corner = WorldRect::new(Vec2::ZERO, Vec2::splat(100.0));
        assert_eq!(map.visible_chunks(corner, LayerRef::Tile(0)), vec![IVec2::new(0, 0)]);
        assert!(map.visible_chunks(corner, LayerRef::Block(0)).is_empty());
        assert_eq!(map.allocated_chunks(), chunks_before);
    }

    #[test]
    fn test_coordinate_conversion() {
        let map = map64();
        assert_eq!(map.tile_to_world(2, 3), Vec2::new(64.0, 96.0));
        assert_eq!(map.world_to_tile(64.0, 127.9), IVec2::new(2, 3));
    }

    #[test]
    fn test_fill_and_solidity() {
        let mut map = map64();
        let deco = map.add_block_layer("decor", false);
        map.fill_blocks(TileRect::new(60, 60, 10, 10), BlockType::Wall, 0);
        map.set_block(1, 1, BlockType::Crate, deco);
        assert!(map.is_solid(63, 63));
        assert!(!map.is_solid(1, 1), "non-collision layer never blocks");
        assert_eq!(map.blocks_in_tile_rect(map.bounds(), 0).len(), 16);
        assert_eq!(map.collision_layers(), vec![0]);
    }

    #[test]
    fn test_region_mutation_marks_dirty() {
        let mut map = map64();
        map.add_region(Region::new("p", RegionType::PlayerSpawn, TileRect::new(1, 1, 2, 2)))
            .expect("add");
        assert!(map.is_dirty());
        map.mark_clean();
        assert!(map
            .add_region(Region::new("q", RegionType::PlayerSpawn, TileRect::new(1, 1, 2, 2)))
            .is_err());
        assert!(!map.is_dirty(), "rejected add leaves map clean");
        assert!(map.delete_region("p").is_some());
        assert!(map.is_dirty());
        assert!(map.regions_of_type(RegionType::PlayerSpawn).is_empty());
    }

    #[test]
    fn test_placed_items_replace_by_id() {
        let mut map = map64();
        let item = PlacedItem {
            id: "apple_1".into(),
            item: ItemType::Apple,
            tile: IVec2::new(3, 3),
            amount: 1,
            respawns: true,
            respawn_interval_secs: 30.0,
        };
        map.add_placed_item(item.clone());
        map.add_placed_item(PlacedItem { amount: 4, ..item });
        assert_eq!(map.placed_items().len(), 1);
        assert_eq!(map.placed_items()[0].amount, 4);
        assert!(map.remove_placed_item("apple_1").is_some());
        assert!(map.remove_placed_item("apple_1").is_none());
    }
}
