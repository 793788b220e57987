use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Tile coordinate in tile-space. Signed so future maps may extend past the origin.
pub type TileCoord = IVec2;

/// Chunk coordinate in chunk-space (each unit = chunk_size tiles).
pub type ChunkCoord = IVec2;

/// Closed set of block kinds stored in block layers. 0 = empty.
///
/// The discriminant is the on-disk grid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Empty = 0,
    Wall = 1,
    Crate = 2,
    Tree = 3,
    Rock = 4,
    GoldOre = 5,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Empty,
        BlockType::Wall,
        BlockType::Crate,
        BlockType::Tree,
        BlockType::Rock,
        BlockType::GoldOre,
    ];

    /// Decode a grid value. Unknown values return None.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_empty(self) -> bool {
        self == BlockType::Empty
    }

    /// Item dropped when a block of this kind is broken, if any.
    pub fn drop_item(self) -> Option<ItemType> {
        match self {
            BlockType::Crate | BlockType::Tree => Some(ItemType::Wood),
            BlockType::Rock => Some(ItemType::Stone),
            BlockType::GoldOre => Some(ItemType::Gold),
            BlockType::Empty | BlockType::Wall => None,
        }
    }
}

/// Closed set of item kinds stored in the two item layers and in placed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ItemType {
    #[default]
    Empty = 0,
    Wood = 1,
    Stone = 2,
    Gold = 3,
    Apple = 4,
    Mushroom = 5,
    Torch = 6,
}

impl ItemType {
    pub const ALL: [ItemType; 7] = [
        ItemType::Empty,
        ItemType::Wood,
        ItemType::Stone,
        ItemType::Gold,
        ItemType::Apple,
        ItemType::Mushroom,
        ItemType::Torch,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_empty(self) -> bool {
        self == ItemType::Empty
    }

    /// Lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Empty => "empty",
            ItemType::Wood => "wood",
            ItemType::Stone => "stone",
            ItemType::Gold => "gold",
            ItemType::Apple => "apple",
            ItemType::Mushroom => "mushroom",
            ItemType::Torch => "torch",
        }
    }

    /// Parse the lowercase name used in region metadata.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_grid_values() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_u8(block.as_u8()), Some(block));
        }
        assert_eq!(BlockType::from_u8(200), None);
        assert!(BlockType::default().is_empty());
    }

    #[test]
    fn test_item_names_parse() {
        assert_eq!(ItemType::from_name("apple"), Some(ItemType::Apple));
        assert_eq!(ItemType::from_name("Apple"), None);
        assert_eq!(ItemType::from_u8(6), Some(ItemType::Torch));
        assert_eq!(ItemType::from_u8(7), None);
    }

    #[test]
    fn test_drops() {
        assert_eq!(BlockType::Tree.drop_item(), Some(ItemType::Wood));
        assert_eq!(BlockType::Wall.drop_item(), None);
    }
}
