//! # Block Type Module
//!
//! The materials a block can be made of, their compact integer encoding and the
//! flat colour each material is drawn with.

use cgmath::Vector3;
use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates every block material.
///
/// The `FromPrimitive` derive allows conversion back from the compact integer encoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Inactive blocks usually carry this material.
    #[default]
    AIR,

    /// Surface layer of generated terrain.
    GRASS,

    /// The few layers directly below the surface.
    DIRT,

    /// Everything deeper than the dirt layers.
    STONE,
}

impl BlockType {
    /// Converts the compact encoding back into a `BlockType`.
    ///
    /// # Returns
    /// `None` when `btype` does not name a material.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Picks a random solid material (never `AIR`).
    pub fn get_random_type() -> Self {
        match fastrand::u8(1..4) {
            1 => BlockType::GRASS,
            2 => BlockType::DIRT,
            _ => BlockType::STONE,
        }
    }

    /// The RGB colour (0..1 per channel) used for every face of this material.
    pub fn color(self) -> Vector3<f32> {
        match self {
            BlockType::AIR => Vector3::new(0.0, 0.0, 0.0),
            BlockType::GRASS => Vector3::new(36.0 / 255.0, 130.0 / 255.0, 45.0 / 255.0),
            BlockType::DIRT => Vector3::new(127.0 / 255.0, 91.0 / 255.0, 40.0 / 255.0),
            BlockType::STONE => Vector3::new(0.5, 0.5, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_encoding_round_trips() {
        for block_type in [
            BlockType::AIR,
            BlockType::GRASS,
            BlockType::DIRT,
            BlockType::STONE,
        ] {
            assert_eq!(
                BlockType::get_block_type_from_int(block_type as BlockTypeSize),
                Some(block_type)
            );
        }
        assert_eq!(BlockType::get_block_type_from_int(200), None);
    }

    #[test]
    fn random_type_is_solid() {
        for _ in 0..64 {
            assert_ne!(BlockType::get_random_type(), BlockType::AIR);
        }
    }
}
