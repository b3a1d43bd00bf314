//! Reading, writing, and editing NBT tag trees.

pub mod tag;
pub mod buffer;
pub mod mutf8;
pub mod compression;
pub mod decode;
pub mod encode;
pub mod macros;

pub use tag::{NbtNode, Tag, TagID, ListTag};
pub use compression::CompressionScheme;
pub use decode::{read_nbt, read_nbt_full, ParsedNbt};
pub use encode::{write_nbt, write_nbt_with, write_nbt_to};
