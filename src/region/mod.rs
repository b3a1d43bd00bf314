//! Module for creating, reading, and modifying Minecraft region files.

pub mod coord;
pub use coord::RegionCoord;
pub mod sector;
pub use sector::RegionSector;
pub mod timestamp;
pub use timestamp::Timestamp;
pub mod file;
pub use file::{ChunkData, RegionFile};

pub use crate::nbt::compression::CompressionScheme;

/*	╭──────────────────────────────────────────────────────────────────────────────╮
	│ How do Region Files work?                                                    │
	╰──────────────────────────────────────────────────────────────────────────────╯
	A region file stores up to 32x32 chunks and starts with an 8KiB header
	holding two tables of 1024 32-bit entries each.

	The first table holds sector offsets. Each entry packs two values into
	4 bytes, laid out |offset(3)|size(1)|: a big-endian 24-bit offset and an
	8-bit size, both counted in 4KiB sectors. Multiply either by 4096 to get
	file positions. An entry of zero means the chunk is absent.

	The second table holds 32-bit Unix timestamps, the last modification
	time of each chunk.

	A present chunk's data sits at its sector offset: a 32-bit big-endian
	length, one byte naming the compression scheme (1 for GZip, 2 for ZLib,
	3 for uncompressed), then (length - 1) bytes of compressed NBT. The
	length counts the scheme byte, which is why the subtraction shows up
	all over this module. Whatever space is left before the next sector
	boundary is padding.

	The file's total size must be a multiple of 4096 or Minecraft will
	consider the region corrupted.
*/

/// Tests if a value is a multiple of 4096.
pub const fn is_multiple_of_4096(n: u64) -> bool {
	n % 4096 == 0
}

/// Counts the number of 4KiB sectors required to accomodate `size` bytes.
pub const fn required_sectors(size: u32) -> u32 {
	size.div_ceil(4096)
}

/// How many zero bytes bring `size` up to the next 4KiB boundary.
/// A size already on a boundary needs none.
pub const fn pad_size(size: u64) -> u64 {
	size.next_multiple_of(4096) - size
}

/// Pulls the region position out of a file name following the
/// `r.<x>.<z>.mca` convention. Anything that doesn't match yields None.
pub fn region_position_from_name(name: &str) -> Option<(i32, i32)> {
	let middle = name.strip_prefix("r.")?.strip_suffix(".mca")?;
	let (x, z) = middle.split_once('.')?;
	Some((x.parse().ok()?, z.parse().ok()?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sector_math() {
		assert_eq!(required_sectors(0), 0);
		assert_eq!(required_sectors(5), 1);
		assert_eq!(required_sectors(4096), 1);
		assert_eq!(required_sectors(12289), 4);

		assert_eq!(pad_size(0), 0);
		assert_eq!(pad_size(10), 4086);
		assert_eq!(pad_size(8192), 0);
		assert_eq!(pad_size(8193), 4095);

		// A padded size always lands on a boundary.
		for size in [1u64, 5, 4095, 4096, 4097, 10_000] {
			assert!(is_multiple_of_4096(size + pad_size(size)));
		}
	}

	#[test]
	fn position_parsing() {
		assert_eq!(region_position_from_name("r.0.0.mca"), Some((0, 0)));
		assert_eq!(region_position_from_name("r.-3.12.mca"), Some((-3, 12)));
		assert_eq!(region_position_from_name("r.1.2.mcb"), None);
		assert_eq!(region_position_from_name("region.1.2.mca"), None);
		assert_eq!(region_position_from_name("r.one.2.mca"), None);
		assert_eq!(region_position_from_name("r..mca"), None);
	}
}
