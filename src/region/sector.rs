use std::io::{
	Read, Write,
	SeekFrom,
};

use crate::NbtResult;
use crate::ioext::{Readable, ReadExt, Seekable, Writable, WriteExt};

/// One entry of the sector offset table. The 24-bit sector offset and
/// the 8-bit sector count are packed the way the file stores them,
/// |offset(3)|size(1)|, which also keeps the in-memory table at 4KiB.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct RegionSector(u32);

impl RegionSector {
	/// Provide offset and size in 4KiB sectors. Offsets wider than the
	/// 24 bits the table can hold are truncated.
	pub fn new(offset: u32, size: u8) -> Self {
		Self(((offset & 0x00FF_FFFF) << 8) | size as u32)
	}

	/// Creates a new empty RegionSector.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// The 4KiB sector offset.
	/// Multiply this by `4096` to get the seek offset.
	pub fn sector_offset(&self) -> u64 {
		(self.0 >> 8) as u64
	}

	/// The 4KiB sector offset that marks the end of this sector and the
	/// start of the next.
	pub fn sector_end_offset(&self) -> u64 {
		self.sector_offset() + self.sector_count()
	}

	/// The 4KiB sector count.
	pub fn sector_count(&self) -> u64 {
		(self.0 & 0xFF) as u64
	}

	/// The offset in bytes that this sector begins at in the region file.
	pub fn offset(&self) -> u64 {
		self.sector_offset() * 4096
	}

	/// The offset in bytes that this sector ends at in the region file.
	pub fn end_offset(&self) -> u64 {
		self.sector_end_offset() * 4096
	}

	/// The size in bytes that this sector occupies.
	pub fn size(&self) -> u64 {
		self.sector_count() * 4096
	}

	/// Determines if this is an "empty" sector.
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// Tests if two sectors overlap. Sectors of size zero never overlap
	/// anything, even one starting at the same offset.
	pub fn intersects(self, rhs: Self) -> bool {
		!(self.sector_end_offset() <= rhs.sector_offset()
			|| rhs.sector_end_offset() <= self.sector_offset())
	}
}

impl Readable for RegionSector {
	fn read_from<R: Read>(reader: &mut R) -> NbtResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for RegionSector {
	fn write_to<W: Write>(&self, writer: &mut W) -> NbtResult<usize> {
		writer.write_value(self.0)
	}
}

impl Seekable for RegionSector {
	/// A [SeekFrom] that points to this [RegionSector].
	fn seeker(&self) -> SeekFrom {
		SeekFrom::Start(self.offset())
	}
}
