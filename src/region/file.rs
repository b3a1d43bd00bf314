use std::io::{
	Read, Write,
	Seek, SeekFrom,
};

use crate::{NbtError, NbtResult};
use crate::ioext::{Readable, ReadExt, Seekable, WriteExt};
use crate::progress::Monitor;
use crate::nbt::compression::CompressionScheme;
use crate::nbt::decode::{read_nbt, read_nbt_ranged};
use crate::nbt::encode::write_nbt;
use crate::nbt::tag::NbtNode;

use super::{
	coord::RegionCoord,
	sector::RegionSector,
	timestamp::Timestamp,
	region_position_from_name,
	required_sectors, pad_size,
};

/// One occupied chunk slot: the compression-type byte the chunk was
/// framed with, and the compressed NBT blob. The scheme byte is kept
/// verbatim even when it names a scheme this crate doesn't know;
/// decoding sniffs the actual framing anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkData {
	pub scheme: u8,
	pub data: Vec<u8>,
}

/// An in-memory region: 1024 chunk slots, their timestamps, and the
/// region position when it is known from the file name.
///
/// Reading slurps every present chunk's compressed blob; chunks only
/// pass through the NBT decoder when asked for.
pub struct RegionFile {
	chunks: Vec<Option<ChunkData>>,
	timestamps: Vec<Timestamp>,
	position: Option<(i32, i32)>,
}

impl Default for RegionFile {
	fn default() -> Self {
		Self::new()
	}
}

impl RegionFile {
	pub fn new() -> Self {
		Self {
			chunks: vec![None; 1024],
			timestamps: vec![Timestamp::default(); 1024],
			position: None,
		}
	}

	/// A fresh region whose position is parsed from a `r.<x>.<z>.mca`
	/// file name, when it matches.
	pub fn named(name: &str) -> Self {
		Self {
			position: region_position_from_name(name),
			..Self::new()
		}
	}

	pub fn position(&self) -> Option<(i32, i32)> {
		self.position
	}

	pub fn set_position(&mut self, x: i32, z: i32) {
		self.position = Some((x, z));
	}

	/// Reads a region file. With `skip_chunk_errors` set, a chunk whose
	/// framing is broken leaves its slot empty; otherwise the whole
	/// read fails.
	pub fn read_from<R: Read + Seek>(reader: &mut R, skip_chunk_errors: bool) -> NbtResult<Self> {
		let file_len = reader.seek(SeekFrom::End(0))?;
		if file_len < 8192 {
			return Err(NbtError::BadMca("header is shorter than 8192 bytes"));
		}
		reader.seek(SeekFrom::Start(0))?;
		let mut sectors = Vec::with_capacity(1024);
		for _ in 0..1024 {
			sectors.push(RegionSector::read_from(reader)?);
		}
		let mut timestamps = Vec::with_capacity(1024);
		for _ in 0..1024 {
			timestamps.push(Timestamp::read_from(reader)?);
		}
		let mut chunks: Vec<Option<ChunkData>> = vec![None; 1024];
		for (index, sector) in sectors.iter().enumerate() {
			if sector.is_empty() {
				continue;
			}
			match read_chunk(reader, *sector, file_len) {
				Ok(chunk) => chunks[index] = chunk,
				Err(_) if skip_chunk_errors => chunks[index] = None,
				Err(err) => return Err(err),
			}
		}
		Ok(Self {
			chunks,
			timestamps,
			position: None,
		})
	}

	/// As [RegionFile::read_from], taking the region position from the
	/// file name.
	pub fn read_named<R: Read + Seek>(
		reader: &mut R,
		name: &str,
		skip_chunk_errors: bool,
	) -> NbtResult<Self> {
		let mut region = Self::read_from(reader, skip_chunk_errors)?;
		region.position = region_position_from_name(name);
		Ok(region)
	}

	/// Serialises the region. Chunks are laid out in slot order starting
	/// at sector 2, each zero-padded to its sector boundary, and the
	/// header tables are rewritten last. The resulting stream length is
	/// always a multiple of 4096.
	pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> NbtResult<()> {
		let mut sectors = vec![RegionSector::empty(); 1024];
		writer.seek(SeekFrom::Start(0))?;
		writer.write_zeroes(8192)?;
		let mut cursor: u32 = 2;
		for (index, slot) in self.chunks.iter().enumerate() {
			let Some(chunk) = slot else {
				continue;
			};
			// Four length bytes, one scheme byte, then the blob.
			let framed_len = chunk.data.len() as u64 + 5;
			let count = required_sectors(framed_len as u32);
			if count > 255 {
				return Err(NbtError::ChunkTooLarge);
			}
			writer.seek(SeekFrom::Start(cursor as u64 * 4096))?;
			writer.write_value((chunk.data.len() + 1) as u32)?;
			writer.write_value(chunk.scheme)?;
			writer.write_all(&chunk.data)?;
			writer.write_zeroes(pad_size(framed_len))?;
			sectors[index] = RegionSector::new(cursor, count as u8);
			cursor += count;
		}
		writer.seek(SeekFrom::Start(0))?;
		for sector in &sectors {
			writer.write_value(*sector)?;
		}
		for timestamp in &self.timestamps {
			writer.write_value(*timestamp)?;
		}
		writer.flush()?;
		Ok(())
	}

	pub fn chunk<C: Into<RegionCoord>>(&self, coord: C) -> Option<&ChunkData> {
		self.chunks[coord.into().index()].as_ref()
	}

	/// Stores a pre-compressed blob in a slot, replacing whatever was
	/// there.
	pub fn set_chunk_raw<C: Into<RegionCoord>>(&mut self, coord: C, scheme: u8, data: Vec<u8>) {
		self.chunks[coord.into().index()] = Some(ChunkData {
			scheme,
			data,
		});
	}

	/// Encodes a tag tree with ZLib (the in-world default) into a slot.
	pub fn set_chunk_nbt<C: Into<RegionCoord>>(&mut self, coord: C, node: &NbtNode) -> NbtResult<()> {
		let data = write_nbt(node, CompressionScheme::ZLib)?;
		self.set_chunk_raw(coord, CompressionScheme::ZLib.value(), data);
		Ok(())
	}

	pub fn remove_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> Option<ChunkData> {
		self.chunks[coord.into().index()].take()
	}

	pub fn timestamp<C: Into<RegionCoord>>(&self, coord: C) -> Timestamp {
		self.timestamps[coord.into().index()]
	}

	pub fn set_timestamp<C: Into<RegionCoord>, T: Into<Timestamp>>(&mut self, coord: C, timestamp: T) {
		self.timestamps[coord.into().index()] = timestamp.into();
	}

	/// How many slots hold a chunk.
	pub fn chunk_count(&self) -> usize {
		self.chunks.iter().filter(|slot| slot.is_some()).count()
	}

	/// Decodes the chunk in one slot, if present.
	pub fn read_chunk_nbt<C: Into<RegionCoord>>(&self, coord: C) -> NbtResult<Option<NbtNode>> {
		match self.chunk(coord) {
			None => Ok(None),
			Some(chunk) => Ok(Some(read_nbt(&chunk.data)?)),
		}
	}

	/// Decodes every present chunk, subdividing the monitor's progress
	/// range across them. A chunk that fails to decode yields an empty
	/// slot and bumps the failure count; only cancellation aborts the
	/// sweep.
	pub fn parse_all(&self, monitor: &mut Monitor) -> NbtResult<(Vec<Option<NbtNode>>, usize)> {
		let present = self.chunk_count().max(1);
		let mut trees: Vec<Option<NbtNode>> = Vec::with_capacity(1024);
		trees.resize(1024, None);
		let mut failures = 0;
		let mut visited = 0;
		for (index, slot) in self.chunks.iter().enumerate() {
			let Some(chunk) = slot else {
				continue;
			};
			let min = (visited * 100 / present) as u8;
			let max = ((visited + 1) * 100 / present) as u8;
			visited += 1;
			match read_nbt_ranged(&chunk.data, monitor, min, max) {
				Ok(parsed) => trees[index] = Some(parsed.root),
				Err(NbtError::Cancelled) => return Err(NbtError::Cancelled),
				Err(_) => failures += 1,
			}
		}
		Ok((trees, failures))
	}
}

/// Reads one chunk's framing and blob. The framing must fit inside the
/// file; a zero length marks a slot that is allocated but holds nothing.
fn read_chunk<R: Read + Seek>(
	reader: &mut R,
	sector: RegionSector,
	file_len: u64,
) -> NbtResult<Option<ChunkData>> {
	let start = sector.offset();
	if start + 4 > file_len {
		return Err(NbtError::BadMca("chunk offset points past the end of the file"));
	}
	reader.seek(sector.seeker())?;
	let length = reader.read_value::<u32>()? as u64;
	if length == 0 {
		return Ok(None);
	}
	if start + 4 + length > file_len {
		return Err(NbtError::BadMca("chunk length runs past the end of the file"));
	}
	let scheme = reader.read_value::<u8>()?;
	let mut data = vec![0u8; (length - 1) as usize];
	reader.read_exact(&mut data)?;
	Ok(Some(ChunkData {
		scheme,
		data,
	}))
}
