//! Parsing NBT documents into tag trees.
//!
//! The entry points take a whole document as bytes, route it through
//! the compression gateway, and run a recursive descent over the
//! decompressed buffer.

use std::sync::Arc;

use crate::{NbtError, NbtResult};
use crate::progress::{messages, Messages, Monitor};
use crate::nbt::buffer::ByteReader;
use crate::nbt::compression::decompress_with;
use crate::nbt::mutf8;
use crate::nbt::tag::{ListTag, NbtNode, Tag, TagID};

/// A successful parse: the tree, plus how many bytes the outermost tag
/// left unread. A non-zero leftover usually means a corrupted file, but
/// the tree that was parsed is still fully usable.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNbt {
	pub root: NbtNode,
	pub leftover: usize,
}

/// Parses a (possibly compressed) NBT document.
/// Fails with [NbtError::LeftoverData] if the document keeps going
/// after the outermost tag; use [read_nbt_full] to get the tree anyway.
pub fn read_nbt(data: &[u8]) -> NbtResult<NbtNode> {
	let parsed = read_nbt_full(data, &mut Monitor::new())?;
	if parsed.leftover != 0 {
		return Err(NbtError::LeftoverData);
	}
	Ok(parsed.root)
}

/// Parses a (possibly compressed) NBT document, reporting progress and
/// honouring cancellation through `monitor`. Leftover bytes are counted
/// rather than treated as fatal.
pub fn read_nbt_full(data: &[u8], monitor: &mut Monitor) -> NbtResult<ParsedNbt> {
	read_nbt_ranged(data, monitor, 0, 100)
}

/// As [read_nbt_full], but progress is scaled into `min..=max` so a
/// caller parsing many documents can subdivide one progress bar.
pub(crate) fn read_nbt_ranged(
	data: &[u8],
	monitor: &mut Monitor,
	min: u8,
	max: u8,
) -> NbtResult<ParsedNbt> {
	let buffer = decompress_with(data, monitor)?;
	let msgs = messages();
	let mut parser = Parser {
		reader: ByteReader::new(&buffer),
		monitor,
		min: min as usize,
		max: max as usize,
		msgs: Arc::clone(&msgs),
	};
	let id_byte = parser.reader.read_u8()?;
	let id = TagID::from_u8(id_byte)
		.filter(|id| *id != TagID::End)
		.ok_or(NbtError::BadTag(id_byte))?;
	let root = parser.parse_tag(id, false)?;
	let leftover = parser.reader.remaining();
	parser.monitor.report_now(max, &msgs.parse_finished);
	Ok(ParsedNbt {
		root,
		leftover,
	})
}

struct Parser<'a, 'm, 't> {
	reader: ByteReader<'a>,
	monitor: &'m mut Monitor<'t>,
	min: usize,
	max: usize,
	msgs: Arc<Messages>,
}

impl Parser<'_, '_, '_> {
	/// Polled on entry to every tag: cancellation first, then a
	/// throttled progress update scaled by the cursor position.
	fn observe(&mut self) -> NbtResult<()> {
		self.monitor.ensure_not_cancelled()?;
		if self.reader.len() > 0 {
			let span = self.max.saturating_sub(self.min);
			let percent = self.min + self.reader.position() * span / self.reader.len();
			self.monitor.report(percent as u8, &self.msgs.parsing);
		}
		Ok(())
	}

	fn parse_tag(&mut self, id: TagID, skip_name: bool) -> NbtResult<NbtNode> {
		self.observe()?;
		let name = if skip_name {
			None
		} else {
			self.read_key()?
		};
		let tag = self.parse_payload(id)?;
		Ok(NbtNode {
			name,
			tag,
		})
	}

	fn read_key(&mut self) -> NbtResult<Option<String>> {
		match self.reader.read_name()? {
			None => Ok(None),
			Some(raw) => {
				let key = mutf8::decode(raw).map_err(|_| NbtError::BadKey)?;
				Ok(Some(key))
			}
		}
	}

	/// Reads an i32 element count and refuses it unless `count * width`
	/// bytes actually remain, so a corrupted length can never drive a
	/// huge allocation.
	fn read_count(&mut self, width: usize) -> NbtResult<usize> {
		let count = self.reader.read_i32()?;
		if count < 0 {
			return Err(NbtError::UnexpectedEndOfInput);
		}
		let count = count as usize;
		match count.checked_mul(width) {
			Some(bytes) if bytes <= self.reader.remaining() => Ok(count),
			_ => Err(NbtError::UnexpectedEndOfInput),
		}
	}

	fn parse_payload(&mut self, id: TagID) -> NbtResult<Tag> {
		Ok(match id {
			// Callers only dispatch on real payload kinds.
			TagID::End => return Err(NbtError::Internal),
			TagID::Byte => Tag::Byte(self.reader.read_i8()?),
			TagID::Short => Tag::Short(self.reader.read_i16()?),
			TagID::Int => Tag::Int(self.reader.read_i32()?),
			TagID::Long => Tag::Long(self.reader.read_i64()?),
			TagID::Float => Tag::Float(self.reader.read_f32()?),
			TagID::Double => Tag::Double(self.reader.read_f64()?),
			TagID::ByteArray => {
				let count = self.read_count(1)?;
				let bytes = self.reader.read_bytes(count)?;
				Tag::ByteArray(bytes.iter().map(|&b| b as i8).collect())
			}
			TagID::String => {
				let length = self.reader.read_u16()? as usize;
				let bytes = self.reader.read_bytes(length)?;
				let text = mutf8::decode(bytes).map_err(|_| NbtError::BadKey)?;
				Tag::String(text)
			}
			TagID::List => self.parse_list()?,
			TagID::Compound => self.parse_compound()?,
			TagID::IntArray => {
				let count = self.read_count(4)?;
				let mut values = Vec::with_capacity(count);
				for _ in 0..count {
					values.push(self.reader.read_i32()?);
				}
				Tag::IntArray(values)
			}
			TagID::LongArray => {
				let count = self.read_count(8)?;
				let mut values = Vec::with_capacity(count);
				for _ in 0..count {
					values.push(self.reader.read_i64()?);
				}
				Tag::LongArray(values)
			}
		})
	}

	fn parse_list(&mut self) -> NbtResult<Tag> {
		let element_byte = self.reader.read_u8()?;
		let count = self.reader.read_i32()?;
		if element_byte == 0 {
			// Only the empty list may declare the End element kind.
			if count != 0 {
				return Err(NbtError::BadList);
			}
			return Ok(Tag::List(ListTag::new(TagID::End)));
		}
		let element = TagID::from_u8(element_byte)
			.ok_or(NbtError::BadTag(element_byte))?;
		if count < 0 || count as usize > self.reader.remaining() {
			// Every element occupies at least one byte.
			return Err(NbtError::UnexpectedEndOfInput);
		}
		let mut items = Vec::with_capacity(count as usize);
		for _ in 0..count {
			items.push(self.parse_tag(element, true)?);
		}
		Ok(Tag::List(ListTag {
			element,
			items,
		}))
	}

	fn parse_compound(&mut self) -> NbtResult<Tag> {
		let mut children = Vec::new();
		loop {
			let id_byte = self.reader.read_u8()?;
			if id_byte == 0 {
				break;
			}
			let id = TagID::from_u8(id_byte).ok_or(NbtError::BadTag(id_byte))?;
			children.push(self.parse_tag(id, false)?);
		}
		Ok(Tag::Compound(children))
	}
}
