//! Serialising tag trees back into NBT documents.

use std::io::Write;
use std::sync::Arc;

use crate::NbtResult;
use crate::progress::{messages, Messages, Monitor};
use crate::nbt::buffer::ByteWriter;
use crate::nbt::compression::{compress_into, CompressionScheme};
use crate::nbt::mutf8;
use crate::nbt::tag::{NbtNode, Tag, TagID};

/// Serialises a tree and compresses it with the chosen scheme.
/// Use [CompressionScheme::Uncompressed] for byte-stable output;
/// compressed output is valid but not bit-reproducible.
pub fn write_nbt(root: &NbtNode, scheme: CompressionScheme) -> NbtResult<Vec<u8>> {
	write_nbt_with(root, scheme, &mut Monitor::new())
}

/// As [write_nbt], with progress reporting and cancellation.
pub fn write_nbt_with(
	root: &NbtNode,
	scheme: CompressionScheme,
	monitor: &mut Monitor,
) -> NbtResult<Vec<u8>> {
	let mut out = Vec::new();
	write_nbt_to(root, scheme, &mut out, monitor)?;
	Ok(out)
}

/// Serialises and compresses a tree, streaming the result into `sink`.
pub fn write_nbt_to<W: Write>(
	root: &NbtNode,
	scheme: CompressionScheme,
	sink: &mut W,
	monitor: &mut Monitor,
) -> NbtResult<()> {
	let msgs = messages();
	let mut encoder = Encoder {
		writer: ByteWriter::new(),
		monitor: &mut *monitor,
		visited: 0,
		total: count_nodes(root),
		msgs: Arc::clone(&msgs),
	};
	encoder.write_node(root, true)?;
	let raw = encoder.writer.into_bytes();
	compress_into(&raw, scheme, sink)?;
	monitor.report_now(100, &msgs.pack_finished);
	Ok(())
}

fn count_nodes(node: &NbtNode) -> usize {
	1 + node
		.children()
		.map(|children| children.iter().map(count_nodes).sum())
		.unwrap_or(0)
}

struct Encoder<'m, 't> {
	writer: ByteWriter,
	monitor: &'m mut Monitor<'t>,
	visited: usize,
	total: usize,
	msgs: Arc<Messages>,
}

impl Encoder<'_, '_> {
	fn observe(&mut self) -> NbtResult<()> {
		self.monitor.ensure_not_cancelled()?;
		self.visited += 1;
		let percent = self.visited * 100 / self.total.max(1);
		self.monitor.report(percent.min(100) as u8, &self.msgs.packing);
		Ok(())
	}

	/// Writes one node. Inside a List the header is omitted; everywhere
	/// else the header is the kind byte plus the MUTF-8 name (length 0
	/// for an absent name).
	fn write_node(&mut self, node: &NbtNode, with_header: bool) -> NbtResult<()> {
		self.observe()?;
		if with_header {
			self.writer.write_u8(node.kind().value());
			match node.name() {
				Some(name) => {
					let bytes = mutf8::encode(name);
					self.writer.write_u16(bytes.len() as u16);
					self.writer.write_bytes(&bytes);
				}
				None => self.writer.write_u16(0),
			}
		}
		match node.tag() {
			Tag::Byte(value) => self.writer.write_i8(*value),
			Tag::Short(value) => self.writer.write_i16(*value),
			Tag::Int(value) => self.writer.write_i32(*value),
			Tag::Long(value) => self.writer.write_i64(*value),
			Tag::Float(value) => self.writer.write_f32(*value),
			Tag::Double(value) => self.writer.write_f64(*value),
			Tag::ByteArray(values) => {
				self.writer.write_i32(values.len() as i32);
				for value in values {
					self.writer.write_i8(*value);
				}
			}
			Tag::String(value) => {
				let bytes = mutf8::encode(value);
				self.writer.write_u16(bytes.len() as u16);
				self.writer.write_bytes(&bytes);
			}
			Tag::List(list) => {
				// An empty list writes the End element kind no matter
				// what kind it was declared with.
				let element = list
					.items()
					.first()
					.map(NbtNode::kind)
					.unwrap_or(TagID::End);
				self.writer.write_u8(element.value());
				self.writer.write_i32(list.len() as i32);
				for item in list.items() {
					self.write_node(item, false)?;
				}
			}
			Tag::Compound(children) => {
				for child in children {
					self.write_node(child, true)?;
				}
				self.writer.write_u8(0);
			}
			Tag::IntArray(values) => {
				self.writer.write_i32(values.len() as i32);
				for value in values {
					self.writer.write_i32(*value);
				}
			}
			Tag::LongArray(values) => {
				self.writer.write_i32(values.len() as i32);
				for value in values {
					self.writer.write_i64(*value);
				}
			}
		}
		Ok(())
	}
}
