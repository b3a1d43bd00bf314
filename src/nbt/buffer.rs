//! Position-tracked views over byte buffers.
//!
//! The NBT wire format is parsed out of a fully decompressed buffer, so
//! the reader here borrows a slice and walks a cursor instead of pulling
//! from a [std::io::Read]. Every accessor checks bounds up front and
//! leaves the cursor where it was on failure.

use crate::{NbtError, NbtResult};

pub struct ByteReader<'a> {
	data: &'a [u8],
	pos: usize,
}

macro_rules! __reader_int_fns {
	($($fn_name:ident -> $type:ty;)+) => {
		$(
			pub fn $fn_name(&mut self) -> NbtResult<$type> {
				const WIDTH: usize = std::mem::size_of::<$type>();
				let bytes = self.read_bytes(WIDTH)?;
				Ok(<$type>::from_be_bytes(bytes.try_into().unwrap()))
			}
		)+
	};
}

impl<'a> ByteReader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
		}
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	pub fn is_at_end(&self) -> bool {
		self.pos == self.data.len()
	}

	/// Takes the next `count` bytes. The cursor only advances when the
	/// full run is available.
	pub fn read_bytes(&mut self, count: usize) -> NbtResult<&'a [u8]> {
		if count > self.remaining() {
			return Err(NbtError::UnexpectedEndOfInput);
		}
		let bytes = &self.data[self.pos..self.pos + count];
		self.pos += count;
		Ok(bytes)
	}

	__reader_int_fns!(
		read_u8 -> u8;
		read_i8 -> i8;
		read_u16 -> u16;
		read_i16 -> i16;
		read_u32 -> u32;
		read_i32 -> i32;
		read_u64 -> u64;
		read_i64 -> i64;
	);

	/// Reads the bits of a big-endian u32 and reinterprets them. No
	/// normalisation happens, so every NaN payload survives.
	pub fn read_f32(&mut self) -> NbtResult<f32> {
		Ok(f32::from_bits(self.read_u32()?))
	}

	pub fn read_f64(&mut self) -> NbtResult<f64> {
		Ok(f64::from_bits(self.read_u64()?))
	}

	/// Reads a u16 length followed by that many raw name bytes.
	/// A zero length is an absent name, not an empty one.
	pub fn read_name(&mut self) -> NbtResult<Option<&'a [u8]>> {
		let start = self.pos;
		let length = self.read_u16()? as usize;
		if length == 0 {
			return Ok(None);
		}
		match self.read_bytes(length) {
			Ok(bytes) => Ok(Some(bytes)),
			Err(err) => {
				self.pos = start;
				Err(err)
			}
		}
	}
}

#[derive(Default)]
pub struct ByteWriter {
	data: Vec<u8>,
}

macro_rules! __writer_int_fns {
	($($fn_name:ident($type:ty);)+) => {
		$(
			pub fn $fn_name(&mut self, value: $type) {
				self.data.extend_from_slice(&value.to_be_bytes());
			}
		)+
	};
}

impl ByteWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.data.extend_from_slice(bytes);
	}

	__writer_int_fns!(
		write_u8(u8);
		write_i8(i8);
		write_u16(u16);
		write_i16(i16);
		write_u32(u32);
		write_i32(i32);
		write_u64(u64);
		write_i64(i64);
	);

	pub fn write_f32(&mut self, value: f32) {
		self.write_u32(value.to_bits());
	}

	pub fn write_f64(&mut self, value: f64) {
		self.write_u64(value.to_bits());
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}
