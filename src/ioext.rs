use std::io::{
	self,
	Write,
	Read,
	Seek, SeekFrom,
};

use crate::NbtResult;

pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> NbtResult<usize>;
}

pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> NbtResult<Self>;
}

/// For types that know where they live inside a stream.
pub trait Seekable {
	fn seeker(&self) -> SeekFrom;
}

macro_rules! __primitive_impls {
	($($type:ty),+) => {
		$(
			impl Readable for $type {
				fn read_from<R: Read>(reader: &mut R) -> NbtResult<Self> {
					let mut buffer = [0u8; std::mem::size_of::<$type>()];
					reader.read_exact(&mut buffer)?;
					Ok(<$type>::from_be_bytes(buffer))
				}
			}

			impl Writable for $type {
				fn write_to<W: Write>(&self, writer: &mut W) -> NbtResult<usize> {
					writer.write_all(&self.to_be_bytes())?;
					Ok(std::mem::size_of::<$type>())
				}
			}
		)+
	};
}

__primitive_impls!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Convenience methods so that readers can read [Readable] types
/// without naming the type twice.
pub trait ReadExt: Read + Sized {
	fn read_value<T: Readable>(&mut self) -> NbtResult<T> {
		T::read_from(self)
	}
}

impl<R: Read> ReadExt for R {}

pub trait WriteExt: Write + Sized {
	fn write_value<T: Writable>(&mut self, value: T) -> NbtResult<usize> {
		value.write_to(self)
	}

	/// Writes zeroes to a writer.
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64> {
		const ZEROES: &[u8; 4096] = &[0u8; 4096];
		let mut remainder = count;
		while remainder >= ZEROES.len() as u64 {
			self.write_all(ZEROES)?;
			remainder -= ZEROES.len() as u64;
		}
		if remainder != 0 {
			self.write_all(&ZEROES[0..remainder as usize])?;
		}
		Ok(count)
	}
}

impl<W: Write> WriteExt for W {}

pub trait SeekExt: Seek {
	/// Captures the current stream position as a [SeekFrom], so a
	/// caller can jump elsewhere and seek back afterwards.
	fn seek_return(&mut self) -> io::Result<SeekFrom> {
		Ok(SeekFrom::Start(self.stream_position()?))
	}
}

impl<S: Seek> SeekExt for S {}

/// Copies exactly `count` bytes from a reader into a writer.
/// Returns the number of bytes actually copied, which falls short of
/// `count` when the reader runs dry.
pub fn copy_bytes<R: Read, W: Write>(reader: &mut R, writer: &mut W, count: u64) -> io::Result<u64> {
	io::copy(&mut reader.take(count), writer)
}
