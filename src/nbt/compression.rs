//! The compression boundary every NBT document passes through.
//!
//! Input framing is sniffed rather than declared: gzip begins `1F 8B`,
//! zlib begins `78`, and anything else is taken as an uncompressed
//! document. Output compression is chosen by the caller.

use std::io::{Read, Write};

use flate2::{
	Compression,
	read::GzDecoder,
	read::ZlibDecoder,
	write::GzEncoder,
	write::ZlibEncoder,
};

use crate::{NbtError, NbtResult};
use crate::progress::{messages, Monitor};

/// Decompression pulls through the decoder in chunks of this size,
/// polling cancellation in between.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compression scheme used for writing or reading.
/// The discriminants double as the compression-type byte in region
/// file chunk framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	ZLib = 2,
	/// Data is uncompressed.
	Uncompressed = 3,
}

impl CompressionScheme {
	pub fn from_u8(value: u8) -> Option<CompressionScheme> {
		match value {
			1 => Some(CompressionScheme::GZip),
			2 => Some(CompressionScheme::ZLib),
			3 => Some(CompressionScheme::Uncompressed),
			_ => None,
		}
	}

	pub fn value(self) -> u8 {
		self as u8
	}

	/// Sniffs the framing of a byte buffer.
	pub fn detect(data: &[u8]) -> CompressionScheme {
		if data.len() > 1 && data[0] == 0x1F && data[1] == 0x8B {
			CompressionScheme::GZip
		} else if !data.is_empty() && data[0] == 0x78 {
			CompressionScheme::ZLib
		} else {
			CompressionScheme::Uncompressed
		}
	}
}

fn pull<R: Read>(
	mut decoder: R,
	total_in: usize,
	consumed: impl Fn(&R) -> usize,
	monitor: &mut Monitor,
) -> NbtResult<Vec<u8>> {
	let msgs = messages();
	let mut out = Vec::with_capacity(CHUNK_SIZE);
	let mut chunk = [0u8; CHUNK_SIZE];
	loop {
		monitor.ensure_not_cancelled()?;
		let count = decoder.read(&mut chunk).map_err(NbtError::decompress)?;
		if count == 0 {
			break;
		}
		out.extend_from_slice(&chunk[..count]);
		if total_in > 0 {
			let percent = consumed(&decoder) * 100 / total_in;
			monitor.report(percent.min(100) as u8, &msgs.decompressing);
		}
	}
	Ok(out)
}

/// Decompresses a buffer, sniffing its framing. Unframed input is
/// copied verbatim.
pub fn decompress_with(data: &[u8], monitor: &mut Monitor) -> NbtResult<Vec<u8>> {
	match CompressionScheme::detect(data) {
		CompressionScheme::GZip => {
			let decoder = GzDecoder::new(data);
			pull(
				decoder,
				data.len(),
				|dec| data.len() - dec.get_ref().len(),
				monitor,
			)
		}
		CompressionScheme::ZLib => {
			let decoder = ZlibDecoder::new(data);
			pull(
				decoder,
				data.len(),
				|dec| data.len() - dec.get_ref().len(),
				monitor,
			)
		}
		CompressionScheme::Uncompressed => {
			monitor.ensure_not_cancelled()?;
			Ok(data.to_vec())
		}
	}
}

pub fn decompress(data: &[u8]) -> NbtResult<Vec<u8>> {
	decompress_with(data, &mut Monitor::new())
}

/// Compresses a buffer into a writer with the chosen scheme at the
/// highest compression level.
pub fn compress_into<W: Write>(
	data: &[u8],
	scheme: CompressionScheme,
	writer: &mut W,
) -> NbtResult<()> {
	match scheme {
		CompressionScheme::GZip => {
			let mut encoder = GzEncoder::new(writer, Compression::best());
			encoder.write_all(data)?;
			encoder.finish()?;
		}
		CompressionScheme::ZLib => {
			let mut encoder = ZlibEncoder::new(writer, Compression::best());
			encoder.write_all(data)?;
			encoder.finish()?;
		}
		CompressionScheme::Uncompressed => {
			writer.write_all(data)?;
		}
	}
	Ok(())
}

pub fn compress(data: &[u8], scheme: CompressionScheme) -> NbtResult<Vec<u8>> {
	let mut out = Vec::new();
	compress_into(data, scheme, &mut out)?;
	Ok(out)
}
