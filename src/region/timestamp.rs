use std::io::{Read, Write};
use chrono::{DateTime, Utc};
use crate::NbtResult;
use crate::ioext::{Readable, ReadExt, Writable, WriteExt};

/// A 32-bit Unix timestamp, the last modification time of a chunk.
/// The header table stores seconds, so anything past 2106 wraps; that
/// is the file format's problem, not ours.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Timestamp(pub u32);

impl Timestamp {
	/// The timestamp for the current moment.
	pub fn utc_now() -> Timestamp {
		Timestamp(Utc::now().timestamp() as u32)
	}

	/// Seconds since the Unix epoch.
	pub fn seconds(&self) -> u32 {
		self.0
	}

	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		DateTime::<Utc>::from_timestamp(self.0 as i64, 0)
	}
}

impl From<u32> for Timestamp {
	fn from(value: u32) -> Self {
		Self(value)
	}
}

impl From<DateTime<Utc>> for Timestamp {
	fn from(value: DateTime<Utc>) -> Self {
		Timestamp(value.timestamp() as u32)
	}
}

impl Readable for Timestamp {
	fn read_from<R: Read>(reader: &mut R) -> NbtResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for Timestamp {
	fn write_to<W: Write>(&self, writer: &mut W) -> NbtResult<usize> {
		writer.write_value(self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn datetime_conversion() {
		let timestamp = Timestamp(1_700_000_000);
		let datetime = timestamp.to_datetime().unwrap();
		assert_eq!(Timestamp::from(datetime), timestamp);
		assert_eq!(timestamp.seconds(), 1_700_000_000);
		// The wall clock moved past this fixture long ago.
		assert!(Timestamp::utc_now() > timestamp);
	}

	#[test]
	fn wire_form_is_big_endian() {
		let mut buffer: Vec<u8> = Vec::new();
		Timestamp(0x0102_0304).write_to(&mut buffer).unwrap();
		assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04]);
		let back = Timestamp::read_from(&mut buffer.as_slice()).unwrap();
		assert_eq!(back, Timestamp(0x0102_0304));
	}
}
