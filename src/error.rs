use thiserror::Error;

use crate::nbt::tag::TagID;

/// The master error type.
#[derive(Debug, Error)]
pub enum NbtError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Some internal error happened, which is not your fault.")]
	Internal,
	#[error("Unexpected end of input.")]
	UnexpectedEndOfInput,
	#[error("Leftover data detected after parsing.")]
	LeftoverData,
	#[error("Unsupported Tag ID: {0}")]
	BadTag(u8),
	#[error("Couldn't read or decode a tag key.")]
	BadKey,
	#[error("A non-empty list declared the End element type.")]
	BadList,
	#[error("Malformed region file: {0}")]
	BadMca(&'static str),
	#[error("Invalid Modified UTF-8 sequence.")]
	BadUtf8,
	#[error("Decompression failed: {0}")]
	Decompress(String),
	#[error("The operation was cancelled.")]
	Cancelled,
	#[error("Expected a Compound or List tag, found {0}.")]
	WrongKind(TagID),
	#[error("List holds {expected} elements, tried to insert {found}.")]
	ListTypeMismatch {
		expected: TagID,
		found: TagID,
	},
	#[error("Out of range error.")]
	OutOfRange,
	#[error("Children of a List tag cannot be renamed.")]
	ListChildRename,
	#[error("Chunk does not fit in 255 sectors.")]
	ChunkTooLarge,
}

impl NbtError {
	/// Maps any decompressor failure into [NbtError::Decompress].
	pub fn decompress<E: std::fmt::Display>(err: E) -> NbtError {
		NbtError::Decompress(err.to_string())
	}
}

pub type NbtResult<T> = Result<T, NbtError>;
