use nbtutil::nbt::{
	read_nbt, read_nbt_full, write_nbt, write_nbt_with,
	CompressionScheme, NbtNode, Tag, TagID, ListTag,
};
use nbtutil::nbt::mutf8;
use nbtutil::progress::{CancelToken, Monitor};
use nbtutil::NbtError;

/// Wire fixtures that exercise every tag kind at least once.
fn wire_fixtures() -> Vec<Vec<u8>> {
	vec![
		// Byte named "hello" holding 42.
		vec![0x01, 0x00, 0x05, b'h', b'e', b'l', b'l', b'o', 0x2A],
		// Empty compound named "x".
		vec![0x0A, 0x00, 0x01, b'x', 0x00],
		// List of two ints inside an unnamed compound.
		vec![
			0x0A, 0x00, 0x00, 0x09, 0x00, 0x01, b'L', 0x03, 0x00, 0x00,
			0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02,
			0x00,
		],
		// Empty list with the End element kind.
		vec![0x09, 0x00, 0x01, b'e', 0x00, 0x00, 0x00, 0x00, 0x00],
		// Every scalar kind in one compound.
		vec![
			0x0A, 0x00, 0x01, b'c',
			0x01, 0x00, 0x01, b'b', 0x80,
			0x02, 0x00, 0x01, b's', 0x7F, 0xFF,
			0x03, 0x00, 0x01, b'i', 0x80, 0x00, 0x00, 0x00,
			0x04, 0x00, 0x01, b'l', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09,
			0x05, 0x00, 0x01, b'f', 0x3F, 0x80, 0x00, 0x00,
			0x06, 0x00, 0x01, b'd', 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
			0x07, 0x00, 0x02, b'b', b'a', 0x00, 0x00, 0x00, 0x02, 0xFF, 0x01,
			0x0B, 0x00, 0x02, b'i', b'a', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x07,
			0x0C, 0x00, 0x02, b'l', b'a', 0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
			0x08, 0x00, 0x02, b's', b't', 0x00, 0x03, b'a', 0xC0, 0x80,
			0x00,
		],
	]
}

#[test]
fn uncompressed_wire_roundtrips_byte_exact() {
	for wire in wire_fixtures() {
		let tree = read_nbt(&wire).unwrap();
		let packed = write_nbt(&tree, CompressionScheme::Uncompressed).unwrap();
		assert_eq!(packed, wire);
	}
}

#[test]
fn compressed_framing_roundtrips_structurally() {
	for wire in wire_fixtures() {
		let tree = read_nbt(&wire).unwrap();
		for scheme in [CompressionScheme::GZip, CompressionScheme::ZLib] {
			let packed = write_nbt(&tree, scheme).unwrap();
			let back = read_nbt(&packed).unwrap();
			assert_eq!(back, tree);
		}
	}
}

#[test]
fn gzip_framed_compound() {
	let wire = [0x0A, 0x00, 0x01, b'x', 0x00];
	let tree = read_nbt(&wire).unwrap();
	let packed = write_nbt(&tree, CompressionScheme::GZip).unwrap();
	assert_eq!(&packed[..2], &[0x1F, 0x8B]);
	assert_eq!(read_nbt(&packed).unwrap(), tree);
}

#[test]
fn built_tree_roundtrips_structurally() {
	let mut root = NbtNode::compound("Level");
	root.append(NbtNode::byte("flag", 1)).unwrap();
	root.append(NbtNode::string("name", "A\u{1D11E} and \u{0} survive")).unwrap();
	root.append(NbtNode::float("pitch", -0.25)).unwrap();

	let mut entities = NbtNode::list("entities", TagID::End);
	for id in 0..3 {
		let mut entity = NbtNode::compound("");
		entity.append(NbtNode::int("id", id)).unwrap();
		entity
			.append(NbtNode::new("pos", Tag::List(ListTag::from(vec![0.0f64, 64.0, 0.0]))))
			.unwrap();
		entities.append(entity).unwrap();
	}
	root.append(entities).unwrap();
	root.append(NbtNode::long_array("heights", vec![i64::MIN, -1, i64::MAX])).unwrap();

	let bytes = write_nbt(&root, CompressionScheme::Uncompressed).unwrap();
	let back = read_nbt(&bytes).unwrap();
	assert_eq!(back, root);
}

#[test]
fn mutf8_roundtrips_arbitrary_strings() {
	let samples = [
		"",
		"plain ascii",
		"nulls \u{0} embedded",
		"two-byte żółw",
		"three-byte ∀∃",
		"astral 🦀𝄞\u{10FFFF}",
	];
	for sample in samples {
		assert_eq!(mutf8::decode(&mutf8::encode(sample)).unwrap(), sample);
	}
}

#[test]
fn progress_reaches_the_end() {
	let mut root = NbtNode::compound("big");
	for i in 0..200 {
		root.append(NbtNode::int_array(&format!("a{i}"), vec![i; 64])).unwrap();
	}
	let bytes = write_nbt(&root, CompressionScheme::GZip).unwrap();

	let mut updates: Vec<u8> = Vec::new();
	{
		let mut sink = |percent: u8, _message: &str| updates.push(percent);
		let mut monitor = Monitor::new().with_progress(&mut sink);
		let parsed = read_nbt_full(&bytes, &mut monitor).unwrap();
		assert_eq!(parsed.leftover, 0);
	}
	// The terminal update always fires, and percentages stay in range.
	assert_eq!(*updates.last().unwrap(), 100);
	assert!(updates.iter().all(|&p| p <= 100));
}

#[test]
fn cancel_before_encode_releases_nothing_partial() {
	let root = NbtNode::compound("x");
	let token = CancelToken::new();
	token.cancel();
	let mut monitor = Monitor::new().with_cancel(&token);
	assert!(matches!(
		write_nbt_with(&root, CompressionScheme::ZLib, &mut monitor),
		Err(NbtError::Cancelled)
	));
}
