use std::io::{Read, Seek, SeekFrom, Write};

use nbtutil::nbt::{read_nbt, write_nbt, CompressionScheme, NbtNode};
use nbtutil::progress::Monitor;
use nbtutil::region::{
	is_multiple_of_4096, region_position_from_name,
	RegionCoord, RegionFile, RegionSector, Timestamp,
};

fn sample_chunk(x: i32, z: i32) -> NbtNode {
	let mut root = NbtNode::compound("");
	root.append(NbtNode::int("xPos", x)).unwrap();
	root.append(NbtNode::int("zPos", z)).unwrap();
	root.append(NbtNode::byte_array("blocks", vec![3; 2048])).unwrap();
	root
}

#[test]
fn region_roundtrip_through_a_real_file() {
	let mut region = RegionFile::named("r.1.-1.mca");
	assert_eq!(region.position(), Some((1, -1)));
	for x in 0..4 {
		for z in 0..4 {
			region
				.set_chunk_nbt((x as u16, z as u16), &sample_chunk(x, z))
				.unwrap();
			region.set_timestamp((x as u16, z as u16), 1_600_000_000u32 + x as u32);
		}
	}

	let mut file = tempfile::tempfile().unwrap();
	region.write_to(&mut file).unwrap();

	// The file length must be a multiple of the sector size.
	let len = file.seek(SeekFrom::End(0)).unwrap();
	assert!(is_multiple_of_4096(len));

	let back = RegionFile::read_named(&mut file, "r.1.-1.mca", false).unwrap();
	assert_eq!(back.position(), Some((1, -1)));
	assert_eq!(back.chunk_count(), 16);
	for x in 0..4u16 {
		for z in 0..4u16 {
			// Blobs survive byte-for-byte, timestamps exactly.
			assert_eq!(back.chunk((x, z)), region.chunk((x, z)));
			assert_eq!(
				back.timestamp((x, z)),
				Timestamp(1_600_000_000 + x as u32)
			);
			let tree = back.read_chunk_nbt((x, z)).unwrap().unwrap();
			assert_eq!(
				tree.child_by_name("xPos").unwrap().as_int(),
				Some(x as i32)
			);
		}
	}
}

#[test]
fn offsets_do_not_overlap_and_start_after_the_header() {
	let mut region = RegionFile::new();
	// Mix of sizes so sector counts vary.
	for i in 0..20u16 {
		region.set_chunk_raw((i, 2u16), 2, vec![i as u8; 100 + 1000 * i as usize]);
	}
	let mut file = tempfile::tempfile().unwrap();
	region.write_to(&mut file).unwrap();

	file.seek(SeekFrom::Start(0)).unwrap();
	let mut header = [0u8; 4096];
	file.read_exact(&mut header).unwrap();
	let sectors: Vec<RegionSector> = header
		.chunks(4)
		.map(|entry| {
			RegionSector::new(
				u32::from_be_bytes(entry.try_into().unwrap()) >> 8,
				entry[3],
			)
		})
		.filter(|sector| !sector.is_empty())
		.collect();
	assert_eq!(sectors.len(), 20);
	for (i, a) in sectors.iter().enumerate() {
		assert!(a.sector_offset() >= 2);
		for b in &sectors[i + 1..] {
			assert!(!a.intersects(*b));
		}
	}
}

#[test]
fn parse_all_over_a_region() {
	let mut region = RegionFile::new();
	region.set_chunk_nbt((0u16, 0u16), &sample_chunk(0, 0)).unwrap();
	region.set_chunk_nbt((9u16, 9u16), &sample_chunk(9, 9)).unwrap();
	// One chunk of garbage that decompresses but isn't NBT.
	let garbage = {
		let mut bytes = Vec::new();
		let mut encoder = nbtutil::flate2::write::ZlibEncoder::new(
			&mut bytes,
			nbtutil::flate2::Compression::best(),
		);
		encoder.write_all(&[0xD0, 0x0D]).unwrap();
		encoder.finish().unwrap();
		bytes
	};
	region.set_chunk_raw((3u16, 3u16), 2, garbage);

	let (trees, failures) = region.parse_all(&mut Monitor::new()).unwrap();
	assert_eq!(failures, 1);
	assert!(trees[RegionCoord::new(3, 3).index()].is_none());
	let tree = trees[RegionCoord::new(9, 9).index()].as_ref().unwrap();
	assert_eq!(tree.child_by_name("zPos").unwrap().as_int(), Some(9));
}

#[test]
fn lenient_scheme_byte_is_preserved() {
	let mut region = RegionFile::new();
	// Scheme 7 isn't a scheme this crate knows; the blob is raw NBT, so
	// the sniffing decoder still gets through it.
	let blob = write_nbt(&sample_chunk(1, 2), CompressionScheme::Uncompressed).unwrap();
	region.set_chunk_raw((0u16, 0u16), 7, blob.clone());

	let mut file = tempfile::tempfile().unwrap();
	region.write_to(&mut file).unwrap();
	let back = RegionFile::read_from(&mut file, false).unwrap();
	let chunk = back.chunk((0u16, 0u16)).unwrap();
	assert_eq!(chunk.scheme, 7);
	assert_eq!(chunk.data, blob);
	let tree = read_nbt(&chunk.data).unwrap();
	assert_eq!(tree.child_by_name("zPos").unwrap().as_int(), Some(2));
}

#[test]
fn position_only_from_matching_names() {
	assert_eq!(region_position_from_name("r.10.-4.mca"), Some((10, -4)));
	assert_eq!(region_position_from_name("r.10.-4.mca.bak"), None);
	assert_eq!(region_position_from_name("level.dat"), None);
}
