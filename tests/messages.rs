//! The diagnostic string registry is process-wide state, so its tests
//! live in their own binary.

use nbtutil::nbt::{read_nbt_full, write_nbt, CompressionScheme, NbtNode};
use nbtutil::progress::{messages, set_messages, Messages, Monitor};

#[test]
fn swapped_messages_reach_the_progress_sink() {
	assert_eq!(messages().parse_finished, "Parsing finished!");

	let table = Messages {
		parse_finished: "Fertig!".into(),
		..Messages::default()
	};
	set_messages(table);

	let mut root = NbtNode::compound("x");
	root.append(NbtNode::int("n", 1)).unwrap();
	let bytes = write_nbt(&root, CompressionScheme::Uncompressed).unwrap();

	let mut last = String::new();
	{
		let mut sink = |_percent: u8, message: &str| last = message.to_owned();
		let mut monitor = Monitor::new().with_progress(&mut sink);
		read_nbt_full(&bytes, &mut monitor).unwrap();
	}
	assert_eq!(last, "Fertig!");
}
