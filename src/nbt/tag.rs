//! The NBT tag tree: tag kinds, payloads, and the node type with its
//! structural editing operations.

use crate::{NbtError, NbtResult};

/// The ID byte of every tag kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
	LongArray = 12,
}

impl TagID {
	/// Decodes a raw tag byte. Returns None for anything above 12.
	pub fn from_u8(value: u8) -> Option<TagID> {
		Some(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			12 => TagID::LongArray,
			_ => return None,
		})
	}

	pub fn value(self) -> u8 {
		self as u8
	}

	/// The canonical name, as used by the format documentation.
	pub fn title(self) -> &'static str {
		match self {
			TagID::End => "TAG_End",
			TagID::Byte => "TAG_Byte",
			TagID::Short => "TAG_Short",
			TagID::Int => "TAG_Int",
			TagID::Long => "TAG_Long",
			TagID::Float => "TAG_Float",
			TagID::Double => "TAG_Double",
			TagID::ByteArray => "TAG_Byte_Array",
			TagID::String => "TAG_String",
			TagID::List => "TAG_List",
			TagID::Compound => "TAG_Compound",
			TagID::IntArray => "TAG_Int_Array",
			TagID::LongArray => "TAG_Long_Array",
		}
	}
}

impl std::fmt::Display for TagID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.title())
	}
}

impl TryFrom<u8> for TagID {
	type Error = NbtError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		TagID::from_u8(value).ok_or(NbtError::BadTag(value))
	}
}

/// The payload of a tag. The variant fixes the kind, so a node can never
/// carry a payload that disagrees with its tag byte.
#[derive(Debug, Clone, PartialEq)]
#[repr(u8)]
pub enum Tag {
	Byte(i8) = 1,
	Short(i16) = 2,
	Int(i32) = 3,
	Long(i64) = 4,
	Float(f32) = 5,
	Double(f64) = 6,
	ByteArray(Vec<i8>) = 7,
	String(String) = 8,
	List(ListTag) = 9,
	Compound(Vec<NbtNode>) = 10,
	IntArray(Vec<i32>) = 11,
	LongArray(Vec<i64>) = 12,
}

impl Tag {
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
			Tag::LongArray(_) => TagID::LongArray,
		}
	}
}

macro_rules! __tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value.into())
				}
			}
		)+
	};
}

__tag_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	&str => String;
	ListTag => List;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

/// An ordered sequence of unnamed tags sharing a single element kind.
/// The element kind is remembered even while the list is empty so that
/// a decoded empty list keeps whatever kind it declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTag {
	pub(crate) element: TagID,
	pub(crate) items: Vec<NbtNode>,
}

impl ListTag {
	pub fn new(element: TagID) -> Self {
		Self {
			element,
			items: Vec::new(),
		}
	}

	pub fn element(&self) -> TagID {
		self.element
	}

	pub fn items(&self) -> &[NbtNode] {
		&self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl Default for ListTag {
	fn default() -> Self {
		Self::new(TagID::End)
	}
}

impl<T: Into<Tag>> From<Vec<T>> for ListTag {
	fn from(value: Vec<T>) -> Self {
		let items: Vec<NbtNode> = value.into_iter()
			.map(|item| NbtNode::new("", item.into()))
			.collect();
		let element = items.first()
			.map(NbtNode::kind)
			.unwrap_or(TagID::End);
		Self {
			element,
			items,
		}
	}
}

/// One node of the tag tree: an optional name and a payload.
/// Names are absent for List elements; the empty string means "no name"
/// everywhere in this API, because the wire format cannot tell the two
/// apart.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtNode {
	pub(crate) name: Option<String>,
	pub(crate) tag: Tag,
}

fn opt_name(name: &str) -> Option<String> {
	if name.is_empty() {
		None
	} else {
		Some(name.to_owned())
	}
}

macro_rules! __node_builders {
	($($fn_name:ident($type:ty) => $variant:ident;)+) => {
		$(
			pub fn $fn_name(name: &str, value: $type) -> NbtNode {
				NbtNode::new(name, Tag::$variant(value.into()))
			}
		)+
	};
}

macro_rules! __node_accessors {
	($($fn_name:ident() -> $type:ty = $variant:ident;)+) => {
		$(
			pub fn $fn_name(&self) -> Option<$type> {
				match &self.tag {
					Tag::$variant(value) => Some(*value),
					_ => None,
				}
			}
		)+
	};
}

impl NbtNode {
	pub fn new(name: &str, tag: Tag) -> NbtNode {
		NbtNode {
			name: opt_name(name),
			tag,
		}
	}

	__node_builders!(
		byte(i8) => Byte;
		short(i16) => Short;
		int(i32) => Int;
		long(i64) => Long;
		float(f32) => Float;
		double(f64) => Double;
		byte_array(Vec<i8>) => ByteArray;
		int_array(Vec<i32>) => IntArray;
		long_array(Vec<i64>) => LongArray;
	);

	pub fn string(name: &str, value: &str) -> NbtNode {
		NbtNode::new(name, Tag::String(value.to_owned()))
	}

	/// A new empty list with the given element kind.
	pub fn list(name: &str, element: TagID) -> NbtNode {
		NbtNode::new(name, Tag::List(ListTag::new(element)))
	}

	/// A new empty compound.
	pub fn compound(name: &str) -> NbtNode {
		NbtNode::new(name, Tag::Compound(Vec::new()))
	}

	pub fn kind(&self) -> TagID {
		self.tag.id()
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Replaces this node's name. Prefer [NbtNode::rename_child] when the
	/// node sits inside a parent, which refuses to name List elements.
	pub fn set_name(&mut self, name: &str) {
		self.name = opt_name(name);
	}

	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	pub fn tag_mut(&mut self) -> &mut Tag {
		&mut self.tag
	}

	pub fn into_tag(self) -> Tag {
		self.tag
	}

	__node_accessors!(
		as_byte() -> i8 = Byte;
		as_short() -> i16 = Short;
		as_int() -> i32 = Int;
		as_long() -> i64 = Long;
		as_float() -> f32 = Float;
		as_double() -> f64 = Double;
	);

	pub fn as_byte_array(&self) -> Option<&[i8]> {
		match &self.tag {
			Tag::ByteArray(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_string(&self) -> Option<&str> {
		match &self.tag {
			Tag::String(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&ListTag> {
		match &self.tag {
			Tag::List(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_int_array(&self) -> Option<&[i32]> {
		match &self.tag {
			Tag::IntArray(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_long_array(&self) -> Option<&[i64]> {
		match &self.tag {
			Tag::LongArray(value) => Some(value),
			_ => None,
		}
	}

	/// The children of a Compound or List, or None for leaf tags.
	pub fn children(&self) -> Option<&[NbtNode]> {
		match &self.tag {
			Tag::Compound(children) => Some(children),
			Tag::List(list) => Some(&list.items),
			_ => None,
		}
	}

	pub fn child_count(&self) -> usize {
		self.children().map(<[NbtNode]>::len).unwrap_or(0)
	}

	fn children_vec(&mut self) -> NbtResult<&mut Vec<NbtNode>> {
		match &mut self.tag {
			Tag::Compound(children) => Ok(children),
			Tag::List(list) => Ok(&mut list.items),
			other => Err(NbtError::WrongKind(other.id())),
		}
	}

	/// Checks a prospective List child against the element kind and
	/// strips its name (List elements are nameless on the wire). An
	/// empty List adopts the kind of its first element.
	fn admit_child(&mut self, child: &mut NbtNode) -> NbtResult<()> {
		if let Tag::List(list) = &mut self.tag {
			if list.items.is_empty() {
				list.element = child.kind();
			} else if list.element != child.kind() {
				return Err(NbtError::ListTypeMismatch {
					expected: list.element,
					found: child.kind(),
				});
			}
			child.name = None;
		}
		Ok(())
	}

	/// Appends a detached node to this Compound or List.
	pub fn append(&mut self, mut child: NbtNode) -> NbtResult<()> {
		self.children_vec()?;
		self.admit_child(&mut child)?;
		self.children_vec()?.push(child);
		Ok(())
	}

	/// Prepends a detached node to this Compound or List.
	pub fn prepend(&mut self, child: NbtNode) -> NbtResult<()> {
		self.insert_before(0, child)
	}

	/// Inserts a detached node so that it ends up at `index`.
	/// `index` may equal the current child count, which appends.
	pub fn insert_before(&mut self, index: usize, mut child: NbtNode) -> NbtResult<()> {
		if index > self.children_vec()?.len() {
			return Err(NbtError::OutOfRange);
		}
		self.admit_child(&mut child)?;
		self.children_vec()?.insert(index, child);
		Ok(())
	}

	/// Inserts a detached node directly after the child at `index`.
	pub fn insert_after(&mut self, index: usize, mut child: NbtNode) -> NbtResult<()> {
		if index >= self.children_vec()?.len() {
			return Err(NbtError::OutOfRange);
		}
		self.admit_child(&mut child)?;
		self.children_vec()?.insert(index + 1, child);
		Ok(())
	}

	pub fn child(&self, index: usize) -> NbtResult<&NbtNode> {
		self.children()
			.ok_or(NbtError::WrongKind(self.kind()))?
			.get(index)
			.ok_or(NbtError::OutOfRange)
	}

	pub fn child_mut(&mut self, index: usize) -> NbtResult<&mut NbtNode> {
		self.children_vec()?
			.get_mut(index)
			.ok_or(NbtError::OutOfRange)
	}

	/// The first child whose name matches. Comparison is byte-identical
	/// UTF-8; unnamed children never match.
	pub fn child_by_name(&self, name: &str) -> Option<&NbtNode> {
		self.children()?
			.iter()
			.find(|child| child.name() == Some(name))
	}

	pub fn child_by_name_mut(&mut self, name: &str) -> Option<&mut NbtNode> {
		self.children_vec()
			.ok()?
			.iter_mut()
			.find(|child| child.name() == Some(name))
	}

	/// Detaches the child at `index` and hands its subtree to the caller.
	/// Dropping the returned node frees the subtree.
	pub fn remove(&mut self, index: usize) -> NbtResult<NbtNode> {
		let children = self.children_vec()?;
		if index >= children.len() {
			return Err(NbtError::OutOfRange);
		}
		Ok(children.remove(index))
	}

	/// Detaches the first child with a matching name, if any.
	pub fn remove_by_name(&mut self, name: &str) -> Option<NbtNode> {
		let children = self.children_vec().ok()?;
		let index = children
			.iter()
			.position(|child| child.name() == Some(name))?;
		Some(children.remove(index))
	}

	/// Renames the child at `index`. List elements carry no name, so a
	/// List parent refuses.
	pub fn rename_child(&mut self, index: usize, name: &str) -> NbtResult<()> {
		if matches!(self.tag, Tag::List(_)) {
			return Err(NbtError::ListChildRename);
		}
		self.child_mut(index)?.set_name(name);
		Ok(())
	}
}
