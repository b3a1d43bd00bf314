/// Shorthand way to create a compound [NbtNode](crate::nbt::tag::NbtNode).
/// Example:
/// ```no_run
/// use nbtutil::compound;
/// use nbtutil::nbt::tag::Tag;
///
/// compound!{
///     ("Item One", 0i8),
///     ("Item Two", 2i32),
///     ("Item Three", Tag::Byte(1))
/// };
/// ```
#[macro_export]
macro_rules! compound {
    ($(($name:expr, $value:expr)),+$(,)?) => {
        $crate::nbt::tag::NbtNode::new("", $crate::nbt::tag::Tag::Compound(std::vec![
            $(
                $crate::nbt::tag::NbtNode::new(
                    $name,
                    $crate::nbt::tag::Tag::from($value),
                ),
            )+
        ]))
    };
    () => {
        $crate::nbt::tag::NbtNode::compound("")
    };
}

/// Shorthand way to create a list [NbtNode](crate::nbt::tag::NbtNode).
/// Example:
/// ```no_run
/// use nbtutil::list;
///
/// list!{ 1, 2, 3, 4, 5, 6, 7, 8, 9, 10 };
/// list![
///     "One",
///     "Two",
///     "Three"
/// ];
/// ```
#[macro_export]
macro_rules! list {
    ($($item:expr),+$(,)?) => {
        $crate::nbt::tag::NbtNode::new(
            "",
            $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(std::vec![
                $(
                    $crate::nbt::tag::Tag::from($item),
                )+
            ])),
        )
    };
    () => {
        $crate::nbt::tag::NbtNode::new(
            "",
            $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::default()),
        )
    };
}

pub use compound;
pub use list;
