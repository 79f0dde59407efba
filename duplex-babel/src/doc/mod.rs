//! Document Tree
//!
//! The structured representation every conversion reads or writes. It is
//! loaded from and written to the markup form (see [`crate::markup`]) and is
//! the authoritative value while the editor is in rich mode.

pub mod nodes;
pub mod positions;
pub mod skeleton;

pub use nodes::{
    Block, Blockquote, BulletList, CodeBlock, Document, Heading, Image, Inline, ListItem, Mark,
    OrderedList, Paragraph, Table, TableCell, TableRow, TaskItem, TaskList, Text,
};
pub use positions::NodeRef;
pub use skeleton::Skeleton;
