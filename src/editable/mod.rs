//! The editing surface of a note field.
//!
//! This module owns the live document: a tree of elements and text nodes
//! held in an arena, the caret and selection inside it, and the markup codec
//! that turns the tree into the host-visible value and back.
//!
//! # Architecture
//!
//! - [`Surface`]: node arena, selection and focus; every structural change
//!   goes through [`Surface::apply`] with a [`Mutation`]
//! - [`Point`] / [`Selection`]: positions addressed by stable [`NodeId`]s
//! - [`markup`]: lenient parse, serialize and normalize of values
//! - [`TextEditMsg`]: native editing actions performed when a keystroke is
//!   not intercepted
//!
//! # Example
//!
//! ```
//! use notefield::editable::{Mutation, Surface};
//!
//! let mut surface = Surface::from_markup("pt has sob");
//! let caret = surface.caret();
//! let after = surface.apply(Mutation::insert_text(caret, ".")).unwrap();
//! surface.set_caret(after);
//!
//! assert_eq!(surface.serialize(), "pt has sob.");
//! ```

mod cursor;
pub mod markup;
mod messages;
mod node;
mod selection;
mod surface;

pub use cursor::Point;
pub use markup::MarkupNode;
pub use messages::{MoveTarget, TextEditMsg};
pub use node::{is_block_tag, is_void_tag, Node, NodeId, NodeKind};
pub use selection::Selection;
pub use surface::{CaretGeometry, Mutation, Surface};
