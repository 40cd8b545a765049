//! Stylesheet parse tree
//!
//! The tree is the parser's data structure; the lint core only reads it.
//! It is stored in an arena ([`StyleTree`]) keyed by generational
//! [`NodeId`]s, with typed [`Declaration`] and [`RuleBlock`] views on top.
//!
//! ```text
//! StyleSheet
//! ├── RuleSet
//! │   ├── Selector "a"
//! │   └── RuleBlock
//! │       └── Declaration
//! │           ├── PropertyName "display"
//! │           └── PropertyValue "inline"
//! └── AtRule "media print"
//!     └── RuleSet ...
//! ```
//!
//! Only [`Document`](crate::document::Document) mutates a tree, so every
//! structural change is reported to its listeners.

mod arena;
mod fragment;
mod kind;
mod views;

pub use arena::{Descendants, NodeId, StyleTree};
pub use fragment::Fragment;
pub use kind::NodeKind;
pub use views::{Declaration, RuleBlock, Token};
