//! Item and collection models for the list and tree widgets.
//!
//! Items are `Rc`-shared, interior-mutable values that applications build and
//! hand to an owning widget. Ownership is explicit: an item is either
//! attached to exactly one widget or detached, and operations that require an
//! owner error with [`crate::Error::Detached`] while detached.

/// List-view items, cells, columns and the owning widget.
mod list;
/// Tree-view items and the owning widget.
mod tree;

pub use list::{ListView, ListViewColumn, ListViewColumnEvent, ListViewItem, ListViewItemCell};
pub use tree::{TreeView, TreeViewItem};
