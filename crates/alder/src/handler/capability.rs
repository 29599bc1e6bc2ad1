use std::rc::Rc;

use alder_geom::Point;

use crate::{
    control::Control,
    items::{ListViewColumn, ListViewColumnEvent, ListViewItem, TreeViewItem},
    widgets::calendar::Date,
};

/// Capability surface for list-view backends.
///
/// The owning list forwards every structural change here so the backend can
/// resynchronize its native view. All notifications are fire-and-forget;
/// backends that need no synchronization may ignore them.
pub trait ListViewHandler {
    /// An item was inserted at `index`.
    fn item_inserted(&mut self, index: usize, item: &Rc<ListViewItem>);

    /// The item at `index` was removed.
    fn item_removed(&mut self, index: usize);

    /// All items were removed.
    fn items_cleared(&mut self);

    /// A column was inserted at `index`.
    fn column_inserted(&mut self, index: usize, column: &Rc<ListViewColumn>);

    /// The column at `index` was removed.
    fn column_removed(&mut self, index: usize);

    /// A column's properties changed.
    fn column_changed(&mut self, index: usize, event: ListViewColumnEvent);

    /// Scroll so the item at `index` is visible. Soft failure.
    fn ensure_visible(&mut self, _index: usize) {}

    /// The selected item indices changed.
    fn selection_applied(&mut self, selection: &[usize]);
}

/// Capability surface for tree-view backends.
pub trait TreeViewHandler {
    /// An item was added under `parent` (`None` for a root item).
    fn item_added(&mut self, parent: Option<&Rc<TreeViewItem>>, item: &Rc<TreeViewItem>);

    /// An item and its subtree were removed.
    fn item_removed(&mut self, item: &Rc<TreeViewItem>);

    /// An item was expanded or collapsed.
    fn expanded_changed(&mut self, item: &Rc<TreeViewItem>, expanded: bool);

    /// The selected item changed.
    fn selection_applied(&mut self, item: Option<&Rc<TreeViewItem>>);
}

/// Capability surface for calendar backends.
pub trait CalendarHandler {
    /// The selected date changed.
    fn value_applied(&mut self, value: Date);

    /// The selectable range changed.
    fn range_applied(&mut self, min: Option<Date>, max: Option<Date>);

    /// A day of the displayed month was marked or unmarked.
    fn day_marked(&mut self, day: u8, marked: bool);
}

/// Capability surface for top-level window backends.
pub trait WindowHandler {
    /// Set the window title.
    fn set_title(&mut self, title: &str);

    /// The window's top-left corner in screen coordinates.
    fn screen_position(&self) -> Point;

    /// Move the window to a screen position.
    fn set_screen_position(&mut self, position: Point);

    /// Bring the window to the foreground. Soft failure.
    fn activate(&mut self) -> bool {
        false
    }

    /// Enter transient popup presentation for this window.
    fn begin_popup(&mut self);

    /// Leave transient popup presentation.
    fn end_popup(&mut self);

    /// True while the window is in popup presentation.
    fn is_popup_shown(&self) -> bool;

    /// Record which control in this window holds keyboard focus, returning
    /// the previous holder.
    fn set_focused_child(&mut self, ctrl: &Control) -> Option<Control>;

    /// The control in this window holding keyboard focus, if any.
    fn focused_child(&self) -> Option<Control>;
}
