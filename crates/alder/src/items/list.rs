//! The list-view item model and widget.
//!
//! A [`ListView`] owns columns and items. Every item carries exactly one
//! cell per column; the list re-applies its columns to every item whenever
//! the column set changes, so the invariant `cells.len() == columns.len()`
//! holds for all attached items. Structural changes are forwarded to the
//! backend through the list-view capability surface.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::{
    control::Control,
    error::{Error, Result},
    handler::{Backend, Callback, ControlKind, ListViewHandler},
};

/// The property change a column reports to its owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListViewColumnEvent {
    /// No change. Present for completeness; never raised.
    None,
    /// The title changed.
    TitleChanged,
    /// The width changed.
    WidthChanged,
    /// Everything may have changed, as after attach or reorder.
    AllChanged,
}

/// One cell of a list-view item, bound to a column by index.
pub struct ListViewItemCell {
    /// Cell text.
    text: RefCell<String>,
    /// Index into the list's image collection, if any.
    image_index: Cell<Option<usize>>,
    /// The owning column's index, stamped by the owning item.
    column_index: Cell<Option<usize>>,
    /// Back-reference to the owning item.
    item: RefCell<Weak<ListViewItem>>,
}

impl ListViewItemCell {
    /// Construct a detached cell.
    pub fn new(text: &str) -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(text.into()),
            image_index: Cell::new(None),
            column_index: Cell::new(None),
            item: RefCell::new(Weak::new()),
        })
    }

    /// Cell text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the cell text.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.into();
    }

    /// Image index, if set.
    pub fn image_index(&self) -> Option<usize> {
        self.image_index.get()
    }

    /// Set or clear the image index.
    pub fn set_image_index(&self, index: Option<usize>) {
        self.image_index.set(index);
    }

    /// The column this cell is bound to. Errors while detached.
    pub fn column_index(&self) -> Result<usize> {
        self.column_index
            .get()
            .ok_or_else(|| Error::Detached("cell has no owning item".into()))
    }

    /// The owning item. Errors while detached.
    pub fn item(&self) -> Result<Rc<ListViewItem>> {
        self.item
            .borrow()
            .upgrade()
            .ok_or_else(|| Error::Detached("cell has no owning item".into()))
    }

    /// Stamp the owning item and column index.
    pub(crate) fn bind(&self, item: &Rc<ListViewItem>, column: usize) {
        *self.item.borrow_mut() = Rc::downgrade(item);
        self.column_index.set(Some(column));
    }

    /// Clear the owning item and column index.
    pub(crate) fn unbind(&self) {
        *self.item.borrow_mut() = Weak::new();
        self.column_index.set(None);
    }
}

/// One row of a list view. `Rc`-shared and interior-mutable; attach it to a
/// list with [`ListView::add_item`].
pub struct ListViewItem {
    /// Item text, mirrored into the first cell.
    text: RefCell<String>,
    /// Index into the list's image collection, if any.
    image_index: Cell<Option<usize>>,
    /// One cell per owning-list column.
    cells: RefCell<Vec<Rc<ListViewItemCell>>>,
    /// Position in the owning list, stamped by the list.
    index: Cell<Option<usize>>,
    /// Back-reference to the owning list.
    owner: RefCell<Weak<ListViewInner>>,
}

impl ListViewItem {
    /// Construct a detached item.
    pub fn new(text: &str) -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(text.into()),
            image_index: Cell::new(None),
            cells: RefCell::new(Vec::new()),
            index: Cell::new(None),
            owner: RefCell::new(Weak::new()),
        })
    }

    /// Item text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the item text, keeping the first cell in sync.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.into();
        if let Some(first) = self.cells.borrow().first() {
            first.set_text(text);
        }
    }

    /// Image index, if set.
    pub fn image_index(&self) -> Option<usize> {
        self.image_index.get()
    }

    /// Set or clear the image index.
    pub fn set_image_index(&self, index: Option<usize>) {
        self.image_index.set(index);
    }

    /// Snapshot of the item's cells, in column order.
    pub fn cells(&self) -> Vec<Rc<ListViewItemCell>> {
        self.cells.borrow().clone()
    }

    /// The cell bound to a column, if the column exists.
    pub fn cell(&self, column: usize) -> Option<Rc<ListViewItemCell>> {
        self.cells.borrow().get(column).cloned()
    }

    /// Position in the owning list. Errors while detached.
    pub fn index(&self) -> Result<usize> {
        self.index
            .get()
            .ok_or_else(|| Error::Detached("item has no owning list view".into()))
    }

    /// The owning list. Errors while detached.
    pub fn list_view(&self) -> Result<ListView> {
        self.owner
            .borrow()
            .upgrade()
            .map(|inner| ListView { inner })
            .ok_or_else(|| Error::Detached("item has no owning list view".into()))
    }

    /// True while attached to a list.
    pub fn is_attached(&self) -> bool {
        self.index.get().is_some()
    }

    /// Stamp or clear ownership, then re-apply the owner's columns. Called
    /// only by the owning list on insert, remove and renumber.
    pub(crate) fn internal_set_owner_and_index(
        self: &Rc<Self>,
        owner: Option<&Rc<ListViewInner>>,
        index: Option<usize>,
    ) {
        match owner {
            Some(owner) => {
                *self.owner.borrow_mut() = Rc::downgrade(owner);
                self.index.set(index);
                let columns = owner.state.borrow().columns.len();
                self.resize_cells(columns);
            }
            Option::None => {
                *self.owner.borrow_mut() = Weak::new();
                self.index.set(None);
            }
        }
    }

    /// Grow or shrink the cell vector to exactly `count`, binding new cells
    /// and unbinding removed ones. The first cell is seeded with the item
    /// text.
    pub(crate) fn resize_cells(self: &Rc<Self>, count: usize) {
        let mut cells = self.cells.borrow_mut();
        while cells.len() > count {
            if let Some(cell) = cells.pop() {
                cell.unbind();
            }
        }
        while cells.len() < count {
            let text = if cells.is_empty() {
                self.text.borrow().clone()
            } else {
                String::new()
            };
            let cell = ListViewItemCell::new(&text);
            cell.bind(self, cells.len());
            cells.push(cell);
        }
        for (i, cell) in cells.iter().enumerate() {
            cell.column_index.set(Some(i));
        }
    }
}

/// A list-view column. `Rc`-shared; attach it with [`ListView::add_column`].
///
/// Title and width setters report their change to the owning list exactly
/// once per actual change. Mutating a detached column is silent and
/// infallible.
pub struct ListViewColumn {
    /// Header title.
    title: RefCell<String>,
    /// Column width in device-independent units.
    width: Cell<f64>,
    /// Position in the owning list, stamped by the list.
    index: Cell<Option<usize>>,
    /// Back-reference to the owning list.
    owner: RefCell<Weak<ListViewInner>>,
}

impl ListViewColumn {
    /// Construct a detached column.
    pub fn new(title: &str, width: f64) -> Rc<Self> {
        Rc::new(Self {
            title: RefCell::new(title.into()),
            width: Cell::new(width),
            index: Cell::new(None),
            owner: RefCell::new(Weak::new()),
        })
    }

    /// Header title.
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Replace the title, reporting [`ListViewColumnEvent::TitleChanged`] to
    /// the owning list when the value actually changes.
    pub fn set_title(&self, title: &str) {
        if *self.title.borrow() == title {
            return;
        }
        *self.title.borrow_mut() = title.into();
        self.raise_changed(ListViewColumnEvent::TitleChanged);
    }

    /// Column width.
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    /// Replace the width, reporting [`ListViewColumnEvent::WidthChanged`] on
    /// actual change.
    pub fn set_width(&self, width: f64) {
        if self.width.get() == width {
            return;
        }
        self.width.set(width);
        self.raise_changed(ListViewColumnEvent::WidthChanged);
    }

    /// Position in the owning list. Errors while detached.
    pub fn index(&self) -> Result<usize> {
        self.index
            .get()
            .ok_or_else(|| Error::Detached("column has no owning list view".into()))
    }

    /// The owning list. Errors while detached.
    pub fn list_view(&self) -> Result<ListView> {
        self.owner
            .borrow()
            .upgrade()
            .map(|inner| ListView { inner })
            .ok_or_else(|| Error::Detached("column has no owning list view".into()))
    }

    /// True while attached to a list.
    pub fn is_attached(&self) -> bool {
        self.index.get().is_some()
    }

    /// Stamp or clear ownership, reporting [`ListViewColumnEvent::AllChanged`]
    /// after the mutation. Called only by the owning list.
    pub(crate) fn internal_set_owner_and_index(
        &self,
        owner: Option<&Rc<ListViewInner>>,
        index: Option<usize>,
    ) {
        match owner {
            Some(owner) => {
                *self.owner.borrow_mut() = Rc::downgrade(owner);
                self.index.set(index);
            }
            Option::None => {
                *self.owner.borrow_mut() = Weak::new();
                self.index.set(None);
            }
        }
        self.raise_changed(ListViewColumnEvent::AllChanged);
    }

    /// Deliver a change event to the owning list's backend. Detached columns
    /// deliver nothing.
    fn raise_changed(&self, event: ListViewColumnEvent) {
        let Some(index) = self.index.get() else {
            return;
        };
        let Some(owner) = self.owner.borrow().upgrade() else {
            return;
        };
        owner.ctrl.with_handler(|h, _| {
            if let Some(lv) = h.list_view() {
                lv.column_changed(index, event);
            }
        });
    }
}

/// Portable list state behind the widget handle.
struct ListState {
    /// Columns in display order.
    columns: Vec<Rc<ListViewColumn>>,
    /// Items in display order.
    items: Vec<Rc<ListViewItem>>,
    /// Selected item indices, sorted and deduplicated.
    selection: Vec<usize>,
    /// Whether more than one item may be selected.
    multi_select: bool,
    /// Widget-level selection notification.
    on_selection_changed: Callback<()>,
}

/// Shared list storage.
pub(crate) struct ListViewInner {
    /// The underlying control.
    ctrl: Control,
    /// Columns, items and selection.
    state: RefCell<ListState>,
}

/// A multi-column item list widget.
#[derive(Clone)]
pub struct ListView {
    /// Shared storage.
    inner: Rc<ListViewInner>,
}

impl ListView {
    /// Construct an empty list on a backend.
    pub fn new(backend: Rc<dyn Backend>) -> Self {
        let lv = Self {
            inner: Rc::new(ListViewInner {
                ctrl: Control::new(backend, ControlKind::ListView),
                state: RefCell::new(ListState {
                    columns: Vec::new(),
                    items: Vec::new(),
                    selection: Vec::new(),
                    multi_select: false,
                    on_selection_changed: Callback::new(),
                }),
            }),
        };
        // Selection changes originating in the backend re-raise on the
        // widget callback, same as programmatic ones.
        let weak = Rc::downgrade(&lv.inner);
        lv.inner.ctrl.set_on_selection_changed(move |()| {
            if let Some(inner) = weak.upgrade() {
                (Self { inner }).raise_selection_changed();
            }
        });
        lv
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.inner.ctrl
    }

    /// Run a closure against the backend's list-view capability, if present.
    fn with_list_handler<R>(&self, f: impl FnOnce(&mut dyn ListViewHandler) -> R) -> Option<R> {
        self.inner
            .ctrl
            .with_handler(|h, _| h.list_view().map(f))
            .flatten()
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Snapshot of the columns, in display order.
    pub fn columns(&self) -> Vec<Rc<ListViewColumn>> {
        self.inner.state.borrow().columns.clone()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.inner.state.borrow().columns.len()
    }

    /// Append a column.
    pub fn add_column(&self, column: Rc<ListViewColumn>) -> Result<()> {
        let at = self.column_count();
        self.insert_column(at, column)
    }

    /// Insert a column at `index`, shifting later columns right and
    /// re-applying the column set to every item.
    pub fn insert_column(&self, index: usize, column: Rc<ListViewColumn>) -> Result<()> {
        if column.is_attached() {
            return Err(Error::Invalid("column is already attached".into()));
        }
        {
            let mut st = self.inner.state.borrow_mut();
            if index > st.columns.len() {
                return Err(Error::Invalid(format!("column index {index} out of range")));
            }
            st.columns.insert(index, column.clone());
        }
        self.with_list_handler(|lv| lv.column_inserted(index, &column));
        self.renumber_columns(index);
        self.apply_columns();
        trace!(index, title = %column.title(), "column inserted");
        Ok(())
    }

    /// Remove the column at `index`, shrinking every item's cell vector.
    pub fn remove_column(&self, index: usize) -> Option<Rc<ListViewColumn>> {
        let column = {
            let mut st = self.inner.state.borrow_mut();
            if index >= st.columns.len() {
                return None;
            }
            st.columns.remove(index)
        };
        column.internal_set_owner_and_index(None, None);
        self.with_list_handler(|lv| lv.column_removed(index));
        self.renumber_columns(index);
        self.apply_columns();
        trace!(index, "column removed");
        Some(column)
    }

    /// Re-stamp column ownership from `from` onward. Each stamp reports
    /// `AllChanged` for that column.
    fn renumber_columns(&self, from: usize) {
        let columns = self.columns();
        for (i, col) in columns.iter().enumerate().skip(from) {
            col.internal_set_owner_and_index(Some(&self.inner), Some(i));
        }
    }

    /// Resize every item's cell vector to the current column count.
    fn apply_columns(&self) {
        let count = self.column_count();
        for item in self.items() {
            item.resize_cells(count);
        }
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Snapshot of the items, in display order.
    pub fn items(&self) -> Vec<Rc<ListViewItem>> {
        self.inner.state.borrow().items.clone()
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.inner.state.borrow().items.len()
    }

    /// The item at `index`, if it exists.
    pub fn item(&self, index: usize) -> Option<Rc<ListViewItem>> {
        self.inner.state.borrow().items.get(index).cloned()
    }

    /// Append an item.
    pub fn add_item(&self, item: Rc<ListViewItem>) -> Result<()> {
        let at = self.item_count();
        self.insert_item(at, item)
    }

    /// Insert an item at `index`, shifting later items and the selection
    /// right.
    pub fn insert_item(&self, index: usize, item: Rc<ListViewItem>) -> Result<()> {
        if item.is_attached() {
            return Err(Error::Invalid("item is already attached".into()));
        }
        let selection_shifted = {
            let mut st = self.inner.state.borrow_mut();
            if index > st.items.len() {
                return Err(Error::Invalid(format!("item index {index} out of range")));
            }
            st.items.insert(index, item.clone());
            let mut shifted = false;
            for sel in st.selection.iter_mut() {
                if *sel >= index {
                    *sel += 1;
                    shifted = true;
                }
            }
            shifted
        };
        self.renumber_items(index);
        self.with_list_handler(|lv| lv.item_inserted(index, &item));
        if selection_shifted {
            self.apply_selection();
        }
        trace!(index, text = %item.text(), "item inserted");
        Ok(())
    }

    /// Remove the item at `index`. The removed item keeps its cells but
    /// becomes detached.
    pub fn remove_item(&self, index: usize) -> Option<Rc<ListViewItem>> {
        let (item, selection_changed) = {
            let mut st = self.inner.state.borrow_mut();
            if index >= st.items.len() {
                return None;
            }
            let item = st.items.remove(index);
            let before = st.selection.len();
            st.selection.retain(|&sel| sel != index);
            let mut changed = st.selection.len() != before;
            for sel in st.selection.iter_mut() {
                if *sel > index {
                    *sel -= 1;
                    changed = true;
                }
            }
            (item, changed)
        };
        item.internal_set_owner_and_index(None, None);
        self.renumber_items(index);
        self.with_list_handler(|lv| lv.item_removed(index));
        if selection_changed {
            self.apply_selection();
            self.raise_selection_changed();
        }
        trace!(index, "item removed");
        Some(item)
    }

    /// Remove all items.
    pub fn clear_items(&self) {
        let (items, had_selection) = {
            let mut st = self.inner.state.borrow_mut();
            let had_selection = !st.selection.is_empty();
            st.selection.clear();
            (std::mem::take(&mut st.items), had_selection)
        };
        for item in &items {
            item.internal_set_owner_and_index(None, None);
        }
        self.with_list_handler(|lv| lv.items_cleared());
        if had_selection {
            self.apply_selection();
            self.raise_selection_changed();
        }
    }

    /// Re-stamp item ownership from `from` onward.
    fn renumber_items(&self, from: usize) {
        let items = self.items();
        for (i, item) in items.iter().enumerate().skip(from) {
            item.internal_set_owner_and_index(Some(&self.inner), Some(i));
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Whether more than one item may be selected.
    pub fn multi_select(&self) -> bool {
        self.inner.state.borrow().multi_select
    }

    /// Switch between single and multi selection. Shrinking to single keeps
    /// the first selected item.
    pub fn set_multi_select(&self, multi: bool) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            st.multi_select = multi;
            if !multi && st.selection.len() > 1 {
                st.selection.truncate(1);
                true
            } else {
                false
            }
        };
        if changed {
            self.apply_selection();
            self.raise_selection_changed();
        }
    }

    /// The selected item indices, sorted ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.inner.state.borrow().selection.clone()
    }

    /// Select exactly one item, replacing the current selection.
    pub fn select(&self, index: usize) -> Result<()> {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if index >= st.items.len() {
                return Err(Error::Invalid(format!("item index {index} out of range")));
            }
            if st.selection == [index] {
                false
            } else {
                st.selection = vec![index];
                true
            }
        };
        if changed {
            self.apply_selection();
            self.raise_selection_changed();
        }
        Ok(())
    }

    /// Add an item to the selection. In single-select mode this replaces the
    /// selection instead.
    pub fn add_to_selection(&self, index: usize) -> Result<()> {
        if !self.multi_select() {
            return self.select(index);
        }
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if index >= st.items.len() {
                return Err(Error::Invalid(format!("item index {index} out of range")));
            }
            if st.selection.contains(&index) {
                false
            } else {
                st.selection.push(index);
                st.selection.sort_unstable();
                true
            }
        };
        if changed {
            self.apply_selection();
            self.raise_selection_changed();
        }
        Ok(())
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.selection.is_empty() {
                false
            } else {
                st.selection.clear();
                true
            }
        };
        if changed {
            self.apply_selection();
            self.raise_selection_changed();
        }
    }

    /// Mirror the selection into the backend.
    fn apply_selection(&self) {
        let selection = self.selected_indices();
        self.with_list_handler(|lv| lv.selection_applied(&selection));
    }

    /// Raise the widget-level selection callback, re-entrancy safe.
    fn raise_selection_changed(&self) {
        let taken = self
            .inner
            .state
            .borrow_mut()
            .on_selection_changed
            .take_slot();
        if let Some(mut f) = taken {
            f(&mut ());
            self.inner
                .state
                .borrow_mut()
                .on_selection_changed
                .restore_slot(f);
        }
    }

    /// Subscribe to selection changes. Single subscriber; replaces.
    pub fn set_on_selection_changed(&self, f: impl FnMut(&mut ()) + 'static) {
        self.inner.state.borrow_mut().on_selection_changed.set(f);
    }

    /// Ask the backend to scroll the item at `index` into view.
    pub fn ensure_visible(&self, index: usize) {
        if index >= self.item_count() {
            return;
        }
        self.with_list_handler(|lv| lv.ensure_visible(index));
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::pless::PlessBackend;

    fn list() -> (ListView, Rc<PlessBackend>) {
        let backend = PlessBackend::new();
        (ListView::new(backend.clone()), backend)
    }

    #[test]
    fn detached_item_errors() {
        let item = ListViewItem::new("a");
        assert!(matches!(item.index(), Err(Error::Detached(_))));
        assert!(matches!(item.list_view(), Err(Error::Detached(_))));
        assert!(!item.is_attached());
    }

    #[test]
    fn attach_stamps_index_and_owner() {
        let (lv, _b) = list();
        let item = ListViewItem::new("a");
        lv.add_item(item.clone()).unwrap();
        assert_eq!(item.index().unwrap(), 0);
        assert_eq!(item.list_view().unwrap().item_count(), 1);
        lv.insert_item(0, ListViewItem::new("b")).unwrap();
        assert_eq!(item.index().unwrap(), 1);
    }

    #[test]
    fn double_attach_rejected() {
        let (lv, _b) = list();
        let item = ListViewItem::new("a");
        lv.add_item(item.clone()).unwrap();
        assert!(matches!(lv.add_item(item), Err(Error::Invalid(_))));
    }

    #[test]
    fn cells_track_columns() {
        let (lv, _b) = list();
        let item = ListViewItem::new("row");
        lv.add_item(item.clone()).unwrap();
        assert_eq!(item.cells().len(), 0);

        lv.add_column(ListViewColumn::new("one", 40.0)).unwrap();
        lv.add_column(ListViewColumn::new("two", 40.0)).unwrap();
        assert_eq!(item.cells().len(), 2);
        // First cell is seeded from the item text.
        assert_eq!(item.cell(0).unwrap().text(), "row");
        assert_eq!(item.cell(1).unwrap().text(), "");

        // Items attached after the columns get cells immediately.
        let late = ListViewItem::new("late");
        lv.add_item(late.clone()).unwrap();
        assert_eq!(late.cells().len(), 2);

        lv.remove_column(1);
        for item in lv.items() {
            assert_eq!(item.cells().len(), lv.column_count());
        }
    }

    #[test]
    fn cell_back_references() {
        let (lv, _b) = list();
        let item = ListViewItem::new("row");
        lv.add_column(ListViewColumn::new("one", 40.0)).unwrap();
        lv.add_item(item.clone()).unwrap();
        let cell = item.cell(0).unwrap();
        assert_eq!(cell.column_index().unwrap(), 0);
        assert!(Rc::ptr_eq(&cell.item().unwrap(), &item));

        lv.remove_column(0);
        assert!(matches!(cell.column_index(), Err(Error::Detached(_))));
    }

    #[test]
    fn title_changed_raised_exactly_once_per_change() {
        let (lv, backend) = list();
        let col = ListViewColumn::new("alpha", 50.0);
        lv.add_column(col.clone()).unwrap();
        backend.env().take_log();

        col.set_title("beta");
        // Unchanged value does not report.
        col.set_title("beta");
        col.set_width(60.0);
        let log = backend.env().take_log();
        assert_eq!(
            log,
            vec![
                "list_view: column 0 TitleChanged".to_string(),
                "list_view: column 0 WidthChanged".to_string(),
            ]
        );
    }

    #[test]
    fn detached_column_mutation_is_silent() {
        let (lv, backend) = list();
        let col = ListViewColumn::new("alpha", 50.0);
        col.set_title("still detached");
        assert!(matches!(col.index(), Err(Error::Detached(_))));

        lv.add_column(col.clone()).unwrap();
        lv.remove_column(0);
        backend.env().take_log();
        col.set_title("detached again");
        assert!(backend.env().take_log().is_empty());
    }

    #[test]
    fn selection_follows_structure() {
        let (lv, _b) = list();
        for name in ["a", "b", "c"] {
            lv.add_item(ListViewItem::new(name)).unwrap();
        }
        lv.select(1).unwrap();
        assert_eq!(lv.selected_indices(), vec![1]);

        // Insert before the selection shifts it.
        lv.insert_item(0, ListViewItem::new("front")).unwrap();
        assert_eq!(lv.selected_indices(), vec![2]);

        // Removing the selected item clears it.
        lv.remove_item(2);
        assert_eq!(lv.selected_indices(), Vec::<usize>::new());
    }

    #[test]
    fn multi_select_modes() {
        let (lv, _b) = list();
        for name in ["a", "b", "c"] {
            lv.add_item(ListViewItem::new(name)).unwrap();
        }
        lv.set_multi_select(true);
        lv.add_to_selection(2).unwrap();
        lv.add_to_selection(0).unwrap();
        assert_eq!(lv.selected_indices(), vec![0, 2]);

        lv.set_multi_select(false);
        assert_eq!(lv.selected_indices(), vec![0]);

        lv.add_to_selection(2).unwrap();
        assert_eq!(lv.selected_indices(), vec![2]);
    }

    #[test]
    fn selection_callback_fires_on_change_only() {
        let (lv, _b) = list();
        lv.add_item(ListViewItem::new("a")).unwrap();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        lv.set_on_selection_changed(move |()| hits2.set(hits2.get() + 1));
        lv.select(0).unwrap();
        lv.select(0).unwrap();
        lv.clear_selection();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn clear_items_detaches_all() {
        let (lv, _b) = list();
        let a = ListViewItem::new("a");
        let b = ListViewItem::new("b");
        lv.add_item(a.clone()).unwrap();
        lv.add_item(b.clone()).unwrap();
        lv.clear_items();
        assert_eq!(lv.item_count(), 0);
        assert!(!a.is_attached());
        assert!(!b.is_attached());
    }

    #[test]
    fn item_text_mirrors_into_first_cell() {
        let (lv, _b) = list();
        lv.add_column(ListViewColumn::new("one", 40.0)).unwrap();
        let item = ListViewItem::new("before");
        lv.add_item(item.clone()).unwrap();
        item.set_text("after");
        assert_eq!(item.cell(0).unwrap().text(), "after");
    }

    #[test]
    fn backend_selection_notification_forwards() {
        let (lv, _b) = list();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        lv.set_on_selection_changed(move |()| hits2.set(hits2.get() + 1));
        lv.control()
            .raise_handler(|cb| &mut cb.selection_changed, &mut ());
        assert_eq!(hits.get(), 1);
    }
}
