//! The tree-view item model and widget.
//!
//! Tree items form their own `Rc`-shared hierarchy, separate from the
//! control tree. Items added anywhere under a [`TreeView`] are stamped with
//! the owning tree recursively; detaching clears the stamp for the whole
//! subtree.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::{
    control::Control,
    error::{Error, Result},
    handler::{Backend, Callback, ControlKind, TreeViewHandler},
};

/// One node of a tree view. `Rc`-shared and interior-mutable.
pub struct TreeViewItem {
    /// Node text.
    text: RefCell<String>,
    /// Whether the node's children are shown.
    expanded: Cell<bool>,
    /// Child nodes, in display order.
    children: RefCell<Vec<Rc<TreeViewItem>>>,
    /// Back-reference to the parent node.
    parent: RefCell<Weak<TreeViewItem>>,
    /// Back-reference to the owning tree.
    owner: RefCell<Weak<TreeViewInner>>,
}

impl TreeViewItem {
    /// Construct a detached item.
    pub fn new(text: &str) -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(text.into()),
            expanded: Cell::new(false),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            owner: RefCell::new(Weak::new()),
        })
    }

    /// Node text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the node text.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.into();
    }

    /// Whether the node's children are shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// The parent node, if any.
    pub fn parent(&self) -> Option<Rc<TreeViewItem>> {
        self.parent.borrow().upgrade()
    }

    /// Snapshot of the child nodes.
    pub fn children(&self) -> Vec<Rc<TreeViewItem>> {
        self.children.borrow().clone()
    }

    /// Number of child nodes.
    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// The owning tree. Errors while detached.
    pub fn tree_view(&self) -> Result<TreeView> {
        self.owner
            .borrow()
            .upgrade()
            .map(|inner| TreeView { inner })
            .ok_or_else(|| Error::Detached("item has no owning tree view".into()))
    }

    /// True while attached to a tree.
    pub fn is_attached(&self) -> bool {
        self.owner.borrow().upgrade().is_some()
    }

    /// True if `other` is this node or one of its descendants.
    fn contains(self: &Rc<Self>, other: &Rc<TreeViewItem>) -> bool {
        if Rc::ptr_eq(self, other) {
            return true;
        }
        self.children.borrow().iter().any(|c| c.contains(other))
    }

    /// Stamp the owning tree on this node and its subtree.
    fn set_owner_recursive(&self, owner: &Weak<TreeViewInner>) {
        *self.owner.borrow_mut() = owner.clone();
        for child in self.children.borrow().iter() {
            child.set_owner_recursive(owner);
        }
    }
}

/// Portable tree state behind the widget handle.
struct TreeState {
    /// Root nodes, in display order.
    roots: Vec<Rc<TreeViewItem>>,
    /// The selected node, if any.
    selected: Option<Rc<TreeViewItem>>,
    /// Widget-level selection notification.
    on_selection_changed: Callback<()>,
}

/// Shared tree storage.
pub(crate) struct TreeViewInner {
    /// The underlying control.
    ctrl: Control,
    /// Roots and selection.
    state: RefCell<TreeState>,
}

/// A hierarchical item tree widget.
#[derive(Clone)]
pub struct TreeView {
    /// Shared storage.
    inner: Rc<TreeViewInner>,
}

impl TreeView {
    /// Construct an empty tree on a backend.
    pub fn new(backend: Rc<dyn Backend>) -> Self {
        let tv = Self {
            inner: Rc::new(TreeViewInner {
                ctrl: Control::new(backend, ControlKind::TreeView),
                state: RefCell::new(TreeState {
                    roots: Vec::new(),
                    selected: None,
                    on_selection_changed: Callback::new(),
                }),
            }),
        };
        // Selection changes originating in the backend re-raise on the
        // widget callback, same as programmatic ones.
        let weak = Rc::downgrade(&tv.inner);
        tv.inner.ctrl.set_on_selection_changed(move |()| {
            if let Some(inner) = weak.upgrade() {
                (Self { inner }).raise_selection_changed();
            }
        });
        tv
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.inner.ctrl
    }

    /// Run a closure against the backend's tree-view capability, if present.
    fn with_tree_handler<R>(&self, f: impl FnOnce(&mut dyn TreeViewHandler) -> R) -> Option<R> {
        self.inner
            .ctrl
            .with_handler(|h, _| h.tree_view().map(f))
            .flatten()
    }

    /// True if the item belongs to this tree.
    fn owns(&self, item: &Rc<TreeViewItem>) -> bool {
        item.owner
            .borrow()
            .upgrade()
            .is_some_and(|o| Rc::ptr_eq(&o, &self.inner))
    }

    /// Snapshot of the root nodes.
    pub fn root_items(&self) -> Vec<Rc<TreeViewItem>> {
        self.inner.state.borrow().roots.clone()
    }

    /// Append a root node and its subtree.
    pub fn add_root(&self, item: Rc<TreeViewItem>) -> Result<()> {
        if item.is_attached() {
            return Err(Error::Invalid("item is already attached".into()));
        }
        self.inner.state.borrow_mut().roots.push(item.clone());
        item.set_owner_recursive(&Rc::downgrade(&self.inner));
        self.with_tree_handler(|tv| tv.item_added(None, &item));
        trace!(text = %item.text(), "root item added");
        Ok(())
    }

    /// Append a child node (and its subtree) under an attached parent.
    pub fn add_child(&self, parent: &Rc<TreeViewItem>, item: Rc<TreeViewItem>) -> Result<()> {
        if !self.owns(parent) {
            return Err(Error::Detached("parent is not attached to this tree".into()));
        }
        if item.is_attached() {
            return Err(Error::Invalid("item is already attached".into()));
        }
        parent.children.borrow_mut().push(item.clone());
        *item.parent.borrow_mut() = Rc::downgrade(parent);
        item.set_owner_recursive(&Rc::downgrade(&self.inner));
        self.with_tree_handler(|tv| tv.item_added(Some(parent), &item));
        trace!(parent = %parent.text(), text = %item.text(), "child item added");
        Ok(())
    }

    /// Remove a node and its subtree. Returns false if the node does not
    /// belong to this tree. Clears the selection if it pointed into the
    /// removed subtree.
    pub fn remove(&self, item: &Rc<TreeViewItem>) -> bool {
        if !self.owns(item) {
            return false;
        }
        match item.parent() {
            Some(parent) => {
                parent
                    .children
                    .borrow_mut()
                    .retain(|c| !Rc::ptr_eq(c, item));
            }
            None => {
                self.inner
                    .state
                    .borrow_mut()
                    .roots
                    .retain(|c| !Rc::ptr_eq(c, item));
            }
        }
        *item.parent.borrow_mut() = Weak::new();
        item.set_owner_recursive(&Weak::new());
        let selection_cleared = {
            let mut st = self.inner.state.borrow_mut();
            match &st.selected {
                Some(selected) if item.contains(selected) => {
                    st.selected = None;
                    true
                }
                _ => false,
            }
        };
        self.with_tree_handler(|tv| tv.item_removed(item));
        if selection_cleared {
            self.with_tree_handler(|tv| tv.selection_applied(None));
            self.raise_selection_changed();
        }
        trace!(text = %item.text(), "item removed");
        true
    }

    /// Expand or collapse a node, reporting the change to the backend.
    pub fn set_expanded(&self, item: &Rc<TreeViewItem>, expanded: bool) -> Result<()> {
        if !self.owns(item) {
            return Err(Error::Detached("item is not attached to this tree".into()));
        }
        if item.expanded.get() == expanded {
            return Ok(());
        }
        item.expanded.set(expanded);
        self.with_tree_handler(|tv| tv.expanded_changed(item, expanded));
        Ok(())
    }

    /// The selected node, if any.
    pub fn selected_item(&self) -> Option<Rc<TreeViewItem>> {
        self.inner.state.borrow().selected.clone()
    }

    /// Select a node, or clear the selection with `None`.
    pub fn select(&self, item: Option<&Rc<TreeViewItem>>) -> Result<()> {
        if let Some(item) = item {
            if !self.owns(item) {
                return Err(Error::Detached("item is not attached to this tree".into()));
            }
        }
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            let same = match (&st.selected, item) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same {
                false
            } else {
                st.selected = item.cloned();
                true
            }
        };
        if changed {
            self.with_tree_handler(|tv| tv.selection_applied(item));
            self.raise_selection_changed();
        }
        Ok(())
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pless::PlessBackend;

    fn tree() -> (TreeView, Rc<PlessBackend>) {
        let backend = PlessBackend::new();
        (TreeView::new(backend.clone()), backend)
    }

    #[test]
    fn detached_item_errors() {
        let item = TreeViewItem::new("a");
        assert!(matches!(item.tree_view(), Err(Error::Detached(_))));
    }

    #[test]
    fn attach_stamps_subtree() {
        let (tv, _b) = tree();
        let root = TreeViewItem::new("root");
        let child = TreeViewItem::new("child");
        tv.add_root(root.clone()).unwrap();
        tv.add_child(&root, child.clone()).unwrap();
        assert!(child.is_attached());
        assert!(Rc::ptr_eq(&child.parent().unwrap(), &root));

        tv.remove(&root);
        assert!(!root.is_attached());
        assert!(!child.is_attached());
    }

    #[test]
    fn child_under_foreign_parent_rejected() {
        let (tv, _b) = tree();
        let foreign = TreeViewItem::new("foreign");
        assert!(matches!(
            tv.add_child(&foreign, TreeViewItem::new("x")),
            Err(Error::Detached(_))
        ));
    }

    #[test]
    fn removing_selected_subtree_clears_selection() {
        let (tv, _b) = tree();
        let root = TreeViewItem::new("root");
        let child = TreeViewItem::new("child");
        tv.add_root(root.clone()).unwrap();
        tv.add_child(&root, child.clone()).unwrap();
        tv.select(Some(&child)).unwrap();
        assert!(tv.selected_item().is_some());

        tv.remove(&root);
        assert!(tv.selected_item().is_none());
    }

    #[test]
    fn expand_collapse_reported() {
        let (tv, backend) = tree();
        let root = TreeViewItem::new("root");
        tv.add_root(root.clone()).unwrap();
        backend.env().take_log();
        tv.set_expanded(&root, true).unwrap();
        // No-op change reports nothing.
        tv.set_expanded(&root, true).unwrap();
        tv.set_expanded(&root, false).unwrap();
        assert_eq!(
            backend.env().take_log(),
            vec![
                "tree_view: root expanded".to_string(),
                "tree_view: root collapsed".to_string(),
            ]
        );
    }

    #[test]
    fn selection_dedup() {
        let (tv, _b) = tree();
        let root = TreeViewItem::new("root");
        tv.add_root(root.clone()).unwrap();
        let hits = Rc::new(std::cell::Cell::new(0));
        let hits2 = hits.clone();
        tv.set_on_selection_changed(move |()| hits2.set(hits2.get() + 1));
        tv.select(Some(&root)).unwrap();
        tv.select(Some(&root)).unwrap();
        tv.select(None).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn backend_selection_notification_forwards() {
        let (tv, _b) = tree();
        let hits = Rc::new(std::cell::Cell::new(0));
        let hits2 = hits.clone();
        tv.set_on_selection_changed(move |()| hits2.set(hits2.get() + 1));
        tv.control()
            .raise_handler(|cb| &mut cb.selection_changed, &mut ());
        assert_eq!(hits.get(), 1);
    }
}
