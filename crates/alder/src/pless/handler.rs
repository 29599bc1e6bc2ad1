//! The Pless delegating control handler.

use std::rc::Rc;

use alder_geom::{Point, Rect};

use super::PlessEnv;
use crate::{
    control::Control,
    handler::{
        CalendarHandler, ControlHandler, ControlKind, FocusChange, HandlerCallbacks,
        ListViewHandler, TreeViewHandler,
    },
    items::{ListViewColumn, ListViewColumnEvent, ListViewItem, TreeViewItem},
    widgets::calendar::Date,
};

/// A [`ControlHandler`] with no native window.
///
/// Geometry, damage and focus all delegate up the parent chain; the chain
/// terminates at the nearest ancestor whose handler reports a native handle.
/// Unsupported operations are soft no-ops.
pub struct PlessControlHandler {
    /// Shared environment.
    env: Rc<PlessEnv>,
    /// Callback slots raised into the owning control.
    callbacks: HandlerCallbacks,
    /// Mirrored bounds.
    bounds: Rect,
    /// List-view capability state, for `ControlKind::ListView`.
    list_view: Option<PlessListViewState>,
    /// Tree-view capability state, for `ControlKind::TreeView`.
    tree_view: Option<PlessTreeViewState>,
    /// Calendar capability state, for `ControlKind::Calendar`.
    calendar: Option<PlessCalendarState>,
}

impl PlessControlHandler {
    /// Construct a handler for a widget family, attaching the capability
    /// state the family calls for.
    pub(crate) fn new(env: Rc<PlessEnv>, kind: ControlKind) -> Self {
        Self {
            list_view: (kind == ControlKind::ListView)
                .then(|| PlessListViewState::new(env.clone())),
            tree_view: (kind == ControlKind::TreeView)
                .then(|| PlessTreeViewState::new(env.clone())),
            calendar: (kind == ControlKind::Calendar)
                .then(|| PlessCalendarState::new(env.clone())),
            env,
            callbacks: HandlerCallbacks::default(),
            bounds: Rect::zero(),
        }
    }
}

impl ControlHandler for PlessControlHandler {
    fn callbacks(&mut self) -> &mut HandlerCallbacks {
        &mut self.callbacks
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, _ctrl: &Control, bounds: Rect) {
        self.bounds = bounds;
    }

    fn invalidate_rect(&mut self, ctrl: &Control, rect: Rect) {
        // Damage propagates in parent coordinates until a native-backed
        // ancestor records it. Unparented controls have nowhere to paint.
        let Some(parent) = ctrl.parent() else {
            return;
        };
        parent.invalidate_rect(rect.translate(ctrl.bounds().origin.to_vector()));
    }

    fn set_focus(&mut self, ctrl: &Control) -> Option<FocusChange> {
        // The focus record lives on the nearest window ancestor.
        let mut current = ctrl.parent();
        while let Some(c) = current {
            let change = c
                .with_handler(|h, _| {
                    h.window().map(|w| FocusChange {
                        previous: w.set_focused_child(ctrl),
                    })
                })
                .flatten();
            if change.is_some() {
                return change;
            }
            current = c.parent();
        }
        None
    }

    fn client_to_screen(&self, ctrl: &Control, point: Point) -> Point {
        let mut p = point;
        let mut current = ctrl.clone();
        loop {
            p = p + current.bounds().origin.to_vector();
            let Some(parent) = current.parent() else {
                // Unparented: screen space is the control's own space.
                return p;
            };
            if parent.native_handle().is_some() {
                return parent.client_to_screen(p);
            }
            current = parent;
        }
    }

    fn screen_to_client(&self, ctrl: &Control, point: Point) -> Point {
        let origin = self.client_to_screen(ctrl, Point::zero());
        point - origin.to_vector()
    }

    fn scale_factor(&self, ctrl: &Control) -> f32 {
        let mut current = ctrl.parent();
        while let Some(c) = current {
            if c.native_handle().is_some() {
                return c.scale_factor();
            }
            current = c.parent();
        }
        self.env.display().scale_factor()
    }

    fn list_view(&mut self) -> Option<&mut dyn ListViewHandler> {
        self.list_view
            .as_mut()
            .map(|s| s as &mut dyn ListViewHandler)
    }

    fn tree_view(&mut self) -> Option<&mut dyn TreeViewHandler> {
        self.tree_view
            .as_mut()
            .map(|s| s as &mut dyn TreeViewHandler)
    }

    fn calendar(&mut self) -> Option<&mut dyn CalendarHandler> {
        self.calendar.as_mut().map(|s| s as &mut dyn CalendarHandler)
    }
}

/// Pless list-view capability: mirrors counts and selection, logs effects.
struct PlessListViewState {
    /// Shared environment.
    env: Rc<PlessEnv>,
    /// Mirrored item count.
    items: usize,
    /// Mirrored column count.
    columns: usize,
    /// Mirrored selection.
    selection: Vec<usize>,
}

impl PlessListViewState {
    fn new(env: Rc<PlessEnv>) -> Self {
        Self {
            env,
            items: 0,
            columns: 0,
            selection: Vec::new(),
        }
    }
}

impl ListViewHandler for PlessListViewState {
    fn item_inserted(&mut self, index: usize, item: &Rc<ListViewItem>) {
        self.items += 1;
        self.env
            .log(format!("list_view: item inserted at {index}: {}", item.text()));
    }

    fn item_removed(&mut self, index: usize) {
        self.items = self.items.saturating_sub(1);
        self.env.log(format!("list_view: item removed at {index}"));
    }

    fn items_cleared(&mut self) {
        self.items = 0;
        self.env.log("list_view: items cleared");
    }

    fn column_inserted(&mut self, index: usize, column: &Rc<ListViewColumn>) {
        self.columns += 1;
        self.env.log(format!(
            "list_view: column inserted at {index}: {}",
            column.title()
        ));
    }

    fn column_removed(&mut self, index: usize) {
        self.columns = self.columns.saturating_sub(1);
        self.env.log(format!("list_view: column removed at {index}"));
    }

    fn column_changed(&mut self, index: usize, event: ListViewColumnEvent) {
        self.env.log(format!("list_view: column {index} {event:?}"));
    }

    fn ensure_visible(&mut self, index: usize) {
        self.env.log(format!("list_view: ensure_visible {index}"));
    }

    fn selection_applied(&mut self, selection: &[usize]) {
        self.selection = selection.to_vec();
        self.env.log(format!("list_view: selection {selection:?}"));
    }
}

/// Pless tree-view capability: logs structural effects.
struct PlessTreeViewState {
    /// Shared environment.
    env: Rc<PlessEnv>,
}

impl PlessTreeViewState {
    fn new(env: Rc<PlessEnv>) -> Self {
        Self { env }
    }
}

impl TreeViewHandler for PlessTreeViewState {
    fn item_added(&mut self, parent: Option<&Rc<TreeViewItem>>, item: &Rc<TreeViewItem>) {
        let under = parent.map_or_else(|| "root".to_string(), |p| p.text());
        self.env
            .log(format!("tree_view: added {} under {under}", item.text()));
    }

    fn item_removed(&mut self, item: &Rc<TreeViewItem>) {
        self.env.log(format!("tree_view: removed {}", item.text()));
    }

    fn expanded_changed(&mut self, item: &Rc<TreeViewItem>, expanded: bool) {
        let what = if expanded { "expanded" } else { "collapsed" };
        self.env.log(format!("tree_view: {} {what}", item.text()));
    }

    fn selection_applied(&mut self, item: Option<&Rc<TreeViewItem>>) {
        let which = item.map_or_else(|| "none".to_string(), |i| i.text());
        self.env.log(format!("tree_view: selection {which}"));
    }
}

/// Pless calendar capability: logs applied values.
struct PlessCalendarState {
    /// Shared environment.
    env: Rc<PlessEnv>,
}

impl PlessCalendarState {
    fn new(env: Rc<PlessEnv>) -> Self {
        Self { env }
    }
}

/// Format an optional date for the effect log.
fn fmt_date(d: Option<Date>) -> String {
    d.map_or_else(|| "none".to_string(), |d| d.to_string())
}

impl CalendarHandler for PlessCalendarState {
    fn value_applied(&mut self, value: Date) {
        self.env.log(format!("calendar: value {value}"));
    }

    fn range_applied(&mut self, min: Option<Date>, max: Option<Date>) {
        self.env
            .log(format!("calendar: range {}..{}", fmt_date(min), fmt_date(max)));
    }

    fn day_marked(&mut self, day: u8, marked: bool) {
        let what = if marked { "marked" } else { "unmarked" };
        self.env.log(format!("calendar: day {day} {what}"));
    }
}
