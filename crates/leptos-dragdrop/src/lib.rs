//! Leptos DragDrop Utilities
//!
//! Card-to-column drag-and-drop for Leptos boards using mouse events.
//! Uses movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// DnD state signals, generic over the column key
#[derive(Clone, Copy)]
pub struct DndSignals<C: Copy + PartialEq + Send + Sync + 'static> {
    pub dragging_id_read: ReadSignal<Option<u32>>,
    pub dragging_id_write: WriteSignal<Option<u32>>,
    pub drop_column_read: ReadSignal<Option<C>>,
    pub drop_column_write: WriteSignal<Option<C>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending card id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<u32>>,
    pub pending_id_write: WriteSignal<Option<u32>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Whether the pointer moved far enough from `start` to count as a drag
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

pub fn create_dnd_signals<C: Copy + PartialEq + Send + Sync + 'static>() -> DndSignals<C> {
    let (dragging_id_read, dragging_id_write) = signal(None::<u32>);
    let (drop_column_read, drop_column_write) = signal(None::<C>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<u32>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_column_read,
        drop_column_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
    }
}

impl<C: Copy + PartialEq + Send + Sync + 'static> DndSignals<C> {
    /// Card currently being dragged (tracked)
    pub fn dragging(&self) -> Option<u32> {
        self.dragging_id_read.get()
    }

    /// Whether `column` is the current drop target (tracked)
    pub fn is_over(&self, column: C) -> bool {
        self.drop_column_read.get() == Some(column)
    }

    /// True for a short moment after a drop, so the trailing click can be ignored
    pub fn just_dropped(&self) -> bool {
        self.drag_just_ended_read.get_untracked()
    }
}

/// End drag operation
pub fn end_drag<C: Copy + PartialEq + Send + Sync + 'static>(dnd: &DndSignals<C>) {
    dnd.dragging_id_write.set(None);
    dnd.drop_column_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable cards
/// Records pending drag with start position
pub fn make_on_mousedown<C: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<C>,
    card_id: u32,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() == 0 {
            // Form controls inside the card keep their own mouse handling
            if let Some(target) = ev.target() {
                if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
            }
            dnd.pending_id_write.set(Some(card_id));
            dnd.start_write.set((ev.client_x(), ev.client_y()));
        }
    }
}

/// Create mousemove handler for document - starts drag if moved enough
pub fn bind_global_mousemove<C: Copy + PartialEq + Send + Sync + 'static>(dnd: DndSignals<C>) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id_read.get_untracked();

        if pending.is_some() && dnd.dragging_id_read.get_untracked().is_none() {
            let start = dnd.start_read.get_untracked();
            if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
                dnd.dragging_id_write.set(pending);
            }
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for a column
pub fn make_on_column_mouseenter<C: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<C>,
    column: C,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_column_write.set(Some(column));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<C: Copy + PartialEq + Send + Sync + 'static>(
    dnd: DndSignals<C>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_column_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
///
/// The document listeners are never removed: bind once per app, with
/// signals that live as long as the page.
pub fn bind_global_mouseup<C, F>(dnd: DndSignals<C>, on_drop: F)
where
    C: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(u32, C) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        let drop_column = dnd.drop_column_read.get_untracked();

        dnd.pending_id_write.set(None);

        if let (Some(dragged), Some(column)) = (dragging_id, drop_column) {
            end_drag(&dnd);
            on_drop(dragged, column);
        } else if dragging_id.is_some() {
            end_drag(&dnd);
        }
        // A plain click never started a drag; its click event fires as usual.
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
