use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use objc2::rc::{Retained, Weak};
use objc2::{define_class, msg_send, DefinedClass, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{NSGraphicsContext, NSView};
use objc2_foundation::{NSPoint, NSRect, NSSize};

use crate::badge::BadgeView;
use crate::component::{Component, DisplayHost};
use crate::geometry::Rect;
use crate::render::{CgCanvas, CoreTextMeasurer};

thread_local! {
    static VIEW_STATES: RefCell<HashMap<usize, ViewState>> = RefCell::new(HashMap::new());
}

struct ViewState {
    badge: BadgeView,
    measurer: CoreTextMeasurer,
}

/// Removes a view's entry from `VIEW_STATES` when the view is deallocated.
#[derive(Default)]
pub struct StateSlot {
    view_id: Cell<Option<usize>>,
}

impl Drop for StateSlot {
    fn drop(&mut self) {
        let Some(view_id) = self.view_id.take() else {
            return;
        };
        let released = VIEW_STATES.with(|states| match states.try_borrow_mut() {
            Ok(mut states) => states.remove(&view_id),
            Err(_) => {
                log::warn!("Badge host view {:#x} released while drawing", view_id);
                None
            }
        });
        if let Some(mut state) = released {
            state.badge.detach_host();
        }
    }
}

/// Forwards badge invalidation and frame changes to the view without
/// keeping it alive.
struct NeedsDisplay(Weak<BadgeHostView>);

impl DisplayHost for NeedsDisplay {
    fn set_needs_display(&self) {
        if let Some(view) = self.0.load() {
            view.setNeedsDisplay(true);
        }
    }

    fn frame_did_change(&self, frame: Rect) {
        if let Some(view) = self.0.load() {
            view.setFrame(ns_rect(frame));
        }
    }
}

fn ns_rect(frame: Rect) -> NSRect {
    NSRect::new(
        NSPoint::new(frame.min_x(), frame.min_y()),
        NSSize::new(frame.width(), frame.height()),
    )
}

define_class!(
    #[unsafe(super(NSView))]
    #[thread_kind = MainThreadOnly]
    #[name = "NumberBadgeHostView"]
    #[ivars = StateSlot]
    pub struct BadgeHostView;

    impl BadgeHostView {
        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            let view_id = self as *const _ as usize;
            VIEW_STATES.with(|states| {
                if let Some(state) = states.borrow_mut().get_mut(&view_id) {
                    self.draw_content(state);
                }
            });
        }

        #[unsafe(method(isFlipped))]
        fn is_flipped(&self) -> bool {
            true
        }

        // Background stays clear; only the badge is drawn.
        #[unsafe(method(isOpaque))]
        fn is_opaque(&self) -> bool {
            false
        }
    }
);

impl BadgeHostView {
    /// Creates an AppKit view that hosts `badge` and repaints when it changes.
    ///
    /// The badge lives as long as the view. Frame changes made through
    /// [`BadgeHostView::update`] resize the view.
    pub fn new(mtm: MainThreadMarker, badge: BadgeView) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(StateSlot::default());
        let view: Retained<Self> =
            unsafe { msg_send![super(this), initWithFrame: ns_rect(badge.frame())] };

        let view_id = &*view as *const _ as usize;
        view.ivars().view_id.set(Some(view_id));
        let mut state = ViewState {
            badge,
            measurer: CoreTextMeasurer::new(),
        };
        state
            .badge
            .attach_host(Rc::new(NeedsDisplay(Weak::from_retained(&view))));

        VIEW_STATES.with(|states| {
            states.borrow_mut().insert(view_id, state);
        });

        view
    }

    /// Runs `f` against the hosted badge. Setters inside `f` schedule the
    /// repaint themselves.
    pub fn update<R>(&self, f: impl FnOnce(&mut BadgeView) -> R) -> Option<R> {
        let view_id = self as *const _ as usize;
        VIEW_STATES.with(|states| {
            states
                .borrow_mut()
                .get_mut(&view_id)
                .map(|state| f(&mut state.badge))
        })
    }

    /// Takes the hosted badge out of the view. The view draws nothing after.
    pub fn detach(&self) -> Option<BadgeView> {
        self.ivars().view_id.set(None);
        let view_id = self as *const _ as usize;
        VIEW_STATES.with(|states| {
            states.borrow_mut().remove(&view_id).map(|mut state| {
                state.badge.detach_host();
                state.badge
            })
        })
    }

    fn draw_content(&self, state: &mut ViewState) {
        let Some(ns_context) = NSGraphicsContext::currentContext() else {
            return;
        };

        let cg_context = ns_context.CGContext();
        let cg_context_ptr: *mut core_graphics::sys::CGContext =
            Retained::as_ptr(&cg_context) as *const _ as *mut _;

        let mut ctx =
            unsafe { core_graphics::context::CGContext::from_existing_context_ptr(cg_context_ptr) };

        let bounds = self.bounds();
        let bounds = Rect::new(0.0, 0.0, bounds.size.width, bounds.size.height);

        let mut canvas = CgCanvas::new(&mut ctx, &state.measurer);
        state.badge.paint(&mut canvas, bounds, &state.measurer);
        state.badge.take_needs_display();
    }
}
