//! Ephemeral overlay windows.
//!
//! A [`Presenter`] owns at most one overlay window at a time.  Presenting a
//! new canvas maps a fresh window first and only then destroys the previous
//! one, so the overlay never blinks out between two renders.
//!
//! Every window gets its own [`OverlayId`].  Expiry timers and close requests
//! carry that id and a weak handle to the presenter; when they fire for a
//! window that has already been replaced they do nothing.

use crate::canvas::Canvas;
use crate::geometry::Point;
use crate::traits::{OverlayBackend, Timers};
use log::{debug, error};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Identity of one presented overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

struct Shown<W> {
    id: OverlayId,
    window: W,
}

struct State<B: OverlayBackend> {
    backend: B,
    current: Option<Shown<B::Window>>,
    next_id: u64,
}

impl<B: OverlayBackend> State<B> {
    fn dismiss(&mut self, id: OverlayId) -> bool {
        match self.current.take() {
            Some(shown) if shown.id == id => {
                debug!("dismissing overlay {:?}", id);
                self.backend.destroy(shown.window);
                true
            }
            other => {
                self.current = other;
                debug!("overlay {:?} already gone", id);
                false
            }
        }
    }
}

/// Shared handle to the overlay window slot.
///
/// Cloning yields another handle to the same slot.  All handles must be used
/// from the single event context that runs the backend and the timers.
pub struct Presenter<B: OverlayBackend> {
    state: Rc<RefCell<State<B>>>,
}

impl<B: OverlayBackend> Clone for Presenter<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: OverlayBackend + 'static> Presenter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                backend,
                current: None,
                next_id: 1,
            })),
        }
    }

    /// The overlay currently on screen, if any.
    pub fn current(&self) -> Option<OverlayId> {
        self.state.borrow().current.as_ref().map(|s| s.id)
    }

    /// Show `canvas` in a new window at `origin`, replacing the current
    /// overlay.
    ///
    /// With a non-zero `duration` the new window destroys itself after that
    /// long, unless something else replaced or closed it first.  When the
    /// window cannot be created nothing changes and `None` is returned.
    pub fn present<T: Timers + ?Sized>(
        &self,
        canvas: &Canvas,
        origin: Point,
        duration: Duration,
        timers: &T,
    ) -> Option<OverlayId> {
        let id = {
            let mut state = self.state.borrow_mut();
            let mut window = match state.backend.create(canvas.width(), canvas.height()) {
                Ok(window) => window,
                Err(e) => {
                    error!("failed to create overlay window: {}", e);
                    return None;
                }
            };
            let id = OverlayId(state.next_id);
            state.next_id += 1;

            let weak = Rc::downgrade(&self.state);
            state.backend.subscribe_close(
                &mut window,
                Box::new(move || {
                    debug!("close requested for overlay {:?}", id);
                    dismiss_weak(&weak, id);
                }),
            );

            state.backend.paint(&mut window, canvas);
            state.backend.map(&mut window, origin);

            if let Some(previous) = state.current.replace(Shown { id, window }) {
                debug!("replacing overlay {:?} with {:?}", previous.id, id);
                state.backend.destroy(previous.window);
            }
            id
        };

        if !duration.is_zero() {
            let weak = Rc::downgrade(&self.state);
            timers.schedule(duration, Box::new(move || dismiss_weak(&weak, id)));
        }
        debug!(
            "overlay {:?} shown ({}x{}, {}ms)",
            id,
            canvas.width(),
            canvas.height(),
            duration.as_millis()
        );
        Some(id)
    }

    /// Destroy overlay `id` if it is still the current one.
    ///
    /// Returns whether a window was destroyed.
    pub fn dismiss(&self, id: OverlayId) -> bool {
        self.state.borrow_mut().dismiss(id)
    }

    /// Destroy whatever overlay is on screen.
    pub fn hide(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(shown) = state.current.take() {
            debug!("hiding overlay {:?}", shown.id);
            state.backend.destroy(shown.window);
        }
    }
}

fn dismiss_weak<B: OverlayBackend>(state: &Weak<RefCell<State<B>>>, id: OverlayId) {
    if let Some(state) = state.upgrade() {
        state.borrow_mut().dismiss(id);
    }
}
