//! Core traits that decouple the overlay from the window manager, the
//! windowing system and the event loop.
//!
//! The tiling logic owns workspaces, layouts and clients; the overlay only
//! reads them through [`Workspace`], [`Manager`] and [`Client`].  Drawing into
//! a real window goes through [`OverlayBackend`] and deferred work through
//! [`Timers`], so the whole pipeline can run against test doubles.

use crate::canvas::Canvas;
use crate::geometry::{Point, Rect};
use image::RgbaImage;
use std::time::Duration;

/// Native window identifier, used only to look up icons.
pub type WindowId = u32;

/// EWMH state flag marking a fullscreen client.
pub const STATE_FULLSCREEN: &str = "_NET_WM_STATE_FULLSCREEN";

//  Window-manager model

/// A managed window.
pub trait Client {
    /// Outer geometry (including decorations) in real desktop pixels.
    fn outer_geometry(&self) -> Rect;

    fn window_id(&self) -> WindowId;

    /// Current state flags, e.g. `_NET_WM_STATE_FULLSCREEN`.
    fn states(&self) -> &[String];

    fn is_fullscreen(&self) -> bool {
        self.states().iter().any(|s| s == STATE_FULLSCREEN)
    }
}

/// Read-only view of the clients arranged by one layout.
///
/// A manager is a handle: the overlay keeps it across the settle delay and
/// queries it when it actually draws.
pub trait Manager {
    type Client: Client;

    /// Every managed client, including those not currently visible.
    fn clients(&self) -> Vec<Self::Client>;

    /// The visible clients, capped to `allowed` entries.
    fn visible(&self, allowed: usize) -> Vec<Self::Client>;

    /// Whether `client` sits in the master area.
    fn is_master(&self, client: &Self::Client) -> bool;
}

/// The active layout algorithm of a workspace.
#[derive(Debug, Clone)]
pub struct Layout<M> {
    /// Layout name shown as the overlay label, e.g. `"vertical-left"`.
    pub name: String,
    pub manager: M,
}

/// A workspace as seen by the overlay.
pub trait Workspace {
    type Manager: Manager + 'static;

    fn active_layout(&self) -> Layout<Self::Manager>;
}

/// Source of the desktop region the overlay maps against.
///
/// The region may be a single monitor of a larger screen.
pub trait DesktopGeometry {
    fn dimensions(&self) -> Rect;
}

impl DesktopGeometry for Rect {
    fn dimensions(&self) -> Rect {
        *self
    }
}

/// Looks up window icons.
pub trait IconSource {
    /// An icon for `window` scaled to `width × height`, or `None` when the
    /// window has none.  Lookup failures are not errors.
    fn find_icon(&self, window: WindowId, width: u32, height: u32) -> Option<RgbaImage>;
}

/// An [`IconSource`] that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn find_icon(&self, _: WindowId, _: u32, _: u32) -> Option<RgbaImage> {
        None
    }
}

//  Presentation

/// Callback invoked when the windowing system asks an overlay to close.
pub type CloseHandler = Box<dyn Fn()>;

/// Abstraction over the windowing system used to show an overlay.
///
/// All calls happen on the single event-processing context that also runs
/// [`Timers`] tasks.
pub trait OverlayBackend {
    /// A created top-level window.  It owns any subscriptions registered
    /// through [`subscribe_close`](OverlayBackend::subscribe_close).
    type Window;

    type Error: std::error::Error + 'static;

    /// Create an unmapped top-level window of exactly `width × height`.
    ///
    /// The window is kept out of taskbars and pagers, stacked above other
    /// windows, undecorated and not resizable.
    fn create(&mut self, width: u32, height: u32) -> Result<Self::Window, Self::Error>;

    /// Call `handler` when the window is asked to close out of band.
    fn subscribe_close(&mut self, window: &mut Self::Window, handler: CloseHandler);

    /// Copy the canvas pixels into the window.
    fn paint(&mut self, window: &mut Self::Window, canvas: &Canvas);

    /// Make the window visible with its top-left corner at `origin`.
    fn map(&mut self, window: &mut Self::Window, origin: Point);

    /// Drop every subscription of `window`, then destroy it.
    fn destroy(&mut self, window: Self::Window);
}

/// One-shot task scheduling on the event context.
///
/// Tasks are fire-and-forget: scheduling never blocks, and a task runs once
/// after at least `delay`.
pub trait Timers {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn captured_logs_are_per_call() {
        let logs = capture_logs(|| log::warn!("first"));
        assert_eq!(logs, vec![(log::Level::Warn, "first".to_string())]);
        log::warn!("outside");
        assert!(capture_logs(|| {}).is_empty());
    }

    #[test]
    fn fullscreen_flag_detected() {
        let c = MockClient::new(1, Rect::default());
        assert!(!c.is_fullscreen());
        let mut c = c.fullscreen();
        assert!(c.is_fullscreen());
        c.states = vec!["_NET_WM_STATE_ABOVE".into()];
        assert!(!c.is_fullscreen());
    }

    #[test]
    fn rect_is_its_own_desktop_geometry() {
        let r = Rect::new(1920, 0, 1280, 1024);
        assert_eq!(r.dimensions(), r);
    }

    #[test]
    fn manual_timers_run_in_deadline_order() {
        let timers = ManualTimers::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, ms) in [("late", 300u64), ("early", 100), ("mid", 200)] {
            let log = log.clone();
            timers.schedule(
                Duration::from_millis(ms),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }
        timers.advance(Duration::from_millis(250));
        assert_eq!(*log.borrow(), vec!["early", "mid"]);
        timers.advance(Duration::from_millis(50));
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn manual_timers_allow_nested_scheduling() {
        let timers = ManualTimers::default();
        let fired = Rc::new(RefCell::new(false));
        {
            let inner_timers = timers.clone();
            let fired = fired.clone();
            timers.schedule(
                Duration::from_millis(10),
                Box::new(move || {
                    inner_timers.schedule(
                        Duration::from_millis(10),
                        Box::new(move || *fired.borrow_mut() = true),
                    );
                }),
            );
        }
        timers.advance(Duration::from_millis(15));
        assert!(!*fired.borrow());
        timers.advance(Duration::from_millis(5));
        assert!(*fired.borrow());
    }
}
