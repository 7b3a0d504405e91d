//! GTK4 + layer-shell overlay backend.
//!
//! # Widget tree
//!
//! ```text
//! window                 (layer-shell, overlay layer, transparent)
//! └ gtk4::Picture        (canvas as a gdk::MemoryTexture)
//! ```
//!
//! Layer surfaces on the overlay layer stack above regular windows and are
//! never listed by taskbars or pagers.  The surface is bound to the monitor
//! containing the desktop origin and anchored to its top-left edge, with the
//! origin's offset inside that monitor as margins.
//!
//! Everything here must run on the GTK main thread.

use crate::canvas::Canvas;
use crate::geometry::{place_on, Point, Rect};
use crate::traits::{CloseHandler, OverlayBackend, Timers};
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use log::{debug, warn};
use std::time::Duration;

/// Layer-shell namespace and window title of every overlay.
pub const NAMESPACE: &str = "layout-overlay";

/// Reasons an overlay window cannot be created.
#[derive(Debug, thiserror::Error)]
pub enum GtkBackendError {
    #[error("GTK is not initialised on this thread")]
    NotInitialised,
    #[error("compositor does not support wlr-layer-shell")]
    LayerShellUnsupported,
}

/// An overlay window and its signal subscriptions.
pub struct GtkOverlayWindow {
    window: gtk4::Window,
    picture: gtk4::Picture,
    close_handler: Option<glib::SignalHandlerId>,
}

impl GtkOverlayWindow {
    fn disconnect_all(&mut self) {
        if let Some(id) = self.close_handler.take() {
            self.window.disconnect(id);
        }
    }
}

/// [`OverlayBackend`] creating one layer-shell window per overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct GtkBackend;

impl GtkBackend {
    pub fn new() -> Self {
        Self
    }
}

impl OverlayBackend for GtkBackend {
    type Window = GtkOverlayWindow;
    type Error = GtkBackendError;

    fn create(&mut self, width: u32, height: u32) -> Result<GtkOverlayWindow, GtkBackendError> {
        if !gtk4::is_initialized_main_thread() {
            return Err(GtkBackendError::NotInitialised);
        }
        if !gtk4_layer_shell::is_supported() {
            return Err(GtkBackendError::LayerShellUnsupported);
        }

        let (width, height) = (width as i32, height as i32);

        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(Layer::Overlay);
        window.set_namespace(NAMESPACE);
        window.set_keyboard_mode(KeyboardMode::None);
        window.set_exclusive_zone(-1);
        window.set_anchor(Edge::Top, true);
        window.set_anchor(Edge::Left, true);
        window.set_title(Some(NAMESPACE));
        window.set_decorated(false);
        window.set_resizable(false);
        // Minimum and default size both equal the canvas.
        window.set_default_size(width, height);
        window.set_size_request(width, height);
        window.remove_css_class("background");

        let picture = gtk4::Picture::new();
        picture.set_can_shrink(false);
        picture.set_size_request(width, height);
        picture.set_can_target(false);
        window.set_child(Some(&picture));

        debug!("created overlay window {}x{}", width, height);
        Ok(GtkOverlayWindow {
            window,
            picture,
            close_handler: None,
        })
    }

    fn subscribe_close(&mut self, window: &mut GtkOverlayWindow, handler: CloseHandler) {
        window.disconnect_all();
        let id = window.window.connect_close_request(move |_| {
            handler();
            glib::Propagation::Stop
        });
        window.close_handler = Some(id);
    }

    fn paint(&mut self, window: &mut GtkOverlayWindow, canvas: &Canvas) {
        let bytes = glib::Bytes::from_owned(canvas.as_raw().to_vec());
        let texture = gdk::MemoryTexture::new(
            canvas.width() as i32,
            canvas.height() as i32,
            gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            canvas.width() as usize * 4,
        );
        window.picture.set_paintable(Some(&texture));
    }

    fn map(&mut self, window: &mut GtkOverlayWindow, origin: Point) {
        let monitors = monitors();
        let outputs: Vec<Rect> = monitors.iter().map(monitor_rect).collect();
        let margins = match place_on(&outputs, origin) {
            Some((i, local)) => {
                debug!("placing overlay on monitor {} at {:?}", i, local);
                window.window.set_monitor(Some(&monitors[i]));
                local
            }
            None => {
                warn!("no monitor contains {:?}, using the default output", origin);
                Point::default()
            }
        };
        window.window.set_margin(Edge::Left, margins.x);
        window.window.set_margin(Edge::Top, margins.y);
        window.window.present();
    }

    fn destroy(&mut self, mut window: GtkOverlayWindow) {
        window.disconnect_all();
        window.window.destroy();
    }
}

fn monitors() -> Vec<gdk::Monitor> {
    let Some(display) = gdk::Display::default() else {
        return Vec::new();
    };
    let list = display.monitors();
    (0..list.n_items())
        .filter_map(|i| list.item(i).and_downcast::<gdk::Monitor>())
        .collect()
}

fn monitor_rect(monitor: &gdk::Monitor) -> Rect {
    let g = monitor.geometry();
    Rect::new(g.x(), g.y(), g.width(), g.height())
}

/// [`Timers`] backed by one-shot GLib timeouts on the default main context.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlibTimers;

impl Timers for GlibTimers {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        glib::timeout_add_local_once(delay, task);
    }
}
