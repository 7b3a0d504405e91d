//! Windowing backends for the layout overlay.
//!
//! When the `visualizer-gtk` feature is enabled, [`gtk::GtkBackend`] shows
//! overlays as GTK4 layer-shell surfaces and [`gtk::GlibTimers`] runs
//! deferred work on the GLib main loop.

#[cfg(feature = "visualizer-gtk")]
pub mod gtk;
