//! **layout-overlay**: a transient miniature of the tiling layout.
//!
//! On every trigger (layout changed, workspace switched) the overlay draws
//! one rectangle per managed window into an off-screen canvas, scaled down
//! from the real desktop, colored by master/slave role, with an optional
//! window icon and the layout name underneath.  The canvas is then shown in
//! a borderless, always-on-top window that removes itself after a short
//! while.
//!
//! # Architecture
//!
//! The crate is organised around a few seams in [`traits`]:
//!
//! * [`traits::Workspace`], [`traits::Manager`] and [`traits::Client`] expose
//!   the window manager's state read-only, so the overlay never decides
//!   placement itself.
//! * [`traits::OverlayBackend`] abstracts the windowing system and
//!   [`traits::Timers`] the event loop's one-shot timers.
//!
//! [`overlay::LayoutOverlay`] is the entry point.  It uses
//! [`compositor::Compositor`] to draw and [`presenter::Presenter`] to keep
//! exactly one overlay window alive.  A GTK4 layer-shell backend lives in
//! [`visualizer`].

pub mod canvas;
pub mod compositor;
pub mod config;
pub mod geometry;
pub mod overlay;
pub mod presenter;
pub mod selector;
pub mod traits;
pub mod visualizer;
