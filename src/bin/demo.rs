//! Demo driver for the layout overlay: cycles a fake workspace through a
//! few layouts and shows the overlay for each, using the same GTK backend
//! and GLib timers a window manager would use.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --bin layout-overlay-demo
//!
//! Press Ctrl-C to quit.

use gtk4::prelude::*;
use gtk4::{gdk, glib};
use image::{Rgba, RgbaImage};
use layout_overlay::config::Config;
use layout_overlay::geometry::Rect;
use layout_overlay::overlay::LayoutOverlay;
use layout_overlay::traits::{Client, IconSource, Layout, Manager, WindowId, Workspace};
use layout_overlay::visualizer::gtk::{GlibTimers, GtkBackend};
use log::{error, info};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Milliseconds between layout changes.
const STEP_MS: u64 = 1500;

const LAYOUTS: &[&str] = &["vertical-left", "horizontal-top", "fullscreen", "empty"];

/// Resolve the config directory (`$XDG_CONFIG_HOME/layout-overlay`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("layout-overlay")
}

/// Try to load `config.json` from the config directory, falling back to
/// compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Geometry of the first monitor, or a 1920x1080 stand-in.
fn first_monitor() -> Rect {
    gdk::Display::default()
        .and_then(|display| display.monitors().item(0))
        .and_downcast::<gdk::Monitor>()
        .map(|m| {
            let g = m.geometry();
            Rect::new(g.x(), g.y(), g.width(), g.height())
        })
        .unwrap_or(Rect::new(0, 0, 1920, 1080))
}

//  Fake window-manager model

#[derive(Debug, Clone)]
struct DemoClient {
    id: WindowId,
    geometry: Rect,
    states: Vec<String>,
}

impl Client for DemoClient {
    fn outer_geometry(&self) -> Rect {
        self.geometry
    }

    fn window_id(&self) -> WindowId {
        self.id
    }

    fn states(&self) -> &[String] {
        &self.states
    }
}

/// Tiles three windows according to the current layout step.
#[derive(Debug, Clone)]
struct DemoManager {
    desktop: Rect,
    step: Rc<Cell<usize>>,
}

impl DemoManager {
    fn layout_name(&self) -> &'static str {
        LAYOUTS[self.step.get() % LAYOUTS.len()]
    }

    fn client(&self, id: WindowId, x: i32, y: i32, w: i32, h: i32) -> DemoClient {
        DemoClient {
            id,
            geometry: Rect::new(self.desktop.x + x, self.desktop.y + y, w, h),
            states: Vec::new(),
        }
    }
}

impl Manager for DemoManager {
    type Client = DemoClient;

    fn clients(&self) -> Vec<DemoClient> {
        let (w, h) = (self.desktop.width, self.desktop.height);
        match self.layout_name() {
            "vertical-left" => vec![
                self.client(1, 0, 0, w / 2, h),
                self.client(2, w / 2, 0, w / 2, h / 2),
                self.client(3, w / 2, h / 2, w / 2, h / 2),
            ],
            "horizontal-top" => vec![
                self.client(1, 0, 0, w, h / 2),
                self.client(2, 0, h / 2, w / 2, h / 2),
                self.client(3, w / 2, h / 2, w / 2, h / 2),
            ],
            "fullscreen" => (1..=3).map(|id| self.client(id, 0, 0, w, h)).collect(),
            _ => Vec::new(),
        }
    }

    fn visible(&self, allowed: usize) -> Vec<DemoClient> {
        self.clients().into_iter().take(allowed).collect()
    }

    fn is_master(&self, client: &DemoClient) -> bool {
        client.id == 1
    }
}

struct DemoWorkspace {
    manager: DemoManager,
}

impl Workspace for DemoWorkspace {
    type Manager = DemoManager;

    fn active_layout(&self) -> Layout<DemoManager> {
        Layout {
            name: self.manager.layout_name().to_string(),
            manager: self.manager.clone(),
        }
    }
}

/// Draws a filled circle per window, tinted by window id.
struct DemoIcons;

impl IconSource for DemoIcons {
    fn find_icon(&self, window: WindowId, width: u32, height: u32) -> Option<RgbaImage> {
        let tint = (window * 70 % 255) as u8;
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let r = cx.min(cy);
        Some(RgbaImage::from_fn(width, height, |x, y| {
            let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            if dx * dx + dy * dy <= r * r {
                Rgba([255, tint, 255 - tint, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }
}

//  Main

fn main() {
    env_logger::init();

    if let Err(e) = gtk4::init() {
        error!("failed to initialise GTK4: {}", e);
        std::process::exit(1);
    }

    let config = load_config();
    let desktop = first_monitor();
    info!(
        "desktop {}x{}+{}+{}, overlay for {}ms",
        desktop.width, desktop.height, desktop.x, desktop.y, config.overlay.duration_ms
    );

    let overlay = LayoutOverlay::new(
        config.overlay.clone(),
        config.palette(),
        GtkBackend::new(),
        GlibTimers,
        desktop,
        DemoIcons,
    );

    let step = Rc::new(Cell::new(0usize));
    let workspace = DemoWorkspace {
        manager: DemoManager {
            desktop,
            step: step.clone(),
        },
    };

    overlay.show_layout(&workspace);
    glib::timeout_add_local(Duration::from_millis(STEP_MS), move || {
        step.set(step.get() + 1);
        overlay.show_layout(&workspace);
        glib::ControlFlow::Continue
    });

    eprintln!("Layout overlay demo running, press Ctrl-C to quit.");
    let main_loop = glib::MainLoop::new(None, false);
    main_loop.run();
}
