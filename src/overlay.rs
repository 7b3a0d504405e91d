//! Entry point: show the active layout of a workspace.
//!
//! [`LayoutOverlay::show_layout`] allocates the background canvas right away
//! and defers everything else by the configured settle delay.  Layout
//! changes tend to arrive in bursts; by the time the deferred render runs
//! the manager reflects the final arrangement.  Each call schedules its own
//! render and the last one to present wins the overlay slot.

use crate::compositor::Compositor;
use crate::config::{OverlayConfig, Palette};
use crate::presenter::Presenter;
use crate::traits::{DesktopGeometry, IconSource, OverlayBackend, Timers, Workspace};
use log::debug;
use std::rc::Rc;

/// Renders and shows layout overlays.
pub struct LayoutOverlay<B, T, D, I>
where
    B: OverlayBackend,
{
    config: OverlayConfig,
    compositor: Compositor,
    presenter: Presenter<B>,
    timers: T,
    desktop: D,
    icons: Rc<I>,
}

impl<B, T, D, I> LayoutOverlay<B, T, D, I>
where
    B: OverlayBackend + 'static,
    T: Timers + Clone + 'static,
    D: DesktopGeometry,
    I: IconSource + 'static,
{
    pub fn new(
        config: OverlayConfig,
        palette: Palette,
        backend: B,
        timers: T,
        desktop: D,
        icons: I,
    ) -> Self {
        Self {
            compositor: Compositor::new(&config, palette),
            config,
            presenter: Presenter::new(backend),
            timers,
            desktop,
            icons: Rc::new(icons),
        }
    }

    /// Handle to the overlay window slot.
    pub fn presenter(&self) -> &Presenter<B> {
        &self.presenter
    }

    /// Draw the active layout of `workspace` and show it briefly.
    ///
    /// Does nothing at all when the overlay is disabled.
    pub fn show_layout<W: Workspace>(&self, workspace: &W) {
        if !self.config.enabled() {
            return;
        }

        let layout = workspace.active_layout();
        let desktop = self.desktop.dimensions();
        let mut canvas = self.compositor.new_canvas(desktop);
        debug!(
            "layout {} on {}x{}+{}+{}, canvas {}x{}",
            layout.name,
            desktop.width,
            desktop.height,
            desktop.x,
            desktop.y,
            canvas.width(),
            canvas.height()
        );

        let compositor = self.compositor.clone();
        let presenter = self.presenter.clone();
        let timers = self.timers.clone();
        let icons = self.icons.clone();
        let duration = self.config.duration();

        self.timers.schedule(
            self.config.settle_delay(),
            Box::new(move || {
                compositor.draw_clients(
                    &mut canvas,
                    &layout.manager,
                    &layout.name,
                    desktop,
                    icons.as_ref(),
                );
                compositor.draw_label(&mut canvas, &layout.name);
                presenter.present(&canvas, desktop.origin(), duration, &timers);
            }),
        );
    }
}
