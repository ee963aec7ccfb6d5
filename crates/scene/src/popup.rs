use foundation::{MarkerId, PopupId};

use crate::surface::MapSurface;

/// Tracks every popup ever constructed and keeps at most one open.
///
/// `close_all` does not rely on any notion of "the open one"; it closes every
/// tracked popup, so the single-open guarantee holds even if the surface opened
/// something on its own.
#[derive(Debug, Default)]
pub struct PopupCoordinator {
    popups: Vec<PopupId>,
}

impl PopupCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, popup: PopupId) {
        if !self.popups.contains(&popup) {
            self.popups.push(popup);
        }
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    pub fn close_all<M: MapSurface + ?Sized>(&self, surface: &mut M) {
        for popup in &self.popups {
            surface.close_popup(*popup);
        }
    }

    /// Closes everything, then opens `popup` anchored at `anchor`.
    pub fn open<M: MapSurface + ?Sized>(
        &mut self,
        surface: &mut M,
        popup: PopupId,
        anchor: MarkerId,
    ) {
        self.register(popup);
        self.close_all(surface);
        surface.open_popup(popup, anchor);
    }
}
