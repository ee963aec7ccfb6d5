use foundation::{LatLng, LatLngBounds};

use crate::surface::MapSurface;

/// Half-size (degrees) of the box a single point is widened to before fitting.
pub const MIN_EXTENT_DEG: f64 = 0.01;

/// Widens single-point bounds so fitting does not zoom in to the maximum.
///
/// The rectangle is extended through two points offset diagonally by
/// `MIN_EXTENT_DEG` on each side. Other bounds are returned unchanged.
pub fn pad_degenerate(mut bounds: LatLngBounds) -> LatLngBounds {
    if !bounds.is_point() {
        return bounds;
    }
    if let Some(ne) = bounds.north_east() {
        bounds.extend(ne.offset(MIN_EXTENT_DEG, MIN_EXTENT_DEG));
        bounds.extend(ne.offset(-MIN_EXTENT_DEG, -MIN_EXTENT_DEG));
    }
    bounds
}

/// Bounds the viewport should show for the given visible positions.
///
/// With nothing visible, falls back to `full` (every entry known so far).
/// Returns `None` when both are empty.
pub fn target_bounds<I>(visible: I, full: &LatLngBounds) -> Option<LatLngBounds>
where
    I: IntoIterator<Item = LatLng>,
{
    let visible = LatLngBounds::from_points(visible);
    let chosen = if visible.is_empty() { *full } else { visible };
    if chosen.is_empty() {
        return None;
    }
    Some(pad_degenerate(chosen))
}

/// Fits `surface` to the visible positions, or to `full` when none are visible.
///
/// Returns the bounds that were requested, if any.
pub fn fit_to_positions<M, I>(
    surface: &mut M,
    visible: I,
    full: &LatLngBounds,
) -> Option<LatLngBounds>
where
    M: MapSurface + ?Sized,
    I: IntoIterator<Item = LatLng>,
{
    let bounds = target_bounds(visible, full)?;
    surface.fit_bounds(&bounds);
    Some(bounds)
}
