use crate::geo::LatLng;

/// Axis-aligned geographic rectangle described by its southwest and northeast corners.
///
/// An empty bounds contains no points; extending it with a point yields a
/// single-point (degenerate) rectangle. Antimeridian wrapping is not handled.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LatLngBounds {
    corners: Option<(LatLng, LatLng)>,
}

impl LatLngBounds {
    pub const fn empty() -> Self {
        Self { corners: None }
    }

    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        let mut b = Self::empty();
        b.extend(south_west);
        b.extend(north_east);
        b
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut b = Self::empty();
        for p in points {
            b.extend(p);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.corners.map(|(sw, _)| sw)
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.corners.map(|(_, ne)| ne)
    }

    /// Grows the rectangle to include `p`.
    pub fn extend(&mut self, p: LatLng) {
        self.corners = Some(match self.corners {
            None => (p, p),
            Some((sw, ne)) => (
                LatLng::new(sw.lat.min(p.lat), sw.lng.min(p.lng)),
                LatLng::new(ne.lat.max(p.lat), ne.lng.max(p.lng)),
            ),
        });
    }

    /// True when both corners coincide.
    pub fn is_point(&self) -> bool {
        matches!(self.corners, Some((sw, ne)) if sw == ne)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLngBounds;
    use crate::geo::LatLng;

    #[test]
    fn empty_until_extended() {
        let mut b = LatLngBounds::empty();
        assert!(b.is_empty());
        assert!(b.north_east().is_none());

        b.extend(LatLng::new(1.0, 2.0));
        assert!(!b.is_empty());
        assert!(b.is_point());
    }

    #[test]
    fn extend_tracks_min_and_max() {
        let b = LatLngBounds::from_points([
            LatLng::new(46.0, 14.5),
            LatLng::new(45.5, 15.0),
            LatLng::new(46.2, 13.9),
        ]);
        assert_eq!(b.south_west(), Some(LatLng::new(45.5, 13.9)));
        assert_eq!(b.north_east(), Some(LatLng::new(46.2, 15.0)));
        assert!(!b.is_point());
    }

    #[test]
    fn new_orders_corners() {
        let b = LatLngBounds::new(LatLng::new(1.0, 2.0), LatLng::new(-1.0, 0.5));
        assert_eq!(b.south_west(), Some(LatLng::new(-1.0, 0.5)));
        assert_eq!(b.north_east(), Some(LatLng::new(1.0, 2.0)));
    }
}
