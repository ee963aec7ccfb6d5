/// Geographic position in degrees (WGS84 latitude / longitude).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns this position shifted by the given deltas in degrees.
    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn offset_shifts_both_axes() {
        let p = LatLng::new(46.0, 14.5).offset(0.5, -0.25);
        assert_eq!(p, LatLng::new(46.5, 14.25));
    }
}
