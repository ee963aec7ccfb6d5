/// Track stroke for entries at even positions in a group payload.
pub const TRACK_COLOR_EVEN: &str = "#0000cc";
/// Track stroke for entries at odd positions in a group payload.
pub const TRACK_COLOR_ODD: &str = "#006600";
pub const TRACK_OPACITY_IDLE: f64 = 0.5;
pub const TRACK_OPACITY_HOVER: f64 = 1.0;

const FALLBACK_MARKER_COLOR: [f32; 3] = [0.8, 0.2, 0.0];
const MARKER_BORDER_SHADE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub background: String,
    pub border: String,
    pub glyph: String,
    pub scale: f64,
}

impl MarkerStyle {
    /// Pin colored with the group color and a darker border of the same hue.
    ///
    /// Unparseable colors fall back to a fixed orange.
    pub fn for_group_color(color: &str) -> Self {
        let rgb = parse_hex_color(color).unwrap_or(FALLBACK_MARKER_COLOR);
        let border = rgb.map(|c| c * MARKER_BORDER_SHADE);
        Self {
            background: color_to_hex(rgb),
            border: color_to_hex(border),
            glyph: "#ffffff".to_string(),
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineStyle {
    pub stroke_color: &'static str,
    pub stroke_opacity: f64,
    pub geodesic: bool,
}

impl PolylineStyle {
    /// Style for the track of the entry at `position` in its payload.
    ///
    /// Colors alternate by position, not by any property of the track.
    pub fn for_position(position: usize) -> Self {
        let stroke_color = if position % 2 == 0 {
            TRACK_COLOR_EVEN
        } else {
            TRACK_COLOR_ODD
        };
        Self {
            stroke_color,
            stroke_opacity: TRACK_OPACITY_IDLE,
            geodesic: true,
        }
    }
}

pub fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return None;
    }
    let (r, g, b) = match s.len() {
        6 => (
            u8::from_str_radix(&s[0..2], 16).ok()?,
            u8::from_str_radix(&s[2..4], 16).ok()?,
            u8::from_str_radix(&s[4..6], 16).ok()?,
        ),
        // #rgb shorthand
        3 => {
            let r = u8::from_str_radix(&s[0..1], 16).ok()?;
            let g = u8::from_str_radix(&s[1..2], 16).ok()?;
            let b = u8::from_str_radix(&s[2..3], 16).ok()?;
            (r * 17, g * 17, b * 17)
        }
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

pub fn color_to_hex(rgb: [f32; 3]) -> String {
    let r = (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_colors_alternate_by_position() {
        assert_eq!(PolylineStyle::for_position(0).stroke_color, TRACK_COLOR_EVEN);
        assert_eq!(PolylineStyle::for_position(1).stroke_color, TRACK_COLOR_ODD);
        assert_eq!(PolylineStyle::for_position(4).stroke_color, TRACK_COLOR_EVEN);
        let s = PolylineStyle::for_position(3);
        assert_eq!(s.stroke_opacity, TRACK_OPACITY_IDLE);
        assert!(s.geodesic);
    }

    #[test]
    fn marker_style_uses_group_color() {
        let s = MarkerStyle::for_group_color("#CC3300");
        assert_eq!(s.background, "#cc3300");
        assert_eq!(s.border, "#8f2400");
        assert_eq!(s.glyph, "#ffffff");
    }

    #[test]
    fn bad_color_falls_back() {
        let s = MarkerStyle::for_group_color("tomato");
        assert_eq!(s.background, "#cc3300");
    }

    #[test]
    fn parses_shorthand_hex() {
        assert_eq!(parse_hex_color("#fff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_hex_color("12345"), None);
    }
}
