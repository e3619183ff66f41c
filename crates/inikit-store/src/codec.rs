//! Typed codecs over the raw string store.
//!
//! Geometry and color values live in the file as plain strings in the legacy
//! encodings (`{X=120,Y=80}`, `{Width=640,Height=480}`,
//! `{A255;R30;G30;B30}`). Decoding is intentionally tolerant rather than
//! validating: these files get hand-edited, and a half-broken value should
//! degrade per component instead of discarding the whole thing.

use std::fmt;

/// Screen coordinate pair, encoded as `{X=<int>,Y=<int>}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decode, with each component falling back independently: a text that
    /// carries only `X=` keeps the fallback `y`, and vice versa.
    pub fn decode(text: &str, fallback: Point) -> Point {
        Point {
            x: labeled_int(text, "X").unwrap_or(fallback.x),
            y: labeled_int(text, "Y").unwrap_or(fallback.y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X={},Y={}}}", self.x, self.y)
    }
}

/// Width/height pair, encoded as `{Width=<int>,Height=<int>}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Same independent per-component fallback rule as `Point::decode`.
    pub fn decode(text: &str, fallback: Size) -> Size {
        Size {
            width: labeled_int(text, "Width").unwrap_or(fallback.width),
            height: labeled_int(text, "Height").unwrap_or(fallback.height),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Width={},Height={}}}", self.width, self.height)
    }
}

/// ARGB color, encoded as `{A<int>;R<int>;G<int>;B<int>}`.
///
/// Channels are `u8`, so the encoder cannot produce an out-of-range value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Tolerant scan for `<letter><digits>` tokens, in any order, ASCII
    /// case-insensitive. A channel whose letter never appears stays 0; a
    /// repeated letter keeps its last occurrence; a digit run that does not
    /// fit in a `u8` decodes as 0. This is deliberately permissive parsing
    /// for hand-edited files, not validation.
    pub fn decode(text: &str) -> Color {
        let mut color = Color::default();
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let letter = bytes[i].to_ascii_uppercase();
            if !matches!(letter, b'A' | b'R' | b'G' | b'B') {
                i += 1;
                continue;
            }
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end == start {
                i += 1;
                continue;
            }
            let value = text[start..end].parse::<u8>().unwrap_or(0);
            match letter {
                b'A' => color.a = value,
                b'R' => color.r = value,
                b'G' => color.g = value,
                _ => color.b = value,
            }
            i = end;
        }
        color
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{A{};R{};G{};B{}}}", self.a, self.r, self.g, self.b)
    }
}

/// Find `<label>=<int>` in `text` and parse the integer (optional leading
/// `-`, so encoded off-screen coordinates round-trip). The label must not
/// sit inside a longer word: the preceding character may not be
/// alphanumeric. First well-formed occurrence wins.
fn labeled_int(text: &str, label: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find(label) {
        let at = from + pos;
        from = at + 1;
        if at > 0 && bytes[at - 1].is_ascii_alphanumeric() {
            continue;
        }
        let Some(num) = text[at + label.len()..].strip_prefix('=') else {
            continue;
        };
        let body = num.strip_prefix('-').unwrap_or(num);
        let digits = body.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            continue;
        }
        let end = if num.starts_with('-') { digits + 1 } else { digits };
        if let Ok(value) = num[..end].parse::<i32>() {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_round_trips() {
        let p = Point::new(120, 80);
        assert_eq!(p.to_string(), "{X=120,Y=80}");
        assert_eq!(Point::decode(&p.to_string(), Point::default()), p);
    }

    #[test]
    fn point_components_fall_back_independently() {
        let fallback = Point::new(1, 2);
        assert_eq!(Point::decode("{X=5}", fallback), Point::new(5, 2));
        assert_eq!(Point::decode("{Y=7}", fallback), Point::new(1, 7));
        assert_eq!(Point::decode("garbage", fallback), fallback);
        assert_eq!(Point::decode("{X=,Y=9}", fallback), Point::new(1, 9));
    }

    #[test]
    fn negative_coordinates_round_trip() {
        let p = Point::new(-15, -1);
        assert_eq!(p.to_string(), "{X=-15,Y=-1}");
        assert_eq!(Point::decode(&p.to_string(), Point::default()), p);
    }

    #[test]
    fn size_uses_its_own_labels() {
        let s = Size::new(640, 480);
        assert_eq!(s.to_string(), "{Width=640,Height=480}");
        assert_eq!(Size::decode(&s.to_string(), Size::default()), s);
        // Point labels mean nothing to a Size.
        let fallback = Size::new(3, 4);
        assert_eq!(Size::decode("{X=5,Y=6}", fallback), fallback);
    }

    #[test]
    fn label_must_not_sit_inside_a_word() {
        // "MaxX=9" must not satisfy the X label.
        assert_eq!(
            Point::decode("{MaxX=9,Y=2}", Point::new(1, 0)),
            Point::new(1, 2)
        );
    }

    #[test]
    fn color_round_trips() {
        let c = Color::new(255, 30, 30, 30);
        assert_eq!(c.to_string(), "{A255;R30;G30;B30}");
        assert_eq!(Color::decode(&c.to_string()), c);
    }

    #[test]
    fn color_scan_is_order_independent_last_match_wins() {
        let c = Color::decode("{B10;R5;B20}");
        assert_eq!(c, Color::new(0, 5, 0, 20));
    }

    #[test]
    fn color_scan_is_case_insensitive() {
        assert_eq!(Color::decode("{a1;r2;g3;b4}"), Color::new(1, 2, 3, 4));
    }

    #[test]
    fn color_missing_channels_stay_zero() {
        assert_eq!(Color::decode(""), Color::default());
        assert_eq!(Color::decode("{G128}"), Color::new(0, 0, 128, 0));
    }

    #[test]
    fn color_overflowing_channel_decodes_as_zero() {
        assert_eq!(Color::decode("{R999;G12}"), Color::new(0, 0, 12, 0));
    }
}
