//! Utility functions: named colors and geometry-string parsing.

use image::Rgba;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
pub const ORANGE: Rgba<u8> = Rgba([255, 128, 0, 255]);
pub const PINK: Rgba<u8> = Rgba([255, 0, 255, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Maps color name strings to pixel values.
///
/// Used by the configuration system to parse the boundary color.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_rgba(name: &str) -> Option<Rgba<u8>> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Parses a `WxH` size string, e.g. `1000x800`.
pub fn parse_size(input: &str) -> Option<(f64, f64)> {
    let (width, height) = input.split_once(['x', 'X'])?;
    let width: f64 = width.trim().parse().ok()?;
    let height: f64 = height.trim().parse().ok()?;
    if width > 0.0 && height > 0.0 {
        Some((width, height))
    } else {
        None
    }
}

/// Parses an `X,Y` coordinate pair, e.g. `0,340`.
pub fn parse_pair(input: &str) -> Option<(f64, f64)> {
    let (x, y) = input.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Parses an `X,Y,WxH` rectangle string, e.g. `100,50,200x150`.
///
/// Sizes must be non-negative; a zero-size rectangle is a valid
/// (degenerate) selection.
pub fn parse_rect(input: &str) -> Option<(f64, f64, f64, f64)> {
    let (x, rest) = input.split_once(',')?;
    let (y, size) = rest.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    let (width, height) = size.split_once(['x', 'X'])?;
    let width: f64 = width.trim().parse().ok()?;
    let height: f64 = height.trim().parse().ok()?;
    if width < 0.0 || height < 0.0 {
        return None;
    }
    Some((x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_resolve_case_insensitively() {
        assert_eq!(name_to_rgba("red"), Some(RED));
        assert_eq!(name_to_rgba("Yellow"), Some(YELLOW));
        assert_eq!(name_to_rgba("BLACK"), Some(BLACK));
        assert_eq!(name_to_rgba("chartreuse"), None);
    }

    #[test]
    fn size_strings_parse() {
        assert_eq!(parse_size("1000x800"), Some((1000.0, 800.0)));
        assert_eq!(parse_size("1280X720"), Some((1280.0, 720.0)));
        assert_eq!(parse_size("0x800"), None);
        assert_eq!(parse_size("800"), None);
        assert_eq!(parse_size("axb"), None);
    }

    #[test]
    fn pair_strings_parse() {
        assert_eq!(parse_pair("0,340"), Some((0.0, 340.0)));
        assert_eq!(parse_pair(" 12 , 7.5 "), Some((12.0, 7.5)));
        assert_eq!(parse_pair("12"), None);
    }

    #[test]
    fn rect_strings_parse() {
        assert_eq!(parse_rect("100,50,200x150"), Some((100.0, 50.0, 200.0, 150.0)));
        assert_eq!(parse_rect("100,50,0x0"), Some((100.0, 50.0, 0.0, 0.0)));
        assert_eq!(parse_rect("100,50,-5x10"), None);
        assert_eq!(parse_rect("100,200x150"), None);
    }
}
