pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = (h * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// `0xRRGGBB` to float RGB in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Accepts `#rrggbb`, `0xrrggbb` and a handful of CSS colour names
pub fn parse_color(text: &str) -> Option<[f32; 3]> {
    let text = text.trim();
    let hex = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix("0x"))
        .map(|digits| u32::from_str_radix(digits, 16).ok());

    match hex {
        Some(value) => value.map(hex_to_rgb),
        None => match text.to_ascii_lowercase().as_str() {
            "white" => Some([1.0, 1.0, 1.0]),
            "black" => Some([0.0, 0.0, 0.0]),
            "red" => Some([1.0, 0.0, 0.0]),
            "green" => Some([0.0, 0.5, 0.0]),
            "blue" => Some([0.0, 0.0, 1.0]),
            "yellow" => Some([1.0, 1.0, 0.0]),
            "orange" => Some([1.0, 0.647, 0.0]),
            "cyan" => Some([0.0, 1.0, 1.0]),
            "magenta" => Some([1.0, 0.0, 1.0]),
            "gray" | "grey" => Some([0.5, 0.5, 0.5]),
            _ => None,
        },
    }
}

pub fn rgb_to_bytes(rgb: [f32; 3]) -> [u8; 4] {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_byte(rgb[0]), to_byte(rgb[1]), to_byte(rgb[2]), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_red() {
        let rgb = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_white() {
        let rgb = hsv_to_rgb(0.0, 0.0, 1.0);
        assert!(rgb.iter().all(|c| (c - 1.0).abs() < 0.01));
    }

    #[test]
    fn test_hex_to_rgb_cyan() {
        assert_eq!(hex_to_rgb(0x00ffff), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_color("0x0000ff"), Some([0.0, 0.0, 1.0]));
        assert_eq!(parse_color("White"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_rgb_to_bytes_clamps() {
        assert_eq!(rgb_to_bytes([1.5, -0.2, 0.5]), [255, 0, 128, 255]);
    }
}
