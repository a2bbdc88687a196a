//! 0xRRGGBB helpers for the canvas renderer

/// CSS hex string for a packed color
pub fn css(color: u32) -> String {
    format!("#{:06x}", color & 0xffffff)
}

/// Per-channel blend from `a` to `b`
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let ca = ((a >> shift) & 0xff) as f32;
        let cb = ((b >> shift) & 0xff) as f32;
        ((ca + (cb - ca) * t).round() as u32) << shift
    };
    ch(16) | ch(8) | ch(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_hex() {
        assert_eq!(css(0xe74c3c), "#e74c3c");
        assert_eq!(css(0x00ff00), "#00ff00");
        assert_eq!(css(0xff_123456), "#123456");
    }

    #[test]
    fn test_lerp_color() {
        assert_eq!(lerp_color(0x000000, 0xffffff, 0.0), 0x000000);
        assert_eq!(lerp_color(0x000000, 0xffffff, 1.0), 0xffffff);
        assert_eq!(lerp_color(0x006400, 0x00b400, 0.5), 0x008c00);
        // Out-of-range t is clamped
        assert_eq!(lerp_color(0x102030, 0x405060, 2.0), 0x405060);
    }
}
