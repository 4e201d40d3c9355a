use super::*;

#[test]
fn multiplier_matches_print_density_ratio() {
    assert_eq!(resolution_multiplier(false), 1.0);
    let m = resolution_multiplier(true);
    assert!((m - 300.0 / 72.0).abs() < 1e-12);
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 100).is_err());
    assert!(Canvas::new(100, 0).is_err());
    assert!(Canvas::new(1, 1).is_ok());
}

#[test]
fn scaled_dimensions_round_up() {
    let canvas = Canvas::new(800, 600).unwrap();
    assert_eq!(canvas.scaled(1.0), (800, 600));

    let m = resolution_multiplier(true);
    let (w, h) = canvas.scaled(m);
    assert_eq!(w, (800.0 * m).ceil() as u32);
    assert_eq!(h, (600.0 * m).ceil() as u32);
}

#[test]
fn color_deserializes_from_hex_object_and_array() {
    let hex: Color = serde_json::from_str("\"#336699\"").unwrap();
    assert_eq!(hex, Color::rgba(0x33, 0x66, 0x99, 255));

    let hex8: Color = serde_json::from_str("\"33669980\"").unwrap();
    assert_eq!(hex8.a, 0x80);

    let obj: Color = serde_json::from_str("{\"r\":1,\"g\":2,\"b\":3}").unwrap();
    assert_eq!(obj, Color::rgba(1, 2, 3, 255));

    let arr: Color = serde_json::from_str("[10,20,30,40]").unwrap();
    assert_eq!(arr, Color::rgba(10, 20, 30, 40));
}

#[test]
fn color_rejects_malformed_hex() {
    assert!(serde_json::from_str::<Color>("\"#12345\"").is_err());
    assert!(serde_json::from_str::<Color>("\"#zzzzzz\"").is_err());
}

#[test]
fn opacity_check_uses_alpha_only() {
    assert!(Color::WHITE.is_opaque());
    assert!(!Color::rgba(255, 255, 255, 254).is_opaque());
}
