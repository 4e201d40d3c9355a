use super::*;

fn frame(data: Vec<u8>) -> FrameRGBA {
    let px = (data.len() / 4) as u32;
    FrameRGBA {
        width: px.max(1),
        height: 1,
        data,
        premultiplied: true,
    }
}

#[test]
fn fully_opaque_frame_has_no_transparency() {
    let f = frame(vec![10, 20, 30, 255, 40, 50, 60, 255]);
    assert!(!has_transparency(&f));
}

#[test]
fn one_translucent_pixel_flips_the_result() {
    let f = frame(vec![10, 20, 30, 255, 40, 50, 60, 254]);
    assert!(has_transparency(&f));
}

#[test]
fn fully_transparent_pixel_counts() {
    let f = frame(vec![0, 0, 0, 0]);
    assert!(has_transparency(&f));
}

#[test]
fn empty_frame_is_opaque() {
    let f = frame(vec![]);
    assert!(!has_transparency(&f));
}
