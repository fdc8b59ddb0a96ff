use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let decoded = decode_image(&png_bytes(1, 1, vec![100, 50, 200, 128])).unwrap();
    assert_eq!((decoded.width, decoded.height), (1, 1));
    assert_eq!(
        decoded.rgba8_premul,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn transparent_pixels_become_zero() {
    let decoded = decode_image(&png_bytes(1, 1, vec![10, 20, 30, 0])).unwrap();
    assert_eq!(decoded.rgba8_premul, vec![0, 0, 0, 0]);
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(decode_image(b"definitely not an image").is_err());
}
