//! Shared helpers for unit tests.

use crate::image::Image;

/// Image of the given size with every pixel set to `value`.
pub(crate) fn filled(height: usize, width: usize, value: f32) -> Image {
    let mut image = Image::new(height, width);
    for row in 0..height {
        for col in 0..width {
            image.set_pixel(row, col, value).unwrap();
        }
    }
    image
}

/// Assert both images have the same size and no pixel differs by more than
/// `epsilon`.
#[track_caller]
pub(crate) fn assert_images_close(actual: &Image, expected: &Image, epsilon: f32) {
    assert_eq!(
        (actual.height(), actual.width()),
        (expected.height(), expected.width()),
        "image sizes differ: {actual} vs {expected}"
    );

    let mut max_error = 0.0f32;
    let mut worst = (0, 0);
    for row in 0..actual.height() {
        for col in 0..actual.width() {
            let a = actual.pixel(row, col).unwrap();
            let e = expected.pixel(row, col).unwrap();
            let error = (a - e).abs();
            if error > max_error {
                max_error = error;
                worst = (row, col);
            }
        }
    }

    assert!(
        max_error <= epsilon,
        "max pixel error {max_error} at {worst:?} exceeds {epsilon}"
    );
}
