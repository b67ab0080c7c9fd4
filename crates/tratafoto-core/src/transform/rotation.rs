//! Quarter-turn rotation for orientation correction.
//!
//! Only the three cardinal turns are supported, all done by `image::imageops`
//! over a borrowed view of the raster. Each is an exact pixel permutation, so
//! pixels come through bit-exact.

use image::{imageops, ImageBuffer, Rgba, RgbaImage};

use crate::decode::{Orientation, Raster};

type RasterView<'a> = ImageBuffer<Rgba<u8>, &'a [u8]>;

/// Turn a raster upright according to its EXIF orientation.
///
/// `Normal` and `Undefined` hand the raster back untouched, as does a raster
/// whose buffer does not match its dimensions.
pub fn apply_orientation(raster: Raster, orientation: Orientation) -> Raster {
    let rotated = match orientation {
        Orientation::Rotate90 => rotate90(&raster),
        Orientation::Rotate180 => rotate180(&raster),
        Orientation::Rotate270 => rotate270(&raster),
        Orientation::Normal | Orientation::Undefined => return raster,
    };

    rotated.unwrap_or_else(|| {
        log::warn!(
            "Skipping {:?} for {}x{} raster with {} bytes",
            orientation,
            raster.width,
            raster.height,
            raster.pixels.len()
        );
        raster
    })
}

/// Rotate 90° clockwise. None if the buffer does not match the dimensions.
pub fn rotate90(raster: &Raster) -> Option<Raster> {
    turn(raster, |view| imageops::rotate90(view))
}

/// Rotate 180°.
pub fn rotate180(raster: &Raster) -> Option<Raster> {
    turn(raster, |view| imageops::rotate180(view))
}

/// Rotate 270° clockwise (90° counter-clockwise).
pub fn rotate270(raster: &Raster) -> Option<Raster> {
    turn(raster, |view| imageops::rotate270(view))
}

fn turn<F>(raster: &Raster, op: F) -> Option<Raster>
where
    F: FnOnce(&RasterView<'_>) -> RgbaImage,
{
    let view = RasterView::from_raw(raster.width, raster.height, raster.pixels.as_slice())?;
    if raster.pixels.len() != Raster::expected_len(raster.width, raster.height) {
        return None;
    }
    Some(Raster::from_rgba_image(op(&view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gradient_raster;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const YELLOW: [u8; 4] = [255, 255, 0, 255];

    /// Red on the left, green on the right.
    fn two_by_one() -> Raster {
        Raster::new(2, 1, [RED, GREEN].concat())
    }

    /// ```text
    /// R G
    /// B Y
    /// ```
    fn two_by_two() -> Raster {
        Raster::new(2, 2, [RED, GREEN, BLUE, YELLOW].concat())
    }

    #[test]
    fn test_normal_is_untouched() {
        let img = two_by_two();
        assert_eq!(apply_orientation(img.clone(), Orientation::Normal), img);
    }

    #[test]
    fn test_undefined_is_untouched() {
        let img = two_by_one();
        assert_eq!(apply_orientation(img.clone(), Orientation::Undefined), img);
    }

    #[test]
    fn test_quarter_turn_puts_left_on_top() {
        let result = apply_orientation(two_by_one(), Orientation::Rotate90);

        assert_eq!((result.width, result.height), (1, 2));
        assert_eq!(result.pixel(0, 0), Some(RED));
        assert_eq!(result.pixel(0, 1), Some(GREEN));
    }

    #[test]
    fn test_quarter_turn_square() {
        // R G      B R
        // B Y  ->  Y G
        let result = rotate90(&two_by_two()).unwrap();
        assert_eq!(result.pixels, [BLUE, RED, YELLOW, GREEN].concat());
    }

    #[test]
    fn test_half_turn() {
        let result = apply_orientation(two_by_one(), Orientation::Rotate180);

        assert_eq!((result.width, result.height), (2, 1));
        assert_eq!(result.pixels, [GREEN, RED].concat());
    }

    #[test]
    fn test_three_quarter_turn_square() {
        // R G      G Y
        // B Y  ->  R B
        let result = rotate270(&two_by_two()).unwrap();
        assert_eq!(result.pixels, [GREEN, YELLOW, RED, BLUE].concat());
    }

    #[test]
    fn test_three_quarter_turn_puts_right_on_top() {
        let result = apply_orientation(two_by_one(), Orientation::Rotate270);

        assert_eq!((result.width, result.height), (1, 2));
        assert_eq!(result.pixel(0, 0), Some(GREEN));
        assert_eq!(result.pixel(0, 1), Some(RED));
    }

    #[test]
    fn test_dimensions_follow_orientation() {
        let img = gradient_raster(13, 4);
        for orientation in [
            Orientation::Rotate90,
            Orientation::Rotate180,
            Orientation::Rotate270,
        ] {
            let out = apply_orientation(img.clone(), orientation);
            assert_eq!(out.pixels.len(), img.pixels.len());
            assert_eq!(
                (out.width, out.height),
                orientation.oriented_dimensions(img.width, img.height)
            );
        }
    }

    #[test]
    fn test_mismatched_buffer_is_returned_unchanged() {
        let short = Raster {
            width: 4,
            height: 4,
            pixels: vec![7u8; 10],
        };
        let long = Raster {
            width: 2,
            height: 1,
            pixels: vec![7u8; 12],
        };

        assert_eq!(rotate90(&short), None);
        assert_eq!(rotate180(&long), None);
        assert_eq!(apply_orientation(short.clone(), Orientation::Rotate270), short);
        assert_eq!(apply_orientation(long.clone(), Orientation::Rotate90), long);
    }
}
