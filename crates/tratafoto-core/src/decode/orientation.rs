//! EXIF orientation reader.
//!
//! Never fails: a missing EXIF block, an unreadable one, or a container that
//! cannot carry EXIF at all all resolve to [`Orientation::Undefined`].

use std::io::{BufRead, Cursor, Seek};

use exif::{In, Reader, Tag};

use super::{ImageSource, Orientation};

/// Read the orientation tag of an image source.
pub fn read_orientation(source: &ImageSource) -> Orientation {
    match source.open() {
        Ok(mut reader) => orientation_from_container(&mut reader),
        Err(e) => {
            log::debug!("No orientation for {}: {}", source, e);
            Orientation::Undefined
        }
    }
}

/// Read the orientation tag from encoded bytes already in memory.
pub fn orientation_from_bytes(bytes: &[u8]) -> Orientation {
    orientation_from_container(&mut Cursor::new(bytes))
}

fn orientation_from_container<R: BufRead + Seek>(reader: &mut R) -> Orientation {
    match Reader::new().read_from_container(reader) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from_exif_tag)
            .unwrap_or(Orientation::Undefined),
        Err(exif::Error::NotFound(_)) => Orientation::Undefined,
        Err(e) => {
            log::warn!("Ignoring malformed EXIF block: {}", e);
            Orientation::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encode_test_jpeg, gradient_raster, with_exif_orientation};

    fn tagged_jpeg(tag: u16) -> Vec<u8> {
        with_exif_orientation(&encode_test_jpeg(&gradient_raster(8, 4)), tag)
    }

    #[test]
    fn test_no_exif_segment() {
        let jpeg = encode_test_jpeg(&gradient_raster(8, 4));
        assert_eq!(orientation_from_bytes(&jpeg), Orientation::Undefined);
    }

    #[test]
    fn test_invalid_data() {
        assert_eq!(orientation_from_bytes(&[0x00, 0x01, 0x02]), Orientation::Undefined);
        assert_eq!(orientation_from_bytes(&[]), Orientation::Undefined);
    }

    #[test]
    fn test_cardinal_tags() {
        assert_eq!(orientation_from_bytes(&tagged_jpeg(1)), Orientation::Normal);
        assert_eq!(orientation_from_bytes(&tagged_jpeg(3)), Orientation::Rotate180);
        assert_eq!(orientation_from_bytes(&tagged_jpeg(6)), Orientation::Rotate90);
        assert_eq!(orientation_from_bytes(&tagged_jpeg(8)), Orientation::Rotate270);
    }

    #[test]
    fn test_mirrored_tags_are_undefined() {
        assert_eq!(orientation_from_bytes(&tagged_jpeg(2)), Orientation::Undefined);
        assert_eq!(orientation_from_bytes(&tagged_jpeg(5)), Orientation::Undefined);
    }

    #[test]
    fn test_truncated_exif_segment() {
        let mut jpeg = tagged_jpeg(6);
        // Cut the TIFF block short, leaving the APP1 length pointing past it
        jpeg.truncate(20);
        assert_eq!(orientation_from_bytes(&jpeg), Orientation::Undefined);
    }

    #[test]
    fn test_read_from_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.jpg");
        std::fs::write(&path, tagged_jpeg(8)).unwrap();

        let source = ImageSource::from_path(&path);
        assert_eq!(read_orientation(&source), Orientation::Rotate270);
    }

    #[test]
    fn test_missing_file_is_undefined() {
        let source = ImageSource::from_path("/no/such/photo.jpg");
        assert_eq!(read_orientation(&source), Orientation::Undefined);
    }

    #[test]
    fn test_png_without_exif() {
        let mut png = Vec::new();
        image::RgbaImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(orientation_from_bytes(&png), Orientation::Undefined);
    }
}
