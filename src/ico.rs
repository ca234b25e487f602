//! Single-image ICO encoding.
//!
//! The container holds exactly one 32-bit BGRA bitmap:
//!
//! ```text
//! offset  size                      region
//! 0       6                         ICONDIR
//! 6       16                        ICONDIRENTRY
//! 22      40                        BITMAPINFOHEADER
//! 62      size*size*4               pixels, bottom-up BGRA
//! ...     ceil(size/8)*size         AND mask, all zero
//! ```
//!
//! Directory width and height are single bytes, so sizes above 255 are
//! written as 0. The bitmap header always carries the real width and twice
//! the height (XOR image plus AND mask).

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::EncodeError;
use crate::icon::RasterImage;

/// Length of the ICONDIR header.
pub const ICONDIR_SIZE: usize = 6;

/// Length of one ICONDIRENTRY.
pub const ICONDIRENTRY_SIZE: usize = 16;

/// Length of a BITMAPINFOHEADER.
pub const BITMAPINFOHEADER_SIZE: usize = 40;

/// Offset of the bitmap data when the file has one entry.
pub const IMAGE_OFFSET: u32 = (ICONDIR_SIZE + ICONDIRENTRY_SIZE) as u32;

const RESOURCE_TYPE_ICON: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

// ============================================================================
// Regions
// ============================================================================

/// The ICONDIR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirHeader {
    pub reserved: u16,
    pub resource_type: u16,
    pub count: u16,
}

impl IconDirHeader {
    /// A header announcing one icon image.
    pub fn single() -> Self {
        Self {
            reserved: 0,
            resource_type: RESOURCE_TYPE_ICON,
            count: 1,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.resource_type)?;
        writer.write_u16::<LittleEndian>(self.count)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            return Err(invalid(format!("reserved field is {reserved}, expected 0")));
        }
        let resource_type = reader.read_u16::<LittleEndian>()?;
        if resource_type != RESOURCE_TYPE_ICON {
            return Err(invalid(format!("resource type is {resource_type}, expected 1")));
        }
        let count = reader.read_u16::<LittleEndian>()?;
        Ok(Self {
            reserved,
            resource_type,
            count,
        })
    }
}

/// One ICONDIRENTRY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    /// Width in pixels; 0 means 256 or more.
    pub width: u8,
    /// Height in pixels; 0 means 256 or more.
    pub height: u8,
    pub palette_colors: u8,
    pub reserved: u8,
    pub planes: u16,
    pub bits_per_pixel: u16,
    /// Length of the bitmap header, pixels and mask.
    pub bytes_in_resource: u32,
    pub image_offset: u32,
}

impl IconDirEntry {
    /// The entry for a 32-bit image of `size` pixels square.
    pub fn for_size(size: u32) -> Self {
        let dimension = if size <= 255 { size as u8 } else { 0 };
        Self {
            width: dimension,
            height: dimension,
            palette_colors: 0,
            reserved: 0,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            bytes_in_resource: BITMAPINFOHEADER_SIZE as u32 + image_bytes(size),
            image_offset: IMAGE_OFFSET,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.width)?;
        writer.write_u8(self.height)?;
        writer.write_u8(self.palette_colors)?;
        writer.write_u8(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.bytes_in_resource)?;
        writer.write_u32::<LittleEndian>(self.image_offset)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        Ok(Self {
            width: reader.read_u8()?,
            height: reader.read_u8()?,
            palette_colors: reader.read_u8()?,
            reserved: reader.read_u8()?,
            planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            bytes_in_resource: reader.read_u32::<LittleEndian>()?,
            image_offset: reader.read_u32::<LittleEndian>()?,
        })
    }
}

/// The BITMAPINFOHEADER preceding the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Twice the image height: color rows plus mask rows.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BitmapInfoHeader {
    pub fn for_size(size: u32) -> Self {
        Self {
            header_size: BITMAPINFOHEADER_SIZE as u32,
            width: size as i32,
            height: (size * 2) as i32,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            image_size: image_bytes(size),
            x_pixels_per_meter: 0,
            y_pixels_per_meter: 0,
            colors_used: 0,
            colors_important: 0,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.header_size)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.image_size)?;
        writer.write_i32::<LittleEndian>(self.x_pixels_per_meter)?;
        writer.write_i32::<LittleEndian>(self.y_pixels_per_meter)?;
        writer.write_u32::<LittleEndian>(self.colors_used)?;
        writer.write_u32::<LittleEndian>(self.colors_important)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        let header_size = reader.read_u32::<LittleEndian>()?;
        if header_size as usize != BITMAPINFOHEADER_SIZE {
            return Err(invalid(format!("bitmap header size is {header_size}, expected 40")));
        }
        Ok(Self {
            header_size,
            width: reader.read_i32::<LittleEndian>()?,
            height: reader.read_i32::<LittleEndian>()?,
            planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            compression: reader.read_u32::<LittleEndian>()?,
            image_size: reader.read_u32::<LittleEndian>()?,
            x_pixels_per_meter: reader.read_i32::<LittleEndian>()?,
            y_pixels_per_meter: reader.read_i32::<LittleEndian>()?,
            colors_used: reader.read_u32::<LittleEndian>()?,
            colors_important: reader.read_u32::<LittleEndian>()?,
        })
    }
}

/// The three headers of a single-image ICO file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoHeader {
    pub dir: IconDirHeader,
    pub entry: IconDirEntry,
    pub bitmap: BitmapInfoHeader,
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

// ============================================================================
// Sizes
// ============================================================================

/// Bytes in the AND mask: one bit per pixel, rows padded to whole bytes.
pub fn mask_bytes(size: u32) -> u32 {
    size.div_ceil(8) * size
}

/// Bytes of pixel data plus mask.
pub fn image_bytes(size: u32) -> u32 {
    size * size * 4 + mask_bytes(size)
}

/// Total length of an encoded file.
pub fn ico_len(size: u32) -> usize {
    IMAGE_OFFSET as usize + BITMAPINFOHEADER_SIZE + image_bytes(size) as usize
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes straight RGBA pixels (row-major, top row first) as an ICO file.
///
/// # Example
///
/// ```
/// use iconmaker::encode_ico;
///
/// let pixels = vec![255u8; 32 * 32 * 4];
/// let ico = encode_ico(&pixels, 32).unwrap();
/// assert_eq!(ico.len(), 4286);
/// assert_eq!(&ico[..6], &[0, 0, 1, 0, 1, 0]);
/// ```
pub fn encode_ico(pixels: &[u8], size: u32) -> Result<Vec<u8>, EncodeError> {
    if size == 0 {
        return Err(EncodeError::EmptyImage);
    }
    let expected = size as usize * size as usize * 4;
    if pixels.len() != expected {
        return Err(EncodeError::BufferSize {
            size,
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Vec::with_capacity(ico_len(size));
    IconDirHeader::single().write_to(&mut out)?;
    IconDirEntry::for_size(size).write_to(&mut out)?;
    BitmapInfoHeader::for_size(size).write_to(&mut out)?;

    // Bottom-up rows, BGRA order.
    let stride = size as usize * 4;
    for row in pixels.chunks_exact(stride).rev() {
        for px in row.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
    }

    out.resize(out.len() + mask_bytes(size) as usize, 0);
    debug!("encoded {size}x{size} ico ({} bytes)", out.len());
    Ok(out)
}

/// Encodes a raster at its own size.
pub fn encode_ico_image(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    encode_ico(image.pixels(), image.size())
}

/// Parses the three headers at the start of an ICO file.
pub fn read_ico_header(bytes: &[u8]) -> Result<IcoHeader, EncodeError> {
    let mut cursor = Cursor::new(bytes);
    let dir = IconDirHeader::read_from(&mut cursor)?;
    let entry = IconDirEntry::read_from(&mut cursor)?;
    cursor.set_position(entry.image_offset as u64);
    let bitmap = BitmapInfoHeader::read_from(&mut cursor)?;
    Ok(IcoHeader { dir, entry, bitmap })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat((size * size) as usize)
    }

    #[test]
    fn size_32_layout() {
        let ico = encode_ico(&solid(32, [1, 2, 3, 4]), 32).unwrap();
        assert_eq!(ico.len(), 4286);
        assert_eq!(ico.len(), ico_len(32));
        assert_eq!(&ico[0..6], &[0, 0, 1, 0, 1, 0]);
        assert_eq!(ico[6], 32);
        assert_eq!(ico[7], 32);

        let header = read_ico_header(&ico).unwrap();
        assert_eq!(header.entry.bytes_in_resource, 40 + 4096 + 128);
        assert_eq!(header.entry.image_offset, 22);
        assert_eq!(header.bitmap.width, 32);
        assert_eq!(header.bitmap.height, 64);
        assert_eq!(header.bitmap.image_size, 4096 + 128);

        // First pixel is swizzled to BGRA.
        assert_eq!(&ico[62..66], &[3, 2, 1, 4]);
        // Mask is zero.
        assert!(ico[62 + 4096..].iter().all(|&b| b == 0));
    }

    #[test]
    fn size_256_uses_zero_directory_dimensions() {
        let ico = encode_ico(&solid(256, [0, 0, 0, 255]), 256).unwrap();
        let header = read_ico_header(&ico).unwrap();
        assert_eq!(header.entry.width, 0);
        assert_eq!(header.entry.height, 0);
        assert_eq!(header.bitmap.width, 256);
        assert_eq!(header.bitmap.height, 512);
        assert_eq!(ico.len(), 62 + 256 * 256 * 4 + 32 * 256);
    }

    #[test]
    fn size_255_keeps_directory_dimensions() {
        let entry = IconDirEntry::for_size(255);
        assert_eq!((entry.width, entry.height), (255, 255));
    }

    #[test]
    fn rows_are_written_bottom_up() {
        // Top row red, bottom row blue.
        let size = 16;
        let mut pixels = Vec::new();
        for y in 0..size {
            let px = match y {
                0 => [255, 0, 0, 255],
                y if y == size - 1 => [0, 0, 255, 255],
                _ => [0, 255, 0, 255],
            };
            for _ in 0..size {
                pixels.extend_from_slice(&px);
            }
        }
        let ico = encode_ico(&pixels, size).unwrap();
        let data = &ico[62..];
        // First stored pixel: source bottom row, blue, as BGRA.
        assert_eq!(&data[..4], &[255, 0, 0, 255]);
        // Last stored row: source top row, red, as BGRA.
        let last_row = (size as usize - 1) * size as usize * 4;
        assert_eq!(&data[last_row..last_row + 4], &[0, 0, 255, 255]);
    }

    #[test]
    fn mask_rows_round_up() {
        assert_eq!(mask_bytes(16), 32);
        assert_eq!(mask_bytes(20), 60);
        assert_eq!(mask_bytes(1), 1);
    }

    #[test]
    fn rejects_bad_buffers() {
        assert!(matches!(encode_ico(&[], 0), Err(EncodeError::EmptyImage)));
        assert!(matches!(
            encode_ico(&[0; 12], 2),
            Err(EncodeError::BufferSize {
                size: 2,
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn header_reader_rejects_other_containers() {
        let mut ico = encode_ico(&solid(16, [0; 4]), 16).unwrap();
        ico[2] = 2;
        assert!(matches!(read_ico_header(&ico), Err(EncodeError::Io(_))));
        assert!(read_ico_header(&[0, 0]).is_err());
    }

    #[test]
    fn encodes_raster_images() {
        let image = RasterImage::filled(48, [10, 20, 30, 255]).unwrap();
        let ico = encode_ico_image(&image).unwrap();
        assert_eq!(ico.len(), ico_len(48));
        assert_eq!(&ico[62..66], &[30, 20, 10, 255]);
    }
}
