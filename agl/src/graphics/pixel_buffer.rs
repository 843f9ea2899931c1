/// Pixel format description and typed raw-pixel storage.
///
/// Every bitmap, texture, font atlas and framebuffer crossing the AGL
/// boundary arrives as a `PixelBuffer`. Pixels are stored packed, one
/// little-endian word of `bytes_per_pixel` bytes each, with channel layout
/// given by the `PixelFormat` bit widths and shifts.

use crate::error::{Error, Result};

// ============================================================================
// PixelFormat
// ============================================================================

/// Packed pixel layout: bytes per pixel plus per-channel bit widths/shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub bytes_per_pixel: u8,
    pub r_bits: u8,
    pub g_bits: u8,
    pub b_bits: u8,
    pub a_bits: u8,
    pub r_shift: u8,
    pub g_shift: u8,
    pub b_shift: u8,
    pub a_shift: u8,
}

impl PixelFormat {
    /// 32-bit RGBA, bytes in memory R, G, B, A.
    pub const RGBA8888: PixelFormat = PixelFormat::new(4, 8, 8, 8, 8, 0, 8, 16, 24);

    /// 16-bit RGB 5:6:5. Also the carrier format of 16-bit depth images.
    pub const RGB565: PixelFormat = PixelFormat::new(2, 5, 6, 5, 0, 11, 5, 0, 0);

    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        bytes_per_pixel: u8,
        r_bits: u8, g_bits: u8, b_bits: u8, a_bits: u8,
        r_shift: u8, g_shift: u8, b_shift: u8, a_shift: u8,
    ) -> Self {
        Self {
            bytes_per_pixel,
            r_bits, g_bits, b_bits, a_bits,
            r_shift, g_shift, b_shift, a_shift,
        }
    }

    /// Whether the format carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.a_bits > 0
    }

    /// Check that the layout fits in `bytes_per_pixel`.
    ///
    /// Formats that fail here are the ones the conversion path cannot handle.
    pub fn validate(&self) -> Result<()> {
        if self.bytes_per_pixel == 0 || self.bytes_per_pixel > 4 {
            return Err(Error::InitializationFailed(format!(
                "unsupported pixel format: {} bytes per pixel", self.bytes_per_pixel
            )));
        }
        let word_bits = self.bytes_per_pixel as u32 * 8;
        let channels = [
            (self.r_bits, self.r_shift),
            (self.g_bits, self.g_shift),
            (self.b_bits, self.b_shift),
            (self.a_bits, self.a_shift),
        ];
        for (bits, shift) in channels {
            if bits > 8 || (bits > 0 && bits as u32 + shift as u32 > word_bits) {
                return Err(Error::InitializationFailed(format!(
                    "unsupported pixel format: channel of {} bits at shift {} in a {}-bit word",
                    bits, shift, word_bits
                )));
            }
        }
        Ok(())
    }

    /// Unpack a raw word to `[r, g, b, a]`. Formats without alpha read as opaque.
    pub fn decode(&self, raw: u32) -> [u8; 4] {
        let a = if self.a_bits == 0 {
            255
        } else {
            expand_channel(raw >> self.a_shift, self.a_bits)
        };
        [
            expand_channel(raw >> self.r_shift, self.r_bits),
            expand_channel(raw >> self.g_shift, self.g_bits),
            expand_channel(raw >> self.b_shift, self.b_bits),
            a,
        ]
    }

    /// Pack `[r, g, b, a]` into a raw word.
    pub fn encode(&self, rgba: [u8; 4]) -> u32 {
        reduce_channel(rgba[0], self.r_bits) << self.r_shift
            | reduce_channel(rgba[1], self.g_bits) << self.g_shift
            | reduce_channel(rgba[2], self.b_bits) << self.b_shift
            | reduce_channel(rgba[3], self.a_bits) << self.a_shift
    }
}

fn expand_channel(value: u32, bits: u8) -> u8 {
    if bits == 0 {
        return 0;
    }
    let max = (1u32 << bits) - 1;
    let v = value & max;
    if bits == 8 {
        v as u8
    } else {
        ((v * 255 + max / 2) / max) as u8
    }
}

fn reduce_channel(value: u8, bits: u8) -> u32 {
    if bits == 0 {
        0
    } else {
        value as u32 >> (8 - bits)
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Owned, typed raw-pixel storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer of `pixel_count` pixels.
    pub fn new(format: PixelFormat, pixel_count: usize) -> Self {
        Self {
            format,
            data: vec![0; pixel_count * format.bytes_per_pixel as usize],
        }
    }

    /// Wrap raw bytes. The length must be a whole number of pixels.
    pub fn from_bytes(format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        format.validate()?;
        if data.len() % format.bytes_per_pixel as usize != 0 {
            return Err(Error::InvalidResource(format!(
                "{} bytes is not a whole number of {}-byte pixels",
                data.len(), format.bytes_per_pixel
            )));
        }
        Ok(Self { format, data })
    }

    /// Build an RGBA8888 buffer from `[r, g, b, a]` pixels.
    pub fn from_rgba(pixels: &[[u8; 4]]) -> Self {
        Self {
            format: PixelFormat::RGBA8888,
            data: pixels.iter().flatten().copied().collect(),
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.data.len() / self.format.bytes_per_pixel as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    pub fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Raw packed word of pixel `index`.
    pub fn read_raw(&self, index: usize) -> u32 {
        let bpp = self.format.bytes_per_pixel as usize;
        let bytes = &self.data[index * bpp..(index + 1) * bpp];
        bytes.iter().rev().fold(0u32, |acc, &b| (acc << 8) | b as u32)
    }

    /// Overwrite the packed word of pixel `index`.
    pub fn write_raw(&mut self, index: usize, raw: u32) {
        let bpp = self.format.bytes_per_pixel as usize;
        for (i, byte) in self.data[index * bpp..(index + 1) * bpp].iter_mut().enumerate() {
            *byte = (raw >> (8 * i)) as u8;
        }
    }

    pub fn get_rgba_at(&self, index: usize) -> [u8; 4] {
        self.format.decode(self.read_raw(index))
    }

    pub fn get_rgb_at(&self, index: usize) -> (u8, u8, u8) {
        let [r, g, b, _] = self.get_rgba_at(index);
        (r, g, b)
    }

    pub fn get_argb_at(&self, index: usize) -> (u8, u8, u8, u8) {
        let [r, g, b, a] = self.get_rgba_at(index);
        (a, r, g, b)
    }

    /// Write an opaque pixel.
    pub fn set_pixel_at(&mut self, index: usize, r: u8, g: u8, b: u8) {
        let raw = self.format.encode([r, g, b, 255]);
        self.write_raw(index, raw);
    }

    pub fn set_argb_at(&mut self, index: usize, a: u8, r: u8, g: u8, b: u8) {
        let raw = self.format.encode([r, g, b, a]);
        self.write_raw(index, raw);
    }

    /// Copy pixels `[offset, offset + count)` of `src` into the same range of
    /// this buffer, converting when the formats differ.
    pub fn copy_buffer(&mut self, offset: usize, count: usize, src: &PixelBuffer) -> Result<()> {
        let end = offset + count;
        if end > self.len() || end > src.len() {
            return Err(Error::InvalidResource(format!(
                "copy of pixels {}..{} out of range (dst {}, src {})",
                offset, end, self.len(), src.len()
            )));
        }

        if src.format == self.format {
            let bpp = self.format.bytes_per_pixel as usize;
            self.data[offset * bpp..end * bpp].copy_from_slice(&src.data[offset * bpp..end * bpp]);
        } else {
            for i in offset..end {
                let raw = self.format.encode(src.get_rgba_at(i));
                self.write_raw(i, raw);
            }
        }
        Ok(())
    }

    /// Zero the first `count` pixels.
    pub fn clear(&mut self, count: usize) {
        let bytes = (count * self.format.bytes_per_pixel as usize).min(self.data.len());
        self.data[..bytes].fill(0);
    }

    /// A copy of this buffer in `format` (a scratch buffer when the formats differ).
    pub fn converted(&self, format: PixelFormat) -> Result<PixelBuffer> {
        if format == self.format {
            return Ok(self.clone());
        }
        format.validate()?;
        let mut dst = PixelBuffer::new(format, self.len());
        dst.copy_buffer(0, self.len(), self)?;
        Ok(dst)
    }

    /// Whether any pixel has an alpha value below 255.
    pub fn has_transparency(&self) -> bool {
        self.format.has_alpha() && (0..self.len()).any(|i| self.get_rgba_at(i)[3] < 255)
    }
}

#[cfg(test)]
#[path = "pixel_buffer_tests.rs"]
mod tests;
