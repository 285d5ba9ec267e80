/// Presents packed RGBA frames as truecolor half-block cells
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Maps a rasterized frame onto the terminal grid. Every character cell
/// shows two vertically stacked pixels through the upper-half-block glyph:
/// foreground color for the upper pixel, background color for the lower.
pub struct FramePresenter {
    width: usize,
    height: usize,
}

impl FramePresenter {
    /// `width` and `height` are in pixels; one terminal row displays two
    /// pixel rows
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("Presenter width and height must be positive and non-zero".to_string());
        }
        Ok(Self { width, height })
    }

    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), String> {
        if width == 0 || height == 0 {
            return Err("Presenter width and height must be positive and non-zero".to_string());
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Queues the frame onto `writer` without flushing. The frame length
    /// must match this presenter's size.
    pub fn present<W: Write>(&self, frame: &[u32], writer: &mut W) -> std::io::Result<()> {
        debug_assert_eq!(frame.len(), self.width * self.height);

        for cell_row in 0..self.height.div_ceil(2) {
            writer.queue(cursor::MoveTo(0, cell_row as u16))?;
            for column in 0..self.width {
                let upper = frame[(cell_row * 2) * self.width + column];
                let lower = match cell_row * 2 + 1 {
                    row if row < self.height => frame[row * self.width + column],
                    _ => 0,
                };
                writer.queue(SetForegroundColor(unpack(upper)))?;
                writer.queue(SetBackgroundColor(unpack(lower)))?;
                writer.queue(Print('▀'))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Splits a packed pixel (red in the most significant byte) into a
/// terminal color; the alpha byte is dropped
fn unpack(pixel: u32) -> Color {
    Color::Rgb {
        r: (pixel >> 24) as u8,
        g: (pixel >> 16) as u8,
        b: (pixel >> 8) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_extracts_channels() {
        let color = unpack(0x4080_C0FF);
        assert_eq!(color, Color::Rgb { r: 0x40, g: 0x80, b: 0xC0 });
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(FramePresenter::new(0, 10).is_err());
        assert!(FramePresenter::new(10, 0).is_err());
        assert!(FramePresenter::new(10, 10).is_ok());
    }

    #[test]
    fn test_present_writes_one_cell_per_two_pixel_rows() {
        let presenter = FramePresenter::new(2, 4).unwrap();
        let frame = vec![0xFF00_00FF; 8];
        let mut output = Vec::new();
        presenter.present(&frame, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches('▀').count(), 4);
    }
}
