use crate::cel::Cel;

/// One frame's window into a strip of frames laid out left to right.
pub(crate) struct FrameCanvas<'c> {
    strip: &'c mut [u8],
    stride: usize,
    origin_x: usize,
    width: usize,
    height: usize,
}

impl<'c> FrameCanvas<'c> {
    /// The window of frame `index` in a strip of `width` x `height` frames.
    pub(crate) fn in_strip(strip: &'c mut [u8], width: u16, height: u16, index: u16) -> Self {
        let width = width as usize;
        let height = height as usize;
        let stride = if height == 0 { 0 } else { strip.len() / height };
        debug_assert!((index as usize + 1) * width <= stride || width == 0);
        FrameCanvas {
            strip,
            stride,
            origin_x: index as usize * width,
            width,
            height,
        }
    }

    /// Draws the cel at its offset, clipped to the frame. Index 0 is
    /// transparent and leaves the canvas untouched.
    pub(crate) fn blit(&mut self, cel: &Cel<'_, '_>) {
        let cel_width = cel.size.width as usize;
        let x0 = cel.x as i32;
        let y0 = cel.y as i32;
        let x_end = x0 + cel.size.width as i32;
        let y_end = y0 + cel.size.height as i32;

        let x_from = x0.max(0);
        let x_to = x_end.min(self.width as i32);
        let y_from = y0.max(0);
        let y_to = y_end.min(self.height as i32);
        if x_from >= x_to || y_from >= y_to {
            return;
        }

        for y in y_from..y_to {
            let src_row = (y - y0) as usize * cel_width;
            let dst_row = y as usize * self.stride + self.origin_x;
            for x in x_from..x_to {
                let pixel = cel.pixels[src_row + (x - x0) as usize];
                if pixel != 0 {
                    self.strip[dst_row + x as usize] = pixel;
                }
            }
        }
    }
}
