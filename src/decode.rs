use std::io::Cursor;

use gif::DisposalMethod;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{AdmintError, AdmintResult};

/// Decode a static raster template.
pub fn decode_static(bytes: &[u8]) -> AdmintResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AdmintError::decode(format!("static image: {e}")))
}

#[derive(Clone, Debug)]
/// One fully reconstructed animation frame at source screen size.
pub struct SourceFrame {
    pub image: RgbaImage,
    /// Display duration in GIF wire units (centiseconds).
    pub delay_centis: u16,
}

#[derive(Clone, Debug)]
/// A decoded animation with every frame reconstructed against the screen
/// canvas, plus the stream-level attributes a re-encode must preserve.
pub struct AnimationSource {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<SourceFrame>,
    /// Netscape loop extension as read from the source.
    pub repeat: gif::Repeat,
    /// First frame's transparent palette index, when the source has one.
    pub transparent_index: Option<u8>,
}

/// Decode an animated template and reconstruct each frame.
///
/// GIF frames are rects drawn onto a shared screen canvas under a
/// per-frame disposal method. Reconstruction replays that state machine:
/// blit the frame rect (transparent pixels leave the canvas untouched),
/// snapshot the canvas as the visible frame, then apply the disposal:
/// `Background` clears the rect, `Previous` restores the pre-blit canvas,
/// `Keep` leaves it.
pub fn decode_animation(bytes: &[u8]) -> AdmintResult<AnimationSource> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(Cursor::new(bytes))
        .map_err(|e| AdmintError::decode(format!("gif header: {e}")))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    if width == 0 || height == 0 {
        return Err(AdmintError::decode("gif screen has zero dimension"));
    }
    let repeat = decoder.repeat();

    let mut canvas = RgbaImage::new(width, height);
    let mut frames = Vec::new();
    let mut transparent_index = None;

    loop {
        let frame = match decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => return Err(AdmintError::decode(format!("gif frame: {e}"))),
        };

        if frames.is_empty() {
            transparent_index = frame.transparent;
        }

        let saved = matches!(frame.dispose, DisposalMethod::Previous).then(|| canvas.clone());

        blit_rgba_rect(
            &mut canvas,
            &frame.buffer,
            u32::from(frame.left),
            u32::from(frame.top),
            u32::from(frame.width),
            u32::from(frame.height),
        );

        frames.push(SourceFrame {
            image: canvas.clone(),
            delay_centis: frame.delay,
        });

        match frame.dispose {
            DisposalMethod::Background => clear_rect(
                &mut canvas,
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width),
                u32::from(frame.height),
            ),
            DisposalMethod::Previous => {
                if let Some(prev) = saved {
                    canvas = prev;
                }
            }
            DisposalMethod::Any | DisposalMethod::Keep => {}
        }
    }

    if frames.is_empty() {
        return Err(AdmintError::decode("animation has no frames"));
    }

    Ok(AnimationSource {
        width,
        height,
        frames,
        repeat,
        transparent_index,
    })
}

/// Draw an RGBA frame rect onto the canvas. Alpha-zero pixels are the
/// frame's transparent holes and must not overwrite canvas content.
fn blit_rgba_rect(canvas: &mut RgbaImage, rgba: &[u8], left: u32, top: u32, w: u32, h: u32) {
    for y in 0..h {
        let cy = top + y;
        if cy >= canvas.height() {
            break;
        }
        for x in 0..w {
            let cx = left + x;
            if cx >= canvas.width() {
                break;
            }
            let off = 4 * (y * w + x) as usize;
            let px = &rgba[off..off + 4];
            if px[3] != 0 {
                canvas.put_pixel(cx, cy, Rgba([px[0], px[1], px[2], px[3]]));
            }
        }
    }
}

fn clear_rect(canvas: &mut RgbaImage, left: u32, top: u32, w: u32, h: u32) {
    for y in top..(top + h).min(canvas.height()) {
        for x in left..(left + w).min(canvas.width()) {
            canvas.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
}
