use std::{borrow::Cow, path::PathBuf};

use anyhow::Context as _;
use image::{DynamicImage, ImageEncoder as _, codecs::png::PngEncoder, imageops};

use crate::{
    config::Canvas,
    decode::{decode_animation, decode_static},
    error::{AdmintError, AdmintResult},
    logo::Logo,
    palette::quantize,
    store::MediaKind,
};

#[derive(Clone, Debug)]
/// One finished advertisement image or animation, ready for upload.
pub struct Creative {
    pub name: String,
    pub format: MediaKind,
    pub path: PathBuf,
}

/// Pixel-overlay engine for a single generation run: fixed canvas, one
/// shared logo, deterministic placement.
#[derive(Clone, Debug)]
pub struct Compositor<'a> {
    canvas: Canvas,
    logo: &'a Logo,
    margin: u32,
}

impl<'a> Compositor<'a> {
    pub fn new(canvas: Canvas, logo: &'a Logo, margin: u32) -> AdmintResult<Self> {
        if canvas.width > u32::from(u16::MAX) || canvas.height > u32::from(u16::MAX) {
            return Err(AdmintError::validation(
                "canvas dimensions exceed the animated format's 16-bit limit",
            ));
        }
        if logo.width() + margin > canvas.width || logo.height() + margin > canvas.height {
            return Err(AdmintError::validation(format!(
                "logo footprint {}x{} with margin {} does not fit canvas {}x{}",
                logo.width(),
                logo.height(),
                margin,
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            canvas,
            logo,
            margin,
        })
    }

    /// Logo placement: inset from the bottom-right canvas corner.
    pub fn logo_offset(&self) -> (i64, i64) {
        (
            i64::from(self.canvas.width - self.logo.width() - self.margin),
            i64::from(self.canvas.height - self.logo.height() - self.margin),
        )
    }

    /// Composite a template of the given kind into encoded output bytes.
    pub fn render(&self, kind: MediaKind, template_bytes: &[u8]) -> AdmintResult<Vec<u8>> {
        match kind {
            MediaKind::StaticRaster => self.render_static(template_bytes),
            MediaKind::AnimatedRaster => self.render_animated(template_bytes),
        }
    }

    /// Static path: resize to canvas, overlay the logo, flatten to RGB,
    /// re-encode as a fresh PNG. No source metadata survives, so
    /// identical inputs produce identical bytes.
    fn render_static(&self, template_bytes: &[u8]) -> AdmintResult<Vec<u8>> {
        let template = decode_static(template_bytes)?;
        let mut composed = template
            .resize_exact(
                self.canvas.width,
                self.canvas.height,
                imageops::FilterType::Lanczos3,
            )
            .to_rgba8();

        let (x, y) = self.logo_offset();
        imageops::overlay(&mut composed, self.logo.image(), x, y);

        let flat = DynamicImage::ImageRgba8(composed).to_rgb8();
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                flat.as_raw(),
                self.canvas.width,
                self.canvas.height,
                image::ExtendedColorType::Rgb8,
            )
            .context("encode png")?;
        Ok(out)
    }

    /// Animated path: every reconstructed frame is resized and composited
    /// on its own fresh buffer (the reconstruction is never mutated, so
    /// the logo cannot accumulate across frames), quantized, and written
    /// back with the source's delays, loop count, and transparency index.
    /// Disposal is `Background` on every frame; without it the logo and
    /// transparent regions smear across subsequent frames.
    fn render_animated(&self, template_bytes: &[u8]) -> AdmintResult<Vec<u8>> {
        let anim = decode_animation(template_bytes)?;
        let (x, y) = self.logo_offset();

        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(
                &mut out,
                self.canvas.width as u16,
                self.canvas.height as u16,
                &[],
            )
            .context("create gif encoder")?;
            encoder.set_repeat(anim.repeat).context("write gif loop count")?;

            for source in &anim.frames {
                let mut composed = imageops::resize(
                    &source.image,
                    self.canvas.width,
                    self.canvas.height,
                    imageops::FilterType::Lanczos3,
                );
                imageops::overlay(&mut composed, self.logo.image(), x, y);

                let indexed = quantize(&composed, anim.transparent_index);
                let frame = gif::Frame {
                    width: self.canvas.width as u16,
                    height: self.canvas.height as u16,
                    delay: source.delay_centis,
                    dispose: gif::DisposalMethod::Background,
                    transparent: indexed.transparent,
                    palette: Some(indexed.palette),
                    buffer: Cow::Owned(indexed.indices),
                    ..gif::Frame::default()
                };
                encoder.write_frame(&frame).context("write gif frame")?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    use super::*;

    fn test_logo() -> Logo {
        Logo::from_rgba(RgbaImage::from_pixel(45, 14, Rgba([255, 0, 255, 255])), 45, 14)
    }

    fn png_template(color: [u8; 4], w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba(color));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    /// Full-screen frames cycling red/green/blue over a 6-color global
    /// palette with transparency index 5. When `hole` is set, the top 8
    /// rows of every frame are transparent.
    fn gif_template(delays: &[u16], size: (u16, u16), hole: bool) -> Vec<u8> {
        let palette = &[
            255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0, 0, 255, 255, 0, 0, 0,
        ];
        let (w, h) = size;
        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut out, w, h, palette).unwrap();
            encoder.set_repeat(gif::Repeat::Infinite).unwrap();
            for (i, &delay) in delays.iter().enumerate() {
                let mut buffer = vec![(i % 3) as u8; w as usize * h as usize];
                if hole {
                    for px in buffer.iter_mut().take(w as usize * 8) {
                        *px = 5;
                    }
                }
                let frame = gif::Frame {
                    width: w,
                    height: h,
                    delay,
                    transparent: Some(5),
                    dispose: gif::DisposalMethod::Background,
                    buffer: Cow::Owned(buffer),
                    ..gif::Frame::default()
                };
                encoder.write_frame(&frame).unwrap();
            }
        }
        out
    }

    fn compositor_fixture(logo: &Logo) -> Compositor<'_> {
        Compositor::new(Canvas::new(96, 80), logo, 10).unwrap()
    }

    #[test]
    fn logo_must_fit_the_canvas() {
        let logo = test_logo();
        assert!(Compositor::new(Canvas::new(50, 20), &logo, 10).is_err());
        assert!(Compositor::new(Canvas::new(96, 80), &logo, 10).is_ok());
    }

    #[test]
    fn offset_is_bottom_right_inset() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        assert_eq!(compositor.logo_offset(), (96 - 45 - 10, 80 - 14 - 10));
    }

    #[test]
    fn static_output_is_byte_reproducible() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        let template = png_template([30, 60, 90, 255], 64, 64);

        let first = compositor.render(MediaKind::StaticRaster, &template).unwrap();
        let second = compositor.render(MediaKind::StaticRaster, &template).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn static_output_places_logo_and_flattens_to_rgb() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        let template = png_template([30, 60, 90, 255], 64, 64);

        let out = compositor.render(MediaKind::StaticRaster, &template).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        let rgb = decoded.to_rgb8();
        assert_eq!((rgb.width(), rgb.height()), (96, 80));

        // Inside the logo region.
        assert_eq!(rgb.get_pixel(96 - 10 - 1, 80 - 10 - 1).0, [255, 0, 255]);
        // Far corner keeps the template color.
        assert_eq!(rgb.get_pixel(0, 0).0, [30, 60, 90]);
    }

    #[test]
    fn animated_output_preserves_delays_loop_and_transparency() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        let template = gif_template(&[10, 15, 10], (96, 80), true);

        let out = compositor.render(MediaKind::AnimatedRaster, &template).unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(Cursor::new(out.as_slice())).unwrap();
        assert_eq!(decoder.repeat(), gif::Repeat::Infinite);

        let mut delays = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            delays.push(frame.delay);
            assert_eq!(frame.dispose, gif::DisposalMethod::Background);
            assert_eq!(frame.transparent, Some(5));
        }
        assert_eq!(delays, vec![10, 15, 10]);
    }

    #[test]
    fn animated_frames_do_not_ghost_the_previous_frame() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        // Frame colors cycle red, green, blue, no transparency.
        let template = gif_template(&[10, 10, 10], (96, 80), false);

        let out = compositor.render(MediaKind::AnimatedRaster, &template).unwrap();
        let frames = decode_animation(&out).unwrap();
        assert_eq!(frames.frames.len(), 3);

        // Away from the logo region, frame 2 must be its own color
        // (green), unaffected by frame 1 having had the logo pasted.
        let second = &frames.frames[1].image;
        let px = second.get_pixel(2, 2).0;
        assert!(px[1] > 180 && px[0] < 60 && px[2] < 60, "expected green, got {px:?}");

        let third = &frames.frames[2].image;
        let px = third.get_pixel(2, 2).0;
        assert!(px[2] > 180 && px[0] < 60 && px[1] < 60, "expected blue, got {px:?}");
    }

    #[test]
    fn corrupt_template_is_a_decode_error() {
        let logo = test_logo();
        let compositor = compositor_fixture(&logo);
        assert!(matches!(
            compositor.render(MediaKind::StaticRaster, b"junk"),
            Err(AdmintError::Decode(_))
        ));
        assert!(matches!(
            compositor.render(MediaKind::AnimatedRaster, b"junk"),
            Err(AdmintError::Decode(_))
        ));
    }
}
