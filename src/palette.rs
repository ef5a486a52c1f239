use color_quant::NeuQuant;
use image::RgbaImage;

/// Pixels below this alpha map to the transparent palette slot.
pub const ALPHA_CUTOFF: u8 = 128;

/// NeuQuant sampling factor (1 = exhaustive, 30 = fastest). Matches the
/// default the `image` GIF encoder uses.
const SAMPLE_FACTOR: i32 = 10;

#[derive(Clone, Debug)]
/// An animation frame quantized to an indexed 8-bit palette.
pub struct IndexedFrame {
    /// RGB palette bytes, 3 per entry.
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
    /// Palette slot standing for fully transparent pixels, if any.
    pub transparent: Option<u8>,
}

/// Quantize an RGBA frame to an adaptive 256-color palette.
///
/// When the frame contains transparent pixels, one palette slot is
/// reserved for them at `reserved_slot` (the source animation's
/// transparency index; slot 0 when the source had none) and the remaining
/// 255 slots are trained on the opaque pixels only. Fully opaque frames
/// use all 256 slots and carry no transparent index.
pub fn quantize(image: &RgbaImage, reserved_slot: Option<u8>) -> IndexedFrame {
    let has_transparency = image.pixels().any(|p| p.0[3] < ALPHA_CUTOFF);
    if !has_transparency {
        let quant = NeuQuant::new(SAMPLE_FACTOR, 256, image.as_raw());
        let indices = image.pixels().map(|p| quant.index_of(&p.0) as u8).collect();
        return IndexedFrame {
            palette: quant.color_map_rgb(),
            indices,
            transparent: None,
        };
    }

    let slot = reserved_slot.unwrap_or(0);
    let opaque: Vec<u8> = image
        .pixels()
        .filter(|p| p.0[3] >= ALPHA_CUTOFF)
        .flat_map(|p| p.0)
        .collect();

    if opaque.is_empty() {
        // Degenerate all-transparent frame: single black entry plus the
        // reserved slot.
        return IndexedFrame {
            palette: vec![0; 256 * 3],
            indices: vec![slot; image.len() / 4],
            transparent: Some(slot),
        };
    }

    let quant = NeuQuant::new(SAMPLE_FACTOR, 255, &opaque);
    let indices = image
        .pixels()
        .map(|p| {
            if p.0[3] < ALPHA_CUTOFF {
                slot
            } else {
                shift_past_slot(quant.index_of(&p.0) as u8, slot)
            }
        })
        .collect();

    let trained = quant.color_map_rgb();
    let mut palette = Vec::with_capacity(256 * 3);
    for entry in 0..=255u8 {
        if entry == slot {
            palette.extend_from_slice(&[0, 0, 0]);
        } else {
            // Entries after the reserved slot shift up by one.
            let src = if entry < slot { entry } else { entry - 1 } as usize;
            let rgb = trained.get(src * 3..src * 3 + 3).unwrap_or(&[0, 0, 0]);
            palette.extend_from_slice(rgb);
        }
    }

    IndexedFrame {
        palette,
        indices,
        transparent: Some(slot),
    }
}

/// Map a 0..=254 trained index into the 256-entry palette that has the
/// transparent slot spliced in.
fn shift_past_slot(index: u8, slot: u8) -> u8 {
    if index >= slot { index + 1 } else { index }
}
