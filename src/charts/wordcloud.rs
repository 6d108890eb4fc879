//! Word Cloud Layout
//! Places words on a fixed canvas, largest first, walking an Archimedean
//! spiral out from the centre until a free spot is found.

use crate::config::WordCloudConfig;
use crate::stats::WordFrequency;

/// Approximate glyph advance relative to font size.
const CHAR_WIDTH_RATIO: f32 = 0.55;
/// Line height relative to font size.
const LINE_HEIGHT_RATIO: f32 = 1.15;
const SPIRAL_STEP: f32 = 0.1;
const SPIRAL_GROWTH: f32 = 2.0;
const FONT_STEP: f32 = 2.0;

/// Word colours (viridis stops), cycled by frequency rank.
pub const WORD_PALETTE: [(u8, u8, u8); 8] = [
    (68, 1, 84),
    (70, 50, 126),
    (54, 92, 141),
    (39, 127, 142),
    (31, 161, 135),
    (74, 193, 109),
    (160, 218, 57),
    (189, 175, 32),
];

/// A word placed on the canvas. `x`/`y` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rank by frequency, 0 for the most frequent word.
    pub rank: usize,
}

impl PlacedWord {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn overlaps(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x < self.x + self.width && self.x < x + w && y < self.y + self.height && self.y < y + h
    }
}

/// Result of laying out a word cloud on a `width` x `height` canvas.
#[derive(Debug, Clone, Default)]
pub struct WordCloudLayout {
    pub width: f32,
    pub height: f32,
    pub words: Vec<PlacedWord>,
}

impl WordCloudLayout {
    /// Lay out `frequencies` (most frequent first) on the configured canvas.
    pub fn build(frequencies: &[WordFrequency], config: &WordCloudConfig) -> Self {
        let mut layout = Self {
            width: config.width,
            height: config.height,
            words: Vec::new(),
        };

        let Some(max_count) = frequencies.iter().map(|f| f.count).max() else {
            return layout;
        };
        let max_font = config.max_font_size.min(config.height);
        let scaling = config.relative_scaling.clamp(0.0, 1.0);

        for (rank, freq) in frequencies.iter().enumerate() {
            let relative = freq.count as f32 / max_count as f32;
            let mut font_size = (max_font * (scaling * relative + (1.0 - scaling))).round();

            loop {
                if font_size < config.min_font_size {
                    // Nothing smaller will fit either.
                    return layout;
                }
                if let Some(word) = layout.place(&freq.word, font_size, rank) {
                    layout.words.push(word);
                    break;
                }
                font_size -= FONT_STEP;
            }
        }

        layout
    }

    /// Estimated box size of `text` at `font_size`.
    pub fn measure(text: &str, font_size: f32) -> (f32, f32) {
        let chars = text.chars().count() as f32;
        (chars * font_size * CHAR_WIDTH_RATIO, font_size * LINE_HEIGHT_RATIO)
    }

    fn place(&self, text: &str, font_size: f32, rank: usize) -> Option<PlacedWord> {
        let (w, h) = Self::measure(text, font_size);
        if w > self.width || h > self.height {
            return None;
        }

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let max_radius = (self.width.powi(2) + self.height.powi(2)).sqrt() / 2.0;
        let mut theta = 0.0f32;

        loop {
            let r = SPIRAL_GROWTH * theta;
            if r > max_radius {
                return None;
            }
            // Spiral is stretched to the canvas aspect ratio.
            let px = cx + r * theta.cos() * (self.width / self.height);
            let py = cy + r * theta.sin();
            let x = px - w / 2.0;
            let y = py - h / 2.0;

            let inside = x >= 0.0 && y >= 0.0 && x + w <= self.width && y + h <= self.height;
            if inside && !self.words.iter().any(|p| p.overlaps(x, y, w, h)) {
                return Some(PlacedWord {
                    text: text.to_string(),
                    font_size,
                    x,
                    y,
                    width: w,
                    height: h,
                    rank,
                });
            }

            theta += SPIRAL_STEP;
        }
    }
}
