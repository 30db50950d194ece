//! Colormaps and pixel packing.

/// Pack 8-bit channels as `A<<24 | B<<16 | G<<8 | R`, the byte order of
/// an RGBA canvas read as little-endian `u32`.
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r)
}

/// Polynomial fit of matplotlib's viridis, coefficients `c0..c6` per channel.
const VIRIDIS: [[f64; 3]; 7] = [
    [0.277_727_327_223_417_7, 0.005_407_344_544_966_578, 0.334_099_805_335_306_1],
    [0.105_093_043_108_577_4, 1.404_613_529_898_575, 1.384_590_162_594_685],
    [-0.330_861_828_725_556_3, 0.214_847_559_468_213, 0.095_095_163_028_236_59],
    [-4.634_230_498_983_486, -5.799_100_973_351_585, -19.332_440_956_279_87],
    [6.228_269_936_347_081, 14.179_933_366_805_09, 56.690_552_600_681_05],
    [4.776_384_997_670_288, -13.745_145_377_746_01, -65.353_032_633_372_34],
    [-5.435_455_855_934_631, 4.645_852_612_178_535, 26.312_435_249_583_2],
];

/// Mapping from a normalised value in `[0, 1]` to a colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Colormap {
    /// Perceptually uniform dark-purple to yellow.
    #[default]
    Viridis,
    /// Black to white.
    Grayscale,
}

impl Colormap {
    /// Viridis when `use_color_map`, grayscale otherwise.
    pub fn from_flag(use_color_map: bool) -> Self {
        if use_color_map {
            Self::Viridis
        } else {
            Self::Grayscale
        }
    }

    /// Channels in `[0, 1]` for `t`, which is clamped first.
    pub fn rgb(self, t: f64) -> [f64; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Grayscale => [t, t, t],
            Self::Viridis => {
                let mut c = [0.0; 3];
                for (ch, out) in c.iter_mut().enumerate() {
                    *out = VIRIDIS
                        .iter()
                        .rev()
                        .fold(0.0, |acc, coeffs| acc * t + coeffs[ch])
                        .clamp(0.0, 1.0);
                }
                c
            }
        }
    }

    /// Packed opaque pixel for `t`.
    pub fn pixel(self, t: f64) -> u32 {
        let [r, g, b] = self.rgb(t).map(|v| (v * 255.0).round() as u8);
        pack_rgba(r, g, b, u8::MAX)
    }
}

/// A colormap sampled at 256 levels.
#[derive(Clone, Debug)]
pub struct ColorLut {
    table: [u32; 256],
}

impl ColorLut {
    /// Sample `colormap` at `i/255` for every level.
    pub fn new(colormap: Colormap) -> Self {
        let mut table = [0u32; 256];
        for (i, px) in table.iter_mut().enumerate() {
            *px = colormap.pixel(i as f64 / 255.0);
        }
        Self { table }
    }

    /// Pixel for `t` in `[0, 1]`, clamped; NaN maps to level 0.
    pub fn lookup(&self, t: f64) -> u32 {
        let level = if t.is_nan() {
            0
        } else {
            (t.clamp(0.0, 1.0) * 255.0).round() as usize
        };
        self.table[level]
    }
}
