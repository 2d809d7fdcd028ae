//! Color scales and discrete palettes used by the report charts.

use serde::Serialize;

/// Backend independent RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn hex(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }
}

pub const DARK_SLATE_GREY: Rgb = Rgb(47, 79, 79);
pub const YELLOW_GREEN: Rgb = Rgb(154, 205, 50);
pub const LIGHT_YELLOW: Rgb = Rgb(255, 255, 224);

const BLUES: [Rgb; 9] = [
    Rgb::hex(0xf7fbff),
    Rgb::hex(0xdeebf7),
    Rgb::hex(0xc6dbef),
    Rgb::hex(0x9ecae1),
    Rgb::hex(0x6baed6),
    Rgb::hex(0x4292c6),
    Rgb::hex(0x2171b5),
    Rgb::hex(0x08519c),
    Rgb::hex(0x08306b),
];

const PURD: [Rgb; 9] = [
    Rgb::hex(0xf7f4f9),
    Rgb::hex(0xe7e1ef),
    Rgb::hex(0xd4b9da),
    Rgb::hex(0xc994c7),
    Rgb::hex(0xdf65b0),
    Rgb::hex(0xe7298a),
    Rgb::hex(0xce1256),
    Rgb::hex(0x980043),
    Rgb::hex(0x67001f),
];

const PEACH: [Rgb; 7] = [
    Rgb::hex(0xfde0c5),
    Rgb::hex(0xfacba6),
    Rgb::hex(0xf8b58b),
    Rgb::hex(0xf59e72),
    Rgb::hex(0xf2855d),
    Rgb::hex(0xef6a4c),
    Rgb::hex(0xeb4a40),
];

const BURG: [Rgb; 7] = [
    Rgb::hex(0xffc6c4),
    Rgb::hex(0xf4a3a8),
    Rgb::hex(0xe38191),
    Rgb::hex(0xcc607d),
    Rgb::hex(0xad466c),
    Rgb::hex(0x8b3058),
    Rgb::hex(0x672044),
];

const TURBO: [Rgb; 15] = [
    Rgb::hex(0x30123b),
    Rgb::hex(0x4145ab),
    Rgb::hex(0x4675ed),
    Rgb::hex(0x39a2fc),
    Rgb::hex(0x1bcfd4),
    Rgb::hex(0x24eca6),
    Rgb::hex(0x61fc6c),
    Rgb::hex(0xa4fc3b),
    Rgb::hex(0xd1e834),
    Rgb::hex(0xf3c63a),
    Rgb::hex(0xfe9b2d),
    Rgb::hex(0xf36315),
    Rgb::hex(0xd93806),
    Rgb::hex(0xb11901),
    Rgb::hex(0x7a0402),
];

const PURP: [Rgb; 7] = [
    Rgb::hex(0xf3e0f7),
    Rgb::hex(0xe4c7f1),
    Rgb::hex(0xd1afe8),
    Rgb::hex(0xb998dd),
    Rgb::hex(0x9f82ce),
    Rgb::hex(0x826dba),
    Rgb::hex(0x63589f),
];

const T10: [Rgb; 10] = [
    Rgb::hex(0x4c78a8),
    Rgb::hex(0xf58518),
    Rgb::hex(0xe45756),
    Rgb::hex(0x72b7b2),
    Rgb::hex(0x54a24b),
    Rgb::hex(0xeeca3b),
    Rgb::hex(0xb279a2),
    Rgb::hex(0xff9da6),
    Rgb::hex(0x9d755d),
    Rgb::hex(0xbab0ac),
];

/// Continuous color scale, sampled by interpolating between its stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorScale {
    Blues,
    PuRd,
    Peach,
    Burg,
    Turbo,
}

impl ColorScale {
    fn stops(self) -> &'static [Rgb] {
        match self {
            ColorScale::Blues => &BLUES,
            ColorScale::PuRd => &PURD,
            ColorScale::Peach => &PEACH,
            ColorScale::Burg => &BURG,
            ColorScale::Turbo => &TURBO,
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn sample(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let lower = pos.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        stops[lower].lerp(stops[upper], pos - lower as f64)
    }

    /// Color for `value` with the scale spanning `[min, max]`.
    /// A degenerate range maps to the top of the scale.
    pub fn map(self, value: f64, min: f64, max: f64) -> Rgb {
        if max > min {
            self.sample((value - min) / (max - min))
        } else {
            self.sample(1.0)
        }
    }
}

/// Discrete palette, cycled when there are more series than colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palette {
    T10,
    Purp,
}

impl Palette {
    pub fn color(self, index: usize) -> Rgb {
        let colors: &[Rgb] = match self {
            Palette::T10 => &T10,
            Palette::Purp => &PURP,
        };
        colors[index % colors.len()]
    }
}

/// How a view colors its marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorScheme {
    /// Color each mark by its value on a continuous scale.
    Continuous(ColorScale),
    /// One palette color per category or series.
    Discrete(Palette),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_hits_end_stops() {
        assert_eq!(ColorScale::Blues.sample(0.0), Rgb::hex(0xf7fbff));
        assert_eq!(ColorScale::Blues.sample(1.0), Rgb::hex(0x08306b));
        assert_eq!(ColorScale::Burg.sample(2.0), Rgb::hex(0x672044));
    }

    #[test]
    fn sample_interpolates_between_stops() {
        // Blues has 9 stops, so 1/16 is halfway between the first two.
        let mid = ColorScale::Blues.sample(1.0 / 16.0);
        assert_eq!(mid, Rgb(0xeb, 0xf3, 0xfb));
    }

    #[test]
    fn degenerate_range_maps_to_top() {
        assert_eq!(ColorScale::PuRd.map(3.0, 3.0, 3.0), Rgb::hex(0x67001f));
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(Palette::Purp.color(7), Palette::Purp.color(0));
        assert_eq!(Palette::T10.color(11), Palette::T10.color(1));
    }
}
