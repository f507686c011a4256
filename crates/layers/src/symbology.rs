//! Deterministic value → color / elevation encodings.
//!
//! Every function here is pure: identical inputs always give identical
//! outputs, so rendered frames can be compared byte for byte.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Rgb::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Parses `#rgb` / `#rrggbb` (the `#` is optional). Malformed input is white.
pub fn parse_hex_color(s: &str) -> Rgb {
    try_parse_hex_color(s).unwrap_or(Rgb::WHITE)
}

fn try_parse_hex_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match s.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Closed numeric domain used to normalize values.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const UNIT: ValueRange = ValueRange { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Min/max of the finite values; `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ValueRange>, v| {
                Some(match acc {
                    None => ValueRange::new(v, v),
                    Some(r) => ValueRange::new(r.min.min(v), r.max.max(v)),
                })
            })
    }

    /// `(v - min) / (max - min)` clamped to [0, 1]; a zero span maps to 0.
    /// Non-finite values have no position.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let span = self.max - self.min;
        if span == 0.0 || !span.is_finite() {
            return Some(0.0);
        }
        Some(((value - self.min) / span).clamp(0.0, 1.0))
    }
}

/// Piecewise-linear color ramp. Stop positions are ascending in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub stops: &'static [(f64, Rgb)],
    /// Returned for non-finite input.
    pub unknown: Rgb,
}

/// Diverging blue → white → red, for temperature-like fields.
pub const TEMPERATURE: Gradient = Gradient {
    stops: &[
        (0.0, Rgb::new(0x21, 0x66, 0xac)),
        (0.25, Rgb::new(0x67, 0xa9, 0xcf)),
        (0.5, Rgb::new(0xf7, 0xf7, 0xf7)),
        (0.75, Rgb::new(0xef, 0x8a, 0x62)),
        (1.0, Rgb::new(0xb2, 0x18, 0x2b)),
    ],
    unknown: Rgb::new(0x9e, 0x9e, 0x9e),
};

/// Teal → amber → red, for probabilities in [0, 1].
pub const PROBABILITY: Gradient = Gradient {
    stops: &[
        (0.0, Rgb::new(0x00, 0x80, 0x80)),
        (0.5, Rgb::new(0xff, 0xbf, 0x00)),
        (1.0, Rgb::new(0xd7, 0x19, 0x1c)),
    ],
    unknown: Rgb::new(0x9e, 0x9e, 0x9e),
};

impl Gradient {
    /// Color at normalized position `t` (clamped).
    pub fn sample(&self, t: f64) -> Rgb {
        if !t.is_finite() {
            return self.unknown;
        }
        let t = t.clamp(0.0, 1.0);
        let Some(&(first_pos, first)) = self.stops.first() else {
            return self.unknown;
        };
        if t <= first_pos {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                let local = if span > 0.0 { (t - p0) / span } else { 0.0 };
                return c0.lerp(c1, local);
            }
        }
        self.stops.last().map(|s| s.1).unwrap_or(self.unknown)
    }
}

pub fn gradient_color(value: f64, range: ValueRange, gradient: &Gradient) -> Rgb {
    match range.normalize(value) {
        Some(t) => gradient.sample(t),
        None => gradient.unknown,
    }
}

/// Probability color; the domain is always [0, 1].
pub fn probability_color(p: f64) -> Rgb {
    gradient_color(p, ValueRange::UNIT, &PROBABILITY)
}

/// Normalized value × `scale_max`; non-finite values sit at 0.
pub fn elevation(value: f64, range: ValueRange, scale_max: f64) -> f64 {
    range.normalize(value).map(|t| t * scale_max).unwrap_or(0.0)
}

/// Single-hue ramp from a pale tint (t = 0) to `base` (t = 1).
pub fn tint(base: Rgb, t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    Rgb::WHITE.lerp(base, 0.25 + 0.75 * t)
}

/// Mesoscale eddy class from sea-surface height anomaly and vorticity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EddyClass {
    Cyclonic,
    Anticyclonic,
    Neutral,
    Undefined,
}

impl EddyClass {
    pub fn classify(ssha: f64, vorticity: f64) -> Self {
        if !ssha.is_finite() || !vorticity.is_finite() {
            return EddyClass::Undefined;
        }
        if ssha < 0.0 && vorticity < 0.0 {
            EddyClass::Cyclonic
        } else if ssha > 0.0 && vorticity > 0.0 {
            EddyClass::Anticyclonic
        } else {
            EddyClass::Neutral
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyclonic" => Some(EddyClass::Cyclonic),
            "anticyclonic" => Some(EddyClass::Anticyclonic),
            "neutral" => Some(EddyClass::Neutral),
            "undefined" => Some(EddyClass::Undefined),
            _ => None,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            EddyClass::Cyclonic => Rgb::new(0x1f, 0x78, 0xb4),
            EddyClass::Anticyclonic => Rgb::new(0xe3, 0x1a, 0x1c),
            EddyClass::Neutral => Rgb::new(0xbd, 0xbd, 0xbd),
            EddyClass::Undefined => Rgb::new(0x63, 0x63, 0x63),
        }
    }
}
