use serde::{Deserialize, Serialize};

/// A three-component floating point vector used throughout the dialect for
/// positions, rotations (yaw/pitch/roll, in degrees) and scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn from_xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Parses `a/b/c`, `a/b` (z defaults to 0) or `a` (splat), the way the
    /// dialect's vector literals are written. A component that fails to
    /// parse as a float drops the whole literal back to the zero vector —
    /// this mirrors the reference implementation, which silently discards
    /// unparsable components and only accepts a literal when every slash
    /// separated piece parsed cleanly.
    pub fn parse(s: &str) -> Self {
        let parts: Vec<&str> = s.split('/').collect();
        let parsed: Vec<f64> = parts.iter().filter_map(|p| p.trim().parse::<f64>().ok()).collect();
        match (parts.len(), parsed.len()) {
            (1, 1) => Vec3::splat(parsed[0]),
            (2, 2) => Vec3::from_xy(parsed[0], parsed[1]),
            (3, 3) => Vec3::new(parsed[0], parsed[1], parsed[2]),
            _ => Vec3::ZERO,
        }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Applies yaw (about Y), then pitch (about X), then roll (about Z), in
    /// degrees, each step reading the previous step's updated components.
    pub fn rotate(self, r: Vec3) -> Vec3 {
        let mut v = self;

        let (sy, cy) = r.x.to_radians().sin_cos();
        let (x1, z1) = (v.x * cy + v.z * sy, -v.x * sy + v.z * cy);
        v.x = x1;
        v.z = z1;

        let (sp, cp) = r.y.to_radians().sin_cos();
        let (y1, z2) = (v.y * cp - v.z * sp, v.y * sp + v.z * cp);
        v.y = y1;
        v.z = z2;

        let (sr, cr) = r.z.to_radians().sin_cos();
        let (x2, y2) = (v.x * cr - v.y * sr, v.x * sr + v.y * cr);
        v.x = x2;
        v.y = y2;

        v
    }

    /// Canonical stringification: each component formatted to
    /// `max(6, 4 + digits_before_dot)` significant digits, joined by `/`.
    pub fn to_canonical_string(self) -> String {
        self.to_array().iter().map(|&v| format_significant(v)).collect::<Vec<_>>().join("/")
    }

    /// Variant used by the lightmap/static-object writer: truncates the
    /// fractional part and collapses any value that fell back to
    /// scientific notation to `"0"`, joined by `-`.
    pub fn to_floor_string(self) -> String {
        self.to_array()
            .iter()
            .map(|&v| {
                let s = format_significant(v);
                if s.contains('e') { "0".to_string() } else { s.split('.').next().unwrap().to_string() }
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn digits_before_dot(v: f64) -> i32 {
    if v == 0.0 { 0 } else { v.abs().log10().floor() as i32 + 1 }
}

fn format_significant(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    let sig = (4 + digits_before_dot(v)).max(6) as usize;
    format_g(v, sig)
}

/// A minimal reimplementation of C's `%.*g` formatting: `sig` significant
/// digits, switching to scientific notation outside `1e-4..1e{sig}`, with
/// trailing zeros stripped.
fn format_g(value: f64, sig: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sig = sig.max(1);
    let exp = value.abs().log10().floor() as i32;
    if exp < -4 || exp >= sig as i32 {
        let decimals = sig - 1;
        let mut mantissa = value / 10f64.powi(exp);
        let mut exp = exp;
        let mut text = format!("{mantissa:.decimals$}");
        // Rounding the mantissa to `decimals` places can carry it to 10.0.
        if text.trim_start_matches('-').starts_with("10") {
            mantissa /= 10.0;
            exp += 1;
            text = format!("{mantissa:.decimals$}");
        }
        strip_trailing_zeros(&mut text);
        let sign = if exp >= 0 { '+' } else { '-' };
        format!("{text}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        let mut text = format!("{value:.decimals$}");
        strip_trailing_zeros(&mut text);
        text
    }
}

fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}
