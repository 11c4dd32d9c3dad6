use std::f64::consts::PI;

/// Orientation in degrees of a direction vector, used to align arrowheads.
///
/// A vertical direction snaps to +/-90 degrees.
pub fn arrow_angle(dy: f64, dx: f64) -> f64 {
    if dx == 0.0 {
        return if dy > 0.0 { 90.0 } else { -90.0 };
    }
    dy.atan2(dx).to_degrees()
}

pub(crate) fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Deterministic pseudo-random sequence in `[0, 1)` backing the `rnd()` builtin.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HashSequence {
    seed: u64,
    counter: u64,
}

impl HashSequence {
    pub(crate) fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    pub(crate) fn next_unit(&mut self) -> f64 {
        let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
        h.write_u64(self.seed);
        h.write_u64(self.counter);
        self.counter += 1;
        // 53 significant bits map exactly onto an f64 mantissa
        (h.finish() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
