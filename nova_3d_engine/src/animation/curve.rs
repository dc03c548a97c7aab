/// Keyframed scalar curve.
///
/// Keys are kept sorted by time. Sampling between two keys uses cubic
/// Hermite interpolation with the left key's out-tangent and the right
/// key's in-tangent (tangents are slopes per unit of time). Sampling outside
/// the key range clamps to the first/last value; it never fails.

/// One curve key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

impl Keyframe {
    /// Key with flat (zero) tangents
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value, in_tangent: 0.0, out_tangent: 0.0 }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from keys in any order
    pub fn from_keys(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Insert a key, keeping time order (a key at an existing time replaces it)
    pub fn add_key(&mut self, key: Keyframe) {
        match self.keys.binary_search_by(|k| k.time.total_cmp(&key.time)) {
            Ok(index) => self.keys[index] = key,
            Err(index) => self.keys.insert(index, key),
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time span covered by the keys
    pub fn duration(&self) -> f32 {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Value at time `t`
    ///
    /// Empty curve: 0. Single key: constant. Outside the key range: the
    /// boundary value.
    pub fn sample(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        // first index whose time is > t; t is strictly inside the range
        let upper = self.keys.partition_point(|k| k.time <= t);
        let (a, b) = (&self.keys[upper - 1], &self.keys[upper]);
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        let s = (t - a.time) / span;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * a.value + h10 * span * a.out_tangent + h01 * b.value + h11 * span * b.in_tangent
    }
}

#[cfg(test)]
#[path = "curve_tests.rs"]
mod tests;
