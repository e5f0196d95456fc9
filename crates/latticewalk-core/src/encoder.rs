//! Hypercube feature encoder.
//!
//! Maps a record of continuous feature values to a vertex of the Boolean
//! hypercube and back. Each feature is quantized against its bin boundaries,
//! Gray-coded, and packed into its own bit slice. Gray coding is structural,
//! not cosmetic: a one-bin change in any single feature moves the vertex by
//! exactly one bit, so feature-space locality becomes Hamming-1 adjacency and
//! the walk simulators inherit a meaningful neighborhood.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// FeatureBin
// ---------------------------------------------------------------------------

/// A named feature with ordered bin boundaries and optional explicit bounds.
///
/// `k` boundaries induce `k+1` bins; the bit width is
/// `ceil(log2(max(2, k+1)))`, so every bin index fits its slice.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureBin {
    name: String,
    bins: Vec<f64>,
    lower: Option<f64>,
    upper: Option<f64>,
}

impl FeatureBin {
    /// Create a feature with strictly increasing bin boundaries.
    pub fn new(
        name: impl Into<String>,
        bins: Vec<f64>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::InvalidInput("feature name is empty".into()));
        }
        if bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EngineError::InvalidInput(format!(
                "bin boundaries of '{name}' must be strictly increasing"
            )));
        }
        if let (Some(lo), Some(&first)) = (lower, bins.first()) {
            if lo >= first {
                return Err(EngineError::InvalidInput(format!(
                    "lower bound of '{name}' must sit below the first boundary"
                )));
            }
        }
        if let (Some(hi), Some(&last)) = (upper, bins.last()) {
            if hi <= last {
                return Err(EngineError::InvalidInput(format!(
                    "upper bound of '{name}' must sit above the last boundary"
                )));
            }
        }
        Ok(Self {
            name,
            bins,
            lower,
            upper,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of quantization levels (`boundaries + 1`).
    pub fn levels(&self) -> usize {
        self.bins.len() + 1
    }

    /// Bit width of this feature's slice: `ceil(log2(max(2, levels)))`.
    pub fn digit_count(&self) -> u32 {
        ceil_log2(self.levels().max(2))
    }

    /// Bin index of a value: the number of boundaries at or below it.
    pub fn quantize(&self, value: f64) -> usize {
        self.bins.partition_point(|&b| b <= value)
    }

    /// Midpoint of a bin. Indices past the top bin clamp to the top bin, so
    /// `quantize(dequantize(i)) == i` holds for every in-range index.
    pub fn dequantize(&self, index: usize) -> f64 {
        let index = index.min(self.levels() - 1);
        if self.bins.is_empty() {
            return self.synthetic_midpoint();
        }
        let span = self.edge_span();
        let lo = match index {
            0 => self.lower.unwrap_or(self.bins[0] - span),
            i => self.bins[i - 1],
        };
        let hi = if index == self.bins.len() {
            self.upper.unwrap_or(self.bins[self.bins.len() - 1] + span)
        } else {
            self.bins[index]
        };
        (lo + hi) / 2.0
    }

    /// Width used to synthesize a missing outer edge: the mean bin width, or
    /// 1.0 when a single boundary gives no width information.
    fn edge_span(&self) -> f64 {
        if self.bins.len() >= 2 {
            (self.bins[self.bins.len() - 1] - self.bins[0]) / (self.bins.len() - 1) as f64
        } else {
            1.0
        }
    }

    fn synthetic_midpoint(&self) -> f64 {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) => (lo + hi) / 2.0,
            (Some(lo), None) => lo + 0.5,
            (None, Some(hi)) => hi - 0.5,
            (None, None) => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HypercubeEncoder
// ---------------------------------------------------------------------------

/// Maps feature records to hypercube vertices via Gray-coded bit slices.
#[derive(Debug, Clone, Serialize)]
pub struct HypercubeEncoder {
    features: Vec<FeatureBin>,
    /// Bit offset of each feature's slice.
    offsets: Vec<u32>,
    total_bits: u32,
}

impl HypercubeEncoder {
    /// Build an encoder from an ordered feature list.
    ///
    /// The vertex space has size `2^total_bits`; a `u64` vertex bounds
    /// `total_bits` at 63.
    pub fn new(features: Vec<FeatureBin>) -> Result<Self> {
        if features.is_empty() {
            return Err(EngineError::InvalidInput("no features".into()));
        }
        for (i, f) in features.iter().enumerate() {
            if features[..i].iter().any(|g| g.name == f.name) {
                return Err(EngineError::InvalidInput(format!(
                    "duplicate feature name '{}'",
                    f.name
                )));
            }
        }
        let mut offsets = Vec::with_capacity(features.len());
        let mut total_bits = 0u32;
        for f in &features {
            offsets.push(total_bits);
            total_bits += f.digit_count();
        }
        if total_bits > 63 {
            return Err(EngineError::Unsupported(format!(
                "{total_bits} total bits exceed the 63-bit vertex space"
            )));
        }
        Ok(Self {
            features,
            offsets,
            total_bits,
        })
    }

    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Number of hypercube vertices, `2^total_bits`.
    pub fn vertex_count(&self) -> u64 {
        1u64 << self.total_bits
    }

    pub fn features(&self) -> &[FeatureBin] {
        &self.features
    }

    /// Encode a feature record to a vertex. Every feature must be present.
    pub fn encode(&self, values: &BTreeMap<String, f64>) -> Result<u64> {
        let mut vertex = 0u64;
        for (f, &offset) in self.features.iter().zip(self.offsets.iter()) {
            let value = values.get(f.name()).ok_or_else(|| {
                EngineError::InvalidInput(format!("missing value for feature '{}'", f.name()))
            })?;
            let q = f.quantize(*value) as u64;
            vertex |= to_gray(q) << offset;
        }
        Ok(vertex)
    }

    /// Decode a vertex back to bin-midpoint feature values.
    pub fn decode(&self, vertex: u64) -> Result<BTreeMap<String, f64>> {
        if vertex >= self.vertex_count() {
            return Err(EngineError::InvalidInput(format!(
                "vertex {vertex} outside the {}-bit vertex space",
                self.total_bits
            )));
        }
        let mut values = BTreeMap::new();
        for (f, &offset) in self.features.iter().zip(self.offsets.iter()) {
            let mask = (1u64 << f.digit_count()) - 1;
            let gray = (vertex >> offset) & mask;
            let index = from_gray(gray) as usize;
            values.insert(f.name().to_string(), f.dequantize(index));
        }
        Ok(values)
    }
}

// ---------------------------------------------------------------------------
// Gray coding
// ---------------------------------------------------------------------------

/// Reflected binary Gray code: adjacent integers differ in exactly one bit.
pub fn to_gray(n: u64) -> u64 {
    n ^ (n >> 1)
}

/// Inverse Gray code via prefix XOR.
pub fn from_gray(g: u64) -> u64 {
    let mut b = g;
    let mut shift = 1;
    while shift < 64 {
        b ^= b >> shift;
        shift <<= 1;
    }
    b
}

fn ceil_log2(m: usize) -> u32 {
    usize::BITS - (m - 1).leading_zeros()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// 3 boundaries -> 4 bins -> 2 bits, slice fully saturated.
    fn saturated_feature(name: &str) -> FeatureBin {
        FeatureBin::new(name, vec![1.0, 2.0, 3.0], Some(0.0), Some(4.0)).unwrap()
    }

    #[test]
    fn test_digit_count_invariant() {
        // k boundaries -> ceil(log2(max(2, k+1))) bits
        for (boundaries, expected) in [(0usize, 1u32), (1, 1), (2, 2), (3, 2), (4, 3), (7, 3)] {
            let bins: Vec<f64> = (0..boundaries).map(|i| i as f64).collect();
            let f = FeatureBin::new("f", bins, None, None).unwrap();
            assert_eq!(f.digit_count(), expected, "{boundaries} boundaries");
        }
    }

    #[test]
    fn test_quantize_dequantize_inverse() {
        let f = saturated_feature("x");
        for index in 0..f.levels() {
            let mid = f.dequantize(index);
            assert_eq!(f.quantize(mid), index, "index {index}, midpoint {mid}");
        }
    }

    #[test]
    fn test_quantize_boundary_goes_up() {
        let f = saturated_feature("x");
        assert_eq!(f.quantize(0.5), 0);
        assert_eq!(f.quantize(1.0), 1);
        assert_eq!(f.quantize(3.5), 3);
    }

    #[test]
    fn test_dequantize_clamps_out_of_range() {
        let f = FeatureBin::new("x", vec![0.0, 1.0], None, None).unwrap();
        // 2 boundaries -> 3 levels but 2 bits -> raw index 3 possible on decode.
        assert_eq!(f.dequantize(7), f.dequantize(2));
    }

    #[test]
    fn test_feature_bin_rejects_unsorted() {
        assert!(FeatureBin::new("x", vec![2.0, 1.0], None, None).is_err());
        assert!(FeatureBin::new("x", vec![1.0, 1.0], None, None).is_err());
    }

    #[test]
    fn test_feature_bin_rejects_bad_bounds() {
        assert!(FeatureBin::new("x", vec![1.0, 2.0], Some(1.5), None).is_err());
        assert!(FeatureBin::new("x", vec![1.0, 2.0], None, Some(2.0)).is_err());
    }

    #[test]
    fn test_encoder_total_bits() {
        let enc = HypercubeEncoder::new(vec![
            saturated_feature("a"), // 2 bits
            FeatureBin::new("b", vec![0.5], None, None).unwrap(), // 1 bit
        ])
        .unwrap();
        assert_eq!(enc.total_bits(), 3);
        assert_eq!(enc.vertex_count(), 8);
    }

    #[test]
    fn test_encode_decode_round_trip_all_vertices() {
        let enc = HypercubeEncoder::new(vec![saturated_feature("a"), saturated_feature("b")])
            .unwrap();
        for v in 0..enc.vertex_count() {
            let values = enc.decode(v).unwrap();
            assert_eq!(enc.encode(&values).unwrap(), v, "vertex {v}");
        }
    }

    #[test]
    fn test_one_bin_change_is_hamming_one() {
        let enc = HypercubeEncoder::new(vec![saturated_feature("a"), saturated_feature("b")])
            .unwrap();
        // Walk feature "a" through adjacent bins with "b" fixed.
        for (left, right) in [(0.5, 1.5), (1.5, 2.5), (2.5, 3.5)] {
            let u = enc.encode(&record(&[("a", left), ("b", 2.5)])).unwrap();
            let v = enc.encode(&record(&[("a", right), ("b", 2.5)])).unwrap();
            assert_eq!((u ^ v).count_ones(), 1, "{left} -> {right}");
        }
    }

    #[test]
    fn test_encode_missing_feature_fails() {
        let enc = HypercubeEncoder::new(vec![saturated_feature("a")]).unwrap();
        let err = enc.encode(&record(&[("z", 1.0)])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_decode_out_of_space_fails() {
        let enc = HypercubeEncoder::new(vec![saturated_feature("a")]).unwrap();
        assert!(enc.decode(4).is_err());
    }

    #[test]
    fn test_duplicate_feature_names_rejected() {
        let result = HypercubeEncoder::new(vec![saturated_feature("a"), saturated_feature("a")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_gray_round_trip() {
        for n in 0..256u64 {
            assert_eq!(from_gray(to_gray(n)), n);
        }
        // Adjacent codes differ by one bit.
        for n in 0..255u64 {
            assert_eq!((to_gray(n) ^ to_gray(n + 1)).count_ones(), 1);
        }
    }
}
