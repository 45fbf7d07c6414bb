//! Triplet-Interpolated Feature indexing (C2): each feature-pool slot names
//! three landmarks and two ratios rather than a fixed offset from the
//! nearest landmark, so sampled points deform non-rigidly with the shape.

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use rand::Rng;
use std::io::{Read, Write};

use crate::error::Error;
use crate::format;
use crate::shape::Shape;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripletEntry {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub alpha: f64,
    pub beta: f64,
}

/// A per-cascade table of `F` triplet entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripletIndex {
    entries: Vec<TripletEntry>,
}

impl TripletIndex {
    /// Draws `feature_pool_size` entries against a shape of `num_parts`
    /// landmarks. For each slot: `alpha, beta` are drawn first (uniform on
    /// `[0, 0.5)`), then `a, b, c` are drawn uniformly on `[0, num_parts)`
    /// and rejected until pairwise distinct. This exact draw order (ratios
    /// before anchors) must match across cascades for seed determinism.
    pub fn sample<R: Rng>(rng: &mut R, num_parts: usize, feature_pool_size: usize) -> Self {
        assert!(num_parts >= 3, "need at least 3 landmarks for a triplet");
        let mut entries = Vec::with_capacity(feature_pool_size);
        for _ in 0..feature_pool_size {
            let alpha = rng.gen::<f64>() * 0.5;
            let beta = rng.gen::<f64>() * 0.5;
            let (a, b, c) = loop {
                let a = rng.gen_range(0..num_parts) as u32;
                let b = rng.gen_range(0..num_parts) as u32;
                let c = rng.gen_range(0..num_parts) as u32;
                if a != b && b != c && c != a {
                    break (a, b, c);
                }
            };
            entries.push(TripletEntry { a, b, c, alpha, beta });
        }
        TripletIndex { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TripletEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<TripletEntry>) -> Self {
        TripletIndex { entries }
    }

    /// The affine combination `shape[a] + alpha*(shape[b]-shape[a]) +
    /// beta*(shape[c]-shape[a])` for slot `k`.
    pub fn point(&self, k: usize, shape: &Shape) -> (f32, f32) {
        let e = self.entries[k];
        let (ax, ay) = shape.point(e.a as usize);
        let (bx, by) = shape.point(e.b as usize);
        let (cx, cy) = shape.point(e.c as usize);
        let alpha = e.alpha as f32;
        let beta = e.beta as f32;
        (
            alpha * (bx - ax) + beta * (cx - ax) + ax,
            alpha * (by - ay) + beta * (cy - ay) + ay,
        )
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        format::write_len(w, self.entries.len())?;
        for e in &self.entries {
            w.write_u32::<LE>(e.a)?;
        }
        format::write_len(w, self.entries.len())?;
        for e in &self.entries {
            w.write_u32::<LE>(e.b)?;
        }
        format::write_len(w, self.entries.len())?;
        for e in &self.entries {
            w.write_u32::<LE>(e.c)?;
        }
        format::write_len(w, self.entries.len())?;
        for e in &self.entries {
            w.write_f64::<LE>(e.alpha)?;
        }
        format::write_len(w, self.entries.len())?;
        for e in &self.entries {
            w.write_f64::<LE>(e.beta)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, Error> {
        let f = format::read_len(r)?;
        let a: Vec<u32> = (0..f).map(|_| r.read_u32::<LE>()).collect::<Result<_, _>>()?;
        let f2 = format::read_len(r)?;
        let b: Vec<u32> = (0..f2).map(|_| r.read_u32::<LE>()).collect::<Result<_, _>>()?;
        let f3 = format::read_len(r)?;
        let c: Vec<u32> = (0..f3).map(|_| r.read_u32::<LE>()).collect::<Result<_, _>>()?;
        let f4 = format::read_len(r)?;
        let alpha: Vec<f64> = (0..f4).map(|_| r.read_f64::<LE>()).collect::<Result<_, _>>()?;
        let f5 = format::read_len(r)?;
        let beta: Vec<f64> = (0..f5).map(|_| r.read_f64::<LE>()).collect::<Result<_, _>>()?;

        let entries = (0..f)
            .map(|i| TripletEntry {
                a: a[i],
                b: b[i],
                c: c[i],
                alpha: alpha[i],
                beta: beta[i],
            })
            .collect();
        Ok(TripletIndex { entries })
    }
}
