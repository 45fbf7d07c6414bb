//! Regression tree (C4): a complete binary tree of fixed depth, stored as a
//! heap-order array of splits plus an array of leaf shape-residual vectors.

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::Error;
use crate::format;
use crate::shape::Shape;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitNode {
    pub idx1: u32,
    pub idx2: u32,
    pub thresh: f32,
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

fn right_child(i: usize) -> usize {
    2 * i + 2
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegressionTree {
    pub splits: Vec<SplitNode>,
    pub leaves: Vec<Shape>,
}

impl RegressionTree {
    /// Walks the heap-ordered tree from the root, branching left iff
    /// `features[idx1] - features[idx2] > thresh`, and returns the leaf
    /// reached.
    pub fn eval(&self, features: &[f32]) -> &Shape {
        let mut i = 0usize;
        while i < self.splits.len() {
            let s = &self.splits[i];
            if features[s.idx1 as usize] - features[s.idx2 as usize] > s.thresh {
                i = left_child(i);
            } else {
                i = right_child(i);
            }
        }
        &self.leaves[i - self.splits.len()]
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        format::write_len(w, self.splits.len())?;
        for s in &self.splits {
            w.write_u32::<LE>(s.idx1)?;
            w.write_u32::<LE>(s.idx2)?;
            w.write_f32::<LE>(s.thresh)?;
        }
        format::write_len(w, self.leaves.len())?;
        for l in &self.leaves {
            l.write_to(w)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, Error> {
        let n_splits = format::read_len(r)?;
        let mut splits = Vec::with_capacity(n_splits);
        for _ in 0..n_splits {
            splits.push(SplitNode {
                idx1: r.read_u32::<LE>()?,
                idx2: r.read_u32::<LE>()?,
                thresh: r.read_f32::<LE>()?,
            });
        }
        let n_leaves = format::read_len(r)?;
        let mut leaves = Vec::with_capacity(n_leaves);
        for _ in 0..n_leaves {
            leaves.push(Shape::read_from(r)?);
        }
        Ok(RegressionTree { splits, leaves })
    }
}
