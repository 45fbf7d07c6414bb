//! A shape is an ordered sequence of N 2-D points, stored flat as
//! `x0,y0,x1,y1,...` in normalised `[0,1]^2` coordinates.

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::Error;
use crate::format;

#[derive(Clone, Debug, PartialEq)]
pub struct Shape(Vec<f32>);

impl Shape {
    pub fn zero(num_parts: usize) -> Self {
        Shape(vec![0.0; num_parts * 2])
    }

    pub fn from_points(points: &[(f32, f32)]) -> Self {
        let mut v = Vec::with_capacity(points.len() * 2);
        for &(x, y) in points {
            v.push(x);
            v.push(y);
        }
        Shape(v)
    }

    pub fn num_parts(&self) -> usize {
        self.0.len() / 2
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn point(&self, k: usize) -> (f32, f32) {
        (self.0[k * 2], self.0[k * 2 + 1])
    }

    pub fn points(&self) -> Vec<(f32, f32)> {
        (0..self.num_parts()).map(|k| self.point(k)).collect()
    }

    pub fn add_assign(&mut self, rhs: &Shape) {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a += b;
        }
    }

    pub fn sub(&self, rhs: &Shape) -> Shape {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        Shape(self.0.iter().zip(rhs.0.iter()).map(|(a, b)| a - b).collect())
    }

    pub fn add(&self, rhs: &Shape) -> Shape {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        Shape(self.0.iter().zip(rhs.0.iter()).map(|(a, b)| a + b).collect())
    }

    pub fn scale(&self, k: f32) -> Shape {
        Shape(self.0.iter().map(|v| v * k).collect())
    }

    pub fn dot(&self, rhs: &Shape) -> f64 {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .map(|(a, b)| (*a as f64) * (*b as f64))
            .sum()
    }

    pub fn mean(shapes: &[Shape]) -> Shape {
        assert!(!shapes.is_empty());
        let len = shapes[0].0.len();
        let mut acc = vec![0.0f64; len];
        for s in shapes {
            for (a, b) in acc.iter_mut().zip(s.0.iter()) {
                *a += *b as f64;
            }
        }
        let n = shapes.len() as f64;
        Shape(acc.into_iter().map(|v| (v / n) as f32).collect())
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        format::write_len(w, self.0.len())?;
        for v in &self.0 {
            w.write_f32::<LE>(*v)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, Error> {
        let len = format::read_len(r)?;
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(r.read_f32::<LE>()?);
        }
        Ok(Shape(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_two_shapes_is_midpoint() {
        let a = Shape::from_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = Shape::from_points(&[(2.0, 2.0), (3.0, 3.0)]);
        let m = Shape::mean(&[a, b]);
        assert_eq!(m.point(0), (1.0, 1.0));
        assert_eq!(m.point(1), (2.0, 2.0));
    }

    #[test]
    fn round_trip_preserves_values() {
        let s = Shape::from_points(&[(0.25, 0.5), (0.75, 0.125)]);
        let mut buf = Vec::new();
        s.write_to(&mut buf).unwrap();
        let back = Shape::read_from(&mut &buf[..]).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn add_assign_accumulates_in_place() {
        let mut a = Shape::from_points(&[(1.0, 1.0)]);
        let b = Shape::from_points(&[(0.5, -0.5)]);
        a.add_assign(&b);
        assert_eq!(a.point(0), (1.5, 0.5));
    }
}
