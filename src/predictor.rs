//! Inference (C7) and the model container (C8): apply each cascade stage in
//! turn, summing tree outputs into the working shape, then map back to
//! pixel space.

use std::io::{Read, Write};

use crate::error::Error;
use crate::features;
use crate::format;
use crate::geometry::{unnormalising, Rect};
use crate::image::Image;
use crate::index::TripletIndex;
use crate::shape::Shape;
use crate::tree::RegressionTree;

/// An immutable, trained cascade: a mean shape plus one forest and one
/// triplet index per cascade stage. Inference has no shared mutable state,
/// so a single predictor may be shared across concurrent invocations.
#[derive(Clone, Debug, PartialEq)]
pub struct Predictor {
    pub(crate) initial_shape: Shape,
    pub(crate) forests: Vec<Vec<RegressionTree>>,
    pub(crate) indices: Vec<TripletIndex>,
}

impl Predictor {
    pub(crate) fn new(initial_shape: Shape, forests: Vec<Vec<RegressionTree>>, indices: Vec<TripletIndex>) -> Self {
        Predictor {
            initial_shape,
            forests,
            indices,
        }
    }

    pub fn num_parts(&self) -> usize {
        self.initial_shape.num_parts()
    }

    /// Runs every cascade stage against `image`/`rect` and returns the N
    /// landmark points in pixel space.
    pub fn predict<I: Image>(&self, image: &I, rect: &Rect) -> Vec<(f32, f32)> {
        let mut current = self.initial_shape.clone();
        for (forest, index) in self.forests.iter().zip(self.indices.iter()) {
            let f = features::extract(image, rect, &current, index);
            for tree in forest {
                current.add_assign(tree.eval(&f));
            }
        }
        let to_pixel = unnormalising(rect);
        current.points().into_iter().map(|p| to_pixel.apply(p)).collect()
    }

    pub fn save<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        format::write_version(w)?;
        self.initial_shape.write_to(w)?;

        format::write_len(w, self.forests.len())?;
        for forest in &self.forests {
            format::write_len(w, forest.len())?;
            for tree in forest {
                tree.write_to(w)?;
            }
        }

        format::write_len(w, self.indices.len())?;
        for index in &self.indices {
            index.write_to(w)?;
        }
        Ok(())
    }

    pub fn load<R: Read>(r: &mut R) -> Result<Self, Error> {
        format::read_version(r)?;
        let initial_shape = Shape::read_from(r)?;

        let n_cascades = format::read_len(r)?;
        let mut forests = Vec::with_capacity(n_cascades);
        for _ in 0..n_cascades {
            let n_trees = format::read_len(r)?;
            let mut forest = Vec::with_capacity(n_trees);
            for _ in 0..n_trees {
                forest.push(RegressionTree::read_from(r)?);
            }
            forests.push(forest);
        }

        let n_indices = format::read_len(r)?;
        let mut indices = Vec::with_capacity(n_indices);
        for _ in 0..n_indices {
            indices.push(TripletIndex::read_from(r)?);
        }

        Ok(Predictor {
            initial_shape,
            forests,
            indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests_support::GrayImage;
    use rand::SeedableRng;

    #[test]
    fn zero_cascades_returns_mean_shape_in_pixel_space() {
        let initial_shape = Shape::from_points(&[(0.25, 0.25), (0.75, 0.75)]);
        let predictor = Predictor::new(initial_shape.clone(), vec![], vec![]);
        let image = GrayImage::filled(100, 100, 128);
        let rect = Rect::new(0, 0, 99, 99);

        let predicted = predictor.predict(&image, &rect);
        let expected = unnormalising(&rect);
        let want: Vec<_> = initial_shape.points().into_iter().map(|p| expected.apply(p)).collect();
        assert_eq!(predicted, want);
        assert_eq!(predictor.num_parts(), 2);
    }

    #[test]
    fn save_load_round_trip_matches_predictions() {
        let initial_shape = Shape::from_points(&[(0.1, 0.1), (0.9, 0.9), (0.1, 0.9)]);
        let index = TripletIndex::sample(&mut rand::rngs::StdRng::seed_from_u64(5), 3, 4);
        let tree = crate::tree::RegressionTree {
            splits: vec![],
            leaves: vec![Shape::from_points(&[(0.01, -0.01), (0.0, 0.0), (0.02, 0.02)])],
        };
        let predictor = Predictor::new(initial_shape, vec![vec![tree]], vec![index]);

        let mut buf = Vec::new();
        predictor.save(&mut buf).unwrap();
        let back = Predictor::load(&mut &buf[..]).unwrap();

        let image = GrayImage::filled(64, 64, 50);
        let rect = Rect::new(0, 0, 63, 63);
        assert_eq!(predictor.predict(&image, &rect), back.predict(&image, &rect));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let mut buf = Vec::new();
        byteorder::WriteBytesExt::write_i32::<byteorder::LittleEndian>(&mut buf, 2).unwrap();
        let err = Predictor::load(&mut &buf[..]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { found: 2 }));
    }
}
