//! # tif-align
//!
//! A facial/object landmark (shape) predictor built on an ensemble of
//! cascaded gradient-boosted regression forests indexed by
//! Triplet-Interpolated Features (TIF): every sampled pixel location is an
//! affine combination of *three* landmarks rather than a fixed offset from
//! the nearest one, so the sampled grid deforms non-rigidly with the shape
//! as cascade stages refine it.
//!
//! Training consumes labelled bounding boxes with landmark coordinates and
//! produces a serialisable [`predictor::Predictor`]; inference consumes the
//! serialised model and runs a fixed number of cascade stages to refine an
//! initial mean shape into the final landmark positions.
//!
//! Image decoding, detection, capture/display, and CLI plumbing are all
//! external collaborators — this crate's only contract with a concrete
//! image type is the [`image::Image`] trait, a pixel-read primitive plus a
//! rectangle bounds test.
//!
//! ## Example
//!
//! ```rust
//! use tif_align::image::Image;
//! use tif_align::geometry::Rect;
//! use tif_align::train::{Annotation, Trainer, TrainerOptions};
//!
//! struct GrayImage {
//!     width: i64,
//!     height: i64,
//!     pixels: Vec<u8>,
//! }
//!
//! impl Image for GrayImage {
//!     fn get_rect(&self) -> Rect {
//!         Rect::new(0, 0, self.width - 1, self.height - 1)
//!     }
//!     fn intensity(&self, x: i64, y: i64) -> u8 {
//!         self.pixels[(y * self.width + x) as usize]
//!     }
//! }
//!
//! let rect = Rect::new(0, 0, 19, 19);
//! let landmarks = vec![(2.0, 2.0), (17.0, 2.0), (17.0, 17.0), (2.0, 17.0)];
//! let images = vec![GrayImage { width: 20, height: 20, pixels: vec![128; 400] }];
//! let objects = vec![vec![Annotation { rect, landmarks }]];
//!
//! let mut options = TrainerOptions::default();
//! options.cascade_depth = 1;
//! options.num_trees_per_cascade_level = 2;
//! options.tree_depth = 2;
//! options.feature_pool_size = 20;
//! options.oversampling_amount = 1;
//!
//! let predictor = Trainer::new(options).train(&images, &objects).unwrap();
//! let points = predictor.predict(&images[0], &rect);
//! assert_eq!(points.len(), 4);
//! ```

pub mod error;
pub mod eval;
pub mod features;
pub mod format;
pub mod geometry;
pub mod image;
pub mod index;
pub mod predictor;
#[cfg(feature = "progress")]
pub(crate) mod progress;
pub mod shape;
pub mod train;
pub mod tree;

#[cfg(test)]
mod integration_tests;

pub use crate::error::Error;
pub use crate::geometry::{Rect, AffineTransform};
pub use crate::predictor::Predictor;
pub use crate::shape::Shape;
pub use crate::train::{Annotation, Trainer, TrainerOptions};
