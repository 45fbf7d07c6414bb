//! Training: hyperparameters, oversampling, per-cascade triplet indices,
//! and the gradient-boosted forest growth loop (C5, C6).

mod cascade;
mod forest;
mod sample;
mod split;

use crate::error::Error;
use crate::geometry::Rect;
use crate::image::Image;
use crate::predictor::Predictor;

/// One labelled training object: its bounding rectangle and the pixel-space
/// landmark coordinates inside it.
#[derive(Clone, Debug)]
pub struct Annotation {
    pub rect: Rect,
    pub landmarks: Vec<(f32, f32)>,
}

/// Training hyperparameters. Every field has a validated `set_*` method
/// that rejects an out-of-constraint value before mutating (so a rejected
/// call leaves the struct unchanged); the fields themselves stay `pub` for
/// direct, unchecked construction and reading, which is the idiomatic
/// shape for a Rust config struct with no cross-field invariants.
#[derive(Clone, Debug)]
pub struct TrainerOptions {
    pub cascade_depth: u32,
    pub tree_depth: u32,
    pub num_trees_per_cascade_level: u32,
    pub nu: f64,
    pub oversampling_amount: u32,
    pub feature_pool_size: u32,
    pub lambda: f64,
    pub num_test_splits: u32,
    /// Reserved; present for parity with offset-based variants, unused by
    /// the TIF feature scheme.
    pub feature_pool_region_padding: f64,
    pub random_seed: String,
    pub verbose: bool,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            cascade_depth: 10,
            tree_depth: 4,
            num_trees_per_cascade_level: 500,
            nu: 0.1,
            oversampling_amount: 20,
            feature_pool_size: 400,
            lambda: 0.1,
            num_test_splits: 20,
            feature_pool_region_padding: 0.0,
            random_seed: String::new(),
            verbose: false,
        }
    }
}

macro_rules! validated_setter {
    ($name:ident, $field:ident, $ty:ty, $field_name:literal, $cond:expr, $reason:literal) => {
        pub fn $name(&mut self, value: $ty) -> Result<(), Error> {
            if !$cond(value) {
                return Err(Error::InvalidConfiguration {
                    field: $field_name,
                    reason: $reason.to_string(),
                });
            }
            self.$field = value;
            Ok(())
        }
    };
}

impl TrainerOptions {
    validated_setter!(
        set_cascade_depth,
        cascade_depth,
        u32,
        "cascade_depth",
        |v: u32| v > 0,
        "must be greater than 0"
    );
    validated_setter!(
        set_tree_depth,
        tree_depth,
        u32,
        "tree_depth",
        |v: u32| v > 0,
        "must be greater than 0"
    );
    validated_setter!(
        set_num_trees_per_cascade_level,
        num_trees_per_cascade_level,
        u32,
        "num_trees_per_cascade_level",
        |v: u32| v > 0,
        "must be greater than 0"
    );
    validated_setter!(
        set_nu,
        nu,
        f64,
        "nu",
        |v: f64| v > 0.0 && v <= 1.0,
        "must lie in (0, 1]"
    );
    validated_setter!(
        set_oversampling_amount,
        oversampling_amount,
        u32,
        "oversampling_amount",
        |v: u32| v > 0,
        "must be greater than 0"
    );
    validated_setter!(
        set_feature_pool_size,
        feature_pool_size,
        u32,
        "feature_pool_size",
        |v: u32| v > 1,
        "must be greater than 1"
    );
    validated_setter!(
        set_lambda,
        lambda,
        f64,
        "lambda",
        |v: f64| v > 0.0,
        "must be greater than 0"
    );
    validated_setter!(
        set_num_test_splits,
        num_test_splits,
        u32,
        "num_test_splits",
        |v: u32| v > 0,
        "must be greater than 0"
    );

    /// Unvalidated: this parameter is reserved and has no effect on
    /// training, so there is nothing to reject.
    pub fn set_feature_pool_region_padding(&mut self, padding: f64) {
        self.feature_pool_region_padding = padding;
    }

    pub fn set_random_seed(&mut self, seed: impl Into<String>) {
        self.random_seed = seed.into();
    }
}

/// Trains a cascade of regression forests from labelled bounding
/// boxes + landmarks.
pub struct Trainer {
    pub options: TrainerOptions,
}

impl Trainer {
    pub fn new(options: TrainerOptions) -> Self {
        Trainer { options }
    }

    /// Trains on `images[i]` paired with `objects[i]`, the list of
    /// annotated objects found in that image. Every object across every
    /// image must agree on a nonzero landmark count. The random generator
    /// is consumed in a fixed order (initial shape selection, then
    /// per-cascade index sampling, then per-tree per-node split candidate
    /// generation) so that a fixed seed reproduces byte-identical output.
    pub fn train<I: Image>(&self, images: &[I], objects: &[Vec<Annotation>]) -> Result<Predictor, Error> {
        cascade::train(&self.options, images, objects)
    }
}
