//! `Trainer::train`'s outer loop (C6): oversampling and mean shape, then
//! per-cascade index sampling and per-cascade residual boosting.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Error;
use crate::features;
use crate::image::Image;
use crate::index::TripletIndex;
use crate::predictor::Predictor;

use super::forest::grow_tree;
use super::sample::populate_training_sample_shapes;
use super::{Annotation, TrainerOptions};

pub(crate) fn train<I: Image>(
    options: &TrainerOptions,
    images: &[I],
    objects: &[Vec<Annotation>],
) -> Result<Predictor, Error> {
    if images.is_empty() || images.len() != objects.len() {
        return Err(Error::EmptyTrainingCorpus);
    }

    let num_parts = validate_part_counts(objects)?;

    // `rnd.set_seed(get_random_seed())` in the source: one RNG, seeded
    // once, consumed in a fixed order for the whole training run.
    let mut hasher = DefaultHasher::new();
    options.random_seed.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());

    let start = Instant::now();
    log::info!(
        "training shape predictor: cascade_depth={} tree_depth={} trees_per_stage={} samples_per_object={}",
        options.cascade_depth,
        options.tree_depth,
        options.num_trees_per_cascade_level,
        options.oversampling_amount,
    );

    let (mean_shape, mut samples) = populate_training_sample_shapes(objects, options.oversampling_amount, &mut rng);

    let indices: Vec<TripletIndex> = (0..options.cascade_depth)
        .map(|_| TripletIndex::sample(&mut rng, num_parts, options.feature_pool_size as usize))
        .collect();

    let total_trees = options.cascade_depth as u64 * options.num_trees_per_cascade_level as u64;
    #[cfg(feature = "progress")]
    let bar = options.verbose.then(|| crate::progress::bar(total_trees));

    let mut forests = Vec::with_capacity(options.cascade_depth as usize);
    for cascade in 0..options.cascade_depth as usize {
        log::debug!("cascade stage {}/{}", cascade + 1, options.cascade_depth);

        for sample in samples.iter_mut() {
            let feats = features::extract(
                &images[sample.image_idx],
                &sample.rect,
                &sample.current_shape,
                &indices[cascade],
            );
            sample.features = feats;
        }

        let mut trees = Vec::with_capacity(options.num_trees_per_cascade_level as usize);
        for _ in 0..options.num_trees_per_cascade_level {
            let tree = grow_tree(
                &mut rng,
                &mut samples,
                &mean_shape,
                &indices[cascade],
                options.tree_depth,
                options.nu,
                options.feature_pool_size as usize,
                options.lambda,
                options.num_test_splits as usize,
            );
            trees.push(tree);

            #[cfg(feature = "progress")]
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        forests.push(trees);
    }

    #[cfg(feature = "progress")]
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    log::info!("training complete in {:?}", start.elapsed());

    Ok(Predictor::new(mean_shape, forests, indices))
}

fn validate_part_counts(objects: &[Vec<Annotation>]) -> Result<usize, Error> {
    let mut expected: Option<usize> = None;
    for objs in objects {
        for obj in objs {
            let found = obj.landmarks.len();
            match expected {
                None => {
                    if found == 0 {
                        return Err(Error::InconsistentPartCount { expected: 0, found: 0 });
                    }
                    expected = Some(found);
                }
                Some(n) if n != found => {
                    return Err(Error::InconsistentPartCount { expected: n, found });
                }
                _ => {}
            }
        }
    }
    expected.ok_or(Error::EmptyTrainingCorpus)
}
