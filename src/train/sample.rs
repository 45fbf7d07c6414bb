//! Training sample construction: oversampling, the mean shape, and the
//! randomly perturbed initial shapes each sample starts from.

use rand::Rng;

use crate::geometry::{normalising, Rect};
use crate::shape::Shape;

use super::Annotation;

pub(crate) struct TrainingSample {
    pub image_idx: usize,
    pub rect: Rect,
    pub target_shape: Shape,
    pub current_shape: Shape,
    pub features: Vec<f32>,
}

fn object_to_shape(rect: &Rect, landmarks: &[(f32, f32)]) -> Shape {
    let tform = normalising(rect);
    let points: Vec<(f32, f32)> = landmarks.iter().map(|&p| tform.apply(p)).collect();
    Shape::from_points(&points)
}

/// Builds `|objects| * oversampling_amount` samples and the mean shape
/// they are all initially perturbed from.
///
/// For each oversample group, slot 0 starts from the mean shape; every
/// other slot starts from a random convex combination of two (possibly
/// unrelated) samples' target shapes. The two sample indices and the
/// mixing weight are drawn from `rng` in that order, once per non-slot-0
/// sample, immediately after the mean shape is known — this must be the
/// first thing drawn from the trainer's RNG for seed determinism to hold.
pub(crate) fn populate_training_sample_shapes<R: Rng>(
    objects: &[Vec<Annotation>],
    oversampling_amount: u32,
    rng: &mut R,
) -> (Shape, Vec<TrainingSample>) {
    let mut samples = Vec::new();
    let mut target_shapes = Vec::new();

    for (image_idx, objs) in objects.iter().enumerate() {
        for obj in objs {
            let target_shape = object_to_shape(&obj.rect, &obj.landmarks);
            for _ in 0..oversampling_amount {
                samples.push(TrainingSample {
                    image_idx,
                    rect: obj.rect,
                    target_shape: target_shape.clone(),
                    current_shape: target_shape.clone(),
                    features: Vec::new(),
                });
            }
            target_shapes.push(target_shape);
        }
    }

    let mean_shape = Shape::mean(&target_shapes);

    let mut initial_shapes = Vec::with_capacity(samples.len());
    for i in 0..samples.len() {
        if (i as u32) % oversampling_amount == 0 {
            initial_shapes.push(mean_shape.clone());
        } else {
            let r1 = rng.gen_range(0..samples.len());
            let r2 = rng.gen_range(0..samples.len());
            let alpha = rng.gen::<f64>() as f32;
            let shape = samples[r1]
                .target_shape
                .scale(alpha)
                .add(&samples[r2].target_shape.scale(1.0 - alpha));
            initial_shapes.push(shape);
        }
    }
    for (sample, shape) in samples.iter_mut().zip(initial_shapes) {
        sample.current_shape = shape;
    }

    (mean_shape, samples)
}
