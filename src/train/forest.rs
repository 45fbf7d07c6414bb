//! Single-tree breadth-first growth (C5): a queue of sample-index ranges
//! plus a parallel array of per-node residual sums.

use std::collections::VecDeque;

use rand::Rng;

use crate::index::TripletIndex;
use crate::shape::Shape;
use crate::tree::{RegressionTree, SplitNode};

use super::sample::TrainingSample;
use super::split::generate_split;

fn left_child(i: usize) -> usize {
    2 * i + 1
}

fn right_child(i: usize) -> usize {
    2 * i + 2
}

fn partition_samples(split: &SplitNode, samples: &mut [TrainingSample], begin: usize, end: usize) -> usize {
    let mut i = begin;
    for j in begin..end {
        let f = &samples[j].features;
        if f[split.idx1 as usize] - f[split.idx2 as usize] > split.thresh {
            samples.swap(i, j);
            i += 1;
        }
    }
    i
}

/// Grows one tree to full depth `tree_depth`, fitting the current residual
/// (`target - current`) and shrinking each leaf's mean by `nu`, then
/// applies every leaf update to the samples it covers. Always reaches full
/// depth regardless of how samples distribute; an empty leaf carries a
/// zero vector rather than being pruned away.
#[allow(clippy::too_many_arguments)]
pub(crate) fn grow_tree<R: Rng>(
    rng: &mut R,
    samples: &mut [TrainingSample],
    mean_shape: &Shape,
    index: &TripletIndex,
    tree_depth: u32,
    nu: f64,
    feature_pool_size: usize,
    lambda: f64,
    num_test_splits: usize,
) -> RegressionTree {
    let num_split_nodes = (1usize << tree_depth) - 1;
    let num_parts = mean_shape.num_parts();

    let mut sums: Vec<Option<Shape>> = vec![None; 2 * num_split_nodes + 1];
    let mut root_sum = Shape::zero(num_parts);
    for s in samples.iter() {
        root_sum.add_assign(&s.target_shape.sub(&s.current_shape));
    }
    sums[0] = Some(root_sum);

    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    queue.push_back((0, samples.len()));

    let mut splits = Vec::with_capacity(num_split_nodes);

    for node in 0..num_split_nodes {
        let (begin, end) = queue.pop_front().expect("one range per internal node");
        let sum = sums[node].clone().unwrap_or_else(|| Shape::zero(num_parts));

        let result = generate_split(
            rng,
            samples,
            begin,
            end,
            index,
            mean_shape,
            feature_pool_size,
            lambda,
            num_test_splits,
            &sum,
        );

        let mid = partition_samples(&result.split, samples, begin, end);

        sums[left_child(node)] = Some(result.left_sum);
        sums[right_child(node)] = Some(result.right_sum);
        splits.push(result.split);

        queue.push_back((begin, mid));
        queue.push_back((mid, end));
    }

    // `queue` now holds exactly `2^tree_depth` leaf ranges, in heap order:
    // the breadth-first insertion order of a complete binary tree already
    // is heap order.
    let mut leaves = Vec::with_capacity(queue.len());
    for (leaf_idx, (begin, end)) in queue.into_iter().enumerate() {
        let count = end - begin;
        let leaf = if count > 0 {
            sums[num_split_nodes + leaf_idx]
                .as_ref()
                .expect("every leaf's sum was set by its parent split")
                .scale(nu as f32 / count as f32)
        } else {
            Shape::zero(num_parts)
        };

        for sample in &mut samples[begin..end] {
            sample.current_shape.add_assign(&leaf);
        }

        leaves.push(leaf);
    }

    RegressionTree { splits, leaves }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::index::TripletEntry;
    use rand::SeedableRng;

    fn two_sample_fixture() -> (Vec<TrainingSample>, Shape, TripletIndex) {
        let target_a = Shape::from_points(&[(0.1, 0.1), (0.9, 0.9)]);
        let target_b = Shape::from_points(&[(0.2, 0.2), (0.8, 0.8)]);
        let mean_shape = Shape::mean(&[target_a.clone(), target_b.clone()]);

        let index = TripletIndex::from_entries(vec![
            TripletEntry {
                a: 0,
                b: 1,
                c: 0,
                alpha: 0.1,
                beta: 0.1,
            };
            4
        ]);

        let samples = vec![
            TrainingSample {
                image_idx: 0,
                rect: Rect::new(0, 0, 9, 9),
                target_shape: target_a.clone(),
                current_shape: mean_shape.clone(),
                features: vec![10.0, 20.0, 30.0, 40.0],
            },
            TrainingSample {
                image_idx: 0,
                rect: Rect::new(0, 0, 9, 9),
                target_shape: target_b.clone(),
                current_shape: mean_shape.clone(),
                features: vec![40.0, 30.0, 20.0, 10.0],
            },
        ];
        (samples, mean_shape, index)
    }

    #[test]
    fn grown_tree_has_full_leaf_count() {
        let (mut samples, mean_shape, index) = two_sample_fixture();
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let tree = grow_tree(&mut rng, &mut samples, &mean_shape, &index, 2, 0.1, 4, 0.1, 4);
        assert_eq!(tree.splits.len(), 3);
        assert_eq!(tree.leaves.len(), 4);
    }

    #[test]
    fn zero_learning_rate_leaves_current_shape_unchanged() {
        let (mut samples, mean_shape, index) = two_sample_fixture();
        let before: Vec<_> = samples.iter().map(|s| s.current_shape.clone()).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let _tree = grow_tree(&mut rng, &mut samples, &mean_shape, &index, 1, 0.0, 4, 0.1, 4);
        for (sample, prior) in samples.iter().zip(before.iter()) {
            assert_eq!(&sample.current_shape, prior);
        }
    }
}
