//! Random split candidate generation and best-split scoring (C5).

use rand::Rng;

use crate::index::TripletIndex;
use crate::shape::Shape;
use crate::tree::SplitNode;

use super::sample::TrainingSample;

/// Draws one candidate split. `idx1, idx2` are drawn uniformly on
/// `[0, feature_pool_size)`; if they collide the candidate is redrawn
/// without spending a random draw on the acceptance test (mirroring the
/// source's short-circuited `do/while`, so the RNG consumption order stays
/// exact). Otherwise the pair is accepted with probability
/// `exp(-dist/lambda)`, where `dist` is the distance between the two
/// slots' points in the fixed mean-shape space -- nearby pixel pairs are
/// more discriminative, and the exponential prior favours them without a
/// hard distance cap. The threshold is finally drawn uniform on
/// `[-64, +64)` -- `(u*256 - 128)/2` with `u` uniform on `[0,1)`, which is
/// *not* the `[-128,128]` range a comment in the original claims.
pub(crate) fn randomly_generate_split_feature<R: Rng>(
    rng: &mut R,
    index: &TripletIndex,
    mean_shape: &Shape,
    feature_pool_size: usize,
    lambda: f64,
) -> SplitNode {
    loop {
        let idx1 = rng.gen_range(0..feature_pool_size) as u32;
        let idx2 = rng.gen_range(0..feature_pool_size) as u32;

        let p1 = index.point(idx1 as usize, mean_shape);
        let p2 = index.point(idx2 as usize, mean_shape);
        let dist = (((p1.0 - p2.0) as f64).powi(2) + ((p1.1 - p2.1) as f64).powi(2)).sqrt();
        let accept_prob = (-dist / lambda).exp();

        if idx1 == idx2 {
            continue;
        }
        if accept_prob > rng.gen::<f64>() {
            let thresh = ((rng.gen::<f64>() * 256.0 - 128.0) / 2.0) as f32;
            return SplitNode { idx1, idx2, thresh };
        }
    }
}

pub(crate) struct SplitResult {
    pub split: SplitNode,
    pub left_sum: Shape,
    pub right_sum: Shape,
}

/// Generates `num_test_splits` candidates and keeps the one maximising
/// `dot(left,left)/n_left + dot(right,right)/n_right`, where `left`/`right`
/// are the sums of `target - current` residuals routed each way.
/// Candidates with an empty side are disqualified; ties keep the
/// first-seen candidate, since only a strictly greater score replaces the
/// incumbent.
#[allow(clippy::too_many_arguments)]
pub(crate) fn generate_split<R: Rng>(
    rng: &mut R,
    samples: &[TrainingSample],
    begin: usize,
    end: usize,
    index: &TripletIndex,
    mean_shape: &Shape,
    feature_pool_size: usize,
    lambda: f64,
    num_test_splits: usize,
    sum: &Shape,
) -> SplitResult {
    let candidates: Vec<SplitNode> = (0..num_test_splits)
        .map(|_| randomly_generate_split_feature(rng, index, mean_shape, feature_pool_size, lambda))
        .collect();

    let mut left_sums: Vec<Option<Shape>> = vec![None; num_test_splits];
    let mut left_counts = vec![0u32; num_test_splits];

    for j in begin..end {
        let residual = samples[j].target_shape.sub(&samples[j].current_shape);
        let features = &samples[j].features;
        for (i, split) in candidates.iter().enumerate() {
            if features[split.idx1 as usize] - features[split.idx2 as usize] > split.thresh {
                left_sums[i] = Some(match left_sums[i].take() {
                    Some(acc) => acc.add(&residual),
                    None => residual.clone(),
                });
                left_counts[i] += 1;
            }
        }
    }

    let total = (end - begin) as u32;
    let mut best_score = -1.0f64;
    let mut best_feat = 0usize;
    for i in 0..num_test_splits {
        let left_cnt = left_counts[i];
        let right_cnt = total - left_cnt;
        if left_cnt == 0 || right_cnt == 0 {
            continue;
        }
        let left_sum = left_sums[i].as_ref().expect("counted slot always has a sum");
        let right_sum = sum.sub(left_sum);
        let score = left_sum.dot(left_sum) / left_cnt as f64 + right_sum.dot(&right_sum) / right_cnt as f64;
        if score > best_score {
            best_score = score;
            best_feat = i;
        }
    }

    let (left_sum, right_sum) = match left_sums[best_feat].take() {
        Some(left) => {
            let right = sum.sub(&left);
            (left, right)
        }
        None => (Shape::zero(sum.num_parts()), sum.clone()),
    };

    SplitResult {
        split: candidates[best_feat],
        left_sum,
        right_sum,
    }
}
