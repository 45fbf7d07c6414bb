//! Evaluation (C9): mean per-landmark pixel error, optionally normalised by
//! a per-object scale.

use crate::geometry::Rect;
use crate::image::Image;
use crate::predictor::Predictor;

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Mean per-landmark error across every object, scale fixed at `1`.
pub fn mean_error<I: Image>(predictor: &Predictor, images: &[I], objects: &[Vec<(Rect, Vec<(f32, f32)>)>]) -> f64 {
    mean_error_scaled(predictor, images, objects, None)
}

/// As [`mean_error`], but each object's error is divided by a caller-
/// supplied scale (e.g. inter-ocular distance). `scales[i][j]` corresponds
/// to `objects[i][j]`; pass `None` to use a scale of `1` throughout.
pub fn mean_error_scaled<I: Image>(
    predictor: &Predictor,
    images: &[I],
    objects: &[Vec<(Rect, Vec<(f32, f32)>)>],
    scales: Option<&[Vec<f64>]>,
) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0u64;

    for (i, image) in images.iter().enumerate() {
        for (j, (rect, truth)) in objects[i].iter().enumerate() {
            let scale = scales.map(|s| s[i][j]).unwrap_or(1.0);
            let predicted = predictor.predict(image, rect);
            for (p, t) in predicted.iter().zip(truth.iter()) {
                sum += distance(*p, *t) as f64 / scale;
                count += 1;
            }
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
