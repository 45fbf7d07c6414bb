//! Feature extraction (C3): for a given image/rectangle/shape/index, the
//! intensities sampled at each triplet-indexed location.

use crate::geometry::{unnormalising, Rect};
use crate::image::Image;
use crate::index::TripletIndex;
use crate::shape::Shape;

/// Extracts the length-F feature vector for `shape` inside `rect` of
/// `image`, using `index` to locate each sample point. Points that map
/// outside the image contribute `0`, not an error: a mean shape placed in
/// an unusually proportioned box can legitimately sample outside the image,
/// and this is expected, not exceptional.
pub fn extract<I: Image>(image: &I, rect: &Rect, shape: &Shape, index: &TripletIndex) -> Vec<f32> {
    let to_pixel = unnormalising(rect);
    let bounds = image.get_rect();
    let mut features = Vec::with_capacity(index.len());
    for k in 0..index.len() {
        let p = index.point(k, shape);
        let (px, py) = to_pixel.apply(p);
        let (ix, iy) = (px.floor() as i64, py.floor() as i64);
        if bounds.contains(ix, iy) {
            features.push(image.intensity(ix, iy) as f32);
        } else {
            features.push(0.0);
        }
    }
    features
}
