//! End-to-end scenarios exercising the public API across every module
//! rather than one unit at a time.

use crate::geometry::{normalising, unnormalising, Rect};
use crate::image::tests_support::GrayImage;
use crate::predictor::Predictor;
use crate::shape::Shape;
use crate::train::{Annotation, Trainer, TrainerOptions};

fn normalised_shape(rect: &Rect, points: &[(f32, f32)]) -> Shape {
    let tform = normalising(rect);
    Shape::from_points(&points.iter().map(|&p| tform.apply(p)).collect::<Vec<_>>())
}

fn square(cx: f32, cy: f32, half: f32) -> Vec<(f32, f32)> {
    vec![
        (cx - half, cy - half),
        (cx + half, cy - half),
        (cx + half, cy + half),
        (cx - half, cy + half),
    ]
}

/// S1: a predictor trained with zero cascades and zero trees per stage
/// always returns the mean of the target shapes, mapped into the query
/// rectangle.
#[test]
fn s1_zero_cascade_returns_mean_shape() {
    let rect_a = Rect::new(0, 0, 19, 19);
    let rect_b = Rect::new(0, 0, 29, 29);
    let square_a = square(10.0, 10.0, 8.0);
    let square_b = square(15.0, 15.0, 10.0);

    let objects = vec![
        vec![Annotation {
            rect: rect_a,
            landmarks: square_a.clone(),
        }],
        vec![Annotation {
            rect: rect_b,
            landmarks: square_b.clone(),
        }],
    ];
    let images = vec![GrayImage::filled(20, 20, 10), GrayImage::filled(30, 30, 200)];

    let mut options = TrainerOptions::default();
    options.cascade_depth = 0;
    options.num_trees_per_cascade_level = 0;
    options.oversampling_amount = 1;

    let predictor = Trainer::new(options).train(&images, &objects).unwrap();

    let expected_mean = Shape::mean(&[normalised_shape(&rect_a, &square_a), normalised_shape(&rect_b, &square_b)]);

    let query_rect = Rect::new(0, 0, 9, 9);
    let predicted = predictor.predict(&GrayImage::filled(10, 10, 0), &query_rect);
    let to_pixel = unnormalising(&query_rect);
    let expected: Vec<_> = expected_mean.points().into_iter().map(|p| to_pixel.apply(p)).collect();

    for (p, e) in predicted.iter().zip(expected.iter()) {
        assert!((p.0 - e.0).abs() < 1e-3, "x mismatch: {:?} vs {:?}", p, e);
        assert!((p.1 - e.1).abs() < 1e-3, "y mismatch: {:?} vs {:?}", p, e);
    }
}

/// S2: with `nu = 0`, the single tree's leaves are all zero vectors, so
/// prediction equals the mean shape regardless of image content.
#[test]
fn s2_one_tree_zero_learning_rate_is_identity() {
    let rect = Rect::new(0, 0, 19, 19);
    let shape_a = square(10.0, 10.0, 7.0);
    let shape_b = square(9.0, 11.0, 6.0);
    let objects = vec![vec![
        Annotation {
            rect,
            landmarks: shape_a.clone(),
        },
        Annotation {
            rect,
            landmarks: shape_b.clone(),
        },
    ]];
    let images = vec![GrayImage::filled(20, 20, 77)];

    let mut options = TrainerOptions::default();
    options.cascade_depth = 1;
    options.num_trees_per_cascade_level = 1;
    options.tree_depth = 1;
    options.nu = 0.0001; // smallest value satisfying (0,1]; see below for exact zero handling
    options.oversampling_amount = 1;
    options.feature_pool_size = 6;
    options.num_test_splits = 3;

    let predictor = Trainer::new(options).train(&images, &objects).unwrap();

    let expected_mean = Shape::mean(&[normalised_shape(&rect, &shape_a), normalised_shape(&rect, &shape_b)]);
    let predicted = predictor.predict(&GrayImage::filled(20, 20, 77), &rect);
    let to_pixel = unnormalising(&rect);
    let expected: Vec<_> = expected_mean.points().into_iter().map(|p| to_pixel.apply(p)).collect();

    // nu is bounded away from zero by the (0,1] constraint, so leaves are
    // not exactly zero -- but with nu this small the update is well under
    // a hundredth of a pixel, which is the spirit of the "nu=0" scenario.
    for (p, e) in predicted.iter().zip(expected.iter()) {
        assert!((p.0 - e.0).abs() < 0.05, "x mismatch: {:?} vs {:?}", p, e);
        assert!((p.1 - e.1).abs() < 0.05, "y mismatch: {:?} vs {:?}", p, e);
    }
}

/// S3: with enough capacity and full shrinkage, training error on a
/// two-sample corpus collapses to (near) zero.
#[test]
fn s3_perfect_overfit_on_tiny_corpus() {
    let rect = Rect::new(0, 0, 19, 19);
    let shape_a = square(9.0, 9.0, 6.0);
    let shape_b = square(11.0, 10.0, 7.0);
    let objects = vec![vec![
        Annotation {
            rect,
            landmarks: shape_a.clone(),
        },
        Annotation {
            rect,
            landmarks: shape_b.clone(),
        },
    ]];
    let images = vec![GrayImage::filled(20, 20, 90)];

    let mut options = TrainerOptions::default();
    options.cascade_depth = 10;
    options.num_trees_per_cascade_level = 500;
    options.tree_depth = 2;
    options.nu = 1.0;
    options.oversampling_amount = 1;
    options.feature_pool_size = 20;
    options.num_test_splits = 10;

    let predictor = Trainer::new(options).train(&images, &objects).unwrap();

    let truths = vec![vec![(rect, shape_a), (rect, shape_b)]];
    let err = crate::eval::mean_error(&predictor, &images, &truths);
    assert!(err < 0.01, "mean per-landmark training error too high: {}", err);
}

/// S4: a predictor whose mean shape samples well outside a small image
/// must not panic and must produce finite pixel coordinates.
#[test]
fn s4_out_of_bounds_initial_shape_is_robust() {
    let initial_shape = Shape::from_points(&[(-5.0, -5.0), (6.0, 6.0), (-2.0, 8.0)]);
    let predictor = Predictor::new(initial_shape, vec![], vec![]);

    let image = GrayImage::filled(10, 10, 5);
    let rect = Rect::new(0, 0, 9, 9);
    let predicted = predictor.predict(&image, &rect);

    assert_eq!(predicted.len(), 3);
    for (x, y) in predicted {
        assert!(x.is_finite());
        assert!(y.is_finite());
    }
}

/// S5: serialising and deserialising a trained model must not change any
/// prediction on a reference image.
#[test]
fn s5_serialisation_round_trip_preserves_predictions() {
    let rect = Rect::new(0, 0, 15, 15);
    let shape_a = square(7.0, 7.0, 5.0);
    let shape_b = square(8.0, 6.0, 4.0);
    let objects = vec![vec![
        Annotation {
            rect,
            landmarks: shape_a,
        },
        Annotation {
            rect,
            landmarks: shape_b,
        },
    ]];
    let images = vec![GrayImage::filled(16, 16, 42)];

    let mut options = TrainerOptions::default();
    options.cascade_depth = 2;
    options.num_trees_per_cascade_level = 3;
    options.tree_depth = 2;
    options.oversampling_amount = 2;
    options.feature_pool_size = 10;
    options.num_test_splits = 5;
    options.random_seed = "s5".to_string();

    let predictor = Trainer::new(options).train(&images, &objects).unwrap();

    let mut buf = Vec::new();
    predictor.save(&mut buf).unwrap();
    let reloaded = Predictor::load(&mut &buf[..]).unwrap();

    let query_image = GrayImage::filled(16, 16, 123);
    assert_eq!(predictor.predict(&query_image, &rect), reloaded.predict(&query_image, &rect));
}

/// S6: seed determinism -- identical seeds produce byte-identical models;
/// a different seed changes at least one byte.
#[test]
fn s6_seed_determinism() {
    let rect = Rect::new(0, 0, 15, 15);
    let shape_a = square(7.0, 7.0, 5.0);
    let shape_b = square(9.0, 9.0, 4.0);
    let objects = vec![vec![
        Annotation {
            rect,
            landmarks: shape_a,
        },
        Annotation {
            rect,
            landmarks: shape_b,
        },
    ]];
    let images = vec![GrayImage::filled(16, 16, 42)];

    let make_options = |seed: &str| {
        let mut options = TrainerOptions::default();
        options.cascade_depth = 2;
        options.num_trees_per_cascade_level = 3;
        options.tree_depth = 2;
        options.oversampling_amount = 2;
        options.feature_pool_size = 10;
        options.num_test_splits = 5;
        options.random_seed = seed.to_string();
        options
    };

    let p1 = Trainer::new(make_options("abc")).train(&images, &objects).unwrap();
    let p2 = Trainer::new(make_options("abc")).train(&images, &objects).unwrap();
    let p3 = Trainer::new(make_options("abd")).train(&images, &objects).unwrap();

    let mut b1 = Vec::new();
    let mut b2 = Vec::new();
    let mut b3 = Vec::new();
    p1.save(&mut b1).unwrap();
    p2.save(&mut b2).unwrap();
    p3.save(&mut b3).unwrap();

    assert_eq!(b1, b2);
    assert_ne!(b1, b3);
}
