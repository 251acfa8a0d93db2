//! Integration test: a scrambled circle of edge points goes through the
//! full pipeline and comes back as a circular epicycle outline.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::f64::consts::TAU;

use epicycle_pipeline::{PipelineConfig, Point, process};

/// `n` points on a circle of radius 50 centered at (120, -30), listed
/// in a stride-`step` scrambled order.
fn scrambled_circle(n: usize, step: usize) -> Vec<Point> {
    (0..n)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let theta = ((k * step) % n) as f64 / n as f64 * TAU;
            Point::new(50.0f64.mul_add(theta.cos(), 120.0), 50.0f64.mul_add(theta.sin(), -30.0))
        })
        .collect()
}

fn closed_length(points: &[Point]) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    open + points[points.len() - 1].distance(points[0])
}

#[test]
fn scrambled_circle_reconstructs_circle() {
    let n = 60;
    let points = scrambled_circle(n, 7);
    let config = PipelineConfig {
        sample_size: None,
        epicycles: 3,
        frames: 90,
        fourier_dt: 0.001,
        ..PipelineConfig::default()
    };

    let result = process(&points, &config).expect("pipeline should succeed");
    eprintln!(
        "tour of {} points, {} frames",
        result.tour.len(),
        result.animation.frame_count(),
    );

    // The tour walks the circle in angular order: a regular 60-gon of
    // circumradius 0.8 after normalization.
    assert_eq!(result.tour.len(), n);
    let expected_perimeter = 0.8 * 2.0 * (std::f64::consts::PI / 60.0).sin() * 60.0;
    let perimeter = closed_length(&result.tour);
    assert!(
        (perimeter - expected_perimeter).abs() < 1e-9,
        "expected perimeter {expected_perimeter}, got {perimeter}",
    );

    // Three epicycles (0, -1, 1) are enough to trace a circle.
    let outline = result.animation.outline();
    assert_eq!(outline.len(), 90);
    for (i, p) in outline.iter().enumerate() {
        let r = p.norm();
        assert!((r - 0.8).abs() < 0.01, "frame {i}: radius {r}");
    }

    // The dominant circle is the one matching the tour's direction.
    let radii = &result.animation.circle_radii;
    assert!(radii[0] < 5e-3, "center should sit at the origin, r0={}", radii[0]);
    assert!(radii[1].max(radii[2]) > 0.79);
    assert!(radii[1].min(radii[2]) < 1e-2);
}

#[test]
fn outline_follows_tour_order() {
    let n = 32;
    let points = scrambled_circle(n, 5);
    let config = PipelineConfig {
        sample_size: None,
        epicycles: 32,
        frames: 32,
        fourier_dt: 1.0 / 32.0,
        ..PipelineConfig::default()
    };

    let result = process(&points, &config).unwrap();

    // With dt = 1/n, frames = n and a full spectrum, frame k lands
    // exactly on tour point k.
    for (k, (got, expected)) in result
        .animation
        .outline()
        .iter()
        .zip(&result.tour)
        .enumerate()
    {
        let err = (got - expected.to_complex()).norm();
        assert!(err < 1e-9, "frame {k}: off by {err}");
    }
}

#[test]
fn result_serializes_to_json() {
    let points = scrambled_circle(20, 3);
    let config = PipelineConfig {
        epicycles: 5,
        frames: 4,
        fourier_dt: 0.01,
        ..PipelineConfig::default()
    };
    let result = process(&points, &config).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["tour"].as_array().unwrap().len(), 20);
    assert_eq!(json["animation"]["chains"].as_array().unwrap().len(), 4);
}
