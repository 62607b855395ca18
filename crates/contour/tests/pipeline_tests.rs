//! End-to-end tests for the contour pipeline.

use contour::{clip_polyline, is_major, ContourConfig, ContourPipeline, PixelBuffer, TaggedFeature};
use dem_common::geometry::is_closed;
use dem_common::{BoundingBox, ContourError, LonLat, PixelPoint, TileCoord};
use projection::TileProjector;
use test_utils::fixtures::{GOLDEN_TILE, RESOLUTION};
use test_utils::{create_cone_grid, create_terrain_grid, encode_grid, encode_grid_with_mask};

const MOSAIC: usize = 768;

fn pipeline(interval: f64, bold_interval: f64) -> ContourPipeline {
    let config = ContourConfig::default()
        .with_interval(interval)
        .with_bold_interval(bold_interval);
    ContourPipeline::new(config).unwrap()
}

fn inside(bbox: &BoundingBox, p: LonLat) -> bool {
    let eps = 1e-12;
    p.lon >= bbox.min_lon - eps
        && p.lon <= bbox.max_lon + eps
        && p.lat >= bbox.min_lat - eps
        && p.lat <= bbox.max_lat + eps
}

fn values(features: &[TaggedFeature]) -> Vec<f64> {
    features.iter().map(|f| f.value).collect()
}

// ============================================================================
// Small grid with explicit clip box
// ============================================================================

#[test]
fn test_cone_end_to_end() {
    let (w, h) = (9, 9);
    let data = encode_grid(&create_cone_grid(w, h, 4.5), RESOLUTION);
    let pixels = PixelBuffer::new(w, h, &data).unwrap();

    let projector = TileProjector::new(GOLDEN_TILE).unwrap();
    let bbox = BoundingBox::from_corners(
        projector.pixel_to_lonlat(PixelPoint::new(0.0, 8.0)),
        projector.pixel_to_lonlat(PixelPoint::new(8.0, 0.0)),
    );

    let features = pipeline(1.0, 2.0)
        .run_with_clip(&pixels, GOLDEN_TILE, bbox)
        .unwrap();

    // Level 0 covers the whole grid and produces no line
    assert_eq!(values(&features), vec![1.0, 2.0, 3.0, 4.0]);
    let majors: Vec<bool> = features.iter().map(|f| f.major).collect();
    assert_eq!(majors, vec![false, true, false, true]);

    for feature in &features {
        assert!(!feature.lines.is_empty());
        for line in &feature.lines {
            assert!(is_closed(line), "level {}", feature.value);
            assert!(line.iter().all(|&p| bbox.contains(p)));
        }
    }
}

#[test]
fn test_default_clip_drops_lines_outside_center_tile() {
    // A 9x9 grid only covers the top-left corner of the mosaic
    let (w, h) = (9, 9);
    let data = encode_grid(&create_cone_grid(w, h, 4.5), RESOLUTION);
    let pixels = PixelBuffer::new(w, h, &data).unwrap();

    let features = pipeline(1.0, 2.0).run(&pixels, GOLDEN_TILE).unwrap();
    assert!(features.is_empty());
}

#[test]
fn test_transparent_mosaic_yields_nothing() {
    let values = vec![12.0; 16];
    let data = encode_grid_with_mask(&values, &[true; 16], RESOLUTION);
    let pixels = PixelBuffer::new(4, 4, &data).unwrap();

    let features = pipeline(0.5, 2.5).run(&pixels, GOLDEN_TILE).unwrap();
    assert!(features.is_empty());
}

#[test]
fn test_invalid_tile_rejected() {
    let data = encode_grid(&[0.0, 1.0, 2.0, 3.0], RESOLUTION);
    let pixels = PixelBuffer::new(2, 2, &data).unwrap();

    let err = pipeline(0.5, 2.5)
        .run(&pixels, TileCoord::new(25, 0, 0))
        .unwrap_err();
    assert!(matches!(err, ContourError::InvalidArgument(_)));

    let err = pipeline(0.5, 2.5)
        .run(&pixels, TileCoord::new(2, 4, 0))
        .unwrap_err();
    assert!(matches!(err, ContourError::InvalidArgument(_)));
}

// ============================================================================
// Full 3x3 mosaic
// ============================================================================

#[test]
fn test_full_mosaic_cone() {
    let data = encode_grid(&create_cone_grid(MOSAIC, MOSAIC, 300.0), RESOLUTION);
    let pixels = PixelBuffer::new(MOSAIC, MOSAIC, &data).unwrap();

    let features = pipeline(50.0, 100.0).run(&pixels, GOLDEN_TILE).unwrap();

    // Radius 250 and 200 rings enclose the whole center tile
    assert_eq!(values(&features), vec![150.0, 200.0, 250.0]);

    let bbox = TileProjector::new(GOLDEN_TILE).unwrap().clip_box();
    for feature in &features {
        assert_eq!(feature.major, is_major(feature.value, 100.0, 1e-9));
        for line in &feature.lines {
            assert!(line.len() >= 2);
            assert!(line.iter().all(|&p| inside(&bbox, p)), "level {}", feature.value);
        }
    }
    assert!(features[1].major);

    // Radius 100 and 50 rings fit inside the center tile
    for feature in &features[1..] {
        assert_eq!(feature.lines.len(), 1);
        assert!(is_closed(&feature.lines[0]));
    }

    // Radius 150 crosses all four tile edges
    let cut = &features[0];
    assert!(cut.lines.len() >= 4);
    assert!(cut.lines.iter().all(|l| !is_closed(l)));
}

#[test]
fn test_parallel_matches_sequential() {
    let data = encode_grid(&create_terrain_grid(MOSAIC, MOSAIC), RESOLUTION);
    let pixels = PixelBuffer::new(MOSAIC, MOSAIC, &data).unwrap();

    let base = ContourConfig::default().with_interval(5.0).with_bold_interval(10.0);
    let parallel = ContourPipeline::new(base.clone().with_parallel(true))
        .unwrap()
        .run(&pixels, GOLDEN_TILE)
        .unwrap();
    let sequential = ContourPipeline::new(base.with_parallel(false))
        .unwrap()
        .run(&pixels, GOLDEN_TILE)
        .unwrap();

    assert!(!parallel.is_empty());
    assert_eq!(parallel, sequential);

    let levels = values(&parallel);
    assert!(levels.windows(2).all(|w| w[0] < w[1]));
}

// ============================================================================
// Clipper and tagger
// ============================================================================

#[test]
fn test_clip_line_inside_unchanged() {
    let bbox = BoundingBox::new(139.0, 35.0, 140.0, 36.0);
    let line = vec![
        LonLat::new(139.1, 35.1),
        LonLat::new(139.5, 35.7),
        LonLat::new(139.9, 35.2),
    ];
    assert_eq!(clip_polyline(&line, &bbox), vec![line.clone()]);
}

#[test]
fn test_clip_line_outside_dropped() {
    let bbox = BoundingBox::new(139.0, 35.0, 140.0, 36.0);
    let line = vec![LonLat::new(141.0, 35.1), LonLat::new(141.5, 35.7)];
    assert!(clip_polyline(&line, &bbox).is_empty());
}

#[test]
fn test_major_tagging() {
    assert!(is_major(5.0, 2.5, 1e-9));
    assert!(!is_major(5.3, 2.5, 1e-9));
}
