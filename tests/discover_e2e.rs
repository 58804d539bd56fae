//! End-to-end orchestrator scenarios on small synthetic canvases.

use chrono::{DateTime, TimeZone as _, Utc};
use image::RgbImage;

use trailreel::{
    encode_frames, snake_path_discover, Canvas, DiscoverConfig, DistanceUnit, FrameIndex,
    GeoPoint, InMemorySink, PhotoCandidate, PhotoZoomParams, Route, RouteParams, TrackSample,
};

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

fn test_canvas() -> Canvas {
    let base = RgbImage::from_pixel(100, 100, image::Rgb(BLACK));
    let discovery = RgbImage::from_pixel(100, 100, image::Rgb(WHITE));
    // One degree of latitude and longitude across 100 pixels.
    Canvas::new(
        base,
        discovery,
        GeoPoint::new(1.0, 0.0),
        GeoPoint::new(0.0, 1.0),
    )
    .unwrap()
}

fn t(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 16, 15, minute, 0).unwrap()
}

/// Geo coordinate landing in the middle of pixel `(x, y)`.
fn geo_at(x: i64, y: i64) -> GeoPoint {
    GeoPoint::new(1.0 - (y as f64 + 0.5) / 100.0, (x as f64 + 0.5) / 100.0)
}

/// Five waypoints at x = 0, 10, 20, 30, 40 along row y = 50.
fn straight_track() -> Vec<TrackSample> {
    (0..5)
        .map(|i| {
            let g = geo_at(i * 10, 50);
            TrackSample {
                time: t(i as u32),
                lat: g.lat,
                lon: g.lon,
                elevation: 10.0 + i as f64,
            }
        })
        .collect()
}

fn small_params() -> RouteParams {
    RouteParams {
        dim: 1,
        marker_radius: 1,
        buff: 5,
        ..RouteParams::default()
    }
}

fn fast_config() -> DiscoverConfig {
    DiscoverConfig {
        skip_level: 2,
        final_height: 52,
        dwell_frames: 0,
        transition_steps: 2,
        ..DiscoverConfig::default()
    }
}

#[test]
fn straight_route_reveals_exactly_its_waypoints() {
    let mut canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();

    // dx (52) > dy (12) on an aspect-1 canvas: the zoom box is square.
    assert_eq!(route.zoom.height, route.zoom.width);
    assert_eq!(route.zoom.height, 52);

    snake_path_discover(&mut canvas, &[route], &fast_config()).unwrap();

    // Exactly five reveal events: one pixel per waypoint (dim 1), with
    // the moving marker cleared behind itself.
    let revealed: Vec<(u32, u32)> = canvas
        .base()
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 != BLACK)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert_eq!(revealed.len(), 5);
    for (i, &(x, y)) in revealed.iter().enumerate() {
        assert_eq!((x, y), (i as u32 * 10, 50));
        assert_eq!(canvas.base().get_pixel(x, y).0, WHITE);
    }
}

#[test]
fn skip_level_two_captures_three_traversal_frames() {
    let mut canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();
    let config = fast_config();

    snake_path_discover(&mut canvas, &[route], &config).unwrap();

    // 2 transition-in + captures at waypoints 0, 2, 4 + 1 closing frame
    // + 0 dwell + 2 transition-out.
    assert_eq!(canvas.frames().len(), 2 + 3 + 1 + 2);

    // Every frame has the configured output size.
    for f in canvas.frames() {
        assert_eq!((f.width(), f.height()), (52, 52));
    }
}

#[test]
fn photo_interlude_runs_once_after_its_waypoint_is_passed() {
    let mut canvas = test_canvas();

    // Bright green photo anchored nearest to waypoint 2 (x = 20).
    let photo = PhotoCandidate {
        image: RgbImage::from_pixel(8, 8, image::Rgb([9, 200, 9])),
        position: geo_at(21, 52),
        taken_at: t(2),
    };
    let route = Route::build(&canvas, &straight_track(), vec![photo], &small_params()).unwrap();
    assert_eq!(route.photos.len(), 1);
    assert_eq!(route.photos[0].nearest_waypoint, 2);

    let config = DiscoverConfig {
        photo: PhotoZoomParams {
            start_height: 4,
            step: 4,
            target_height: Some(12),
        },
        ..fast_config()
    };
    snake_path_discover(&mut canvas, &[route], &config).unwrap();

    // Growth heights 4 and 8: two growth frames, no dwell, two shrink
    // frames, spliced in after the capture at waypoint 4 (the first
    // captured index exceeding the photo's waypoint).
    assert_eq!(canvas.frames().len(), 2 + 3 + 4 + 1 + 2);

    let is_photo_frame = |f: &RgbImage| f.pixels().any(|p| p.0[1] > 150 && p.0[0] < 100);
    let photo_frames: Vec<usize> = canvas
        .frames()
        .iter()
        .enumerate()
        .filter(|(_, f)| is_photo_frame(f))
        .map(|(i, _)| i)
        .collect();
    // Frames 0-1 transition, 2-4 captures at waypoints 0/2/4, 5-8 the
    // interlude, 9 closing, 10-11 transition out.
    assert_eq!(photo_frames, vec![5, 6, 7, 8]);
}

#[test]
fn photo_zoom_truncates_at_the_canvas_edge() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut canvas = test_canvas();

    // Anchored two pixels off the left edge: the first growth step
    // fits, the second would write outside and stops the interlude.
    let photo = PhotoCandidate {
        image: RgbImage::from_pixel(8, 8, image::Rgb([9, 200, 9])),
        position: geo_at(2, 51),
        taken_at: t(0),
    };
    let route = Route::build(&canvas, &straight_track(), vec![photo], &small_params()).unwrap();
    assert_eq!(route.photos[0].nearest_waypoint, 0);

    let config = DiscoverConfig {
        photo: PhotoZoomParams {
            start_height: 4,
            step: 4,
            target_height: Some(12),
        },
        ..fast_config()
    };
    snake_path_discover(&mut canvas, &[route], &config).unwrap();

    // One growth frame survives (plus its mirrored shrink frame); the
    // run itself completes normally.
    assert_eq!(canvas.frames().len(), 2 + 3 + 2 + 1 + 2);
}

#[test]
fn distance_accumulates_uniformly_along_a_straight_route() {
    let canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();

    let per_pixel = canvas.distance_per_pixel(DistanceUnit::Miles);
    assert!(per_pixel > 0.0);

    let mut total = 0.0;
    for (k, pair) in route.waypoints.windows(2).enumerate() {
        let step = trailreel::geo::transform::distance_pixels(pair[1].index, pair[0].index);
        assert!((step - 10.0).abs() < 1e-12);
        total += step * per_pixel;
        let expected = (k + 1) as f64 * 10.0 * per_pixel;
        assert!((total - expected).abs() < 1e-9);
    }
}

#[test]
fn dwell_frames_repeat_the_closing_frame() {
    let mut canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();
    let config = DiscoverConfig {
        dwell_frames: 3,
        ..fast_config()
    };

    snake_path_discover(&mut canvas, &[route], &config).unwrap();

    // 2 + 3 + 1 closing + 3 dwell + 2 out.
    assert_eq!(canvas.frames().len(), 11);
    let closing = &canvas.frames()[5];
    assert_eq!(&canvas.frames()[6], closing);
    assert_eq!(&canvas.frames()[7], closing);
    assert_eq!(&canvas.frames()[8], closing);
}

#[test]
fn overlays_draw_on_captured_frames() {
    let mut canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();
    let config = DiscoverConfig {
        final_height: 200,
        distance: Some(trailreel::DistanceOverlay::default()),
        elevation: Some(trailreel::ElevationOverlay::default()),
        ..fast_config()
    };

    snake_path_discover(&mut canvas, &[route], &config).unwrap();

    // The second traversal capture (after the 2-step transition)
    // carries the first frame's profile dot; the current dot itself
    // sits under the elevation text box.
    let frame = &canvas.frames()[3];
    let greens = frame.pixels().filter(|p| p.0 == [0, 255, 0]).count();
    assert!(greens > 0);
}

#[test]
fn frames_stream_into_a_sink_in_order() {
    let mut canvas = test_canvas();
    let route = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();
    let config = fast_config();

    snake_path_discover(&mut canvas, &[route], &config).unwrap();
    let frames = canvas.take_frames();

    let mut sink = InMemorySink::new();
    encode_frames(&frames, config.fps, &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (52, 52, 30));
    assert_eq!(sink.frames().len(), frames.len());
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(*idx, FrameIndex(i as u64));
    }
}

#[test]
fn two_routes_chain_without_intermediate_zoom_out() {
    let mut canvas = test_canvas();
    let first = Route::build(&canvas, &straight_track(), vec![], &small_params()).unwrap();

    let second_track: Vec<TrackSample> = (0..3)
        .map(|i| {
            let g = geo_at(60 + i * 5, 80);
            TrackSample {
                time: t(10 + i as u32),
                lat: g.lat,
                lon: g.lon,
                elevation: 5.0,
            }
        })
        .collect();
    let second = Route::build(&canvas, &second_track, vec![], &small_params()).unwrap();

    let config = fast_config();
    snake_path_discover(&mut canvas, &[first, second], &config).unwrap();

    // Route 1: 2 in + 3 captures + 1 closing. Route 2: 2 transition
    // (from route 1's box, not the full map) + 2 captures (waypoints
    // 0 and 2) + 1 closing. Then 2 transition out.
    assert_eq!(canvas.frames().len(), (2 + 3 + 1) + (2 + 2 + 1) + 2);

    // Both routes revealed their waypoints.
    assert_eq!(canvas.base().get_pixel(0, 50).0, WHITE);
    assert_eq!(canvas.base().get_pixel(60, 80).0, WHITE);
}
