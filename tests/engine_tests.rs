//! Integration tests for the outline particle engine.
//!
//! These drive the public API end to end: outline sampling, field building,
//! convergence playback, parameter changes and frame output.

use glam::{Vec2, Vec3};
use outline_particles::buffer::RenderTarget;
use outline_particles::outline::{sample_curve, ArcLengthCurve};
use outline_particles::timeline::{STAGGER, TWEEN_DURATION};
use outline_particles::{
    sample_outline, Frame, OutlineDocument, OutlineError, ParamChange, ParticleEngine,
    RenderParams, Rgb, ShapeLibrary,
};

const EPSILON: f32 = 1e-4;

fn line_library() -> ShapeLibrary {
    ShapeLibrary::new()
        .with_shape(
            "line",
            OutlineDocument::from_path_data("line", 100.0, 100.0, &["M0 50 L100 50"]).unwrap(),
        )
        .unwrap()
}

fn two_shape_library() -> ShapeLibrary {
    line_library()
        .with_shape(
            "square",
            OutlineDocument::from_path_data("square", 40.0, 40.0, &["M0 0 L40 0 L40 40 L0 40 Z"])
                .unwrap(),
        )
        .unwrap()
}

fn engine_with(density: u32, seed: u64) -> ParticleEngine {
    ParticleEngine::builder(two_shape_library())
        .with_params(RenderParams {
            density,
            density_max: 10,
            gradient_start: Rgb::BLACK,
            gradient_end: Rgb::WHITE,
            ..Default::default()
        })
        .with_seed(seed)
        .build()
        .unwrap()
}

fn assert_vec3_eq(a: Vec3, b: Vec3) {
    assert!((a - b).length() < EPSILON, "{:?} != {:?}", a, b);
}

/// Straight curve of arbitrary length along +x.
struct Segment(f32);

impl ArcLengthCurve for Segment {
    fn length(&self) -> f32 {
        self.0
    }

    fn point_at_length(&self, offset: f32) -> Vec2 {
        Vec2::new(offset.clamp(0.0, self.0), 0.0)
    }
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_sample_count_is_ceil_length_times_density() {
    for (length, density, expected) in [(2.5, 3, 8), (10.0, 1, 10), (0.1, 5, 1), (7.25, 4, 29)] {
        let mut points = Vec::new();
        sample_curve(&Segment(length), density, &mut points);
        assert_eq!(points.len(), expected, "length {} density {}", length, density);
    }
}

#[test]
fn test_sample_count_through_parsed_paths() {
    for (d, density, expected) in [
        ("M0 0 L0.3 0", 10, 3),
        ("M0 0 L12.1 0", 10, 121),
        ("M0 0 L2.2 0", 5, 11),
        ("M0.7 0 L0.7 3.3", 3, 8),
    ] {
        let doc = OutlineDocument::from_path_data("decimal", 20.0, 20.0, &[d]).unwrap();
        assert_eq!(sample_outline(&doc, density).len(), expected, "{} at density {}", d, density);
    }
}

#[test]
fn test_zero_length_curve_yields_one_point() {
    let mut points = Vec::new();
    sample_curve(&Segment(0.0), 5, &mut points);
    assert_eq!(points, vec![Vec2::ZERO]);
}

#[test]
fn test_samples_concatenate_in_document_order() {
    let doc = OutlineDocument::from_path_data(
        "two",
        20.0,
        20.0,
        &["M0 0 L10 0", "M0 10 L0 20"],
    )
    .unwrap();
    let points = sample_outline(&doc, 1);
    assert_eq!(points.len(), 20);
    assert_eq!(points[0], Vec2::new(0.0, 0.0));
    assert!((points[9] - Vec2::new(9.0, 0.0)).length() < EPSILON);
    assert_eq!(points[10], Vec2::new(0.0, 10.0));
}

#[test]
fn test_document_without_curves_has_no_particles() {
    let library = ShapeLibrary::new()
        .with_shape("blank", OutlineDocument::from_path_data::<&str>("blank", 50.0, 50.0, &[]).unwrap())
        .unwrap();
    let mut engine = ParticleEngine::builder(library).with_seed(1).build().unwrap();
    assert_eq!(engine.particle_count(), 0);

    engine.play();
    engine.update(0.016);
    assert_eq!(engine.progress(), 1.0);
    assert!(engine.frame().vertices.is_empty());
}

// ============================================================================
// Field building
// ============================================================================

#[test]
fn test_zero_diffusion_is_deterministic() {
    let build = || {
        ParticleEngine::builder(line_library())
            .with_diffusion(0.0)
            .with_seed(42)
            .build()
            .unwrap()
    };
    let mut a = build();
    let b = build();

    a.play();
    assert_eq!(a.field().current(), a.field().home());
    assert_eq!(a.field().home(), b.field().home());
    assert_eq!(a.field().colors(), b.field().colors());
}

fn assert_dispersed_within_half_radius(engine: &ParticleEngine) {
    let field = engine.field();
    assert!(!field.is_empty());
    let mut moved = 0;
    for (current, home) in field.current().iter().zip(field.home()) {
        let offset = (*current - *home).abs();
        assert!(offset.max_element() <= 125.0, "offset {:?}", offset);
        if offset.max_element() > 0.0 {
            moved += 1;
        }
    }
    assert!(moved > 0);
}

#[test]
fn test_dispersed_positions_stay_within_half_radius() {
    let mut engine = engine_with(2, 9);
    engine.set_progress(0.0);
    assert_dispersed_within_half_radius(&engine);
}

#[test]
fn test_dispersion_bound_holds_after_density_rebuild() {
    let mut engine = engine_with(2, 9);
    engine.set_density(5);
    assert_eq!(engine.particle_count(), 500);
    engine.set_progress(0.0);
    assert_dispersed_within_half_radius(&engine);
}

#[test]
fn test_dispersion_bound_holds_after_shape_switch() {
    let mut engine = engine_with(2, 9);
    engine.set_shape("square").unwrap();
    engine.set_progress(0.0);
    assert_dispersed_within_half_radius(&engine);
}

#[test]
fn test_homes_are_centered_and_y_up() {
    let engine = engine_with(1, 1);
    let home = engine.field().home();
    assert_vec3_eq(home[0], Vec3::new(-50.0, 0.0, 0.0));
    assert_vec3_eq(home[99], Vec3::new(49.0, 0.0, 0.0));
}

#[test]
fn test_color_ratio_is_monotonic_in_x() {
    let engine = engine_with(3, 5);
    let field = engine.field();
    let mut pairs: Vec<(f32, f32)> = (0..field.len()).map(|i| (field.home()[i].x, field.ratio(i))).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    for w in pairs.windows(2) {
        assert!(w[0].1 <= w[1].1);
    }
    assert_eq!(pairs[0].1, 0.0);
}

#[test]
fn test_color_at_viewport_edges() {
    use outline_particles::gradient::{horizontal_ratio, Gradient};

    assert_eq!(horizontal_ratio(-50.0, 100.0), 0.0);
    assert_eq!(horizontal_ratio(50.0, 100.0), 1.0);

    let gradient = Gradient::new(Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0));
    assert_eq!(gradient.sample(0.0), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(gradient.sample(1.0), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn test_zero_width_viewport_uses_start_color() {
    let library = ShapeLibrary::new()
        .with_shape(
            "vertical",
            OutlineDocument::from_path_data("vertical", 0.0, 10.0, &["M0 0 L0 10"]).unwrap(),
        )
        .unwrap();
    let engine = ParticleEngine::builder(library)
        .with_params(RenderParams {
            gradient_start: Rgb::BLACK,
            ..Default::default()
        })
        .with_seed(1)
        .build()
        .unwrap();
    assert!(engine.particle_count() > 0);
    for color in engine.field().colors() {
        assert_eq!(*color, Vec3::ZERO);
    }
}

#[test]
fn test_recolor_is_idempotent_and_keeps_positions() {
    let mut engine = engine_with(2, 3);
    engine.set_progress(0.3);
    let positions = engine.field().current().to_vec();

    engine.apply(ParamChange::GradientEnd(Rgb::from_hex("#ff0000").unwrap()));
    let first = engine.field().colors().to_vec();
    engine.apply(ParamChange::GradientEnd(Rgb::from_hex("#ff0000").unwrap()));

    assert_eq!(engine.field().colors(), &first[..]);
    assert_eq!(engine.field().current(), &positions[..]);
    assert_eq!(engine.progress(), 0.3);
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_playback_progress_is_monotonic() {
    let mut engine = engine_with(2, 11);
    engine.play();
    assert_eq!(engine.progress(), 0.0);

    let mut last = 0.0;
    while engine.is_playing() {
        engine.update(1.0 / 60.0);
        assert!(engine.progress() >= last);
        last = engine.progress();
    }
    assert_eq!(engine.progress(), 1.0);
    assert_eq!(engine.field().current(), engine.field().home());
}

#[test]
fn test_particles_never_move_away_from_home() {
    let mut engine = engine_with(1, 4);
    engine.play();
    let mut last: Vec<f32> = distances(&engine);
    for _ in 0..120 {
        engine.update(1.0 / 60.0);
        let now = distances(&engine);
        for (a, b) in last.iter().zip(&now) {
            assert!(*b <= *a + EPSILON);
        }
        last = now;
    }
}

fn distances(engine: &ParticleEngine) -> Vec<f32> {
    let field = engine.field();
    field
        .current()
        .iter()
        .zip(field.home())
        .map(|(c, h)| c.distance(*h))
        .collect()
}

#[test]
fn test_left_particles_start_first() {
    let engine = engine_with(2, 2);
    let field = engine.field();
    let tweens = engine.timeline().plan().tweens();
    for tween in tweens {
        assert!((tween.start - field.ratio(tween.index) * STAGGER).abs() < EPSILON);
        assert_eq!(tween.duration, TWEEN_DURATION);
    }
    for pair in tweens.windows(2) {
        // The line runs left to right, so samples are already sorted by x
        assert!(pair[0].start <= pair[1].start);
    }
}

#[test]
fn test_progress_zero_is_fully_dispersed() {
    let mut engine = engine_with(1, 6);
    engine.set_progress(0.0);
    for tween in engine.timeline().plan().tweens() {
        assert_eq!(engine.field().current()[tween.index], tween.from);
    }
}

#[test]
fn test_progress_one_is_exactly_home() {
    let mut engine = engine_with(2, 8);
    engine.play();
    engine.update(0.1);
    engine.set_progress(1.0);
    assert_eq!(engine.field().current(), engine.field().home());
    assert!(!engine.is_playing());
}

#[test]
fn test_set_progress_clamps() {
    let mut engine = engine_with(1, 1);
    engine.set_progress(-3.0);
    assert_eq!(engine.progress(), 0.0);
    engine.set_progress(7.0);
    assert_eq!(engine.progress(), 1.0);
}

// ============================================================================
// Rebuilds
// ============================================================================

#[test]
fn test_density_change_preserves_progress() {
    let mut engine = engine_with(2, 12);
    engine.set_progress(0.4);
    engine.apply(ParamChange::Density(3));

    assert_eq!(engine.particle_count(), 300);
    assert!((engine.progress() - 0.4).abs() < EPSILON);
    assert!(!engine.is_playing());

    let time = engine.progress() * engine.timeline().plan().duration();
    for tween in engine.timeline().plan().tweens() {
        assert_vec3_eq(engine.field().current()[tween.index], tween.position_at(time));
    }
}

#[test]
fn test_rebuild_while_playing_keeps_playing() {
    let mut engine = engine_with(2, 12);
    engine.play();
    engine.update(0.3);
    let progress = engine.progress();
    engine.set_density(4);
    assert!(engine.is_playing());
    assert!((engine.progress() - progress).abs() < EPSILON);
}

#[test]
fn test_shape_switch_rebuilds() {
    let mut engine = engine_with(1, 1);
    let generation = engine.buffer().generation();
    engine.set_shape("square").unwrap();
    assert_eq!(engine.particle_count(), 160);
    assert_eq!(engine.buffer().len(), 160);
    assert_eq!(engine.buffer().generation(), generation + 1);

    let err = engine.set_shape("circle");
    assert!(matches!(err, Err(OutlineError::UnknownShape(name)) if name == "circle"));
    assert_eq!(engine.active_shape(), "square");
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_line_at_density_two() {
    let library = line_library();
    let points = sample_outline(library.get("line").unwrap(), 2);
    assert_eq!(points.len(), 200);
    for pair in points.windows(2) {
        assert!((pair[1].x - pair[0].x - 0.5).abs() < EPSILON);
    }

    let engine = engine_with(2, 1);
    assert_eq!(engine.particle_count(), 200);

    let colors = engine.field().colors();
    let first = colors[0];
    let last = colors[colors.len() - 1];
    assert_vec3_eq(first, Vec3::ZERO);
    assert!((last - Vec3::ONE).abs().max_element() < 0.01, "{:?}", last);
}

struct Recorder {
    ratio: f32,
    frames: Vec<(usize, f32)>,
}

impl RenderTarget for Recorder {
    fn pixel_ratio(&self) -> f32 {
        self.ratio
    }

    fn submit(&mut self, frame: &Frame<'_>) {
        self.frames.push((frame.vertices.len(), frame.uniforms.point_size));
        assert_eq!(frame.vertex_bytes().len(), frame.vertices.len() * 24);
    }
}

#[test]
fn test_render_target_receives_frames() {
    let mut engine = engine_with(1, 1);
    let mut target = Recorder {
        ratio: 3.0,
        frames: Vec::new(),
    };

    engine.render_to(0.016, &mut target);
    engine.apply(ParamChange::PointSize(4));
    engine.render_to(0.016, &mut target);

    // Pixel ratio is capped at 2
    assert_eq!(target.frames, vec![(100, 20.0), (100, 8.0)]);
}

#[test]
fn test_frames_upload_current_positions() {
    let mut engine = engine_with(1, 5);
    engine.play();
    engine.update(0.2);
    let frame = engine.frame();
    for (vertex, current) in frame.vertices.iter().zip(engine.field().current()) {
        assert_eq!(vertex.position, current.to_array());
    }
}
