//! Integration tests for the placement/edit state machine driven through a
//! scripted scene host.

use std::collections::HashMap;

use anatomy_viewer_lib::annotation::label::LABEL_BACKGROUND;
use anatomy_viewer_lib::annotation::{
    AnnotationSession, CommitOutcome, EditState, IgnoreReason, LabelRasterizer, PlacementOutcome,
    SceneHost,
};
use anatomy_viewer_lib::viewport::picking::{PickResult, SurfaceHit};
use egui::{pos2, Pos2};
use glam::Vec3;
use shared::AnnotationId;

/// Answers picks from a fixed pixel → surface table.
struct ScriptedHost {
    ready: bool,
    surface: HashMap<(i32, i32), Vec3>,
}

impl ScriptedHost {
    fn new(points: &[((f32, f32), Vec3)]) -> Self {
        Self {
            ready: true,
            surface: points
                .iter()
                .map(|((x, y), p)| ((*x as i32, *y as i32), *p))
                .collect(),
        }
    }

    fn not_ready() -> Self {
        Self {
            ready: false,
            surface: HashMap::new(),
        }
    }
}

impl SceneHost for ScriptedHost {
    fn project(&self, point: Vec3) -> Option<Pos2> {
        Some(pos2(400.0 + point.x * 100.0, 300.0 - point.y * 100.0))
    }

    fn cast_ray(&self, pixel: Pos2) -> PickResult {
        if !self.ready {
            return PickResult::ModelNotReady;
        }
        match self.surface.get(&(pixel.x as i32, pixel.y as i32)) {
            Some(point) => PickResult::Hit(SurfaceHit {
                point: *point,
                distance: 5.0,
                normal: Vec3::Z,
                part: "humerus".into(),
            }),
            None => PickResult::Miss,
        }
    }
}

fn session() -> AnnotationSession {
    AnnotationSession::new().unwrap()
}

fn assert_parity(s: &AnnotationSession) {
    let annotations = s.current_annotations();
    assert_eq!(annotations.len(), s.renderer().live_groups());
    for a in annotations {
        assert!(s.renderer().group(a.id).is_some(), "{} has no visual group", a.id);
    }
    if let Some(id) = s.editing() {
        assert!(s.annotation(id).is_some());
    }
}

fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn test_humerus_scenario() {
    let host = ScriptedHost::new(&[((400.0, 300.0), Vec3::new(0.12, 0.5, -0.3))]);
    let mut s = session();

    let outcome = s.on_double_click(&host, pos2(400.0, 300.0));
    let PlacementOutcome::Placed { id, edit_anchor } = outcome else {
        panic!("Expected a placement, got {outcome:?}");
    };
    let a = s.annotation(id).unwrap().clone();
    assert!(close(a.anchor_point, [0.12, 0.5, -0.3]));
    assert!(close(a.leader_end, [1.62, 1.5, -0.3]));
    assert_eq!(a.text, "");

    // Editor sits at the projected leader end
    let anchor = edit_anchor.unwrap();
    assert!((anchor.x - 562.0).abs() < 1e-3);
    assert!((anchor.y - 150.0).abs() < 1e-3);
    assert_eq!(s.state(), EditState::Editing { id, edit_anchor });

    assert_eq!(
        s.on_edit_confirm(id, "Humerus"),
        CommitOutcome::Committed {
            id,
            text: "Humerus".into()
        }
    );
    assert_eq!(s.state(), EditState::Idle);
    assert_eq!(s.current_annotations()[0].text, "Humerus");
    let label = s.renderer().group(id).unwrap().label.as_ref().unwrap();
    assert!(label.image.pixels().any(|p| p.0 != LABEL_BACKGROUND));
    assert_eq!(label.image, LabelRasterizer::new().unwrap().rasterize("Humerus"));
    assert_parity(&s);
}

#[test]
fn test_leader_geometry_is_two_segments() {
    let host = ScriptedHost::new(&[((400.0, 300.0), Vec3::new(-1.0, 2.0, 0.5))]);
    let mut s = session();
    let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(400.0, 300.0)) else {
        panic!("Expected a placement");
    };

    let group = s.renderer().group(id).unwrap();
    let segments = group.leader.segments();
    assert_eq!(segments.len(), 2);
    let (a0, a1) = segments[0];
    let (b0, b1) = segments[1];
    assert!(a0.distance(Vec3::new(-1.0, 2.0, 0.5)) < 1e-5);
    assert!(a1.distance(Vec3::new(0.0, 3.0, 0.5)) < 1e-5);
    assert!(b0.distance(a1) < 1e-6);
    assert!(b1.distance(Vec3::new(0.5, 3.0, 0.5)) < 1e-5);
    // Horizontal second leg
    assert!((b1.y - b0.y).abs() < 1e-6);
}

#[test]
fn test_empty_commit_deletes() {
    let host = ScriptedHost::new(&[((400.0, 300.0), Vec3::ZERO)]);
    let mut s = session();
    let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(400.0, 300.0)) else {
        panic!("Expected a placement");
    };

    assert_eq!(s.on_edit_confirm(id, "   "), CommitOutcome::Deleted(id));
    assert!(s.current_annotations().is_empty());
    assert_eq!(s.renderer().live_groups(), 0);
    assert_eq!(s.state(), EditState::Idle);
}

#[test]
fn test_single_edit_exclusivity() {
    let host = ScriptedHost::new(&[
        ((100.0, 100.0), Vec3::new(1.0, 0.0, 0.0)),
        ((200.0, 200.0), Vec3::new(0.0, 1.0, 0.0)),
    ]);
    let mut s = session();
    let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(100.0, 100.0)) else {
        panic!("Expected a placement");
    };

    assert_eq!(
        s.on_double_click(&host, pos2(200.0, 200.0)),
        PlacementOutcome::Ignored(IgnoreReason::ConcurrentEdit)
    );
    assert_eq!(s.current_annotations().len(), 1);
    assert_eq!(s.editing(), Some(id));

    s.on_edit_confirm(id, "Femur");
    assert!(matches!(
        s.on_double_click(&host, pos2(200.0, 200.0)),
        PlacementOutcome::Placed { .. }
    ));
    assert_eq!(s.current_annotations().len(), 2);
    assert_parity(&s);
}

#[test]
fn test_pick_miss_and_not_ready_are_noops() {
    let mut s = session();
    let miss = ScriptedHost::new(&[]);
    assert_eq!(
        s.on_double_click(&miss, pos2(10.0, 10.0)),
        PlacementOutcome::Ignored(IgnoreReason::PickMiss)
    );
    assert_eq!(
        s.on_double_click(&ScriptedHost::not_ready(), pos2(400.0, 300.0)),
        PlacementOutcome::Ignored(IgnoreReason::ModelNotReady)
    );
    assert!(s.current_annotations().is_empty());
    assert_eq!(s.renderer().live_groups(), 0);
    assert_eq!(s.state(), EditState::Idle);
}

#[test]
fn test_cancel_and_idempotent_delete() {
    let host = ScriptedHost::new(&[((400.0, 300.0), Vec3::ZERO), ((10.0, 10.0), Vec3::ONE)]);
    let mut s = session();

    let PlacementOutcome::Placed { id: first, .. } = s.on_double_click(&host, pos2(400.0, 300.0)) else {
        panic!("Expected a placement");
    };
    assert!(s.on_edit_cancel(first));
    assert!(!s.on_edit_cancel(first));
    assert!(s.current_annotations().is_empty());

    let PlacementOutcome::Placed { id: second, .. } = s.on_double_click(&host, pos2(10.0, 10.0)) else {
        panic!("Expected a placement");
    };
    assert_ne!(first, second);
    s.on_edit_confirm(second, "Scapula");

    assert!(s.on_delete_request(second));
    assert!(!s.on_delete_request(second));
    assert!(!s.on_delete_request(AnnotationId(999)));
    assert_parity(&s);
}

#[test]
fn test_stale_confirm_is_ignored() {
    let host = ScriptedHost::new(&[((400.0, 300.0), Vec3::ZERO)]);
    let mut s = session();
    let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(400.0, 300.0)) else {
        panic!("Expected a placement");
    };
    s.on_edit_confirm(id, "Radius");

    assert_eq!(s.on_edit_confirm(id, "Ulna"), CommitOutcome::Ignored);
    assert_eq!(s.current_annotations()[0].text, "Radius");
}

#[test]
fn test_parity_over_operation_sequence() {
    let pixels: Vec<((f32, f32), Vec3)> = (0..8)
        .map(|i| ((i as f32 * 10.0, 50.0), Vec3::new(i as f32 * 0.3, 0.1, -0.2)))
        .collect();
    let host = ScriptedHost::new(&pixels);
    let mut s = session();

    // Small LCG so the sequence is fixed but not hand-picked
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (seed >> 16) as usize
    };

    let mut seen_ids = Vec::new();
    for _ in 0..300 {
        match next() % 6 {
            0 | 1 => {
                let x = (next() % 10) as f32 * 10.0;
                if let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(x, 50.0)) {
                    assert!(!seen_ids.contains(&id), "id {id} reused");
                    seen_ids.push(id);
                }
            }
            2 => {
                if let Some(id) = s.editing() {
                    let text = if next() % 3 == 0 { "" } else { "Os coxae" };
                    s.on_edit_confirm(id, text);
                }
            }
            3 => {
                if let Some(id) = s.editing() {
                    s.on_edit_cancel(id);
                }
            }
            4 => {
                let ids: Vec<AnnotationId> = s.current_annotations().iter().map(|a| a.id).collect();
                if !ids.is_empty() {
                    s.on_delete_request(ids[next() % ids.len()]);
                }
            }
            _ => {
                s.on_delete_request(AnnotationId(10_000 + next() as u64));
            }
        }
        assert_parity(&s);
        // Committed annotations never hold empty text
        for a in s.current_annotations() {
            assert!(a.has_text() || s.editing() == Some(a.id));
        }
    }
}

#[test]
fn test_teardown_disposes_everything() {
    let host = ScriptedHost::new(&[((1.0, 1.0), Vec3::ZERO), ((2.0, 2.0), Vec3::X)]);
    let mut s = session();
    for (x, text) in [(1.0, "Sternum"), (2.0, "Costa")] {
        let PlacementOutcome::Placed { id, .. } = s.on_double_click(&host, pos2(x, x)) else {
            panic!("Expected a placement");
        };
        s.on_edit_confirm(id, text);
    }
    s.on_double_click(&host, pos2(1.0, 1.0));

    assert_eq!(s.teardown(), 3);
    assert!(s.current_annotations().is_empty());
    assert_eq!(s.renderer().live_groups(), 0);
    assert_eq!(s.state(), EditState::Idle);
}
