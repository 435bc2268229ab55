mod fixtures;

use cadwire::common::{Rotate, Transform};
use cadwire::node::Tree;
use cadwire::values::{Pos2, Vec2};
use fixtures::Junction;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn rotation_is_counter_clockwise() {
    let v = Vec2::new(5.0, 0.0).rotate(90.0);
    assert!(close(v.x, 0.0) && close(v.y, 5.0), "{v:?}");
}

#[test]
fn compose_rotates_then_translates() {
    let parent = Pos2::new(10.0, 0.0, 90.0);
    let child = Pos2::new(5.0, 0.0, 0.0);
    let composed = parent.compose(child);
    assert!(close(composed.x, 10.0), "{composed:?}");
    assert!(close(composed.y, 5.0), "{composed:?}");
    assert!(close(composed.r, 90.0), "{composed:?}");
}

#[test]
fn flip_y_negates_y_only() {
    let p = Pos2::new(3.0, 4.0, 30.0).flip_y();
    assert_eq!((p.x, p.y, p.r), (3.0, -4.0, 30.0));
}

#[test]
fn transparent_group_composes_into_children() {
    let mut tree = Tree::new();
    let group = tree.insert(Transform::<Junction>::new(Pos2::new(10.0, 0.0, 90.0)));
    tree.append_new(group, Junction::at(5.0, 0.0)).unwrap();

    // the group itself must not appear; the child carries the composed
    // position
    let out = tree.serialize(group, false).unwrap();
    assert_eq!(out, "(junction (at 10.0 5.0 90.0) (diameter 0.0))");
}

#[test]
fn nested_groups_fold_nearest_frame_first() {
    let mut tree = Tree::new();
    let outer = tree.insert(Transform::<Junction>::new(Pos2::xy(100.0, 0.0)));
    let inner = tree.insert(Rotate::<Junction>::new(90.0));
    tree.append(outer, inner).unwrap();
    let j = tree.append_new(inner, Junction::at(1.0, 0.0)).unwrap();

    // rotate (1,0) by 90 -> (0,1), then translate by (100,0)
    let exported = tree.compose(tree.parent(j).unwrap(), Pos2::xy(1.0, 0.0));
    assert!(close(exported.x, 100.0), "{exported:?}");
    assert!(close(exported.y, 1.0), "{exported:?}");
    assert!(close(exported.r, 90.0), "{exported:?}");

    let out = tree.serialize(outer, false).unwrap();
    assert_eq!(out, "(junction (at 100.0 1.0 90.0) (diameter 0.0))");
}

#[test]
fn root_positions_pass_through_unchanged() {
    let mut tree = Tree::new();
    let j = tree.insert(Junction::at(7.0, 8.0));
    let out = tree.serialize(j, false).unwrap();
    assert_eq!(out, "(junction (at 7.0 8.0 0.0) (diameter 0.0))");
}

#[test]
fn identity_frame_leaves_positions_untouched() {
    let p = Pos2::default().compose(Pos2::new(2.0, 3.0, 45.0));
    assert_eq!((p.x, p.y, p.r), (2.0, 3.0, 45.0));

    // subtraction undoes composition only for pure translations
    let q = Pos2::xy(10.0, 20.0) + Pos2::xy(1.0, 2.0);
    assert_eq!((q.x, q.y), (11.0, 22.0));
    let back = q - Pos2::xy(1.0, 2.0);
    assert_eq!((back.x, back.y), (10.0, 20.0));
}
