//! End-to-end scenarios exercised through the public `Octagon` API.

use numdom_core::scalar::NativeRat;
use numdom_core::{ConsKind, Interval, LinCons, LinExpr};
use numdom_oct::Octagon;

fn nr(n: i64) -> NativeRat {
    NativeRat::new(n, 1)
}

/// `x - y <= 1, y - z <= 1, z - x <= -3` has no solution: summing the three
/// gives `0 <= -1`. A meet of the three unit constraints must collapse to
/// bottom once the octagon closes and detects the negative cycle.
#[test]
fn negative_cycle_collapses_to_bottom() {
    // Build as `expr >= 0` forms directly: (1 - x + y) >= 0  <=> x - y <= 1
    let c1 = LinCons::new(
        {
            let mut e = LinExpr::new(Interval::point(nr(1)));
            e.set_coeff(0, Interval::point(nr(-1)));
            e.set_coeff(1, Interval::point(nr(1)));
            e
        },
        ConsKind::Geq,
    );
    let c2 = LinCons::new(
        {
            let mut e = LinExpr::new(Interval::point(nr(1)));
            e.set_coeff(1, Interval::point(nr(-1)));
            e.set_coeff(2, Interval::point(nr(1)));
            e
        },
        ConsKind::Geq,
    );
    let c3 = LinCons::new(
        {
            let mut e = LinExpr::new(Interval::point(nr(3)));
            e.set_coeff(2, Interval::point(nr(1)));
            e.set_coeff(0, Interval::point(nr(-1)));
            e
        },
        ConsKind::Geq,
    );

    let oct = Octagon::<NativeRat>::of_lincons_array(3, 0, &[c1, c2, c3]);
    assert!(oct.is_bottom());
}

/// `{x<=1, y<=1}` joined with `{x<=2, y<=0}` must still bound `x`, `y` and,
/// after re-closure, the combined `x + y` relation, even though neither
/// operand constrained `x` and `y` jointly.
#[test]
fn join_of_two_boxes_bounds_every_dimension() {
    let box1 = vec![Interval::of_bounds(Some(nr(0)), Some(nr(1))), Interval::of_bounds(Some(nr(0)), Some(nr(1)))];
    let box2 = vec![Interval::of_bounds(Some(nr(0)), Some(nr(2))), Interval::of_bounds(Some(nr(0)), Some(nr(0)))];

    let o1 = Octagon::<NativeRat>::of_box(0, &box1);
    let o2 = Octagon::<NativeRat>::of_box(0, &box2);
    let j = o1.join(&o2);

    let b = j.to_box();
    assert_eq!(b[0].upper_value(), Some(nr(2)));
    assert_eq!(b[1].upper_value(), Some(nr(1)));

    let mut xy = LinExpr::new(Interval::point(nr(0)));
    xy.set_coeff(0, Interval::point(nr(1)));
    xy.set_coeff(1, Interval::point(nr(1)));
    assert!(j.bound_linexpr(&xy).upper_value().is_some());
}

#[test]
fn assign_and_forget_round_trip_through_a_box() {
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(5)))];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    let forgotten = o.forget_dim(0);
    assert!(forgotten.bound_dim(0).is_top());
}

#[test]
fn is_dimension_unconstrained_and_sat_interval() {
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(5))), Interval::top()];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    assert!(!o.is_dimension_unconstrained(0));
    assert!(o.is_dimension_unconstrained(1));
    assert!(o.sat_interval(0, &Interval::of_bounds(Some(nr(0)), Some(nr(10)))));
    assert!(!o.sat_interval(0, &Interval::of_bounds(Some(nr(0)), Some(nr(1)))));
}

#[test]
fn to_lincons_array_round_trips_a_unit_bound() {
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(5)))];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    let cons = o.to_lincons_array();
    let rebuilt = Octagon::<NativeRat>::of_lincons_array(1, 0, &cons);
    assert!(o.is_eq(&rebuilt));
}

#[test]
fn meet_array_of_empty_slice_is_top() {
    let t = Octagon::<NativeRat>::meet_array(2, 0, &[]);
    assert!(t.is_top());
}

#[test]
fn forget_array_unconstrains_every_listed_dimension() {
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(1))), Interval::of_bounds(Some(nr(2)), Some(nr(3)))];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    let forgotten = o.forget_array(&[0, 1]);
    assert!(forgotten.bound_dim(0).is_top());
    assert!(forgotten.bound_dim(1).is_top());
}

#[test]
fn substitute_then_forget_matches_projecting_the_original_bound() {
    // x in [0,5]; substitute x <- y (tie x = y, then project x out) should
    // leave y unconstrained, since the only constraint on x never
    // mentioned y before the tie.
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(5))), Interval::top()];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    let mut e = LinExpr::new(Interval::point(nr(0)));
    e.set_coeff(1, Interval::point(nr(1)));
    let substituted = o.substitute_linexpr(0, &e);
    assert_eq!(substituted.bound_dim(1).lower_value(), Some(nr(0)));
    assert_eq!(substituted.bound_dim(1).upper_value(), Some(nr(5)));
}

#[test]
fn assign_linexpr_array_bounds_every_target_from_the_original_box() {
    let box_ = vec![Interval::of_bounds(Some(nr(0)), Some(nr(1))), Interval::of_bounds(Some(nr(2)), Some(nr(3)))];
    let o = Octagon::<NativeRat>::of_box(0, &box_);
    let mut e0 = LinExpr::new(Interval::point(nr(10)));
    let mut e1 = LinExpr::new(Interval::point(nr(20)));
    e0.set_coeff(1, Interval::point(nr(0)));
    e1.set_coeff(0, Interval::point(nr(0)));
    let assigned = o.assign_linexpr_array(&[0, 1], &[e0, e1]);
    assert_eq!(assigned.bound_dim(0).lower_value(), Some(nr(10)));
    assert_eq!(assigned.bound_dim(1).lower_value(), Some(nr(20)));
}

#[test]
fn fold_of_three_dimensions_accumulates_every_operand() {
    // w in [0,1], x in [0,2], y in [0,9], z in [0,5]. Folding w,x,y must
    // keep all three contributions (not just the last one folded in), so
    // the result's upper bound has to reach y's 9, not stop at x's 2.
    let iv = vec![
        Interval::of_bounds(Some(nr(0)), Some(nr(1))),
        Interval::of_bounds(Some(nr(0)), Some(nr(2))),
        Interval::of_bounds(Some(nr(0)), Some(nr(9))),
        Interval::of_bounds(Some(nr(0)), Some(nr(5))),
    ];
    let o = Octagon::<NativeRat>::of_box(0, &iv);
    let folded = o.fold(&[0, 1, 2]).unwrap();
    assert_eq!(folded.dim(), 2);
    // z's bound (now at index 1) must survive untouched.
    assert_eq!(folded.bound_dim(1).upper_value(), Some(nr(5)));
    let upper = folded.bound_dim(0).upper_value().unwrap();
    assert_ne!(upper.cmp_scalar(&nr(9)), std::cmp::Ordering::Less);
}

#[test]
fn fold_preserves_bounds_on_unrelated_dimensions() {
    // Two octagons over 3 dims: x in [0,1], y in [0,2], z in [0,5].
    let iv = vec![
        Interval::of_bounds(Some(nr(0)), Some(nr(1))),
        Interval::of_bounds(Some(nr(0)), Some(nr(2))),
        Interval::of_bounds(Some(nr(0)), Some(nr(5))),
    ];
    let o = Octagon::<NativeRat>::of_box(0, &iv);
    let folded = o.fold(&[0, 1]).unwrap();
    assert_eq!(folded.dim(), 2);
    // z's bound (now at index 1) must survive the fold untouched.
    assert_eq!(folded.bound_dim(1).upper_value(), Some(nr(5)));
    // the folded dimension should be at least as loose as either original.
    let upper = folded.bound_dim(0).upper_value().unwrap();
    assert_ne!(upper.cmp_scalar(&nr(1)), std::cmp::Ordering::Less);
}
