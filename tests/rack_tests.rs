mod support;

use gearpath::float_types::{Real, PI};
use gearpath::pen::{PathCommand, RecordPen};
use gearpath::rack::RackProps;

use crate::support::approx_eq;

#[test]
fn one_pitch_closes_on_itself() {
    let pts = RackProps::default().profile_points();
    assert_eq!(pts[0].y, pts[4].y);
    assert_eq!(pts[4].x - pts[0].x, 1.0);
}

#[test]
fn flanks_rise_at_the_pressure_angle() {
    let props = RackProps::default();
    let pts = props.profile_points();
    let slope = (pts[1].x - pts[0].x) / (pts[1].y - pts[0].y);
    assert!(approx_eq(
        slope,
        (props.pressure_angle as Real).to_radians().tan(),
        1e-12
    ));
}

#[test]
fn zero_pressure_angle_gives_a_square_wave() {
    let props = RackProps { pressure_angle: 0.0, ..RackProps::default() };
    let pts = props.profile_points();
    assert_eq!(pts[0].x, pts[1].x);
    assert_eq!(pts[2].x, pts[3].x);
    assert_eq!(pts[1].y, pts[2].y);
    assert_eq!(pts[0].y, pts[3].y);
}

#[test]
fn thickness_offset_widens_the_tooth_by_its_share_of_a_module() {
    let offset_pct = 4.0;
    let base = RackProps::default();
    let fat = RackProps { balance_abs_percent: offset_pct, ..base };

    // Tooth width measured on the flank lines at the centerline height.
    let width_at_centerline = |props: &RackProps| {
        let pts = props.profile_points();
        let cy = props.profile_shift / (100.0 * PI);
        let t = (cy - pts[0].y) / (pts[1].y - pts[0].y);
        let left = pts[0].x + t * (pts[1].x - pts[0].x);
        let right = pts[3].x + t * (pts[2].x - pts[3].x);
        right - left
    };

    let grown = width_at_centerline(&fat) - width_at_centerline(&base);
    // A module is 1/π in pitch units.
    assert!(approx_eq(grown, offset_pct / 100.0 / PI, 1e-12));
}

#[test]
fn profile_shift_moves_the_whole_tooth_radially() {
    let base = RackProps::default().profile_points();
    let shifted =
        RackProps { profile_shift: 30.0, ..RackProps::default() }.profile_points();
    let dy = 30.0 / (100.0 * PI);
    for (b, s) in base.iter().zip(shifted.iter()) {
        assert!(approx_eq(s.y, b.y + dy, 1e-12));
    }
}

#[test]
fn internal_rack_swaps_balance_clearance_and_backlash() {
    let props = RackProps {
        balance_percent: 60.0,
        balance_abs_percent: 2.0,
        top_clr_percent: 10.0,
        bot_clr_percent: 20.0,
        ..RackProps::default()
    };
    let conj = props.internal();
    assert_eq!(conj.balance_percent, 40.0);
    assert_eq!(conj.balance_abs_percent, -2.0);
    assert_eq!(conj.top_clr_percent, 20.0);
    assert_eq!(conj.bot_clr_percent, 10.0);
    assert_eq!(conj.internal(), props);
}

#[test]
fn draw_emits_four_straight_edges() {
    let mut pen = RecordPen::new();
    RackProps::default().draw(&mut pen, true);
    let cmds = pen.commands();
    assert_eq!(cmds.len(), 5);
    assert!(matches!(cmds[0], PathCommand::MoveTo { .. }));
    for cmd in &cmds[1..] {
        match *cmd {
            PathCommand::ArcTo { turn, .. } => assert_eq!(turn, 0.0),
            _ => panic!("expected an arc"),
        }
    }
}
