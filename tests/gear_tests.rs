mod support;

use gearpath::errors::ValidationError;
use gearpath::float_types::{Real, PI};
use gearpath::gear::GearProps;
use gearpath::pen::RecordPen;
use gearpath::rack::RackProps;
use geo::Area;

use crate::support::{approx_eq, arc_count};

fn coverage(props: &GearProps) -> Real {
    let profile = props.tooth_profile().unwrap();
    profile.pieces().iter().map(|p| p.end - p.start).sum()
}

/// Tip and root radii implied by the rack extents: rack height y maps to
/// blank radius `pitch_radius - y`.
fn radial_limits(props: &GearProps) -> (Real, Real) {
    let rack = if props.internal { props.rack.internal() } else { props.rack };
    let pts = rack.profile_points();
    let y_top = pts[1].y;
    let y_bot = pts[0].y;
    (props.pitch_radius() - y_top, props.pitch_radius() - y_bot)
}

#[test]
fn default_pinion_renders_a_modest_arc_run() {
    let props = GearProps { teeth: 8, ..GearProps::default() };
    let profile = props.tooth_profile().unwrap();
    assert!(!profile.pieces().is_empty());

    let mut pen = RecordPen::new();
    profile.draw(&mut pen, true);
    // Each biarc renders as a pair of arcs; the handful of single-arc tooth
    // flats is absorbed by the integer division.
    let biarcs = arc_count(pen.commands()) / 2;
    assert!(biarcs >= 10, "suspiciously few biarcs: {biarcs}");
    assert!(biarcs <= 40, "biarc count blew up: {biarcs}");
}

#[test]
fn envelope_covers_the_whole_tooth() {
    for teeth in [8, 14, 30] {
        let props = GearProps { teeth, ..GearProps::default() };
        assert!(
            approx_eq(coverage(&props), 1.0, 1e-9),
            "coverage gap at {teeth} teeth"
        );
    }
}

#[test]
fn pieces_are_ordered_and_disjoint() {
    let props = GearProps::default();
    let profile = props.tooth_profile().unwrap();
    for pair in profile.pieces().windows(2) {
        assert!(pair[0].start < pair[0].end);
        assert!(pair[0].end <= pair[1].start + 1e-12);
    }
}

#[test]
fn radii_stay_between_root_and_tip() {
    let props = GearProps::default();
    let (root, tip) = radial_limits(&props);
    let profile = props.tooth_profile().unwrap();
    for i in 0..=200 {
        let a = -0.5 + (i as Real) / 200.0;
        let r = profile.radius_at(a).expect("envelope gap");
        assert!(r >= root - 1e-3, "r = {r} below root {root} at {a}");
        assert!(r <= tip + 1e-3, "r = {r} above tip {tip} at {a}");
    }
}

#[test]
fn stitches_are_radius_continuous() {
    let props = GearProps::default();
    let profile = props.tooth_profile().unwrap();
    let dad = profile.dad_tooth();
    let pieces = profile.pieces();
    let curves = profile.curves();
    for pair in pieces.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        let a = lo.end;
        let r_lo = curves[lo.curve as usize].get_r((a - lo.rot) * dad);
        let r_hi = curves[hi.curve as usize].get_r((a - hi.rot) * dad);
        assert!(
            (r_lo - r_hi).abs() <= 1e-6 * r_lo.max(1.0),
            "stitch jump at {a}: {r_lo} vs {r_hi}"
        );
    }
}

#[test]
fn shifted_minimum_pinion_renders() {
    // A 6-tooth pinion needs heavy profile shift to stay meshable.
    let props = GearProps {
        teeth: 6,
        rack: RackProps { profile_shift: 40.0, ..RackProps::default() },
        ..GearProps::default()
    };
    let profile = props.tooth_profile().unwrap();
    assert!(!profile.pieces().is_empty());
    assert!(approx_eq(
        profile.pieces().iter().map(|p| p.end - p.start).sum::<Real>(),
        1.0,
        1e-9
    ));
    for piece in profile.pieces() {
        assert!(piece.end - piece.start > 0.0);
    }
}

#[test]
fn square_rack_cuts_flats_at_tip_and_root() {
    let props = GearProps {
        teeth: 10,
        rack: RackProps { pressure_angle: 0.0, ..RackProps::default() },
        ..GearProps::default()
    };
    let (root, tip) = radial_limits(&props);
    let profile = props.tooth_profile().unwrap();

    let mut r_min = Real::INFINITY;
    let mut r_max: Real = 0.0;
    for i in 0..=400 {
        let a = -0.5 + (i as Real) / 400.0;
        // The degenerate envelope must still cover every angle; a gap here
        // would otherwise hide behind the min/max aggregation.
        let r = profile
            .radius_at(a)
            .unwrap_or_else(|| panic!("envelope gap at {a}"));
        r_min = r_min.min(r);
        r_max = r_max.max(r);
    }
    // The constant-radius cuts of the square wave bound the profile.
    assert!(approx_eq(r_min, root, 1e-3), "{r_min} vs root {root}");
    assert!(approx_eq(r_max, tip, 1e-3), "{r_max} vs tip {tip}");
}

#[test]
fn whole_gear_closes_into_a_plausible_polygon() {
    let props = GearProps::default();
    let (root, tip) = radial_limits(&props);
    let profile = props.tooth_profile().unwrap();

    let polygon = profile.to_polygon(0.05);
    let exterior = polygon.exterior();
    assert_eq!(
        exterior.0.first().unwrap(),
        exterior.0.last().unwrap(),
        "outline must close"
    );

    let area = polygon.unsigned_area();
    assert!(area > PI * root * root * 0.9, "area {area} too small");
    assert!(area < PI * tip * tip * 1.1, "area {area} too large");
}

#[test]
fn internal_gear_uses_the_conjugate_rack() {
    // The rack must be asymmetric for the conjugate to differ at all.
    let external = GearProps {
        teeth: 30,
        rack: RackProps {
            top_clr_percent: 10.0,
            bot_clr_percent: 25.0,
            balance_percent: 55.0,
            ..RackProps::default()
        },
        ..GearProps::default()
    };
    let internal = GearProps { internal: true, ..external };
    let pe = external.tooth_profile().unwrap();
    let pi_ = internal.tooth_profile().unwrap();
    // Same coverage, different boundary.
    let differs = (0..=50).any(|i| {
        let a = -0.5 + (i as Real) / 50.0;
        match (pe.radius_at(a), pi_.radius_at(a)) {
            (Some(re), Some(ri)) => (re - ri).abs() > 1e-6,
            _ => false,
        }
    });
    assert!(differs);
}

#[test]
fn validation_rejects_nonsense() {
    let too_few = GearProps { teeth: 3, ..GearProps::default() };
    assert_eq!(
        too_few.validate(),
        Err(ValidationError::FieldLessThan { name: "teeth", min: 4 })
    );

    let no_tol = GearProps { face_tol: 0.0, ..GearProps::default() };
    assert_eq!(no_tol.validate(), Err(ValidationError::Zero { name: "face_tol" }));

    assert!(GearProps::default().validate().is_ok());
}

#[cfg(feature = "dxf-io")]
#[test]
fn gear_exports_to_dxf() {
    use gearpath::io::dxf::DxfPen;
    let props = GearProps { teeth: 8, ..GearProps::default() };
    let profile = props.tooth_profile().unwrap();
    let mut pen = DxfPen::new();
    profile.draw_gear(&mut pen);
    let bytes = pen.finish().unwrap();
    assert!(!bytes.is_empty());
}

#[cfg(feature = "svg-io")]
#[test]
fn gear_exports_to_svg() {
    use gearpath::io::svg::{document, SvgPen};
    use gearpath::pen::BoundsPen;

    let props = GearProps { teeth: 8, ..GearProps::default() };
    let profile = props.tooth_profile().unwrap();

    let mut bounds = BoundsPen::new();
    profile.draw_gear(&mut bounds);
    let (min, max) = bounds.bounds().unwrap();

    let mut pen = SvgPen::new();
    profile.draw_gear(&mut pen);
    let doc = document(pen.into_path(), (min.x, min.y), (max.x - min.x, max.y - min.y));
    let rendered = doc.to_string();
    assert!(rendered.contains("<path"));
}
