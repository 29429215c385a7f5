//! End-to-end annotation of the Newcastle to Inverness sortie.
//!
//! Transit from Newcastle to a low-level entry over Montrose, a low-level
//! route through the Highlands ending at the CI05 approach fix, then a short
//! transit block into Inverness.

use lownav_core::spatial::travel_time_secs;
use lownav_core::{
    annotate_route, format_altitude, format_elapsed, plan_transit_profile, segment_route, AnnotatedWaypoint, BoundarySet, LabelOptions,
    LowLevelLeg, PerformanceProfile, Phase, PlanError, Route, Waypoint,
};

fn sortie() -> Route {
    Route::new(vec![
        Waypoint::new("EGNT", 55.038055, -1.689722, 266.0).with_name("Newcastle"),
        Waypoint::new("SAB", 55.907513, -2.206336, 14759.34).with_name("Saint Abbs"),
        Waypoint::new("LLEP", 56.70507, -2.475614, 22000.0).with_name("Montrose"),
        Waypoint::new("WP1", 56.632725, -2.92245, 22000.0).with_name("Forfar"),
        Waypoint::new("WP2", 57.040005, -3.215497, 22000.0).with_name("Crathie"),
        Waypoint::new("WP3", 56.991013, -3.483008, 22000.0).with_name("Beyond Braemar"),
        Waypoint::new("WP4", 56.70752, -4.012328, 22000.0).with_name("Tummel"),
        Waypoint::new("WP5", 56.684898, -4.43118, 18896.31).with_name("Rannoch"),
        Waypoint::new("WP6", 56.747452, -4.466886, 17800.39).with_name("Loch Ericht"),
        Waypoint::new("WP7", 56.93224, -4.247161, 14115.03).with_name("Dalwhinnie"),
        Waypoint::new("WP8", 57.136242, -4.67408, 8946.24).with_name("Fort Augustus"),
        Waypoint::new("CI05", 57.41526, -4.328055, 3330.1).with_remarks("ILS108.5/RW05"),
        Waypoint::new("EGPE", 57.5425, -4.0475, 31.0).with_name("Inverness"),
    ])
    .unwrap()
}

fn profile() -> PerformanceProfile {
    PerformanceProfile::new(6000.0, 6000.0, 360.0, 420.0, 500.0).unwrap()
}

fn single_segment() -> BoundarySet {
    BoundarySet::new(vec![LowLevelLeg { entry: 2, exit: 11 }])
}

fn annotate(boundaries: &BoundarySet) -> Vec<AnnotatedWaypoint> {
    annotate_route(&sortie(), &profile(), boundaries, &LabelOptions::default()).unwrap()
}

fn labels(out: &[AnnotatedWaypoint]) -> Vec<&str> {
    out.iter().map(|wp| wp.label.as_str()).collect()
}

#[test]
fn test_reference_sortie_sequence() {
    let out = annotate(&single_segment());
    assert_eq!(out.len(), 17);

    let phases: Vec<Phase> = out.iter().map(|wp| wp.phase).collect();
    let mut expected = vec![Phase::Climb, Phase::Toc, Phase::TransitCruise, Phase::Tod, Phase::Llep];
    expected.extend([Phase::LowLevel; 9]);
    expected.extend([Phase::Toc, Phase::Tod, Phase::Descent]);
    assert_eq!(phases, expected);

    let synthetic: Vec<usize> = out
        .iter()
        .enumerate()
        .filter(|(_, wp)| wp.is_synthetic())
        .map(|(idx, _)| idx)
        .collect();
    assert_eq!(synthetic, vec![1, 3, 14, 15]);
}

#[test]
fn test_reference_sortie_transit_block() {
    let out = annotate(&single_segment());

    for wp in &out[..4] {
        assert_eq!(wp.flight_level, Some(200));
    }
    assert_eq!(out[4].flight_level, None);

    // Close to 3:20 / 13:58 / 17:18; the 266 ft origin and the 500 ft
    // low-level altitude shorten both the climb and the descent a little.
    let toc = out[1].elapsed_time_from_origin;
    let tod = out[3].elapsed_time_from_origin;
    let llep = out[4].elapsed_time_from_origin;
    assert!((toc - 197.3).abs() < 1.0, "TOC at {toc}");
    assert!((tod - 843.0).abs() < 3.0, "TOD at {tod}");
    assert!((llep - 1038.0).abs() < 1.0, "LLEP at {llep}");

    assert_eq!(out[0].label, "0:00/342/FL200");
    assert_eq!(out[1].label, "3:17/341/FL200/TOC");
    assert_eq!(out[2].label, "9:10/350/FL200");
    assert_eq!(out[4].label, "17:18/254/LLEP");
}

#[test]
fn test_published_times_from_sea_level() {
    // The published 3:20 / 13:58 / 17:18 assume 0 ft at both ends of the block
    let route = sortie();
    let profile = profile();
    let distance = route.distance_between_nm(0, 2);
    let vertical = plan_transit_profile(distance, 0.0, 0.0, &profile, 1).unwrap();
    assert_eq!(vertical.flight_level, 200);

    let speed = profile.transit_airspeed_kts;
    assert_eq!(format_elapsed(travel_time_secs(vertical.climb_nm, speed)), "3:20");
    assert_eq!(format_elapsed(travel_time_secs(vertical.tod_nm(), speed)), "13:58");
    assert_eq!(format_elapsed(travel_time_secs(distance, speed)), "17:18");

    let mut waypoints = route.waypoints().to_vec();
    waypoints[0].altitude_ft = 0.0;
    let from_sea_level = Route::new(waypoints).unwrap();
    let out =
        annotate_route(&from_sea_level, &profile, &single_segment(), &LabelOptions::default())
            .unwrap();
    assert_eq!(out[1].phase, Phase::Toc);
    assert!(out[1].label.starts_with("3:20/"), "{}", out[1].label);
    assert_eq!(out[4].label, "17:18/254/LLEP");
}

#[test]
fn test_reference_sortie_low_level_labels() {
    let out = annotate(&single_segment());

    assert_eq!(out[4].elapsed_time_from_llep, Some(0.0));
    assert_eq!(out[5].label, "2:11/339");
    assert_eq!(out[6].label, "5:56/252");
    assert_eq!(out[13].label, "20:42/050/ILS108.5/RW05");

    // The exit waypoint stays low level and carries no marker of its own
    assert_eq!(out[13].source_index, Some(11));
    assert_eq!(out[13].phase, Phase::LowLevel);
    assert_eq!(out[13].phase.marker(), None);

    for wp in &out[4..=13] {
        assert!(wp.phase.is_low_level());
        assert_eq!(wp.display_altitude_ft, 500.0);
        assert_eq!(format_altitude(wp.display_altitude_ft), "00500");
    }
}

#[test]
fn test_reference_sortie_final_block() {
    let out = annotate(&single_segment());

    for wp in &out[14..] {
        assert_eq!(wp.flight_level, Some(20));
    }
    let labels = labels(&out);
    assert_eq!(labels[14], "20:57/050/FL020/TOC");
    assert_eq!(labels[15], "22:21/050/FL020/TOD");
    assert_eq!(labels[16], "22:41/FL020");

    let destination = &out[16];
    assert_eq!(destination.outbound_bearing, None);
    assert_eq!(destination.display_altitude_ft, 31.0);
    assert_eq!(destination.source_index, Some(12));
}

#[test]
fn test_origin_and_destination_keep_their_altitude() {
    let out = annotate(&single_segment());
    assert_eq!(out[0].display_altitude_ft, 266.0);
    assert_eq!(out[2].display_altitude_ft, 20000.0);
    assert_eq!(out.last().unwrap().display_altitude_ft, 31.0);
}

#[test]
fn test_time_is_monotonic() {
    let out = annotate(&single_segment());
    assert_eq!(out[0].elapsed_time_from_origin, 0.0);
    for pair in out.windows(2) {
        assert!(pair[1].elapsed_time_from_origin > pair[0].elapsed_time_from_origin);
    }
}

#[test]
fn test_bearings_in_range_and_absent_only_at_end() {
    let out = annotate(&single_segment());
    let (last, rest) = out.split_last().unwrap();
    assert_eq!(last.outbound_bearing, None);
    for wp in rest {
        let brg = wp.outbound_bearing.expect("every leg has a bearing");
        assert!(brg < 360);
    }
}

#[test]
fn test_source_order_is_preserved() {
    let out = annotate(&single_segment());
    let indices: Vec<usize> = out.iter().filter_map(|wp| wp.source_index).collect();
    assert_eq!(indices, (0..13).collect::<Vec<_>>());
}

#[test]
fn test_two_low_level_segments() {
    let boundaries = BoundarySet::new(vec![
        LowLevelLeg { entry: 2, exit: 5 },
        LowLevelLeg { entry: 7, exit: 11 },
    ]);
    let out = annotate(&boundaries);
    assert_eq!(out.len(), 19);

    let markers: Vec<(usize, Phase)> = out
        .iter()
        .enumerate()
        .filter(|(_, wp)| wp.phase.marker().is_some())
        .map(|(idx, wp)| (idx, wp.phase))
        .collect();
    assert_eq!(
        markers,
        vec![
            (1, Phase::Toc),
            (3, Phase::Tod),
            (4, Phase::Llep),
            (8, Phase::Toc),
            (10, Phase::Tod),
            (11, Phase::Llep),
            (16, Phase::Toc),
            (17, Phase::Tod),
        ]
    );

    // WP3 to Rannoch is about 38 nm, so the middle block cruises at FL070
    assert_eq!(out[7].waypoint.ident, "WP3");
    assert_eq!(out[7].phase, Phase::LowLevel);
    assert_eq!(out[9].waypoint.ident, "WP4");
    assert_eq!(out[9].flight_level, Some(70));
    assert_eq!(out[9].display_altitude_ft, 7000.0);

    // The low-level clock restarts at the second entry point
    assert_eq!(out[11].waypoint.ident, "WP5");
    assert_eq!(out[11].elapsed_time_from_llep, Some(0.0));
    assert!(out[10].elapsed_time_from_llep.unwrap() > 0.0);

    // and its label continues the clock of the first segment
    let since_first = out[11].elapsed_time_from_origin - out[4].elapsed_time_from_origin;
    assert!(out[11].label.starts_with(&format!("{}/", format_elapsed(since_first))));
    assert!(since_first > out[10].elapsed_time_from_llep.unwrap());
}

#[test]
fn test_each_block_gets_one_toc_and_one_tod() {
    let boundaries = BoundarySet::new(vec![
        LowLevelLeg { entry: 2, exit: 5 },
        LowLevelLeg { entry: 7, exit: 11 },
    ]);
    let out = annotate(&boundaries);
    let toc = out.iter().filter(|wp| wp.phase == Phase::Toc).count();
    let tod = out.iter().filter(|wp| wp.phase == Phase::Tod).count();
    assert_eq!((toc, tod), (3, 3));
}

#[test]
fn test_slow_climb_does_not_fit() {
    // 300 fpm at 360 kts needs nearly 400 nm to reach FL200
    let sluggish = PerformanceProfile::new(300.0, 6000.0, 360.0, 420.0, 500.0).unwrap();
    let err = segment_route(&sortie(), &sluggish, &single_segment()).unwrap_err();
    match err {
        PlanError::ProfileDoesNotFit {
            block,
            available_nm,
            required_nm,
        } => {
            assert_eq!(block, 1);
            assert!((available_nm - 103.8).abs() < 0.1);
            assert!(required_nm > available_nm);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_boundaries_past_the_route_are_rejected() {
    let boundaries = BoundarySet::new(vec![LowLevelLeg { entry: 2, exit: 13 }]);
    let err = segment_route(&sortie(), &profile(), &boundaries).unwrap_err();
    assert!(matches!(err, PlanError::InvalidBoundarySet(_)));
}

#[test]
fn test_reannotating_output_is_stable() {
    let first = annotate(&single_segment());

    // Feed the output back in the way it is written to a plan file
    let reparsed = Route::new(
        first
            .iter()
            .map(|wp| {
                let mut point = wp.waypoint.clone();
                point.altitude_ft = wp.display_altitude_ft;
                point
            })
            .collect(),
    )
    .unwrap();
    let second = annotate_route(
        &reparsed,
        &profile(),
        &BoundarySet::default(),
        &LabelOptions::default(),
    )
    .unwrap();

    assert_eq!(second.len(), first.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.waypoint.latitude, b.waypoint.latitude);
        assert_eq!(a.waypoint.longitude, b.waypoint.longitude);
        assert_eq!(a.display_altitude_ft, b.display_altitude_ft);
        assert_eq!(a.outbound_bearing, b.outbound_bearing);
    }
    assert!(second.iter().all(|wp| !wp.is_synthetic()));
}

#[test]
fn test_annotation_is_deterministic() {
    let a = serde_json::to_string(&annotate(&single_segment())).unwrap();
    let b = serde_json::to_string(&annotate(&single_segment())).unwrap();
    assert_eq!(a, b);
}
