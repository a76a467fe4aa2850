use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use darksky::{
    classify, complement_within, intersect_periods, summarize, AltitudeProfile, Body, CivilDay,
    Ephemeris, JulianDate, MeeusEphemeris, Observer, UtcPeriod, WindowKind, UT,
};
use qtty::{Day, Degrees, Minutes, Seconds};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn utc_roundtrip_j2000_is_stable() {
    let datetime = DateTime::from_timestamp(946_728_000, 0).unwrap();
    let jd = JulianDate::from_utc(datetime);
    let back = jd.to_utc().expect("to_utc");
    let delta_ns = back.timestamp_nanos_opt().unwrap() - datetime.timestamp_nanos_opt().unwrap();
    assert!(delta_ns.abs() < 1_000);
}

#[test]
fn ut_applies_delta_t_near_j2000() {
    let ut = darksky::Time::<UT>::new(2_451_545.0);
    let jd: JulianDate = ut.to::<darksky::JD>();
    let offset = (jd.quantity() - ut.quantity()).to::<Day>();
    let offset_s = offset.to::<qtty::Second>();
    assert!((offset_s - Seconds::new(63.83)).abs() < Seconds::new(1.0));
}

#[test]
fn delta_t_matches_the_ut_to_tt_offset() {
    let ut = darksky::UniversalTime::new(2_451_545.0);
    let jd: JulianDate = ut.to::<darksky::JD>();
    let offset_s = (jd.quantity() - ut.quantity()).to::<Day>().to::<qtty::Second>();
    assert!((ut.delta_t() - offset_s).abs() < Seconds::new(1e-3));
}

#[test]
fn moon_free_stretches_inside_dark_sky() {
    let at = |h: u32| Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap();
    let night = UtcPeriod::new(at(0), at(23));
    let sun_low = vec![UtcPeriod::new(at(0), at(5)), UtcPeriod::new(at(19), at(23))];
    let moon_up = vec![UtcPeriod::new(at(3), at(20)), UtcPeriod::new(at(21), at(22))];

    let moon_down = complement_within(night, &moon_up);
    let dark = intersect_periods(&sun_low, &moon_down);

    assert_eq!(
        dark,
        vec![
            UtcPeriod::new(at(0), at(3)),
            UtcPeriod::new(at(20), at(21)),
            UtcPeriod::new(at(22), at(23)),
        ]
    );
}

#[test]
fn denver_winter_week_with_builtin_ephemeris() {
    let observer = Observer::new(39.74, -104.99, 1609.0).unwrap();
    let eph = MeeusEphemeris::default();
    let result = classify(
        date(2024, 1, 8),
        date(2024, 1, 14),
        chrono_tz::America::Denver,
        &observer,
        &eph,
    );

    assert!(result.is_complete());
    assert_eq!(result.len(), 7);
    for (day, windows) in result.iter() {
        let last = windows.last().unwrap();
        assert_eq!(last.kind(), WindowKind::MetaOnly, "{day}");
        let meta = last.metadata();
        // Winter at 40°N: astronomical twilight on both sides every day.
        assert!(meta.twilight_end.is_some() && meta.twilight_start.is_some(), "{day}");
        for window in windows.iter().filter(|w| w.is_dark()) {
            let span = window.span().unwrap();
            assert!(span.start < span.end);
            assert_eq!(window.date(), day);
        }
    }

    // New moon on 2024-01-11: the night of the 10th to the 11th is moonless.
    let rows = summarize(&result);
    let tenth = rows.iter().find(|r| r.date == date(2024, 1, 10)).unwrap();
    assert!(tenth.dusk.is_some());
    assert!(tenth.continues_into_next);
}

#[test]
fn svalbard_midsummer_has_no_dark_window() {
    let observer = Observer::new(78.2, 15.6, 0.0).unwrap();
    let result = classify(
        date(2024, 6, 21),
        date(2024, 6, 21),
        chrono_tz::Arctic::Longyearbyen,
        &observer,
        &MeeusEphemeris::default(),
    );
    let windows = result.get(date(2024, 6, 21)).unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].kind(), WindowKind::MetaOnly);
    assert_eq!(windows[0].metadata().twilight_start, None);
    assert_eq!(windows[0].metadata().twilight_end, None);
}

#[test]
fn twilight_events_sit_on_the_threshold() {
    let observer = Observer::new(-30.24, -70.74, 2200.0).unwrap();
    let eph = MeeusEphemeris::default();
    let day = date(2024, 5, 3);
    let result = classify(day, day, chrono_tz::America::Santiago, &observer, &eph);
    let meta = *result.get(day).unwrap().last().unwrap().metadata();

    let geometric = eph.without_refraction();
    for event in [meta.twilight_end, meta.twilight_start].into_iter().flatten() {
        let sun = geometric.altitude(Body::Sun, &observer, event).unwrap();
        assert!((sun - Degrees::new(-18.0)).abs() < Degrees::new(0.01), "{event}: {sun}");
    }
}

#[test]
fn profile_agrees_with_classification() {
    let observer = Observer::new(40.0, -105.0, 1600.0).unwrap();
    let eph = MeeusEphemeris::default();
    let day = CivilDay::new(date(2024, 1, 11), chrono_tz::America::Denver).unwrap();
    let geometric = MeeusEphemeris::default().without_refraction();
    let profile = AltitudeProfile::sample(&geometric, &observer, &day, Minutes::new(5.0)).unwrap();
    let sampled = profile.dark_periods(Degrees::new(-18.0));

    let result = classify(day.date(), day.date(), chrono_tz::America::Denver, &observer, &eph);
    let classified: Vec<UtcPeriod> = result.windows().filter_map(|w| w.span()).collect();

    assert_eq!(sampled.len(), classified.len());
    for (s, c) in sampled.iter().zip(&classified) {
        assert!((s.start - c.start).abs() <= Duration::minutes(10));
        assert!((s.end - c.end).abs() <= Duration::minutes(10));
    }
}

#[cfg(feature = "serde")]
#[test]
fn result_serializes_by_date_key() {
    let observer = Observer::new(40.0, -105.0, 1600.0).unwrap();
    let day = date(2024, 1, 15);
    let result = classify(day, day, chrono_tz::America::Denver, &observer, &MeeusEphemeris::default());

    let json = serde_json::to_value(&result).unwrap();
    let entries = json["days"]["2024-01-15"].as_array().unwrap();
    let last = entries.last().unwrap();
    assert_eq!(last["kind"], "MetaOnly");
    assert!(last["metadata"]["twilight_end"].is_string());
    assert!(last["metadata"]["moon_altitude_at_day_start"].is_number());
    assert!(json["faults"].as_object().unwrap().is_empty());
}
