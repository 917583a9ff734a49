use super::*;

#[test]
fn last_tick_rounds_duration_times_twenty() {
    assert_eq!(last_tick_for(1.0).unwrap(), TickIndex(20));
    assert_eq!(last_tick_for(0.0).unwrap(), TickIndex(0));
    assert_eq!(last_tick_for(0.52).unwrap(), TickIndex(10));
    assert_eq!(last_tick_for(0.53).unwrap(), TickIndex(11));
    assert_eq!(last_tick_for(2.5).unwrap(), TickIndex(50));
}

#[test]
fn last_tick_rejects_bad_durations() {
    assert!(last_tick_for(-1.0).is_err());
    assert!(last_tick_for(f64::NAN).is_err());
    assert!(last_tick_for(f64::INFINITY).is_err());
}

#[test]
fn tick_seconds_are_twentieths() {
    assert_eq!(TickIndex(0).seconds(), 0.0);
    assert_eq!(TickIndex(10).seconds(), 0.5);
    assert_eq!(TickIndex(20).seconds(), 1.0);
}

#[test]
fn fmt_num_rounds_and_trims() {
    assert_eq!(fmt_num(1.0), "1");
    assert_eq!(fmt_num(0.5), "0.5");
    assert_eq!(fmt_num(0.1234567), "0.12346");
    assert_eq!(fmt_num(-0.000001), "0");
    assert_eq!(fmt_num(-0.0), "0");
    assert_eq!(fmt_num(-12.25), "-12.25");
    assert_eq!(fmt_num(0.1 + 0.2), "0.3");
}

#[test]
fn resource_path_renders_namespaced() {
    let p = ResourcePath::root("cmdent").child("golem").child("spawn");
    assert_eq!(p.to_string(), "cmdent:golem/spawn");
    assert_eq!(
        p.file_in("data", "functions", "mcfunction"),
        "data/cmdent/functions/golem/spawn.mcfunction"
    );
}

#[test]
fn segment_validation() {
    assert!(is_valid_segment("walk_2"));
    assert!(is_valid_segment("left-arm"));
    assert!(!is_valid_segment(""));
    assert!(!is_valid_segment("Walk"));
    assert!(!is_valid_segment("a/b"));
    assert!(!is_valid_segment(".."));
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
}
