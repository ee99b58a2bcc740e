use uptime_rater::output::write_report;
use uptime_rater::parser::ingest;

#[test]
fn test_full_pipeline() {
    let log = include_str!("fixtures/sample_log.txt");
    let agg = ingest(log.as_bytes()).expect("Failed to ingest log");
    let rows = agg.render().expect("Failed to render report");

    let mut out = Vec::new();
    write_report(&mut out, &rows).unwrap();

    // Station 0: reports fuse into [0, 100000] covering the whole span.
    // Station 1: a single down report, span only.
    // Station 2: up for 150000 of a 200000 span.
    assert_eq!(String::from_utf8(out).unwrap(), "0 100\n1 0\n2 75\n");
}

#[test]
fn test_full_pipeline_fails_closed_on_bad_report() {
    let log = "\
[Stations]
0 1001

[Charger Availability Reports]
1001 0 50000 maybe
";
    assert!(ingest(log.as_bytes()).is_err());
}
