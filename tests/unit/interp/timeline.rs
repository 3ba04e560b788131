use super::*;
use crate::data::record::SalesRecord;

fn table(rows: &[(Year, &str, f64)]) -> SalesTable {
    SalesTable::new(
        rows.iter()
            .map(|&(y, c, s)| SalesRecord::new(y, c, s))
            .collect(),
    )
    .unwrap()
}

#[test]
fn three_years_ten_steps_gives_twenty_frames() {
    let t = table(&[
        (2000, "A", 1.0),
        (2001, "A", 2.0),
        (2002, "A", 3.0),
        (2002, "B", 9.0),
    ]);
    let tl = build_timeline(&t, 10).unwrap();
    assert_eq!(tl.len_frames(), 20);
    assert_eq!(tl.first_year(), 2000);
    assert_eq!(tl.last_year(), 2002);
    assert_eq!(tl.steps_per_year(), 10);
}

#[test]
fn pairs_are_chronological_and_end_year_is_not_duplicated() {
    let t = table(&[
        (2002, "A", 30.0),
        (2000, "A", 10.0),
        (2001, "A", 20.0),
    ]);
    let tl = build_timeline(&t, 2).unwrap();

    let spans: Vec<((Year, Year), u32)> = tl.frames().iter().map(|f| (f.span, f.step)).collect();
    assert_eq!(
        spans,
        vec![
            ((2000, 2001), 0),
            ((2000, 2001), 1),
            ((2001, 2002), 0),
            ((2001, 2002), 1),
        ]
    );

    let a: Vec<f64> = tl
        .frames()
        .iter()
        .map(|f| f.frame.get("A").unwrap())
        .collect();
    assert_eq!(a, vec![10.0, 15.0, 20.0, 25.0]);
}

#[test]
fn end_to_end_two_step_scenario() {
    let t = table(&[
        (2000, "A", 100.0),
        (2000, "B", 50.0),
        (2001, "A", 80.0),
        (2001, "B", 90.0),
    ]);
    let tl = build_timeline(&t, 2).unwrap();
    assert_eq!(tl.len_frames(), 2);

    let f1 = &tl.get(FrameIndex(1)).unwrap().frame;
    assert_eq!(f1.entries()[0].car, "A");
    assert_eq!(f1.entries()[0].sales, 90.0);
    assert_eq!(f1.entries()[1].car, "B");
    assert_eq!(f1.entries()[1].sales, 70.0);
    assert!(tl.get(FrameIndex(2)).is_none());
}

#[test]
fn rejects_single_year_empty_table_and_zero_steps() {
    assert!(build_timeline(&table(&[(2000, "A", 1.0)]), 10).is_err());
    assert!(build_timeline(&table(&[]), 10).is_err());
    assert!(build_timeline(&table(&[(2000, "A", 1.0), (2001, "A", 2.0)]), 0).is_err());
}

#[test]
fn current_year_truncates_fractional_progress() {
    assert_eq!(current_year(2000, 2002, FrameIndex(0), 20), 2000);
    assert_eq!(current_year(2000, 2002, FrameIndex(9), 20), 2000);
    assert_eq!(current_year(2000, 2002, FrameIndex(10), 20), 2001);
    assert_eq!(current_year(2000, 2002, FrameIndex(15), 20), 2001);
    assert_eq!(current_year(2000, 2002, FrameIndex(19), 20), 2001);
    assert_eq!(current_year(2000, 2024, FrameIndex(0), 0), 2000);
}

#[test]
fn label_year_uses_timeline_bounds() {
    let t = table(&[(2000, "A", 1.0), (2001, "A", 2.0), (2002, "A", 3.0)]);
    let tl = build_timeline(&t, 10).unwrap();
    assert_eq!(tl.label_year(FrameIndex(0)), 2000);
    assert_eq!(tl.label_year(FrameIndex(15)), 2001);
}

#[test]
fn current_year_handles_extreme_year_spans() {
    let (first, last) = (-2_000_000_000, 2_000_000_000);
    assert_eq!(current_year(first, last, FrameIndex(0), 20), first);
    assert_eq!(current_year(first, last, FrameIndex(5), 20), -1_000_000_000);
    assert_eq!(current_year(first, last, FrameIndex(10), 20), 0);
}
