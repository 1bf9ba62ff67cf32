//! End-to-end pipeline tests: snapshot in, JSON views out.

use worldline::{
    AnalysisPolicy, ChangeStrategy, MeasurementSource, MemorySource, RankScope, RawMeasurement,
    ReportEngine, Scalar, Snapshot, SortOrder,
};

fn row(country: &str, metric: &str, year: f64, value: f64) -> RawMeasurement {
    RawMeasurement {
        country_code: country.to_string(),
        country_name: None,
        region: None,
        income_group: None,
        metric_code: metric.to_string(),
        metric_name: None,
        multiplier: None,
        year: Some(Scalar::Number(year)),
        value: Some(Scalar::Number(value)),
    }
}

/// Three subjects measured twice on one metric: A doubles, B halves, C
/// starts from zero. Relative ranking DESC must put A above C above B,
/// with C held at the defined-zero policy value.
#[tokio::test]
async fn relative_ranking_orders_growth_policy_and_decline() {
    let source = MemorySource::new(Snapshot {
        rows: vec![
            row("A", "M", 2000.0, 10.0),
            row("A", "M", 2010.0, 20.0),
            row("B", "M", 2000.0, 10.0),
            row("B", "M", 2010.0, 5.0),
            row("C", "M", 2000.0, 0.0),
            row("C", "M", 2010.0, 5.0),
        ],
        adjacency: Default::default(),
    });

    let snapshot = source.snapshot().await.unwrap();
    let list = ReportEngine::default()
        .metric_leaders(
            &snapshot,
            "M",
            RankScope::Countries,
            SortOrder::Desc,
            ChangeStrategy::Relative,
        )
        .unwrap();

    let countries: Vec<&str> = list
        .data
        .iter()
        .map(|r| r.country.as_deref().unwrap())
        .collect();
    assert_eq!(countries, vec!["A", "C", "B"]);

    assert_eq!(list.data[0].value, 1.0);
    assert_eq!(list.data[1].value, 0.0);
    assert_eq!(list.data[2].value, -0.5);
}

/// Duplicate (country, metric, year) rows are averaged before the
/// change engine sees them, so the ranking reflects the mean.
#[tokio::test]
async fn duplicate_measurements_are_averaged_through_the_pipeline() {
    let source = MemorySource::new(Snapshot {
        rows: vec![
            row("A", "M", 2000.0, 10.0),
            // Two readings for 2010; the series point must be their mean (20).
            row("A", "M", 2010.0, 15.0),
            row("A", "M", 2010.0, 25.0),
        ],
        adjacency: Default::default(),
    });

    let snapshot = source.snapshot().await.unwrap();
    let list = ReportEngine::default()
        .metric_leaders(
            &snapshot,
            "M",
            RankScope::Countries,
            SortOrder::Desc,
            ChangeStrategy::Relative,
        )
        .unwrap();

    assert_eq!(list.data.len(), 1);
    assert_eq!(list.data[0].value, 1.0);
}

/// The serialized ranked list matches the wire contract the frontend
/// consumes.
#[tokio::test]
async fn ranked_list_serializes_to_wire_contract() {
    let source = MemorySource::new(Snapshot {
        rows: vec![row("A", "M", 2000.0, 10.0), row("A", "M", 2010.0, 20.0)],
        adjacency: Default::default(),
    });

    let snapshot = source.snapshot().await.unwrap();
    let list = ReportEngine::default()
        .metric_leaders(
            &snapshot,
            "M",
            RankScope::Countries,
            SortOrder::Desc,
            ChangeStrategy::Relative,
        )
        .unwrap();

    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["order"], "DESC");
    assert_eq!(json["strategy"], "relative");
    assert_eq!(json["data"][0]["country"], "A");
    assert_eq!(json["data"][0]["metric"], "M");
    assert_eq!(json["data"][0]["value"], 1.0);
}

/// The full offline report holds together on a realistic small snapshot:
/// movers, leaders on the top mover, composite ranking and neighborhood
/// alignment all populated from the same rows.
#[tokio::test]
async fn full_report_assembles_all_views() {
    let mut snapshot = Snapshot {
        rows: vec![
            row("ARG", "GDP", 2000.0, 100.0),
            row("ARG", "GDP", 2010.0, 150.0),
            row("BRA", "GDP", 2000.0, 200.0),
            row("BRA", "GDP", 2010.0, 260.0),
            row("CHL", "GDP", 2000.0, 80.0),
            row("CHL", "GDP", 2010.0, 120.0),
            row("ARG", "POP", 2000.0, 37.0),
            row("ARG", "POP", 2010.0, 41.0),
            row("BRA", "POP", 2000.0, 175.0),
            row("BRA", "POP", 2010.0, 196.0),
        ],
        adjacency: Default::default(),
    };
    snapshot.adjacency.add_edge("ARG", "CHL");
    snapshot.adjacency.add_edge("CHL", "ARG");
    snapshot.adjacency.add_edge("ARG", "BRA");
    snapshot.adjacency.add_edge("BRA", "ARG");

    let engine = ReportEngine::new(AnalysisPolicy::default());
    let report = engine
        .full_report(&snapshot, SortOrder::Desc, ChangeStrategy::Relative)
        .unwrap();

    assert_eq!(report.movers.data.len(), 2);
    let leaders = report.leaders.expect("top mover has rankable data");
    assert!(!leaders.data.is_empty());
    assert_eq!(report.top_countries.data.len(), 3);
    assert!(!report.neighborhood.data.is_empty());

    // Neighborhood entries only reference countries with computed scores.
    for entry in report.neighborhood.data.values() {
        assert!(entry.main_country_percentage.is_finite());
        for score in entry.neighboring_countries.values() {
            assert!(score.is_finite());
        }
    }
}

/// Rows that cannot be coerced disappear without failing the request,
/// and a snapshot with nothing usable is a NoData condition rather than
/// a fault.
#[tokio::test]
async fn coercion_failures_degrade_to_no_data() {
    let mut bad = row("A", "M", 2000.0, 0.0);
    bad.value = Some(Scalar::Text("not available".to_string()));
    let mut bad2 = row("A", "M", 2010.0, 0.0);
    bad2.year = None;

    let source = MemorySource::new(Snapshot {
        rows: vec![bad, bad2],
        adjacency: Default::default(),
    });

    let snapshot = source.snapshot().await.unwrap();
    let err = ReportEngine::default()
        .metric_movers(&snapshot, SortOrder::Desc)
        .unwrap_err();

    assert!(err.is_client_error());
}
