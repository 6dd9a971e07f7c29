mod common;

use common::posts;
use rankboard_core::{
    DashboardConfig, DashboardRequest, DataErrorKind, Dataset, FilterSelection, NumberFormat,
    Pipeline,
};

#[test]
fn default_request_picks_first_usable_columns() {
    let view = Pipeline::default()
        .run(&posts(), &DashboardRequest::default())
        .unwrap();

    assert_eq!(view.value_column, "pageviews");
    assert_eq!(view.group_column, "site");
    assert_eq!((view.source_rows, view.filtered_rows), (6, 6));
    assert_eq!(view.summary.total, 4100.0);
    assert_eq!(view.formatted_summary.total, "4,100");
    assert_eq!(view.formatted_summary.mean, "683");
    assert_eq!(view.formatted_summary.max, "1,200");
    assert_eq!(view.formatted_summary.count, "6");
    assert_eq!(view.distinct_groups, 3);

    let labels: Vec<&str> = view.ranking.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["UOL", "R7", "Band"]);
    assert_eq!(view.ranking[0].formatted_total, "2,000");

    assert_eq!(view.chart.len(), 1);
    assert_eq!(view.chart[0].points.len(), 3);

    assert_eq!(view.detail.columns.len(), 5);
    assert_eq!(view.detail.rows.len(), 6);
    assert_eq!(view.detail.rows[0].position, 1);
    assert_eq!(
        view.detail.rows[0].cells,
        ["R7", "Carlos", "Notícias", "1,200", "20/05/2025"]
    );
}

#[test]
fn controls_survive_an_empty_selection() {
    let pipeline = Pipeline::default();
    let ds = posts();
    let req = DashboardRequest {
        filters: FilterSelection::new().allow("site", ["Globo"]),
        ..Default::default()
    };
    let err = pipeline.run(&ds, &req).unwrap_err();
    assert!(err.is_empty_dataset());

    let controls = pipeline.controls(&ds);
    assert_eq!(controls.filter_options.len(), 3);
    assert_eq!(controls.schema.columns().len(), 5);
}

#[test]
fn empty_source_is_reported() {
    let err = Pipeline::default()
        .run(&Dataset::default(), &DashboardRequest::default())
        .unwrap_err();
    assert_eq!(err.kind, DataErrorKind::EmptyDataset);
}

#[test]
fn rejects_columns_of_the_wrong_kind() {
    let pipeline = Pipeline::default();
    let ds = posts();

    let req = DashboardRequest {
        value_column: Some("site".into()),
        ..Default::default()
    };
    let err = pipeline.run(&ds, &req).unwrap_err();
    assert_eq!(err.kind, DataErrorKind::InvalidSpecification);
    assert_eq!(err.column.as_deref(), Some("site"));

    let req = DashboardRequest {
        group_column: Some("pageviews".into()),
        ..Default::default()
    };
    assert_eq!(
        pipeline.run(&ds, &req).unwrap_err().kind,
        DataErrorKind::InvalidSpecification
    );

    let req = DashboardRequest {
        series_column: Some("nope".into()),
        ..Default::default()
    };
    assert_eq!(
        pipeline.run(&ds, &req).unwrap_err().kind,
        DataErrorKind::InvalidSpecification
    );
}

#[test]
fn manager_by_site_chart_and_composite_ranking() {
    let req = DashboardRequest {
        group_column: Some("site".into()),
        subgroup_column: Some("manager".into()),
        chart_group_column: Some("manager".into()),
        series_column: Some("site".into()),
        ..Default::default()
    };
    let view = Pipeline::default().run(&posts(), &req).unwrap();

    assert_eq!(view.ranking[0].label, "UOL / Ana");
    assert_eq!(view.ranking[0].total, 1700.0);
    assert_eq!(view.ranking.len(), 5);

    let names: Vec<&str> = view.chart.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["UOL", "R7", "Band"]);
    // Ana leads the manager axis with 2600 against Carlos' 1500.
    assert_eq!(view.chart[0].points[0].label, "Ana");
}

#[test]
fn date_like_columns_can_group() {
    let req = DashboardRequest {
        group_column: Some("published".into()),
        ..Default::default()
    };
    let view = Pipeline::default().run(&posts(), &req).unwrap();
    assert_eq!(view.distinct_groups, 6);
}

#[test]
fn config_drives_cuts_and_formats() {
    let cfg = DashboardConfig {
        ranking_top_n: 2,
        detail_rows: 3,
        number_format: NumberFormat::continental(0),
        date_pattern: "%Y/%m/%d".into(),
        ..Default::default()
    };
    let view = Pipeline::new(cfg).run(&posts(), &DashboardRequest::default()).unwrap();
    assert_eq!(view.ranking.len(), 2);
    assert_eq!(view.ranking[0].formatted_total, "2.000");
    assert_eq!(view.detail.rows.len(), 3);
    assert_eq!(view.detail.rows[2].cells[4], "2025/05/28");
}

#[test]
fn bad_date_pattern_is_rejected_by_config_and_tolerated_by_run() {
    let err = DashboardConfig::from_yaml_str("date_pattern: \"%Q\"").unwrap_err();
    assert_eq!(err.kind, DataErrorKind::InvalidSpecification);

    let cfg = DashboardConfig {
        date_pattern: "%Q".into(),
        ..Default::default()
    };
    let view = Pipeline::new(cfg).run(&posts(), &DashboardRequest::default()).unwrap();
    assert_eq!(view.detail.rows[0].cells[4], "2025-05-20");
}

#[test]
fn view_serializes_without_the_filtered_rows() {
    let view = Pipeline::default()
        .run(&posts(), &DashboardRequest::default())
        .unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("filtered").is_none());
    assert_eq!(json["ranking"][0]["label"], "UOL");
}
