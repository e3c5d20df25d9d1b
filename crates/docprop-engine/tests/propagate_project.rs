//! End-to-end propagation over the sample dbt project in `tests/fixtures`

use docprop_core::{ColumnIdentity, Config};
use docprop_dbt::{Catalog, Manifest};
use docprop_engine::{
    analyze_project, best_columns_to_be_documented, propagate_project, Analysis, RecordingReporter,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

const MANIFEST: &str = include_str!("fixtures/dbt_sample_project/manifest.json");
const CATALOG: &str = include_str!("fixtures/dbt_sample_project/catalog.json");

const USER_NAME: &str = "Name column of the user table in the source. \
    [propagated from [source.dbt_sample_project.raw.user](/#!/source/source.dbt_sample_project.raw.user)]";

const CITY_NAME: &str = "Name column of the city table in the source. \
    [propagated from [source.dbt_sample_project.raw.city](/#!/source/source.dbt_sample_project.raw.city)]";

fn load() -> (Manifest, Catalog) {
    (
        Manifest::from_str(MANIFEST).unwrap(),
        Catalog::from_str(CATALOG).unwrap(),
    )
}

fn propagated() -> (Manifest, Analysis, RecordingReporter) {
    let (mut manifest, catalog) = load();
    let mut reporter = RecordingReporter::new();

    let (analysis, _) = propagate_project(&mut manifest, &catalog, &Config::default(), &mut reporter).unwrap();

    (manifest, analysis, reporter)
}

fn model_description(manifest: &Manifest, model: &str, column: &str) -> String {
    let node_id = format!("model.dbt_sample_project.{}", model);
    manifest.find_column(&node_id, column).unwrap().description.clone()
}

#[test]
fn propagation_one_level() {
    let (manifest, _, _) = propagated();

    assert_eq!(model_description(&manifest, "stg_user", "name"), USER_NAME);
}

#[test]
fn propagation_two_levels_credits_the_source() {
    let (manifest, _, _) = propagated();

    assert_eq!(model_description(&manifest, "mart_user", "name"), USER_NAME);
}

#[test]
fn ignored_columns_stay_empty() {
    let (manifest, _, reporter) = propagated();

    assert_eq!(model_description(&manifest, "stg_user", "id"), "");
    assert_eq!(
        reporter.ignored_columns(),
        vec![
            &ColumnIdentity::new("model.dbt_sample_project.stg_user", "id"),
            &ColumnIdentity::new("model.dbt_sample_project.mart_user", "id"),
            &ColumnIdentity::new("model.dbt_sample_project.mart_user_and_city", "id"),
        ]
    );
}

#[test]
fn alias_inherits_from_original_name() {
    let (manifest, _, _) = propagated();

    let original = manifest
        .find_column("source.dbt_sample_project.raw.user", "height")
        .unwrap()
        .description
        .clone();

    assert_eq!(
        model_description(&manifest, "stg_user", "height_cm"),
        format!(
            "{} [propagated from [source.dbt_sample_project.raw.user](/#!/source/source.dbt_sample_project.raw.user)]",
            original
        )
    );
}

#[test]
fn two_parents_on_different_levels() {
    let (manifest, _, _) = propagated();

    assert_eq!(
        model_description(&manifest, "mart_user_and_city", "name"),
        format!("{}\n\n{}", CITY_NAME, USER_NAME)
    );
}

#[test]
fn inserted_columns_are_tagged_and_existing_ones_keep_their_tags() {
    let (mut manifest, catalog) = load();
    let (_, records) =
        propagate_project(&mut manifest, &catalog, &Config::default(), &mut RecordingReporter::new()).unwrap();

    let summary: Vec<(&str, bool)> = records
        .iter()
        .map(|record| (record.node_id.as_str(), record.inserted))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("model.dbt_sample_project.stg_user", true),
            ("model.dbt_sample_project.stg_user", false),
            ("model.dbt_sample_project.mart_user", true),
            ("model.dbt_sample_project.mart_user_and_city", false),
        ]
    );

    let stg_name = manifest.find_column("model.dbt_sample_project.stg_user", "name").unwrap();
    assert_eq!(stg_name.tags, Some(vec!["inherited-documentation".to_string()]));

    let city_name = manifest
        .find_column("model.dbt_sample_project.mart_user_and_city", "name")
        .unwrap();
    assert_eq!(city_name.tags, Some(vec!["pii".to_string()]));
}

#[test]
fn existing_entry_matches_across_non_ascii_case() {
    let mut manifest = Manifest::from_str(
        r#"{
            "nodes": {
                "model.p.stg_street": {
                    "unique_id": "model.p.stg_street",
                    "depends_on": {"nodes": ["source.p.raw.street"]},
                    "columns": {"STRASSE_Ä": {"name": "STRASSE_Ä", "description": ""}}
                }
            },
            "sources": {
                "source.p.raw.street": {
                    "unique_id": "source.p.raw.street",
                    "columns": {"strasse_ä": {"name": "strasse_ä", "description": "Street name"}}
                }
            }
        }"#,
    )
    .unwrap();
    let catalog = Catalog::from_str(
        r#"{
            "nodes": {"model.p.stg_street": {"columns": {"STRASSE_Ä": {"name": "STRASSE_Ä"}}}},
            "sources": {"source.p.raw.street": {"columns": {"STRASSE_Ä": {"name": "STRASSE_Ä"}}}}
        }"#,
    )
    .unwrap();

    let (_, records) =
        propagate_project(&mut manifest, &catalog, &Config::default(), &mut RecordingReporter::new()).unwrap();

    assert_eq!(records.len(), 1);
    assert!(!records[0].inserted);

    let columns = &manifest.nodes["model.p.stg_street"].columns;
    assert_eq!(columns.keys().collect::<Vec<_>>(), vec!["STRASSE_Ä"]);
    assert_eq!(
        columns["STRASSE_Ä"].description,
        "Street name [propagated from [source.p.raw.street](/#!/source/source.p.raw.street)]"
    );
}

#[test]
fn unknown_keys_survive_propagation() {
    let (manifest, _, _) = propagated();
    let json: Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

    assert_eq!(json["metadata"]["project_id"], "5d9f7b1c2e");
    assert_eq!(json["parent_map"]["model.dbt_sample_project.mart_user"][0], "model.dbt_sample_project.stg_user");

    let stg_user = &json["nodes"]["model.dbt_sample_project.stg_user"];
    assert_eq!(stg_user["config"]["materialized"], "view");
    assert_eq!(stg_user["depends_on"]["macros"], Value::Array(vec![]));
    assert_eq!(stg_user["columns"]["height_cm"]["meta"]["original_name"], "height");
    assert_eq!(stg_user["columns"]["height_cm"]["data_type"], Value::Null);
}

#[test]
fn second_run_changes_nothing() {
    let (manifest, _, _) = propagated();
    let first = manifest.to_json().unwrap();

    let mut reloaded = Manifest::from_str(&first).unwrap();
    let catalog = Catalog::from_str(CATALOG).unwrap();
    let (analysis, records) =
        propagate_project(&mut reloaded, &catalog, &Config::default(), &mut RecordingReporter::new()).unwrap();

    assert!(analysis.propagations.is_empty());
    assert!(records.is_empty());
    assert_eq!(reloaded.to_json().unwrap(), first);
}

#[test]
fn analysis_does_not_touch_the_manifest() {
    let (manifest, catalog) = load();
    let before = manifest.to_json().unwrap();

    let analysis = analyze_project(&manifest, &catalog, &Config::default(), &mut RecordingReporter::new()).unwrap();

    assert_eq!(analysis.propagations.len(), 4);
    assert_eq!(manifest.to_json().unwrap(), before);
}

#[test]
fn lineage_links_are_symmetric() {
    let (_, analysis, _) = propagated();
    let registry = &analysis.registry;

    for (index, column) in registry.iter() {
        for upstream in column.upstream_matches() {
            assert!(registry[upstream].downstream_matches().any(|d| d == index), "{}", column);
        }
        for downstream in column.downstream_matches() {
            assert!(registry[downstream].upstream_matches().any(|u| u == index), "{}", column);
        }
    }
}

#[test]
fn impact_report() {
    let (_, analysis, _) = propagated();

    let mut reporter = RecordingReporter::new();
    analysis.report(25, &mut reporter);

    assert_eq!(
        reporter.lines(),
        vec![
            "Total columns: 15",
            "With docs: 5 (33.3%)",
            "Without docs: 10 (66.7%)",
            "Columns with documentation propagated: 7",
            "Can propagate documentation if documented: 1",
            "=> Top 25:",
            "[source] raw.user.city_id (2) => [[model] stg_user.city_id, [model] mart_user.city_id]",
        ]
    );
}

#[test]
fn ranking_is_deterministic() {
    let rankings: Vec<Vec<String>> = (0..3)
        .map(|_| {
            let (_, analysis, _) = propagated();
            best_columns_to_be_documented(&analysis.registry)
                .iter()
                .map(|potential| analysis.registry[potential.parent].to_string())
                .collect()
        })
        .collect();

    assert_eq!(rankings[0], rankings[1]);
    assert_eq!(rankings[1], rankings[2]);
}

#[test]
fn json_report_lists_propagations() {
    let (mut manifest, catalog) = load();
    let (analysis, records) =
        propagate_project(&mut manifest, &catalog, &Config::default(), &mut RecordingReporter::new()).unwrap();

    let report = analysis.to_report(25, records);

    assert_eq!(report.summary.total_columns, 15);
    assert_eq!(report.summary.can_receive_propagation, 7);
    assert_eq!(report.propagated.len(), 4);
    assert_eq!(report.best_columns[0].column, "city_id");
    assert_eq!(report.best_columns[0].undocumented_descendants.len(), 2);
}
