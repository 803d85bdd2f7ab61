//! End-to-end scan scenarios over real temporary source trees

use bomscan::bomtool::{Detector, DetectorId, DetectorRegistry, Extraction, ToolType};
use bomscan::config::ScanConfig;
use bomscan::evaluate::Outcome;
use bomscan::graph::{ExternalId, Forge};
use bomscan::scan::{ScanOrchestrator, StopSignal};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A polyglot tree: npm at the root, cargo nested, a go module inside an
/// excluded directory, and an npm project buried below node_modules.
fn polyglot_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let base = dir.path();

    write(
        &base.join("package.json"),
        r#"{"name": "webapp", "version": "1.0.0", "dependencies": {"express": "4.18.2"}}"#,
    );
    write(
        &base.join("services/worker/Cargo.toml"),
        "[package]\nname = \"worker\"\nversion = \"0.2.0\"\n\n[dependencies]\nserde = \"1.0\"\n",
    );
    write(
        &base.join("node_modules/dep/package.json"),
        r#"{"name": "dep", "version": "0.0.1"}"#,
    );
    write(
        &base.join("vendor/tool/go.mod"),
        "module example.com/tool\n\nrequire github.com/pkg/errors v0.9.1\n",
    );
    dir
}

fn config_for(tree: &TempDir, output: &TempDir) -> ScanConfig {
    let mut config = ScanConfig::new(tree.path().to_path_buf());
    config.output_directory = output.path().to_path_buf();
    config.project_name = "acme".to_string();
    config.project_version = Some("1.0".to_string());
    config
}

#[test]
fn per_location_mode_writes_one_document_per_code_location() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let orchestrator = ScanOrchestrator::with_defaults(config_for(&tree, &output));

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    // node_modules and vendor are excluded by default, so only the npm
    // root and the nested cargo project produce code locations
    assert_eq!(outcome.code_locations.len(), 2);
    assert_eq!(outcome.documents.len(), 2);
    for document in &outcome.documents {
        assert!(document.is_file());
    }

    let tool_types: Vec<ToolType> = outcome
        .code_locations
        .iter()
        .map(|l| l.tool_type)
        .collect();
    assert!(tool_types.contains(&ToolType::Npm));
    assert!(tool_types.contains(&ToolType::Cargo));
}

#[test]
fn aggregate_mode_writes_exactly_one_document() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let mut config = config_for(&tree, &output);
    config.aggregate_name = Some("acme everything".to_string());
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    assert_eq!(outcome.code_locations.len(), 2);
    assert_eq!(outcome.documents.len(), 1);
    assert!(outcome.documents[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("acme_everything"));

    let body = fs::read_to_string(&outcome.documents[0]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    // one wrapper root per merged code location
    assert_eq!(value["graph"]["roots"].as_array().unwrap().len(), 2);
}

#[test]
fn rerun_overwrites_previous_documents() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let mut config = config_for(&tree, &output);
    config.aggregate_name = Some("everything".to_string());

    let first = ScanOrchestrator::with_defaults(config.clone())
        .run(&StopSignal::new())
        .unwrap();
    fs::write(&first.documents[0], "stale content").unwrap();

    let second = ScanOrchestrator::with_defaults(config)
        .run(&StopSignal::new())
        .unwrap();
    assert_eq!(first.documents, second.documents);
    let body = fs::read_to_string(&second.documents[0]).unwrap();
    assert!(!body.contains("stale content"));
}

#[test]
fn custom_exclusions_prune_matching_subtrees() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let mut config = config_for(&tree, &output);
    config.excluded_directories.push("services".to_string());
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    assert!(outcome
        .code_locations
        .iter()
        .all(|l| l.tool_type != ToolType::Cargo));
}

#[test]
fn max_depth_bounds_the_search() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let mut config = config_for(&tree, &output);
    config.max_depth = 1;
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    // only the root-level npm project is within depth 1
    assert_eq!(outcome.code_locations.len(), 1);
    assert_eq!(outcome.code_locations[0].tool_type, ToolType::Npm);
}

#[test]
fn yarn_demand_on_npm_gates_extraction() {
    let dir = TempDir::new().unwrap();
    // yarn.lock without package.json: applies, but its demand is unmet
    write(
        &dir.path().join("yarn.lock"),
        "lodash@^4.17.21:\n  version \"4.17.21\"\n",
    );
    let output = TempDir::new().unwrap();
    let mut config = ScanConfig::new(dir.path().to_path_buf());
    config.output_directory = output.path().to_path_buf();
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    let yarn = outcome
        .evaluations
        .iter()
        .find(|e| e.tool_type == ToolType::Yarn)
        .expect("yarn applicability recorded");
    assert!(!yarn.demands_met);
    assert_eq!(yarn.outcome, Outcome::NotRun);
    assert!(outcome.code_locations.is_empty());
}

#[test]
fn yarn_extracts_when_npm_applies_alongside() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("package.json"), r#"{"name": "app"}"#);
    write(
        &dir.path().join("yarn.lock"),
        "lodash@^4.17.21:\n  version \"4.17.21\"\n",
    );
    let output = TempDir::new().unwrap();
    let mut config = ScanConfig::new(dir.path().to_path_buf());
    config.output_directory = output.path().to_path_buf();
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    let yarn = outcome
        .evaluations
        .iter()
        .find(|e| e.tool_type == ToolType::Yarn)
        .unwrap();
    assert_eq!(yarn.outcome, Outcome::Success);
    assert_eq!(outcome.code_locations.len(), 2);
}

#[test]
fn malformed_manifest_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("broken/package.json"), "{ not json");
    write(
        &dir.path().join("healthy/package.json"),
        r#"{"name": "ok", "version": "1.0.0"}"#,
    );
    let output = TempDir::new().unwrap();
    let mut config = ScanConfig::new(dir.path().to_path_buf());
    config.output_directory = output.path().to_path_buf();
    let orchestrator = ScanOrchestrator::with_defaults(config);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();

    let outcomes: Vec<Outcome> = outcome.evaluations.iter().map(|e| e.outcome).collect();
    assert!(outcomes.contains(&Outcome::Failure));
    assert!(outcomes.contains(&Outcome::Success));
    assert_eq!(outcome.code_locations.len(), 1);
    assert_eq!(outcome.documents.len(), 1);
}

#[test]
fn aggregate_wrappers_stay_unique_for_identical_project_ids() {
    struct FixedIdDetector;
    impl Detector for FixedIdDetector {
        fn id(&self) -> DetectorId {
            DetectorId("fixed-id")
        }
        fn tool_type(&self) -> ToolType {
            ToolType::Npm
        }
        fn applies(&self, directory: &Path) -> bool {
            directory.join("marker").is_file()
        }
        fn extract(&self, directory: &Path) -> Extraction {
            Extraction::success(vec![bomscan::bomtool::CodeLocation {
                source_path: directory.to_path_buf(),
                tool_type: ToolType::Npm,
                external_id: ExternalId::name_version(Forge::NPMJS, "same", Some("1.0.0")),
                graph: bomscan::graph::DependencyGraph::new(),
            }])
        }
    }

    let dir = TempDir::new().unwrap();
    write(&dir.path().join("a/marker"), "");
    write(&dir.path().join("b/marker"), "");
    let output = TempDir::new().unwrap();
    let mut config = ScanConfig::new(dir.path().to_path_buf());
    config.output_directory = output.path().to_path_buf();
    config.aggregate_name = Some("merged".to_string());

    let mut registry = DetectorRegistry::new();
    registry.register(Arc::new(FixedIdDetector));
    let orchestrator = ScanOrchestrator::new(config, registry);

    let outcome = orchestrator.run(&StopSignal::new()).unwrap();
    assert_eq!(outcome.code_locations.len(), 2);
    assert_eq!(outcome.documents.len(), 1);

    let body = fs::read_to_string(&outcome.documents[0]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    let roots = value["graph"]["roots"].as_array().unwrap();
    // both code locations share an original id but keep distinct wrappers
    assert_eq!(roots.len(), 2);
}

#[test]
fn stopped_run_returns_partial_results_without_error() {
    let tree = polyglot_tree();
    let output = TempDir::new().unwrap();
    let orchestrator = ScanOrchestrator::with_defaults(config_for(&tree, &output));

    let stop = StopSignal::new();
    stop.stop();
    let outcome = orchestrator.run(&stop).unwrap();

    assert!(outcome.stopped);
    assert!(outcome.evaluations.is_empty());
    assert!(outcome.documents.is_empty());
}
