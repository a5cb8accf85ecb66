use std::path::PathBuf;

use ecobalance::{
    catalogue::{Catalogue, CatalogueLoader},
    config::AppConfig,
    dashboard::{Dashboard, RunRequest},
    insights::Priority,
    report::ReportWriter,
    DensityIndicator,
};

fn catalogue_loader() -> CatalogueLoader {
    CatalogueLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn catalogue_path() -> PathBuf {
    PathBuf::from("data/reserves.yaml")
}

fn catalogue() -> Catalogue {
    catalogue_loader()
        .load(catalogue_path())
        .expect("catalogue parses")
}

#[test]
fn catalogue_loader_reads_fixture() {
    let catalogue = catalogue();
    assert_eq!(catalogue.len(), 13);
    assert_eq!(catalogue.default_reserve().unwrap().name, "Bandipur");
    let undetermined: Vec<&str> = catalogue
        .reserves()
        .iter()
        .filter(|r| r.tiger_density == DensityIndicator::Undetermined)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(undetermined, vec!["Kawal", "Sathyamangalam"]);
}

#[test]
fn every_reserve_is_a_valid_profile() {
    for reserve in catalogue().reserves() {
        let profile = reserve.profile();
        assert!(profile.validate().is_ok(), "{} rejected", reserve.name);
        assert!(profile.core_area < profile.total_area, "{}", reserve.name);
    }
}

#[test]
fn shipped_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/ecobalance.yaml");
    let config = AppConfig::load_or_default(path).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.coefficients, defaults.coefficients);
    assert_eq!(config.horizon, defaults.horizon);
    assert_eq!(config.catalogue_path, defaults.catalogue_path);
    assert_eq!(config.report_dir, defaults.report_dir);
}

#[test]
fn bandipur_dashboard() {
    let catalogue = catalogue();
    let dashboard = Dashboard::for_reserve(catalogue.find("Bandipur").unwrap());
    assert_eq!(dashboard.polygon.len(), 5);
    assert!(dashboard
        .insights
        .insights
        .iter()
        .any(|text| text.starts_with("Large reserve area")));
    // Notes start with a capitalised "Contiguous", which the corridor rule ignores.
    assert!(!dashboard
        .recommendations
        .iter()
        .any(|r| r.text.contains("corridor")));
    assert_eq!(
        dashboard.recommendations.last().map(|r| r.priority),
        Some(Priority::Low)
    );
}

#[test]
fn nagarhole_gets_corridor_recommendation() {
    let catalogue = catalogue();
    let dashboard = Dashboard::for_reserve(catalogue.find("Nagarhole").unwrap());
    assert!(dashboard
        .recommendations
        .iter()
        .any(|r| r.priority == Priority::Medium && r.text.contains("corridor")));
}

#[test]
fn every_reserve_runs_without_noise() {
    let catalogue = catalogue();
    let config = AppConfig::default();
    let request = RunRequest {
        seed: None,
        horizon: config.horizon,
        noise: false,
    };
    for reserve in catalogue.reserves() {
        let report = request.execute(reserve, &config.coefficients).unwrap();
        assert_eq!(report.samples.len(), 100);
        assert_eq!(report.seed, None);
        assert!(!report.noise);
        let again = request.execute(reserve, &config.coefficients).unwrap();
        assert_eq!(report.samples, again.samples);
    }
}

#[test]
fn seeded_request_is_order_independent() {
    let catalogue = catalogue();
    let config = AppConfig::default();
    let request = RunRequest {
        seed: Some(2024),
        horizon: 48,
        noise: true,
    };
    let kali = catalogue.find("Kali").unwrap();
    let periyar = catalogue.find("Periyar").unwrap();

    let first = request.execute(kali, &config.coefficients).unwrap();
    request.execute(periyar, &config.coefficients).unwrap();
    let second = request.execute(kali, &config.coefficients).unwrap();

    assert_eq!(first.seed, Some(2024));
    assert_eq!(first.samples, second.samples);
}

#[test]
fn simulation_report_is_written() {
    let catalogue = catalogue();
    let config = AppConfig::default();
    let temp_dir = tempfile::tempdir().unwrap();
    let request = RunRequest {
        seed: Some(1),
        horizon: 24,
        noise: true,
    };
    let report = request
        .execute(catalogue.find("Nagarjunsagar-Srisailam").unwrap(), &config.coefficients)
        .unwrap();
    let path = ReportWriter::new(temp_dir.path().join("reports"))
        .write(&report)
        .unwrap();
    assert!(
        path.exists(),
        "expected report {} to exist",
        path.display()
    );
    assert_eq!(
        path.parent().unwrap().file_name().unwrap(),
        "nagarjunsagar-srisailam"
    );
    let data = std::fs::read_to_string(path).unwrap();
    assert!(data.contains("\"horizon\": 24"));
}
