mod common;

use std::fs;

use propflow_core::{
    config::{Config, ConfigManager},
    core::firm_selection::{FirmSelectionStore, SelectionSource},
    core::services::{BankService, SettingsService},
    domain::{Plan, ReturnsScenario},
    storage::{keys, JsonStorage, KeyValueStore},
    utils::paths::PathResolver,
};
use serde_json::Value;

use common::{setup_test_env, test_home};

#[test]
fn committed_selection_is_written_in_browser_layout() {
    let (storage, _config, base) = setup_test_env();
    let mut store = FirmSelectionStore::initialize(storage);
    SettingsService::toggle(&mut store, "apex", Plan::Premium).unwrap();
    SettingsService::save(&mut store).unwrap();

    let raw = fs::read_to_string(PathResolver::local_storage_file_in(&base)).unwrap();
    let entries: Value = serde_json::from_str(&raw).unwrap();
    let firms: Value = serde_json::from_str(entries[keys::SELECTED_FIRMS].as_str().unwrap()).unwrap();
    let apex = firms
        .as_array()
        .unwrap()
        .iter()
        .find(|firm| firm["id"] == "apex")
        .unwrap();
    assert_eq!(apex["isSelected"], Value::Bool(false));
    assert_eq!(apex["description"], "Transactions containing 'Apex'");
}

#[test]
fn corrupt_selection_is_replaced_by_the_catalog() {
    let base = test_home();
    let storage = JsonStorage::new(Some(base.clone())).unwrap();
    storage.set(keys::SELECTED_FIRMS, "{not json").unwrap();

    let store = FirmSelectionStore::initialize(std::sync::Arc::new(storage));
    assert_eq!(store.source(), SelectionSource::RecoveredFromCorruption);
    assert_eq!(store.selected().len(), 5);

    let reopened = JsonStorage::new(Some(base)).unwrap();
    assert_eq!(reopened.get(keys::SELECTED_FIRMS).unwrap(), None);
}

#[test]
fn unreadable_storage_file_starts_empty() {
    let base = test_home();
    fs::write(PathResolver::local_storage_file_in(&base), "garbage").unwrap();

    let storage = JsonStorage::new(Some(base.clone())).unwrap();
    assert_eq!(storage.get(keys::USER_PLAN).unwrap(), None);
    BankService::connect(&storage).unwrap();
    assert!(BankService::is_connected(&JsonStorage::new(Some(base)).unwrap()).unwrap());
}

#[test]
fn config_round_trips_through_disk() {
    let base = test_home();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let mut config = manager.load().unwrap();
    assert_eq!(config, Config::default());

    config.set_value("currency", "eur").unwrap();
    config.set_value("default_scenario", "negative").unwrap();
    manager.save(&config).unwrap();

    let reloaded = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(reloaded.currency, "EUR");
    assert_eq!(reloaded.default_scenario, ReturnsScenario::Negative);
}

#[test]
fn unknown_config_key_is_rejected() {
    let mut config = Config::default();
    assert!(config.set_value("theme", "dark").is_err());
}
