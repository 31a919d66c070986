// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 校验上下限的读取与覆写，以及对 API 校验的影响
// ==========================================


use indirect_costs::api::{ApiError, CreatePlantInput};
use indirect_costs::app::AppState;
use indirect_costs::config::{config_keys, ConfigManager, ValidationLimits};
use indirect_costs::editor::validate_new_operation_name;
use test_helpers::create_test_db;

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_defaults_keep_server_and_client_limits_separate() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).unwrap();

    let limits = manager.get_validation_limits().unwrap();
    assert_eq!(limits, ValidationLimits::default());
    assert_eq!(limits.operation_name_max_len, 100);
    assert_eq!(limits.operation_name_client_max_len, 255);
}

#[test]
fn test_override_applies_to_new_app_state() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let manager = ConfigManager::new(&db_path).unwrap();
        manager
            .set_config_value(config_keys::PLANT_CODE_MAX_LEN, "3")
            .unwrap();
        manager
            .set_config_value(config_keys::OPERATION_NAME_CLIENT_MIN_LEN, "4")
            .unwrap();
    }

    let state = AppState::new(db_path).unwrap();
    assert_eq!(state.limits.plant_code_max_len, 3);

    let result = state.plant_api.create_plant(CreatePlantInput {
        name: "Planta".to_string(),
        code: "ABCD".to_string(),
        description: None,
    });
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));

    assert!(validate_new_operation_name("Cor", &state.limits).is_err());
    assert!(validate_new_operation_name("Corte", &state.limits).is_ok());

    let configs = state.config_manager.list_configs().unwrap();
    assert_eq!(configs.len(), 2);
}
