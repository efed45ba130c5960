#![allow(dead_code)]

use std::sync::Arc;

use car_management_be::controller::AppState;
use car_management_be::model::Car;
use car_management_be::store::{CarStore, MemoryCarStore};
use car_management_be::view_models::CarsCreateUpdateViewModel;

/// A fresh, isolated database for one test.
pub fn test_db() -> Arc<MemoryCarStore> {
    Arc::new(MemoryCarStore::new())
}

pub fn app_state(store: Arc<MemoryCarStore>) -> AppState {
    AppState { store }
}

pub async fn all_cars(store: &MemoryCarStore) -> Vec<Car> {
    store.begin().await.unwrap().find_all().await.unwrap()
}

pub fn valid_vm() -> CarsCreateUpdateViewModel {
    CarsCreateUpdateViewModel {
        name: Some("BMW".to_string()),
        model: Some("M5".to_string()),
        engine: Some("V8".to_string()),
        color: Some("Black".to_string()),
        tire_count: Some("4".to_string()),
        ..CarsCreateUpdateViewModel::default()
    }
}
