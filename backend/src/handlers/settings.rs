//! Effective engine settings

use axum::{extract::State, Json};

use crate::models::SettingsResponse;
use crate::AppState;

/// Parameters every calculation starts from before per-request overrides
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        parameters: state.config.engine.clone(),
        inventory_dso: state.config.inventory.dso(),
        inventory_source: state
            .config
            .inventory
            .csv_path
            .as_ref()
            .map(|path| path.display().to_string()),
    })
}
