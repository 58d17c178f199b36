use crate::ipc::error::{data_err, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::project;

/// Render-request read path: returns the projection the map client binds
/// to. An unknown or empty trade is an empty projection, not an error.
fn handle_map_data(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(trade) = req.params.get("trade").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing trade", None);
    };

    match project::project(conn, trade) {
        Ok(projection) => match serde_json::to_value(&projection) {
            Ok(value) => ok(&req.id, value),
            Err(e) => err(&req.id, "store_unavailable", e.to_string(), None),
        },
        Err(e) => data_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "map.data" => Some(handle_map_data(state, req)),
        _ => None,
    }
}
