use std::path::PathBuf;

use serde_json::json;

use crate::export;
use crate::import;
use crate::ipc::error::{data_err, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store;
use crate::validate;

fn handle_trades_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "trades": [] }));
    };

    let trades = match store::list_trades(conn) {
        Ok(v) => v,
        Err(e) => return data_err(&req.id, &e),
    };
    let mut out = Vec::with_capacity(trades.len());
    for trade in trades {
        let state_count = match store::count(conn, &trade) {
            Ok(n) => n,
            Err(e) => return data_err(&req.id, &e),
        };
        out.push(json!({ "trade": trade, "stateCount": state_count }));
    }
    ok(&req.id, json!({ "trades": out }))
}

/// Upload gate and import. Order matters: trade name, rate limit, then
/// the file metadata checks, all before the file itself is opened.
fn handle_trades_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(trade) = req.params.get("trade").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing trade", None);
    };
    let Some(file_path) = req.params.get("filePath").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing filePath", None);
    };
    if let Err(e) = validate::validate_trade_name(trade) {
        return data_err(&req.id, &e);
    }

    let user = req
        .params
        .get("user")
        .and_then(|v| v.as_str())
        .unwrap_or("admin");
    if let Err(e) = state.uploads.check(user) {
        tracing::warn!(user, trade, "upload rate limit hit");
        return data_err(&req.id, &e);
    }

    let file_name = req.params.get("fileName").and_then(|v| v.as_str());
    let file_size = req.params.get("fileSize").and_then(|v| v.as_u64());
    let mime_type = req.params.get("mimeType").and_then(|v| v.as_str());
    if let Err(e) = state.policy.check_upload(file_name, file_size, mime_type) {
        return data_err(&req.id, &e);
    }

    match import::import_csv(conn, &PathBuf::from(file_path), trade) {
        Ok(imported) => ok(&req.id, json!({ "imported": imported, "trade": trade })),
        Err(e) => {
            tracing::warn!(trade, error = %e, "csv import failed");
            data_err(&req.id, &e)
        }
    }
}

fn handle_trades_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(trade) = req.params.get("trade").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing trade", None);
    };

    match export::export_csv(conn, trade) {
        Ok(csv) => ok(&req.id, json!({ "trade": trade, "csv": csv })),
        Err(e) => data_err(&req.id, &e),
    }
}

fn handle_trades_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(trade) = req.params.get("trade").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing trade", None);
    };

    match store::delete_trade(conn, trade) {
        Ok(deleted) => {
            tracing::info!(trade, deleted, "trade data deleted");
            ok(&req.id, json!({ "trade": trade, "deleted": deleted }))
        }
        Err(e) => data_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "trades.list" => Some(handle_trades_list(state, req)),
        "trades.import" => Some(handle_trades_import(state, req)),
        "trades.export" => Some(handle_trades_export(state, req)),
        "trades.delete" => Some(handle_trades_delete(state, req)),
        _ => None,
    }
}
