//! RPC method handler for the pinboard JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches synchronous board and settings calls through
//! the `App` struct; `handle_fetch_metadata` serves the async metadata
//! endpoint and reports an HTTP-style status alongside its body.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::pinboard_store::PinboardStoreTrait;
use crate::services::metadata_extractor::{suggest_https, MetadataFetcher};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::category::CategoryUpdate;
use crate::types::service::{NewService, ServiceUpdate};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn string_list_param(params: &Value, key: &str) -> Result<Vec<String>, String> {
    let value = params.get(key).cloned().ok_or_else(|| format!("missing {}", key))?;
    serde_json::from_value(value).map_err(|e| format!("invalid {}: {}", key, e))
}

/// `hue`: absent leaves it alone, null clears it, otherwise a number in 0..=360.
fn hue_param(params: &Value) -> Result<Option<Option<f64>>, String> {
    match params.get("hue") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(v) => match v.as_f64() {
            Some(hue) if (0.0..=360.0).contains(&hue) => Ok(Some(Some(hue))),
            _ => Err(format!("invalid hue: {}", v)),
        },
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Board ───
        "board.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.pinboard.data())
        }
        "board.set_title" => {
            let title = str_param(params, "title")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard.mutate(|s| s.set_title(title));
            Ok(json!({"ok": true}))
        }

        // ─── Services ───
        "service.add" => {
            let service: NewService =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid service: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.pinboard.add_service_checked(service).map_err(|e| e.to_string())?;
            let service = a.pinboard.store().get_service(&id).ok_or("service vanished")?;
            to_json(service)
        }
        "service.update" => {
            let id = str_param(params, "id")?;
            let updates = params.get("updates").cloned().ok_or("missing updates")?;
            let update: ServiceUpdate =
                serde_json::from_value(updates).map_err(|e| format!("invalid updates: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard.update_service(id, update).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "availableFlags": a.pinboard.data().available_flags}))
        }
        "service.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard
                .try_mutate(|s| s.delete_service(id))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "service.reorder" => {
            let ids = string_list_param(params, "ids")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            match params.get("category").and_then(|v| v.as_str()) {
                Some(category) => a.pinboard.mutate(|s| s.reorder_services(category, &ids)),
                None => a.pinboard.mutate(|s| s.reorder_uncategorized(&ids)),
            }
            Ok(json!({"ok": true}))
        }
        "service.rate" => {
            let id = str_param(params, "id")?;
            let category = str_param(params, "category")?;
            let stars = params.get("stars").and_then(|v| v.as_u64()).ok_or("missing stars")?;
            if stars > 5 {
                return Err("invalid stars: must be between 0 and 5".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let rating = a
                .pinboard
                .try_mutate(|s| s.set_rating(id, category, stars as u8))
                .map_err(|e| e.to_string())?;
            Ok(json!({"rating": rating}))
        }

        // ─── Categories ───
        "category.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.pinboard.store().sorted_categories())
        }
        "category.add" => {
            let name = str_param(params, "name")?.trim();
            if name.is_empty() {
                return Err("category name is required".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a
                .pinboard
                .try_mutate(|s| s.add_category(name))
                .map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "name": name}))
        }
        "category.update" => {
            let id = str_param(params, "id")?;
            let name = match params.get("name").and_then(|v| v.as_str()).map(str::trim) {
                Some("") => return Err("category name is required".to_string()),
                name => name.map(str::to_string),
            };
            let update = CategoryUpdate {
                name,
                order: params.get("order").and_then(|v| v.as_i64()),
                hue: hue_param(params)?,
                tags: match params.get("tags") {
                    Some(_) => Some(string_list_param(params, "tags")?),
                    None => None,
                },
            };
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard
                .try_mutate(|s| s.update_category(id, update))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "category.rename" => {
            let id = str_param(params, "id")?;
            let name = str_param(params, "name")?.trim();
            if name.is_empty() {
                return Err("category name is required".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard
                .try_mutate(|s| s.rename_category(id, name))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "category.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let removed = a
                .pinboard
                .try_mutate(|s| s.delete_category(id))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "name": removed.name}))
        }
        "category.reorder" => {
            let ids = string_list_param(params, "ids")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard.mutate(|s| s.reorder_categories(&ids));
            Ok(json!({"ok": true}))
        }
        "category.services" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let services = a.pinboard.store().filtered_services(id).map_err(|e| e.to_string())?;
            to_json(&services)
        }
        "category.tags.add" => {
            let id = str_param(params, "id")?;
            let tags = string_list_param(params, "tags")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let added = a
                .pinboard
                .try_mutate(|s| s.add_tags_to_category(id, &tags))
                .map_err(|e| e.to_string())?;
            Ok(json!({"added": added}))
        }
        "category.tags.remove" => {
            let id = str_param(params, "id")?;
            let tag = str_param(params, "tag")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard
                .try_mutate(|s| s.remove_tag_from_category(id, tag))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "category.tags.reorder" => {
            let id = str_param(params, "id")?;
            let tags = string_list_param(params, "tags")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.pinboard
                .try_mutate(|s| s.reorder_category_tags(id, tags))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "category.tags.available" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let tags = a.pinboard.store().available_service_tags(id).map_err(|e| e.to_string())?;
            Ok(json!(tags))
        }
        "category.filter.toggle" => {
            let id = str_param(params, "id")?;
            let tag = str_param(params, "tag")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let selected = a.pinboard.toggle_tag_filter(id, tag);
            Ok(json!({"selected": selected, "tags": a.pinboard.store().selected_tags(id)}))
        }

        // ─── Flags ───
        "flag.add" => {
            let flag = str_param(params, "flag")?.trim();
            if flag.is_empty() {
                return Err("flag is required".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let added = a.pinboard.mutate(|s| s.add_flag(flag));
            Ok(json!({"added": added}))
        }
        "flag.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({
                "available": a.pinboard.data().available_flags,
                "used": a.pinboard.store().used_flags(),
            }))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            to_json(a.settings_engine.get_settings())
        }

        // ─── Backup ───
        "backup.export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let document = a.export_backup();
            let file_name = crate::services::backup::backup_file_name(chrono::Utc::now().date_naive());
            Ok(json!({"fileName": file_name, "document": to_json(&document)?}))
        }
        "backup.import" => {
            let text = str_param(params, "text")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.import_backup(text).map_err(|e| e.to_string())?;
            Ok(json!({
                "ok": true,
                "replacedBoard": outcome.data.is_some(),
                "appliedSettings": outcome.applied_settings,
            }))
        }

        // ─── URLs ───
        "url.suggest_https" => {
            let url = str_param(params, "url")?;
            Ok(json!({"suggestion": suggest_https(url)}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Serves the metadata endpoint: `{url}` in, `(status, body)` out.
///
/// Success is `(200, {title, description})`; failures carry `{error}` with
/// 400 for a missing url, the upstream status for a failed fetch, or 500.
pub async fn handle_fetch_metadata(fetcher: &MetadataFetcher, params: &Value) -> (u16, Value) {
    let url = params.get("url").and_then(|v| v.as_str()).unwrap_or("");
    match fetcher.fetch(url).await {
        Ok(metadata) => (
            200,
            json!({"title": metadata.title, "description": metadata.description}),
        ),
        Err(e) => (e.status_code(), json!({"error": e.to_string()})),
    }
}
