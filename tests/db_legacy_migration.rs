mod test_support;

use rusqlite::Connection;
use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

fn seed_legacy_workspace(workspace: &std::path::Path) {
    let conn = Connection::open(workspace.join("trademap.sqlite3")).expect("create legacy db");
    conn.execute(
        "CREATE TABLE trade_data(
            id INTEGER PRIMARY KEY,
            trade TEXT NOT NULL,
            state_code TEXT NOT NULL,
            gl_premium_low REAL NOT NULL,
            gl_premium_high REAL NOT NULL,
            gl_savings REAL NOT NULL,
            gl_competitiveness INTEGER NOT NULL,
            wc_rate_5437 REAL NOT NULL,
            wc_rate_5645 REAL NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(trade, state_code)
        )",
        [],
    )
    .expect("create legacy table");
    for (state, low, high, r1, r2) in [
        ("AL", 1.2, 2.3, 6.14, 14.07),
        ("AK", 1.0, 2.0, 5.5, 12.0),
    ] {
        conn.execute(
            "INSERT INTO trade_data(
                trade, state_code, gl_premium_low, gl_premium_high, gl_savings,
                gl_competitiveness, wc_rate_5437, wc_rate_5645, updated_at)
             VALUES('carpenter', ?, ?, ?, 32.3, 90, ?, ?, '2024-01-01T00:00:00Z')",
            (state, low, high, r1, r2),
        )
        .expect("seed legacy row");
    }
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> bool {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql).expect("prepare pragma table_info");
    let mut rows = stmt.query([]).expect("query pragma table_info");
    while let Some(row) = rows.next().expect("next row") {
        let name: String = row.get(1).expect("column name");
        if name == column {
            return true;
        }
    }
    false
}

#[test]
fn legacy_workspace_migrates_on_select_and_stays_migrated() {
    let workspace = tempfile::tempdir().expect("workspace dir");
    seed_legacy_workspace(workspace.path());

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );

    let conn =
        Connection::open(workspace.path().join("trademap.sqlite3")).expect("open migrated db");
    assert!(table_has_column(&conn, "trade_data", "wc_rate_1"));
    assert!(table_has_column(&conn, "trade_data", "wc_class_2"));
    assert!(!table_has_column(&conn, "trade_data", "wc_rate_5437"));

    let migrated: Vec<(String, String, f64, String, String, f64, String)> = conn
        .prepare(
            "SELECT state_code, wc_class_1, wc_rate_1, wc_label_1,
                    wc_class_2, wc_rate_2, wc_label_2
             FROM trade_data ORDER BY state_code",
        )
        .expect("prepare")
        .query_map([], |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
            ))
        })
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    assert_eq!(migrated.len(), 2);
    for row in &migrated {
        assert_eq!(row.1, "5437");
        assert_eq!(row.3, "Interior");
        assert_eq!(row.4, "5645");
        assert_eq!(row.6, "Framing");
    }
    assert_eq!(migrated[0].0, "AK");
    assert_eq!(migrated[0].2, 5.5);
    assert_eq!(migrated[0].5, 12.0);
    drop(conn);

    // Re-selecting the workspace runs the resolver again; it must be a
    // no-op with the data intact.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );
    let map = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "map.data",
        json!({ "trade": "carpenter" }),
    );
    assert_eq!(
        map.pointer("/wcConfig/class1").and_then(|v| v.as_str()),
        Some("5437")
    );
    assert_eq!(
        map.pointer("/wcConfig/label2").and_then(|v| v.as_str()),
        Some("Framing")
    );
    assert_eq!(
        map.pointer("/stateData/wcRate2/AL").and_then(|v| v.as_f64()),
        Some(14.07)
    );
    assert_eq!(
        map.pointer("/premiumRanges/AK").and_then(|v| v.as_str()),
        Some("1% - 2%")
    );
}

#[test]
fn migrated_trade_accepts_flexible_reimports() {
    let workspace = tempfile::tempdir().expect("workspace dir");
    seed_legacy_workspace(workspace.path());

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );

    // A single-class trade lands next to the migrated two-class rows.
    let csv = format!(
        "{}\nAL,0.4,1.1,38.6,90,5190,3.56,,,0,\n",
        test_support::FLEXIBLE_HEADER
    );
    let path = test_support::write_csv(workspace.path(), "electrician.csv", &csv);
    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "trades.import",
        json!({ "filePath": path.to_string_lossy(), "trade": "electrician" }),
    );
    assert_eq!(imported.get("imported").and_then(|v| v.as_i64()), Some(1));

    let map = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "map.data",
        json!({ "trade": "electrician" }),
    );
    assert_eq!(
        map.pointer("/wcConfig/hasTwoClasses").and_then(|v| v.as_bool()),
        Some(false)
    );
    assert!(map.pointer("/stateData/wcRate2").is_none());
}
