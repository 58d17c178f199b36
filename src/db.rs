use rusqlite::Connection;
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("trademap.sqlite3");
    let conn = Connection::open(db_path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// Create or migrate the trade_data table. Must run before anything else
/// touches the table in a process lifetime.
pub fn init_db(conn: &Connection) -> anyhow::Result<()> {
    // Workspaces created before the flexible WC layout carry the fixed
    // 5437/5645 rate columns. Migrate those first.
    ensure_flexible_wc_layout(conn)?;

    conn.execute(&create_table_sql("trade_data"), [])?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_trade_data_trade ON trade_data(trade)",
        [],
    )?;
    Ok(())
}

fn create_table_sql(name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {name}(
            id INTEGER PRIMARY KEY,
            trade TEXT NOT NULL,
            state_code TEXT NOT NULL,
            gl_premium_low REAL NOT NULL,
            gl_premium_high REAL NOT NULL,
            gl_savings REAL NOT NULL,
            gl_competitiveness INTEGER NOT NULL,
            wc_class_1 TEXT NOT NULL,
            wc_rate_1 REAL NOT NULL,
            wc_label_1 TEXT,
            wc_class_2 TEXT,
            wc_rate_2 REAL,
            wc_label_2 TEXT,
            updated_at TEXT NOT NULL,
            UNIQUE(trade, state_code)
        )"
    )
}

/// One-time migration from the legacy fixed two-class layout
/// (wc_rate_5437 / wc_rate_5645) to the flexible slot layout.
///
/// The legacy rate columns become the slot rate columns and every
/// pre-existing row is backfilled with the carpenter classes the fixed
/// columns always denoted: 5437/Interior and 5645/Framing. SQLite cannot
/// relax the legacy NOT NULL constraint on the second rate in place, so
/// the table is rebuilt and renamed. No-op once the slot columns exist.
fn ensure_flexible_wc_layout(conn: &Connection) -> anyhow::Result<()> {
    if !table_exists(conn, "trade_data")? {
        return Ok(());
    }
    if table_has_column(conn, "trade_data", "wc_rate_1")? {
        return Ok(());
    }
    if !table_has_column(conn, "trade_data", "wc_rate_5437")? {
        anyhow::bail!("trade_data has neither the flexible nor the legacy WC columns");
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(&create_table_sql("trade_data_flex"), [])?;
    tx.execute(
        "INSERT INTO trade_data_flex(
            id, trade, state_code, gl_premium_low, gl_premium_high, gl_savings,
            gl_competitiveness, wc_class_1, wc_rate_1, wc_label_1,
            wc_class_2, wc_rate_2, wc_label_2, updated_at)
         SELECT
            id, trade, state_code, gl_premium_low, gl_premium_high, gl_savings,
            gl_competitiveness, '5437', wc_rate_5437, 'Interior',
            '5645', wc_rate_5645, 'Framing', updated_at
         FROM trade_data",
        [],
    )?;
    tx.execute("DROP TABLE trade_data", [])?;
    tx.execute("ALTER TABLE trade_data_flex RENAME TO trade_data", [])?;
    tx.commit()?;

    tracing::info!("migrated trade_data to the flexible WC slot layout");
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> anyhow::Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        [table],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
