//! SQLite-backed snapshot store.

use async_trait::async_trait;
use bacen_core::components::ComponentGroup;
use bacen_core::period::Quarter;
use bacen_core::types::{LineItem, ProjectedMetricRow, Snapshot};
use bacen_core::{BacenError, Result, SnapshotStore};
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// The five ledger-shaped tables, in snapshot field order.
const LEDGER_TABLES: [&str; 5] = [
    "consolidated_reports",
    "market_metrics",
    "credit_pf",
    "credit_pj",
    "financial_metrics",
];
const PROJECTED_TABLE: &str = "projected_metrics";

/// SQLite-backed store for ETL snapshots.
///
/// Every `replace` rewrites all six tables inside one transaction; there is
/// no incremental update path. NaN balances round-trip through SQL NULL.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn store_err(e: impl std::fmt::Display) -> BacenError {
    BacenError::Store(e.to_string())
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation
    /// fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;

        for table in LEDGER_TABLES {
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        CodInst TEXT NOT NULL,
                        NomeInstituicao TEXT,
                        NumeroRelatorio INTEGER NOT NULL,
                        NomeRelatorio TEXT NOT NULL,
                        Grupo TEXT NOT NULL,
                        Conta TEXT,
                        NomeColuna TEXT NOT NULL,
                        NomeRelatorio_Grupo_Coluna TEXT NOT NULL,
                        AnoMes TEXT NOT NULL,
                        Saldo REAL
                    )"
                ),
                [],
            )
            .map_err(store_err)?;

            conn.execute(
                &format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table}_categoria
                     ON {table}(NomeRelatorio_Grupo_Coluna, AnoMes)"
                ),
                [],
            )
            .map_err(store_err)?;
        }

        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {PROJECTED_TABLE} (
                    NomeInstituicao TEXT NOT NULL,
                    AnoMes TEXT NOT NULL,
                    ComponentType TEXT NOT NULL,
                    Component TEXT NOT NULL,
                    ValueAbsolute REAL,
                    ValuePercentRevenue REAL,
                    ValuePerClient REAL,
                    NumClients REAL,
                    ReceitaOperacional REAL
                )"
            ),
            [],
        )
        .map_err(store_err)?;

        debug!("snapshot store schema initialized");
        Ok(())
    }
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| BacenError::Parse(format!("invalid stored month {s:?}: {e}")))
}

fn write_line_items(tx: &Transaction<'_>, table: &str, rows: &[LineItem]) -> Result<()> {
    let mut stmt = tx
        .prepare(&format!(
            "INSERT INTO {table}
             (CodInst, NomeInstituicao, NumeroRelatorio, NomeRelatorio, Grupo,
              Conta, NomeColuna, NomeRelatorio_Grupo_Coluna, AnoMes, Saldo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .map_err(store_err)?;

    for row in rows {
        // SQLite stores a NaN double as NULL; bind it explicitly so the
        // read path has a single representation to undo.
        let saldo = if row.value.is_nan() {
            None
        } else {
            Some(row.value)
        };
        stmt.execute(params![
            row.institution_code,
            row.institution_name,
            row.report_number,
            row.report_name,
            row.group,
            row.account,
            row.column_name,
            row.category_key,
            row.period_month.to_string(),
            saldo,
        ])
        .map_err(store_err)?;
    }
    Ok(())
}

fn read_line_items(conn: &Connection, table: &str) -> Result<Vec<LineItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT CodInst, NomeInstituicao, NumeroRelatorio, NomeRelatorio, Grupo,
                    Conta, NomeColuna, NomeRelatorio_Grupo_Coluna, AnoMes, Saldo
             FROM {table}"
        ))
        .map_err(store_err)?;

    let mapped = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, u16>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, Option<f64>>(9)?,
            ))
        })
        .map_err(store_err)?;

    let mut rows = Vec::new();
    for item in mapped {
        let (code, name, report_number, report_name, group, account, column, category, month, saldo) =
            item.map_err(store_err)?;
        let period_month = parse_month(&month)?;
        rows.push(LineItem {
            institution_code: code,
            institution_name: name,
            report_number,
            report_name,
            group,
            account,
            column_name: column,
            category_key: category,
            period_month,
            period_quarter: Quarter::from(period_month),
            value: saldo.unwrap_or(f64::NAN),
        });
    }
    Ok(rows)
}

fn write_projected(tx: &Transaction<'_>, rows: &[ProjectedMetricRow]) -> Result<()> {
    let mut stmt = tx
        .prepare(&format!(
            "INSERT INTO {PROJECTED_TABLE}
             (NomeInstituicao, AnoMes, ComponentType, Component, ValueAbsolute,
              ValuePercentRevenue, ValuePerClient, NumClients, ReceitaOperacional)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))
        .map_err(store_err)?;

    for row in rows {
        stmt.execute(params![
            row.institution,
            row.period_month.to_string(),
            row.group.as_str(),
            row.component,
            row.value_absolute,
            row.value_pct_revenue,
            row.value_per_client,
            row.num_clients,
            row.operating_revenue,
        ])
        .map_err(store_err)?;
    }
    Ok(())
}

fn read_projected(conn: &Connection) -> Result<Vec<ProjectedMetricRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT NomeInstituicao, AnoMes, ComponentType, Component, ValueAbsolute,
                    ValuePercentRevenue, ValuePerClient, NumClients, ReceitaOperacional
             FROM {PROJECTED_TABLE}"
        ))
        .map_err(store_err)?;

    let mapped = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, Option<f64>>(5)?,
                row.get::<_, Option<f64>>(6)?,
                row.get::<_, Option<f64>>(7)?,
                row.get::<_, Option<f64>>(8)?,
            ))
        })
        .map_err(store_err)?;

    let mut rows = Vec::new();
    for item in mapped {
        let (institution, month, group, component, absolute, pct, per_client, clients, revenue) =
            item.map_err(store_err)?;
        let period_month = parse_month(&month)?;
        rows.push(ProjectedMetricRow {
            institution,
            period_quarter: Quarter::from(period_month),
            period_month,
            group: group.parse::<ComponentGroup>()?,
            component,
            value_absolute: absolute.unwrap_or(f64::NAN),
            value_pct_revenue: pct.unwrap_or(f64::NAN),
            value_per_client: per_client.unwrap_or(f64::NAN),
            num_clients: clients.unwrap_or(f64::NAN),
            operating_revenue: revenue.unwrap_or(f64::NAN),
        });
    }
    Ok(rows)
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    #[instrument(skip(self, snapshot), fields(ledger_rows = snapshot.ledger.len()))]
    async fn replace(&self, snapshot: &Snapshot) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        for table in LEDGER_TABLES {
            tx.execute(&format!("DELETE FROM {table}"), [])
                .map_err(store_err)?;
        }
        tx.execute(&format!("DELETE FROM {PROJECTED_TABLE}"), [])
            .map_err(store_err)?;

        write_line_items(&tx, LEDGER_TABLES[0], &snapshot.ledger)?;
        write_line_items(&tx, LEDGER_TABLES[1], &snapshot.market_metrics)?;
        write_line_items(&tx, LEDGER_TABLES[2], &snapshot.credit_individual)?;
        write_line_items(&tx, LEDGER_TABLES[3], &snapshot.credit_corporate)?;
        write_line_items(&tx, LEDGER_TABLES[4], &snapshot.financial_metrics)?;
        write_projected(&tx, &snapshot.projected)?;

        tx.commit().map_err(store_err)?;
        debug!(projected_rows = snapshot.projected.len(), "replaced stored snapshot");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        let conn = self.conn.lock().map_err(store_err)?;

        let snapshot = Snapshot {
            ledger: read_line_items(&conn, LEDGER_TABLES[0])?,
            market_metrics: read_line_items(&conn, LEDGER_TABLES[1])?,
            credit_individual: read_line_items(&conn, LEDGER_TABLES[2])?,
            credit_corporate: read_line_items(&conn, LEDGER_TABLES[3])?,
            financial_metrics: read_line_items(&conn, LEDGER_TABLES[4])?,
            projected: read_projected(&conn)?,
        };

        // An untouched database is indistinguishable from an empty run;
        // report it as no snapshot.
        if snapshot.ledger.is_empty() && snapshot.projected.is_empty() {
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;
        for table in LEDGER_TABLES {
            conn.execute(&format!("DELETE FROM {table}"), [])
                .map_err(store_err)?;
        }
        conn.execute(&format!("DELETE FROM {PROJECTED_TABLE}"), [])
            .map_err(store_err)?;
        debug!("cleared stored snapshot");
        Ok(())
    }
}
