use async_trait::async_trait;
use configparser::ini::Ini;
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};
use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};
use crate::get_ini;
use crate::record::{SpanRecord, SpanRow, SPAN_ROW_COLUMNS};
use crate::sink::RecordSink;

const DEFAULT_PORT: u16 = 5432;
const DEFAULT_TABLE: &str = "span_records";
const DEFAULT_BATCH_SIZE: usize = 1000;
// Postgres accepts at most 65535 bind parameters per statement
const MAX_BATCH_SIZE: usize = 65535 / SPAN_ROW_COLUMNS.len();

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseSettings {
	pub server: String,
	pub port: u16,
	pub database: String,
	pub user: String,
	pub password: String,
	pub table: String,
	pub batch_size: usize,
	pub create_table: bool
}

impl DatabaseSettings {
	pub fn load(path: &str) -> Result<DatabaseSettings> {
		let ini = get_ini(path)?;
		DatabaseSettings::from_ini(&ini)
	}

	pub fn from_ini(ini: &Ini) -> Result<DatabaseSettings> {
		let section = "database";
		let get_value = |key| -> Result<String> {
			match ini.get(section, key) {
				Some(value) => Ok(value.trim().to_string()),
				None => Err(anyhow!("Missing value \"{key}\" in section \"{section}\" of database configuration"))
			}
		};
		let parse_error = |key: &str| anyhow!("Failed to parse value for key \"{key}\" in section \"{section}\" of database configuration");
		let server = get_value("SERVER")?;
		let database = get_value("DATABASE")?;
		let user = get_value("UID")?;
		let password = get_value("PWD")?;
		let port = match ini.get(section, "PORT") {
			Some(value) => value.trim().parse::<u16>()
				.with_context(|| parse_error("PORT"))?,
			None => DEFAULT_PORT
		};
		let table = ini.get(section, "TABLE")
			.map(|x| x.trim().to_string())
			.unwrap_or(DEFAULT_TABLE.to_string());
		let batch_size = match ini.get(section, "BATCH_SIZE") {
			Some(value) => value.trim().parse::<usize>()
				.with_context(|| parse_error("BATCH_SIZE"))?,
			None => DEFAULT_BATCH_SIZE
		};
		let create_table = match ini.get(section, "CREATE_TABLE") {
			Some(value) => value.trim().parse::<bool>()
				.with_context(|| parse_error("CREATE_TABLE"))?,
			None => false
		};
		if server.is_empty() || database.is_empty() {
			bail!("Database configuration requires non-empty \"SERVER\" and \"DATABASE\" values");
		}
		let identifier = Regex::new("^[A-Za-z_][A-Za-z0-9_]*$")?;
		if !identifier.is_match(table.as_str()) {
			bail!("Invalid table name \"{table}\" in database configuration");
		}
		if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
			bail!("Batch size must be between 1 and {MAX_BATCH_SIZE}");
		}
		let settings = DatabaseSettings {
			server,
			port,
			database,
			user,
			password,
			table,
			batch_size,
			create_table
		};
		Ok(settings)
	}

	// For log output only, the password is masked
	pub fn connection_string(&self) -> String {
		format!("postgres://{}:***@{}:{}/{}", self.user, self.server, self.port, self.database)
	}

	pub fn connect_options(&self) -> PgConnectOptions {
		PgConnectOptions::new()
			.host(self.server.as_str())
			.port(self.port)
			.database(self.database.as_str())
			.username(self.user.as_str())
			.password(self.password.as_str())
	}

	pub fn create_table_sql(&self) -> String {
		format!(
			"CREATE TABLE IF NOT EXISTS {} (\
				segment VARCHAR(10) NOT NULL, \
				pf_id INTEGER NOT NULL, \
				pf_code VARCHAR(50) NOT NULL, \
				currency VARCHAR(10) NOT NULL, \
				cvf DOUBLE PRECISION NOT NULL, \
				svf DOUBLE PRECISION NOT NULL, \
				value_meth VARCHAR(20) NOT NULL, \
				price_meth VARCHAR(20) NOT NULL, \
				setl_meth VARCHAR(20) NOT NULL, \
				contract_id INTEGER NOT NULL, \
				expiry VARCHAR(10) NOT NULL, \
				volatility DOUBLE PRECISION NOT NULL, \
				settle_date VARCHAR(10) NOT NULL, \
				intra_rate DOUBLE PRECISION NOT NULL, \
				price_scan DOUBLE PRECISION NOT NULL, \
				vol_scan DOUBLE PRECISION NOT NULL, \
				opt_contract_id INTEGER NOT NULL, \
				option_type VARCHAR(1) NOT NULL, \
				strike_price DOUBLE PRECISION NOT NULL, \
				option_value DOUBLE PRECISION NOT NULL, \
				risk_array TEXT NOT NULL\
			)",
			self.table
		)
	}

	pub fn insert_prefix(&self) -> String {
		format!("INSERT INTO {} ({}) ", self.table, SPAN_ROW_COLUMNS.join(", "))
	}

	// One multi-row INSERT per batch_size rows, placeholders are numbered from $1 in each statement
	pub fn insert_statements<'r>(&self, rows: &'r [SpanRow]) -> Vec<QueryBuilder<'r, Postgres>> {
		rows.chunks(self.batch_size)
			.map(|batch| {
				let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(self.insert_prefix());
				builder.push_values(batch, |mut values, row| {
					values
						.push_bind(row.segment.as_str())
						.push_bind(row.pf_id)
						.push_bind(row.pf_code.as_str())
						.push_bind(row.currency.as_str())
						.push_bind(row.cvf)
						.push_bind(row.svf)
						.push_bind(row.value_meth.as_str())
						.push_bind(row.price_meth.as_str())
						.push_bind(row.setl_meth.as_str())
						.push_bind(row.contract_id)
						.push_bind(row.expiry.as_str())
						.push_bind(row.volatility)
						.push_bind(row.settle_date.as_str())
						.push_bind(row.intra_rate)
						.push_bind(row.price_scan)
						.push_bind(row.vol_scan)
						.push_bind(row.opt_contract_id)
						.push_bind(row.option_type.as_str())
						.push_bind(row.strike_price)
						.push_bind(row.option_value)
						.push_bind(row.risk_array.as_str());
				});
				builder
			})
			.collect()
	}
}

pub struct PostgresSink {
	settings: DatabaseSettings,
	pool: PgPool
}

impl PostgresSink {
	pub async fn connect(settings: DatabaseSettings) -> Result<PostgresSink> {
		let pool = PgPoolOptions::new()
			.max_connections(1)
			.connect_with(settings.connect_options())
			.await
			.with_context(|| anyhow!("Unable to connect to {}", settings.connection_string()))?;
		if settings.create_table {
			sqlx::query(settings.create_table_sql().as_str())
				.execute(&pool)
				.await
				.with_context(|| anyhow!("Unable to create table \"{}\"", settings.table))?;
		}
		let sink = PostgresSink {
			settings,
			pool
		};
		Ok(sink)
	}

	pub async fn close(self) {
		self.pool.close().await;
	}
}

#[async_trait]
impl RecordSink for PostgresSink {
	fn describe(&self) -> String {
		format!("table \"{}\" at {}", self.settings.table, self.settings.connection_string())
	}

	async fn write(&mut self, records: &[SpanRecord]) -> Result<usize> {
		let rows: Vec<SpanRow> = records
			.iter()
			.map(SpanRow::from)
			.collect();
		let mut transaction = self.pool.begin().await
			.with_context(|| "Unable to start transaction")?;
		let mut inserted = 0;
		for mut builder in self.settings.insert_statements(&rows) {
			let result = builder.build()
				.execute(&mut *transaction)
				.await
				.with_context(|| anyhow!("Failed to insert batch starting at row {inserted}"))?;
			inserted += result.rows_affected() as usize;
			debug!("Inserted {} of {} rows", inserted, rows.len());
		}
		transaction.commit().await
			.with_context(|| "Unable to commit transaction")?;
		info!("Committed {} rows to \"{}\"", inserted, self.settings.table);
		Ok(inserted)
	}
}
