//! SQL Server destination over the TDS protocol.

use std::borrow::Cow;

use tiberius::{AuthMethod, Client, ColumnData, Config, TokenRow};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::types::{FieldDescriptor, RowBatch};

use super::{sql, BulkWriter, TableManager};

/// Connection parameters for the destination server.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// `host`, `host:port`, or `host,port` (port defaults to 1433).
    pub server: String,
    /// SQL login name.
    pub user: String,
    /// SQL login password.
    pub password: String,
    /// Database holding the destination table.
    pub database: String,
}

/// A live SQL Server connection implementing both collaborator traits.
///
/// `tiberius` is async-only; the destination owns a private current-thread
/// runtime and blocks on every call, so the loader stays a single logical
/// thread. Batches are streamed through the TDS bulk-load path, the wire
/// equivalent of `bcp in`.
pub struct MssqlDestination {
    runtime: Runtime,
    client: Client<Compat<TcpStream>>,
}

impl MssqlDestination {
    /// Connect and authenticate with SQL Server credentials.
    pub fn connect(params: &ConnectionParams) -> LoadResult<Self> {
        let (host, port) = split_server(&params.server)?;

        let mut config = Config::new();
        config.host(&host);
        config.port(port);
        config.database(&params.database);
        config.authentication(AuthMethod::sql_server(&params.user, &params.password));
        config.trust_cert();

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = runtime.block_on(async {
            let tcp = TcpStream::connect((host.as_str(), port))
                .await
                .map_err(LoadError::Io)?;
            tcp.set_nodelay(true).map_err(LoadError::Io)?;
            Client::connect(config, tcp.compat_write())
                .await
                .map_err(LoadError::from)
        })?;

        Ok(Self { runtime, client })
    }

    fn execute(&mut self, statement: &str) -> LoadResult<()> {
        debug!(statement, "executing");
        self.runtime
            .block_on(self.client.execute(statement, &[]))?;
        Ok(())
    }
}

impl TableManager for MssqlDestination {
    fn drop_table(&mut self, table: &str) -> LoadResult<()> {
        self.execute(&sql::drop_table(table))
    }

    fn create_table(&mut self, table: &str, fields: &[FieldDescriptor]) -> LoadResult<()> {
        self.execute(&sql::create_table(table, fields))
    }

    fn truncate_table(&mut self, table: &str) -> LoadResult<()> {
        self.execute(&sql::truncate_table(table))
    }
}

impl BulkWriter for MssqlDestination {
    fn write_batch(&mut self, table: &str, batch: &RowBatch) -> LoadResult<usize> {
        let written = self.runtime.block_on(async {
            let mut request = self.client.bulk_insert(table).await?;
            for row in &batch.rows {
                let mut token = TokenRow::new();
                for cell in row {
                    let text = cell.as_text().map(|s| Cow::from(s.to_owned()));
                    token.push(ColumnData::String(text));
                }
                request.send(token).await?;
            }
            let result = request.finalize().await?;
            Ok::<_, tiberius::error::Error>(result.total())
        })?;
        Ok(written as usize)
    }
}

/// Split a `-S` server argument into host and port.
fn split_server(server: &str) -> LoadResult<(String, u16)> {
    match server.split_once([':', ',']) {
        Some((host, port)) => {
            let port = port
                .trim()
                .parse()
                .map_err(|_| LoadError::ArgumentValidation {
                    message: format!("invalid port in server argument '{server}'"),
                })?;
            Ok((host.to_string(), port))
        }
        None => Ok((server.to_string(), 1433)),
    }
}
