//! Disposable `MySQL` container.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use testcontainers::{ContainerAsync, ContainerRequest, ImageExt, runners::AsyncRunner};
use testcontainers_modules::mysql::Mysql;

use user_repo::backends::live::{ClientConfig, connect};
use user_repo::infra::storage::schema;

/// A throwaway `MySQL` server with the `user` table created.
///
/// Dropping it removes the container.
pub struct MysqlUnderTest {
    pub conn: Arc<DatabaseConnection>,
    pub config: ClientConfig,
    container: ContainerAsync<Mysql>,
}

impl MysqlUnderTest {
    /// Close the pool once no repository shares it, then stop and remove the container.
    pub async fn teardown(self) -> Result<()> {
        if let Some(conn) = Arc::into_inner(self.conn) {
            conn.close().await?;
        }
        drop(self.container);
        Ok(())
    }
}

/// Start a `MySQL` container, connect to it and bootstrap the schema.
///
/// # Errors
/// Returns an error if the container fails to start or never accepts connections.
pub async fn bring_up_mysql() -> Result<MysqlUnderTest> {
    let container = ContainerRequest::from(Mysql::default())
        .with_env_var("MYSQL_DATABASE", "practice")
        .start()
        .await?;
    let port = container.get_host_port_ipv4(3306).await?;
    wait_for_tcp("127.0.0.1", port, Duration::from_secs(60)).await?;

    let config = ClientConfig {
        host: "127.0.0.1".to_owned(),
        ..ClientConfig::default()
    }
    .with_port(port);
    let conn = connect_with_retry(&config, Duration::from_secs(60)).await?;
    schema::bootstrap(&conn).await?;

    Ok(MysqlUnderTest {
        conn: Arc::new(conn),
        config,
        container,
    })
}

async fn connect_with_retry(config: &ClientConfig, timeout: Duration) -> Result<DatabaseConnection> {
    use tokio::time::{Instant, sleep};
    let deadline = Instant::now() + timeout;
    loop {
        match connect(config).await {
            Ok(conn) => return Ok(conn),
            Err(err) if Instant::now() >= deadline => return Err(err.into()),
            Err(_) => sleep(Duration::from_millis(500)).await,
        }
    }
}

async fn wait_for_tcp(host: &str, port: u16, timeout: Duration) -> Result<()> {
    use tokio::{
        net::TcpStream,
        time::{Instant, sleep},
    };
    let deadline = Instant::now() + timeout;
    loop {
        if TcpStream::connect((host, port)).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            anyhow::bail!("Timeout waiting for {host}:{port}");
        }
        sleep(Duration::from_millis(200)).await;
    }
}
