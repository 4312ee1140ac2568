use anyhow::Context;
use patient_records_server::{logging, Server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("invalid configuration")?;
    logging::init_logging(&config);

    let server = Server::new(config.clone()).with_context(|| {
        format!(
            "failed to open patient store at {}",
            config.data_file.display()
        )
    })?;

    server.run().await?;
    Ok(())
}
