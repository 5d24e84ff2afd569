use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use zsxq_sdk::{ClientConfig, ZsxqClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Reads ZSXQ_TOKEN and friends from .env or the environment
    let config = ClientConfig::from_env_file("ZSXQ").context("failed to load configuration")?;
    let client = ZsxqClient::from_config(&config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let me = client.users().current(&cancel).await?;
    info!(user_id = %me.user_id, name = %me.name, "Signed in");

    let groups = client.groups().list(&cancel).await?;
    println!("Found {} groups", groups.len());
    for group in groups.iter().take(5) {
        println!("Group: {} ({})", group.name, group.group_id);

        match client.topics().list(&cancel, group.group_id, None).await {
            Ok(topics) => println!("  {} recent topics", topics.len()),
            Err(e) if e.is_permission() => warn!(group_id = group.group_id, "No access to topics"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
