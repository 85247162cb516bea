use {
  clap::Parser,
  fundme_client::{format_ether, FundMe, NamedAccounts},
  settings::{init_logging, ScriptSettings},
  tracing::info,
};

mod settings;

/// Withdraws everything funded so far to the deployer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_logging();
  let settings = ScriptSettings::parse();
  let network = settings.connect().await?;

  let NamedAccounts { deployer } = NamedAccounts::resolve(&network.node)?;
  let fund_me = FundMe::deployed(&network.node, deployer).await?;
  let balance = network.node.balance(&fund_me.address()).await;

  info!("Funding contract...");
  let receipt = fund_me
    .c_withdrawal()
    .await?
    .wait(settings.confirmations(1))
    .await?;
  info!("Withdraw!");
  info!(
    "withdrew {} ETH in block {} using {} gas",
    format_ether(balance),
    receipt.block_number,
    receipt.gas_used
  );
  Ok(())
}
