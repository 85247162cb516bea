use {
  clap::Parser,
  fundme_client::{format_ether, parse_ether, FundMe, NamedAccounts},
  settings::{init_logging, ScriptSettings},
  tracing::info,
};

mod settings;

/// Funds the deployed FundMe contract from the deployer.
#[derive(Debug, Parser)]
struct FundSettings {
  #[clap(flatten)]
  script: ScriptSettings,

  /// Amount to fund, in ETH
  #[clap(long, default_value = "0.1", value_name = "ETH")]
  value: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_logging();
  let settings = FundSettings::parse();
  let value = parse_ether(&settings.value)?;
  let network = settings.script.connect().await?;

  let NamedAccounts { deployer } = NamedAccounts::resolve(&network.node)?;
  let fund_me = FundMe::deployed(&network.node, deployer).await?;

  info!("Funding contract with {} ETH...", format_ether(value));
  fund_me
    .fund(value)
    .await?
    .wait(settings.script.confirmations(1))
    .await?;
  info!(
    "Funded! Contract balance is {} ETH",
    format_ether(network.node.balance(&fund_me.address()).await)
  );
  Ok(())
}
