use {
  clap::Parser,
  fundme_client::deployments,
  settings::{init_logging, ScriptSettings},
  tracing::info,
};

mod settings;

/// Deploys the FundMe contracts to the selected network.
#[derive(Debug, Parser)]
struct DeploySettings {
  #[clap(flatten)]
  script: ScriptSettings,

  /// Deployment tags to run: mocks, fundme or all
  #[clap(long, default_value = "all", value_delimiter = ',')]
  tags: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_logging();
  let settings = DeploySettings::parse();

  let network = settings.script.connect_bare().await?;
  info!("deploying to {:?}", network.config);
  let tags: Vec<&str> = settings.tags.iter().map(String::as_str).collect();
  deployments::fixture(&network, &tags).await?;

  for name in [deployments::MOCK_V3_AGGREGATOR, deployments::FUND_ME] {
    if let Some(deployment) = network.node.deployment(name).await? {
      info!("{name}: {:?}", deployment.address);
    }
  }
  Ok(())
}
