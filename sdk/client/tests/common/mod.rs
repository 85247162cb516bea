use {
  fundme_client::{
    deployments,
    FundMe,
    MockV3Aggregator,
    NamedAccounts,
    Network,
    NetworkConfig,
  },
  fundme_primitives::Address,
  tempfile::TempDir,
};

/// A freshly deployed `all` fixture.
pub struct Setup {
  pub network: Network,
  pub deployer: Address,
  pub fund_me: FundMe,
  pub mock_v3_aggregator: MockV3Aggregator,
  _data_dir: TempDir,
}

/// Network the suite runs against, `FUNDME_NETWORK` or `hardhat`.
pub fn network_name() -> String {
  std::env::var("FUNDME_NETWORK").unwrap_or_else(|_| "hardhat".to_owned())
}

/// Deploys everything on a new chain. Returns `None` when the selected
/// network is not a development chain, the suite only runs locally.
pub async fn setup() -> anyhow::Result<Option<Setup>> {
  let name = network_name();
  if !NetworkConfig::by_name(&name)?.is_development() {
    return Ok(None);
  }

  // each test gets its own chain, even on localhost
  let data_dir = tempfile::tempdir()?;
  let network = Network::connect(&name, data_dir.path()).await?;
  deployments::fixture(&network, &["all"]).await?;

  let deployer = NamedAccounts::resolve(&network.node)?.deployer;
  let fund_me = FundMe::deployed(&network.node, deployer).await?;
  let mock_v3_aggregator =
    MockV3Aggregator::deployed(&network.node, deployer).await?;

  Ok(Some(Setup {
    network,
    deployer,
    fund_me,
    mock_v3_aggregator,
    _data_dir: data_dir,
  }))
}
