use {
  clap::Parser,
  fundme_client::{deployments, Mining, Network, NetworkKind},
  humantime::Duration,
  std::path::PathBuf,
  tracing::info,
  tracing_subscriber::EnvFilter,
};

/// Options shared by all FundMe scripts.
#[derive(Debug, Parser)]
pub struct ScriptSettings {
  /// Network to run against: hardhat, localhost or sepolia
  #[clap(long, short, env = "FUNDME_NETWORK", default_value = "hardhat")]
  pub network: String,

  /// Directory where the localhost chain is persisted
  #[clap(long, env = "FUNDME_DATA_DIR", default_value = ".fundme")]
  pub data_dir: PathBuf,

  /// Confirmations to wait for, overrides the script default
  #[clap(long, value_name = "BLOCKS")]
  pub confirmations: Option<u64>,

  /// Mine blocks at a fixed interval instead of on every transaction
  #[clap(long, short = 't', value_name = "DURATION")]
  pub block_time: Option<Duration>,
}

impl ScriptSettings {
  /// Connects to the selected network.
  ///
  /// The hardhat network starts empty on every run, so the whole
  /// deployment fixture is run on it before returning.
  pub async fn connect(&self) -> anyhow::Result<Network> {
    let network = self.connect_bare().await?;
    if network.config.kind == NetworkKind::Ephemeral {
      info!("fresh {} chain, deploying contracts first", network.name());
      deployments::fixture(&network, &["all"]).await?;
    }
    Ok(network)
  }

  /// Connects without deploying anything.
  pub async fn connect_bare(&self) -> anyhow::Result<Network> {
    let mining = match self.block_time {
      Some(interval) => Mining::Interval(interval.into()),
      None => Mining::Automine,
    };
    Ok(Network::connect_with(&self.network, &self.data_dir, mining).await?)
  }

  pub fn confirmations(&self, default: u64) -> u64 {
    self.confirmations.unwrap_or(default)
  }
}

/// Logs to stderr, filtered by `RUST_LOG` and `info` by default.
pub fn init_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();
}
