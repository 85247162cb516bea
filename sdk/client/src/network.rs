use {
  crate::{Error, NetworkConfig, NetworkKind},
  fundme_devnode::{Devnode, Mining, NodeConfig},
  std::path::Path,
  tracing::info,
};

/// A selected network together with the node transactions go to.
#[derive(Clone)]
pub struct Network {
  pub config: NetworkConfig,
  pub node: Devnode,
}

impl Network {
  /// Connects to a network by name.
  ///
  /// `hardhat` starts a fresh in-memory chain, `localhost` opens the
  /// chain persisted under `data_dir`. Live networks are refused.
  pub async fn connect(
    name: &str,
    data_dir: impl AsRef<Path>,
  ) -> Result<Self, Error> {
    Self::connect_with(name, data_dir, Mining::Automine).await
  }

  pub async fn connect_with(
    name: &str,
    data_dir: impl AsRef<Path>,
    mining: Mining,
  ) -> Result<Self, Error> {
    let config = NetworkConfig::by_name(name)?;
    let data_dir = match config.kind {
      NetworkKind::Ephemeral => None,
      NetworkKind::Persisted => Some(data_dir.as_ref().join(config.name)),
      NetworkKind::Live => {
        return Err(Error::UnsupportedNetwork(config.name.to_owned()))
      }
    };

    info!(
      "connecting to network {} (chain id {})",
      config.name, config.chain_id
    );
    let node = Devnode::start(NodeConfig {
      data_dir,
      mining,
      ..Default::default()
    })
    .await?;

    Ok(Self { config, node })
  }

  pub fn name(&self) -> &'static str {
    self.config.name
  }

  pub fn is_development(&self) -> bool {
    self.config.is_development()
  }
}
