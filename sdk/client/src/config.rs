use {
  crate::Error,
  fundme_primitives::{Address, I256, U256},
};

/// Networks where the price feed is mocked and contracts are deployed
/// on the local devnode.
pub const DEVELOPMENT_CHAINS: [&str; 2] = ["hardhat", "localhost"];

/// Decimals of the mock ETH/USD price feed.
pub const DECIMALS: u8 = 8;

/// Initial ETH/USD answer of the mock price feed, 2000 USD.
pub const INITIAL_ANSWER: u64 = 200_000_000_000;

pub fn initial_answer() -> I256 {
  I256::from_raw(U256::from(INITIAL_ANSWER))
}

/// Chainlink ETH/USD aggregator on Sepolia,
/// `0x694AA1769357215DE4FAC081bf1f309aDC325306`.
fn sepolia_eth_usd_price_feed() -> Address {
  Address::from([
    0x69, 0x4a, 0xa1, 0x76, 0x93, 0x57, 0x21, 0x5d, 0xe4, 0xfa,
    0xc0, 0x81, 0xbf, 0x1f, 0x30, 0x9a, 0xdc, 0x32, 0x53, 0x06,
  ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
  /// Devnode that lives only for the duration of the process.
  Ephemeral,

  /// Devnode whose chain is kept in the data directory between runs.
  Persisted,

  /// Public network, only its deployment parameters are known.
  Live,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
  pub name: &'static str,
  pub chain_id: u64,
  pub kind: NetworkKind,

  /// ETH/USD price feed FundMe is deployed against. `None` on
  /// development chains, where the mock is deployed instead.
  pub eth_usd_price_feed: Option<Address>,

  /// Confirmations deployments wait for.
  pub block_confirmations: u64,
}

impl NetworkConfig {
  pub fn all() -> [NetworkConfig; 3] {
    [
      NetworkConfig {
        name: "hardhat",
        chain_id: 31337,
        kind: NetworkKind::Ephemeral,
        eth_usd_price_feed: None,
        block_confirmations: 1,
      },
      NetworkConfig {
        name: "localhost",
        chain_id: 31337,
        kind: NetworkKind::Persisted,
        eth_usd_price_feed: None,
        block_confirmations: 1,
      },
      NetworkConfig {
        name: "sepolia",
        chain_id: 11155111,
        kind: NetworkKind::Live,
        eth_usd_price_feed: Some(sepolia_eth_usd_price_feed()),
        block_confirmations: 6,
      },
    ]
  }

  pub fn by_name(name: &str) -> Result<NetworkConfig, Error> {
    Self::all()
      .into_iter()
      .find(|network| network.name == name)
      .ok_or_else(|| Error::UnknownNetwork(name.to_owned()))
  }

  pub fn is_development(&self) -> bool {
    DEVELOPMENT_CHAINS.contains(&self.name)
  }
}
