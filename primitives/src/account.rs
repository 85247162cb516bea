use {
  ethers::types::{Address, I256, U256},
  serde::{Deserialize, Serialize},
  std::collections::BTreeMap,
};

/// Represents the basic unit of state on the chain.
///
/// Every address maps to at most one account. Externally owned accounts
/// (development wallets, the deployer, funders) only carry a balance and a
/// nonce. Contract accounts additionally carry their deployed code together
/// with the storage that code owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
  /// Balance in wei.
  pub balance: U256,

  /// Number of transactions sent from this account. For contract
  /// accounts this is the number of contracts it has created, which
  /// is always zero here.
  pub nonce: u64,

  /// Deployed contract code and storage, `None` for externally owned
  /// accounts.
  pub code: Option<Contract>,
}

impl Account {
  pub fn with_balance(balance: U256) -> Self {
    Self {
      balance,
      ..Default::default()
    }
  }

  pub fn is_contract(&self) -> bool {
    self.code.is_some()
  }
}

/// Contract code known to the execution engine, together with the
/// storage that belongs to the deployed instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Contract {
  FundMe(FundMeStorage),
  MockV3Aggregator(AggregatorStorage),
}

impl Contract {
  pub fn name(&self) -> &'static str {
    match self {
      Contract::FundMe(_) => "FundMe",
      Contract::MockV3Aggregator(_) => "MockV3Aggregator",
    }
  }
}

/// Storage layout of a FundMe instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FundMeStorage {
  /// Set once by the constructor to the deploying address.
  pub owner: Address,

  /// ETH/USD price feed consulted when funding.
  pub price_feed: Address,

  /// Every successful `fund` call appends its sender, so an address
  /// that funds twice appears twice.
  pub funders: Vec<Address>,

  /// Accumulated contributions. Zero amounts are never stored, an
  /// absent key reads as zero.
  pub amounts: BTreeMap<Address, U256>,
}

impl FundMeStorage {
  pub fn new(owner: Address, price_feed: Address) -> Self {
    Self {
      owner,
      price_feed,
      funders: vec![],
      amounts: BTreeMap::new(),
    }
  }

  pub fn amount_funded(&self, funder: &Address) -> U256 {
    self.amounts.get(funder).copied().unwrap_or_default()
  }
}

/// A single price round reported by an aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
  #[serde(with = "crate::i256")]
  pub answer: I256,
  pub started_at: u64,
  pub updated_at: u64,
}

/// Storage layout of the mock Chainlink aggregator used on development
/// chains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregatorStorage {
  pub decimals: u8,
  pub latest_round: u64,
  pub rounds: BTreeMap<u64, Round>,
}

impl AggregatorStorage {
  pub fn new(decimals: u8) -> Self {
    Self {
      decimals,
      latest_round: 0,
      rounds: BTreeMap::new(),
    }
  }

  /// Round data for a given id. Unknown rounds read as all zeros, the
  /// same way an unset mapping slot would.
  pub fn round(&self, id: u64) -> Round {
    self.rounds.get(&id).copied().unwrap_or(Round {
      answer: I256::zero(),
      started_at: 0,
      updated_at: 0,
    })
  }
}
