use {
  crate::{ToHexString, Transaction},
  ethers::{
    types::{Address, H256},
    utils::keccak256,
  },
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
};

#[derive(Clone, Serialize, Deserialize)]
pub struct Block {
  pub number: u64,
  pub parent: H256,

  /// Seconds since the unix epoch.
  pub timestamp: u64,

  /// Recipient of the gas fees paid by the block's transactions.
  pub coinbase: Address,

  pub transactions: Vec<Transaction>,

  #[serde(skip)]
  hash_cache: OnceCell<H256>,
}

impl Block {
  pub fn new(
    parent: &Block,
    timestamp: u64,
    coinbase: Address,
    transactions: Vec<Transaction>,
  ) -> Self {
    Self {
      number: parent.number + 1,
      parent: *parent.hash(),
      // block timestamps never go back in time
      timestamp: timestamp.max(parent.timestamp + 1),
      coinbase,
      transactions,
      hash_cache: Default::default(),
    }
  }

  pub fn genesis(timestamp: u64, coinbase: Address) -> Self {
    Self {
      number: 0,
      parent: H256::zero(),
      timestamp,
      coinbase,
      transactions: vec![],
      hash_cache: OnceCell::new(),
    }
  }

  pub fn hash(&self) -> &H256 {
    self.hash_cache.get_or_init(|| {
      H256(keccak256(
        rmp_serde::to_vec(self).expect("block is always serializable"),
      ))
    })
  }
}

impl core::fmt::Debug for Block {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Block")
      .field("number", &self.number)
      .field("parent", &self.parent.to_hex())
      .field("hash", &self.hash().to_hex())
      .field("timestamp", &self.timestamp)
      .field("transactions", &self.transactions)
      .finish()
  }
}
