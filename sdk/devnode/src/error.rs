use {
  fundme_primitives::{Address, Revert, H256},
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Transaction rejected: {0}")]
  Rejected(#[from] fundme_vm::Error),

  #[error("Transaction {0}")]
  Reverted(#[from] Revert),

  #[error("Account {0:?} is not managed by this node, it cannot sign")]
  UnknownAccount(Address),

  #[error("Transaction {0:?} is neither mined nor pending")]
  UnknownTransaction(H256),

  #[error("Snapshot {0} does not exist")]
  UnknownSnapshot(usize),

  #[error("Snapshots are only supported by ephemeral storage")]
  SnapshotUnsupported,

  #[error("Storage error: {0}")]
  Storage(#[from] sled::Error),

  #[error("Record encoding error: {0}")]
  Encoding(#[from] rmp_serde::encode::Error),

  #[error("Record decoding error: {0}")]
  Decoding(#[from] rmp_serde::decode::Error),

  #[error("Invalid development seed: {0}")]
  Seed(#[from] ethers::signers::coins_bip39::MnemonicError),

  #[error("Corrupt storage: {0}")]
  Corrupt(String),

  #[error("Devnode stopped")]
  Stopped,
}
