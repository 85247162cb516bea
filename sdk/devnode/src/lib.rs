mod error;
mod genesis;
mod mempool;
mod node;
mod storage;

pub use {
  error::Error,
  genesis::{
    development_accounts,
    Genesis,
    DEVELOPMENT_CHAIN_ID,
    DEVELOPMENT_COINBASE,
    DEVELOPMENT_SEED,
  },
  mempool::Mempool,
  node::{
    Devnode,
    Mining,
    NodeConfig,
    TransactionRequest,
    DEFAULT_GAS_PRICE,
  },
  storage::{Deployment, InMemoryStorage, OnDiskStorage, Storage},
};
