mod accounts;
mod config;
mod contract;
pub mod deployments;
mod error;
mod network;

pub use {
  accounts::{signers, NamedAccounts},
  config::{
    initial_answer,
    NetworkConfig,
    NetworkKind,
    DECIMALS,
    DEVELOPMENT_CHAINS,
    INITIAL_ANSWER,
  },
  contract::{FundMe, MockV3Aggregator, PendingTransaction},
  error::Error,
  fundme_devnode::{Deployment, Devnode, Mining},
  fundme_primitives::{format_ether, parse_ether, Address, Receipt, U256},
  network::Network,
};

/// Revert reasons of the FundMe contract.
pub mod errors {
  pub use fundme_vm::errors::{NOT_ENOUGH_ETH, NOT_OWNER};
}
