mod contracts;
mod execution;
mod gas;
mod state;

pub use {
  contracts::{conversion_rate, eth_price, minimum_usd},
  execution::{
    call,
    execute,
    intrinsic_gas,
    BlockEnv,
    Error,
    Execution,
    BLOCK_GAS_LIMIT,
  },
  gas::GasMeter,
  state::{InMemoryStateStore, Overlay, State, StateDiff},
};

/// Names and messages of the errors raised by the deployed contracts.
pub mod errors {
  pub use crate::contracts::{NOT_ENOUGH_ETH, NOT_OWNER};
}
