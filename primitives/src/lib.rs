mod account;
mod block;
mod calldata;
mod hexstr;
mod i256;
mod revert;
mod transaction;

pub use {
  account::{Account, AggregatorStorage, Contract, FundMeStorage, Round},
  block::Block,
  calldata::{AggregatorCall, Bytecode, Calldata, FundMeCall, Output, RoundData},
  ethers::{
    types::{Address, H256, I256, U256},
    utils::{format_ether, keccak256, parse_ether},
  },
  hexstr::ToHexString,
  revert::{PanicCode, Revert},
  transaction::{Receipt, Transaction},
};
