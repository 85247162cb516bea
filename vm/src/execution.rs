use {
  crate::{
    contracts::{move_value, Frame},
    gas::{GasMeter, TX_BASE, TX_CREATE},
    Overlay,
    State,
    StateDiff,
  },
  ethers::utils::get_contract_address,
  fundme_primitives::{
    Account,
    Address,
    Calldata,
    Output,
    Revert,
    ToHexString,
    Transaction,
    U256,
  },
  thiserror::Error,
  tracing::debug,
};

/// Default gas limit of a block.
pub const BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Block level values visible to contracts.
#[derive(Debug, Clone)]
pub struct BlockEnv {
  pub number: u64,
  pub timestamp: u64,
  pub coinbase: Address,
  pub gas_limit: u64,
}

/// Reasons a transaction is invalid and cannot be included in a block
/// at all. Unlike a [`Revert`], a rejected transaction has no effect on
/// state, not even on the sender's nonce.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Invalid nonce for {0:?}: expected {1}, got {2}")]
  InvalidNonce(Address, u64, u64),

  #[error(
    "Sender {0:?} doesn't have enough funds to send tx. Required {1}, \
     available {2}"
  )]
  InsufficientFunds(Address, U256, U256),

  #[error("Intrinsic gas too low: limit {0}, required {1}")]
  IntrinsicGasTooLow(u64, u64),

  #[error("Transaction gas limit {0} exceeds block gas limit {1}")]
  GasLimitExceeded(u64, u64),

  #[error("Sender {0:?} is a contract account")]
  SenderNotExternallyOwned(Address),

  #[error(
    "Contract creation must have no recipient and constructor input, \
     and only contract creation may carry constructor input"
  )]
  MalformedCreate,

  #[error("Transaction cost overflows")]
  CostOverflow,
}

/// Result of executing a valid transaction.
#[derive(Debug)]
pub struct Execution {
  /// Account changes to apply. Always contains at least the sender's
  /// nonce increment and fee payment, even if execution reverted.
  pub diff: StateDiff,
  pub gas_used: u64,
  pub result: Result<Output, Revert>,

  /// Address of the created contract for successful deployments.
  pub contract_address: Option<Address>,
}

impl Execution {
  pub fn succeeded(&self) -> bool {
    self.result.is_ok()
  }
}

pub fn intrinsic_gas(tx: &Transaction) -> u64 {
  match tx.is_create() {
    true => TX_BASE + TX_CREATE,
    false => TX_BASE,
  }
}

/// Executes a transaction.
///
/// Validates the transaction against the current state, then runs it
/// and returns a StateDiff object that can be applied to the state.
/// If the contract code reverts, all its effects are discarded but the
/// sender still pays for the gas consumed and its nonce is incremented.
pub fn execute(
  tx: &Transaction,
  state: &dyn State,
  env: &BlockEnv,
) -> Result<Execution, Error> {
  let sender = validate(tx, state, env)?;

  // the whole gas allowance is reserved up front
  // and the unused part is refunded at the end.
  let prepaid = U256::from(tx.gas_limit) * tx.gas_price;
  let mut outer = Overlay::new(state);
  outer.set(tx.from, Account {
    balance: sender.balance - prepaid,
    nonce: sender.nonce + 1,
    code: None,
  });

  let mut gas = GasMeter::new(tx.gas_limit);
  gas.warm_up(tx.from);
  if let Some(to) = tx.to {
    gas.warm_up(to);
  }

  let (result, diff) = {
    let mut inner = Overlay::new(&outer);
    let result = run(tx, &mut inner, &mut gas, env);
    (result, inner.into_diff())
  };

  let (result, contract_address) = match result {
    Ok((output, created)) => {
      outer.apply(diff);
      (Ok(output), created)
    }
    Err(revert) => (Err(revert), None),
  };

  let gas_used = gas.used();
  let refund = U256::from(tx.gas_limit - gas_used) * tx.gas_price;
  let mut sender = outer.account(&tx.from);
  sender.balance = sender.balance.saturating_add(refund);
  outer.set(tx.from, sender);

  let fee = U256::from(gas_used) * tx.gas_price;
  let mut coinbase = outer.account(&env.coinbase);
  coinbase.balance = coinbase.balance.saturating_add(fee);
  outer.set(env.coinbase, coinbase);

  debug!(
    "tx {} {} used {gas_used} gas: {result:?}",
    tx.hash().to_hex(),
    tx.input.signature()
  );

  Ok(Execution {
    diff: outer.into_diff(),
    gas_used,
    result,
    contract_address,
  })
}

/// Read-only message call against a given state.
///
/// Nothing is charged and no state is changed, the call is evaluated
/// with the block gas limit as its allowance.
pub fn call(
  from: Address,
  to: Address,
  value: U256,
  input: &Calldata,
  state: &dyn State,
  env: &BlockEnv,
) -> Result<Output, Revert> {
  let mut overlay = Overlay::new(state);
  let mut gas = GasMeter::new(env.gas_limit);
  gas.warm_up(from);
  gas.warm_up(to);
  move_value(&mut overlay, from, to, value)?;

  Frame {
    state: &mut overlay,
    gas: &mut gas,
    env,
    caller: from,
    this: to,
    value,
    read_only: false,
  }
  .enter(input)
}

fn validate(
  tx: &Transaction,
  state: &dyn State,
  env: &BlockEnv,
) -> Result<Account, Error> {
  match (&tx.to, &tx.input) {
    (None, Calldata::Deploy(_)) => {}
    (None, _) | (Some(_), Calldata::Deploy(_)) => {
      return Err(Error::MalformedCreate)
    }
    _ => {}
  }

  let sender = state.get(&tx.from).unwrap_or_default();
  if sender.is_contract() {
    return Err(Error::SenderNotExternallyOwned(tx.from));
  }

  if sender.nonce != tx.nonce {
    return Err(Error::InvalidNonce(tx.from, sender.nonce, tx.nonce));
  }

  if tx.gas_limit > env.gas_limit {
    return Err(Error::GasLimitExceeded(tx.gas_limit, env.gas_limit));
  }

  let intrinsic = intrinsic_gas(tx);
  if tx.gas_limit < intrinsic {
    return Err(Error::IntrinsicGasTooLow(tx.gas_limit, intrinsic));
  }

  let max_cost = tx.max_cost().ok_or(Error::CostOverflow)?;
  if sender.balance < max_cost {
    return Err(Error::InsufficientFunds(tx.from, max_cost, sender.balance));
  }

  Ok(sender)
}

fn run(
  tx: &Transaction,
  state: &mut Overlay<'_>,
  gas: &mut GasMeter,
  env: &BlockEnv,
) -> Result<(Output, Option<Address>), Revert> {
  gas.charge(intrinsic_gas(tx))?;

  let (this, created) = match (tx.to, &tx.input) {
    (Some(to), _) => (to, None),
    (None, _) => {
      let address = get_contract_address(tx.from, tx.nonce);
      gas.warm_up(address);
      (address, Some(address))
    }
  };

  move_value(state, tx.from, this, tx.value)?;

  let mut frame = Frame {
    state,
    gas,
    env,
    caller: tx.from,
    this,
    value: tx.value,
    read_only: false,
  };

  match &tx.input {
    Calldata::Deploy(bytecode) => {
      frame.construct(bytecode)?;
      debug!("deployed {} at {}", bytecode.contract_name(), this.to_hex());
      Ok((Output::Address(this), created))
    }
    input => Ok((frame.enter(input)?, created)),
  }
}
