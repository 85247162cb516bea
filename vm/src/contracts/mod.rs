use {
  crate::{
    gas::{GasMeter, Slot, CALL_VALUE, SELF_BALANCE},
    BlockEnv,
    Overlay,
  },
  fundme_primitives::{Address, Bytecode, Calldata, Contract, Output, Revert, U256},
};

mod aggregator;
mod fund_me;
mod price;

pub use {
  fund_me::{NOT_ENOUGH_ETH, NOT_OWNER},
  price::{conversion_rate, eth_price, minimum_usd},
};

/// Execution context of a single contract invocation.
///
/// A frame is created for every message call, including calls between
/// contracts. Storage of the invoked contract is loaded out of the
/// account state when the call starts and written back by the contract
/// code through [`Frame::store`] once it mutated it.
pub(crate) struct Frame<'a, 's> {
  pub state: &'a mut Overlay<'s>,
  pub gas: &'a mut GasMeter,
  pub env: &'a BlockEnv,

  /// `msg.sender`
  pub caller: Address,

  /// `address(this)`
  pub this: Address,

  /// `msg.value`, already credited to `this`.
  pub value: U256,

  /// Set for static calls, any storage write or value transfer reverts.
  pub read_only: bool,
}

impl<'a, 's> Frame<'a, 's> {
  /// Runs the code deployed at `this` with a given input.
  ///
  /// Calls to accounts without code succeed with no output, the same
  /// way a call to an externally owned account does.
  pub fn enter(&mut self, input: &Calldata) -> Result<Output, Revert> {
    match self.state.account(&self.this).code {
      Some(Contract::FundMe(storage)) => fund_me::dispatch(self, storage, input),
      Some(Contract::MockV3Aggregator(storage)) => {
        aggregator::dispatch(self, storage, input)
      }
      None => Ok(Output::None),
    }
  }

  /// Runs the constructor of a contract and installs its code and
  /// initial storage at `this`.
  pub fn construct(&mut self, bytecode: &Bytecode) -> Result<(), Revert> {
    let contract = match bytecode {
      Bytecode::FundMe { price_feed } => {
        Contract::FundMe(fund_me::constructor(self, *price_feed)?)
      }
      Bytecode::MockV3Aggregator {
        decimals,
        initial_answer,
      } => Contract::MockV3Aggregator(aggregator::constructor(
        self,
        *decimals,
        *initial_answer,
      )?),
    };
    self.store(contract);
    Ok(())
  }

  pub fn sload(&mut self, slot: Slot) -> Result<(), Revert> {
    self.gas.sload(self.this, slot)
  }

  pub fn sstore(
    &mut self,
    slot: Slot,
    was_zero: bool,
    is_zero: bool,
  ) -> Result<(), Revert> {
    if self.read_only {
      return Err(Revert::WriteProtection);
    }
    self.gas.sstore(self.this, slot, was_zero, is_zero)
  }

  pub fn non_payable(&self, signature: &str) -> Result<(), Revert> {
    match self.value.is_zero() {
      true => Ok(()),
      false => Err(Revert::NonPayable(signature.to_owned())),
    }
  }

  pub fn self_balance(&mut self) -> Result<U256, Revert> {
    self.gas.charge(SELF_BALANCE)?;
    Ok(self.state.account(&self.this).balance)
  }

  /// Writes contract storage back into the account at `this`, keeping
  /// whatever balance the account holds at this point.
  pub fn store(&mut self, contract: Contract) {
    let mut account = self.state.account(&self.this);
    account.code = Some(contract);
    self.state.set(self.this, account);
  }

  /// Sends value from `this` to another account.
  ///
  /// If the recipient is a contract, its `receive()` entry point runs
  /// in a nested frame and a revert there fails the transfer.
  pub fn transfer(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
    if self.read_only && !amount.is_zero() {
      return Err(Revert::WriteProtection);
    }

    self.gas.account_access(to)?;
    if !amount.is_zero() {
      self.gas.charge(CALL_VALUE)?;
    }

    move_value(self.state, self.this, to, amount)?;

    let mut frame = Frame {
      state: &mut *self.state,
      gas: &mut *self.gas,
      env: self.env,
      caller: self.this,
      this: to,
      value: amount,
      read_only: false,
    };

    frame.enter(&Calldata::Empty).map(|_| ()).map_err(|e| match e {
      Revert::OutOfGas => Revert::OutOfGas,
      _ => Revert::TransferFailed,
    })
  }

  /// Read-only call into another contract, reverts if the target
  /// has no code.
  pub fn static_call(
    &mut self,
    to: Address,
    input: Calldata,
  ) -> Result<Output, Revert> {
    self.gas.account_access(to)?;
    if !self.state.account(&to).is_contract() {
      return Err(Revert::NoCode(to));
    }

    let mut frame = Frame {
      state: &mut *self.state,
      gas: &mut *self.gas,
      env: self.env,
      caller: self.this,
      this: to,
      value: U256::zero(),
      read_only: true,
    };
    frame.enter(&input)
  }
}

/// Moves wei between two accounts.
pub(crate) fn move_value(
  state: &mut Overlay<'_>,
  from: Address,
  to: Address,
  amount: U256,
) -> Result<(), Revert> {
  if amount.is_zero() || from == to {
    return Ok(());
  }

  let mut sender = state.account(&from);
  sender.balance = sender
    .balance
    .checked_sub(amount)
    .ok_or(Revert::TransferFailed)?;
  state.set(from, sender);

  let mut recipient = state.account(&to);
  recipient.balance = recipient
    .balance
    .checked_add(amount)
    .ok_or(Revert::TransferFailed)?;
  state.set(to, recipient);
  Ok(())
}
