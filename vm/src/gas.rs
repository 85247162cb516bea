use {
  fundme_primitives::{Address, Revert},
  std::collections::HashSet,
};

/// Base cost of every transaction.
pub const TX_BASE: u64 = 21_000;

/// Additional base cost of a contract creation transaction.
pub const TX_CREATE: u64 = 32_000;

/// First read of a storage slot within a transaction.
pub const COLD_SLOAD: u64 = 2_100;

/// Every further read or write of an already accessed slot.
pub const WARM_ACCESS: u64 = 100;

/// Writing a non-zero value into a zero slot.
pub const SSTORE_SET: u64 = 20_000;

/// Any other write that changes a slot.
pub const SSTORE_RESET: u64 = 2_900;

/// First access of another account within a transaction.
pub const COLD_ACCOUNT_ACCESS: u64 = 2_600;

/// Surcharge of a message call that carries value.
pub const CALL_VALUE: u64 = 9_000;

/// `address(this).balance`
pub const SELF_BALANCE: u64 = 5;

/// Storage slots of the contracts known to the engine.
///
/// Slots are scoped by the contract address when tracked by the gas
/// meter, so the same slot name in two instances is two different
/// slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  PriceFeed,
  FundersLength,
  Funder(usize),
  AmountFunded(Address),
  Decimals,
  LatestRound,
  Round(u64),
}

/// Tracks gas consumption of a single transaction.
///
/// Storage and account access follow the warm/cold model: the first
/// access of a slot or account within a transaction is expensive and
/// every further access is cheap.
#[derive(Debug)]
pub struct GasMeter {
  limit: u64,
  used: u64,
  warm_slots: HashSet<(Address, Slot)>,
  warm_accounts: HashSet<Address>,
}

impl GasMeter {
  pub fn new(limit: u64) -> Self {
    Self {
      limit,
      used: 0,
      warm_slots: HashSet::new(),
      warm_accounts: HashSet::new(),
    }
  }

  pub fn used(&self) -> u64 {
    self.used
  }

  pub fn limit(&self) -> u64 {
    self.limit
  }

  /// Consumes a given amount of gas.
  ///
  /// Running out of gas consumes the entire limit.
  pub fn charge(&mut self, amount: u64) -> Result<(), Revert> {
    match self.used.checked_add(amount) {
      Some(total) if total <= self.limit => {
        self.used = total;
        Ok(())
      }
      _ => {
        self.used = self.limit;
        Err(Revert::OutOfGas)
      }
    }
  }

  /// Marks accounts that are warm from the start of the transaction,
  /// the sender and the recipient.
  pub fn warm_up(&mut self, address: Address) {
    self.warm_accounts.insert(address);
  }

  pub fn sload(&mut self, contract: Address, slot: Slot) -> Result<(), Revert> {
    let cost = self.slot_access_cost(contract, slot);
    self.charge(cost)
  }

  /// Charges a storage write given whether the slot held zero before
  /// the write and whether it holds zero after it.
  pub fn sstore(
    &mut self,
    contract: Address,
    slot: Slot,
    was_zero: bool,
    is_zero: bool,
  ) -> Result<(), Revert> {
    let cold = match self.warm_slots.insert((contract, slot)) {
      true => COLD_SLOAD,
      false => 0,
    };
    let write = match (was_zero, is_zero) {
      (true, true) => WARM_ACCESS,
      (true, false) => SSTORE_SET,
      (false, _) => SSTORE_RESET,
    };
    self.charge(cold + write)
  }

  pub fn account_access(&mut self, address: Address) -> Result<(), Revert> {
    let cost = match self.warm_accounts.insert(address) {
      true => COLD_ACCOUNT_ACCESS,
      false => WARM_ACCESS,
    };
    self.charge(cost)
  }

  fn slot_access_cost(&mut self, contract: Address, slot: Slot) -> u64 {
    match self.warm_slots.insert((contract, slot)) {
      true => COLD_SLOAD,
      false => WARM_ACCESS,
    }
  }
}
