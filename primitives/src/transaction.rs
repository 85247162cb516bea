use {
  crate::{Calldata, Output, Revert, ToHexString},
  ethers::{
    types::{Address, H256, U256},
    utils::keccak256,
  },
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
};

#[derive(Clone, Serialize, Deserialize)]
pub struct Transaction {
  pub from: Address,

  /// Recipient of the call, `None` for contract creation.
  pub to: Option<Address>,

  /// Must match the sender's account nonce at inclusion time.
  pub nonce: u64,

  /// Wei moved from the sender to the recipient.
  pub value: U256,

  pub gas_limit: u64,

  /// Price paid per unit of gas, in wei.
  pub gas_price: U256,

  pub input: Calldata,

  #[serde(skip)]
  hash_cache: OnceCell<H256>,
}

impl Transaction {
  pub fn new(
    from: Address,
    to: Option<Address>,
    nonce: u64,
    value: U256,
    gas_limit: u64,
    gas_price: U256,
    input: Calldata,
  ) -> Self {
    Self {
      from,
      to,
      nonce,
      value,
      gas_limit,
      gas_price,
      input,
      hash_cache: OnceCell::new(),
    }
  }

  pub fn hash(&self) -> &H256 {
    self.hash_cache.get_or_init(|| {
      H256(keccak256(
        rmp_serde::to_vec(self).expect("transaction is always serializable"),
      ))
    })
  }

  /// Upper bound of what the sender can be charged for this
  /// transaction: the transferred value plus the full gas allowance.
  pub fn max_cost(&self) -> Option<U256> {
    self
      .gas_price
      .checked_mul(U256::from(self.gas_limit))?
      .checked_add(self.value)
  }

  pub fn is_create(&self) -> bool {
    self.to.is_none()
  }
}

impl core::fmt::Debug for Transaction {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Transaction")
      .field("hash", &self.hash().to_hex())
      .field("from", &self.from.to_hex())
      .field("to", &self.to.map(|to| to.to_hex()))
      .field("nonce", &self.nonce)
      .field("value", &self.value)
      .field("input", &self.input.signature())
      .finish()
  }
}

/// Outcome of a transaction included in a block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
  pub transaction_hash: H256,
  pub transaction_index: u64,
  pub block_number: u64,
  pub block_hash: H256,
  pub from: Address,
  pub to: Option<Address>,

  /// Address of the created contract for successful deployments.
  pub contract_address: Option<Address>,

  pub gas_used: u64,
  pub effective_gas_price: U256,

  /// `true` if execution completed, `false` if it reverted.
  pub status: bool,

  pub output: Output,
  pub revert: Option<Revert>,
}

impl Receipt {
  /// Total fee paid by the sender, in wei.
  pub fn gas_cost(&self) -> U256 {
    U256::from(self.gas_used) * self.effective_gas_price
  }
}

#[cfg(test)]
mod tests {
  use {
    super::Transaction,
    crate::{Calldata, FundMeCall},
    ethers::types::{Address, U256},
  };

  #[test]
  fn hash_covers_all_fields() {
    let tx = |nonce| {
      Transaction::new(
        Address::repeat_byte(1),
        Some(Address::repeat_byte(2)),
        nonce,
        U256::exp10(18),
        100_000,
        U256::from(1_000_000_000u64),
        Calldata::FundMe(FundMeCall::Fund),
      )
    };

    assert_eq!(tx(0).hash(), tx(0).hash());
    assert_ne!(tx(0).hash(), tx(1).hash());
  }

  #[test]
  fn max_cost_includes_gas_allowance() {
    let tx = Transaction::new(
      Address::repeat_byte(1),
      None,
      0,
      U256::from(5),
      10,
      U256::from(3),
      Calldata::Empty,
    );
    assert_eq!(tx.max_cost(), Some(U256::from(35)));
    assert!(tx.is_create());
  }
}
