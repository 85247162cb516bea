use {
  ethers::{types::Address, utils::keccak256},
  serde::{Deserialize, Serialize},
  thiserror::Error,
};

/// Solidity panic codes raised by checked arithmetic and array access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PanicCode {
  ArithmeticOverflow,
  DivisionByZero,
  IndexOutOfBounds,
}

impl PanicCode {
  pub fn code(&self) -> u8 {
    match self {
      PanicCode::ArithmeticOverflow => 0x11,
      PanicCode::DivisionByZero => 0x12,
      PanicCode::IndexOutOfBounds => 0x32,
    }
  }
}

/// Reason a contract execution was reverted.
///
/// A revert undoes every state change made by the call, except for the
/// sender's nonce increment and the gas fee, which are always kept for
/// transactions included in a block.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum Revert {
  /// `require(cond, "message")` or `revert("message")`.
  #[error("reverted with reason string '{0}'")]
  Error(String),

  /// `revert SomeError()` with a custom error declared by the contract.
  #[error("reverted with custom error '{0}()'")]
  Custom(String),

  #[error("reverted with panic code {:#04x}", .0.code())]
  Panic(PanicCode),

  #[error("ran out of gas")]
  OutOfGas,

  #[error("non-payable function '{0}' was sent value")]
  NonPayable(String),

  #[error("call to non-contract account {0:?}")]
  NoCode(Address),

  #[error("function '{0}' not found on {1}")]
  UnknownCall(String, String),

  #[error("native value transfer failed")]
  TransferFailed,

  #[error("state modification attempted during a static call")]
  WriteProtection,
}

impl Revert {
  pub fn custom(name: &str) -> Self {
    Revert::Custom(name.to_owned())
  }

  pub fn message(msg: &str) -> Self {
    Revert::Error(msg.to_owned())
  }

  /// Four byte selector of the revert payload, the way it would appear
  /// at the start of the EVM return data. `None` for reverts that carry
  /// no data, such as running out of gas.
  pub fn selector(&self) -> Option<[u8; 4]> {
    let signature = match self {
      Revert::Error(_) => "Error(string)".to_owned(),
      Revert::Custom(name) => format!("{name}()"),
      Revert::Panic(_) => "Panic(uint256)".to_owned(),
      _ => return None,
    };
    let hash = keccak256(signature.as_bytes());
    Some([hash[0], hash[1], hash[2], hash[3]])
  }

  pub fn is_custom(&self, name: &str) -> bool {
    matches!(self, Revert::Custom(n) if n == name)
  }

  pub fn is_message(&self, msg: &str) -> bool {
    matches!(self, Revert::Error(m) if m == msg)
  }
}
