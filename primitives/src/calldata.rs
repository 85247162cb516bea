use {
  ethers::types::{Address, I256, U256},
  serde::{Deserialize, Serialize},
};

/// Constructor input of a contract creation transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Bytecode {
  FundMe {
    price_feed: Address,
  },
  MockV3Aggregator {
    decimals: u8,
    #[serde(with = "crate::i256")]
    initial_answer: I256,
  },
}

impl Bytecode {
  pub fn contract_name(&self) -> &'static str {
    match self {
      Bytecode::FundMe { .. } => "FundMe",
      Bytecode::MockV3Aggregator { .. } => "MockV3Aggregator",
    }
  }
}

/// Entry points of the FundMe contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FundMeCall {
  /// `fund()`, payable.
  Fund,

  /// `withdraw()`, owner only.
  Withdraw,

  /// `c_withdrawal()`, owner only. Same effect as `Withdraw` but
  /// reads the funders list from storage once.
  CheaperWithdraw,

  /// `getAddressToAmountFunded(address)`
  GetAddressToAmountFunded(Address),

  /// `getFunder(uint256)`
  GetFunder(U256),

  /// `getOwner()`
  GetOwner,

  /// `getPriceFeed()`
  GetPriceFeed,

  /// `getVersion()`, forwarded to the price feed.
  GetVersion,
}

impl FundMeCall {
  /// Solidity function name, used in logs.
  pub fn signature(&self) -> &'static str {
    match self {
      FundMeCall::Fund => "fund()",
      FundMeCall::Withdraw => "withdraw()",
      FundMeCall::CheaperWithdraw => "c_withdrawal()",
      FundMeCall::GetAddressToAmountFunded(_) => {
        "getAddressToAmountFunded(address)"
      }
      FundMeCall::GetFunder(_) => "getFunder(uint256)",
      FundMeCall::GetOwner => "getOwner()",
      FundMeCall::GetPriceFeed => "getPriceFeed()",
      FundMeCall::GetVersion => "getVersion()",
    }
  }

  pub fn is_payable(&self) -> bool {
    matches!(self, FundMeCall::Fund)
  }
}

/// Entry points of the mock V3 aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AggregatorCall {
  Decimals,
  Description,
  Version,
  LatestRoundData,
  GetRoundData(u64),
  UpdateAnswer(#[serde(with = "crate::i256")] I256),
  UpdateRoundData {
    round_id: u64,
    #[serde(with = "crate::i256")]
    answer: I256,
    timestamp: u64,
    started_at: u64,
  },
}

impl AggregatorCall {
  pub fn signature(&self) -> &'static str {
    match self {
      AggregatorCall::Decimals => "decimals()",
      AggregatorCall::Description => "description()",
      AggregatorCall::Version => "version()",
      AggregatorCall::LatestRoundData => "latestRoundData()",
      AggregatorCall::GetRoundData(_) => "getRoundData(uint80)",
      AggregatorCall::UpdateAnswer(_) => "updateAnswer(int256)",
      AggregatorCall::UpdateRoundData { .. } => {
        "updateRoundData(uint80,int256,uint256,uint256)"
      }
    }
  }
}

/// Input of a transaction or a read-only call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Calldata {
  /// Plain value transfer. Routed to `receive()` when the recipient
  /// is a contract.
  #[default]
  Empty,

  /// Contract creation, only valid when the transaction has no
  /// recipient.
  Deploy(Bytecode),

  FundMe(FundMeCall),
  Aggregator(AggregatorCall),
}

impl Calldata {
  pub fn signature(&self) -> &'static str {
    match self {
      Calldata::Empty => "receive()",
      Calldata::Deploy(_) => "constructor",
      Calldata::FundMe(call) => call.signature(),
      Calldata::Aggregator(call) => call.signature(),
    }
  }
}

impl From<FundMeCall> for Calldata {
  fn from(call: FundMeCall) -> Self {
    Calldata::FundMe(call)
  }
}

impl From<AggregatorCall> for Calldata {
  fn from(call: AggregatorCall) -> Self {
    Calldata::Aggregator(call)
  }
}

/// The tuple returned by `latestRoundData()` and `getRoundData(uint80)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundData {
  pub round_id: u64,
  #[serde(with = "crate::i256")]
  pub answer: I256,
  pub started_at: u64,
  pub updated_at: u64,
  pub answered_in_round: u64,
}

/// Decoded return value of a contract call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Output {
  #[default]
  None,
  Address(Address),
  Uint(U256),
  Uint8(u8),
  Text(String),
  RoundData(RoundData),
}

impl Output {
  pub fn into_address(self) -> Option<Address> {
    match self {
      Output::Address(addr) => Some(addr),
      _ => None,
    }
  }

  pub fn into_uint(self) -> Option<U256> {
    match self {
      Output::Uint(value) => Some(value),
      _ => None,
    }
  }

  pub fn into_uint8(self) -> Option<u8> {
    match self {
      Output::Uint8(value) => Some(value),
      _ => None,
    }
  }

  pub fn into_text(self) -> Option<String> {
    match self {
      Output::Text(value) => Some(value),
      _ => None,
    }
  }

  pub fn into_round_data(self) -> Option<RoundData> {
    match self {
      Output::RoundData(value) => Some(value),
      _ => None,
    }
  }
}
