//! Crowd-funding contract.
//!
//! Anyone can fund the contract with at least 50 USD worth of ether,
//! valued through an ETH/USD price feed. Only the deploying address can
//! withdraw, which sweeps the whole balance and forgets all funders.

use {
  super::{price, Frame},
  crate::gas::Slot,
  fundme_primitives::{
    Address,
    AggregatorCall,
    Calldata,
    Contract,
    FundMeCall,
    FundMeStorage,
    Output,
    PanicCode,
    Revert,
    RoundData,
    U256,
  },
};

pub const NOT_OWNER: &str = "FundMe__NotOwner";
pub const NOT_ENOUGH_ETH: &str = "You need to spend more ETH!";

pub(crate) fn constructor(
  frame: &mut Frame,
  price_feed: Address,
) -> Result<FundMeStorage, Revert> {
  frame.non_payable("constructor")?;
  frame.sstore(Slot::PriceFeed, true, price_feed.is_zero())?;
  Ok(FundMeStorage::new(frame.caller, price_feed))
}

pub(crate) fn dispatch(
  frame: &mut Frame,
  mut storage: FundMeStorage,
  input: &Calldata,
) -> Result<Output, Revert> {
  let call = match input {
    Calldata::FundMe(call) => call.clone(),
    // receive() and fallback() both forward to fund()
    Calldata::Empty => FundMeCall::Fund,
    other => {
      return Err(Revert::UnknownCall(
        other.signature().to_owned(),
        "FundMe".to_owned(),
      ))
    }
  };

  if !call.is_payable() {
    frame.non_payable(call.signature())?;
  }

  match call {
    FundMeCall::Fund => {
      fund(frame, &mut storage)?;
      frame.store(Contract::FundMe(storage));
      Ok(Output::None)
    }
    FundMeCall::Withdraw => {
      withdraw(frame, storage, false)?;
      Ok(Output::None)
    }
    FundMeCall::CheaperWithdraw => {
      withdraw(frame, storage, true)?;
      Ok(Output::None)
    }
    FundMeCall::GetAddressToAmountFunded(funder) => {
      frame.sload(Slot::AmountFunded(funder))?;
      Ok(Output::Uint(storage.amount_funded(&funder)))
    }
    FundMeCall::GetFunder(index) => {
      frame.sload(Slot::FundersLength)?;
      if index >= U256::from(storage.funders.len()) {
        return Err(Revert::Panic(PanicCode::IndexOutOfBounds));
      }
      let index = index.as_usize();
      frame.sload(Slot::Funder(index))?;
      Ok(Output::Address(storage.funders[index]))
    }
    FundMeCall::GetOwner => Ok(Output::Address(storage.owner)),
    FundMeCall::GetPriceFeed => {
      frame.sload(Slot::PriceFeed)?;
      Ok(Output::Address(storage.price_feed))
    }
    FundMeCall::GetVersion => {
      frame.sload(Slot::PriceFeed)?;
      frame.static_call(storage.price_feed, AggregatorCall::Version.into())
    }
  }
}

fn latest_round(
  frame: &mut Frame,
  price_feed: Address,
) -> Result<RoundData, Revert> {
  frame
    .static_call(price_feed, AggregatorCall::LatestRoundData.into())?
    .into_round_data()
    .ok_or_else(|| {
      Revert::UnknownCall(
        AggregatorCall::LatestRoundData.signature().to_owned(),
        "price feed".to_owned(),
      )
    })
}

fn fund(frame: &mut Frame, storage: &mut FundMeStorage) -> Result<(), Revert> {
  frame.sload(Slot::PriceFeed)?;
  let round = latest_round(frame, storage.price_feed)?;
  let usd = price::conversion_rate(frame.value, price::eth_price(&round)?)?;
  if usd < price::minimum_usd() {
    return Err(Revert::message(NOT_ENOUGH_ETH));
  }

  let funder = frame.caller;
  frame.sload(Slot::AmountFunded(funder))?;
  let previous = storage.amount_funded(&funder);
  let updated = previous
    .checked_add(frame.value)
    .ok_or(Revert::Panic(PanicCode::ArithmeticOverflow))?;
  frame.sstore(Slot::AmountFunded(funder), previous.is_zero(), false)?;
  storage.amounts.insert(funder, updated);

  frame.sload(Slot::FundersLength)?;
  let length = storage.funders.len();
  frame.sstore(Slot::FundersLength, length == 0, false)?;
  frame.sstore(Slot::Funder(length), true, funder.is_zero())?;
  storage.funders.push(funder);
  Ok(())
}

/// Sweeps the contract balance to the owner.
///
/// Both variants reset every funder's record and clear the funders
/// list. The plain variant re-reads the list length from storage on
/// every loop iteration, the cheaper one copies the list into memory
/// up front.
fn withdraw(
  frame: &mut Frame,
  mut storage: FundMeStorage,
  cheaper: bool,
) -> Result<(), Revert> {
  if frame.caller != storage.owner {
    return Err(Revert::custom(NOT_OWNER));
  }

  frame.sload(Slot::FundersLength)?;
  let funders = storage.funders.clone();
  if cheaper {
    for index in 0..funders.len() {
      frame.sload(Slot::Funder(index))?;
    }
  }

  for (index, funder) in funders.iter().enumerate() {
    if !cheaper {
      // loop condition, then the bounds check of `s_funders[index]`
      frame.sload(Slot::FundersLength)?;
      frame.sload(Slot::FundersLength)?;
      frame.sload(Slot::Funder(index))?;
    }
    let previous = storage.amount_funded(funder);
    frame.sstore(Slot::AmountFunded(*funder), previous.is_zero(), true)?;
    storage.amounts.remove(funder);
  }

  if !cheaper {
    // final failing loop condition
    frame.sload(Slot::FundersLength)?;
  }

  // replacing the array with an empty one zeroes every element
  for (index, funder) in funders.iter().enumerate() {
    frame.sstore(Slot::Funder(index), funder.is_zero(), true)?;
  }
  frame.sstore(Slot::FundersLength, funders.is_empty(), true)?;
  storage.funders.clear();

  let balance = frame.self_balance()?;
  let owner = storage.owner;

  // effects are committed before the external call
  frame.store(Contract::FundMe(storage));
  frame.transfer(owner, balance)
}
