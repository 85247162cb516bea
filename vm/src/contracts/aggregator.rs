//! Mock of a Chainlink V3 aggregator.
//!
//! Deployed on development chains in place of a real ETH/USD feed.
//! Anyone can push a new answer.

use {
  super::Frame,
  crate::gas::Slot,
  fundme_primitives::{
    AggregatorCall,
    AggregatorStorage,
    Calldata,
    Contract,
    Output,
    PanicCode,
    Revert,
    Round,
    RoundData,
    I256,
    U256,
  },
};

pub const DESCRIPTION: &str = "v0.6/tests/MockV3Aggregator.sol";
pub const VERSION: u64 = 0;

pub(crate) fn constructor(
  frame: &mut Frame,
  decimals: u8,
  initial_answer: I256,
) -> Result<AggregatorStorage, Revert> {
  frame.non_payable("constructor")?;
  let mut storage = AggregatorStorage::new(decimals);
  frame.sstore(Slot::Decimals, true, decimals == 0)?;
  update_answer(frame, &mut storage, initial_answer)?;
  Ok(storage)
}

pub(crate) fn dispatch(
  frame: &mut Frame,
  mut storage: AggregatorStorage,
  input: &Calldata,
) -> Result<Output, Revert> {
  let call = match input {
    Calldata::Aggregator(call) => call,
    other => {
      return Err(Revert::UnknownCall(
        other.signature().to_owned(),
        "MockV3Aggregator".to_owned(),
      ))
    }
  };

  frame.non_payable(call.signature())?;

  match *call {
    AggregatorCall::Decimals => {
      frame.sload(Slot::Decimals)?;
      Ok(Output::Uint8(storage.decimals))
    }
    AggregatorCall::Description => Ok(Output::Text(DESCRIPTION.to_owned())),
    AggregatorCall::Version => Ok(Output::Uint(U256::from(VERSION))),
    AggregatorCall::LatestRoundData => {
      frame.sload(Slot::LatestRound)?;
      let id = storage.latest_round;
      frame.sload(Slot::Round(id))?;
      Ok(Output::RoundData(round_data(&storage, id)))
    }
    AggregatorCall::GetRoundData(id) => {
      frame.sload(Slot::Round(id))?;
      Ok(Output::RoundData(round_data(&storage, id)))
    }
    AggregatorCall::UpdateAnswer(answer) => {
      update_answer(frame, &mut storage, answer)?;
      frame.store(Contract::MockV3Aggregator(storage));
      Ok(Output::None)
    }
    AggregatorCall::UpdateRoundData {
      round_id,
      answer,
      timestamp,
      started_at,
    } => {
      frame.sstore(Slot::LatestRound, storage.latest_round == 0, round_id == 0)?;
      frame.sstore(Slot::Round(round_id), false, false)?;
      storage.latest_round = round_id;
      storage.rounds.insert(round_id, Round {
        answer,
        started_at,
        updated_at: timestamp,
      });
      frame.store(Contract::MockV3Aggregator(storage));
      Ok(Output::None)
    }
  }
}

/// Starts a new round stamped with the current block timestamp.
fn update_answer(
  frame: &mut Frame,
  storage: &mut AggregatorStorage,
  answer: I256,
) -> Result<(), Revert> {
  frame.sload(Slot::LatestRound)?;
  let round_id = storage
    .latest_round
    .checked_add(1)
    .ok_or(Revert::Panic(PanicCode::ArithmeticOverflow))?;
  frame.sstore(Slot::LatestRound, storage.latest_round == 0, false)?;
  frame.sstore(Slot::Round(round_id), true, false)?;

  let now = frame.env.timestamp;
  storage.latest_round = round_id;
  storage.rounds.insert(round_id, Round {
    answer,
    started_at: now,
    updated_at: now,
  });
  Ok(())
}

fn round_data(storage: &AggregatorStorage, id: u64) -> RoundData {
  let round = storage.round(id);
  RoundData {
    round_id: id,
    answer: round.answer,
    started_at: round.started_at,
    updated_at: round.updated_at,
    answered_in_round: id,
  }
}
