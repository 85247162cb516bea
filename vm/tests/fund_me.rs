use {
  common::{account, TestChain, GAS_PRICE},
  fundme_primitives::{
    parse_ether,
    AggregatorCall,
    Calldata,
    FundMeCall,
    Output,
    PanicCode,
    Revert,
    I256,
    U256,
  },
  fundme_vm::errors::{NOT_ENOUGH_ETH, NOT_OWNER},
};

mod common;

#[test]
fn constructor_wiring() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let deployer = account(0);
  let (feed, fund_me) = chain.deploy_fund_me(deployer)?;

  assert_eq!(
    chain.view(fund_me, FundMeCall::GetPriceFeed)?,
    Output::Address(feed)
  );
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetOwner)?,
    Output::Address(deployer)
  );
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetVersion)?,
    Output::Uint(U256::zero())
  );
  assert_eq!(chain.nonce(&deployer), 2);
  Ok(())
}

#[test]
fn fund_records_contribution() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;
  let funder = account(1);

  let execution = chain.send(
    funder,
    Some(fund_me),
    parse_ether(1)?,
    FundMeCall::Fund.into(),
  )?;
  assert!(execution.succeeded());

  assert_eq!(chain.balance(&fund_me), parse_ether(1)?);
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetAddressToAmountFunded(funder))?,
    Output::Uint(parse_ether(1)?)
  );
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetFunder(U256::zero()))?,
    Output::Address(funder)
  );
  Ok(())
}

#[test]
fn underfunding_reverts_and_still_pays_gas() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;
  let funder = account(1);
  let before = chain.balance(&funder);

  // 50 USD at 2000 USD/ETH is 0.025 ETH
  let execution = chain.send(
    funder,
    Some(fund_me),
    parse_ether("0.02")?,
    FundMeCall::Fund.into(),
  )?;

  assert_eq!(execution.result, Err(Revert::message(NOT_ENOUGH_ETH)));
  assert_eq!(chain.balance(&fund_me), U256::zero());
  assert_eq!(
    chain.balance(&funder),
    before - U256::from(execution.gas_used) * U256::from(GAS_PRICE)
  );
  assert_eq!(chain.nonce(&funder), 1);
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetFunder(U256::zero())),
    Err(Revert::Panic(PanicCode::IndexOutOfBounds))
  );
  Ok(())
}

#[test]
fn plain_transfer_funds_the_contract() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;

  let execution =
    chain.send(account(1), Some(fund_me), parse_ether(1)?, Calldata::Empty)?;
  assert!(execution.succeeded());
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetFunder(U256::zero()))?,
    Output::Address(account(1))
  );
  Ok(())
}

#[test]
fn withdraw_sweeps_balance_to_owner() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(4)?;
  let owner = account(0);
  let (_, fund_me) = chain.deploy_fund_me(owner)?;

  for index in 1..4 {
    chain.send(
      account(index),
      Some(fund_me),
      parse_ether(1)?,
      FundMeCall::Fund.into(),
    )?;
  }

  let contract_balance = chain.balance(&fund_me);
  let owner_balance = chain.balance(&owner);
  assert_eq!(contract_balance, parse_ether(3)?);

  let execution = chain.send(
    owner,
    Some(fund_me),
    U256::zero(),
    FundMeCall::CheaperWithdraw.into(),
  )?;
  assert!(execution.succeeded());

  let gas_cost = U256::from(execution.gas_used) * U256::from(GAS_PRICE);
  assert_eq!(chain.balance(&fund_me), U256::zero());
  assert_eq!(
    chain.balance(&owner) + gas_cost,
    owner_balance + contract_balance
  );

  for index in 1..4 {
    assert_eq!(
      chain.view(fund_me, FundMeCall::GetAddressToAmountFunded(account(index)))?,
      Output::Uint(U256::zero())
    );
  }
  assert_eq!(
    chain.view(fund_me, FundMeCall::GetFunder(U256::zero())),
    Err(Revert::Panic(PanicCode::IndexOutOfBounds))
  );
  Ok(())
}

#[test]
fn only_owner_can_withdraw() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;
  chain.send(
    account(0),
    Some(fund_me),
    parse_ether(1)?,
    FundMeCall::Fund.into(),
  )?;

  for call in [FundMeCall::Withdraw, FundMeCall::CheaperWithdraw] {
    let execution =
      chain.send(account(1), Some(fund_me), U256::zero(), call.into())?;
    assert!(execution
      .result
      .as_ref()
      .is_err_and(|revert| revert.is_custom(NOT_OWNER)));
  }

  assert_eq!(chain.balance(&fund_me), parse_ether(1)?);
  Ok(())
}

#[test]
fn cheaper_withdraw_uses_less_gas() -> anyhow::Result<()> {
  let mut gas_used = vec![];
  for call in [FundMeCall::Withdraw, FundMeCall::CheaperWithdraw] {
    let mut chain = TestChain::with_accounts(6)?;
    let (_, fund_me) = chain.deploy_fund_me(account(0))?;
    for index in 1..6 {
      chain.send(
        account(index),
        Some(fund_me),
        parse_ether(1)?,
        FundMeCall::Fund.into(),
      )?;
    }
    let execution =
      chain.send(account(0), Some(fund_me), U256::zero(), call.into())?;
    assert!(execution.succeeded());
    gas_used.push(execution.gas_used);
  }

  assert!(gas_used[1] < gas_used[0], "gas used: {gas_used:?}");
  Ok(())
}

#[test]
fn getters_are_not_payable() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;

  let execution = chain.send(
    account(1),
    Some(fund_me),
    parse_ether(1)?,
    FundMeCall::GetOwner.into(),
  )?;
  assert!(matches!(execution.result, Err(Revert::NonPayable(_))));
  assert_eq!(chain.balance(&fund_me), U256::zero());
  Ok(())
}

#[test]
fn price_updates_move_the_minimum() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let (feed, fund_me) = chain.deploy_fund_me(account(0))?;

  // at 2000 USD/ETH 0.02 ETH is 40 USD, below the minimum
  let execution = chain.send(
    account(1),
    Some(fund_me),
    parse_ether("0.02")?,
    FundMeCall::Fund.into(),
  )?;
  assert!(!execution.succeeded());

  // at 4000 USD/ETH the same amount is 80 USD
  chain.send(
    account(0),
    Some(feed),
    U256::zero(),
    AggregatorCall::UpdateAnswer(I256::from_raw(U256::from(
      400_000_000_000u64,
    )))
    .into(),
  )?;

  let Output::RoundData(round) =
    chain.view(feed, AggregatorCall::LatestRoundData)?
  else {
    anyhow::bail!("unexpected latestRoundData output");
  };
  assert_eq!(round.round_id, 2);
  assert_eq!(round.answered_in_round, 2);

  let execution = chain.send(
    account(1),
    Some(fund_me),
    parse_ether("0.02")?,
    FundMeCall::Fund.into(),
  )?;
  assert!(execution.succeeded());
  Ok(())
}

#[test]
fn invalid_transactions_are_rejected() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(1)?;
  let (_, fund_me) = chain.deploy_fund_me(account(0))?;

  // an account with no funds cannot pay for gas
  let broke = account(9);
  let result =
    chain.send(broke, Some(fund_me), U256::zero(), FundMeCall::Fund.into());
  assert!(result.is_err());
  assert_eq!(chain.nonce(&broke), 0);

  // constructor input sent to an existing address
  let result = chain.send(
    account(0),
    Some(fund_me),
    U256::zero(),
    Calldata::Deploy(fundme_primitives::Bytecode::FundMe {
      price_feed: fund_me,
    }),
  );
  assert!(result.is_err());
  Ok(())
}

#[test]
fn fund_me_without_feed_code_reverts() -> anyhow::Result<()> {
  let mut chain = TestChain::with_accounts(2)?;
  let missing_feed = account(7);
  let fund_me = chain
    .send(
      account(0),
      None,
      U256::zero(),
      Calldata::Deploy(fundme_primitives::Bytecode::FundMe {
        price_feed: missing_feed,
      }),
    )?
    .contract_address
    .ok_or_else(|| anyhow::anyhow!("deployment reverted"))?;

  let execution = chain.send(
    account(1),
    Some(fund_me),
    parse_ether(1)?,
    FundMeCall::Fund.into(),
  )?;
  assert_eq!(execution.result, Err(Revert::NoCode(missing_feed)));
  Ok(())
}
