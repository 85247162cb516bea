use {
  common::{setup, Setup},
  fundme_client::{errors, parse_ether, signers, INITIAL_ANSWER, U256},
  fundme_primitives::I256,
};

mod common;

const SEND_VALUE: &str = "1";

/// Sets up a fresh deployment, or skips the test off development chains.
macro_rules! setup_or_skip {
  () => {
    match setup().await? {
      Some(setup) => setup,
      None => return Ok(()),
    }
  };
}

/// Funds the contract from the deployer, as every withdraw test does
/// first.
async fn funded() -> anyhow::Result<Option<Setup>> {
  let Some(setup) = setup().await? else {
    return Ok(None);
  };
  setup.fund_me.fund(parse_ether(SEND_VALUE)?).await?.await?;
  Ok(Some(setup))
}

#[tokio::test]
async fn constructor_sets_the_aggregator_address() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let (fund_me, mock_v3_aggregator) =
    (&setup.fund_me, &setup.mock_v3_aggregator);

  assert_eq!(fund_me.get_price_feed().await?, mock_v3_aggregator.address());
  Ok(())
}

#[tokio::test]
async fn constructor_sets_the_owner() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let (fund_me, deployer) = (&setup.fund_me, setup.deployer);

  assert_eq!(fund_me.get_owner().await?, deployer);
  assert_eq!(fund_me.get_version().await?, U256::zero());
  Ok(())
}

#[tokio::test]
async fn fund_fails_without_enough_eth() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let fund_me = &setup.fund_me;

  let error = match fund_me.fund(U256::zero()).await {
    Ok(pending) => pending.await.err(),
    Err(e) => Some(e),
  };
  assert!(
    error
      .as_ref()
      .is_some_and(|e| e.is_revert_with(errors::NOT_ENOUGH_ETH)),
    "expected a revert, got {error:?}"
  );
  Ok(())
}

#[tokio::test]
async fn fund_updates_the_amount_funded() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let (fund_me, deployer) = (&setup.fund_me, setup.deployer);

  fund_me.fund(parse_ether(SEND_VALUE)?).await?.await?;
  assert_eq!(
    fund_me.get_address_to_amount_funded(deployer).await?,
    parse_ether(SEND_VALUE)?
  );
  Ok(())
}

#[tokio::test]
async fn fund_adds_funders_to_the_funders_list() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let (fund_me, deployer) = (&setup.fund_me, setup.deployer);

  fund_me.fund(parse_ether(SEND_VALUE)?).await?.await?;
  assert_eq!(fund_me.get_funder(0u64).await?, deployer);
  Ok(())
}

#[tokio::test]
async fn withdraw_from_a_single_funder() -> anyhow::Result<()> {
  let Some(setup) = funded().await? else {
    return Ok(());
  };
  let (node, fund_me, deployer) =
    (&setup.network.node, &setup.fund_me, setup.deployer);

  let starting_fund_me_balance = node.balance(&fund_me.address()).await;
  let starting_deployer_balance = node.balance(&deployer).await;

  let receipt = fund_me.c_withdrawal().await?.wait(1).await?;
  let gas_cost = receipt.gas_cost();

  let ending_fund_me_balance = node.balance(&fund_me.address()).await;
  let ending_deployer_balance = node.balance(&deployer).await;

  assert_eq!(ending_fund_me_balance, U256::zero());
  assert_eq!(
    starting_fund_me_balance + starting_deployer_balance,
    ending_deployer_balance + gas_cost
  );
  Ok(())
}

#[tokio::test]
async fn withdraw_with_multiple_funders() -> anyhow::Result<()> {
  let Some(setup) = funded().await? else {
    return Ok(());
  };
  let (node, fund_me, deployer) =
    (&setup.network.node, &setup.fund_me, setup.deployer);
  let accounts = signers(node);

  for account in &accounts[1..6] {
    let connected = fund_me.connect(*account);
    connected.fund(parse_ether(SEND_VALUE)?).await?.await?;
  }

  let starting_fund_me_balance = node.balance(&fund_me.address()).await;
  let starting_deployer_balance = node.balance(&deployer).await;

  let receipt = fund_me.c_withdrawal().await?.wait(1).await?;
  let gas_cost = receipt.gas_cost();

  let ending_fund_me_balance = node.balance(&fund_me.address()).await;
  let ending_deployer_balance = node.balance(&deployer).await;

  assert_eq!(ending_fund_me_balance, U256::zero());
  assert_eq!(
    starting_fund_me_balance + starting_deployer_balance,
    ending_deployer_balance + gas_cost
  );

  assert!(fund_me
    .get_funder(0u64)
    .await
    .is_err_and(|e| e.is_revert()));
  for account in &accounts[1..6] {
    assert_eq!(
      fund_me.get_address_to_amount_funded(*account).await?,
      U256::zero()
    );
  }
  Ok(())
}

#[tokio::test]
async fn only_the_owner_can_withdraw() -> anyhow::Result<()> {
  let Some(setup) = funded().await? else {
    return Ok(());
  };

  let attacker = setup.fund_me.connect(signers(&setup.network.node)[1]);
  for result in [attacker.c_withdrawal().await, attacker.withdraw().await] {
    assert!(
      result
        .as_ref()
        .err()
        .is_some_and(|e| e.is_custom_error(errors::NOT_OWNER)),
      "expected FundMe__NotOwner"
    );
  }
  Ok(())
}

#[tokio::test]
async fn cheaper_withdrawal_costs_less_gas() -> anyhow::Result<()> {
  let mut gas_used = vec![];
  for cheaper in [false, true] {
    let Some(setup) = funded().await? else {
      return Ok(());
    };
    let fund_me = &setup.fund_me;
    for account in &signers(&setup.network.node)[1..6] {
      let connected = fund_me.connect(*account);
      connected.fund(parse_ether(SEND_VALUE)?).await?.await?;
    }

    let pending = match cheaper {
      true => fund_me.c_withdrawal().await?,
      false => fund_me.withdraw().await?,
    };
    gas_used.push(pending.await?.gas_used);
  }

  assert!(gas_used[1] < gas_used[0], "gas used: {gas_used:?}");
  Ok(())
}

#[tokio::test]
async fn price_feed_updates_move_the_minimum() -> anyhow::Result<()> {
  let setup = setup_or_skip!();
  let (fund_me, mock_v3_aggregator) =
    (&setup.fund_me, &setup.mock_v3_aggregator);

  // 0.02 ETH is 40 USD at the initial 2000 USD/ETH
  let result = fund_me.fund(parse_ether("0.02")?).await;
  assert!(result.is_err_and(|e| e.is_revert_with(errors::NOT_ENOUGH_ETH)));

  let doubled = I256::from_raw(U256::from(2 * INITIAL_ANSWER));
  mock_v3_aggregator.update_answer(doubled).await?.await?;
  let round = mock_v3_aggregator.latest_round_data().await?;
  assert_eq!(round.round_id, 2);
  assert_eq!(round.answer, doubled);
  assert_eq!(mock_v3_aggregator.decimals().await?, 8);

  fund_me.fund(parse_ether("0.02")?).await?.await?;
  Ok(())
}
