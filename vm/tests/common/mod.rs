use {
  fundme_primitives::{
    parse_ether,
    Account,
    Address,
    Bytecode,
    Calldata,
    Output,
    Revert,
    Transaction,
    I256,
    U256,
  },
  fundme_vm::{
    call,
    execute,
    BlockEnv,
    Execution,
    InMemoryStateStore,
    State,
    StateDiff,
    BLOCK_GAS_LIMIT,
  },
};

pub const GAS_PRICE: u64 = 1_000_000_000;
pub const GAS_LIMIT: u64 = 3_000_000;

/// 2000 USD with 8 decimals.
pub const INITIAL_ANSWER: u64 = 200_000_000_000;

pub fn account(index: u8) -> Address {
  Address::repeat_byte(index + 1)
}

/// A bare chain: a state store plus the environment of the block
/// currently being built. Every transaction is applied right away.
pub struct TestChain {
  pub store: InMemoryStateStore,
  pub env: BlockEnv,
}

impl TestChain {
  /// Creates a chain where each of the first `count` test accounts
  /// holds 10 000 ETH.
  pub fn with_accounts(count: u8) -> anyhow::Result<Self> {
    let mut genesis = StateDiff::default();
    for index in 0..count {
      genesis.set(account(index), Account::with_balance(parse_ether(10_000)?));
    }

    let mut store = InMemoryStateStore::default();
    store.apply(genesis);

    Ok(Self {
      store,
      env: BlockEnv {
        number: 1,
        timestamp: 1_700_000_000,
        coinbase: Address::repeat_byte(0xcb),
        gas_limit: BLOCK_GAS_LIMIT,
      },
    })
  }

  pub fn send(
    &mut self,
    from: Address,
    to: Option<Address>,
    value: U256,
    input: Calldata,
  ) -> anyhow::Result<Execution> {
    let nonce = self.store.get(&from).unwrap_or_default().nonce;
    let tx = Transaction::new(
      from,
      to,
      nonce,
      value,
      GAS_LIMIT,
      U256::from(GAS_PRICE),
      input,
    );
    let mut execution = execute(&tx, &self.store, &self.env)?;
    self.store.apply(std::mem::take(&mut execution.diff));
    self.env.number += 1;
    self.env.timestamp += 1;
    Ok(execution)
  }

  pub fn view(
    &self,
    to: Address,
    input: impl Into<Calldata>,
  ) -> Result<Output, Revert> {
    call(
      account(0),
      to,
      U256::zero(),
      &input.into(),
      &self.store,
      &self.env,
    )
  }

  pub fn balance(&self, address: &Address) -> U256 {
    self.store.get(address).unwrap_or_default().balance
  }

  pub fn nonce(&self, address: &Address) -> u64 {
    self.store.get(address).unwrap_or_default().nonce
  }

  /// Deploys the mock price feed and FundMe from `deployer`, returns
  /// their addresses.
  pub fn deploy_fund_me(
    &mut self,
    deployer: Address,
  ) -> anyhow::Result<(Address, Address)> {
    let feed = self
      .send(
        deployer,
        None,
        U256::zero(),
        Calldata::Deploy(Bytecode::MockV3Aggregator {
          decimals: 8,
          initial_answer: I256::from_raw(U256::from(INITIAL_ANSWER)),
        }),
      )?
      .contract_address
      .ok_or_else(|| anyhow::anyhow!("price feed deployment reverted"))?;

    let fund_me = self
      .send(
        deployer,
        None,
        U256::zero(),
        Calldata::Deploy(Bytecode::FundMe { price_feed: feed }),
      )?
      .contract_address
      .ok_or_else(|| anyhow::anyhow!("FundMe deployment reverted"))?;

    Ok((feed, fund_me))
  }
}
