use {
  fundme_devnode::{Devnode, Mining, NodeConfig, TransactionRequest},
  fundme_primitives::{Address, Bytecode, Calldata, I256, U256},
  std::path::Path,
};

/// 2000 USD with 8 decimals.
pub const INITIAL_ANSWER: u64 = 200_000_000_000;

pub async fn ephemeral() -> anyhow::Result<Devnode> {
  Ok(Devnode::ephemeral().await?)
}

pub async fn persisted(path: &Path) -> anyhow::Result<Devnode> {
  Ok(
    Devnode::start(NodeConfig {
      data_dir: Some(path.to_path_buf()),
      ..Default::default()
    })
    .await?,
  )
}

pub async fn manual() -> anyhow::Result<Devnode> {
  // long enough that the interval never fires during a test
  Ok(
    Devnode::start(NodeConfig {
      mining: Mining::Interval(std::time::Duration::from_secs(3600)),
      ..Default::default()
    })
    .await?,
  )
}

/// Deploys a price feed and a FundMe instance wired to it from the
/// first development account.
pub async fn deploy_fund_me(
  node: &Devnode,
) -> anyhow::Result<(Address, Address)> {
  let deployer = node.accounts()[0];
  let feed = deploy(node, deployer, Bytecode::MockV3Aggregator {
    decimals: 8,
    initial_answer: I256::from_raw(U256::from(INITIAL_ANSWER)),
  })
  .await?;
  let fund_me =
    deploy(node, deployer, Bytecode::FundMe { price_feed: feed }).await?;
  Ok((feed, fund_me))
}

pub async fn deploy(
  node: &Devnode,
  from: Address,
  bytecode: Bytecode,
) -> anyhow::Result<Address> {
  let hash = node
    .send_transaction(
      TransactionRequest::new(from).input(Calldata::Deploy(bytecode)),
    )
    .await?;
  let receipt = node.wait_for_confirmations(hash, 1).await?;
  receipt
    .contract_address
    .ok_or_else(|| anyhow::anyhow!("deployment has no contract address"))
}
