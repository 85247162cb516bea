//! Named deployments of the FundMe contracts.
//!
//! Deployments are grouped by tags: `mocks` deploys the mock price
//! feed on development chains, `fundme` deploys FundMe against the
//! network's price feed and `all` runs both, in that order. Every
//! deployment is recorded on the node under its contract name and
//! reused by later runs as long as its constructor arguments match.

use {
  crate::{
    config::{initial_answer, DECIMALS},
    Error,
    NamedAccounts,
    Network,
    PendingTransaction,
  },
  fundme_devnode::{Deployment, TransactionRequest},
  fundme_primitives::{Address, Bytecode, Calldata, ToHexString},
  tracing::info,
};

pub const FUND_ME: &str = "FundMe";
pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";

/// Runs the deployment scripts selected by `tags` from the deployer
/// account.
pub async fn fixture(network: &Network, tags: &[&str]) -> Result<(), Error> {
  let (mut mocks, mut fund_me) = (false, false);
  for tag in tags {
    match *tag {
      "all" => (mocks, fund_me) = (true, true),
      "mocks" => mocks = true,
      "fundme" => fund_me = true,
      other => return Err(Error::UnknownTag(other.to_owned())),
    }
  }

  let deployer = NamedAccounts::resolve(&network.node)?.deployer;
  if mocks {
    deploy_mocks(network, deployer).await?;
  }
  if fund_me {
    deploy_fund_me(network, deployer).await?;
  }
  Ok(())
}

/// Deploys the mock price feed. Does nothing on live networks, they
/// have a real one.
pub async fn deploy_mocks(
  network: &Network,
  deployer: Address,
) -> Result<Option<Deployment>, Error> {
  if !network.is_development() {
    return Ok(None);
  }

  info!("Local network detected! Deploying mocks...");
  let mock = Bytecode::MockV3Aggregator {
    decimals: DECIMALS,
    initial_answer: initial_answer(),
  };
  let deployment = deploy(network, MOCK_V3_AGGREGATOR, deployer, mock).await?;
  info!("Mocks deployed!");
  Ok(Some(deployment))
}

/// Deploys FundMe wired to the configured price feed, or to the mock
/// on development chains.
pub async fn deploy_fund_me(
  network: &Network,
  deployer: Address,
) -> Result<Deployment, Error> {
  let price_feed = match network.config.eth_usd_price_feed {
    Some(feed) => feed,
    None => {
      network
        .node
        .deployment(MOCK_V3_AGGREGATOR)
        .await?
        .ok_or_else(|| {
          Error::MissingDeployment(MOCK_V3_AGGREGATOR.to_owned())
        })?
        .address
    }
  };

  deploy(network, FUND_ME, deployer, Bytecode::FundMe { price_feed }).await
}

/// Deploys a contract under a name unless an identical deployment is
/// already recorded, then waits for the network's confirmations.
pub async fn deploy(
  network: &Network,
  name: &str,
  from: Address,
  args: Bytecode,
) -> Result<Deployment, Error> {
  let node = &network.node;
  if let Some(existing) = node.deployment(name).await? {
    if existing.args == args && node.code(&existing.address).await.is_some() {
      info!("reusing \"{name}\" at {}", existing.address.to_hex());
      return Ok(existing);
    }
  }

  let hash = node
    .send_transaction(
      TransactionRequest::new(from).input(Calldata::Deploy(args.clone())),
    )
    .await?;
  let receipt = PendingTransaction::new(node.clone(), hash)
    .wait(network.config.block_confirmations)
    .await?;

  let deployment = Deployment {
    address: receipt
      .contract_address
      .ok_or(Error::UnexpectedOutput("constructor"))?,
    contract: args.contract_name().to_owned(),
    args,
    transaction_hash: hash,
    block_number: receipt.block_number,
  };

  info!(
    "deployed \"{name}\" (tx: {}) at {} with {} gas",
    hash.to_hex(),
    deployment.address.to_hex(),
    receipt.gas_used
  );
  node.save_deployment(name, deployment.clone()).await?;
  Ok(deployment)
}
