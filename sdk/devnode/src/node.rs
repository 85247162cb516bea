use {
  crate::{
    genesis::unix_now,
    storage::{Deployment, InMemoryStorage, OnDiskStorage, Storage},
    Error,
    Genesis,
    Mempool,
  },
  fundme_primitives::{
    Address,
    Block,
    Calldata,
    Contract,
    Output,
    Receipt,
    ToHexString,
    Transaction,
    H256,
    U256,
  },
  fundme_vm::{execute, intrinsic_gas, BlockEnv, Overlay, State},
  std::{
    path::PathBuf,
    sync::{Arc, Weak},
    time::Duration,
  },
  tokio::{
    sync::{watch, RwLock},
    time::MissedTickBehavior,
  },
  tracing::{debug, error, info, warn},
};

/// Gas price used when a transaction request does not specify one.
pub const DEFAULT_GAS_PRICE: u64 = 1_000_000_000;

/// When new blocks are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mining {
  /// A block is mined for every sent transaction as soon as it is
  /// accepted.
  #[default]
  Automine,

  /// A block is mined every interval, whether or not there are
  /// pending transactions.
  Interval(Duration),
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
  pub genesis: Genesis,
  pub mining: Mining,
  pub gas_price: U256,
  pub block_gas_limit: u64,

  /// Directory of the persisted chain. `None` keeps the chain in
  /// memory only.
  pub data_dir: Option<PathBuf>,
}

impl Default for NodeConfig {
  fn default() -> Self {
    Self {
      genesis: Genesis::default(),
      mining: Mining::default(),
      gas_price: U256::from(DEFAULT_GAS_PRICE),
      block_gas_limit: fundme_vm::BLOCK_GAS_LIMIT,
      data_dir: None,
    }
  }
}

/// A transaction or call as submitted by a client.
///
/// Fields left as `None` are filled in by the node: the nonce from the
/// pending state, the gas price from the node config and the gas limit
/// from an estimate.
#[derive(Debug, Clone, Default)]
pub struct TransactionRequest {
  pub from: Address,
  pub to: Option<Address>,
  pub value: U256,
  pub input: Calldata,
  pub nonce: Option<u64>,
  pub gas: Option<u64>,
  pub gas_price: Option<U256>,
}

impl TransactionRequest {
  pub fn new(from: Address) -> Self {
    Self {
      from,
      ..Default::default()
    }
  }

  pub fn to(mut self, to: Address) -> Self {
    self.to = Some(to);
    self
  }

  pub fn value(mut self, value: U256) -> Self {
    self.value = value;
    self
  }

  pub fn input(mut self, input: impl Into<Calldata>) -> Self {
    self.input = input.into();
    self
  }

  pub fn nonce(mut self, nonce: u64) -> Self {
    self.nonce = Some(nonce);
    self
  }

  pub fn gas(mut self, gas: u64) -> Self {
    self.gas = Some(gas);
    self
  }

  pub fn gas_price(mut self, gas_price: U256) -> Self {
    self.gas_price = Some(gas_price);
    self
  }
}

struct Chain {
  storage: Box<dyn Storage>,
  mempool: Mempool,
  snapshots: Vec<(Box<dyn Storage>, Mempool)>,
}

struct Shared {
  chain: RwLock<Chain>,
  height: watch::Sender<u64>,
  accounts: Vec<Address>,
  config: NodeConfig,
}

/// Handle to an in-process development chain.
///
/// Clones share the same chain. Every development account is unlocked:
/// any of them may be used as the sender of a transaction without a
/// signature.
#[derive(Clone)]
pub struct Devnode {
  shared: Arc<Shared>,
}

impl Devnode {
  /// Starts a node on the chain described by `config`.
  ///
  /// With a data directory the chain is opened from disk, or created
  /// there if it does not exist yet. Interval mining runs on the
  /// current tokio runtime until the last handle is dropped.
  pub async fn start(config: NodeConfig) -> Result<Self, Error> {
    let accounts = config.genesis.accounts()?;
    let storage: Box<dyn Storage> = match &config.data_dir {
      Some(path) => {
        Box::new(OnDiskStorage::open(path, &config.genesis, &accounts)?)
      }
      None => Box::new(InMemoryStorage::new(&config.genesis, &accounts)),
    };

    let (height, _) = watch::channel(storage.head().number);
    let node = Self {
      shared: Arc::new(Shared {
        chain: RwLock::new(Chain {
          storage,
          mempool: Mempool::default(),
          snapshots: vec![],
        }),
        height,
        accounts,
        config,
      }),
    };

    info!(
      "devnode started, chain id {}, {} accounts, {:?}",
      node.chain_id(),
      node.shared.accounts.len(),
      node.shared.config.mining
    );

    if let Mining::Interval(interval) = node.shared.config.mining {
      spawn_miner(Arc::downgrade(&node.shared), interval);
    }

    Ok(node)
  }

  /// An ephemeral node with default settings.
  pub async fn ephemeral() -> Result<Self, Error> {
    Self::start(NodeConfig::default()).await
  }

  pub fn chain_id(&self) -> u64 {
    self.shared.config.genesis.chain_id
  }

  /// Unlocked development accounts, index 0 first.
  pub fn accounts(&self) -> &[Address] {
    &self.shared.accounts
  }

  pub fn config(&self) -> &NodeConfig {
    &self.shared.config
  }

  pub async fn block_number(&self) -> u64 {
    self.shared.chain.read().await.storage.head().number
  }

  pub async fn block(&self, number: u64) -> Result<Option<Block>, Error> {
    self.shared.chain.read().await.storage.block(number)
  }

  pub async fn balance(&self, address: &Address) -> U256 {
    let chain = self.shared.chain.read().await;
    chain.storage.get(address).unwrap_or_default().balance
  }

  /// Number of mined transactions sent by an account.
  pub async fn nonce(&self, address: &Address) -> u64 {
    let chain = self.shared.chain.read().await;
    chain.storage.get(address).unwrap_or_default().nonce
  }

  /// Nonce the next transaction from an account must carry, taking
  /// pending transactions into account.
  pub async fn pending_nonce(&self, address: &Address) -> u64 {
    let chain = self.shared.chain.read().await;
    let env = next_env(&chain, &self.shared.config);
    let mut pending = Overlay::new(chain.storage.state());
    pending.apply(chain.mempool.pending_state(chain.storage.state(), &env));
    pending.account(address).nonce
  }

  pub async fn pending_transactions(&self) -> usize {
    self.shared.chain.read().await.mempool.len()
  }

  pub async fn code(&self, address: &Address) -> Option<Contract> {
    let chain = self.shared.chain.read().await;
    chain.storage.get(address).and_then(|account| account.code)
  }

  pub async fn receipt(&self, hash: &H256) -> Result<Option<Receipt>, Error> {
    self.shared.chain.read().await.storage.receipt(hash)
  }

  /// Accepts a transaction from one of the development accounts and
  /// returns its hash.
  ///
  /// The transaction is first simulated on top of all pending
  /// transactions. If it would revert it is not queued and the revert
  /// reason is returned, the same way gas estimation fails on a
  /// regular node. In automine mode a block containing the transaction
  /// is mined before this returns.
  pub async fn send_transaction(
    &self,
    request: TransactionRequest,
  ) -> Result<H256, Error> {
    if !self.shared.accounts.contains(&request.from) {
      return Err(Error::UnknownAccount(request.from));
    }

    let mut chain = self.shared.chain.write().await;
    let from = request.from;
    let tx = match prepare(&chain, &self.shared.config, request) {
      Ok(tx) => tx,
      Err(e) => {
        warn!("rejected transaction from {}: {e}", from.to_hex());
        return Err(e);
      }
    };
    let hash = *tx.hash();
    debug!("accepted {tx:?}");
    chain.mempool.consume(tx);

    if self.shared.config.mining == Mining::Automine {
      self.mine_locked(&mut chain)?;
    }

    Ok(hash)
  }

  /// Read-only call against the latest block. Never changes state.
  pub async fn call(&self, request: TransactionRequest) -> Result<Output, Error> {
    let to = request.to.ok_or(fundme_vm::Error::MalformedCreate)?;
    let chain = self.shared.chain.read().await;
    let env = next_env(&chain, &self.shared.config);
    Ok(fundme_vm::call(
      request.from,
      to,
      request.value,
      &request.input,
      chain.storage.state(),
      &env,
    )?)
  }

  /// Mines `count` blocks. The first one includes every pending
  /// transaction. Returns the new head block number.
  pub async fn mine(&self, count: u64) -> Result<u64, Error> {
    let mut chain = self.shared.chain.write().await;
    for _ in 0..count {
      self.mine_locked(&mut chain)?;
    }
    Ok(chain.storage.head().number)
  }

  /// Waits until a transaction is mined and `confirmations` blocks,
  /// including its own, are on the chain. Zero is treated as one.
  pub async fn wait_for_confirmations(
    &self,
    hash: H256,
    confirmations: u64,
  ) -> Result<Receipt, Error> {
    let confirmations = confirmations.max(1);
    let mut height = self.shared.height.subscribe();
    loop {
      {
        let chain = self.shared.chain.read().await;
        match chain.storage.receipt(&hash)? {
          Some(receipt) => {
            let head = chain.storage.head().number;
            if head + 1 >= receipt.block_number + confirmations {
              return Ok(receipt);
            }
          }
          None if !chain.mempool.contains(&hash) => {
            return Err(Error::UnknownTransaction(hash));
          }
          None => {}
        }
      }
      height.changed().await.map_err(|_| Error::Stopped)?;
    }
  }

  pub async fn deployment(
    &self,
    name: &str,
  ) -> Result<Option<Deployment>, Error> {
    self.shared.chain.read().await.storage.deployment(name)
  }

  pub async fn save_deployment(
    &self,
    name: &str,
    deployment: Deployment,
  ) -> Result<(), Error> {
    let mut chain = self.shared.chain.write().await;
    chain.storage.save_deployment(name, deployment)
  }

  /// Saves the current chain and returns an id that [`Self::revert`]
  /// restores it from. Only ephemeral chains can be snapshotted.
  pub async fn snapshot(&self) -> Result<usize, Error> {
    let mut chain = self.shared.chain.write().await;
    let saved = (chain.storage.fork()?, chain.mempool.clone());
    chain.snapshots.push(saved);
    Ok(chain.snapshots.len() - 1)
  }

  /// Restores the chain saved by a snapshot. The snapshot and all the
  /// ones taken after it are consumed.
  pub async fn revert(&self, id: usize) -> Result<(), Error> {
    let mut chain = self.shared.chain.write().await;
    if id >= chain.snapshots.len() {
      return Err(Error::UnknownSnapshot(id));
    }
    let (storage, mempool) = chain.snapshots.swap_remove(id);
    chain.snapshots.truncate(id);
    chain.storage = storage;
    chain.mempool = mempool;

    let head = chain.storage.head().number;
    self.shared.height.send_replace(head);
    debug!("reverted to snapshot {id} at block {head}");
    Ok(())
  }

  fn mine_locked(&self, chain: &mut Chain) -> Result<(), Error> {
    let env = next_env(chain, &self.shared.config);
    let parent = chain.storage.head().clone();
    let (block, receipts, diff) =
      chain.mempool.produce(chain.storage.state(), &parent, &env);

    info!(
      "mined block {} {} with {} transactions",
      block.number,
      block.hash().to_hex(),
      block.transactions.len()
    );

    let number = block.number;
    chain.storage.commit(block, receipts, diff)?;
    self.shared.height.send_replace(number);
    Ok(())
  }
}

/// Environment of the block that would be mined next.
fn next_env(chain: &Chain, config: &NodeConfig) -> BlockEnv {
  let head = chain.storage.head();
  BlockEnv {
    number: head.number + 1,
    timestamp: unix_now().max(head.timestamp + 1),
    coinbase: config.genesis.coinbase,
    gas_limit: config.block_gas_limit,
  }
}

/// Turns a request into a transaction that executes without reverting
/// on top of the pending state.
fn prepare(
  chain: &Chain,
  config: &NodeConfig,
  request: TransactionRequest,
) -> Result<Transaction, Error> {
  let env = next_env(chain, config);
  let mut pending = Overlay::new(chain.storage.state());
  pending.apply(chain.mempool.pending_state(chain.storage.state(), &env));

  let sender = pending.account(&request.from);
  let nonce = request.nonce.unwrap_or(sender.nonce);
  let gas_price = request.gas_price.unwrap_or(config.gas_price);

  let mut tx = Transaction::new(
    request.from,
    request.to,
    nonce,
    request.value,
    request.gas.unwrap_or(env.gas_limit),
    gas_price,
    request.input,
  );

  if request.gas.is_none() {
    // simulate with as much gas as the sender can pay for
    let allowance = match gas_price.is_zero() {
      true => env.gas_limit,
      false => {
        let spendable =
          sender.balance.checked_sub(tx.value).unwrap_or_default() / gas_price;
        match spendable > U256::from(env.gas_limit) {
          true => env.gas_limit,
          false => spendable.as_u64(),
        }
      }
    };
    tx.gas_limit = allowance.max(intrinsic_gas(&tx));
  }

  let execution = execute(&tx, &pending, &env)?;
  if let Err(revert) = execution.result {
    return Err(Error::Reverted(revert));
  }

  match request.gas {
    Some(_) => Ok(tx),
    None => {
      let estimate = (execution.gas_used.saturating_mul(6) / 5)
        .min(env.gas_limit)
        .max(execution.gas_used);
      Ok(Transaction::new(
        tx.from,
        tx.to,
        tx.nonce,
        tx.value,
        estimate,
        tx.gas_price,
        tx.input,
      ))
    }
  }
}

fn spawn_miner(shared: Weak<Shared>, interval: Duration) {
  tokio::spawn(async move {
    let interval = interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
      ticker.tick().await;
      let Some(shared) = shared.upgrade() else {
        debug!("devnode dropped, interval mining stopped");
        break;
      };
      if let Err(e) = (Devnode { shared }).mine(1).await {
        error!("interval mining failed: {e}");
      }
    }
  });
}
