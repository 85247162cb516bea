use {
  crate::{Error, Genesis},
  fundme_primitives::{
    Account,
    Address,
    Block,
    Bytecode,
    Receipt,
    ToHexString,
    H256,
  },
  fundme_vm::{InMemoryStateStore, State, StateDiff},
  rmp_serde::{from_slice, to_vec},
  serde::{Deserialize, Serialize},
  sled::{
    transaction::{ConflictableTransactionResult, TransactionError},
    Transactional,
  },
  std::{collections::HashMap, path::Path},
  tracing::info,
};

/// A named contract deployment recorded by the deployment fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
  pub address: Address,
  pub contract: String,
  pub args: Bytecode,
  pub transaction_hash: H256,
  pub block_number: u64,
}

/// Everything the devnode keeps about its chain.
///
/// Account state is read through the [`State`] supertrait, blocks,
/// receipts and deployments through the methods below. Implementations
/// must always contain at least the genesis block.
pub trait Storage: State + Send + Sync {
  fn state(&self) -> &dyn State;

  fn head(&self) -> &Block;

  fn block(&self, number: u64) -> Result<Option<Block>, Error>;

  fn receipt(&self, hash: &H256) -> Result<Option<Receipt>, Error>;

  /// Appends a mined block on top of the current head together with
  /// the receipts and the state changes of its transactions.
  fn commit(
    &mut self,
    block: Block,
    receipts: Vec<Receipt>,
    diff: StateDiff,
  ) -> Result<(), Error>;

  fn deployment(&self, name: &str) -> Result<Option<Deployment>, Error>;

  fn save_deployment(
    &mut self,
    name: &str,
    deployment: Deployment,
  ) -> Result<(), Error>;

  /// An independent copy of the whole chain, used by snapshots.
  fn fork(&self) -> Result<Box<dyn Storage>, Error>;
}

/// Ephemeral chain that lives only as long as the process.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
  state: InMemoryStateStore,
  blocks: Vec<Block>,
  receipts: HashMap<H256, Receipt>,
  deployments: HashMap<String, Deployment>,
}

impl InMemoryStorage {
  pub fn new(genesis: &Genesis, accounts: &[Address]) -> Self {
    let mut state = InMemoryStateStore::default();
    state.apply(genesis.state(accounts));
    Self {
      state,
      blocks: vec![genesis.block()],
      receipts: HashMap::new(),
      deployments: HashMap::new(),
    }
  }
}

impl State for InMemoryStorage {
  fn get(&self, address: &Address) -> Option<Account> {
    self.state.get(address)
  }

  fn apply(&mut self, diff: StateDiff) {
    self.state.apply(diff);
  }
}

impl Storage for InMemoryStorage {
  fn state(&self) -> &dyn State {
    self
  }

  fn head(&self) -> &Block {
    // never empty, the genesis block is inserted on construction
    &self.blocks[self.blocks.len() - 1]
  }

  fn block(&self, number: u64) -> Result<Option<Block>, Error> {
    Ok(self.blocks.get(number as usize).cloned())
  }

  fn receipt(&self, hash: &H256) -> Result<Option<Receipt>, Error> {
    Ok(self.receipts.get(hash).cloned())
  }

  fn commit(
    &mut self,
    block: Block,
    receipts: Vec<Receipt>,
    diff: StateDiff,
  ) -> Result<(), Error> {
    self.state.apply(diff);
    for receipt in receipts {
      self.receipts.insert(receipt.transaction_hash, receipt);
    }
    self.blocks.push(block);
    Ok(())
  }

  fn deployment(&self, name: &str) -> Result<Option<Deployment>, Error> {
    Ok(self.deployments.get(name).cloned())
  }

  fn save_deployment(
    &mut self,
    name: &str,
    deployment: Deployment,
  ) -> Result<(), Error> {
    self.deployments.insert(name.to_owned(), deployment);
    Ok(())
  }

  fn fork(&self) -> Result<Box<dyn Storage>, Error> {
    Ok(Box::new(self.clone()))
  }
}

/// Chain persisted in a sled database.
///
/// Accounts are also kept in memory, loaded when the database is
/// opened, so state reads never touch the disk. A block is written
/// together with its receipts and account changes in one sled
/// transaction, so the stored accounts always match the stored head.
pub struct OnDiskStorage {
  cache: InMemoryStateStore,
  head: Block,
  accounts: sled::Tree,
  blocks: sled::Tree,
  receipts: sled::Tree,
  deployments: sled::Tree,
  db: sled::Db,
}

impl OnDiskStorage {
  /// Opens the chain stored at `path`, creating it from `genesis` if
  /// the directory holds no chain yet.
  pub fn open(
    path: impl AsRef<Path>,
    genesis: &Genesis,
    accounts: &[Address],
  ) -> Result<Self, Error> {
    let db = sled::open(path.as_ref())?;
    let mut storage = Self {
      cache: InMemoryStateStore::default(),
      head: genesis.block(),
      accounts: db.open_tree("accounts")?,
      blocks: db.open_tree("blocks")?,
      receipts: db.open_tree("receipts")?,
      deployments: db.open_tree("deployments")?,
      db,
    };

    let last = storage.blocks.last()?;
    match last {
      Some((_, bytes)) => {
        let mut diff = StateDiff::default();
        for entry in storage.accounts.iter() {
          let (key, value) = entry?;
          diff.set(Address::from_slice(&key), from_slice(&value)?);
        }
        storage.cache.apply(diff);
        storage.head = from_slice(&bytes)?;
        info!(
          "opened chain at {} with head block {}",
          path.as_ref().display(),
          storage.head.number
        );
      }
      None => {
        let state = genesis.state(accounts);
        storage.write(&storage.head, &[], &state)?;
        storage.db.flush()?;
        storage.cache.apply(state);
        info!("created new chain at {}", path.as_ref().display());
      }
    }

    Ok(storage)
  }

  /// Writes a block, its receipts and its account changes atomically.
  fn write(
    &self,
    block: &Block,
    receipts: &[Receipt],
    diff: &StateDiff,
  ) -> Result<(), Error> {
    // encoded up front, the transaction closure may run more than once
    let accounts = diff
      .iter()
      .map(|(address, account)| -> Result<_, Error> {
        Ok((address.as_bytes().to_vec(), account.map(to_vec).transpose()?))
      })
      .collect::<Result<Vec<_>, Error>>()?;
    let receipts = receipts
      .iter()
      .map(|receipt| -> Result<_, Error> {
        Ok((receipt.transaction_hash.as_bytes().to_vec(), to_vec(receipt)?))
      })
      .collect::<Result<Vec<_>, Error>>()?;
    let key = block.number.to_be_bytes();
    let value = to_vec(block)?;

    (&self.accounts, &self.receipts, &self.blocks)
      .transaction(
        |(accounts_tx, receipts_tx, blocks_tx)| -> ConflictableTransactionResult<()> {
          for (address, account) in &accounts {
            match account {
              Some(account) => {
                accounts_tx.insert(address.as_slice(), account.as_slice())?
              }
              None => accounts_tx.remove(address.as_slice())?,
            };
          }
          for (hash, receipt) in &receipts {
            receipts_tx.insert(hash.as_slice(), receipt.as_slice())?;
          }
          blocks_tx.insert(&key[..], value.as_slice())?;
          Ok(())
        },
      )
      .map_err(|e| match e {
        TransactionError::Storage(e) => Error::Storage(e),
        TransactionError::Abort(()) => {
          Error::Corrupt(format!("write of block {} aborted", block.number))
        }
      })
  }
}

impl State for OnDiskStorage {
  fn get(&self, address: &Address) -> Option<Account> {
    self.cache.get(address)
  }

  /// Changes the in-memory view only. Changes reach the disk through
  /// [`Storage::commit`], together with the block that made them.
  fn apply(&mut self, diff: StateDiff) {
    self.cache.apply(diff);
  }
}

impl Storage for OnDiskStorage {
  fn state(&self) -> &dyn State {
    self
  }

  fn head(&self) -> &Block {
    &self.head
  }

  fn block(&self, number: u64) -> Result<Option<Block>, Error> {
    match self.blocks.get(number.to_be_bytes())? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn receipt(&self, hash: &H256) -> Result<Option<Receipt>, Error> {
    match self.receipts.get(hash.as_bytes())? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn commit(
    &mut self,
    block: Block,
    receipts: Vec<Receipt>,
    diff: StateDiff,
  ) -> Result<(), Error> {
    if block.number != self.head.number + 1 {
      return Err(Error::Corrupt(format!(
        "block {} does not extend head {}",
        block.number, self.head.number
      )));
    }

    self.write(&block, &receipts, &diff)?;
    self.cache.apply(diff);
    self.head = block;
    self.db.flush()?;
    Ok(())
  }

  fn deployment(&self, name: &str) -> Result<Option<Deployment>, Error> {
    match self.deployments.get(name)? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn save_deployment(
    &mut self,
    name: &str,
    deployment: Deployment,
  ) -> Result<(), Error> {
    self.deployments.insert(name, to_vec(&deployment)?)?;
    self.deployments.flush()?;
    info!(
      "saved deployment {name} ({}) at {}",
      deployment.contract,
      deployment.address.to_hex()
    );
    Ok(())
  }

  fn fork(&self) -> Result<Box<dyn Storage>, Error> {
    Err(Error::SnapshotUnsupported)
  }
}
