use {
  fundme_primitives::{Block, Receipt, Transaction, H256},
  fundme_vm::{execute, BlockEnv, Overlay, State, StateDiff},
  tracing::warn,
};

/// Transactions accepted by the node and waiting to be mined, in
/// arrival order.
#[derive(Debug, Default, Clone)]
pub struct Mempool {
  txs: Vec<Transaction>,
}

impl Mempool {
  pub fn consume(&mut self, tx: Transaction) {
    self.txs.push(tx);
  }

  pub fn len(&self) -> usize {
    self.txs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.txs.is_empty()
  }

  pub fn contains(&self, hash: &H256) -> bool {
    self.txs.iter().any(|tx| tx.hash() == hash)
  }

  /// State as it will be once every queued transaction is mined.
  pub fn pending_state(&self, state: &dyn State, env: &BlockEnv) -> StateDiff {
    let mut overlay = Overlay::new(state);
    for tx in &self.txs {
      if let Ok(execution) = execute(tx, &overlay, env) {
        overlay.apply(execution.diff);
      }
    }
    overlay.into_diff()
  }

  /// Drains the queue into a new block on top of `parent`.
  ///
  /// Transactions are executed in arrival order, each one seeing the
  /// effects of the previous ones. Transactions that became invalid
  /// since they were queued are dropped, reverted ones are included
  /// with a failed receipt. Once the next transaction would take the
  /// block over `env.gas_limit` it and everything after it stay queued.
  pub fn produce(
    &mut self,
    state: &dyn State,
    parent: &Block,
    env: &BlockEnv,
  ) -> (Block, Vec<Receipt>, StateDiff) {
    let mut txs = std::mem::take(&mut self.txs).into_iter();
    let mut overlay = Overlay::new(state);
    let mut included = Vec::with_capacity(txs.len());
    let mut executions = Vec::with_capacity(txs.len());
    let mut block_gas = 0u64;

    while let Some(tx) = txs.next() {
      match execute(&tx, &overlay, env) {
        Ok(mut execution) => {
          if block_gas + execution.gas_used > env.gas_limit {
            self.txs.push(tx);
            self.txs.extend(txs);
            break;
          }
          block_gas += execution.gas_used;
          overlay.apply(std::mem::take(&mut execution.diff));
          executions.push(execution);
          included.push(tx);
        }
        Err(e) => warn!("dropping transaction {tx:?}: {e}"),
      }
    }

    let block = Block::new(parent, env.timestamp, env.coinbase, included);
    let receipts = block
      .transactions
      .iter()
      .zip(executions)
      .enumerate()
      .map(|(index, (tx, execution))| {
        let (status, output, revert) = match execution.result {
          Ok(output) => (true, output, None),
          Err(revert) => (false, Default::default(), Some(revert)),
        };
        Receipt {
          transaction_hash: *tx.hash(),
          transaction_index: index as u64,
          block_number: block.number,
          block_hash: *block.hash(),
          from: tx.from,
          to: tx.to,
          contract_address: execution.contract_address,
          gas_used: execution.gas_used,
          effective_gas_price: tx.gas_price,
          status,
          output,
          revert,
        }
      })
      .collect();

    (block, receipts, overlay.into_diff())
  }
}

#[cfg(test)]
mod tests {
  use {
    super::Mempool,
    crate::Genesis,
    fundme_primitives::{
      parse_ether,
      Address,
      Block,
      Calldata,
      Transaction,
      U256,
    },
    fundme_vm::{BlockEnv, InMemoryStateStore, State, BLOCK_GAS_LIMIT},
  };

  fn transfer(
    accounts: &[Address],
    nonce: u64,
    value: U256,
  ) -> Transaction {
    Transaction::new(
      accounts[0],
      Some(accounts[1]),
      nonce,
      value,
      21_000,
      U256::from(1_000_000_000u64),
      Calldata::Empty,
    )
  }

  fn block_env(genesis: &Genesis, parent: &Block, gas_limit: u64) -> BlockEnv {
    BlockEnv {
      number: parent.number + 1,
      timestamp: parent.timestamp + 1,
      coinbase: genesis.coinbase,
      gas_limit,
    }
  }

  #[test]
  fn produces_receipts_in_order() -> anyhow::Result<()> {
    let genesis = Genesis::default();
    let accounts = genesis.accounts()?;
    let mut store = InMemoryStateStore::default();
    store.apply(genesis.state(&accounts));
    let parent = genesis.block();
    let env = block_env(&genesis, &parent, BLOCK_GAS_LIMIT);

    let mut mempool = Mempool::default();
    mempool.consume(transfer(&accounts, 0, parse_ether(1)?));
    mempool.consume(transfer(&accounts, 1, parse_ether(2)?));
    // nonce gap, never valid
    mempool.consume(transfer(&accounts, 5, parse_ether(3)?));
    assert_eq!(mempool.len(), 3);

    let (block, receipts, diff) = mempool.produce(&store, &parent, &env);
    assert!(mempool.is_empty());
    assert_eq!(block.transactions.len(), 2);
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[1].transaction_index, 1);
    assert!(receipts.iter().all(|r| r.status && r.gas_used == 21_000));

    store.apply(diff);
    assert_eq!(
      store.get(&accounts[1]).unwrap().balance,
      genesis.balance + parse_ether(3)?
    );
    Ok(())
  }

  #[test]
  fn leaves_transactions_over_the_gas_limit_queued() -> anyhow::Result<()> {
    let genesis = Genesis::default();
    let accounts = genesis.accounts()?;
    let mut store = InMemoryStateStore::default();
    store.apply(genesis.state(&accounts));

    let mut mempool = Mempool::default();
    for nonce in 0..3 {
      mempool.consume(transfer(&accounts, nonce, parse_ether(1)?));
    }

    // room for two plain transfers
    let parent = genesis.block();
    let env = block_env(&genesis, &parent, 50_000);
    let (block, receipts, diff) = mempool.produce(&store, &parent, &env);
    assert_eq!(block.transactions.len(), 2);
    assert_eq!(receipts.len(), 2);
    assert_eq!(mempool.len(), 1);
    store.apply(diff);

    let env = block_env(&genesis, &block, 50_000);
    let (next, receipts, _) = mempool.produce(&store, &block, &env);
    assert!(mempool.is_empty());
    assert_eq!(next.transactions.len(), 1);
    assert_eq!(next.transactions[0].nonce, 2);
    assert_eq!(receipts[0].transaction_index, 0);
    Ok(())
  }
}
