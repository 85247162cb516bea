use {
  fundme_primitives::{Account, Address},
  serde::{Deserialize, Serialize},
  std::collections::{BTreeMap, BTreeSet, HashMap},
};

/// Represents a change in accounts state.
///
/// State diffs are meant to be accumulated and logically the entire
/// state of the chain is the result of cumulative application of
/// consecutive state diffs.
///
/// A transaction produces a statediff, blocks produce state diffs
/// which are all its transactions state diffs merged together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDiff {
  upserts: BTreeMap<Address, Account>,
  deletes: BTreeSet<Address>,
}

impl StateDiff {
  /// Inserts or updates an account under a given address.
  ///
  /// If the state diff had an account stored under this address
  /// then the old value is returned, otherwise `None` is returned.
  pub fn set(&mut self, address: Address, account: Account) -> Option<Account> {
    self.deletes.remove(&address);
    self.upserts.insert(address, account)
  }

  /// Removes an account under a given address.
  ///
  /// If the state diff contained an account at the given address
  /// then the removed value is returned, otherwise `None`.
  pub fn remove(&mut self, address: &Address) -> Option<Account> {
    self.deletes.insert(*address);
    self.upserts.remove(address)
  }

  /// Merges a state diff with a newer diff.
  ///
  /// Applying the resulting diff is equivalent to
  /// applying the two merged diffs consecutively on
  /// any state store.
  pub fn merge(self, newer: StateDiff) -> StateDiff {
    let mut upserts = self.upserts;
    let mut deletes = self.deletes;
    for (addr, acc) in newer.upserts {
      deletes.remove(&addr);
      upserts.insert(addr, acc);
    }
    for addr in newer.deletes {
      upserts.remove(&addr);
      deletes.insert(addr);
    }
    StateDiff { upserts, deletes }
  }

  /// Looks up an address in this diff only.
  ///
  ///   1. `None` => the diff does not touch this address.
  ///   2. `Some(None)` => the account was deleted.
  ///   3. `Some(Some(account))` => the account was created or changed.
  pub fn lookup(&self, address: &Address) -> Option<Option<&Account>> {
    if self.deletes.contains(address) {
      return Some(None);
    }
    self.upserts.get(address).map(Some)
  }

  /// Iterate over all account changes in a state diff.
  ///
  /// There are two variants of changes:
  ///   1. (Address, Account) => Means that account under a given address was
  ///      created or changed its contents.
  ///   2. (Address, None) => Means that account under a given address was
  ///      deleted.
  pub fn iter(&self) -> impl Iterator<Item = (&Address, Option<&Account>)> {
    self
      .upserts
      .iter()
      .map(|(addr, acc)| (addr, Some(acc)))
      .chain(self.deletes.iter().map(|addr| (addr, None)))
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty() && self.deletes.is_empty()
  }
}

impl State for StateDiff {
  fn get(&self, address: &Address) -> Option<Account> {
    self.upserts.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    *self = std::mem::take(self).merge(diff);
  }
}

pub trait State {
  fn get(&self, address: &Address) -> Option<Account>;
  fn apply(&mut self, diff: StateDiff);
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
  data: HashMap<Address, Account>,
}

impl InMemoryStateStore {
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.data.iter()
  }
}

impl State for InMemoryStateStore {
  fn get(&self, address: &Address) -> Option<Account> {
    self.data.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    for (k, v) in diff.upserts {
      self.data.insert(k, v);
    }

    for addr in diff.deletes {
      self.data.remove(&addr);
    }
  }
}

/// Copy-on-write view over another state.
///
/// Reads fall through to the underlying state unless the address was
/// written through this overlay. Writes never reach the underlying
/// state, they are accumulated and handed out as a [`StateDiff`] so the
/// caller can decide whether to keep or discard them.
pub struct Overlay<'s> {
  base: &'s dyn State,
  diff: StateDiff,
}

impl<'s> Overlay<'s> {
  pub fn new(base: &'s dyn State) -> Self {
    Self {
      base,
      diff: StateDiff::default(),
    }
  }

  /// Account at a given address, or an empty account if none exists.
  pub fn account(&self, address: &Address) -> Account {
    self.get(address).unwrap_or_default()
  }

  pub fn set(&mut self, address: Address, account: Account) {
    self.diff.set(address, account);
  }

  pub fn into_diff(self) -> StateDiff {
    self.diff
  }
}

impl State for Overlay<'_> {
  fn get(&self, address: &Address) -> Option<Account> {
    match self.diff.lookup(address) {
      Some(local) => local.cloned(),
      None => self.base.get(address),
    }
  }

  fn apply(&mut self, diff: StateDiff) {
    self.diff.apply(diff);
  }
}
