use {
  crate::Error,
  ethers::{
    core::k256::ecdsa::SigningKey,
    signers::{
      coins_bip39::{English, Mnemonic, MnemonicError},
      Signer,
      Wallet,
    },
  },
  fundme_primitives::{Account, Address, Block, U256},
  fundme_vm::StateDiff,
  std::time::{SystemTime, UNIX_EPOCH},
};

/// BIP-44 path prefix of Ethereum accounts, the index is appended.
const DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// Chain id used by local development networks.
pub const DEVELOPMENT_CHAIN_ID: u64 = 31337;

/// Seed phrase the development accounts are derived from.
pub const DEVELOPMENT_SEED: &str =
  "test test test test test test test test test test test junk";

/// Recipient of gas fees on the devnode.
pub const DEVELOPMENT_COINBASE: Address = Address::repeat_byte(0xc0);

/// Initial conditions of a development chain.
#[derive(Debug, Clone)]
pub struct Genesis {
  pub chain_id: u64,
  pub seed: String,
  pub accounts: usize,
  pub balance: U256,
  pub timestamp: u64,
  pub coinbase: Address,
}

impl Default for Genesis {
  fn default() -> Self {
    Self {
      chain_id: DEVELOPMENT_CHAIN_ID,
      seed: DEVELOPMENT_SEED.to_owned(),
      accounts: 20,
      balance: U256::from(10_000) * U256::exp10(18),
      timestamp: unix_now(),
      coinbase: DEVELOPMENT_COINBASE,
    }
  }
}

impl Genesis {
  /// Addresses of the unlocked development accounts, in a stable
  /// order. Index 0 is the conventional deployer.
  pub fn accounts(&self) -> Result<Vec<Address>, Error> {
    development_accounts(&self.seed, self.accounts)
  }

  /// Genesis state funding every account in `accounts`.
  pub fn state(&self, accounts: &[Address]) -> StateDiff {
    let mut diff = StateDiff::default();
    for address in accounts {
      diff.set(*address, Account::with_balance(self.balance));
    }
    diff
  }

  pub fn block(&self) -> Block {
    Block::genesis(self.timestamp, self.coinbase)
  }
}

/// Addresses of the first `count` accounts of a BIP-39 seed phrase,
/// on the standard `m/44'/60'/0'/0/{index}` path.
///
/// These are the addresses any wallet derives from the same phrase.
/// The devnode never verifies signatures, so the keys are discarded.
pub fn development_accounts(
  seed: &str,
  count: usize,
) -> Result<Vec<Address>, Error> {
  let master = Mnemonic::<English>::new_from_phrase(seed)?.master_key(None)?;
  (0..count)
    .map(|index| {
      let child = master
        .derive_path(format!("{DERIVATION_PATH_PREFIX}{index}").as_str())
        .map_err(MnemonicError::from)?;
      let key: &SigningKey = child.as_ref();
      Ok(Wallet::from(key.clone()).address())
    })
    .collect()
}

pub(crate) fn unix_now() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs())
    .unwrap_or_default()
}
