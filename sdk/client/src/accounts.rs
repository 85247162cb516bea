use {crate::Error, fundme_devnode::Devnode, fundme_primitives::Address};

/// Accounts referred to by role rather than by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedAccounts {
  /// Deploys the contracts and owns FundMe. First development account.
  pub deployer: Address,
}

impl NamedAccounts {
  pub fn resolve(node: &Devnode) -> Result<Self, Error> {
    Ok(Self {
      deployer: *signers(node)
        .first()
        .ok_or(Error::MissingAccount("deployer"))?,
    })
  }
}

/// Every account the node can send transactions from, in index order.
pub fn signers(node: &Devnode) -> &[Address] {
  node.accounts()
}
