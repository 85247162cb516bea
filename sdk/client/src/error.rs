use {fundme_primitives::Revert, thiserror::Error};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Transaction reverted: {0}")]
  Reverted(Revert),

  #[error("Devnode error: {0}")]
  Node(fundme_devnode::Error),

  #[error("Unknown network '{0}'")]
  UnknownNetwork(String),

  #[error("Network '{0}' is live, broadcasting to it is not supported")]
  UnsupportedNetwork(String),

  #[error("No deployment named '{0}', run the deployment fixture first")]
  MissingDeployment(String),

  #[error("Node has no account for the named account '{0}'")]
  MissingAccount(&'static str),

  #[error("Unknown deployment tag '{0}'")]
  UnknownTag(String),

  #[error("Unexpected output of {0}")]
  UnexpectedOutput(&'static str),
}

impl Error {
  /// True for any reverted transaction or call.
  pub fn is_revert(&self) -> bool {
    matches!(self, Error::Reverted(_))
  }

  /// True if reverted through `require` with exactly this message.
  pub fn is_revert_with(&self, message: &str) -> bool {
    matches!(self, Error::Reverted(revert) if revert.is_message(message))
  }

  /// True if reverted with the named custom error.
  pub fn is_custom_error(&self, name: &str) -> bool {
    matches!(self, Error::Reverted(revert) if revert.is_custom(name))
  }
}

impl From<fundme_devnode::Error> for Error {
  fn from(error: fundme_devnode::Error) -> Self {
    match error {
      fundme_devnode::Error::Reverted(revert) => Error::Reverted(revert),
      other => Error::Node(other),
    }
  }
}

impl From<Revert> for Error {
  fn from(revert: Revert) -> Self {
    Error::Reverted(revert)
  }
}
