use {
  crate::{
    deployments::{FUND_ME, MOCK_V3_AGGREGATOR},
    Error,
  },
  fundme_devnode::{Devnode, TransactionRequest},
  fundme_primitives::{
    Address,
    AggregatorCall,
    Calldata,
    FundMeCall,
    Output,
    Receipt,
    Revert,
    RoundData,
    ToHexString,
    H256,
    I256,
    U256,
  },
  futures::future::{BoxFuture, FutureExt},
  std::future::IntoFuture,
  tracing::debug,
};

/// A sent transaction that may not be mined yet.
///
/// Awaiting it directly waits for one confirmation.
#[derive(Clone)]
pub struct PendingTransaction {
  node: Devnode,
  hash: H256,
}

impl PendingTransaction {
  pub(crate) fn new(node: Devnode, hash: H256) -> Self {
    Self { node, hash }
  }

  pub fn hash(&self) -> H256 {
    self.hash
  }

  /// Waits until the transaction has `confirmations` blocks on top of
  /// and including its own. A transaction that was mined but reverted
  /// is returned as [`Error::Reverted`].
  ///
  /// The devnode refuses transactions that revert when simulated, so a
  /// failed receipt only shows up when the state changed between
  /// sending and mining.
  pub async fn wait(self, confirmations: u64) -> Result<Receipt, Error> {
    let receipt = self
      .node
      .wait_for_confirmations(self.hash, confirmations)
      .await?;
    into_result(receipt)
  }
}

fn into_result(receipt: Receipt) -> Result<Receipt, Error> {
  match receipt.status {
    true => Ok(receipt),
    false => Err(Error::Reverted(
      receipt
        .revert
        .unwrap_or_else(|| Revert::message("reverted without a reason")),
    )),
  }
}

impl IntoFuture for PendingTransaction {
  type IntoFuture = BoxFuture<'static, Self::Output>;
  type Output = Result<Receipt, Error>;

  fn into_future(self) -> Self::IntoFuture {
    self.wait(1).boxed()
  }
}

/// A deployed contract as seen from one signing account.
#[derive(Clone)]
struct Binding {
  node: Devnode,
  address: Address,
  signer: Address,
}

impl Binding {
  async fn transact(
    &self,
    input: impl Into<Calldata>,
    value: U256,
  ) -> Result<PendingTransaction, Error> {
    let input = input.into();
    debug!(
      "{} sends {} to {} with {value} wei",
      self.signer.to_hex(),
      input.signature(),
      self.address.to_hex()
    );
    let hash = self
      .node
      .send_transaction(
        TransactionRequest::new(self.signer)
          .to(self.address)
          .value(value)
          .input(input),
      )
      .await?;

    Ok(PendingTransaction::new(self.node.clone(), hash))
  }

  async fn view(&self, input: impl Into<Calldata>) -> Result<Output, Error> {
    Ok(
      self
        .node
        .call(
          TransactionRequest::new(self.signer)
            .to(self.address)
            .input(input),
        )
        .await?,
    )
  }

  async fn deployed(
    node: &Devnode,
    name: &str,
    signer: Address,
  ) -> Result<Self, Error> {
    let deployment = node
      .deployment(name)
      .await?
      .ok_or_else(|| Error::MissingDeployment(name.to_owned()))?;
    Ok(Self {
      node: node.clone(),
      address: deployment.address,
      signer,
    })
  }
}

/// Client of a deployed FundMe contract.
#[derive(Clone)]
pub struct FundMe {
  binding: Binding,
}

impl FundMe {
  /// The recorded `FundMe` deployment, sending as `signer`.
  pub async fn deployed(node: &Devnode, signer: Address) -> Result<Self, Error> {
    Ok(Self {
      binding: Binding::deployed(node, FUND_ME, signer).await?,
    })
  }

  pub fn at(node: &Devnode, address: Address, signer: Address) -> Self {
    Self {
      binding: Binding {
        node: node.clone(),
        address,
        signer,
      },
    }
  }

  /// The same contract, sending as another account.
  pub fn connect(&self, signer: Address) -> Self {
    Self {
      binding: Binding {
        signer,
        ..self.binding.clone()
      },
    }
  }

  pub fn address(&self) -> Address {
    self.binding.address
  }

  pub fn signer(&self) -> Address {
    self.binding.signer
  }

  pub async fn fund(&self, value: U256) -> Result<PendingTransaction, Error> {
    self.binding.transact(FundMeCall::Fund, value).await
  }

  pub async fn withdraw(&self) -> Result<PendingTransaction, Error> {
    self.binding.transact(FundMeCall::Withdraw, U256::zero()).await
  }

  pub async fn c_withdrawal(&self) -> Result<PendingTransaction, Error> {
    self
      .binding
      .transact(FundMeCall::CheaperWithdraw, U256::zero())
      .await
  }

  pub async fn get_price_feed(&self) -> Result<Address, Error> {
    let call = FundMeCall::GetPriceFeed;
    let signature = call.signature();
    self
      .binding
      .view(call)
      .await?
      .into_address()
      .ok_or(Error::UnexpectedOutput(signature))
  }

  pub async fn get_owner(&self) -> Result<Address, Error> {
    let call = FundMeCall::GetOwner;
    let signature = call.signature();
    self
      .binding
      .view(call)
      .await?
      .into_address()
      .ok_or(Error::UnexpectedOutput(signature))
  }

  pub async fn get_address_to_amount_funded(
    &self,
    funder: Address,
  ) -> Result<U256, Error> {
    let call = FundMeCall::GetAddressToAmountFunded(funder);
    let signature = call.signature();
    self
      .binding
      .view(call)
      .await?
      .into_uint()
      .ok_or(Error::UnexpectedOutput(signature))
  }

  pub async fn get_funder(
    &self,
    index: impl Into<U256>,
  ) -> Result<Address, Error> {
    let call = FundMeCall::GetFunder(index.into());
    let signature = call.signature();
    self
      .binding
      .view(call)
      .await?
      .into_address()
      .ok_or(Error::UnexpectedOutput(signature))
  }

  pub async fn get_version(&self) -> Result<U256, Error> {
    let call = FundMeCall::GetVersion;
    let signature = call.signature();
    self
      .binding
      .view(call)
      .await?
      .into_uint()
      .ok_or(Error::UnexpectedOutput(signature))
  }
}

/// Client of a deployed mock price feed.
#[derive(Clone)]
pub struct MockV3Aggregator {
  binding: Binding,
}

impl MockV3Aggregator {
  pub async fn deployed(node: &Devnode, signer: Address) -> Result<Self, Error> {
    Ok(Self {
      binding: Binding::deployed(node, MOCK_V3_AGGREGATOR, signer).await?,
    })
  }

  pub fn at(node: &Devnode, address: Address, signer: Address) -> Self {
    Self {
      binding: Binding {
        node: node.clone(),
        address,
        signer,
      },
    }
  }

  pub fn connect(&self, signer: Address) -> Self {
    Self {
      binding: Binding {
        signer,
        ..self.binding.clone()
      },
    }
  }

  pub fn address(&self) -> Address {
    self.binding.address
  }

  pub async fn decimals(&self) -> Result<u8, Error> {
    self
      .binding
      .view(AggregatorCall::Decimals)
      .await?
      .into_uint8()
      .ok_or(Error::UnexpectedOutput("decimals()"))
  }

  pub async fn description(&self) -> Result<String, Error> {
    self
      .binding
      .view(AggregatorCall::Description)
      .await?
      .into_text()
      .ok_or(Error::UnexpectedOutput("description()"))
  }

  pub async fn version(&self) -> Result<U256, Error> {
    self
      .binding
      .view(AggregatorCall::Version)
      .await?
      .into_uint()
      .ok_or(Error::UnexpectedOutput("version()"))
  }

  pub async fn latest_round_data(&self) -> Result<RoundData, Error> {
    self
      .binding
      .view(AggregatorCall::LatestRoundData)
      .await?
      .into_round_data()
      .ok_or(Error::UnexpectedOutput("latestRoundData()"))
  }

  pub async fn get_round_data(&self, round_id: u64) -> Result<RoundData, Error> {
    self
      .binding
      .view(AggregatorCall::GetRoundData(round_id))
      .await?
      .into_round_data()
      .ok_or(Error::UnexpectedOutput("getRoundData(uint80)"))
  }

  pub async fn update_answer(
    &self,
    answer: I256,
  ) -> Result<PendingTransaction, Error> {
    self
      .binding
      .transact(AggregatorCall::UpdateAnswer(answer), U256::zero())
      .await
  }

  pub async fn update_round_data(
    &self,
    round_id: u64,
    answer: I256,
    timestamp: u64,
    started_at: u64,
  ) -> Result<PendingTransaction, Error> {
    let call = AggregatorCall::UpdateRoundData {
      round_id,
      answer,
      timestamp,
      started_at,
    };
    self.binding.transact(call, U256::zero()).await
  }
}
