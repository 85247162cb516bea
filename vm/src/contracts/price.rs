//! ETH/USD conversion helpers used by FundMe.
//!
//! Price feeds report USD prices with 8 decimals while ether amounts
//! carry 18, so the feed answer is scaled by 1e10 before use.

use fundme_primitives::{PanicCode, Revert, RoundData, I256, U256};

/// Minimum contribution accepted by `fund()`, 50 USD with 18 decimals.
pub fn minimum_usd() -> U256 {
  U256::from(50) * U256::exp10(18)
}

/// Price of one ether in USD with 18 decimals.
///
/// Negative answers are reinterpreted as unsigned, matching an
/// `uint256(int256)` conversion.
pub fn eth_price(round: &RoundData) -> Result<U256, Revert> {
  round
    .answer
    .checked_mul(I256::from_raw(U256::exp10(10)))
    .map(I256::into_raw)
    .ok_or(Revert::Panic(PanicCode::ArithmeticOverflow))
}

/// Value of `eth_amount` wei in USD with 18 decimals.
pub fn conversion_rate(eth_amount: U256, eth_price: U256) -> Result<U256, Revert> {
  eth_price
    .checked_mul(eth_amount)
    .map(|product| product / U256::exp10(18))
    .ok_or(Revert::Panic(PanicCode::ArithmeticOverflow))
}
