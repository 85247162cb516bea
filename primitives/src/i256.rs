//! Serde adapter storing signed 256-bit integers as their raw two's
//! complement `U256` word, the same way the EVM keeps them in storage.

use {
  ethers::types::{I256, U256},
  serde::{Deserialize, Deserializer, Serialize, Serializer},
};

pub fn serialize<S: Serializer>(
  value: &I256,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  value.into_raw().serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<I256, D::Error> {
  U256::deserialize(deserializer).map(I256::from_raw)
}
