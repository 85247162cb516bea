use ethers::types::{Address, H256};

/// Full `0x`-prefixed hex rendering.
///
/// The `Display` impls of the ethers hash types abbreviate the middle
/// of the value, which is unhelpful in logs and CLI output.
pub trait ToHexString {
  fn to_hex(&self) -> String;
}

impl ToHexString for H256 {
  fn to_hex(&self) -> String {
    format!("0x{}", hex::encode(self.as_bytes()))
  }
}

impl ToHexString for Address {
  fn to_hex(&self) -> String {
    format!("0x{}", hex::encode(self.as_bytes()))
  }
}

impl ToHexString for &[u8] {
  fn to_hex(&self) -> String {
    format!("0x{}", hex::encode(self))
  }
}

impl<const N: usize> ToHexString for [u8; N] {
  fn to_hex(&self) -> String {
    format!("0x{}", hex::encode(self))
  }
}

#[cfg(test)]
mod tests {
  use {super::ToHexString, ethers::types::Address};

  #[test]
  fn renders_full_width() {
    let addr = Address::repeat_byte(0xab);
    assert_eq!(addr.to_hex(), format!("0x{}", "ab".repeat(20)));
    assert_eq!([0u8, 1, 2].to_hex(), "0x000102");
  }
}
