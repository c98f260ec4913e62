use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Supported charge methods. Mobile-money methods debit an MSISDN wallet and
/// therefore need an originating phone number on the purchase request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChargeMethod {
    MtnMomo,
    AirtelMoney,
    Wallet,
}

impl ChargeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeMethod::MtnMomo => "mtn_momo",
            ChargeMethod::AirtelMoney => "airtel_money",
            ChargeMethod::Wallet => "wallet",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "mtn_momo" => Some(ChargeMethod::MtnMomo),
            "airtel_money" => Some(ChargeMethod::AirtelMoney),
            "wallet" => Some(ChargeMethod::Wallet),
            _ => None,
        }
    }

    pub fn requires_phone_number(&self) -> bool {
        matches!(self, ChargeMethod::MtnMomo | ChargeMethod::AirtelMoney)
    }
}

impl Display for ChargeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
