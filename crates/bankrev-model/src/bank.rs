//! The fixed set of banks covered by the pipeline.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the three banks whose mobile-app reviews are analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bank {
    /// Commercial Bank of Ethiopia.
    Cbe,
    /// Bank of Abyssinia.
    Boa,
    /// Dashen Bank.
    Dashen,
}

impl Bank {
    /// All banks, in processing order.
    pub const ALL: [Bank; 3] = [Bank::Cbe, Bank::Boa, Bank::Dashen];

    /// Full bank name as stored in the `banks` table.
    pub fn name(self) -> &'static str {
        match self {
            Bank::Cbe => "Commercial Bank of Ethiopia",
            Bank::Boa => "Bank of Abyssinia",
            Bank::Dashen => "Dashen Bank",
        }
    }

    /// Short code used in the cleaned CSV checkpoint.
    pub fn code(self) -> &'static str {
        match self {
            Bank::Cbe => "CBE",
            Bank::Boa => "BOA",
            Bank::Dashen => "Dashen",
        }
    }

    /// Google Play application identifier for the bank's mobile app.
    ///
    /// Verify these on the store if a fetch comes back empty
    /// (`https://play.google.com/store/apps/details?id=...`).
    pub fn app_id(self) -> &'static str {
        match self {
            Bank::Cbe => "com.combanketh.mobilebanking",
            Bank::Boa => "com.boa.boaMobileBanking",
            Bank::Dashen => "com.cr2.amolelight",
        }
    }

    /// Resolve a bank from its app identifier.
    pub fn from_app_id(app_id: &str) -> Option<Bank> {
        Bank::ALL.into_iter().find(|bank| bank.app_id() == app_id)
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string does not name a known bank.
#[derive(Debug, Clone, Error)]
#[error("unknown bank: {0:?}")]
pub struct ParseBankError(pub String);

impl FromStr for Bank {
    type Err = ParseBankError;

    /// Accepts the short code, the full name, or the app id.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        for bank in Bank::ALL {
            if trimmed.eq_ignore_ascii_case(bank.code())
                || trimmed.eq_ignore_ascii_case(bank.name())
                || trimmed == bank.app_id()
            {
                return Ok(bank);
            }
        }
        Err(ParseBankError(trimmed.to_string()))
    }
}
