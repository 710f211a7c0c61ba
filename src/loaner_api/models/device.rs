use serde::{Deserialize, Serialize};

/// One loanable asset as the system of record reports it.
///
/// `name` and `email` are the borrower fields: both empty while the device sits
/// in the pool, both set while it is on loan. Nothing on the wire enforces that
/// pairing, so [`Device::loan_status`] reports the mixed case separately.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Device {
    #[serde(rename = "AssetID", default)]
    pub asset_id: String,
    #[serde(rename = "DeviceType", default)]
    pub device_type: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Informational only, loan status is derived from the borrower fields.
    #[serde(rename = "Borrowed", default)]
    pub borrowed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Available,
    Borrowed,
    /// Exactly one of the borrower fields is set.
    Inconsistent,
}

impl Device {
    pub fn loan_status(&self) -> LoanStatus {
        match (self.name.is_empty(), self.email.is_empty()) {
            (true, true) => LoanStatus::Available,
            (false, false) => LoanStatus::Borrowed,
            _ => LoanStatus::Inconsistent,
        }
    }

    pub fn is_available(&self) -> bool {
        self.loan_status() == LoanStatus::Available
    }

    pub fn is_borrowed(&self) -> bool {
        self.loan_status() == LoanStatus::Borrowed
    }
}
