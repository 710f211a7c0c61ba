use crate::loaner_api::models::borrow_reason::BorrowReason;
use crate::loaner_api::models::device::Device;
use serde::{Deserialize, Serialize};

/// POST body shared by borrow and return. The server treats a body with empty
/// `Name`/`Email` as a return of `AssetID`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LoanRequest {
    #[serde(rename = "AssetID")]
    pub asset_id: String,
    #[serde(rename = "DeviceType")]
    pub device_type: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl LoanRequest {
    pub fn borrow(request: &BorrowRequest) -> Self {
        Self {
            asset_id: request.asset_id.clone(),
            device_type: request.device_type.clone(),
            email: request.email.clone(),
            name: request.name.clone(),
            reason: request.final_reason(),
        }
    }

    pub fn release(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            ..Default::default()
        }
    }
}

/// The record as it should stand once the server has applied `request`.
impl From<&LoanRequest> for Device {
    fn from(request: &LoanRequest) -> Self {
        Device {
            asset_id: request.asset_id.clone(),
            device_type: request.device_type.clone(),
            email: request.email.clone(),
            name: request.name.clone(),
            borrowed: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRequest {
    pub asset_id: String,
    pub name: String,
    pub email: String,
    pub reason: BorrowReason,
    pub device_type: String,
    pub custom_reason: Option<String>,
}

impl BorrowRequest {
    pub fn final_reason(&self) -> String {
        match self.reason {
            BorrowReason::Other => self.custom_reason.clone().unwrap_or_default(),
            fixed => fixed.label().to_string(),
        }
    }
}
