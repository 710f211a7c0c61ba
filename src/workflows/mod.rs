use crate::loaner_api::loaner_client::ApiError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

pub mod borrow_workflow;
pub mod return_workflow;

/// Lifecycle shared by both form workflows.
///
/// `Loading -> Idle -> Submitting -> Submitted`, and back to `Idle` when the
/// user starts another request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Loading,
    Idle,
    Submitting,
    Submitted { at: DateTime<Utc> },
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowState::Loading => f.write_str("loading"),
            WorkflowState::Idle => f.write_str("idle"),
            WorkflowState::Submitting => f.write_str("submitting"),
            WorkflowState::Submitted { at } => write!(f, "submitted at {}", at.to_rfc3339()),
        }
    }
}

/// Field -> message, ordered the way the form lays the fields out.
pub type FieldErrors<F> = BTreeMap<F, String>;

#[derive(Debug, thiserror::Error)]
#[error("cannot {action} while {state}")]
pub struct WorkflowError {
    pub action: &'static str,
    pub state: WorkflowState,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError<F: Debug> {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors<F>),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

fn require_idle(state: WorkflowState, action: &'static str) -> Result<(), WorkflowError> {
    match state {
        WorkflowState::Idle => Ok(()),
        state => Err(WorkflowError { action, state }),
    }
}

fn require_submitted(state: WorkflowState, action: &'static str) -> Result<(), WorkflowError> {
    match state {
        WorkflowState::Submitted { .. } => Ok(()),
        state => Err(WorkflowError { action, state }),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::loaner_api::loaner_client::{ApiError, LoanerApiTrait};
    use crate::loaner_api::models::device::Device;
    use crate::loaner_api::models::request::loan_request::BorrowRequest;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory stand-in for the loaner endpoint.
    #[derive(Default)]
    pub struct FakeLoaner {
        pub devices: Mutex<Vec<Device>>,
        pub borrows: Mutex<Vec<BorrowRequest>>,
        pub returns: Mutex<Vec<String>>,
        pub list_calls: AtomicUsize,
        pub fail_status: Mutex<Option<u16>>,
    }

    impl FakeLoaner {
        pub fn with_devices(devices: Vec<Device>) -> Self {
            Self {
                devices: Mutex::new(devices),
                ..Default::default()
            }
        }

        pub fn fail_with(&self, status: Option<u16>) {
            *self.fail_status.lock().unwrap() = status;
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn failure(&self) -> Result<(), ApiError> {
            match *self.fail_status.lock().unwrap() {
                Some(status) => Err(ApiError::RequestFailed {
                    status,
                    status_text: "Injected".into(),
                }),
                None => Ok(()),
            }
        }
    }

    impl LoanerApiTrait for FakeLoaner {
        async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.failure()?;
            Ok(self.devices.lock().unwrap().clone())
        }

        async fn submit_borrow(&self, request: &BorrowRequest) -> Result<Device, ApiError> {
            self.failure()?;
            self.borrows.lock().unwrap().push(request.clone());
            let mut devices = self.devices.lock().unwrap();
            let device = devices
                .iter_mut()
                .find(|d| d.asset_id == request.asset_id)
                .ok_or_else(|| ApiError::RequestFailed {
                    status: 404,
                    status_text: "Not Found".into(),
                })?;
            device.name = request.name.clone();
            device.email = request.email.clone();
            Ok(device.clone())
        }

        async fn submit_return(&self, asset_id: &str) -> Result<(), ApiError> {
            self.failure()?;
            self.returns.lock().unwrap().push(asset_id.to_string());
            if let Some(device) = self
                .devices
                .lock()
                .unwrap()
                .iter_mut()
                .find(|d| d.asset_id == asset_id)
            {
                device.name.clear();
                device.email.clear();
            }
            Ok(())
        }
    }

    pub fn device(asset_id: &str, device_type: &str, name: &str, email: &str) -> Device {
        Device {
            asset_id: asset_id.into(),
            device_type: device_type.into(),
            name: name.into(),
            email: email.into(),
            borrowed: String::new(),
        }
    }

    /// One available laptop and one tablet on loan to Ana.
    pub fn l1_t1() -> Vec<Device> {
        vec![
            device("L1", "laptop", "", ""),
            device("T1", "tablet", "Ana", "ana@ics.edu.sg"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_accepts_edits() {
        assert!(require_idle(WorkflowState::Idle, "edit").is_ok());
        let err = require_idle(WorkflowState::Loading, "edit the form").unwrap_err();
        assert_eq!(err.to_string(), "cannot edit the form while loading");
        assert!(require_idle(WorkflowState::Submitting, "edit").is_err());
    }

    #[test]
    fn only_submitted_can_start_over() {
        let at = Utc::now();
        assert!(require_submitted(WorkflowState::Submitted { at }, "start over").is_ok());
        assert!(require_submitted(WorkflowState::Idle, "start over").is_err());
    }
}
