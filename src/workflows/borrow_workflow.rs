use crate::classification::{available_devices, device_types};
use crate::loaner_api::loaner_client::LoanerApiTrait;
use crate::loaner_api::models::borrow_reason::BorrowReason;
use crate::loaner_api::models::device::Device;
use crate::loaner_api::models::request::loan_request::BorrowRequest;
use crate::validation::{email_error, required_field_error};
use crate::workflows::{
    FieldErrors, SubmitError, WorkflowError, WorkflowState, require_idle, require_submitted,
};
use chrono::Utc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BorrowField {
    Name,
    Email,
    Reason,
    CustomReason,
    DeviceType,
    DeviceName,
}

impl BorrowField {
    pub fn key(&self) -> &'static str {
        match self {
            BorrowField::Name => "name",
            BorrowField::Email => "email",
            BorrowField::Reason => "reason",
            BorrowField::CustomReason => "customReason",
            BorrowField::DeviceType => "deviceType",
            BorrowField::DeviceName => "deviceName",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowForm {
    pub name: String,
    pub email: String,
    pub reason: Option<BorrowReason>,
    pub custom_reason: String,
    pub device_type: String,
    /// Asset id of the chosen device.
    pub device_name: String,
}

/// Form controller for borrowing a device from the pool.
pub struct BorrowWorkflow<C>
where
    C: LoanerApiTrait,
{
    client: C,
    state: WorkflowState,
    devices: Vec<Device>,
    form: BorrowForm,
    errors: FieldErrors<BorrowField>,
    last_error: Option<String>,
}

impl<C: LoanerApiTrait> BorrowWorkflow<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: WorkflowState::Loading,
            devices: Vec::new(),
            form: BorrowForm::default(),
            errors: FieldErrors::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn form(&self) -> &BorrowForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors<BorrowField> {
        &self.errors
    }

    /// Last data-access failure, kept for display until the next successful call.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Fetches the device list. Leaves `Loading` whether or not the fetch worked.
    pub async fn load(&mut self) {
        match self.client.list_devices().await {
            Ok(devices) => {
                self.devices = devices;
                self.last_error = None;
            }
            Err(e) => {
                error!("Failed to load devices: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        if self.state == WorkflowState::Loading {
            debug!("Borrow workflow ready with {} devices", self.devices.len());
            self.state = WorkflowState::Idle;
        }
    }

    pub fn device_type_options(&self) -> Vec<&str> {
        device_types(available_devices(&self.devices))
    }

    pub fn device_name_options(&self) -> Vec<&str> {
        if self.form.device_type.is_empty() {
            return Vec::new();
        }
        available_devices(&self.devices)
            .into_iter()
            .filter(|d| d.device_type == self.form.device_type)
            .map(|d| d.asset_id.as_str())
            .collect()
    }

    fn edit(&mut self, field: BorrowField) -> Result<&mut BorrowForm, WorkflowError> {
        require_idle(self.state, "edit the borrow form")?;
        self.errors.remove(&field);
        Ok(&mut self.form)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(BorrowField::Name)?.name = name.into();
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(BorrowField::Email)?.email = email.into();
        Ok(())
    }

    pub fn select_reason(&mut self, reason: Option<BorrowReason>) -> Result<(), WorkflowError> {
        self.edit(BorrowField::Reason)?.reason = reason;
        Ok(())
    }

    pub fn set_custom_reason(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(BorrowField::CustomReason)?.custom_reason = text.into();
        Ok(())
    }

    /// Picking a type discards the previously chosen device.
    pub fn select_device_type(&mut self, device_type: impl Into<String>) -> Result<(), WorkflowError> {
        let form = self.edit(BorrowField::DeviceType)?;
        form.device_type = device_type.into();
        form.device_name.clear();
        Ok(())
    }

    pub fn select_device(&mut self, asset_id: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(BorrowField::DeviceName)?.device_name = asset_id.into();
        Ok(())
    }

    fn validate(&self) -> Result<BorrowRequest, FieldErrors<BorrowField>> {
        let form = &self.form;
        let mut errors = FieldErrors::new();

        let mut check = |field: BorrowField, message: Option<String>| {
            if let Some(message) = message {
                errors.insert(field, message);
            }
        };
        check(BorrowField::Name, required_field_error(&form.name, "Name"));
        check(BorrowField::Email, email_error(&form.email));
        check(
            BorrowField::Reason,
            required_field_error(form.reason.map(|r| r.label()).unwrap_or_default(), "Reason"),
        );
        if form.reason == Some(BorrowReason::Other) {
            check(
                BorrowField::CustomReason,
                required_field_error(&form.custom_reason, "Custom reason"),
            );
        }
        check(BorrowField::DeviceType, required_field_error(&form.device_type, "Device type"));
        check(BorrowField::DeviceName, required_field_error(&form.device_name, "Device name"));

        match form.reason {
            Some(reason) if errors.is_empty() => Ok(BorrowRequest {
                asset_id: form.device_name.clone(),
                name: form.name.clone(),
                email: form.email.clone(),
                reason,
                device_type: form.device_type.clone(),
                custom_reason: Some(form.custom_reason.clone()).filter(|c| !c.is_empty()),
            }),
            _ => Err(errors),
        }
    }

    /// Validates and submits the form. Validation failures never reach the
    /// network; API failures keep the form so the user can retry.
    pub async fn submit(&mut self) -> Result<Device, SubmitError<BorrowField>> {
        require_idle(self.state, "submit the borrow form")?;

        let request = match self.validate() {
            Ok(request) => request,
            Err(errors) => {
                debug!("Borrow form rejected: {:?}", errors.keys().collect::<Vec<_>>());
                self.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors.clear();

        self.state = WorkflowState::Submitting;
        match self.client.submit_borrow(&request).await {
            Ok(device) => {
                info!("{} borrowed {}", request.email, device.asset_id);
                self.state = WorkflowState::Submitted { at: Utc::now() };
                self.form = BorrowForm::default();
                self.last_error = None;
                self.load().await;
                Ok(device)
            }
            Err(e) => {
                error!("Failed to borrow device: {}", e);
                self.last_error = Some(e.to_string());
                self.state = WorkflowState::Idle;
                Err(SubmitError::Api(e))
            }
        }
    }

    /// "Borrow another": back to an empty form after a successful submission.
    pub fn borrow_another(&mut self) -> Result<(), WorkflowError> {
        require_submitted(self.state, "borrow another device")?;
        self.state = WorkflowState::Idle;
        Ok(())
    }
}
