use crate::classification::{borrowed_devices, borrowed_devices_by_user};
use crate::loaner_api::loaner_client::LoanerApiTrait;
use crate::loaner_api::models::device::Device;
use crate::validation::required_field_error;
use crate::workflows::{
    FieldErrors, SubmitError, WorkflowError, WorkflowState, require_idle, require_submitted,
};
use chrono::Utc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReturnField {
    Name,
    Email,
    DeviceName,
}

impl ReturnField {
    pub fn key(&self) -> &'static str {
        match self {
            ReturnField::Name => "name",
            ReturnField::Email => "email",
            ReturnField::DeviceName => "deviceName",
        }
    }
}

/// Name and email only gate the device list; they are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnForm {
    pub name: String,
    pub email: String,
    pub device_name: String,
}

pub struct ReturnWorkflow<C>
where
    C: LoanerApiTrait,
{
    client: C,
    state: WorkflowState,
    devices: Vec<Device>,
    form: ReturnForm,
    errors: FieldErrors<ReturnField>,
    last_error: Option<String>,
    scoped_to_borrower: bool,
}

impl<C: LoanerApiTrait> ReturnWorkflow<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: WorkflowState::Loading,
            devices: Vec::new(),
            form: ReturnForm::default(),
            errors: FieldErrors::new(),
            last_error: None,
            scoped_to_borrower: false,
        }
    }

    /// Offer only the devices on loan to the entered name/email instead of
    /// every borrowed device.
    pub fn scoped_to_borrower(mut self, scoped: bool) -> Self {
        self.scoped_to_borrower = scoped;
        self
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn form(&self) -> &ReturnForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors<ReturnField> {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

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
            debug!("Return workflow ready with {} devices", self.devices.len());
            self.state = WorkflowState::Idle;
        }
    }

    /// Empty until both name and email are filled in.
    pub fn device_options(&self) -> Vec<&Device> {
        if self.form.name.is_empty() || self.form.email.is_empty() {
            return Vec::new();
        }
        if self.scoped_to_borrower {
            borrowed_devices_by_user(&self.devices, &self.form.name, &self.form.email)
        } else {
            borrowed_devices(&self.devices)
        }
    }

    fn edit(&mut self, field: ReturnField) -> Result<&mut ReturnForm, WorkflowError> {
        require_idle(self.state, "edit the return form")?;
        self.errors.remove(&field);
        Ok(&mut self.form)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        let form = self.edit(ReturnField::Name)?;
        form.name = name.into();
        form.device_name.clear();
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), WorkflowError> {
        let form = self.edit(ReturnField::Email)?;
        form.email = email.into();
        form.device_name.clear();
        Ok(())
    }

    pub fn select_device(&mut self, asset_id: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(ReturnField::DeviceName)?.device_name = asset_id.into();
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<(), SubmitError<ReturnField>> {
        require_idle(self.state, "submit the return form")?;

        if let Some(message) = required_field_error(&self.form.device_name, "Device name") {
            self.errors = FieldErrors::from([(ReturnField::DeviceName, message)]);
            return Err(SubmitError::Invalid(self.errors.clone()));
        }
        self.errors.clear();

        let asset_id = self.form.device_name.clone();
        self.state = WorkflowState::Submitting;
        match self.client.submit_return(&asset_id).await {
            Ok(()) => {
                info!("Returned {}", asset_id);
                self.state = WorkflowState::Submitted { at: Utc::now() };
                self.form = ReturnForm::default();
                self.last_error = None;
                self.load().await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to return device: {}", e);
                self.last_error = Some(e.to_string());
                self.state = WorkflowState::Idle;
                Err(SubmitError::Api(e))
            }
        }
    }

    pub fn return_another(&mut self) -> Result<(), WorkflowError> {
        require_submitted(self.state, "return another device")?;
        self.state = WorkflowState::Idle;
        Ok(())
    }
}
