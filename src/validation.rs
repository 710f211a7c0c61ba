pub const INSTITUTIONAL_DOMAIN: &str = "@ics.edu.sg";

pub fn is_required_field_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_institutional_email(value: &str) -> bool {
    value.contains(INSTITUTIONAL_DOMAIN)
}

pub fn required_field_error(value: &str, field_label: &str) -> Option<String> {
    if !is_required_field_present(value) {
        return Some(format!("{} is required", field_label));
    }
    None
}

pub fn email_error(value: &str) -> Option<String> {
    if !is_required_field_present(value) {
        return Some("Email is required".to_string());
    }
    if !is_institutional_email(value) {
        return Some(format!("Email must contain {}", INSTITUTIONAL_DOMAIN));
    }
    None
}
