//! Partitioning of the device list by loan status.
//!
//! All functions borrow the list and return references into it; the caller's
//! snapshot is never reordered or modified.

use crate::loaner_api::models::device::Device;

pub fn available_devices(devices: &[Device]) -> Vec<&Device> {
    devices.iter().filter(|d| d.is_available()).collect()
}

pub fn borrowed_devices(devices: &[Device]) -> Vec<&Device> {
    devices.iter().filter(|d| d.is_borrowed()).collect()
}

/// Borrowed devices whose borrower matches `name` and `email`, compared after
/// lowercasing both sides.
pub fn borrowed_devices_by_user<'a>(
    devices: &'a [Device],
    name: &str,
    email: &str,
) -> Vec<&'a Device> {
    let name = name.to_lowercase();
    let email = email.to_lowercase();
    devices
        .iter()
        .filter(|d| d.is_borrowed())
        .filter(|d| d.name.to_lowercase() == name && d.email.to_lowercase() == email)
        .collect()
}

/// Distinct device types in first-seen order.
pub fn device_types<'a, I>(devices: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Device>,
{
    let mut types: Vec<&str> = Vec::new();
    for device in devices {
        if !types.contains(&device.device_type.as_str()) {
            types.push(&device.device_type);
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(asset_id: &str, device_type: &str, name: &str, email: &str) -> Device {
        Device {
            asset_id: asset_id.into(),
            device_type: device_type.into(),
            name: name.into(),
            email: email.into(),
            borrowed: String::new(),
        }
    }

    fn pool() -> Vec<Device> {
        vec![
            device("L1", "laptop", "", ""),
            device("T1", "tablet", "Ana", "ana@ics.edu.sg"),
            device("L2", "laptop", "Ben", "ben@ics.edu.sg"),
            device("T2", "tablet", "", ""),
            device("H1", "headset", "Ana", ""),
            device("H2", "headset", "", "orphan@ics.edu.sg"),
        ]
    }

    fn ids(devices: &[&Device]) -> Vec<String> {
        devices.iter().map(|d| d.asset_id.clone()).collect()
    }

    #[test]
    fn partitions_by_borrower_fields() {
        let devices = pool();
        assert_eq!(ids(&available_devices(&devices)), ["L1", "T2"]);
        assert_eq!(ids(&borrowed_devices(&devices)), ["T1", "L2"]);
    }

    #[test]
    fn available_and_borrowed_are_disjoint() {
        let devices = pool();
        let available = available_devices(&devices);
        let borrowed = borrowed_devices(&devices);
        assert!(available.iter().all(|a| !borrowed.contains(a)));
    }

    #[test]
    fn half_set_devices_fall_outside_both_partitions() {
        let devices = pool();
        let classified = available_devices(&devices).len() + borrowed_devices(&devices).len();
        assert_eq!(classified, devices.len() - 2);
        for half in ["H1", "H2"] {
            assert!(!ids(&available_devices(&devices)).contains(&half.to_string()));
            assert!(!ids(&borrowed_devices(&devices)).contains(&half.to_string()));
        }
    }

    #[test]
    fn consistent_devices_are_fully_covered() {
        let devices: Vec<Device> = pool()
            .into_iter()
            .filter(|d| d.name.is_empty() == d.email.is_empty())
            .collect();
        let classified = available_devices(&devices).len() + borrowed_devices(&devices).len();
        assert_eq!(classified, devices.len());
    }

    #[test]
    fn classification_is_idempotent_and_leaves_input_alone() {
        let devices = pool();
        let before = devices.clone();
        assert_eq!(available_devices(&devices), available_devices(&devices));
        assert_eq!(borrowed_devices(&devices), borrowed_devices(&devices));
        assert_eq!(devices, before);
    }

    #[test]
    fn by_user_matches_case_insensitively() {
        let devices = pool();
        assert_eq!(
            ids(&borrowed_devices_by_user(&devices, "ANA", "Ana@ICS.edu.sg")),
            ["T1"]
        );
        assert!(borrowed_devices_by_user(&devices, "Ana", "ben@ics.edu.sg").is_empty());
    }

    #[test]
    fn by_user_never_returns_available_devices() {
        let devices = pool();
        assert!(borrowed_devices_by_user(&devices, "", "").is_empty());
    }

    #[test]
    fn device_types_keep_first_seen_order() {
        let devices = pool();
        assert_eq!(device_types(&devices), ["laptop", "tablet", "headset"]);
        assert_eq!(device_types(available_devices(&devices)), ["laptop", "tablet"]);
    }
}
