//! Shared helpers for command handlers.

use prosmart_core::Device;

use crate::error::CliError;

/// Find one device by id or (case-insensitive) name.
pub fn find_device(devices: &[Device], query: &str) -> Result<Device, CliError> {
    devices
        .iter()
        .find(|d| d.id.as_str() == query || d.name.eq_ignore_ascii_case(query))
        .cloned()
        .ok_or_else(|| CliError::NotFound {
            device: query.to_owned(),
        })
}

/// Select all devices, or the one matching `query`.
pub fn select_devices(devices: &[Device], query: Option<&str>) -> Result<Vec<Device>, CliError> {
    match query {
        None => Ok(devices.to_vec()),
        Some(query) => Ok(vec![find_device(devices, query)?]),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prosmart_core::DeviceId;

    use super::*;

    fn fixtures() -> Vec<Device> {
        vec![
            Device {
                id: DeviceId::new("abc123"),
                name: "Hallway".into(),
            },
            Device {
                id: DeviceId::new("def456"),
                name: "Bedroom".into(),
            },
        ]
    }

    #[test]
    fn finds_by_id_and_by_name() {
        let devices = fixtures();
        assert_eq!(find_device(&devices, "abc123").unwrap().name, "Hallway");
        assert_eq!(find_device(&devices, "bedroom").unwrap().id, DeviceId::new("def456"));
    }

    #[test]
    fn unknown_query_is_not_found() {
        let devices = fixtures();
        assert!(matches!(
            find_device(&devices, "attic"),
            Err(CliError::NotFound { .. })
        ));
    }

    #[test]
    fn no_query_selects_everything() {
        let devices = fixtures();
        assert_eq!(select_devices(&devices, None).unwrap().len(), 2);
        assert_eq!(select_devices(&devices, Some("Hallway")).unwrap().len(), 1);
    }
}
