//! cpal device enumeration helpers, shared by [`crate::cpal_backend::CpalBackend`].

use crate::{AudioDevice, Error, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Read a cpal device's name, mapping its error into [`Error::Stream`].
pub(crate) fn device_name(device: &Device) -> Result<String> {
    device.name().map_err(|e| Error::Stream(e.to_string()))
}

/// List all available audio devices on the default host.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(inputs) = host.input_devices() {
        for device in inputs {
            if let Ok(name) = device_name(&device) {
                let sample_rate = device.default_input_config().map(|c| c.sample_rate().0).unwrap_or(48000);
                let is_output = device.default_output_config().is_ok();
                devices.push(AudioDevice { name, is_input: true, is_output, default_sample_rate: sample_rate });
            }
        }
    }

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                if devices.iter().any(|d| d.name == name) {
                    continue;
                }
                let sample_rate = device.default_output_config().map(|c| c.sample_rate().0).unwrap_or(48000);
                devices.push(AudioDevice { name, is_input: false, is_output: true, default_sample_rate: sample_rate });
            }
        }
    }

    Ok(devices)
}

/// Get the default input/output device info, if any.
pub fn default_device() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();

    let input = host.default_input_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            is_input: true,
            is_output: false,
            default_sample_rate: d.default_input_config().map(|c| c.sample_rate().0).unwrap_or(48000),
        })
    });

    let output = host.default_output_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            is_input: false,
            is_output: true,
            default_sample_rate: d.default_output_config().map(|c| c.sample_rate().0).unwrap_or(48000),
        })
    });

    Ok((input, output))
}

/// Find a cpal output device whose name contains `search` (case-insensitive).
pub(crate) fn find_output_device(host: &Host, search: &str) -> Result<Device> {
    let needle = search.to_lowercase();
    host.output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .find(|d| device_name(d).map(|n| n.to_lowercase().contains(&needle)).unwrap_or(false))
        .ok_or_else(|| Error::DeviceNotFound(search.to_string()))
}

/// Find a cpal input device whose name contains `search` (case-insensitive).
pub(crate) fn find_input_device(host: &Host, search: &str) -> Result<Device> {
    let needle = search.to_lowercase();
    host.input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .find(|d| device_name(d).map(|n| n.to_lowercase().contains(&needle)).unwrap_or(false))
        .ok_or_else(|| Error::DeviceNotFound(search.to_string()))
}
