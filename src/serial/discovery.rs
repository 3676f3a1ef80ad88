use serde::{Deserialize, Serialize};
use serialport::SerialPortType;

use super::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialDeviceInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<serialport::SerialPortInfo> for SerialDeviceInfo {
    fn from(port: serialport::SerialPortInfo) -> Self {
        match port.port_type {
            SerialPortType::UsbPort(usb_info) => Self {
                port_name: port.port_name,
                port_type: "usb".to_string(),
                vid: Some(usb_info.vid),
                pid: Some(usb_info.pid),
                serial_number: usb_info.serial_number,
                manufacturer: usb_info.manufacturer,
                product: usb_info.product,
            },
            other => Self {
                port_name: port.port_name,
                port_type: match other {
                    SerialPortType::PciPort => "pci",
                    SerialPortType::BluetoothPort => "bluetooth",
                    _ => "unknown",
                }
                .to_string(),
                vid: None,
                pid: None,
                serial_number: None,
                manufacturer: None,
                product: None,
            },
        }
    }
}

/// List every serial port the OS reports.
pub fn available_ports() -> Result<Vec<SerialDeviceInfo>> {
    let ports = serialport::available_ports()?;
    log::debug!("Found {} serial ports", ports.len());
    Ok(ports.into_iter().map(SerialDeviceInfo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::{SerialPortInfo, UsbPortInfo};

    #[test]
    fn usb_port_keeps_identifiers() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x2E8A,
                pid: 0x000A,
                serial_number: Some("E660".to_string()),
                manufacturer: Some("Raspberry Pi".to_string()),
                product: Some("Pico".to_string()),
            }),
        };
        let dev = SerialDeviceInfo::from(info);
        assert_eq!(dev.port_type, "usb");
        assert_eq!(dev.vid, Some(0x2E8A));
        assert_eq!(dev.product.as_deref(), Some("Pico"));
    }

    #[test]
    fn non_usb_port_has_no_identifiers() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        };
        let dev = SerialDeviceInfo::from(info);
        assert_eq!(dev.port_type, "unknown");
        assert!(dev.vid.is_none());
        let json = serde_json::to_value(&dev).unwrap();
        assert_eq!(json["port_name"], "/dev/ttyS0");
    }
}
