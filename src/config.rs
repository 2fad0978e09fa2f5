use usb_device::endpoint::EndpointAddress;
use usb_device::UsbDirection;

/// Interface number of the CDC communication interface in the conventional ATmega32U4 layout.
pub const DEFAULT_ACM_INTERFACE: u8 = 0;

/// Interrupt IN endpoint carrying class notifications.
pub const DEFAULT_ACM_ENDPOINT: u8 = 1;

/// Bulk IN endpoint carrying serial data to the host.
pub const DEFAULT_DATA_IN_ENDPOINT: u8 = 3;

/// Bank size of the bulk IN endpoint.
pub const DEFAULT_PACKET_SIZE: u16 = 64;

/// Where the transmit path writes: endpoint numbers and interface number as set up by whatever
/// code configured the endpoints.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CdcConfig {
    data_in: EndpointAddress,
    notification: EndpointAddress,
    interface: u8,
    packet_size: u16,
}

impl CdcConfig {
    pub fn new() -> Self {
        CdcConfig {
            data_in: EndpointAddress::from_parts(DEFAULT_DATA_IN_ENDPOINT as usize, UsbDirection::In),
            notification: EndpointAddress::from_parts(
                DEFAULT_ACM_ENDPOINT as usize,
                UsbDirection::In,
            ),
            interface: DEFAULT_ACM_INTERFACE,
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }

    /// Sets the bulk IN endpoint. Only the endpoint number is used for selection.
    pub fn with_data_in(mut self, addr: EndpointAddress) -> Self {
        debug_assert!(addr.is_in(), "serial data endpoint must be an IN endpoint");
        self.data_in = addr;
        self
    }

    /// Sets the interrupt IN endpoint used for SerialState notifications.
    pub fn with_notification(mut self, addr: EndpointAddress) -> Self {
        debug_assert!(addr.is_in(), "notification endpoint must be an IN endpoint");
        self.notification = addr;
        self
    }

    /// Sets the communication interface number placed in wIndex of notifications.
    pub fn with_interface(mut self, interface: u8) -> Self {
        self.interface = interface;
        self
    }

    /// Sets the bank size of the bulk IN endpoint.
    pub fn with_packet_size(mut self, packet_size: u16) -> Self {
        debug_assert!(packet_size > 0);
        self.packet_size = packet_size;
        self
    }

    pub fn data_in(&self) -> EndpointAddress {
        self.data_in
    }

    pub fn notification(&self) -> EndpointAddress {
        self.notification
    }

    pub fn interface(&self) -> u8 {
        self.interface
    }

    pub fn packet_size(&self) -> u16 {
        self.packet_size
    }

    pub(crate) fn data_in_index(&self) -> u8 {
        self.data_in.index() as u8
    }

    pub(crate) fn notification_index(&self) -> u8 {
        self.notification.index() as u8
    }
}

impl Default for CdcConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CdcConfig::default();

        assert_eq!(config.data_in_index(), 3);
        assert_eq!(config.notification_index(), 1);
        assert_eq!(config.interface(), 0);
        assert_eq!(config.packet_size(), 64);
        assert!(config.data_in().is_in());
    }

    #[test]
    fn overrides() {
        let config = CdcConfig::new()
            .with_data_in(EndpointAddress::from(0x82))
            .with_notification(EndpointAddress::from_parts(5, UsbDirection::In))
            .with_interface(2);

        assert_eq!(config.data_in_index(), 2);
        assert_eq!(config.notification_index(), 5);
        assert_eq!(config.interface(), 2);
    }
}
