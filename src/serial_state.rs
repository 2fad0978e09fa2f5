use core::ops::{BitAnd, BitOr, BitOrAssign};
use crate::config::DEFAULT_ACM_INTERFACE;
use crate::regs::EndpointRegisters;
use crate::transmit::write_bank;

/// bmRequestType of a class notification: device-to-host, class, interface recipient.
pub const REQUEST_TYPE_NOTIFICATION: u8 = 0xa1;

/// bNotification code of the CDC SERIAL_STATE notification.
pub const CDC_SERIAL_STATE: u8 = 0x20;

/// Length of the SerialState notification header.
pub const NOTIFICATION_HEADER_LEN: usize = 8;

/// Length of a full SerialState notification: header, state byte and reserved byte.
pub const NOTIFICATION_LEN: usize = NOTIFICATION_HEADER_LEN + 2;

/// UART state bitmap carried by a SERIAL_STATE notification.
///
/// Bits combine with `|`. Each notification carries the complete state, not a change.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialState(u8);

impl SerialState {
    /// Receiver carrier detected (DCD).
    pub const DCD: Self = Self(1 << 0);
    /// Transmission carrier present (DSR).
    pub const DSR: Self = Self(1 << 1);
    /// Break condition detected.
    pub const BREAK: Self = Self(1 << 2);
    /// Ring signal detected.
    pub const RING: Self = Self(1 << 3);
    pub const FRAMING_ERROR: Self = Self(1 << 4);
    pub const PARITY_ERROR: Self = Self(1 << 5);
    pub const OVERRUN_ERROR: Self = Self(1 << 6);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wraps a raw state byte. Bits are sent as given.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SerialState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SerialState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SerialState {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<u8> for SerialState {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<SerialState> for u8 {
    fn from(state: SerialState) -> u8 {
        state.0
    }
}

/// Builds the constant part of a SERIAL_STATE notification for `interface`.
///
/// wValue is zero and wLength is 2. Multi-byte fields are little endian.
pub const fn notification_header(interface: u8) -> [u8; NOTIFICATION_HEADER_LEN] {
    [
        REQUEST_TYPE_NOTIFICATION,
        CDC_SERIAL_STATE,
        0x00, 0x00, // wValue
        interface, 0x00, // wIndex
        0x02, 0x00, // wLength
    ]
}

/// Header for the conventional ACM interface 0.
pub static SERIAL_STATE_HEADER: [u8; NOTIFICATION_HEADER_LEN] =
    notification_header(DEFAULT_ACM_INTERFACE);

/// Builds a complete SERIAL_STATE notification.
pub fn notification_packet(interface: u8, state: SerialState) -> [u8; NOTIFICATION_LEN] {
    let mut packet = [0u8; NOTIFICATION_LEN];
    packet[..NOTIFICATION_HEADER_LEN].copy_from_slice(&notification_header(interface));
    packet[NOTIFICATION_HEADER_LEN] = state.bits();
    packet
}

/// Sends one SERIAL_STATE notification on the interrupt endpoint `endpoint`.
///
/// The header for the default interface is read straight from [`SERIAL_STATE_HEADER`].
pub(crate) fn write_notification<R>(regs: &mut R, endpoint: u8, interface: u8, state: SerialState)
where
    R: EndpointRegisters + ?Sized,
{
    let custom;
    let header: &[u8] = if interface == DEFAULT_ACM_INTERFACE {
        &SERIAL_STATE_HEADER
    } else {
        custom = notification_header(interface);
        &custom
    };
    let payload = [state.bits(), 0];

    let chunks: [&[u8]; 2] = [header, &payload];
    write_bank(regs, endpoint, &chunks);
}
