use core::ops::{BitAnd, BitOr, Not};
use core::sync::atomic::{AtomicBool, Ordering};

/// Endpoint interrupt/status register contents (UEINTX layout).
///
/// Bits are written with "write zero to clear" semantics: a status write clears every flag whose
/// bit is zero in the written value and leaves the rest untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointStatus(u8);

impl EndpointStatus {
    /// Transmitter ready: the current bank may be filled.
    pub const TXINI: Self = Self(1 << 0);
    pub const STALLEDI: Self = Self(1 << 1);
    pub const RXOUTI: Self = Self(1 << 2);
    pub const RXSTPI: Self = Self(1 << 3);
    pub const NAKOUTI: Self = Self(1 << 4);
    /// Read/write allowed: the current bank still has room.
    pub const RWAL: Self = Self(1 << 5);
    pub const NAKINI: Self = Self(1 << 6);
    /// FIFO control: writing zero hands the current bank to the host.
    pub const FIFOCON: Self = Self(1 << 7);

    /// Acknowledges TXINI and leaves every other flag alone.
    pub const ACK_TXINI: Self = Self(!(1 << 0));

    /// Hands the filled bank to the host and acknowledges TXINI. Only FIFOCON, NAKINI, RXOUTI and
    /// TXINI are written as zero.
    pub const RELEASE: Self = Self(0x3a);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EndpointStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for EndpointStatus {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for EndpointStatus {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Register-level access to a USB device peripheral with a selectable endpoint window.
///
/// Every FIFO and status operation acts on the endpoint last passed to
/// [`select_endpoint`](EndpointRegisters::select_endpoint). The selection is global peripheral
/// state shared with interrupt handlers, so callers serialize access with
/// [`enter_atomic`](EndpointRegisters::enter_atomic).
pub trait EndpointRegisters {
    /// Opaque interrupt-enable state returned by `enter_atomic` and consumed by `exit_atomic`.
    type Snapshot: Copy;

    /// Returns the index of the currently selected endpoint.
    fn selected_endpoint(&mut self) -> u8;

    /// Selects the endpoint that subsequent FIFO and status operations act on.
    fn select_endpoint(&mut self, index: u8);

    fn read_status(&mut self) -> EndpointStatus;

    fn write_status(&mut self, status: EndpointStatus);

    fn read_fifo(&mut self) -> u8;

    fn write_fifo(&mut self, byte: u8);

    /// Disables interrupt delivery and returns the state to restore afterwards.
    fn enter_atomic(&mut self) -> Self::Snapshot;

    /// Restores interrupt delivery to `snapshot`.
    ///
    /// # Safety
    ///
    /// `snapshot` must come from the most recent `enter_atomic` call that has not been exited yet.
    /// Exiting out of order re-enables interrupts inside an enclosing section.
    unsafe fn exit_atomic(&mut self, snapshot: Self::Snapshot);
}

impl<R: EndpointRegisters + ?Sized> EndpointRegisters for &mut R {
    type Snapshot = R::Snapshot;

    fn selected_endpoint(&mut self) -> u8 {
        (**self).selected_endpoint()
    }

    fn select_endpoint(&mut self, index: u8) {
        (**self).select_endpoint(index)
    }

    fn read_status(&mut self) -> EndpointStatus {
        (**self).read_status()
    }

    fn write_status(&mut self, status: EndpointStatus) {
        (**self).write_status(status)
    }

    fn read_fifo(&mut self) -> u8 {
        (**self).read_fifo()
    }

    fn write_fifo(&mut self, byte: u8) {
        (**self).write_fifo(byte)
    }

    fn enter_atomic(&mut self) -> Self::Snapshot {
        (**self).enter_atomic()
    }

    unsafe fn exit_atomic(&mut self, snapshot: Self::Snapshot) {
        (**self).exit_atomic(snapshot)
    }
}

/// Whether a host-side terminal is attached to the CDC interface.
///
/// Typically backed by a flag the surrounding USB stack updates from its SET_CONTROL_LINE_STATE
/// handler.
pub trait HostConnection {
    fn is_connected(&self) -> bool;
}

impl HostConnection for bool {
    fn is_connected(&self) -> bool {
        *self
    }
}

impl HostConnection for AtomicBool {
    fn is_connected(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: HostConnection + ?Sized> HostConnection for &T {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Spins until the selected endpoint's bank can be filled. There is no timeout.
pub(crate) fn wait_write_ready<R: EndpointRegisters + ?Sized>(regs: &mut R) {
    while !regs.read_status().contains(EndpointStatus::TXINI) {
        core::hint::spin_loop();
    }
}
