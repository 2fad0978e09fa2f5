use core::ptr;
use critical_section::RestoreState;
use crate::regs::{EndpointRegisters, EndpointStatus};

/// Endpoint registers of an AVR USB controller (ATmega16U4/32U4/AT90USB family), accessed through
/// volatile loads and stores.
///
/// Interrupt masking goes through the `critical-section` implementation linked into the firmware,
/// which on AVR saves and restores SREG.
pub struct MmioEndpoints {
    uenum: *mut u8,
    ueintx: *mut u8,
    uedatx: *mut u8,
}

impl MmioEndpoints {
    /// Data-space address of UENUM on the ATmega32U4.
    pub const ATMEGA32U4_UENUM: usize = 0xe9;
    /// Data-space address of UEINTX on the ATmega32U4.
    pub const ATMEGA32U4_UEINTX: usize = 0xe8;
    /// Data-space address of UEDATX on the ATmega32U4.
    pub const ATMEGA32U4_UEDATX: usize = 0xf1;

    /// Creates an accessor from raw register addresses.
    ///
    /// # Safety
    ///
    /// The pointers must be valid for volatile byte access for as long as the accessor is used, and
    /// nothing else may drive the endpoint FIFOs outside of the atomic sections this crate opens.
    ///
    /// A streamed transaction leaves its section open between calls, so it must be the outermost
    /// section: never stream from inside `critical_section::with` or another section that closes
    /// before the transaction is flushed. Share the transmitter through
    /// [`SharedCdcAcmTx`](crate::SharedCdcAcmTx) instead.
    pub unsafe fn new(uenum: *mut u8, ueintx: *mut u8, uedatx: *mut u8) -> Self {
        MmioEndpoints {
            uenum,
            ueintx,
            uedatx,
        }
    }

    /// Creates an accessor for the ATmega32U4 register layout.
    ///
    /// # Safety
    ///
    /// Only valid on an ATmega32U4 (or a part with the same register map), with the USB controller
    /// enabled and the endpoints configured. The section nesting rule of [`new`](Self::new)
    /// applies.
    pub unsafe fn atmega32u4() -> Self {
        Self::new(
            Self::ATMEGA32U4_UENUM as *mut u8,
            Self::ATMEGA32U4_UEINTX as *mut u8,
            Self::ATMEGA32U4_UEDATX as *mut u8,
        )
    }
}

// The registers belong to the single USB controller, which is reachable from any context.
unsafe impl Send for MmioEndpoints {}

impl EndpointRegisters for MmioEndpoints {
    type Snapshot = RestoreState;

    fn selected_endpoint(&mut self) -> u8 {
        unsafe { ptr::read_volatile(self.uenum) }
    }

    fn select_endpoint(&mut self, index: u8) {
        unsafe { ptr::write_volatile(self.uenum, index) }
    }

    fn read_status(&mut self) -> EndpointStatus {
        EndpointStatus::from_bits(unsafe { ptr::read_volatile(self.ueintx) })
    }

    fn write_status(&mut self, status: EndpointStatus) {
        unsafe { ptr::write_volatile(self.ueintx, status.bits()) }
    }

    fn read_fifo(&mut self) -> u8 {
        unsafe { ptr::read_volatile(self.uedatx) }
    }

    fn write_fifo(&mut self, byte: u8) {
        unsafe { ptr::write_volatile(self.uedatx, byte) }
    }

    fn enter_atomic(&mut self) -> RestoreState {
        unsafe { critical_section::acquire() }
    }

    unsafe fn exit_atomic(&mut self, snapshot: RestoreState) {
        critical_section::release(snapshot)
    }
}
