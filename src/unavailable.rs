use crate::regs::{EndpointRegisters, EndpointStatus, HostConnection};

/// Stand-in for targets without a USB controller.
///
/// Status reads report a free bank with room, FIFO writes go nowhere and the host is never
/// connected, so every transmit call returns immediately: streaming becomes a no-op and the block
/// and notification paths report [`Error::NotConnected`](crate::Error::NotConnected).
#[derive(Copy, Clone, Debug, Default)]
pub struct Unavailable;

impl EndpointRegisters for Unavailable {
    type Snapshot = ();

    fn selected_endpoint(&mut self) -> u8 {
        0
    }

    fn select_endpoint(&mut self, _index: u8) {}

    fn read_status(&mut self) -> EndpointStatus {
        EndpointStatus::TXINI | EndpointStatus::RWAL
    }

    fn write_status(&mut self, _status: EndpointStatus) {}

    fn read_fifo(&mut self) -> u8 {
        0
    }

    fn write_fifo(&mut self, _byte: u8) {}

    fn enter_atomic(&mut self) {}

    unsafe fn exit_atomic(&mut self, _snapshot: ()) {}
}

impl HostConnection for Unavailable {
    fn is_connected(&self) -> bool {
        false
    }
}
