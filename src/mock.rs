//! Recording register double used by the unit tests.

extern crate std;

use std::vec::Vec;
use crate::regs::{EndpointRegisters, EndpointStatus};

const ENDPOINTS: usize = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Selected,
    Select(u8),
    ReadStatus,
    WriteStatus(u8),
    ReadFifo,
    WriteFifo(u8),
    Enter(usize),
    Exit(usize),
}

struct Endpoint {
    bank: Vec<u8>,
    capacity: usize,
    txini: bool,
    stalled: bool,
    packets: Vec<Vec<u8>>,
}

impl Endpoint {
    fn new() -> Self {
        Endpoint {
            bank: Vec::new(),
            capacity: 64,
            txini: true,
            stalled: false,
            packets: Vec::new(),
        }
    }
}

/// Simulates a selectable-endpoint USB peripheral whose host drains every released bank at once.
pub struct MockRegisters {
    selected: u8,
    depth: usize,
    endpoints: Vec<Endpoint>,
    events: Vec<Event>,
}

impl MockRegisters {
    pub fn new() -> Self {
        MockRegisters {
            selected: 0,
            depth: 0,
            endpoints: (0..ENDPOINTS).map(|_| Endpoint::new()).collect(),
            events: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, index: u8, capacity: usize) -> Self {
        self.endpoints[index as usize].capacity = capacity;
        self
    }

    /// Makes the host stop draining `index`: TXINI never comes back after the next release.
    pub fn stalled(mut self, index: u8) -> Self {
        let ep = &mut self.endpoints[index as usize];
        ep.stalled = true;
        ep.txini = false;
        self
    }

    /// Sets the selection without recording an event, as other code running before the call would.
    pub fn preselect(mut self, index: u8) -> Self {
        self.selected = index;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| f(*e)).count()
    }

    pub fn selection(&self) -> u8 {
        self.selected
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.depth == 0
    }

    pub fn packets(&self, index: u8) -> &[Vec<u8>] {
        &self.endpoints[index as usize].packets
    }

    pub fn pending(&self, index: u8) -> &[u8] {
        &self.endpoints[index as usize].bank
    }

    fn current(&mut self) -> &mut Endpoint {
        &mut self.endpoints[self.selected as usize]
    }
}

impl EndpointRegisters for MockRegisters {
    type Snapshot = usize;

    fn selected_endpoint(&mut self) -> u8 {
        self.events.push(Event::Selected);
        self.selected
    }

    fn select_endpoint(&mut self, index: u8) {
        self.events.push(Event::Select(index));
        self.selected = index;
    }

    fn read_status(&mut self) -> EndpointStatus {
        self.events.push(Event::ReadStatus);

        let ep = self.current();
        let mut status = EndpointStatus::from_bits(0);
        if ep.txini {
            status = status | EndpointStatus::TXINI;
        }
        if ep.bank.len() < ep.capacity {
            status = status | EndpointStatus::RWAL;
        }
        status
    }

    fn write_status(&mut self, status: EndpointStatus) {
        self.events.push(Event::WriteStatus(status.bits()));

        let ep = self.current();
        if !status.contains(EndpointStatus::TXINI) {
            ep.txini = false;
        }
        if !status.contains(EndpointStatus::FIFOCON) {
            let packet = core::mem::take(&mut ep.bank);
            ep.packets.push(packet);
            ep.txini = !ep.stalled;
        }
    }

    fn read_fifo(&mut self) -> u8 {
        self.events.push(Event::ReadFifo);
        0
    }

    fn write_fifo(&mut self, byte: u8) {
        self.events.push(Event::WriteFifo(byte));

        let ep = self.current();
        if ep.bank.len() < ep.capacity {
            ep.bank.push(byte);
        }
    }

    fn enter_atomic(&mut self) -> usize {
        self.events.push(Event::Enter(self.depth));
        self.depth += 1;
        self.depth - 1
    }

    unsafe fn exit_atomic(&mut self, snapshot: usize) {
        assert_eq!(snapshot + 1, self.depth, "atomic sections exited out of order");
        self.events.push(Event::Exit(snapshot));
        self.depth = snapshot;
    }
}
