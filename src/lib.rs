//! Register-level CDC-ACM transmit path for USB device controllers with selectable endpoint FIFOs.
//!
//! CDC-ACM is a USB class that's supported out of the box by most operating systems and used for
//! implementing modems and generic serial ports. This crate covers the device-to-host half of such
//! a port on controllers that expose one endpoint at a time through a selector register, such as
//! the AVR USB controllers:
//!
//! * streaming single bytes into the bulk IN endpoint, batching them into one transaction while
//!   interrupts stay disabled,
//! * sending a whole block as one packet,
//! * emitting CDC SERIAL_STATE notifications (carrier detect, ring, break, line errors) on the
//!   interrupt endpoint.
//!
//! Enumeration, descriptors and endpoint setup are left to the surrounding USB stack. It only
//! needs to provide the register access ([`EndpointRegisters`]) and tell whether a host terminal
//! is attached ([`HostConnection`]).
//!
//! Example
//! =======
//!
//! ```no_run
//! use core::fmt::Write;
//! use core::sync::atomic::AtomicBool;
//! use usbd_serial_tx::{CdcAcmTx, MmioEndpoints, SerialState};
//!
//! // Set by the class request handler when the host raises DTR.
//! static CONNECTED: AtomicBool = AtomicBool::new(false);
//!
//! let regs = unsafe { MmioEndpoints::atmega32u4() };
//! let mut serial = CdcAcmTx::new(regs, &CONNECTED);
//!
//! write!(serial, "temperature: {}\r\n", 21).ok();
//! serial.flush();
//!
//! match serial.send_state(SerialState::DCD | SerialState::DSR) {
//!     Ok(()) => { /* notification sent */ },
//!     Err(err) => { /* no host attached */ },
//! }
//! ```
//!
//! To share the transmitter with an interrupt handler, wrap it in [`SharedCdcAcmTx`] rather than in
//! a `critical_section::Mutex`: a streamed transaction has to own the outermost interrupt-disabled
//! section, and `critical_section::with` would end it early.
//!
//! Targets without a USB controller can use [`Unavailable`] for both parameters, which turns every
//! call into a no-op.

#![no_std]

mod atomic;
mod config;
mod error;
mod io;
mod mmio;
mod port;
mod regs;
mod serial_state;
mod shared;
mod transmit;
mod unavailable;

#[cfg(test)]
mod mock;

pub use crate::atomic::AtomicSection;
pub use crate::config::*;
pub use crate::error::{Error, Result};
pub use crate::mmio::MmioEndpoints;
pub use crate::port::CdcAcmTx;
pub use crate::regs::{EndpointRegisters, EndpointStatus, HostConnection};
pub use crate::serial_state::*;
pub use crate::shared::SharedCdcAcmTx;
pub use crate::transmit::TransmitSession;
pub use crate::unavailable::Unavailable;
pub use embedded_io;
