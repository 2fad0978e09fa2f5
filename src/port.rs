use core::convert::Infallible;
use crate::config::CdcConfig;
use crate::error::{Error, Result};
use crate::regs::{EndpointRegisters, HostConnection};
use crate::serial_state::{write_notification, SerialState};
use crate::transmit::{write_bank, TransmitSession};

/// Transmit side of a CDC-ACM serial port, driven directly through endpoint registers.
///
/// Offers three ways to reach the host:
///
/// * [`stream_byte`](CdcAcmTx::stream_byte) batches single bytes into one open IN transaction,
/// * [`transmit_block`](CdcAcmTx::transmit_block) sends a slice as one bank,
/// * [`send_state`](CdcAcmTx::send_state) emits a SERIAL_STATE notification.
///
/// The streaming path keeps interrupts disabled between calls while a transaction is open. Call
/// [`flush`](CdcAcmTx::flush) once a burst of output is complete so interrupts come back on.
/// Block transmission must not be used while a streamed transaction is open on the same endpoint.
pub struct CdcAcmTx<R: EndpointRegisters, C: HostConnection> {
    regs: R,
    link: C,
    config: CdcConfig,
    session: TransmitSession<R::Snapshot>,
}

impl<R: EndpointRegisters, C: HostConnection> CdcAcmTx<R, C> {
    /// Creates a transmitter using the default endpoint layout.
    pub fn new(regs: R, link: C) -> Self {
        Self::with_config(regs, link, CdcConfig::default())
    }

    pub fn with_config(regs: R, link: C, config: CdcConfig) -> Self {
        CdcAcmTx {
            regs,
            link,
            config,
            session: TransmitSession::new(),
        }
    }

    pub fn config(&self) -> &CdcConfig {
        &self.config
    }

    /// Returns `true` when no streamed transaction is open.
    pub fn is_idle(&self) -> bool {
        self.session.is_idle()
    }

    /// Gets whether a host terminal is attached.
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Appends one byte to the streamed transaction on the data endpoint.
    ///
    /// Unlike the other write paths this does not check the connection; callers gate it
    /// themselves. Blocks until the host frees a bank.
    ///
    /// The interrupt-disabled section opened here stays open until the bank is released, so this
    /// must not run inside a shorter enclosing section such as `critical_section::with`. Use
    /// [`SharedCdcAcmTx`](crate::SharedCdcAcmTx) to share the port with an interrupt handler.
    #[inline]
    pub fn stream_byte(&mut self, byte: u8) {
        self.session
            .stream_byte(&mut self.regs, self.config.data_in_index(), byte);
    }

    /// Hands any partially filled streamed bank to the host and restores the interrupt state saved
    /// when the transaction opened. Does nothing when idle.
    ///
    /// Must be called at the same section nesting level as the `stream_byte` call that opened the
    /// transaction.
    pub fn flush(&mut self) {
        self.session.flush(&mut self.regs);
    }

    /// Sends `data` as a single bank on the data endpoint.
    ///
    /// Returns [`Error::NotConnected`] without touching the registers when no host is attached.
    /// `data` must fit in one bank. Blocks until the host frees a bank.
    pub fn transmit_block(&mut self, data: &[u8]) -> Result<()> {
        if !self.link.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::debug!("CDC TX : block of {} bytes dropped, not connected", data.len());

            return Err(Error::NotConnected);
        }

        debug_assert!(self.session.is_idle(), "block transmit during an open streamed transaction");
        debug_assert!(
            data.len() <= self.config.packet_size() as usize,
            "block larger than one bank"
        );

        write_bank(&mut self.regs, self.config.data_in_index(), &[data]);

        #[cfg(feature = "defmt")]
        defmt::trace!("CDC TX : sent block of {} bytes", data.len());

        Ok(())
    }

    /// Sends a SERIAL_STATE notification carrying `state` on the notification endpoint.
    ///
    /// Returns [`Error::NotConnected`] without touching the registers when no host is attached.
    pub fn send_state(&mut self, state: SerialState) -> Result<()> {
        if !self.link.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::debug!("CDC TX : serial state {} dropped, not connected", state);

            return Err(Error::NotConnected);
        }

        write_notification(
            &mut self.regs,
            self.config.notification_index(),
            self.config.interface(),
            state,
        );

        #[cfg(feature = "defmt")]
        defmt::trace!("CDC TX : sent serial state {:b}", state.bits());

        Ok(())
    }

    /// Flushes any open transaction and returns the registers and connection source.
    pub fn free(mut self) -> (R, C) {
        self.flush();
        (self.regs, self.link)
    }
}

impl<R: EndpointRegisters, C: HostConnection> embedded_hal::serial::Write<u8> for CdcAcmTx<R, C> {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.stream_byte(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        CdcAcmTx::flush(self);
        Ok(())
    }
}
