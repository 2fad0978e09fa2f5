use core::cmp;
use core::fmt;
use crate::error::Error;
use crate::port::CdcAcmTx;
use crate::regs::{EndpointRegisters, HostConnection};

impl<R: EndpointRegisters, C: HostConnection> embedded_io::ErrorType for CdcAcmTx<R, C> {
    type Error = Error;
}

impl<R: EndpointRegisters, C: HostConnection> embedded_io::Write for CdcAcmTx<R, C> {
    /// Sends up to one packet of `buf` as a block. Any streamed bytes still pending go out first.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        CdcAcmTx::flush(self);

        let count = cmp::min(buf.len(), self.config().packet_size() as usize);
        self.transmit_block(&buf[..count])?;
        Ok(count)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        CdcAcmTx::flush(self);
        Ok(())
    }
}

impl<R: EndpointRegisters, C: HostConnection> embedded_io::WriteReady for CdcAcmTx<R, C> {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        if self.is_connected() {
            Ok(true)
        } else {
            Err(Error::NotConnected)
        }
    }
}

/// Formatted output goes through the streaming path. Call [`CdcAcmTx::flush`] afterwards to send
/// the last partial packet.
impl<R: EndpointRegisters, C: HostConnection> fmt::Write for CdcAcmTx<R, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            self.stream_byte(byte);
        }
        Ok(())
    }
}
