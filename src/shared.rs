use core::cell::UnsafeCell;
use critical_section::RestoreState;
use crate::error::Result;
use crate::port::CdcAcmTx;
use crate::regs::{EndpointRegisters, HostConnection};
use crate::serial_state::SerialState;

/// A [`CdcAcmTx`] that main code and interrupt handlers can share through a `&'static` reference.
///
/// Every method disables interrupts first, through `critical-section`, before it touches the
/// transmitter. While a streamed transaction is open the wrapper keeps that outermost section
/// acquired across calls and only releases it once the bank has been handed to the host, so no
/// interrupt handler can observe the endpoint selector mid-bank.
///
/// Do not call these methods from inside `critical_section::with` or any other section that ends
/// before the streamed transaction does: the outer section would re-enable interrupts while the
/// bank is still open. Interrupt handlers can call them directly since an open transaction keeps
/// them from running.
pub struct SharedCdcAcmTx<R, C>
where
    R: EndpointRegisters<Snapshot = RestoreState>,
    C: HostConnection,
{
    inner: UnsafeCell<Inner<R, C>>,
}

struct Inner<R, C>
where
    R: EndpointRegisters<Snapshot = RestoreState>,
    C: HostConnection,
{
    tx: CdcAcmTx<R, C>,
    /// Outermost section held while a streamed transaction is open.
    held: Option<RestoreState>,
}

// All access to `inner` happens with interrupts disabled, and there is only one core.
unsafe impl<R, C> Sync for SharedCdcAcmTx<R, C>
where
    R: EndpointRegisters<Snapshot = RestoreState> + Send,
    C: HostConnection + Send,
{
}

impl<R, C> SharedCdcAcmTx<R, C>
where
    R: EndpointRegisters<Snapshot = RestoreState>,
    C: HostConnection,
{
    pub fn new(tx: CdcAcmTx<R, C>) -> Self {
        SharedCdcAcmTx {
            inner: UnsafeCell::new(Inner { tx, held: None }),
        }
    }

    fn lock<T>(&self, f: impl FnOnce(&mut CdcAcmTx<R, C>) -> T) -> T {
        let state = unsafe { critical_section::acquire() };

        // Interrupts are off, and whoever held them off before us is this same context.
        let inner = unsafe { &mut *self.inner.get() };
        let out = f(&mut inner.tx);

        unsafe {
            if !inner.tx.is_idle() && inner.held.is_none() {
                inner.held = Some(state);
            } else {
                critical_section::release(state);
                if inner.tx.is_idle() {
                    if let Some(outer) = inner.held.take() {
                        critical_section::release(outer);
                    }
                }
            }
        }

        out
    }

    /// See [`CdcAcmTx::stream_byte`].
    pub fn stream_byte(&self, byte: u8) {
        self.lock(|tx| tx.stream_byte(byte))
    }

    /// See [`CdcAcmTx::flush`]. Interrupts are enabled again when this returns.
    pub fn flush(&self) {
        self.lock(|tx| tx.flush())
    }

    /// See [`CdcAcmTx::transmit_block`].
    pub fn transmit_block(&self, data: &[u8]) -> Result<()> {
        self.lock(|tx| tx.transmit_block(data))
    }

    /// See [`CdcAcmTx::send_state`].
    pub fn send_state(&self, state: SerialState) -> Result<()> {
        self.lock(|tx| tx.send_state(state))
    }

    pub fn is_idle(&self) -> bool {
        self.lock(|tx| tx.is_idle())
    }

    pub fn is_connected(&self) -> bool {
        self.lock(|tx| tx.is_connected())
    }

    /// Flushes any open transaction and returns the transmitter.
    pub fn into_inner(self) -> CdcAcmTx<R, C> {
        self.flush();
        self.inner.into_inner().tx
    }
}
