use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use crate::regs::EndpointRegisters;

/// Scoped interrupt-disabled section over a set of endpoint registers.
///
/// Interrupts are disabled when the section is entered and the previous state is restored when it
/// is dropped, including on early returns. The registers are reachable through `Deref` for the
/// lifetime of the section.
///
/// A section can also outlive the call that opened it: [`detach`](AtomicSection::detach) hands out
/// the snapshot without restoring it, and [`resume`](AtomicSection::resume) turns that snapshot
/// back into a guard so a later call can close it.
pub struct AtomicSection<'r, R: EndpointRegisters + ?Sized> {
    regs: &'r mut R,
    snapshot: R::Snapshot,
}

impl<'r, R: EndpointRegisters + ?Sized> AtomicSection<'r, R> {
    pub fn enter(regs: &'r mut R) -> Self {
        let snapshot = regs.enter_atomic();
        AtomicSection { regs, snapshot }
    }

    /// Re-attaches a detached snapshot. Dropping the returned guard restores it.
    ///
    /// # Safety
    ///
    /// `snapshot` must come from [`detach`](AtomicSection::detach) on a section over the same
    /// registers, must not have been resumed before, and no section entered after it may still be
    /// open.
    pub unsafe fn resume(regs: &'r mut R, snapshot: R::Snapshot) -> Self {
        AtomicSection { regs, snapshot }
    }

    /// Leaves interrupts disabled and returns the snapshot that will restore them.
    pub fn detach(self) -> R::Snapshot {
        let this = ManuallyDrop::new(self);
        this.snapshot
    }
}

impl<R: EndpointRegisters + ?Sized> Deref for AtomicSection<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.regs
    }
}

impl<R: EndpointRegisters + ?Sized> DerefMut for AtomicSection<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.regs
    }
}

impl<R: EndpointRegisters + ?Sized> Drop for AtomicSection<'_, R> {
    fn drop(&mut self) {
        // The snapshot is only ever produced by `enter` or handed back through `resume`.
        unsafe { self.regs.exit_atomic(self.snapshot) }
    }
}
