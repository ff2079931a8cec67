//! 门守护（RAII）

use super::Gate;
use crate::drivers::intc::CpuToCpuIrq;
use crate::drivers::sema4::Sema4Driver;
use crate::error::GateResult;
use crate::sync::HostLock;

/// 门守护
///
/// 由 [`Gate::lock`] 返回，离开作用域时调用一次 `release()`。
/// 需要拿到硬件解锁的结果时显式调用 [`GateGuard::release`]。
#[must_use = "dropping the guard releases the gate immediately"]
pub struct GateGuard<'a, D: Sema4Driver, I: CpuToCpuIrq, L: HostLock> {
    gate: &'a Gate<D, I, L>,
    released: bool,
}

impl<'a, D: Sema4Driver, I: CpuToCpuIrq, L: HostLock> GateGuard<'a, D, I, L> {
    pub(super) fn new(gate: &'a Gate<D, I, L>) -> Self {
        Self { gate, released: false }
    }

    /// 释放门并返回硬件解锁结果
    pub fn release(mut self) -> GateResult {
        self.released = true;
        self.gate.release()
    }
}

impl<'a, D: Sema4Driver, I: CpuToCpuIrq, L: HostLock> Drop for GateGuard<'a, D, I, L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.gate.release() {
            log::warn!("sema4: release on drop failed: {}", err);
        }
    }
}
