//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! 旧版 MVF SEMA4 驱动接口
//!
//! 对应 Linux 3.x 的 mvf_sema4：
//! - mvf_sema4_assign() / mvf_sema4_deassign()
//! - mvf_sema4_lock(sema4, timeout_us, use_interrupts)
//! - mvf_sema4_unlock()

use core::sync::atomic::{AtomicU16, Ordering};

use super::regs::{Sema4Regs, NUM_GATES};
use super::Sema4Driver;
use crate::errno::Errno;

/// 旧版驱动的句柄：已分配的门号
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MvfSema4Handle {
    gate: u8,
}

impl MvfSema4Handle {
    /// 门号
    pub const fn gate(&self) -> usize {
        self.gate as usize
    }
}

/// 旧版 MVF SEMA4 驱动
pub struct MvfSema4 {
    regs: Sema4Regs,
    domain: u8,
    /// 已分配门的位图
    assigned: AtomicU16,
    /// 微秒延时
    udelay: fn(u32),
    /// 轮询间隔（微秒）
    poll_us: u32,
}

impl MvfSema4 {
    /// 创建驱动实例
    pub const fn new(regs: Sema4Regs, domain: u8, udelay: fn(u32), poll_us: u32) -> Self {
        Self {
            regs,
            domain,
            assigned: AtomicU16::new(0),
            udelay,
            poll_us,
        }
    }

    /// 分配门
    ///
    /// 同一个门只能分配一次，重复分配返回 `-EBUSY`
    pub fn assign(&self, gate: u32) -> Result<MvfSema4Handle, i32> {
        if gate as usize >= NUM_GATES {
            return Err(Errno::InvalidArgument.as_neg_i32());
        }

        let bit = 1u16 << gate;
        if self.assigned.fetch_or(bit, Ordering::AcqRel) & bit != 0 {
            return Err(Errno::DeviceOrResourceBusy.as_neg_i32());
        }

        Ok(MvfSema4Handle { gate: gate as u8 })
    }

    /// 释放门
    ///
    /// 门仍被本域持有时返回 `-EBUSY`
    pub fn deassign(&self, handle: MvfSema4Handle) -> Result<(), i32> {
        let bit = 1u16 << handle.gate;
        if self.assigned.load(Ordering::Acquire) & bit == 0 {
            return Err(Errno::InvalidArgument.as_neg_i32());
        }
        if self.regs.is_locked_by(handle.gate(), self.domain) {
            return Err(Errno::DeviceOrResourceBusy.as_neg_i32());
        }

        self.assigned.fetch_and(!bit, Ordering::AcqRel);
        Ok(())
    }

    /// 上锁
    ///
    /// # 行为
    /// - 门空闲时立即持有
    /// - `timeout_us == 0` 时只尝试一次，失败返回 `-EBUSY`
    /// - 否则按 `poll_us` 轮询，超时返回 `-ETIMEDOUT`
    /// - `use_interrupts` 为 true 时等待期间使能该门的解锁通知，
    ///   返回前清除；门被对端长期占用时以超时结束而不是无限等待
    pub fn lock(&self, handle: MvfSema4Handle, timeout_us: u32, use_interrupts: bool) -> Result<(), i32> {
        let gate = handle.gate();

        if self.regs.try_lock(gate, self.domain) {
            return Ok(());
        }
        if timeout_us == 0 {
            return Err(Errno::DeviceOrResourceBusy.as_neg_i32());
        }

        if use_interrupts {
            self.regs.set_notify(gate, self.domain, true);
        }

        let step = self.poll_us.max(1);
        let mut waited = 0u32;
        let result = loop {
            (self.udelay)(step);
            waited = waited.saturating_add(step);

            if self.regs.try_lock(gate, self.domain) {
                break Ok(());
            }
            if waited >= timeout_us {
                log::warn!("sema4: gate {} lock timed out after {} us (value={:#x})",
                    gate, waited, self.regs.gate(gate));
                break Err(Errno::TimedOut.as_neg_i32());
            }
        };

        if use_interrupts {
            self.regs.set_notify(gate, self.domain, false);
        }

        result
    }

    /// 解锁
    pub fn unlock(&self, handle: MvfSema4Handle) -> Result<(), i32> {
        self.regs.unlock(handle.gate(), self.domain)
    }

    /// 寄存器块
    pub fn regs(&self) -> &Sema4Regs {
        &self.regs
    }
}

impl Sema4Driver for MvfSema4 {
    type Handle = MvfSema4Handle;

    fn create(&self, gate: u32) -> Result<Self::Handle, i32> {
        self.assign(gate)
    }

    fn destroy(&self, handle: Self::Handle) -> Result<(), i32> {
        self.deassign(handle)
    }

    fn lock(&self, handle: Self::Handle, timeout_us: u32, blocking: bool) -> Result<(), i32> {
        if blocking {
            MvfSema4::lock(self, handle, timeout_us, true)
        } else {
            MvfSema4::lock(self, handle, 0, false)
        }
    }

    fn try_lock(&self, handle: Self::Handle) -> Result<(), i32> {
        MvfSema4::lock(self, handle, 0, false)
    }

    fn unlock(&self, handle: Self::Handle) -> Result<(), i32> {
        MvfSema4::unlock(self, handle)
    }
}
