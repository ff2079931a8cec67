//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! 新版 VF610 SEMA4 mutex 驱动接口
//!
//! 对应 Linux 4.4 起的 vf610_sema4：
//! - vf610_sema4_mutex_create(dev_num, mutex_num)
//! - vf610_sema4_mutex_lock() / vf610_sema4_mutex_trylock()
//! - vf610_sema4_mutex_unlock() / vf610_sema4_mutex_destroy()
//!
//! 这一接口没有超时：阻塞上锁会一直等到成功。

use core::sync::atomic::{AtomicU16, Ordering};

use super::regs::{Sema4Regs, NUM_GATES};
use super::Sema4Driver;
use crate::errno::Errno;

/// mutex 句柄
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Vf610MutexHandle {
    dev: u8,
    gate: u8,
}

impl Vf610MutexHandle {
    /// 设备号
    pub const fn dev(&self) -> u32 {
        self.dev as u32
    }

    /// 门号
    pub const fn gate(&self) -> usize {
        self.gate as usize
    }
}

/// VF610 SEMA4 mutex 驱动（单个 SEMA4 实例）
pub struct Vf610Sema4Mutex {
    regs: Sema4Regs,
    dev: u32,
    domain: u8,
    /// 已创建 mutex 的位图
    created: AtomicU16,
}

impl Vf610Sema4Mutex {
    /// 创建驱动实例
    pub const fn new(regs: Sema4Regs, dev: u32, domain: u8) -> Self {
        Self {
            regs,
            dev,
            domain,
            created: AtomicU16::new(0),
        }
    }

    /// 创建 mutex
    ///
    /// 设备号不存在、门号越界或已被创建时返回 None
    pub fn mutex_create(&self, dev: u32, gate: u32) -> Option<Vf610MutexHandle> {
        if dev != self.dev || gate as usize >= NUM_GATES {
            return None;
        }

        let bit = 1u16 << gate;
        if self.created.fetch_or(bit, Ordering::AcqRel) & bit != 0 {
            return None;
        }

        Some(Vf610MutexHandle { dev: dev as u8, gate: gate as u8 })
    }

    /// 销毁 mutex
    pub fn mutex_destroy(&self, handle: Vf610MutexHandle) -> Result<(), i32> {
        let bit = 1u16 << handle.gate;
        if handle.dev() != self.dev || self.created.fetch_and(!bit, Ordering::AcqRel) & bit == 0 {
            return Err(Errno::InvalidArgument.as_neg_i32());
        }
        Ok(())
    }

    /// 上锁，一直等到成功
    pub fn mutex_lock(&self, handle: Vf610MutexHandle) -> Result<(), i32> {
        while !self.regs.try_lock(handle.gate(), self.domain) {
            core::hint::spin_loop();
        }
        Ok(())
    }

    /// 尝试上锁
    pub fn mutex_trylock(&self, handle: Vf610MutexHandle) -> Result<(), i32> {
        if self.regs.try_lock(handle.gate(), self.domain) {
            Ok(())
        } else {
            Err(Errno::DeviceOrResourceBusy.as_neg_i32())
        }
    }

    /// 解锁
    pub fn mutex_unlock(&self, handle: Vf610MutexHandle) -> Result<(), i32> {
        self.regs.unlock(handle.gate(), self.domain)
    }

    /// 寄存器块
    pub fn regs(&self) -> &Sema4Regs {
        &self.regs
    }
}

impl Sema4Driver for Vf610Sema4Mutex {
    type Handle = Vf610MutexHandle;

    fn create(&self, gate: u32) -> Result<Self::Handle, i32> {
        self.mutex_create(self.dev, gate)
            .ok_or(Errno::NoSuchDevice.as_neg_i32())
    }

    fn destroy(&self, handle: Self::Handle) -> Result<(), i32> {
        self.mutex_destroy(handle)
    }

    fn lock(&self, handle: Self::Handle, _timeout_us: u32, blocking: bool) -> Result<(), i32> {
        if blocking {
            self.mutex_lock(handle)
        } else {
            self.mutex_trylock(handle)
        }
    }

    fn try_lock(&self, handle: Self::Handle) -> Result<(), i32> {
        self.mutex_trylock(handle)
    }

    fn unlock(&self, handle: Self::Handle) -> Result<(), i32> {
        self.mutex_unlock(handle)
    }
}
