//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! Vybrid SEMA4 寄存器访问
//!
//! 参考 VF610 参考手册 SEMA4 章节
//!
//! 每个门是一个 8 位寄存器，值为 0 表示空闲，`domain + 1` 表示被该域持有。
//! 上锁时向空闲门写入 `domain + 1`，再读回确认；只有持有者可以写 0 解锁。

use core::ptr::{read_volatile, write_volatile};

use crate::errno::Errno;

mod offset {
    // 门寄存器（每个门 1 字节）
    pub const GATE: usize = 0x00;

    // CP0 解锁通知使能寄存器（16 位）
    pub const CP0INE: usize = 0x40;

    // CP1 解锁通知使能寄存器（16 位）
    pub const CP1INE: usize = 0x48;
}

/// 门的数量
pub const NUM_GATES: usize = 16;

/// 门空闲时的值
pub const GATE_UNLOCKED: u8 = 0;

/// 寄存器块大小
pub const SEMA4_REGS_SIZE: usize = 0x110;

/// SEMA4 寄存器块
#[derive(Debug, Copy, Clone)]
pub struct Sema4Regs {
    base: usize,
}

impl Sema4Regs {
    /// 创建寄存器块访问器
    ///
    /// # Safety
    /// `base` 必须指向已映射的 SEMA4 寄存器块（至少 `SEMA4_REGS_SIZE` 字节），
    /// 且在访问器存活期间保持有效
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// 寄存器块基址
    pub const fn base(&self) -> usize {
        self.base
    }

    /// 读取门寄存器
    pub fn gate(&self, gate: usize) -> u8 {
        debug_assert!(gate < NUM_GATES);
        unsafe { read_volatile((self.base + offset::GATE + gate) as *const u8) }
    }

    fn set_gate(&self, gate: usize, value: u8) {
        unsafe { write_volatile((self.base + offset::GATE + gate) as *mut u8, value) }
    }

    /// 尝试让 `domain` 持有门
    ///
    /// 门被任何域（包括自己）持有时返回 false
    pub fn try_lock(&self, gate: usize, domain: u8) -> bool {
        if self.gate(gate) != GATE_UNLOCKED {
            return false;
        }
        self.set_gate(gate, lock_value(domain));
        self.gate(gate) == lock_value(domain)
    }

    /// 释放 `domain` 持有的门
    ///
    /// 门不属于 `domain` 时返回 `-EPERM`，寄存器不变
    pub fn unlock(&self, gate: usize, domain: u8) -> Result<(), i32> {
        if self.gate(gate) != lock_value(domain) {
            return Err(Errno::OperationNotPermitted.as_neg_i32());
        }
        self.set_gate(gate, GATE_UNLOCKED);
        Ok(())
    }

    /// 门是否被 `domain` 持有
    pub fn is_locked_by(&self, gate: usize, domain: u8) -> bool {
        self.gate(gate) == lock_value(domain)
    }

    /// 使能/禁用 `domain` 对 `gate` 的解锁通知
    pub fn set_notify(&self, gate: usize, domain: u8, enable: bool) {
        let addr = (self.base + ine_offset(domain)) as *mut u16;
        unsafe {
            let value = read_volatile(addr);
            let value = if enable {
                value | notify_mask(gate)
            } else {
                value & !notify_mask(gate)
            };
            write_volatile(addr, value);
        }
    }

    /// 读取 `domain` 的解锁通知使能寄存器
    pub fn notify_enabled(&self, domain: u8) -> u16 {
        unsafe { read_volatile((self.base + ine_offset(domain)) as *const u16) }
    }
}

/// 域持有门时门寄存器的值
#[inline]
pub const fn lock_value(domain: u8) -> u8 {
    domain + 1
}

/// INE 寄存器按字节交换的位序排列
#[inline]
pub const fn notify_mask(gate: usize) -> u16 {
    1 << ((15 - gate) ^ 7)
}

#[inline]
const fn ine_offset(domain: u8) -> usize {
    if domain == 0 {
        offset::CP0INE
    } else {
        offset::CP1INE
    }
}
