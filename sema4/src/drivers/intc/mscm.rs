//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! Vybrid MSCM (Miscellaneous System Control Module) 中断路由驱动
//!
//! 参考 VF610 参考手册 MSCM 章节
//!
//! 每个共享外设中断有一个 16 位的 IRSPRC 路由寄存器，
//! 位 0 路由到 CP0 (A5)，位 1 路由到 CP1 (M4)。
//! CPU 间中断是路由器的前 4 个中断。

use core::ptr::{read_volatile, write_volatile};

use spin::Mutex;

use super::CpuToCpuIrq;

mod offset {
    // 中断路由寄存器（每个中断 2 字节）
    pub const IRSPRC: usize = 0x880;
}

/// CPU 间中断线的最大数量
pub const MAX_CPU_TO_CPU_INTERRUPTS: usize = 4;

/// 寄存器块大小（覆盖到最后一条 CPU 间中断的路由寄存器）
pub const MSCM_REGS_SIZE: usize = offset::IRSPRC + MAX_CPU_TO_CPU_INTERRUPTS * 2;

pub struct Mscm {
    base: usize,
    /// 本核在 IRSPRC 中的路由位
    route: u16,
    /// 路由寄存器读-改-写的串行化
    lock: Mutex<()>,
}

impl Mscm {
    /// 创建新的 MSCM 实例
    ///
    /// # Safety
    /// `base` 必须指向已映射的 MSCM 寄存器块（至少 `MSCM_REGS_SIZE` 字节），
    /// 且在实例存活期间保持有效
    pub const unsafe fn new(base: usize, route: u16) -> Self {
        Self {
            base,
            route,
            lock: Mutex::new(()),
        }
    }

    fn irsprc(&self, irq: usize) -> *mut u16 {
        (self.base + offset::IRSPRC + irq * 2) as *mut u16
    }

    fn update_route(&self, irq: usize, enable: bool) {
        if irq >= MAX_CPU_TO_CPU_INTERRUPTS {
            log::error!("mscm: invalid cpu-to-cpu irq {}", irq);
            return;
        }

        let _guard = self.lock.lock();
        let reg = self.irsprc(irq);
        unsafe {
            let value = read_volatile(reg);
            let value = if enable {
                value | self.route
            } else {
                value & !self.route
            };
            write_volatile(reg, value);
        }
    }

    /// 第 `irq` 条 CPU 间中断是否路由到本核
    pub fn is_enabled(&self, irq: usize) -> bool {
        if irq >= MAX_CPU_TO_CPU_INTERRUPTS {
            return false;
        }
        unsafe { read_volatile(self.irsprc(irq)) & self.route != 0 }
    }
}

impl CpuToCpuIrq for Mscm {
    fn enable_cpu2cpu_irq(&self, line: usize) {
        self.update_route(line, true);
    }

    fn disable_cpu2cpu_irq(&self, line: usize) {
        self.update_route(line, false);
    }
}
