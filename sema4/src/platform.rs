//! 平台默认门
//!
//! 由 Sema4.toml 配置的驱动组成的进程范围单例。寄存器基址按
//! 内核的恒等映射直接访问。
//!
//! 驱动接口形态在构建时选择：
//! - 默认：`Vf610Sema4Mutex`
//! - `mvf-sema4` 特性：`MvfSema4`
//!
//! 主机本地锁通过 [`KernelContext`] 睡眠和检查致命信号，宿主内核需要在
//! 第一次 `grab()` 之前用 [`install_task_hooks`](crate::sync::install_task_hooks)
//! 或 `mcc_sema4_set_task_hooks` 安装调度钩子。

use lazy_static::lazy_static;

use crate::config;
use crate::drivers::intc::mscm::MAX_CPU_TO_CPU_INTERRUPTS;
use crate::drivers::intc::Mscm;
use crate::drivers::sema4::Sema4Regs;
use crate::error::GateResult;
use crate::gate::{Gate, GateConfig};
use crate::sync::{KernelContext, Semaphore};

#[cfg(feature = "mvf-sema4")]
pub use crate::drivers::sema4::MvfSema4 as PlatformSema4;
#[cfg(not(feature = "mvf-sema4"))]
pub use crate::drivers::sema4::Vf610Sema4Mutex as PlatformSema4;

// MSCM 只有 4 条 CPU 间中断线
const _: () = assert!(config::CPU_TO_CPU_INTERRUPTS <= MAX_CPU_TO_CPU_INTERRUPTS);

/// 平台主机本地锁
pub type PlatformHostLock = Semaphore<KernelContext>;

/// 平台门的具体类型
pub type PlatformGate = Gate<PlatformSema4, Mscm, PlatformHostLock>;

#[cfg(feature = "mvf-sema4")]
fn platform_sema4() -> PlatformSema4 {
    let regs = unsafe { Sema4Regs::new(config::SEMA4_BASE) };
    PlatformSema4::new(
        regs,
        config::SEMA4_CPU_DOMAIN,
        crate::drivers::spin_udelay,
        config::SEMA4_POLL_US,
    )
}

#[cfg(not(feature = "mvf-sema4"))]
fn platform_sema4() -> PlatformSema4 {
    let regs = unsafe { Sema4Regs::new(config::SEMA4_BASE) };
    PlatformSema4::new(regs, config::SEMA4_DEVICE, config::SEMA4_CPU_DOMAIN)
}

lazy_static! {
    // 对应 DEFINE_SEMAPHORE(linux_mutex) 与 static sema4 = NULL
    static ref GATE: PlatformGate = Gate::new(
        platform_sema4(),
        unsafe { Mscm::new(config::MSCM_BASE, config::MSCM_CPU_ROUTE) },
        Semaphore::with_context(1, KernelContext),
        GateConfig::platform(),
    );
}

/// 平台门
pub fn gate() -> &'static PlatformGate {
    &GATE
}

pub fn assign() -> GateResult {
    GATE.assign()
}

pub fn deassign() -> GateResult {
    GATE.deassign()
}

pub fn grab() -> GateResult {
    GATE.grab()
}

pub fn release() -> GateResult {
    GATE.release()
}

/// 只能在中断上下文中调用，见 [`Gate::isr_grab`]
pub fn isr_grab() -> GateResult {
    GATE.isr_grab()
}

pub fn isr_release() -> GateResult {
    GATE.isr_release()
}
