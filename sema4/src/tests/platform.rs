// 测试：平台默认门与 C 接口
//
// 平台门只覆盖未绑定状态：这些路径在访问寄存器之前返回，
// 主机上运行时不会触碰 SEMA4/MSCM 的物理地址。平台主机本地锁
// 通过宿主钩子睡眠和检查信号，这里用替身驱动单独验证。

use std::sync::atomic::{AtomicUsize, Ordering};

use super::mock::*;
use crate::config;
use crate::drivers::intc::mscm::MAX_CPU_TO_CPU_INTERRUPTS;
use crate::errno::constants::*;
use crate::error::GateError;
use crate::ffi;
use crate::gate::{Gate, GateConfig};
use crate::platform::{self, PlatformHostLock};
use crate::sync::{self, KernelContext, Semaphore, TaskContext};

/// 宿主内核钩子：等待三次之后任务收到致命信号
static SCHEDULES: AtomicUsize = AtomicUsize::new(0);

extern "C" fn kill_after_three_waits() -> i32 {
    (SCHEDULES.load(Ordering::Acquire) >= 3) as i32
}

extern "C" fn count_schedule() {
    SCHEDULES.fetch_add(1, Ordering::AcqRel);
    std::thread::yield_now();
}

fn install_hooks() {
    let ret = ffi::mcc_sema4_set_task_hooks(kill_after_three_waits, count_schedule);
    assert!(ret == 0 || ret == -EBUSY);
    assert!(sync::task_hooks_installed());
}

#[test]
fn test_platform_config() {
    let config = GateConfig::platform();

    assert_eq!(config.gate, config::SHMEM_SEMAPHORE_NUMBER);
    assert_eq!(config.timeout_us, config::TIME_PROTECT_US);
    assert_eq!(config.lines.len(), config::CPU_TO_CPU_INTERRUPTS);
    assert!(config::CPU_TO_CPU_INTERRUPTS <= MAX_CPU_TO_CPU_INTERRUPTS);
    assert_eq!(GateConfig::default(), config);
}

#[test]
fn test_platform_gate_starts_unbound() {
    assert!(!platform::gate().is_bound());
    assert_eq!(platform::grab(), Err(GateError::NotInitialized));
    assert_eq!(platform::release(), Err(GateError::NotInitialized));
    assert_eq!(platform::isr_release(), Err(GateError::NotInitialized));
    assert_eq!(platform::deassign(), Err(GateError::NotInitialized));
    assert!(platform::gate().masked_lines().is_empty());
}

#[test]
fn test_ffi_returns_negative_errno() {
    assert_eq!(ffi::mcc_sema4_grab(), -EINVAL);
    assert_eq!(ffi::mcc_sema4_release(), -EINVAL);
    assert_eq!(ffi::mcc_sema4_isr_release(), -EINVAL);
    assert_eq!(ffi::mcc_sema4_deassign(), -EINVAL);
}

#[test]
fn test_platform_host_lock_sleeps_and_is_killable() {
    install_hooks();

    let lock: PlatformHostLock = Semaphore::with_context(0, KernelContext);
    assert_eq!(lock.down_killable(), Err(()));
    assert!(SCHEDULES.load(Ordering::Acquire) >= 3);
    assert!(lock.context().fatal_signal_pending());
    assert_eq!(lock.count(), 0);

    // 可用时不看信号
    lock.up();
    assert_eq!(lock.down_killable(), Ok(()));
}

#[test]
fn test_platform_host_lock_interrupts_grab() {
    install_hooks();

    let gate = Gate::new(
        FakeSema4::new(),
        FakeIrq::new(),
        PlatformHostLock::with_context(0, KernelContext),
        test_config(),
    );
    gate.assign().unwrap();

    assert_eq!(gate.grab(), Err(GateError::Interrupted));
    assert!(gate.irq_chip().events().is_empty());
    assert_eq!(gate.driver().lock_call_count(), 0);
}

#[test]
fn test_task_hooks_install_once() {
    install_hooks();
    assert_eq!(ffi::mcc_sema4_set_task_hooks(kill_after_three_waits, count_schedule), -EBUSY);
}
