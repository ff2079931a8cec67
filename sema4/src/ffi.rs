//! C 接口
//!
//! 与现有 MCC C 代码链接使用：成功返回 0，失败返回负 errno。

use crate::errno::Errno;
use crate::error::GateResult;
use crate::platform;
use crate::sync::{self, TaskHooks};

#[inline]
fn to_errno(result: GateResult) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.as_neg_i32(),
    }
}

#[no_mangle]
pub extern "C" fn mcc_sema4_assign() -> i32 {
    to_errno(platform::assign())
}

#[no_mangle]
pub extern "C" fn mcc_sema4_deassign() -> i32 {
    to_errno(platform::deassign())
}

#[no_mangle]
pub extern "C" fn mcc_sema4_grab() -> i32 {
    to_errno(platform::grab())
}

#[no_mangle]
pub extern "C" fn mcc_sema4_release() -> i32 {
    to_errno(platform::release())
}

#[no_mangle]
pub extern "C" fn mcc_sema4_isr_grab() -> i32 {
    to_errno(platform::isr_grab())
}

#[no_mangle]
pub extern "C" fn mcc_sema4_isr_release() -> i32 {
    to_errno(platform::isr_release())
}

/// 安装宿主内核的调度钩子
///
/// 已经安装过时返回 `-EBUSY`
#[no_mangle]
pub extern "C" fn mcc_sema4_set_task_hooks(
    fatal_signal_pending: extern "C" fn() -> i32,
    schedule: extern "C" fn(),
) -> i32 {
    let hooks = TaskHooks {
        fatal_signal_pending,
        schedule,
    };
    match sync::install_task_hooks(hooks) {
        Ok(()) => 0,
        Err(()) => Errno::DeviceOrResourceBusy.as_neg_i32(),
    }
}
