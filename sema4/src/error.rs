//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 门操作的错误类型
//!
//! 所有对外操作都以 `Result` 返回错误，不会 panic：
//! ISR 路径上不允许展开。

use core::fmt;

use crate::errno::Errno;

/// 门操作错误
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateError {
    /// 硬件句柄尚未绑定（或已经解绑）
    NotInitialized,
    /// 等待本地锁时被信号打断
    Interrupted,
    /// 硬件信号量驱动返回的错误码，原样传递
    HardwareFault(i32),
    /// ISR 路径上延迟创建句柄失败
    InvalidState,
}

impl GateError {
    /// 转换为 C 接口使用的负 errno
    pub const fn as_neg_i32(self) -> i32 {
        match self {
            GateError::NotInitialized => Errno::InvalidArgument.as_neg_i32(),
            GateError::Interrupted => Errno::InterruptedSystemCall.as_neg_i32(),
            GateError::HardwareFault(code) => code,
            GateError::InvalidState => Errno::InvalidArgument.as_neg_i32(),
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::NotInitialized => write!(f, "hardware semaphore not assigned"),
            GateError::Interrupted => write!(f, "interrupted while waiting for host lock"),
            GateError::HardwareFault(code) => write!(f, "hardware semaphore error {}", code),
            GateError::InvalidState => write!(f, "lazy hardware semaphore assignment failed"),
        }
    }
}

/// 门操作结果
pub type GateResult<T = ()> = Result<T, GateError>;
