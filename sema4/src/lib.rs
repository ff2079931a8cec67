//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! mcc-sema4: A5/M4 共享内存门
//!
//! 组合两层保护：
//! - 主机侧进程之间：可被致命信号打断的本地信号量
//!   （不用 mutex，因为需要在中断中测试）
//! - 核与核之间：Vybrid SEMA4 硬件信号量
//!
//! 没有显式的初始化调用：阻塞路径要求先 `assign()`，
//! 中断路径在第一次 `isr_grab()` 时按需绑定。

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod errno;
pub mod error;
pub mod ffi;
pub mod gate;
pub mod platform;
pub mod sync;

#[cfg(test)]
mod tests;

pub use error::{GateError, GateResult};
pub use gate::{Gate, GateConfig, GateGuard, InterruptLineSet, LineMask};
