//! SEMA4 硬件信号量驱动
//!
//! 内核中存在两种驱动接口形态：
//! - `mvf`: 旧版 MVF 接口，assign/deassign，lock 带超时和等待策略
//! - `vf610`: 新版 mutex 接口，mutex_create/mutex_destroy，lock 无超时
//!
//! 门协议只依赖 [`Sema4Driver`]，不关心具体形态。

pub mod mvf;
pub mod regs;
pub mod vf610;

pub use mvf::{MvfSema4, MvfSema4Handle};
pub use regs::Sema4Regs;
pub use vf610::{Vf610MutexHandle, Vf610Sema4Mutex};

/// 硬件信号量驱动能力
///
/// 所有错误码都是负 errno，由门协议原样传递给调用者。
pub trait Sema4Driver {
    /// 不透明句柄，只有一个所有者
    type Handle: Copy + Send;

    /// 为硬件门 `gate` 创建句柄
    fn create(&self, gate: u32) -> Result<Self::Handle, i32>;

    /// 销毁句柄
    fn destroy(&self, handle: Self::Handle) -> Result<(), i32>;

    /// 上锁
    ///
    /// `blocking` 为 true 时最多等待 `timeout_us` 微秒（驱动若不支持超时则等待到成功为止）；
    /// 为 false 时只尝试一次。
    fn lock(&self, handle: Self::Handle, timeout_us: u32, blocking: bool) -> Result<(), i32>;

    /// 非阻塞上锁，供 ISR 自旋使用
    ///
    /// 实现不得睡眠
    fn try_lock(&self, handle: Self::Handle) -> Result<(), i32>;

    /// 解锁
    fn unlock(&self, handle: Self::Handle) -> Result<(), i32>;
}
