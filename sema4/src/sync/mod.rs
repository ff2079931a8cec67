//! 同步原语 (Synchronization Primitives)
//!
//! 遵循 Linux 内核的同步机制设计：
//! - `include/linux/semaphore.h` - 信号量
//!
//! 主机侧的本地锁在硬件信号量之外，保证同一时刻
//! 只有一个主机进程进入门协议。

pub mod semaphore;

pub use semaphore::{
    install_task_hooks, task_hooks_installed, KernelContext, Semaphore, SpinContext, TaskContext,
    TaskHooks,
};

/// 主机本地锁
///
/// 门协议只需要两个操作：可被致命信号打断的获取，以及释放。
pub trait HostLock {
    /// 获取锁，等待期间可被致命信号打断
    ///
    /// 返回 `Err(())` 时锁未被获取
    fn lock_killable(&self) -> Result<(), ()>;

    /// 释放锁
    fn unlock(&self);
}

impl<C: TaskContext> HostLock for Semaphore<C> {
    fn lock_killable(&self) -> Result<(), ()> {
        self.down_killable()
    }

    fn unlock(&self) {
        self.up();
    }
}
