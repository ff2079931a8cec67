//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 信号量 (Semaphore) 机制
//!
//! 对应 Linux 内核：
//! - `kernel/locking/semaphore.c` - down_killable / down_trylock / up
//!
//! 核心概念：
//! - P 操作 (down_killable): 获取信号量，可能阻塞，可被致命信号打断
//! - V 操作 (up): 释放信号量
//!
//! 本 crate 不自带调度器，阻塞等待通过 [`TaskContext`] 交给宿主内核

use core::sync::atomic::{AtomicI32, Ordering};

/// 当前任务的调度上下文
///
/// 对应 Linux 中 `current` 与 `schedule()` 的组合
pub trait TaskContext {
    /// 当前任务是否有挂起的致命信号
    ///
    /// 对应 `fatal_signal_pending(current)`
    fn fatal_signal_pending(&self) -> bool;

    /// 让出 CPU，等待下一次尝试
    fn schedule(&self);
}

/// 没有调度器时使用的上下文：从不被信号打断，等待时自旋
#[derive(Debug, Default, Copy, Clone)]
pub struct SpinContext;

impl TaskContext for SpinContext {
    fn fatal_signal_pending(&self) -> bool {
        false
    }

    fn schedule(&self) {
        core::hint::spin_loop();
    }
}

/// 宿主内核提供的调度钩子
///
/// 对应 `fatal_signal_pending(current)` 与 `schedule()`，
/// `fatal_signal_pending` 返回非 0 表示有挂起的致命信号
#[derive(Debug, Copy, Clone)]
pub struct TaskHooks {
    pub fatal_signal_pending: extern "C" fn() -> i32,
    pub schedule: extern "C" fn(),
}

static TASK_HOOKS: spin::Once<TaskHooks> = spin::Once::new();

/// 安装调度钩子
///
/// 只能安装一次，重复安装返回 `Err(())` 且保留原钩子。
/// 必须在第一次阻塞获取之前调用。
pub fn install_task_hooks(hooks: TaskHooks) -> Result<(), ()> {
    let mut installed = false;
    TASK_HOOKS.call_once(|| {
        installed = true;
        hooks
    });

    if installed {
        Ok(())
    } else {
        Err(())
    }
}

/// 调度钩子是否已安装
pub fn task_hooks_installed() -> bool {
    TASK_HOOKS.is_completed()
}

/// 宿主内核的调度上下文
///
/// 经由 [`install_task_hooks`] 安装的钩子睡眠和检查信号。
/// 钩子安装之前退化为 [`SpinContext`] 的行为。
#[derive(Debug, Default, Copy, Clone)]
pub struct KernelContext;

impl TaskContext for KernelContext {
    fn fatal_signal_pending(&self) -> bool {
        match TASK_HOOKS.get() {
            Some(hooks) => (hooks.fatal_signal_pending)() != 0,
            None => false,
        }
    }

    fn schedule(&self) {
        match TASK_HOOKS.get() {
            Some(hooks) => (hooks.schedule)(),
            None => core::hint::spin_loop(),
        }
    }
}

/// 信号量
///
/// 信号量是一个非负整数，用于进程同步：
/// - 初始化为某个正整数
/// - P 操作: 值大于 0 时减 1，否则等待
/// - V 操作: 值加 1
pub struct Semaphore<C: TaskContext = SpinContext> {
    /// 信号量计数值
    count: AtomicI32,
    /// 等待时使用的调度上下文
    ctx: C,
}

impl Semaphore<SpinContext> {
    /// 创建使用自旋等待的信号量
    ///
    /// # 示例
    /// ```
    /// use mcc_sema4::sync::Semaphore;
    ///
    /// // 互斥信号量（二值信号量），对应 DEFINE_SEMAPHORE
    /// let mutex = Semaphore::new(1);
    /// assert_eq!(mutex.count(), 1);
    /// ```
    pub const fn new(value: i32) -> Self {
        Self::with_context(value, SpinContext)
    }
}

impl<C: TaskContext> Semaphore<C> {
    /// 使用指定调度上下文创建信号量
    pub const fn with_context(value: i32, ctx: C) -> Self {
        Self {
            count: AtomicI32::new(value),
            ctx,
        }
    }

    /// 尝试 P 操作（非阻塞）
    ///
    /// # 返回
    /// - `Ok(())` - 成功获取信号量
    /// - `Err(())` - 信号量不足
    pub fn down_trylock(&self) -> Result<(), ()> {
        let mut cur = self.count.load(Ordering::Relaxed);
        while cur > 0 {
            match self.count.compare_exchange_weak(
                cur,
                cur - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => cur = actual,
            }
        }
        Err(())
    }

    /// P 操作（可被致命信号打断）
    ///
    /// 也称为 down_killable 操作
    ///
    /// # 行为
    /// - 信号量可用时立即获取，即使有信号挂起
    /// - 否则等待，每次重试前检查致命信号
    ///
    /// # 返回
    /// - `Ok(())` - 成功获取信号量
    /// - `Err(())` - 被信号打断，信号量未被获取
    pub fn down_killable(&self) -> Result<(), ()> {
        loop {
            if self.down_trylock().is_ok() {
                return Ok(());
            }

            if self.ctx.fatal_signal_pending() {
                return Err(());
            }

            self.ctx.schedule();
        }
    }

    /// V 操作（释放信号量）
    pub fn up(&self) {
        self.count.fetch_add(1, Ordering::Release);
    }

    /// 获取信号量当前值
    ///
    /// # 注意
    /// 此值仅供参考，实际值可能在调用后立即改变
    pub fn count(&self) -> i32 {
        self.count.load(Ordering::Acquire)
    }

    /// 获取调度上下文
    pub fn context(&self) -> &C {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicBool;

    struct Killed(AtomicBool);

    impl TaskContext for Killed {
        fn fatal_signal_pending(&self) -> bool {
            self.0.load(Ordering::Relaxed)
        }

        fn schedule(&self) {
            std::thread::yield_now();
        }
    }

    #[test]
    fn test_trylock() {
        let sem = Semaphore::new(1);
        assert_eq!(sem.down_trylock(), Ok(()));
        assert_eq!(sem.down_trylock(), Err(()));
        assert_eq!(sem.count(), 0);
        sem.up();
        assert_eq!(sem.count(), 1);
    }

    #[test]
    fn test_killable_fast_path_ignores_signal() {
        let sem = Semaphore::with_context(1, Killed(AtomicBool::new(true)));
        assert_eq!(sem.down_killable(), Ok(()));
    }

    #[test]
    fn test_killable_interrupted() {
        let sem = Semaphore::with_context(0, Killed(AtomicBool::new(true)));
        assert_eq!(sem.down_killable(), Err(()));
        // 被打断后计数不变
        assert_eq!(sem.count(), 0);
    }
}
