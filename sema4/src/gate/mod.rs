//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 共享内存门 (Gate)
//!
//! 保护 A5 与 M4 之间整块共享内存的唯一临界区。M4 核的缓存限制
//! 使部分保护不安全，所以调用者不提供门号，整块内存只有一个门。
//!
//! 两层锁：
//! - 外层：主机本地锁，串行化主机侧的进程
//! - 内层：SEMA4 硬件信号量，与 M4 互斥
//!
//! 两种调用上下文：
//! - 可睡眠上下文: [`Gate::grab`] / [`Gate::release`]
//! - 中断上下文: [`Gate::isr_grab`] / [`Gate::isr_release`]，只自旋

pub mod binding;
pub mod guard;
pub mod lines;

pub use binding::Sema4Binding;
pub use guard::GateGuard;
pub use lines::{InterruptLineSet, LineMask};

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config;
use crate::drivers::intc::CpuToCpuIrq;
use crate::drivers::sema4::Sema4Driver;
use crate::error::{GateError, GateResult};
use crate::sync::HostLock;

/// 门的固定参数
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// 共享内存使用的硬件门号
    pub gate: u32,
    /// 阻塞获取硬件信号量的超时（微秒）
    pub timeout_us: u32,
    /// 持有期间屏蔽的 CPU 间中断线
    pub lines: InterruptLineSet,
}

impl GateConfig {
    /// 平台配置
    pub const fn platform() -> Self {
        Self {
            gate: config::SHMEM_SEMAPHORE_NUMBER,
            timeout_us: config::TIME_PROTECT_US,
            lines: InterruptLineSet::new(config::CPU_TO_CPU_INTERRUPTS),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::platform()
    }
}

/// 共享内存门
pub struct Gate<D: Sema4Driver, I: CpuToCpuIrq, L: HostLock> {
    binding: Sema4Binding<D>,
    irq: I,
    host_lock: L,
    lines: InterruptLineSet,
    timeout_us: u32,
    /// 当前被本门屏蔽的线
    masked: AtomicU32,
    /// 主机本地锁是否由 grab() 持有
    host_held: AtomicBool,
}

impl<D: Sema4Driver, I: CpuToCpuIrq, L: HostLock> Gate<D, I, L> {
    /// 创建门，硬件句柄处于未绑定状态
    pub const fn new(driver: D, irq: I, host_lock: L, config: GateConfig) -> Self {
        Self {
            binding: Sema4Binding::new(driver, config.gate),
            irq,
            host_lock,
            lines: config.lines,
            timeout_us: config.timeout_us,
            masked: AtomicU32::new(0),
            host_held: AtomicBool::new(false),
        }
    }

    /// 绑定硬件信号量
    ///
    /// 正常启动路径在第一次 `grab()` 之前调用一次
    pub fn assign(&self) -> GateResult {
        self.binding.assign()
    }

    /// 销毁硬件信号量句柄
    ///
    /// 之后的 `grab()` 返回 `NotInitialized`，直到重新绑定
    pub fn deassign(&self) -> GateResult {
        self.binding.deassign()
    }

    /// 硬件句柄是否已绑定
    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    /// 进入临界区（可睡眠上下文）
    ///
    /// # 行为
    /// 1. 未绑定时返回 `NotInitialized`，不会延迟创建
    /// 2. 获取主机本地锁，被信号打断时返回 `Interrupted`，无任何副作用
    /// 3. 按序禁用所有 CPU 间中断线
    /// 4. 带超时获取硬件信号量，驱动错误码原样返回
    ///
    /// 只要越过第 2 步，无论第 4 步结果如何，主机本地锁和中断屏蔽都保持到
    /// 配对的 [`release`](Self::release)。调用者不得在返回错误时访问共享内存。
    pub fn grab(&self) -> GateResult {
        let handle = self.binding.handle().ok_or(GateError::NotInitialized)?;

        // 同一时刻只允许一个主机进程
        if self.host_lock.lock_killable().is_err() {
            log::debug!("sema4: grab interrupted while waiting for host lock");
            return Err(GateError::Interrupted);
        }
        self.host_held.store(true, Ordering::Release);

        // 持有期间不接收 M4 的中断
        self.mask_lines();

        self.binding.driver()
            .lock(handle, self.timeout_us, true)
            .map_err(|code| {
                log::warn!("sema4: hardware lock failed: {}", code);
                GateError::HardwareFault(code)
            })?;

        log::trace!("sema4: grabbed");
        Ok(())
    }

    /// 离开临界区（可睡眠上下文）
    ///
    /// 硬件解锁失败时仍然恢复中断线并释放主机本地锁，
    /// 返回值是硬件解锁的结果。
    ///
    /// 主机本地锁只释放由 `grab()` 取得的那一次：没有配对的 `release()`
    /// （例如 `grab()` 返回 `Interrupted` 之后）不会让本地锁的计数超过 1。
    pub fn release(&self) -> GateResult {
        let handle = self.binding.handle().ok_or(GateError::NotInitialized)?;

        let ret = self.binding.driver().unlock(handle);

        // 即使解锁失败也必须恢复，否则 M4 的通知会被永久屏蔽
        self.unmask_lines();

        // M4 侧已经释放，最后放开主机侧
        if self.host_held.swap(false, Ordering::AcqRel) {
            self.host_lock.unlock();
        } else {
            log::warn!("sema4: release without a matching grab, host lock untouched");
        }

        ret.map_err(|code| {
            log::warn!("sema4: hardware unlock failed: {}", code);
            GateError::HardwareFault(code)
        })?;

        log::trace!("sema4: released");
        Ok(())
    }

    /// 进入临界区并返回守护对象
    ///
    /// `grab()` 在获取主机本地锁之后失败时，这里立即执行 `release()`，
    /// 调用者不会继承被持有的本地锁或被屏蔽的中断线。
    pub fn lock(&self) -> GateResult<GateGuard<'_, D, I, L>> {
        match self.grab() {
            Ok(()) => Ok(GateGuard::new(self)),
            Err(GateError::HardwareFault(code)) => {
                if let Err(err) = self.release() {
                    log::debug!("sema4: cleanup after failed grab: {}", err);
                }
                Err(GateError::HardwareFault(code))
            }
            Err(err) => Err(err),
        }
    }

    /// 进入临界区（中断上下文）
    ///
    /// # 行为
    /// 1. 未绑定时就地创建句柄，失败返回 `InvalidState`
    /// 2. 不获取主机本地锁，不改变中断屏蔽
    /// 3. 反复尝试非阻塞上锁直到成功
    ///
    /// # 注意
    /// 这是纯忙等：没有超时、不让出 CPU、不睡眠。中断上下文不允许睡眠，
    /// 不要在这里加入任何 yield 或延时。只能用于极短的临界区。
    pub fn isr_grab(&self) -> GateResult {
        let handle = self.binding.get_or_assign().map_err(|code| {
            log::error!("sema4: lazy assign in isr failed: {}", code);
            GateError::InvalidState
        })?;

        let driver = self.binding.driver();
        while driver.try_lock(handle).is_err() {
            core::hint::spin_loop();
        }

        Ok(())
    }

    /// 离开临界区（中断上下文）
    pub fn isr_release(&self) -> GateResult {
        let handle = self.binding.handle().ok_or(GateError::NotInitialized)?;

        self.binding.driver()
            .unlock(handle)
            .map_err(GateError::HardwareFault)
    }

    /// 当前被本门屏蔽的中断线
    pub fn masked_lines(&self) -> LineMask {
        LineMask::from_bits_retain(self.masked.load(Ordering::Acquire))
    }

    /// 持有期间屏蔽的中断线集合
    pub fn lines(&self) -> InterruptLineSet {
        self.lines
    }

    /// 硬件信号量驱动
    pub fn driver(&self) -> &D {
        self.binding.driver()
    }

    /// 中断控制器
    pub fn irq_chip(&self) -> &I {
        &self.irq
    }

    /// 主机本地锁
    pub fn host_lock(&self) -> &L {
        &self.host_lock
    }

    fn mask_lines(&self) {
        for line in self.lines.iter() {
            self.irq.disable_cpu2cpu_irq(line);
        }
        self.masked.store(self.lines.mask().bits(), Ordering::Release);
    }

    fn unmask_lines(&self) {
        for line in self.lines.iter() {
            self.irq.enable_cpu2cpu_irq(line);
        }
        self.masked.store(0, Ordering::Release);
    }
}
