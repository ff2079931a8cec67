//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 硬件信号量绑定
//!
//! 句柄的生命周期：未绑定 → 绑定中 → 已绑定 → 解绑中 → 未绑定。
//! 状态转换全部通过原子 CAS 完成，因此阻塞路径的 `assign()` 和
//! ISR 路径的延迟创建并发时只会创建一个句柄。

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::drivers::sema4::Sema4Driver;
use crate::error::{GateError, GateResult};

const UNBOUND: u8 = 0;
const BINDING: u8 = 1;
const BOUND: u8 = 2;
const UNBINDING: u8 = 3;

/// 进程范围内唯一的硬件信号量绑定
pub struct Sema4Binding<D: Sema4Driver> {
    driver: D,
    /// 固定的硬件门号
    gate: u32,
    state: AtomicU8,
    /// 仅在 state == BOUND 时有效
    handle: UnsafeCell<MaybeUninit<D::Handle>>,
}

// handle 只在 BINDING/UNBINDING 独占状态下写入，BOUND 状态下只读。
//
// handle() 先检查 BOUND 再读取，两步之间没有锁：如果另一个 CPU 恰好在这里
// 执行 deassign() 并紧接着重新创建（assign()/get_or_assign()），读取会和
// 写入竞争。调用者必须保证 deassign() 不与 grab()/release()/isr_release()
// 并发，也就是只在门不再被使用时解绑。
unsafe impl<D: Sema4Driver + Sync> Sync for Sema4Binding<D> {}

impl<D: Sema4Driver> Sema4Binding<D> {
    /// 创建未绑定的绑定对象
    pub const fn new(driver: D, gate: u32) -> Self {
        Self {
            driver,
            gate,
            state: AtomicU8::new(UNBOUND),
            handle: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// 底层驱动
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// 硬件门号
    pub fn gate(&self) -> u32 {
        self.gate
    }

    /// 是否已绑定
    pub fn is_bound(&self) -> bool {
        self.state.load(Ordering::Acquire) == BOUND
    }

    /// 当前句柄，未绑定时为 None
    ///
    /// 不能与 [`deassign`](Self::deassign) 并发调用，见 `Sync` 实现处的说明
    pub fn handle(&self) -> Option<D::Handle> {
        if self.is_bound() {
            // BOUND 状态下 handle 已初始化且不会被改写
            Some(unsafe { (*self.handle.get()).assume_init_read() })
        } else {
            None
        }
    }

    /// 创建句柄
    ///
    /// 已经绑定时不会重复创建，只给出警告
    pub fn assign(&self) -> GateResult {
        loop {
            match self.state.compare_exchange(UNBOUND, BINDING, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => {
                    return self.create().map(|_| ()).map_err(|code| {
                        log::error!("sema4: assign gate {} failed: {}", self.gate, code);
                        GateError::HardwareFault(code)
                    });
                }
                Err(BOUND) => {
                    log::warn!("sema4: gate {} already assigned", self.gate);
                    return Ok(());
                }
                // 其它路径正在创建或销毁，等待其完成
                Err(_) => core::hint::spin_loop(),
            }
        }
    }

    /// 获取句柄，未绑定时就地创建
    ///
    /// 供 ISR 路径使用，只自旋、不睡眠
    pub fn get_or_assign(&self) -> Result<D::Handle, i32> {
        loop {
            if let Some(handle) = self.handle() {
                return Ok(handle);
            }
            if self.state
                .compare_exchange(UNBOUND, BINDING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return self.create();
            }
            core::hint::spin_loop();
        }
    }

    /// 销毁句柄
    ///
    /// 驱动销毁失败时句柄保持绑定，调用者可以重试
    pub fn deassign(&self) -> GateResult {
        if self.state
            .compare_exchange(BOUND, UNBINDING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GateError::NotInitialized);
        }

        let handle = unsafe { (*self.handle.get()).assume_init_read() };
        match self.driver.destroy(handle) {
            Ok(()) => {
                self.state.store(UNBOUND, Ordering::Release);
                log::info!("sema4: gate {} deassigned", self.gate);
                Ok(())
            }
            Err(code) => {
                self.state.store(BOUND, Ordering::Release);
                log::error!("sema4: deassign gate {} failed: {}", self.gate, code);
                Err(GateError::HardwareFault(code))
            }
        }
    }

    /// 在 BINDING 状态下调用，结束时离开 BINDING
    fn create(&self) -> Result<D::Handle, i32> {
        match self.driver.create(self.gate) {
            Ok(handle) => {
                unsafe { (*self.handle.get()).write(handle) };
                self.state.store(BOUND, Ordering::Release);
                log::info!("sema4: gate {} assigned", self.gate);
                Ok(handle)
            }
            Err(code) => {
                self.state.store(UNBOUND, Ordering::Release);
                Err(code)
            }
        }
    }
}
