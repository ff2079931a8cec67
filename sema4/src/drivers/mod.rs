//! 设备驱动
//!
//! - `sema4`: SEMA4 硬件信号量（两种驱动接口形态）
//! - `intc`: MSCM CPU 间中断路由

pub mod intc;
pub mod sema4;

use crate::config::LOOPS_PER_US;

/// 忙等延时（微秒）
///
/// 精度取决于 `LOOPS_PER_US` 的标定
pub fn spin_udelay(us: u32) {
    let loops = us.saturating_mul(LOOPS_PER_US);
    for _ in 0..loops {
        core::hint::spin_loop();
    }
}
