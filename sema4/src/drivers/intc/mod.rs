//! 中断控制器驱动
//!
//! 支持 Vybrid MSCM 中断路由器的 CPU 间中断线

pub mod mscm;

pub use mscm::Mscm;

/// CPU 间中断线的使能/禁用
///
/// 两个操作都假定不会失败
pub trait CpuToCpuIrq {
    /// 使能第 `line` 条 CPU 间中断
    fn enable_cpu2cpu_irq(&self, line: usize);

    /// 禁用第 `line` 条 CPU 间中断
    fn disable_cpu2cpu_irq(&self, line: usize);
}
