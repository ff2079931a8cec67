//! CPU 间中断线集合
//!
//! 门持有期间屏蔽的是整个集合，不存在部分屏蔽。

use bitflags::bitflags;

bitflags! {
    /// 中断线位掩码，第 n 位对应第 n 条线
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct LineMask: u32 {
        const LINE0 = 1 << 0;
        const LINE1 = 1 << 1;
        const LINE2 = 1 << 2;
        const LINE3 = 1 << 3;

        // 平台可以配置更多线
        const _ = !0;
    }
}

impl LineMask {
    /// 单条线的掩码
    #[inline]
    pub const fn line(index: usize) -> Self {
        Self::from_bits_retain(1 << index)
    }
}

/// 固定的、按序排列的中断线集合 `0..count`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InterruptLineSet {
    count: usize,
}

impl InterruptLineSet {
    /// 创建包含 `count` 条线的集合
    ///
    /// `count` 必须在 `1..=32` 之间
    pub const fn new(count: usize) -> Self {
        assert!(count >= 1 && count <= 32);
        Self { count }
    }

    /// 线的数量
    pub const fn len(&self) -> usize {
        self.count
    }

    /// 按序遍历
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        0..self.count
    }

    /// 整个集合的掩码
    pub const fn mask(&self) -> LineMask {
        if self.count == 32 {
            LineMask::all()
        } else {
            LineMask::from_bits_retain((1u32 << self.count) - 1)
        }
    }
}
