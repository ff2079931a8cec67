//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 驱动使用的错误代码
//!
//! 和 include/uapi/asm-generic/errno.h 保持一致，驱动以负数形式返回

/// 错误代码
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Errno {
    /// Operation not permitted (EPERM, 1)
    OperationNotPermitted = 1,

    /// Interrupted system call (EINTR, 4)
    InterruptedSystemCall = 4,

    /// Device or resource busy (EBUSY, 16)
    DeviceOrResourceBusy = 16,

    /// No such device (ENODEV, 19)
    NoSuchDevice = 19,

    /// Invalid argument (EINVAL, 22)
    InvalidArgument = 22,

    /// Connection timed out (ETIMEDOUT, 110)
    TimedOut = 110,
}

impl Errno {
    /// 获取错误代码的正数值（用于比较）
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// 获取错误代码的负数值（用于驱动和 C 接口返回）
    #[inline]
    pub const fn as_neg_i32(self) -> i32 {
        -(self as i32)
    }
}

/// 常用的错误代码常量
pub mod constants {
    pub const EPERM: i32 = 1;
    pub const EINTR: i32 = 4;
    pub const EBUSY: i32 = 16;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const ETIMEDOUT: i32 = 110;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_values() {
        assert_eq!(Errno::InterruptedSystemCall.as_i32(), constants::EINTR);
        assert_eq!(Errno::DeviceOrResourceBusy.as_i32(), constants::EBUSY);
        assert_eq!(Errno::InvalidArgument.as_i32(), constants::EINVAL);
        assert_eq!(Errno::TimedOut.as_i32(), constants::ETIMEDOUT);
    }

    #[test]
    fn test_errno_negative() {
        assert_eq!(Errno::OperationNotPermitted.as_neg_i32(), -1);
        assert_eq!(Errno::NoSuchDevice.as_neg_i32(), -19);
        assert_eq!(Errno::InvalidArgument.as_neg_i32(), -22);
    }
}
