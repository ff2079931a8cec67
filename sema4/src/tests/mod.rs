//! 单元测试模块
//!
//! 在主机上运行：
//! ```bash
//! cargo test --package mcc-sema4
//! cargo test --package mcc-sema4 --features mvf-sema4
//! ```


mod binding;
mod platform;
