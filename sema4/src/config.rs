//! mcc-sema4 平台配置
//!
//! 常量由 build.rs 根据工作区根目录的 Sema4.toml 生成

include!(concat!(env!("OUT_DIR"), "/config.rs"));
