//! mcc-sema4 构建脚本
//!
//! 这个脚本在编译前运行，负责：
//! 1. 解析 Sema4.toml 配置文件
//! 2. 生成配置代码（OUT_DIR/config.rs）
//! 3. 校验门号、域号和中断线数量

use std::env;
use std::fs;
use std::path::PathBuf;

/// 读取整数配置项，缺失时使用默认值
fn int_or(config: &toml::Value, section: &str, key: &str, default: i64) -> i64 {
    config.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(default)
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let config_path = manifest_dir.join("../Sema4.toml");

    println!("cargo:rerun-if-changed={}", config_path.display());

    // 配置文件缺失时全部使用 VF610 默认值
    let config: toml::Value = match fs::read_to_string(&config_path) {
        Ok(content) => toml::from_str(&content).expect("Sema4.toml 解析失败"),
        Err(_) => {
            println!("cargo:warning=Sema4.toml not found, using VF610 defaults");
            toml::Value::Table(toml::map::Map::new())
        }
    };

    let platform = config.get("platform")
        .and_then(|p| p.get("default_platform"))
        .and_then(|v| v.as_str())
        .unwrap_or("vf610");

    generate_config_code(&config, platform);
}

fn generate_config_code(config: &toml::Value, platform: &str) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let lines = int_or(config, "mscm", "cpu_to_cpu_interrupts", 4);
    // MSCM 只有 4 条 CPU 间中断线 (IRSPRC0..3)
    if !(1..=4).contains(&lines) {
        panic!("mscm.cpu_to_cpu_interrupts 必须在 1..=4 范围内，当前为 {}", lines);
    }

    let domain = int_or(config, "sema4", "cpu_domain", 0);
    if !(0..=1).contains(&domain) {
        panic!("sema4.cpu_domain 只能是 0 (A5) 或 1 (M4)，当前为 {}", domain);
    }

    let gate = int_or(config, "sema4", "shmem_semaphore_number", 1);
    if !(0..16).contains(&gate) {
        panic!("sema4.shmem_semaphore_number 必须小于 16，当前为 {}", gate);
    }

    let code = format!(
        r#"// mcc-sema4 平台配置（自动生成）
//
// 此文件由 build.rs 根据 Sema4.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 目标平台
pub const TARGET_PLATFORM: &str = "{}";

// ============================================================
// SEMA4 配置
// ============================================================

/// SEMA4 寄存器基址
pub const SEMA4_BASE: usize = {:#x};

/// 本核在 SEMA4 中的域号（A5 = 0）
pub const SEMA4_CPU_DOMAIN: u8 = {};

/// 共享内存使用的硬件门号
pub const SHMEM_SEMAPHORE_NUMBER: u32 = {};

/// vf610_sema4_mutex_create 的设备号
pub const SEMA4_DEVICE: u32 = {};

/// 阻塞获取的超时时间（微秒）
pub const TIME_PROTECT_US: u32 = {};

/// 带超时获取时的轮询间隔（微秒）
pub const SEMA4_POLL_US: u32 = {};

// ============================================================
// MSCM 配置
// ============================================================

/// MSCM 寄存器基址
pub const MSCM_BASE: usize = {:#x};

/// IRSPRC 寄存器中本核的路由位
pub const MSCM_CPU_ROUTE: u16 = {:#x};

/// CPU 间中断线数量
pub const CPU_TO_CPU_INTERRUPTS: usize = {};

// ============================================================
// 延时配置
// ============================================================

/// 忙等延时的每微秒循环次数
pub const LOOPS_PER_US: u32 = {};
"#,
        platform,
        int_or(config, "sema4", "base", 0x4001_D000),
        domain,
        gate,
        int_or(config, "sema4", "device", 0),
        int_or(config, "sema4", "time_protect_us", 10_000_000),
        int_or(config, "sema4", "poll_us", 10),
        int_or(config, "mscm", "base", 0x4000_1000),
        int_or(config, "mscm", "cpu_route", 0x1),
        lines,
        int_or(config, "timer", "loops_per_us", 500),
    );

    let config_file = out_dir.join("config.rs");

    // 只有内容变化时才写入，避免每次编译都更新文件时间戳
    let existing_content = fs::read_to_string(&config_file).unwrap_or_default();
    if existing_content != code {
        fs::write(&config_file, &code)
            .expect("写入配置文件失败");
    }
}
