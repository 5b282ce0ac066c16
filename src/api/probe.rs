use async_trait::async_trait;

use crate::error::MetricsResult;

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    pub cores: usize,
    pub speed_ghz: f64,
}

/// Byte counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsInfo {
    pub platform: String,
    pub distro: String,
    pub kernel: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskDevice {
    pub name: String,
    pub size: u64,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsController {
    pub model: String,
    pub vram_mb: u64,
    pub memory_used_mb: Option<u64>,
    pub memory_free_mb: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentLoad {
    pub current_load: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FsSize {
    pub fs: String,
    pub size: u64,
    pub used: u64,
    pub use_percent: f64,
}

/// Source of raw hardware, OS and utilization readings.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    async fn cpu(&self) -> MetricsResult<CpuInfo>;
    async fn mem(&self) -> MetricsResult<MemInfo>;
    async fn os_info(&self) -> MetricsResult<OsInfo>;
    async fn disk_layout(&self) -> MetricsResult<Vec<DiskDevice>>;
    async fn graphics(&self) -> MetricsResult<Vec<GraphicsController>>;
    async fn current_load(&self) -> MetricsResult<CurrentLoad>;
    async fn fs_size(&self) -> MetricsResult<Vec<FsSize>>;
}
