use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecsResponse {
    pub cpu: CpuSpecs,
    pub memory: MemorySpecs,
    pub os: OsSpecs,
    pub disks: Vec<DiskSpecs>,
    pub gpu: Vec<GpuSpecs>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuSpecs {
    pub manufacturer: String,
    pub brand: String,
    pub cores: usize,
    pub speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySpecs {
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsSpecs {
    pub platform: String,
    pub distro: String,
    pub kernel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskSpecs {
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpecs {
    pub model: String,
    pub vram: String,
    pub memory_used: String,
    pub memory_free: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageResponse {
    pub cpu: CpuUsage,
    pub memory: MemoryUsage,
    pub storage: Vec<StorageUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUsage {
    pub load: String,
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub total: String,
    pub used: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageUsage {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}
