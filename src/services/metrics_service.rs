use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::probe::{
    CpuInfo, DiskDevice, FsSize, GraphicsController, MemInfo, OsInfo, SystemProbe,
};
use crate::config::Config;
use crate::error::MetricsResult;
use crate::models::cache::CacheStore;
use crate::models::history::CpuHistory;
use crate::models::response::{
    CpuSpecs, CpuUsage, DiskSpecs, GpuSpecs, MemorySpecs, MemoryUsage, OsSpecs, SpecsResponse,
    StorageUsage, UsageResponse,
};
use crate::utils::units::{
    compact_number, fixed2, format_gb, format_mb, format_optional_mb, format_percent,
};

pub const SPECS_KEY: &str = "specs";
pub const USAGE_KEY: &str = "usage";

/// Owns the cache and CPU history shared by every request.
pub struct MetricsService {
    probe: Arc<dyn SystemProbe>,
    cache: CacheStore,
    history: CpuHistory,
}

impl MetricsService {
    pub fn new(probe: Arc<dyn SystemProbe>, config: &Config) -> Self {
        info!(
            "Metrics service ready (cache ttl {:?}, history length {})",
            config.cache_ttl, config.history_capacity
        );
        Self {
            probe,
            cache: CacheStore::new(config.cache_ttl),
            history: CpuHistory::new(config.history_capacity),
        }
    }

    pub fn history(&self) -> &CpuHistory {
        &self.history
    }

    /// Cached `/specs` payload.
    pub async fn specs(&self) -> MetricsResult<Value> {
        self.cache
            .get_cached_data(SPECS_KEY, || self.specs_value())
            .await
    }

    /// Cached `/usage` payload.
    pub async fn usage(&self) -> MetricsResult<Value> {
        self.cache
            .get_cached_data(USAGE_KEY, || self.usage_value())
            .await
    }

    async fn specs_value(&self) -> MetricsResult<Value> {
        Ok(serde_json::to_value(self.fetch_specs().await?)?)
    }

    async fn usage_value(&self) -> MetricsResult<Value> {
        Ok(serde_json::to_value(self.fetch_usage().await?)?)
    }

    pub async fn fetch_specs(&self) -> MetricsResult<SpecsResponse> {
        debug!("Fetching system specs");
        let (cpu, memory, os, disks, gpu) = tokio::try_join!(
            self.probe.cpu(),
            self.probe.mem(),
            self.probe.os_info(),
            self.probe.disk_layout(),
            self.probe.graphics()
        )?;
        Ok(shape_specs(cpu, memory, os, disks, gpu))
    }

    /// Also appends the current load to the CPU history; the returned record
    /// carries the history as it stands after that append.
    pub async fn fetch_usage(&self) -> MetricsResult<UsageResponse> {
        debug!("Fetching system usage");
        let (load, memory, filesystems) = tokio::try_join!(
            self.probe.current_load(),
            self.probe.mem(),
            self.probe.fs_size()
        )?;

        let history = self.history.record(fixed2(load.current_load));
        Ok(shape_usage(load.current_load, history, memory, filesystems))
    }
}

fn shape_specs(
    cpu: CpuInfo,
    memory: MemInfo,
    os: OsInfo,
    disks: Vec<DiskDevice>,
    gpu: Vec<GraphicsController>,
) -> SpecsResponse {
    SpecsResponse {
        cpu: CpuSpecs {
            manufacturer: cpu.manufacturer,
            brand: cpu.brand,
            cores: cpu.cores,
            speed: format!("{} GHz", compact_number(cpu.speed_ghz)),
        },
        memory: MemorySpecs {
            total: format_gb(memory.total),
        },
        os: OsSpecs {
            platform: os.platform,
            distro: os.distro,
            kernel: os.kernel,
        },
        disks: disks
            .into_iter()
            .map(|d| DiskSpecs {
                name: d.name,
                size: format_gb(d.size),
                kind: d.kind,
            })
            .collect(),
        gpu: gpu
            .into_iter()
            .map(|g| GpuSpecs {
                model: g.model,
                vram: format_mb(g.vram_mb),
                memory_used: format_optional_mb(g.memory_used_mb),
                memory_free: format_optional_mb(g.memory_free_mb),
            })
            .collect(),
    }
}

fn shape_usage(
    load: f64,
    history: Vec<String>,
    memory: MemInfo,
    filesystems: Vec<FsSize>,
) -> UsageResponse {
    let used = memory.total.saturating_sub(memory.free);
    let usage = if memory.total > 0 {
        used as f64 / memory.total as f64 * 100.0
    } else {
        0.0
    };

    UsageResponse {
        cpu: CpuUsage {
            load: format_percent(load),
            history,
        },
        memory: MemoryUsage {
            total: format_gb(memory.total),
            used: format_gb(used),
            usage: format_percent(usage),
        },
        storage: filesystems
            .into_iter()
            .map(|d| StorageUsage {
                filesystem: d.fs,
                size: format_gb(d.size),
                used: format_gb(d.used),
                usage: format!("{} %", compact_number(d.use_percent)),
            })
            .collect(),
    }
}
