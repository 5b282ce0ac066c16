use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sysinfo::{DiskKind, Disks, System, IS_SUPPORTED_SYSTEM, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use crate::api::probe::{
    CpuInfo, CurrentLoad, DiskDevice, FsSize, GraphicsController, MemInfo, OsInfo, SystemProbe,
};
use crate::api::sysfs;
use crate::error::{MetricsError, MetricsResult};

struct CpuSampler {
    system: System,
    last_refresh: Instant,
}

/// [`SystemProbe`] backed by `sysinfo`, with `/sys` readers for the pieces
/// `sysinfo` does not cover (physical disks, graphics cards).
///
/// CPU load is measured between consecutive calls, so the sampler keeps its
/// `System` alive across requests.
pub struct SysinfoProbe {
    cpu: Arc<Mutex<CpuSampler>>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self {
            cpu: Arc::new(Mutex::new(CpuSampler {
                system,
                last_refresh: Instant::now(),
            })),
        }
    }

    async fn blocking<T, F>(query: &'static str, f: F) -> MetricsResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> MetricsResult<T> + Send + 'static,
    {
        if !IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::probe(query, "platform not supported"));
        }
        debug!("Querying probe: {}", query);
        tokio::task::spawn_blocking(f).await?
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn disk_kind_label(kind: DiskKind) -> String {
    match kind {
        DiskKind::HDD => "HD".to_string(),
        DiskKind::SSD => "SSD".to_string(),
        DiskKind::Unknown(_) => "Unknown".to_string(),
    }
}

/// Rated clock from brand strings such as `Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz`.
fn nominal_speed_ghz(brand: &str) -> Option<f64> {
    let (_, rated) = brand.rsplit_once('@')?;
    let rated = rated.trim();
    let ghz = rated
        .strip_suffix("GHz")
        .or_else(|| rated.strip_suffix("ghz"))?
        .trim()
        .parse::<f64>()
        .ok()?;
    (ghz > 0.0).then_some(ghz)
}

#[async_trait]
impl SystemProbe for SysinfoProbe {
    async fn cpu(&self) -> MetricsResult<CpuInfo> {
        let sampler = self.cpu.clone();
        Self::blocking("cpu", move || {
            let mut sampler = sampler.lock().unwrap_or_else(|e| e.into_inner());
            sampler.system.refresh_cpu_frequency();
            let system = &sampler.system;
            let first = system
                .cpus()
                .first()
                .ok_or_else(|| MetricsError::probe("cpu", "no CPUs reported"))?;
            let cores = system
                .physical_core_count()
                .unwrap_or_else(|| system.cpus().len());
            Ok(CpuInfo {
                manufacturer: first.vendor_id().trim().to_string(),
                brand: first.brand().trim().to_string(),
                cores,
                speed_ghz: nominal_speed_ghz(first.brand())
                    .or_else(|| sysfs::cpu_max_freq_khz().map(|khz| khz as f64 / 1_000_000.0))
                    .unwrap_or(first.frequency() as f64 / 1000.0),
            })
        })
        .await
    }

    async fn mem(&self) -> MetricsResult<MemInfo> {
        Self::blocking("mem", || {
            let mut system = System::new();
            system.refresh_memory();
            let total = system.total_memory();
            if total == 0 {
                return Err(MetricsError::probe("mem", "total memory unavailable"));
            }
            Ok(MemInfo {
                total,
                free: system.free_memory(),
            })
        })
        .await
    }

    async fn os_info(&self) -> MetricsResult<OsInfo> {
        Self::blocking("osInfo", || {
            Ok(OsInfo {
                platform: std::env::consts::OS.to_string(),
                distro: System::name().unwrap_or_else(|| "unknown".into()),
                kernel: System::kernel_version().unwrap_or_else(|| "unknown".into()),
            })
        })
        .await
    }

    async fn disk_layout(&self) -> MetricsResult<Vec<DiskDevice>> {
        Self::blocking("diskLayout", || {
            let devices = sysfs::block_devices();
            if !devices.is_empty() {
                return Ok(devices);
            }

            // no /sys/block: fall back to one entry per mounted device
            let disks = Disks::new_with_refreshed_list();
            let mut seen = HashSet::new();
            Ok(disks
                .list()
                .iter()
                .filter(|disk| seen.insert(disk.name().to_os_string()))
                .map(|disk| DiskDevice {
                    name: disk.name().to_string_lossy().into_owned(),
                    size: disk.total_space(),
                    kind: disk_kind_label(disk.kind()),
                })
                .collect())
        })
        .await
    }

    async fn graphics(&self) -> MetricsResult<Vec<GraphicsController>> {
        Self::blocking("graphics", || Ok(sysfs::graphics_controllers())).await
    }

    async fn current_load(&self) -> MetricsResult<CurrentLoad> {
        let sampler = self.cpu.clone();
        Self::blocking("currentLoad", move || {
            let mut sampler = sampler.lock().unwrap_or_else(|e| e.into_inner());
            let since_last = sampler.last_refresh.elapsed();
            if since_last < MINIMUM_CPU_UPDATE_INTERVAL {
                std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL - since_last);
            }
            sampler.system.refresh_cpu_usage();
            sampler.last_refresh = Instant::now();
            Ok(CurrentLoad {
                current_load: sampler.system.global_cpu_usage() as f64,
            })
        })
        .await
    }

    async fn fs_size(&self) -> MetricsResult<Vec<FsSize>> {
        Self::blocking("fsSize", || {
            let disks = Disks::new_with_refreshed_list();
            Ok(disks
                .list()
                .iter()
                .map(|disk| {
                    let size = disk.total_space();
                    let used = size.saturating_sub(disk.available_space());
                    let use_percent = if size > 0 {
                        used as f64 / size as f64 * 100.0
                    } else {
                        0.0
                    };
                    FsSize {
                        fs: disk.name().to_string_lossy().into_owned(),
                        size,
                        used,
                        use_percent,
                    }
                })
                .collect())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rated_speed_comes_from_brand() {
        assert_eq!(
            nominal_speed_ghz("Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz"),
            Some(3.6)
        );
        assert_eq!(nominal_speed_ghz("Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40 GHz"), Some(2.4));
    }

    #[test]
    fn brands_without_rated_speed_fall_through() {
        assert_eq!(nominal_speed_ghz("AMD Ryzen 7 5800X 8-Core Processor"), None);
        assert_eq!(nominal_speed_ghz("Apple M2"), None);
        assert_eq!(nominal_speed_ghz("Weird CPU @ 0.00GHz"), None);
    }
}
