use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api::probe::{
    CpuInfo, CurrentLoad, DiskDevice, FsSize, GraphicsController, MemInfo, OsInfo, SystemProbe,
};
use crate::error::{MetricsError, MetricsResult};

/// Scripted probe for tests and local runs without real hardware access.
pub struct FakeProbe {
    pub cpu: CpuInfo,
    pub mem: MemInfo,
    pub os: OsInfo,
    pub disks: Vec<DiskDevice>,
    pub controllers: Vec<GraphicsController>,
    pub filesystems: Vec<FsSize>,
    loads: Mutex<Vec<f64>>,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            cpu: CpuInfo {
                manufacturer: "GenuineIntel".into(),
                brand: "Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz".into(),
                cores: 8,
                speed_ghz: 3.6,
            },
            mem: MemInfo {
                total: 8_589_934_592,
                free: 2_147_483_648,
            },
            os: OsInfo {
                platform: "linux".into(),
                distro: "Ubuntu".into(),
                kernel: "6.5.0-14-generic".into(),
            },
            disks: vec![DiskDevice {
                name: "Samsung SSD 970 EVO Plus 500GB".into(),
                size: 500_107_862_016,
                kind: "NVMe".into(),
            }],
            controllers: vec![GraphicsController {
                model: "Intel [0x3e92]".into(),
                vram_mb: 0,
                memory_used_mb: None,
                memory_free_mb: None,
            }],
            filesystems: vec![FsSize {
                fs: "/dev/nvme0n1p2".into(),
                size: 107_374_182_400,
                used: 48_318_382_080,
                use_percent: 45.0,
            }],
            loads: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        }
    }
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads returned by successive `current_load` calls; the last one repeats.
    pub fn with_loads(self, loads: impl IntoIterator<Item = f64>) -> Self {
        let mut queued: Vec<f64> = loads.into_iter().collect();
        queued.reverse();
        *self.loads.lock().unwrap_or_else(|e| e.into_inner()) = queued;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of probe queries answered or refused so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, query: &'static str, value: impl FnOnce() -> T) -> MetricsResult<T> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetricsError::probe(query, "scripted failure"));
        }
        Ok(value())
    }
}

#[async_trait]
impl SystemProbe for FakeProbe {
    async fn cpu(&self) -> MetricsResult<CpuInfo> {
        self.answer("cpu", || self.cpu.clone())
    }

    async fn mem(&self) -> MetricsResult<MemInfo> {
        self.answer("mem", || self.mem)
    }

    async fn os_info(&self) -> MetricsResult<OsInfo> {
        self.answer("osInfo", || self.os.clone())
    }

    async fn disk_layout(&self) -> MetricsResult<Vec<DiskDevice>> {
        self.answer("diskLayout", || self.disks.clone())
    }

    async fn graphics(&self) -> MetricsResult<Vec<GraphicsController>> {
        self.answer("graphics", || self.controllers.clone())
    }

    async fn current_load(&self) -> MetricsResult<CurrentLoad> {
        self.answer("currentLoad", || {
            let mut loads = self.loads.lock().unwrap_or_else(|e| e.into_inner());
            let current_load = if loads.len() > 1 {
                loads.pop().unwrap_or_default()
            } else {
                loads.last().copied().unwrap_or_default()
            };
            CurrentLoad { current_load }
        })
    }

    async fn fs_size(&self) -> MetricsResult<Vec<FsSize>> {
        self.answer("fsSize", || self.filesystems.clone())
    }
}
