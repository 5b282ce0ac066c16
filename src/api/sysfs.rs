//! Readers for the Linux `/sys` tree: block devices, DRM graphics cards and
//! the rated CPU clock.
//! Missing files are not errors; on other platforms these simply find nothing.

use std::fs;
use std::path::Path;

use crate::api::probe::{DiskDevice, GraphicsController};

const SYS_BLOCK: &str = "/sys/block";
const SYS_DRM: &str = "/sys/class/drm";
const CPU0_MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";
const SECTOR_SIZE: u64 = 512;
const BYTES_PER_MB: u64 = 1024 * 1024;

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_u64(path: &Path) -> Option<u64> {
    read_trimmed(path).and_then(|s| s.parse().ok())
}

/// Virtual block devices that never show up as hardware.
fn is_physical_block_device(name: &str) -> bool {
    const VIRTUAL_PREFIXES: [&str; 6] = ["loop", "ram", "zram", "dm-", "md", "sr"];
    !VIRTUAL_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn block_device_kind(name: &str, rotational: Option<u64>) -> &'static str {
    if name.starts_with("nvme") {
        return "NVMe";
    }
    match rotational {
        Some(1) => "HD",
        Some(0) => "SSD",
        _ => "Unknown",
    }
}

/// Highest clock cpu0 may run at, in kHz. Zero readings count as missing.
pub fn cpu_max_freq_khz() -> Option<u64> {
    max_freq_khz_at(Path::new(CPU0_MAX_FREQ))
}

fn max_freq_khz_at(path: &Path) -> Option<u64> {
    read_u64(path).filter(|khz| *khz > 0)
}

pub fn block_devices() -> Vec<DiskDevice> {
    block_devices_in(Path::new(SYS_BLOCK))
}

fn block_devices_in(root: &Path) -> Vec<DiskDevice> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut devices: Vec<DiskDevice> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_physical_block_device(&name) {
                return None;
            }
            let dir = entry.path();
            let sectors = read_u64(&dir.join("size")).unwrap_or(0);
            if sectors == 0 {
                return None;
            }
            let rotational = read_u64(&dir.join("queue/rotational"));
            Some(DiskDevice {
                name: read_trimmed(&dir.join("device/model")).unwrap_or_else(|| name.clone()),
                size: sectors * SECTOR_SIZE,
                kind: block_device_kind(&name, rotational).to_string(),
            })
        })
        .collect();
    devices.sort_by(|a, b| a.name.cmp(&b.name));
    devices
}

/// `card0`, `card1`, ... but not connector entries such as `card0-HDMI-A-1`.
fn is_card_entry(name: &str) -> bool {
    name.strip_prefix("card")
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn vendor_name(vendor_id: &str) -> &'static str {
    match vendor_id.to_ascii_lowercase().as_str() {
        "0x10de" => "NVIDIA",
        "0x1002" => "AMD",
        "0x8086" => "Intel",
        "0x1af4" => "Red Hat Virtio",
        "0x15ad" => "VMware",
        "0x1234" => "QEMU",
        _ => "Unknown",
    }
}

pub fn graphics_controllers() -> Vec<GraphicsController> {
    graphics_controllers_in(Path::new(SYS_DRM))
}

fn graphics_controllers_in(root: &Path) -> Vec<GraphicsController> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut cards: Vec<(String, GraphicsController)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_card_entry(&name) {
                return None;
            }
            let device = entry.path().join("device");
            let model = read_trimmed(&device.join("product_name")).unwrap_or_else(|| {
                let vendor = read_trimmed(&device.join("vendor")).unwrap_or_default();
                let id = read_trimmed(&device.join("device")).unwrap_or_default();
                format!("{} [{}]", vendor_name(&vendor), id)
            });
            let vram_total = read_u64(&device.join("mem_info_vram_total"));
            let vram_used = read_u64(&device.join("mem_info_vram_used"));
            let controller = GraphicsController {
                model,
                vram_mb: vram_total.unwrap_or(0) / BYTES_PER_MB,
                memory_used_mb: vram_used.map(|b| b / BYTES_PER_MB),
                memory_free_mb: vram_total
                    .zip(vram_used)
                    .map(|(total, used)| total.saturating_sub(used) / BYTES_PER_MB),
            };
            Some((name, controller))
        })
        .collect();
    cards.sort_by(|a, b| a.0.cmp(&b.0));
    cards.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("host-metrics-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn filters_virtual_block_devices() {
        assert!(is_physical_block_device("sda"));
        assert!(is_physical_block_device("nvme0n1"));
        assert!(!is_physical_block_device("loop3"));
        assert!(!is_physical_block_device("zram0"));
        assert!(!is_physical_block_device("dm-1"));
    }

    #[test]
    fn recognises_card_entries_only() {
        assert!(is_card_entry("card0"));
        assert!(is_card_entry("card12"));
        assert!(!is_card_entry("card0-HDMI-A-1"));
        assert!(!is_card_entry("renderD128"));
        assert!(!is_card_entry("card"));
    }

    #[test]
    fn reads_cpu_max_frequency() {
        let root = scratch_dir("cpufreq");
        write(root.join("cpuinfo_max_freq"), "4900000\n");
        write(root.join("zero_freq"), "0\n");

        assert_eq!(max_freq_khz_at(&root.join("cpuinfo_max_freq")), Some(4_900_000));
        assert_eq!(max_freq_khz_at(&root.join("zero_freq")), None);
        assert_eq!(max_freq_khz_at(&root.join("missing")), None);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn reads_block_devices_from_tree() {
        let root = scratch_dir("block");
        write(root.join("sda/size"), "976773168\n");
        write(root.join("sda/queue/rotational"), "1\n");
        write(root.join("sda/device/model"), "WDC WD5000AAKX\n");
        write(root.join("nvme0n1/size"), "2000409264\n");
        write(root.join("nvme0n1/queue/rotational"), "0\n");
        write(root.join("loop0/size"), "1024\n");
        write(root.join("sdb/size"), "0\n");

        let devices = block_devices_in(&root);
        assert_eq!(
            devices,
            vec![
                DiskDevice {
                    name: "WDC WD5000AAKX".into(),
                    size: 976_773_168 * 512,
                    kind: "HD".into(),
                },
                DiskDevice {
                    name: "nvme0n1".into(),
                    size: 2_000_409_264 * 512,
                    kind: "NVMe".into(),
                },
            ]
        );
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn reads_graphics_cards_from_tree() {
        let root = scratch_dir("drm");
        write(root.join("card0/device/vendor"), "0x8086\n");
        write(root.join("card0/device/device"), "0x9a49\n");
        write(root.join("card1/device/product_name"), "Radeon RX 6600\n");
        write(root.join("card1/device/mem_info_vram_total"), "8589934592\n");
        write(root.join("card1/device/mem_info_vram_used"), "1073741824\n");
        write(root.join("card1-DP-1/status"), "connected\n");

        let cards = graphics_controllers_in(&root);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].model, "Intel [0x9a49]");
        assert_eq!(cards[0].vram_mb, 0);
        assert_eq!(cards[0].memory_used_mb, None);
        assert_eq!(cards[1].model, "Radeon RX 6600");
        assert_eq!(cards[1].vram_mb, 8192);
        assert_eq!(cards[1].memory_used_mb, Some(1024));
        assert_eq!(cards[1].memory_free_mb, Some(7168));
        let _ = fs::remove_dir_all(&root);
    }
}
