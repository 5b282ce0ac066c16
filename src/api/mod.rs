#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod probe;
pub mod sysfs;
pub mod sysinfo_probe;
