//! One-line CPU / RAM / disk summary for prompt embedding.

use std::path::Path;
use std::time::Duration;

use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemSnapshot {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: Option<f32>,
}

impl SystemSnapshot {
    /// Sample the host.  Blocks for one CPU sampling interval.
    pub fn collect(home: Option<&Path>) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL.max(Duration::from_millis(100)));
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu_percent = sys.global_cpu_info().cpu_usage();
        let memory_percent = percent(sys.used_memory(), sys.total_memory()).unwrap_or(0.0);

        let disks = Disks::new_with_refreshed_list();
        let disk_percent = home.and_then(|home| {
            disks
                .list()
                .iter()
                .filter(|disk| home.starts_with(disk.mount_point()))
                .max_by_key(|disk| disk.mount_point().components().count())
                .and_then(|disk| {
                    let used = disk.total_space().saturating_sub(disk.available_space());
                    percent(used, disk.total_space())
                })
        });

        Self {
            cpu_percent,
            memory_percent,
            disk_percent,
        }
    }

    pub fn render(&self) -> String {
        let mut parts = vec![format_cpu(self.cpu_percent), format_memory(self.memory_percent)];
        if let Some(disk) = self.disk_percent {
            parts.push(format_disk(disk));
        }
        parts.join(" | ")
    }
}

pub fn format_cpu(percent: f32) -> String {
    let icon = if percent > 80.0 {
        "🔥"
    } else if percent > 50.0 {
        "⚡"
    } else {
        "💻"
    };
    format!("{icon} CPU: {percent:.1}%")
}

pub fn format_memory(percent: f32) -> String {
    let icon = if percent > 80.0 {
        "🔴"
    } else if percent > 50.0 {
        "🟡"
    } else {
        "🟢"
    };
    format!("{icon} RAM: {percent:.1}%")
}

pub fn format_disk(percent: f32) -> String {
    format!("💾 Disk: {percent:.1}%")
}

fn percent(part: u64, whole: u64) -> Option<f32> {
    (whole > 0).then(|| (part as f64 / whole as f64 * 100.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_icon_thresholds() {
        assert_eq!(format_cpu(12.34), "💻 CPU: 12.3%");
        assert_eq!(format_cpu(50.0), "💻 CPU: 50.0%");
        assert_eq!(format_cpu(65.0), "⚡ CPU: 65.0%");
        assert_eq!(format_cpu(95.5), "🔥 CPU: 95.5%");
    }

    #[test]
    fn memory_icon_thresholds() {
        assert_eq!(format_memory(10.0), "🟢 RAM: 10.0%");
        assert_eq!(format_memory(51.0), "🟡 RAM: 51.0%");
        assert_eq!(format_memory(81.0), "🔴 RAM: 81.0%");
    }

    #[test]
    fn render_omits_unknown_disk() {
        let snapshot = SystemSnapshot {
            cpu_percent: 1.0,
            memory_percent: 2.0,
            disk_percent: None,
        };
        assert_eq!(snapshot.render(), "💻 CPU: 1.0% | 🟢 RAM: 2.0%");

        let with_disk = SystemSnapshot {
            disk_percent: Some(70.4),
            ..snapshot
        };
        assert_eq!(
            with_disk.render(),
            "💻 CPU: 1.0% | 🟢 RAM: 2.0% | 💾 Disk: 70.4%"
        );
    }

    #[test]
    fn percent_of_zero_total_is_none() {
        assert_eq!(percent(5, 0), None);
        assert_eq!(percent(1, 4), Some(25.0));
    }

    #[test]
    fn collect_reports_sane_ranges() {
        let snapshot = SystemSnapshot::collect(None);
        assert!(snapshot.cpu_percent >= 0.0);
        assert!((0.0..=100.0).contains(&snapshot.memory_percent));
        assert_eq!(snapshot.disk_percent, None);
    }
}
