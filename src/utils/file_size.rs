pub struct FileSizeUtils;

impl FileSizeUtils {
    const UNITS: [&'static str; 5] = ["B", "KB", "MB", "GB", "TB"];

    pub fn format_size(bytes: u64) -> String {
        let mut size = bytes as f64;
        let mut unit = 0;

        while size >= 1024.0 && unit < Self::UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }

        match unit {
            0 => format!("{} B", bytes),
            _ => format!("{:.2} {}", size, Self::UNITS[unit]),
        }
    }
}
