use serde::{Deserialize, Serialize};
use std::fmt;

/// Locale preference as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    /// Any tag starting with `zh` maps to Simplified Chinese, everything else to English.
    pub fn normalize(tag: &str) -> Locale {
        if tag.trim().to_lowercase().starts_with("zh") {
            Locale::ZhCn
        } else {
            Locale::En
        }
    }

    /// Resolves `Auto` against the given environment tag. Never returns `Auto`.
    pub fn resolve(self, env_tag: Option<&str>) -> Locale {
        match self {
            Locale::Auto => env_tag.map(Locale::normalize).unwrap_or(Locale::En),
            other => other,
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Locale::Auto),
            "en" => Ok(Locale::En),
            "zh-cn" | "zh" => Ok(Locale::ZhCn),
            other => Err(format!(
                "Unknown locale '{}'. Expected auto, en or zh-CN.",
                other
            )),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Locale::Auto => "auto",
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        };
        f.write_str(tag)
    }
}

/// User-facing text for warnings and notices, bound to one resolved locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Default for Messages {
    fn default() -> Self {
        Self { locale: Locale::En }
    }
}

impl Messages {
    /// `env_tag` is the host's locale tag, consulted only for `Auto`.
    pub fn new(locale: Locale, env_tag: Option<&str>) -> Self {
        Self {
            locale: locale.resolve(env_tag),
        }
    }

    pub fn english() -> Self {
        Self::default()
    }

    pub fn chinese() -> Self {
        Self {
            locale: Locale::ZhCn,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn zh(&self) -> bool {
        self.locale == Locale::ZhCn
    }

    pub fn max_files_reached(&self, max_files: usize) -> String {
        if self.zh() {
            format!("已达到最大文件数量（{}），仅插入部分文件。", max_files)
        } else {
            format!(
                "Reached max file count ({}); only part inserted.",
                max_files
            )
        }
    }

    pub fn max_total_bytes_reached(&self, max_total_bytes: u64) -> String {
        let label = format_bytes(max_total_bytes);
        if self.zh() {
            format!("已达到最大总大小（{}），仅插入部分文件。", label)
        } else {
            format!("Reached max total size ({}); only part inserted.", label)
        }
    }

    pub fn excluded_dirs_skipped(&self, count: usize) -> String {
        if self.zh() {
            format!("已忽略 {} 个排除目录。", count)
        } else {
            format!("Skipped {} excluded folders.", count)
        }
    }

    pub fn depth_dirs_skipped(&self, count: usize, max_depth: usize) -> String {
        if self.zh() {
            format!("已忽略 {} 个超过最大深度（{} 层）的目录。", count, max_depth)
        } else {
            format!("Skipped {} folders beyond max depth ({}).", count, max_depth)
        }
    }

    pub fn symlinks_skipped(&self, count: usize) -> String {
        if self.zh() {
            format!("已忽略 {} 个符号链接。", count)
        } else {
            format!("Skipped {} symlinks.", count)
        }
    }

    pub fn read_errors(&self, count: usize) -> String {
        if self.zh() {
            format!("有 {} 个条目读取失败。", count)
        } else {
            format!("Failed to read {} entries.", count)
        }
    }

    pub fn unsupported_file_type(&self, display_path: &str) -> String {
        if self.zh() {
            format!("{}: 不支持的文件类型", display_path)
        } else {
            format!("{}: unsupported file type", display_path)
        }
    }

    pub fn read_failed(&self, display_path: &str) -> String {
        if self.zh() {
            format!("{}: 读取失败", display_path)
        } else {
            format!("{}: read failed", display_path)
        }
    }

    pub fn nothing_selected(&self) -> String {
        if self.zh() {
            "未选择任何文件或文件夹。".to_string()
        } else {
            "No files or folders selected.".to_string()
        }
    }

    pub fn no_files_to_insert(&self) -> String {
        if self.zh() {
            "没有可插入的文件。".to_string()
        } else {
            "No files available to insert.".to_string()
        }
    }

    pub fn editor_empty(&self) -> String {
        if self.zh() {
            "编辑器内容为空。".to_string()
        } else {
            "Editor content is empty.".to_string()
        }
    }

    pub fn copy_failed(&self) -> String {
        if self.zh() {
            "复制失败。".to_string()
        } else {
            "Copy failed.".to_string()
        }
    }

    pub fn preview_failed(&self) -> String {
        if self.zh() {
            "无法读取预览。".to_string()
        } else {
            "Unable to read preview.".to_string()
        }
    }
}

/// `N B` below 1 KiB, whole `KB` below 1 MiB, one decimal `MB` above.
pub fn format_bytes(value: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if value >= MIB {
        format!("{:.1} MB", value as f64 / MIB as f64)
    } else if value >= KIB {
        format!("{} KB", (value as f64 / KIB as f64).round() as u64)
    } else {
        format!("{} B", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_labels() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "2 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(format_bytes(1024 * 1024 + 512 * 1024), "1.5 MB");
    }

    #[test]
    fn locale_tags_normalize() {
        assert_eq!(Locale::normalize("zh_CN.UTF-8"), Locale::ZhCn);
        assert_eq!(Locale::normalize("ZH-tw"), Locale::ZhCn);
        assert_eq!(Locale::normalize("en_US.UTF-8"), Locale::En);
        assert_eq!(Locale::normalize("fr"), Locale::En);
    }

    #[test]
    fn auto_resolves_from_env_tag() {
        assert_eq!(Locale::Auto.resolve(Some("zh_CN")), Locale::ZhCn);
        assert_eq!(Locale::Auto.resolve(None), Locale::En);
        assert_eq!(Locale::En.resolve(Some("zh_CN")), Locale::En);
    }

    #[test]
    fn messages_resolve_only_from_the_given_tag() {
        assert_eq!(Messages::new(Locale::Auto, None).locale(), Locale::En);
        assert_eq!(
            Messages::new(Locale::Auto, Some("zh_CN.UTF-8")).locale(),
            Locale::ZhCn
        );
        assert_eq!(Messages::new(Locale::En, Some("zh_CN")).locale(), Locale::En);
    }

    #[test]
    fn english_and_chinese_catalogues() {
        let en = Messages::english();
        assert_eq!(en.symlinks_skipped(3), "Skipped 3 symlinks.");
        assert_eq!(
            en.max_total_bytes_reached(2 * 1024 * 1024),
            "Reached max total size (2.0 MB); only part inserted."
        );
        assert_eq!(en.read_failed("src/a.rs"), "src/a.rs: read failed");

        let zh = Messages::chinese();
        assert_eq!(zh.symlinks_skipped(3), "已忽略 3 个符号链接。");
        assert_eq!(zh.unsupported_file_type("a.png"), "a.png: 不支持的文件类型");
    }

    #[test]
    fn locale_parses_from_cli_text() {
        assert_eq!("zh-CN".parse::<Locale>().unwrap(), Locale::ZhCn);
        assert_eq!("AUTO".parse::<Locale>().unwrap(), Locale::Auto);
        assert!("de".parse::<Locale>().is_err());
    }
}
