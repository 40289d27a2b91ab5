// Maps a locator to the language tag used on a fenced code block.
use crate::fs_access::{FileSystem, LocalFileSystem};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Tag meaning "no language"; rendered as an empty fence tag.
pub const PLAIN_TEXT: &str = "plaintext";

pub trait ContentClassifier: Send + Sync {
    fn classify(&self, locator: &str) -> String;
}

static EXTENSION_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("rs", "rust"),
        ("ts", "typescript"),
        ("mts", "typescript"),
        ("cts", "typescript"),
        ("tsx", "typescriptreact"),
        ("js", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("jsx", "javascriptreact"),
        ("py", "python"),
        ("rb", "ruby"),
        ("go", "go"),
        ("java", "java"),
        ("kt", "kotlin"),
        ("swift", "swift"),
        ("c", "c"),
        ("h", "c"),
        ("cc", "cpp"),
        ("cpp", "cpp"),
        ("cxx", "cpp"),
        ("hpp", "cpp"),
        ("cs", "csharp"),
        ("php", "php"),
        ("lua", "lua"),
        ("sh", "shellscript"),
        ("bash", "shellscript"),
        ("zsh", "shellscript"),
        ("ps1", "powershell"),
        ("sql", "sql"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("less", "less"),
        ("vue", "vue"),
        ("json", "json"),
        ("jsonc", "jsonc"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("toml", "toml"),
        ("xml", "xml"),
        ("md", "markdown"),
        ("markdown", "markdown"),
        ("ini", "ini"),
        ("txt", PLAIN_TEXT),
    ]
    .into_iter()
    .collect()
});

fn language_for_filename(name: &str) -> Option<&'static str> {
    match name {
        "Dockerfile" => Some("dockerfile"),
        "Makefile" | "makefile" | "GNUmakefile" => Some("makefile"),
        "Rakefile" | "Gemfile" => Some("ruby"),
        "CMakeLists.txt" => Some("cmake"),
        ".gitignore" | ".dockerignore" => Some("ignore"),
        _ => None,
    }
}

/// Classifies by well-known file name, then by lower-cased extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl ExtensionClassifier {
    pub fn classify_name(&self, name: &str) -> String {
        if let Some(language) = language_for_filename(name) {
            return language.to_string();
        }
        let extension = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
            _ => return PLAIN_TEXT.to_string(),
        };
        EXTENSION_LANGUAGES
            .get(extension.as_str())
            .copied()
            .unwrap_or(PLAIN_TEXT)
            .to_string()
    }
}

impl ContentClassifier for ExtensionClassifier {
    fn classify(&self, locator: &str) -> String {
        let name = LocalFileSystem::new().basename(locator);
        self.classify_name(&name)
    }
}

/// Fence tag for a classification; the plain-text sentinel becomes empty.
pub fn fence_tag(language: &str) -> &str {
    if language == PLAIN_TEXT { "" } else { language }
}
