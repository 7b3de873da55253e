/*!
 * Fence language detection for bundle content blocks
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Languages for well-known file names, keyed by lower-cased name
static SPECIAL_FILES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("package.json", "json"),
        ("tsconfig.json", "json"),
        ("dockerfile", "dockerfile"),
        ("docker-compose.yml", "yaml"),
        ("docker-compose.yaml", "yaml"),
        ("makefile", "makefile"),
        (".gitignore", "gitignore"),
        (".env", "dotenv"),
        ("readme.md", "markdown"),
    ])
});

/// Languages keyed by lower-cased extension without the dot
static EXTENSIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Programming languages
        ("py", "python"),
        ("js", "javascript"),
        ("jsx", "jsx"),
        ("ts", "typescript"),
        ("tsx", "tsx"),
        ("java", "java"),
        ("kt", "kotlin"),
        ("scala", "scala"),
        ("go", "go"),
        ("rs", "rust"),
        ("c", "c"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("h", "c"),
        ("hpp", "cpp"),
        ("cs", "csharp"),
        ("php", "php"),
        ("rb", "ruby"),
        ("swift", "swift"),
        ("r", "r"),
        ("m", "matlab"),
        ("lua", "lua"),
        ("pl", "perl"),
        // Markup
        ("html", "html"),
        ("htm", "html"),
        ("xml", "xml"),
        ("vue", "vue"),
        ("svelte", "svelte"),
        // Styles
        ("css", "css"),
        ("scss", "scss"),
        ("sass", "sass"),
        ("less", "less"),
        ("styl", "stylus"),
        // Config
        ("json", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("toml", "toml"),
        ("ini", "ini"),
        ("conf", "conf"),
        ("cfg", "cfg"),
        // Shell
        ("sh", "bash"),
        ("bash", "bash"),
        ("zsh", "bash"),
        ("fish", "fish"),
        ("ps1", "powershell"),
        ("bat", "batch"),
        ("cmd", "batch"),
        // Data
        ("sql", "sql"),
        ("csv", "csv"),
        // Docs
        ("md", "markdown"),
        ("rst", "rst"),
        ("tex", "latex"),
    ])
});

/// Best-effort fence language for a path, empty when unknown
pub fn detect_language(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();

    if let Some(language) = SPECIAL_FILES.get(name.as_str()) {
        return *language;
    }

    name.rsplit_once('.')
        .and_then(|(_, ext)| EXTENSIONS.get(ext))
        .copied()
        .unwrap_or("")
}
