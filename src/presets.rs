/*!
 * Named filter rule-sets
 */

use crate::types::{FilterConfig, PresetType, DEFAULT_MAX_FILE_SIZE, INCLUDE_ALL};

/// A named rule-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub kind: PresetType,
    pub name: &'static str,
    pub description: &'static str,
    pub include_extensions: &'static [&'static str],
    pub exclude_patterns: &'static [&'static str],
    pub max_file_size: u64,
}

static PYTHON: Preset = Preset {
    kind: PresetType::Python,
    name: "Python project",
    description: "Python sources plus packaging and config files",
    include_extensions: &[
        ".py", ".pyx", ".pyi", ".pyw", ".txt", ".md", ".rst", ".yaml", ".yml", ".toml", ".ini",
        ".cfg", ".json", ".env", "requirements.txt", "Pipfile", "setup.py", "setup.cfg",
        "pyproject.toml", "Dockerfile", "Makefile",
    ],
    exclude_patterns: &[
        "__pycache__", "*.pyc", ".pytest_cache", ".coverage", "htmlcov", ".tox", "*.egg-info",
        "dist/", "build/", ".mypy_cache", ".ruff_cache",
    ],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static JAVASCRIPT: Preset = Preset {
    kind: PresetType::Javascript,
    name: "JavaScript project",
    description: "JavaScript and Node.js projects",
    include_extensions: &[
        ".js", ".jsx", ".mjs", ".cjs", ".json", ".md", ".txt", ".env", ".env.local",
        "package.json", "package-lock.json", "yarn.lock", ".babelrc", "webpack.config.js",
        "rollup.config.js", ".eslintrc", ".prettierrc", "Dockerfile", "docker-compose.yml",
    ],
    exclude_patterns: &[
        "node_modules/", "dist/", "build/", "coverage/", ".cache/", "*.min.js", "*.bundle.js",
        ".next/", "out/",
    ],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static TYPESCRIPT: Preset = Preset {
    kind: PresetType::Typescript,
    name: "TypeScript project",
    description: "TypeScript projects",
    include_extensions: &[
        ".ts", ".tsx", ".d.ts", ".js", ".jsx", ".mjs", ".cjs", ".json", ".md", ".txt", ".env",
        ".env.local", "package.json", "tsconfig.json", "jest.config.js", ".eslintrc",
        ".prettierrc", "Dockerfile", "docker-compose.yml",
    ],
    exclude_patterns: &[
        "node_modules/", "dist/", "build/", "coverage/", ".cache/", "*.min.js", "*.bundle.js",
        "*.js.map", ".next/", "out/",
    ],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static JAVA: Preset = Preset {
    kind: PresetType::Java,
    name: "Java project",
    description: "Java, Kotlin and Spring projects",
    include_extensions: &[
        ".java", ".kt", ".scala", ".groovy", ".xml", ".properties", ".yml", ".yaml", ".gradle",
        ".gradle.kts", "pom.xml", "build.gradle", "settings.gradle", "Dockerfile",
        "docker-compose.yml", ".md", ".txt",
    ],
    exclude_patterns: &[
        "target/", "build/", "out/", ".gradle/", ".idea/", "*.class", "*.jar", "*.war",
    ],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static GO: Preset = Preset {
    kind: PresetType::Go,
    name: "Go project",
    description: "Go modules",
    include_extensions: &[
        ".go", ".mod", ".sum", ".yaml", ".yml", ".toml", ".json", ".md", ".txt", "Dockerfile",
        "docker-compose.yml", "Makefile",
    ],
    exclude_patterns: &["vendor/", "bin/", "dist/", "*.exe", "*.so", "*.dylib", "*.dll"],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static WEB: Preset = Preset {
    kind: PresetType::Web,
    name: "Web front-end",
    description: "HTML, CSS and JavaScript front-ends",
    include_extensions: &[
        ".html", ".htm", ".xhtml", ".css", ".scss", ".sass", ".less", ".styl", ".js", ".jsx",
        ".ts", ".tsx", ".vue", ".svelte", ".json", ".xml", ".svg", ".md", ".txt",
        "package.json", ".babelrc", "webpack.config.js", ".env", ".env.local",
    ],
    exclude_patterns: &[
        "node_modules/", "dist/", "build/", ".cache/", "*.min.js", "*.min.css", "*.bundle.js",
        "coverage/",
    ],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

static ALL: Preset = Preset {
    kind: PresetType::All,
    name: "All files",
    description: "Every file type (use with care)",
    include_extensions: &[INCLUDE_ALL],
    exclude_patterns: &[
        ".git/", "node_modules/", ".venv/", "venv/", "__pycache__/", "dist/", "build/",
        "target/", "*.exe", "*.dll", "*.so", "*.dylib", "*.zip", "*.tar", "*.gz", "*.rar",
        "*.7z", "*.mp4", "*.mp3", "*.avi", "*.mov", "*.jpg", "*.jpeg", "*.png", "*.gif",
        "*.bmp", "*.ico", "*.pdf", "*.doc", "*.docx", "*.xls", "*.xlsx", "*.ppt", "*.pptx",
    ],
    max_file_size: 1024 * 1024,
};

static CUSTOM: Preset = Preset {
    kind: PresetType::Custom,
    name: "Custom",
    description: "Hand-edited filter rules",
    include_extensions: &[],
    exclude_patterns: &[],
    max_file_size: DEFAULT_MAX_FILE_SIZE,
};

/// Look up the rule-set for a preset
pub fn preset(kind: PresetType) -> &'static Preset {
    match kind {
        PresetType::Python => &PYTHON,
        PresetType::Javascript => &JAVASCRIPT,
        PresetType::Typescript => &TYPESCRIPT,
        PresetType::Java => &JAVA,
        PresetType::Go => &GO,
        PresetType::Web => &WEB,
        PresetType::All => &ALL,
        PresetType::Custom => &CUSTOM,
    }
}

impl Preset {
    /// Filter configuration tagged with this preset
    pub fn to_config(&self) -> FilterConfig {
        FilterConfig {
            max_file_size: self.max_file_size,
            include_extensions: self.include_extensions.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: self.exclude_patterns.iter().map(|s| s.to_string()).collect(),
            preset: self.kind,
        }
    }
}

impl FilterConfig {
    /// Rules of a named preset
    pub fn from_preset(kind: PresetType) -> Self {
        preset(kind).to_config()
    }
}

impl From<PresetType> for FilterConfig {
    fn from(kind: PresetType) -> Self {
        Self::from_preset(kind)
    }
}
