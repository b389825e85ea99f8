//! @ai:module:intent Define language-specific comment delimiters
//! @ai:module:layer domain
//! @ai:module:public_api Language, CommentStyle, detect_language
//! @ai:module:stateless true

use std::path::Path;

/// @ai:intent Represents a language whose comments may carry annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    TypeScript,
    JavaScript,
    Python,
    Go,
    Java,
    Kotlin,
    Swift,
    C,
    Cpp,
    CSharp,
    Scala,
    Dart,
    Php,
    Ruby,
    Shell,
    Lua,
    Sql,
    Haskell,
    Elixir,
    R,
    Yaml,
    Toml,
    Html,
    Css,
    Markdown,
}

/// @ai:intent Comment delimiters and string quotes registered for a language
/// @ai:invariant comment openers found inside a quoted string are not comments
#[derive(Debug, Clone, Copy)]
pub struct CommentStyle {
    pub line: &'static [&'static str],
    pub block: &'static [(&'static str, &'static str)],
    pub strings: &'static [&'static str],
}

const QUOTES: &[&str] = &["\"", "'"];
const DOUBLE_QUOTE: &[&str] = &["\""];
const WITH_BACKTICK: &[&str] = &["\"", "'", "`"];

const C_FAMILY: CommentStyle = CommentStyle {
    line: &["//"],
    block: &[("/*", "*/")],
    strings: QUOTES,
};

const HASH: CommentStyle = CommentStyle {
    line: &["#"],
    block: &[],
    strings: QUOTES,
};

const ALL_LANGUAGES: [Language; 26] = [
    Language::Rust,
    Language::TypeScript,
    Language::JavaScript,
    Language::Python,
    Language::Go,
    Language::Java,
    Language::Kotlin,
    Language::Swift,
    Language::C,
    Language::Cpp,
    Language::CSharp,
    Language::Scala,
    Language::Dart,
    Language::Php,
    Language::Ruby,
    Language::Shell,
    Language::Lua,
    Language::Sql,
    Language::Haskell,
    Language::Elixir,
    Language::R,
    Language::Yaml,
    Language::Toml,
    Language::Html,
    Language::Css,
    Language::Markdown,
];

impl Language {
    /// @ai:intent Get the comment delimiters for this language
    /// @ai:effects pure
    pub fn comment_style(&self) -> CommentStyle {
        match self {
            // lifetimes make ' ambiguous
            Language::Rust => CommentStyle {
                strings: DOUBLE_QUOTE,
                ..C_FAMILY
            },
            Language::TypeScript | Language::JavaScript | Language::Go => CommentStyle {
                strings: WITH_BACKTICK,
                ..C_FAMILY
            },
            Language::Java
            | Language::Kotlin
            | Language::Swift
            | Language::C
            | Language::Cpp
            | Language::CSharp
            | Language::Scala
            | Language::Dart => C_FAMILY,
            Language::Php => CommentStyle {
                line: &["//", "#"],
                block: &[("/*", "*/")],
                strings: QUOTES,
            },
            Language::Python => CommentStyle {
                line: &["#"],
                block: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
                strings: QUOTES,
            },
            Language::Ruby => CommentStyle {
                line: &["#"],
                block: &[("=begin", "=end")],
                strings: QUOTES,
            },
            Language::Shell | Language::Elixir | Language::R => HASH,
            Language::Yaml | Language::Toml => CommentStyle {
                strings: DOUBLE_QUOTE,
                ..HASH
            },
            Language::Lua => CommentStyle {
                line: &["--"],
                block: &[("--[[", "]]")],
                strings: QUOTES,
            },
            Language::Sql => CommentStyle {
                line: &["--"],
                block: &[("/*", "*/")],
                strings: QUOTES,
            },
            // primes are identifier characters
            Language::Haskell => CommentStyle {
                line: &["--"],
                block: &[("{-", "-}")],
                strings: DOUBLE_QUOTE,
            },
            Language::Html | Language::Markdown => CommentStyle {
                line: &[],
                block: &[("<!--", "-->")],
                strings: &[],
            },
            Language::Css => CommentStyle {
                line: &[],
                block: &[("/*", "*/")],
                strings: QUOTES,
            },
        }
    }

    /// @ai:intent Get file extensions for this language
    /// @ai:effects pure
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::Rust => &["rs"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Python => &["py", "pyi"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::Kotlin => &["kt", "kts"],
            Language::Swift => &["swift"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::CSharp => &["cs"],
            Language::Scala => &["scala", "sc"],
            Language::Dart => &["dart"],
            Language::Php => &["php"],
            Language::Ruby => &["rb"],
            Language::Shell => &["sh", "bash", "zsh"],
            Language::Lua => &["lua"],
            Language::Sql => &["sql"],
            Language::Haskell => &["hs"],
            Language::Elixir => &["ex", "exs"],
            Language::R => &["r", "R"],
            Language::Yaml => &["yaml", "yml"],
            Language::Toml => &["toml"],
            Language::Html => &["html", "htm", "vue", "svelte"],
            Language::Css => &["css", "scss", "less"],
            Language::Markdown => &["md", "markdown"],
        }
    }

    /// @ai:intent Editor language identifiers that map to this language
    /// @ai:effects pure
    pub fn language_ids(&self) -> &[&str] {
        match self {
            Language::Rust => &["rust"],
            Language::TypeScript => &["typescript", "typescriptreact"],
            Language::JavaScript => &["javascript", "javascriptreact"],
            Language::Python => &["python"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::Kotlin => &["kotlin"],
            Language::Swift => &["swift"],
            Language::C => &["c"],
            Language::Cpp => &["cpp"],
            Language::CSharp => &["csharp"],
            Language::Scala => &["scala"],
            Language::Dart => &["dart"],
            Language::Php => &["php"],
            Language::Ruby => &["ruby"],
            Language::Shell => &["shellscript"],
            Language::Lua => &["lua"],
            Language::Sql => &["sql"],
            Language::Haskell => &["haskell"],
            Language::Elixir => &["elixir"],
            Language::R => &["r"],
            Language::Yaml => &["yaml"],
            Language::Toml => &["toml"],
            Language::Html => &["html", "vue", "svelte"],
            Language::Css => &["css", "scss", "less"],
            Language::Markdown => &["markdown"],
        }
    }

    /// @ai:intent Primary editor language identifier
    /// @ai:effects pure
    pub fn id(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Swift => "swift",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Scala => "scala",
            Language::Dart => "dart",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Shell => "shellscript",
            Language::Lua => "lua",
            Language::Sql => "sql",
            Language::Haskell => "haskell",
            Language::Elixir => "elixir",
            Language::R => "r",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Html => "html",
            Language::Css => "css",
            Language::Markdown => "markdown",
        }
    }

    /// @ai:intent Resolve an editor language identifier
    /// @ai:example ("typescriptreact") -> Some(TypeScript)
    /// @ai:example ("json") -> None
    /// @ai:effects pure
    pub fn from_language_id(id: &str) -> Option<Language> {
        ALL_LANGUAGES
            .into_iter()
            .find(|lang| lang.language_ids().contains(&id))
    }

    pub fn all() -> &'static [Language] {
        &ALL_LANGUAGES
    }
}

/// @ai:intent Detect the language from a file path
/// @ai:example ("test.rs") -> Some(Rust)
/// @ai:example ("test.txt") -> None
/// @ai:effects pure
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;

    ALL_LANGUAGES
        .into_iter()
        .find(|lang| lang.extensions().contains(&ext))
}

/// @ai:intent Check if a file should be scanned for annotations based on extension
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    detect_language(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_rust() {
        assert_eq!(detect_language(Path::new("test.rs")), Some(Language::Rust));
    }

    #[test]
    fn test_detect_python() {
        assert_eq!(
            detect_language(Path::new("test.py")),
            Some(Language::Python)
        );
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(detect_language(Path::new("test.txt")), None);
        assert_eq!(detect_language(Path::new("acp.config.json")), None);
    }

    #[test]
    fn test_language_ids() {
        assert_eq!(
            Language::from_language_id("typescriptreact"),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_language_id("json"), None);
        for lang in Language::all() {
            assert_eq!(Language::from_language_id(lang.id()), Some(*lang));
        }
    }

    #[test]
    fn test_every_language_has_a_delimiter() {
        for lang in Language::all() {
            let style = lang.comment_style();
            assert!(!style.line.is_empty() || !style.block.is_empty(), "{:?}", lang);
        }
    }

    #[test]
    fn test_quotes_never_open_comments() {
        for lang in Language::all() {
            let style = lang.comment_style();
            for quote in style.strings {
                assert!(!style.line.contains(quote), "{:?}", lang);
                assert!(!style.block.iter().any(|(open, _)| open == quote), "{:?}", lang);
            }
        }
    }
}
