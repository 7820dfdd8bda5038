//! The closed set of on-disk serialization formats.

/// Serialization format for the backing file.
///
/// A closed, ordered set; there is no dynamic registration of custom formats.
/// Each variant has a canonical lowercase name which doubles as the file
/// extension when a path is derived from a logical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// YAML document via `serde_yaml`. Full fidelity for nested values.
    /// Also the fallback when an identifier carries an unknown format tag.
    #[default]
    Yaml,
    /// JSON document via `serde_json`, keys sorted on write. Full fidelity.
    Json,
    /// MessagePack blob via `rmp-serde`: a self-describing binary object
    /// encoding. Full fidelity.
    Binary,
    /// XML document with a synthetic `<root>` wrapping element. Values
    /// round-trip as text.
    Xml,
    /// Two-column CSV, one `(key, value)` row per entry. Values round-trip
    /// as text; nested values do not round-trip at all.
    Csv,
}

impl Format {
    /// All formats, in declaration order.
    pub const ALL: [Format; 5] = [
        Format::Yaml,
        Format::Json,
        Format::Binary,
        Format::Xml,
        Format::Csv,
    ];

    /// Canonical lowercase name, used both for dispatch and as the file
    /// extension of derived paths.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Binary => "binary",
            Format::Xml => "xml",
            Format::Csv => "csv",
        }
    }

    /// Resolve a format tag from an identifier token. `pickle` is accepted as
    /// an alias for [`Format::Binary`]. Unknown tags return `None`; the caller
    /// decides how to degrade (construction falls back to YAML with a logged
    /// warning rather than failing).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "pickle" | "binary" => Some(Format::Binary),
            "xml" => Some(Format::Xml),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
