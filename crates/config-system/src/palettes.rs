//! Named color palettes
//!
//! Resolved from the `colorPalette` configuration property and applied
//! uniformly across all series by the option compiler. Unknown names fall
//! back to the default qualitative palette.

use once_cell::sync::Lazy;

pub const DEFAULT_PALETTE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [&'static str; 8],
}

static PALETTES: Lazy<Vec<Palette>> = Lazy::new(|| {
    vec![
        Palette {
            name: "default",
            colors: [
                "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272",
                "#fc8452", "#9a60b4",
            ],
        },
        Palette {
            name: "vibrant",
            colors: [
                "#ff3d67", "#ff8a00", "#ffd600", "#00c853", "#00b8d4", "#2979ff",
                "#7c4dff", "#f50057",
            ],
        },
        Palette {
            name: "pastel",
            colors: [
                "#a8dadc", "#f1faee", "#ffcad4", "#bde0fe", "#cdb4db", "#b7e4c7",
                "#ffe5b4", "#e2ece9",
            ],
        },
        Palette {
            name: "cool",
            colors: [
                "#0b3954", "#087e8b", "#3c6e71", "#5bc0be", "#1b4965", "#62b6cb",
                "#2e6f95", "#89c2d9",
            ],
        },
        Palette {
            name: "warm",
            colors: [
                "#9d0208", "#d00000", "#dc2f02", "#e85d04", "#f48c06", "#faa307",
                "#ffba08", "#ffd166",
            ],
        },
        Palette {
            name: "monochrome",
            colors: [
                "#111827", "#1f2937", "#374151", "#4b5563", "#6b7280", "#9ca3af",
                "#d1d5db", "#e5e7eb",
            ],
        },
        Palette {
            name: "earth",
            colors: [
                "#606c38", "#283618", "#dda15e", "#bc6c25", "#7f5539", "#a98467",
                "#936639", "#656d4a",
            ],
        },
    ]
});

/// Resolve a palette by name, defaulting to the standard qualitative set.
pub fn resolve(name: &str) -> &'static Palette {
    PALETTES
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| &PALETTES[0])
}

pub fn list_names() -> Vec<&'static str> {
    PALETTES.iter().map(|p| p.name).collect()
}

pub fn is_known(name: &str) -> bool {
    PALETTES.iter().any(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_six_palettes() {
        assert!(list_names().len() >= 6);
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve("vibrant").name, "vibrant");
        assert_eq!(resolve("no-such-palette").name, DEFAULT_PALETTE);
    }

    #[test]
    fn test_palette_names_unique() {
        let mut names = list_names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), list_names().len());
    }
}
