/// An RGB triple as stored in the palette registry
pub type Rgb = [u8; 3];

/// A named palette of colors keyed by semantic role.
///
/// `group0`/`group1` are the replay point colors; `aoi` and `highlight`
/// are reserved for the area-of-interest and selection overlays drawn by
/// the host UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub group0: Rgb,
    pub group1: Rgb,
    pub aoi: Rgb,
    pub highlight: Rgb,
}

/// The fixed registry of selectable palettes
pub const SCHEMES: &[ColorScheme] = &[
    ColorScheme {
        name: "classic",
        group0: [66, 133, 244],
        group1: [219, 68, 55],
        aoi: [244, 180, 0],
        highlight: [15, 157, 88],
    },
    ColorScheme {
        name: "high-contrast",
        group0: [0, 255, 255],
        group1: [255, 0, 255],
        aoi: [255, 255, 0],
        highlight: [255, 255, 255],
    },
    ColorScheme {
        name: "grayscale",
        group0: [230, 230, 230],
        group1: [128, 128, 128],
        aoi: [190, 190, 190],
        highlight: [255, 255, 255],
    },
];

/// Look up a palette by its registered name
pub fn scheme_by_name(name: &str) -> Option<&'static ColorScheme> {
    SCHEMES.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_lookup() {
        assert_eq!(scheme_by_name("classic").unwrap().name, "classic");
        assert!(scheme_by_name("does-not-exist").is_none());
    }
}
