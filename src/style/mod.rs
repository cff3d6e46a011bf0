pub mod resolver;
pub mod scheme;

pub use resolver::{ensure_coverage, resolve_styles, GroupStyle, StyleMap};
pub use scheme::{scheme_by_name, ColorScheme, Rgb, SCHEMES};
