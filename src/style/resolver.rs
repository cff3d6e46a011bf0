use crate::core::{ReplayError, Viewer};
use crate::render::Color;
use crate::style::scheme::{ColorScheme, Rgb};
use std::collections::HashMap;

/// Resolved visual style for one viewer group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStyle {
    pub fill: Color,
    pub stroke: Color,
}

/// Group identifier -> resolved style, built once at scheme selection
pub type StyleMap = HashMap<String, GroupStyle>;

const FILL_ALPHA: f32 = 0.6;

fn style_from_rgb(rgb: Rgb) -> GroupStyle {
    let [r, g, b] = rgb.map(|c| c as f32 / 255.0);
    GroupStyle {
        fill: [r, g, b, FILL_ALPHA],
        stroke: [r, g, b, 1.0],
    }
}

/// Assign every group a style from the scheme.
///
/// Roles are assigned by the group's ordinal position in `groups`, modulo
/// the number of role slots: even-indexed groups get `group0`, odd-indexed
/// get `group1`. The assignment is order-dependent, not semantic;
/// reordering `viewer_groups` in a dataset changes which color a group
/// gets. This function is the single place that policy lives.
pub fn resolve_styles(groups: &[String], scheme: &ColorScheme) -> StyleMap {
    groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let rgb = if idx % 2 == 0 {
                scheme.group0
            } else {
                scheme.group1
            };
            (group.clone(), style_from_rgb(rgb))
        })
        .collect()
}

/// Verify every viewer's group resolved to a style.
///
/// Run at engine construction so the frame loop can treat lookups as
/// infallible.
pub fn ensure_coverage(viewers: &[Viewer], styles: &StyleMap) -> Result<(), ReplayError> {
    for viewer in viewers {
        if !styles.contains_key(&viewer.group) {
            return Err(ReplayError::UnknownGroup(viewer.group.clone()));
        }
    }
    Ok(())
}
