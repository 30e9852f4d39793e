use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Base card size; width grows to fit the measured title up to
    /// `max_node_width`.
    pub node_width: f32,
    pub node_height: f32,
    pub max_node_width: f32,
    /// Side length of the square a collapsed member shrinks to.
    pub placeholder_size: f32,
    /// Horizontal gap between partners inside one couple unit.
    pub couple_gap: f32,
    /// Horizontal gap between sibling blocks under the same parents.
    pub sibling_gap: f32,
    /// Horizontal gap between unrelated top-level subtrees.
    pub subtree_gap: f32,
    /// Vertical gap between generation rows.
    pub generation_gap: f32,
    /// Pixel unit for the couple-edge stacking offsets.
    pub couple_edge_unit: f32,
    /// Horizontal stagger between sibling-group branches leaving one parent.
    pub family_edge_x_gap: f32,
    /// Vertical stagger between sibling rails at the same generation.
    pub family_edge_y_gap: f32,
    /// Height of the lowest sibling rail above the child row.
    pub family_edge_base_offset: f32,
    pub corner_radius: f32,
    pub label_line_height: f32,
    /// Margin around the whole diagram.
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 80.0,
            max_node_width: 260.0,
            placeholder_size: 24.0,
            couple_gap: 24.0,
            sibling_gap: 24.0,
            subtree_gap: 48.0,
            generation_gap: 100.0,
            couple_edge_unit: 10.0,
            family_edge_x_gap: 5.0,
            family_edge_y_gap: 12.0,
            family_edge_base_offset: 40.0,
            corner_radius: 5.0,
            label_line_height: 1.3,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    line_color: Option<String>,
    card_fill: Option<String>,
    card_border: Option<String>,
    text_color: Option<String>,
    subtitle_color: Option<String>,
    root_border_color: Option<String>,
    placeholder_fill: Option<String>,
    placeholder_border: Option<String>,
    male_color: Option<String>,
    female_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    max_node_width: Option<f32>,
    placeholder_size: Option<f32>,
    couple_gap: Option<f32>,
    sibling_gap: Option<f32>,
    subtree_gap: Option<f32>,
    generation_gap: Option<f32>,
    couple_edge_unit: Option<f32>,
    family_edge_x_gap: Option<f32>,
    family_edge_y_gap: Option<f32>,
    family_edge_base_offset: Option<f32>,
    corner_radius: Option<f32>,
    padding: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
}

/// Loads an optional config file (json5, so comments and trailing commas are
/// tolerated) and overlays it onto the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "classic" {
            config.theme = Theme::classic();
        } else if theme_name == "modern" {
            config.theme = Theme::modern();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.card_fill {
            config.theme.card_fill = v;
        }
        if let Some(v) = vars.card_border {
            config.theme.card_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.subtitle_color {
            config.theme.subtitle_color = v;
        }
        if let Some(v) = vars.root_border_color {
            config.theme.root_border_color = v;
        }
        if let Some(v) = vars.placeholder_fill {
            config.theme.placeholder_fill = v;
        }
        if let Some(v) = vars.placeholder_border {
            config.theme.placeholder_border = v;
        }
        if let Some(v) = vars.male_color {
            config.theme.male_color = v;
        }
        if let Some(v) = vars.female_color {
            config.theme.female_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.max_node_width {
            config.layout.max_node_width = v;
        }
        if let Some(v) = layout.placeholder_size {
            config.layout.placeholder_size = v;
        }
        if let Some(v) = layout.couple_gap {
            config.layout.couple_gap = v;
        }
        if let Some(v) = layout.sibling_gap {
            config.layout.sibling_gap = v;
        }
        if let Some(v) = layout.subtree_gap {
            config.layout.subtree_gap = v;
        }
        if let Some(v) = layout.generation_gap {
            config.layout.generation_gap = v;
        }
        if let Some(v) = layout.couple_edge_unit {
            config.layout.couple_edge_unit = v;
        }
        if let Some(v) = layout.family_edge_x_gap {
            config.layout.family_edge_x_gap = v;
        }
        if let Some(v) = layout.family_edge_y_gap {
            config.layout.family_edge_y_gap = v;
        }
        if let Some(v) = layout.family_edge_base_offset {
            config.layout.family_edge_base_offset = v;
        }
        if let Some(v) = layout.corner_radius {
            config.layout.corner_radius = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
    }

    if let Some(width) = parsed.width {
        config.render.width = width;
    }
    if let Some(height) = parsed.height {
        config.render.height = height;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_width, 160.0);
        assert_eq!(config.layout.couple_edge_unit, 10.0);
    }

    #[test]
    fn overlay_from_json5() {
        let dir = std::env::temp_dir().join("kintree-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json5");
        std::fs::write(
            &path,
            r##"{
                theme: "classic",
                // halve the card
                layout: { nodeWidth: 80, generationGap: 120 },
                themeVariables: { lineColor: "#123456" },
            }"##,
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout.node_width, 80.0);
        assert_eq!(config.layout.generation_gap, 120.0);
        assert_eq!(config.theme.line_color, "#123456");
        // untouched fields keep their defaults
        assert_eq!(config.layout.node_height, 80.0);
    }
}
