use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub line_color: String,
    pub card_fill: String,
    pub card_border: String,
    pub text_color: String,
    pub subtitle_color: String,
    pub root_border_color: String,
    pub placeholder_fill: String,
    pub placeholder_border: String,
    pub placeholder_text_color: String,
    pub male_color: String,
    pub female_color: String,
    pub relation_label_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            line_color: "#333333".to_string(),
            card_fill: "#FFFFFF".to_string(),
            card_border: "#9370DB".to_string(),
            text_color: "#333333".to_string(),
            subtitle_color: "#555555".to_string(),
            root_border_color: "#B8860B".to_string(),
            placeholder_fill: "#ECECFF".to_string(),
            placeholder_border: "#9370DB".to_string(),
            placeholder_text_color: "#333333".to_string(),
            male_color: "#7EA6E0".to_string(),
            female_color: "#E08AAE".to_string(),
            relation_label_color: "#6B4E9B".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            line_color: "#7A8AA6".to_string(),
            card_fill: "#F8FAFF".to_string(),
            card_border: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            subtitle_color: "#5B6676".to_string(),
            root_border_color: "#E0A43C".to_string(),
            placeholder_fill: "#EEF2F8".to_string(),
            placeholder_border: "#C7D2E5".to_string(),
            placeholder_text_color: "#1C2430".to_string(),
            male_color: "#6C9BD2".to_string(),
            female_color: "#D286A8".to_string(),
            relation_label_color: "#5B6DB8".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
