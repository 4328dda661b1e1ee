use render::{ColorError, Rgba};
use serde::Deserialize;

/// Colors and stroke behavior of extruded buildings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BuildingStyle {
    pub stroke_roofs: bool,
    pub wall_color: Rgba,
    pub roof_color: Rgba,
    pub stroke_color: Rgba,
}

impl Default for BuildingStyle {
    fn default() -> Self {
        Self {
            stroke_roofs: false,
            wall_color: Rgba::rgb(200, 190, 180),
            roof_color: Rgba::rgb(250, 240, 230),
            stroke_color: Rgba::rgb(145, 140, 135),
        }
    }
}

/// Partial style update; absent keys keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub stroke_roofs: Option<bool>,
    pub wall_color: Option<String>,
    pub roof_color: Option<String>,
    pub stroke_color: Option<String>,
}

#[derive(Debug)]
pub enum StyleError {
    Parse(serde_json::Error),
    Color {
        option: &'static str,
        source: ColorError,
    },
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::Parse(e) => write!(f, "style options parse error: {e}"),
            StyleError::Color { option, source } => write!(f, "{option}: {source}"),
        }
    }
}

impl std::error::Error for StyleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StyleError::Parse(e) => Some(e),
            StyleError::Color { source, .. } => Some(source),
        }
    }
}

impl StyleOptions {
    pub fn from_json_str(payload: &str) -> Result<Self, StyleError> {
        serde_json::from_str(payload).map_err(StyleError::Parse)
    }
}

/// Colors for one frame, alpha already scaled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameColors {
    pub wall: Rgba,
    pub roof: Rgba,
    pub stroke: Rgba,
}

impl BuildingStyle {
    /// Applies `options` all-or-nothing: if any color fails to parse, the style is unchanged.
    pub fn apply(&mut self, options: &StyleOptions) -> Result<(), StyleError> {
        let wall = parse_option("wallColor", options.wall_color.as_deref())?;
        let roof = parse_option("roofColor", options.roof_color.as_deref())?;
        let stroke = parse_option("strokeColor", options.stroke_color.as_deref())?;

        if let Some(stroke_roofs) = options.stroke_roofs {
            self.stroke_roofs = stroke_roofs;
        }
        self.wall_color = wall.unwrap_or(self.wall_color);
        self.roof_color = roof.unwrap_or(self.roof_color);
        self.stroke_color = stroke.unwrap_or(self.stroke_color);
        Ok(())
    }

    pub fn frame_colors(&self, alpha: f32) -> FrameColors {
        FrameColors {
            wall: self.wall_color.scale_alpha(alpha),
            roof: self.roof_color.scale_alpha(alpha),
            stroke: self.stroke_color.scale_alpha(alpha),
        }
    }
}

fn parse_option(option: &'static str, value: Option<&str>) -> Result<Option<Rgba>, StyleError> {
    match value {
        Some(raw) if !raw.is_empty() => Rgba::parse(raw)
            .map(Some)
            .map_err(|source| StyleError::Color { option, source }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildingStyle, StyleError, StyleOptions};
    use render::Rgba;

    #[test]
    fn merges_only_present_keys() {
        let mut style = BuildingStyle::default();
        let opts = StyleOptions::from_json_str(r#"{"strokeRoofs": true, "wallColor": "rgb(190,170,150)"}"#)
            .expect("options");
        style.apply(&opts).expect("apply");
        assert!(style.stroke_roofs);
        assert_eq!(style.wall_color, Rgba::rgb(190, 170, 150));
        assert_eq!(style.roof_color, BuildingStyle::default().roof_color);
    }

    #[test]
    fn bad_color_leaves_style_untouched() {
        let mut style = BuildingStyle::default();
        let opts = StyleOptions {
            stroke_roofs: Some(true),
            wall_color: Some("rgb(1,2,3)".to_string()),
            roof_color: Some("hotpink".to_string()),
            stroke_color: None,
        };
        let err = style.apply(&opts).unwrap_err();
        assert!(matches!(err, StyleError::Color { option: "roofColor", .. }));
        assert_eq!(style, BuildingStyle::default());
    }

    #[test]
    fn frame_colors_scale_existing_alpha() {
        let mut style = BuildingStyle::default();
        style.roof_color = Rgba::rgba(250, 240, 230, 0.5);
        let colors = style.frame_colors(0.5);
        assert_eq!(colors.wall.a, 0.5);
        assert_eq!(colors.roof.a, 0.25);
    }
}
