use super::FieldError;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Placeholder substituted with a per-particle opacity.
///
pub const OPACITY_SLOT: &str = "%opacity%";

/// Pale green used when no template is configured.
///
pub const DEFAULT_TEMPLATE: &str = "rgba(134, 239, 172, %opacity%)";

const RGBA_PATTERN: &str =
    r"^\s*rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*%opacity%\s*\)\s*$";
const HSLA_PATTERN: &str = r"^\s*hsla\(\s*(\d+(?:\.\d+)?)(?:deg)?\s*,\s*(\d+(?:\.\d+)?)%\s*,\s*(\d+(?:\.\d+)?)%\s*,\s*%opacity%\s*\)\s*$";

/// Straight (non-premultiplied) color with a fractional alpha.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Return the same color with its alpha scaled by `factor`.
    ///
    pub fn fade(self, factor: f32) -> Self {
        Rgba::new(self.r, self.g, self.b, self.a * factor)
    }
}

/// Color expression with a single substitutable opacity slot, e.g.
/// `rgba(134, 239, 172, %opacity%)`.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTemplate {
    source: String,
    r: u8,
    g: u8,
    b: u8,
}

impl ColorTemplate {
    /// Parse and validate a template string.
    ///
    pub fn parse(template: &str) -> Result<Self, FieldError> {
        let found = template.matches(OPACITY_SLOT).count();
        if found != 1 {
            return Err(FieldError::OpacitySlot {
                template: template.to_string(),
                found,
            });
        }

        let [r, g, b] = match parse_rgba(template)? {
            Some(channels) => channels,
            None => parse_hsla(template)?
                .ok_or_else(|| FieldError::InvalidTemplate(template.to_string()))?,
        };

        Ok(ColorTemplate {
            source: template.trim().to_string(),
            r,
            g,
            b,
        })
    }

    /// Return the concrete color for the given opacity.
    ///
    pub fn with_opacity(&self, opacity: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, opacity)
    }

    /// Return the template text with the slot replaced by `opacity`.
    ///
    pub fn render(&self, opacity: f32) -> String {
        self.source.replace(OPACITY_SLOT, &opacity.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn captures<'t>(pattern: &str, template: &'t str) -> Result<Option<Vec<&'t str>>, FieldError> {
    let re = Regex::new(pattern).map_err(|_| FieldError::InvalidTemplate(template.to_string()))?;
    Ok(re.captures(template).map(|caps| {
        caps.iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str()).unwrap_or_default())
            .collect()
    }))
}

fn out_of_range(template: &str, channel: &str) -> FieldError {
    FieldError::ChannelOutOfRange {
        template: template.to_string(),
        channel: channel.to_string(),
    }
}

/// `rgba(R, G, B, %opacity%)` with 0..=255 channels.
///
fn parse_rgba(template: &str) -> Result<Option<[u8; 3]>, FieldError> {
    let Some(parts) = captures(RGBA_PATTERN, template)? else {
        return Ok(None);
    };
    let mut channels = [0u8; 3];
    for (channel, text) in channels.iter_mut().zip(parts) {
        *channel = text.parse::<u8>().map_err(|_| out_of_range(template, text))?;
    }
    Ok(Some(channels))
}

/// `hsla(H, S%, L%, %opacity%)`, converted to RGB. Hue wraps at 360 degrees.
///
fn parse_hsla(template: &str) -> Result<Option<[u8; 3]>, FieldError> {
    let Some(parts) = captures(HSLA_PATTERN, template)? else {
        return Ok(None);
    };
    let mut values = [0f64; 3];
    for (i, (value, text)) in values.iter_mut().zip(&parts).enumerate() {
        *value = text.parse::<f64>().map_err(|_| out_of_range(template, text))?;
        if i > 0 && *value > 100.0 {
            return Err(out_of_range(template, &format!("{}%", text)));
        }
    }
    Ok(Some(hsl_to_rgb(values[0], values[1] / 100.0, values[2] / 100.0)))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_u8 = |c: f64| ((c + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

impl Default for ColorTemplate {
    fn default() -> Self {
        ColorTemplate {
            source: DEFAULT_TEMPLATE.to_string(),
            r: 134,
            g: 239,
            b: 172,
        }
    }
}

impl fmt::Display for ColorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_template() {
        let template = ColorTemplate::parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(template, ColorTemplate::default());
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let template = ColorTemplate::parse("  rgba(1,2 , 3,%opacity% ) ").unwrap();
        assert_eq!(template.with_opacity(0.25), Rgba::new(1, 2, 3, 0.25));
    }

    #[test]
    fn parse_rejects_missing_slot() {
        let err = ColorTemplate::parse("rgba(1, 2, 3, 0.5)").unwrap_err();
        assert!(matches!(err, FieldError::OpacitySlot { found: 0, .. }));
    }

    #[test]
    fn parse_rejects_duplicate_slot() {
        let err = ColorTemplate::parse("rgba(1, 2, %opacity%, %opacity%)").unwrap_err();
        assert!(matches!(err, FieldError::OpacitySlot { found: 2, .. }));
    }

    #[test]
    fn parse_rejects_out_of_range_channel() {
        let err = ColorTemplate::parse("rgba(256, 2, 3, %opacity%)").unwrap_err();
        assert!(matches!(err, FieldError::ChannelOutOfRange { .. }));
    }

    #[test]
    fn parse_hsla_converts_to_rgb() {
        let green = ColorTemplate::parse("hsla(120, 100%, 50%, %opacity%)").unwrap();
        assert_eq!(green.with_opacity(0.3), Rgba::new(0, 255, 0, 0.3));

        let grey = ColorTemplate::parse("hsla(0deg, 0%, 50%, %opacity%)").unwrap();
        assert_eq!(grey.with_opacity(1.0), Rgba::new(128, 128, 128, 1.0));

        let wrapped = ColorTemplate::parse("hsla(480, 100%, 50%, %opacity%)").unwrap();
        assert_eq!(wrapped.with_opacity(1.0), green.with_opacity(1.0));
        assert_eq!(wrapped.render(0.5), "hsla(480, 100%, 50%, 0.5)");
    }

    #[test]
    fn parse_rejects_out_of_range_percentage() {
        let err = ColorTemplate::parse("hsla(120, 150%, 50%, %opacity%)").unwrap_err();
        assert!(matches!(err, FieldError::ChannelOutOfRange { .. }));
    }

    #[test]
    fn parse_rejects_unknown_color_functions() {
        let err = ColorTemplate::parse("hwb(120 10% 10% / %opacity%)").unwrap_err();
        assert!(matches!(err, FieldError::InvalidTemplate(_)));
    }

    #[test]
    fn render_substitutes_opacity() {
        let template = ColorTemplate::default();
        assert_eq!(template.render(0.5), "rgba(134, 239, 172, 0.5)");
    }

    #[test]
    fn rgba_alpha_is_clamped() {
        assert_eq!(Rgba::new(0, 0, 0, 1.5).a, 1.0);
        assert_eq!(Rgba::new(0, 0, 0, 0.4).fade(0.5).a, 0.2);
    }
}
