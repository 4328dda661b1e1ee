/// Straight (non-premultiplied) color with fractional alpha.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    Syntax(String),
    Component { input: String, component: &'static str },
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::Syntax(input) => {
                write!(f, "expected rgb(r,g,b) or rgba(r,g,b,a), got {input:?}")
            }
            ColorError::Component { input, component } => {
                write!(f, "invalid {component} component in {input:?}")
            }
        }
    }
}

impl std::error::Error for ColorError {}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `rgb(r,g,b)` or `rgba(r,g,b,a)`; whitespace around components is allowed.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let syntax = || ColorError::Syntax(input.to_string());
        let s = input.trim();
        let body = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(syntax)?;

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(syntax());
        }

        let channel = |idx: usize, component: &'static str| {
            parts[idx]
                .parse::<u8>()
                .map_err(|_| ColorError::Component {
                    input: input.to_string(),
                    component,
                })
        };
        let r = channel(0, "red")?;
        let g = channel(1, "green")?;
        let b = channel(2, "blue")?;

        let a = match parts.get(3) {
            Some(raw) => raw
                .parse::<f32>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
                .ok_or_else(|| ColorError::Component {
                    input: input.to_string(),
                    component: "alpha",
                })?,
            None => 1.0,
        };

        Ok(Self { r, g, b, a })
    }

    /// Multiplies the existing alpha by `factor`.
    pub fn scale_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}
