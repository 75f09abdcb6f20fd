use std::fmt;

/// Embed accent color (RGB).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLURPLE: Color = Color(0x5865F2);
    pub const DEFAULT: Color = Color(0);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Rich message payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Color,
    pub footer: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Outbound message handed to the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Embed(_) => None,
        }
    }

    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Reply::Text(_) => None,
            Reply::Embed(embed) => Some(embed),
        }
    }

    /// Flatten to plain text for transports without rich payloads.
    pub fn render(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Embed(embed) => {
                let mut parts = Vec::with_capacity(3);
                if let Some(title) = &embed.title {
                    parts.push(format!("== {} ==", title));
                }
                if let Some(description) = &embed.description {
                    parts.push(description.clone());
                }
                if let Some(footer) = &embed.footer {
                    parts.push(format!("-- {} --", footer));
                }
                parts.join("\n")
            }
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<Embed> for Reply {
    fn from(embed: Embed) -> Self {
        Reply::Embed(embed)
    }
}
