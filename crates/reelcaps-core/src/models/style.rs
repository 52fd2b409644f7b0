//! Subtitle styling options and their mapping to rendering engine parameters.
//!
//! Every option is a closed enum whose wire string matches what the rendering
//! engine accepts. Numeric spacing values come from fixed lookup tables.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            _ => Err(anyhow::anyhow!("Invalid font size: {}", s)),
        }
    }
}

impl Display for FontSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeColor {
    #[default]
    Black,
    White,
    Red,
    Blue,
}

impl StrokeColor {
    pub const ALL: [StrokeColor; 4] = [
        StrokeColor::Black,
        StrokeColor::White,
        StrokeColor::Red,
        StrokeColor::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeColor::Black => "black",
            StrokeColor::White => "white",
            StrokeColor::Red => "red",
            StrokeColor::Blue => "blue",
        }
    }
}

impl FromStr for StrokeColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(StrokeColor::Black),
            "white" => Ok(StrokeColor::White),
            "red" => Ok(StrokeColor::Red),
            "blue" => Ok(StrokeColor::Blue),
            _ => Err(anyhow::anyhow!("Invalid stroke color: {}", s)),
        }
    }
}

impl Display for StrokeColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Stroke width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeWidth {
    #[serde(rename = "1")]
    One,
    #[default]
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
}

impl StrokeWidth {
    pub const ALL: [StrokeWidth; 4] = [
        StrokeWidth::One,
        StrokeWidth::Two,
        StrokeWidth::Three,
        StrokeWidth::Four,
    ];

    pub fn pixels(&self) -> u8 {
        match self {
            StrokeWidth::One => 1,
            StrokeWidth::Two => 2,
            StrokeWidth::Three => 3,
            StrokeWidth::Four => 4,
        }
    }
}

impl FromStr for StrokeWidth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("px") {
            "1" => Ok(StrokeWidth::One),
            "2" => Ok(StrokeWidth::Two),
            "3" => Ok(StrokeWidth::Three),
            "4" => Ok(StrokeWidth::Four),
            _ => Err(anyhow::anyhow!("Invalid stroke width: {}", s)),
        }
    }
}

impl Display for StrokeWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.pixels())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterSpacing {
    #[default]
    Normal,
    Wide,
    Wider,
    Widest,
}

impl LetterSpacing {
    pub const ALL: [LetterSpacing; 4] = [
        LetterSpacing::Normal,
        LetterSpacing::Wide,
        LetterSpacing::Wider,
        LetterSpacing::Widest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterSpacing::Normal => "normal",
            LetterSpacing::Wide => "wide",
            LetterSpacing::Wider => "wider",
            LetterSpacing::Widest => "widest",
        }
    }

    /// Engine value for this spacing.
    pub fn value(&self) -> u8 {
        match self {
            LetterSpacing::Normal => 0,
            LetterSpacing::Wide => 2,
            LetterSpacing::Wider => 4,
            LetterSpacing::Widest => 6,
        }
    }
}

impl FromStr for LetterSpacing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(LetterSpacing::Normal),
            "wide" => Ok(LetterSpacing::Wide),
            "wider" => Ok(LetterSpacing::Wider),
            "widest" => Ok(LetterSpacing::Widest),
            _ => Err(anyhow::anyhow!("Invalid letter spacing: {}", s)),
        }
    }
}

impl Display for LetterSpacing {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSpacing {
    #[default]
    Normal,
    Wide,
    Wider,
    Widest,
}

impl LineSpacing {
    pub const ALL: [LineSpacing; 4] = [
        LineSpacing::Normal,
        LineSpacing::Wide,
        LineSpacing::Wider,
        LineSpacing::Widest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineSpacing::Normal => "normal",
            LineSpacing::Wide => "wide",
            LineSpacing::Wider => "wider",
            LineSpacing::Widest => "widest",
        }
    }

    /// Engine value for this spacing.
    pub fn value(&self) -> f64 {
        match self {
            LineSpacing::Normal => 0.0,
            LineSpacing::Wide => 1.5,
            LineSpacing::Wider => 2.0,
            LineSpacing::Widest => 2.5,
        }
    }
}

impl FromStr for LineSpacing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(LineSpacing::Normal),
            "wide" => Ok(LineSpacing::Wide),
            "wider" => Ok(LineSpacing::Wider),
            "widest" => Ok(LineSpacing::Widest),
            _ => Err(anyhow::anyhow!("Invalid line spacing: {}", s)),
        }
    }
}

impl Display for LineSpacing {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Font files installed on the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFile {
    #[serde(rename = "Arial_Bold.ttf")]
    ArialBold,
    #[serde(rename = "ProximaNova-Bold.ttf")]
    ProximaNovaBold,
    #[serde(rename = "Montserrat-Black.ttf")]
    MontserratBlack,
    #[serde(rename = "Roboto-Bold.ttf")]
    RobotoBold,
    #[serde(rename = "Impact.ttf")]
    Impact,
    #[serde(rename = "BebasNeue-Regular.ttf")]
    BebasNeue,
    #[serde(rename = "Anton-Regular.ttf")]
    Anton,
    #[serde(rename = "Oswald-Bold.ttf")]
    OswaldBold,
}

impl FontFile {
    pub const ALL: [FontFile; 8] = [
        FontFile::ArialBold,
        FontFile::ProximaNovaBold,
        FontFile::MontserratBlack,
        FontFile::RobotoBold,
        FontFile::Impact,
        FontFile::BebasNeue,
        FontFile::Anton,
        FontFile::OswaldBold,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            FontFile::ArialBold => "Arial_Bold.ttf",
            FontFile::ProximaNovaBold => "ProximaNova-Bold.ttf",
            FontFile::MontserratBlack => "Montserrat-Black.ttf",
            FontFile::RobotoBold => "Roboto-Bold.ttf",
            FontFile::Impact => "Impact.ttf",
            FontFile::BebasNeue => "BebasNeue-Regular.ttf",
            FontFile::Anton => "Anton-Regular.ttf",
            FontFile::OswaldBold => "Oswald-Bold.ttf",
        }
    }
}

impl FromStr for FontFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFile::ALL
            .iter()
            .copied()
            .find(|font| font.file_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Invalid font file: {}", s))
    }
}

impl Display for FontFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.file_name())
    }
}

/// Styling options selected by the operator before submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    pub font_size: FontSize,
    pub stroke_color: StrokeColor,
    pub stroke_width: StrokeWidth,
    pub transparent_background: bool,
    pub letter_spacing: LetterSpacing,
    pub line_spacing: LineSpacing,
    pub font_file: Option<FontFile>,
}

impl StyleConfig {
    /// Map to engine parameters. `None` until a font has been selected.
    pub fn to_engine_parameters(&self) -> Option<EngineParameters> {
        let font = self.font_file?;
        Some(EngineParameters {
            font_size: self.font_size,
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            transparent: self.transparent_background,
            letter_spacing: self.letter_spacing.value(),
            line_spacing: self.line_spacing.value(),
            font,
        })
    }
}

/// Style values in the shape the rendering engine expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineParameters {
    pub font_size: FontSize,
    pub stroke_color: StrokeColor,
    /// Sent as its wire string (`"1"`..`"4"`).
    pub stroke_width: StrokeWidth,
    pub transparent: bool,
    pub letter_spacing: u8,
    pub line_spacing: f64,
    #[serde(rename = "selectedFont")]
    pub font: FontFile,
}

/// Mutable holder for the operator's style choices.
#[derive(Debug, Clone, Default)]
pub struct StyleConfigStore {
    config: StyleConfig,
}

impl StyleConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn font_size(&self) -> FontSize {
        self.config.font_size
    }

    pub fn set_font_size(&mut self, value: FontSize) {
        self.config.font_size = value;
    }

    pub fn stroke_color(&self) -> StrokeColor {
        self.config.stroke_color
    }

    pub fn set_stroke_color(&mut self, value: StrokeColor) {
        self.config.stroke_color = value;
    }

    pub fn stroke_width(&self) -> StrokeWidth {
        self.config.stroke_width
    }

    pub fn set_stroke_width(&mut self, value: StrokeWidth) {
        self.config.stroke_width = value;
    }

    pub fn transparent_background(&self) -> bool {
        self.config.transparent_background
    }

    pub fn set_transparent_background(&mut self, value: bool) {
        self.config.transparent_background = value;
    }

    /// Flip the transparent background toggle, returning the new value.
    pub fn toggle_transparent_background(&mut self) -> bool {
        self.config.transparent_background = !self.config.transparent_background;
        self.config.transparent_background
    }

    pub fn letter_spacing(&self) -> LetterSpacing {
        self.config.letter_spacing
    }

    pub fn set_letter_spacing(&mut self, value: LetterSpacing) {
        self.config.letter_spacing = value;
    }

    pub fn line_spacing(&self) -> LineSpacing {
        self.config.line_spacing
    }

    pub fn set_line_spacing(&mut self, value: LineSpacing) {
        self.config.line_spacing = value;
    }

    pub fn font_file(&self) -> Option<FontFile> {
        self.config.font_file
    }

    pub fn select_font(&mut self, font: FontFile) {
        self.config.font_file = Some(font);
    }

    pub fn to_engine_parameters(&self) -> Option<EngineParameters> {
        self.config.to_engine_parameters()
    }
}
