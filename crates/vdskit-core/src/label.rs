//! # Layer labels
//!
//! A layer label tells the cutting machine what to do with a group of paths.
//! It is either the `NOCUT` sentinel (reference geometry, never cut) or a
//! `sheet.cut.tool` triple such as `green.normal.T40GREEN`.
//!
//! Cut types restrict which tools may be used:
//!
//! | Cut       | Tools                        |
//! |-----------|------------------------------|
//! | normal    | T40GREEN, T45BLUE, T90GREY   |
//! | reverse   | T40GREEN, T45BLUE, T90GREY   |
//! | vgroove   | T40GREEN                     |
//! | decor     | TPENGOLD                     |
//! | debossing | TEMBVIOLET                   |
//!
//! Labels are immutable values. [`LayerLabel::new`], [`LayerLabel::parse`]
//! and [`modify`] are the only ways to obtain one, so every label in
//! circulation satisfies the table above.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LabelError, Result};

/// Character joining sheet, cut and tool inside a label
pub const SEPARATOR: char = '.';

/// Sheet name marking reference-only geometry
pub const NOCUT: &str = "NOCUT";

/// Machining operation applied to a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    #[default]
    Normal,
    Reverse,
    Vgroove,
    Decor,
    Debossing,
}

impl CutType {
    /// All cut types in table order
    pub const ALL: [CutType; 5] = [
        CutType::Normal,
        CutType::Reverse,
        CutType::Vgroove,
        CutType::Decor,
        CutType::Debossing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Vgroove => "vgroove",
            Self::Decor => "decor",
            Self::Debossing => "debossing",
        }
    }

    /// Numeric code written into the VDS aperture block.
    ///
    /// Code 4 is unassigned on the machine side.
    pub fn code(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Reverse => 1,
            Self::Vgroove => 2,
            Self::Decor => 3,
            Self::Debossing => 5,
        }
    }

    /// Tools able to perform this cut, in preference order
    pub fn compatible_tools(&self) -> &'static [Tool] {
        match self {
            Self::Normal | Self::Reverse => &[Tool::T40Green, Tool::T45Blue, Tool::T90Grey],
            Self::Vgroove => &[Tool::T40Green],
            Self::Decor => &[Tool::TPenGold],
            Self::Debossing => &[Tool::TEmbViolet],
        }
    }

    pub fn accepts(&self, tool: Tool) -> bool {
        self.compatible_tools().contains(&tool)
    }

    /// First compatible tool, used when a label omits the tool
    pub fn default_tool(&self) -> Tool {
        self.compatible_tools()[0]
    }
}

impl fmt::Display for CutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CutType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cut| cut.as_str() == s)
            .ok_or_else(|| LabelError::UnknownCut { cut: s.to_string() })
    }
}

/// Physical cutting or engraving head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    #[serde(rename = "T40GREEN")]
    T40Green,
    #[serde(rename = "T45BLUE")]
    T45Blue,
    #[serde(rename = "T90GREY")]
    T90Grey,
    #[serde(rename = "TPENGOLD")]
    TPenGold,
    #[serde(rename = "TEMBVIOLET")]
    TEmbViolet,
}

impl Tool {
    /// All tools in table order
    pub const ALL: [Tool; 5] = [
        Tool::T40Green,
        Tool::T45Blue,
        Tool::T90Grey,
        Tool::TPenGold,
        Tool::TEmbViolet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T40Green => "T40GREEN",
            Self::T45Blue => "T45BLUE",
            Self::T90Grey => "T90GREY",
            Self::TPenGold => "TPENGOLD",
            Self::TEmbViolet => "TEMBVIOLET",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| LabelError::UnknownTool {
                tool: s.to_string(),
            })
    }
}

/// Resolve an optional cut/tool pair against the compatibility table.
///
/// - neither given: `(normal, T40GREEN)`
/// - only a tool: the first cut accepting it (falls back to `normal`)
/// - only a cut: its first compatible tool
/// - both: each must be known and the pair must be compatible
pub fn validate(cut: Option<&str>, tool: Option<&str>) -> Result<(CutType, Tool)> {
    match (cut, tool) {
        (None, None) => {
            let cut = CutType::default();
            Ok((cut, cut.default_tool()))
        }
        (None, Some(tool)) => {
            let tool: Tool = tool.parse()?;
            let cut = match CutType::ALL.into_iter().find(|cut| cut.accepts(tool)) {
                Some(cut) => cut,
                None => {
                    debug!(%tool, "no cut type accepts tool, falling back to normal");
                    CutType::Normal
                }
            };
            Ok((cut, tool))
        }
        (Some(cut), None) => {
            let cut: CutType = cut.parse()?;
            Ok((cut, cut.default_tool()))
        }
        (Some(cut), Some(tool)) => {
            let cut: CutType = cut.parse()?;
            let tool: Tool = tool.parse()?;
            if cut.accepts(tool) {
                Ok((cut, tool))
            } else {
                Err(LabelError::Incompatible {
                    cut: cut.to_string(),
                    tool: tool.to_string(),
                })
            }
        }
    }
}

/// Sheet, cut and tool of a cutting label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetCut {
    sheet: String,
    cut: CutType,
    tool: Tool,
}

impl SheetCut {
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn cut(&self) -> CutType {
        self.cut
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }
}

/// A validated layer label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayerLabel {
    /// Reference geometry, excluded from cut output
    NoCut,
    /// Geometry cut on a sheet with a given cut type and tool
    Cut(SheetCut),
}

impl LayerLabel {
    /// Build a label from a sheet name and optional cut/tool names.
    ///
    /// A sheet equal to `NOCUT` yields the sentinel and ignores cut and tool.
    pub fn new(
        sheet: impl fmt::Display,
        cut: Option<&str>,
        tool: Option<&str>,
    ) -> Result<Self> {
        let sheet = sheet.to_string();
        if sheet == NOCUT {
            return Ok(Self::NoCut);
        }
        if sheet.is_empty() {
            return Err(LabelError::EmptySheet);
        }
        if sheet.contains(SEPARATOR) {
            return Err(LabelError::SheetContainsSeparator {
                sheet,
                separator: SEPARATOR,
            });
        }
        let (cut, tool) = validate(cut, tool)?;
        Ok(Self::Cut(SheetCut { sheet, cut, tool }))
    }

    /// Parse a label string.
    ///
    /// A first field equal to `NOCUT` always yields the sentinel, whatever
    /// follows it. Anything else must be exactly `sheet.cut.tool`.
    pub fn parse(label: &str) -> Result<Self> {
        let fields: Vec<&str> = label.split(SEPARATOR).collect();
        if fields[0] == NOCUT {
            return Ok(Self::NoCut);
        }
        if fields.len() != 3 {
            return Err(LabelError::FieldCount {
                label: label.to_string(),
                found: fields.len(),
            });
        }
        Self::new(fields[0], Some(fields[1]), Some(fields[2]))
    }

    pub fn is_cut(&self) -> bool {
        matches!(self, Self::Cut(_))
    }

    pub fn sheet(&self) -> &str {
        match self {
            Self::NoCut => NOCUT,
            Self::Cut(c) => c.sheet(),
        }
    }

    pub fn cut(&self) -> Option<CutType> {
        match self {
            Self::NoCut => None,
            Self::Cut(c) => Some(c.cut()),
        }
    }

    pub fn tool(&self) -> Option<Tool> {
        match self {
            Self::NoCut => None,
            Self::Cut(c) => Some(c.tool()),
        }
    }
}

impl fmt::Display for LayerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCut => write!(f, "{NOCUT}{SEPARATOR}{SEPARATOR}"),
            Self::Cut(c) => write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", c.sheet, c.cut, c.tool),
        }
    }
}

impl FromStr for LayerLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LayerLabel {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LayerLabel> for String {
    fn from(label: LayerLabel) -> Self {
        label.to_string()
    }
}

/// Encode a label string from a sheet name and optional cut/tool names
pub fn encode(sheet: impl fmt::Display, cut: Option<&str>, tool: Option<&str>) -> Result<String> {
    LayerLabel::new(sheet, cut, tool).map(|label| label.to_string())
}

/// Parse a label string
pub fn parse(label: &str) -> Result<LayerLabel> {
    LayerLabel::parse(label)
}

/// Replacement fields for [`modify`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOverrides {
    pub sheet: Option<String>,
    pub cut: Option<String>,
    pub tool: Option<String>,
}

impl LabelOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: impl fmt::Display) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    pub fn cut(mut self, cut: impl Into<String>) -> Self {
        self.cut = Some(cut.into());
        self
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

/// Re-encode an existing label with some fields replaced.
///
/// The original must parse. A `NOCUT` target takes no cut or tool. Moving a
/// `NOCUT` label onto a sheet needs both a cut and a tool since the sentinel
/// has none to keep. Otherwise missing overrides keep the original's fields.
pub fn modify(label: &str, overrides: &LabelOverrides) -> Result<String> {
    let original = LayerLabel::parse(label)?;
    let sheet = overrides
        .sheet
        .clone()
        .unwrap_or_else(|| original.sheet().to_string());
    let cut = overrides.cut.as_deref();
    let tool = overrides.tool.as_deref();

    if sheet == NOCUT {
        if cut.is_some() || tool.is_some() {
            return Err(LabelError::SentinelWithCutOrTool);
        }
        return Ok(LayerLabel::NoCut.to_string());
    }

    match original {
        LayerLabel::NoCut => {
            if cut.is_none() || tool.is_none() {
                return Err(LabelError::MissingCutOrTool { sheet });
            }
            encode(sheet, cut, tool)
        }
        LayerLabel::Cut(current) => {
            let cut = cut.unwrap_or(current.cut.as_str());
            let tool = tool.unwrap_or(current.tool.as_str());
            encode(sheet, Some(cut), Some(tool))
        }
    }
}
