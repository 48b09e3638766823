use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/**
Colour label of a vm.
Used by window managers to frame vm windows,
so the user can tell the trust level of a window at a glance.
*/
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Label {
    Red,
    Orange,
    Yellow,
    Green,
    Gray,
    Blue,
    Purple,
    #[default]
    Black,
}

impl Label {
    /// Frame color, as 0xRRGGBB.
    pub fn color(&self) -> u32 {
        match self {
            Label::Red => 0xcc0000,
            Label::Orange => 0xf57900,
            Label::Yellow => 0xedd400,
            Label::Green => 0x73d216,
            Label::Gray => 0x555753,
            Label::Blue => 0x3465a4,
            Label::Purple => 0x75507b,
            Label::Black => 0x000000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn parse_label_ignoring_case() -> miette::Result<()> {
        assert_eq!(Label::from_str("Black").unwrap(), Label::Black);
        assert_eq!(Label::from_str("gray").unwrap(), Label::Gray);
        assert!(Label::from_str("pink").is_err());
        Ok(())
    }

    #[test]
    fn label_colors() {
        assert_eq!(Label::Green.color(), 0x73d216);
        assert_eq!(Label::Black.color(), 0x000000);
    }
}
