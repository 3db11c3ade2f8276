//! Behaviour mode selection

use crate::brick::ColorLabel;

/// Behaviour mode, re-derived from the colour sensor on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Drive and claw follow the manual input flags.
    Manual,
    /// Obstacle avoidance.
    Autonomous,
}

impl Mode {
    /// Select the mode for a colour label. Blue, green and yellow markers enable manual mode.
    pub fn from_color(color: ColorLabel) -> Self {
        match color {
            ColorLabel::Blue | ColorLabel::Green | ColorLabel::Yellow => Mode::Manual,
            _ => Mode::Autonomous,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_color() {
        for color in [ColorLabel::Blue, ColorLabel::Green, ColorLabel::Yellow].iter() {
            assert_eq!(Mode::from_color(*color), Mode::Manual, "{:?}", color);
        }

        for color in [
            ColorLabel::None,
            ColorLabel::Black,
            ColorLabel::Red,
            ColorLabel::White,
            ColorLabel::Brown,
        ]
        .iter()
        {
            assert_eq!(Mode::from_color(*color), Mode::Autonomous, "{:?}", color);
        }
    }
}
