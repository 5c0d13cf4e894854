use ratatui::style::{Color, Modifier, Style};

pub const TEXT: Color = Color::Gray;
pub const MUTED: Color = Color::DarkGray;

pub fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn value_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

/// Icon lookup keyed by skill name: the glyph rendered in front of the
/// name cell, tinted per skill. Unknown names fall back to a muted dot.
pub fn skill_icon(name: &str) -> (&'static str, Color) {
    let color = match name {
        "Attack" => Color::LightRed,
        "Strength" => Color::Green,
        "Defence" => Color::LightBlue,
        "Hitpoints" => Color::Red,
        "Ranged" => Color::LightGreen,
        "Prayer" => Color::White,
        "Magic" => Color::Blue,
        "Cooking" => Color::Magenta,
        "Woodcutting" => Color::Green,
        "Fletching" => Color::Cyan,
        "Fishing" => Color::LightCyan,
        "Firemaking" => Color::LightYellow,
        "Crafting" => Color::Yellow,
        "Smithing" => Color::Gray,
        "Mining" => Color::LightBlue,
        "Herblore" => Color::LightGreen,
        "Agility" => Color::Blue,
        "Thieving" => Color::LightMagenta,
        "Slayer" => Color::DarkGray,
        "Farming" => Color::Green,
        "Runecraft" => Color::LightYellow,
        "Hunter" => Color::Yellow,
        "Construction" => Color::LightYellow,
        _ => MUTED,
    };
    ("●", color)
}
