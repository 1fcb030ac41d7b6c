use anyhow::Result;
use tiny_skia::Color;

// Only the names the app actually uses; everything else must be `#rrggbb`.
fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    match name {
        "white" => Some((255, 255, 255)),
        "black" => Some((0, 0, 0)),
        "blue" => Some((0, 0, 255)),
        "red" => Some((255, 0, 0)),
        _ => None,
    }
}

pub fn parse_color(color: &str) -> Result<Color> {
    let color = color.trim();
    let (r, g, b) = match color.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.is_ascii() => {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| anyhow!("invalid hex color: {}", color))
            };
            (channel(0)?, channel(2)?, channel(4)?)
        }
        Some(_) => bail!("invalid hex color: {}", color),
        None => named_color(&color.to_ascii_lowercase())
            .ok_or_else(|| anyhow!("unknown color name: {}", color))?,
    };
    Ok(Color::from_rgba8(r, g, b, 255))
}

#[cfg(test)]
mod tests {
    use crate::renderer::utils::*;

    #[test]
    fn hex_and_named() {
        assert_eq!(
            parse_color("#0800ff").unwrap(),
            Color::from_rgba8(8, 0, 255, 255)
        );
        assert_eq!(parse_color("White").unwrap(), Color::WHITE);
        assert!(parse_color("#12").is_err());
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("mauve").is_err());
    }
}
