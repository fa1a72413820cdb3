//! Startup banner: "LEDGER" in the standard figlet font with a vertical gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Ink blue (#1e3a8a).
const INK_BLUE: (u8, u8, u8) = (0x1e, 0x3a, 0x8a);
/// Mint (#34d399).
const MINT: (u8, u8, u8) = (0x34, 0xd3, 0x99);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn banner_art() -> Option<String> {
    let font = FIGfont::standard().ok()?;
    let figure = font.convert("LEDGER")?;
    Some(figure.to_string())
}

/// Prints the banner, the version and a one-line tagline. Plain title when the
/// font cannot be loaded.
pub fn print_welcome() {
    let mut out = stdout();
    let art = banner_art().unwrap_or_else(|| "FREELANCE LEDGER".to_string());
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(INK_BLUE, MINT, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: MINT.0,
        g: MINT.1,
        b: MINT.2,
    }));
    let _ = out.execute(Print(format!(
        "v{}  clients, projects and billable hours\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(INK_BLUE, MINT, 0.0), INK_BLUE);
        assert_eq!(lerp_rgb(INK_BLUE, MINT, 1.0), MINT);
    }

    #[test]
    fn test_banner_renders_with_standard_font() {
        let art = banner_art().unwrap();
        assert!(art.lines().count() > 1);
    }
}
