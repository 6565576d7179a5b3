use crossterm::style::{Color, StyledContent, Stylize};
use meteo_core::ThemePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub scheme: Scheme,
    pub text: Color,
    pub secondary: Color,
    pub tint: Color,
    pub blue: Color,
    pub error: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        scheme: Scheme::Light,
        text: rgb(0x11181c),
        secondary: rgb(0x616161),
        tint: rgb(0xae2012),
        blue: rgb(0x005f73),
        error: Color::Red,
    };

    pub const DARK: Theme = Theme {
        scheme: Scheme::Dark,
        text: rgb(0xecedee),
        secondary: Color::Grey,
        tint: rgb(0xdc2f02),
        blue: rgb(0x0a9396),
        error: Color::Red,
    };

    pub fn for_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Light => Self::LIGHT,
            Scheme::Dark => Self::DARK,
        }
    }

    /// `auto` follows the terminal background as advertised in `COLORFGBG`.
    pub fn resolve(preference: ThemePreference) -> Self {
        let scheme = match preference {
            ThemePreference::Light => Scheme::Light,
            ThemePreference::Dark => Scheme::Dark,
            ThemePreference::Auto => std::env::var("COLORFGBG")
                .ok()
                .and_then(|v| scheme_from_colorfgbg(&v))
                .unwrap_or(Scheme::Dark),
        };
        Self::for_scheme(scheme)
    }

    pub fn title<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.text).bold()
    }

    pub fn accent<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.tint)
    }

    pub fn blue<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.blue)
    }

    pub fn plain<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.text)
    }

    pub fn muted<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.secondary)
    }

    pub fn error<'a>(&self, s: &'a str) -> StyledContent<&'a str> {
        s.with(self.error)
    }
}

/// `COLORFGBG` is `"fg;bg"` (sometimes `"fg;default;bg"`); ANSI backgrounds 0-6 and 8 are dark.
fn scheme_from_colorfgbg(value: &str) -> Option<Scheme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        0..=6 | 8 => Scheme::Dark,
        _ => Scheme::Light,
    })
}
