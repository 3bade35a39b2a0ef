use ratatui::style::Style;
use std::collections::BTreeMap;

/// Maps single class names to styles.
///
/// A class list such as `"Modal Modal--wide"` resolves by patching the styles of each known
/// class in order, so later (more specific) classes win.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassStyles {
    styles: BTreeMap<String, Style>,
}

impl ClassStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, class: impl Into<String>, style: Style) -> Self {
        self.set(class, style);
        self
    }

    pub fn set(&mut self, class: impl Into<String>, style: Style) {
        self.styles.insert(class.into(), style);
    }

    pub fn get(&self, class: &str) -> Option<Style> {
        self.styles.get(class).copied()
    }

    pub fn resolve(&self, class_list: &str, base: Style) -> Style {
        class_list
            .split(' ')
            .filter_map(|c| self.styles.get(c))
            .fold(base, |acc, s| acc.patch(*s))
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub classes: ClassStyles,
}

impl Theme {
    /// Style for a BEM class list, on top of [`Theme::text_primary`].
    pub fn class_style(&self, class_list: &str) -> Style {
        self.classes.resolve(class_list, self.text_primary)
    }
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            classes: ClassStyles::new()
                .with("Modalwrapper", Style::default().on_black().dark_gray())
                .with("Modal", Style::default().white().on_black())
                .with("Modal__closebutton", Style::default().cyan().bold())
                .with("Modal__body", Style::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn later_classes_patch_earlier_ones() {
        let sheet = ClassStyles::new()
            .with("Modal", Style::default().fg(Color::White).bg(Color::Black))
            .with("Modal--danger", Style::default().fg(Color::Red));
        let s = sheet.resolve("Modal Modal--danger", Style::default());
        assert_eq!(s.fg, Some(Color::Red));
        assert_eq!(s.bg, Some(Color::Black));
    }

    #[test]
    fn unknown_classes_fall_back_to_base() {
        let base = Style::default().fg(Color::Green);
        assert_eq!(ClassStyles::new().resolve("Nope Nope--x", base), base);
    }
}
