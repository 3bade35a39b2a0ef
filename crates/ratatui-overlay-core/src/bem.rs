//! BEM class-name composition.
//!
//! Components identify their parts with BEM class names (`Modal`, `Modalwrapper`,
//! `Modal__closebutton`, `Modal--wide`). The [`theme::ClassStyles`](crate::theme::ClassStyles)
//! sheet resolves those names to terminal styles, so callers restyle a component by adding
//! `--modifier` classes rather than by threading `Style` values through options.

/// A modifier token, or an arbitrarily nested list of them.
///
/// Empty strings and [`Modifier::Absent`] are skipped. Strings are used verbatim (no trimming).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Modifier {
    #[default]
    Absent,
    Text(String),
    List(Vec<Modifier>),
}

impl Modifier {
    /// `name` if `cond` holds, otherwise absent.
    pub fn when(cond: bool, name: impl Into<String>) -> Self {
        if cond {
            Self::Text(name.into())
        } else {
            Self::Absent
        }
    }

    pub fn is_empty(&self) -> bool {
        let mut tokens = Vec::new();
        self.collect(&mut tokens);
        tokens.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Absent => {}
            Self::Text(s) if s.is_empty() => {}
            Self::Text(s) => out.push(s),
            Self::List(items) => {
                for item in items {
                    item.collect(out);
                }
            }
        }
    }
}

impl From<&str> for Modifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Modifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Modifier>> From<Option<T>> for Modifier {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<T: Into<Modifier>> From<Vec<T>> for Modifier {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Modifier>, const N: usize> From<[T; N]> for Modifier {
    fn from(value: [T; N]) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// `" {bem}--{m1} {bem}--{m2}"` for every present token, or `""` when there are none.
pub fn modifier_class(bem: &str, modifier: &Modifier) -> String {
    let mut tokens = Vec::new();
    modifier.collect(&mut tokens);
    let mut out = String::new();
    for token in tokens {
        out.push(' ');
        out.push_str(bem);
        out.push_str("--");
        out.push_str(token);
    }
    out
}

/// The block class followed by its modifier classes, optionally prefixed by `extra`.
pub fn bem_class(bem: &str, modifier: &Modifier, extra: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(extra) = extra.filter(|e| !e.is_empty()) {
        out.push_str(extra);
        out.push(' ');
    }
    out.push_str(bem);
    out.push_str(&modifier_class(bem, modifier));
    out
}
