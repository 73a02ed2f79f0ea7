//! Applying a theme to a rendering target.

use super::{Theme, ThemeCatalog};

/// Something that can receive theme styling, e.g. a document root.
pub trait ThemeTarget {
    fn set_variable(&mut self, name: &str, value: &str);
    fn set_background(&mut self, value: &str);
}

/// Tracks the applied theme so re-applying it does no target work.
#[derive(Debug, Default)]
pub struct ThemeApplier {
    applied: Option<String>,
}

impl ThemeApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Apply `theme_id` from `catalog`.
    ///
    /// Returns true if the target was written. Unknown ids and the
    /// currently applied id are silent no-ops.
    pub fn apply<T: ThemeTarget>(
        &mut self,
        catalog: &ThemeCatalog,
        theme_id: &str,
        target: &mut T,
    ) -> bool {
        if self.applied.as_deref() == Some(theme_id) {
            return false;
        }
        let Some(theme) = catalog.get(theme_id) else {
            return false;
        };
        write_theme(theme, target);
        self.applied = Some(theme.id.clone());
        true
    }
}

fn write_theme<T: ThemeTarget>(theme: &Theme, target: &mut T) {
    for (name, value) in &theme.css_variables {
        target.set_variable(name, value);
    }
    target.set_background(&theme.background);
}

/// Collects styling as a `:root` CSS block.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssTarget {
    pub variables: Vec<(String, String)>,
    pub background: Option<String>,
}

impl ThemeTarget for CssTarget {
    fn set_variable(&mut self, name: &str, value: &str) {
        match self.variables.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.variables.push((name.to_string(), value.to_string())),
        }
    }

    fn set_background(&mut self, value: &str) {
        self.background = Some(value.to_string());
    }
}

impl CssTarget {
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.variables {
            let name = if name.starts_with("--") {
                name.clone()
            } else {
                format!("--{name}")
            };
            css.push_str(&format!("  {name}: {value};\n"));
        }
        if let Some(bg) = &self.background {
            css.push_str(&format!("  background: {bg};\n"));
        }
        css.push_str("}\n");
        css
    }
}
