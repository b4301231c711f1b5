use crate::schema::UI_SCHEMA_KEY;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Overrides the schema title in rendered output.
    pub title: Option<String>,
    /// Seed missing fields from schema `default` values at session start.
    pub apply_defaults: bool,
    /// Non-standard keys removed before the schema is compiled.
    pub annotation_keys: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            title: None,
            apply_defaults: true,
            annotation_keys: vec![UI_SCHEMA_KEY.to_string()],
        }
    }
}

impl FormOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_defaults(mut self, enabled: bool) -> Self {
        self.apply_defaults = enabled;
        self
    }

    pub fn with_annotation_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.annotation_keys.contains(&key) {
            self.annotation_keys.push(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_keys_are_deduplicated() {
        let options = FormOptions::default()
            .with_annotation_key("uiSchema")
            .with_annotation_key("x-layout");
        assert_eq!(options.annotation_keys, vec!["uiSchema", "x-layout"]);
        assert!(options.apply_defaults);
    }
}
