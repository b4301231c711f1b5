use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use textwrap::wrap;

use crate::form::widgets::{RenderedForm, Widget};

use super::fields::{error_line, field_lines, label_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Column budget for wrapped descriptions and text areas.
    pub width: u16,
    pub show_descriptions: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 80,
            show_descriptions: true,
        }
    }
}

/// Lays out a rendered form: header, every field with its inline errors,
/// and a footer summarizing the last submit.
pub fn form_text(form: &RenderedForm, options: &ViewOptions) -> Text<'static> {
    let mut lines = Vec::new();
    let width = options.width.max(20) as usize;

    if let Some(title) = &form.title {
        lines.push(Line::from(Span::styled(
            title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "═".repeat(title.chars().count().min(width)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if options.show_descriptions {
        if let Some(description) = &form.description {
            for segment in wrap(description, width) {
                lines.push(Line::from(Span::styled(
                    segment.into_owned(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }
    if !lines.is_empty() {
        lines.push(Line::default());
    }

    match &form.root.widget {
        // The root object is the form itself, so its label is the header.
        Widget::Object { properties } if form.root.path.is_root() => {
            if properties.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No fields in schema",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            let column = label_column(properties.iter().map(|(_, field)| field));
            for (_, field) in properties {
                lines.extend(field_lines(field, column, 0, width, options));
            }
            for message in &form.root.errors {
                lines.push(error_line(message, 0));
            }
        }
        _ => {
            let column = label_column(std::iter::once(&form.root));
            lines.extend(field_lines(&form.root, column, 0, width, options));
        }
    }

    lines.push(Line::default());
    lines.push(footer_line(form.error_count));
    Text::from(lines)
}

fn footer_line(error_count: usize) -> Line<'static> {
    if error_count == 0 {
        return Line::from(Span::styled(
            "[ Submit ]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(vec![
        Span::styled(
            "[ Submit ]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {error_count} error(s)"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Drops styling, one output line per text line.
pub fn text_to_plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::{FormStore, Path, widgets::{Renderer, WidgetRegistry}};
    use crate::schema::parse_form_schema;

    fn render(schema: serde_json::Value, data: serde_json::Value) -> String {
        let schema = parse_form_schema(&schema).expect("schema parsed");
        let store = FormStore::new(data);
        let registry = WidgetRegistry::default();
        let form = Renderer::new(&schema, &store, &registry)
            .render_form()
            .expect("form rendered");
        text_to_plain(&form_text(&form, &ViewOptions::default()))
    }

    #[test]
    fn renders_header_and_fields_in_order() {
        let plain = render(
            json!({
                "title": "Profile",
                "type": "object",
                "required": ["firstName"],
                "properties": {
                    "firstName": {"type": "string", "title": "First name"},
                    "age": {"type": "integer"},
                    "active": {"type": "boolean"}
                }
            }),
            json!({"firstName": "John", "age": 30, "active": true}),
        );
        let first = plain.find("First name *").expect("first name rendered");
        let age = plain.find("Age").expect("age rendered");
        let active = plain.find("Active").expect("active rendered");
        assert!(plain.starts_with("Profile"));
        assert!(first < age && age < active);
        assert!(plain.contains("John"));
        assert!(plain.contains("30"));
        assert!(plain.contains("[x]"));
    }

    #[test]
    fn renders_array_controls() {
        let plain = render(
            json!({
                "type": "object",
                "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
            }),
            json!({"tags": ["a", "b"]}),
        );
        assert!(plain.contains("[+ Add]"));
        assert!(plain.contains("#1"));
        assert!(plain.contains("#2"));
        assert!(plain.contains("[↓]"));
        assert!(plain.contains("[✕]"));
    }

    #[test]
    fn renders_errors_inline() {
        let schema = parse_form_schema(&json!({
            "type": "object",
            "properties": {"email": {"type": "string", "format": "email"}}
        }))
        .expect("schema parsed");
        let mut store = FormStore::new(json!({"email": "nope"}));
        store.replace_errors(vec![crate::form::FieldError {
            path: Path::root().child("email"),
            message: "not an email".into(),
            kind: crate::form::ErrorKind::Format,
        }]);
        let registry = WidgetRegistry::default();
        let form = Renderer::new(&schema, &store, &registry)
            .render_form()
            .expect("form rendered");
        let plain = text_to_plain(&form_text(&form, &ViewOptions::default()));
        assert!(plain.contains("! not an email"));
        assert!(plain.contains("1 error(s)"));
    }
}
