use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::form::widgets::{InputType, RenderedField, SelectOption, Widget};

use super::ViewOptions;

const INDENT: &str = "  ";

/// Display width of the widest label among siblings, so values line up.
pub(super) fn label_column<'f>(fields: impl Iterator<Item = &'f RenderedField>) -> usize {
    fields
        .filter(|field| is_inline(&field.widget))
        .map(|field| UnicodeWidthStr::width(label_text(field).as_str()))
        .max()
        .unwrap_or(0)
}

pub(super) fn field_lines(
    field: &RenderedField,
    column: usize,
    depth: usize,
    width: usize,
    options: &ViewOptions,
) -> Vec<Line<'static>> {
    field_lines_labelled(field, label_text(field), column, depth, width, options)
}

fn field_lines_labelled(
    field: &RenderedField,
    label: String,
    column: usize,
    depth: usize,
    width: usize,
    options: &ViewOptions,
) -> Vec<Line<'static>> {
    let indent = INDENT.repeat(depth);
    let mut lines = Vec::new();
    let label_style = if field.errors.is_empty() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    if is_inline(&field.widget) {
        let mut padded = label;
        let mut label_width = UnicodeWidthStr::width(padded.as_str());
        while label_width < column {
            padded.push(' ');
            label_width += 1;
        }
        let mut spans = vec![
            Span::raw(indent.clone()),
            Span::styled(padded, label_style),
            Span::raw("  "),
        ];
        spans.extend(value_spans(&field.widget));
        lines.push(Line::from(spans));
    } else if !label.is_empty() {
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(label, label_style),
        ]));
    }

    if options.show_descriptions {
        if let Some(description) = &field.description {
            let budget = width.saturating_sub(indent.len() + 2).max(10);
            for segment in wrap(description, budget) {
                lines.push(Line::from(Span::styled(
                    format!("{indent}{INDENT}{segment}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    match &field.widget {
        Widget::Textarea { value } => {
            let budget = width.saturating_sub(indent.len() + 4).max(10);
            let border = Style::default().fg(Color::DarkGray);
            let mut wrapped: Vec<String> = value
                .lines()
                .flat_map(|line| {
                    let segments = wrap(line, budget);
                    if segments.is_empty() {
                        vec![String::new()]
                    } else {
                        segments.into_iter().map(|s| s.into_owned()).collect()
                    }
                })
                .collect();
            if wrapped.is_empty() {
                wrapped.push(String::new());
            }
            for segment in wrapped {
                lines.push(Line::from(vec![
                    Span::raw(format!("{indent}{INDENT}")),
                    Span::styled("│ ", border),
                    Span::styled(segment, Style::default().fg(Color::White)),
                ]));
            }
        }
        Widget::Object { properties } => {
            let child_column = label_column(properties.iter().map(|(_, child)| child));
            for (_, child) in properties {
                lines.extend(field_lines(child, child_column, depth + 1, width, options));
            }
        }
        Widget::Array { items } => {
            let control = Style::default().fg(Color::Yellow);
            let disabled = Style::default().fg(Color::DarkGray);
            for item in items {
                let mut label = format!("#{}", item.index + 1);
                if let Some(title) = &item.field.title {
                    label.push(' ');
                    label.push_str(title);
                }
                let item_column = UnicodeWidthStr::width(label.as_str());
                let mut item_lines = field_lines_labelled(
                    &item.field,
                    label,
                    item_column,
                    depth + 1,
                    width,
                    options,
                );
                let controls = vec![
                    Span::raw("  "),
                    Span::styled("[↑]", if item.can_move_up { control } else { disabled }),
                    Span::styled("[↓]", if item.can_move_down { control } else { disabled }),
                    Span::styled("[✕]", Style::default().fg(Color::Red)),
                ];
                if let Some(first) = item_lines.first_mut() {
                    first.spans.extend(controls);
                }
                lines.extend(item_lines);
            }
            lines.push(Line::from(vec![
                Span::raw(format!("{indent}{INDENT}")),
                Span::styled("[+ Add]", control.add_modifier(Modifier::BOLD)),
            ]));
        }
        _ => {}
    }

    for message in &field.errors {
        lines.push(error_line(message, depth + 1));
    }
    lines
}

pub(super) fn error_line(message: &str, depth: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}! {message}", INDENT.repeat(depth)),
        Style::default().fg(Color::Red),
    ))
}

fn label_text(field: &RenderedField) -> String {
    let mut label = field.title.clone().unwrap_or_default();
    if field.required {
        label.push_str(" *");
    }
    label
}

fn is_inline(widget: &Widget) -> bool {
    !matches!(
        widget,
        Widget::Textarea { .. } | Widget::Object { .. } | Widget::Array { .. }
    )
}

fn value_spans(widget: &Widget) -> Vec<Span<'static>> {
    let value = Style::default().fg(Color::White);
    let muted = Style::default().fg(Color::DarkGray);
    let active = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    match widget {
        Widget::Input { input_type, value: text } => {
            let shown = match input_type {
                InputType::Password => "•".repeat(text.chars().count()),
                _ => text.clone(),
            };
            if shown.is_empty() {
                vec![Span::styled(format!("<{}>", input_type.as_str()), muted)]
            } else {
                vec![Span::styled(shown, value)]
            }
        }
        Widget::Select { options, selected } => {
            let label = selected
                .and_then(|index| options.get(index))
                .map(|option| option.label.clone())
                .unwrap_or_else(|| "None".to_string());
            vec![Span::styled(format!("[{label} ▾]"), value)]
        }
        Widget::Date { value: date, with_time } => match date {
            Some(date) => vec![Span::styled(date.clone(), value)],
            None if *with_time => vec![Span::styled("YYYY-MM-DDTHH:MM:SSZ", muted)],
            None => vec![Span::styled("YYYY-MM-DD", muted)],
        },
        Widget::Number { value: number, integer } => match number {
            Some(number) => vec![Span::styled(number.to_string(), value)],
            None if *integer => vec![Span::styled("<integer>", muted)],
            None => vec![Span::styled("<number>", muted)],
        },
        Widget::Checkbox { checked } => {
            vec![Span::styled(if *checked { "[x]" } else { "[ ]" }, value)]
        }
        Widget::Radio { options, selected } => radio_spans(options, *selected, active, muted),
        Widget::Switch {
            checked,
            off_label,
            on_label,
        } => {
            let mut spans = Vec::new();
            if let Some(off) = off_label {
                spans.push(Span::styled(format!("{off} "), if *checked { muted } else { active }));
            }
            spans.push(Span::styled(if *checked { "( ●)" } else { "(● )" }, value));
            if let Some(on) = on_label {
                spans.push(Span::styled(format!(" {on}"), if *checked { active } else { muted }));
            }
            spans
        }
        Widget::Custom { name, payload } => vec![
            Span::styled(format!("<{name}> "), muted),
            Span::styled(payload.to_string(), value),
        ],
        Widget::Textarea { .. } | Widget::Object { .. } | Widget::Array { .. } => Vec::new(),
    }
}

fn radio_spans(
    options: &[SelectOption],
    selected: Option<usize>,
    active: Style,
    muted: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (index, option) in options.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        if selected == Some(index) {
            spans.push(Span::styled(format!("(•) {}", option.label), active));
        } else {
            spans.push(Span::styled(format!("( ) {}", option.label), muted));
        }
    }
    spans
}
