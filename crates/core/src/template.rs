//! Sentence template formatting.
//!
//! Templates use `{name}`, `{value}`, `{unit}` and `{section}` placeholders, with `{{` and `}}`
//! producing literal braces. Formatting is explicit: anything else is a [`TemplateError`] and
//! the caller decides on a fallback.

use crate::error::TemplateError;

/// Values substituted into a sentence template.
#[derive(Clone, Copy, Debug)]
pub struct TemplateContext<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub unit: Option<&'a str>,
    pub section: &'a str,
}

impl TemplateContext<'_> {
    /// `{unit}` renders as `" <unit>"` when set so `"{value}{unit}"` reads `"14 cm"`, and as
    /// nothing when the unit is unset or blank.
    fn unit_text(&self) -> String {
        match self.unit.map(str::trim) {
            Some(unit) if !unit.is_empty() => format!(" {unit}"),
            _ => String::new(),
        }
    }
}

/// Substitute placeholders in `template`.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownPlaceholder`] for a placeholder other than the four supported
/// ones, and [`TemplateError::UnbalancedBrace`] for a lone `{` or `}`.
pub fn render_template(template: &str, ctx: &TemplateContext<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + ctx.value.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut key = String::new();
                let mut closed = false;
                for (_, k) in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    if k == '{' {
                        break;
                    }
                    key.push(k);
                }
                if !closed {
                    return Err(TemplateError::UnbalancedBrace { position });
                }

                match key.as_str() {
                    "name" => out.push_str(ctx.name),
                    "value" => out.push_str(ctx.value),
                    "unit" => out.push_str(&ctx.unit_text()),
                    "section" => out.push_str(ctx.section),
                    _ => return Err(TemplateError::UnknownPlaceholder(key)),
                }
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnbalancedBrace { position });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
