// vigil-core/src/infrastructure/template/jinja.rs

// Renders stakeholder-facing artifacts (Markdown report) from the serialized
// analysis report.

use minijinja::{Environment, UndefinedBehavior};

use crate::application::ports::TemplateEngine;
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // A typo in a report template must fail loudly, not print blanks.
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.add_filter("usd", usd);
        env.add_filter("fixed", fixed);

        Self { env }
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, VigilError> {
        self.env
            .render_str(template, context)
            .map_err(|e| VigilError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}

/// `1234.5` -> `$1,234.50`
fn usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round_ties_even() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

fn fixed(value: f64, digits: Option<usize>) -> String {
    format!("{:.*}", digits.unwrap_or(2), value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_usd_filter() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(500.0), "$500.00");
        assert_eq!(usd(1234.5), "$1,234.50");
        assert_eq!(usd(1234567.891), "$1,234,567.89");
        assert_eq!(usd(-42.1), "-$42.10");
        assert_eq!(usd(500.125), "$500.12");
    }

    #[test]
    fn test_render_with_context_and_filters() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let out = renderer.render(
            "{{ total | usd }} at {{ confidence | fixed(1) }} / {{ load | fixed }}",
            &json!({"total": 2500.0, "confidence": 0.8, "load": 2}),
        )?;
        assert_eq!(out, "$2,500.00 at 0.8 / 2.00");
        Ok(())
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let renderer = JinjaRenderer::new();
        let err = renderer.render("{{ missing }}", &json!({})).unwrap_err();
        assert!(matches!(
            err,
            VigilError::Infrastructure(InfrastructureError::TemplateError(_))
        ));
    }
}
