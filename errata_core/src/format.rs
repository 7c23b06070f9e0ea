//! printf-style message formatting
//!
//! Supports `%s`, `%d`, `%i`, `%f`, `%j`, `%o`, `%O` and `%%`. Placeholders
//! without a matching argument are left untouched, surplus arguments are
//! appended separated by a single space. When the first argument is not text
//! every argument is rendered and joined with spaces.

use crate::args::Arg;

/// Format arguments into one message
pub fn format_message(args: &[Arg]) -> String {
    let Some(first) = args.first() else {
        return String::new();
    };

    let Some(template) = first.as_str() else {
        return args.iter().map(inspect).collect::<Vec<_>>().join(" ");
    };

    let mut rest = args[1..].iter();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        let Some(&spec) = chars.peek() else {
            out.push('%');
            break;
        };

        if spec == '%' {
            chars.next();
            out.push('%');
            continue;
        }

        if !matches!(spec, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O') {
            out.push('%');
            continue;
        }

        chars.next();
        match rest.next() {
            Some(arg) => out.push_str(&substitute(spec, arg)),
            None => {
                out.push('%');
                out.push(spec);
            }
        }
    }

    for arg in rest {
        out.push(' ');
        match arg {
            Arg::Text(text) => out.push_str(text),
            other => out.push_str(&inspect(other)),
        }
    }

    out
}

fn substitute(spec: char, arg: &Arg) -> String {
    match spec {
        's' => arg.to_text(),
        'd' => number_to_text(to_number(arg)),
        'i' => match to_number(arg) {
            n if n.is_finite() => number_to_text(n.trunc()),
            _ => "NaN".to_string(),
        },
        'f' => number_to_text(to_number(arg)),
        'j' => to_json(arg),
        _ => inspect(arg),
    }
}

fn to_number(arg: &Arg) -> f64 {
    match arg {
        Arg::Int(value) => *value as f64,
        Arg::Float(value) => *value,
        Arg::Bool(true) => 1.0,
        Arg::Bool(false) => 0.0,
        Arg::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

fn to_json(arg: &Arg) -> String {
    match arg {
        Arg::Text(text) => serde_json::Value::from(text.as_str()).to_string(),
        Arg::Object(value) => value.to_string(),
        other => other.to_text(),
    }
}

/// Debug-style rendering of a single argument
fn inspect(arg: &Arg) -> String {
    match arg {
        Arg::Text(text) => format!("'{}'", text),
        Arg::Object(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
        other => other.to_text(),
    }
}

/// Render a float the way message text expects (`3` rather than `3.0`)
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
