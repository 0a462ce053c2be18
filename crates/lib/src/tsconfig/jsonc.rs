//! Commented JSON.
//!
//! Config files are routinely written with `//` and `/* */` comments and
//! trailing commas. These are stripped before handing the text to
//! `serde_json`; string contents are left untouched.

use serde_json::Value;

/// Parse JSON text that may contain comments and trailing commas.
pub fn parse(text: &str) -> Result<Value, serde_json::Error> {
  serde_json::from_str(&strip(text))
}

/// Remove comments and trailing commas, keeping line structure so that
/// parse errors still point at the right line.
pub fn strip(text: &str) -> String {
  let without_comments = strip_comments(text);
  strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut chars = text.chars().peekable();
  let mut in_string = false;

  while let Some(c) = chars.next() {
    if in_string {
      out.push(c);
      match c {
        '\\' => {
          if let Some(escaped) = chars.next() {
            out.push(escaped);
          }
        }
        '"' => in_string = false,
        _ => {}
      }
      continue;
    }

    match (c, chars.peek()) {
      ('"', _) => {
        in_string = true;
        out.push(c);
      }
      ('/', Some('/')) => {
        for next in chars.by_ref() {
          if next == '\n' {
            out.push('\n');
            break;
          }
        }
      }
      ('/', Some('*')) => {
        chars.next();
        let mut prev = '\0';
        for next in chars.by_ref() {
          if next == '\n' {
            out.push('\n');
          }
          if prev == '*' && next == '/' {
            break;
          }
          prev = next;
        }
      }
      _ => out.push(c),
    }
  }

  out
}

fn strip_trailing_commas(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len());
  let mut in_string = false;
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];

    if in_string {
      out.push(c);
      if c == '\\' {
        if let Some(&escaped) = chars.get(i + 1) {
          out.push(escaped);
          i += 1;
        }
      } else if c == '"' {
        in_string = false;
      }
      i += 1;
      continue;
    }

    if c == '"' {
      in_string = true;
    } else if c == ',' {
      let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
      if matches!(next, Some('}') | Some(']')) {
        i += 1;
        continue;
      }
    }

    out.push(c);
    i += 1;
  }

  out
}
