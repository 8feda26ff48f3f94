//! Inline markup for paragraphs: `<b>`, `<i>`, `<br/>` and a few entities.

use crate::document::TextRun;

/// Splits marked-up text into runs of uniform weight and style.
///
/// Line breaks (`<br/>`) become `'\n'` characters inside the runs. Tags that
/// are not recognised are kept as literal text.
pub fn parse_markup(input: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut bold = 0u32;
    let mut italic = 0u32;
    let mut rest = input;

    let flush = |current: &mut String, runs: &mut Vec<TextRun>, bold: u32, italic: u32| {
        if !current.is_empty() {
            runs.push(TextRun {
                text: std::mem::take(current),
                bold: bold > 0,
                italic: italic > 0,
            });
        }
    };

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(end) = rest.find('>') {
                let tag = rest[1..end].trim().to_ascii_lowercase();
                let recognised = match tag.as_str() {
                    "b" | "strong" => {
                        flush(&mut current, &mut runs, bold, italic);
                        bold += 1;
                        true
                    }
                    "/b" | "/strong" => {
                        flush(&mut current, &mut runs, bold, italic);
                        bold = bold.saturating_sub(1);
                        true
                    }
                    "i" | "em" => {
                        flush(&mut current, &mut runs, bold, italic);
                        italic += 1;
                        true
                    }
                    "/i" | "/em" => {
                        flush(&mut current, &mut runs, bold, italic);
                        italic = italic.saturating_sub(1);
                        true
                    }
                    "br" | "br/" | "br /" => {
                        current.push('\n');
                        true
                    }
                    _ => false,
                };
                if recognised {
                    rest = &rest[end + 1..];
                    continue;
                }
                log::warn!("Unknown markup tag '<{}>' kept as text", tag);
            }
        } else if c == '&' {
            if let Some((entity, len)) = decode_entity(rest) {
                current.push(entity);
                rest = &rest[len..];
                continue;
            }
        }
        current.push(c);
        rest = &rest[c.len_utf8()..];
    }
    flush(&mut current, &mut runs, bold, italic);
    runs
}

fn decode_entity(s: &str) -> Option<(char, usize)> {
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];
    ENTITIES
        .iter()
        .find(|(name, _)| s.starts_with(name))
        .map(|(name, c)| (*c, name.len()))
}

/// The text of a list of runs without any styling.
pub(crate) fn plain_text(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|r| r.text.as_str())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, bold: bool, italic: bool) -> TextRun {
        TextRun { text: text.to_string(), bold, italic }
    }

    #[test]
    fn plain_text_is_a_single_run() {
        assert_eq!(parse_markup("Sergipe reciclou 6,2%"), vec![run("Sergipe reciclou 6,2%", false, false)]);
    }

    #[test]
    fn bold_lead_followed_by_regular_text() {
        let runs = parse_markup("<b>Curto prazo (2025-2026):</b> Ampliar a coleta");
        assert_eq!(
            runs,
            vec![run("Curto prazo (2025-2026):", true, false), run(" Ampliar a coleta", false, false)]
        );
    }

    #[test]
    fn nested_bold_italic() {
        let runs = parse_markup("<i>a <b>b</b></i>");
        assert_eq!(runs, vec![run("a ", false, true), run("b", true, true)]);
    }

    #[test]
    fn line_breaks_and_entities() {
        let runs = parse_markup("Data: 01/02/2025<br/>Fonte: A &amp; B &lt;3&gt;");
        assert_eq!(runs, vec![run("Data: 01/02/2025\nFonte: A & B <3>", false, false)]);
    }

    #[test]
    fn unknown_tags_and_bare_ampersands_stay_literal() {
        let runs = parse_markup("<u>x</u> & y");
        assert_eq!(runs, vec![run("<u>x</u> & y", false, false)]);
    }

    #[test]
    fn plain_text_collapses_whitespace() {
        assert_eq!(plain_text(&parse_markup("<b>3.</b>  RESULTADOS\n")), "3. RESULTADOS");
    }
}
