//! Greedy line breaking over styled runs.

use crate::document::TextRun;
use ods_style::{ComputedStyle, TextAlign};
use ods_types::FontVariant;

/// A whitespace-free piece of a word in a single font.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Piece {
    pub text: String,
    pub font: FontVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Word {
    pub pieces: Vec<Piece>,
    pub width: f32,
}

/// One line of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub(crate) words: Vec<Word>,
    /// Natural width including one space between words.
    pub width: f32,
    /// Last line of the paragraph or followed by a forced break. Never justified.
    pub ends_paragraph: bool,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.pieces.iter().map(|p| p.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// A run of text positioned relative to the start of its line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LineRun {
    pub x: f32,
    pub text: String,
    pub font: FontVariant,
    pub word_spacing: f32,
}

enum Token {
    Word(Word),
    Break,
}

fn tokenize(runs: &[TextRun], style: &ComputedStyle) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = Word { pieces: Vec::new(), width: 0.0 };

    let finish_word = |word: &mut Word, tokens: &mut Vec<Token>| {
        if !word.pieces.is_empty() {
            tokens.push(Token::Word(std::mem::replace(word, Word { pieces: Vec::new(), width: 0.0 })));
        }
    };

    for run in runs {
        let font = style.font.with_bold(run.bold).with_italic(run.italic);
        for c in run.text.chars() {
            if c == '\n' {
                finish_word(&mut word, &mut tokens);
                tokens.push(Token::Break);
            } else if c.is_whitespace() && c != '\u{a0}' {
                finish_word(&mut word, &mut tokens);
            } else {
                word.width += font.char_width(c) as f32 * style.font_size / 1000.0;
                match word.pieces.last_mut() {
                    Some(piece) if piece.font == font => piece.text.push(c),
                    _ => word.pieces.push(Piece { text: c.to_string(), font }),
                }
            }
        }
    }
    finish_word(&mut word, &mut tokens);
    tokens
}

/// Breaks `runs` into lines no wider than `max_width`.
///
/// Words are never split; a word wider than the line is placed alone.
/// An empty input yields no lines.
pub fn break_lines(runs: &[TextRun], style: &ComputedStyle, max_width: f32) -> Vec<Line> {
    let space = style.font.char_width(' ') as f32 * style.font_size / 1000.0;
    let mut lines = Vec::new();
    let mut current = Line { words: Vec::new(), width: 0.0, ends_paragraph: false };

    for token in tokenize(runs, style) {
        match token {
            Token::Word(word) => {
                let added = if current.words.is_empty() { word.width } else { space + word.width };
                if !current.words.is_empty() && current.width + added > max_width + 0.001 {
                    let width = word.width;
                    let full = std::mem::replace(
                        &mut current,
                        Line { words: vec![word], width, ends_paragraph: false },
                    );
                    lines.push(full);
                } else {
                    current.width += added;
                    current.words.push(word);
                }
            }
            Token::Break => {
                current.ends_paragraph = true;
                lines.push(std::mem::replace(
                    &mut current,
                    Line { words: Vec::new(), width: 0.0, ends_paragraph: false },
                ));
            }
        }
    }
    if !current.words.is_empty() {
        current.ends_paragraph = true;
        lines.push(current);
    }
    lines
}

/// Positions the runs of a line inside a box of `max_width` according to `align`.
pub(crate) fn position_line(line: &Line, style: &ComputedStyle, align: TextAlign, max_width: f32) -> Vec<LineRun> {
    let space = style.font.char_width(' ') as f32 * style.font_size / 1000.0;
    let slack = (max_width - line.width).max(0.0);
    let gaps = line.words.len().saturating_sub(1);

    let (start_x, extra) = match align {
        TextAlign::Left => (0.0, 0.0),
        TextAlign::Center => (slack / 2.0, 0.0),
        TextAlign::Right => (slack, 0.0),
        TextAlign::Justify if !line.ends_paragraph && gaps > 0 => (0.0, slack / gaps as f32),
        TextAlign::Justify => (0.0, 0.0),
    };

    let mut runs: Vec<LineRun> = Vec::new();
    let mut cursor = start_x;
    for (i, word) in line.words.iter().enumerate() {
        if i > 0 {
            // The separating space belongs to the run that precedes it.
            if let Some(run) = runs.last_mut() {
                run.text.push(' ');
            }
            cursor += space + extra;
        }
        for piece in &word.pieces {
            match runs.last_mut() {
                Some(run) if run.font == piece.font => run.text.push_str(&piece.text),
                _ => runs.push(LineRun {
                    x: cursor,
                    text: piece.text.clone(),
                    font: piece.font,
                    word_spacing: extra,
                }),
            }
            cursor += piece.font.text_width(&piece.text, style.font_size);
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;

    fn body() -> ComputedStyle {
        ComputedStyle { font_size: 12.0, line_height: 14.0, ..Default::default() }
    }

    const TEXT: &str = "O presente relatório apresenta uma análise detalhada do indicador de percentual \
        de resíduos sólidos reciclados no estado de Sergipe, alinhado ao Objetivo de Desenvolvimento \
        Sustentável 12 da Agenda 2030 da ONU.";

    #[test]
    fn lines_fit_and_preserve_words() {
        let runs = parse_markup(TEXT);
        let lines = break_lines(&runs, &body(), 200.0);
        assert!(lines.len() > 3);
        for line in &lines {
            assert!(line.width <= 200.0 + 0.001 || line.word_count() == 1);
        }
        let joined = lines.iter().map(Line::text).collect::<Vec<_>>().join(" ");
        assert_eq!(joined, TEXT.split_whitespace().collect::<Vec<_>>().join(" "));
        assert!(lines.last().unwrap().ends_paragraph);
        assert!(!lines[0].ends_paragraph);
    }

    #[test]
    fn forced_breaks_end_lines() {
        let lines = break_lines(&parse_markup("a<br/>b c"), &body(), 400.0);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_paragraph);
        assert_eq!(lines[1].text(), "b c");
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(break_lines(&[], &body(), 100.0).is_empty());
        assert!(break_lines(&parse_markup("   "), &body(), 100.0).is_empty());
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let style = body();
        let lines = break_lines(&parse_markup(TEXT), &style, 220.0);
        let first = &lines[0];
        let runs = position_line(first, &style, TextAlign::Justify, 220.0);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        let spaces = run.text.matches(' ').count() as f32;
        let rendered = style.font.text_width(&run.text, style.font_size) + spaces * run.word_spacing;
        assert!((rendered - 220.0).abs() < 0.01);

        let last = lines.last().unwrap();
        let last_runs = position_line(last, &style, TextAlign::Justify, 220.0);
        assert_eq!(last_runs[0].word_spacing, 0.0);
    }

    #[test]
    fn mixed_fonts_produce_separate_runs() {
        let style = body();
        let lines = break_lines(&parse_markup("<b>Meta:</b> 15% em 2030"), &style, 400.0);
        let runs = position_line(&lines[0], &style, TextAlign::Left, 400.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Meta: ");
        assert!(runs[0].font.is_bold());
        assert_eq!(runs[1].text, "15% em 2030");
        let expected_x = FontVariant::BOLD.text_width("Meta:", 12.0) + FontVariant::REGULAR.text_width(" ", 12.0);
        assert!((runs[1].x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn centered_and_right_aligned() {
        let style = body();
        let lines = break_lines(&parse_markup("Figura 1"), &style, 300.0);
        let width = lines[0].width;
        let center = position_line(&lines[0], &style, TextAlign::Center, 300.0);
        assert!((center[0].x - (300.0 - width) / 2.0).abs() < 1e-3);
        let right = position_line(&lines[0], &style, TextAlign::Right, 300.0);
        assert!((right[0].x - (300.0 - width)).abs() < 1e-3);
    }
}
