//! Custom widgets for the flashcard TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget, Wrap},
};

use super::theme::{icons, Theme};
use crate::models::{Card, Rating};

// ══════════════════════════════════════════════════════════════════════════
// Review Progress Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct ReviewProgress<'a> {
    due: usize,
    reviewed: usize,
    theme: &'a Theme,
}

impl<'a> ReviewProgress<'a> {
    pub fn new(due: usize, reviewed: usize, theme: &'a Theme) -> Self {
        Self { due, reviewed, theme }
    }
}

impl Widget for ReviewProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(format!("{} ", icons::CLOCK), self.theme.stats_due()),
            Span::styled("Total Due: ", self.theme.subtitle()),
            Span::styled(self.due.to_string(), self.theme.stats_due()),
            Span::styled("  │  ", Style::default().fg(self.theme.colors.text_dim)),
            Span::styled(format!("{} ", icons::CHECK), self.theme.stats_reviewed()),
            Span::styled("Reviewed this session: ", self.theme.subtitle()),
            Span::styled(self.reviewed.to_string(), self.theme.stats_reviewed()),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Flashcard Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct FlashcardWidget<'a> {
    card: &'a Card,
    flipped: bool,
    theme: &'a Theme,
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(card: &'a Card, flipped: bool, theme: &'a Theme) -> Self {
        Self { card, flipped, theme }
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label, label_style, border_style) = if self.flipped {
            ("ANSWER", self.theme.card_back(), Style::default().fg(self.theme.colors.success))
        } else {
            ("QUESTION", self.theme.card_front(), Style::default().fg(self.theme.colors.accent))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.colors.bg_card))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(label, label_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let text_style = Style::default()
            .fg(self.theme.colors.text)
            .add_modifier(Modifier::BOLD);
        let mut lines = if self.flipped {
            vec![Line::from(Span::styled(format!("A: {}", self.card.answer), text_style))]
        } else {
            vec![Line::from(Span::styled(format!("Q: {}", self.card.question), text_style))]
        };
        if !self.flipped {
            if let Some(category) = &self.card.category {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Category: {}", category),
                    self.theme.subtitle(),
                )));
            }
        }

        // Center vertically
        let content_height = lines.len() as u16;
        let vertical_padding = inner.height.saturating_sub(content_height) / 2;

        let content_area = Rect {
            x: inner.x + 2,
            y: inner.y + vertical_padding,
            width: inner.width.saturating_sub(4),
            height: inner.height.saturating_sub(vertical_padding),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Rating Buttons Widget
// ══════════════════════════════════════════════════════════════════════════

pub fn rating_color(rating: Rating, theme: &Theme) -> Color {
    match rating {
        Rating::Again => theme.colors.rating_again,
        Rating::Good => theme.colors.rating_good,
    }
}

pub struct RatingButtons<'a> {
    intervals: &'a [(Rating, String)],
    theme: &'a Theme,
}

impl<'a> RatingButtons<'a> {
    pub fn new(intervals: &'a [(Rating, String)], theme: &'a Theme) -> Self {
        Self { intervals, theme }
    }
}

impl Widget for RatingButtons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (i, (rating, interval)) in self.intervals.iter().enumerate().take(chunks.len()) {
            let color = rating_color(*rating, self.theme);

            let button = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));

            let inner = button.inner(chunks[i]);
            button.render(chunks[i], buf);

            let text = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} ", i + 1),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(rating.name(), Style::default().fg(color)),
                ]),
                Line::from(Span::styled(
                    interval.as_str(),
                    Style::default().fg(self.theme.colors.text_muted),
                )),
            ];
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Empty State Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct EmptyState<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> EmptyState<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vertical_padding = area.height.saturating_sub(1) / 2;
        let text_area = Rect {
            y: area.y + vertical_padding,
            height: area.height.saturating_sub(vertical_padding),
            ..area
        };
        Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .style(self.theme.subtitle())
            .wrap(Wrap { trim: true })
            .render(text_area, buf);
    }
}
