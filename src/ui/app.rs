//! Main application state and logic.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::theme::{icons, Theme};
use super::widgets::{EmptyState, FlashcardWidget, KeyHints, RatingButtons, ReviewProgress};
use crate::collection::{Collection, CollectionError};
use crate::config::Config;
use crate::models::{Card, CategoryFilter, Rating};
use crate::scheduler;

const STATUS_TTL: Duration = Duration::from_secs(4);
const EMPTY_MESSAGE: &str = "No flashcards available. Please add some!";

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Study,
    Review,
    CardForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Question,
    Answer,
    Category,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Category,
            Self::Category => Self::Question,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Question => Self::Category,
            Self::Answer => Self::Question,
            Self::Category => Self::Answer,
        }
    }
}

/// Input state of the add/edit form.
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    /// Id of the card being edited, `None` when adding.
    pub editing: Option<String>,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub focus: FormField,
}

impl CardForm {
    fn for_card(card: &Card) -> Self {
        Self {
            editing: Some(card.id.clone()),
            question: card.question.clone(),
            answer: card.answer.clone(),
            category: card.category.clone().unwrap_or_default(),
            focus: FormField::Question,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Question => &mut self.question,
            FormField::Answer => &mut self.answer,
            FormField::Category => &mut self.category,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    config_path: Option<PathBuf>,
    pub theme: Theme,

    // Cards
    pub collection: Collection,
    pub filter: CategoryFilter,
    pub list_state: ListState,
    pub showing_answer: bool,
    pub delete_pending: bool,

    // Review session
    pub reviewed_count: usize,

    pub form: CardForm,

    // Status message (shown temporarily)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// `config_path` is where the dark mode preference is written; `None` keeps it in memory.
    pub fn new(collection: Collection, config: Config, config_path: Option<PathBuf>) -> Self {
        let theme = Theme::from_dark_mode(config.dark_mode);
        let selected = if collection.is_empty() { None } else { Some(0) };

        Self {
            screen: Screen::Study,
            running: true,
            config,
            config_path,
            theme,
            collection,
            filter: CategoryFilter::All,
            list_state: ListState::default().with_selected(selected),
            showing_answer: false,
            delete_pending: false,
            reviewed_count: 0,
            form: CardForm::default(),
            status_message: None,
        }
    }

    fn today(&self) -> NaiveDate {
        scheduler::today()
    }

    /// Cards listed on the current screen: every card in the filter while
    /// studying, only the due ones while reviewing.
    pub fn visible_cards(&self) -> Vec<&Card> {
        match self.screen {
            Screen::Review => self.collection.due(&self.filter, self.today()),
            Screen::Study | Screen::CardForm => self.collection.filtered(&self.filter),
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        let i = self.list_state.selected()?;
        self.visible_cards().get(i).copied()
    }

    fn selected_card_id(&self) -> Option<String> {
        self.selected_card().map(|c| c.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_cards().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.visible_cards().len();
        if len == 0 {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0);
        let new_i = match (down, i) {
            (true, i) if i + 1 >= len => 0,
            (true, i) => i + 1,
            (false, 0) => len - 1,
            (false, i) => i - 1,
        };
        self.list_state.select(Some(new_i));
        self.showing_answer = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn report(&mut self, result: Result<(), CollectionError>, success: &str) {
        match result {
            Ok(()) => self.set_status(success.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "card operation failed");
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.showing_answer = false;
        self.delete_pending = false;
        self.list_state.select(Some(0));
        self.clamp_selection();
    }

    pub fn toggle_dark_mode(&mut self) {
        let name = self.theme.name.toggled();
        self.theme = Theme::new(name);
        self.config.dark_mode = name.is_dark();
        self.set_status(format!("{} theme", name.display_name()));
        let saved = self.config_path.as_ref().map(|path| self.config.save(path));
        if let Some(Err(e)) = saved {
            tracing::warn!(error = %e, "could not save config");
            self.set_status(format!("Could not save preference: {}", e));
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next(&self.collection.categories());
        self.showing_answer = false;
        self.list_state.select(Some(0));
        self.clamp_selection();
    }

    pub fn open_add_form(&mut self) {
        self.form = CardForm::default();
        self.screen = Screen::CardForm;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(card) = self.selected_card() {
            self.form = CardForm::for_card(card);
            self.screen = Screen::CardForm;
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = CardForm::default();
        self.switch_screen(Screen::Study);
    }

    pub fn submit_form(&mut self) {
        let category = Some(self.form.category.clone());
        let result = match self.form.editing.clone() {
            Some(id) => self
                .collection
                .edit(&id, &self.form.question, &self.form.answer, category)
                .map(|()| "Card updated"),
            None => {
                let today = self.today();
                self.collection
                    .add(&self.form.question, &self.form.answer, category, today)
                    .map(|_| "Card added")
            }
        };

        match result {
            Ok(message) => {
                self.set_status(message.to_string());
                self.form = CardForm::default();
                self.switch_screen(Screen::Study);
            }
            // The form stays open so the input can be corrected
            Err(e @ (CollectionError::EmptyQuestion | CollectionError::EmptyAnswer)) => {
                self.set_status(format!("{}", e));
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving card failed");
                self.set_status(format!("Error: {}", e));
                self.form = CardForm::default();
                self.switch_screen(Screen::Study);
            }
        }
    }

    pub fn delete_selected_card(&mut self) {
        if let Some(id) = self.selected_card_id() {
            let result = self.collection.delete(&id);
            if self.form.editing.as_deref() == Some(id.as_str()) {
                self.form = CardForm::default();
            }
            self.report(result, "Card deleted");
            self.showing_answer = false;
            self.clamp_selection();
        }
        self.delete_pending = false;
    }

    pub fn mark_selected_for_review(&mut self) {
        if let Some(id) = self.selected_card_id() {
            let today = self.today();
            let result = self.collection.mark_for_review(&id, today);
            self.report(result, "Marked for review");
        }
    }

    pub fn rate_selected_card(&mut self, rating: Rating) {
        let Some(id) = self.selected_card_id() else {
            return;
        };
        let today = self.today();
        match self.collection.review(&id, rating, today) {
            Ok(schedule) => {
                self.reviewed_count += 1;
                self.set_status(format!(
                    "{}: next review in {}",
                    rating,
                    scheduler::format_interval(schedule.interval)
                ));
            }
            Err(e) => {
                // The new schedule is already applied in memory when only the save failed
                if matches!(e, CollectionError::Storage(_)) {
                    self.reviewed_count += 1;
                }
                tracing::warn!(error = %e, "review failed");
                self.set_status(format!("Error: {}", e));
            }
        }
        self.showing_answer = false;
        self.clamp_selection();
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Study => self.handle_study_keys(key),
            Screen::Review => self.handle_review_keys(key),
            Screen::CardForm => self.handle_form_keys(key),
        }
    }

    /// Keys shared by the study and review lists. Returns true if handled.
    fn handle_list_keys(&mut self, key: KeyCode) -> bool {
        if self.delete_pending {
            if key == KeyCode::Char('d') {
                self.delete_selected_card();
            } else {
                self.delete_pending = false;
            }
            return true;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('t') => self.toggle_dark_mode(),
            KeyCode::Char('c') => self.cycle_filter(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char(' ') => {
                if self.selected_card().is_some() {
                    self.showing_answer = !self.showing_answer;
                }
            }
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') => {
                if self.selected_card().is_some() {
                    self.delete_pending = true;
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_study_keys(&mut self, key: KeyCode) {
        if self.handle_list_keys(key) {
            return;
        }
        match key {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('m') => self.mark_selected_for_review(),
            KeyCode::Char('r') => self.switch_screen(Screen::Review),
            _ => {}
        }
    }

    fn handle_review_keys(&mut self, key: KeyCode) {
        if self.handle_list_keys(key) {
            return;
        }
        match key {
            KeyCode::Esc | KeyCode::Char('s') => self.switch_screen(Screen::Study),
            KeyCode::Char(c) => {
                if let Some(rating) = Rating::from_key(c) {
                    self.rate_selected_card(rating);
                }
            }
            _ => {}
        }
    }

    fn handle_form_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab => self.form.focus = self.form.focus.next(),
            KeyCode::BackTab => self.form.focus = self.form.focus.prev(),
            KeyCode::Up if self.form.focus == FormField::Category => self.cycle_category(false),
            KeyCode::Down if self.form.focus == FormField::Category => self.cycle_category(true),
            KeyCode::Backspace => {
                self.form.focused_mut().pop();
            }
            KeyCode::Char(c) => self.form.focused_mut().push(c),
            _ => {}
        }
    }

    /// Fill the category field from the categories already in use.
    fn cycle_category(&mut self, forward: bool) {
        let categories = self.collection.categories();
        if categories.is_empty() {
            return;
        }
        let current = categories
            .iter()
            .position(|c| *c == self.form.category.trim());
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => categories.len() - 1,
            (Some(i), true) => (i + 1) % categories.len(),
            (Some(i), false) => (i + categories.len() - 1) % categories.len(),
        };
        self.form.category = categories[next].clone();
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let chunks = Layout::vertical([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Screen
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        self.render_header(frame, chunks[0]);

        match self.screen {
            Screen::Study => self.render_study(frame, chunks[1]),
            Screen::Review => self.render_review(frame, chunks[1]),
            Screen::CardForm => self.render_form(frame, chunks[1]),
        }

        if let Some((ref message, at)) = self.status_message {
            if at.elapsed() < STATUS_TTL {
                let status = Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(self.theme.colors.warning));
                frame.render_widget(status, chunks[2]);
            }
        }

        self.render_hints(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mode_style = |active: bool| {
            if active {
                self.theme.highlight().add_modifier(Modifier::REVERSED)
            } else {
                self.theme.subtitle()
            }
        };
        let theme_icon = if self.theme.name.is_dark() { icons::SUN } else { icons::MOON };

        let title = Line::from(vec![
            Span::styled("FocusStudy", self.theme.title()),
            Span::raw("   "),
            Span::styled(" Study Mode ", mode_style(self.screen != Screen::Review)),
            Span::raw(" "),
            Span::styled(" Review Mode ", mode_style(self.screen == Screen::Review)),
            Span::raw("   "),
            Span::styled(theme_icon, self.theme.key_highlight()),
        ]);
        let filter = Line::from(vec![
            Span::styled("Category: ", self.theme.subtitle()),
            Span::styled(self.filter.label().to_string(), self.theme.highlight()),
        ]);

        frame.render_widget(
            Paragraph::new(vec![title, filter]).alignment(Alignment::Center),
            area,
        );
    }

    fn list_item(&self, card: &Card, today: NaiveDate) -> ListItem<'static> {
        let question: String = card.question.chars().take(30).collect();
        let status = if card.is_new() {
            "(new)".to_string()
        } else if card.is_due(today) {
            "(due)".to_string()
        } else {
            format!("({})", scheduler::format_interval(card.interval))
        };
        ListItem::new(Line::from(vec![
            Span::styled(question, Style::default().fg(self.theme.colors.text)),
            Span::styled(format!(" {}", status), Style::default().fg(self.theme.colors.text_muted)),
        ]))
    }

    /// Card list on the left, selected card on the right.
    fn render_card_panes(&mut self, frame: &mut Frame, area: Rect, list_title: &str) -> Option<(Card, Rect)> {
        let today = self.today();
        let items: Vec<ListItem> = self
            .visible_cards()
            .into_iter()
            .map(|card| self.list_item(card, today))
            .collect();

        if items.is_empty() {
            frame.render_widget(EmptyState::new(EMPTY_MESSAGE, &self.theme), area);
            return None;
        }

        let panes = Layout::horizontal([
            Constraint::Percentage(40),  // Card list
            Constraint::Percentage(60),  // Card
        ])
        .split(area);

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary))
                    .title(format!(" {} ", list_title))
                    .title_style(self.theme.highlight()),
            )
            .highlight_style(self.theme.selected())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, panes[0], &mut self.list_state);

        self.selected_card().cloned().map(|card| (card, panes[1]))
    }

    fn render_study(&mut self, frame: &mut Frame, area: Rect) {
        let Some((card, pane)) = self.render_card_panes(frame, area, "Cards") else {
            return;
        };

        let chunks = Layout::vertical([
            Constraint::Min(7),      // Card
            Constraint::Length(4),   // Schedule details
        ])
        .split(pane);

        frame.render_widget(FlashcardWidget::new(&card, self.showing_answer, &self.theme), chunks[0]);

        let today = self.today();
        let details = vec![
            Line::from(vec![
                Span::styled("Status: ", self.theme.subtitle()),
                Span::styled(due_label(&card, today), Style::default().fg(self.theme.colors.primary)),
            ]),
            Line::from(vec![
                Span::styled("Interval: ", self.theme.subtitle()),
                Span::styled(format!("{} days", card.interval), Style::default().fg(self.theme.colors.text)),
                Span::styled("   Ease: ", self.theme.subtitle()),
                Span::styled(format!("{:.2}", card.ease), Style::default().fg(self.theme.colors.text)),
            ]),
        ];
        let details = Paragraph::new(details).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.text_dim)),
        );
        frame.render_widget(details, chunks[1]);
    }

    fn render_review(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Progress
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // Cards
        ])
        .split(area);

        let due = self.visible_cards().len();
        frame.render_widget(ReviewProgress::new(due, self.reviewed_count, &self.theme), chunks[0]);

        let Some((card, pane)) = self.render_card_panes(frame, chunks[2], "Due") else {
            return;
        };

        let pane_chunks = Layout::vertical([
            Constraint::Min(7),      // Card
            Constraint::Length(4),   // Buttons
        ])
        .split(pane);

        frame.render_widget(FlashcardWidget::new(&card, self.showing_answer, &self.theme), pane_chunks[0]);

        let preview = scheduler::preview_intervals(&card, self.today());
        frame.render_widget(RatingButtons::new(&preview, &self.theme), pane_chunks[1]);
    }

    fn render_form(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(2),   // Title
            Constraint::Length(3),   // Question
            Constraint::Length(3),   // Answer
            Constraint::Length(3),   // Category
            Constraint::Length(1),   // Known categories
            Constraint::Min(0),
        ])
        .split(centered_rect(60, 100, area));

        let title = if self.form.editing.is_some() {
            "Edit Flashcard"
        } else {
            "Add New Flashcard"
        };
        frame.render_widget(
            Paragraph::new(title).alignment(Alignment::Center).style(self.theme.title()),
            chunks[0],
        );

        let fields = [
            (FormField::Question, " Question ", &self.form.question, chunks[1]),
            (FormField::Answer, " Answer ", &self.form.answer, chunks[2]),
            (FormField::Category, " Category ", &self.form.category, chunks[3]),
        ];
        for (field, label, value, field_area) in fields {
            let focused = self.form.focus == field;
            let style = self.theme.field(focused);
            let input = Paragraph::new(value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(style)
                    .title(label)
                    .title_style(style),
            );
            frame.render_widget(input, field_area);

            if focused {
                let max_x = field_area.width.saturating_sub(2);
                let width = (value.width() as u16).min(max_x.saturating_sub(1));
                frame.set_cursor_position((field_area.x + 1 + width, field_area.y + 1));
            }
        }

        let categories = self.collection.categories();
        if !categories.is_empty() {
            let known = Paragraph::new(Line::from(vec![
                Span::styled("Existing: ", self.theme.key_hint()),
                Span::styled(categories.join(", "), self.theme.subtitle()),
            ]))
            .alignment(Alignment::Center);
            frame.render_widget(known, chunks[4]);
        }
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = match self.screen {
            _ if self.delete_pending => &[("d", "confirm delete"), ("any", "cancel")],
            Screen::Study => &[
                ("j/k", "nav"),
                ("Space", "flip"),
                ("a", "add"),
                ("e", "edit"),
                ("d", "delete"),
                ("m", "mark for review"),
                ("c", "category"),
                ("r", "review"),
                ("t", "theme"),
                ("q", "quit"),
            ],
            Screen::Review => &[
                ("j/k", "nav"),
                ("Space", "flip"),
                ("1", "Again"),
                ("2", "Good"),
                ("e", "edit"),
                ("d", "delete"),
                ("c", "category"),
                ("s/Esc", "study"),
                ("t", "theme"),
                ("q", "quit"),
            ],
            Screen::CardForm => &[
                ("Tab", "switch field"),
                ("↑/↓", "category"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ],
        };
        frame.render_widget(KeyHints::new(hints, &self.theme), area);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════

/// Human-readable due status for a card.
fn due_label(card: &Card, today: NaiveDate) -> String {
    let days = (card.due_date - today).num_days();
    if card.is_new() && days > 0 {
        return "New".to_string();
    }
    match days {
        d if d < 0 => format!("Overdue by {} days", -d),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {} days", d),
    }
}

/// Helper function to create a centered rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CardStore, MemoryStore, StorageError};
    use ratatui::{backend::TestBackend, Terminal};
    use std::rc::Rc;
    use tempfile::TempDir;

    fn create_test_app() -> (App, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let collection = Collection::open(Box::new(Rc::clone(&store))).unwrap();
        (App::new(collection, Config::default(), None), store)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn add_card(app: &mut App, question: &str, answer: &str, category: &str) {
        app.handle_key(KeyCode::Char('a'));
        type_text(app, question);
        app.handle_key(KeyCode::Tab);
        type_text(app, answer);
        app.handle_key(KeyCode::Tab);
        type_text(app, category);
        app.handle_key(KeyCode::Enter);
    }

    fn status(app: &App) -> &str {
        app.status_message.as_ref().map(|(m, _)| m.as_str()).unwrap_or("")
    }

    #[test]
    fn test_add_card_through_form() {
        let (mut app, store) = create_test_app();

        add_card(&mut app, "Boiling point of water", "100 C", "Science");

        assert_eq!(app.screen, Screen::Study);
        assert_eq!(app.collection.len(), 1);
        let card = &app.collection.cards()[0];
        assert_eq!(card.question, "Boiling point of water");
        assert_eq!(card.category.as_deref(), Some("Science"));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(status(&app), "Card added");
    }

    #[test]
    fn test_blank_form_stays_open() {
        let (mut app, _store) = create_test_app();

        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "answer only");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.screen, Screen::CardForm);
        assert!(app.collection.is_empty());
        assert_eq!(status(&app), "question must not be empty");
        assert_eq!(app.form.answer, "answer only");
    }

    #[test]
    fn test_form_typing_and_cancel() {
        let (mut app, _store) = create_test_app();

        app.handle_key(KeyCode::Char('a'));
        // Letters that are shortcuts elsewhere are plain input here
        type_text(&mut app, "qtdx");
        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.form.question, "qtd");
        assert!(app.running);

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Study);
        assert!(app.collection.is_empty());
    }

    #[test]
    fn test_edit_prefills_and_saves() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "Old question", "Old answer", "Misc");

        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.screen, Screen::CardForm);
        assert_eq!(app.form.question, "Old question");
        assert_eq!(app.form.category, "Misc");

        type_text(&mut app, "!");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.collection.len(), 1);
        assert_eq!(app.collection.cards()[0].question, "Old question!");
        assert_eq!(status(&app), "Card updated");
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (mut app, store) = create_test_app();
        add_card(&mut app, "Q", "A", "");

        app.handle_key(KeyCode::Char('d'));
        assert!(app.delete_pending);
        app.handle_key(KeyCode::Char('x'));
        assert!(!app.delete_pending);
        assert_eq!(app.collection.len(), 1);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('d'));
        assert!(app.collection.is_empty());
        assert!(store.snapshot().is_empty());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_mark_then_review() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "Q", "A", "");

        // Freshly added cards are not due yet
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.screen, Screen::Review);
        assert!(app.visible_cards().is_empty());

        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(status(&app), "Marked for review");

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.visible_cards().len(), 1);

        app.handle_key(KeyCode::Char(' '));
        assert!(app.showing_answer);
        app.handle_key(KeyCode::Char('2'));

        assert_eq!(app.reviewed_count, 1);
        assert!(!app.showing_answer);
        assert!(app.visible_cards().is_empty());
        let card = &app.collection.cards()[0];
        // round(1 x 2.5) = 3
        assert_eq!(card.interval, 3);
        assert!((card.ease - 2.6).abs() < 1e-9);
        assert_eq!(status(&app), "Good: next review in 3d");
    }

    #[test]
    fn test_again_rating() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "Q", "A", "");
        app.handle_key(KeyCode::Char('m'));
        app.handle_key(KeyCode::Char('r'));

        app.handle_key(KeyCode::Char('1'));

        let card = &app.collection.cards()[0];
        assert_eq!(card.interval, 1);
        assert!((card.ease - 2.3).abs() < 1e-9);
        assert_eq!(app.reviewed_count, 1);
    }

    struct ReadOnlyStore {
        cards: Vec<Card>,
    }

    impl CardStore for ReadOnlyStore {
        fn load(&self) -> Result<Vec<Card>, StorageError> {
            Ok(self.cards.clone())
        }

        fn save(&self, _cards: &[Card]) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "/read-only".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn test_review_counted_when_save_fails() {
        let today = scheduler::today();
        let mut card = Card::new("Q".into(), "A".into(), None, today);
        card.interval = 1;
        card.due_date = today;
        let collection = Collection::open(Box::new(ReadOnlyStore { cards: vec![card] })).unwrap();
        let mut app = App::new(collection, Config::default(), None);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.visible_cards().len(), 1);
        app.handle_key(KeyCode::Char('2'));

        assert_eq!(app.collection.cards()[0].interval, 3);
        assert!(app.visible_cards().is_empty());
        assert_eq!(app.reviewed_count, 1);
        assert!(status(&app).starts_with("Error:"));
    }

    #[test]
    fn test_escape_leaves_review_without_quitting() {
        let (mut app, _store) = create_test_app();

        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Esc);

        assert_eq!(app.screen, Screen::Study);
        assert!(app.running);

        app.handle_key(KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn test_rating_keys_ignored_in_study() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "Q", "A", "");
        app.handle_key(KeyCode::Char('m'));

        app.handle_key(KeyCode::Char('2'));

        assert_eq!(app.reviewed_count, 0);
        assert_eq!(app.collection.cards()[0].interval, 1);
    }

    #[test]
    fn test_category_filter_cycles() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "1+1", "2", "Math");
        add_card(&mut app, "1066", "Hastings", "History");
        add_card(&mut app, "Plain", "card", "");

        assert_eq!(app.visible_cards().len(), 3);

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.filter, CategoryFilter::Category("History".into()));
        assert_eq!(app.visible_cards().len(), 1);
        assert_eq!(app.selected_card().unwrap().question, "1066");

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.filter, CategoryFilter::Category("Math".into()));

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.filter, CategoryFilter::All);
    }

    #[test]
    fn test_category_field_cycles_existing() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "1+1", "2", "Math");
        add_card(&mut app, "1066", "Hastings", "History");

        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.form.focus, FormField::Category);

        app.handle_key(KeyCode::Down);
        assert_eq!(app.form.category, "History");
        app.handle_key(KeyCode::Down);
        assert_eq!(app.form.category, "Math");
        app.handle_key(KeyCode::Up);
        assert_eq!(app.form.category, "History");
    }

    #[test]
    fn test_navigation_wraps() {
        let (mut app, _store) = create_test_app();
        add_card(&mut app, "A", "a", "");
        add_card(&mut app, "B", "b", "");

        assert_eq!(app.list_state.selected(), Some(0));
        app.handle_key(KeyCode::Char('k'));
        assert_eq!(app.list_state.selected(), Some(1));
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_dark_mode_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let collection = Collection::open(Box::new(MemoryStore::new())).unwrap();
        let mut app = App::new(collection, Config::default(), Some(path.clone()));

        app.handle_key(KeyCode::Char('t'));

        assert!(app.config.dark_mode);
        assert!(app.theme.name.is_dark());
        assert!(Config::load(&path).unwrap().dark_mode);
        assert_eq!(status(&app), "Dark theme");

        app.handle_key(KeyCode::Char('t'));
        assert!(!Config::load(&path).unwrap().dark_mode);
    }

    #[test]
    fn test_quit() {
        let (mut app, _store) = create_test_app();
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_due_label() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut card = Card::new("Q".into(), "A".into(), None, today);
        assert_eq!(due_label(&card, today), "New");

        card.interval = 3;
        card.due_date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(due_label(&card, today), "Due in 3 days");
        card.due_date = today;
        assert_eq!(due_label(&card, today), "Due today");
        card.due_date = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        assert_eq!(due_label(&card, today), "Overdue by 3 days");
    }

    #[test]
    fn test_render_screens() {
        let (mut app, _store) = create_test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String = terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains(EMPTY_MESSAGE));

        add_card(&mut app, "Capital of Japan", "Tokyo", "Geo");
        app.handle_key(KeyCode::Char('m'));
        app.handle_key(KeyCode::Char('r'));
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String = terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Total Due: 1"));
        assert!(text.contains("Capital of Japan"));
        assert!(text.contains("Again"));

        app.handle_key(KeyCode::Char('e'));
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String = terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Edit Flashcard"));
    }
}
