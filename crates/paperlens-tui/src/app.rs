use std::path::PathBuf;

use paperlens_core::{
    Analyzer, Comparator, PlaceholderAnalyzer, PlaceholderComparator, Session, UploadPhase,
    UploadProgress, title_from_filename,
};

use crate::action::Action;
use crate::model::picker::FilePicker;
use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Which view is currently displayed. Views are switched directly; there
/// is no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Library,
    Upload,
    Compare,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Library, Screen::Upload, Screen::Compare];

    pub fn title(self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::Upload => "Upload Paper",
            Self::Compare => "Compare Papers",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Library => 0,
            Self::Upload => 1,
            Self::Compare => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Library => Self::Upload,
            Self::Upload => Self::Compare,
            Self::Compare => Self::Library,
        }
    }
}

/// One-line feedback shown under the active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(s) | Self::Success(s) | Self::Warning(s) => s,
        }
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub session: Session,
    analyzer: Box<dyn Analyzer>,
    comparator: Box<dyn Comparator>,
    pub picker: FilePicker,
    pub upload: UploadPhase,
    /// File currently being extracted, while a batch runs.
    pub current_file: Option<String>,
    /// Paths waiting to be handed to the backend by the event loop.
    upload_request: Option<Vec<PathBuf>>,
    pub library_cursor: usize,
    pub expanded: bool,
    pub compare_cursor: usize,
    pub result_scroll: u16,
    pub notice: Option<Notice>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Height of the visible list area (set on resize, used for page up/down).
    pub visible_rows: usize,
}

impl App {
    pub fn new(session: Session, picker: FilePicker) -> Self {
        let analyzer = Box::new(PlaceholderAnalyzer::new(session.limits()));
        Self::with_engines(session, picker, analyzer, Box::new(PlaceholderComparator))
    }

    pub fn with_engines(
        session: Session,
        picker: FilePicker,
        analyzer: Box<dyn Analyzer>,
        comparator: Box<dyn Comparator>,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Library,
            session,
            analyzer,
            comparator,
            picker,
            upload: UploadPhase::Idle,
            current_file: None,
            upload_request: None,
            library_cursor: 0,
            expanded: false,
            compare_cursor: 0,
            result_scroll: 0,
            notice: None,
            tick: 0,
            theme: Theme::lens(),
            should_quit: false,
            show_help: false,
            visible_rows: 20,
        };
        app.refresh_upload_phase();
        app
    }

    /// Hand over the files the user asked to analyze, if any.
    pub fn take_upload_request(&mut self) -> Option<Vec<PathBuf>> {
        self.upload_request.take()
    }

    fn refresh_upload_phase(&mut self) {
        if self.upload.is_processing() {
            return;
        }
        let files = self.picker.chosen_names();
        self.upload = if files.is_empty() {
            UploadPhase::Idle
        } else {
            UploadPhase::Uploading { files }
        };
    }

    fn start_upload(&mut self) {
        if self.upload.is_processing() {
            return;
        }
        let paths = self.picker.chosen_paths();
        if paths.is_empty() {
            self.notice = Some(Notice::Warning(
                "Choose at least one PDF with Space first.".to_string(),
            ));
            return;
        }
        self.upload = UploadPhase::Processing(UploadProgress {
            done: 0,
            total: paths.len(),
        });
        self.notice = None;
        self.upload_request = Some(paths);
    }

    fn toggle_compare_selection(&mut self) {
        let Some(paper) = self.session.papers().get(self.compare_cursor) else {
            return;
        };
        let id = paper.id;
        if let Err(e) = self.session.toggle(id) {
            self.notice = Some(Notice::Warning(e.to_string()));
        }
    }

    fn run_comparison(&mut self) {
        let limits = self.session.limits().clone();
        if self.session.papers().len() < limits.min_selection {
            self.notice = Some(Notice::Warning(format!(
                "You need at least {} papers to compare. Upload more papers first.",
                limits.min_selection
            )));
            return;
        }
        match self.session.compare(self.comparator.as_ref()) {
            Some(_) => {
                self.result_scroll = 0;
                self.notice = Some(Notice::Success("Comparison complete!".to_string()));
            }
            None => {
                self.notice = Some(Notice::Warning(format!(
                    "Select {}-{} papers to compare.",
                    limits.min_selection, limits.max_selection
                )));
            }
        }
    }

    /// Length of the list the cursor moves over on the current screen.
    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Library | Screen::Compare => self.session.papers().len(),
            Screen::Upload => self.picker.entries.len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Library => &mut self.library_cursor,
            Screen::Upload => &mut self.picker.cursor,
            Screen::Compare => &mut self.compare_cursor,
        }
    }

    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::ToggleHelp | Action::Dismiss => {
                    self.show_help = false;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Action::Resize(_w, h) => {
                    self.visible_rows = (h as usize).saturating_sub(8);
                }
                _ => {} // swallow everything else
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::Show(screen) => {
                self.screen = screen;
            }
            Action::NextScreen => {
                self.screen = self.screen.next();
            }
            Action::Dismiss => {
                if self.expanded {
                    self.expanded = false;
                } else {
                    self.notice = None;
                }
            }
            Action::MoveDown => {
                let max = self.list_len().saturating_sub(1);
                let cursor = self.cursor_mut();
                if *cursor < max {
                    *cursor += 1;
                }
            }
            Action::MoveUp => {
                let cursor = self.cursor_mut();
                *cursor = cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                if self.screen == Screen::Compare {
                    self.result_scroll = self.result_scroll.saturating_add(page as u16);
                } else {
                    let max = self.list_len().saturating_sub(1);
                    let cursor = self.cursor_mut();
                    *cursor = (*cursor + page).min(max);
                }
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                if self.screen == Screen::Compare {
                    self.result_scroll = self.result_scroll.saturating_sub(page as u16);
                } else {
                    let cursor = self.cursor_mut();
                    *cursor = cursor.saturating_sub(page);
                }
            }
            Action::GoTop => *self.cursor_mut() = 0,
            Action::GoBottom => {
                let max = self.list_len().saturating_sub(1);
                *self.cursor_mut() = max;
            }
            Action::Confirm => match self.screen {
                Screen::Library => {
                    if !self.session.is_empty() {
                        self.expanded = !self.expanded;
                    }
                }
                Screen::Upload => self.start_upload(),
                Screen::Compare => self.run_comparison(),
            },
            Action::ToggleSelect => match self.screen {
                Screen::Upload => {
                    if !self.upload.is_processing() {
                        self.picker.toggle_current();
                        self.refresh_upload_phase();
                    }
                }
                Screen::Compare => self.toggle_compare_selection(),
                Screen::Library => {}
            },
            Action::Compare => {
                if self.screen == Screen::Compare {
                    self.run_comparison();
                }
            }
            Action::ResetComparison => {
                if self.screen == Screen::Compare && self.session.comparison().is_some() {
                    self.session.reset_comparison();
                    self.result_scroll = 0;
                    self.notice = Some(Notice::Info("Comparison cleared.".to_string()));
                }
            }
            Action::Rescan => {
                if self.screen == Screen::Upload && !self.upload.is_processing() {
                    match self.picker.rescan() {
                        Ok(()) => self.refresh_upload_phase(),
                        Err(e) => {
                            self.notice = Some(Notice::Warning(format!(
                                "Could not read {}: {e}",
                                self.picker.dir.display()
                            )));
                        }
                    }
                }
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                // Rough estimate: total height minus tabs/notice/footer/borders
                self.visible_rows = (h as usize).saturating_sub(8);
            }
            Action::None => {}
        }
        false
    }

    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::FileStarted { name, .. } => {
                self.current_file = Some(name);
            }
            BackendEvent::FileExtracted {
                index,
                total,
                name,
                extraction,
            } => {
                let title = title_from_filename(&name);
                let record = self
                    .session
                    .ingest(self.analyzer.as_ref(), &title, &extraction);
                log::info!("analyzed '{}' as paper #{}", record.title, record.id);
                self.upload = UploadPhase::Processing(UploadProgress {
                    done: index + 1,
                    total,
                });
            }
            BackendEvent::BatchComplete { total } => {
                self.current_file = None;
                self.upload = UploadPhase::Idle;
                self.picker.clear_chosen();
                self.notice = Some(Notice::Success(format!(
                    "✓ Successfully analyzed {total} paper(s)!"
                )));
            }
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        match self.screen {
            Screen::Library => crate::view::library::render(f, self),
            Screen::Upload => crate::view::upload::render(f, self),
            Screen::Compare => crate::view::compare::render(f, self),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperlens_core::Extraction;

    fn app_with_files(names: &[&str]) -> App {
        let picker = FilePicker {
            entries: names.iter().map(PathBuf::from).collect(),
            ..Default::default()
        };
        App::new(Session::new(), picker)
    }

    fn deliver(app: &mut App, names: &[&str]) {
        let total = names.len();
        for (index, name) in names.iter().enumerate() {
            app.handle_backend_event(BackendEvent::FileStarted {
                index,
                total,
                name: name.to_string(),
            });
            app.handle_backend_event(BackendEvent::FileExtracted {
                index,
                total,
                name: name.to_string(),
                extraction: Extraction::Text(format!("text of {name}")),
            });
        }
        app.handle_backend_event(BackendEvent::BatchComplete { total });
    }

    #[test]
    fn views_switch_directly() {
        let mut app = app_with_files(&[]);
        app.update(Action::Show(Screen::Compare));
        assert_eq!(app.screen, Screen::Compare);
        app.update(Action::NextScreen);
        assert_eq!(app.screen, Screen::Library);
    }

    #[test]
    fn upload_walks_idle_uploading_processing_idle() {
        let mut app = app_with_files(&["a.pdf", "b.pdf"]);
        app.update(Action::Show(Screen::Upload));
        assert_eq!(app.upload, UploadPhase::Idle);

        app.update(Action::ToggleSelect);
        app.update(Action::MoveDown);
        app.update(Action::ToggleSelect);
        assert_eq!(
            app.upload,
            UploadPhase::Uploading {
                files: vec!["a.pdf".into(), "b.pdf".into()]
            }
        );

        app.update(Action::Confirm);
        assert_eq!(
            app.upload,
            UploadPhase::Processing(UploadProgress { done: 0, total: 2 })
        );
        assert_eq!(app.take_upload_request().map(|p| p.len()), Some(2));
        assert!(app.take_upload_request().is_none());

        app.handle_backend_event(BackendEvent::FileExtracted {
            index: 0,
            total: 2,
            name: "a.pdf".into(),
            extraction: Extraction::Text("alpha".into()),
        });
        assert_eq!(
            app.upload,
            UploadPhase::Processing(UploadProgress { done: 1, total: 2 })
        );

        app.handle_backend_event(BackendEvent::FileExtracted {
            index: 1,
            total: 2,
            name: "b.pdf".into(),
            extraction: Extraction::Failed {
                reason: "broken".into(),
            },
        });
        app.handle_backend_event(BackendEvent::BatchComplete { total: 2 });

        assert_eq!(app.upload, UploadPhase::Idle);
        assert!(app.picker.chosen.is_empty());
        let papers = app.session.papers();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "a");
        assert_eq!(papers[1].abstract_text, paperlens_core::EXTRACTION_ERROR_SENTINEL);
    }

    #[test]
    fn analyze_without_files_warns() {
        let mut app = app_with_files(&["a.pdf"]);
        app.update(Action::Show(Screen::Upload));
        app.update(Action::Confirm);
        assert!(matches!(app.notice, Some(Notice::Warning(_))));
        assert!(app.take_upload_request().is_none());
    }

    #[test]
    fn compare_needs_two_then_reset_clears() {
        let mut app = app_with_files(&[]);
        deliver(&mut app, &["x.pdf", "y.pdf", "z.pdf"]);
        app.update(Action::Show(Screen::Compare));

        app.update(Action::ToggleSelect);
        app.update(Action::Compare);
        assert!(app.session.comparison().is_none());

        app.update(Action::GoBottom);
        app.update(Action::ToggleSelect);
        app.update(Action::Compare);
        let cmp = app.session.comparison().expect("comparison stored");
        let titles: Vec<&str> = cmp.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "z"]);

        app.update(Action::ResetComparison);
        assert!(app.session.comparison().is_none());
    }

    #[test]
    fn sixth_selection_is_refused() {
        let mut app = app_with_files(&[]);
        deliver(&mut app, &["1.pdf", "2.pdf", "3.pdf", "4.pdf", "5.pdf", "6.pdf"]);
        app.update(Action::Show(Screen::Compare));
        for _ in 0..6 {
            app.update(Action::ToggleSelect);
            app.update(Action::MoveDown);
        }
        assert_eq!(app.session.selection().len(), 5);
        assert!(matches!(app.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn help_swallows_navigation() {
        let mut app = app_with_files(&[]);
        app.update(Action::ToggleHelp);
        app.update(Action::Show(Screen::Upload));
        assert_eq!(app.screen, Screen::Library);
        app.update(Action::Dismiss);
        assert!(!app.show_help);
    }
}
