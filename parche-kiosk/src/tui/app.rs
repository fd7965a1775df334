use std::io::Stdout;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use shared::Category;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use super::{TerminalDisplay, ui};
use crate::core::{
    AdminStage, FormField, FullscreenControl, Kiosk, KioskError, Screen, SiteList,
};

/// Focusable rows of the rating screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingRow {
    Category(Category),
    Table,
    Comment,
    Submit,
}

pub struct App {
    pub kiosk: Kiosk,
    pub display: TerminalDisplay,
    pub invoice: Input,
    pub table: Input,
    pub comment: Input,
    pub pin: Input,
    pub row: RatingRow,
    pub site_cursor: usize,
    pub should_quit: bool,
    redraw: bool,
    table_flagged: bool,
}

impl App {
    pub fn new(kiosk: Kiosk, display: TerminalDisplay) -> Self {
        Self {
            kiosk,
            display,
            invoice: Input::default(),
            table: Input::default(),
            comment: Input::default(),
            pin: Input::default(),
            row: RatingRow::Category(Category::Servicio),
            site_cursor: 0,
            should_quit: false,
            redraw: false,
            table_flagged: false,
        }
    }

    /// Rows shown on the rating screen for the active site
    pub fn rating_rows(&self) -> Vec<RatingRow> {
        let mut rows: Vec<RatingRow> = Category::ALL.into_iter().map(RatingRow::Category).collect();
        if self.kiosk.branding().table.visible {
            rows.push(RatingRow::Table);
        }
        rows.push(RatingRow::Comment);
        rows.push(RatingRow::Submit);
        rows
    }

    /// Pull field values from the kiosk, which owns the draft
    pub fn sync_inputs(&mut self) {
        let form = self.kiosk.form();
        sync(&mut self.invoice, form.invoice_input());
        sync(&mut self.table, form.table_input());
        sync(&mut self.comment, form.comment());
        sync(&mut self.pin, self.kiosk.admin().pin_input());

        // Jump to the table row when a submit attempt flagged it
        let table_flagged = form.table_error().is_some() && form.focus() == Some(FormField::Table);
        if table_flagged && !self.table_flagged {
            self.row = RatingRow::Table;
        }
        self.table_flagged = table_flagged;
        if !self.rating_rows().contains(&self.row) {
            self.row = RatingRow::Category(Category::Servicio);
        }
    }

    /// The terminal must be cleared after a fullscreen switch
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn interaction(&mut self) -> anyhow::Result<()> {
        let was_fullscreen = self.display.is_fullscreen();
        self.kiosk.on_user_interaction(&mut self.display)?;
        self.redraw |= was_fullscreen != self.display.is_fullscreen();
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, height: u16) {
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return;
        }
        // Header (logo) and footer rows count as logo taps
        if mouse.row < ui::HEADER_HEIGHT || mouse.row + 1 >= height {
            self.kiosk.logo_tap();
        }
    }

    pub async fn handle_key(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        // ========== Global keys ==========
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char(c) if ctrl => {
                if self.kiosk.handle_chord(ctrl, shift, c) {
                    self.pin.reset();
                }
                return Ok(());
            }
            KeyCode::F(11) => {
                self.kiosk.toggle_fullscreen(&mut self.display)?;
                self.redraw = true;
                return Ok(());
            }
            KeyCode::F(9) => {
                self.kiosk.logo_tap();
                return Ok(());
            }
            _ => {}
        }

        if self.kiosk.notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.kiosk.dismiss_notice();
            }
            return Ok(());
        }

        match self.kiosk.screen() {
            Screen::Welcome => {
                if key.code == KeyCode::Enter {
                    self.kiosk.start_from_welcome();
                }
            }
            Screen::Invoice => self.handle_invoice_key(key),
            Screen::Rating => self.handle_rating_key(key, terminal).await?,
            Screen::Setup => self.handle_setup_key(key).await,
            Screen::Error => {
                if key.code == KeyCode::Enter {
                    self.kiosk.init().await?;
                }
            }
            Screen::Loading | Screen::Submitting | Screen::Thanks => {}
        }
        Ok(())
    }

    fn handle_invoice_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.kiosk.continue_invoice(),
            KeyCode::Esc => self.kiosk.skip_invoice(),
            _ => {
                self.invoice.handle_event(&Event::Key(key));
                self.kiosk.set_invoice_input(self.invoice.value());
            }
        }
    }

    async fn handle_rating_key(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let rows = self.rating_rows();
        let index = rows.iter().position(|r| *r == self.row).unwrap_or(0);

        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.row = rows[index.saturating_sub(1)];
                return Ok(());
            }
            KeyCode::Down | KeyCode::Tab => {
                self.row = rows[(index + 1).min(rows.len() - 1)];
                return Ok(());
            }
            _ => {}
        }

        match self.row {
            RatingRow::Category(category) => {
                if let KeyCode::Char(c @ '1'..='5') = key.code {
                    let value = c as u8 - b'0';
                    self.kiosk.set_rating(category, value)?;
                    self.row = rows[(index + 1).min(rows.len() - 1)];
                }
            }
            RatingRow::Table => {
                self.kiosk.focus_field(FormField::Table);
                self.table.handle_event(&Event::Key(key));
                self.kiosk.set_table_number(self.table.value());
            }
            RatingRow::Comment => {
                self.kiosk.focus_field(FormField::Comment);
                self.comment.handle_event(&Event::Key(key));
                self.kiosk.set_comment(self.comment.value());
            }
            RatingRow::Submit => {
                if key.code == KeyCode::Enter {
                    self.submit(terminal).await?;
                }
            }
        }
        Ok(())
    }

    async fn submit(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let submission = match self.kiosk.begin_submission() {
            Ok(submission) => submission,
            // Field errors are rendered from the form state
            Err(KioskError::Form(_)) | Err(KioskError::SubmissionInFlight) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        terminal.draw(|f| ui::draw(f, self))?;

        // Failures are shown as a notice by the kiosk
        if let Err(e) = self.kiosk.complete_submission(&submission).await {
            tracing::debug!(error = %e, "Submission failed");
        }
        Ok(())
    }

    async fn handle_setup_key(&mut self, key: KeyEvent) {
        match self.kiosk.admin().stage() {
            AdminStage::Pin => match key.code {
                KeyCode::Enter => {
                    if self.kiosk.verify_pin().await {
                        self.site_cursor = self.kiosk.admin().selected_index().unwrap_or(0);
                    }
                }
                _ => {
                    self.pin.handle_event(&Event::Key(key));
                    self.kiosk.set_pin_input(self.pin.value());
                }
            },
            AdminStage::SiteSelect => {
                let count = match self.kiosk.admin().sites() {
                    SiteList::Loaded(sites) => sites.len(),
                    SiteList::Failed(_) => {
                        if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
                            self.kiosk.retry_sites().await;
                            self.site_cursor = self.kiosk.admin().selected_index().unwrap_or(0);
                        }
                        return;
                    }
                    _ => return,
                };
                if count == 0 {
                    return;
                }

                match key.code {
                    KeyCode::Up => self.site_cursor = self.site_cursor.saturating_sub(1),
                    KeyCode::Down => self.site_cursor = (self.site_cursor + 1).min(count - 1),
                    KeyCode::Char(' ') => self.select_cursor(),
                    KeyCode::Enter => {
                        self.select_cursor();
                        if let Err(e) = self.kiosk.save_site().await {
                            tracing::debug!(error = %e, "Site not saved");
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn select_cursor(&mut self) {
        let site_id = match self.kiosk.admin().sites() {
            SiteList::Loaded(sites) => sites.get(self.site_cursor).map(|s| s.codigo_pv.clone()),
            _ => None,
        };
        self.kiosk.select_site(site_id.as_deref());
    }
}

fn sync(input: &mut Input, value: &str) {
    if input.value() != value {
        *input = Input::new(value.to_string());
    }
}
