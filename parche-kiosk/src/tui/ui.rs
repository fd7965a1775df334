use ratatui::{prelude::*, widgets::*};
use shared::Category;
use tui_input::Input;

use super::app::{App, RatingRow};
use crate::core::{AdminStage, COMMENT_MAX_CHARS, Screen, SiteList, parse_hex};

pub const HEADER_HEIGHT: u16 = 3;

fn hex_color(hex: Option<&str>, fallback: Color) -> Color {
    hex.and_then(parse_hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(fallback)
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header (logo)
            Constraint::Min(1),                // Screen
            Constraint::Length(1),             // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match app.kiosk.screen() {
        Screen::Loading => draw_message(f, chunks[1], "Cargando...", None),
        Screen::Error => draw_message(
            f,
            chunks[1],
            app.kiosk.error_message().unwrap_or("Error"),
            Some("Enter para reintentar"),
        ),
        Screen::Setup => draw_setup(f, app, chunks[1]),
        Screen::Welcome => draw_message(
            f,
            chunks[1],
            &app.kiosk.branding().welcome_title,
            Some("Presiona Enter para comenzar"),
        ),
        Screen::Invoice => draw_invoice(f, app, chunks[1]),
        Screen::Rating => draw_rating(f, app, chunks[1]),
        Screen::Submitting => draw_message(f, chunks[1], "Enviando tu calificación...", None),
        Screen::Thanks => {
            let seconds = app.kiosk.countdown().remaining().unwrap_or(0);
            draw_message(
                f,
                chunks[1],
                "¡Gracias por tu calificación!",
                Some(&format!("Volviendo en {seconds} segundos")),
            )
        }
    }

    draw_footer(f, app, chunks[2]);

    if let Some(notice) = app.kiosk.notice() {
        draw_notice(f, notice);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let branding = app.kiosk.branding();
    let primary = hex_color(branding.primary_color.as_deref(), Color::Cyan);

    let mut spans = vec![
        Span::styled(
            format!(" {} ", branding.title),
            Style::default().fg(primary).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(branding.store.as_str(), Style::default().fg(Color::Gray)),
    ];
    if app.kiosk.screen() == Screen::Setup {
        spans.push(Span::styled(
            "  Configuración",
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(
                Style::default().fg(hex_color(branding.primary_dark.as_deref(), primary)),
            ),
    );
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let site = app.kiosk.site_id().unwrap_or("-");
    let footer = Paragraph::new(format!(" Sede: {site} | F11 pantalla completa | Ctrl+C salir "))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_message(f: &mut Frame, area: Rect, text: &str, hint: Option<&str>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD))),
    ];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Single line input with its cursor when focused
fn draw_input(f: &mut Frame, area: Rect, input: &Input, title: &str, focused: bool, mask: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let text = if mask {
        "*".repeat(input.value().chars().count())
    } else {
        input.value().to_string()
    };
    let widget = Paragraph::new(text)
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);

    if focused {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn draw_setup(f: &mut Frame, app: &App, area: Rect) {
    let admin = app.kiosk.admin();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    match admin.stage() {
        AdminStage::Pin => {
            draw_input(f, chunks[0], &app.pin, " PIN de administrador ", true, true);
            if admin.pin_error() {
                f.render_widget(
                    Paragraph::new("PIN incorrecto").style(Style::default().fg(Color::Red)),
                    chunks[1],
                );
            }
        }
        AdminStage::SiteSelect => {
            let items: Vec<ListItem> = match admin.sites() {
                SiteList::Loaded(sites) => sites
                    .iter()
                    .map(|site| {
                        let marker = if admin.selected() == Some(site.codigo_pv.as_str()) {
                            "● "
                        } else {
                            "  "
                        };
                        ListItem::new(format!("{marker}{}", site.label()))
                    })
                    .collect(),
                SiteList::Failed(_) => vec![ListItem::new(admin.placeholder())
                    .style(Style::default().fg(Color::Red))],
                _ => vec![ListItem::new(admin.placeholder())],
            };

            let mut state = ListState::default();
            if matches!(admin.sites(), SiteList::Loaded(_)) {
                state.select(Some(app.site_cursor));
            }
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" Sede "))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            f.render_stateful_widget(list, chunks[2], &mut state);

            let save_style = if admin.can_save() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            f.render_widget(
                Paragraph::new("Espacio seleccionar | Enter guardar").style(save_style),
                chunks[1],
            );
        }
    }
}

fn draw_invoice(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new("Ingresa tu número de factura")
            .style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let prefix = app.kiosk.branding().invoice_prefix.as_deref().unwrap_or("");
    let title = if prefix.is_empty() {
        " Factura ".to_string()
    } else {
        format!(" Factura ({prefix}) ")
    };
    draw_input(f, chunks[1], &app.invoice, &title, true, false);

    f.render_widget(
        Paragraph::new("Enter continuar | Esc omitir").style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn rating_line(app: &App, category: Category, focused: bool) -> Line<'static> {
    let primary = hex_color(app.kiosk.branding().primary_color.as_deref(), Color::Cyan);
    let current = app.kiosk.form().rating(category).map(|r| r.value());

    let mut spans = vec![Span::styled(
        format!("{:<16}", category.label()),
        if focused {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        },
    )];
    for value in 1..=5u8 {
        let style = if current == Some(value) {
            Style::default().fg(Color::Black).bg(primary)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("[{value}]"), style));
    }
    Line::from(spans)
}

fn draw_rating(f: &mut Frame, app: &App, area: Rect) {
    let table = app.kiosk.branding().table;
    let mut constraints = vec![Constraint::Length(Category::ALL.len() as u16 + 1)];
    if table.visible {
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;

    let lines: Vec<Line> = Category::ALL
        .into_iter()
        .map(|c| rating_line(app, c, app.row == RatingRow::Category(c)))
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[next]);
    next += 1;

    if table.visible {
        draw_input(
            f,
            chunks[next],
            &app.table,
            &format!(" {} ", table.label),
            app.row == RatingRow::Table,
            false,
        );
        let form = app.kiosk.form();
        let hint_style = if form.table_error().is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hint = form.table_hint(app.kiosk.table_policy()).unwrap_or("");
        f.render_widget(Paragraph::new(hint).style(hint_style), chunks[next + 1]);
        next += 2;
    }

    draw_input(
        f,
        chunks[next],
        &app.comment,
        " Comentario (opcional) ",
        app.row == RatingRow::Comment,
        false,
    );
    f.render_widget(
        Paragraph::new(format!("{}/{COMMENT_MAX_CHARS}", app.kiosk.form().char_count()))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[next + 1],
    );
    next += 2;

    let enabled = app.kiosk.submit_enabled();
    let mut submit_style = if enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if app.row == RatingRow::Submit {
        submit_style = submit_style.add_modifier(Modifier::REVERSED);
    }
    f.render_widget(
        Paragraph::new(" Enviar calificación ").style(submit_style),
        chunks[next],
    );
}

fn draw_notice(f: &mut Frame, notice: &str) {
    let area = centered_rect(60, 30, f.area());
    let popup = Paragraph::new(vec![
        Line::from(Span::styled(notice, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("Enter para continuar", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Error al enviar ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
