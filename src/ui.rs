use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::calculator::LoanField;
use crate::form::{App, Focus, FormVariant, INTEREST_ONLY_NOTE};

pub fn ui(f: &mut Frame, app: &App) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(f.size());

    render_form(f, app, panes[0]);
    render_breakdown(f, app, panes[1]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(app.focus_order().iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    let title = Paragraph::new("Mortgage Calculator")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    for (i, focus) in app.focus_order().iter().enumerate() {
        let area = chunks[i + 1];
        let focused = app.focus == *focus;
        match focus {
            Focus::Field(LoanField::MortgageType) => render_selector(f, app, area, focused),
            Focus::Field(field) => render_text_field(f, app, *field, area, focused),
            Focus::Submit => render_submit(f, area, focused),
        }
    }

    let help = Paragraph::new("Tab/↓/↑: move | Enter: next/submit | ←/→: mortgage type | Ctrl+R: clear | Esc: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(help, chunks[chunks.len() - 1]);
}

fn field_block(label: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(label)
}

fn render_text_field(f: &mut Frame, app: &App, field: LoanField, area: Rect, focused: bool) {
    let raw = app.inputs.text(field).unwrap_or_default();
    let value = match field {
        LoanField::HomePrice | LoanField::DownPayment => format!("${}", raw),
        LoanField::LoanTerm => format!("{} years", raw),
        LoanField::InterestRate => format!("{}%", raw),
        LoanField::MortgageType => raw.to_string(),
    };
    let value = if focused { format!("{value}▏") } else { value };

    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(value)
        .style(style)
        .block(field_block(field.label(), focused));
    f.render_widget(input, area);
}

fn render_selector(f: &mut Frame, app: &App, area: Rect, focused: bool) {
    let (label, style) = match app.inputs.mortgage_type {
        Some(kind) => (kind.label(), Style::default().fg(Color::Yellow)),
        None => ("Select type", Style::default().fg(Color::DarkGray)),
    };
    let line = if focused {
        Line::from(vec![
            Span::raw("◀ "),
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
            Span::raw(" ▶"),
        ])
    } else {
        Line::from(Span::styled(label, style))
    };

    let selector = Paragraph::new(line).block(field_block(LoanField::MortgageType.label(), focused));
    f.render_widget(selector, area);
}

fn render_submit(f: &mut Frame, area: Rect, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    };
    let button = Paragraph::new("Submit")
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(button, area);
}

fn render_breakdown(f: &mut Frame, app: &App, area: Rect) {
    let mut text = vec![Line::from("")];
    if let Some(answer) = &app.answer {
        text.push(Line::from(Span::styled(
            answer.clone(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )));
    }
    if app.shows_interest_only_note() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            INTEREST_ONLY_NOTE,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = match app.variant {
        FormVariant::Typed => "Monthly Mortgage Breakdown",
        FormVariant::Simple => "Monthly Payment",
    };
    let breakdown = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
    f.render_widget(breakdown, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{MortgageType, VALIDATION_MESSAGE};
    use crate::form::MortgageInputs;
    use ratatui::{backend::TestBackend, Terminal};

    fn reference_inputs(mortgage_type: Option<MortgageType>) -> MortgageInputs {
        MortgageInputs {
            home_price: "300000".to_string(),
            down_payment: "60000".to_string(),
            loan_term: "30".to_string(),
            interest_rate: "6".to_string(),
            mortgage_type,
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn typed_form_shows_every_field() {
        let app = App::new(FormVariant::Typed, MortgageInputs::default());
        let screen = render(&app);
        for label in ["Home price", "Down payment", "Loan term (years)", "Interest rate (%)", "Mortgage Type", "Select type", "Submit"] {
            assert!(screen.contains(label), "missing {label}");
        }
        assert!(screen.contains("Monthly Mortgage Breakdown"));
    }

    #[test]
    fn simple_form_has_no_selector() {
        let app = App::new(FormVariant::Simple, MortgageInputs::default());
        let screen = render(&app);
        assert!(!screen.contains("Mortgage Type"));
        assert!(screen.contains("Submit"));
    }

    #[test]
    fn answer_and_note_are_rendered() {
        let mut app = App::new(
            FormVariant::Typed,
            reference_inputs(Some(MortgageType::InterestOnly)),
        );
        app.submit();
        let screen = render(&app);
        assert!(screen.contains("Monthly Payment: $1200.00"));
        assert!(screen.contains(INTEREST_ONLY_NOTE));
        assert!(screen.contains("Interest-Only"));
    }

    #[test]
    fn validation_message_is_rendered_verbatim() {
        let mut app = App::new(FormVariant::Typed, reference_inputs(None));
        app.submit();
        let screen = render(&app);
        assert!(screen.contains(VALIDATION_MESSAGE));
        assert!(!screen.contains(INTEREST_ONLY_NOTE));
    }
}
