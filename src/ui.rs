use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::{
    app::{App, Outcome, PurchaseOutcome, Screen, Tab},
    years_and_months, AmortizationRow, BreakEven, DownPayment, RefinanceResult, SavingsStatus,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Form => render_form_screen(f, app),
        Screen::Schedule => render_schedule_screen(f, app),
    }
}

/// Formats a dollar amount with thousands separators, e.g. `$1,234.56`.
pub fn money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let text = format!("{:.2}", value.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}${}.{}", sign, grouped, cents)
}

fn years_months_text(months: u32) -> String {
    let (years, months) = years_and_months(months);
    format!("{} years and {} months", years, months)
}

fn render_form_screen(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let selected_tab = match app.tab {
        Tab::DownPayment => 0,
        Tab::Refinance => 1,
    };
    let tabs = Tabs::new(vec![Tab::DownPayment.title(), Tab::Refinance.title()])
        .select(selected_tab)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title("Mortgage & Refinance Calculator"),
        )
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);

    render_fields(f, app, body[0]);
    match app.tab {
        Tab::DownPayment => render_purchase_result(f, &app.purchase_result, body[1]),
        Tab::Refinance => render_refinance_result(f, &app.refinance_result, body[1]),
    }

    let help_text = match app.tab {
        Tab::DownPayment => {
            "j/k or ↑/↓: field | Tab: % / $ tax | Space: term | Enter: calculate | ←/→: tab | q: quit"
        }
        Tab::Refinance => {
            "j/k or ↑/↓: field | Space: term | Enter: calculate | s: schedule | e: export CSV | ←/→: tab | q: quit"
        }
    };
    let mut help_lines = vec![Line::from(help_text)];
    if let Some(status) = &app.status {
        help_lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let help = Paragraph::new(help_lines)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);
}

fn render_fields(f: &mut Frame, app: &App, area: Rect) {
    let form = app.current_form();
    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let (label, kind, input) = field.active_entry();
            let selected = i == form.selected;
            let marker = if selected { "▶ " } else { "  " };
            let value_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(kind.display(input), value_style),
            ])
        })
        .collect();

    let fields = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.tab.title()),
    );
    f.render_widget(fields, area);
}

fn labeled(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!("Calculation Error: {}", message),
        Style::default().fg(Color::Red),
    ))]
}

fn render_purchase_result(f: &mut Frame, outcome: &Outcome<PurchaseOutcome>, area: Rect) {
    let text = match outcome {
        Outcome::Pending => vec![Line::from("Press Enter to calculate the down payment.")],
        Outcome::Failed(message) => error_lines(message),
        Outcome::Ready(result) => purchase_lines(result),
    };

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(widget, area);
}

fn purchase_lines(result: &PurchaseOutcome) -> Vec<Line<'static>> {
    let down = &result.down_payment;
    let note = match down {
        DownPayment::NotRequired => "No down payment needed for this target.",
        DownPayment::WithoutPmi { .. } => "At least 20% down, no PMI.",
        DownPayment::WithPmi { .. } => "Below 20% down, PMI included.",
        DownPayment::TwentyPercent { .. } => "Putting 20% down avoids PMI and meets the target.",
    };

    let mut lines = vec![
        labeled(
            "Required Down Payment",
            format!("{} ({:.2}%)", money(down.amount()), down.percent()),
            Color::Green,
        ),
        Line::from(Span::styled(note, Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];

    let savings = match &result.savings {
        Ok(savings) => savings,
        Err(e) => {
            lines.push(Line::from(Span::styled(
                format!("Time to save: {}", e),
                Style::default().fg(Color::Red),
            )));
            return lines;
        }
    };
    lines.push(labeled("Needed incl. closing costs", money(savings.total_needed), Color::Yellow));
    lines.push(labeled("Saved", money(savings.on_hand), Color::Yellow));

    match savings.status {
        SavingsStatus::Funded { surplus } => {
            lines.push(labeled("Over your goal by", money(surplus), Color::Green));
            lines.push(Line::from(Span::styled(
                "Time to save: you already have enough saved!",
                Style::default().fg(Color::Green),
            )));
        }
        SavingsStatus::Saving {
            shortfall,
            percent_remaining,
            monthly_contribution,
            months_to_goal,
        } => {
            lines.push(labeled(
                "Left to save",
                format!("{} ({:.2}%)", money(shortfall), percent_remaining),
                Color::Yellow,
            ));
            lines.push(labeled("Monthly contribution", money(monthly_contribution), Color::White));
            lines.push(labeled("Time to save", years_months_text(months_to_goal), Color::Cyan));
        }
        SavingsStatus::CannotSave {
            shortfall,
            percent_remaining,
            ..
        } => {
            lines.push(labeled(
                "Left to save",
                format!("{} ({:.2}%)", money(shortfall), percent_remaining),
                Color::Yellow,
            ));
            lines.push(Line::from(Span::styled(
                "Time to save: monthly expenses are greater than or equal to income.",
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines
}

fn render_refinance_result(f: &mut Frame, outcome: &Outcome<RefinanceResult>, area: Rect) {
    let text = match outcome {
        Outcome::Pending => vec![Line::from("Press Enter to calculate refinance savings.")],
        Outcome::Failed(message) => error_lines(message),
        Outcome::Ready(result) => refinance_lines(result),
    };

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(widget, area);
}

fn refinance_lines(result: &RefinanceResult) -> Vec<Line<'static>> {
    let mut lines = vec![
        labeled("Original Monthly Payment", money(result.original_monthly_payment), Color::White),
        labeled("New Monthly Payment", money(result.new_monthly_payment), Color::White),
        labeled("Balance Refinanced", money(result.new_loan.principal), Color::White),
        Line::from(""),
    ];

    if result.monthly_savings < 0.0 {
        lines.push(labeled(
            "Payment increases by",
            money(result.monthly_savings.abs()),
            Color::Yellow,
        ));
    } else {
        lines.push(labeled("Monthly Savings", money(result.monthly_savings), Color::Green));
    }

    match result.break_even {
        BreakEven::Months(months) => {
            let months = months as u32;
            let (years, months) = years_and_months(months);
            lines.push(labeled(
                "Break-even Point",
                format!("{} years, {} months", years, months),
                Color::Cyan,
            ));
        }
        BreakEven::Unreachable => lines.push(labeled(
            "Break-even Point",
            "Not achievable with these terms.".to_string(),
            Color::Yellow,
        )),
    }

    if result.lifetime_savings >= 0.0 {
        lines.push(labeled("Lifetime Savings", money(result.lifetime_savings), Color::Green));
    } else {
        lines.push(labeled("Lifetime Loss", money(result.lifetime_savings.abs()), Color::Red));
    }

    let totals = result.schedule_totals();
    lines.push(Line::from(""));
    lines.push(labeled(
        "New Loan Payoff",
        format!("{} months ({:.1} years)", totals.months, totals.months as f64 / 12.0),
        Color::White,
    ));
    lines.push(labeled("New Loan Interest", money(totals.total_interest), Color::Red));

    lines
}

fn render_schedule_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let header = Row::new(vec!["Month", "Payment", "Principal", "Interest", "Balance"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);

    let schedule: &[AmortizationRow] = match &app.refinance_result {
        Outcome::Ready(result) => result.schedule.as_slice(),
        _ => &[],
    };
    let rows = schedule.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.month.to_string()),
            Cell::from(money(row.payment)),
            Cell::from(money(row.principal)),
            Cell::from(money(row.interest)),
            Cell::from(money(row.remaining_balance)),
        ])
        .height(1)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("New Loan Schedule"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.table_state);

    let mut help_lines = vec![Line::from(
        "j/k or ↑/↓: navigate | Ctrl-d/u: page | g/G: top/bottom | e: export CSV | h/←: back | q: quit",
    )];
    if let Some(status) = &app.status {
        help_lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let help = Paragraph::new(help_lines)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[1]);
}
