use anyhow::{anyhow, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};
use ratatui::widgets::TableState;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::{
    amortization::ScheduleTotals,
    analyze_refinance, assess_savings,
    config::{Config, LOAN_TERMS},
    error::MathResult,
    solve_down_payment, DownPayment, DownPaymentInputs, LoanTerms, PropertyTax,
    RecurringCosts, RefinanceInputs, RefinanceResult, SavingsAssessment, SavingsProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    DownPayment,
    Refinance,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::DownPayment => "Down Payment Calculator",
            Tab::Refinance => "Refinance Calculator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Schedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    HomePrice,
    TargetPayment,
    InterestRate,
    LoanTerm,
    PropertyTax,
    HomeInsurance,
    HoaFees,
    PmiRate,
    ClosingCosts,
    CurrentSavings,
    CheckingBalance,
    SavingsApy,
    MonthlyPaycheck,
    MonthlyDividends,
    OtherIncome,
    MonthlyExpenses,
    OriginalAmount,
    OriginalRate,
    OriginalTerm,
    MonthsPaid,
    NewRate,
    NewTerm,
    RefinanceClosingCosts,
    ExtraPrincipal,
}

/// How a field is typed and the range its value is clamped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Money { max: Option<f64> },
    Percent { max: f64 },
    /// One of [`LOAN_TERMS`], cycled with space.
    Term,
    Months,
}

impl FieldKind {
    fn accepts(&self, c: char) -> bool {
        match self {
            FieldKind::Money { .. } | FieldKind::Percent { .. } => c.is_ascii_digit() || c == '.',
            FieldKind::Months => c.is_ascii_digit(),
            FieldKind::Term => false,
        }
    }

    /// Text shown for `input` on the form.
    pub fn display(&self, input: &str) -> String {
        match self {
            FieldKind::Money { .. } => format!("$ {}", input),
            FieldKind::Percent { .. } => format!("{} %", input),
            FieldKind::Term => format!("{} years", input),
            FieldKind::Months => format!("{} months", input),
        }
    }
}

/// The second entry mode of a field, switched with Tab.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternateEntry {
    pub label: &'static str,
    pub kind: FieldKind,
    pub input: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub input: String,
    pub alternate: Option<AlternateEntry>,
}

impl Field {
    fn new(id: FieldId, label: &'static str, kind: FieldKind, value: f64) -> Self {
        Self {
            id,
            label,
            kind,
            input: format_input(value),
            alternate: None,
        }
    }

    fn with_alternate(mut self, label: &'static str, kind: FieldKind, value: f64, active: bool) -> Self {
        self.alternate = Some(AlternateEntry {
            label,
            kind,
            input: format_input(value),
            active,
        });
        self
    }

    pub fn alternate_active(&self) -> bool {
        self.alternate.as_ref().is_some_and(|alt| alt.active)
    }

    /// Label, kind and text of whichever entry mode is in use.
    pub fn active_entry(&self) -> (&'static str, FieldKind, &str) {
        match &self.alternate {
            Some(alt) if alt.active => (alt.label, alt.kind, &alt.input),
            _ => (self.label, self.kind, &self.input),
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match &mut self.alternate {
            Some(alt) if alt.active => &mut alt.input,
            _ => &mut self.input,
        }
    }

    fn toggle_alternate(&mut self) {
        if let Some(alt) = &mut self.alternate {
            alt.active = !alt.active;
        }
    }

    fn push(&mut self, c: char) {
        let (_, kind, _) = self.active_entry();
        if kind.accepts(c) {
            self.active_input_mut().push(c);
        }
    }

    fn pop(&mut self) {
        self.active_input_mut().pop();
    }

    fn cycle_term(&mut self) {
        if self.kind != FieldKind::Term {
            return;
        }
        let current = self.input.parse::<u32>().ok();
        let next = match current.and_then(|years| LOAN_TERMS.iter().position(|&t| t == years)) {
            Some(i) => LOAN_TERMS[(i + 1) % LOAN_TERMS.len()],
            None => LOAN_TERMS[0],
        };
        self.input = next.to_string();
    }

    /// Parses the active entry and clamps it into the widget's range.
    /// An empty entry reads as zero.
    pub fn value(&self) -> Result<f64> {
        let (label, kind, input) = self.active_entry();
        let text = input.trim().replace(',', "");
        if text.is_empty() {
            return Ok(0.0);
        }

        let value: f64 = text
            .parse()
            .map_err(|_| anyhow!("{}: '{}' is not a number", label, input))?;
        let value = match kind {
            FieldKind::Money { max } => value.max(0.0).min(max.unwrap_or(f64::MAX)),
            FieldKind::Percent { max } => value.clamp(0.0, max),
            FieldKind::Term => {
                if !LOAN_TERMS.contains(&(value as u32)) || value.fract() != 0.0 {
                    return Err(anyhow!("{}: must be one of {:?} years", label, LOAN_TERMS));
                }
                value
            }
            FieldKind::Months => value.max(0.0).floor(),
        };
        Ok(value)
    }
}

/// Form values are shown without a trailing ".0".
fn format_input(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormTab {
    pub fields: Vec<Field>,
    pub selected: usize,
}

impl FormTab {
    fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            selected: 0,
        }
    }

    fn field(&self, id: FieldId) -> Result<&Field> {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .ok_or_else(|| anyhow!("form has no {:?} field", id))
    }

    fn value(&self, id: FieldId) -> Result<f64> {
        self.field(id)?.value()
    }

    fn whole(&self, id: FieldId) -> Result<u32> {
        Ok(self.value(id)? as u32)
    }

    fn selected_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.selected)
    }

    fn next(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    fn previous(&mut self) {
        self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
    }
}

/// Outcome of the last calculation on a tab.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Pending,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseOutcome {
    pub down_payment: DownPayment,
    /// Reported separately so a failed estimate still shows the down payment.
    pub savings: MathResult<SavingsAssessment>,
}

pub struct App {
    pub tab: Tab,
    pub screen: Screen,
    pub purchase: FormTab,
    pub refinance: FormTab,
    pub purchase_result: Outcome<PurchaseOutcome>,
    pub refinance_result: Outcome<RefinanceResult>,
    pub table_state: TableState,
    pub status: Option<String>,
    pub export_path: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl App {
    pub fn new(config: &Config) -> Self {
        let p = &config.purchase;
        let s = &config.savings;
        let r = &config.refinance;

        let (tax_percent, tax_amount, tax_is_amount) = match p.property_tax {
            PropertyTax::PercentOfPrice(percent) => (percent, 0.0, false),
            PropertyTax::Annual(amount) => (0.0, amount, true),
        };

        let purchase = FormTab::new(vec![
            Field::new(FieldId::HomePrice, "Home Price", FieldKind::Money { max: Some(10_000_000.0) }, p.home_price),
            Field::new(FieldId::TargetPayment, "Target Monthly Payment", FieldKind::Money { max: Some(100_000.0) }, p.target_monthly_payment),
            Field::new(FieldId::InterestRate, "Interest Rate (Annual)", FieldKind::Percent { max: 100.0 }, p.interest_rate),
            Field::new(FieldId::LoanTerm, "Loan Term", FieldKind::Term, p.loan_term_years as f64),
            Field::new(FieldId::PropertyTax, "Property Tax (Annual % of Price)", FieldKind::Percent { max: 100.0 }, tax_percent)
                .with_alternate("Property Tax (Annual $)", FieldKind::Money { max: Some(1_000_000.0) }, tax_amount, tax_is_amount),
            Field::new(FieldId::HomeInsurance, "Home Insurance (Annual)", FieldKind::Money { max: Some(1_000_000.0) }, p.home_insurance),
            Field::new(FieldId::HoaFees, "HOA Fees (Monthly)", FieldKind::Money { max: Some(10_000.0) }, p.hoa_fees),
            Field::new(FieldId::PmiRate, "PMI Rate (Annual)", FieldKind::Percent { max: 10.0 }, p.pmi_rate),
            Field::new(FieldId::ClosingCosts, "Closing Costs", FieldKind::Money { max: None }, p.closing_costs),
            Field::new(FieldId::CurrentSavings, "Current Savings", FieldKind::Money { max: None }, s.current_savings),
            Field::new(FieldId::CheckingBalance, "Current Checking Account", FieldKind::Money { max: None }, s.checking_balance),
            Field::new(FieldId::SavingsApy, "Savings APY", FieldKind::Percent { max: 100.0 }, s.savings_apy),
            Field::new(FieldId::MonthlyPaycheck, "Monthly Paycheck", FieldKind::Money { max: None }, s.monthly_paycheck),
            Field::new(FieldId::MonthlyDividends, "Monthly Dividend Income", FieldKind::Money { max: None }, s.monthly_dividends),
            Field::new(FieldId::OtherIncome, "Other Monthly Income", FieldKind::Money { max: None }, s.other_monthly_income),
            Field::new(FieldId::MonthlyExpenses, "Monthly Expenses", FieldKind::Money { max: None }, s.monthly_expenses),
        ]);

        let refinance = FormTab::new(vec![
            Field::new(FieldId::OriginalAmount, "Original Loan Amount", FieldKind::Money { max: None }, r.original_amount),
            Field::new(FieldId::OriginalRate, "Original Interest Rate", FieldKind::Percent { max: 100.0 }, r.original_rate),
            Field::new(FieldId::OriginalTerm, "Original Loan Term", FieldKind::Term, r.original_term_years as f64),
            Field::new(FieldId::MonthsPaid, "Months Already Paid", FieldKind::Months, r.months_paid as f64),
            Field::new(FieldId::NewRate, "New Interest Rate", FieldKind::Percent { max: 100.0 }, r.new_rate),
            Field::new(FieldId::NewTerm, "New Loan Term", FieldKind::Term, r.new_term_years as f64),
            Field::new(FieldId::RefinanceClosingCosts, "Refinance Closing Costs", FieldKind::Money { max: None }, r.closing_costs),
            Field::new(FieldId::ExtraPrincipal, "Extra Monthly Principal", FieldKind::Money { max: None }, r.extra_principal),
        ]);

        Self {
            tab: Tab::DownPayment,
            screen: Screen::Form,
            purchase,
            refinance,
            purchase_result: Outcome::Pending,
            refinance_result: Outcome::Pending,
            table_state: TableState::default(),
            status: None,
            export_path: config.export_path.clone(),
        }
    }

    pub fn current_form(&self) -> &FormTab {
        match self.tab {
            Tab::DownPayment => &self.purchase,
            Tab::Refinance => &self.refinance,
        }
    }

    fn current_form_mut(&mut self) -> &mut FormTab {
        match self.tab {
            Tab::DownPayment => &mut self.purchase,
            Tab::Refinance => &mut self.refinance,
        }
    }

    fn switch_tab(&mut self) {
        self.tab = match self.tab {
            Tab::DownPayment => Tab::Refinance,
            Tab::Refinance => Tab::DownPayment,
        };
        self.status = None;
    }

    pub fn calculate(&mut self) {
        match self.tab {
            Tab::DownPayment => self.calculate_purchase(),
            Tab::Refinance => self.calculate_refinance(),
        }
    }

    fn purchase_inputs(&self) -> Result<(DownPaymentInputs, f64, SavingsProfile)> {
        let form = &self.purchase;
        let home_price = form.value(FieldId::HomePrice)?;

        let tax_field = form.field(FieldId::PropertyTax)?;
        let property_tax = if tax_field.alternate_active() {
            PropertyTax::Annual(tax_field.value()?)
        } else {
            PropertyTax::PercentOfPrice(tax_field.value()?)
        };

        let inputs = DownPaymentInputs {
            home_price,
            target_monthly_payment: form.value(FieldId::TargetPayment)?,
            annual_rate: form.value(FieldId::InterestRate)?,
            term_years: form.whole(FieldId::LoanTerm)?,
            costs: RecurringCosts::from_annual(
                property_tax.annual_amount(home_price),
                form.value(FieldId::HomeInsurance)?,
                form.value(FieldId::HoaFees)?,
            ),
            pmi_rate: form.value(FieldId::PmiRate)?,
        };

        let profile = SavingsProfile {
            current_savings: form.value(FieldId::CurrentSavings)?,
            checking_balance: form.value(FieldId::CheckingBalance)?,
            monthly_paycheck: form.value(FieldId::MonthlyPaycheck)?,
            monthly_dividends: form.value(FieldId::MonthlyDividends)?,
            other_monthly_income: form.value(FieldId::OtherIncome)?,
            monthly_expenses: form.value(FieldId::MonthlyExpenses)?,
            savings_apy: form.value(FieldId::SavingsApy)?,
        };

        Ok((inputs, form.value(FieldId::ClosingCosts)?, profile))
    }

    fn calculate_purchase(&mut self) {
        let outcome = self.purchase_inputs().and_then(|(inputs, closing_costs, profile)| {
            let down_payment = solve_down_payment(&inputs)?;
            let savings = assess_savings(down_payment.amount(), closing_costs, &profile);
            if let Err(e) = &savings {
                warn!("time to save could not be estimated: {}", e);
            }
            Ok(PurchaseOutcome {
                down_payment,
                savings,
            })
        });

        self.purchase_result = match outcome {
            Ok(result) => {
                info!(
                    "down payment {:.2} ({:.2}%)",
                    result.down_payment.amount(),
                    result.down_payment.percent()
                );
                Outcome::Ready(result)
            }
            Err(e) => {
                warn!("down payment calculation failed: {:#}", e);
                Outcome::Failed(format!("{:#}", e))
            }
        };
    }

    fn refinance_inputs(&self) -> Result<RefinanceInputs> {
        let form = &self.refinance;
        Ok(RefinanceInputs {
            original: LoanTerms::new(
                form.value(FieldId::OriginalAmount)?,
                form.value(FieldId::OriginalRate)?,
                form.whole(FieldId::OriginalTerm)?,
            ),
            months_paid: form.whole(FieldId::MonthsPaid)?,
            new_rate: form.value(FieldId::NewRate)?,
            new_term_years: form.whole(FieldId::NewTerm)?,
            closing_costs: form.value(FieldId::RefinanceClosingCosts)?,
            extra_principal: form.value(FieldId::ExtraPrincipal)?,
        })
    }

    fn calculate_refinance(&mut self) {
        let outcome = self
            .refinance_inputs()
            .and_then(|inputs| Ok(analyze_refinance(&inputs)?));

        self.refinance_result = match outcome {
            Ok(result) => {
                info!(
                    "refinance saves {:.2}/month, {:.2} over the loan",
                    result.monthly_savings, result.lifetime_savings
                );
                self.table_state.select(Some(0));
                Outcome::Ready(result)
            }
            Err(e) => {
                warn!("refinance calculation failed: {:#}", e);
                Outcome::Failed(format!("{:#}", e))
            }
        };
    }

    pub fn schedule_len(&self) -> usize {
        match &self.refinance_result {
            Outcome::Ready(result) => result.schedule.len(),
            _ => 0,
        }
    }

    /// Writes the new loan's schedule and its totals as CSV.
    pub fn export_to_csv(&self) -> Result<PathBuf> {
        let result = match &self.refinance_result {
            Outcome::Ready(result) => result,
            _ => return Err(anyhow!("nothing to export, calculate a refinance first")),
        };

        let path = self.export_path.clone();
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut file = BufWriter::new(file);

        writeln!(file, "Month,Payment,Principal,Interest,Balance")?;
        for row in &result.schedule {
            writeln!(
                file,
                "{},{:.2},{:.2},{:.2},{:.2}",
                row.month, row.payment, row.principal, row.interest, row.remaining_balance
            )?;
        }

        let totals = ScheduleTotals::from_rows(&result.schedule);
        writeln!(file)?;
        writeln!(file, "Summary")?;
        writeln!(file, "Original Monthly Payment,{:.2}", result.original_monthly_payment)?;
        writeln!(file, "New Monthly Payment,{:.2}", result.new_monthly_payment)?;
        writeln!(file, "Monthly Savings,{:.2}", result.monthly_savings)?;
        match result.break_even.months() {
            Some(months) => writeln!(file, "Break-even Months,{:.2}", months)?,
            None => writeln!(file, "Break-even Months,unreachable")?,
        }
        writeln!(file, "Lifetime Savings,{:.2}", result.lifetime_savings)?;
        writeln!(file, "Total Paid,{:.2}", totals.total_paid)?;
        writeln!(file, "Total Interest,{:.2}", totals.total_interest)?;
        writeln!(file, "Months to Payoff,{}", totals.months)?;
        file.flush()?;

        Ok(path)
    }
}

/// Handles one key press. Returns `true` when the user asked to quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.screen {
        Screen::Form => handle_form_input(app, key),
        Screen::Schedule => handle_schedule_input(app, key),
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
            if let Some(field) = app.current_form_mut().selected_mut() {
                field.push(c);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(field) = app.current_form_mut().selected_mut() {
                field.cycle_term();
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.current_form_mut().selected_mut() {
                field.pop();
            }
        }
        KeyCode::Tab => {
            if let Some(field) = app.current_form_mut().selected_mut() {
                field.toggle_alternate();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.current_form_mut().next(),
        KeyCode::Up | KeyCode::Char('k') => app.current_form_mut().previous(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.switch_tab()
        }
        KeyCode::Enter => app.calculate(),
        KeyCode::Char('s') if app.tab == Tab::Refinance => {
            if app.schedule_len() > 0 {
                app.screen = Screen::Schedule;
            }
        }
        KeyCode::Char('e') if app.tab == Tab::Refinance => export(app),
        _ => {}
    }
    Ok(false)
}

fn handle_schedule_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let len = app.schedule_len();
    let current = app.table_state.selected().unwrap_or(0);

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => app.screen = Screen::Form,
        KeyCode::Down | KeyCode::Char('j') => {
            if current + 1 < len {
                app.table_state.select(Some(current + 1));
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.table_state.select(Some(current.saturating_sub(1)));
        }
        KeyCode::PageDown | KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let new_pos = (current + 12).min(len.saturating_sub(1));
            app.table_state.select(Some(new_pos));
        }
        KeyCode::PageUp | KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.table_state.select(Some(current.saturating_sub(12)));
        }
        KeyCode::Char('g') => app.table_state.select(Some(0)),
        KeyCode::Char('G') => {
            if len > 0 {
                app.table_state.select(Some(len - 1));
            }
        }
        KeyCode::Char('e') => export(app),
        _ => {}
    }
    Ok(false)
}

fn export(app: &mut App) {
    app.status = Some(match app.export_to_csv() {
        Ok(path) => {
            info!("exported schedule to {}", path.display());
            format!("Exported schedule to {}", path.display())
        }
        Err(e) => {
            warn!("export failed: {:#}", e);
            format!("Export failed: {:#}", e)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvalidInputError;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn select(app: &mut App, id: FieldId) {
        let index = app
            .current_form()
            .fields
            .iter()
            .position(|field| field.id == id)
            .unwrap();
        app.current_form_mut().selected = index;
    }

    fn retype(app: &mut App, id: FieldId, text: &str) {
        select(app, id);
        for _ in 0..20 {
            press(app, KeyCode::Backspace);
        }
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_default_purchase_calculation() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);

        match &app.purchase_result {
            Outcome::Ready(result) => {
                let annual_tax = PropertyTax::PercentOfPrice(1.2).annual_amount(500_000.0);
                let expected = solve_down_payment(&DownPaymentInputs {
                    home_price: 500_000.0,
                    target_monthly_payment: 3_000.0,
                    annual_rate: 7.0,
                    term_years: 30,
                    costs: RecurringCosts::from_annual(annual_tax, 1_200.0, 50.0),
                    pmi_rate: 0.5,
                })
                .unwrap();
                assert_eq!(result.down_payment, expected);
                assert_eq!(result.savings.unwrap().on_hand, 25_000.0);
            }
            other => panic!("expected a result, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_is_shown() {
        let mut app = App::default();
        retype(&mut app, FieldId::TargetPayment, "600");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.purchase_result,
            Outcome::Failed(InvalidInputError::TargetBelowFixedCosts.to_string())
        );
    }

    #[test]
    fn test_savings_error_keeps_down_payment() {
        let mut config = Config::default();
        config.savings.monthly_expenses = 5_099.999_999_9;
        config.savings.savings_apy = 0.0;
        let mut app = App::new(&config);
        press(&mut app, KeyCode::Enter);

        match &app.purchase_result {
            Outcome::Ready(result) => {
                assert!(result.down_payment.amount() > 0.0);
                assert_eq!(result.savings, Err(InvalidInputError::GoalTooDistant));
            }
            other => panic!("expected a down payment, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_tax_mode() {
        let mut app = App::default();
        select(&mut app, FieldId::PropertyTax);
        press(&mut app, KeyCode::Tab);
        retype(&mut app, FieldId::PropertyTax, "6000");

        let (inputs, _, _) = app.purchase_inputs().unwrap();
        assert_eq!(inputs.costs.monthly_property_tax, 500.0);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut app = App::default();
        retype(&mut app, FieldId::PmiRate, "25");
        let (inputs, _, _) = app.purchase_inputs().unwrap();
        assert_eq!(inputs.pmi_rate, 10.0);
    }

    #[test]
    fn test_bad_number_names_the_field() {
        let mut app = App::default();
        retype(&mut app, FieldId::InterestRate, "6..5");
        press(&mut app, KeyCode::Enter);

        match &app.purchase_result {
            Outcome::Failed(message) => assert!(message.contains("Interest Rate")),
            other => panic!("expected a failure, got {:?}", other),
        }
    }

    #[test]
    fn test_term_cycles_through_offered_terms() {
        let mut app = App::default();
        select(&mut app, FieldId::LoanTerm);
        let mut seen = Vec::new();
        for _ in 0..LOAN_TERMS.len() {
            press(&mut app, KeyCode::Char(' '));
            seen.push(app.purchase.value(FieldId::LoanTerm).unwrap() as u32);
        }
        assert_eq!(seen, vec![20, 15, 10, 30]);

        // digits are ignored on a term field
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.purchase.value(FieldId::LoanTerm).unwrap(), 30.0);
    }

    #[test]
    fn test_refinance_and_schedule_navigation() {
        let mut app = App::default();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tab, Tab::Refinance);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.schedule_len(), 360);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.screen, Screen::Schedule);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.table_state.selected(), Some(359));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.table_state.selected(), Some(359));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Form);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_export_requires_a_result() {
        let app = App::default();
        assert!(app.export_to_csv().is_err());
    }

    #[test]
    fn test_export_writes_schedule() {
        let mut app = App::default();
        app.export_path = std::env::temp_dir().join("homebuyer_refi_export_test.csv");
        app.tab = Tab::Refinance;
        app.calculate();

        let path = app.export_to_csv().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Month,Payment,Principal,Interest,Balance"));
        assert!(lines.next().unwrap().starts_with("1,1692.40,"));
        assert!(text.contains("Months to Payoff,360"));
        std::fs::remove_file(path).ok();
    }
}
