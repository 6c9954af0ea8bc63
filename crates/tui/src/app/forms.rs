//! Form state of the add/edit modals and its conversion into engine inputs.

use chrono::NaiveDate;
use engine::{
    Category, CategoryNew, CategoryPatch, EngineError, Money, Transaction, TransactionKind,
    TransactionNew, TransactionPatch, categories::DEFAULT_COLOR,
};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Colors offered by the category form.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#64748b",
];

fn parse_amount(input: &str, label: &str) -> Result<Money, EngineError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EngineError::InvalidAmount(format!("{label} is required")));
    }
    Money::parse_amount(input)
}

fn parse_date(input: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("expected YYYY-MM-DD, got '{}'", input.trim())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Amount,
    Kind,
    Category,
    Description,
    Date,
}

impl TransactionField {
    const ORDER: [Self; 5] = [
        Self::Amount,
        Self::Kind,
        Self::Category,
        Self::Description,
        Self::Date,
    ];

    fn step(self, forward: bool) -> Self {
        let at = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward { (at + 1) % len } else { (at + len - 1) % len };
        Self::ORDER[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    /// `Some` when editing an existing transaction.
    pub editing: Option<Uuid>,
    pub amount: String,
    pub kind: TransactionKind,
    pub category_id: Option<Uuid>,
    pub description: String,
    pub date: String,
    pub focus: TransactionField,
    pub error: Option<String>,
}

impl TransactionForm {
    /// Empty form: an expense dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            amount: String::new(),
            kind: TransactionKind::Expense,
            category_id: None,
            description: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            focus: TransactionField::Amount,
            error: None,
        }
    }

    pub fn edit(tx: &Transaction) -> Self {
        Self {
            editing: Some(tx.id),
            amount: tx.amount.to_plain_string(),
            kind: tx.kind,
            category_id: tx.category_id,
            description: tx.description.clone().unwrap_or_default(),
            date: tx.date.format(DATE_FORMAT).to_string(),
            focus: TransactionField::Amount,
            error: None,
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        self.focus = self.focus.step(forward);
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            TransactionField::Amount => Some(&mut self.amount),
            TransactionField::Description => Some(&mut self.description),
            TransactionField::Date => Some(&mut self.date),
            TransactionField::Kind | TransactionField::Category => None,
        }
    }

    pub fn input(&mut self, ch: char, categories: &[Category]) {
        match self.text_field() {
            Some(field) => field.push(ch),
            None if ch == ' ' => self.cycle(true, categories),
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.text_field() {
            field.pop();
        }
    }

    /// Changes the value of a choice field: the type, or the category among
    /// `[none, categories...]`.
    pub fn cycle(&mut self, forward: bool, categories: &[Category]) {
        match self.focus {
            TransactionField::Kind => self.kind = self.kind.toggled(),
            TransactionField::Category => {
                let len = categories.len() + 1;
                let at = self
                    .category_id
                    .and_then(|id| categories.iter().position(|c| c.id == id))
                    .map_or(0, |index| index + 1);
                let next = if forward { (at + 1) % len } else { (at + len - 1) % len };
                self.category_id = next.checked_sub(1).map(|index| categories[index].id);
            }
            _ => {}
        }
    }

    pub fn category_label<'a>(&self, categories: &'a [Category]) -> &'a str {
        self.category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map_or("Select category", |c| c.name.as_str())
    }

    pub fn to_new(&self) -> Result<TransactionNew, EngineError> {
        Ok(TransactionNew {
            amount: parse_amount(&self.amount, "amount")?,
            kind: self.kind,
            category_id: self.category_id,
            description: Some(self.description.clone()),
            date: parse_date(&self.date)?,
        })
    }

    /// Every field is sent, the form always shows the full record.
    pub fn to_patch(&self) -> Result<TransactionPatch, EngineError> {
        Ok(TransactionPatch {
            amount: Some(parse_amount(&self.amount, "amount")?),
            kind: Some(self.kind),
            category_id: Some(self.category_id),
            description: Some(Some(self.description.clone())),
            date: Some(parse_date(&self.date)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Color,
    Budget,
}

impl CategoryField {
    fn step(self, forward: bool) -> Self {
        match (self, forward) {
            (Self::Name, true) | (Self::Budget, false) => Self::Color,
            (Self::Color, true) | (Self::Name, false) => Self::Budget,
            (Self::Budget, true) | (Self::Color, false) => Self::Name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub editing: Option<Uuid>,
    pub name: String,
    pub color: String,
    pub budget: String,
    pub focus: CategoryField,
    pub error: Option<String>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            color: DEFAULT_COLOR.to_string(),
            budget: String::new(),
            focus: CategoryField::Name,
            error: None,
        }
    }
}

impl CategoryForm {
    pub fn edit(category: &Category) -> Self {
        Self {
            editing: Some(category.id),
            name: category.name.clone(),
            color: category.color.clone(),
            budget: category
                .monthly_budget
                .map(Money::to_plain_string)
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        self.focus = self.focus.step(forward);
    }

    pub fn input(&mut self, ch: char) {
        match self.focus {
            CategoryField::Name => self.name.push(ch),
            CategoryField::Budget => self.budget.push(ch),
            CategoryField::Color if ch == ' ' => self.cycle_color(true),
            CategoryField::Color => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            CategoryField::Name => {
                self.name.pop();
            }
            CategoryField::Budget => {
                self.budget.pop();
            }
            CategoryField::Color => {}
        }
    }

    /// Moves through the palette. A color outside of it restarts from the
    /// first entry.
    pub fn cycle_color(&mut self, forward: bool) {
        let len = PALETTE.len();
        let next = match PALETTE.iter().position(|c| c.eq_ignore_ascii_case(&self.color)) {
            Some(at) if forward => (at + 1) % len,
            Some(at) => (at + len - 1) % len,
            None => 0,
        };
        self.color = PALETTE[next].to_string();
    }

    /// Blank means unlimited.
    fn budget(&self) -> Result<Option<Money>, EngineError> {
        if self.budget.trim().is_empty() {
            return Ok(None);
        }
        parse_amount(&self.budget, "budget").map(Some)
    }

    pub fn to_new(&self) -> Result<CategoryNew, EngineError> {
        let mut input = CategoryNew::new(self.name.clone()).color(self.color.clone());
        input.monthly_budget = self.budget()?;
        Ok(input)
    }

    pub fn to_patch(&self) -> Result<CategoryPatch, EngineError> {
        Ok(CategoryPatch {
            name: Some(self.name.clone()),
            color: Some(self.color.clone()),
            monthly_budget: Some(self.budget()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            color: "#ef4444".to_string(),
            monthly_budget: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn new_transaction_defaults_to_expense_today() {
        let form = TransactionForm::new(today());
        assert_eq!(form.kind, TransactionKind::Expense);
        assert_eq!(form.date, "2024-03-09");
        assert_eq!(form.category_label(&[]), "Select category");
    }

    #[test]
    fn transaction_form_parses_inputs() {
        let mut form = TransactionForm::new(today());
        for ch in "12,50".chars() {
            form.input(ch, &[]);
        }
        form.focus_next(true);
        form.input(' ', &[]);
        let input = form.to_new().unwrap();
        assert_eq!(input.amount, Money::new(1250));
        assert_eq!(input.kind, TransactionKind::Income);
        assert_eq!(input.date, today());
    }

    #[test]
    fn transaction_form_rejects_bad_input() {
        let mut form = TransactionForm::new(today());
        assert!(matches!(form.to_new(), Err(EngineError::InvalidAmount(_))));

        form.amount = "-5".to_string();
        assert!(matches!(form.to_new(), Err(EngineError::InvalidAmount(_))));

        form.amount = "5".to_string();
        form.date = "09/03/2024".to_string();
        assert!(matches!(form.to_new(), Err(EngineError::InvalidDate(_))));
    }

    #[test]
    fn category_picker_wraps_through_none() {
        let categories = vec![category("Food"), category("Rent")];
        let mut form = TransactionForm::new(today());
        form.focus = TransactionField::Category;

        form.cycle(true, &categories);
        assert_eq!(form.category_label(&categories), "Food");
        form.cycle(true, &categories);
        assert_eq!(form.category_label(&categories), "Rent");
        form.cycle(true, &categories);
        assert_eq!(form.category_id, None);
        form.cycle(false, &categories);
        assert_eq!(form.category_label(&categories), "Rent");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = TransactionForm::new(today());
        form.focus_next(false);
        assert_eq!(form.focus, TransactionField::Date);
        form.focus_next(true);
        assert_eq!(form.focus, TransactionField::Amount);
    }

    #[test]
    fn edit_form_round_trips_a_category() {
        let mut food = category("Food");
        food.monthly_budget = Some(Money::from_major(500));
        let form = CategoryForm::edit(&food);
        assert_eq!(form.budget, "500");

        let patch = form.to_patch().unwrap();
        assert_eq!(patch.monthly_budget, Some(Some(Money::from_major(500))));
        assert_eq!(patch.color.as_deref(), Some("#ef4444"));
    }

    #[test]
    fn blank_budget_is_unlimited() {
        let mut form = CategoryForm::default();
        form.name = "Fun".to_string();
        assert_eq!(form.to_new().unwrap().monthly_budget, None);
        assert_eq!(form.to_patch().unwrap().monthly_budget, Some(None));

        form.budget = "abc".to_string();
        assert!(form.to_new().is_err());
    }

    #[test]
    fn palette_cycles() {
        let mut form = CategoryForm::default();
        assert_eq!(form.color, PALETTE[0]);
        form.cycle_color(false);
        assert_eq!(form.color, PALETTE[7]);
        form.color = "#123456".to_string();
        form.cycle_color(true);
        assert_eq!(form.color, PALETTE[0]);
    }
}
