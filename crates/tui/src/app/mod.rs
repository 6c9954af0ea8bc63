pub mod forms;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use api_types::auth::AuthUser;
use crossterm::event::{self, Event, KeyEvent};
use engine::{
    Category, Currency, Engine, EngineError, Period, ResultEngine, Summary, Transaction,
    backend::BackendError, export, memory::MemoryClient,
};
use uuid::Uuid;

use crate::{
    client::{Client, SupabaseClient},
    config::{AppConfig, BackendKind, ConfigLoader},
    error::{AppError, Result},
    local_state::LocalState,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

use self::forms::{CategoryForm, TransactionForm};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The backend cannot be reached with the current configuration.
    Fatal,
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Transactions,
    Categories,
    Profile,
}

impl Section {
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Transactions,
        Self::Categories,
        Self::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
            Self::Categories => "Categories",
            Self::Profile => "Profile",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Dashboard => 'd',
            Self::Transactions => 't',
            Self::Categories => 'c',
            Self::Profile => 'p',
        }
    }

    fn from_shortcut(ch: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.shortcut() == ch.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
}

impl LoginMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Create account",
        }
    }
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub mode: LoginMode,
    pub message: Option<String>,
    /// Non-error notice, e.g. a pending email confirmation.
    pub info: Option<String>,
}

impl LoginState {
    fn new(email: Option<String>) -> Self {
        let focus = if email.is_some() {
            LoginField::Password
        } else {
            LoginField::Email
        };
        Self {
            email: email.unwrap_or_default(),
            password: String::new(),
            focus,
            mode: LoginMode::SignIn,
            message: None,
            info: None,
        }
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub summary: Option<Summary>,
    pub recent: Vec<Transaction>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct TransactionsState {
    pub items: Vec<Transaction>,
    pub selected: usize,
    pub form: Option<TransactionForm>,
    pub confirm_delete: Option<Uuid>,
    pub error: Option<String>,
}

impl TransactionsState {
    pub fn current(&self) -> Option<&Transaction> {
        self.items.get(self.selected)
    }
}

#[derive(Debug, Default)]
pub struct CategoriesState {
    pub items: Vec<Category>,
    /// Summary of the selected month, source of each category's spend.
    pub summary: Option<Summary>,
    pub selected: usize,
    pub form: Option<CategoryForm>,
    pub confirm_delete: Option<Uuid>,
    pub error: Option<String>,
}

impl CategoriesState {
    pub fn current(&self) -> Option<&Category> {
        self.items.get(self.selected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

impl ToastState {
    fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub fatal: Option<String>,
    pub login: LoginState,
    pub section: Section,
    pub period: Period,
    pub currency: Currency,
    pub user: Option<AuthUser>,
    pub dashboard: DashboardState,
    pub transactions: TransactionsState,
    pub categories: CategoriesState,
    /// Blocking message, dismissed with Enter or Esc.
    pub alert: Option<String>,
    pub toast: Option<ToastState>,
}

impl AppState {
    fn new(config: &AppConfig, last_email: Option<String>) -> Self {
        Self {
            screen: Screen::Login,
            fatal: None,
            login: LoginState::new(last_email),
            section: Section::Dashboard,
            period: Period::containing(config.today()),
            currency: config.currency(),
            user: None,
            dashboard: DashboardState::default(),
            transactions: TransactionsState::default(),
            categories: CategoriesState::default(),
            alert: None,
            toast: None,
        }
    }

    /// True while a modal owns the keyboard.
    pub fn modal_open(&self) -> bool {
        self.transactions.form.is_some()
            || self.categories.form.is_some()
            || self.transactions.confirm_delete.is_some()
            || self.categories.confirm_delete.is_some()
    }

    fn clear_data(&mut self) {
        self.dashboard = DashboardState::default();
        self.transactions = TransactionsState::default();
        self.categories = CategoriesState::default();
    }
}

fn build_engine(config: &AppConfig) -> Result<Engine<Client>> {
    let client = match config.backend {
        BackendKind::Memory => Client::Memory(MemoryClient::new()),
        BackendKind::Supabase => {
            let (url, key) = config.supabase_credentials()?;
            Client::Remote(SupabaseClient::new(url, key)?)
        }
    };
    Ok(Engine::builder().client(client).build()?)
}

async fn dashboard_data(
    engine: &mut Engine<Client>,
    period: Period,
) -> ResultEngine<(Summary, Vec<Transaction>)> {
    let summary = engine.monthly_summary(period).await?;
    let recent = engine.recent_transactions().await?;
    Ok((summary, recent))
}

async fn transactions_data(
    engine: &mut Engine<Client>,
    period: Period,
) -> ResultEngine<(Vec<Transaction>, Vec<Category>)> {
    let transactions = engine.transactions(period).await?;
    let categories = engine.categories().await?;
    Ok((transactions, categories))
}

async fn categories_data(
    engine: &mut Engine<Client>,
    period: Period,
) -> ResultEngine<(Vec<Category>, Summary)> {
    let categories = engine.categories().await?;
    let summary = engine.monthly_summary(period).await?;
    Ok((categories, summary))
}

async fn save_transaction(
    engine: &mut Engine<Client>,
    form: &TransactionForm,
) -> ResultEngine<Transaction> {
    match form.editing {
        None => engine.add_transaction(form.to_new()?).await,
        Some(id) => engine.update_transaction(id, form.to_patch()?).await,
    }
}

async fn save_category(engine: &mut Engine<Client>, form: &CategoryForm) -> ResultEngine<Category> {
    match form.editing {
        None => engine.add_category(form.to_new()?).await,
        Some(id) => engine.update_category(id, form.to_patch()?).await,
    }
}

fn write_export(dir: &str, file_name: &str, content: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = Path::new(dir).join(file_name);
    fs::write(&path, content)?;
    Ok(path)
}

fn login_message(err: &EngineError) -> String {
    match err {
        EngineError::Backend(BackendError::Validation(message)) => message.clone(),
        EngineError::Backend(BackendError::Unauthorized) => "Invalid login credentials".to_string(),
        EngineError::Backend(BackendError::Transport(message)) => {
            format!("Server unreachable: {message}")
        }
        other => other.to_string(),
    }
}

/// Moves a list cursor by one, clamped to `len`.
fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}

pub struct App {
    loader: ConfigLoader,
    config: AppConfig,
    engine: Option<Engine<Client>>,
    local: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub async fn new(loader: ConfigLoader, config: AppConfig) -> Result<Self> {
        let local = LocalState::load(&config.state_path).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring unreadable local state");
            LocalState::default()
        });
        let state = AppState::new(&config, local.last_email.clone());
        let mut app = Self {
            loader,
            config,
            engine: None,
            local,
            state,
            should_quit: false,
        };
        app.connect().await?;
        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key).await?;
            }

            if self
                .state
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expires_at <= Instant::now())
            {
                self.state.toast = None;
            }
        }

        Ok(())
    }

    /// Builds the data client from the configuration, then resumes the
    /// stored session if there is one.
    async fn connect(&mut self) -> Result<()> {
        match build_engine(&self.config) {
            Ok(engine) => self.engine = Some(engine),
            Err(err) => {
                tracing::error!(%err, "backend unavailable");
                self.engine = None;
                self.state.fatal = Some(err.to_string());
                self.state.screen = Screen::Fatal;
                return Ok(());
            }
        }
        tracing::info!(backend = ?self.config.backend, "backend ready");
        self.state.fatal = None;
        self.restore_session().await
    }

    async fn reload_config(&mut self) -> Result<()> {
        match self.loader.load() {
            Ok(config) => {
                self.state.currency = config.currency();
                self.state.period = Period::containing(config.today());
                self.config = config;
                self.connect().await
            }
            Err(err) => {
                tracing::error!(%err, "configuration reload failed");
                self.state.fatal = Some(err.to_string());
                Ok(())
            }
        }
    }

    async fn restore_session(&mut self) -> Result<()> {
        let Some(session) = self.local.session.clone() else {
            self.show_login(None);
            return Ok(());
        };
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        match engine.restore_session(session).await {
            Ok(Some(user)) => self.enter_home(user).await,
            Ok(None) => {
                self.forget_session();
                self.show_login(Some("Your session has expired. Please sign in again."));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "session restore failed");
                self.show_login(Some(&login_message(&err)));
                Ok(())
            }
        }
    }

    fn show_login(&mut self, message: Option<&str>) {
        self.state.screen = Screen::Login;
        self.state.user = None;
        self.state.clear_data();
        self.state.login.password.clear();
        self.state.login.message = message.map(ToString::to_string);
    }

    async fn enter_home(&mut self, user: AuthUser) -> Result<()> {
        tracing::info!(user_id = %user.id, "session ready");
        self.state.user = Some(user);
        self.state.screen = Screen::Home;
        self.state.section = Section::Dashboard;
        self.state.login.password.clear();
        self.state.login.message = None;
        self.state.login.info = None;
        self.reload().await
    }

    fn persist(&self) {
        if let Err(err) = self.local.save(&self.config.state_path) {
            tracing::warn!(%err, path = %self.config.state_path, "local state not saved");
        }
    }

    fn forget_session(&mut self) {
        self.local.forget_session();
        self.persist();
    }

    /// Routes an engine failure. A lost session goes back to Login, the
    /// rest becomes a blocking alert prefixed with `action`.
    fn report(&mut self, action: &str, err: EngineError) {
        if err.is_unauthenticated() {
            tracing::warn!(%err, "session lost");
            self.forget_session();
            self.show_login(Some("Your session has expired. Please sign in again."));
            return;
        }
        tracing::error!(%err, action, "operation failed");
        self.state.alert = Some(format!("{action}: {err}"));
    }

    /// Same as [`App::report`] for reads, whose errors are shown inline.
    fn load_failed(&mut self, err: EngineError) -> Option<String> {
        if err.is_unauthenticated() {
            self.report("", err);
            return None;
        }
        tracing::error!(%err, "load failed");
        Some(err.to_string())
    }

    fn toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.state.toast = Some(ToastState::new(message, level));
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        if self.state.alert.is_some() {
            if matches!(
                action,
                AppAction::Submit | AppAction::Cancel | AppAction::Input(' ')
            ) {
                self.state.alert = None;
            }
            return Ok(());
        }

        match self.state.screen {
            Screen::Fatal => self.handle_fatal_key(action).await,
            Screen::Login => self.handle_login_key(action).await,
            Screen::Home => self.handle_home_key(action).await,
        }
    }

    async fn handle_fatal_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Input('r' | 'R') => self.reload_config().await?,
            AppAction::Input('q') | AppAction::Cancel => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    async fn handle_login_key(&mut self, action: AppAction) -> Result<()> {
        let login = &mut self.state.login;
        match action {
            AppAction::Cancel => self.should_quit = true,
            AppAction::NextField
            | AppAction::PrevField
            | AppAction::Up
            | AppAction::Down => login.toggle_focus(),
            AppAction::ToggleMode => {
                login.mode = match login.mode {
                    LoginMode::SignIn => LoginMode::SignUp,
                    LoginMode::SignUp => LoginMode::SignIn,
                };
                login.message = None;
                login.info = None;
            }
            AppAction::Backspace => {
                login.active_field_mut().pop();
            }
            AppAction::Input(ch) => login.active_field_mut().push(ch),
            AppAction::Submit => self.attempt_login().await?,
            _ => {}
        }
        Ok(())
    }

    async fn attempt_login(&mut self) -> Result<()> {
        let email = self.state.login.email.trim().to_string();
        let password = self.state.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.state.login.message = Some("Please fill in every field.".to_string());
            return Ok(());
        }
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        let mode = self.state.login.mode;
        let result = match mode {
            LoginMode::SignIn => engine.sign_in(&email, &password).await.map(Some),
            LoginMode::SignUp => engine.sign_up(&email, &password).await,
        };

        match result {
            Ok(Some(session)) => {
                let user = session.user.clone();
                self.local.remember(session);
                self.persist();
                self.enter_home(user).await?;
            }
            Ok(None) => {
                let login = &mut self.state.login;
                login.mode = LoginMode::SignIn;
                login.password.clear();
                login.message = None;
                login.info =
                    Some("Check your inbox to confirm the account, then sign in.".to_string());
            }
            Err(err) => {
                tracing::warn!(%err, ?mode, "authentication failed");
                self.state.login.message = Some(login_message(&err));
            }
        }
        Ok(())
    }

    async fn handle_home_key(&mut self, action: AppAction) -> Result<()> {
        if self.state.transactions.confirm_delete.is_some()
            || self.state.categories.confirm_delete.is_some()
        {
            return self.handle_confirm_key(action).await;
        }
        if self.state.transactions.form.is_some() {
            return self.handle_transaction_form_key(action).await;
        }
        if self.state.categories.form.is_some() {
            return self.handle_category_form_key(action).await;
        }

        match action {
            AppAction::Up => self.move_selection(false),
            AppAction::Down => self.move_selection(true),
            AppAction::Left => self.change_period(false).await?,
            AppAction::Right => self.change_period(true).await?,
            AppAction::Submit => self.open_edit_form(),
            AppAction::Input(ch) => self.handle_home_char(ch).await?,
            _ => {}
        }
        Ok(())
    }

    async fn handle_home_char(&mut self, ch: char) -> Result<()> {
        if let Some(section) = Section::from_shortcut(ch) {
            self.state.section = section;
            return self.reload().await;
        }

        match (ch, self.state.section) {
            ('q', _) => self.should_quit = true,
            ('[', _) => self.change_period(false).await?,
            (']', _) => self.change_period(true).await?,
            ('r', _) => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.refresh();
                }
                self.reload().await?;
                self.toast("Refreshed", ToastLevel::Info);
            }
            ('j', _) => self.move_selection(true),
            ('k', _) => self.move_selection(false),
            ('n', _) => self.open_new_form(),
            ('e', _) => self.open_edit_form(),
            ('x', Section::Transactions) => {
                self.state.transactions.confirm_delete =
                    self.state.transactions.current().map(|tx| tx.id);
            }
            ('x', Section::Categories) => {
                self.state.categories.confirm_delete =
                    self.state.categories.current().map(|category| category.id);
            }
            ('s', Section::Transactions) => self.export_csv().await,
            ('l', Section::Profile) => self.sign_out().await?,
            _ => {}
        }
        Ok(())
    }

    async fn change_period(&mut self, forward: bool) -> Result<()> {
        self.state.period = if forward {
            self.state.period.next()
        } else {
            self.state.period.prev()
        };
        self.state.transactions.selected = 0;
        self.reload().await
    }

    fn move_selection(&mut self, forward: bool) {
        match self.state.section {
            Section::Transactions => {
                let list = &mut self.state.transactions;
                list.selected = step(list.selected, list.items.len(), forward);
            }
            Section::Categories => {
                let list = &mut self.state.categories;
                list.selected = step(list.selected, list.items.len(), forward);
            }
            Section::Dashboard | Section::Profile => {}
        }
    }

    fn open_new_form(&mut self) {
        match self.state.section {
            Section::Dashboard | Section::Transactions => {
                self.state.transactions.form = Some(TransactionForm::new(self.config.today()));
            }
            Section::Categories => self.state.categories.form = Some(CategoryForm::default()),
            Section::Profile => {}
        }
    }

    fn open_edit_form(&mut self) {
        match self.state.section {
            Section::Transactions => {
                self.state.transactions.form =
                    self.state.transactions.current().map(TransactionForm::edit);
            }
            Section::Categories => {
                self.state.categories.form =
                    self.state.categories.current().map(CategoryForm::edit);
            }
            Section::Dashboard | Section::Profile => {}
        }
    }

    async fn handle_transaction_form_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => {
                self.state.transactions.form = None;
                return Ok(());
            }
            AppAction::Submit => return self.submit_transaction_form().await,
            _ => {}
        }

        let categories = &self.state.categories.items;
        let Some(form) = self.state.transactions.form.as_mut() else {
            return Ok(());
        };
        match action {
            AppAction::NextField | AppAction::Down => form.focus_next(true),
            AppAction::PrevField | AppAction::Up => form.focus_next(false),
            AppAction::Left => form.cycle(false, categories),
            AppAction::Right => form.cycle(true, categories),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch, categories),
            _ => {}
        }
        Ok(())
    }

    async fn submit_transaction_form(&mut self) -> Result<()> {
        let Some(form) = self.state.transactions.form.clone() else {
            return Ok(());
        };
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        match save_transaction(engine, &form).await {
            Ok(_) => {
                self.state.transactions.form = None;
                self.toast("Transaction saved", ToastLevel::Success);
                self.reload().await?;
            }
            Err(err) if err.is_input() => {
                if let Some(form) = self.state.transactions.form.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
            Err(err) => self.report("Error saving transaction", err),
        }
        Ok(())
    }

    async fn handle_category_form_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => {
                self.state.categories.form = None;
                return Ok(());
            }
            AppAction::Submit => return self.submit_category_form().await,
            _ => {}
        }

        let Some(form) = self.state.categories.form.as_mut() else {
            return Ok(());
        };
        match action {
            AppAction::NextField | AppAction::Down => form.focus_next(true),
            AppAction::PrevField | AppAction::Up => form.focus_next(false),
            AppAction::Left => form.cycle_color(false),
            AppAction::Right => form.cycle_color(true),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch),
            _ => {}
        }
        Ok(())
    }

    async fn submit_category_form(&mut self) -> Result<()> {
        let Some(form) = self.state.categories.form.clone() else {
            return Ok(());
        };
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        match save_category(engine, &form).await {
            Ok(category) => {
                self.state.categories.form = None;
                self.toast(format!("Saved {}", category.name), ToastLevel::Success);
                self.reload().await?;
            }
            Err(err) if err.is_input() => {
                if let Some(form) = self.state.categories.form.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
            Err(err) => self.report("Error saving category", err),
        }
        Ok(())
    }

    async fn handle_confirm_key(&mut self, action: AppAction) -> Result<()> {
        let confirmed = match action {
            AppAction::Input('y' | 'Y') | AppAction::Submit => true,
            AppAction::Input('n' | 'N') | AppAction::Cancel => false,
            _ => return Ok(()),
        };
        let transaction = self.state.transactions.confirm_delete.take();
        let category = self.state.categories.confirm_delete.take();
        if !confirmed {
            return Ok(());
        }
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        let (result, action) = match (transaction, category) {
            (Some(id), _) => (
                engine.delete_transaction(id).await,
                "Error deleting transaction",
            ),
            (None, Some(id)) => (engine.delete_category(id).await, "Error deleting category"),
            (None, None) => return Ok(()),
        };

        match result {
            Ok(()) => {
                self.toast("Deleted", ToastLevel::Success);
                self.reload().await?;
            }
            Err(err) => self.report(action, err),
        }
        Ok(())
    }

    async fn export_csv(&mut self) {
        let period = self.state.period;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        let csv = match engine.transactions(period).await {
            Ok(transactions) => export::transactions_csv(&transactions),
            Err(err) => Err(err),
        };
        match csv {
            Ok(csv) => {
                match write_export(&self.config.export_dir, &export::file_name(period), &csv) {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "transactions exported");
                        self.toast(
                            format!("Exported {}", path.display()),
                            ToastLevel::Success,
                        );
                    }
                    Err(err) => {
                        tracing::error!(%err, "export write failed");
                        self.state.alert = Some(format!("Error exporting transactions: {err}"));
                    }
                }
            }
            Err(EngineError::NothingToExport) => {
                self.state.alert = Some(EngineError::NothingToExport.to_string());
            }
            Err(err) => self.report("Error exporting transactions", err),
        }
    }

    async fn sign_out(&mut self) -> Result<()> {
        let result = match self.engine.as_mut() {
            Some(engine) => engine.sign_out().await,
            None => Ok(()),
        };
        self.forget_session();
        self.show_login(None);
        match result {
            Ok(()) => self.toast("Signed out", ToastLevel::Info),
            Err(err) => {
                tracing::warn!(%err, "remote sign out failed");
                self.toast("Signed out locally", ToastLevel::Error);
            }
        }
        Ok(())
    }

    /// Loads what the current section shows. Cached queries are served
    /// without a round trip.
    async fn reload(&mut self) -> Result<()> {
        let period = self.state.period;
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        match self.state.section {
            Section::Dashboard => match dashboard_data(engine, period).await {
                Ok((summary, recent)) => {
                    self.state.dashboard = DashboardState {
                        summary: Some(summary),
                        recent,
                        error: None,
                    };
                }
                Err(err) => self.state.dashboard.error = self.load_failed(err),
            },
            Section::Transactions => match transactions_data(engine, period).await {
                Ok((items, categories)) => {
                    let list = &mut self.state.transactions;
                    list.selected = list.selected.min(items.len().saturating_sub(1));
                    list.items = items;
                    list.error = None;
                    self.state.categories.items = categories;
                }
                Err(err) => self.state.transactions.error = self.load_failed(err),
            },
            Section::Categories => match categories_data(engine, period).await {
                Ok((items, summary)) => {
                    let list = &mut self.state.categories;
                    list.selected = list.selected.min(items.len().saturating_sub(1));
                    list.items = items;
                    list.summary = Some(summary);
                    list.error = None;
                }
                Err(err) => self.state.categories.error = self.load_failed(err),
            },
            Section::Profile => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_clamped() {
        assert_eq!(step(0, 0, true), 0);
        assert_eq!(step(0, 3, false), 0);
        assert_eq!(step(1, 3, true), 2);
        assert_eq!(step(2, 3, true), 2);
    }

    #[test]
    fn section_shortcuts() {
        assert_eq!(Section::from_shortcut('t'), Some(Section::Transactions));
        assert_eq!(Section::from_shortcut('P'), Some(Section::Profile));
        assert_eq!(Section::from_shortcut('z'), None);
    }

    #[test]
    fn login_errors_are_readable() {
        assert_eq!(
            login_message(&EngineError::Backend(BackendError::Validation(
                "Invalid login credentials".to_string()
            ))),
            "Invalid login credentials"
        );
        assert_eq!(
            login_message(&EngineError::Backend(BackendError::Transport(
                "connection refused".to_string()
            ))),
            "Server unreachable: connection refused"
        );
    }

    #[test]
    fn remembered_email_focuses_password() {
        let login = LoginState::new(Some("alice@example.com".to_string()));
        assert_eq!(login.focus, LoginField::Password);
        assert_eq!(LoginState::new(None).focus, LoginField::Email);
    }

    #[tokio::test]
    async fn missing_credentials_open_the_fatal_screen() {
        let config = AppConfig {
            state_path: std::env::temp_dir()
                .join(format!("pennywise_app_{}", Uuid::new_v4()))
                .join("state.json")
                .display()
                .to_string(),
            ..AppConfig::default()
        };
        let app = App::new(ConfigLoader::default(), config).await.unwrap();
        assert_eq!(app.state.screen, Screen::Fatal);
        assert!(
            app.state
                .fatal
                .as_deref()
                .is_some_and(|message| message.contains("supabase_url"))
        );
    }

    #[tokio::test]
    async fn memory_backend_signs_up_and_loads_the_dashboard() {
        let config = AppConfig {
            backend: BackendKind::Memory,
            state_path: std::env::temp_dir()
                .join(format!("pennywise_app_{}", Uuid::new_v4()))
                .join("state.json")
                .display()
                .to_string(),
            ..AppConfig::default()
        };
        let mut app = App::new(ConfigLoader::default(), config).await.unwrap();
        assert_eq!(app.state.screen, Screen::Login);

        app.state.login.mode = LoginMode::SignUp;
        app.state.login.email = "alice@example.com".to_string();
        app.state.login.password = "secret1".to_string();
        app.attempt_login().await.unwrap();

        assert_eq!(app.state.screen, Screen::Home);
        assert_eq!(app.state.section, Section::Dashboard);
        assert_eq!(app.state.dashboard.summary, Some(Summary::default()));
        assert!(app.local.session.is_some());

        app.sign_out().await.unwrap();
        assert_eq!(app.state.screen, Screen::Login);
        assert!(app.local.session.is_none());
        assert_eq!(app.local.last_email.as_deref(), Some("alice@example.com"));
    }
}
