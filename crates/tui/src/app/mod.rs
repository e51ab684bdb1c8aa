use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent};

use api_types::{
    contract::{Contract, ContractNew, ContractsResponse},
    network::{Network, NetworksResponse},
    series::{Series, SeriesNew, SeriesResponse},
};

use crate::{
    client::{ApiClient, Notice, NoticeLevel},
    config::AppConfig,
    error::{AppError, Result},
    mint::{self, MintOutcome, MintRequest},
    session::{SessionStore, View},
    ui::{
        self,
        keymap::{self, AppAction},
    },
};

const TOAST_TTL: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
pub struct ContractsState {
    pub items: Vec<Contract>,
    pub selected: usize,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SeriesListState {
    pub items: Vec<Series>,
    pub selected: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateContractField {
    #[default]
    Name,
    Symbol,
    Network,
    PrivateKey,
}

#[derive(Debug, Default)]
pub struct CreateContractState {
    pub networks: Vec<Network>,
    pub network_selected: usize,
    pub name: String,
    pub symbol: String,
    pub private_key: String,
    pub focus: CreateContractField,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateSeriesField {
    #[default]
    Name,
    PrivateKey,
}

#[derive(Debug, Default)]
pub struct CreateSeriesState {
    pub name: String,
    pub private_key: String,
    pub focus: CreateSeriesField,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MintField {
    #[default]
    Name,
    Owner,
    ImagePath,
}

#[derive(Debug, Default)]
pub struct MintState {
    pub name: String,
    pub owner: String,
    pub image_path: String,
    pub focus: MintField,
    pub message: Option<String>,
    pub outcome: Option<MintOutcome>,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: NoticeLevel,
    pub deadline: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub session: SessionStore,
    pub login: LoginState,
    pub contracts: ContractsState,
    pub series: SeriesListState,
    pub create_contract: CreateContractState,
    pub create_series: CreateSeriesState,
    pub mint: MintState,
    pub toast: Option<ToastState>,
    pub last_refresh: Option<DateTime<Local>>,
}

pub struct App {
    client: ApiClient,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url)?;
        // Loading also recovers a busy flag stranded by a kill mid-request.
        let session = SessionStore::load(&config.state_path);
        let state = AppState {
            session,
            login: LoginState {
                username: config.username.clone(),
                ..LoginState::default()
            },
            contracts: ContractsState::default(),
            series: SeriesListState::default(),
            create_contract: CreateContractState::default(),
            create_series: CreateSeriesState::default(),
            mint: MintState::default(),
            toast: None,
            last_refresh: None,
        };

        Ok(Self {
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.state.session.view() != &View::Login {
            self.toast(Notice::info("Restored previous session."));
        }
        self.refresh_view().await;

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.expire_toast();
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.session.view().clone() {
            View::Login => self.handle_login_key(action).await,
            View::Contracts => self.handle_contracts_key(action).await,
            View::Contract { contract } => self.handle_contract_key(action, contract).await,
            View::CreateContract => self.handle_create_contract_key(action).await,
            View::CreateSeries { contract } => {
                self.handle_create_series_key(action, contract).await;
            }
            View::Mint { contract, series } => {
                self.handle_mint_key(action, contract, series).await;
            }
        }
    }

    /// Entry fetch for whatever view is current; also run once on startup so
    /// a restored session lands on its screen with fresh data.
    async fn refresh_view(&mut self) {
        match self.state.session.view().clone() {
            View::Contracts => self.load_contracts().await,
            View::Contract { contract } => self.load_series(&contract).await,
            View::CreateContract => self.load_networks().await,
            View::Login | View::CreateSeries { .. } | View::Mint { .. } => {}
        }
    }

    async fn handle_login_key(&mut self, action: AppAction) {
        match action {
            AppAction::NextField => {
                self.state.login.focus = match self.state.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            AppAction::Backspace => {
                self.active_login_field_mut().pop();
            }
            AppAction::Input(ch) => {
                self.active_login_field_mut().push(ch);
            }
            AppAction::Submit => self.attempt_login().await,
            AppAction::Cancel => {
                self.state.login.message = None;
            }
            _ => {}
        }
    }

    fn active_login_field_mut(&mut self) -> &mut String {
        match self.state.login.focus {
            LoginField::Username => &mut self.state.login.username,
            LoginField::Password => &mut self.state.login.password,
        }
    }

    async fn attempt_login(&mut self) {
        let username = self.state.login.username.trim().to_string();
        let password = self.state.login.password.trim().to_string();

        if username.is_empty() || password.is_empty() {
            self.state.login.message = Some("Fill in both fields.".to_string());
            return;
        }

        if self
            .client
            .login(&mut self.state.session, &username, &password)
            .await
        {
            self.state.login.message = None;
            self.state.login.password.clear();
            self.toast(Notice::success("Logged in successfully."));
            self.state.session.set_view(View::Contracts);
            self.refresh_view().await;
        } else {
            self.state.login.message = Some("Login failed. Check your credentials.".to_string());
        }
    }

    async fn handle_contracts_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up => {
                self.state.contracts.selected = self.state.contracts.selected.saturating_sub(1);
            }
            AppAction::Down => {
                if !self.state.contracts.items.is_empty() {
                    self.state.contracts.selected = (self.state.contracts.selected + 1)
                        .min(self.state.contracts.items.len() - 1);
                }
            }
            AppAction::Submit => {
                let selected = self
                    .state
                    .contracts
                    .items
                    .get(self.state.contracts.selected)
                    .cloned();
                if let Some(contract) = selected {
                    self.state.session.select_contract(contract);
                    self.refresh_view().await;
                }
            }
            AppAction::Input('c') => {
                self.state.create_contract = CreateContractState::default();
                self.state.session.set_view(View::CreateContract);
                self.refresh_view().await;
            }
            AppAction::Input('r') => self.refresh_view().await,
            AppAction::Input('q') => self.should_quit = true,
            _ => {}
        }
    }

    async fn handle_contract_key(&mut self, action: AppAction, contract: Contract) {
        match action {
            AppAction::Up => {
                self.state.series.selected = self.state.series.selected.saturating_sub(1);
            }
            AppAction::Down => {
                if !self.state.series.items.is_empty() {
                    self.state.series.selected =
                        (self.state.series.selected + 1).min(self.state.series.items.len() - 1);
                }
            }
            AppAction::Submit => {
                let selected = self
                    .state
                    .series
                    .items
                    .get(self.state.series.selected)
                    .cloned();
                if let Some(series) = selected {
                    self.state.mint = MintState::default();
                    self.state.session.select_series(contract, series);
                }
            }
            AppAction::Input('c') => {
                self.state.create_series = CreateSeriesState::default();
                self.state.session.set_view(View::CreateSeries { contract });
            }
            AppAction::Input('r') => self.refresh_view().await,
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Cancel => {
                self.state.session.set_view(View::Contracts);
                self.refresh_view().await;
            }
            _ => {}
        }
    }

    async fn handle_create_contract_key(&mut self, action: AppAction) {
        match action {
            AppAction::NextField => {
                self.state.create_contract.focus = match self.state.create_contract.focus {
                    CreateContractField::Name => CreateContractField::Symbol,
                    CreateContractField::Symbol => CreateContractField::Network,
                    CreateContractField::Network => CreateContractField::PrivateKey,
                    CreateContractField::PrivateKey => CreateContractField::Name,
                };
            }
            AppAction::Up => {
                if self.state.create_contract.focus == CreateContractField::Network {
                    self.state.create_contract.network_selected = self
                        .state
                        .create_contract
                        .network_selected
                        .saturating_sub(1);
                }
            }
            AppAction::Down => {
                let form = &mut self.state.create_contract;
                if form.focus == CreateContractField::Network && !form.networks.is_empty() {
                    form.network_selected =
                        (form.network_selected + 1).min(form.networks.len() - 1);
                }
            }
            AppAction::Backspace => {
                if let Some(field) = self.active_create_contract_field_mut() {
                    field.pop();
                }
            }
            AppAction::Input(ch) => {
                if let Some(field) = self.active_create_contract_field_mut() {
                    field.push(ch);
                }
            }
            AppAction::Submit => self.submit_create_contract().await,
            AppAction::Cancel => {
                self.state.session.set_view(View::Contracts);
                self.refresh_view().await;
            }
            _ => {}
        }
    }

    fn active_create_contract_field_mut(&mut self) -> Option<&mut String> {
        let form = &mut self.state.create_contract;
        match form.focus {
            CreateContractField::Name => Some(&mut form.name),
            CreateContractField::Symbol => Some(&mut form.symbol),
            CreateContractField::PrivateKey => Some(&mut form.private_key),
            CreateContractField::Network => None,
        }
    }

    /// Submission stays on the form: the API call's toast is the only
    /// confirmation, matching the fire-and-forget submission flow.
    async fn submit_create_contract(&mut self) {
        let form = &self.state.create_contract;
        let network = form.networks.get(form.network_selected);

        if form.name.trim().is_empty()
            || form.symbol.trim().is_empty()
            || form.private_key.trim().is_empty()
        {
            self.state.create_contract.message = Some("Fill in every field.".to_string());
            return;
        }
        let Some(network) = network else {
            self.state.create_contract.message = Some("No network available.".to_string());
            return;
        };

        let payload = ContractNew {
            network: network.id,
            name: form.name.trim().to_string(),
            symbol: form.symbol.trim().to_string(),
            private_key: form.private_key.trim().to_string(),
        };
        let reply = self
            .client
            .post(&mut self.state.session, "/v2/contracts/", &payload)
            .await;
        self.state.create_contract.message = None;
        self.toast(reply.notice);
    }

    async fn handle_create_series_key(&mut self, action: AppAction, contract: Contract) {
        match action {
            AppAction::NextField => {
                self.state.create_series.focus = match self.state.create_series.focus {
                    CreateSeriesField::Name => CreateSeriesField::PrivateKey,
                    CreateSeriesField::PrivateKey => CreateSeriesField::Name,
                };
            }
            AppAction::Backspace => {
                self.active_create_series_field_mut().pop();
            }
            AppAction::Input(ch) => {
                self.active_create_series_field_mut().push(ch);
            }
            AppAction::Submit => self.submit_create_series(&contract).await,
            AppAction::Cancel => {
                self.state.session.set_view(View::Contract { contract });
                self.refresh_view().await;
            }
            _ => {}
        }
    }

    fn active_create_series_field_mut(&mut self) -> &mut String {
        match self.state.create_series.focus {
            CreateSeriesField::Name => &mut self.state.create_series.name,
            CreateSeriesField::PrivateKey => &mut self.state.create_series.private_key,
        }
    }

    async fn submit_create_series(&mut self, contract: &Contract) {
        let form = &self.state.create_series;
        if form.name.trim().is_empty() || form.private_key.trim().is_empty() {
            self.state.create_series.message = Some("Fill in every field.".to_string());
            return;
        }

        let payload = SeriesNew {
            name: form.name.trim().to_string(),
            contract: contract.id,
            private_key: form.private_key.trim().to_string(),
        };
        let reply = self
            .client
            .post(&mut self.state.session, "/v2/series/", &payload)
            .await;
        self.state.create_series.message = None;
        self.toast(reply.notice);
    }

    async fn handle_mint_key(&mut self, action: AppAction, contract: Contract, series: Series) {
        match action {
            AppAction::NextField => {
                self.state.mint.focus = match self.state.mint.focus {
                    MintField::Name => MintField::Owner,
                    MintField::Owner => MintField::ImagePath,
                    MintField::ImagePath => MintField::Name,
                };
            }
            AppAction::Backspace => {
                self.active_mint_field_mut().pop();
            }
            AppAction::Input(ch) => {
                self.active_mint_field_mut().push(ch);
            }
            AppAction::Submit => self.submit_mint(&series).await,
            AppAction::Cancel => {
                self.state.session.set_view(View::Contract { contract });
                self.refresh_view().await;
            }
            _ => {}
        }
    }

    fn active_mint_field_mut(&mut self) -> &mut String {
        match self.state.mint.focus {
            MintField::Name => &mut self.state.mint.name,
            MintField::Owner => &mut self.state.mint.owner,
            MintField::ImagePath => &mut self.state.mint.image_path,
        }
    }

    async fn submit_mint(&mut self, series: &Series) {
        let form = &self.state.mint;
        if form.name.trim().is_empty()
            || form.owner.trim().is_empty()
            || form.image_path.trim().is_empty()
        {
            self.state.mint.message = Some("Fill in every field.".to_string());
            return;
        }

        let path = form.image_path.trim().to_string();
        let image = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.state.mint.message = Some(format!("Cannot read image: {err}"));
                return;
            }
        };

        let request = MintRequest {
            series_id: series.id,
            name: form.name.trim().to_string(),
            owner: form.owner.trim().to_string(),
            image,
            content_type: content_type_for(&path).to_string(),
        };

        self.state.mint.message = None;
        let outcome = mint::run(&self.client, &mut self.state.session, request).await;
        let notice = match &outcome {
            MintOutcome::Minted { .. } => Notice::success(outcome.summary()),
            MintOutcome::Aborted { .. } => Notice::error(outcome.summary()),
        };
        self.state.mint.outcome = Some(outcome);
        self.toast(notice);
    }

    async fn load_contracts(&mut self) {
        let reply = self
            .client
            .get(&mut self.state.session, "/v2/contracts/?self=true")
            .await;
        let ok = reply.ok();
        let notice = reply.notice.clone();

        match serde_json::from_value::<ContractsResponse>(reply.body) {
            Ok(res) => {
                self.state.contracts.items = res.results;
                self.state.contracts.selected = 0;
                self.state.contracts.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(_) => {
                self.state.contracts.error = Some(if ok {
                    "Unexpected reply shape.".to_string()
                } else {
                    notice.message.clone()
                });
            }
        }
        self.toast(notice);
    }

    async fn load_series(&mut self, contract: &Contract) {
        let path = format!("/v2/series/?contract={}", contract.address);
        let reply = self.client.get(&mut self.state.session, &path).await;
        let ok = reply.ok();
        let notice = reply.notice.clone();

        match serde_json::from_value::<SeriesResponse>(reply.body) {
            Ok(res) => {
                self.state.series.items = res.results;
                self.state.series.selected = 0;
                self.state.series.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(_) => {
                self.state.series.error = Some(if ok {
                    "Unexpected reply shape.".to_string()
                } else {
                    notice.message.clone()
                });
            }
        }
        self.toast(notice);
    }

    async fn load_networks(&mut self) {
        let reply = self
            .client
            .get(&mut self.state.session, "/v2/networks/")
            .await;
        let notice = reply.notice.clone();

        if let Ok(res) = serde_json::from_value::<NetworksResponse>(reply.body) {
            self.state.create_contract.networks = res.results;
            self.state.create_contract.network_selected = 0;
            self.state.last_refresh = Some(Local::now());
        }
        self.toast(notice);
    }

    fn toast(&mut self, notice: Notice) {
        self.state.toast = Some(ToastState {
            message: notice.message,
            level: notice.level,
            deadline: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = &self.state.toast
            && toast.deadline <= Instant::now()
        {
            self.state.toast = None;
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else {
        // The upload flow accepts PNG by default.
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Json, Router, routing::get, routing::post};
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app_with(base_url: &str, dir: &tempfile::TempDir) -> App {
        let config = AppConfig {
            base_url: base_url.to_string(),
            state_path: dir.path().join("state.json").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        App::new(config).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn contract() -> Contract {
        Contract {
            id: 4,
            name: "Gallery".to_string(),
            address: "KT1abc".to_string(),
        }
    }

    #[tokio::test]
    async fn selecting_a_contract_navigates_and_loads_its_series() {
        let router = Router::new().route(
            "/v2/series/",
            get(|| async { Json(json!({"results": [{"id": 9, "name": "Spring"}]})) }),
        );
        let base = serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&base, &dir);

        app.state.session.set_view(View::Contracts);
        app.state.contracts.items = vec![contract()];
        app.state.contracts.selected = 0;

        app.handle_key(key(KeyCode::Enter)).await;

        assert_eq!(app.state.session.view(), &View::Contract {
            contract: contract()
        });
        assert_eq!(app.state.series.items.len(), 1);
        assert_eq!(app.state.series.items[0].name, "Spring");
    }

    #[tokio::test]
    async fn login_with_empty_fields_shows_a_message_without_a_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with("http://127.0.0.1:1", &dir);

        app.handle_key(key(KeyCode::Enter)).await;

        assert_eq!(
            app.state.login.message.as_deref(),
            Some("Fill in both fields.")
        );
        assert_eq!(app.state.session.view(), &View::Login);
    }

    #[tokio::test]
    async fn create_contract_submission_stays_on_the_form() {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler_hits = hits.clone();
        let router = Router::new().route(
            "/v2/contracts/",
            post(move |Json(body): Json<serde_json::Value>| {
                let hits = handler_hits.clone();
                async move {
                    assert_eq!(body["network"], 2);
                    assert_eq!(body["symbol"], "MC");
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"id": 11}))
                }
            }),
        );
        let base = serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&base, &dir);

        app.state.session.set_view(View::CreateContract);
        app.state.create_contract.networks = vec![Network {
            id: 2,
            name: "Mainnet".to_string(),
            network_id: 1,
        }];
        app.state.create_contract.name = "My Contract".to_string();
        app.state.create_contract.symbol = "MC".to_string();
        app.state.create_contract.private_key = "edsk...".to_string();

        app.handle_key(key(KeyCode::Enter)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(app.state.session.view(), &View::CreateContract);
        assert!(app.state.toast.is_some());
    }

    #[tokio::test]
    async fn escape_from_series_list_returns_to_contracts() {
        let router = Router::new().route(
            "/v2/contracts/",
            get(|| async { Json(json!({"results": []})) }),
        );
        let base = serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&base, &dir);

        app.state.session.select_contract(contract());
        app.handle_key(key(KeyCode::Esc)).await;

        assert_eq!(app.state.session.view(), &View::Contracts);
    }
}
