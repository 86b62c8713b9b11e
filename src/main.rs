use clap::Parser;
use runkang_admin::api::sales_lead::{AssignLeadParams, ConvertLeadParams};
use runkang_admin::config::{AppConfig, CliConfig, Command};
use runkang_admin::core::guard::{AccessGuard, NavigationTarget};
use runkang_admin::core::{ChangePasswordParams, LoginParams};
use runkang_admin::domain::ports::{HeadlessNavigator, LogNotifier, Navigator};
use runkang_admin::utils::error::{ApiError, ErrorSeverity};
use runkang_admin::utils::{logger, validation::Validate};
use runkang_admin::{
    AccessStore, AdminApi, AppContext, Entity, ListQuery, LocalStorage, Record, RequestClient,
    Result, SessionFile,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

fn exit_with(e: &ApiError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,      // 輸入錯誤
        ErrorSeverity::Medium => 2,   // 重新登入或重試
        ErrorSeverity::High => 1,     // 伺服器或資料錯誤
        ErrorSeverity::Critical => 3, // 配置錯誤
    };
    std::process::exit(exit_code);
}

fn parse_entity(raw: &str) -> Result<Entity> {
    raw.parse()
        .map_err(|message| ApiError::ValidationError { message })
}

async fn read_record(path: &Path) -> Result<Record> {
    let content = tokio::fs::read_to_string(path).await?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(record) => Ok(record),
        _ => Err(ApiError::ValidationError {
            message: format!("{} must contain a JSON object", path.display()),
        }),
    }
}

async fn run(api: &AdminApi, command: Command) -> Result<Option<Value>> {
    let client = api.client();
    let auth = client.auth();

    match command {
        Command::Login {
            branch_id,
            username,
            password,
        } => {
            let params = LoginParams {
                branch_id,
                user_name: username,
                password,
            };
            let user = auth.login(&params).await?;
            Ok(Some(serde_json::to_value(user)?))
        }
        Command::Logout => {
            auth.logout(false).await;
            Ok(None)
        }
        Command::Whoami => match auth.fetch_user_info() {
            Some(user) => Ok(Some(serde_json::to_value(user)?)),
            None => Err(ApiError::Unauthorized),
        },
        Command::ChangePassword {
            old_password,
            new_password,
        } => {
            let params = ChangePasswordParams {
                old_password,
                confirm_password: new_password.clone(),
                new_password,
            };
            auth.change_password(&params).await?;
            tracing::info!("🔑 Password changed");
            Ok(None)
        }
        Command::Menus => {
            let routes = AccessGuard::new(client.clone()).generate_access().await;
            Ok(Some(serde_json::to_value(routes)?))
        }
        Command::Navigate { path } => {
            let guard = AccessGuard::new(client.clone());
            let mut to = NavigationTarget::parse(&path);
            // 命令列沒有路由表，登入頁以名稱標記
            if to.path == client.context().preferences.login_path {
                to = to.named("Login");
            }
            let decision = guard.check(&to, None).await;
            Ok(Some(Value::String(format!("{:?}", decision))))
        }
        Command::Branches => {
            let branches = api.branches().all().await?;
            Ok(Some(serde_json::to_value(branches)?))
        }
        Command::List {
            entity,
            page,
            size,
            order_by,
            asc,
            filters,
        } => {
            let entity = parse_entity(&entity)?;
            let mut query = ListQuery::new().page(page, size);
            if let Some(field) = order_by {
                query = query.order_by(field, asc);
            }
            for (key, value) in filters {
                query = query.filter(key, value);
            }
            let result = api.entity(entity).list(&query).await?;
            Ok(Some(serde_json::to_value(result)?))
        }
        Command::Get { entity, id } => {
            let record = api.entity(parse_entity(&entity)?).get(&id).await?;
            Ok(Some(Value::Object(record)))
        }
        Command::Create { entity, file } => {
            let record = read_record(&file).await?;
            api.entity(parse_entity(&entity)?).create(&record).await
        }
        Command::Update { entity, file } => {
            let record = read_record(&file).await?;
            api.entity(parse_entity(&entity)?).update(&record).await
        }
        Command::Delete { entity, id } => api.entity(parse_entity(&entity)?).delete(&id).await,
        Command::AssignLead { id, employee_id } => {
            let params = AssignLeadParams {
                id,
                assigned_employee_id: employee_id,
            };
            api.sales_leads().assign(&params).await
        }
        Command::ConvertLead { id, branch_id } => {
            api.sales_leads()
                .convert(&ConvertLeadParams { id, branch_id })
                .await
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let mut config = match AppConfig::load(Some(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(3);
        }
    };

    // 命令列覆蓋設定
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(dir) = &cli.session_dir {
        config.session.directory = dir.display().to_string();
    }

    if config.logging.json {
        logger::init_json_logger(config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_deref());
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let session_file = SessionFile::new(
        LocalStorage::new(&config.session.directory),
        config.session.file_name.clone(),
    );
    let store = AccessStore::from_session(session_file.load().await);
    // 每次執行都是新的「頁面」，路由需重新產生
    store.set_is_access_checked(false);

    let navigator = Arc::new(HeadlessNavigator::new(config.app.default_home_path.clone()));
    let ctx = Arc::new(AppContext::new(
        &config,
        store.clone(),
        navigator.clone(),
        Arc::new(LogNotifier),
    ));

    let client = match RequestClient::new(ctx) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    let api = AdminApi::new(client);

    tracing::info!("🚀 {} -> {}", config.app.name, config.api.base_url);
    let outcome = run(&api, cli.command).await;

    if let Err(e) = session_file.save(&store.snapshot()).await {
        tracing::warn!("Could not save session: {}", e);
    }
    if let Some(location) = navigator.last() {
        tracing::info!("🧭 Ended at {}", location.full_path());
    }
    tracing::debug!("Current route: {}", navigator.current_path());

    match outcome {
        Ok(Some(value)) => println!("{}", serde_json::to_string_pretty(&value)?),
        Ok(None) => println!("✅ Done"),
        Err(e) => exit_with(&e),
    }
    Ok(())
}
