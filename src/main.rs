use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use spinwin_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{CommerceApi, CommercePlatformClient},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 外部折扣平台客户端 (未启用时发码只落本地库)
    if !config.commerce.enabled {
        log::warn!("Commerce platform integration disabled, discounts will be local-only");
    }
    let commerce: Arc<dyn CommerceApi> = Arc::new(CommercePlatformClient::new(config.commerce.clone()));

    // 创建服务
    let visitor_service = VisitorService::new(pool.clone());
    let eligibility_service = EligibilityService::new(pool.clone());
    let session_service = SessionService::new(
        pool.clone(),
        visitor_service.clone(),
        eligibility_service.clone(),
    );
    let reward_service = RewardService::new(commerce);
    let play_service = PlayService::new(
        pool.clone(),
        session_service.clone(),
        eligibility_service.clone(),
        reward_service.clone(),
    );
    let discount_service = DiscountService::new(pool.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(session_service.clone()))
            .app_data(web::Data::new(play_service.clone()))
            .app_data(web::Data::new(discount_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::session_config)
                    .configure(handlers::play_config)
                    .configure(handlers::discount_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
