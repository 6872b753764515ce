mod error;
mod job_schedulers;
mod jobs;
mod oauth;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::{start_background_check_job, start_foreground_check_job, start_page_context};
use matchminder_domain::{ClientProfile, Permission};
use matchminder_infra::{Bridge, MatchminderContext, PermissionGate, StaticPrompt};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    jobs::configure_routes(cfg);
    oauth::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: MatchminderContext) -> Result<Self, std::io::Error> {
        let bridge = Arc::new(Bridge::new());
        let gate = Arc::new(PermissionGate::new(
            ClientProfile::default(),
            Arc::new(StaticPrompt(Permission::Granted)),
        ));
        // Headless deployments have no interactive prompt to go through
        gate.request_permission().await;

        let (server, port) = Application::configure_server(context.clone(), bridge.clone()).await?;
        Application::start_job_schedulers(context, gate, bridge);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(
        context: MatchminderContext,
        gate: Arc<PermissionGate>,
        bridge: Arc<Bridge>,
    ) {
        let check_lock = Arc::new(tokio::sync::Mutex::new(()));
        start_page_context(context.clone(), bridge.clone());
        start_foreground_check_job(
            context.clone(),
            gate.clone(),
            bridge.clone(),
            check_lock.clone(),
        );
        start_background_check_job(context, gate, bridge, check_lock);
    }

    async fn configure_server(
        context: MatchminderContext,
        bridge: Arc<Bridge>,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();
            let bridge = web::Data::from(bridge.clone());

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(bridge)
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
