//! JSON-RPC Server
//!
//! Serves the marketplace methods over HTTP on a TCP address (localhost by default).

use crate::handler::RpcHandler;
use crate::types::{
    AcceptOfferRequest, CleanerRequest, CreateEvaluationRequest, CreateOfferRequest,
    GetEvaluationRequest, GetOfferRequest, ListOffersRequest, OwnOfferRequest,
    RegisterJobRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9530;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// Register `$method`, parsing params into `$req` and forwarding to `$handler_fn`
macro_rules! register {
    ($module:expr, $handler:expr, $method:literal, $req:ty, $handler_fn:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $req = params.parse()?;
                    handler.$handler_fn(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, handler: Arc<RpcHandler>) -> Self {
        Self { config, handler }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        register!(module, self.handler, "jobs.register.v1", RegisterJobRequest, register_job);

        register!(module, self.handler, "offers.create.v1", CreateOfferRequest, create_offer);
        register!(module, self.handler, "offers.list.v1", ListOffersRequest, list_offers);
        register!(module, self.handler, "offers.get.v1", GetOfferRequest, get_offer);
        register!(module, self.handler, "offers.accept.v1", AcceptOfferRequest, accept_offer);
        register!(module, self.handler, "offers.cancel.v1", OwnOfferRequest, cancel_offer);
        register!(module, self.handler, "offers.rescind.v1", OwnOfferRequest, rescind_offer);

        register!(
            module,
            self.handler,
            "evaluations.create.v1",
            CreateEvaluationRequest,
            create_evaluation
        );
        register!(
            module,
            self.handler,
            "evaluations.get.v1",
            GetEvaluationRequest,
            get_evaluation
        );
        register!(module, self.handler, "evaluations.list.v1", CleanerRequest, list_evaluations);
        register!(module, self.handler, "evaluations.stats.v1", CleanerRequest, evaluation_stats);

        // Admin APIs (no params)
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = self.module()?;
        let methods = module.method_names().count();

        let handle = server.start(module);
        info!(methods, "JSON-RPC server started successfully");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phresh_core::port::{SystemTimeProvider, TimeProvider};
    use phresh_infra_sqlite::{
        create_pool, SqliteEvaluationRepository, SqliteJobDirectory, SqliteOfferRepository,
    };

    #[tokio::test]
    async fn test_module_registers_all_methods() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let offers = Arc::new(SqliteOfferRepository::new(pool.clone()));
        let handler = Arc::new(RpcHandler::new(
            offers.clone(),
            Arc::new(SqliteJobDirectory::new(pool.clone(), clock.clone())),
            offers,
            Arc::new(SqliteEvaluationRepository::new(pool)),
            clock,
        ));

        let module = RpcServer::new(RpcServerConfig::default(), handler)
            .module()
            .unwrap();
        let mut methods: Vec<&str> = module.method_names().collect();
        methods.sort_unstable();

        assert_eq!(
            methods,
            vec![
                "admin.stats.v1",
                "evaluations.create.v1",
                "evaluations.get.v1",
                "evaluations.list.v1",
                "evaluations.stats.v1",
                "jobs.register.v1",
                "offers.accept.v1",
                "offers.cancel.v1",
                "offers.create.v1",
                "offers.get.v1",
                "offers.list.v1",
                "offers.rescind.v1",
            ]
        );
    }
}
